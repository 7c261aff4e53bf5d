use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;

use crate::models::sections::{Education, Experience, PersonalInfo, Skill};

pub const DEFAULT_THEME_COLOR: &str = "#7c3aed";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Private,
    Public,
    Archived,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Private => "private",
            DocumentStatus::Public => "public",
            DocumentStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown document status '{0}'")]
pub struct UnknownStatus(pub String);

impl TryFrom<String> for DocumentStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "private" => Ok(DocumentStatus::Private),
            "public" => Ok(DocumentStatus::Public),
            "archived" => Ok(DocumentStatus::Archived),
            _ => Err(UnknownStatus(value)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Surrogate key; child records point at it through `doc_id`.
    pub id: i64,
    /// Externally visible identifier used in every route.
    pub document_id: String,
    pub user_id: String,
    pub title: String,
    pub summary: Option<String>,
    pub thumbnail: Option<String>,
    pub theme_color: String,
    #[sqlx(try_from = "String")]
    pub status: DocumentStatus,
    pub current_position: i32,
    pub author_name: String,
    pub author_email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub fn is_archived(&self) -> bool {
        self.status == DocumentStatus::Archived
    }
}

/// A document joined with all of its section records.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentAggregate {
    #[serde(flatten)]
    pub document: Document,
    pub personal_info: Option<PersonalInfo>,
    pub experiences: Vec<Experience>,
    pub educations: Vec<Education>,
    pub skills: Vec<Skill>,
}
