//! Request and response bodies for the document routes.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::document::DocumentStatus;

/// Shape checks that run before a handler touches the service.
pub trait Validate {
    fn validate(&self) -> Result<(), AppError>;
}

const MAX_TITLE_LEN: usize = 200;

// ────────────────────────────────────────────────────────────────────────────
// Requests
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDocumentRequest {
    pub title: String,
}

impl Validate for CreateDocumentRequest {
    fn validate(&self) -> Result<(), AppError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(AppError::Validation("title cannot be empty".to_string()));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(AppError::Validation(format!(
                "title must be at most {MAX_TITLE_LEN} characters"
            )));
        }
        Ok(())
    }
}

/// Partial document sent by the builder. Absent and falsy values both leave
/// the stored value alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPatch {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub thumbnail: Option<String>,
    pub theme_color: Option<String>,
    pub status: Option<DocumentStatus>,
    pub current_position: Option<i32>,
    pub personal_info: Option<PersonalInfoPatch>,
    pub experience: Option<Vec<ExperiencePatch>>,
    pub education: Option<Vec<EducationPatch>>,
    #[serde(alias = "skillsInfo")]
    pub skills: Option<Vec<SkillPatch>>,
}

impl Validate for DocumentPatch {
    fn validate(&self) -> Result<(), AppError> {
        if let Some(title) = &self.title {
            if title.chars().count() > MAX_TITLE_LEN {
                return Err(AppError::Validation(format!(
                    "title must be at most {MAX_TITLE_LEN} characters"
                )));
            }
        }
        if self.current_position.is_some_and(|p| p < 0) {
            return Err(AppError::Validation(
                "currentPosition cannot be negative".to_string(),
            ));
        }
        if let Some(skills) = &self.skills {
            if skills.iter().any(|s| s.rating.is_some_and(|r| !(0..=5).contains(&r))) {
                return Err(AppError::Validation(
                    "skill rating must be between 0 and 5".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfoPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub job_title: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperiencePatch {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub company_name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub currently_working: Option<bool>,
    pub work_summary: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationPatch {
    pub id: Option<i64>,
    pub university_name: Option<String>,
    pub degree: Option<String>,
    pub major: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillPatch {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub rating: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreRequest {
    pub document_id: String,
    /// Caller's assertion of the current status; must be "archived".
    pub status: String,
}

impl Validate for RestoreRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.document_id.trim().is_empty() {
            return Err(AppError::Validation(
                "documentId cannot be empty".to_string(),
            ));
        }
        if self.status.trim().is_empty() {
            return Err(AppError::Validation("status cannot be empty".to_string()));
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Responses
// ────────────────────────────────────────────────────────────────────────────

/// Success envelope shared by every document route.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        ApiResponse {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        ApiResponse {
            success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        ApiResponse {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}
