use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Common shape of every record that hangs off a document through `doc_id`.
pub trait SectionRecord: Clone + Send + Sync {
    fn id(&self) -> i64;
    fn doc_id(&self) -> i64;
    /// An empty record, ready to have a patch applied to it.
    fn blank(id: i64, doc_id: i64) -> Self;
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub id: i64,
    pub doc_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub job_title: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: i64,
    pub doc_id: i64,
    pub title: Option<String>,
    pub company_name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub currently_working: bool,
    pub work_summary: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub id: i64,
    pub doc_id: i64,
    pub university_name: Option<String>,
    pub degree: Option<String>,
    pub major: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: i64,
    pub doc_id: i64,
    pub name: Option<String>,
    pub rating: i32,
}

impl SectionRecord for PersonalInfo {
    fn id(&self) -> i64 {
        self.id
    }

    fn doc_id(&self) -> i64 {
        self.doc_id
    }

    fn blank(id: i64, doc_id: i64) -> Self {
        PersonalInfo {
            id,
            doc_id,
            first_name: None,
            last_name: None,
            job_title: None,
            address: None,
            phone: None,
            email: None,
        }
    }
}

impl SectionRecord for Experience {
    fn id(&self) -> i64 {
        self.id
    }

    fn doc_id(&self) -> i64 {
        self.doc_id
    }

    fn blank(id: i64, doc_id: i64) -> Self {
        Experience {
            id,
            doc_id,
            title: None,
            company_name: None,
            city: None,
            state: None,
            currently_working: false,
            work_summary: None,
            start_date: None,
            end_date: None,
        }
    }
}

impl SectionRecord for Education {
    fn id(&self) -> i64 {
        self.id
    }

    fn doc_id(&self) -> i64 {
        self.doc_id
    }

    fn blank(id: i64, doc_id: i64) -> Self {
        Education {
            id,
            doc_id,
            university_name: None,
            degree: None,
            major: None,
            description: None,
            start_date: None,
            end_date: None,
        }
    }
}

impl SectionRecord for Skill {
    fn id(&self) -> i64 {
        self.id
    }

    fn doc_id(&self) -> i64 {
        self.doc_id
    }

    fn blank(id: i64, doc_id: i64) -> Self {
        Skill {
            id,
            doc_id,
            name: None,
            rating: 0,
        }
    }
}

/// Section records loaded for a single document, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentSections {
    pub personal_info: Option<PersonalInfo>,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub skills: Vec<Skill>,
}
