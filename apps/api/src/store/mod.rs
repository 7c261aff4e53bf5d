//! Storage port for documents and their section records.
//!
//! The document service never touches a concrete backend. `main` picks one at
//! startup: `MemoryStore` by default, `PgStore` when `DATABASE_URL` is set.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::document::{Document, DocumentStatus};
use crate::models::sections::{DocumentSections, Education, Experience, PersonalInfo, Skill};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Document {0} disappeared before the write was applied")]
    DocumentMissing(i64),
}

/// Selects a single document by its public id, optionally narrowed to an
/// owner and/or a status.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DocumentLookup<'a> {
    pub document_id: &'a str,
    pub user_id: Option<&'a str>,
    pub status: Option<DocumentStatus>,
}

impl<'a> DocumentLookup<'a> {
    pub fn owned(document_id: &'a str, user_id: &'a str) -> Self {
        DocumentLookup {
            document_id,
            user_id: Some(user_id),
            status: None,
        }
    }

    /// Ignores ownership entirely; only public documents match.
    pub fn public(document_id: &'a str) -> Self {
        DocumentLookup {
            document_id,
            user_id: None,
            status: Some(DocumentStatus::Public),
        }
    }

    pub fn with_status(mut self, status: DocumentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matches(&self, doc: &Document) -> bool {
        doc.document_id == self.document_id
            && self.user_id.map_or(true, |u| doc.user_id == u)
            && self.status.map_or(true, |s| doc.status == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListScope {
    /// Everything except archived documents.
    Active,
    Archived,
}

impl ListScope {
    pub fn includes(&self, doc: &Document) -> bool {
        match self {
            ListScope::Active => !doc.is_archived(),
            ListScope::Archived => doc.is_archived(),
        }
    }
}

/// Every write produced by one service operation. Section records are upserts
/// keyed by `id`; a backend must apply the whole set or none of it.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeSet {
    pub document: Document,
    pub personal_info: Option<PersonalInfo>,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub skills: Vec<Skill>,
}

impl ChangeSet {
    pub fn document_only(document: Document) -> Self {
        ChangeSet {
            document,
            personal_info: None,
            experience: Vec::new(),
            education: Vec::new(),
            skills: Vec::new(),
        }
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert_document(&self, document: &Document) -> Result<(), StoreError>;

    async fn find_document(
        &self,
        lookup: DocumentLookup<'_>,
    ) -> Result<Option<Document>, StoreError>;

    /// Documents owned by `user_id` within `scope`, in insertion order.
    async fn list_documents(
        &self,
        user_id: &str,
        scope: ListScope,
    ) -> Result<Vec<Document>, StoreError>;

    async fn load_sections(&self, doc_id: i64) -> Result<DocumentSections, StoreError>;

    async fn apply(&self, changes: &ChangeSet) -> Result<(), StoreError>;
}
