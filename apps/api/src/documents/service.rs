use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::documents::ids::{new_document_id, IdSequence};
use crate::documents::merge::{apply_document_patch, merge_section, touch, upsert_personal_info};
use crate::documents::payload::DocumentPatch;
use crate::errors::AppError;
use crate::models::document::{Document, DocumentAggregate, DocumentStatus, DEFAULT_THEME_COLOR};
use crate::models::user::Owner;
use crate::store::{ChangeSet, DocumentLookup, DocumentStore, ListScope};

/// Document CRUD over an injected store. Every private operation is scoped to
/// the caller's `user_id`.
pub struct DocumentService {
    store: Arc<dyn DocumentStore>,
    ids: IdSequence,
}

impl DocumentService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        DocumentService {
            store,
            ids: IdSequence::new(),
        }
    }

    pub async fn create(&self, title: &str, owner: &Owner) -> Result<Document, AppError> {
        let now = Utc::now();
        let document = Document {
            id: self.ids.next_id(),
            document_id: new_document_id(),
            user_id: owner.user_id.clone(),
            title: title.to_string(),
            summary: None,
            thumbnail: None,
            theme_color: DEFAULT_THEME_COLOR.to_string(),
            status: DocumentStatus::Private,
            current_position: 1,
            author_name: owner.name.clone().unwrap_or_default(),
            author_email: owner.email.clone().unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        self.store.insert_document(&document).await?;
        info!(
            "Created document {} for user {}",
            document.document_id, owner.user_id
        );
        Ok(document)
    }

    pub async fn update(
        &self,
        document_id: &str,
        owner: &Owner,
        patch: DocumentPatch,
    ) -> Result<(), AppError> {
        let mut document = self.owned(document_id, owner).await?;
        let sections = self.store.load_sections(document.id).await?;

        apply_document_patch(&mut document, &patch, Utc::now());

        let personal_info = patch.personal_info.map(|p| {
            upsert_personal_info(sections.personal_info.as_ref(), document.id, p, &self.ids)
        });

        let experience = merge_section(
            &sections.experience,
            document.id,
            patch.experience.unwrap_or_default(),
            &self.ids,
        );
        let education = merge_section(
            &sections.education,
            document.id,
            patch.education.unwrap_or_default(),
            &self.ids,
        );
        let skills = merge_section(
            &sections.skills,
            document.id,
            patch.skills.unwrap_or_default(),
            &self.ids,
        );

        for (section, dropped) in [
            ("experience", &experience.dropped),
            ("education", &education.dropped),
            ("skills", &skills.dropped),
        ] {
            if !dropped.is_empty() {
                debug!("Ignoring {section} ids {dropped:?} not found on document {document_id}");
            }
        }

        let changes = ChangeSet {
            document,
            personal_info,
            experience: experience.upserts,
            education: education.upserts,
            skills: skills.upserts,
        };
        self.store.apply(&changes).await?;

        info!("Updated document {document_id} for user {}", owner.user_id);
        Ok(())
    }

    /// `expected_status` is the caller's claim about the document; anything
    /// other than "archived" is refused before the store is consulted.
    pub async fn restore_from_archive(
        &self,
        document_id: &str,
        owner: &Owner,
        expected_status: &str,
    ) -> Result<Document, AppError> {
        if expected_status != DocumentStatus::Archived.as_str() {
            warn!(
                "Refusing restore of {document_id}: status '{expected_status}' is not archived"
            );
            return Err(AppError::InvalidState(format!(
                "Only archived documents can be restored (got status '{expected_status}')"
            )));
        }

        let lookup = DocumentLookup::owned(document_id, &owner.user_id)
            .with_status(DocumentStatus::Archived);
        let mut document = self.store.find_document(lookup).await?.ok_or_else(|| {
            AppError::NotFound(format!("Archived document {document_id} not found"))
        })?;

        document.status = DocumentStatus::Private;
        touch(&mut document, Utc::now());
        self.store
            .apply(&ChangeSet::document_only(document.clone()))
            .await?;

        info!("Restored document {document_id} for user {}", owner.user_id);
        Ok(document)
    }

    /// Non-archived documents, most recently updated first.
    pub async fn list_active(&self, owner: &Owner) -> Result<Vec<Document>, AppError> {
        let mut documents = self
            .store
            .list_documents(&owner.user_id, ListScope::Active)
            .await?;
        documents.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(documents)
    }

    pub async fn list_archived(&self, owner: &Owner) -> Result<Vec<Document>, AppError> {
        Ok(self
            .store
            .list_documents(&owner.user_id, ListScope::Archived)
            .await?)
    }

    pub async fn get_by_id(
        &self,
        document_id: &str,
        owner: &Owner,
    ) -> Result<DocumentAggregate, AppError> {
        let document = self.owned(document_id, owner).await?;
        self.aggregate(document).await
    }

    /// Anonymous read; only documents marked public are visible.
    pub async fn get_public(&self, document_id: &str) -> Result<DocumentAggregate, AppError> {
        let document = self
            .store
            .find_document(DocumentLookup::public(document_id))
            .await?
            .ok_or_else(|| {
                AppError::Unauthorized(format!("Document {document_id} is not public"))
            })?;
        self.aggregate(document).await
    }

    async fn owned(&self, document_id: &str, owner: &Owner) -> Result<Document, AppError> {
        self.store
            .find_document(DocumentLookup::owned(document_id, &owner.user_id))
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Document {document_id} not found")))
    }

    async fn aggregate(&self, document: Document) -> Result<DocumentAggregate, AppError> {
        let sections = self.store.load_sections(document.id).await?;
        Ok(DocumentAggregate {
            document,
            personal_info: sections.personal_info,
            experiences: sections.experience,
            educations: sections.education,
            skills: sections.skills,
        })
    }
}
