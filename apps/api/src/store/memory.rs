use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::document::Document;
use crate::models::sections::{
    DocumentSections, Education, Experience, PersonalInfo, SectionRecord, Skill,
};
use crate::store::{ChangeSet, DocumentLookup, DocumentStore, ListScope, StoreError};

#[derive(Debug, Default)]
struct Collections {
    documents: Vec<Document>,
    personal_info: Vec<PersonalInfo>,
    experience: Vec<Experience>,
    education: Vec<Education>,
    skills: Vec<Skill>,
}

/// Process-local store holding the five collections as plain vectors.
/// Each instance is isolated, so tests build their own.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn for_doc<R: SectionRecord>(rows: &[R], doc_id: i64) -> Vec<R> {
    rows.iter().filter(|r| r.doc_id() == doc_id).cloned().collect()
}

/// Replaces rows by id. A row whose id is already taken by another document
/// is left alone, matching the `doc_id` guard on the PostgreSQL upserts.
fn upsert<R: SectionRecord>(rows: &mut Vec<R>, incoming: &[R]) {
    for record in incoming {
        match rows.iter_mut().find(|r| r.id() == record.id()) {
            Some(existing) if existing.doc_id() == record.doc_id() => *existing = record.clone(),
            Some(existing) => debug!(
                "Skipping section row {}: id belongs to document {}, not {}",
                record.id(),
                existing.doc_id(),
                record.doc_id()
            ),
            None => rows.push(record.clone()),
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_document(&self, document: &Document) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        collections.documents.push(document.clone());
        debug!(
            "documents collection now holds {} records",
            collections.documents.len()
        );
        Ok(())
    }

    async fn find_document(
        &self,
        lookup: DocumentLookup<'_>,
    ) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .documents
            .iter()
            .find(|d| lookup.matches(d))
            .cloned())
    }

    async fn list_documents(
        &self,
        user_id: &str,
        scope: ListScope,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .documents
            .iter()
            .filter(|d| d.user_id == user_id && scope.includes(d))
            .cloned()
            .collect())
    }

    async fn load_sections(&self, doc_id: i64) -> Result<DocumentSections, StoreError> {
        let collections = self.collections.read().await;
        Ok(DocumentSections {
            personal_info: collections
                .personal_info
                .iter()
                .find(|p| p.doc_id == doc_id)
                .cloned(),
            experience: for_doc(&collections.experience, doc_id),
            education: for_doc(&collections.education, doc_id),
            skills: for_doc(&collections.skills, doc_id),
        })
    }

    async fn apply(&self, changes: &ChangeSet) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;

        // Validate before mutating anything so a miss leaves every collection untouched.
        let slot = collections
            .documents
            .iter()
            .position(|d| d.id == changes.document.id)
            .ok_or(StoreError::DocumentMissing(changes.document.id))?;
        collections.documents[slot] = changes.document.clone();

        if let Some(info) = &changes.personal_info {
            upsert(&mut collections.personal_info, std::slice::from_ref(info));
        }
        upsert(&mut collections.experience, &changes.experience);
        upsert(&mut collections.education, &changes.education);
        upsert(&mut collections.skills, &changes.skills);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::document::{DocumentStatus, DEFAULT_THEME_COLOR};

    fn make_doc(id: i64, document_id: &str, user_id: &str, status: DocumentStatus) -> Document {
        let now = Utc::now();
        Document {
            id,
            document_id: document_id.to_string(),
            user_id: user_id.to_string(),
            title: "Resume".to_string(),
            summary: None,
            thumbnail: None,
            theme_color: DEFAULT_THEME_COLOR.to_string(),
            status,
            current_position: 1,
            author_name: String::new(),
            author_email: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_lookup_respects_owner_and_status() {
        let store = MemoryStore::new();
        store
            .insert_document(&make_doc(1, "a", "alice", DocumentStatus::Public))
            .await
            .unwrap();

        let owned = store
            .find_document(DocumentLookup::owned("a", "alice"))
            .await
            .unwrap();
        assert!(owned.is_some());

        let other_owner = store
            .find_document(DocumentLookup::owned("a", "bob"))
            .await
            .unwrap();
        assert!(other_owner.is_none());

        let lookup = DocumentLookup::owned("a", "alice").with_status(DocumentStatus::Archived);
        let archived = store.find_document(lookup).await.unwrap();
        assert!(archived.is_none());

        let public = store.find_document(DocumentLookup::public("a")).await.unwrap();
        assert!(public.is_some());
    }

    #[tokio::test]
    async fn test_list_scopes_filter_by_owner() {
        let store = MemoryStore::new();
        store
            .insert_document(&make_doc(1, "a", "alice", DocumentStatus::Private))
            .await
            .unwrap();
        store
            .insert_document(&make_doc(2, "b", "alice", DocumentStatus::Archived))
            .await
            .unwrap();
        store
            .insert_document(&make_doc(3, "c", "bob", DocumentStatus::Private))
            .await
            .unwrap();

        let active = store.list_documents("alice", ListScope::Active).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].document_id, "a");

        let archived = store
            .list_documents("alice", ListScope::Archived)
            .await
            .unwrap();
        assert_eq!(archived.len(), 1);
        assert_eq!(archived[0].document_id, "b");
    }

    #[tokio::test]
    async fn test_apply_upserts_sections_by_id() {
        let store = MemoryStore::new();
        let doc = make_doc(1, "a", "alice", DocumentStatus::Private);
        store.insert_document(&doc).await.unwrap();

        let mut skill = Skill::blank(10, 1);
        skill.name = Some("Rust".to_string());
        let mut changes = ChangeSet::document_only(doc.clone());
        changes.skills.push(skill.clone());
        store.apply(&changes).await.unwrap();

        skill.rating = 4;
        let mut changes = ChangeSet::document_only(doc);
        changes.skills.push(skill);
        store.apply(&changes).await.unwrap();

        let sections = store.load_sections(1).await.unwrap();
        assert_eq!(sections.skills.len(), 1);
        assert_eq!(sections.skills[0].rating, 4);
    }

    #[tokio::test]
    async fn test_apply_never_overwrites_another_documents_row() {
        let store = MemoryStore::new();
        let first = make_doc(1, "a", "alice", DocumentStatus::Private);
        let second = make_doc(2, "b", "alice", DocumentStatus::Private);
        store.insert_document(&first).await.unwrap();
        store.insert_document(&second).await.unwrap();

        let mut original = Experience::blank(50, 1);
        original.company_name = Some("Acme".to_string());
        let mut changes = ChangeSet::document_only(first);
        changes.experience.push(original.clone());
        store.apply(&changes).await.unwrap();

        // Same id, different document: the first document's row must survive.
        let mut colliding = Experience::blank(50, 2);
        colliding.company_name = Some("Globex".to_string());
        let mut changes = ChangeSet::document_only(second);
        changes.experience.push(colliding);
        store.apply(&changes).await.unwrap();

        assert_eq!(store.load_sections(1).await.unwrap().experience, vec![original]);
        assert!(store.load_sections(2).await.unwrap().experience.is_empty());
    }

    #[tokio::test]
    async fn test_apply_unknown_document_changes_nothing() {
        let store = MemoryStore::new();
        let mut changes =
            ChangeSet::document_only(make_doc(99, "ghost", "alice", DocumentStatus::Private));
        changes.experience.push(Experience::blank(5, 99));

        let err = store.apply(&changes).await.unwrap_err();
        assert!(matches!(err, StoreError::DocumentMissing(99)));
        assert!(store.load_sections(99).await.unwrap().experience.is_empty());
    }
}
