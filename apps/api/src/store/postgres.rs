use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::info;

use crate::models::document::{Document, DocumentStatus};
use crate::models::sections::{DocumentSections, Education, Experience, PersonalInfo, Skill};
use crate::store::{ChangeSet, DocumentLookup, DocumentStore, ListScope, StoreError};

/// PostgreSQL-backed store. Every `ChangeSet` is written inside one transaction.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn insert_document(&self, document: &Document) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO documents
                (id, document_id, user_id, title, summary, thumbnail, theme_color,
                 status, current_position, author_name, author_email, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(document.id)
        .bind(&document.document_id)
        .bind(&document.user_id)
        .bind(&document.title)
        .bind(&document.summary)
        .bind(&document.thumbnail)
        .bind(&document.theme_color)
        .bind(document.status.as_str())
        .bind(document.current_position)
        .bind(&document.author_name)
        .bind(&document.author_email)
        .bind(document.created_at)
        .bind(document.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_document(
        &self,
        lookup: DocumentLookup<'_>,
    ) -> Result<Option<Document>, StoreError> {
        Ok(sqlx::query_as::<_, Document>(
            r#"
            SELECT * FROM documents
            WHERE document_id = $1
              AND ($2::TEXT IS NULL OR user_id = $2)
              AND ($3::TEXT IS NULL OR status = $3)
            LIMIT 1
            "#,
        )
        .bind(lookup.document_id)
        .bind(lookup.user_id)
        .bind(lookup.status.map(|s| s.as_str()))
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn list_documents(
        &self,
        user_id: &str,
        scope: ListScope,
    ) -> Result<Vec<Document>, StoreError> {
        let sql = match scope {
            ListScope::Active => {
                "SELECT * FROM documents WHERE user_id = $1 AND status <> $2 ORDER BY id"
            }
            ListScope::Archived => {
                "SELECT * FROM documents WHERE user_id = $1 AND status = $2 ORDER BY id"
            }
        };

        Ok(sqlx::query_as::<_, Document>(sql)
            .bind(user_id)
            .bind(DocumentStatus::Archived.as_str())
            .fetch_all(&self.pool)
            .await?)
    }

    async fn load_sections(&self, doc_id: i64) -> Result<DocumentSections, StoreError> {
        let personal_info = sqlx::query_as::<_, PersonalInfo>(
            "SELECT * FROM personal_info WHERE doc_id = $1 ORDER BY id LIMIT 1",
        )
        .bind(doc_id)
        .fetch_optional(&self.pool)
        .await?;

        let experience = sqlx::query_as::<_, Experience>(
            "SELECT * FROM experience WHERE doc_id = $1 ORDER BY id",
        )
        .bind(doc_id)
        .fetch_all(&self.pool)
        .await?;

        let education = sqlx::query_as::<_, Education>(
            "SELECT * FROM education WHERE doc_id = $1 ORDER BY id",
        )
        .bind(doc_id)
        .fetch_all(&self.pool)
        .await?;

        let skills =
            sqlx::query_as::<_, Skill>("SELECT * FROM skills WHERE doc_id = $1 ORDER BY id")
                .bind(doc_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(DocumentSections {
            personal_info,
            experience,
            education,
            skills,
        })
    }

    async fn apply(&self, changes: &ChangeSet) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        update_document(&mut tx, &changes.document).await?;
        if let Some(info) = &changes.personal_info {
            upsert_personal_info(&mut tx, info).await?;
        }
        for row in &changes.experience {
            upsert_experience(&mut tx, row).await?;
        }
        for row in &changes.education {
            upsert_education(&mut tx, row).await?;
        }
        for row in &changes.skills {
            upsert_skill(&mut tx, row).await?;
        }

        tx.commit().await?;

        info!(
            "Committed change set for document {} ({} experience, {} education, {} skills)",
            changes.document.document_id,
            changes.experience.len(),
            changes.education.len(),
            changes.skills.len()
        );
        Ok(())
    }
}

async fn update_document(
    tx: &mut Transaction<'_, Postgres>,
    document: &Document,
) -> Result<(), StoreError> {
    let result = sqlx::query(
        r#"
        UPDATE documents
        SET title = $2, summary = $3, thumbnail = $4, theme_color = $5, status = $6,
            current_position = $7, updated_at = $8
        WHERE id = $1
        "#,
    )
    .bind(document.id)
    .bind(&document.title)
    .bind(&document.summary)
    .bind(&document.thumbnail)
    .bind(&document.theme_color)
    .bind(document.status.as_str())
    .bind(document.current_position)
    .bind(document.updated_at)
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::DocumentMissing(document.id));
    }
    Ok(())
}

async fn upsert_personal_info(
    tx: &mut Transaction<'_, Postgres>,
    info: &PersonalInfo,
) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        INSERT INTO personal_info
            (id, doc_id, first_name, last_name, job_title, address, phone, email)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (id) DO UPDATE SET
            first_name = EXCLUDED.first_name,
            last_name = EXCLUDED.last_name,
            job_title = EXCLUDED.job_title,
            address = EXCLUDED.address,
            phone = EXCLUDED.phone,
            email = EXCLUDED.email
        WHERE personal_info.doc_id = EXCLUDED.doc_id
        "#,
    )
    .bind(info.id)
    .bind(info.doc_id)
    .bind(&info.first_name)
    .bind(&info.last_name)
    .bind(&info.job_title)
    .bind(&info.address)
    .bind(&info.phone)
    .bind(&info.email)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

async fn upsert_experience(
    tx: &mut Transaction<'_, Postgres>,
    row: &Experience,
) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        INSERT INTO experience
            (id, doc_id, title, company_name, city, state, currently_working,
             work_summary, start_date, end_date)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        ON CONFLICT (id) DO UPDATE SET
            title = EXCLUDED.title,
            company_name = EXCLUDED.company_name,
            city = EXCLUDED.city,
            state = EXCLUDED.state,
            currently_working = EXCLUDED.currently_working,
            work_summary = EXCLUDED.work_summary,
            start_date = EXCLUDED.start_date,
            end_date = EXCLUDED.end_date
        WHERE experience.doc_id = EXCLUDED.doc_id
        "#,
    )
    .bind(row.id)
    .bind(row.doc_id)
    .bind(&row.title)
    .bind(&row.company_name)
    .bind(&row.city)
    .bind(&row.state)
    .bind(row.currently_working)
    .bind(&row.work_summary)
    .bind(&row.start_date)
    .bind(&row.end_date)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

async fn upsert_education(
    tx: &mut Transaction<'_, Postgres>,
    row: &Education,
) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        INSERT INTO education
            (id, doc_id, university_name, degree, major, description, start_date, end_date)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (id) DO UPDATE SET
            university_name = EXCLUDED.university_name,
            degree = EXCLUDED.degree,
            major = EXCLUDED.major,
            description = EXCLUDED.description,
            start_date = EXCLUDED.start_date,
            end_date = EXCLUDED.end_date
        WHERE education.doc_id = EXCLUDED.doc_id
        "#,
    )
    .bind(row.id)
    .bind(row.doc_id)
    .bind(&row.university_name)
    .bind(&row.degree)
    .bind(&row.major)
    .bind(&row.description)
    .bind(&row.start_date)
    .bind(&row.end_date)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

async fn upsert_skill(tx: &mut Transaction<'_, Postgres>, row: &Skill) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        INSERT INTO skills (id, doc_id, name, rating)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (id) DO UPDATE SET
            name = EXCLUDED.name,
            rating = EXCLUDED.rating
        WHERE skills.doc_id = EXCLUDED.doc_id
        "#,
    )
    .bind(row.id)
    .bind(row.doc_id)
    .bind(&row.name)
    .bind(row.rating)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
