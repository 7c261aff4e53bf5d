use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// One statement per entry; executed in order on startup.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS documents (
        id               BIGINT PRIMARY KEY,
        document_id      TEXT NOT NULL UNIQUE,
        user_id          TEXT NOT NULL,
        title            TEXT NOT NULL,
        summary          TEXT,
        thumbnail        TEXT,
        theme_color      TEXT NOT NULL,
        status           TEXT NOT NULL,
        current_position INTEGER NOT NULL,
        author_name      TEXT NOT NULL,
        author_email     TEXT NOT NULL,
        created_at       TIMESTAMPTZ NOT NULL,
        updated_at       TIMESTAMPTZ NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS documents_user_id_idx ON documents (user_id)",
    r#"
    CREATE TABLE IF NOT EXISTS personal_info (
        id         BIGINT PRIMARY KEY,
        doc_id     BIGINT NOT NULL,
        first_name TEXT,
        last_name  TEXT,
        job_title  TEXT,
        address    TEXT,
        phone      TEXT,
        email      TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS experience (
        id                BIGINT PRIMARY KEY,
        doc_id            BIGINT NOT NULL,
        title             TEXT,
        company_name      TEXT,
        city              TEXT,
        state             TEXT,
        currently_working BOOLEAN NOT NULL,
        work_summary      TEXT,
        start_date        TEXT,
        end_date          TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS education (
        id              BIGINT PRIMARY KEY,
        doc_id          BIGINT NOT NULL,
        university_name TEXT,
        degree          TEXT,
        major           TEXT,
        description     TEXT,
        start_date      TEXT,
        end_date        TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS skills (
        id     BIGINT PRIMARY KEY,
        doc_id BIGINT NOT NULL,
        name   TEXT,
        rating INTEGER NOT NULL
    )
    "#,
];

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates the document tables if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Document schema ready ({} statements)", SCHEMA.len());
    Ok(())
}
