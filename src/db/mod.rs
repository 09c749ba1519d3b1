//! Database module for PostgreSQL persistence

#[cfg(test)]
pub mod memory;
pub mod models;
pub mod repository;
pub mod store;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::env;

pub use store::DocumentStore;

// Environment variable names
const ENV_DATABASE_URL: &str = "DATABASE_URL";
const ENV_POSTGRES_HOST: &str = "EO_DIGEST_POSTGRES_HOST";
const ENV_POSTGRES_PORT: &str = "EO_DIGEST_POSTGRES_PORT";
const ENV_POSTGRES_USER: &str = "EO_DIGEST_POSTGRES_USER";
const ENV_POSTGRES_PASSWORD: &str = "EO_DIGEST_POSTGRES_PASSWORD";
const ENV_POSTGRES_DB: &str = "EO_DIGEST_POSTGRES_DB";
const ENV_POSTGRES_MAX_CONNECTIONS: &str = "EO_DIGEST_POSTGRES_MAX_CONNECTIONS";

// Default values
const DEFAULT_POSTGRES_HOST: &str = "127.0.0.1";
const DEFAULT_POSTGRES_PORT: &str = "5432";
const DEFAULT_POSTGRES_USER: &str = "eo_digest";
const DEFAULT_POSTGRES_PASSWORD: &str = "eo_digest";
const DEFAULT_POSTGRES_DB: &str = "eo_digest";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Text the full-text index and search queries are built over.
///
/// The index expression and the query expression must stay identical or
/// Postgres will not use the index.
pub(crate) const SEARCH_VECTOR: &str = "to_tsvector('english', title || ' ' || coalesce(short_summary, '') || ' ' || signer)";

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),
}

/// Create a new database connection pool
///
/// `DATABASE_URL` wins over the individual `EO_DIGEST_POSTGRES_*` variables.
pub async fn create_pool() -> Result<PgPool, DbError> {
    let max_connections = env::var(ENV_POSTGRES_MAX_CONNECTIONS)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_MAX_CONNECTIONS);

    let database_url = match env::var(ENV_DATABASE_URL) {
        Ok(url) => {
            tracing::debug!("Connecting to PostgreSQL using {}", ENV_DATABASE_URL);
            url
        }
        Err(_) => {
            let host =
                env::var(ENV_POSTGRES_HOST).unwrap_or_else(|_| DEFAULT_POSTGRES_HOST.to_string());
            let port =
                env::var(ENV_POSTGRES_PORT).unwrap_or_else(|_| DEFAULT_POSTGRES_PORT.to_string());
            let user =
                env::var(ENV_POSTGRES_USER).unwrap_or_else(|_| DEFAULT_POSTGRES_USER.to_string());
            let password = env::var(ENV_POSTGRES_PASSWORD)
                .unwrap_or_else(|_| DEFAULT_POSTGRES_PASSWORD.to_string());
            let database =
                env::var(ENV_POSTGRES_DB).unwrap_or_else(|_| DEFAULT_POSTGRES_DB.to_string());

            tracing::debug!(host = %host, port = %port, database = %database, "Connecting to PostgreSQL");

            format!(
                "postgres://{}:{}@{}:{}/{}",
                user, password, host, port, database
            )
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&database_url)
        .await?;

    tracing::info!(max_connections, "PostgreSQL connection established");

    Ok(pool)
}

/// Initialize database schema
pub async fn init_schema(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS documents (
            id BIGSERIAL PRIMARY KEY,
            slug TEXT NOT NULL UNIQUE,
            title TEXT NOT NULL,
            document_type VARCHAR(32) NOT NULL DEFAULT 'EXECUTIVE_ORDER',
            signer TEXT NOT NULL,
            date_signed DATE NOT NULL,
            short_summary TEXT,
            risk_score INTEGER,
            original_document_url TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS document_artifacts (
            id BIGSERIAL PRIMARY KEY,
            document_id BIGINT NOT NULL REFERENCES documents(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes separately
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_documents_date_signed ON documents(date_signed)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_document_artifacts_document_id ON document_artifacts(document_id)",
    )
    .execute(pool)
    .await?;

    sqlx::query(&format!(
        "CREATE INDEX IF NOT EXISTS idx_documents_search ON documents USING GIN ({})",
        SEARCH_VECTOR
    ))
    .execute(pool)
    .await?;

    tracing::info!("Database schema initialized");

    Ok(())
}
