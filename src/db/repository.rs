//! PostgreSQL repository for documents and their artifacts

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use super::models::{ArtifactRow, DocumentLinkRow, DocumentRow};
use super::{DbError, DocumentStore, SEARCH_VECTOR};
use crate::model::{
    ArtifactChanges, Document, DocumentArtifact, DocumentChanges, DocumentLink, NewArtifact,
};

/// Repository for document and artifact operations
#[derive(Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for DocumentRepository {
    async fn list_documents(&self) -> Result<Vec<Document>, DbError> {
        let rows: Vec<DocumentRow> = sqlx::query_as(
            r#"
            SELECT * FROM documents
            ORDER BY date_signed DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(DocumentRow::into_domain).collect())
    }

    async fn list_recently_updated(&self) -> Result<Vec<Document>, DbError> {
        let rows: Vec<DocumentRow> = sqlx::query_as(
            r#"
            SELECT * FROM documents
            ORDER BY updated_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(DocumentRow::into_domain).collect())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Document>, DbError> {
        let row: Option<DocumentRow> = sqlx::query_as(
            r#"
            SELECT * FROM documents WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(DocumentRow::into_domain))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Document>, DbError> {
        let row: Option<DocumentRow> = sqlx::query_as(
            r#"
            SELECT * FROM documents WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(DocumentRow::into_domain))
    }

    async fn artifacts_for(&self, document_id: i64) -> Result<Vec<DocumentArtifact>, DbError> {
        let rows: Vec<ArtifactRow> = sqlx::query_as(
            r#"
            SELECT * FROM document_artifacts
            WHERE document_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(document_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(DocumentArtifact::from).collect())
    }

    async fn nearest_newer(&self, date: NaiveDate) -> Result<Option<DocumentLink>, DbError> {
        let row: Option<DocumentLinkRow> = sqlx::query_as(
            r#"
            SELECT id, slug, title FROM documents
            WHERE date_signed > $1
            ORDER BY date_signed ASC, id ASC
            LIMIT 1
            "#,
        )
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(DocumentLink::from))
    }

    async fn nearest_older(&self, date: NaiveDate) -> Result<Option<DocumentLink>, DbError> {
        let row: Option<DocumentLinkRow> = sqlx::query_as(
            r#"
            SELECT id, slug, title FROM documents
            WHERE date_signed < $1
            ORDER BY date_signed DESC, id ASC
            LIMIT 1
            "#,
        )
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(DocumentLink::from))
    }

    async fn search(&self, query: &str) -> Result<Vec<Document>, DbError> {
        let select_query = format!(
            r#"
            SELECT * FROM documents
            WHERE {vector} @@ websearch_to_tsquery('english', $1)
            ORDER BY ts_rank({vector}, websearch_to_tsquery('english', $1)) DESC,
                     date_signed DESC,
                     id DESC
            "#,
            vector = SEARCH_VECTOR
        );

        let rows: Vec<DocumentRow> = sqlx::query_as(&select_query)
            .bind(query)
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(query = %query, matches = rows.len(), "Full-text search");

        Ok(rows.into_iter().map(DocumentRow::into_domain).collect())
    }

    async fn update_document(
        &self,
        id: i64,
        changes: &DocumentChanges,
    ) -> Result<Option<Document>, DbError> {
        // Nullable columns carry a "was provided" flag so that an explicit
        // null clears the value while an absent field keeps it.
        let row: Option<DocumentRow> = sqlx::query_as(
            r#"
            UPDATE documents SET
                title = COALESCE($2, title),
                risk_score = CASE WHEN $3 THEN $4 ELSE risk_score END,
                short_summary = CASE WHEN $5 THEN $6 ELSE short_summary END,
                date_signed = COALESCE($7, date_signed),
                signer = COALESCE($8, signer),
                original_document_url = CASE WHEN $9 THEN $10 ELSE original_document_url END,
                document_type = COALESCE($11, document_type),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.title.as_deref())
        .bind(changes.risk_score.is_some())
        .bind(changes.risk_score.flatten())
        .bind(changes.short_summary.is_some())
        .bind(changes.short_summary.clone().flatten())
        .bind(changes.date_signed)
        .bind(changes.signer.as_deref())
        .bind(changes.original_document_url.is_some())
        .bind(changes.original_document_url.clone().flatten())
        .bind(changes.document_type.map(|t| t.as_str()))
        .fetch_optional(&self.pool)
        .await?;

        if row.is_some() {
            tracing::debug!(id = %id, "Updated document");
        }

        Ok(row.map(DocumentRow::into_domain))
    }

    async fn insert_artifact(
        &self,
        artifact: &NewArtifact,
    ) -> Result<Option<DocumentArtifact>, DbError> {
        let row: Option<ArtifactRow> = sqlx::query_as(
            r#"
            INSERT INTO document_artifacts (document_id, title, content)
            SELECT id, $2, $3 FROM documents WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(artifact.document_id)
        .bind(&artifact.title)
        .bind(&artifact.content)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(ref row) = row {
            tracing::debug!(id = %row.id, document_id = %row.document_id, "Inserted artifact");
        }

        Ok(row.map(DocumentArtifact::from))
    }

    async fn update_artifact(
        &self,
        id: i64,
        changes: &ArtifactChanges,
    ) -> Result<Option<DocumentArtifact>, DbError> {
        let row: Option<ArtifactRow> = sqlx::query_as(
            r#"
            UPDATE document_artifacts
            SET title = $2, content = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.content)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(DocumentArtifact::from))
    }

    async fn delete_artifact(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query(
            r#"
            DELETE FROM document_artifacts WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::debug!(id = %id, "Deleted artifact");
        }

        Ok(deleted)
    }

    async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
