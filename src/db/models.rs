//! Database rows for documents and artifacts

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

use crate::model::{Document, DocumentArtifact, DocumentLink, DocumentType};

/// Database representation of a document
#[derive(Debug, Clone, FromRow)]
pub struct DocumentRow {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub document_type: String,
    pub signer: String,
    pub date_signed: NaiveDate,
    pub short_summary: Option<String>,
    pub risk_score: Option<i32>,
    pub original_document_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DocumentRow {
    /// Convert database row to domain model
    pub fn into_domain(self) -> Document {
        let document_type = DocumentType::from_db(&self.document_type).unwrap_or_else(|| {
            tracing::warn!(id = self.id, value = %self.document_type, "Unknown document type, using OTHER");
            DocumentType::Other
        });

        Document {
            id: self.id,
            slug: self.slug,
            title: self.title,
            document_type,
            signer: self.signer,
            date_signed: self.date_signed,
            short_summary: self.short_summary,
            risk_score: self.risk_score,
            original_document_url: self.original_document_url,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Database representation of a document artifact
#[derive(Debug, Clone, FromRow)]
pub struct ArtifactRow {
    pub id: i64,
    pub document_id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ArtifactRow> for DocumentArtifact {
    fn from(row: ArtifactRow) -> Self {
        DocumentArtifact {
            id: row.id,
            document_id: row.document_id,
            title: row.title,
            content: row.content,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Projection used by the adjacency queries
#[derive(Debug, Clone, FromRow)]
pub struct DocumentLinkRow {
    pub id: i64,
    pub slug: String,
    pub title: String,
}

impl From<DocumentLinkRow> for DocumentLink {
    fn from(row: DocumentLinkRow) -> Self {
        DocumentLink {
            id: row.id,
            slug: row.slug,
            title: row.title,
        }
    }
}
