//! Storage seam for documents and artifacts

use async_trait::async_trait;
use chrono::NaiveDate;

use super::DbError;
use crate::model::{
    ArtifactChanges, Document, DocumentArtifact, DocumentChanges, DocumentLink, NewArtifact,
};

/// Persistence operations the document service depends on.
///
/// Lookups return `Ok(None)` / `Ok(false)` for missing rows; turning that
/// into a not-found failure is the caller's decision.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents, newest `date_signed` first, then id descending
    async fn list_documents(&self) -> Result<Vec<Document>, DbError>;

    /// All documents, most recently updated first, then id descending
    async fn list_recently_updated(&self) -> Result<Vec<Document>, DbError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Document>, DbError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Document>, DbError>;

    /// Artifacts of a document in store order (id ascending)
    async fn artifacts_for(&self, document_id: i64) -> Result<Vec<DocumentArtifact>, DbError>;

    /// Nearest document signed strictly after `date`, lowest id on ties
    async fn nearest_newer(&self, date: NaiveDate) -> Result<Option<DocumentLink>, DbError>;

    /// Nearest document signed strictly before `date`, lowest id on ties
    async fn nearest_older(&self, date: NaiveDate) -> Result<Option<DocumentLink>, DbError>;

    /// Full-text search; the query is passed through as given
    async fn search(&self, query: &str) -> Result<Vec<Document>, DbError>;

    /// Apply a partial update, returning the new row or `None` if `id` is unknown
    async fn update_document(
        &self,
        id: i64,
        changes: &DocumentChanges,
    ) -> Result<Option<Document>, DbError>;

    /// Insert an artifact, returning `None` if the owning document does not exist
    async fn insert_artifact(
        &self,
        artifact: &NewArtifact,
    ) -> Result<Option<DocumentArtifact>, DbError>;

    async fn update_artifact(
        &self,
        id: i64,
        changes: &ArtifactChanges,
    ) -> Result<Option<DocumentArtifact>, DbError>;

    /// Returns true if the artifact was deleted, false if it didn't exist
    async fn delete_artifact(&self, id: i64) -> Result<bool, DbError>;

    /// Cheap connectivity check used by the readiness probe
    async fn ping(&self) -> Result<(), DbError>;
}
