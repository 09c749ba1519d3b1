//! Document query service: public reads and admin mutations

use std::sync::Arc;

use url::Url;

use crate::db::{DbError, DocumentStore};
use crate::model::{
    AdjacentDocuments, AdminDocumentSummary, ArtifactChanges, ArtifactOrderingPolicy, Document,
    DocumentArtifact, DocumentChanges, DocumentWithArtifacts, NewArtifact,
};
use crate::service::auth::AdminCapability;

const MAX_SLUG_LEN: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum DocumentServiceError {
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Artifact not found: {0}")]
    ArtifactNotFound(String),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    DbError(#[from] DbError),
}

/// Service for reading and editing documents and their artifacts
pub struct DocumentService {
    store: Arc<dyn DocumentStore>,
}

impl DocumentService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// All documents, newest first
    pub async fn list_documents(&self) -> Result<Vec<Document>, DocumentServiceError> {
        Ok(self.store.list_documents().await?)
    }

    /// Public view of a document: artifacts arranged by `policy`
    pub async fn get_document_by_slug(
        &self,
        slug: &str,
        policy: &ArtifactOrderingPolicy,
    ) -> Result<DocumentWithArtifacts, DocumentServiceError> {
        let document = self.find_by_slug(slug).await?;

        let artifacts = self.store.artifacts_for(document.id).await?;
        let stored = artifacts.len();
        let artifacts = policy.apply(artifacts);

        tracing::debug!(
            slug = %slug,
            policy_version = policy.version,
            stored,
            shown = artifacts.len(),
            "Resolved document artifacts"
        );

        Ok(DocumentWithArtifacts {
            document,
            artifacts,
        })
    }

    /// A single artifact of a document by exact title, regardless of policy.
    ///
    /// Used for sections the site renders on their own, such as "Updates".
    /// The first artifact in store order wins when titles repeat.
    pub async fn get_artifact_by_title(
        &self,
        slug: &str,
        title: &str,
    ) -> Result<DocumentArtifact, DocumentServiceError> {
        let document = self.find_by_slug(slug).await?;

        self.store
            .artifacts_for(document.id)
            .await?
            .into_iter()
            .find(|a| a.title == title)
            .ok_or_else(|| DocumentServiceError::ArtifactNotFound(format!("{}/{}", slug, title)))
    }

    /// Nearest newer (`previous`) and older (`next`) documents by signing date
    pub async fn get_adjacent_documents(
        &self,
        current_id: i64,
    ) -> Result<AdjacentDocuments, DocumentServiceError> {
        let current = self
            .store
            .find_by_id(current_id)
            .await?
            .ok_or_else(|| DocumentServiceError::DocumentNotFound(current_id.to_string()))?;

        let previous = self.store.nearest_newer(current.date_signed).await?;
        let next = self.store.nearest_older(current.date_signed).await?;

        Ok(AdjacentDocuments { previous, next })
    }

    /// Full-text search, query passed through to the store untouched
    pub async fn search_documents(
        &self,
        query: &str,
    ) -> Result<Vec<Document>, DocumentServiceError> {
        Ok(self.store.search(query).await?)
    }

    /// Admin overview, most recently edited first
    pub async fn list_admin_documents(
        &self,
        _capability: &AdminCapability,
    ) -> Result<Vec<AdminDocumentSummary>, DocumentServiceError> {
        let documents = self.store.list_recently_updated().await?;
        Ok(documents.into_iter().map(AdminDocumentSummary::from).collect())
    }

    /// Admin view of a document: every artifact, in store order
    pub async fn get_admin_document(
        &self,
        _capability: &AdminCapability,
        id: i64,
    ) -> Result<DocumentWithArtifacts, DocumentServiceError> {
        let document = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| DocumentServiceError::DocumentNotFound(id.to_string()))?;
        let artifacts = self.store.artifacts_for(id).await?;

        Ok(DocumentWithArtifacts {
            document,
            artifacts,
        })
    }

    pub async fn update_document(
        &self,
        capability: &AdminCapability,
        id: i64,
        changes: DocumentChanges,
    ) -> Result<DocumentWithArtifacts, DocumentServiceError> {
        let changes = normalize_changes(changes)?;

        if changes.is_empty() {
            return self.get_admin_document(capability, id).await;
        }

        let document = self
            .store
            .update_document(id, &changes)
            .await?
            .ok_or_else(|| DocumentServiceError::DocumentNotFound(id.to_string()))?;
        let artifacts = self.store.artifacts_for(id).await?;

        tracing::info!(
            id = %id,
            slug = %document.slug,
            actor = %capability.subject(),
            "Document updated"
        );

        Ok(DocumentWithArtifacts {
            document,
            artifacts,
        })
    }

    pub async fn create_artifact(
        &self,
        capability: &AdminCapability,
        artifact: NewArtifact,
    ) -> Result<DocumentArtifact, DocumentServiceError> {
        let artifact = NewArtifact {
            title: required("title", artifact.title)?,
            content: required("content", artifact.content)?,
            document_id: artifact.document_id,
        };

        let created = self.store.insert_artifact(&artifact).await?.ok_or_else(|| {
            DocumentServiceError::DocumentNotFound(artifact.document_id.to_string())
        })?;

        tracing::info!(
            id = %created.id,
            document_id = %created.document_id,
            title = %created.title,
            actor = %capability.subject(),
            "Artifact created"
        );

        Ok(created)
    }

    pub async fn update_artifact(
        &self,
        capability: &AdminCapability,
        id: i64,
        changes: ArtifactChanges,
    ) -> Result<DocumentArtifact, DocumentServiceError> {
        let changes = ArtifactChanges {
            title: required("title", changes.title)?,
            content: required("content", changes.content)?,
        };

        let updated = self
            .store
            .update_artifact(id, &changes)
            .await?
            .ok_or_else(|| DocumentServiceError::ArtifactNotFound(id.to_string()))?;

        tracing::info!(
            id = %id,
            title = %updated.title,
            actor = %capability.subject(),
            "Artifact updated"
        );

        Ok(updated)
    }

    pub async fn delete_artifact(
        &self,
        capability: &AdminCapability,
        id: i64,
    ) -> Result<(), DocumentServiceError> {
        if !self.store.delete_artifact(id).await? {
            return Err(DocumentServiceError::ArtifactNotFound(id.to_string()));
        }

        tracing::info!(id = %id, actor = %capability.subject(), "Artifact deleted");
        Ok(())
    }

    /// Store connectivity, for the readiness probe
    pub async fn ping(&self) -> Result<(), DocumentServiceError> {
        Ok(self.store.ping().await?)
    }

    /// Any non-empty slug of bounded length is looked up as given
    async fn find_by_slug(&self, slug: &str) -> Result<Document, DocumentServiceError> {
        if slug.is_empty() || slug.len() > MAX_SLUG_LEN {
            return Err(DocumentServiceError::Validation(format!(
                "slug must be 1 to {} bytes long",
                MAX_SLUG_LEN
            )));
        }

        self.store
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DocumentServiceError::DocumentNotFound(slug.to_string()))
    }
}

/// Trimmed, non-empty text or a validation error naming `field`
fn required(field: &str, value: String) -> Result<String, DocumentServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DocumentServiceError::Validation(format!(
            "{} must not be empty",
            field
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim text fields and reject values the site cannot render.
///
/// An empty short summary or source URL is treated as a request to clear it,
/// which is what the admin form sends for a blanked-out input.
fn normalize_changes(changes: DocumentChanges) -> Result<DocumentChanges, DocumentServiceError> {
    let title = changes.title.map(|t| required("title", t)).transpose()?;
    let signer = changes.signer.map(|s| required("signer", s)).transpose()?;

    let short_summary = changes.short_summary.map(|summary| {
        summary
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    });

    let original_document_url = match changes.original_document_url {
        Some(Some(raw)) if !raw.trim().is_empty() => {
            let raw = raw.trim();
            let url = Url::parse(raw).map_err(|e| {
                DocumentServiceError::Validation(format!("invalid original_document_url: {}", e))
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(DocumentServiceError::Validation(
                    "original_document_url must be http or https".to_string(),
                ));
            }
            // Stored as entered; the parse only validates
            Some(Some(raw.to_string()))
        }
        Some(_) => Some(None),
        None => None,
    };

    Ok(DocumentChanges {
        title,
        risk_score: changes.risk_score,
        short_summary,
        date_signed: changes.date_signed,
        signer,
        original_document_url,
        document_type: changes.document_type,
    })
}
