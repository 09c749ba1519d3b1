//! In-memory `DocumentStore` used by the service and HTTP tests

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;

use super::{DbError, DocumentStore};
use crate::model::{
    ArtifactChanges, Document, DocumentArtifact, DocumentChanges, DocumentLink, DocumentType,
    NewArtifact,
};

#[derive(Default)]
struct State {
    documents: Vec<Document>,
    artifacts: Vec<DocumentArtifact>,
    next_document_id: i64,
    next_artifact_id: i64,
}

#[derive(Default)]
pub struct MemoryDocumentStore {
    state: RwLock<State>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document the way the ingestion process would
    pub async fn insert_document(&self, slug: &str, title: &str, date_signed: NaiveDate) -> Document {
        let mut state = self.state.write().await;
        state.next_document_id += 1;
        let now = Utc::now();
        let doc = Document {
            id: state.next_document_id,
            slug: slug.to_string(),
            title: title.to_string(),
            document_type: DocumentType::ExecutiveOrder,
            signer: "Donald J. Trump".to_string(),
            date_signed,
            short_summary: None,
            risk_score: None,
            original_document_url: None,
            created_at: now,
            updated_at: now,
        };
        state.documents.push(doc.clone());
        doc
    }

    /// Direct artifact lookup, bypassing any ordering policy
    pub async fn artifact(&self, id: i64) -> Option<DocumentArtifact> {
        let state = self.state.read().await;
        state.artifacts.iter().find(|a| a.id == id).cloned()
    }
}

fn sorted_by_date_desc(mut documents: Vec<Document>) -> Vec<Document> {
    documents.sort_by(|a, b| b.date_signed.cmp(&a.date_signed).then(b.id.cmp(&a.id)));
    documents
}

fn matches_terms(doc: &Document, terms: &[String]) -> bool {
    let haystack = format!(
        "{} {} {}",
        doc.title,
        doc.short_summary.as_deref().unwrap_or_default(),
        doc.signer
    )
    .to_lowercase();
    terms.iter().all(|t| haystack.contains(t.as_str()))
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn list_documents(&self) -> Result<Vec<Document>, DbError> {
        let state = self.state.read().await;
        Ok(sorted_by_date_desc(state.documents.clone()))
    }

    async fn list_recently_updated(&self) -> Result<Vec<Document>, DbError> {
        let state = self.state.read().await;
        let mut documents = state.documents.clone();
        documents.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        Ok(documents)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Document>, DbError> {
        let state = self.state.read().await;
        Ok(state.documents.iter().find(|d| d.slug == slug).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Document>, DbError> {
        let state = self.state.read().await;
        Ok(state.documents.iter().find(|d| d.id == id).cloned())
    }

    async fn artifacts_for(&self, document_id: i64) -> Result<Vec<DocumentArtifact>, DbError> {
        let state = self.state.read().await;
        let mut artifacts: Vec<DocumentArtifact> = state
            .artifacts
            .iter()
            .filter(|a| a.document_id == document_id)
            .cloned()
            .collect();
        artifacts.sort_by_key(|a| a.id);
        Ok(artifacts)
    }

    async fn nearest_newer(&self, date: NaiveDate) -> Result<Option<DocumentLink>, DbError> {
        let state = self.state.read().await;
        Ok(state
            .documents
            .iter()
            .filter(|d| d.date_signed > date)
            .min_by(|a, b| a.date_signed.cmp(&b.date_signed).then(a.id.cmp(&b.id)))
            .map(Document::link))
    }

    async fn nearest_older(&self, date: NaiveDate) -> Result<Option<DocumentLink>, DbError> {
        let state = self.state.read().await;
        Ok(state
            .documents
            .iter()
            .filter(|d| d.date_signed < date)
            .min_by(|a, b| b.date_signed.cmp(&a.date_signed).then(a.id.cmp(&b.id)))
            .map(Document::link))
    }

    async fn search(&self, query: &str) -> Result<Vec<Document>, DbError> {
        // Approximates websearch_to_tsquery: every term must appear, an
        // empty query matches nothing.
        let terms: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
        if terms.is_empty() {
            return Ok(Vec::new());
        }
        let state = self.state.read().await;
        let matched = state
            .documents
            .iter()
            .filter(|d| matches_terms(d, &terms))
            .cloned()
            .collect();
        Ok(sorted_by_date_desc(matched))
    }

    async fn update_document(
        &self,
        id: i64,
        changes: &DocumentChanges,
    ) -> Result<Option<Document>, DbError> {
        let mut state = self.state.write().await;
        let Some(doc) = state.documents.iter_mut().find(|d| d.id == id) else {
            return Ok(None);
        };
        if let Some(title) = &changes.title {
            doc.title = title.clone();
        }
        if let Some(risk_score) = changes.risk_score {
            doc.risk_score = risk_score;
        }
        if let Some(short_summary) = &changes.short_summary {
            doc.short_summary = short_summary.clone();
        }
        if let Some(date_signed) = changes.date_signed {
            doc.date_signed = date_signed;
        }
        if let Some(signer) = &changes.signer {
            doc.signer = signer.clone();
        }
        if let Some(url) = &changes.original_document_url {
            doc.original_document_url = url.clone();
        }
        if let Some(document_type) = changes.document_type {
            doc.document_type = document_type;
        }
        doc.updated_at = Utc::now();
        Ok(Some(doc.clone()))
    }

    async fn insert_artifact(
        &self,
        artifact: &NewArtifact,
    ) -> Result<Option<DocumentArtifact>, DbError> {
        let mut state = self.state.write().await;
        if !state.documents.iter().any(|d| d.id == artifact.document_id) {
            return Ok(None);
        }
        state.next_artifact_id += 1;
        let now = Utc::now();
        let created = DocumentArtifact {
            id: state.next_artifact_id,
            document_id: artifact.document_id,
            title: artifact.title.clone(),
            content: artifact.content.clone(),
            created_at: now,
            updated_at: now,
        };
        state.artifacts.push(created.clone());
        Ok(Some(created))
    }

    async fn update_artifact(
        &self,
        id: i64,
        changes: &ArtifactChanges,
    ) -> Result<Option<DocumentArtifact>, DbError> {
        let mut state = self.state.write().await;
        let Some(artifact) = state.artifacts.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        artifact.title = changes.title.clone();
        artifact.content = changes.content.clone();
        artifact.updated_at = Utc::now();
        Ok(Some(artifact.clone()))
    }

    async fn delete_artifact(&self, id: i64) -> Result<bool, DbError> {
        let mut state = self.state.write().await;
        let before = state.artifacts.len();
        state.artifacts.retain(|a| a.id != id);
        Ok(state.artifacts.len() < before)
    }

    async fn ping(&self) -> Result<(), DbError> {
        Ok(())
    }
}
