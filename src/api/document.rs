//! Public REST API endpoints for documents

use actix_web::{HttpResponse, get, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::api::error::{ApiError, ErrorResponse, parse_id};
use crate::model::{
    AdjacentDocuments, Config, Document, DocumentArtifact, DocumentWithArtifacts, RiskLevel,
};
use crate::service::DocumentService;

/// Document with the presentation fields the site renders next to it
#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentResponse {
    #[serde(flatten)]
    pub document: Document,
    /// Display label for `document_type`
    pub type_label: String,
    /// Risk score clamped to 0..=10
    pub display_risk_score: Option<i32>,
    pub risk_level: Option<RiskLevel>,
}

impl From<Document> for DocumentResponse {
    fn from(document: Document) -> Self {
        Self {
            type_label: document.document_type.label().to_string(),
            display_risk_score: document.display_risk_score(),
            risk_level: document.risk_level(),
            document,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentDetailResponse {
    #[serde(flatten)]
    pub document: DocumentResponse,
    pub artifacts: Vec<DocumentArtifact>,
}

impl From<DocumentWithArtifacts> for DocumentDetailResponse {
    fn from(view: DocumentWithArtifacts) -> Self {
        Self {
            document: view.document.into(),
            artifacts: view.artifacts,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DocumentListResponse {
    pub documents: Vec<DocumentResponse>,
    pub total_count: usize,
}

impl From<Vec<Document>> for DocumentListResponse {
    fn from(documents: Vec<Document>) -> Self {
        Self {
            total_count: documents.len(),
            documents: documents.into_iter().map(DocumentResponse::from).collect(),
        }
    }
}

/// Query parameters for full-text search
#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Free-text query, passed to the database's text search as given
    #[serde(default)]
    pub q: String,
}

/// List all documents, newest signing date first
#[utoipa::path(
    get,
    path = "/v1/documents",
    responses(
        (status = 200, description = "Documents retrieved successfully", body = DocumentListResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "documents"
)]
#[get("/v1/documents")]
pub async fn list_documents(
    service: web::Data<DocumentService>,
) -> Result<HttpResponse, ApiError> {
    let documents = service.list_documents().await?;
    Ok(HttpResponse::Ok().json(DocumentListResponse::from(documents)))
}

/// Full-text search over title, summary and signer
#[utoipa::path(
    get,
    path = "/v1/documents/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching documents", body = DocumentListResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "documents"
)]
#[get("/v1/documents/search")]
pub async fn search_documents(
    service: web::Data<DocumentService>,
    query: web::Query<SearchParams>,
) -> Result<HttpResponse, ApiError> {
    let documents = service.search_documents(&query.q).await?;
    Ok(HttpResponse::Ok().json(DocumentListResponse::from(documents)))
}

/// Get a document by slug with its analysis sections in display order
#[utoipa::path(
    get,
    path = "/v1/documents/slug/{slug}",
    params(
        ("slug" = String, Path, description = "Document slug")
    ),
    responses(
        (status = 200, description = "Document retrieved successfully", body = DocumentDetailResponse),
        (status = 400, description = "Malformed slug", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "documents"
)]
#[get("/v1/documents/slug/{slug}")]
pub async fn get_document_by_slug(
    service: web::Data<DocumentService>,
    config: web::Data<Config>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let slug = path.into_inner();
    let view = service
        .get_document_by_slug(&slug, &config.artifact_order)
        .await?;
    Ok(HttpResponse::Ok().json(DocumentDetailResponse::from(view)))
}

/// A single artifact of a document by exact title, outside the ordering policy
#[utoipa::path(
    get,
    path = "/v1/documents/slug/{slug}/artifacts/{title}",
    params(
        ("slug" = String, Path, description = "Document slug"),
        ("title" = String, Path, description = "Exact, case-sensitive artifact title, e.g. `Updates`")
    ),
    responses(
        (status = 200, description = "Artifact retrieved successfully", body = DocumentArtifact),
        (status = 400, description = "Malformed slug", body = ErrorResponse),
        (status = 404, description = "Document or artifact not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "documents"
)]
#[get("/v1/documents/slug/{slug}/artifacts/{title}")]
pub async fn get_artifact_by_title(
    service: web::Data<DocumentService>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, ApiError> {
    let (slug, title) = path.into_inner();
    let artifact = service.get_artifact_by_title(&slug, &title).await?;
    Ok(HttpResponse::Ok().json(artifact))
}

/// Nearest newer (`previous`) and older (`next`) documents
#[utoipa::path(
    get,
    path = "/v1/documents/{id}/adjacent",
    params(
        ("id" = i64, Path, description = "Document ID")
    ),
    responses(
        (status = 200, description = "Adjacent documents", body = AdjacentDocuments),
        (status = 400, description = "Non-numeric id", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "documents"
)]
#[get("/v1/documents/{id}/adjacent")]
pub async fn get_adjacent_documents(
    service: web::Data<DocumentService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path)?;
    let adjacent = service.get_adjacent_documents(id).await?;
    Ok(HttpResponse::Ok().json(adjacent))
}

/// Configure public document routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_documents)
        .service(search_documents)
        .service(get_document_by_slug)
        .service(get_artifact_by_title)
        .service(get_adjacent_documents);
}
