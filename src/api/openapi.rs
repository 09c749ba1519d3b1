//! OpenAPI specification endpoints

use actix_web::{HttpResponse, Responder, get};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::{admin, document, error, health, sitemap};
use crate::model;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "eo-digest",
        description = "Executive orders, legislation and their analysis sections"
    ),
    paths(
        document::list_documents,
        document::search_documents,
        document::get_document_by_slug,
        document::get_artifact_by_title,
        document::get_adjacent_documents,
        admin::list_admin_documents,
        admin::get_admin_document,
        admin::update_document,
        admin::create_artifact,
        admin::update_artifact,
        admin::delete_artifact,
        sitemap::sitemap,
        health::liveness,
        health::readiness,
    ),
    components(schemas(
        model::Document,
        model::DocumentType,
        model::DocumentArtifact,
        model::DocumentLink,
        model::AdjacentDocuments,
        model::AdminDocumentSummary,
        model::DocumentChanges,
        model::NewArtifact,
        model::ArtifactChanges,
        model::RiskLevel,
        document::DocumentResponse,
        document::DocumentDetailResponse,
        document::DocumentListResponse,
        admin::AdminDocumentListResponse,
        error::ErrorResponse,
        health::HealthStatus,
        health::ReadinessStatus,
        health::DependencyHealth,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "documents", description = "Public document reads"),
        (name = "admin", description = "Document and artifact editing, requires an admin bearer token"),
        (name = "site", description = "Site support files"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

/// Serve OpenAPI JSON specification
#[get("/openapi.json")]
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Serve OpenAPI YAML specification
#[get("/openapi.yaml")]
pub async fn openapi_yaml() -> Result<HttpResponse, error::ApiError> {
    let yaml = ApiDoc::openapi()
        .to_yaml()
        .map_err(|e| error::ApiError::Internal(format!("failed to render OpenAPI YAML: {}", e)))?;

    Ok(HttpResponse::Ok().content_type("text/yaml").body(yaml))
}

/// Configure OpenAPI routes
pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.service(openapi_json).service(openapi_yaml);
}
