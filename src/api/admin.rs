//! Admin REST API endpoints for editing documents and artifacts
//!
//! Every handler here takes an [`AdminCapability`] argument. Actix resolves
//! it from the `Authorization: Bearer <token>` header before the handler
//! runs, so an unauthorized request is rejected with 403 without touching
//! the store.

use std::future::{Ready, ready};

use actix_web::{
    FromRequest, HttpRequest, HttpResponse, delete, dev::Payload, get, http::header, patch, post,
    put, web,
};
use utoipa::ToSchema;

use crate::api::document::DocumentDetailResponse;
use crate::api::error::{ApiError, ErrorResponse, parse_id};
use crate::model::{AdminDocumentSummary, ArtifactChanges, DocumentArtifact, DocumentChanges, NewArtifact};
use crate::service::{AdminAuthorizer, AdminCapability, DocumentService};

impl FromRequest for AdminCapability {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(authorizer) = req.app_data::<web::Data<AdminAuthorizer>>() else {
            tracing::error!("AdminAuthorizer missing from app data");
            return ready(Err(ApiError::Internal(
                "admin authorization is not configured".to_string(),
            )));
        };

        let header = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());

        ready(authorizer.authorize_header(header).map_err(|e| {
            tracing::warn!(
                method = %req.method(),
                path = %req.path(),
                reason = %e,
                "Rejected admin request"
            );
            ApiError::from(e)
        }))
    }
}

#[derive(Debug, serde::Serialize, ToSchema)]
pub struct AdminDocumentListResponse {
    pub documents: Vec<AdminDocumentSummary>,
}

/// List documents for the admin overview, most recently updated first
#[utoipa::path(
    get,
    path = "/v1/admin/documents",
    responses(
        (status = 200, description = "Documents retrieved successfully", body = AdminDocumentListResponse),
        (status = 403, description = "Admin capability required", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "admin"
)]
#[get("/v1/admin/documents")]
pub async fn list_admin_documents(
    capability: AdminCapability,
    service: web::Data<DocumentService>,
) -> Result<HttpResponse, ApiError> {
    let documents = service.list_admin_documents(&capability).await?;
    Ok(HttpResponse::Ok().json(AdminDocumentListResponse { documents }))
}

/// Get a document with every stored artifact, unfiltered
#[utoipa::path(
    get,
    path = "/v1/admin/documents/{id}",
    params(
        ("id" = i64, Path, description = "Document ID")
    ),
    responses(
        (status = 200, description = "Document retrieved successfully", body = DocumentDetailResponse),
        (status = 403, description = "Admin capability required", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "admin"
)]
#[get("/v1/admin/documents/{id}")]
pub async fn get_admin_document(
    capability: AdminCapability,
    service: web::Data<DocumentService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path)?;
    let view = service.get_admin_document(&capability, id).await?;
    Ok(HttpResponse::Ok().json(DocumentDetailResponse::from(view)))
}

/// Update any subset of a document's mutable fields
#[utoipa::path(
    patch,
    path = "/v1/admin/documents/{id}",
    params(
        ("id" = i64, Path, description = "Document ID")
    ),
    request_body = DocumentChanges,
    responses(
        (status = 200, description = "Document updated", body = DocumentDetailResponse),
        (status = 400, description = "Invalid field values", body = ErrorResponse),
        (status = 403, description = "Admin capability required", body = ErrorResponse),
        (status = 404, description = "Document not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "admin"
)]
#[patch("/v1/admin/documents/{id}")]
pub async fn update_document(
    capability: AdminCapability,
    service: web::Data<DocumentService>,
    path: web::Path<String>,
    body: web::Json<DocumentChanges>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path)?;
    let view = service
        .update_document(&capability, id, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(DocumentDetailResponse::from(view)))
}

/// Attach a new artifact to a document
#[utoipa::path(
    post,
    path = "/v1/admin/artifacts",
    request_body = NewArtifact,
    responses(
        (status = 201, description = "Artifact created", body = DocumentArtifact),
        (status = 400, description = "Missing title or content", body = ErrorResponse),
        (status = 403, description = "Admin capability required", body = ErrorResponse),
        (status = 404, description = "Owning document not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "admin"
)]
#[post("/v1/admin/artifacts")]
pub async fn create_artifact(
    capability: AdminCapability,
    service: web::Data<DocumentService>,
    body: web::Json<NewArtifact>,
) -> Result<HttpResponse, ApiError> {
    let artifact = service
        .create_artifact(&capability, body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(artifact))
}

/// Replace an artifact's title and content
#[utoipa::path(
    put,
    path = "/v1/admin/artifacts/{id}",
    params(
        ("id" = i64, Path, description = "Artifact ID")
    ),
    request_body = ArtifactChanges,
    responses(
        (status = 200, description = "Artifact updated", body = DocumentArtifact),
        (status = 400, description = "Missing title or content", body = ErrorResponse),
        (status = 403, description = "Admin capability required", body = ErrorResponse),
        (status = 404, description = "Artifact not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "admin"
)]
#[put("/v1/admin/artifacts/{id}")]
pub async fn update_artifact(
    capability: AdminCapability,
    service: web::Data<DocumentService>,
    path: web::Path<String>,
    body: web::Json<ArtifactChanges>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path)?;
    let artifact = service
        .update_artifact(&capability, id, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(artifact))
}

/// Delete an artifact
#[utoipa::path(
    delete,
    path = "/v1/admin/artifacts/{id}",
    params(
        ("id" = i64, Path, description = "Artifact ID")
    ),
    responses(
        (status = 204, description = "Artifact deleted"),
        (status = 403, description = "Admin capability required", body = ErrorResponse),
        (status = 404, description = "Artifact not found", body = ErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "admin"
)]
#[delete("/v1/admin/artifacts/{id}")]
pub async fn delete_artifact(
    capability: AdminCapability,
    service: web::Data<DocumentService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = parse_id(&path)?;
    service.delete_artifact(&capability, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configure admin routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_admin_documents)
        .service(get_admin_document)
        .service(update_document)
        .service(create_artifact)
        .service(update_artifact)
        .service(delete_artifact);
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test};
    use chrono::NaiveDate;

    use super::*;
    use crate::api::test_support::{TEST_JWT_SECRET, TestApp, admin_token};
    use crate::service::auth::issue_token;
    use crate::db::DocumentStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn bearer(token: &str) -> (header::HeaderName, String) {
        (header::AUTHORIZATION, format!("Bearer {}", token))
    }

    #[actix_web::test]
    async fn test_update_document_without_capability_is_forbidden() {
        let ctx = TestApp::new();
        let doc = ctx.store.insert_document("eo", "Original", date(2025, 1, 20)).await;
        let app = test::init_service(App::new().configure(|cfg| ctx.configure(cfg))).await;

        let viewer = issue_token(TEST_JWT_SECRET.as_bytes(), "reader", &["viewer"]);
        let forged = issue_token(b"not-the-server-secret", "mallory", &["admin"]);
        for auth in [
            None,
            Some(bearer("wrong-token")),
            Some(bearer(&viewer)),
            Some(bearer(&forged)),
        ] {
            let mut req = test::TestRequest::patch()
                .uri(&format!("/v1/admin/documents/{}", doc.id))
                .set_json(serde_json::json!({ "title": "Hijacked", "risk_score": null }));
            if let Some(auth) = auth {
                req = req.insert_header(auth);
            }
            let resp = test::call_service(&app, req.to_request()).await;
            assert_eq!(resp.status(), StatusCode::FORBIDDEN);
            let body: serde_json::Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], "forbidden");
        }

        let stored = ctx.store.find_by_id(doc.id).await.unwrap().unwrap();
        assert_eq!(stored, doc);
    }

    #[actix_web::test]
    async fn test_update_document_with_capability() {
        let ctx = TestApp::new();
        let doc = ctx.store.insert_document("eo", "Original", date(2025, 1, 20)).await;
        let app = test::init_service(App::new().configure(|cfg| ctx.configure(cfg))).await;

        let req = test::TestRequest::patch()
            .uri(&format!("/v1/admin/documents/{}", doc.id))
            .insert_header(bearer(&admin_token()))
            .set_json(serde_json::json!({
                "title": "Renamed",
                "risk_score": 12,
                "document_type": "LEGISLATION",
                "date_signed": "2025-02-14"
            }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["title"], "Renamed");
        assert_eq!(body["risk_score"], 12);
        assert_eq!(body["display_risk_score"], 10);
        assert_eq!(body["risk_level"], "severe");
        assert_eq!(body["type_label"], "Legislation");
        assert_eq!(body["date_signed"], "2025-02-14");

        let req = test::TestRequest::patch()
            .uri("/v1/admin/documents/not-a-number")
            .insert_header(bearer(&admin_token()))
            .set_json(serde_json::json!({ "title": "x" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::patch()
            .uri("/v1/admin/documents/9999")
            .insert_header(bearer(&admin_token()))
            .set_json(serde_json::json!({ "title": "x" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_artifact_crud_round_trip() {
        let ctx = TestApp::new();
        let doc = ctx.store.insert_document("eo-crud", "EO", date(2025, 1, 20)).await;
        let app = test::init_service(App::new().configure(|cfg| ctx.configure(cfg))).await;

        let req = test::TestRequest::post()
            .uri("/v1/admin/artifacts")
            .insert_header(bearer(&admin_token()))
            .set_json(serde_json::json!({
                "document_id": doc.id,
                "title": "Letter of Concern",
                "content": "Dear Senator,"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: serde_json::Value = test::read_body_json(resp).await;
        let artifact_id = created["id"].as_i64().unwrap();

        let req = test::TestRequest::put()
            .uri(&format!("/v1/admin/artifacts/{}", artifact_id))
            .insert_header(bearer(&admin_token()))
            .set_json(serde_json::json!({ "title": "ELI5", "content": "Simply put" }))
            .to_request();
        let updated: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated["title"], "ELI5");

        let req = test::TestRequest::get()
            .uri("/v1/documents/slug/eo-crud")
            .to_request();
        let public: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(public["artifacts"][0]["content"], "Simply put");

        let req = test::TestRequest::delete()
            .uri(&format!("/v1/admin/artifacts/{}", artifact_id))
            .insert_header(bearer(&admin_token()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);

        let req = test::TestRequest::delete()
            .uri(&format!("/v1/admin/artifacts/{}", artifact_id))
            .insert_header(bearer(&admin_token()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_artifact_mutations_require_capability() {
        let ctx = TestApp::new();
        let doc = ctx.store.insert_document("eo", "EO", date(2025, 1, 20)).await;
        let existing = ctx
            .store
            .insert_artifact(&NewArtifact {
                document_id: doc.id,
                title: "ELI5".to_string(),
                content: "original".to_string(),
            })
            .await
            .unwrap()
            .unwrap();
        let app = test::init_service(App::new().configure(|cfg| ctx.configure(cfg))).await;

        let requests = vec![
            test::TestRequest::post()
                .uri("/v1/admin/artifacts")
                .set_json(serde_json::json!({
                    "document_id": doc.id, "title": "Key Points", "content": "x"
                }))
                .to_request(),
            test::TestRequest::put()
                .uri(&format!("/v1/admin/artifacts/{}", existing.id))
                .set_json(serde_json::json!({ "title": "ELI5", "content": "changed" }))
                .to_request(),
            test::TestRequest::delete()
                .uri(&format!("/v1/admin/artifacts/{}", existing.id))
                .to_request(),
            test::TestRequest::get().uri("/v1/admin/documents").to_request(),
        ];
        for req in requests {
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        }

        let artifacts = ctx.store.artifacts_for(doc.id).await.unwrap();
        assert_eq!(artifacts, vec![existing]);
    }

    #[actix_web::test]
    async fn test_admin_document_view_includes_unlisted_artifacts() {
        let ctx = TestApp::new();
        let doc = ctx.store.insert_document("eo", "EO", date(2025, 1, 20)).await;
        for title in ["Updates", "ELI5"] {
            ctx.store
                .insert_artifact(&NewArtifact {
                    document_id: doc.id,
                    title: title.to_string(),
                    content: "text".to_string(),
                })
                .await
                .unwrap();
        }
        let app = test::init_service(App::new().configure(|cfg| ctx.configure(cfg))).await;

        let req = test::TestRequest::get()
            .uri(&format!("/v1/admin/documents/{}", doc.id))
            .insert_header(bearer(&admin_token()))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        let titles: Vec<&str> = body["artifacts"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["Updates", "ELI5"]);
    }
}
