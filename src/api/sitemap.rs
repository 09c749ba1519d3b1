//! Sitemap endpoint

use actix_web::{HttpResponse, get, web};
use chrono::Utc;

use crate::api::error::ApiError;
use crate::model::Config;
use crate::service::DocumentService;
use crate::service::sitemap::render_sitemap;

/// XML sitemap of the static pages and every document summary page
#[utoipa::path(
    get,
    path = "/sitemap.xml",
    responses(
        (status = 200, description = "Sitemap", content_type = "application/xml", body = String),
        (status = 500, description = "Internal server error")
    ),
    tag = "site"
)]
#[get("/sitemap.xml")]
pub async fn sitemap(
    service: web::Data<DocumentService>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    let documents = service.list_documents().await?;
    let xml = render_sitemap(&config.site_url, &documents, Utc::now())
        .map_err(|e| ApiError::Internal(format!("failed to render sitemap: {}", e)))?;

    Ok(HttpResponse::Ok()
        .content_type("application/xml; charset=utf-8")
        .body(xml))
}

/// Configure sitemap route
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(sitemap);
}
