//! Health check endpoints for Kubernetes liveness and readiness probes

use actix_web::{HttpResponse, Responder, get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::Config;
use crate::service::DocumentService;

#[derive(Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
}

#[derive(Serialize, ToSchema)]
pub struct ReadinessStatus {
    pub status: String,
    pub version: String,
    /// Version of the artifact ordering policy in effect
    pub artifact_order_version: u32,
    pub dependencies: DependencyHealth,
}

#[derive(Serialize, ToSchema)]
pub struct DependencyHealth {
    pub database: String,
}

/// Liveness probe endpoint
///
/// Always returns 200 OK if the service is running.
/// Used by Kubernetes to determine if the pod should be restarted.
#[utoipa::path(
    get,
    path = "/health/live",
    responses(
        (status = 200, description = "Service is alive", body = HealthStatus)
    ),
    tag = "health"
)]
#[get("/health/live")]
pub async fn liveness() -> impl Responder {
    HttpResponse::Ok().json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness probe endpoint
///
/// Returns 200 OK if the document store answers, 503 otherwise.
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Service is ready", body = ReadinessStatus),
        (status = 503, description = "Service is not ready", body = ReadinessStatus)
    ),
    tag = "health"
)]
#[get("/health/ready")]
pub async fn readiness(
    service: web::Data<DocumentService>,
    config: web::Data<Config>,
) -> impl Responder {
    let db_status = match service.ping().await {
        Ok(()) => {
            tracing::debug!("Database health check passed");
            "healthy"
        }
        Err(e) => {
            tracing::error!(error = %e, "Database health check failed");
            "unhealthy"
        }
    };

    let ready = db_status == "healthy";

    let status = ReadinessStatus {
        status: if ready { "ready" } else { "not_ready" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        artifact_order_version: config.artifact_order.version,
        dependencies: DependencyHealth {
            database: db_status.to_string(),
        },
    };

    if ready {
        HttpResponse::Ok().json(status)
    } else {
        HttpResponse::ServiceUnavailable().json(status)
    }
}

/// Configure health check routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(liveness).service(readiness);
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test};

    use crate::api::test_support::TestApp;

    #[actix_web::test]
    async fn test_probes() {
        let ctx = TestApp::new();
        let app = test::init_service(App::new().configure(|cfg| ctx.configure(cfg))).await;

        let req = test::TestRequest::get().uri("/health/live").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");

        let req = test::TestRequest::get().uri("/health/ready").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ready");
        assert_eq!(body["dependencies"]["database"], "healthy");
        assert_eq!(body["artifact_order_version"], 1);
    }
}
