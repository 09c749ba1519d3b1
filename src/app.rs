//! Application state and service initialization
//!
//! This module centralizes service initialization and dependency injection,
//! so the server and the handler tests wire routes the same way.

use std::sync::Arc;

use actix_web::web;

use crate::api;
use crate::db::DocumentStore;
use crate::db::repository::DocumentRepository;
use crate::model::Config;
use crate::service::{AdminAuthorizer, DocumentService};

/// Application state shared by every worker
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Document retrieval and editing service
    pub document_service: Arc<DocumentService>,
    /// Issues admin capabilities to the admin handlers
    pub authorizer: AdminAuthorizer,
}

impl AppState {
    /// Connect to PostgreSQL, make sure the schema exists and build the services
    pub async fn new(config: Config) -> Result<Self, AppError> {
        let db_pool = crate::db::create_pool()
            .await
            .map_err(|e| AppError::DatabaseInit(e.to_string()))?;

        crate::db::init_schema(&db_pool)
            .await
            .map_err(|e| AppError::DatabaseInit(e.to_string()))?;

        let store: Arc<dyn DocumentStore> = Arc::new(DocumentRepository::new(db_pool));
        Ok(Self::with_store(config, store))
    }

    /// Build state around an existing store
    pub fn with_store(config: Config, store: Arc<dyn DocumentStore>) -> Self {
        let authorizer = AdminAuthorizer::new(config.jwt_secret.as_deref().map(str::as_bytes));
        Self {
            document_service: Arc::new(DocumentService::new(store)),
            authorizer,
            config,
        }
    }

    /// Register shared data and all routes
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::from(Arc::clone(&self.document_service)))
            .app_data(web::Data::new(self.authorizer.clone()))
            .app_data(web::Data::new(self.config.clone()))
            .configure(api::document::configure)
            .configure(api::admin::configure)
            .configure(api::sitemap::configure)
            .configure(api::health::configure)
            .configure(api::openapi::configure);
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    /// Database initialization failed
    #[error("Database initialization failed: {0}")]
    DatabaseInit(String),
}
