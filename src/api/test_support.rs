//! Shared fixtures for the HTTP handler tests

use std::sync::Arc;

use actix_web::web;

use crate::app::AppState;
use crate::db::memory::MemoryDocumentStore;
use crate::model::Config;
use crate::service::auth::{ADMIN_ROLE, issue_token};

pub const TEST_JWT_SECRET: &str = "test-jwt-secret";

/// Bearer token carrying the admin role, signed with [`TEST_JWT_SECRET`]
pub fn admin_token() -> String {
    issue_token(TEST_JWT_SECRET.as_bytes(), "test-admin", &[ADMIN_ROLE])
}

/// App wiring backed by an in-memory store
pub struct TestApp {
    pub store: Arc<MemoryDocumentStore>,
    pub config: Config,
}

impl TestApp {
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryDocumentStore::new()),
            config: Config {
                jwt_secret: Some(TEST_JWT_SECRET.to_string()),
                site_url: "https://example.org".to_string(),
                ..Config::default()
            },
        }
    }

    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        AppState::with_store(self.config.clone(), self.store.clone()).configure(cfg);
    }
}
