pub mod auth;
pub mod document;
pub mod sitemap;

pub use auth::{AdminAuthorizer, AdminCapability, AuthError};
pub use document::{DocumentService, DocumentServiceError};
