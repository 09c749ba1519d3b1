pub mod config;
pub mod document;
pub mod ordering;

pub use config::Config;
pub use document::*;
pub use ordering::ArtifactOrderingPolicy;
