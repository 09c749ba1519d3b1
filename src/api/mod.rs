pub mod admin;
pub mod document;
pub mod error;
pub mod health;
pub mod openapi;
pub mod sitemap;

#[cfg(test)]
pub(crate) mod test_support;
