//! Admin capability checks
//!
//! Mutating operations on [`crate::service::DocumentService`] take an
//! [`AdminCapability`]. The only way to obtain one is through
//! [`AdminAuthorizer::authorize`], so authorization happens once, before the
//! operation body runs, instead of inside every handler.
//!
//! Admin credentials are HS256 JSON Web Tokens signed with the configured
//! secret and carrying the `admin` role.

use std::fmt;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

/// Role a token must carry to edit documents
pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Admin credentials required")]
    MissingCredentials,

    #[error("Admin credentials rejected")]
    InvalidCredentials,

    #[error("Token does not carry the admin role")]
    NotAdmin,
}

/// Claims expected in an admin token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminClaims {
    pub sub: String,
    #[serde(default)]
    pub roles: Vec<String>,
    pub exp: usize,
}

/// Proof that the caller presented a valid admin token
#[derive(Debug, Clone)]
pub struct AdminCapability {
    subject: String,
}

impl AdminCapability {
    /// `sub` claim of the token that granted this capability
    pub fn subject(&self) -> &str {
        &self.subject
    }
}

/// Verifies admin bearer tokens
#[derive(Clone)]
pub struct AdminAuthorizer {
    key: Option<DecodingKey>,
    validation: Validation,
}

impl fmt::Debug for AdminAuthorizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminAuthorizer")
            .field("configured", &self.key.is_some())
            .finish()
    }
}

impl AdminAuthorizer {
    /// Without a secret every token is rejected
    pub fn new(secret: Option<&[u8]>) -> Self {
        Self {
            key: secret.map(DecodingKey::from_secret),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Grant the capability if `token` is a valid admin token
    pub fn authorize(&self, token: Option<&str>) -> Result<AdminCapability, AuthError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingCredentials)?;

        let key = self.key.as_ref().ok_or(AuthError::InvalidCredentials)?;

        let claims = decode::<AdminClaims>(token, key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Admin token failed verification");
                AuthError::InvalidCredentials
            })?
            .claims;

        if !claims.roles.iter().any(|r| r == ADMIN_ROLE) {
            return Err(AuthError::NotAdmin);
        }

        Ok(AdminCapability {
            subject: claims.sub,
        })
    }

    /// Same as [`authorize`](Self::authorize) for a raw `Authorization` header value
    pub fn authorize_header(&self, header: Option<&str>) -> Result<AdminCapability, AuthError> {
        let token = header.and_then(|h| {
            let (scheme, value) = h.trim().split_once(' ')?;
            scheme.eq_ignore_ascii_case("bearer").then_some(value)
        });
        self.authorize(token)
    }
}

/// Sign a token for tests
#[cfg(test)]
pub(crate) fn issue_token(secret: &[u8], subject: &str, roles: &[&str]) -> String {
    use jsonwebtoken::{EncodingKey, Header, encode};

    let claims = AdminClaims {
        sub: subject.to_string(),
        roles: roles.iter().map(|r| r.to_string()).collect(),
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret))
        .expect("failed to encode test JWT")
}
