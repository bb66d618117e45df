use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};

/// Opaque bearer token issued by the auth collaborator at sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionToken(pub String);

/// External identity reference assigned by the auth collaborator at sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthId(pub String);

/// A live authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: SessionToken,
    pub auth_id: AuthId,
}

/// Identity created by a successful sign-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub auth_id: AuthId,
}

/// Boundary to the external authentication service.
pub trait AuthProvider: Send + Sync {
    fn sign_up(&self, email: &str, password: &str, nickname: &str)
        -> Result<Identity, AuthError>;
    fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;
    fn sign_out(&self, token: &SessionToken) -> Result<(), AuthError>;
    fn session(&self, token: &SessionToken) -> Result<Option<Session>, AuthError>;
    /// Compensation hook for the signup saga; never called elsewhere.
    fn remove_identity(&self, auth_id: &AuthId) -> Result<(), AuthError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("auth provider unavailable: {0}")]
    Unavailable(String),
}

/// Extract the bearer token from an `Authorization` header, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<SessionToken> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(SessionToken(token.to_string()))
    }
}
