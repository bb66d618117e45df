use std::sync::Arc;

use axum::http::HeaderMap;

use super::auth::{bearer_token, AuthError, AuthProvider, SessionToken};
use super::directory::{DirectoryError, UserAccount, UserDirectory};

/// Maps a bearer token to the internal account it belongs to.
///
/// Every write operation resolves its caller through this before touching
/// storage; the lookup itself is read-only.
pub struct IdentityResolver<A, U> {
    auth: Arc<A>,
    directory: Arc<U>,
}

impl<A, U> IdentityResolver<A, U>
where
    A: AuthProvider,
    U: UserDirectory,
{
    pub fn new(auth: Arc<A>, directory: Arc<U>) -> Self {
        Self { auth, directory }
    }

    /// Resolve the caller behind `token`.
    ///
    /// `Unauthorized` when the token maps to no live session; `UserNotFound`
    /// when the session is valid but no account row is linked to it (a signup
    /// that never completed).
    pub fn resolve(&self, token: &SessionToken) -> Result<UserAccount, IdentityError> {
        let session = self
            .auth
            .session(token)?
            .ok_or(IdentityError::Unauthorized)?;
        self.directory
            .find_by_auth(&session.auth_id)?
            .ok_or(IdentityError::UserNotFound)
    }

    /// Resolve the caller from request headers.
    pub fn resolve_headers(&self, headers: &HeaderMap) -> Result<UserAccount, IdentityError> {
        let token = bearer_token(headers).ok_or(IdentityError::Unauthorized)?;
        self.resolve(&token)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("no valid session")]
    Unauthorized,
    #[error("session is not linked to an account")]
    UserNotFound,
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}
