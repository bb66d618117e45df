use serde::{Deserialize, Serialize};

use super::auth::AuthId;

/// Internal account identifier, stable across sessions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Account row linking an external identity to internal state.
///
/// `is_admin` is immutable through this crate; how it gets assigned is an
/// operational concern outside the lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: UserId,
    pub auth_id: AuthId,
    pub email: String,
    pub is_admin: bool,
}

/// Storage abstraction over the account table.
pub trait UserDirectory: Send + Sync {
    fn insert(&self, account: UserAccount) -> Result<UserAccount, DirectoryError>;
    fn find_by_auth(&self, auth_id: &AuthId) -> Result<Option<UserAccount>, DirectoryError>;
    fn fetch(&self, id: &UserId) -> Result<Option<UserAccount>, DirectoryError>;
    /// Compensation hook for the signup saga.
    fn remove(&self, id: &UserId) -> Result<(), DirectoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("account already exists")]
    Conflict,
    #[error("account not found")]
    NotFound,
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}
