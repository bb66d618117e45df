//! Session-to-account resolution and the identity collaborator boundary.

pub mod auth;
pub mod directory;
pub mod resolver;

pub use auth::{bearer_token, AuthError, AuthId, AuthProvider, Identity, Session, SessionToken};
pub use directory::{DirectoryError, UserAccount, UserDirectory, UserId};
pub use resolver::{IdentityError, IdentityResolver};
