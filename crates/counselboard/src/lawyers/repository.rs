use super::domain::{LawyerProfile, ProfileId};
use crate::identity::UserId;

/// Storage abstraction over lawyer verification profiles.
pub trait LawyerProfileRepository: Send + Sync {
    fn insert(&self, profile: LawyerProfile) -> Result<LawyerProfile, ProfileRepositoryError>;
    fn update(&self, profile: LawyerProfile) -> Result<(), ProfileRepositoryError>;
    fn fetch(&self, id: &ProfileId) -> Result<Option<LawyerProfile>, ProfileRepositoryError>;
    fn by_user(&self, user_id: &UserId) -> Result<Option<LawyerProfile>, ProfileRepositoryError>;
    fn pending(&self) -> Result<Vec<LawyerProfile>, ProfileRepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileRepositoryError {
    #[error("profile already exists")]
    Conflict,
    #[error("profile not found")]
    NotFound,
    #[error("profile store unavailable: {0}")]
    Unavailable(String),
}
