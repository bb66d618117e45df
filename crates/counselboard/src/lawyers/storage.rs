/// Bucket holding uploaded license documents.
pub const LICENSE_BUCKET: &str = "lawyer-licenses";

/// Boundary to the external object store.
///
/// Uploads never overwrite: a path collision is a hard error, matching the
/// store's no-upsert configuration.
pub trait LicenseStore: Send + Sync {
    fn upload(&self, bucket: &str, path: &str, bytes: Vec<u8>) -> Result<String, StorageError>;
    fn signed_url(&self, bucket: &str, path: &str, ttl_seconds: u64)
        -> Result<String, StorageError>;
    /// Compensation hook for the signup saga.
    fn remove(&self, bucket: &str, path: &str) -> Result<(), StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("object already exists")]
    AlreadyExists,
    #[error("object not found")]
    NotFound,
    #[error("object store unavailable: {0}")]
    Unavailable(String),
}
