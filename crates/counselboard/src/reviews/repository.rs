use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{ReviewId, ReviewRecord, ReviewStatus};
use crate::identity::UserId;

/// Storage abstraction over submitted reviews; both variants share one table.
pub trait ReviewRepository: Send + Sync {
    fn insert(&self, record: ReviewRecord) -> Result<ReviewRecord, RepositoryError>;
    fn update(&self, record: ReviewRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ReviewId) -> Result<Option<ReviewRecord>, RepositoryError>;
    fn by_author(&self, author: &UserId) -> Result<Vec<ReviewRecord>, RepositoryError>;
    fn with_status(&self, status: ReviewStatus) -> Result<Vec<ReviewRecord>, RepositoryError>;
    fn all(&self) -> Result<Vec<ReviewRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("review already exists")]
    Conflict,
    #[error("review not found")]
    NotFound,
    #[error("review store unavailable: {0}")]
    Unavailable(String),
}

/// Dashboard row for the author's own submissions.
#[derive(Debug, Clone, Serialize)]
pub struct OwnReviewView {
    pub id: ReviewId,
    pub kind: &'static str,
    pub company_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    pub status: &'static str,
    /// Whether the dashboard should offer the revise action.
    pub revisable: bool,
}

impl OwnReviewView {
    pub fn from_record(record: &ReviewRecord) -> Self {
        Self {
            id: record.id.clone(),
            kind: record.payload.kind().label(),
            company_name: record.payload.company_name().to_string(),
            position: record.payload.position().map(str::to_string),
            status: record.status.label(),
            revisable: record.status.revisable(),
        }
    }
}

/// Published listing entry; only approved reviews are ever rendered here.
#[derive(Debug, Clone, Serialize)]
pub struct PublicReviewView {
    pub kind: &'static str,
    pub company_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    pub headline_rating: u8,
    pub submitted_at: DateTime<Utc>,
}

impl PublicReviewView {
    pub fn from_record(record: &ReviewRecord) -> Self {
        Self {
            kind: record.payload.kind().label(),
            company_name: record.payload.company_name().to_string(),
            position: record.payload.position().map(str::to_string),
            headline_rating: record.payload.headline_rating().get(),
            submitted_at: record.submitted_at,
        }
    }
}

/// Moderation queue entry joined with the author's email.
#[derive(Debug, Clone, Serialize)]
pub struct ModerationView {
    pub id: ReviewId,
    pub kind: &'static str,
    pub company_name: String,
    pub status: &'static str,
    pub author_email: String,
    pub submitted_at: DateTime<Utc>,
}
