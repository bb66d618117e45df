//! Review lifecycle: submission, validation, moderation, revision, listings.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub(crate) mod validate;

#[cfg(test)]
mod tests;

pub use domain::{
    CompanyRatings, CompanyReviewDraft, CompanyReviewPayload, EmploymentTerm, InterviewOutcome,
    InterviewReviewDraft, InterviewReviewPayload, ModerationDecision, PracticeArea, Rating,
    ReviewDraft, ReviewId, ReviewKind, ReviewPayload, ReviewRecord, ReviewStatus, SalaryBasis,
};
pub use repository::{
    ModerationView, OwnReviewView, PublicReviewView, RepositoryError, ReviewRepository,
};
pub use router::{review_router, ReviewGateway};
pub use service::{ReviewError, ReviewService, SubmissionPolicy};
