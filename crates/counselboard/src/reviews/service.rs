use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::domain::{
    CompanyReviewDraft, InterviewReviewDraft, ModerationDecision, ReviewDraft, ReviewId,
    ReviewKind, ReviewPayload, ReviewRecord, ReviewStatus,
};
use super::repository::{
    ModerationView, OwnReviewView, PublicReviewView, RepositoryError, ReviewRepository,
};
use super::validate;
use crate::identity::{DirectoryError, UserAccount, UserDirectory};
use crate::lawyers::{LawyerProfileRepository, ProfileRepositoryError, VerificationStatus};
use crate::validate::ValidationFailed;

/// Which review variants demand an approved lawyer profile, and what a
/// revision does to the moderation status.
///
/// The per-variant flags exist because the original product enforced the
/// verification precondition for interview reviews only; flipping
/// `company_requires_verification` makes the policy uniform without touching
/// the services. `revise_resets_status = false` reproduces the legacy
/// behavior of writing the payload while leaving a rejected review rejected.
#[derive(Debug, Clone, Copy)]
pub struct SubmissionPolicy {
    pub company_requires_verification: bool,
    pub interview_requires_verification: bool,
    pub revise_resets_status: bool,
}

impl Default for SubmissionPolicy {
    fn default() -> Self {
        Self {
            company_requires_verification: false,
            interview_requires_verification: true,
            revise_resets_status: true,
        }
    }
}

static REVIEW_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_review_id() -> ReviewId {
    let id = REVIEW_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ReviewId(format!("review-{id:06}"))
}

/// Service owning the review lifecycle: submission, moderation, revision,
/// and the three listings.
pub struct ReviewService<R, P, U> {
    reviews: Arc<R>,
    profiles: Arc<P>,
    directory: Arc<U>,
    policy: SubmissionPolicy,
}

impl<R, P, U> ReviewService<R, P, U>
where
    R: ReviewRepository,
    P: LawyerProfileRepository,
    U: UserDirectory,
{
    pub fn new(
        reviews: Arc<R>,
        profiles: Arc<P>,
        directory: Arc<U>,
        policy: SubmissionPolicy,
    ) -> Self {
        Self {
            reviews,
            profiles,
            directory,
            policy,
        }
    }

    pub fn submit_company(
        &self,
        caller: &UserAccount,
        draft: CompanyReviewDraft,
    ) -> Result<ReviewRecord, ReviewError> {
        self.enforce_verification(caller, ReviewKind::Company)?;
        let payload = validate::company_payload(draft)?;
        self.insert(caller, ReviewPayload::Company(payload))
    }

    pub fn submit_interview(
        &self,
        caller: &UserAccount,
        draft: InterviewReviewDraft,
    ) -> Result<ReviewRecord, ReviewError> {
        self.enforce_verification(caller, ReviewKind::Interview)?;
        let payload = validate::interview_payload(draft)?;
        self.insert(caller, ReviewPayload::Interview(payload))
    }

    fn insert(
        &self,
        caller: &UserAccount,
        payload: ReviewPayload,
    ) -> Result<ReviewRecord, ReviewError> {
        // Status is always pending on insert, whatever the caller sent.
        let record = ReviewRecord {
            id: next_review_id(),
            author: caller.id.clone(),
            payload,
            status: ReviewStatus::Pending,
            submitted_at: Utc::now(),
        };
        let stored = self.reviews.insert(record)?;
        info!(
            review = %stored.id.0,
            kind = stored.payload.kind().label(),
            "review submitted"
        );
        Ok(stored)
    }

    fn enforce_verification(
        &self,
        caller: &UserAccount,
        kind: ReviewKind,
    ) -> Result<(), ReviewError> {
        let required = match kind {
            ReviewKind::Company => self.policy.company_requires_verification,
            ReviewKind::Interview => self.policy.interview_requires_verification,
        };
        if !required {
            return Ok(());
        }
        let status = self
            .profiles
            .by_user(&caller.id)?
            .map(|profile| profile.status);
        if status != Some(VerificationStatus::Approved) {
            return Err(ReviewError::Forbidden);
        }
        Ok(())
    }

    /// Owner edit of a rejected review.
    pub fn revise(
        &self,
        caller: &UserAccount,
        id: &ReviewId,
        draft: ReviewDraft,
    ) -> Result<ReviewRecord, ReviewError> {
        let mut record = self.reviews.fetch(id)?.ok_or(ReviewError::NotFound)?;
        if record.author != caller.id {
            return Err(ReviewError::Forbidden);
        }
        if !record.status.revisable() {
            return Err(ReviewError::NotRevisable {
                status: record.status,
            });
        }

        record.payload = match (draft, record.payload.kind()) {
            (ReviewDraft::Company(draft), ReviewKind::Company) => {
                ReviewPayload::Company(validate::company_payload(draft)?)
            }
            (ReviewDraft::Interview(draft), ReviewKind::Interview) => {
                ReviewPayload::Interview(validate::interview_payload(draft)?)
            }
            _ => return Err(ReviewError::KindMismatch),
        };
        if self.policy.revise_resets_status {
            record.status = ReviewStatus::Pending;
        }

        self.reviews.update(record.clone())?;
        info!(
            review = %record.id.0,
            status = record.status.label(),
            "review revised"
        );
        Ok(record)
    }

    /// Admin decision on a pending review.
    ///
    /// Repeating the decision a review already carries is a no-op success;
    /// any other move out of a settled status is refused.
    pub fn moderate(
        &self,
        caller: &UserAccount,
        id: &ReviewId,
        decision: ModerationDecision,
    ) -> Result<ReviewRecord, ReviewError> {
        if !caller.is_admin {
            return Err(ReviewError::Forbidden);
        }

        let mut record = self.reviews.fetch(id)?.ok_or(ReviewError::NotFound)?;
        let target = decision.status();
        if record.status == target {
            return Ok(record);
        }
        if record.status != ReviewStatus::Pending {
            return Err(ReviewError::InvalidTransition {
                from: record.status,
                to: target,
            });
        }

        record.status = target;
        self.reviews.update(record.clone())?;
        info!(
            review = %record.id.0,
            status = target.label(),
            "review moderated"
        );
        Ok(record)
    }

    /// Everything the caller authored, any status, oldest first.
    pub fn list_mine(&self, caller: &UserAccount) -> Result<Vec<OwnReviewView>, ReviewError> {
        let mut records = self.reviews.by_author(&caller.id)?;
        records.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at));
        Ok(records.iter().map(OwnReviewView::from_record).collect())
    }

    /// Approved reviews for the signed-in community, oldest first.
    pub fn list_public(&self, _caller: &UserAccount) -> Result<Vec<PublicReviewView>, ReviewError> {
        let mut records = self.reviews.with_status(ReviewStatus::Approved)?;
        records.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at));
        Ok(records.iter().map(PublicReviewView::from_record).collect())
    }

    /// Every review regardless of status, newest first, with author emails.
    pub fn list_for_moderation(
        &self,
        caller: &UserAccount,
    ) -> Result<Vec<ModerationView>, ReviewError> {
        if !caller.is_admin {
            return Err(ReviewError::Forbidden);
        }

        let mut records = self.reviews.all()?;
        records.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));

        let mut views = Vec::with_capacity(records.len());
        for record in records {
            let author_email = self
                .directory
                .fetch(&record.author)?
                .map(|account| account.email)
                .unwrap_or_else(|| "email not available".to_string());
            views.push(ModerationView {
                id: record.id,
                kind: record.payload.kind().label(),
                company_name: record.payload.company_name().to_string(),
                status: record.status.label(),
                author_email,
                submitted_at: record.submitted_at,
            });
        }
        Ok(views)
    }

    /// Review fetched for the owner's revise form. A foreign review reads as
    /// absent rather than forbidden, so ids cannot be probed.
    pub fn fetch_own(
        &self,
        caller: &UserAccount,
        id: &ReviewId,
    ) -> Result<ReviewRecord, ReviewError> {
        let record = self.reviews.fetch(id)?.ok_or(ReviewError::NotFound)?;
        if record.author != caller.id {
            return Err(ReviewError::NotFound);
        }
        Ok(record)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("caller is not permitted to perform this action")]
    Forbidden,
    #[error("review not found")]
    NotFound,
    #[error(transparent)]
    Validation(#[from] ValidationFailed),
    #[error("review is {} and cannot be revised", .status.label())]
    NotRevisable { status: ReviewStatus },
    #[error("review is {} and cannot move to {}", .from.label(), .to.label())]
    InvalidTransition {
        from: ReviewStatus,
        to: ReviewStatus,
    },
    #[error("revision payload does not match the review variant")]
    KindMismatch,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error(transparent)]
    Profiles(#[from] ProfileRepositoryError),
}
