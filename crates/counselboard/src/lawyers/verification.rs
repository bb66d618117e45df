use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use super::domain::{LawyerProfile, ProfileId, VerificationDecision, VerificationStatus};
use super::repository::{LawyerProfileRepository, ProfileRepositoryError};
use super::storage::{LicenseStore, LICENSE_BUCKET};
use crate::identity::{DirectoryError, UserAccount, UserDirectory, UserId};

/// Default validity of license links handed to a reviewing admin.
pub const DEFAULT_LICENSE_URL_TTL_SECS: u64 = 60;

/// Queue entry shown to a reviewing admin.
#[derive(Debug, Clone, Serialize)]
pub struct PendingVerificationView {
    pub profile_id: ProfileId,
    pub nickname: String,
    pub email: String,
    pub status: &'static str,
    /// Short-lived link to the uploaded license; absent when the store
    /// cannot sign one right now.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_url: Option<String>,
}

/// Admin-facing side of the approval lifecycle.
pub struct VerificationService<P, U, S> {
    profiles: Arc<P>,
    directory: Arc<U>,
    licenses: Arc<S>,
    license_url_ttl: u64,
}

impl<P, U, S> VerificationService<P, U, S>
where
    P: LawyerProfileRepository,
    U: UserDirectory,
    S: LicenseStore,
{
    pub fn new(profiles: Arc<P>, directory: Arc<U>, licenses: Arc<S>) -> Self {
        Self::with_license_ttl(profiles, directory, licenses, DEFAULT_LICENSE_URL_TTL_SECS)
    }

    pub fn with_license_ttl(
        profiles: Arc<P>,
        directory: Arc<U>,
        licenses: Arc<S>,
        license_url_ttl: u64,
    ) -> Self {
        Self {
            profiles,
            directory,
            licenses,
            license_url_ttl,
        }
    }

    /// Apply an admin decision to a profile.
    ///
    /// Re-applying the decision a profile already carries is a no-op
    /// success; any other move out of a terminal status is refused.
    pub fn decide(
        &self,
        caller: &UserAccount,
        id: &ProfileId,
        decision: VerificationDecision,
    ) -> Result<LawyerProfile, VerificationError> {
        if !caller.is_admin {
            return Err(VerificationError::Forbidden);
        }

        let mut profile = self
            .profiles
            .fetch(id)?
            .ok_or(VerificationError::NotFound)?;
        let target = decision.status();
        if profile.status == target {
            return Ok(profile);
        }
        if profile.status.is_terminal() {
            return Err(VerificationError::AlreadyDecided {
                current: profile.status,
            });
        }

        profile.status = target;
        self.profiles.update(profile.clone())?;
        info!(profile = %profile.id.0, status = target.label(), "lawyer profile decided");
        Ok(profile)
    }

    /// The pending queue, joined with account emails and license links.
    pub fn pending(
        &self,
        caller: &UserAccount,
    ) -> Result<Vec<PendingVerificationView>, VerificationError> {
        if !caller.is_admin {
            return Err(VerificationError::Forbidden);
        }

        let mut queue = Vec::new();
        for profile in self.profiles.pending()? {
            let email = self
                .directory
                .fetch(&profile.user_id)?
                .map(|account| account.email)
                .unwrap_or_else(|| "email not available".to_string());
            let license_url = self
                .licenses
                .signed_url(LICENSE_BUCKET, &profile.license_file, self.license_url_ttl)
                .ok();
            queue.push(PendingVerificationView {
                profile_id: profile.id,
                nickname: profile.nickname,
                email,
                status: profile.status.label(),
                license_url,
            });
        }
        Ok(queue)
    }

    /// Current verification status for an account, if it has a profile.
    pub fn status_of(
        &self,
        user_id: &UserId,
    ) -> Result<Option<VerificationStatus>, VerificationError> {
        Ok(self
            .profiles
            .by_user(user_id)?
            .map(|profile| profile.status))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("caller is not an administrator")]
    Forbidden,
    #[error("profile not found")]
    NotFound,
    #[error("profile was already {}", .current.label())]
    AlreadyDecided { current: VerificationStatus },
    #[error(transparent)]
    Repository(#[from] ProfileRepositoryError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}
