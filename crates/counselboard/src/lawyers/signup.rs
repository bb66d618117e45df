use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{LawyerProfile, ProfileId, VerificationStatus};
use super::repository::{LawyerProfileRepository, ProfileRepositoryError};
use super::storage::{LicenseStore, StorageError, LICENSE_BUCKET};
use crate::identity::{
    AuthError, AuthId, AuthProvider, DirectoryError, UserAccount, UserDirectory, UserId,
};
use crate::validate::{FieldErrors, ValidationFailed};

/// Inbound signup request carrying the license document bytes.
#[derive(Debug, Clone)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub nickname: String,
    pub license: LicenseUpload,
}

#[derive(Debug, Clone)]
pub struct LicenseUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl LicenseUpload {
    /// Last dot-separated segment of the file name, as the upload path suffix.
    fn extension(&self) -> &str {
        self.file_name.rsplit('.').next().unwrap_or("bin")
    }
}

/// Completed signup: the account row plus its pending verification profile.
#[derive(Debug, Clone)]
pub struct SignupOutcome {
    pub account: UserAccount,
    pub profile: LawyerProfile,
}

static USER_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static PROFILE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_user_id() -> UserId {
    let id = USER_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    UserId(format!("user-{id:06}"))
}

fn next_profile_id() -> ProfileId {
    let id = PROFILE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ProfileId(format!("profile-{id:06}"))
}

/// Saga creating the identity, account row, license object, and pending
/// profile in that order.
///
/// A later step failing unwinds every earlier step in reverse order; an
/// unwind failure is logged and the original error still surfaces.
pub struct SignupService<A, U, P, S> {
    auth: Arc<A>,
    directory: Arc<U>,
    profiles: Arc<P>,
    licenses: Arc<S>,
}

impl<A, U, P, S> SignupService<A, U, P, S>
where
    A: AuthProvider,
    U: UserDirectory,
    P: LawyerProfileRepository,
    S: LicenseStore,
{
    pub fn new(auth: Arc<A>, directory: Arc<U>, profiles: Arc<P>, licenses: Arc<S>) -> Self {
        Self {
            auth,
            directory,
            profiles,
            licenses,
        }
    }

    pub fn sign_up(&self, request: SignupRequest) -> Result<SignupOutcome, SignupError> {
        validate_request(&request)?;

        let identity = self
            .auth
            .sign_up(&request.email, &request.password, &request.nickname)?;

        let account = UserAccount {
            id: next_user_id(),
            auth_id: identity.auth_id.clone(),
            email: request.email.clone(),
            is_admin: false,
        };
        let account = match self.directory.insert(account) {
            Ok(account) => account,
            Err(error) => {
                self.unwind_identity(&identity.auth_id);
                return Err(error.into());
            }
        };

        let object_name = format!(
            "{}-license.{}",
            identity.auth_id.0,
            request.license.extension()
        );
        let license_file =
            match self
                .licenses
                .upload(LICENSE_BUCKET, &object_name, request.license.bytes.clone())
            {
                Ok(path) => path,
                Err(error) => {
                    self.unwind_account(&account);
                    return Err(error.into());
                }
            };

        let profile = LawyerProfile {
            id: next_profile_id(),
            user_id: account.id.clone(),
            nickname: request.nickname.clone(),
            license_file: license_file.clone(),
            status: VerificationStatus::Pending,
        };
        let profile = match self.profiles.insert(profile) {
            Ok(profile) => profile,
            Err(error) => {
                self.unwind_license(&license_file);
                self.unwind_account(&account);
                return Err(error.into());
            }
        };

        info!(
            user = %account.id.0,
            profile = %profile.id.0,
            "signup completed, profile pending verification"
        );
        Ok(SignupOutcome { account, profile })
    }

    fn unwind_identity(&self, auth_id: &AuthId) {
        if let Err(error) = self.auth.remove_identity(auth_id) {
            warn!(auth_id = %auth_id.0, "signup unwind left a dangling identity: {error}");
        }
    }

    fn unwind_account(&self, account: &UserAccount) {
        if let Err(error) = self.directory.remove(&account.id) {
            warn!(user = %account.id.0, "signup unwind left a dangling account row: {error}");
        }
        self.unwind_identity(&account.auth_id);
    }

    fn unwind_license(&self, path: &str) {
        if let Err(error) = self.licenses.remove(LICENSE_BUCKET, path) {
            warn!(path, "signup unwind left a dangling license object: {error}");
        }
    }
}

fn validate_request(request: &SignupRequest) -> Result<(), ValidationFailed> {
    let mut errors = FieldErrors::new();
    let email = request.email.trim();
    if email.is_empty() || !email.contains('@') {
        errors.push("email", "must be a valid email address");
    }
    if request.password.chars().count() < 6 {
        errors.push("password", "must be at least 6 characters");
    }
    if request.nickname.trim().chars().count() < 2 {
        errors.push("nickname", "must be at least 2 characters");
    }
    if request.license.bytes.is_empty() {
        errors.push("license", "license document is required");
    }
    errors.finish()
}

#[derive(Debug, thiserror::Error)]
pub enum SignupError {
    #[error(transparent)]
    Validation(#[from] ValidationFailed),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Profiles(#[from] ProfileRepositoryError),
}
