use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::identity::{
    AuthError, AuthId, AuthProvider, DirectoryError, Identity, Session, SessionToken, UserAccount,
    UserDirectory, UserId,
};
use crate::lawyers::domain::{LawyerProfile, ProfileId, VerificationStatus};
use crate::lawyers::repository::{LawyerProfileRepository, ProfileRepositoryError};
use crate::lawyers::signup::{LicenseUpload, SignupRequest, SignupService};
use crate::lawyers::storage::{LicenseStore, StorageError};
use crate::lawyers::verification::VerificationService;

#[derive(Default)]
pub(super) struct MemoryAuth {
    identities: Mutex<HashMap<String, AuthId>>,
    sessions: Mutex<HashMap<String, AuthId>>,
    sequence: AtomicU64,
    pub(super) removed: Mutex<Vec<AuthId>>,
}

impl AuthProvider for MemoryAuth {
    fn sign_up(&self, email: &str, _password: &str, _nickname: &str) -> Result<Identity, AuthError> {
        let mut identities = self.identities.lock().expect("auth mutex poisoned");
        if identities.contains_key(email) {
            return Err(AuthError::DuplicateEmail);
        }
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        let auth_id = AuthId(format!("auth-{id:06}"));
        identities.insert(email.to_string(), auth_id.clone());
        Ok(Identity { auth_id })
    }

    fn sign_in(&self, email: &str, _password: &str) -> Result<Session, AuthError> {
        let identities = self.identities.lock().expect("auth mutex poisoned");
        let auth_id = identities
            .get(email)
            .cloned()
            .ok_or(AuthError::InvalidCredentials)?;
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        let token = SessionToken(format!("tok-{id:06}"));
        self.sessions
            .lock()
            .expect("auth mutex poisoned")
            .insert(token.0.clone(), auth_id.clone());
        Ok(Session { token, auth_id })
    }

    fn sign_out(&self, token: &SessionToken) -> Result<(), AuthError> {
        self.sessions
            .lock()
            .expect("auth mutex poisoned")
            .remove(&token.0);
        Ok(())
    }

    fn session(&self, token: &SessionToken) -> Result<Option<Session>, AuthError> {
        Ok(self
            .sessions
            .lock()
            .expect("auth mutex poisoned")
            .get(&token.0)
            .map(|auth_id| Session {
                token: token.clone(),
                auth_id: auth_id.clone(),
            }))
    }

    fn remove_identity(&self, auth_id: &AuthId) -> Result<(), AuthError> {
        self.identities
            .lock()
            .expect("auth mutex poisoned")
            .retain(|_, stored| stored != auth_id);
        self.removed
            .lock()
            .expect("auth mutex poisoned")
            .push(auth_id.clone());
        Ok(())
    }
}

#[derive(Default)]
pub(super) struct MemoryDirectory {
    pub(super) rows: Mutex<HashMap<UserId, UserAccount>>,
}

impl UserDirectory for MemoryDirectory {
    fn insert(&self, account: UserAccount) -> Result<UserAccount, DirectoryError> {
        let mut rows = self.rows.lock().expect("directory mutex poisoned");
        if rows.contains_key(&account.id) {
            return Err(DirectoryError::Conflict);
        }
        rows.insert(account.id.clone(), account.clone());
        Ok(account)
    }

    fn find_by_auth(&self, auth_id: &AuthId) -> Result<Option<UserAccount>, DirectoryError> {
        let rows = self.rows.lock().expect("directory mutex poisoned");
        Ok(rows
            .values()
            .find(|account| &account.auth_id == auth_id)
            .cloned())
    }

    fn fetch(&self, id: &UserId) -> Result<Option<UserAccount>, DirectoryError> {
        let rows = self.rows.lock().expect("directory mutex poisoned");
        Ok(rows.get(id).cloned())
    }

    fn remove(&self, id: &UserId) -> Result<(), DirectoryError> {
        self.rows
            .lock()
            .expect("directory mutex poisoned")
            .remove(id);
        Ok(())
    }
}

#[derive(Default)]
pub(super) struct MemoryProfiles {
    pub(super) rows: Mutex<HashMap<ProfileId, LawyerProfile>>,
}

impl LawyerProfileRepository for MemoryProfiles {
    fn insert(&self, profile: LawyerProfile) -> Result<LawyerProfile, ProfileRepositoryError> {
        let mut rows = self.rows.lock().expect("profile mutex poisoned");
        if rows.contains_key(&profile.id) {
            return Err(ProfileRepositoryError::Conflict);
        }
        rows.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }

    fn update(&self, profile: LawyerProfile) -> Result<(), ProfileRepositoryError> {
        let mut rows = self.rows.lock().expect("profile mutex poisoned");
        if !rows.contains_key(&profile.id) {
            return Err(ProfileRepositoryError::NotFound);
        }
        rows.insert(profile.id.clone(), profile);
        Ok(())
    }

    fn fetch(&self, id: &ProfileId) -> Result<Option<LawyerProfile>, ProfileRepositoryError> {
        let rows = self.rows.lock().expect("profile mutex poisoned");
        Ok(rows.get(id).cloned())
    }

    fn by_user(&self, user_id: &UserId) -> Result<Option<LawyerProfile>, ProfileRepositoryError> {
        let rows = self.rows.lock().expect("profile mutex poisoned");
        Ok(rows
            .values()
            .find(|profile| &profile.user_id == user_id)
            .cloned())
    }

    fn pending(&self) -> Result<Vec<LawyerProfile>, ProfileRepositoryError> {
        let rows = self.rows.lock().expect("profile mutex poisoned");
        Ok(rows
            .values()
            .filter(|profile| profile.status == VerificationStatus::Pending)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub(super) struct MemoryLicenses {
    pub(super) objects: Mutex<HashMap<(String, String), Vec<u8>>>,
}

impl LicenseStore for MemoryLicenses {
    fn upload(&self, bucket: &str, path: &str, bytes: Vec<u8>) -> Result<String, StorageError> {
        let mut objects = self.objects.lock().expect("storage mutex poisoned");
        let key = (bucket.to_string(), path.to_string());
        if objects.contains_key(&key) {
            return Err(StorageError::AlreadyExists);
        }
        objects.insert(key, bytes);
        Ok(path.to_string())
    }

    fn signed_url(
        &self,
        bucket: &str,
        path: &str,
        ttl_seconds: u64,
    ) -> Result<String, StorageError> {
        let objects = self.objects.lock().expect("storage mutex poisoned");
        if !objects.contains_key(&(bucket.to_string(), path.to_string())) {
            return Err(StorageError::NotFound);
        }
        Ok(format!("https://files.test/{bucket}/{path}?ttl={ttl_seconds}"))
    }

    fn remove(&self, bucket: &str, path: &str) -> Result<(), StorageError> {
        self.objects
            .lock()
            .expect("storage mutex poisoned")
            .remove(&(bucket.to_string(), path.to_string()));
        Ok(())
    }
}

/// Profile store that refuses every insert, for saga unwind tests.
pub(super) struct RejectingProfiles;

impl LawyerProfileRepository for RejectingProfiles {
    fn insert(&self, _profile: LawyerProfile) -> Result<LawyerProfile, ProfileRepositoryError> {
        Err(ProfileRepositoryError::Unavailable(
            "profile table offline".to_string(),
        ))
    }

    fn update(&self, _profile: LawyerProfile) -> Result<(), ProfileRepositoryError> {
        Err(ProfileRepositoryError::Unavailable(
            "profile table offline".to_string(),
        ))
    }

    fn fetch(&self, _id: &ProfileId) -> Result<Option<LawyerProfile>, ProfileRepositoryError> {
        Ok(None)
    }

    fn by_user(&self, _user_id: &UserId) -> Result<Option<LawyerProfile>, ProfileRepositoryError> {
        Ok(None)
    }

    fn pending(&self) -> Result<Vec<LawyerProfile>, ProfileRepositoryError> {
        Ok(Vec::new())
    }
}

/// Object store that refuses every upload, for saga unwind tests.
pub(super) struct RejectingLicenses;

impl LicenseStore for RejectingLicenses {
    fn upload(&self, _bucket: &str, _path: &str, _bytes: Vec<u8>) -> Result<String, StorageError> {
        Err(StorageError::Unavailable("bucket offline".to_string()))
    }

    fn signed_url(
        &self,
        _bucket: &str,
        _path: &str,
        _ttl_seconds: u64,
    ) -> Result<String, StorageError> {
        Err(StorageError::Unavailable("bucket offline".to_string()))
    }

    fn remove(&self, _bucket: &str, _path: &str) -> Result<(), StorageError> {
        Ok(())
    }
}

pub(super) fn signup_request(email: &str) -> SignupRequest {
    SignupRequest {
        email: email.to_string(),
        password: "correct-horse".to_string(),
        nickname: "counselor".to_string(),
        license: LicenseUpload {
            file_name: "bar-license.pdf".to_string(),
            bytes: b"%PDF-1.4 license scan".to_vec(),
        },
    }
}

pub(super) fn admin_account() -> UserAccount {
    UserAccount {
        id: UserId("user-admin".to_string()),
        auth_id: AuthId("auth-admin".to_string()),
        email: "admin@counselboard.dev".to_string(),
        is_admin: true,
    }
}

pub(super) fn member_account() -> UserAccount {
    UserAccount {
        id: UserId("user-member".to_string()),
        auth_id: AuthId("auth-member".to_string()),
        email: "member@counselboard.dev".to_string(),
        is_admin: false,
    }
}

pub(super) type TestSignup = SignupService<MemoryAuth, MemoryDirectory, MemoryProfiles, MemoryLicenses>;

pub(super) fn build_signup() -> (
    TestSignup,
    Arc<MemoryAuth>,
    Arc<MemoryDirectory>,
    Arc<MemoryProfiles>,
    Arc<MemoryLicenses>,
) {
    let auth = Arc::new(MemoryAuth::default());
    let directory = Arc::new(MemoryDirectory::default());
    let profiles = Arc::new(MemoryProfiles::default());
    let licenses = Arc::new(MemoryLicenses::default());
    let service = SignupService::new(
        auth.clone(),
        directory.clone(),
        profiles.clone(),
        licenses.clone(),
    );
    (service, auth, directory, profiles, licenses)
}

pub(super) fn build_verification() -> (
    VerificationService<MemoryProfiles, MemoryDirectory, MemoryLicenses>,
    Arc<MemoryProfiles>,
    Arc<MemoryDirectory>,
    Arc<MemoryLicenses>,
) {
    let profiles = Arc::new(MemoryProfiles::default());
    let directory = Arc::new(MemoryDirectory::default());
    let licenses = Arc::new(MemoryLicenses::default());
    let service = VerificationService::new(profiles.clone(), directory.clone(), licenses.clone());
    (service, profiles, directory, licenses)
}
