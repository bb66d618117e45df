//! In-memory stand-ins for the backing services (auth, row store, object
//! store) plus the wiring helpers the server, routes, and demo share.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use counselboard::identity::{
    AuthError, AuthId, AuthProvider, DirectoryError, Identity, IdentityResolver, Session,
    SessionToken, UserAccount, UserDirectory, UserId,
};
use counselboard::lawyers::{
    LawyerProfile, LawyerProfileRepository, LicenseStore, ProfileId, ProfileRepositoryError,
    SignupService, StorageError, VerificationService, VerificationStatus,
};
use counselboard::reviews::{
    RepositoryError, ReviewId, ReviewRecord, ReviewRepository, ReviewService, ReviewStatus,
    SubmissionPolicy,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::warn;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

struct IdentityRow {
    auth_id: AuthId,
    password: String,
}

#[derive(Default)]
pub(crate) struct InMemoryAuthProvider {
    identities: Mutex<HashMap<String, IdentityRow>>,
    sessions: Mutex<HashMap<String, AuthId>>,
    sequence: AtomicU64,
}

impl AuthProvider for InMemoryAuthProvider {
    fn sign_up(&self, email: &str, password: &str, _nickname: &str) -> Result<Identity, AuthError> {
        let mut identities = self.identities.lock().expect("auth mutex poisoned");
        if identities.contains_key(email) {
            return Err(AuthError::DuplicateEmail);
        }
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        let auth_id = AuthId(format!("auth-{id:06}"));
        identities.insert(
            email.to_string(),
            IdentityRow {
                auth_id: auth_id.clone(),
                password: password.to_string(),
            },
        );
        Ok(Identity { auth_id })
    }

    fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let identities = self.identities.lock().expect("auth mutex poisoned");
        let row = identities.get(email).ok_or(AuthError::InvalidCredentials)?;
        if row.password != password {
            return Err(AuthError::InvalidCredentials);
        }
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        let token = SessionToken(format!("session-{id:06}"));
        self.sessions
            .lock()
            .expect("auth mutex poisoned")
            .insert(token.0.clone(), row.auth_id.clone());
        Ok(Session {
            token,
            auth_id: row.auth_id.clone(),
        })
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
            .retain(|_, row| &row.auth_id != auth_id);
        self.sessions
            .lock()
            .expect("auth mutex poisoned")
            .retain(|_, session| session != auth_id);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct InMemoryUserDirectory {
    rows: Mutex<HashMap<UserId, UserAccount>>,
}

impl UserDirectory for InMemoryUserDirectory {
    fn insert(&self, account: UserAccount) -> Result<UserAccount, DirectoryError> {
        let mut rows = self.rows.lock().expect("directory mutex poisoned");
        let duplicate = rows.contains_key(&account.id)
            || rows.values().any(|row| row.auth_id == account.auth_id);
        if duplicate {
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
pub(crate) struct InMemoryLawyerProfiles {
    rows: Mutex<HashMap<ProfileId, LawyerProfile>>,
}

impl LawyerProfileRepository for InMemoryLawyerProfiles {
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
pub(crate) struct InMemoryLicenseStore {
    objects: Mutex<HashMap<(String, String), Vec<u8>>>,
}

impl LicenseStore for InMemoryLicenseStore {
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
        Ok(format!(
            "https://storage.counselboard.local/{bucket}/{path}?expires_in={ttl_seconds}"
        ))
    }

    fn remove(&self, bucket: &str, path: &str) -> Result<(), StorageError> {
        self.objects
            .lock()
            .expect("storage mutex poisoned")
            .remove(&(bucket.to_string(), path.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct InMemoryReviewStore {
    rows: Mutex<HashMap<ReviewId, ReviewRecord>>,
}

impl ReviewRepository for InMemoryReviewStore {
    fn insert(&self, record: ReviewRecord) -> Result<ReviewRecord, RepositoryError> {
        let mut rows = self.rows.lock().expect("review mutex poisoned");
        if rows.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        rows.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: ReviewRecord) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().expect("review mutex poisoned");
        if !rows.contains_key(&record.id) {
            return Err(RepositoryError::NotFound);
        }
        rows.insert(record.id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &ReviewId) -> Result<Option<ReviewRecord>, RepositoryError> {
        let rows = self.rows.lock().expect("review mutex poisoned");
        Ok(rows.get(id).cloned())
    }

    fn by_author(&self, author: &UserId) -> Result<Vec<ReviewRecord>, RepositoryError> {
        let rows = self.rows.lock().expect("review mutex poisoned");
        Ok(rows
            .values()
            .filter(|record| &record.author == author)
            .cloned()
            .collect())
    }

    fn with_status(&self, status: ReviewStatus) -> Result<Vec<ReviewRecord>, RepositoryError> {
        let rows = self.rows.lock().expect("review mutex poisoned");
        Ok(rows
            .values()
            .filter(|record| record.status == status)
            .cloned()
            .collect())
    }

    fn all(&self) -> Result<Vec<ReviewRecord>, RepositoryError> {
        let rows = self.rows.lock().expect("review mutex poisoned");
        Ok(rows.values().cloned().collect())
    }
}

/// One set of backing adapters shared by every service instance.
pub(crate) struct Backing {
    pub(crate) auth: Arc<InMemoryAuthProvider>,
    pub(crate) directory: Arc<InMemoryUserDirectory>,
    pub(crate) profiles: Arc<InMemoryLawyerProfiles>,
    pub(crate) licenses: Arc<InMemoryLicenseStore>,
    pub(crate) reviews: Arc<InMemoryReviewStore>,
}

pub(crate) fn backing() -> Backing {
    Backing {
        auth: Arc::new(InMemoryAuthProvider::default()),
        directory: Arc::new(InMemoryUserDirectory::default()),
        profiles: Arc::new(InMemoryLawyerProfiles::default()),
        licenses: Arc::new(InMemoryLicenseStore::default()),
        reviews: Arc::new(InMemoryReviewStore::default()),
    }
}

pub(crate) type Resolver = IdentityResolver<InMemoryAuthProvider, InMemoryUserDirectory>;
pub(crate) type Reviews =
    ReviewService<InMemoryReviewStore, InMemoryLawyerProfiles, InMemoryUserDirectory>;
pub(crate) type Verification =
    VerificationService<InMemoryLawyerProfiles, InMemoryUserDirectory, InMemoryLicenseStore>;
pub(crate) type Signup = SignupService<
    InMemoryAuthProvider,
    InMemoryUserDirectory,
    InMemoryLawyerProfiles,
    InMemoryLicenseStore,
>;

pub(crate) fn resolver(backing: &Backing) -> Resolver {
    IdentityResolver::new(backing.auth.clone(), backing.directory.clone())
}

pub(crate) fn review_service(backing: &Backing, policy: SubmissionPolicy) -> Reviews {
    ReviewService::new(
        backing.reviews.clone(),
        backing.profiles.clone(),
        backing.directory.clone(),
        policy,
    )
}

pub(crate) fn verification_service(backing: &Backing, license_url_ttl: u64) -> Verification {
    VerificationService::with_license_ttl(
        backing.profiles.clone(),
        backing.directory.clone(),
        backing.licenses.clone(),
        license_url_ttl,
    )
}

pub(crate) fn signup_service(backing: &Backing) -> Signup {
    SignupService::new(
        backing.auth.clone(),
        backing.directory.clone(),
        backing.profiles.clone(),
        backing.licenses.clone(),
    )
}

/// Everything the page routes and the gate middleware need.
#[derive(Clone)]
pub(crate) struct AppContext {
    pub(crate) resolver: Arc<Resolver>,
    pub(crate) reviews: Arc<Reviews>,
    pub(crate) verification: Arc<Verification>,
    pub(crate) profiles: Arc<InMemoryLawyerProfiles>,
}

pub(crate) fn app_context(backing: &Backing, policy: SubmissionPolicy, ttl: u64) -> AppContext {
    AppContext {
        resolver: Arc::new(resolver(backing)),
        reviews: Arc::new(review_service(backing, policy)),
        verification: Arc::new(verification_service(backing, ttl)),
        profiles: backing.profiles.clone(),
    }
}

/// Create an administrator identity and account row directly in the
/// adapters. Admin assignment is operational, not part of the signup flow.
pub(crate) fn seed_admin(backing: &Backing, email: &str, password: &str) -> Option<UserAccount> {
    let identity = match backing.auth.sign_up(email, password, "admin") {
        Ok(identity) => identity,
        Err(error) => {
            warn!(email, "could not seed admin identity: {error}");
            return None;
        }
    };
    let account = UserAccount {
        id: UserId(format!("admin-{}", identity.auth_id.0)),
        auth_id: identity.auth_id,
        email: email.to_string(),
        is_admin: true,
    };
    match backing.directory.insert(account) {
        Ok(account) => Some(account),
        Err(error) => {
            warn!(email, "could not seed admin account row: {error}");
            None
        }
    }
}
