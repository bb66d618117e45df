use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::identity::{
    AuthError, AuthId, AuthProvider, DirectoryError, Identity, Session, SessionToken, UserAccount,
    UserDirectory, UserId,
};
use crate::lawyers::domain::{LawyerProfile, ProfileId, VerificationStatus};
use crate::lawyers::repository::{LawyerProfileRepository, ProfileRepositoryError};
use crate::reviews::domain::{
    CompanyReviewDraft, InterviewReviewDraft, ReviewId, ReviewRecord, ReviewStatus,
};
use crate::reviews::repository::{RepositoryError, ReviewRepository};
use crate::reviews::service::{ReviewService, SubmissionPolicy};

#[derive(Default)]
pub(super) struct MemoryReviews {
    pub(super) rows: Mutex<HashMap<ReviewId, ReviewRecord>>,
}

impl ReviewRepository for MemoryReviews {
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

#[derive(Default)]
pub(super) struct MemoryProfiles {
    rows: Mutex<HashMap<ProfileId, LawyerProfile>>,
}

impl LawyerProfileRepository for MemoryProfiles {
    fn insert(&self, profile: LawyerProfile) -> Result<LawyerProfile, ProfileRepositoryError> {
        self.rows
            .lock()
            .expect("profile mutex poisoned")
            .insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }

    fn update(&self, profile: LawyerProfile) -> Result<(), ProfileRepositoryError> {
        self.rows
            .lock()
            .expect("profile mutex poisoned")
            .insert(profile.id.clone(), profile);
        Ok(())
    }

    fn fetch(&self, id: &ProfileId) -> Result<Option<LawyerProfile>, ProfileRepositoryError> {
        Ok(self
            .rows
            .lock()
            .expect("profile mutex poisoned")
            .get(id)
            .cloned())
    }

    fn by_user(&self, user_id: &UserId) -> Result<Option<LawyerProfile>, ProfileRepositoryError> {
        Ok(self
            .rows
            .lock()
            .expect("profile mutex poisoned")
            .values()
            .find(|profile| &profile.user_id == user_id)
            .cloned())
    }

    fn pending(&self) -> Result<Vec<LawyerProfile>, ProfileRepositoryError> {
        Ok(self
            .rows
            .lock()
            .expect("profile mutex poisoned")
            .values()
            .filter(|profile| profile.status == VerificationStatus::Pending)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub(super) struct MemoryDirectory {
    rows: Mutex<HashMap<UserId, UserAccount>>,
}

impl UserDirectory for MemoryDirectory {
    fn insert(&self, account: UserAccount) -> Result<UserAccount, DirectoryError> {
        self.rows
            .lock()
            .expect("directory mutex poisoned")
            .insert(account.id.clone(), account.clone());
        Ok(account)
    }

    fn find_by_auth(&self, auth_id: &AuthId) -> Result<Option<UserAccount>, DirectoryError> {
        Ok(self
            .rows
            .lock()
            .expect("directory mutex poisoned")
            .values()
            .find(|account| &account.auth_id == auth_id)
            .cloned())
    }

    fn fetch(&self, id: &UserId) -> Result<Option<UserAccount>, DirectoryError> {
        Ok(self
            .rows
            .lock()
            .expect("directory mutex poisoned")
            .get(id)
            .cloned())
    }

    fn remove(&self, id: &UserId) -> Result<(), DirectoryError> {
        self.rows
            .lock()
            .expect("directory mutex poisoned")
            .remove(id);
        Ok(())
    }
}

/// Auth double with pre-issued tokens, for router tests.
#[derive(Default)]
pub(super) struct MemoryAuth {
    sessions: Mutex<HashMap<String, AuthId>>,
    sequence: AtomicU64,
}

impl MemoryAuth {
    pub(super) fn issue(&self, auth_id: &AuthId) -> SessionToken {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        let token = SessionToken(format!("tok-{id:06}"));
        self.sessions
            .lock()
            .expect("auth mutex poisoned")
            .insert(token.0.clone(), auth_id.clone());
        token
    }
}

impl AuthProvider for MemoryAuth {
    fn sign_up(&self, _: &str, _: &str, _: &str) -> Result<Identity, AuthError> {
        Err(AuthError::Unavailable("not under test".to_string()))
    }

    fn sign_in(&self, _: &str, _: &str) -> Result<Session, AuthError> {
        Err(AuthError::Unavailable("not under test".to_string()))
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

    fn remove_identity(&self, _: &AuthId) -> Result<(), AuthError> {
        Ok(())
    }
}

pub(super) fn member() -> UserAccount {
    UserAccount {
        id: UserId("user-member".to_string()),
        auth_id: AuthId("auth-member".to_string()),
        email: "member@counselboard.dev".to_string(),
        is_admin: false,
    }
}

pub(super) fn other_member() -> UserAccount {
    UserAccount {
        id: UserId("user-other".to_string()),
        auth_id: AuthId("auth-other".to_string()),
        email: "other@counselboard.dev".to_string(),
        is_admin: false,
    }
}

pub(super) fn admin() -> UserAccount {
    UserAccount {
        id: UserId("user-admin".to_string()),
        auth_id: AuthId("auth-admin".to_string()),
        email: "admin@counselboard.dev".to_string(),
        is_admin: true,
    }
}

pub(super) fn approved_profile_for(account: &UserAccount) -> LawyerProfile {
    LawyerProfile {
        id: ProfileId(format!("profile-{}", account.id.0)),
        user_id: account.id.clone(),
        nickname: "counselor".to_string(),
        license_file: format!("{}-license.pdf", account.auth_id.0),
        status: VerificationStatus::Approved,
    }
}

pub(super) fn pending_profile_for(account: &UserAccount) -> LawyerProfile {
    LawyerProfile {
        status: VerificationStatus::Pending,
        ..approved_profile_for(account)
    }
}

pub(super) fn company_draft() -> CompanyReviewDraft {
    CompanyReviewDraft {
        company_name: Some("Haneul & Partners".to_string()),
        lawyer_type: Some("corporate".to_string()),
        employment_terms: Some("regular".to_string()),
        good_things: vec!["mentoring".to_string(), "caseload variety".to_string()],
        other_good_things: None,
        overall_rating: Some(4),
        work_life_balance: Some(3),
        salary_benefits: Some(4),
        career_growth: Some(5),
        culture_fit: Some(4),
        management: Some(3),
        pros: Some("Strong partner support".to_string()),
        cons: Some("Late filings cluster at quarter end".to_string()),
        additional_comments: None,
        overtime_frequency: Some("a few nights a month".to_string()),
        overtime_comments: None,
        years_of_experience: Some("4".to_string()),
        salary: Some("98000000".to_string()),
        salary_type: Some("annual".to_string()),
        free_opinion: None,
        how_found: Some("colleague".to_string()),
        other_how_found: None,
    }
}

pub(super) fn interview_draft() -> InterviewReviewDraft {
    InterviewReviewDraft {
        company_name: Some("Haneul & Partners".to_string()),
        position: Some("Associate, M&A team".to_string()),
        interview_date: Some("2025-11-14".to_string()),
        interview_difficulty: Some(4),
        interview_experience: Some(3),
        interview_outcome: Some("accepted".to_string()),
        interview_process: Some("Two partner rounds and a written test".to_string()),
        interview_questions: Some("Walk through a recent deal".to_string()),
        advice: Some("Know the firm's sector focus".to_string()),
        lawyer_type: Some("corporate".to_string()),
        employment_terms: Some("regular".to_string()),
    }
}

pub(super) type TestService = ReviewService<MemoryReviews, MemoryProfiles, MemoryDirectory>;

pub(super) fn build_service(policy: SubmissionPolicy) -> (
    TestService,
    Arc<MemoryReviews>,
    Arc<MemoryProfiles>,
    Arc<MemoryDirectory>,
) {
    let reviews = Arc::new(MemoryReviews::default());
    let profiles = Arc::new(MemoryProfiles::default());
    let directory = Arc::new(MemoryDirectory::default());
    let service = ReviewService::new(
        reviews.clone(),
        profiles.clone(),
        directory.clone(),
        policy,
    );
    (service, reviews, profiles, directory)
}

pub(super) fn build_default_service() -> (
    TestService,
    Arc<MemoryReviews>,
    Arc<MemoryProfiles>,
    Arc<MemoryDirectory>,
) {
    build_service(SubmissionPolicy::default())
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
