//! Integration specifications for the review lifecycle: a rejected review is
//! revisable by its owner, returns to the moderation queue, and reaches the
//! public listing only once approved.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use counselboard::identity::{
        AuthId, DirectoryError, UserAccount, UserDirectory, UserId,
    };
    use counselboard::lawyers::{
        LawyerProfile, LawyerProfileRepository, ProfileId, ProfileRepositoryError,
        VerificationStatus,
    };
    use counselboard::reviews::{
        CompanyReviewDraft, InterviewReviewDraft, RepositoryError, ReviewId, ReviewRecord,
        ReviewRepository, ReviewService, ReviewStatus, SubmissionPolicy,
    };

    #[derive(Default)]
    pub struct StubReviews {
        rows: Mutex<HashMap<ReviewId, ReviewRecord>>,
    }

    impl ReviewRepository for StubReviews {
        fn insert(&self, record: ReviewRecord) -> Result<ReviewRecord, RepositoryError> {
            self.rows
                .lock()
                .expect("review mutex poisoned")
                .insert(record.id.clone(), record.clone());
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
            Ok(self
                .rows
                .lock()
                .expect("review mutex poisoned")
                .get(id)
                .cloned())
        }

        fn by_author(&self, author: &UserId) -> Result<Vec<ReviewRecord>, RepositoryError> {
            Ok(self
                .rows
                .lock()
                .expect("review mutex poisoned")
                .values()
                .filter(|record| &record.author == author)
                .cloned()
                .collect())
        }

        fn with_status(&self, status: ReviewStatus) -> Result<Vec<ReviewRecord>, RepositoryError> {
            Ok(self
                .rows
                .lock()
                .expect("review mutex poisoned")
                .values()
                .filter(|record| record.status == status)
                .cloned()
                .collect())
        }

        fn all(&self) -> Result<Vec<ReviewRecord>, RepositoryError> {
            Ok(self
                .rows
                .lock()
                .expect("review mutex poisoned")
                .values()
                .cloned()
                .collect())
        }
    }

    #[derive(Default)]
    pub struct StubProfiles {
        rows: Mutex<HashMap<ProfileId, LawyerProfile>>,
    }

    impl StubProfiles {
        pub fn seed_approved(&self, account: &UserAccount) {
            let profile = LawyerProfile {
                id: ProfileId(format!("profile-{}", account.id.0)),
                user_id: account.id.clone(),
                nickname: "counselor".to_string(),
                license_file: format!("{}-license.pdf", account.auth_id.0),
                status: VerificationStatus::Approved,
            };
            self.rows
                .lock()
                .expect("profile mutex poisoned")
                .insert(profile.id.clone(), profile);
        }
    }

    impl LawyerProfileRepository for StubProfiles {
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

        fn by_user(
            &self,
            user_id: &UserId,
        ) -> Result<Option<LawyerProfile>, ProfileRepositoryError> {
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
    pub struct StubDirectory {
        rows: Mutex<HashMap<UserId, UserAccount>>,
    }

    impl UserDirectory for StubDirectory {
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

    pub fn member() -> UserAccount {
        UserAccount {
            id: UserId("user-member".to_string()),
            auth_id: AuthId("auth-member".to_string()),
            email: "member@counselboard.dev".to_string(),
            is_admin: false,
        }
    }

    pub fn admin() -> UserAccount {
        UserAccount {
            id: UserId("user-admin".to_string()),
            auth_id: AuthId("auth-admin".to_string()),
            email: "admin@counselboard.dev".to_string(),
            is_admin: true,
        }
    }

    pub fn service() -> (
        ReviewService<StubReviews, StubProfiles, StubDirectory>,
        Arc<StubProfiles>,
        Arc<StubDirectory>,
    ) {
        let reviews = Arc::new(StubReviews::default());
        let profiles = Arc::new(StubProfiles::default());
        let directory = Arc::new(StubDirectory::default());
        let service = ReviewService::new(
            reviews,
            profiles.clone(),
            directory.clone(),
            SubmissionPolicy::default(),
        );
        (service, profiles, directory)
    }

    pub fn company_draft() -> CompanyReviewDraft {
        CompanyReviewDraft {
            company_name: Some("Haneul & Partners".to_string()),
            lawyer_type: Some("corporate".to_string()),
            employment_terms: Some("regular".to_string()),
            good_things: vec!["mentoring".to_string()],
            overall_rating: Some(4),
            work_life_balance: Some(3),
            salary_benefits: Some(4),
            career_growth: Some(5),
            culture_fit: Some(4),
            management: Some(3),
            overtime_frequency: Some("a few nights a month".to_string()),
            how_found: Some("colleague".to_string()),
            ..CompanyReviewDraft::default()
        }
    }

    pub fn interview_draft() -> InterviewReviewDraft {
        InterviewReviewDraft {
            company_name: Some("Haneul & Partners".to_string()),
            position: Some("Associate, M&A team".to_string()),
            interview_date: Some("2025-11-14".to_string()),
            interview_difficulty: Some(4),
            interview_experience: Some(3),
            interview_outcome: Some("accepted".to_string()),
            lawyer_type: Some("corporate".to_string()),
            employment_terms: Some("regular".to_string()),
            ..InterviewReviewDraft::default()
        }
    }
}

use common::{admin, company_draft, interview_draft, member, service};
use counselboard::identity::UserDirectory;
use counselboard::reviews::{ModerationDecision, ReviewDraft, ReviewStatus};

#[test]
fn rejected_reviews_travel_back_through_revision_to_approval() {
    let (service, _profiles, directory) = service();
    directory.insert(member()).expect("account stored");

    let record = service
        .submit_company(&member(), company_draft())
        .expect("submission succeeds");
    assert_eq!(record.status, ReviewStatus::Pending);

    // Admin rejects; the owner's dashboard now offers a revise action.
    service
        .moderate(&admin(), &record.id, ModerationDecision::Rejected)
        .expect("rejection succeeds");
    let mine = service.list_mine(&member()).expect("dashboard loads");
    assert_eq!(mine.len(), 1);
    assert!(mine[0].revisable);

    // Nothing rejected or pending leaks into the public listing.
    assert!(service
        .list_public(&member())
        .expect("listing loads")
        .is_empty());

    // Owner revises; the review re-enters the moderation queue as pending.
    let mut draft = company_draft();
    draft.cons = Some("Added the detail moderation asked for".to_string());
    let revised = service
        .revise(&member(), &record.id, ReviewDraft::Company(draft))
        .expect("revision succeeds");
    assert_eq!(revised.status, ReviewStatus::Pending);

    let queue = service
        .list_for_moderation(&admin())
        .expect("queue loads");
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].status, "pending");
    assert_eq!(queue[0].author_email, "member@counselboard.dev");

    // Approval publishes it.
    service
        .moderate(&admin(), &record.id, ModerationDecision::Approved)
        .expect("approval succeeds");
    let listing = service.list_public(&member()).expect("listing loads");
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].company_name, "Haneul & Partners");

    // And once approved, no revision path remains.
    assert!(service
        .revise(&member(), &record.id, ReviewDraft::Company(company_draft()))
        .is_err());
}

#[test]
fn interview_reviews_join_the_same_lifecycle_once_verified() {
    let (service, profiles, directory) = service();
    directory.insert(member()).expect("account stored");

    // Unverified members are turned away with nothing written.
    assert!(service.submit_interview(&member(), interview_draft()).is_err());

    profiles.seed_approved(&member());
    let record = service
        .submit_interview(&member(), interview_draft())
        .expect("verified member can submit");

    service
        .moderate(&admin(), &record.id, ModerationDecision::Approved)
        .expect("approval succeeds");
    let listing = service.list_public(&member()).expect("listing loads");
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].kind, "interview");
    assert_eq!(listing[0].position.as_deref(), Some("Associate, M&A team"));
}
