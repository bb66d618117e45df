use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::UserId;

/// Identifier wrapper for submitted reviews; both variants share one space.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReviewId(pub String);

/// Moderation state of a review.
///
/// `approved` is terminal. `rejected` is not: the owner may revise the
/// payload, which moves the review back to `pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Approved => "approved",
            ReviewStatus::Rejected => "rejected",
        }
    }

    pub const fn revisable(self) -> bool {
        matches!(self, ReviewStatus::Rejected)
    }
}

/// Admin outcome for a pending review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationDecision {
    Approved,
    Rejected,
}

impl ModerationDecision {
    pub const fn status(self) -> ReviewStatus {
        match self {
            ModerationDecision::Approved => ReviewStatus::Approved,
            ModerationDecision::Rejected => ReviewStatus::Rejected,
        }
    }
}

/// Practice setting the reviewer worked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PracticeArea {
    Corporate,
    InHouse,
}

impl PracticeArea {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "corporate" => Some(PracticeArea::Corporate),
            "in_house" => Some(PracticeArea::InHouse),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            PracticeArea::Corporate => "corporate",
            PracticeArea::InHouse => "in_house",
        }
    }
}

/// Employment arrangement at the reviewed firm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentTerm {
    Regular,
    PartTime,
    Other,
}

impl EmploymentTerm {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "regular" => Some(EmploymentTerm::Regular),
            "part_time" => Some(EmploymentTerm::PartTime),
            "other" => Some(EmploymentTerm::Other),
            _ => None,
        }
    }
}

/// Basis the reported salary figure is quoted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalaryBasis {
    Annual,
    Monthly,
}

impl SalaryBasis {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "annual" => Some(SalaryBasis::Annual),
            "monthly" => Some(SalaryBasis::Monthly),
            _ => None,
        }
    }
}

/// How the interview ended for the candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewOutcome {
    Accepted,
    Rejected,
    Pending,
    Withdrew,
}

impl InterviewOutcome {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "accepted" => Some(InterviewOutcome::Accepted),
            "rejected" => Some(InterviewOutcome::Rejected),
            "pending" => Some(InterviewOutcome::Pending),
            "withdrew" => Some(InterviewOutcome::Withdrew),
            _ => None,
        }
    }
}

/// A 1-5 rating as captured by the submission sliders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

/// Raw company-review submission as it arrives from the form.
///
/// Everything is optional at the wire level so the validator can report every
/// missing or malformed field in one pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyReviewDraft {
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub lawyer_type: Option<String>,
    #[serde(default)]
    pub employment_terms: Option<String>,
    #[serde(default)]
    pub good_things: Vec<String>,
    #[serde(default)]
    pub other_good_things: Option<String>,
    #[serde(default)]
    pub overall_rating: Option<u8>,
    #[serde(default)]
    pub work_life_balance: Option<u8>,
    #[serde(default)]
    pub salary_benefits: Option<u8>,
    #[serde(default)]
    pub career_growth: Option<u8>,
    #[serde(default)]
    pub culture_fit: Option<u8>,
    #[serde(default)]
    pub management: Option<u8>,
    #[serde(default)]
    pub pros: Option<String>,
    #[serde(default)]
    pub cons: Option<String>,
    #[serde(default)]
    pub additional_comments: Option<String>,
    #[serde(default)]
    pub overtime_frequency: Option<String>,
    #[serde(default)]
    pub overtime_comments: Option<String>,
    #[serde(default)]
    pub years_of_experience: Option<String>,
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(default)]
    pub salary_type: Option<String>,
    #[serde(default)]
    pub free_opinion: Option<String>,
    #[serde(default)]
    pub how_found: Option<String>,
    #[serde(default)]
    pub other_how_found: Option<String>,
}

/// Raw interview-review submission as it arrives from the form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterviewReviewDraft {
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    /// YYYY-MM-DD.
    #[serde(default)]
    pub interview_date: Option<String>,
    #[serde(default)]
    pub interview_difficulty: Option<u8>,
    #[serde(default)]
    pub interview_experience: Option<u8>,
    #[serde(default)]
    pub interview_outcome: Option<String>,
    #[serde(default)]
    pub interview_process: Option<String>,
    #[serde(default)]
    pub interview_questions: Option<String>,
    #[serde(default)]
    pub advice: Option<String>,
    #[serde(default)]
    pub lawyer_type: Option<String>,
    #[serde(default)]
    pub employment_terms: Option<String>,
}

/// Revision body for either variant; the variant may not change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReviewDraft {
    Company(CompanyReviewDraft),
    Interview(InterviewReviewDraft),
}

/// The six rating dimensions of a company review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRatings {
    pub overall: Rating,
    pub work_life_balance: Rating,
    pub salary_benefits: Rating,
    pub career_growth: Rating,
    pub culture_fit: Rating,
    pub management: Rating,
}

/// Validated company-review payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyReviewPayload {
    pub company_name: String,
    pub practice_area: PracticeArea,
    pub employment_terms: EmploymentTerm,
    /// Positives the reviewer picked; an "other" entry is replaced by the
    /// reviewer's own wording during validation.
    pub highlights: Vec<String>,
    pub ratings: CompanyRatings,
    pub pros: Option<String>,
    pub cons: Option<String>,
    pub additional_comments: Option<String>,
    pub overtime_frequency: String,
    pub overtime_comments: Option<String>,
    pub years_of_experience: Option<u16>,
    pub salary: Option<u32>,
    pub salary_basis: Option<SalaryBasis>,
    pub free_opinion: Option<String>,
    pub referral_source: String,
    /// Only kept when `referral_source` is "etc".
    pub referral_detail: Option<String>,
}

/// Validated interview-review payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewReviewPayload {
    pub company_name: String,
    pub position: String,
    pub interview_date: NaiveDate,
    pub difficulty: Rating,
    pub experience: Rating,
    pub outcome: InterviewOutcome,
    pub process: Option<String>,
    pub questions: Option<String>,
    pub advice: Option<String>,
    pub practice_area: PracticeArea,
    pub employment_terms: EmploymentTerm,
}

/// The two review variants sharing one moderation lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewKind {
    Company,
    Interview,
}

impl ReviewKind {
    pub const fn label(self) -> &'static str {
        match self {
            ReviewKind::Company => "company",
            ReviewKind::Interview => "interview",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReviewPayload {
    Company(CompanyReviewPayload),
    Interview(InterviewReviewPayload),
}

impl ReviewPayload {
    pub const fn kind(&self) -> ReviewKind {
        match self {
            ReviewPayload::Company(_) => ReviewKind::Company,
            ReviewPayload::Interview(_) => ReviewKind::Interview,
        }
    }

    pub fn company_name(&self) -> &str {
        match self {
            ReviewPayload::Company(payload) => &payload.company_name,
            ReviewPayload::Interview(payload) => &payload.company_name,
        }
    }

    pub fn position(&self) -> Option<&str> {
        match self {
            ReviewPayload::Company(_) => None,
            ReviewPayload::Interview(payload) => Some(&payload.position),
        }
    }

    /// The rating a listing leads with: overall for company reviews,
    /// interview experience for interview reviews.
    pub fn headline_rating(&self) -> Rating {
        match self {
            ReviewPayload::Company(payload) => payload.ratings.overall,
            ReviewPayload::Interview(payload) => payload.experience,
        }
    }
}

/// A stored review with its moderation state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub id: ReviewId,
    pub author: UserId,
    pub payload: ReviewPayload,
    pub status: ReviewStatus,
    pub submitted_at: DateTime<Utc>,
}
