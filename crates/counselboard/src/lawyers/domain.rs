use serde::{Deserialize, Serialize};

use crate::identity::UserId;

/// Identifier wrapper for lawyer verification profiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfileId(pub String);

/// Verification state a profile moves through after signup.
///
/// `approved` and `rejected` are terminal; there is no path back to
/// `pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Pending,
    Approved,
    Rejected,
}

impl VerificationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Approved => "approved",
            VerificationStatus::Rejected => "rejected",
        }
    }

    pub const fn is_terminal(self) -> bool {
        !matches!(self, VerificationStatus::Pending)
    }
}

/// Admin outcome for a pending profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationDecision {
    Approved,
    Rejected,
}

impl VerificationDecision {
    pub const fn status(self) -> VerificationStatus {
        match self {
            VerificationDecision::Approved => VerificationStatus::Approved,
            VerificationDecision::Rejected => VerificationStatus::Rejected,
        }
    }
}

/// Per-user verification record created by the signup saga.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LawyerProfile {
    pub id: ProfileId,
    pub user_id: UserId,
    pub nickname: String,
    /// Path of the license document inside the license bucket.
    pub license_file: String,
    pub status: VerificationStatus,
}
