//! Lawyer verification: the signup saga and the admin approval lifecycle.

pub mod domain;
pub mod repository;
pub mod router;
pub mod signup;
pub mod storage;
pub mod verification;

#[cfg(test)]
mod tests;

pub use domain::{LawyerProfile, ProfileId, VerificationDecision, VerificationStatus};
pub use repository::{LawyerProfileRepository, ProfileRepositoryError};
pub use router::{lawyer_router, LawyerGateway};
pub use signup::{LicenseUpload, SignupError, SignupOutcome, SignupRequest, SignupService};
pub use storage::{LicenseStore, StorageError, LICENSE_BUCKET};
pub use verification::{PendingVerificationView, VerificationError, VerificationService};
