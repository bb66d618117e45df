//! Review submission and moderation for a verified lawyer community.
//!
//! Members sign up with a license document, which an admin verifies before the
//! member may submit interview reviews. Company and interview reviews share a
//! single moderation lifecycle (pending, approved, rejected) with an owner
//! revision path out of rejection. All collaborators (auth provider, row
//! store, object store) are traits so the services can be exercised against
//! in-memory doubles.

pub mod config;
pub mod error;
pub mod gate;
pub mod identity;
pub mod lawyers;
pub mod reviews;
pub mod telemetry;
pub mod validate;
