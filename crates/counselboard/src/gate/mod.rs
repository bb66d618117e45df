//! Route-level access decisions.
//!
//! A pure predicate over (path, caller) so the HTTP layer can translate the
//! outcome into redirects or denials without re-deriving policy, and tests
//! can cover the rules without a server.

use crate::lawyers::VerificationStatus;

/// Coarse route families the gate distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Admin,
    InterviewSubmission,
    ReviewArea,
    Open,
}

/// What the gate knows about the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateSubject {
    pub is_admin: bool,
    pub verification: Option<VerificationStatus>,
}

/// Outcome of evaluating a request against the gate rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    RedirectToLogin { next: Option<String> },
    RedirectHome,
    Deny,
}

impl GateDecision {
    /// Location header value for redirect outcomes.
    pub fn location(&self) -> Option<String> {
        match self {
            GateDecision::RedirectToLogin { next: Some(next) } => {
                Some(format!("/login?next={next}"))
            }
            GateDecision::RedirectToLogin { next: None } => Some("/login".to_string()),
            GateDecision::RedirectHome => Some("/".to_string()),
            GateDecision::Allow | GateDecision::Deny => None,
        }
    }
}

pub fn classify(path: &str) -> RouteClass {
    if path == "/admin" || path.starts_with("/admin/") {
        return RouteClass::Admin;
    }
    if path == "/reviews/interview/new" {
        return RouteClass::InterviewSubmission;
    }
    if path == "/reviews"
        || path.starts_with("/reviews/")
        || path == "/dashboard"
        || path.starts_with("/dashboard/")
    {
        return RouteClass::ReviewArea;
    }
    RouteClass::Open
}

/// Evaluate the gate for `path`. Admin rules take precedence, then the
/// review area, then the interview-specific verification requirement.
pub fn evaluate(path: &str, subject: Option<&GateSubject>) -> GateDecision {
    match classify(path) {
        RouteClass::Admin => match subject {
            None => GateDecision::RedirectToLogin { next: None },
            Some(subject) if !subject.is_admin => GateDecision::RedirectHome,
            Some(_) => GateDecision::Allow,
        },
        RouteClass::InterviewSubmission => match subject {
            None => GateDecision::RedirectToLogin {
                next: Some(path.to_string()),
            },
            Some(subject) if subject.verification != Some(VerificationStatus::Approved) => {
                GateDecision::Deny
            }
            Some(_) => GateDecision::Allow,
        },
        RouteClass::ReviewArea => match subject {
            None => GateDecision::RedirectToLogin {
                next: Some(path.to_string()),
            },
            Some(_) => GateDecision::Allow,
        },
        RouteClass::Open => GateDecision::Allow,
    }
}
