use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::json;

use super::domain::{ProfileId, VerificationDecision};
use super::repository::LawyerProfileRepository;
use super::signup::{LicenseUpload, SignupError, SignupRequest, SignupService};
use super::storage::LicenseStore;
use super::verification::{VerificationError, VerificationService};
use crate::identity::{
    bearer_token, AuthError, AuthProvider, IdentityError, IdentityResolver, UserDirectory,
};
use crate::validate::ValidationFailed;

/// Shared state behind the signup/login/verification endpoints.
pub struct LawyerGateway<A, U, P, S> {
    pub resolver: IdentityResolver<A, U>,
    pub signup: SignupService<A, U, P, S>,
    pub verification: VerificationService<P, U, S>,
    pub auth: Arc<A>,
}

/// Router exposing signup, session, and admin verification endpoints.
pub fn lawyer_router<A, U, P, S>(gateway: Arc<LawyerGateway<A, U, P, S>>) -> Router
where
    A: AuthProvider + 'static,
    U: UserDirectory + 'static,
    P: LawyerProfileRepository + 'static,
    S: LicenseStore + 'static,
{
    Router::new()
        .route("/api/v1/signup", post(signup_handler::<A, U, P, S>))
        .route("/api/v1/login", post(login_handler::<A, U, P, S>))
        .route("/api/v1/logout", post(logout_handler::<A, U, P, S>))
        .route(
            "/api/v1/admin/lawyers/pending",
            get(pending_handler::<A, U, P, S>),
        )
        .route(
            "/api/v1/admin/lawyers/:profile_id/decision",
            post(decide_handler::<A, U, P, S>),
        )
        .with_state(gateway)
}

#[derive(Debug, Deserialize)]
pub struct SignupBody {
    pub email: String,
    pub password: String,
    pub nickname: String,
    pub license: LicenseBody,
}

#[derive(Debug, Deserialize)]
pub struct LicenseBody {
    pub file_name: String,
    pub content_base64: String,
}

#[derive(Debug, Deserialize)]
struct CredentialsBody {
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct DecisionBody {
    status: VerificationDecision,
}

async fn signup_handler<A, U, P, S>(
    State(gateway): State<Arc<LawyerGateway<A, U, P, S>>>,
    Json(body): Json<SignupBody>,
) -> Response
where
    A: AuthProvider + 'static,
    U: UserDirectory + 'static,
    P: LawyerProfileRepository + 'static,
    S: LicenseStore + 'static,
{
    let bytes = match BASE64.decode(body.license.content_base64.as_bytes()) {
        Ok(bytes) => bytes,
        Err(_) => {
            let failed = ValidationFailed::single("license", "must be base64 encoded");
            return validation_response(failed);
        }
    };

    let request = SignupRequest {
        email: body.email,
        password: body.password,
        nickname: body.nickname,
        license: LicenseUpload {
            file_name: body.license.file_name,
            bytes,
        },
    };

    match gateway.signup.sign_up(request) {
        Ok(outcome) => (
            StatusCode::CREATED,
            Json(json!({
                "user_id": outcome.account.id,
                "profile_id": outcome.profile.id,
                "status": outcome.profile.status.label(),
            })),
        )
            .into_response(),
        Err(SignupError::Validation(failed)) => validation_response(failed),
        Err(SignupError::Auth(AuthError::DuplicateEmail)) => (
            StatusCode::CONFLICT,
            Json(json!({ "error": "email already registered" })),
        )
            .into_response(),
        Err(_) => upstream_response(),
    }
}

async fn login_handler<A, U, P, S>(
    State(gateway): State<Arc<LawyerGateway<A, U, P, S>>>,
    Json(body): Json<CredentialsBody>,
) -> Response
where
    A: AuthProvider + 'static,
    U: UserDirectory + 'static,
    P: LawyerProfileRepository + 'static,
    S: LicenseStore + 'static,
{
    match gateway.auth.sign_in(&body.email, &body.password) {
        Ok(session) => (StatusCode::OK, Json(json!({ "token": session.token.0 }))).into_response(),
        Err(AuthError::InvalidCredentials) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "invalid email or password" })),
        )
            .into_response(),
        Err(_) => upstream_response(),
    }
}

async fn logout_handler<A, U, P, S>(
    State(gateway): State<Arc<LawyerGateway<A, U, P, S>>>,
    headers: HeaderMap,
) -> Response
where
    A: AuthProvider + 'static,
    U: UserDirectory + 'static,
    P: LawyerProfileRepository + 'static,
    S: LicenseStore + 'static,
{
    let Some(token) = bearer_token(&headers) else {
        return identity_error_response(IdentityError::Unauthorized);
    };
    match gateway.auth.sign_out(&token) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(_) => upstream_response(),
    }
}

async fn pending_handler<A, U, P, S>(
    State(gateway): State<Arc<LawyerGateway<A, U, P, S>>>,
    headers: HeaderMap,
) -> Response
where
    A: AuthProvider + 'static,
    U: UserDirectory + 'static,
    P: LawyerProfileRepository + 'static,
    S: LicenseStore + 'static,
{
    let caller = match gateway.resolver.resolve_headers(&headers) {
        Ok(caller) => caller,
        Err(error) => return identity_error_response(error),
    };
    match gateway.verification.pending(&caller) {
        Ok(queue) => (StatusCode::OK, Json(queue)).into_response(),
        Err(error) => verification_error_response(error),
    }
}

async fn decide_handler<A, U, P, S>(
    State(gateway): State<Arc<LawyerGateway<A, U, P, S>>>,
    Path(profile_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<DecisionBody>,
) -> Response
where
    A: AuthProvider + 'static,
    U: UserDirectory + 'static,
    P: LawyerProfileRepository + 'static,
    S: LicenseStore + 'static,
{
    let caller = match gateway.resolver.resolve_headers(&headers) {
        Ok(caller) => caller,
        Err(error) => return identity_error_response(error),
    };
    let id = ProfileId(profile_id);
    match gateway.verification.decide(&caller, &id, body.status) {
        Ok(profile) => (
            StatusCode::OK,
            Json(json!({
                "profile_id": profile.id,
                "status": profile.status.label(),
            })),
        )
            .into_response(),
        Err(error) => verification_error_response(error),
    }
}

fn validation_response(failed: ValidationFailed) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "invalid data", "details": failed.fields })),
    )
        .into_response()
}

fn upstream_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "an unexpected error occurred" })),
    )
        .into_response()
}

fn identity_error_response(error: IdentityError) -> Response {
    match error {
        IdentityError::Unauthorized => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "no valid session" })),
        )
            .into_response(),
        IdentityError::UserNotFound => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "user not found" })),
        )
            .into_response(),
        IdentityError::Auth(_) | IdentityError::Directory(_) => upstream_response(),
    }
}

fn verification_error_response(error: VerificationError) -> Response {
    match error {
        VerificationError::Forbidden => (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "administrator access required" })),
        )
            .into_response(),
        VerificationError::NotFound => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "profile not found" })),
        )
            .into_response(),
        VerificationError::AlreadyDecided { .. } => {
            (StatusCode::CONFLICT, Json(json!({ "error": error.to_string() }))).into_response()
        }
        VerificationError::Repository(_) | VerificationError::Directory(_) => upstream_response(),
    }
}
