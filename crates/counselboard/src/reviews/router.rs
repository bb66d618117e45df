use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use super::domain::{CompanyReviewDraft, InterviewReviewDraft, ModerationDecision, ReviewDraft, ReviewId};
use super::repository::ReviewRepository;
use super::service::{ReviewError, ReviewService};
use crate::identity::{AuthProvider, IdentityError, IdentityResolver, UserDirectory};
use crate::lawyers::LawyerProfileRepository;

/// Shared state behind the review endpoints.
pub struct ReviewGateway<A, U, R, P> {
    pub resolver: IdentityResolver<A, U>,
    pub service: ReviewService<R, P, U>,
}

/// Router exposing submission, revision, moderation, and listing endpoints.
pub fn review_router<A, U, R, P>(gateway: Arc<ReviewGateway<A, U, R, P>>) -> Router
where
    A: AuthProvider + 'static,
    U: UserDirectory + 'static,
    R: ReviewRepository + 'static,
    P: LawyerProfileRepository + 'static,
{
    Router::new()
        .route("/api/v1/reviews", get(public_list_handler::<A, U, R, P>))
        .route("/api/v1/reviews/mine", get(own_list_handler::<A, U, R, P>))
        .route(
            "/api/v1/reviews/company",
            post(submit_company_handler::<A, U, R, P>),
        )
        .route(
            "/api/v1/reviews/interview",
            post(submit_interview_handler::<A, U, R, P>),
        )
        .route(
            "/api/v1/reviews/:review_id",
            get(fetch_own_handler::<A, U, R, P>).put(revise_handler::<A, U, R, P>),
        )
        .route(
            "/api/v1/admin/reviews",
            get(moderation_list_handler::<A, U, R, P>),
        )
        .route(
            "/api/v1/admin/reviews/:review_id/decision",
            post(moderate_handler::<A, U, R, P>),
        )
        .with_state(gateway)
}

#[derive(Debug, serde::Deserialize)]
struct DecisionBody {
    status: ModerationDecision,
}

async fn submit_company_handler<A, U, R, P>(
    State(gateway): State<Arc<ReviewGateway<A, U, R, P>>>,
    headers: HeaderMap,
    Json(draft): Json<CompanyReviewDraft>,
) -> Response
where
    A: AuthProvider + 'static,
    U: UserDirectory + 'static,
    R: ReviewRepository + 'static,
    P: LawyerProfileRepository + 'static,
{
    let caller = match gateway.resolver.resolve_headers(&headers) {
        Ok(caller) => caller,
        Err(error) => return identity_error_response(error),
    };
    match gateway.service.submit_company(&caller, draft) {
        Ok(record) => submitted_response(record.id),
        Err(error) => review_error_response(error),
    }
}

async fn submit_interview_handler<A, U, R, P>(
    State(gateway): State<Arc<ReviewGateway<A, U, R, P>>>,
    headers: HeaderMap,
    Json(draft): Json<InterviewReviewDraft>,
) -> Response
where
    A: AuthProvider + 'static,
    U: UserDirectory + 'static,
    R: ReviewRepository + 'static,
    P: LawyerProfileRepository + 'static,
{
    let caller = match gateway.resolver.resolve_headers(&headers) {
        Ok(caller) => caller,
        Err(error) => return identity_error_response(error),
    };
    match gateway.service.submit_interview(&caller, draft) {
        Ok(record) => submitted_response(record.id),
        Err(error) => review_error_response(error),
    }
}

async fn revise_handler<A, U, R, P>(
    State(gateway): State<Arc<ReviewGateway<A, U, R, P>>>,
    Path(review_id): Path<String>,
    headers: HeaderMap,
    Json(draft): Json<ReviewDraft>,
) -> Response
where
    A: AuthProvider + 'static,
    U: UserDirectory + 'static,
    R: ReviewRepository + 'static,
    P: LawyerProfileRepository + 'static,
{
    let caller = match gateway.resolver.resolve_headers(&headers) {
        Ok(caller) => caller,
        Err(error) => return identity_error_response(error),
    };
    let id = ReviewId(review_id);
    match gateway.service.revise(&caller, &id, draft) {
        Ok(record) => (
            StatusCode::OK,
            Json(json!({
                "id": record.id,
                "status": record.status.label(),
                "redirect_to": "/reviews/submitted",
            })),
        )
            .into_response(),
        Err(error) => review_error_response(error),
    }
}

async fn fetch_own_handler<A, U, R, P>(
    State(gateway): State<Arc<ReviewGateway<A, U, R, P>>>,
    Path(review_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    A: AuthProvider + 'static,
    U: UserDirectory + 'static,
    R: ReviewRepository + 'static,
    P: LawyerProfileRepository + 'static,
{
    let caller = match gateway.resolver.resolve_headers(&headers) {
        Ok(caller) => caller,
        Err(error) => return identity_error_response(error),
    };
    let id = ReviewId(review_id);
    match gateway.service.fetch_own(&caller, &id) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(error) => review_error_response(error),
    }
}

async fn own_list_handler<A, U, R, P>(
    State(gateway): State<Arc<ReviewGateway<A, U, R, P>>>,
    headers: HeaderMap,
) -> Response
where
    A: AuthProvider + 'static,
    U: UserDirectory + 'static,
    R: ReviewRepository + 'static,
    P: LawyerProfileRepository + 'static,
{
    let caller = match gateway.resolver.resolve_headers(&headers) {
        Ok(caller) => caller,
        Err(error) => return identity_error_response(error),
    };
    match gateway.service.list_mine(&caller) {
        Ok(views) => (StatusCode::OK, Json(views)).into_response(),
        Err(error) => review_error_response(error),
    }
}

async fn public_list_handler<A, U, R, P>(
    State(gateway): State<Arc<ReviewGateway<A, U, R, P>>>,
    headers: HeaderMap,
) -> Response
where
    A: AuthProvider + 'static,
    U: UserDirectory + 'static,
    R: ReviewRepository + 'static,
    P: LawyerProfileRepository + 'static,
{
    let caller = match gateway.resolver.resolve_headers(&headers) {
        Ok(caller) => caller,
        Err(error) => return identity_error_response(error),
    };
    match gateway.service.list_public(&caller) {
        Ok(views) => (StatusCode::OK, Json(views)).into_response(),
        Err(error) => review_error_response(error),
    }
}

async fn moderation_list_handler<A, U, R, P>(
    State(gateway): State<Arc<ReviewGateway<A, U, R, P>>>,
    headers: HeaderMap,
) -> Response
where
    A: AuthProvider + 'static,
    U: UserDirectory + 'static,
    R: ReviewRepository + 'static,
    P: LawyerProfileRepository + 'static,
{
    let caller = match gateway.resolver.resolve_headers(&headers) {
        Ok(caller) => caller,
        Err(error) => return identity_error_response(error),
    };
    match gateway.service.list_for_moderation(&caller) {
        Ok(views) => (StatusCode::OK, Json(views)).into_response(),
        Err(error) => review_error_response(error),
    }
}

async fn moderate_handler<A, U, R, P>(
    State(gateway): State<Arc<ReviewGateway<A, U, R, P>>>,
    Path(review_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<DecisionBody>,
) -> Response
where
    A: AuthProvider + 'static,
    U: UserDirectory + 'static,
    R: ReviewRepository + 'static,
    P: LawyerProfileRepository + 'static,
{
    let caller = match gateway.resolver.resolve_headers(&headers) {
        Ok(caller) => caller,
        Err(error) => return identity_error_response(error),
    };
    let id = ReviewId(review_id);
    match gateway.service.moderate(&caller, &id, body.status) {
        Ok(record) => (
            StatusCode::OK,
            Json(json!({
                "id": record.id,
                "status": record.status.label(),
            })),
        )
            .into_response(),
        Err(error) => review_error_response(error),
    }
}

fn submitted_response(id: ReviewId) -> Response {
    (
        StatusCode::CREATED,
        Json(json!({
            "id": id,
            "status": "pending",
            "redirect_to": "/reviews/submitted",
        })),
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

fn review_error_response(error: ReviewError) -> Response {
    match error {
        ReviewError::Validation(failed) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid data", "details": failed.fields })),
        )
            .into_response(),
        ReviewError::Forbidden => (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "not allowed" })),
        )
            .into_response(),
        ReviewError::NotFound => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "review not found" })),
        )
            .into_response(),
        ReviewError::NotRevisable { .. } | ReviewError::InvalidTransition { .. } => (
            StatusCode::CONFLICT,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
        ReviewError::KindMismatch => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
        ReviewError::Repository(_) | ReviewError::Directory(_) | ReviewError::Profiles(_) => {
            upstream_response()
        }
    }
}

fn upstream_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "an unexpected error occurred" })),
    )
        .into_response()
}
