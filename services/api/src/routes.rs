use axum::extract::{Path, Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use counselboard::gate::{self, GateDecision, GateSubject};
use counselboard::identity::{bearer_token, IdentityError};
use counselboard::lawyers::LawyerProfileRepository;
use counselboard::reviews::ReviewId;
use serde_json::json;

use crate::infra::{AppContext, AppState};

/// Compose the API routers with the gated page routes and the operational
/// endpoints.
pub(crate) fn app_router(context: AppContext, state: AppState, api: Router) -> Router {
    let pages = Router::new()
        .route("/reviews", get(reviews_page))
        .route("/reviews/company/new", get(company_form_page))
        .route("/reviews/interview/new", get(interview_form_page))
        .route("/reviews/revise/:review_id", get(revise_page))
        .route("/dashboard", get(dashboard_page))
        .route("/admin", get(admin_home_page))
        .route("/admin/reviews", get(admin_reviews_page))
        .route("/admin/approve-lawyers", get(admin_lawyers_page))
        .route_layer(middleware::from_fn_with_state(
            context.clone(),
            access_gate,
        ))
        .with_state(context);

    api.merge(pages)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .layer(Extension(state))
}

/// Route-level gate, applied to the page routes only. API handlers answer
/// with JSON errors instead of redirects and enforce the same rules in the
/// services.
pub(crate) async fn access_gate(
    State(context): State<AppContext>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let subject = gate_subject(&context, request.headers());
    match gate::evaluate(&path, subject.as_ref()) {
        GateDecision::Allow => next.run(request).await,
        GateDecision::Deny => (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "only approved lawyers can submit interview reviews" })),
        )
            .into_response(),
        decision => {
            let location = decision.location().unwrap_or_else(|| "/".to_string());
            (StatusCode::SEE_OTHER, [(header::LOCATION, location)]).into_response()
        }
    }
}

fn gate_subject(context: &AppContext, headers: &HeaderMap) -> Option<GateSubject> {
    let token = bearer_token(headers)?;
    match context.resolver.resolve(&token) {
        Ok(account) => {
            let verification = context
                .profiles
                .by_user(&account.id)
                .ok()
                .flatten()
                .map(|profile| profile.status);
            Some(GateSubject {
                is_admin: account.is_admin,
                verification,
            })
        }
        // A session that lost its account row still counts as signed in:
        // admin routes bounce it home, the review area lets the handler 401.
        Err(IdentityError::UserNotFound) => Some(GateSubject {
            is_admin: false,
            verification: None,
        }),
        Err(_) => None,
    }
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

async fn reviews_page(State(context): State<AppContext>, headers: HeaderMap) -> Response {
    let caller = match context.resolver.resolve_headers(&headers) {
        Ok(caller) => caller,
        Err(error) => return identity_error_response(error),
    };
    match context.reviews.list_public(&caller) {
        Ok(listing) => (
            StatusCode::OK,
            Json(json!({
                "reviews": listing,
                "write_links": ["/reviews/company/new", "/reviews/interview/new"],
            })),
        )
            .into_response(),
        Err(_) => failure_response(),
    }
}

async fn dashboard_page(State(context): State<AppContext>, headers: HeaderMap) -> Response {
    let caller = match context.resolver.resolve_headers(&headers) {
        Ok(caller) => caller,
        Err(error) => return identity_error_response(error),
    };
    match context.reviews.list_mine(&caller) {
        Ok(mine) => {
            let (company, interview): (Vec<_>, Vec<_>) =
                mine.into_iter().partition(|row| row.kind == "company");
            (
                StatusCode::OK,
                Json(json!({
                    "company_reviews": company,
                    "interview_reviews": interview,
                })),
            )
                .into_response()
        }
        Err(_) => failure_response(),
    }
}

async fn company_form_page(State(_context): State<AppContext>) -> Response {
    // The gate already required a session; company submission has no
    // verification precondition under the default policy.
    (
        StatusCode::OK,
        Json(json!({ "review_type": "company", "submit_to": "/api/v1/reviews/company" })),
    )
        .into_response()
}

async fn interview_form_page(State(_context): State<AppContext>) -> Response {
    // Reaching the handler means the gate saw an approved profile.
    (
        StatusCode::OK,
        Json(json!({ "review_type": "interview", "submit_to": "/api/v1/reviews/interview" })),
    )
        .into_response()
}

async fn revise_page(
    State(context): State<AppContext>,
    Path(review_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let caller = match context.resolver.resolve_headers(&headers) {
        Ok(caller) => caller,
        Err(error) => return identity_error_response(error),
    };
    let id = ReviewId(review_id);
    match context.reviews.fetch_own(&caller, &id) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(counselboard::reviews::ReviewError::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "review not found or you don't have permission to edit it"
            })),
        )
            .into_response(),
        Err(_) => failure_response(),
    }
}

async fn admin_home_page(State(_context): State<AppContext>) -> Response {
    (
        StatusCode::OK,
        Json(json!({ "sections": ["/admin/reviews", "/admin/approve-lawyers"] })),
    )
        .into_response()
}

async fn admin_reviews_page(State(context): State<AppContext>, headers: HeaderMap) -> Response {
    let caller = match context.resolver.resolve_headers(&headers) {
        Ok(caller) => caller,
        Err(error) => return identity_error_response(error),
    };
    match context.reviews.list_for_moderation(&caller) {
        Ok(listing) => (StatusCode::OK, Json(listing)).into_response(),
        Err(_) => failure_response(),
    }
}

async fn admin_lawyers_page(State(context): State<AppContext>, headers: HeaderMap) -> Response {
    let caller = match context.resolver.resolve_headers(&headers) {
        Ok(caller) => caller,
        Err(error) => return identity_error_response(error),
    };
    match context.verification.pending(&caller) {
        Ok(queue) => (StatusCode::OK, Json(queue)).into_response(),
        Err(_) => failure_response(),
    }
}

fn identity_error_response(error: IdentityError) -> Response {
    match error {
        IdentityError::Unauthorized | IdentityError::UserNotFound => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
        IdentityError::Auth(_) | IdentityError::Directory(_) => failure_response(),
    }
}

fn failure_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "an unexpected error occurred" })),
    )
        .into_response()
}
