use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum_prometheus::PrometheusMetricLayer;
use counselboard::config::AppConfig;
use counselboard::error::AppError;
use counselboard::lawyers::{lawyer_router, LawyerGateway};
use counselboard::reviews::{review_router, ReviewGateway};
use counselboard::telemetry;
use tracing::info;

use crate::cli::ServeArgs;
use crate::infra::{self, AppState};
use crate::routes::app_router;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let backing = infra::backing();
    if let Some(seed) = &config.admin_seed {
        if infra::seed_admin(&backing, &seed.email, &seed.password).is_some() {
            info!(email = %seed.email, "seeded administrator account");
        }
    }

    let policy = config.submissions.policy();
    let license_url_ttl = config.submissions.license_url_ttl_secs;

    let review_gateway = Arc::new(ReviewGateway {
        resolver: infra::resolver(&backing),
        service: infra::review_service(&backing, policy),
    });
    let lawyer_gateway = Arc::new(LawyerGateway {
        resolver: infra::resolver(&backing),
        signup: infra::signup_service(&backing),
        verification: infra::verification_service(&backing, license_url_ttl),
        auth: backing.auth.clone(),
    });
    let context = infra::app_context(&backing, policy, license_url_ttl);

    let api = review_router(review_gateway).merge(lawyer_router(lawyer_gateway));
    let app = app_router(context, app_state, api).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "counselboard review service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
