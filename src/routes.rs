use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{protected, public};
use crate::state::AppState;

/// Full application router with global middleware
pub fn app(state: AppState) -> Router {
    let api = &state.config.api;
    let middleware = ServiceBuilder::new()
        .layer(cors_layer(&state.config.security.cors_origins))
        .layer(DefaultBodyLimit::max(api.max_request_size_bytes));
    let request_logging = api.enable_request_logging;

    let router = Router::new()
        .route("/", get(public::root::root))
        .route("/health", get(public::root::health))
        .merge(session_routes())
        .merge(job_routes())
        .merge(application_routes())
        .with_state(state)
        .layer(middleware);

    if request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

fn session_routes() -> Router<AppState> {
    use public::session;

    Router::new()
        .route("/jwt", post(session::issue))
        .route("/logout", post(session::logout))
}

fn job_routes() -> Router<AppState> {
    use public::jobs;

    Router::new()
        .route("/jobs", get(jobs::list).post(jobs::create))
        .route("/jobs/:id", get(jobs::get))
        // Filtered search lives on the singular path
        .route("/job", get(jobs::search))
}

fn application_routes() -> Router<AppState> {
    Router::new()
        .route("/job-applications", post(public::applications::create))
        .route("/job-applications/jobs/:id", get(public::applications::list_for_job))
        // Session required
        .route("/job-application", get(protected::applications::list_for_applicant))
}

/// Credentialed CORS for the configured frontend origins only
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            // Wildcards cannot be combined with credentials
            Ok(value) if value == "*" => {
                tracing::warn!("Ignoring wildcard CORS origin; list origins explicitly");
                None
            }
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}
