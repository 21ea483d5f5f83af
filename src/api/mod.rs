use axum::{Router, middleware, routing::get};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::Config;
use crate::services::{AuthService, FeedbackService};
use crate::state::SharedState;

mod assets;
mod auth;
pub mod context;
mod dashboard;
mod error;
mod feedback;
pub mod flash;
mod home;
mod observability;
mod pages;

pub use context::RequestContext;
pub use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<dyn AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn feedback_service(&self) -> &Arc<dyn FeedbackService> {
        &self.shared.feedback_service
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

/// Session store sharing the application's sqlite pool.
pub async fn session_store(state: &AppState) -> anyhow::Result<SqliteStore> {
    let pool = state.store().conn.get_sqlite_connection_pool().clone();
    let store = SqliteStore::new(pool);
    store.migrate().await?;
    Ok(store)
}

pub fn router(state: Arc<AppState>, session_store: SqliteStore) -> Router {
    let server = &state.config().server;
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(server.secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            server.session_inactivity_minutes,
        )));

    let pages = Router::new()
        .route("/", get(home::index))
        .route("/register/", get(auth::register_form).post(auth::register))
        .route("/login/", get(auth::login_form).post(auth::login))
        .route("/logout/", get(auth::logout).post(auth::logout))
        .route("/feedback_form", get(feedback::form))
        .route(
            "/feedback/submit",
            get(feedback::submit_redirect).post(feedback::submit),
        )
        .route("/my/feedback/", get(feedback::my_feedback))
        .route(
            "/update/feedback/{id}/",
            get(feedback::edit).post(feedback::update),
        )
        .route(
            "/delete/feedback/{id}/",
            get(feedback::confirm_delete).post(feedback::delete),
        )
        .route("/dashboard", get(dashboard::index))
        .route(
            "/dashboard/feedback/{id}/reply/",
            get(dashboard::reply_form).post(dashboard::reply),
        )
        .layer(session_layer);

    Router::new()
        .merge(pages)
        .route("/static/{*path}", get(assets::serve_asset))
        .route("/metrics", get(observability::get_metrics))
        .fallback(home::not_found)
        .with_state(state)
        .layer(middleware::from_fn(observability::security_headers_middleware))
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Builds the full application router, preparing the session table first.
pub async fn build_router(state: Arc<AppState>) -> anyhow::Result<Router> {
    let store = session_store(&state).await?;
    Ok(router(state, store))
}
