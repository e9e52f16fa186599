use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::Context;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Redirect,
    routing::{delete, get, post},
    Json, Router,
};
use clap::Parser;
use serde::Deserialize;
use server_api::{
    activities_route, list_activities, participants_route, signup, signup_route, unregister,
    ApiContext,
};
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{ActivitiesResponse, MessageResponse},
};
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;
mod seed;

use app_state::AppState;
use config::load_settings;
use seed::build_roster;

/// Activity signup service.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Address to listen on; overrides server.toml and the environment.
    #[arg(long)]
    bind: Option<String>,
    /// Directory served under /static.
    #[arg(long)]
    static_dir: Option<PathBuf>,
    /// TOML file with the activities to seed the roster with.
    #[arg(long)]
    seed_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct EmailQuery {
    email: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings();
    if let Some(bind) = cli.bind {
        settings.server_bind = bind;
    }
    if let Some(dir) = cli.static_dir {
        settings.static_dir = dir;
    }
    if let Some(file) = cli.seed_file {
        settings.seed_file = Some(file);
    }

    let roster = build_roster(settings.seed_file.as_deref())?;
    if !settings.static_dir.is_dir() {
        warn!(
            static_dir = %settings.static_dir.display(),
            "static directory not found; front end and favicon will return 404"
        );
    }

    let state = AppState {
        api: ApiContext::new(roster),
        static_dir: settings.static_dir,
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings
        .server_bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.server_bind))?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

fn build_router(state: Arc<AppState>) -> Router {
    let favicon = ServeFile::new(state.static_dir.join("favicon.ico"));
    let static_files = ServeDir::new(&state.static_dir);

    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route(activities_route(), get(http_list_activities))
        .route(signup_route(), post(http_signup))
        .route(participants_route(), delete(http_unregister))
        .route_service("/favicon.ico", favicon)
        .nest_service("/static", static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index() -> Redirect {
    Redirect::temporary("/static/index.html")
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_list_activities(State(state): State<Arc<AppState>>) -> Json<ActivitiesResponse> {
    Json(list_activities(&state.api))
}

async fn http_signup(
    State(state): State<Arc<AppState>>,
    Path(activity_name): Path<String>,
    Query(q): Query<EmailQuery>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<ApiError>)> {
    let response = signup(&state.api, &activity_name, &q.email).map_err(reject)?;
    Ok(Json(response))
}

async fn http_unregister(
    State(state): State<Arc<AppState>>,
    Path(activity_name): Path<String>,
    Query(q): Query<EmailQuery>,
) -> Result<Json<MessageResponse>, (StatusCode, Json<ApiError>)> {
    let response = unregister(&state.api, &activity_name, &q.email).map_err(reject)?;
    Ok(Json(response))
}

fn reject(err: ApiError) -> (StatusCode, Json<ApiError>) {
    (status_for(err.code), Json(err))
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::NotFound | ErrorCode::NotRegistered => StatusCode::NOT_FOUND,
        ErrorCode::AlreadyRegistered | ErrorCode::Full | ErrorCode::Validation => {
            StatusCode::BAD_REQUEST
        }
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
