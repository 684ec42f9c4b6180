use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::Context;
use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use clap::Parser;
use server_api::{SubmissionContext, SubmissionController, SubmitOutcome};
use sheets_integration::{GoogleSheetsFactory, SheetsConfig};
use shared::{
    error::{ApiError, ErrorCode},
    FieldErrors, RawFormInput,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod pages;

use config::load_settings;

#[derive(Parser, Debug)]
#[command(about = "Serves the event registration form")]
struct Args {
    /// Optional TOML settings file; environment variables override it.
    #[arg(long, default_value = "server.toml")]
    config: PathBuf,
    /// Overrides the configured listen address.
    #[arg(long)]
    bind: Option<String>,
}

#[derive(Clone)]
struct AppState {
    submissions: SubmissionContext,
    sheets: SheetsConfig,
    invite_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let mut settings = load_settings(&args.config)?;
    if let Some(bind) = args.bind {
        settings.server_bind = bind;
    }

    let sheets = settings.sheets_config();
    if let Some(missing) = sheets.missing_setting() {
        warn!(missing, "record store is not configured; submissions will fail until it is");
    }
    let stores = GoogleSheetsFactory::new(sheets.clone()).context("failed to build HTTP client")?;

    let state = AppState {
        submissions: SubmissionContext {
            stores: Arc::new(stores),
        },
        sheets,
        invite_url: settings.community_invite_url,
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings
        .server_bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.server_bind))?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(form_view))
        .route("/register", post(register))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .fallback(not_found)
        .with_state(state)
}

async fn form_view() -> Html<String> {
    Html(pages::form_page(
        &RawFormInput::initial(),
        &FieldErrors::default(),
        false,
    ))
}

async fn register(State(state): State<Arc<AppState>>, Form(raw): Form<RawFormInput>) -> Response {
    // One request is one page session.
    let controller = SubmissionController::new(state.submissions.clone());
    match controller.submit_form(raw.clone()).await {
        SubmitOutcome::Submitted(_) => Html(pages::thank_you_page(&state.invite_url)).into_response(),
        SubmitOutcome::Invalid(errors) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Html(pages::form_page(&raw, &errors, false)),
        )
            .into_response(),
        SubmitOutcome::Failed(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Html(pages::form_page(&raw, &FieldErrors::default(), true)),
        )
            .into_response(),
    }
}

async fn healthz() -> &'static str {
    "ok"
}

async fn readyz(
    State(state): State<Arc<AppState>>,
) -> Result<&'static str, (StatusCode, Json<ApiError>)> {
    match state.sheets.missing_setting() {
        None => Ok("ready"),
        Some(missing) => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiError::new(
                ErrorCode::Unavailable,
                format!("record store is not configured: missing {missing}"),
            )),
        )),
    }
}

async fn not_found() -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiError::new(ErrorCode::NotFound, "no such page")),
    )
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
