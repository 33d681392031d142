mod api_util;
mod seed;

use api_util::{lenient, ApiError};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use checklog::{
    counter::DEFAULT_WINDOW_HOURS,
    humanize::english,
    state_actor::StateActorHandle,
    store::{Page, DEFAULT_LIMIT},
    CheckId, History, LocalizedEpisode, Sample,
};
use chrono::{DateTime, Utc};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, path::PathBuf};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

type AppState = History<StateActorHandle>;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let samples = match &cli.samples {
        Some(path) => seed::load_samples(path).expect("Couldn't load samples"),
        None => Vec::new(),
    };
    info!("Loaded {} samples", samples.len());
    let store = StateActorHandle::new(samples, cli.channel_capacity);

    info!("Binding to {}", cli.address);
    let listener = tokio::net::TcpListener::bind(&cli.address)
        .await
        .expect("Couldn't create TCP listener");
    info!("Starting API server");
    axum::serve(listener, app(History::new(store)))
        .await
        .expect("Couldn't start API server");
}

fn app(history: AppState) -> Router {
    Router::new()
        .route("/:check_id/results", post(post_result))
        .route("/:check_id/episodes", get(get_episodes))
        .route("/:check_id/counts", get(get_counts))
        .route("/:check_id/status", get(get_status))
        .layer(TraceLayer::new_for_http())
        .with_state(history)
}

#[derive(Deserialize)]
struct NewResult {
    success: bool,
    created_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Counts {
    hours: f64,
    success: u64,
    error: u64,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct CurrentStatus {
    status_ok: Option<bool>,
}

async fn post_result(
    State(history): State<AppState>,
    Path(check_id): Path<CheckId>,
    Json(result): Json<NewResult>,
) -> Result<StatusCode, ApiError> {
    let created_at = result.created_at.unwrap_or_else(Utc::now);
    history
        .store()
        .record(Sample::new(check_id, created_at, result.success))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_episodes(
    State(history): State<AppState>,
    Path(check_id): Path<CheckId>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<LocalizedEpisode>>, ApiError> {
    let offset = lenient::<i64>(params.get("offset").map(String::as_str))
        .unwrap_or(0)
        .max(0);
    let limit = lenient::<i64>(params.get("limit").map(String::as_str))
        .filter(|&limit| limit > 0)
        .unwrap_or(DEFAULT_LIMIT as i64);
    let page = Page::new(offset, limit)?;
    let episodes = history.episode_log(check_id, page, english).await?;
    Ok(Json(episodes))
}

async fn get_counts(
    State(history): State<AppState>,
    Path(check_id): Path<CheckId>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Counts>, ApiError> {
    let hours = lenient::<f64>(params.get("hours").map(String::as_str))
        .unwrap_or(DEFAULT_WINDOW_HOURS);
    let success = history.success_count(check_id, Some(hours)).await?;
    let error = history.error_count(check_id, Some(hours)).await?;
    Ok(Json(Counts {
        hours,
        success,
        error,
    }))
}

async fn get_status(
    State(history): State<AppState>,
    Path(check_id): Path<CheckId>,
) -> Result<Json<CurrentStatus>, ApiError> {
    let status_ok = history.current_status(check_id).await?;
    Ok(Json(CurrentStatus { status_ok }))
}

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Listening address for the history API
    #[arg(short, long, env = "CHECKLOG_ADDRESS", default_value = "0.0.0.0:8080")]
    address: String,

    /// Number of pending requests the result store accepts before callers wait
    #[arg(long, env = "CHECKLOG_CHANNEL_CAPACITY", default_value_t = 32)]
    channel_capacity: usize,

    /// JSON file of samples to load into the result store at startup
    #[arg(short, long, env = "CHECKLOG_SAMPLES")]
    samples: Option<PathBuf>,
}
