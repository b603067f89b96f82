//! HTTP request handlers.

use super::AppState;
use crate::db::{DbError, NewTarget, OutcomeKind, TargetPatch, TargetStatus};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

// ============================================================================
// Templates (simple string replacement)
// ============================================================================

const DASHBOARD_TEMPLATE: &str = include_str!("templates/dashboard.html");
const LAYOUT_TEMPLATE: &str = include_str!("templates/layout.html");

// ============================================================================
// Dashboard
// ============================================================================

pub async fn handle_dashboard(State(state): State<AppState>) -> impl IntoResponse {
    let targets = state.store.get_targets().unwrap_or_default();
    let targets_json = serde_json::to_string(&targets).unwrap_or_else(|_| "[]".to_string());

    let content = DASHBOARD_TEMPLATE.replace("{{targets_json}}", &targets_json);

    let page = LAYOUT_TEMPLATE
        .replace("{{title}}", "Upcheck Dashboard")
        .replace("{{content}}", &content);

    Html(page)
}

// ============================================================================
// API: Targets
// ============================================================================

pub async fn handle_get_targets(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.get_targets() {
        Ok(targets) => Json(targets).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

fn default_interval() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct CreateTargetRequest {
    pub name: String,
    pub url: String,
    #[serde(default = "default_interval")]
    pub interval_minutes: u32,
    #[serde(default)]
    pub status: Option<TargetStatus>,
}

pub async fn handle_create_target(
    State(state): State<AppState>,
    Json(req): Json<CreateTargetRequest>,
) -> impl IntoResponse {
    if req.name.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, "Name is required").into_response();
    }
    if !req.url.starts_with("http://") && !req.url.starts_with("https://") {
        return (StatusCode::BAD_REQUEST, "URL must be fully qualified").into_response();
    }

    let new = NewTarget {
        name: req.name,
        url: req.url,
        interval_minutes: req.interval_minutes.max(1),
        status: req.status.unwrap_or(TargetStatus::Active),
    };

    match state.store.add_target(new) {
        Ok(target) => Json(target).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateTargetRequest {
    pub name: Option<String>,
    pub url: Option<String>,
    pub interval_minutes: Option<u32>,
    pub status: Option<TargetStatus>,
}

pub async fn handle_update_target(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTargetRequest>,
) -> impl IntoResponse {
    if let Some(url) = &req.url {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return (StatusCode::BAD_REQUEST, "URL must be fully qualified").into_response();
        }
    }

    let patch = TargetPatch {
        name: req.name,
        url: req.url,
        interval_minutes: req.interval_minutes.map(|i| i.max(1)),
        status: req.status,
        ..Default::default()
    };

    match state.store.update_target(id, &patch) {
        Ok(()) => match state.store.get_target(id) {
            Ok(target) => Json(target).into_response(),
            Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
        },
        Err(DbError::NotFound) => (StatusCode::NOT_FOUND, "Target not found").into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

pub async fn handle_delete_target(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match state.store.delete_target(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

pub async fn handle_toggle_target(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> impl IntoResponse {
    match state.store.toggle_status(id) {
        Ok(target) => Json(target).into_response(),
        Err(DbError::NotFound) => (StatusCode::NOT_FOUND, "Target not found").into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

// ============================================================================
// API: Probe triggers
// ============================================================================

/// Run one full probe cycle now. The response is always a definite
/// success/failure envelope; individual targets may still report failed
/// probes inside `results`.
pub async fn handle_run_cycle(State(state): State<AppState>) -> impl IntoResponse {
    match state.runner.run_cycle().await {
        Ok(report) => Json(json!({
            "success": true,
            "message": format!("Processed {} targets", report.processed),
            "results": report.results,
            "timestamp": report.timestamp,
        }))
        .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "success": false,
                "error": e.to_string(),
                "timestamp": Utc::now(),
            })),
        )
            .into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct ManualProbeRequest {
    pub id: i64,
}

/// Probe a single target immediately, ignoring its schedule and pause state.
pub async fn handle_manual_probe(
    State(state): State<AppState>,
    Json(req): Json<ManualProbeRequest>,
) -> impl IntoResponse {
    match state.runner.probe_target(req.id).await {
        Ok(report) => Json(json!({
            "success": report.status == OutcomeKind::Success,
            "result": report,
        }))
        .into_response(),
        Err(DbError::NotFound) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Target not found" })),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "success": false,
                "error": e.to_string(),
                "timestamp": Utc::now(),
            })),
        )
            .into_response(),
    }
}

// ============================================================================
// Static Assets
// ============================================================================

pub async fn handle_favicon() -> impl IntoResponse {
    let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
        <circle cx="50" cy="50" r="45" fill="#3aa655"/>
        <path d="M30 52 L45 67 L72 35" stroke="white" stroke-width="8" fill="none"/>
    </svg>"##;

    (
        [(axum::http::header::CONTENT_TYPE, "image/svg+xml")],
        svg,
    )
}
