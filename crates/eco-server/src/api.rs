//! API handlers for the server.

use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use eco_core::{Census, Population, SimulationId, TickSummary};
use eco_world::Grid;
use serde::Serialize;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// Build the HTTP surface around a shared simulation
pub fn router(state: AppState, static_dir: &str) -> Router {
    let index = format!("{}/index.html", static_dir.trim_end_matches('/'));

    Router::new()
        .route_service("/", ServeFile::new(index))
        .route("/start-simulation", post(start_simulation))
        .route("/next-iteration", get(next_iteration))
        .route("/health", get(health))
        .route("/api/stats", get(get_stats))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Reset the grid and seed the requested population
pub async fn start_simulation(
    State(state): State<AppState>,
    Json(population): Json<Population>,
) -> Result<Json<Grid>, ApiError> {
    info!(
        plants = population.plants,
        herbivores = population.herbivores,
        carnivores = population.carnivores,
        "Simulation start requested"
    );

    let grid = {
        let mut simulation = state.simulation.lock();
        simulation.initialize(population)?.clone()
    };

    crate::record_counter!("simulations_started", 1);
    Ok(Json(grid))
}

/// Advance the simulation by one tick
pub async fn next_iteration(State(state): State<AppState>) -> Json<Grid> {
    let started = Instant::now();

    let (grid, tick, living) = {
        let mut simulation = state.simulation.lock();
        let grid = simulation.advance_tick().clone();
        (grid, simulation.tick(), simulation.census().living())
    };

    let elapsed_us = started.elapsed().as_micros() as u64;
    crate::record_histogram!("tick_duration_us", elapsed_us, tick => tick);
    crate::record_gauge!("living_entities", living, tick => tick);

    Json(grid)
}

#[derive(Serialize)]
pub struct StatsResponse {
    simulation_id: SimulationId,
    started_at: DateTime<Utc>,
    tick: u64,
    census: Census,
    last_tick: Option<TickSummary>,
}

/// Get current simulation statistics
pub async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let simulation = state.simulation.lock();

    Json(StatsResponse {
        simulation_id: simulation.id(),
        started_at: simulation.started_at(),
        tick: simulation.tick(),
        census: simulation.census(),
        last_tick: simulation.last_summary().copied(),
    })
}

// Error handling
#[derive(Debug)]
pub enum ApiError {
    TooManyEntities,
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::TooManyEntities => (StatusCode::BAD_REQUEST, "Too many entities".to_string()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, message).into_response()
    }
}

impl From<eco_core::Error> for ApiError {
    fn from(err: eco_core::Error) -> Self {
        match err {
            eco_core::Error::TooManyEntities { .. } => {
                warn!("Rejected start request: {}", err);
                ApiError::TooManyEntities
            }
            other => {
                error!("Core error: {}", other);
                ApiError::Internal(other.to_string())
            }
        }
    }
}
