//! Simple REST API server example for the fare engine.
//!
//! Run with: `cargo run --example server`
//!
//! Set `FARE_PRICING_PATH` (or pass it in `.env`) to activate a pricing
//! configuration at startup; `FARE_HOST`, `FARE_PORT` and `FARE_LOG_LEVEL`
//! control the binding and logging.
//!
//! ## Endpoints
//!
//! - `POST /calculate-price` - Price a ride against the active configuration
//! - `GET /configuration` - Show the active configuration
//! - `POST /configurations` - Add or replace a configuration
//! - `POST /configurations/{id}/activate` - Make a configuration the active one
//!
//! ## Example Usage
//!
//! ```bash
//! # Add and activate a configuration
//! curl -X POST http://localhost:3000/configurations \
//!   -H "Content-Type: application/json" \
//!   -d @data/pricing.json
//! curl -X POST http://localhost:3000/configurations/1/activate
//!
//! # Price a ride
//! curl -X POST http://localhost:3000/calculate-price \
//!   -H "Content-Type: application/json" \
//!   -d '{"ride_date": "2025-06-09", "total_distance_km": 7.5, "total_ride_time_min": 75, "waiting_time_min": 10}'
//! ```

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use fare_engine_rs::config::AppConfig;
use fare_engine_rs::{
    Breakdown, ConfigurationId, ConfigurationProvider, ConfigurationSnapshot, ConfigurationStore,
    Engine, PricingError, RideInputs, StoreError, telemetry,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

// === Request/Response DTOs ===

/// Request body for pricing a ride.
///
/// ```json
/// {"ride_date": "2025-06-09", "total_distance_km": 7.5, "total_ride_time_min": 75, "waiting_time_min": 10}
/// ```
#[derive(Debug, Deserialize)]
pub struct PriceRequest {
    ride_date: NaiveDate,
    #[serde(deserialize_with = "fare_engine_rs::decimal::deserialize")]
    total_distance_km: Decimal,
    total_ride_time_min: u32,
    waiting_time_min: u32,
}

impl PriceRequest {
    fn into_inputs(self) -> Result<RideInputs, PricingError> {
        RideInputs::new(
            self.ride_date,
            self.total_distance_km,
            self.total_ride_time_min,
            self.waiting_time_min,
        )
    }
}

/// Response body for errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

// === Application State ===

/// Shared application state containing the fare engine and its store.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine<ConfigurationStore>>,
}

// === Error Handling ===

/// Wrapper for converting engine and store errors into HTTP responses.
pub enum AppError {
    Pricing(PricingError),
    Store(StoreError),
}

impl From<PricingError> for AppError {
    fn from(err: PricingError) -> Self {
        AppError::Pricing(err)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Store(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error) = match &self {
            AppError::Pricing(err) => (StatusCode::BAD_REQUEST, err.code(), err.to_string()),
            AppError::Store(err) => (StatusCode::NOT_FOUND, err.code(), err.to_string()),
        };

        (
            status,
            Json(ErrorResponse {
                error,
                code: code.to_string(),
            }),
        )
            .into_response()
    }
}

// === Handlers ===

/// POST /calculate-price - Price a ride.
async fn calculate_price(
    State(state): State<AppState>,
    Json(request): Json<PriceRequest>,
) -> Result<Json<Breakdown>, AppError> {
    let inputs = request.into_inputs()?;
    Ok(Json(state.engine.quote(&inputs)?))
}

/// GET /configuration - Show the active configuration.
async fn active_configuration(
    State(state): State<AppState>,
) -> Result<Json<ConfigurationSnapshot>, (StatusCode, Json<ErrorResponse>)> {
    state
        .engine
        .provider()
        .active_configuration()
        .map(|snapshot| Json((*snapshot).clone()))
        .ok_or_else(|| {
            let err = PricingError::NoActiveConfiguration;
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: err.to_string(),
                    code: err.code().to_string(),
                }),
            )
        })
}

/// POST /configurations - Add or replace a configuration.
async fn put_configuration(
    State(state): State<AppState>,
    Json(snapshot): Json<ConfigurationSnapshot>,
) -> StatusCode {
    let replaced = state.engine.provider().insert(snapshot).is_some();
    if replaced {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    }
}

/// POST /configurations/{id}/activate - Make a configuration the active one.
async fn activate_configuration(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<StatusCode, AppError> {
    state.engine.provider().activate(ConfigurationId(id))?;
    Ok(StatusCode::NO_CONTENT)
}

// === Router ===

fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/calculate-price", post(calculate_price))
        .route("/configuration", get(active_configuration))
        .route("/configurations", post(put_configuration))
        .route("/configurations/{id}/activate", post(activate_configuration))
        .with_state(state)
}

// === Main ===

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let store = ConfigurationStore::new();
    if let Some(path) = &config.pricing_path {
        let snapshot = ConfigurationSnapshot::from_path(path)?;
        let id = snapshot.id();
        store.insert(snapshot);
        store.activate(id)?;
    }

    let state = AppState {
        engine: Arc::new(Engine::new(store)),
    };
    let app = create_router(state);

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "fare engine API server ready");
    println!("Fare engine API server running on http://{addr}");
    println!();
    println!("Endpoints:");
    println!("  POST /calculate-price                - Price a ride");
    println!("  GET  /configuration                  - Show the active configuration");
    println!("  POST /configurations                 - Add or replace a configuration");
    println!("  POST /configurations/{{id}}/activate - Activate a configuration");

    axum::serve(listener, app).await?;
    Ok(())
}
