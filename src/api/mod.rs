use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde_json::{Value, json};
use tracing::error;

use crate::{
    VoiceRelayConfig, VoiceRelayError,
    error::ApiError,
    models::{SearchResult, WeatherSnapshot},
    search::SerperClient,
    session::{RealtimeSessionClient, SessionRequest},
    upstream,
    weather::OpenMeteoClient,
};

/// Provider clients shared by every request. Nothing here is mutated after
/// startup.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<RealtimeSessionClient>,
    pub weather: Arc<OpenMeteoClient>,
    pub search: Arc<SerperClient>,
}

impl AppState {
    pub fn new(config: &VoiceRelayConfig) -> anyhow::Result<Self> {
        let client = upstream::build_client(&config.http)?;
        Ok(Self {
            session: Arc::new(RealtimeSessionClient::new(client.clone(), &config.realtime)),
            weather: Arc::new(OpenMeteoClient::new(client.clone(), &config.weather)),
            search: Arc::new(SerperClient::new(client, &config.search)),
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/session", get(create_session))
        .route("/weather/{location}", get(get_weather))
        .route("/search/{query}", get(search_web))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": crate::VERSION }))
}

async fn create_session(
    State(state): State<AppState>,
    Query(request): Query<SessionRequest>,
) -> Result<Json<Value>, ApiError> {
    state
        .session
        .create_session(&request)
        .await
        .map(Json)
        .map_err(session_error)
}

async fn get_weather(
    State(state): State<AppState>,
    Path(location): Path<String>,
) -> Result<Json<WeatherSnapshot>, ApiError> {
    state
        .weather
        .weather_for(&location)
        .await
        .map(Json)
        .map_err(|err| aggregation_error(err, "Could not get weather data"))
}

async fn search_web(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> Result<Json<SearchResult>, ApiError> {
    state
        .search
        .search(&query)
        .await
        .map(Json)
        .map_err(|err| aggregation_error(err, "Could not perform search"))
}

/// Upstream statuses are relayed as-is; everything else is a 500.
fn session_error(err: VoiceRelayError) -> ApiError {
    match &err {
        VoiceRelayError::Upstream { status, .. } => {
            error!("Realtime session request rejected: {}", err);
            ApiError::new(*status, err.to_string())
        }
        _ => {
            error!("Failed to create realtime session: {}", err);
            ApiError::internal("Failed to create session").with_details(err.to_string())
        }
    }
}

/// "Nothing found" stays a 200 carrying an error payload; any other failure
/// is a 500 prefixed with `context`.
fn aggregation_error(err: VoiceRelayError, context: &str) -> ApiError {
    match err {
        VoiceRelayError::NotFound { message } => ApiError::soft(message),
        other => {
            error!("{}: {}", context, other);
            ApiError::internal(format!("{context}: {other}"))
        }
    }
}
