/// Settings REST API endpoints
///
/// One sectioned record: GET returns it (defaults for anything never
/// saved), PUT replaces it.

use crate::api::AppState;
use crate::settings::types::Settings;
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Router,
};
use serde_json::{json, Value};

/// Create settings routes
pub fn create_settings_routes() -> Router<AppState> {
    Router::new()
        .route("/api/settings", get(get_settings))
        .route("/api/settings", put(update_settings))
}

/// Load the full settings record
///
/// GET /api/settings
async fn get_settings(State(state): State<AppState>) -> Result<Json<Settings>, StatusCode> {
    match state.settings.get_settings().await {
        Ok(settings) => Ok(Json(settings)),
        Err(e) => {
            tracing::error!("Failed to load settings: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Replace the full settings record
///
/// PUT /api/settings
/// Body: the sectioned settings record; omitted fields take defaults.
async fn update_settings(
    State(state): State<AppState>,
    Json(settings): Json<Settings>,
) -> Result<Json<Value>, StatusCode> {
    match state.settings.save_settings(&settings).await {
        Ok(()) => {
            tracing::info!("Settings updated");
            Ok(Json(json!({ "message": "Settings saved successfully" })))
        }
        Err(e) => {
            tracing::error!("Failed to save settings: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
