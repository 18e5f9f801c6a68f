/// Agent management REST API endpoints
///
/// CRUD over agent records. Create rejects duplicate IDs; update stamps the
/// record's lastActivity so the dashboard's "last seen" display moves.

use crate::api::AppState;
use crate::agent::types::Agent;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use serde_json::{json, Value};

/// Create agent management routes
pub fn create_agent_routes() -> Router<AppState> {
    Router::new()
        .route("/api/agents", post(create_agent))
        .route("/api/agents", get(list_agents))
        .route("/api/agents/{id}", get(get_agent))
        .route("/api/agents/{id}", put(update_agent))
        .route("/api/agents/{id}", delete(delete_agent))
}

/// Create a new agent record
///
/// POST /api/agents
/// Body: the full agent record; 409 when the ID is taken.
async fn create_agent(
    State(state): State<AppState>,
    Json(mut agent): Json<Agent>,
) -> Result<(StatusCode, Json<Agent>), StatusCode> {
    if agent.id.is_empty() || agent.name.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    match state.agents.get_agent(&agent.id).await {
        Ok(Some(_)) => return Err(StatusCode::CONFLICT),
        Ok(None) => {}
        Err(_) => return Err(StatusCode::INTERNAL_SERVER_ERROR),
    }

    agent.touch();
    if let Err(e) = state.agents.save_agent(&agent).await {
        tracing::error!("Failed to save agent: {}", e);
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    tracing::info!("Created agent: {} ({})", agent.id, agent.name);
    Ok((StatusCode::CREATED, Json(agent)))
}

/// List all agents
///
/// GET /api/agents
async fn list_agents(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    match state.agents.list_agents().await {
        Ok(agents) => Ok(Json(json!({ "agents": agents }))),
        Err(e) => {
            tracing::error!("Failed to list agents: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get a specific agent by ID
///
/// GET /api/agents/:id
async fn get_agent(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Agent>, StatusCode> {
    match state.agents.get_agent(&id).await {
        Ok(Some(agent)) => Ok(Json(agent)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to get agent {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Update an existing agent record
///
/// PUT /api/agents/:id
/// The record ID always follows the URL parameter.
async fn update_agent(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut agent): Json<Agent>,
) -> Result<Json<Agent>, StatusCode> {
    agent.id = id.clone();

    if agent.name.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    match state.agents.get_agent(&id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Err(StatusCode::NOT_FOUND),
        Err(_) => return Err(StatusCode::INTERNAL_SERVER_ERROR),
    }

    agent.touch();
    if let Err(e) = state.agents.save_agent(&agent).await {
        tracing::error!("Failed to update agent: {}", e);
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    tracing::info!("Updated agent: {}", id);
    Ok(Json(agent))
}

/// Delete an agent record
///
/// DELETE /api/agents/:id
async fn delete_agent(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    match state.agents.delete_agent(&id).await {
        Ok(true) => {
            tracing::info!("Deleted agent: {}", id);
            Ok(Json(json!({ "message": "Agent deleted successfully" })))
        }
        Ok(false) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to delete agent: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
