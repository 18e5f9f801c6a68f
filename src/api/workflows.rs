/// Workflow management REST API endpoints
///
/// CRUD over workflow records with hot-reload into the registry on every
/// mutation, the simulated run controls (execute, stop, duplicate), and CSV
/// bulk import/export.

use crate::api::AppState;
use crate::workflow::csv as workflow_csv;
use crate::workflow::types::{Workflow, WorkflowStatus};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
    routing::{delete, get, post, put},
    Router,
};
use serde::Serialize;
use serde_json::{json, Value};

/// Response for workflow creation/update operations
#[derive(Debug, Serialize)]
pub struct WorkflowResponse {
    pub id: String,
    pub message: String,
}

/// Create workflow management routes
pub fn create_workflow_routes() -> Router<AppState> {
    Router::new()
        .route("/api/workflows", post(create_workflow))
        .route("/api/workflows", get(list_workflows))
        .route("/api/workflows/template", get(download_template))
        .route("/api/workflows/export", get(export_workflows_csv))
        .route("/api/workflows/import", post(import_workflows_csv))
        .route("/api/workflows/{id}", get(get_workflow))
        .route("/api/workflows/{id}", put(update_workflow))
        .route("/api/workflows/{id}", delete(delete_workflow))
        .route("/api/workflows/{id}/duplicate", post(duplicate_workflow))
        .route("/api/workflows/{id}/execute", post(execute_workflow))
        .route("/api/workflows/{id}/stop", post(stop_workflow))
}

/// Create a new workflow
///
/// POST /api/workflows
/// Body: the full workflow record; 409 when the ID is taken.
async fn create_workflow(
    State(state): State<AppState>,
    Json(workflow): Json<Workflow>,
) -> Result<(StatusCode, Json<WorkflowResponse>), StatusCode> {
    if workflow.id.is_empty() || workflow.name.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    match state.workflows.get_workflow(&workflow.id).await {
        Ok(Some(_)) => return Err(StatusCode::CONFLICT),
        Ok(None) => {}
        Err(_) => return Err(StatusCode::INTERNAL_SERVER_ERROR),
    }

    if let Err(e) = state.workflows.save_workflow(&workflow).await {
        tracing::error!("Failed to save workflow: {}", e);
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    // Hot-reload into registry
    if let Err(e) = state.registry.reload_workflow(&workflow.id).await {
        tracing::error!("Failed to reload workflow into registry: {}", e);
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    tracing::info!("🔥 Created workflow: {} ({})", workflow.id, workflow.name);

    Ok((
        StatusCode::CREATED,
        Json(WorkflowResponse {
            id: workflow.id.clone(),
            message: format!("Workflow '{}' created successfully", workflow.name),
        }),
    ))
}

/// List all workflows
///
/// GET /api/workflows
/// Returns: { "workflows": [{ "id", "name", "created_at", "updated_at" }] }
async fn list_workflows(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    match state.workflows.list_workflows().await {
        Ok(workflows) => Ok(Json(json!({ "workflows": workflows }))),
        Err(e) => {
            tracing::error!("Failed to list workflows: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get a specific workflow by ID
///
/// GET /api/workflows/:id
async fn get_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Workflow>, StatusCode> {
    match state.workflows.get_workflow(&id).await {
        Ok(Some(workflow)) => Ok(Json(workflow)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to get workflow {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Update an existing workflow
///
/// PUT /api/workflows/:id
/// The record ID always follows the URL parameter.
async fn update_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut workflow): Json<Workflow>,
) -> Result<Json<WorkflowResponse>, StatusCode> {
    workflow.id = id.clone();

    if workflow.name.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    match state.workflows.get_workflow(&id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Err(StatusCode::NOT_FOUND),
        Err(_) => return Err(StatusCode::INTERNAL_SERVER_ERROR),
    }

    if let Err(e) = state.workflows.save_workflow(&workflow).await {
        tracing::error!("Failed to update workflow: {}", e);
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    if let Err(e) = state.registry.reload_workflow(&workflow.id).await {
        tracing::error!("Failed to reload updated workflow into registry: {}", e);
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    tracing::info!("🔥 Hot-reloaded workflow: {} ({})", workflow.id, workflow.name);

    Ok(Json(WorkflowResponse {
        id: workflow.id.clone(),
        message: format!("Workflow '{}' updated successfully", workflow.name),
    }))
}

/// Delete a workflow
///
/// DELETE /api/workflows/:id
async fn delete_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    // A deleted workflow cannot keep running
    state.controller.stop(&id);
    state.registry.remove_workflow(&id);

    match state.workflows.delete_workflow(&id).await {
        Ok(true) => {
            tracing::info!("Deleted workflow: {}", id);
            Ok(Json(json!({ "message": "Workflow deleted successfully" })))
        }
        Ok(false) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to delete workflow: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Duplicate a workflow under a fresh ID
///
/// POST /api/workflows/:id/duplicate
/// The copy starts paused with all node state reset.
async fn duplicate_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Workflow>), StatusCode> {
    let source = match state.workflows.get_workflow(&id).await {
        Ok(Some(workflow)) => workflow,
        Ok(None) => return Err(StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to get workflow {}: {}", id, e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let mut copy = source.clone();
    copy.id = format!("{}-copy-{}", source.id, &uuid::Uuid::new_v4().to_string()[..8]);
    copy.name = format!("{} (Copy)", source.name);
    copy.status = WorkflowStatus::Paused;
    copy.is_looping = false;
    copy.reset_node_states();

    if let Err(e) = state.workflows.save_workflow(&copy).await {
        tracing::error!("Failed to save duplicated workflow: {}", e);
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    if let Err(e) = state.registry.reload_workflow(&copy.id).await {
        tracing::error!("Failed to reload duplicated workflow: {}", e);
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    tracing::info!("Duplicated workflow {} -> {}", id, copy.id);
    Ok((StatusCode::CREATED, Json(copy)))
}

/// Download the CSV template for bulk workflow import
///
/// GET /api/workflows/template
async fn download_template() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"workflow-template.csv\"",
            ),
        ],
        workflow_csv::TEMPLATE,
    )
}

/// Export every workflow as a CSV document
///
/// GET /api/workflows/export
/// Rows follow the template's column layout, so an export re-imports.
async fn export_workflows_csv(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    let metadata = state.workflows.list_workflows().await.map_err(|e| {
        tracing::error!("Failed to list workflows for export: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to export workflows" })),
        )
    })?;

    let mut workflows = Vec::with_capacity(metadata.len());
    for meta in metadata {
        if let Ok(Some(workflow)) = state.workflows.get_workflow(&meta.id).await {
            workflows.push(workflow);
        }
    }

    if workflows.is_empty() {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "No workflows to export" })),
        ));
    }

    let csv_text = workflow_csv::export_workflows(&workflows).map_err(|e| {
        tracing::error!("Failed to render workflow export: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Failed to export workflows" })),
        )
    })?;

    tracing::info!("📦 Exported {} workflow(s) as CSV", workflows.len());
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"workflows-export.csv\"",
            ),
        ],
        csv_text,
    ))
}

/// Import workflows from a CSV document
///
/// POST /api/workflows/import
/// Body: raw CSV in the template's column layout. Every imported workflow
/// gets a fresh ID, so re-importing a file never overwrites records.
async fn import_workflows_csv(
    State(state): State<AppState>,
    body: String,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let imported = match workflow_csv::import_workflows(&body) {
        Ok(imported) => imported,
        Err(e) => {
            tracing::warn!("Rejected CSV import: {}", e);
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": e.to_string() })),
            ));
        }
    };

    let mut ids = Vec::with_capacity(imported.len());
    for workflow in &imported {
        if let Err(e) = state.workflows.save_workflow(workflow).await {
            tracing::error!("Failed to save imported workflow: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to save imported workflows" })),
            ));
        }
        if let Err(e) = state.registry.reload_workflow(&workflow.id).await {
            tracing::error!("Failed to reload imported workflow: {}", e);
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to save imported workflows" })),
            ));
        }
        ids.push(workflow.id.clone());
    }

    tracing::info!("📦 Imported {} workflow(s) from CSV", ids.len());
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": format!("Successfully imported {} workflow(s)", ids.len()),
            "workflows": ids,
        })),
    ))
}

/// Start a simulated run
///
/// POST /api/workflows/:id/execute
/// Plans synchronously (422 on structural problems), then runs in the
/// background; 202 means the run was accepted.
async fn execute_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let compiled = match state.registry.get_workflow(&id) {
        Some(compiled) => compiled,
        None => {
            return Err((
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Workflow not found" })),
            ));
        }
    };

    let plan = match state.engine.plan(&compiled) {
        Ok(plan) => plan,
        Err(e) => {
            tracing::warn!("Cannot execute workflow '{}': {}", id, e);
            // Invalid configurations park the workflow, matching the
            // dashboard's behavior on a failed run attempt
            if let Err(park) = state
                .engine
                .set_workflow_status(&id, WorkflowStatus::Paused)
                .await
            {
                tracing::error!("Failed to park workflow '{}': {}", id, park);
            }
            return Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "error": e.to_string() })),
            ));
        }
    };

    let engine = state.engine.clone();
    tokio::spawn(async move {
        if let Err(e) = engine.run(plan).await {
            tracing::error!("Simulated run failed: {}", e);
        }
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({ "message": format!("Workflow '{}' execution started", id) })),
    ))
}

/// Stop the active simulated run
///
/// POST /api/workflows/:id/stop
/// Clears the shared run flag; the walk notices at the next node boundary.
async fn stop_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    match state.workflows.get_workflow(&id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Err(StatusCode::NOT_FOUND),
        Err(_) => return Err(StatusCode::INTERNAL_SERVER_ERROR),
    }

    let stopped = state.controller.stop(&id);
    if !stopped {
        tracing::debug!("Stop requested for '{}' but no run owns the slot", id);
    }

    // Park the record immediately so readers don't wait for the run task
    if let Err(e) = state
        .engine
        .set_workflow_status(&id, WorkflowStatus::Paused)
        .await
    {
        tracing::error!("Failed to park workflow '{}': {}", id, e);
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    Ok(Json(json!({ "message": format!("Workflow '{}' stopped", id) })))
}
