/// Server setup and initialization
///
/// Wires together all components: record stores, hot registry, simulated
/// runtime, relay clients, and HTTP routes. Provides the application factory
/// used by both the binary and the integration tests.

use crate::{
    agent::{AgentStore, MetricsSimulator},
    api::{
        agents::create_agent_routes, chat::create_chat_routes,
        settings::create_settings_routes, workflows::create_workflow_routes, AppState,
    },
    config::Config,
    relay::{AdkClient, OpenRouterClient},
    runtime::{ExecutionEngine, NodeExecutor, RunController},
    settings::SettingsStore,
    store::open_record_store,
    workflow::{WorkflowRegistry, WorkflowStore},
};
use anyhow::Result;
use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

/// Create the main Axum application with all routes and middleware
///
/// Initializes every component and wires them into a complete application,
/// including the background metrics simulator.
pub async fn create_app(config: Config) -> Result<Router> {
    // Open the shared record store
    tracing::info!("🗄️ Opening record store in: {}", config.database.data_dir);
    let pool = open_record_store(&config.database.data_dir).await?;

    let agent_store = AgentStore::new(pool.clone());
    let workflow_store = WorkflowStore::new(pool.clone());
    let settings_store = SettingsStore::new(pool);

    // A fresh installation gets the default agent roster
    agent_store.seed_defaults().await?;

    // Load persisted workflows into the hot registry
    tracing::info!("📊 Initializing workflow registry");
    let registry = Arc::new(WorkflowRegistry::new(workflow_store.clone()));
    registry.init_from_storage().await?;

    // Simulated runtime
    tracing::info!("⚙️ Initializing simulated runtime");
    let executor = Arc::new(NodeExecutor::new(&config.runtime));
    let controller = Arc::new(RunController::new());
    let engine = Arc::new(ExecutionEngine::new(
        executor,
        workflow_store.clone(),
        Arc::clone(&registry),
        Arc::clone(&controller),
    ));

    // Background agent metrics simulation
    let simulator = MetricsSimulator::new(agent_store.clone(), config.runtime.metrics_interval());
    tokio::spawn(simulator.run());

    // Relay upstream clients
    let adk = AdkClient::new(config.relay.adk_service_url.clone());
    let openrouter = OpenRouterClient::new(
        config.relay.openrouter_api_url.clone(),
        config.relay.openrouter_api_key.clone(),
        config.relay.chat_model.clone(),
    );

    let app_state = AppState {
        agents: agent_store,
        workflows: workflow_store,
        settings: settings_store,
        registry,
        engine,
        controller,
        adk,
        openrouter,
    };

    // The dashboard is served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    tracing::info!("📡 Creating HTTP router with all endpoints");
    let app = Router::new()
        .route("/healthz", get(health_check))
        .merge(create_chat_routes())
        .merge(create_agent_routes())
        .merge(create_workflow_routes())
        .merge(create_settings_routes())
        .layer(cors)
        .with_state(app_state);

    tracing::info!("✅ Application initialized successfully");

    Ok(app)
}

/// Start the HTTP server with the given configuration
pub async fn start_server(config: Config) -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .init();

    tracing::info!("Starting Agentdeck server...");

    let app = create_app(config.clone()).await?;

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&bind_addr).await?;

    tracing::info!("Server listening on http://{}", bind_addr);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// Health check endpoint handler
async fn health_check() -> &'static str {
    "ok"
}
