mod api;
mod config;
mod executor;
mod generator;
mod models;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServiceConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing; records from the core library arrive through `log`
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wingbox_service=debug,wingbox_core=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Wingbox Structural Service");

    let config = ServiceConfig::from_env();
    tracing::info!("Using solver command: {:?}", config.solver.executable);
    tracing::info!("Job directory: {:?}", config.solver.work_dir);
    if !config.solver.is_available() {
        tracing::warn!("Solver not found; set WINGBOX_SOLVER_PATH to the solver executable");
        tracing::warn!("Service will start but analyses will fail until the solver is available");
    }

    let resolver = config.load_materials()?;
    match &config.materials {
        Some(path) => tracing::info!("Loaded {} material rows from {:?}", resolver.rows().len(), path),
        None => tracing::info!("Using embedded material table ({} rows)", resolver.rows().len()),
    }

    let addr = config.addr();
    let app = api::create_router(api::AppState::new(config, resolver));

    tracing::info!("Listening on {}", addr);
    tracing::info!("API endpoints:");
    tracing::info!("  GET  /health");
    tracing::info!("  GET  /api/v1/version");
    tracing::info!("  POST /api/v1/validate");
    tracing::info!("  POST /api/v1/assemble");
    tracing::info!("  POST /api/v1/analyze");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
