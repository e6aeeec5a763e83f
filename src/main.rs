use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, RestConfig};
use trajectory_core::TimelineService;

/// Main entry point for the trajectory service
///
/// Serves the REST API over an in-memory visit store. Data is lost on restart.
///
/// # Environment Variables
/// - `TRAJECTORY_REST_ADDR`: REST server address (default: "0.0.0.0:8000")
/// - `TRAJECTORY_ENABLE_SWAGGER`: mount Swagger UI and the OpenAPI document (default: "true")
/// - `RUST_LOG`: tracing filter (default directives: "trajectory=info", "api_rest=info")
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - a configuration variable holds an invalid value,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("trajectory=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = RestConfig::from_env()?;

    tracing::info!("++ Starting trajectory REST API on {}", cfg.addr());
    if cfg.enable_swagger() {
        tracing::info!("Swagger UI available at /swagger-ui");
    }

    let state = AppState::new(TimelineService::in_memory());
    let app = api_rest::router(state, &cfg);

    let listener = tokio::net::TcpListener::bind(cfg.addr()).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
