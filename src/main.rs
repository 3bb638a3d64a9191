use dotenvy::dotenv;
use lectern::lectern_config::{PermissionsConfig, ServerConfig};
use lectern::logging::init_tracing;
use lectern::metrics::{init_metrics, metrics_router};
use lectern::router::init_router;
use lectern::state::init_app_state;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing()?;

    let server_config = ServerConfig::from_env();
    let permissions_config = PermissionsConfig::from_env();

    let state = init_app_state(&server_config, &permissions_config).await?;
    let mut app = init_router(state);

    if let Some(handle) = init_metrics()? {
        app = app.merge(metrics_router(handle));
        info!("Prometheus metrics available at /metrics");
    }

    let address = server_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!(%address, "Server listening");
    info!("Swagger UI available at http://{address}/swagger-ui");
    info!("Scalar UI available at http://{address}/scalar");

    axum::serve(listener, app).await?;
    Ok(())
}
