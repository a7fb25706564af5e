use todo_api::{config::Config, AppState, SqliteStore};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    todo_api::logging::init(&config);

    let store = SqliteStore::connect(&config.database_url, config.max_connections).await?;
    let app = todo_api::app(AppState::new(store)).layer(todo_api::cors_layer(&config.cors_origin)?);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, cors_origin = %config.cors_origin, "listening");

    todo_api::run(listener, app, shutdown_signal()).await?;
    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
