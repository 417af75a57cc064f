use todo_app::{
    application::todo_service::TodoServiceImpl,
    config::ServerConfig,
    domain::repository::TodoRepository,
    http::routing::{self, todos},
    infrastructure::sqlite_repo::{prepare_sqlite_file, SqliteTodoRepository},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ServerConfig::from_env()?;
    // Ensure SQLite file can be created/opened when using a file-backed URL
    prepare_sqlite_file(&config.database_url)?;
    let repo = SqliteTodoRepository::connect(&config.database_url).await?;
    repo.init().await?;
    let service = TodoServiceImpl::new(repo);
    let todos_router = todos::router(todos::AppState { service });
    let router = routing::app(todos_router);

    tracing::info!(addr = %config.addr, database_url = %config.database_url, "listening");
    axum::serve(tokio::net::TcpListener::bind(config.addr).await?, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal::ctrl_c;
    let _ = ctrl_c().await;
    tracing::info!("shutdown");
}
