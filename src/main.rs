use anyhow::Context;
use supermarket_prices::{
    config::load_config, create_router, infrastructure::logger::Logger, AppState, Database,
};
use tokio::{net::TcpListener, signal};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config().context("failed to load configuration")?;
    Logger::init(&config.logging.level);

    info!("Starting supermarket price server...");

    let database = Database::connect(&config.database).await.map_err(|e| {
        error!("Failed to initialize database: {}", e);
        e
    })?;

    let app = create_router(AppState::new(database.clone()));

    let address = config.listen_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

    info!("🚀 Server running on http://{}", listener.local_addr()?);
    info!("   GET    /supermarkets/              - List supermarkets (?skip&limit)");
    info!("   POST   /supermarkets/              - Create supermarket");
    info!("   GET    /supermarkets-nearby        - Nearby supermarkets (?latitude&longitude&radius)");
    info!("   GET    /products/search            - Search products by name (?q)");
    info!("   POST   /prices/                    - Record a price");
    info!("   GET    /prices/compare/:product_id - Compare prices across supermarkets");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    database.close().await;
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
