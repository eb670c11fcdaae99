use std::{net::SocketAddr, sync::Arc};

use configs::{AppConfig, ServerConfig};
use migration::MigratorTrait;
use service::{orders::repo::seaorm::SeaOrmOrderRepository, products::HttpProductsClient, OrdersService};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, AppState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &ServerConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.host, cfg.port).parse()?)
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!(service = "orders", event = "shutdown_signal", "received Ctrl+C, draining connections");
    }
}

/// Wire the database, the Products client and the router, then serve until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    if cfg.database.run_migrations {
        migration::Migrator::up(&db, None).await?;
        info!("migrations applied");
    }

    let products_url = cfg.products.base_url();
    let orders = OrdersService::new(
        Arc::new(SeaOrmOrderRepository::new(db)),
        Arc::new(HttpProductsClient::new(products_url.clone())),
    );
    let app = routes::build_router(AppState::new(orders), build_cors());

    let addr = bind_addr(&cfg.server)?;
    info!(%addr, products = %products_url, "orders service listening");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}
