//! API server entry point.

use std::sync::Arc;

use api::config::Config;
use api::routes::AppState;
use app::KitchenService;
use store::{
    DeliveryStore, InMemoryDeliveryStore, InMemoryPreparationStore, PostgresDeliveryStore,
    PostgresPreparationStore, PreparationStore, run_migrations,
};
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

async fn serve<P, D>(service: KitchenService<P, D>, config: &Config)
where
    P: PreparationStore + 'static,
    D: DeliveryStore + 'static,
{
    let prometheus_builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    let metrics_handle = prometheus_builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    let state = Arc::new(AppState { service });
    let app = api::create_app(state, metrics_handle);

    let addr = config.addr();
    tracing::info!(%addr, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
}

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &config.database_url {
        Some(url) => {
            let pool = sqlx::PgPool::connect(url)
                .await
                .expect("failed to connect to database");
            run_migrations(&pool).await.expect("migrations failed");
            tracing::info!("using PostgreSQL stores");

            let service = KitchenService::new(
                PostgresPreparationStore::new(pool.clone()),
                PostgresDeliveryStore::new(pool),
            );
            serve(service, &config).await;
        }
        None => {
            tracing::info!("DATABASE_URL not set, using in-memory stores");

            let service = KitchenService::new(
                InMemoryPreparationStore::new(),
                InMemoryDeliveryStore::new(),
            );
            serve(service, &config).await;
        }
    }
}
