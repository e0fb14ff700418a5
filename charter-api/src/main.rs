use std::sync::Arc;
use charter_api::{app, AppState};
use charter_store::{app_config::Config, LogNotifier};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "charter_api=debug,charter_core=info,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().expect("Failed to load config");
    tracing::info!(backend = ?config.storage.backend, "Starting charter API on port {}", config.server.port);

    let stores = charter_store::connect(&config)
        .await
        .expect("Failed to initialise storage");

    // Domain events go to the log until a broker is wired in
    let notifier = Arc::new(LogNotifier);

    let app_state = AppState::new(stores, notifier, config.pricing.quoting_settings());
    let app = app(app_state);

    let addr = config.listen_addr();
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
