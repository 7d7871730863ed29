use std::net::SocketAddr;

use mongodb::Client;

use farewatch::{config, routes, services, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let settings = config::load();

    // Mongo connection
    let client = Client::with_uri_str(&settings.mongodb_uri)
        .await
        .expect("Failed to connect to MongoDB");
    let db = client.database(&settings.mongodb_db);

    if let Err(e) = services::db_init::ensure_indexes(&db).await {
        tracing::warn!("index setup failed: {e}");
    }

    let amadeus = services::amadeus::AmadeusClient::new(
        settings.amadeus_api_key.clone(),
        settings.amadeus_api_secret.clone(),
        settings.amadeus_base_url.clone(),
    );

    let state = AppState {
        db,
        settings: settings.clone(),
        amadeus,
    };

    // No-op unless POLL_INTERVAL_SECS is set; deployments usually rely on an
    // external cron hitting /cron/check-prices.
    services::poll_monitor::spawn_price_poll(state.clone());

    let app = routes::app(state);

    let addr = SocketAddr::from((
        settings.host.parse::<std::net::IpAddr>().unwrap(),
        settings.port,
    ));
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
