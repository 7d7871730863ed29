use std::env;

#[derive(Debug, Clone)]
pub struct Settings {
    pub mongodb_uri: String,
    pub mongodb_db: String,
    pub host: String,
    pub port: u16,

    pub amadeus_api_key: String,
    pub amadeus_api_secret: String,
    pub amadeus_base_url: String,

    // 0 disables the in-process scheduler (an external cron hits
    // /cron/check-prices instead).
    pub poll_interval_secs: u64,
    // Pause between flights inside one poll run (upstream rate-limit courtesy).
    pub poll_flight_delay_ms: u64,
}

pub fn load() -> Settings {
    // Loads .env if present (no crash if missing)
    dotenvy::dotenv().ok();

    let mongodb_uri = env::var("MONGODB_URI")
        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

    let mongodb_db = env::var("MONGODB_DB")
        .unwrap_or_else(|_| "farewatch".to_string());

    let host = env::var("HOST")
        .unwrap_or_else(|_| "127.0.0.1".to_string());

    let port = env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let amadeus_api_key = env::var("AMADEUS_API_KEY").unwrap_or_default();
    let amadeus_api_secret = env::var("AMADEUS_API_SECRET").unwrap_or_default();

    let amadeus_base_url = env::var("AMADEUS_BASE_URL")
        .unwrap_or_else(|_| "https://test.api.amadeus.com".to_string());

    let poll_interval_secs = env::var("POLL_INTERVAL_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0);

    let poll_flight_delay_ms = env::var("POLL_FLIGHT_DELAY_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(1000);

    Settings {
        mongodb_uri,
        mongodb_db,
        host,
        port,
        amadeus_api_key,
        amadeus_api_secret,
        amadeus_base_url,
        poll_interval_secs,
        poll_flight_delay_ms,
    }
}
