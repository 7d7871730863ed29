use std::time::Duration;

use chrono::Utc;
use serde::Serialize;

use crate::models::TrackedFlight;
use crate::services::amadeus::FlightQuery;
use crate::services::flights_service;
use crate::AppState;

/// Notify when the price moved by at least this much, either direction.
pub const NOTIFY_THRESHOLD_USD: f64 = 5.0;

#[derive(Debug, Serialize)]
pub struct PollSummary {
    pub checked: usize,
    pub updated: usize,
    pub notifications: usize,
    pub results: Vec<FlightCheck>,
}

#[derive(Debug, Serialize)]
pub struct FlightCheck {
    pub flight_id: String,
    pub status: CheckStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_price: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// Price persisted, no qualifying change (or nothing to compare against).
    Recorded,
    /// Price persisted and a notification was created.
    PriceChanged,
    /// The search came back empty; nothing persisted.
    NoOffer,
    /// Pricing or persistence failed for this flight only.
    Error,
}

/// One poll run: fetch a quote for every active, not-yet-departed flight,
/// persist it, and notify on qualifying changes. Per-flight failures are
/// contained; only failing to enumerate the flights at all fails the run.
pub async fn run_price_check(state: &AppState) -> Result<PollSummary, String> {
    let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
    let flights = flights_service::list_pollable_flights(state, &today).await?;

    tracing::info!("price check: {} active flights to check", flights.len());

    let delay = Duration::from_millis(state.settings.poll_flight_delay_ms);
    let mut results: Vec<FlightCheck> = Vec::with_capacity(flights.len());

    for flight in &flights {
        results.push(check_flight(state, flight).await);

        // Pacing only, to stay friendly with upstream rate limits.
        if delay > Duration::ZERO {
            tokio::time::sleep(delay).await;
        }
    }

    let (updated, notifications) = tally(&results);

    tracing::info!(
        "price check complete: checked={} updated={} notifications={}",
        results.len(),
        updated,
        notifications
    );

    Ok(PollSummary {
        checked: results.len(),
        updated,
        notifications,
        results,
    })
}

async fn check_flight(state: &AppState, flight: &TrackedFlight) -> FlightCheck {
    let flight_id = flight.id.to_hex();

    tracing::info!(
        "checking {} -> {} on {}",
        flight.origin,
        flight.destination,
        flight.travel_date
    );

    let query = FlightQuery {
        origin: flight.origin.clone(),
        destination: flight.destination.clone(),
        departure_date: flight.travel_date.clone(),
        return_date: flight.return_date.clone(),
        adults: flight.num_passengers,
        cabin_class: flight.cabin_class.clone(),
    };

    let offer = match state.amadeus.search_offers(&query).await {
        Ok(Some(offer)) => offer,
        Ok(None) => {
            tracing::warn!("no offer found for flight {flight_id}");
            return FlightCheck {
                flight_id,
                status: CheckStatus::NoOffer,
                old_price: None,
                new_price: None,
            };
        }
        Err(e) => {
            tracing::error!("pricing failed for flight {flight_id}: {e}");
            return FlightCheck {
                flight_id,
                status: CheckStatus::Error,
                old_price: None,
                new_price: None,
            };
        }
    };

    // Baseline must be read before the new observation lands.
    let previous = match flights_service::latest_observation(state, flight.id).await {
        Ok(prev) => prev,
        Err(e) => {
            tracing::error!("history lookup failed for flight {flight_id}: {e}");
            return FlightCheck {
                flight_id,
                status: CheckStatus::Error,
                old_price: None,
                new_price: None,
            };
        }
    };

    if let Err(e) = flights_service::insert_observation(state, flight.id, &offer).await {
        tracing::error!("failed to record price for flight {flight_id}: {e}");
        return FlightCheck {
            flight_id,
            status: CheckStatus::Error,
            old_price: None,
            new_price: None,
        };
    }

    let Some(previous) = previous else {
        // First observation: nothing to compare, never a notification.
        return FlightCheck {
            flight_id,
            status: CheckStatus::Recorded,
            old_price: None,
            new_price: Some(offer.price),
        };
    };

    let Some(message) = price_change_message(previous.price, offer.price) else {
        return FlightCheck {
            flight_id,
            status: CheckStatus::Recorded,
            old_price: Some(previous.price),
            new_price: Some(offer.price),
        };
    };

    tracing::info!("notification for flight {flight_id}: {message}");

    if let Err(e) =
        flights_service::insert_notification(state, flight.id, message, previous.price, offer.price)
            .await
    {
        tracing::error!("failed to store notification for flight {flight_id}: {e}");
        return FlightCheck {
            flight_id,
            status: CheckStatus::Error,
            old_price: Some(previous.price),
            new_price: Some(offer.price),
        };
    }

    FlightCheck {
        flight_id,
        status: CheckStatus::PriceChanged,
        old_price: Some(previous.price),
        new_price: Some(offer.price),
    }
}

/// Threshold policy: a move of at least `NOTIFY_THRESHOLD_USD` in either
/// direction produces a message, anything smaller produces none.
pub fn price_change_message(old_price: f64, new_price: f64) -> Option<String> {
    let diff = new_price - old_price;

    if diff.abs() < NOTIFY_THRESHOLD_USD {
        return None;
    }

    if diff < 0.0 {
        Some(format!("Price dropped by ${:.2}!", diff.abs()))
    } else {
        Some(format!("Price increased by ${diff:.2}"))
    }
}

fn tally(results: &[FlightCheck]) -> (usize, usize) {
    let updated = results
        .iter()
        .filter(|r| matches!(r.status, CheckStatus::Recorded | CheckStatus::PriceChanged))
        .count();

    let notifications = results
        .iter()
        .filter(|r| r.status == CheckStatus::PriceChanged)
        .count();

    (updated, notifications)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_at_threshold_notifies_just_below_does_not() {
        assert!(price_change_message(100.0, 95.0).is_some());
        assert!(price_change_message(100.0, 105.0).is_some());

        assert!(price_change_message(100.0, 95.01).is_none());
        assert!(price_change_message(100.0, 104.99).is_none());
        assert!(price_change_message(100.0, 100.0).is_none());
    }

    #[test]
    fn drop_and_increase_messages_differ() {
        assert_eq!(
            price_change_message(250.0, 230.0).as_deref(),
            Some("Price dropped by $20.00!")
        );
        assert_eq!(
            price_change_message(230.0, 237.5).as_deref(),
            Some("Price increased by $7.50")
        );
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(CheckStatus::NoOffer).unwrap(),
            serde_json::json!("no_offer")
        );
        assert_eq!(
            serde_json::to_value(CheckStatus::PriceChanged).unwrap(),
            serde_json::json!("price_changed")
        );
    }

    #[test]
    fn tally_counts_updates_and_notifications_around_failures() {
        let results = vec![
            FlightCheck {
                flight_id: "a".into(),
                status: CheckStatus::Recorded,
                old_price: None,
                new_price: Some(120.0),
            },
            FlightCheck {
                flight_id: "b".into(),
                status: CheckStatus::Error,
                old_price: None,
                new_price: None,
            },
            FlightCheck {
                flight_id: "c".into(),
                status: CheckStatus::PriceChanged,
                old_price: Some(300.0),
                new_price: Some(280.0),
            },
            FlightCheck {
                flight_id: "d".into(),
                status: CheckStatus::NoOffer,
                old_price: None,
                new_price: None,
            },
        ];

        let (updated, notifications) = tally(&results);
        assert_eq!(updated, 2);
        assert_eq!(notifications, 1);
    }

    #[test]
    fn summary_omits_absent_prices() {
        let check = FlightCheck {
            flight_id: "a".into(),
            status: CheckStatus::NoOffer,
            old_price: None,
            new_price: None,
        };

        let value = serde_json::to_value(&check).unwrap();
        assert!(value.get("old_price").is_none());
        assert!(value.get("new_price").is_none());
    }
}
