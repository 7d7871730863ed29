use chrono::Utc;
use futures_util::StreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::FindOptions;

use crate::models::{PriceChangeNotification, PriceObservation, TrackedFlight};
use crate::services::amadeus::PricedOffer;
use crate::AppState;

pub const FLIGHTS: &str = "flights";
pub const PRICE_HISTORY: &str = "price_history";
pub const NOTIFICATIONS: &str = "notifications";

pub struct NewFlight {
    pub origin: String,
    pub destination: String,
    pub airline: String,
    pub travel_date: String,
    pub return_date: Option<String>,
    pub cabin_class: String,
    pub num_passengers: i32,
}

pub async fn insert_flight(state: &AppState, new: NewFlight) -> Result<TrackedFlight, String> {
    let flights = state.db.collection::<TrackedFlight>(FLIGHTS);

    let trip_type = if new.return_date.is_some() {
        "round_trip"
    } else {
        "one_way"
    };

    let flight = TrackedFlight {
        id: ObjectId::new(),
        origin: new.origin.to_uppercase(),
        destination: new.destination.to_uppercase(),
        airline: new.airline.trim().to_string(),
        travel_date: new.travel_date,
        return_date: new.return_date,
        trip_type: trip_type.to_string(),
        cabin_class: new.cabin_class,
        num_passengers: new.num_passengers,
        is_active: true,
        created_at: Utc::now().timestamp(),
    };

    flights
        .insert_one(&flight, None)
        .await
        .map_err(|e| e.to_string())?;

    Ok(flight)
}

pub async fn list_active_flights(state: &AppState) -> Result<Vec<TrackedFlight>, String> {
    let flights = state.db.collection::<TrackedFlight>(FLIGHTS);

    let find_opts = FindOptions::builder()
        .sort(doc! { "travel_date": 1 })
        .build();

    let mut cursor = flights
        .find(doc! { "is_active": true }, find_opts)
        .await
        .map_err(|e| e.to_string())?;

    let mut items: Vec<TrackedFlight> = Vec::new();
    while let Some(res) = cursor.next().await {
        items.push(res.map_err(|e| e.to_string())?);
    }

    Ok(items)
}

/// Active flights still worth polling: travel date today or later.
/// ISO dates compare correctly as strings, so the filter stays in the query.
pub async fn list_pollable_flights(
    state: &AppState,
    today: &str,
) -> Result<Vec<TrackedFlight>, String> {
    let flights = state.db.collection::<TrackedFlight>(FLIGHTS);

    let find_opts = FindOptions::builder()
        .sort(doc! { "travel_date": 1 })
        .build();

    let mut cursor = flights
        .find(
            doc! { "is_active": true, "travel_date": { "$gte": today } },
            find_opts,
        )
        .await
        .map_err(|e| e.to_string())?;

    let mut items: Vec<TrackedFlight> = Vec::new();
    while let Some(res) = cursor.next().await {
        items.push(res.map_err(|e| e.to_string())?);
    }

    Ok(items)
}

pub async fn find_flight(
    state: &AppState,
    flight_id: ObjectId,
) -> Result<Option<TrackedFlight>, String> {
    let flights = state.db.collection::<TrackedFlight>(FLIGHTS);

    flights
        .find_one(doc! { "_id": flight_id }, None)
        .await
        .map_err(|e| e.to_string())
}

/// Soft delete. Returns false when the id matched nothing.
pub async fn deactivate_flight(state: &AppState, flight_id: ObjectId) -> Result<bool, String> {
    let flights = state.db.collection::<TrackedFlight>(FLIGHTS);

    let res = flights
        .update_one(
            doc! { "_id": flight_id },
            doc! { "$set": { "is_active": false } },
            None,
        )
        .await
        .map_err(|e| e.to_string())?;

    Ok(res.matched_count > 0)
}

pub async fn insert_observation(
    state: &AppState,
    flight_id: ObjectId,
    offer: &PricedOffer,
) -> Result<PriceObservation, String> {
    let history = state.db.collection::<PriceObservation>(PRICE_HISTORY);

    let record = PriceObservation {
        id: ObjectId::new(),
        flight_id,
        price: offer.price,
        currency: offer.currency.clone(),
        base_fare: offer.base_fare,
        taxes: offer.taxes,
        fees: offer.fees,
        booking_link: Some(offer.booking_link.clone()),
        offer_id: offer.offer_id.clone(),
        checked_at: Utc::now().timestamp(),
    };

    history
        .insert_one(&record, None)
        .await
        .map_err(|e| e.to_string())?;

    Ok(record)
}

/// Newest observation for a flight, i.e. its current price.
pub async fn latest_observation(
    state: &AppState,
    flight_id: ObjectId,
) -> Result<Option<PriceObservation>, String> {
    let history = state.db.collection::<PriceObservation>(PRICE_HISTORY);

    let find_opts = FindOptions::builder()
        .sort(doc! { "checked_at": -1 })
        .limit(1)
        .build();

    let mut cursor = history
        .find(doc! { "flight_id": flight_id }, find_opts)
        .await
        .map_err(|e| e.to_string())?;

    match cursor.next().await {
        Some(res) => Ok(Some(res.map_err(|e| e.to_string())?)),
        None => Ok(None),
    }
}

pub async fn observation_history(
    state: &AppState,
    flight_id: ObjectId,
) -> Result<Vec<PriceObservation>, String> {
    let history = state.db.collection::<PriceObservation>(PRICE_HISTORY);

    let find_opts = FindOptions::builder()
        .sort(doc! { "checked_at": -1 })
        .build();

    let mut cursor = history
        .find(doc! { "flight_id": flight_id }, find_opts)
        .await
        .map_err(|e| e.to_string())?;

    let mut items: Vec<PriceObservation> = Vec::new();
    while let Some(res) = cursor.next().await {
        items.push(res.map_err(|e| e.to_string())?);
    }

    Ok(items)
}

pub async fn insert_notification(
    state: &AppState,
    flight_id: ObjectId,
    message: String,
    old_price: f64,
    new_price: f64,
) -> Result<PriceChangeNotification, String> {
    let notifications = state
        .db
        .collection::<PriceChangeNotification>(NOTIFICATIONS);

    let notification = PriceChangeNotification {
        id: ObjectId::new(),
        flight_id,
        message,
        old_price,
        new_price,
        created_at: Utc::now().timestamp(),
        is_read: false,
    };

    notifications
        .insert_one(&notification, None)
        .await
        .map_err(|e| e.to_string())?;

    Ok(notification)
}

pub async fn unread_notifications(
    state: &AppState,
    flight_id: ObjectId,
) -> Result<Vec<PriceChangeNotification>, String> {
    list_notifications(state, doc! { "flight_id": flight_id, "is_read": false }).await
}

pub async fn all_notifications(
    state: &AppState,
    flight_id: ObjectId,
) -> Result<Vec<PriceChangeNotification>, String> {
    list_notifications(state, doc! { "flight_id": flight_id }).await
}

async fn list_notifications(
    state: &AppState,
    filter: mongodb::bson::Document,
) -> Result<Vec<PriceChangeNotification>, String> {
    let notifications = state
        .db
        .collection::<PriceChangeNotification>(NOTIFICATIONS);

    let find_opts = FindOptions::builder()
        .sort(doc! { "created_at": -1 })
        .build();

    let mut cursor = notifications
        .find(filter, find_opts)
        .await
        .map_err(|e| e.to_string())?;

    let mut items: Vec<PriceChangeNotification> = Vec::new();
    while let Some(res) = cursor.next().await {
        items.push(res.map_err(|e| e.to_string())?);
    }

    Ok(items)
}

/// Returns true if the notification was newly marked, false if it was
/// already read (or unknown).
pub async fn mark_notification_read(
    state: &AppState,
    notification_id: ObjectId,
) -> Result<bool, String> {
    let notifications = state
        .db
        .collection::<PriceChangeNotification>(NOTIFICATIONS);

    let res = notifications
        .update_one(
            doc! { "_id": notification_id, "is_read": false },
            doc! { "$set": { "is_read": true } },
            None,
        )
        .await
        .map_err(|e| e.to_string())?;

    Ok(res.matched_count > 0)
}
