use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mongodb::bson::oid::ObjectId;
use serde::Deserialize;
use serde_json::json;

use crate::models::{PriceChangeNotification, PriceObservation, TrackedFlight};
use crate::services::amadeus::FlightQuery;
use crate::services::flights_service::{self, NewFlight};
use crate::validation;
use crate::AppState;

const CABIN_CLASSES: &[&str] = &["economy", "premium_economy", "business", "first"];

#[derive(Deserialize)]
pub struct CreateFlightRequest {
    pub origin: String,
    pub destination: String,
    pub airline: String,

    #[serde(rename = "travelDate")]
    pub travel_date: String,
    #[serde(rename = "returnDate")]
    pub return_date: Option<String>,

    #[serde(rename = "cabinClass")]
    pub cabin_class: String,
    #[serde(rename = "numPassengers")]
    pub num_passengers: i32,
}

fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": message.into() })),
    )
        .into_response()
}

fn db_error(e: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": format!("db error: {e}") })),
    )
        .into_response()
}

fn flight_json(f: &TrackedFlight) -> serde_json::Value {
    json!({
        "id": f.id.to_hex(),
        "origin": f.origin,
        "destination": f.destination,
        "airline": f.airline,
        "travel_date": f.travel_date,
        "return_date": f.return_date,
        "trip_type": f.trip_type,
        "cabin_class": f.cabin_class,
        "num_passengers": f.num_passengers,
        "is_active": f.is_active,
        "created_at": f.created_at,
    })
}

fn observation_json(o: &PriceObservation) -> serde_json::Value {
    json!({
        "id": o.id.to_hex(),
        "price": o.price,
        "currency": o.currency,
        "base_fare": o.base_fare,
        "taxes": o.taxes,
        "fees": o.fees,
        "booking_link": o.booking_link,
        "offer_id": o.offer_id,
        "checked_at": o.checked_at,
    })
}

fn notification_json(n: &PriceChangeNotification) -> serde_json::Value {
    json!({
        "id": n.id.to_hex(),
        "message": n.message,
        "old_price": n.old_price,
        "new_price": n.new_price,
        "created_at": n.created_at,
        "is_read": n.is_read,
    })
}

// POST /flights
pub async fn post_create_flight(
    State(state): State<AppState>,
    Json(req): Json<CreateFlightRequest>,
) -> Response {
    // All validation runs before anything touches the database.
    let origin = validation::validate_airport_code(&req.origin);
    if !origin.valid {
        return bad_request(origin.message.unwrap_or_else(|| "Invalid origin".to_string()));
    }

    let destination = validation::validate_airport_code(&req.destination);
    if !destination.valid {
        return bad_request(
            destination
                .message
                .unwrap_or_else(|| "Invalid destination".to_string()),
        );
    }

    let airline = validation::validate_airline(&req.airline);
    if !airline.valid {
        return bad_request(airline.message.unwrap_or_else(|| "Invalid airline".to_string()));
    }

    let travel_date = validation::validate_travel_date(&req.travel_date);
    if !travel_date.valid {
        return bad_request(
            travel_date
                .message
                .unwrap_or_else(|| "Invalid travel date".to_string()),
        );
    }

    let return_date = validation::validate_return_date(&req.travel_date, req.return_date.as_deref());
    if !return_date.valid {
        return bad_request(
            return_date
                .message
                .unwrap_or_else(|| "Invalid return date".to_string()),
        );
    }

    if !CABIN_CLASSES.contains(&req.cabin_class.as_str()) {
        return bad_request("Invalid cabin class");
    }

    if !(1..=9).contains(&req.num_passengers) {
        return bad_request("Passenger count must be between 1 and 9");
    }

    let flight = match flights_service::insert_flight(
        &state,
        NewFlight {
            origin: req.origin,
            destination: req.destination,
            airline: req.airline,
            travel_date: req.travel_date,
            return_date: req.return_date,
            cabin_class: req.cabin_class,
            num_passengers: req.num_passengers,
        },
    )
    .await
    {
        Ok(f) => f,
        Err(e) => return db_error(e),
    };

    // Best-effort initial price; the flight is created either way.
    let query = FlightQuery {
        origin: flight.origin.clone(),
        destination: flight.destination.clone(),
        departure_date: flight.travel_date.clone(),
        return_date: flight.return_date.clone(),
        adults: flight.num_passengers,
        cabin_class: flight.cabin_class.clone(),
    };

    match state.amadeus.search_offers(&query).await {
        Ok(Some(offer)) => {
            if let Err(e) = flights_service::insert_observation(&state, flight.id, &offer).await {
                tracing::warn!("initial price not recorded for {}: {e}", flight.id.to_hex());
            }
        }
        Ok(None) => {}
        Err(e) => tracing::warn!("initial price fetch failed for {}: {e}", flight.id.to_hex()),
    }

    let mut body = flight_json(&flight);
    if let Some(warning) = airline.message {
        body["warning"] = json!(warning);
    }

    (StatusCode::CREATED, Json(body)).into_response()
}

// GET /flights
pub async fn get_flights(State(state): State<AppState>) -> Response {
    let flights = match flights_service::list_active_flights(&state).await {
        Ok(v) => v,
        Err(e) => return db_error(e),
    };

    let mut items: Vec<serde_json::Value> = Vec::with_capacity(flights.len());

    for flight in &flights {
        let latest = match flights_service::latest_observation(&state, flight.id).await {
            Ok(v) => v,
            Err(e) => return db_error(e),
        };

        let unread = match flights_service::unread_notifications(&state, flight.id).await {
            Ok(v) => v,
            Err(e) => return db_error(e),
        };

        let mut item = flight_json(flight);
        item["latest_price"] = latest
            .as_ref()
            .map(observation_json)
            .unwrap_or(serde_json::Value::Null);
        item["notifications"] = json!(unread.iter().map(notification_json).collect::<Vec<_>>());

        items.push(item);
    }

    (StatusCode::OK, Json(json!(items))).into_response()
}

// GET /flights/:id
pub async fn get_flight(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let oid = match ObjectId::parse_str(&id) {
        Ok(x) => x,
        Err(_) => return bad_request("bad id"),
    };

    let flight = match flights_service::find_flight(&state, oid).await {
        Ok(Some(f)) => f,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Flight not found" })),
            )
                .into_response();
        }
        Err(e) => return db_error(e),
    };

    let history = match flights_service::observation_history(&state, flight.id).await {
        Ok(v) => v,
        Err(e) => return db_error(e),
    };

    let notifications = match flights_service::all_notifications(&state, flight.id).await {
        Ok(v) => v,
        Err(e) => return db_error(e),
    };

    let mut body = flight_json(&flight);
    body["price_history"] = json!(history.iter().map(observation_json).collect::<Vec<_>>());
    body["notifications"] = json!(notifications.iter().map(notification_json).collect::<Vec<_>>());

    (StatusCode::OK, Json(body)).into_response()
}

// DELETE /flights/:id (soft delete)
pub async fn delete_flight(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let oid = match ObjectId::parse_str(&id) {
        Ok(x) => x,
        Err(_) => return bad_request("bad id"),
    };

    match flights_service::deactivate_flight(&state, oid).await {
        Ok(true) => (StatusCode::OK, Json(json!({ "success": true }))).into_response(),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Flight not found" })),
        )
            .into_response(),
        Err(e) => db_error(e),
    }
}
