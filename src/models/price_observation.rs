use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// One price snapshot for a tracked flight. Append-only: rows are inserted by
/// the poll job (or the create-flight handler's initial fetch) and never
/// updated. The newest row by `checked_at` is the flight's current price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceObservation {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub flight_id: ObjectId,

    pub price: f64,
    pub currency: String,

    #[serde(default)]
    pub base_fare: Option<f64>,
    // Absent (not zero) when the computed breakdown is <= 0.
    #[serde(default)]
    pub taxes: Option<f64>,
    #[serde(default)]
    pub fees: Option<f64>,

    #[serde(default)]
    pub booking_link: Option<String>,

    pub offer_id: String,

    pub checked_at: i64,
}
