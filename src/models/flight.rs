use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedFlight {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    // 3-letter IATA codes, stored uppercase
    pub origin: String,
    pub destination: String,

    pub airline: String,

    // ISO dates ("YYYY-MM-DD")
    pub travel_date: String,
    #[serde(default)]
    pub return_date: Option<String>,

    // "one_way" | "round_trip"
    pub trip_type: String,

    // "economy" | "premium_economy" | "business" | "first"
    pub cabin_class: String,

    pub num_passengers: i32,

    // Soft delete: flights are never removed, only deactivated.
    pub is_active: bool,

    pub created_at: i64,
}
