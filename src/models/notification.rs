use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceChangeNotification {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub flight_id: ObjectId,

    pub message: String,
    pub old_price: f64,
    pub new_price: f64,

    pub created_at: i64,

    // Only ever mutated to flip this flag.
    pub is_read: bool,
}
