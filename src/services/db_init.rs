use mongodb::{bson::doc, Database, IndexModel};

pub async fn ensure_indexes(db: &Database) -> Result<(), String> {
    // flights: poll-job scan (active + travel date)
    {
        let col = db.collection::<mongodb::bson::Document>("flights");
        let model = IndexModel::builder()
            .keys(doc! { "is_active": 1, "travel_date": 1 })
            .build();

        col.create_index(model, None)
            .await
            .map_err(|e| e.to_string())?;
    }

    // price_history: latest-observation lookup per flight
    {
        let col = db.collection::<mongodb::bson::Document>("price_history");
        let model = IndexModel::builder()
            .keys(doc! { "flight_id": 1, "checked_at": -1 })
            .build();

        col.create_index(model, None)
            .await
            .map_err(|e| e.to_string())?;
    }

    // notifications: unread-per-flight queries
    {
        let col = db.collection::<mongodb::bson::Document>("notifications");
        let model = IndexModel::builder()
            .keys(doc! { "flight_id": 1, "is_read": 1, "created_at": -1 })
            .build();

        let _ = col.create_index(model, None).await;
    }

    Ok(())
}
