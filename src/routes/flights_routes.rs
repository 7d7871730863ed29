use axum::{routing::get, Router};

use crate::{controllers::flights_controller, AppState};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route(
            "/flights",
            get(flights_controller::get_flights).post(flights_controller::post_create_flight),
        )
        .route(
            "/flights/:id",
            get(flights_controller::get_flight).delete(flights_controller::delete_flight),
        )
}
