use axum::Router;

use crate::{controllers::home_controller, AppState};

pub mod cron_routes;
pub mod flights_routes;
pub mod home_routes;
pub mod notifications_routes;

pub fn app(state: AppState) -> Router {
    let router = Router::<AppState>::new();

    let router = home_routes::add_routes(router);
    let router = flights_routes::add_routes(router);
    let router = notifications_routes::add_routes(router);
    let router = cron_routes::add_routes(router);

    router
        .fallback(home_controller::not_found)
        .with_state(state)
}
