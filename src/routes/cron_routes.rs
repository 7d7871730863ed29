use axum::{routing::get, Router};

use crate::{controllers::cron_controller, AppState};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router.route("/cron/check-prices", get(cron_controller::get_check_prices))
}
