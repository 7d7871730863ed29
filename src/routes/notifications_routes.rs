use axum::{routing::post, Router};

use crate::{controllers::notifications_controller, AppState};

pub fn add_routes(router: Router<AppState>) -> Router<AppState> {
    router.route(
        "/notifications/:id/read",
        post(notifications_controller::post_mark_read),
    )
}
