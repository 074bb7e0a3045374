use axum::{Router, routing::get};

use super::controller::healthcheck;
use crate::state::AppState;

pub fn init_healthcheck_router() -> Router<AppState> {
    Router::new().route("/", get(healthcheck))
}
