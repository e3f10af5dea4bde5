use axum::routing::{get, post};
use axum::Router;

use crate::api::handlers::authentication::authentication_handler;
use crate::api::handlers::authorization::authorization_handler;
use crate::api::handlers::health::health_checker_handler;
use crate::app_state::SharedAppState;

pub struct ApiRoutes;

impl ApiRoutes {
    pub fn create(state: SharedAppState) -> Router {
        Router::new()
            .route("/authentication", get(authentication_handler))
            .route("/authorization", post(authorization_handler))
            .route("/api/health", get(health_checker_handler))
            .with_state(state)
    }
}
