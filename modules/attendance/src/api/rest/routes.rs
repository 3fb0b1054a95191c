use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};

use crate::api::rest::handlers;
use crate::domain::service::Service;

/// Mount the attendance endpoints on `router`. `/api/reset` is only
/// registered when `enable_reset` is set.
pub fn register_routes(router: Router, service: Arc<Service>, enable_reset: bool) -> Router {
    let mut router = router
        .route("/api/users", get(handlers::list_users))
        .route("/api/users/{user_id}", get(handlers::get_user))
        .route("/api/users/{user_id}/enter", post(handlers::enter))
        .route("/api/users/{user_id}/exit", post(handlers::exit))
        .route("/api/logs", get(handlers::list_logs));

    if enable_reset {
        router = router.route("/api/reset", post(handlers::reset));
    }

    router.layer(Extension(service))
}
