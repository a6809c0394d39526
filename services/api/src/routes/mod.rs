//! HTTP routing for the marketplace API

mod auth;
mod bookings;

use axum::{
    Json, Router,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, patch, post},
};

use crate::middleware::{auth_middleware, booking_ownership_middleware, client_auth_middleware};
use crate::state::AppState;

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    // Per-booking routes run the auth gate first, then the ownership guard.
    let per_booking = Router::new()
        .route(
            "/bookings/:id",
            get(bookings::get_booking)
                .put(bookings::update_booking)
                .delete(bookings::delete_booking),
        )
        .route("/bookings/:id/status", patch(bookings::update_booking_status))
        .route_layer(from_fn_with_state(
            state.clone(),
            booking_ownership_middleware,
        ))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    let booking_create = Router::new()
        .route("/bookings", post(bookings::create_booking))
        .route_layer(from_fn_with_state(state.clone(), client_auth_middleware));

    let booking_list = Router::new()
        .route("/bookings", get(bookings::list_bookings))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    let session_routes = Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/auth/logout-all", post(auth::logout_all))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh-token", post(auth::refresh_token))
        .merge(session_routes)
        .merge(booking_create)
        .merge(booking_list)
        .merge(per_booking)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "marketplace-api"
    }))
}
