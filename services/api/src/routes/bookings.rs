//! Booking endpoints
//!
//! Every per-booking handler here runs behind the ownership guard and
//! receives the guard-loaded `BookingAccess` instead of reloading the row.

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::middleware::BookingAccess;
use crate::models::{
    CreateBookingRequest, PackageSnapshot, UpdateBookingRequest, UpdateBookingStatusRequest, User,
};
use crate::state::AppState;
use crate::transitions;
use crate::validation;

/// Create a new booking (client role enforced by the route's auth gate)
pub async fn create_booking(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<CreateBookingRequest>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_create_booking(&payload).map_err(ApiError::Validation)?;

    let package = state
        .package_repository
        .find_by_id(payload.package_id)
        .await?
        .ok_or(ApiError::PackageNotFound)?;

    // The snapshot, not the live package row, is the record of what was
    // purchased; later package edits never rewrite this booking.
    let snapshot = PackageSnapshot::from(&package);

    let booking = state
        .booking_repository
        .create(user.id, &payload, &snapshot)
        .await?;

    info!("booking {} created by client {}", booking.id, user.id);
    Ok((StatusCode::CREATED, Json(booking)))
}

/// List the caller's bookings: clients see the bookings they placed,
/// providers see the bookings placed with them. Never a global listing.
pub async fn list_bookings(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> ApiResult<impl IntoResponse> {
    let bookings = if user.role.is_provider() {
        state.booking_repository.list_by_provider(user.id).await?
    } else {
        state.booking_repository.list_by_client(user.id).await?
    };

    Ok(Json(bookings))
}

/// Get a single booking, already loaded and authorized by the guard
pub async fn get_booking(Extension(access): Extension<BookingAccess>) -> impl IntoResponse {
    Json(access.booking)
}

/// Update non-status booking fields; open to either owning party
pub async fn update_booking(
    State(state): State<AppState>,
    Extension(access): Extension<BookingAccess>,
    Json(payload): Json<UpdateBookingRequest>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_update_booking(&payload).map_err(ApiError::Validation)?;

    let booking = state
        .booking_repository
        .update_fields(access.booking.id, &payload)
        .await?;

    Ok(Json(booking))
}

/// Delete a booking; open to either owning party
pub async fn delete_booking(
    State(state): State<AppState>,
    Extension(access): Extension<BookingAccess>,
) -> ApiResult<impl IntoResponse> {
    state.booking_repository.delete(access.booking.id).await?;

    info!("booking {} deleted", access.booking.id);
    Ok(StatusCode::NO_CONTENT)
}

/// Move a booking through the lifecycle state machine
pub async fn update_booking_status(
    State(state): State<AppState>,
    Extension(access): Extension<BookingAccess>,
    Json(payload): Json<UpdateBookingStatusRequest>,
) -> ApiResult<impl IntoResponse> {
    let current = access.booking.status;
    let requested = payload.status;

    if current == requested {
        return Err(ApiError::NoOpTransition(current));
    }

    if !transitions::can_transition(current, requested, access.is_client, access.is_provider) {
        return Err(ApiError::InvalidTransition {
            from: current,
            to: requested,
        });
    }

    // Conditional update: if the status moved under us since the guard
    // loaded the row, no row matches and the caller must retry.
    let booking = state
        .booking_repository
        .update_status(access.booking.id, current, requested)
        .await?
        .ok_or(ApiError::Conflict)?;

    info!(
        "booking {} transitioned {current} -> {requested}",
        booking.id
    );
    Ok(Json(booking))
}
