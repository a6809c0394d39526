//! Request middleware: bearer authentication and booking ownership
//!
//! The authorization gate resolves `Bearer <masked token>` to a session and
//! user, then enforces account flags and an optional role allow-list. The
//! ownership guard runs after it on every per-booking route, loading the
//! booking once and attaching it (plus the two ownership booleans) to the
//! request so handlers never reload it or re-derive party membership.

use axum::{
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::models::{Booking, Session, User, UserRole};
use crate::state::AppState;

/// The session behind the current request, attached by the auth gate
#[derive(Clone)]
pub struct CurrentSession(pub Session);

/// The guard-loaded booking plus the caller's relationship to it
#[derive(Clone)]
pub struct BookingAccess {
    pub booking: Booking,
    pub is_client: bool,
    pub is_provider: bool,
}

/// Pull the masked token out of an `Authorization: Bearer ...` header
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// Resolve and gate the caller: session lookup, signature verification,
/// account flags, then the role allow-list (empty list admits any role)
async fn gate(
    state: &AppState,
    headers: &HeaderMap,
    allowed_roles: &[UserRole],
) -> ApiResult<(User, Session)> {
    let token = bearer_token(headers).ok_or(ApiError::MissingToken)?;

    let (user, session) = state.session_service.resolve_access_token(token).await?;

    if !user.is_active {
        return Err(ApiError::AccountDeactivated);
    }
    if !user.is_email_verified {
        return Err(ApiError::EmailNotVerified);
    }
    if !allowed_roles.is_empty() && !allowed_roles.contains(&user.role) {
        return Err(ApiError::InsufficientPermissions);
    }

    Ok((user, session))
}

/// Authentication middleware admitting any role
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> ApiResult<Response> {
    let (user, session) = gate(&state, req.headers(), &[]).await?;

    req.extensions_mut().insert(user);
    req.extensions_mut().insert(CurrentSession(session));

    Ok(next.run(req).await)
}

/// Authentication middleware admitting only clients
pub async fn client_auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> ApiResult<Response> {
    let (user, session) = gate(&state, req.headers(), &[UserRole::Client]).await?;

    req.extensions_mut().insert(user);
    req.extensions_mut().insert(CurrentSession(session));

    Ok(next.run(req).await)
}

/// Optional authentication: resolves the bearer token when present but
/// swallows every failure, so public endpoints can personalize when they
/// can and degrade to anonymous when they cannot. Tamper detection inside
/// the resolution step still deactivates the offending session.
pub async fn optional_auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(token) = bearer_token(req.headers()) {
        match state.session_service.resolve_access_token(token).await {
            Ok((user, session)) if user.is_active => {
                req.extensions_mut().insert(user);
                req.extensions_mut().insert(CurrentSession(session));
            }
            Ok(_) | Err(_) => {}
        }
    }

    next.run(req).await
}

/// Ownership guard for per-booking routes. Runs after the auth gate; fails
/// closed when the caller is neither party named on the booking, and never
/// includes booking fields in the rejection.
pub async fn booking_ownership_middleware(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
    mut req: Request<Body>,
    next: Next,
) -> ApiResult<Response> {
    let user = req
        .extensions()
        .get::<User>()
        .cloned()
        .ok_or(ApiError::Internal)?;

    let booking = state
        .booking_repository
        .find_by_id(booking_id)
        .await?
        .ok_or(ApiError::BookingNotFound)?;

    let is_client = booking.client_id == user.id;
    let is_provider = booking.service_provider_id == user.id;

    if !is_client && !is_provider {
        return Err(ApiError::NotAuthorized);
    }

    req.extensions_mut().insert(BookingAccess {
        booking,
        is_client,
        is_provider,
    });

    Ok(next.run(req).await)
}
