//! Event-services marketplace backend
//!
//! Two cooperating subsystems form the core: the session/auth layer
//! (masked-token sessions over a Postgres store, signed JWT pairs held
//! server-side) and the booking lifecycle engine (ownership-guarded CRUD
//! plus a role-conditioned status transition table).

pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod session;
pub mod state;
pub mod transitions;
pub mod validation;

pub use routes::create_router;
pub use state::AppState;
