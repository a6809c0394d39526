//! Application state shared across handlers

use sqlx::PgPool;

use crate::jwt::JwtService;
use crate::repositories::{BookingRepository, PackageRepository, SessionRepository, UserRepository};
use crate::session::SessionService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub session_service: SessionService,
    pub user_repository: UserRepository,
    pub package_repository: PackageRepository,
    pub booking_repository: BookingRepository,
}

impl AppState {
    /// Assemble the state from a database pool and a configured JWT service
    pub fn new(db_pool: PgPool, jwt_service: JwtService) -> Self {
        let user_repository = UserRepository::new(db_pool.clone());
        let session_repository = SessionRepository::new(db_pool.clone());
        let session_service = SessionService::new(
            jwt_service,
            session_repository,
            user_repository.clone(),
        );

        AppState {
            package_repository: PackageRepository::new(db_pool.clone()),
            booking_repository: BookingRepository::new(db_pool.clone()),
            session_service,
            user_repository,
            db_pool,
        }
    }
}
