//! Database repositories

pub mod booking;
pub mod package;
pub mod session;
pub mod user;

pub use booking::BookingRepository;
pub use package::PackageRepository;
pub use session::SessionRepository;
pub use user::UserRepository;
