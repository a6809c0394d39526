//! Domain models shared across the service

pub mod booking;
pub mod package;
pub mod session;
pub mod user;

pub use booking::{
    Booking, BookingStatus, CreateBookingRequest, PackageSnapshot, PaymentStatus,
    UpdateBookingRequest, UpdateBookingStatusRequest,
};
pub use package::ServicePackage;
pub use session::{NewSession, Session, SessionMetadata};
pub use user::{SafeUser, User, UserRole, UserStatus};
