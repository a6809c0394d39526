//! Integration tests for the session store and booking snapshots
//!
//! These drive the live PostgreSQL store named by `DATABASE_URL` and are
//! skipped when that variable is not set. Migrations are applied before
//! the first query, and every test seeds its own rows under fresh
//! identifiers so reruns never collide.

use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHasher};
use chrono::NaiveDate;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use api::error::ApiError;
use api::jwt::{JwtConfig, JwtService};
use api::models::{
    CreateBookingRequest, PackageSnapshot, SessionMetadata, UpdateBookingRequest, User, UserRole,
};
use api::repositories::{BookingRepository, PackageRepository, SessionRepository, UserRepository};
use api::session::SessionService;
use common::database::{DatabaseConfig, init_pool};

async fn test_pool() -> Option<PgPool> {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL not set, skipping session store integration tests");
        return None;
    }

    let config = DatabaseConfig::from_env().expect("database config");
    let pool = init_pool(&config).await.expect("database connection");
    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .expect("migrations");
    Some(pool)
}

fn session_service(pool: &PgPool) -> SessionService {
    let jwt_service = JwtService::new(JwtConfig {
        access_secret: "store-test-access-secret".to_string(),
        refresh_secret: "store-test-refresh-secret".to_string(),
        access_token_expiry: 900,
        refresh_token_expiry: 604800,
    });
    SessionService::new(
        jwt_service,
        SessionRepository::new(pool.clone()),
        UserRepository::new(pool.clone()),
    )
}

async fn seed_user(pool: &PgPool, role: UserRole) -> User {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(b"hunter2!", &salt)
        .unwrap()
        .to_string();
    let email = format!("{}@store-test.example.com", Uuid::new_v4());

    sqlx::query(
        r#"
        INSERT INTO users (name, email, password_hash, role,
                           is_active, is_email_verified, user_status)
        VALUES ($1, $2, $3, $4, TRUE, TRUE, 'active')
        "#,
    )
    .bind("Store Test")
    .bind(&email)
    .bind(&hash)
    .bind(role.as_str())
    .execute(pool)
    .await
    .unwrap();

    UserRepository::new(pool.clone())
        .find_by_email(&email)
        .await
        .unwrap()
        .expect("seeded user")
}

async fn seed_package(pool: &PgPool) -> Uuid {
    sqlx::query(
        r#"
        INSERT INTO service_packages (name, description, base_price, duration_hours,
                                      features, service_type)
        VALUES ('Gold', 'Full-day coverage', 5000.0, 8.0, $1, 'photography')
        RETURNING id
        "#,
    )
    .bind(sqlx::types::Json(vec![
        "album".to_string(),
        "drone".to_string(),
    ]))
    .fetch_one(pool)
    .await
    .unwrap()
    .get("id")
}

fn booking_request(provider_id: Uuid, package_id: Uuid) -> CreateBookingRequest {
    CreateBookingRequest {
        service_provider_id: provider_id,
        package_id,
        service_type: "photography".to_string(),
        event_date: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
        event_time: "14:30".to_string(),
        event_location: "Pokhara".to_string(),
        event_type: "wedding".to_string(),
        total_amount: 5000.0,
        special_requests: Some("no flash".to_string()),
        payment_status: None,
    }
}

#[tokio::test]
async fn tampered_stored_token_deactivates_the_session() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let service = session_service(&pool);
    let user = seed_user(&pool, UserRole::Client).await;

    let tokens = service
        .create_session(&user, SessionMetadata::new(None, None))
        .await
        .unwrap();
    service
        .resolve_access_token(&tokens.access_token)
        .await
        .expect("fresh session resolves");

    // Corrupt the stored signed token behind the masked one
    sqlx::query("UPDATE sessions SET access_token_actual = 'corrupted' WHERE id = $1")
        .bind(tokens.session_id)
        .execute(&pool)
        .await
        .unwrap();

    let err = service
        .resolve_access_token(&tokens.access_token)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidToken));

    // The session row must be deactivated, not merely rejected
    let row = sqlx::query("SELECT is_active FROM sessions WHERE id = $1")
        .bind(tokens.session_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    let is_active: bool = row.get("is_active");
    assert!(!is_active);
}

#[tokio::test]
async fn logout_all_invalidates_every_outstanding_masked_token() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let service = session_service(&pool);
    let user = seed_user(&pool, UserRole::Client).await;

    let first = service
        .create_session(&user, SessionMetadata::new(None, None))
        .await
        .unwrap();
    let second = service
        .create_session(&user, SessionMetadata::new(None, None))
        .await
        .unwrap();

    let revoked = service.revoke_all_user_sessions(user.id).await.unwrap();
    assert_eq!(revoked, 2);

    for tokens in [first, second] {
        let err = service
            .resolve_access_token(&tokens.access_token)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidToken));

        let err = service
            .refresh_access_token(&tokens.refresh_token)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidRefreshToken));
    }
}

#[tokio::test]
async fn refresh_replaces_only_the_access_side_of_the_session() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let service = session_service(&pool);
    let sessions = SessionRepository::new(pool.clone());
    let user = seed_user(&pool, UserRole::Photographer).await;

    let tokens = service
        .create_session(&user, SessionMetadata::new(None, None))
        .await
        .unwrap();
    let before = sessions
        .find_active_by_access_token(&tokens.access_token)
        .await
        .unwrap()
        .expect("fresh session row");

    let new_masked = service
        .refresh_access_token(&tokens.refresh_token)
        .await
        .unwrap();
    assert_ne!(new_masked, tokens.access_token);

    // The old masked access token no longer names the session
    let err = service
        .resolve_access_token(&tokens.access_token)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidToken));

    // The new one resolves to the same session and user
    let (resolved, after) = service.resolve_access_token(&new_masked).await.unwrap();
    assert_eq!(resolved.id, user.id);
    assert_eq!(after.id, tokens.session_id);

    // Refresh side and expiry untouched; access side rotated
    assert_eq!(after.refresh_token_actual, before.refresh_token_actual);
    assert_eq!(after.refresh_token_masked, tokens.refresh_token);
    assert_eq!(after.expires_at, before.expires_at);
    assert_ne!(after.access_token_actual, before.access_token_actual);

    // The unrotated refresh token keeps working for further renewals
    service
        .refresh_access_token(&tokens.refresh_token)
        .await
        .expect("repeated renewal");
}

#[tokio::test]
async fn package_snapshot_survives_package_mutation_and_deletion() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let client = seed_user(&pool, UserRole::Client).await;
    let provider = seed_user(&pool, UserRole::Photographer).await;
    let package_id = seed_package(&pool).await;

    let package = PackageRepository::new(pool.clone())
        .find_by_id(package_id)
        .await
        .unwrap()
        .expect("seeded package");
    let snapshot = PackageSnapshot::from(&package);

    let bookings = BookingRepository::new(pool.clone());
    let booking = bookings
        .create(client.id, &booking_request(provider.id, package_id), &snapshot)
        .await
        .unwrap();
    assert_eq!(booking.package_snapshot, snapshot);

    sqlx::query("UPDATE service_packages SET base_price = 1.0, name = 'Rewritten' WHERE id = $1")
        .bind(package_id)
        .execute(&pool)
        .await
        .unwrap();
    let after_edit = bookings.find_by_id(booking.id).await.unwrap().unwrap();
    assert_eq!(after_edit.package_snapshot, snapshot);

    sqlx::query("DELETE FROM service_packages WHERE id = $1")
        .bind(package_id)
        .execute(&pool)
        .await
        .unwrap();
    let after_delete = bookings.find_by_id(booking.id).await.unwrap().unwrap();
    assert_eq!(after_delete.package_snapshot, snapshot);
    assert_eq!(after_delete.package_snapshot.base_price, 5000.0);
}

#[tokio::test]
async fn explicit_null_clears_special_requests() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let client = seed_user(&pool, UserRole::Client).await;
    let provider = seed_user(&pool, UserRole::Decorator).await;
    let package_id = seed_package(&pool).await;

    let package = PackageRepository::new(pool.clone())
        .find_by_id(package_id)
        .await
        .unwrap()
        .expect("seeded package");
    let snapshot = PackageSnapshot::from(&package);

    let bookings = BookingRepository::new(pool.clone());
    let booking = bookings
        .create(client.id, &booking_request(provider.id, package_id), &snapshot)
        .await
        .unwrap();
    assert_eq!(booking.special_requests.as_deref(), Some("no flash"));

    // An omitted field leaves the stored value alone
    let untouched = bookings
        .update_fields(booking.id, &UpdateBookingRequest::default())
        .await
        .unwrap();
    assert_eq!(untouched.special_requests.as_deref(), Some("no flash"));

    // An explicit null clears it
    let cleared = bookings
        .update_fields(
            booking.id,
            &UpdateBookingRequest {
                special_requests: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.special_requests, None);

    // And a new value replaces it
    let replaced = bookings
        .update_fields(
            booking.id,
            &UpdateBookingRequest {
                special_requests: Some(Some("vegan menu".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(replaced.special_requests.as_deref(), Some("vegan menu"));
}
