//! Booking repository for database operations

use common::error::{DatabaseError, DatabaseResult};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{
    Booking, BookingStatus, CreateBookingRequest, PackageSnapshot, PaymentStatus,
    UpdateBookingRequest,
};

fn booking_from_row(row: &PgRow) -> DatabaseResult<Booking> {
    let status: String = row.get("status");
    let payment_status: String = row.get("payment_status");
    let snapshot: Json<PackageSnapshot> = row.get("package_snapshot");

    Ok(Booking {
        id: row.get("id"),
        client_id: row.get("client_id"),
        service_provider_id: row.get("service_provider_id"),
        package_id: row.get("package_id"),
        package_snapshot: snapshot.0,
        service_type: row.get("service_type"),
        event_date: row.get("event_date"),
        event_time: row.get("event_time"),
        event_location: row.get("event_location"),
        event_type: row.get("event_type"),
        total_amount: row.get("total_amount"),
        status: status.parse().map_err(DatabaseError::Decode)?,
        special_requests: row.get("special_requests"),
        payment_status: payment_status.parse().map_err(DatabaseError::Decode)?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

const BOOKING_COLUMNS: &str = "id, client_id, service_provider_id, package_id, \
     package_snapshot, service_type, event_date, event_time, event_location, event_type, \
     total_amount, status, special_requests, payment_status, created_at, updated_at";

/// Booking repository
#[derive(Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    /// Create a new booking repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new booking; the status always starts out `pending`
    pub async fn create(
        &self,
        client_id: Uuid,
        request: &CreateBookingRequest,
        snapshot: &PackageSnapshot,
    ) -> DatabaseResult<Booking> {
        let payment_status = request.payment_status.unwrap_or(PaymentStatus::Pending);

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO bookings (client_id, service_provider_id, package_id,
                                  package_snapshot, service_type, event_date, event_time,
                                  event_location, event_type, total_amount, status,
                                  special_requests, payment_status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(client_id)
        .bind(request.service_provider_id)
        .bind(request.package_id)
        .bind(Json(snapshot))
        .bind(&request.service_type)
        .bind(request.event_date)
        .bind(&request.event_time)
        .bind(&request.event_location)
        .bind(&request.event_type)
        .bind(request.total_amount)
        .bind(BookingStatus::Pending.as_str())
        .bind(&request.special_requests)
        .bind(payment_status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        booking_from_row(&row)
    }

    /// Find a booking by ID
    pub async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Booking>> {
        let row = sqlx::query(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        row.as_ref().map(booking_from_row).transpose()
    }

    /// List the bookings where the user is the client
    pub async fn list_by_client(&self, client_id: Uuid) -> DatabaseResult<Vec<Booking>> {
        let rows = sqlx::query(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE client_id = $1 ORDER BY created_at DESC"
        ))
        .bind(client_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        rows.iter().map(booking_from_row).collect()
    }

    /// List the bookings where the user is the service provider
    pub async fn list_by_provider(&self, provider_id: Uuid) -> DatabaseResult<Vec<Booking>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {BOOKING_COLUMNS}
            FROM bookings
            WHERE service_provider_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(provider_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        rows.iter().map(booking_from_row).collect()
    }

    /// Apply a partial field update, leaving omitted fields unchanged.
    /// Special requests track presence separately so an explicit null
    /// clears the stored value. Status never passes through here.
    pub async fn update_fields(
        &self,
        id: Uuid,
        request: &UpdateBookingRequest,
    ) -> DatabaseResult<Booking> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE bookings SET
                service_type = COALESCE($2, service_type),
                event_date = COALESCE($3, event_date),
                event_time = COALESCE($4, event_time),
                event_location = COALESCE($5, event_location),
                event_type = COALESCE($6, event_type),
                total_amount = COALESCE($7, total_amount),
                special_requests = CASE WHEN $8 THEN $9 ELSE special_requests END,
                payment_status = COALESCE($10, payment_status),
                updated_at = now()
            WHERE id = $1
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&request.service_type)
        .bind(request.event_date)
        .bind(&request.event_time)
        .bind(&request.event_location)
        .bind(&request.event_type)
        .bind(request.total_amount)
        .bind(request.special_requests.is_some())
        .bind(request.special_requests.as_ref().and_then(|v| v.as_deref()))
        .bind(request.payment_status.map(|s| s.as_str()))
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        booking_from_row(&row)
    }

    /// Conditionally move a booking from `from` to `to`. The `status = from`
    /// guard makes concurrent transitions race safely: the loser matches
    /// zero rows instead of silently overwriting. Returns the updated
    /// booking, or `None` when the row was no longer in `from`.
    pub async fn update_status(
        &self,
        id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
    ) -> DatabaseResult<Option<Booking>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE bookings
            SET status = $3, updated_at = now()
            WHERE id = $1 AND status = $2
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(from.as_str())
        .bind(to.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        row.as_ref().map(booking_from_row).transpose()
    }

    /// Hard-delete a booking
    pub async fn delete(&self, id: Uuid) -> DatabaseResult<()> {
        sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(())
    }
}
