//! Service package repository
//!
//! Read-only collaborator: the booking engine resolves a package once, at
//! booking creation, to capture its snapshot.

use common::error::{DatabaseError, DatabaseResult};
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::ServicePackage;

/// Package repository
#[derive(Clone)]
pub struct PackageRepository {
    pool: PgPool,
}

impl PackageRepository {
    /// Create a new package repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a package by ID
    pub async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<ServicePackage>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, description, base_price, duration_hours, features,
                   service_type, is_active
            FROM service_packages
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        match row {
            Some(row) => {
                let features: Json<Vec<String>> = row.get("features");
                Ok(Some(ServicePackage {
                    id: row.get("id"),
                    name: row.get("name"),
                    description: row.get("description"),
                    base_price: row.get("base_price"),
                    duration_hours: row.get("duration_hours"),
                    features: features.0,
                    service_type: row.get("service_type"),
                    is_active: row.get("is_active"),
                }))
            }
            None => Ok(None),
        }
    }
}
