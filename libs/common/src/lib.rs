//! Shared infrastructure for the marketplace services
//!
//! Provides PostgreSQL connection pooling, configuration, and the
//! database error types used across the workspace.

pub mod database;
pub mod error;
