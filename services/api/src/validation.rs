//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

use crate::models::{CreateBookingRequest, UpdateBookingRequest};

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate login credentials
pub fn validate_login(email: &str, password: &str) -> Result<(), String> {
    validate_email(email)?;

    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    Ok(())
}

/// Validate an event time in 24-hour "HH:MM" form
pub fn validate_event_time(event_time: &str) -> Result<(), String> {
    static TIME_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = TIME_REGEX.get_or_init(|| {
        Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("Failed to compile event time regex")
    });

    if !regex.is_match(event_time) {
        return Err("Event time must be in HH:MM format".to_string());
    }

    Ok(())
}

fn validate_required(value: &str, field: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} is required"));
    }
    Ok(())
}

fn validate_amount(amount: f64) -> Result<(), String> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err("Total amount must be a positive number".to_string());
    }
    Ok(())
}

fn collect(checks: impl IntoIterator<Item = Result<(), String>>) -> Result<(), Vec<String>> {
    let errors: Vec<String> = checks.into_iter().filter_map(Result::err).collect();
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Validate a booking creation payload, reporting every failing field
pub fn validate_create_booking(req: &CreateBookingRequest) -> Result<(), Vec<String>> {
    collect([
        validate_required(&req.service_type, "Service type"),
        validate_required(&req.event_location, "Event location"),
        validate_required(&req.event_type, "Event type"),
        validate_event_time(&req.event_time),
        validate_amount(req.total_amount),
    ])
}

/// Validate a booking field-update payload; only supplied fields are
/// checked, and every failing one is reported
pub fn validate_update_booking(req: &UpdateBookingRequest) -> Result<(), Vec<String>> {
    let mut checks = Vec::new();
    if let Some(service_type) = &req.service_type {
        checks.push(validate_required(service_type, "Service type"));
    }
    if let Some(event_location) = &req.event_location {
        checks.push(validate_required(event_location, "Event location"));
    }
    if let Some(event_type) = &req.event_type {
        checks.push(validate_required(event_type, "Event type"));
    }
    if let Some(event_time) = &req.event_time {
        checks.push(validate_event_time(event_time));
    }
    if let Some(total_amount) = req.total_amount {
        checks.push(validate_amount(total_amount));
    }
    collect(checks)
}
