use axum::{
    body::{to_bytes, Body},
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::ApiError;

const BODY_LIMIT: usize = 1024 * 1024;

/// Registration fields as they arrive on the wire. Values stay loosely typed
/// so that a numeric `username` is observable as such instead of surfacing as
/// a deserialization error.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegistrationPayload {
    pub username: Option<Value>,
    pub email: Option<Value>,
    pub password: Option<Value>,
}

type Check = fn(&RegistrationPayload) -> Result<(), ApiError>;

/// Ordered, independent predicate checks. Evaluation stops at the first
/// failure, so a payload missing its password is reported as missing even
/// when the username is also bad.
const CHECKS: &[Check] = &[
    require_all_fields,
    check_username,
    check_email,
    check_password,
];

pub fn validate_registration(payload: &RegistrationPayload) -> Result<(), ApiError> {
    for check in CHECKS {
        check(payload)?;
    }
    Ok(())
}

/// Gate on `POST /users`: rejects bad registration payloads before the
/// handler runs, forwards the request with its body untouched otherwise.
/// Touches nothing but the request; no store access on any path.
pub async fn validate_create_user(req: Request, next: Next) -> Response {
    let (parts, body) = req.into_parts();
    let bytes = match to_bytes(body, BODY_LIMIT).await {
        Ok(bytes) => bytes,
        Err(_) => return ApiError::MissingField.into_response(),
    };

    // A body that is not JSON at all has no fields to offer.
    let payload: RegistrationPayload = serde_json::from_slice(&bytes).unwrap_or_default();
    if let Err(rejection) = validate_registration(&payload) {
        warn!(kind = ?rejection, "registration payload rejected");
        return rejection.into_response();
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn present(value: &Option<Value>) -> bool {
    matches!(value, Some(v) if !v.is_null())
}

fn require_all_fields(payload: &RegistrationPayload) -> Result<(), ApiError> {
    if present(&payload.username) && present(&payload.email) && present(&payload.password) {
        Ok(())
    } else {
        Err(ApiError::MissingField)
    }
}

fn check_username(payload: &RegistrationPayload) -> Result<(), ApiError> {
    match &payload.username {
        Some(Value::String(username)) => {
            let len = username.chars().count();
            if (3..=15).contains(&len) {
                Ok(())
            } else {
                Err(ApiError::InvalidUsername)
            }
        }
        // Numeric (or otherwise non-string) usernames are rejected outright.
        _ => Err(ApiError::InvalidUsername),
    }
}

fn check_email(payload: &RegistrationPayload) -> Result<(), ApiError> {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(
            r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
        )
        .unwrap();
    }
    match &payload.email {
        Some(Value::String(email)) if EMAIL_RE.is_match(email) => Ok(()),
        _ => Err(ApiError::InvalidEmail),
    }
}

fn check_password(payload: &RegistrationPayload) -> Result<(), ApiError> {
    match &payload.password {
        Some(Value::String(password)) if password_meets_rules(password) => Ok(()),
        _ => Err(ApiError::InvalidPassword),
    }
}

/// At least one ASCII uppercase, lowercase, digit and symbol, no whitespace,
/// eight characters or more. Underscore counts as a word character, not a
/// symbol.
fn password_meets_rules(password: &str) -> bool {
    let mut upper = false;
    let mut lower = false;
    let mut digit = false;
    let mut symbol = false;
    let mut len = 0usize;

    for c in password.chars() {
        if c.is_whitespace() {
            return false;
        }
        if c.is_ascii_uppercase() {
            upper = true;
        } else if c.is_ascii_lowercase() {
            lower = true;
        } else if c.is_ascii_digit() {
            digit = true;
        } else if c != '_' {
            symbol = true;
        }
        len += 1;
    }

    upper && lower && digit && symbol && len >= 8
}
