use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::post,
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use super::dto::{CreateUserRequest, CreatedUserEnvelope};
use super::repo;
use super::validation;
use crate::auth::password;
use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/users",
        post(create_user).layer(middleware::from_fn(validation::validate_create_user)),
    )
}

#[instrument(skip_all, fields(username = %payload.username))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<CreatedUserEnvelope>), ApiError> {
    let taken = repo::username_or_email_taken(&state.db, &payload.username, &payload.email)
        .await
        .map_err(|e| {
            error!(error = %e, "duplicate check failed");
            ApiError::UserCreateFailed
        })?;
    if taken {
        warn!("registration with taken username or email");
        return Err(ApiError::DuplicateUser);
    }

    let hash = password::hash_password(&payload.password).map_err(|e| {
        error!(error = %e, "password hashing failed");
        ApiError::UserCreateFailed
    })?;

    let user = repo::insert(&state.db, &payload.username, &payload.email, &hash)
        .await
        .map_err(|e| {
            error!(error = %e, "user insert failed");
            ApiError::UserCreateFailed
        })?;

    info!(user_id = %user.id, "user created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedUserEnvelope {
            message: "user successfully created",
            user: user.into(),
        }),
    ))
}
