use axum::{
    body::to_bytes,
    extract::{DefaultBodyLimit, FromRequest, Multipart, Path, Request, State},
    http::header,
    routing::{get, put},
    Json, Router,
};
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use super::dto::{
    ProfileEcho, ProfileEchoEnvelope, ProfileEnvelope, UpdateProfileRequest, UserListEnvelope,
};
use super::repo;
use crate::auth::extractors::Identity;
use crate::error::ApiError;
use crate::state::AppState;
use crate::uploads;

const BODY_LIMIT: usize = 10 * 1024 * 1024;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/profiles/:username", get(get_profile))
        .route(
            "/profile",
            put(update_profile).layer(DefaultBodyLimit::max(BODY_LIMIT)),
        )
        .route("/users", get(list_users))
}

#[instrument(skip_all, fields(username = %username))]
pub async fn get_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<ProfileEnvelope>, ApiError> {
    let row = repo::find_by_username(&state.db, &username)
        .await
        .map_err(|e| {
            error!(error = %e, "profile lookup failed");
            ApiError::ProfileFetchFailed
        })?;

    let Some(row) = row else {
        warn!("unknown profile requested");
        return Err(ApiError::UserNotFound);
    };

    Ok(Json(ProfileEnvelope {
        message: "User profile retrieved!",
        profile: row.into(),
    }))
}

#[instrument(skip_all)]
pub async fn update_profile(
    State(state): State<AppState>,
    Identity(email): Identity,
    req: Request,
) -> Result<Json<ProfileEchoEnvelope>, ApiError> {
    // The upload runs before the user lookup, mirroring an upload layer
    // that sits in front of the handler.
    let (payload, uploaded_image) = read_update_payload(&state, req).await?;

    let user = repo::find_by_email(&state.db, &email).await.map_err(|e| {
        error!(error = %e, "identity lookup failed");
        ApiError::ProfileUpdateFailed
    })?;
    let Some(user) = user else {
        warn!("update for unknown identity");
        return Err(ApiError::UserNotFound);
    };

    // A fresh upload wins; otherwise the stored image is kept. Every other
    // field is overwritten from the payload, absent ones included.
    let image = uploaded_image.or(user.image);
    repo::overwrite_by_email(&state.db, &email, &payload, image.as_deref())
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %user.id, "profile overwrite failed");
            ApiError::ProfileUpdateFailed
        })?;

    info!(user_id = %user.id, "user profile updated");
    Ok(Json(ProfileEchoEnvelope {
        message: "User profile updated!",
        profile: ProfileEcho::from_payload(payload, image),
    }))
}

#[instrument(skip_all)]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<UserListEnvelope>, ApiError> {
    let rows = repo::list_all(&state.db).await.map_err(|e| {
        error!(error = %e, "user listing failed");
        ApiError::UserListFailed
    })?;

    Ok(Json(UserListEnvelope {
        message: "successfully listed users functionality",
        users: rows.into_iter().map(Into::into).collect(),
    }))
}

/// `PUT /profile` accepts either a JSON body or multipart/form-data with the
/// same text fields plus an optional `image` file. The file is pushed to the
/// object store and resolves to a URL before the profile is touched.
async fn read_update_payload(
    state: &AppState,
    req: Request,
) -> Result<(UpdateProfileRequest, Option<String>), ApiError> {
    let is_multipart = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase().starts_with("multipart/form-data"))
        .unwrap_or(false);

    if !is_multipart {
        let bytes = to_bytes(req.into_body(), BODY_LIMIT)
            .await
            .map_err(|_| ApiError::BadRequest("invalid request body"))?;
        if bytes.is_empty() {
            return Ok((UpdateProfileRequest::default(), None));
        }
        let payload = serde_json::from_slice(&bytes)
            .map_err(|_| ApiError::BadRequest("invalid profile payload"))?;
        return Ok((payload, None));
    }

    let mut multipart = Multipart::from_request(req, &())
        .await
        .map_err(|_| ApiError::BadRequest("invalid multipart body"))?;

    let mut fields = serde_json::Map::new();
    let mut uploaded = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("invalid multipart body"))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        if name == "image" {
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_owned();
            let data = field
                .bytes()
                .await
                .map_err(|_| ApiError::BadRequest("invalid multipart body"))?;
            let url = uploads::store_profile_image(state, data, &content_type)
                .await
                .map_err(|e| {
                    error!(error = %e, "profile image upload failed");
                    ApiError::ProfileUpdateFailed
                })?;
            uploaded = Some(url);
        } else {
            let text = field
                .text()
                .await
                .map_err(|_| ApiError::BadRequest("invalid multipart body"))?;
            fields.insert(name, Value::String(text));
        }
    }

    let payload = serde_json::from_value(Value::Object(fields))
        .map_err(|_| ApiError::BadRequest("invalid profile payload"))?;
    Ok((payload, uploaded))
}
