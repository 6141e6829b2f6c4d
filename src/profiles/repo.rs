use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::UpdateProfileRequest;

/// What the update path needs from the acting user's row: the id for log
/// context and the stored image for the no-upload fallback.
#[derive(Debug, Clone, FromRow)]
pub struct UserIdentityRow {
    pub id: Uuid,
    pub image: Option<String>,
}

/// Allow-list projection for public profile views. No email, no password.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub phone: Option<String>,
    pub facebook: Option<String>,
    pub twitter: Option<String>,
    pub linked_in: Option<String>,
    pub instagram: Option<String>,
    pub location: Option<String>,
}

/// Allow-list projection for the user listing. Email is part of this view;
/// the password hash is not.
#[derive(Debug, Clone, FromRow)]
pub struct UserListRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub phone: Option<String>,
    pub facebook: Option<String>,
    pub twitter: Option<String>,
    pub linked_in: Option<String>,
    pub instagram: Option<String>,
    pub location: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

pub async fn find_by_username(db: &PgPool, username: &str) -> anyhow::Result<Option<ProfileRow>> {
    let row = sqlx::query_as::<_, ProfileRow>(
        r#"
        SELECT username, first_name, last_name, bio, image, phone,
               facebook, twitter, linked_in, instagram, location
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<UserIdentityRow>> {
    let user = sqlx::query_as::<_, UserIdentityRow>(
        r#"
        SELECT id, image
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(db)
    .await?;
    Ok(user)
}

/// Writes every mutable profile field from the payload as-is. Absent fields
/// overwrite the stored values with NULL; there is no partial merge. `image`
/// is resolved by the caller (fresh upload or the previously stored value).
pub async fn overwrite_by_email(
    db: &PgPool,
    email: &str,
    changes: &UpdateProfileRequest,
    image: Option<&str>,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        UPDATE users
        SET first_name = $2,
            last_name  = $3,
            bio        = $4,
            image      = $5,
            phone      = $6,
            facebook   = $7,
            twitter    = $8,
            linked_in  = $9,
            instagram  = $10,
            location   = $11,
            updated_at = now()
        WHERE email = $1
        "#,
    )
    .bind(email)
    .bind(changes.first_name.as_deref())
    .bind(changes.last_name.as_deref())
    .bind(changes.bio.as_deref())
    .bind(image)
    .bind(changes.phone.as_deref())
    .bind(changes.facebook.as_deref())
    .bind(changes.twitter.as_deref())
    .bind(changes.linked_in.as_deref())
    .bind(changes.instagram.as_deref())
    .bind(changes.location.as_deref())
    .execute(db)
    .await?;
    Ok(())
}

pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<UserListRow>> {
    let rows = sqlx::query_as::<_, UserListRow>(
        r#"
        SELECT id, username, email, bio, image, phone, facebook, twitter,
               linked_in, instagram, location, created_at, updated_at
        FROM users
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}
