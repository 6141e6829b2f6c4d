use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct CreatedRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: OffsetDateTime,
}

pub async fn username_or_email_taken(
    db: &PgPool,
    username: &str,
    email: &str,
) -> anyhow::Result<bool> {
    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        SELECT id
        FROM users
        WHERE username = $1 OR email = $2
        LIMIT 1
        "#,
    )
    .bind(username)
    .bind(email)
    .fetch_optional(db)
    .await?;
    Ok(row.is_some())
}

pub async fn insert(
    db: &PgPool,
    username: &str,
    email: &str,
    password_hash: &str,
) -> anyhow::Result<CreatedRow> {
    let row = sqlx::query_as::<_, CreatedRow>(
        r#"
        INSERT INTO users (username, email, password_hash)
        VALUES ($1, $2, $3)
        RETURNING id, username, email, created_at
        "#,
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .fetch_one(db)
    .await?;
    Ok(row)
}
