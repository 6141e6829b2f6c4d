use sqlx::PgPool;
use tracing::info;
use uuid::{uuid, Uuid};

use crate::auth::password;

/// Author the seed articles hang off. Fixed so reseeding stays idempotent.
const FIXTURE_AUTHOR_ID: Uuid = uuid!("c90dee64-663d-4d8b-b34d-12acba22cd32");

const FIXTURE_ARTICLES: &[(&str, &str)] = &[
    ("The basics of java", "the-basics-of-java"),
    ("The basics of javaa", "the-basics-of-javaa"),
];

/// Development fixtures: one author and two articles. Applied only when
/// `SEED_DEV_DATA=true`; safe to run repeatedly.
pub async fn apply_dev_fixtures(db: &PgPool) -> anyhow::Result<()> {
    let hash = password::hash_password("Alpha123!")?;
    sqlx::query(
        r#"
        INSERT INTO users (id, username, email, password_hash, bio)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(FIXTURE_AUTHOR_ID)
    .bind("jdoe")
    .bind("jdoe@haven.io")
    .bind(&hash)
    .bind("fixture author")
    .execute(db)
    .await?;

    for &(title, slug) in FIXTURE_ARTICLES {
        sqlx::query(
            r#"
            INSERT INTO articles (id, title, slug, body, author_id)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (slug) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(slug)
        .bind("JavaScript is a language which has many frameworks and libraries")
        .bind(FIXTURE_AUTHOR_ID)
        .execute(db)
        .await?;
    }

    info!("dev fixtures applied");
    Ok(())
}
