use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::CreatedRow;

/// Registration body, already screened by the validation middleware.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<CreatedRow> for CreatedUser {
    fn from(row: CreatedRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedUserEnvelope {
    pub message: &'static str,
    pub user: CreatedUser,
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn created_user_never_carries_the_password() {
        let user: CreatedUser = CreatedRow {
            id: Uuid::nil(),
            username: "alpha123".into(),
            email: "martinez@yahoo.com".into(),
            created_at: datetime!(2019-07-10 04:27:22 UTC),
        }
        .into();
        let value = serde_json::to_value(&user).expect("serialize");
        let keys = value.as_object().expect("object");
        assert!(!keys.contains_key("password"));
        assert!(!keys.contains_key("passwordHash"));
        assert_eq!(value["createdAt"], "2019-07-10T04:27:22Z");
    }
}
