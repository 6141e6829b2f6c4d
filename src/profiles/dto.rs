use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::{ProfileRow, UserListRow};

/// Mutable profile fields accepted by `PUT /profile`. All optional; absent
/// fields still get written (see `repo::overwrite_by_email`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub phone: Option<String>,
    pub facebook: Option<String>,
    pub twitter: Option<String>,
    pub linked_in: Option<String>,
    pub instagram: Option<String>,
    pub location: Option<String>,
}

/// Public profile view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
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

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Self {
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            bio: row.bio,
            image: row.image,
            phone: row.phone,
            facebook: row.facebook,
            twitter: row.twitter,
            linked_in: row.linked_in,
            instagram: row.instagram,
            location: row.location,
        }
    }
}

/// What `PUT /profile` answers with: the submitted fields echoed back, plus
/// the resolved image URL. Not re-read from the store.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileEcho {
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

impl ProfileEcho {
    pub fn from_payload(payload: UpdateProfileRequest, image: Option<String>) -> Self {
        Self {
            first_name: payload.first_name,
            last_name: payload.last_name,
            bio: payload.bio,
            image,
            phone: payload.phone,
            facebook: payload.facebook,
            twitter: payload.twitter,
            linked_in: payload.linked_in,
            instagram: payload.instagram,
            location: payload.location,
        }
    }
}

/// Row shape for `GET /users`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
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
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<UserListRow> for UserSummary {
    fn from(row: UserListRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            bio: row.bio,
            image: row.image,
            phone: row.phone,
            facebook: row.facebook,
            twitter: row.twitter,
            linked_in: row.linked_in,
            instagram: row.instagram,
            location: row.location,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileEnvelope {
    pub message: &'static str,
    pub profile: Profile,
}

#[derive(Debug, Serialize)]
pub struct ProfileEchoEnvelope {
    pub message: &'static str,
    pub profile: ProfileEcho,
}

#[derive(Debug, Serialize)]
pub struct UserListEnvelope {
    pub message: &'static str,
    pub users: Vec<UserSummary>,
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    fn sample_profile_row() -> ProfileRow {
        ProfileRow {
            username: "jdoe".into(),
            first_name: Some("John".into()),
            last_name: Some("Doe".into()),
            bio: Some("writes things".into()),
            image: Some("https://store.test/inkhaven/profiles/x.png".into()),
            phone: None,
            facebook: None,
            twitter: Some("@jdoe".into()),
            linked_in: None,
            instagram: None,
            location: Some("Kampala".into()),
        }
    }

    #[test]
    fn profile_view_withholds_email_and_password() {
        let profile: Profile = sample_profile_row().into();
        let value = serde_json::to_value(&profile).expect("serialize");
        let keys = value.as_object().expect("object");
        assert!(!keys.contains_key("email"));
        assert!(!keys.contains_key("password"));
        assert!(!keys.contains_key("passwordHash"));
        assert_eq!(value["username"], "jdoe");
    }

    #[test]
    fn profile_view_uses_camel_case_names() {
        let profile: Profile = sample_profile_row().into();
        let value = serde_json::to_value(&profile).expect("serialize");
        let keys = value.as_object().expect("object");
        assert!(keys.contains_key("firstName"));
        assert!(keys.contains_key("linkedIn"));
        assert!(!keys.contains_key("first_name"));
    }

    #[test]
    fn echo_reflects_only_the_submitted_fields() {
        let payload: UpdateProfileRequest =
            serde_json::from_value(serde_json::json!({ "firstName": "Jane" })).expect("payload");
        let echo = ProfileEcho::from_payload(payload, Some("https://prior.img/p.png".into()));
        let value = serde_json::to_value(&echo).expect("serialize");

        assert_eq!(value["firstName"], "Jane");
        assert_eq!(value["lastName"], serde_json::Value::Null);
        assert_eq!(value["bio"], serde_json::Value::Null);
        assert_eq!(value["location"], serde_json::Value::Null);
        assert_eq!(value["image"], "https://prior.img/p.png");
    }

    #[test]
    fn update_payload_ignores_unknown_and_immutable_fields() {
        let payload: UpdateProfileRequest = serde_json::from_value(serde_json::json!({
            "firstName": "Jane",
            "email": "sneaky@haven.io",
            "password": "Alpha123!"
        }))
        .expect("payload");
        assert_eq!(payload.first_name.as_deref(), Some("Jane"));
        // Email and password are simply not part of the mutable field set.
    }

    #[test]
    fn user_summary_serializes_timestamps_as_rfc3339() {
        let summary: UserSummary = UserListRow {
            id: Uuid::nil(),
            username: "jdoe".into(),
            email: "jdoe@haven.io".into(),
            bio: None,
            image: None,
            phone: None,
            facebook: None,
            twitter: None,
            linked_in: None,
            instagram: None,
            location: None,
            created_at: datetime!(2019-07-17 08:49:42 UTC),
            updated_at: datetime!(2019-07-17 08:49:42 UTC),
        }
        .into();
        let value = serde_json::to_value(&summary).expect("serialize");
        assert_eq!(value["createdAt"], "2019-07-17T08:49:42Z");
        assert_eq!(value["email"], "jdoe@haven.io");
        let keys = value.as_object().expect("object");
        assert!(!keys.contains_key("password"));
        assert!(!keys.contains_key("passwordHash"));
    }
}
