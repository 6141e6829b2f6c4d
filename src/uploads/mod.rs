use anyhow::Context;
use bytes::Bytes;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::state::AppState;

/// Push a profile image to the object store and return the URL the profile
/// record will carry.
pub async fn store_profile_image(
    state: &AppState,
    data: Bytes,
    content_type: &str,
) -> anyhow::Result<String> {
    let ext = ext_from_mime(content_type).unwrap_or("bin");
    let key = format!("profiles/{}.{}", Uuid::new_v4(), ext);
    state
        .storage
        .put_object(&key, data, content_type)
        .await
        .with_context(|| format!("put_object {}", key))?;
    Ok(public_object_url(&state.config, &key))
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}

fn public_object_url(config: &AppConfig, key: &str) -> String {
    format!(
        "{}/{}/{}",
        config.minio_endpoint.trim_end_matches('/'),
        config.minio_bucket,
        key
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ext_from_mime_knows_the_image_types() {
        assert_eq!(ext_from_mime("image/jpeg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/jpg"), Some("jpg"));
        assert_eq!(ext_from_mime("image/png"), Some("png"));
        assert_eq!(ext_from_mime("image/webp"), Some("webp"));
        assert_eq!(ext_from_mime("image/heic"), Some("heic"));
        assert_eq!(ext_from_mime("application/octet-stream"), None);
    }

    #[tokio::test]
    async fn stored_image_resolves_to_a_bucket_url() {
        let state = AppState::fake();
        let url = store_profile_image(&state, Bytes::from_static(b"png bytes"), "image/png")
            .await
            .expect("upload");
        assert!(url.starts_with("https://store.test/inkhaven-test/profiles/"));
        assert!(url.ends_with(".png"));
    }

    #[tokio::test]
    async fn unknown_mime_falls_back_to_bin() {
        let state = AppState::fake();
        let url = store_profile_image(&state, Bytes::from_static(b"??"), "application/pdf")
            .await
            .expect("upload");
        assert!(url.ends_with(".bin"));
    }

    #[test]
    fn public_url_tolerates_trailing_slash_endpoints() {
        let state = AppState::fake();
        let mut config = (*state.config).clone();
        config.minio_endpoint = "https://store.test/".into();
        assert_eq!(
            public_object_url(&config, "profiles/a.png"),
            "https://store.test/inkhaven-test/profiles/a.png"
        );
    }
}
