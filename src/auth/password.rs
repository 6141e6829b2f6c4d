use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use argon2::password_hash::{PasswordHash, PasswordVerifier};
    use argon2::Argon2;

    use super::*;

    #[test]
    fn hash_verifies_against_the_hashed_password() {
        let hash = hash_password("Alpha123!").expect("hashing should succeed");
        let parsed = PasswordHash::new(&hash).expect("valid phc string");
        assert!(Argon2::default()
            .verify_password(b"Alpha123!", &parsed)
            .is_ok());
        assert!(Argon2::default()
            .verify_password(b"Alpha123?", &parsed)
            .is_err());
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("Alpha123!").expect("hash a");
        let b = hash_password("Alpha123!").expect("hash b");
        assert_ne!(a, b);
    }
}
