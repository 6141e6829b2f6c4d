use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload of the bearer token minted by the upstream auth service. The
/// profile routes only ever consume `email`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,    // user ID
    pub email: String,
    pub iat: usize,   // issued at (unix timestamp)
    pub exp: usize,   // expires at (unix timestamp)
    pub iss: String,
    pub aud: String,
}
