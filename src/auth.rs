//! Credential hashing and bearer-token sessions. Tokens are opaque random
//! strings held in memory; restarting the server logs everyone out.

use crate::errors::AppError;
use crate::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use rand::RngCore;
use sha2::{Digest, Sha256};

pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    hash_password(password) == password_hash
}

pub fn issue_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Extractor for authenticated routes. Resolves the `Authorization: Bearer`
/// header against the session table; anything else is a 401 before the
/// handler body runs.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: u64,
    pub token: String,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| AppError::unauthorized("missing bearer token"))?
            .to_string();

        let sessions = state.sessions.lock().await;
        let user_id = sessions
            .get(&token)
            .copied()
            .ok_or_else(|| AppError::unauthorized("invalid or expired token"))?;

        Ok(Self { user_id, token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashing_is_deterministic_and_verifiable() {
        let hash = hash_password("hunter22");
        assert_eq!(hash, hash_password("hunter22"));
        assert!(verify_password("hunter22", &hash));
        assert!(!verify_password("hunter23", &hash));
    }

    #[test]
    fn issued_tokens_are_distinct_hex_strings() {
        let first = issue_token();
        let second = issue_token();
        assert_eq!(first.len(), 64);
        assert_ne!(first, second);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
