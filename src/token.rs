//! Access-token expiry evaluation

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Access/refresh token pair as issued by the backend and persisted locally
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived credential attached to API calls; carries an `exp` claim
    #[serde(rename = "access_token")]
    pub access: String,

    /// Longer-lived credential held for a future refresh flow
    #[serde(rename = "refresh_token")]
    pub refresh: String,
}

/// The claims this client reads out of an access token
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Claims {
    /// Expiry as seconds since the Unix epoch
    pub exp: i64,
}

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_secs() as i64
}

/// Check whether an access token is expired as of now.
///
/// The server is the verification authority, so the signature is not checked
/// here; only the `exp` claim matters. An empty or undecodable token counts
/// as expired rather than raising an error.
pub fn is_expired(token: &str) -> bool {
    match expires_at(token) {
        Some(exp) => exp <= now_secs(),
        None => true,
    }
}

fn expires_at(token: &str) -> Option<i64> {
    if token.is_empty() {
        return None;
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();
    // Signature algorithms the backend may sign with; none are verified here.
    validation.algorithms = vec![Algorithm::HS256, Algorithm::RS256, Algorithm::ES256];

    decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .ok()
        .map(|data| data.claims.exp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token_expiring_at(exp: i64) -> String {
        encode(
            &Header::default(),
            &Claims { exp },
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap()
    }

    #[test]
    fn future_expiry_is_not_expired() {
        let token = token_expiring_at(now_secs() + 3600);
        assert!(!is_expired(&token));
    }

    #[test]
    fn past_expiry_is_expired() {
        let token = token_expiring_at(now_secs() - 1);
        assert!(is_expired(&token));
    }

    #[test]
    fn expiry_exactly_now_counts_as_expired() {
        let token = token_expiring_at(now_secs());
        assert!(is_expired(&token));
    }

    #[test]
    fn empty_token_is_expired() {
        assert!(is_expired(""));
    }

    #[test]
    fn garbage_token_is_expired() {
        assert!(is_expired("not-a-jwt"));
        assert!(is_expired("aaaa.bbbb.cccc"));
    }

    #[test]
    fn token_without_exp_claim_is_expired() {
        let token = encode(
            &Header::default(),
            &serde_json::json!({ "sub": "someone" }),
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();
        assert!(is_expired(&token));
    }
}
