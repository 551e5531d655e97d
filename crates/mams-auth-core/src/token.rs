//! Access token decoding
//!
//! Reads the claim payload of a three-segment access token without checking
//! its signature. The service verifies signatures on every request; the client
//! only needs the claims to decide whether a stored token is worth using.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use mams_types::{BaseId, IdRepr, Role, UserId};
use serde::Deserialize;

/// Claims carried by an access token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Username (`sub`, or the issuer's `username` claim)
    pub subject: String,
    /// Advisory role; the profile endpoint is authoritative
    pub role: Option<Role>,
    /// Base the user is restricted to, `None` when unrestricted
    pub base_scope: Option<BaseId>,
    /// Numeric user id, when the issuer includes one
    pub user_id: Option<UserId>,
    /// Expiry instant
    pub expires_at: DateTime<Utc>,
}

impl Claims {
    /// Check if the token has expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[derive(Deserialize)]
struct RawClaims {
    #[serde(default)]
    sub: Option<IdRepr>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    base: Option<IdRepr>,
    #[serde(default)]
    base_id: Option<IdRepr>,
    #[serde(default)]
    user_id: Option<IdRepr>,
    #[serde(default)]
    exp: Option<f64>,
}

impl RawClaims {
    fn into_claims(self) -> Option<Claims> {
        let subject = self
            .username
            .filter(|u| !u.trim().is_empty())
            .or_else(|| self.sub.map(String::from))
            .filter(|s| !s.trim().is_empty())?;

        let exp = self.exp.filter(|e| e.is_finite())?;
        let expires_at = DateTime::<Utc>::from_timestamp(exp.floor() as i64, 0)?;

        let role = self.role.and_then(|r| r.parse().ok());
        let base_scope = self
            .base
            .or(self.base_id)
            .map(BaseId::from)
            .filter(|b| !b.is_empty());

        Some(Claims {
            subject,
            role,
            base_scope,
            user_id: self.user_id.map(UserId::from),
            expires_at,
        })
    }
}

/// Decode the claims of an access token.
///
/// Returns `None` for anything that is not three dot-separated segments with a
/// base64url JSON payload carrying a subject and an expiry. Never panics.
pub fn decode(token: &str) -> Option<Claims> {
    let mut segments = token.trim().split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        tracing::debug!("token does not have three segments");
        return None;
    };

    let bytes = match URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!("token payload is not base64url: {}", e);
            return None;
        }
    };

    match serde_json::from_slice::<RawClaims>(&bytes) {
        Ok(raw) => raw.into_claims(),
        Err(e) => {
            tracing::debug!("token payload is not a claim set: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_with(payload: serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.to_string());
        format!("{header}.{body}.signature")
    }

    #[test]
    fn test_decode_issuer_claims() {
        let token = token_with(serde_json::json!({
            "token_type": "access",
            "exp": 1_900_000_000,
            "user_id": 4,
            "username": "cmd1",
            "role": "BASE_COMMANDER",
            "base_id": 7
        }));

        let claims = decode(&token).unwrap();
        assert_eq!(claims.subject, "cmd1");
        assert_eq!(claims.role, Some(Role::BaseCommander));
        assert_eq!(claims.base_scope, Some(BaseId::new("7")));
        assert_eq!(claims.user_id, Some(UserId::new("4")));
        assert_eq!(claims.expires_at.timestamp(), 1_900_000_000);
    }

    #[test]
    fn test_decode_sub_and_string_base() {
        let token = token_with(serde_json::json!({
            "sub": "cmd1", "role": "BASE_COMMANDER", "base": "B7", "exp": 1_900_000_000
        }));

        let claims = decode(&token).unwrap();
        assert_eq!(claims.subject, "cmd1");
        assert_eq!(claims.base_scope, Some(BaseId::new("B7")));
    }

    #[test]
    fn test_null_base_is_unrestricted() {
        let token = token_with(serde_json::json!({
            "sub": "admin", "role": "ADMIN", "base": null, "exp": 1_900_000_000
        }));
        assert!(decode(&token).unwrap().base_scope.is_none());
    }

    #[test]
    fn test_unknown_role_decodes_as_absent() {
        let token = token_with(serde_json::json!({
            "sub": "x", "role": "QUARTERMASTER", "exp": 1_900_000_000
        }));
        assert!(decode(&token).unwrap().role.is_none());
    }

    #[test]
    fn test_padded_payload_accepted() {
        let header = URL_SAFE_NO_PAD.encode(b"{}");
        let body = base64::engine::general_purpose::URL_SAFE
            .encode(br#"{"sub":"a","exp":1900000000}"#);
        assert!(body.ends_with('='));

        assert!(decode(&format!("{header}.{body}.sig")).is_some());
    }

    #[test]
    fn test_missing_required_claims() {
        assert!(decode(&token_with(serde_json::json!({"sub": "x"}))).is_none());
        assert!(decode(&token_with(serde_json::json!({"exp": 1_900_000_000}))).is_none());
        assert!(decode(&token_with(serde_json::json!({"sub": "", "exp": 1}))).is_none());
    }

    #[test]
    fn test_wrong_segment_count() {
        assert!(decode("").is_none());
        assert!(decode("a.b").is_none());
        assert!(decode("a.b.c.d").is_none());
    }

    #[test]
    fn test_payload_not_json() {
        let body = URL_SAFE_NO_PAD.encode(b"not json");
        assert!(decode(&format!("h.{body}.s")).is_none());
        assert!(decode("h.!!!.s").is_none());
    }

    #[test]
    fn test_expiry_boundary() {
        let token = token_with(serde_json::json!({"sub": "x", "exp": 1_900_000_000}));
        let claims = decode(&token).unwrap();
        let at_exp = DateTime::<Utc>::from_timestamp(1_900_000_000, 0).unwrap();

        assert!(claims.is_expired_at(at_exp));
        assert!(!claims.is_expired_at(at_exp - chrono::Duration::seconds(1)));
    }
}
