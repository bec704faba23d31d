//! Unverified decoding of bearer-token claims.
//!
//! The client never validates signatures; it only reads the payload to learn
//! whose token it was handed. The server remains the authority.

#[cfg(test)]
#[path = "jwt_test.rs"]
mod jwt_test;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;

use crate::error::SessionError;

/// Claims the client cares about.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    /// Username the token was issued for.
    pub sub: String,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub is_admin: Option<bool>,
    /// Expiry, seconds since the Unix epoch.
    #[serde(default)]
    pub exp: Option<i64>,
}

/// Decode the payload segment of a compact JWT.
///
/// # Errors
///
/// Returns [`SessionError::InvalidToken`] when the token is not three
/// dot-separated segments, the payload is not base64url JSON, or `sub` is
/// missing or blank.
pub fn decode_claims(token: &str) -> Result<TokenClaims, SessionError> {
    let mut segments = token.trim().split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (segments.next(), segments.next(), segments.next(), segments.next())
    else {
        return Err(SessionError::InvalidToken("expected three segments".to_owned()));
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| SessionError::InvalidToken(e.to_string()))?;
    let claims: TokenClaims =
        serde_json::from_slice(&bytes).map_err(|e| SessionError::InvalidToken(e.to_string()))?;
    if claims.sub.trim().is_empty() {
        return Err(SessionError::InvalidToken("empty subject".to_owned()));
    }
    Ok(claims)
}
