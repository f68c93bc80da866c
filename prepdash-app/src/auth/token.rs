//! Access token payload inspection
//!
//! The client holds no signing secret, so tokens are never verified
//! here; only the expiry claim is read, to decide when to refresh.
//! Every failure mode degrades to `None`, which callers treat as
//! "always stale".

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct TokenClaims {
    exp: Option<i64>,
}

/// Decode the payload segment of a JWT without verifying the signature.
///
/// Returns `None` for anything that is not three dot-separated segments
/// with a base64-decodable JSON object in the middle.
pub fn decode_jwt_payload(token: &str) -> Option<serde_json::Value> {
    let payload = decode_payload_bytes(token)?;
    serde_json::from_slice(&payload).ok()
}

/// Expiry of an access token in epoch milliseconds.
///
/// The `exp` claim is seconds since epoch; the session stores
/// milliseconds, so the claim is scaled by 1000. Malformed tokens and
/// tokens without an `exp` claim yield `None`.
pub fn token_expiry_ms(token: &str) -> Option<i64> {
    let payload = decode_payload_bytes(token)?;
    let claims: TokenClaims = serde_json::from_slice(&payload).ok()?;
    claims.exp.map(|exp| exp * 1000)
}

fn decode_payload_bytes(token: &str) -> Option<Vec<u8>> {
    let mut segments = token.split('.');
    let _header = segments.next()?;
    let payload = segments.next()?;
    segments.next()?;

    if payload.is_empty() {
        return None;
    }

    // JWT payloads are URL-safe base64 without padding; normalize to the
    // standard alphabet and pad to a multiple of four before decoding
    let normalized = payload.replace('-', "+").replace('_', "/");
    let padded = match normalized.len() % 4 {
        0 => normalized,
        2 => format!("{}==", normalized),
        3 => format!("{}=", normalized),
        _ => return None,
    };

    BASE64.decode(padded).ok()
}
