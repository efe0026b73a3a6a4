//! Common test utilities for integration tests.
//!
//! Provides fixtures for building clients against a wiremock server,
//! fake bearer tokens, and wire-shaped JSON bodies.

pub mod mocks;

pub use mocks::*;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

/// Build an unsigned JWT carrying the given payload JSON.
///
/// The client never verifies signatures, so a fixed `sig` part is enough
/// for tests.
pub fn fake_jwt(payload: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload);
    format!("{}.{}.sig", header, body)
}

/// A token for the user `ada` (uid 7, regular role).
pub fn ada_token() -> String {
    fake_jwt(r#"{"sub":"ada","uid":7,"role":0,"exp":1900000000}"#)
}

/// Wire-shaped post body with a given id and creation time.
pub fn post_body(id: i64, created_at: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "content": format!("post {}", id),
        "author": { "id": 1, "username": "ada" },
        "createdAt": created_at,
        "upvoteCount": 0,
        "downvoteCount": 0,
        "commentCount": 0,
    })
}
