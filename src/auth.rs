//! Mini-app init-data authentication.
//!
//! The chat platform hands the web app a signed query string ("init data")
//! which the client forwards on every API call. Verification recomputes the
//! platform's HMAC chain: the bot token is keyed with the literal string
//! `"WebAppData"` to derive a signing key, and the sorted key=value pairs are
//! signed with that key. Auth failures are expected, frequent outcomes, so
//! everything here returns sentinels instead of errors.

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// HMAC key used by the platform to derive the per-bot signing key.
const SIGNING_KEY_SEED: &[u8] = b"WebAppData";

/// Identity extracted from a verified init-data payload.
///
/// Derived fresh from every request; never stored. Unknown fields in the
/// platform's user JSON are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebAppUser {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Checks that `init_data` was signed by the platform for the bot owning
/// `bot_token`.
///
/// Fails closed: a missing `hash` pair, malformed hex, or any signature
/// mismatch yields `false`, never an error. The comparison is constant-time.
pub fn verify_init_data(init_data: &str, bot_token: &str) -> bool {
    let mut claimed_sig: Option<String> = None;
    let mut pairs: Vec<(String, String)> = Vec::new();

    for (key, value) in form_urlencoded::parse(init_data.as_bytes()) {
        if key == "hash" {
            claimed_sig = Some(value.into_owned());
        } else {
            pairs.push((key.into_owned(), value.into_owned()));
        }
    }

    let Some(claimed_sig) = claimed_sig else {
        return false;
    };
    let Ok(claimed_bytes) = hex::decode(claimed_sig.as_bytes()) else {
        return false;
    };

    // Canonical check string: pairs sorted by key, joined with newlines.
    pairs.sort();
    let check_string = pairs
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("\n");

    // Signing key = HMAC_SHA256(key: "WebAppData", msg: bot_token).
    let Ok(mut seed_mac) = HmacSha256::new_from_slice(SIGNING_KEY_SEED) else {
        return false;
    };
    seed_mac.update(bot_token.as_bytes());
    let signing_key = seed_mac.finalize().into_bytes();

    let Ok(mut mac) = HmacSha256::new_from_slice(signing_key.as_slice()) else {
        return false;
    };
    mac.update(check_string.as_bytes());
    mac.verify_slice(&claimed_bytes).is_ok()
}

/// Pulls the `user` pair out of `init_data` and decodes it.
///
/// Only meaningful after [`verify_init_data`] accepted the payload. Malformed
/// JSON or a missing numeric `id` is treated as "no identity".
pub fn extract_identity(init_data: &str) -> Option<WebAppUser> {
    let user_json = form_urlencoded::parse(init_data.as_bytes())
        .find(|(key, _)| key == "user")
        .map(|(_, value)| value.into_owned())?;

    serde_json::from_str(&user_json).ok()
}
