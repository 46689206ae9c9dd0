//! API Request and Response Models
//!
//! Success responses carry `ok: true` plus the game fields; failure bodies
//! live in [`super::errors`]. Top-level fields are camelCase on the wire;
//! the nested user object keeps the platform's snake_case names.

use crate::auth::WebAppUser;
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Request body fallback for clients that cannot set the init-data header.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthRequest {
    #[serde(default, rename = "initData")]
    pub init_data: Option<String>,
}

/// Session bootstrap: identity plus current account state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapResponse {
    pub ok: bool,
    pub user: WebAppUser,
    pub points: u64,
    pub balls: u32,
    pub next_refill_in: u64,
}

/// Result of a successful ball drop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropResponse {
    pub ok: bool,
    pub prize: u32,
    pub bin_index: usize,
    pub points: u64,
    pub balls_left: u32,
    pub next_refill_in: u64,
}

/// Current totals without any side effects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordsResponse {
    pub ok: bool,
    pub points: u64,
    pub balls: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drop_response_uses_camel_case_keys() {
        let response = DropResponse {
            ok: true,
            prize: 75,
            bin_index: 1,
            points: 75,
            balls_left: 59,
            next_refill_in: 540,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["binIndex"], 1);
        assert_eq!(json["ballsLeft"], 59);
        assert_eq!(json["nextRefillIn"], 540);
    }

    #[test]
    fn test_bootstrap_response_keeps_platform_user_fields() {
        let response = BootstrapResponse {
            ok: true,
            user: WebAppUser {
                id: 42,
                first_name: Some("Ada".to_string()),
                username: None,
            },
            points: 0,
            balls: 60,
            next_refill_in: 0,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["user"]["id"], 42);
        assert_eq!(json["user"]["first_name"], "Ada");
        // Absent optional fields stay off the wire entirely.
        assert!(json["user"].get("username").is_none());
        assert_eq!(json["nextRefillIn"], 0);
    }

    #[test]
    fn test_auth_request_body_field_name() {
        let body: AuthRequest = serde_json::from_str(r#"{"initData":"a=1&hash=ff"}"#).unwrap();
        assert_eq!(body.init_data.as_deref(), Some("a=1&hash=ff"));

        let empty: AuthRequest = serde_json::from_str("{}").unwrap();
        assert!(empty.init_data.is_none());
    }
}
