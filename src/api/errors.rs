//! API failure responses.
//!
//! The wire format for every failure is `{ "ok": false, "error": <code> }`.
//! Authentication rejections map to 401; running out of balls is a routine
//! game outcome and ships with a 200.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Failure body shared by all error responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub ok: bool,
    pub error: String,
}

/// Structured failure outcomes surfaced to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    /// No init-data payload in header or body.
    MissingInitData,
    /// Payload present but the signature check failed.
    BadInitData,
    /// Verified payload carried no usable user identity.
    NoUser,
    /// Play attempt with an empty ball balance.
    NoBalls,
}

impl GameError {
    /// Wire error code.
    pub fn code(&self) -> &'static str {
        match self {
            GameError::MissingInitData => "MISSING_INITDATA",
            GameError::BadInitData => "BAD_INITDATA",
            GameError::NoUser => "NO_USER",
            GameError::NoBalls => "NO_BALLS",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            GameError::MissingInitData | GameError::BadInitData | GameError::NoUser => {
                StatusCode::UNAUTHORIZED
            }
            GameError::NoBalls => StatusCode::OK,
        }
    }
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::error::Error for GameError {}

impl IntoResponse for GameError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            ok: false,
            error: self.code().to_string(),
        });
        (self.status(), body).into_response()
    }
}
