//! Request Handlers
//!
//! Each game endpoint authenticates the init-data payload before touching
//! any state. Economy mutations for a request happen inside a single
//! per-player critical section.

use super::{
    errors::GameError,
    middleware::{RequestId, INIT_DATA_HEADER},
    models::{AuthRequest, BootstrapResponse, DropResponse, HealthResponse, RecordsResponse},
};
use crate::{auth, economy::AccountLedger, game::PrizeBoard};
use axum::{extract::State, http::HeaderMap, Extension, Json};
use std::sync::Arc;
use tracing::{debug, warn};

/// Shared application state
pub struct AppState {
    pub ledger: AccountLedger,
    pub board: PrizeBoard,
    pub bot_token: String,
    pub skip_verification: bool,
}

/// Wall-clock in unix milliseconds, the economy's time base.
fn unix_millis() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}

/// Shared auth preamble: header first, JSON body as fallback.
fn authenticate(
    state: &AppState,
    request_id: &RequestId,
    headers: &HeaderMap,
    body: Option<&AuthRequest>,
) -> Result<auth::WebAppUser, GameError> {
    let init_data = headers
        .get(INIT_DATA_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .or_else(|| body.and_then(|b| b.init_data.clone()));

    let Some(init_data) = init_data else {
        warn!(request_id = %request_id.0, "auth rejected: missing init data");
        return Err(GameError::MissingInitData);
    };

    if state.skip_verification {
        debug!(request_id = %request_id.0, "signature check bypassed (dev mode)");
    } else if !auth::verify_init_data(&init_data, &state.bot_token) {
        warn!(request_id = %request_id.0, "auth rejected: bad signature");
        return Err(GameError::BadInitData);
    }

    auth::extract_identity(&init_data).ok_or_else(|| {
        warn!(request_id = %request_id.0, "auth rejected: no usable user identity");
        GameError::NoUser
    })
}

/// Health check handler - minimal response time
/// GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "Running".to_string(),
    })
}

/// Session bootstrap: get-or-create the account, catch up the refill clock,
/// and return identity plus balances.
/// POST /api/bootstrap
pub async fn bootstrap_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Option<Json<AuthRequest>>,
) -> Result<Json<BootstrapResponse>, GameError> {
    let user = authenticate(&state, &request_id, &headers, body.as_deref())?;

    let snapshot = state.ledger.bootstrap(user.id, unix_millis());
    debug!(
        request_id = %request_id.0,
        user_id = user.id,
        balls = snapshot.balls,
        "bootstrap"
    );

    Ok(Json(BootstrapResponse {
        ok: true,
        user,
        points: snapshot.points,
        balls: snapshot.balls,
        next_refill_in: snapshot.next_refill_in,
    }))
}

/// Drop a ball: refill, spend, draw a prize, award points.
/// POST /api/drop
pub async fn drop_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Option<Json<AuthRequest>>,
) -> Result<Json<DropResponse>, GameError> {
    let user = authenticate(&state, &request_id, &headers, body.as_deref())?;
    let now_ms = unix_millis();

    // Refill, spend and award under one per-player critical section so two
    // concurrent drops cannot double-spend the same ball.
    let outcome = state.ledger.with_account(user.id, now_ms, |account, policy| {
        account.apply_refill(now_ms, policy);
        if !account.spend_ball() {
            return None;
        }

        let (prize, bin_index) = state.board.drop_ball(&mut rand::thread_rng());
        let points = account.add_points(prize as u64);

        Some(DropResponse {
            ok: true,
            prize,
            bin_index,
            points,
            balls_left: account.balls(),
            next_refill_in: account.seconds_until_refill(now_ms, policy),
        })
    });

    match outcome {
        Some(response) => {
            debug!(
                request_id = %request_id.0,
                user_id = user.id,
                prize = response.prize,
                bin = response.bin_index,
                "drop"
            );
            Ok(Json(response))
        }
        None => {
            debug!(request_id = %request_id.0, user_id = user.id, "drop refused: no balls");
            Err(GameError::NoBalls)
        }
    }
}

/// Current totals, no side effects.
/// POST /api/records
pub async fn records_handler(
    Extension(request_id): Extension<RequestId>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Option<Json<AuthRequest>>,
) -> Result<Json<RecordsResponse>, GameError> {
    let user = authenticate(&state, &request_id, &headers, body.as_deref())?;

    let snapshot = state.ledger.snapshot(user.id, unix_millis());
    Ok(Json(RecordsResponse {
        ok: true,
        points: snapshot.points,
        balls: snapshot.balls,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EconomyConfig;

    fn test_state(skip_verification: bool) -> AppState {
        AppState {
            ledger: AccountLedger::new(EconomyConfig::default()),
            board: PrizeBoard::default(),
            bot_token: "test-token".to_string(),
            skip_verification,
        }
    }

    fn request_id() -> RequestId {
        RequestId("test".to_string())
    }

    #[test]
    fn test_authenticate_missing_payload() {
        let state = test_state(false);
        let err = authenticate(&state, &request_id(), &HeaderMap::new(), None).unwrap_err();
        assert_eq!(err, GameError::MissingInitData);
    }

    #[test]
    fn test_authenticate_rejects_unsigned_payload() {
        let state = test_state(false);
        let body = AuthRequest {
            init_data: Some("user=%7B%22id%22%3A1%7D".to_string()),
        };
        let err =
            authenticate(&state, &request_id(), &HeaderMap::new(), Some(&body)).unwrap_err();
        assert_eq!(err, GameError::BadInitData);
    }

    #[test]
    fn test_authenticate_dev_bypass_still_needs_identity() {
        let state = test_state(true);

        let body = AuthRequest {
            init_data: Some("user=%7B%22id%22%3A9%7D".to_string()),
        };
        let user = authenticate(&state, &request_id(), &HeaderMap::new(), Some(&body)).unwrap();
        assert_eq!(user.id, 9);

        let body = AuthRequest {
            init_data: Some("auth_date=1".to_string()),
        };
        let err =
            authenticate(&state, &request_id(), &HeaderMap::new(), Some(&body)).unwrap_err();
        assert_eq!(err, GameError::NoUser);
    }

    #[test]
    fn test_header_takes_precedence_over_body() {
        let state = test_state(true);

        let mut headers = HeaderMap::new();
        headers.insert(INIT_DATA_HEADER, "user=%7B%22id%22%3A1%7D".parse().unwrap());
        let body = AuthRequest {
            init_data: Some("user=%7B%22id%22%3A2%7D".to_string()),
        };

        let user = authenticate(&state, &request_id(), &headers, Some(&body)).unwrap();
        assert_eq!(user.id, 1);
    }
}
