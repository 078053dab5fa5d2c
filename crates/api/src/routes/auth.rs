//! Authentication routes for register and login.

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use axum_extra::extract::WithRejection;
use tracing::{info, warn};

use crate::{AppState, error::ApiError};
use tally_core::DirectoryError;
use tally_shared::auth::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

/// POST /auth/register - Create an account.
async fn register(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<RegisterRequest>, ApiError>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let account = state.directory.register(&payload).await?;
    info!(account_id = %account.id, "Account registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            user: account.info(),
        }),
    ))
}

/// POST /auth/login - Exchange credentials for a bearer token.
async fn login(
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> Result<Json<LoginResponse>, ApiError> {
    let account = match state.directory.authenticate(&payload).await {
        Ok(account) => account,
        Err(e @ DirectoryError::InvalidCredentials) => {
            warn!("Failed login attempt");
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    let token = state.tokens.issue(account.id)?;
    info!(account_id = %account.id, "User logged in");

    Ok(Json(LoginResponse::bearer(token, state.tokens.expires_in())))
}
