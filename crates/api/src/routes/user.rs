//! Identity echo for the authenticated caller.

use axum::{Json, Router, routing::get};
use serde::Serialize;
use tally_shared::types::AccountId;

use crate::{AppState, middleware::AuthUser};

/// Response of `GET /user/me`.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    /// Fixed confirmation text.
    pub message: &'static str,
    /// The account the token was issued to.
    pub user_id: AccountId,
}

/// Creates the user router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/user/me", get(me))
}

/// GET /user/me - Echo the authenticated account ID.
async fn me(user: AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        message: "You are authenticated",
        user_id: user.account_id(),
    })
}
