//! Transaction management routes.
//!
//! All handlers act on the authenticated account only; another account's
//! transaction looks exactly like a missing one.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};
use axum_extra::extract::WithRejection;
use serde::Serialize;
use tracing::info;

use crate::{AppState, error::ApiError, middleware::AuthUser};
use tally_core::{Balance, EntryInput, LedgerEntry};
use tally_shared::types::EntryId;

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions).post(create_transaction))
        .route("/transactions/balance", get(get_balance))
        .route(
            "/transactions/{id}",
            put(update_transaction).delete(delete_transaction),
        )
}

/// Confirmation body for a delete.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Fixed confirmation text.
    pub message: &'static str,
}

/// POST /transactions - Record an income or expense.
async fn create_transaction(
    State(state): State<AppState>,
    user: AuthUser,
    WithRejection(Json(input), _): WithRejection<Json<EntryInput>, ApiError>,
) -> Result<Json<LedgerEntry>, ApiError> {
    let entry = state.ledger.create(user.account_id(), &input).await?;
    info!(account_id = %user.account_id(), entry_id = %entry.id, "Transaction created");
    Ok(Json(entry))
}

/// GET /transactions - List the caller's transactions.
async fn list_transactions(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<LedgerEntry>>, ApiError> {
    Ok(Json(state.ledger.list(user.account_id()).await?))
}

/// PUT /transactions/{id} - Replace a transaction's fields.
async fn update_transaction(
    State(state): State<AppState>,
    user: AuthUser,
    WithRejection(Path(id), _): WithRejection<Path<EntryId>, ApiError>,
    WithRejection(Json(input), _): WithRejection<Json<EntryInput>, ApiError>,
) -> Result<Json<LedgerEntry>, ApiError> {
    let entry = state.ledger.update(user.account_id(), id, &input).await?;
    info!(account_id = %user.account_id(), entry_id = %id, "Transaction updated");
    Ok(Json(entry))
}

/// DELETE /transactions/{id} - Remove a transaction.
async fn delete_transaction(
    State(state): State<AppState>,
    user: AuthUser,
    WithRejection(Path(id), _): WithRejection<Path<EntryId>, ApiError>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.ledger.delete(user.account_id(), id).await?;
    info!(account_id = %user.account_id(), entry_id = %id, "Transaction deleted");
    Ok(Json(DeleteResponse {
        message: "Transaction deleted",
    }))
}

/// GET /transactions/balance - Income, expense, net and zone.
async fn get_balance(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Balance>, ApiError> {
    Ok(Json(state.ledger.balance(user.account_id()).await?))
}
