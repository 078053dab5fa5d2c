//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes under `/api`
//! - Authentication middleware
//! - The authenticated-identity extractor
//! - Error-to-response mapping

pub mod error;
pub mod middleware;
pub mod routes;

pub use error::ApiError;

use axum::Router;
use std::sync::Arc;
use tally_core::{AccountDirectory, AccountStore, EntryStore, LedgerService};
use tally_shared::TokenService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Registration and credential checks.
    pub directory: Arc<AccountDirectory>,
    /// Owner-scoped ledger operations.
    pub ledger: Arc<LedgerService>,
    /// Token issuance and verification.
    pub tokens: Arc<TokenService>,
}

impl AppState {
    /// Wires the services over the given stores.
    #[must_use]
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        entries: Arc<dyn EntryStore>,
        tokens: TokenService,
    ) -> Self {
        Self {
            directory: Arc::new(AccountDirectory::new(accounts)),
            ledger: Arc::new(LedgerService::new(entries)),
            tokens: Arc::new(tokens),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
