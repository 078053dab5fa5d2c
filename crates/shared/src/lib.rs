//! Shared types, errors, tokens, and configuration for Tally.
//!
//! This crate provides the pieces every other crate needs:
//! - Typed IDs for accounts and ledger entries
//! - The application-wide error taxonomy
//! - Identity token issuance and verification
//! - Auth request/response payloads
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::Claims;
pub use config::AppConfig;
pub use error::{AppError, FieldErrors};
pub use jwt::{JwtError, TokenConfig, TokenService};
