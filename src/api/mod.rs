//! Mini-App Game API Service
//!
//! HTTP boundary for the game: authenticates init-data payloads, then
//! orchestrates the economy ledger and prize board per request.

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;

pub use server::ApiServer;
