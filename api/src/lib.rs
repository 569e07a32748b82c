//! HTTP adapter for the passcode service
//!
//! Exposes passcode issuance, verification and inspection, the text message
//! entry point and a health check over actix-web.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use app::{create_app, AppState};
