//! Passcode lifecycle module
//!
//! This module provides the passcode state machine:
//! - Collision-checked generation with a timestamp fallback
//! - Idempotent issuance (one active passcode per owner)
//! - One-shot verification with distinct failure outcomes
//! - Lazy cleanup of stale owner and code entries

mod config;
pub mod generator;
mod service;


pub use config::PasscodeServiceConfig;
pub use service::PasscodeService;
pub(crate) use service::mask_owner;
