//! # Passcode Core
//!
//! Business logic for the passcode service: issuing short-lived single-use
//! passcodes, verifying them exactly once, fixed-window request gating and
//! routing of inbound text messages. Persistence is reached only through the
//! [`KeyValueStore`] trait so the same engine runs over Redis or in memory.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
