//! Route handlers
//!
//! - `passcode` - verification, issuance and inspection
//! - `message` - inbound text messages
//! - `health` - store liveness

pub mod health;
pub mod message;
pub mod passcode;
