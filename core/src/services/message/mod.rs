//! Inbound text message routing
//!
//! Decides whether a free-text message asks for a passcode, matches a
//! configured keyword reply, or needs a help text.

mod keywords;
mod router;
mod types;

#[cfg(test)]
mod tests;

pub use keywords::{KeywordLookup, StaticKeywords};
pub use router::MessageRouter;
pub use types::MessageOutcome;
