//! Business services containing domain logic and use cases.

pub mod clock;
pub mod message;
pub mod passcode;
pub mod rate_limit;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use message::{KeywordLookup, MessageOutcome, MessageRouter, StaticKeywords};
pub use passcode::{generator, PasscodeService, PasscodeServiceConfig};
pub use rate_limit::{FixedWindowRateLimiter, RateLimitPolicy, RequestGate};
