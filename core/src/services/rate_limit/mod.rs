//! Fixed-window request gating by client IP and by owner

mod gate;
mod limiter;


pub use gate::{RateLimitPolicy, RequestGate};
pub use limiter::FixedWindowRateLimiter;
