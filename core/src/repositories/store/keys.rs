//! Logical key families kept in the store
//!
//! Backends may add their own namespace prefix on top of these.

/// Code index: passcode text to serialized record
pub const PASSCODE_PREFIX: &str = "passcode:";

/// Owner index: owner id to their active passcode text
pub const OWNER_PREFIX: &str = "user_passcode:";

/// Fixed-window counters
pub const RATE_LIMIT_PREFIX: &str = "rate_limit:";

pub fn passcode_key(code: &str) -> String {
    format!("{}{}", PASSCODE_PREFIX, code)
}

pub fn owner_key(owner_id: &str) -> String {
    format!("{}{}", OWNER_PREFIX, owner_id)
}

/// Limit key for a client IP, before the counter prefix is applied
pub fn ip_limit_key(ip: &str) -> String {
    format!("ip:{}", ip)
}

/// Limit key for an owner, before the counter prefix is applied
pub fn owner_limit_key(owner_id: &str) -> String {
    format!("user:{}", owner_id)
}

pub fn rate_limit_key(limit_key: &str) -> String {
    format!("{}{}", RATE_LIMIT_PREFIX, limit_key)
}
