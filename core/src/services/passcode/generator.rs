//! Passcode text generation and format checks

use chrono::{DateTime, Timelike, Utc};
use once_cell::sync::Lazy;
use passcode_shared::config::passcode::{MAX_PASSCODE_LENGTH, MIN_PASSCODE_LENGTH};
use rand::{rngs::OsRng, Rng};
use regex::Regex;

/// Symbols a passcode is drawn from
pub const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Characters replaced by the timestamp fallback
const SUFFIX_LENGTH: usize = 2;

static PASSCODE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9]+$").expect("passcode pattern is valid"));

/// Random passcode of `length` characters from [`ALPHABET`]
///
/// Uses the operating system CSPRNG. Uniqueness is the caller's job.
pub fn generate(length: usize) -> String {
    let mut rng = OsRng;
    (0..length)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Like [`generate`], optionally ending in the two-digit minute of `now`
///
/// Only used once the collision budget is spent. Codes shorter than the
/// suffix are returned unchanged.
pub fn generate_with_suffix(length: usize, include_timestamp_suffix: bool, now: DateTime<Utc>) -> String {
    let code = generate(length);
    if !include_timestamp_suffix || length < SUFFIX_LENGTH {
        return code;
    }
    let suffix = format!("{:02}", now.minute());
    format!("{}{}", &code[..length - SUFFIX_LENGTH], suffix)
}

/// Whether `code` could be a passcode at all
pub fn is_valid_format(code: &str) -> bool {
    if code.trim().is_empty() {
        return false;
    }
    (MIN_PASSCODE_LENGTH..=MAX_PASSCODE_LENGTH).contains(&code.len())
        && PASSCODE_PATTERN.is_match(code)
}
