//! Value objects returned by the passcode engine.

pub mod issued_passcode;
pub mod verify_result;

pub use issued_passcode::IssuedPasscode;
pub use verify_result::{VerifyOutcome, VerifyResult};
