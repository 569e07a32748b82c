//! Domain entities representing core business objects.

pub mod passcode;

pub use passcode::PasscodeRecord;
