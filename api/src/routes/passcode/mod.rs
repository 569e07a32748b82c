//! Passcode route handlers

pub mod issue;
pub mod status;
pub mod verify;

pub use issue::issue_passcode;
pub use status::passcode_status;
pub use verify::verify_passcode;
