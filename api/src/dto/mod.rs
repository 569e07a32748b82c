pub mod message_dto;
pub mod passcode_dto;

pub use message_dto::*;
pub use passcode_dto::*;
