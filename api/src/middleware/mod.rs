pub mod client_ip;
pub mod cors;
pub mod request_id;

pub use client_ip::*;
pub use cors::*;
pub use request_id::*;
