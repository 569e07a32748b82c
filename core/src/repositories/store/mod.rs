pub mod r#trait {
    pub use super::trait_::*;
}
#[path = "trait.rs"]
mod trait_;
pub mod keys;
pub mod memory;

pub use memory::{InMemoryStore, StoreOperation};
pub use r#trait::KeyValueStore;
