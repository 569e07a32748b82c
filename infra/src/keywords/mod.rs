//! Keyword mapping loaded from remote mirrors

mod registry;


pub use registry::{parse_document, KeywordDocument, KeywordRegistry};
