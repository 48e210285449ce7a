pub mod collection;
pub mod render;

pub use collection::{ErrorCollection, ErrorItem, ErrorKey};
