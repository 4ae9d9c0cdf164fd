//! Page-tree walking and the top-level extraction entry point.

pub mod object_store;
pub mod pages;

pub use object_store::{InMemoryObjectStore, ObjectStore};
pub use pages::{PagesExtractor, TextChunk};
