#![allow(clippy::too_many_arguments)]
#![allow(clippy::wrong_self_convention)]
#![cfg_attr(test, allow(dead_code))]
#![warn(missing_docs)]

//! # pdf_textcore
//!
//! Text-extraction core for a PDF reader.
//!
//! This crate walks a PDF's content streams, interprets the text-showing
//! operators, decodes encoded byte strings into Unicode, and emits positioned
//! text chunks in page space. It does not parse file structure (xref,
//! trailer, object streams), decode filtered streams, or decrypt documents —
//! it expects an [`extractor::object_store::ObjectStore`] that already
//! resolves indirect references to decoded [`object::Object`] values.
//!
//! ## Pipeline
//!
//! 1. [`extractor::pages::PagesExtractor`] walks the page tree, inheriting
//!    `/Resources`, `/MediaBox`, `/CropBox` and `/Rotate`.
//! 2. For each page (and any Form XObject it invokes via `Do`), the content
//!    stream is tokenized by [`content::parser::parse_content_stream`] into
//!    [`content::operators::Operator`] values.
//! 3. [`content::coordinates::Coordinates`] tracks the graphics/text state
//!    and turns each shown string into a page-space bounding box.
//! 4. [`fonts::converter_engine::ConverterEngine`] decodes the shown byte
//!    string via the font's active [`fonts::charset::ConverterMode`].
//!
//! ## Example
//!
//! ```
//! use pdf_textcore::config::ExtractionConfig;
//! use pdf_textcore::extractor::object_store::InMemoryObjectStore;
//! use pdf_textcore::extractor::pages::PagesExtractor;
//!
//! let store = InMemoryObjectStore::new();
//! let extractor = PagesExtractor::new(store, ExtractionConfig::default());
//! assert_eq!(extractor.config().max_recursion_depth, 64);
//! ```

pub mod config;
pub mod content;
pub mod error;
pub mod extractor;
pub mod fonts;
pub mod geometry;
pub mod object;

pub use config::ExtractionConfig;
pub use error::{ExtractError, Result};
pub use extractor::pages::{PagesExtractor, TextChunk};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
