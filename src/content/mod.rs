//! PDF content stream parsing and execution.
//!
//! This module handles parsing and interpreting PDF content streams, which
//! contain the sequences of operators that place text (and graphics, out of
//! scope here) on a page.

pub mod coordinates;
pub mod matrix;
pub mod operators;
pub mod parser;

pub use coordinates::{Coordinates, GlyphMetrics};
pub use matrix::Matrix;
pub use operators::{Operator, TextElement};
pub use parser::parse_content_stream;
