//! Font encoding, CMap parsing, and glyph metrics.
//!
//! A font's character codes are turned into Unicode text by, in priority
//! order: an embedded `ToUnicode` CMap ([`cmap`]), a `/Differences` array
//! layered on a base encoding ([`charset::DiffConverter`]), or the base
//! encoding / named charset alone ([`charset`], [`standard_encodings`]).
//! [`font::Font`] supplies the glyph widths needed to size and position the
//! decoded text; [`converter_engine`] ties all of this to
//! [`crate::content::coordinates::Coordinates`].

pub mod charset;
pub mod cmap;
pub mod converter_engine;
pub mod font;
pub mod standard_encodings;

pub use charset::{ConverterMode, DiffConverter};
pub use cmap::{parse_tounicode_cmap, CMap};
pub use converter_engine::{ConverterEngine, TextChunk};
pub use font::Font;
pub use standard_encodings::BaseEncoding;
