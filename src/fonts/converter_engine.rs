//! Ties a font's charset/`ToUnicode` decoding together with its width table
//! and the current text-positioning state to turn a shown string operand
//! into a positioned, decoded text chunk.

use crate::content::coordinates::{Coordinates, GlyphMetrics};
use crate::content::operators::TextElement;
use crate::fonts::charset::{decode_mode, ConverterMode, DiffConverter};
use crate::fonts::cmap::CMap;
use crate::fonts::font::Font;
use crate::geometry::Rect;

/// A decoded, positioned run of text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextChunk {
    /// Decoded UTF-8 text.
    pub text: String,
    /// Device-space bounding box.
    pub rect: Rect,
}

/// Combines a font's charset conversion, `/Differences` override, and
/// `ToUnicode` CMap (when present, which always takes priority) into a
/// single decode-and-position operation.
pub struct ConverterEngine<'a> {
    mode: ConverterMode,
    diff: Option<&'a DiffConverter>,
    to_unicode: Option<&'a CMap>,
    font: &'a Font,
}

impl<'a> ConverterEngine<'a> {
    /// Build a converter engine for one font's resource scope.
    pub fn new(mode: ConverterMode, diff: Option<&'a DiffConverter>, to_unicode: Option<&'a CMap>, font: &'a Font) -> Self {
        Self {
            mode,
            diff,
            to_unicode,
            font,
        }
    }

    /// Whether this font's text runs vertically (affects layout beyond this
    /// crate's scope, but is surfaced so a caller can choose a vertical
    /// reading order). The base charset's own declaration wins; otherwise
    /// falls through to the `ToUnicode` CMap's `/WMode`, when present.
    pub fn is_vertical(&self) -> bool {
        if self.font.is_vertical() {
            return true;
        }
        match self.to_unicode {
            Some(cmap) if !cmap.is_empty() => cmap.is_vertical(),
            _ => false,
        }
    }

    /// Decode and position one shown string (`Tj`, `'`, `"`, or a `TJ`
    /// string element). `tj` is the kerning adjustment immediately
    /// preceding this string in a `TJ` array (0 otherwise).
    pub fn get_string(&self, bytes: &[u8], coordinates: &mut Coordinates, tj: f32) -> Option<TextChunk> {
        let (text, width, glyph_count, space_count) = if let Some(cmap) = self.to_unicode {
            let pairs = cmap.decode_longest_match_pairs(bytes);
            let mut text = String::new();
            let mut width = 0.0f32;
            let mut space_count = 0usize;
            for (code, s) in &pairs {
                let glyph_width = self.font.glyph_width(*code) / 1000.0;
                log::trace!("glyph code {code:#06x} -> {s:?}, width {glyph_width:.4}");
                width += glyph_width;
                if s == " " {
                    space_count += 1;
                }
                text.push_str(s);
            }
            (text, width, pairs.len(), space_count)
        } else {
            self.decode_without_tounicode(bytes)
        };

        if text.is_empty() && width == 0.0 {
            log::trace!("decoded chunk is empty with zero width, dropping");
            return None;
        }

        let metrics = GlyphMetrics {
            descent: self.font.descent(),
            height: self.font.height(),
        };
        let rect = coordinates.adjust(glyph_count.max(1), width, tj, space_count, metrics);
        Some(TextChunk { text, rect })
    }

    fn decode_without_tounicode(&self, bytes: &[u8]) -> (String, f32, usize, usize) {
        if let (Some(diff), ConverterMode::Base(_)) = (self.diff, self.mode) {
            if !diff.is_empty() {
                let mut text = String::new();
                let mut width = 0.0f32;
                let mut space_count = 0usize;
                for &b in bytes {
                    let s = diff.get(b as u32).or_else(|| {
                        let base = decode_mode(self.mode, &[b]);
                        if base.is_empty() { None } else { Some(base) }
                    });
                    let glyph_width = self.font.glyph_width(b as u32) / 1000.0;
                    log::trace!("glyph code {b:#04x} -> {s:?} (via /Differences or base), width {glyph_width:.4}");
                    if let Some(s) = s {
                        if s == " " {
                            space_count += 1;
                        }
                        text.push_str(&s);
                    }
                    width += glyph_width;
                }
                return (text, width, bytes.len(), space_count);
            }
        }

        let code_size = match self.mode {
            ConverterMode::IdentityTwoByte | ConverterMode::Utf16Be => 2,
            ConverterMode::Utf32Be => 4,
            _ => 1,
        };
        let text = decode_mode(self.mode, bytes);
        let width: f32 = bytes
            .chunks(code_size)
            .map(|chunk| {
                let code = chunk.iter().fold(0u32, |acc, &b| (acc << 8) | b as u32);
                self.font.glyph_width(code) / 1000.0
            })
            .sum();
        let space_count = text.matches(' ').count();
        let glyph_count = (bytes.len() / code_size.max(1)).max(1);
        (text, width, glyph_count, space_count)
    }

    /// Decode and position every string in a `TJ` array, folding large
    /// negative kerning values into a literal space when no positive
    /// advance was otherwise produced (the `TJ` space-threshold
    /// invariant: offsets past the font's space width fold into one space).
    pub fn get_strings_from_array(&self, array: &[TextElement], coordinates: &mut Coordinates, sentinel: f32) -> Vec<TextChunk> {
        let mut result = Vec::new();
        let mut pending_tj = 0.0f32;
        let threshold = self.font.space_width(sentinel);

        for element in array {
            match element {
                TextElement::Offset(v) => {
                    if *v < 0.0 && -*v > threshold {
                        let metrics = GlyphMetrics {
                            descent: self.font.descent(),
                            height: self.font.height(),
                        };
                        let rect = coordinates.adjust(1, 0.0, 0.0, 0, metrics);
                        result.push(TextChunk {
                            text: " ".to_string(),
                            rect,
                        });
                    }
                    pending_tj = *v;
                },
                TextElement::String(bytes) => {
                    if let Some(chunk) = self.get_string(bytes, coordinates, pending_tj) {
                        if !chunk.text.is_empty() {
                            result.push(chunk);
                        }
                    }
                    pending_tj = 0.0;
                },
            }
        }

        result
    }
}
