//! Font metrics: glyph widths, descent/rise/height, and the space-width
//! heuristic used to recover `Tw`-less word boundaries in `TJ` kerning gaps.

use std::collections::HashMap;

use crate::object::Object;

/// A `/W` CID-width triplet: `c [w1 w2 ... wn]` or `cFirst cLast w`.
#[derive(Debug, Clone)]
enum CidWidths {
    Array { first: u32, widths: Vec<f32> },
    Range { first: u32, last: u32, width: f32 },
}

/// Per-font glyph metrics needed to size and position shown text.
#[derive(Debug, Clone)]
pub struct Font {
    /// Simple-font `/Widths` table, indexed from `/FirstChar`.
    widths: HashMap<u32, f32>,
    /// CID-font `/W` table, decoded into lookup-ready segments.
    cid_widths: Vec<CidWidths>,
    /// `/DW` default CID width (defaults to 1000 per the PDF spec).
    default_cid_width: f32,
    /// `/FontDescriptor /MissingWidth`, used for simple fonts lacking an
    /// entry in `/Widths`.
    missing_width: f32,
    /// Precomputed space-width heuristic (see [`Font::space_width`]).
    space_width: Option<f32>,
    /// `/FontDescriptor /Descent`, in glyph space (1/1000 em), used for the
    /// vertical offset in [`crate::content::coordinates::Coordinates::adjust`].
    descent: f32,
    /// Ascent-descent span, used as the bounding box's vertical extent.
    height: f32,
    /// True for CID fonts with `/Encoding` naming a vertical writing mode
    /// (`Identity-V`, any `...-V` named charset).
    vertical: bool,
    /// True for Type 0 (composite) fonts, where codes are CIDs looked up via
    /// [`Font::cid_width_of`] rather than [`Font::width_of`].
    is_cid: bool,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            widths: HashMap::new(),
            cid_widths: Vec::new(),
            default_cid_width: 1000.0,
            missing_width: 0.0,
            space_width: None,
            descent: -200.0,
            height: 1000.0,
            vertical: false,
            is_cid: false,
        }
    }
}

impl Font {
    /// Build a font from a `/Widths` array and `/FirstChar` (simple fonts).
    pub fn from_simple_widths(first_char: u32, widths: &[f32], missing_width: f32) -> Self {
        let map = widths
            .iter()
            .enumerate()
            .map(|(i, &w)| (first_char + i as u32, w))
            .collect();
        let space_width = space_width_from_widths(widths);
        Self {
            widths: map,
            missing_width,
            space_width,
            ..Default::default()
        }
    }

    /// Build a font from a `/W` CID-width array plus `/DW` default width.
    pub fn from_cid_widths(w_array: &[Object], default_width: f32) -> Self {
        let mut segments = Vec::new();
        let mut i = 0;
        while i + 2 < w_array.len() {
            let first = w_array[i].as_number().unwrap_or(0.0) as u32;
            match &w_array[i + 1] {
                Object::Array(widths) => {
                    let widths: Vec<f32> = widths.iter().filter_map(|o| o.as_number()).map(|n| n as f32).collect();
                    segments.push(CidWidths::Array { first, widths });
                    i += 2;
                },
                second => {
                    let last = second.as_number().unwrap_or(first as f64) as u32;
                    let width = w_array.get(i + 2).and_then(Object::as_number).unwrap_or(default_width as f64) as f32;
                    segments.push(CidWidths::Range { first, last, width });
                    i += 3;
                },
            }
        }
        let space_width = space_width_from_w_segments(&segments);
        Self {
            cid_widths: segments,
            default_cid_width: default_width,
            space_width,
            is_cid: true,
            ..Default::default()
        }
    }

    /// Set descent/height metrics from the font's `/FontDescriptor`.
    pub fn with_descriptor_metrics(mut self, descent: f32, ascent: f32) -> Self {
        self.descent = descent;
        self.height = ascent - descent;
        self
    }

    /// Mark this font as using vertical writing mode.
    pub fn with_vertical(mut self, vertical: bool) -> Self {
        self.vertical = vertical;
        self
    }

    /// Override the space-width heuristic directly, e.g. from
    /// `/FontDescriptor /AvgWidth` or `/MissingWidth` when no `/Widths` or
    /// `/W` table was available.
    pub fn with_descriptor_space_width(mut self, avg_or_missing_width: Option<f32>) -> Self {
        if self.space_width.is_none() {
            self.space_width = avg_or_missing_width.map(|w| w / 2.0);
        }
        self
    }

    /// Glyph width for a single-byte simple-font code, in glyph space
    /// (1/1000 em).
    pub fn width_of(&self, code: u32) -> f32 {
        self.widths.get(&code).copied().unwrap_or(self.missing_width)
    }

    /// Glyph width for a CID, in glyph space.
    pub fn cid_width_of(&self, cid: u32) -> f32 {
        for segment in &self.cid_widths {
            match segment {
                CidWidths::Array { first, widths } => {
                    if cid >= *first && (cid - first) < widths.len() as u32 {
                        return widths[(cid - first) as usize];
                    }
                },
                CidWidths::Range { first, last, width } => {
                    if cid >= *first && cid <= *last {
                        return *width;
                    }
                },
            }
        }
        self.default_cid_width
    }

    /// Descent, in glyph space (1/1000 em), typically negative.
    pub fn descent(&self) -> f32 {
        self.descent
    }

    /// Ascent-to-descent span.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Whether this font uses vertical writing mode.
    pub fn is_vertical(&self) -> bool {
        self.vertical
    }

    /// Glyph width for a decoded code, dispatching to [`Font::cid_width_of`]
    /// for composite fonts and [`Font::width_of`] otherwise.
    pub fn glyph_width(&self, code: u32) -> f32 {
        if self.is_cid {
            self.cid_width_of(code)
        } else {
            self.width_of(code)
        }
    }

    /// Space-width threshold for folding large negative `TJ` kerning values
    /// into literal spaces (invariant: a `TJ` offset `v` with `|v| >
    /// space_width` and `v < 0` inserts exactly one space). Returns the
    /// caller-supplied sentinel when no table yielded a usable value.
    pub fn space_width(&self, sentinel: f32) -> f32 {
        self.space_width.unwrap_or(sentinel)
    }
}

fn space_width_from_widths(widths: &[f32]) -> Option<f32> {
    widths
        .iter()
        .copied()
        .filter(|&w| w > 0.0)
        .fold(None, |min, w| Some(min.map_or(w, |m: f32| m.min(w))))
        .map(|w| w / 2.0)
}

fn space_width_from_w_segments(segments: &[CidWidths]) -> Option<f32> {
    let mut min: Option<f32> = None;
    for segment in segments {
        match segment {
            CidWidths::Array { widths, .. } => {
                for &w in widths {
                    if w > 0.0 {
                        min = Some(min.map_or(w, |m: f32| m.min(w)));
                    }
                }
            },
            CidWidths::Range { width, .. } => {
                if *width > 0.0 {
                    min = Some(min.map_or(*width, |m: f32| m.min(*width)));
                }
            },
        }
    }
    min.map(|w| w / 2.0)
}
