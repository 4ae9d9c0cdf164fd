//! Content stream operators.
//!
//! A trimmed operator set: only the operators the text-extraction core
//! dispatches on (§4.5/§4.6) get their own variant; everything else is
//! captured by `Other` with its operands discarded at the next operator
//! boundary.

use crate::object::Object;

/// A content stream operator.
#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    /// Save graphics state (`q`).
    SaveState,
    /// Restore graphics state (`Q`).
    RestoreState,
    /// Concatenate matrix to CTM (`cm`).
    Cm {
        /// Matrix element a.
        a: f32,
        /// Matrix element b.
        b: f32,
        /// Matrix element c.
        c: f32,
        /// Matrix element d.
        d: f32,
        /// Matrix element e.
        e: f32,
        /// Matrix element f.
        f: f32,
    },
    /// Begin text object (`BT`).
    BeginText,
    /// End text object (`ET`).
    EndText,
    /// Set font and size (`Tf`).
    Tf {
        /// Font resource name (without the leading `/`).
        font: String,
        /// Font size.
        size: f32,
    },
    /// Show text string (`Tj`).
    Tj {
        /// Raw string bytes.
        text: Vec<u8>,
    },
    /// Show text with individual glyph positioning (`TJ`).
    TJ {
        /// Interleaved strings and kerning adjustments.
        array: Vec<TextElement>,
    },
    /// Move to next line and show text (`'`).
    Quote {
        /// Raw string bytes.
        text: Vec<u8>,
    },
    /// Set spacing and show text (`"`).
    DoubleQuote {
        /// Word spacing operand.
        word_space: f32,
        /// Character spacing operand.
        char_space: f32,
        /// Raw string bytes.
        text: Vec<u8>,
    },
    /// Set horizontal scaling (`Tz`).
    Tz {
        /// Horizontal scaling, as a percentage (100 = no scaling).
        scale: f32,
    },
    /// Set character spacing (`Tc`).
    Tc {
        /// Character spacing.
        char_space: f32,
    },
    /// Set word spacing (`Tw`).
    Tw {
        /// Word spacing.
        word_space: f32,
    },
    /// Set leading (`TL`).
    TL {
        /// Leading.
        leading: f32,
    },
    /// Move to start of next line (`T*`).
    TStar,
    /// Move text position (`Td`).
    Td {
        /// Horizontal offset.
        tx: f32,
        /// Vertical offset.
        ty: f32,
    },
    /// Move text position and set leading (`TD`).
    TD {
        /// Horizontal offset.
        tx: f32,
        /// Vertical offset.
        ty: f32,
    },
    /// Set text matrix (`Tm`).
    Tm {
        /// Matrix element a.
        a: f32,
        /// Matrix element b.
        b: f32,
        /// Matrix element c.
        c: f32,
        /// Matrix element d.
        d: f32,
        /// Matrix element e.
        e: f32,
        /// Matrix element f.
        f: f32,
    },
    /// Set text rise (`Ts`).
    Ts {
        /// Rise, in unscaled text space units.
        rise: f32,
    },
    /// Paint an XObject (`Do`).
    Do {
        /// XObject resource name (without the leading `/`).
        name: String,
    },
    /// Any operator not named above; operands are carried but ignored by
    /// the interpreter once the arity (if known) has been validated.
    Other {
        /// Operator name, verbatim from the content stream.
        name: String,
        /// Operands popped for this operator.
        operands: Vec<Object>,
    },
}

/// Element of a `TJ` array.
#[derive(Debug, Clone, PartialEq)]
pub enum TextElement {
    /// A string to show.
    String(Vec<u8>),
    /// A kerning adjustment, in thousandths of text space units.
    Offset(f32),
}
