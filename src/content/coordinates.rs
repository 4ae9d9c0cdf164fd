//! Text-positioning state machine.
//!
//! Tracks the current transformation matrix, the text matrix, and the text
//! state parameters (`Tfs`, `Th`, `Tc`, `Tw`, `TL`, rise) that together turn
//! a shown string into a bounding box in device space.

use crate::content::matrix::Matrix;
use crate::geometry::Rect;

const TFS_DEFAULT: f32 = 1.0;
const TH_DEFAULT: f32 = 1.0;
const TC_DEFAULT: f32 = 0.0;
const TW_DEFAULT: f32 = 0.0;
const TL_DEFAULT: f32 = 0.0;
const TS_DEFAULT: f32 = 0.0;

/// Per-glyph-run font metrics needed to compute a bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphMetrics {
    /// Descent, in glyph space (1/1000 em), typically negative.
    pub descent: f32,
    /// Ascent-to-descent span ("height"), in glyph space.
    pub height: f32,
}

/// Tracks CTM, text matrix and text state while walking a content stream.
#[derive(Debug, Clone)]
pub struct Coordinates {
    ctm: Matrix,
    ctm_stack: Vec<Matrix>,
    tm: Matrix,
    tfs: f32,
    th: f32,
    tc: f32,
    tw: f32,
    tl: f32,
    ts: f32,
    x: f32,
    y: f32,
}

impl Coordinates {
    /// Create a new state with the given initial CTM (the page's base
    /// transform, including any `/Rotate` and `/MediaBox` adjustment).
    pub fn new(ctm: Matrix) -> Self {
        Self {
            ctm,
            ctm_stack: Vec::new(),
            tm: Matrix::identity(),
            tfs: TFS_DEFAULT,
            th: TH_DEFAULT,
            tc: TC_DEFAULT,
            tw: TW_DEFAULT,
            tl: TL_DEFAULT,
            ts: TS_DEFAULT,
            x: 0.0,
            y: 0.0,
        }
    }

    /// Current CTM.
    pub fn ctm(&self) -> Matrix {
        self.ctm
    }

    /// Current text matrix.
    pub fn tm(&self) -> Matrix {
        self.tm
    }

    /// `cm`: concatenate a matrix onto the CTM (applied before the existing CTM).
    pub fn cm(&mut self, m: Matrix) {
        self.ctm = m.multiply(&self.ctm);
    }

    /// `q`: push the CTM.
    pub fn save_state(&mut self) {
        self.ctm_stack.push(self.ctm);
    }

    /// `Q`: pop the CTM, if the stack is non-empty.
    pub fn restore_state(&mut self) {
        if let Some(ctm) = self.ctm_stack.pop() {
            self.ctm = ctm;
        }
    }

    /// `BT`: reset the text matrix and pending glyph offset to identity.
    pub fn begin_text(&mut self) {
        self.tm = Matrix::identity();
        self.x = 0.0;
        self.y = 0.0;
    }

    /// `ET`: no state changes beyond what `BT` already reset.
    pub fn end_text(&mut self) {}

    /// `Tf`: set font size (the font resource name is resolved by the caller).
    pub fn set_font_size(&mut self, size: f32) {
        self.tfs = size;
    }

    /// `Tz`: set horizontal scaling, given as a percentage (100 = no scaling).
    pub fn set_horizontal_scaling(&mut self, scale_percent: f32) {
        self.th = scale_percent / 100.0;
    }

    /// `Tc`: set character spacing.
    pub fn set_char_spacing(&mut self, tc: f32) {
        self.tc = tc;
    }

    /// `Tw`: set word spacing.
    pub fn set_word_spacing(&mut self, tw: f32) {
        self.tw = tw;
    }

    /// `TL`: set leading.
    pub fn set_leading(&mut self, tl: f32) {
        self.tl = tl;
    }

    /// `Ts`: set text rise.
    pub fn set_rise(&mut self, ts: f32) {
        self.ts = ts;
    }

    /// `Td`: move to the start of the next line, offset by `(tx, ty)` in
    /// unscaled text space, relative to the start of the current line.
    pub fn move_text_position(&mut self, tx: f32, ty: f32) {
        self.tm = Matrix::translation(tx, ty).multiply(&self.tm);
        self.x = 0.0;
        self.y = 0.0;
    }

    /// `TD`: like `Td`, but also sets leading to `-ty`.
    pub fn move_text_position_set_leading(&mut self, tx: f32, ty: f32) {
        self.move_text_position(tx, ty);
        self.tl = -ty;
    }

    /// `Tm`: set the text matrix (and text line matrix) directly.
    pub fn set_text_matrix(&mut self, m: Matrix) {
        self.tm = m;
        self.x = 0.0;
        self.y = 0.0;
    }

    /// `T*`: move to the start of the next line using the current leading.
    pub fn next_line(&mut self) {
        self.move_text_position(0.0, -self.tl);
    }

    /// `'`: equivalent to `T*` (the caller shows the string separately).
    pub fn quote(&mut self) {
        self.next_line();
    }

    /// `"`: set word and character spacing, then behave like `'`.
    pub fn double_quote(&mut self, word_space: f32, char_space: f32) {
        self.tw = word_space;
        self.tc = char_space;
        self.quote();
    }

    /// Compute the device-space bounding box for a shown string and advance
    /// the pending glyph offset past it.
    ///
    /// `width` is the string's total advance width (sum of glyph widths plus
    /// any `TJ` kerning folded in by the caller), in glyph space (1/1000 em
    /// units already divided by 1000 by the caller). `tj` is a single `TJ`
    /// kerning adjustment applied before the string (0 for `Tj`/`'`/`"`).
    /// `space_count` is the number of single-byte space characters (0x20) in
    /// the shown string, used for the `Tw` word-spacing increment.
    pub fn adjust(
        &mut self,
        glyph_count: usize,
        width: f32,
        tj: f32,
        space_count: usize,
        metrics: GlyphMetrics,
    ) -> Rect {
        if tj != 0.0 {
            self.x -= tj * self.tfs * self.th * 0.001;
            self.x += self.tc * self.th;
        }

        let ty = metrics.descent * self.tfs + self.ts * self.tfs;
        let adv = width * self.tfs * self.th;

        let base = self.tm.multiply(&self.ctm);
        let t_start = Matrix::translation(self.x, self.y).multiply(&base);

        if glyph_count > 1 {
            self.x += self.tc * self.th * (glyph_count as f32 - 1.0);
        }
        self.x += self.tw * self.th * space_count as f32;

        let t_end = Matrix::translation(self.x, self.y).multiply(&base);

        let start = t_start.transform_point(0.0, ty);
        let end = t_end.transform_point(adv, ty + metrics.height * self.tfs);

        let x0 = start.x.min(end.x);
        let x1 = start.x.max(end.x);
        let y0 = start.y.min(end.y);
        let y1 = start.y.max(end.y);

        self.x += adv;

        Rect::from_points(x0, y0, x1, y1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> GlyphMetrics {
        GlyphMetrics {
            descent: -200.0,
            height: 1000.0,
        }
    }

    #[test]
    fn test_td_moves_text_line_matrix() {
        let mut c = Coordinates::new(Matrix::identity());
        c.begin_text();
        c.move_text_position(100.0, 700.0);
        assert_eq!(c.tm().e, 100.0);
        assert_eq!(c.tm().f, 700.0);
    }

    #[test]
    fn test_td_sets_leading_negated() {
        let mut c = Coordinates::new(Matrix::identity());
        c.begin_text();
        c.move_text_position_set_leading(0.0, -14.0);
        assert_eq!(c.tl, 14.0);
    }

    #[test]
    fn test_t_star_uses_leading() {
        let mut c = Coordinates::new(Matrix::identity());
        c.begin_text();
        c.set_leading(14.0);
        c.next_line();
        assert_eq!(c.tm().f, -14.0);
    }

    #[test]
    fn test_q_nested_restore() {
        let mut c = Coordinates::new(Matrix::identity());
        c.save_state();
        c.cm(Matrix::translation(10.0, 0.0));
        c.save_state();
        c.cm(Matrix::translation(0.0, 10.0));
        assert_eq!(c.ctm().e, 10.0);
        assert_eq!(c.ctm().f, 10.0);
        c.restore_state();
        assert_eq!(c.ctm().e, 10.0);
        assert_eq!(c.ctm().f, 0.0);
        c.restore_state();
        assert_eq!(c.ctm(), Matrix::identity());
    }

    #[test]
    fn test_unbalanced_q_is_noop() {
        let mut c = Coordinates::new(Matrix::identity());
        c.restore_state();
        assert_eq!(c.ctm(), Matrix::identity());
    }

    #[test]
    fn test_adjust_advances_pending_offset() {
        let mut c = Coordinates::new(Matrix::identity());
        c.begin_text();
        c.set_font_size(12.0);
        c.move_text_position(0.0, 0.0);
        let width = 500.0 / 1000.0 * 5.0;
        let rect1 = c.adjust(5, width, 0.0, 0, metrics());
        let rect2 = c.adjust(5, width, 0.0, 0, metrics());
        assert!(rect2.left() >= rect1.right() - 1e-3);
    }

    #[test]
    fn test_adjust_tj_kerning_shifts_start() {
        let mut c1 = Coordinates::new(Matrix::identity());
        c1.begin_text();
        c1.set_font_size(12.0);
        let rect_no_kern = c1.adjust(1, 0.5, 0.0, 0, metrics());

        let mut c2 = Coordinates::new(Matrix::identity());
        c2.begin_text();
        c2.set_font_size(12.0);
        let rect_kern = c2.adjust(1, 0.5, 200.0, 0, metrics());

        assert!(rect_kern.left() < rect_no_kern.left());
    }

    #[test]
    fn test_adjust_word_spacing_applies_per_space() {
        let mut c = Coordinates::new(Matrix::identity());
        c.begin_text();
        c.set_font_size(12.0);
        c.set_word_spacing(5.0);
        let rect = c.adjust(3, 0.3, 0.0, 2, metrics());
        let mut c2 = Coordinates::new(Matrix::identity());
        c2.begin_text();
        c2.set_font_size(12.0);
        let rect2 = c2.adjust(3, 0.3, 0.0, 0, metrics());
        assert!(rect.right() > rect2.right());
    }

    #[test]
    fn test_rise_shifts_vertical_extent() {
        let mut c = Coordinates::new(Matrix::identity());
        c.begin_text();
        c.set_font_size(12.0);
        c.set_rise(3.0);
        let rect = c.adjust(1, 0.5, 0.0, 0, metrics());
        let mut c2 = Coordinates::new(Matrix::identity());
        c2.begin_text();
        c2.set_font_size(12.0);
        let rect2 = c2.adjust(1, 0.5, 0.0, 0, metrics());
        assert!(rect.bottom() > rect2.bottom());
    }
}
