//! Property-based tests for the invariants that should hold across the full
//! input space, not just a handful of worked scenarios.

use proptest::prelude::*;

use pdf_textcore::content::coordinates::Coordinates;
use pdf_textcore::content::matrix::Matrix;
use pdf_textcore::fonts::charset::{decode_mode, ConverterMode};
use pdf_textcore::fonts::cmap::parse_tounicode_cmap;
use pdf_textcore::fonts::converter_engine::ConverterEngine;
use pdf_textcore::fonts::font::Font;
use pdf_textcore::fonts::standard_encodings::BaseEncoding;

fn arb_matrix() -> impl Strategy<Value = Matrix> {
    (-10.0f32..10.0, -10.0f32..10.0, -10.0f32..10.0, -10.0f32..10.0, -10.0f32..10.0, -10.0f32..10.0)
        .prop_map(|(a, b, c, d, e, f)| Matrix { a, b, c, d, e, f })
}

fn arb_encoding() -> impl Strategy<Value = BaseEncoding> {
    prop_oneof![
        Just(BaseEncoding::Standard),
        Just(BaseEncoding::WinAnsi),
        Just(BaseEncoding::MacRoman),
        Just(BaseEncoding::MacExpert),
    ]
}

proptest! {
    /// Invariant 1: decoding a single byte under a base encoding matches the
    /// table lookup exactly; bytes with no table entry decode to the empty
    /// string rather than panicking or substituting a placeholder.
    #[test]
    fn round_trip_standard_encodings(byte in any::<u8>(), encoding in arb_encoding()) {
        let via_decode_mode = decode_mode(ConverterMode::Base(encoding), &[byte]);
        let via_table = encoding.decode(byte).map(|c| c.to_string()).unwrap_or_default();
        prop_assert_eq!(via_decode_mode, via_table);
    }

    /// Invariant 5: matrix composition is associative up to floating-point
    /// tolerance.
    #[test]
    fn matrix_composition_is_associative(a in arb_matrix(), b in arb_matrix(), c in arb_matrix()) {
        let left = a.multiply(&b).multiply(&c);
        let right = a.multiply(&b.multiply(&c));
        prop_assert!((left.a - right.a).abs() < 1e-2);
        prop_assert!((left.b - right.b).abs() < 1e-2);
        prop_assert!((left.c - right.c).abs() < 1e-2);
        prop_assert!((left.d - right.d).abs() < 1e-2);
        prop_assert!((left.e - right.e).abs() < 1e-2);
        prop_assert!((left.f - right.f).abs() < 1e-2);
    }

    /// Invariant 6: `BT` always resets the text matrix to identity,
    /// regardless of what state preceded it.
    #[test]
    fn bt_resets_text_matrix_to_identity(
        tx in -500.0f32..500.0,
        ty in -500.0f32..500.0,
        rotate in 0i32..4,
    ) {
        let mut coords = Coordinates::new(Matrix::rotation_degrees(rotate * 90));
        coords.begin_text();
        coords.move_text_position(tx, ty);
        coords.set_text_matrix(Matrix::translation(tx, ty).multiply(&Matrix::rotation_degrees(45)));
        coords.begin_text();
        let tm = coords.tm();
        prop_assert_eq!(tm, Matrix::identity());
    }

    /// Invariant 7: a balanced `q ... Q` sequence leaves the CTM unchanged;
    /// an unmatched `Q` on an empty stack is a no-op.
    #[test]
    fn q_q_balance_restores_ctm(ops in arb_matrix(), extra_q_pops in 0usize..5) {
        let mut coords = Coordinates::new(Matrix::identity());
        let original = coords.ctm();
        coords.save_state();
        coords.cm(ops);
        coords.restore_state();
        prop_assert_eq!(coords.ctm(), original);

        for _ in 0..extra_q_pops {
            coords.restore_state();
        }
        prop_assert_eq!(coords.ctm(), original);
    }

    /// Invariant 4: a `TJ` element whose magnitude exceeds the font's space
    /// width folds into exactly one literal space; anything at or under the
    /// threshold inserts none.
    #[test]
    fn tj_space_threshold_inserts_at_most_one_space(offset_magnitude in 0.0f32..2000.0) {
        let font = Font::from_simple_widths(65, &[600.0], 0.0).with_descriptor_space_width(Some(500.0));
        let engine = ConverterEngine::new(ConverterMode::Base(BaseEncoding::WinAnsi), None, None, &font);
        let mut coords = Coordinates::new(Matrix::identity());
        coords.begin_text();
        coords.set_font_size(12.0);

        let sentinel = 100.0;
        let threshold = font.space_width(sentinel);
        let array = vec![
            pdf_textcore::content::operators::TextElement::String(b"A".to_vec()),
            pdf_textcore::content::operators::TextElement::Offset(-offset_magnitude),
            pdf_textcore::content::operators::TextElement::String(b"B".to_vec()),
        ];
        let chunks = engine.get_strings_from_array(&array, &mut coords, sentinel);
        let text: String = chunks.iter().map(|c| c.text.as_str()).collect();
        let space_count = text.matches(' ').count();
        if offset_magnitude > threshold {
            prop_assert_eq!(space_count, 1);
        } else {
            prop_assert_eq!(space_count, 0);
        }
    }
}

#[test]
fn cmap_longest_match_prefers_longer_codespace() {
    // Codespace declares both 1-byte and 2-byte lengths; `0041` must decode
    // as the 2-byte mapping, not as two 1-byte codes `00` and `41`.
    let data = b"2 begincodespacerange\n<00> <7f>\n<0000> <ffff>\nendcodespacerange\n\
2 beginbfchar\n<0041> <0041>\n<41> <FFFD>\nendbfchar";
    let cmap = parse_tounicode_cmap(data).unwrap();
    assert_eq!(cmap.code_lengths().len(), 2);
    let decoded = cmap.decode_longest_match(&[0x00, 0x41]);
    assert_eq!(decoded, "A");
}

#[test]
fn differences_overrides_resolve_through_glyph_list_independently() {
    use pdf_textcore::fonts::charset::DiffConverter;

    let diff = DiffConverter::from_pairs(&[
        (0x41, "Adieresis".to_string()),
        (0x42, "Aring".to_string()),
    ]);
    assert_eq!(diff.get(0x41), Some("\u{00C4}".to_string()));
    assert_eq!(diff.get(0x42), Some("\u{00C5}".to_string()));
    assert_eq!(diff.get(0x43), None);
}

// The running-code expansion of a raw `/Differences` array (code, then
// consecutive names until the next integer) is exercised as a property test
// alongside `extractor::pages::expand_differences` itself, since that
// function is private to its module.
