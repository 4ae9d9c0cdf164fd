//! Cross-module scenario tests (S1-S6), exercised through the public API
//! against the in-memory object store.

use std::collections::HashMap;

use pdf_textcore::extractor::object_store::InMemoryObjectStore;
use pdf_textcore::object::{Object, ObjectRef};
use pdf_textcore::{ExtractionConfig, PagesExtractor};

fn dict(pairs: Vec<(&str, Object)>) -> Object {
    Object::Dictionary(pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
}

fn media_box(x0: i64, y0: i64, x1: i64, y1: i64) -> Object {
    Object::Array(vec![
        Object::Integer(x0),
        Object::Integer(y0),
        Object::Integer(x1),
        Object::Integer(y1),
    ])
}

struct PageBuilder {
    store: InMemoryObjectStore,
    next_id: u32,
}

impl PageBuilder {
    fn new() -> Self {
        Self {
            store: InMemoryObjectStore::new(),
            next_id: 1,
        }
    }

    fn alloc(&mut self, obj: Object) -> ObjectRef {
        let r = ObjectRef::new(self.next_id, 0);
        self.next_id += 1;
        self.store.insert(r, obj);
        r
    }

    fn simple_font(&mut self, widths: Vec<f64>, first_char: i64, encoding: &str) -> ObjectRef {
        let widths = widths.into_iter().map(Object::Real).collect();
        self.alloc(dict(vec![
            ("Type", Object::Name("Font".to_string())),
            ("Subtype", Object::Name("TrueType".to_string())),
            ("FirstChar", Object::Integer(first_char)),
            ("Widths", Object::Array(widths)),
            ("Encoding", Object::Name(encoding.to_string())),
        ]))
    }

    fn page(&mut self, resources: ObjectRef, contents: &[u8], extra: Vec<(&str, Object)>) -> ObjectRef {
        let content_ref = self.alloc(Object::Stream {
            dict: HashMap::new(),
            data: contents.to_vec(),
        });
        let mut fields = vec![
            ("Type", Object::Name("Page".to_string())),
            ("Resources", Object::Reference(resources)),
            ("Contents", Object::Reference(content_ref)),
        ];
        fields.extend(extra);
        self.alloc(dict(fields))
    }

    fn resources_with_font(&mut self, name: &str, font_ref: ObjectRef) -> ObjectRef {
        let mut fonts = HashMap::new();
        fonts.insert(name.to_string(), Object::Reference(font_ref));
        self.alloc(dict(vec![("Font", Object::Dictionary(fonts))]))
    }
}

#[test]
fn s1_ascii_show_yields_one_chunk_at_origin() {
    let mut b = PageBuilder::new();
    let font = b.simple_font(vec![600.0; 2], 72, "WinAnsiEncoding");
    let resources = b.resources_with_font("F1", font);
    let page = b.page(resources, b"BT /F1 12 Tf 100 200 Td (Hi) Tj ET", vec![]);

    let extractor = PagesExtractor::new(b.store, ExtractionConfig::default());
    let chunks = extractor.extract_single_page(page).unwrap();

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, "Hi");
    assert!((chunks[0].bbox.0 - 100.0).abs() < 1e-2);
    // descent is negative, so the baseline-relative y0 sits below the Td origin.
    assert!(chunks[0].bbox.1 < 200.0);
}

#[test]
fn s2_tj_kerning_inserts_space_between_strings() {
    let mut b = PageBuilder::new();
    let font = b.simple_font(vec![1000.0], 65, "WinAnsiEncoding");
    let resources = b.resources_with_font("F1", font);
    let page = b.page(
        resources,
        b"BT /F1 12 Tf 0 0 Td [(A) -600 (B)] TJ ET",
        vec![],
    );

    let extractor = PagesExtractor::new(b.store, ExtractionConfig::default());
    let chunks = extractor.extract_single_page(page).unwrap();

    let text: String = chunks.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(text, "A B");
}

#[test]
fn s3_identity_h_two_byte_cid_widths_sum_advance() {
    let mut b = PageBuilder::new();
    // CIDs 0x0048 ('H') and 0x0069 ('i') get distinct widths via a /W array.
    let w_array = Object::Array(vec![
        Object::Integer(0x0048),
        Object::Array(vec![Object::Real(700.0)]),
        Object::Integer(0x0069),
        Object::Array(vec![Object::Real(300.0)]),
    ]);
    let descendant = b.alloc(dict(vec![
        ("Type", Object::Name("Font".to_string())),
        ("Subtype", Object::Name("CIDFontType2".to_string())),
        ("DW", Object::Integer(1000)),
        ("W", w_array),
    ]));
    let cmap_data = b"1 begincodespacerange\n<0000> <ffff>\nendcodespacerange\n\
2 beginbfchar\n<0048> <0048>\n<0069> <0069>\nendbfchar";
    let to_unicode = b.alloc(Object::Stream {
        dict: HashMap::new(),
        data: cmap_data.to_vec(),
    });
    let font_ref = b.alloc(dict(vec![
        ("Type", Object::Name("Font".to_string())),
        ("Subtype", Object::Name("Type0".to_string())),
        ("Encoding", Object::Name("Identity-H".to_string())),
        ("DescendantFonts", Object::Array(vec![Object::Reference(descendant)])),
        ("ToUnicode", Object::Reference(to_unicode)),
    ]));
    let resources = b.resources_with_font("F1", font_ref);
    let page = b.page(resources, b"BT /F1 12 Tf 0 0 Td <00480069> Tj ET", vec![]);

    let extractor = PagesExtractor::new(b.store, ExtractionConfig::default());
    let chunks = extractor.extract_single_page(page).unwrap();

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, "Hi");
    let expected_advance = (700.0 + 300.0) / 1000.0 * 12.0;
    let actual_advance = chunks[0].bbox.2 - chunks[0].bbox.0;
    assert!((actual_advance - expected_advance).abs() < 1e-2);
}

#[test]
fn s4_differences_overrides_base_encoding() {
    let mut b = PageBuilder::new();
    let widths: Vec<Object> = vec![Object::Real(600.0); 3];
    let font_ref = b.alloc(dict(vec![
        ("Type", Object::Name("Font".to_string())),
        ("Subtype", Object::Name("TrueType".to_string())),
        ("FirstChar", Object::Integer(65)),
        ("Widths", Object::Array(widths)),
        (
            "Encoding",
            dict(vec![
                ("BaseEncoding", Object::Name("WinAnsiEncoding".to_string())),
                (
                    "Differences",
                    Object::Array(vec![
                        Object::Integer(65),
                        Object::Name("Adieresis".to_string()),
                        Object::Name("Aring".to_string()),
                    ]),
                ),
            ]),
        ),
    ]));
    let resources = b.resources_with_font("F1", font_ref);
    let page = b.page(resources, b"BT /F1 12 Tf 0 0 Td (AB) Tj ET", vec![]);

    let extractor = PagesExtractor::new(b.store, ExtractionConfig::default());
    let chunks = extractor.extract_single_page(page).unwrap();

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, "\u{00C4}\u{00C5}");
}

#[test]
fn s5_tounicode_longest_match_decodes_mixed_width_codes() {
    let mut b = PageBuilder::new();
    let cmap_data = b"2 begincodespacerange\n<00> <7f>\n<0041> <0041>\nendcodespacerange\n\
2 beginbfchar\n<0041> <0041>\n<00> <003F>\nendbfchar";
    let to_unicode = b.alloc(Object::Stream {
        dict: HashMap::new(),
        data: cmap_data.to_vec(),
    });
    let font_ref = b.alloc(dict(vec![
        ("Type", Object::Name("Font".to_string())),
        ("Subtype", Object::Name("TrueType".to_string())),
        ("FirstChar", Object::Integer(0)),
        ("Widths", Object::Array(vec![Object::Real(500.0); 256])),
        ("ToUnicode", Object::Reference(to_unicode)),
    ]));
    let resources = b.resources_with_font("F1", font_ref);
    let page = b.page(resources, b"BT /F1 12 Tf 0 0 Td <004100> Tj ET", vec![]);

    let extractor = PagesExtractor::new(b.store, ExtractionConfig::default());
    let chunks = extractor.extract_single_page(page).unwrap();

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, "A?");
}

#[test]
fn s6_rotated_page_bbox_stays_in_rotated_quadrant() {
    let mut b = PageBuilder::new();
    let font = b.simple_font(vec![600.0], 65, "WinAnsiEncoding");
    let resources = b.resources_with_font("F1", font);
    let page = b.page(
        resources,
        b"BT /F1 12 Tf 10 20 Td (A) Tj ET",
        vec![("Rotate", Object::Integer(90)), ("CropBox", media_box(0, 0, 100, 200))],
    );

    let extractor = PagesExtractor::new(b.store, ExtractionConfig::default());
    let chunks = extractor.extract_single_page(page).unwrap();
    assert_eq!(chunks.len(), 1);
    let (x0, y0, x1, y1) = chunks[0].bbox;
    assert!(x0 >= 0.0 && x1 <= 200.0);
    assert!(y0 >= 0.0 && y1 <= 100.0);
}

#[test]
fn cycle_guard_catches_self_referencing_pages_node() {
    let mut store = InMemoryObjectStore::new();
    let root = ObjectRef::new(1, 0);
    store.insert(
        root,
        dict(vec![
            ("Type", Object::Name("Pages".to_string())),
            ("Kids", Object::Array(vec![Object::Reference(root)])),
        ]),
    );
    let extractor = PagesExtractor::new(store, ExtractionConfig::default());
    let err = extractor.extract(root).unwrap_err();
    assert!(matches!(err, pdf_textcore::ExtractError::Cycle(_)));
}

#[test]
fn page_tree_walk_visits_leaves_in_document_order() {
    let mut b = PageBuilder::new();
    let font = b.simple_font(vec![500.0], 65, "WinAnsiEncoding");
    let resources = b.resources_with_font("F1", font);
    let page1 = b.page(resources, b"BT /F1 10 Tf (first) Tj ET", vec![]);
    let page2 = b.page(resources, b"BT /F1 10 Tf (second) Tj ET", vec![]);
    let root = b.alloc(dict(vec![
        ("Type", Object::Name("Pages".to_string())),
        ("Kids", Object::Array(vec![Object::Reference(page1), Object::Reference(page2)])),
    ]));

    let extractor = PagesExtractor::new(b.store, ExtractionConfig::default());
    let pages = extractor.extract(root).unwrap();

    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0][0].text, "first");
    assert_eq!(pages[1][0].text, "second");
}
