//! Page-tree walk, font-resource resolution, and content-stream
//! interpretation: the top-level entry point of the extraction pipeline.

use std::borrow::Cow;
use std::collections::HashMap;
use std::collections::HashSet;

use crate::config::ExtractionConfig;
use crate::content::coordinates::Coordinates;
use crate::content::matrix::Matrix;
use crate::content::operators::Operator;
use crate::content::parser::parse_content_stream;
use crate::error::{ExtractError, Result};
use crate::extractor::object_store::ObjectStore;
use crate::fonts::charset::{resolve_encoding_name, ConverterMode, DiffConverter};
use crate::fonts::cmap::{parse_tounicode_cmap, CMap};
use crate::fonts::converter_engine::ConverterEngine;
use crate::fonts::font::Font;
use crate::fonts::standard_encodings::BaseEncoding;
use crate::object::{Object, ObjectRef};

/// US Letter in points, the fallback `/MediaBox` when none is inherited.
const DEFAULT_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

/// A decoded, positioned run of text, the unit of [`PagesExtractor`]'s
/// output.
#[derive(Debug, Clone, PartialEq)]
pub struct TextChunk {
    /// Decoded UTF-8 text.
    pub text: String,
    /// Page-space bounding box as `(x0, y0, x1, y1)`.
    pub bbox: (f32, f32, f32, f32),
}

impl From<crate::fonts::converter_engine::TextChunk> for TextChunk {
    fn from(chunk: crate::fonts::converter_engine::TextChunk) -> Self {
        let r = chunk.rect;
        TextChunk {
            text: chunk.text,
            bbox: (r.left(), r.top(), r.right(), r.bottom()),
        }
    }
}

#[derive(Debug, Clone)]
struct Inherited {
    resources: Object,
    media_box: [f32; 4],
    crop_box: Option<[f32; 4]>,
    rotate: i32,
}

struct PageEntry {
    resources: Object,
    media_box: [f32; 4],
    crop_box: Option<[f32; 4]>,
    rotate: i32,
    contents: Vec<u8>,
}

/// A font resource resolved from a page or Form XObject's `/Resources
/// /Font` dictionary.
struct ResolvedFont {
    font: Font,
    mode: ConverterMode,
    diff: Option<DiffConverter>,
    to_unicode: Option<CMap>,
}

/// Walks a PDF page tree, interprets each page's content stream (and any
/// Form XObjects it invokes), and emits positioned, decoded text.
///
/// Does not parse file structure or decode stream filters itself; both are
/// the responsibility of the [`ObjectStore`] it is constructed with.
pub struct PagesExtractor<S: ObjectStore> {
    store: S,
    config: ExtractionConfig,
}

impl<S: ObjectStore> PagesExtractor<S> {
    /// Build an extractor over an already-resolved object store.
    pub fn new(store: S, config: ExtractionConfig) -> Self {
        Self { store, config }
    }

    /// The configuration this extractor was built with.
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Walk the page tree rooted at `pages_root` and extract text from every
    /// leaf page, in document order.
    pub fn extract(&self, pages_root: ObjectRef) -> Result<Vec<Vec<TextChunk>>> {
        let entries = self.collect_pages(pages_root)?;
        entries.iter().map(|entry| self.extract_page(entry)).collect()
    }

    /// Extract text from a single page, given its indirect reference.
    /// Inherited attributes (`/Resources`, `/MediaBox`, `/CropBox`,
    /// `/Rotate`) are not resolved by this entry point; use [`Self::extract`]
    /// for a full page-tree walk.
    pub fn extract_single_page(&self, page_ref: ObjectRef) -> Result<Vec<TextChunk>> {
        let inherited = Inherited {
            resources: Object::Dictionary(HashMap::new()),
            media_box: DEFAULT_MEDIA_BOX,
            crop_box: None,
            rotate: 0,
        };
        let mut ancestors = HashSet::new();
        let mut out = Vec::new();
        self.walk_page_tree(page_ref, inherited, 0, &mut ancestors, &mut out)?;
        match out.first() {
            Some(entry) => self.extract_page(entry),
            None => Ok(Vec::new()),
        }
    }

    fn collect_pages(&self, pages_root: ObjectRef) -> Result<Vec<PageEntry>> {
        let inherited = Inherited {
            resources: Object::Dictionary(HashMap::new()),
            media_box: DEFAULT_MEDIA_BOX,
            crop_box: None,
            rotate: 0,
        };
        let mut ancestors = HashSet::new();
        let mut out = Vec::new();
        self.walk_page_tree(pages_root, inherited, 0, &mut ancestors, &mut out)?;
        Ok(out)
    }

    fn walk_page_tree(
        &self,
        node_ref: ObjectRef,
        inherited: Inherited,
        depth: u32,
        ancestors: &mut HashSet<ObjectRef>,
        out: &mut Vec<PageEntry>,
    ) -> Result<()> {
        if depth > self.config.max_recursion_depth {
            log::error!("page tree exceeded max depth at {node_ref}, aborting");
            return Err(ExtractError::Cycle(format!("page tree exceeded max depth at {node_ref}")));
        }
        if !ancestors.insert(node_ref) {
            log::error!("page tree cycle detected at {node_ref}, aborting");
            return Err(ExtractError::Cycle(format!("page tree cycle at {node_ref}")));
        }
        let result = self.walk_page_tree_inner(node_ref, inherited, depth, ancestors, out);
        ancestors.remove(&node_ref);
        result
    }

    fn walk_page_tree_inner(
        &self,
        node_ref: ObjectRef,
        inherited: Inherited,
        depth: u32,
        ancestors: &mut HashSet<ObjectRef>,
        out: &mut Vec<PageEntry>,
    ) -> Result<()> {
        let obj = self.store.get(node_ref)?;
        let dict = obj.as_dict().ok_or_else(|| {
            log::error!("page tree node {node_ref} is a {}, expected Dictionary", obj.type_name());
            ExtractError::UnexpectedKind {
                expected: "Dictionary".to_string(),
                found: obj.type_name().to_string(),
            }
        })?;

        let resources = match dict.get("Resources") {
            Some(o) => self.store.resolve(o)?.into_owned(),
            None => inherited.resources.clone(),
        };
        let media_box = self.read_rect(dict, "MediaBox")?.unwrap_or(inherited.media_box);
        let crop_box = self.read_rect(dict, "CropBox")?.or(inherited.crop_box);
        let rotate = self.read_rotate(dict)?.unwrap_or(inherited.rotate);

        let next_inherited = Inherited {
            resources,
            media_box,
            crop_box,
            rotate,
        };

        if dict.get("Type").and_then(Object::as_name) == Some("Pages") {
            let kids_obj = dict.get("Kids").ok_or_else(|| {
                log::error!("Pages node {node_ref} has no /Kids entry");
                ExtractError::MissingKey("Kids".to_string())
            })?;
            let kids = self.store.resolve(kids_obj)?;
            let kids = kids.as_array().ok_or_else(|| {
                log::error!("/Kids at {node_ref} is a {}, expected Array", kids.type_name());
                ExtractError::UnexpectedKind {
                    expected: "Array".to_string(),
                    found: kids.type_name().to_string(),
                }
            })?;
            for kid in kids {
                if let Some(kid_ref) = kid.as_reference() {
                    self.walk_page_tree(kid_ref, next_inherited.clone(), depth + 1, ancestors, out)?;
                }
            }
            return Ok(());
        }

        let contents = self.read_contents(dict)?;
        out.push(PageEntry {
            resources: next_inherited.resources,
            media_box: next_inherited.media_box,
            crop_box: next_inherited.crop_box,
            rotate: next_inherited.rotate,
            contents,
        });
        Ok(())
    }

    fn read_rect(&self, dict: &HashMap<String, Object>, key: &str) -> Result<Option<[f32; 4]>> {
        let obj = match dict.get(key) {
            Some(o) => o,
            None => return Ok(None),
        };
        let resolved = self.store.resolve(obj)?;
        let arr = resolved.as_array().ok_or_else(|| ExtractError::UnexpectedKind {
            expected: "Array".to_string(),
            found: resolved.type_name().to_string(),
        })?;
        if arr.len() != 4 {
            log::error!("{key} does not have 4 entries, aborting page extraction");
            return Err(ExtractError::MalformedObject(format!("{key} does not have 4 entries")));
        }
        let mut out = [0.0f32; 4];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = arr[i].as_number().ok_or_else(|| {
                log::error!("{key}[{i}] is not numeric, aborting page extraction");
                ExtractError::InvalidNumeric(format!("{key}[{i}]"))
            })? as f32;
        }
        Ok(Some(out))
    }

    fn read_rotate(&self, dict: &HashMap<String, Object>) -> Result<Option<i32>> {
        match dict.get("Rotate") {
            None => Ok(None),
            Some(o) => {
                let resolved = self.store.resolve(o)?;
                Ok(resolved.as_integer().map(|i| i as i32))
            },
        }
    }

    /// Concatenate every content stream named by `/Contents` (a single
    /// stream, or an array of streams joined by a single space, per the PDF
    /// spec's treatment of split content streams).
    fn read_contents(&self, dict: &HashMap<String, Object>) -> Result<Vec<u8>> {
        let contents = match dict.get("Contents") {
            Some(o) => o,
            None => return Ok(Vec::new()),
        };
        let resolved = self.store.resolve(contents)?;
        match &*resolved {
            Object::Stream { data, .. } => Ok(data.clone()),
            Object::Array(streams) => {
                let mut out = Vec::new();
                for (i, s) in streams.iter().enumerate() {
                    let resolved = self.store.resolve(s)?;
                    if let Object::Stream { data, .. } = &*resolved {
                        if i > 0 {
                            out.push(b' ');
                        }
                        out.extend_from_slice(data);
                    }
                }
                Ok(out)
            },
            other => {
                log::error!("/Contents is a {}, expected Stream or Array", other.type_name());
                Err(ExtractError::UnexpectedKind {
                    expected: "Stream or Array".to_string(),
                    found: other.type_name().to_string(),
                })
            },
        }
    }

    fn extract_page(&self, entry: &PageEntry) -> Result<Vec<TextChunk>> {
        let effective_box = entry.crop_box.unwrap_or(entry.media_box);
        let base_ctm = page_base_ctm(effective_box, entry.rotate);
        let mut xobject_ancestors = HashSet::new();
        self.run_content_stream(&entry.contents, &entry.resources, base_ctm, 0, &mut xobject_ancestors)
    }

    fn run_content_stream(
        &self,
        data: &[u8],
        resources: &Object,
        base_ctm: Matrix,
        depth: u32,
        xobject_ancestors: &mut HashSet<ObjectRef>,
    ) -> Result<Vec<TextChunk>> {
        if depth > self.config.max_recursion_depth {
            log::error!("content stream recursion exceeded max depth {}", self.config.max_recursion_depth);
            return Err(ExtractError::Cycle("content stream recursion exceeded max depth".to_string()));
        }

        let fonts = self.build_font_cache(resources)?;
        log::debug!("entering content stream at depth {depth} with {} resolved font(s)", fonts.len());
        let ops = parse_content_stream(data);
        let mut coords = Coordinates::new(base_ctm);
        let mut current_font: Option<String> = None;
        let mut chunks = Vec::new();

        for op in ops {
            match op {
                Operator::SaveState => coords.save_state(),
                Operator::RestoreState => coords.restore_state(),
                Operator::Cm { a, b, c, d, e, f } => coords.cm(Matrix { a, b, c, d, e, f }),
                Operator::BeginText => coords.begin_text(),
                Operator::EndText => coords.end_text(),
                Operator::Tf { font, size } => {
                    current_font = Some(font);
                    coords.set_font_size(size);
                },
                Operator::Tz { scale } => coords.set_horizontal_scaling(scale),
                Operator::Tc { char_space } => coords.set_char_spacing(char_space),
                Operator::Tw { word_space } => coords.set_word_spacing(word_space),
                Operator::TL { leading } => coords.set_leading(leading),
                Operator::Ts { rise } => coords.set_rise(rise),
                Operator::Td { tx, ty } => coords.move_text_position(tx, ty),
                Operator::TD { tx, ty } => coords.move_text_position_set_leading(tx, ty),
                Operator::Tm { a, b, c, d, e, f } => coords.set_text_matrix(Matrix { a, b, c, d, e, f }),
                Operator::TStar => coords.next_line(),
                Operator::Tj { text } => {
                    self.show_string(&fonts, current_font.as_deref(), &text, &mut coords, 0.0, &mut chunks);
                },
                Operator::Quote { text } => {
                    coords.quote();
                    self.show_string(&fonts, current_font.as_deref(), &text, &mut coords, 0.0, &mut chunks);
                },
                Operator::DoubleQuote {
                    word_space,
                    char_space,
                    text,
                } => {
                    coords.double_quote(word_space, char_space);
                    self.show_string(&fonts, current_font.as_deref(), &text, &mut coords, 0.0, &mut chunks);
                },
                Operator::TJ { array } => {
                    self.show_array(&fonts, current_font.as_deref(), &array, &mut coords, &mut chunks);
                },
                Operator::Do { name } => {
                    match self.run_xobject(&name, resources, coords.ctm(), depth, xobject_ancestors) {
                        Ok(mut sub) => chunks.append(&mut sub),
                        Err(e) => log::warn!("skipping XObject {name}: {e}"),
                    }
                },
                Operator::Other { .. } => {},
            }
        }

        Ok(chunks)
    }

    fn show_string(
        &self,
        fonts: &HashMap<String, ResolvedFont>,
        font_name: Option<&str>,
        text: &[u8],
        coords: &mut Coordinates,
        tj: f32,
        chunks: &mut Vec<TextChunk>,
    ) {
        let Some(name) = font_name else {
            log::warn!("Tj/'/\" seen with no active font, dropping string");
            return;
        };
        let Some(resolved) = fonts.get(name) else {
            log::warn!("font resource {name} not found in this scope, dropping string");
            return;
        };
        log::debug!("font cache hit for {name}");
        let engine = ConverterEngine::new(resolved.mode, resolved.diff.as_ref(), resolved.to_unicode.as_ref(), &resolved.font);
        if let Some(chunk) = engine.get_string(text, coords, tj) {
            if !chunk.text.is_empty() {
                chunks.push(chunk.into());
            }
        }
    }

    fn show_array(
        &self,
        fonts: &HashMap<String, ResolvedFont>,
        font_name: Option<&str>,
        array: &[crate::content::operators::TextElement],
        coords: &mut Coordinates,
        chunks: &mut Vec<TextChunk>,
    ) {
        let Some(name) = font_name else {
            log::warn!("TJ seen with no active font, dropping array");
            return;
        };
        let Some(resolved) = fonts.get(name) else {
            log::warn!("font resource {name} not found in this scope, dropping array");
            return;
        };
        log::debug!("font cache hit for {name}");
        let engine = ConverterEngine::new(resolved.mode, resolved.diff.as_ref(), resolved.to_unicode.as_ref(), &resolved.font);
        let mut sub = engine.get_strings_from_array(array, coords, self.config.default_space_width_sentinel);
        chunks.extend(sub.drain(..).filter(|c| !c.text.is_empty()).map(TextChunk::from));
    }

    fn run_xobject(
        &self,
        name: &str,
        resources: &Object,
        outer_ctm: Matrix,
        depth: u32,
        xobject_ancestors: &mut HashSet<ObjectRef>,
    ) -> Result<Vec<TextChunk>> {
        let xobject_dict_obj = resources.as_dict().and_then(|d| d.get("XObject")).ok_or_else(|| {
            log::error!("resources dictionary has no /XObject entry, cannot run /Do {name}");
            ExtractError::MissingKey("XObject".to_string())
        })?;
        let xobject_dict = self.store.resolve(xobject_dict_obj)?;
        let xobject_dict = xobject_dict.as_dict().ok_or_else(|| {
            log::error!("/XObject is a {}, expected Dictionary", xobject_dict.type_name());
            ExtractError::UnexpectedKind {
                expected: "Dictionary".to_string(),
                found: xobject_dict.type_name().to_string(),
            }
        })?;
        let entry = xobject_dict.get(name).ok_or_else(|| {
            log::error!("XObject/{name} not found in resources");
            ExtractError::MissingKey(format!("XObject/{name}"))
        })?;

        let xobject_ref = entry.as_reference();
        if let Some(r) = xobject_ref {
            if depth > self.config.max_recursion_depth {
                log::error!("XObject recursion exceeded max depth at {r}, aborting");
                return Err(ExtractError::Cycle(format!("XObject recursion exceeded max depth at {r}")));
            }
            if !xobject_ancestors.insert(r) {
                log::error!("XObject cycle detected at {r}, aborting");
                return Err(ExtractError::Cycle(format!("XObject cycle at {r}")));
            }
        }

        let result = self.run_xobject_inner(entry, resources, outer_ctm, depth, xobject_ancestors);

        if let Some(r) = xobject_ref {
            xobject_ancestors.remove(&r);
        }
        result
    }

    fn run_xobject_inner(
        &self,
        entry: &Object,
        caller_resources: &Object,
        outer_ctm: Matrix,
        depth: u32,
        xobject_ancestors: &mut HashSet<ObjectRef>,
    ) -> Result<Vec<TextChunk>> {
        let resolved = self.store.resolve(entry)?;
        let (dict, data) = resolved.as_stream().ok_or_else(|| {
            log::error!("XObject entry is a {}, expected Stream", resolved.type_name());
            ExtractError::UnexpectedKind {
                expected: "Stream".to_string(),
                found: resolved.type_name().to_string(),
            }
        })?;

        if dict.get("Subtype").and_then(Object::as_name) != Some("Form") {
            return Ok(Vec::new());
        }

        let matrix = match dict.get("Matrix") {
            Some(Object::Array(arr)) if arr.len() == 6 => {
                let nums: Vec<f32> = arr.iter().filter_map(Object::as_number).map(|n| n as f32).collect();
                if nums.len() == 6 {
                    Matrix {
                        a: nums[0],
                        b: nums[1],
                        c: nums[2],
                        d: nums[3],
                        e: nums[4],
                        f: nums[5],
                    }
                } else {
                    log::error!("Form XObject /Matrix has {} entries, expected 6", nums.len());
                    return Err(ExtractError::InvalidMatrix);
                }
            },
            Some(_) => {
                log::error!("Form XObject /Matrix is not an array");
                return Err(ExtractError::InvalidMatrix);
            },
            None => Matrix::identity(),
        };
        let ctm = matrix.multiply(&outer_ctm);

        let own_resources = match dict.get("Resources") {
            Some(o) => self.store.resolve(o)?.into_owned(),
            None => caller_resources.clone(),
        };
        log::debug!("descending into Form XObject resource scope at depth {}", depth + 1);

        self.run_content_stream(data, &own_resources, ctm, depth + 1, xobject_ancestors)
    }

    fn build_font_cache(&self, resources: &Object) -> Result<HashMap<String, ResolvedFont>> {
        let mut cache = HashMap::new();
        let Some(dict) = resources.as_dict() else {
            return Ok(cache);
        };
        let Some(font_dict_entry) = dict.get("Font") else {
            return Ok(cache);
        };
        let font_dict_obj = self.store.resolve(font_dict_entry)?;
        let Some(font_dict) = font_dict_obj.as_dict() else {
            return Ok(cache);
        };

        for (name, font_ref) in font_dict {
            let font_obj = match self.store.resolve(font_ref) {
                Ok(o) => o,
                Err(e) => {
                    log::warn!("could not resolve font resource {name}: {e}");
                    continue;
                },
            };
            match self.resolve_font(&font_obj) {
                Ok(resolved) => {
                    log::debug!("font cache miss for {name}: resolved and cached for this resource scope");
                    cache.insert(name.clone(), resolved);
                },
                Err(e) => log::warn!("skipping font resource {name}: {e}"),
            }
        }
        Ok(cache)
    }

    fn resolve_font(&self, font_obj: &Object) -> Result<ResolvedFont> {
        let dict = font_obj.as_dict().ok_or_else(|| {
            log::error!("font resource is a {}, expected Dictionary", font_obj.type_name());
            ExtractError::UnexpectedKind {
                expected: "Dictionary".to_string(),
                found: font_obj.type_name().to_string(),
            }
        })?;
        match dict.get("Subtype").and_then(Object::as_name) {
            Some("Type0") => self.resolve_composite_font(dict),
            _ => self.resolve_simple_font(dict),
        }
    }

    fn resolve_simple_font(&self, dict: &HashMap<String, Object>) -> Result<ResolvedFont> {
        let first_char = dict.get("FirstChar").and_then(Object::as_integer).unwrap_or(0).max(0) as u32;
        let widths = self.read_number_array(dict.get("Widths"))?;
        let descriptor = self.resolve_descriptor(dict)?;
        let missing_width = descriptor
            .as_ref()
            .and_then(|d| d.get("MissingWidth"))
            .and_then(Object::as_number)
            .unwrap_or(0.0) as f32;

        let mut font = if widths.is_empty() {
            Font::default()
        } else {
            Font::from_simple_widths(first_char, &widths, missing_width)
        };
        font = self.apply_descriptor_metrics(font, descriptor.as_ref());

        let (mode, diff) = self.resolve_simple_encoding(dict.get("Encoding"))?;
        let to_unicode = self.resolve_to_unicode(dict.get("ToUnicode"))?;
        Ok(ResolvedFont {
            font,
            mode,
            diff,
            to_unicode,
        })
    }

    fn resolve_composite_font(&self, dict: &HashMap<String, Object>) -> Result<ResolvedFont> {
        let descendants_obj = dict.get("DescendantFonts").ok_or_else(|| {
            log::error!("Type0 font has no /DescendantFonts entry");
            ExtractError::MissingKey("DescendantFonts".to_string())
        })?;
        let descendants = self.store.resolve(descendants_obj)?;
        let descendants = descendants.as_array().ok_or_else(|| {
            log::error!("/DescendantFonts is a {}, expected Array", descendants.type_name());
            ExtractError::UnexpectedKind {
                expected: "Array".to_string(),
                found: descendants.type_name().to_string(),
            }
        })?;
        let first = descendants.first().ok_or_else(|| {
            log::error!("/DescendantFonts array is empty");
            ExtractError::MissingKey("DescendantFonts[0]".to_string())
        })?;
        let desc_font_obj = self.store.resolve(first)?.into_owned();
        let desc_dict = desc_font_obj.as_dict().ok_or_else(|| {
            log::error!("DescendantFonts[0] is a {}, expected Dictionary", desc_font_obj.type_name());
            ExtractError::UnexpectedKind {
                expected: "Dictionary".to_string(),
                found: desc_font_obj.type_name().to_string(),
            }
        })?;

        let default_width = desc_dict.get("DW").and_then(Object::as_number).unwrap_or(1000.0) as f32;
        let w_array = self.read_object_array(desc_dict.get("W"))?;
        let mut font = Font::from_cid_widths(&w_array, default_width);

        let descriptor = self.resolve_descriptor(desc_dict)?;
        font = self.apply_descriptor_metrics(font, descriptor.as_ref());

        let encoding_name = dict.get("Encoding").and_then(Object::as_name).unwrap_or("Identity-H");
        let mode = resolve_encoding_name(encoding_name)?;
        font = font.with_vertical(encoding_name.ends_with("-V"));

        let to_unicode = self.resolve_to_unicode(dict.get("ToUnicode"))?;
        Ok(ResolvedFont {
            font,
            mode,
            diff: None,
            to_unicode,
        })
    }

    fn resolve_descriptor(&self, dict: &HashMap<String, Object>) -> Result<Option<HashMap<String, Object>>> {
        match dict.get("FontDescriptor") {
            None => Ok(None),
            Some(o) => {
                let resolved = self.store.resolve(o)?;
                match &*resolved {
                    Object::Dictionary(d) => Ok(Some(d.clone())),
                    _ => Ok(None),
                }
            },
        }
    }

    fn apply_descriptor_metrics(&self, font: Font, descriptor: Option<&HashMap<String, Object>>) -> Font {
        let Some(desc) = descriptor else { return font };
        let descent = desc.get("Descent").and_then(Object::as_number).unwrap_or(-200.0) as f32;
        let ascent = desc.get("Ascent").and_then(Object::as_number).unwrap_or(800.0) as f32;
        let avg_or_missing = desc
            .get("AvgWidth")
            .and_then(Object::as_number)
            .or_else(|| desc.get("MissingWidth").and_then(Object::as_number))
            .map(|n| n as f32);
        font.with_descriptor_metrics(descent, ascent).with_descriptor_space_width(avg_or_missing)
    }

    fn resolve_simple_encoding(&self, enc_obj: Option<&Object>) -> Result<(ConverterMode, Option<DiffConverter>)> {
        let Some(obj) = enc_obj else {
            return Ok((ConverterMode::Base(BaseEncoding::Standard), None));
        };
        let resolved = self.store.resolve(obj)?;
        match &*resolved {
            Object::Name(name) => Ok((resolve_encoding_name(name)?, None)),
            Object::Dictionary(d) => {
                let base_name = d.get("BaseEncoding").and_then(Object::as_name).unwrap_or("StandardEncoding");
                let mode = resolve_encoding_name(base_name)?;
                let diff = match d.get("Differences") {
                    Some(o) => {
                        let resolved = self.store.resolve(o)?;
                        let arr = resolved.as_array().ok_or_else(|| {
                            log::error!("/Differences is a {}, expected Array", resolved.type_name());
                            ExtractError::MalformedObject("Differences is not an array".to_string())
                        })?;
                        Some(DiffConverter::from_pairs(&expand_differences(arr)))
                    },
                    None => None,
                };
                Ok((mode, diff))
            },
            other => {
                log::error!("/Encoding is a {}, expected Name or Dictionary", other.type_name());
                Err(ExtractError::UnexpectedKind {
                    expected: "Name or Dictionary".to_string(),
                    found: other.type_name().to_string(),
                })
            },
        }
    }

    fn resolve_to_unicode(&self, obj: Option<&Object>) -> Result<Option<CMap>> {
        let Some(obj) = obj else { return Ok(None) };
        let resolved = self.store.resolve(obj)?;
        match &*resolved {
            Object::Stream { data, .. } => Ok(Some(parse_tounicode_cmap(data)?)),
            _ => Ok(None),
        }
    }

    fn read_number_array(&self, obj: Option<&Object>) -> Result<Vec<f32>> {
        match obj {
            None => Ok(Vec::new()),
            Some(o) => {
                let resolved = self.store.resolve(o)?;
                let arr = resolved.as_array().cloned().unwrap_or_default();
                Ok(arr.iter().filter_map(Object::as_number).map(|n| n as f32).collect())
            },
        }
    }

    fn read_object_array(&self, obj: Option<&Object>) -> Result<Vec<Object>> {
        match obj {
            None => Ok(Vec::new()),
            Some(o) => {
                let resolved: Cow<'_, Object> = self.store.resolve(o)?;
                Ok(resolved.as_array().cloned().unwrap_or_default())
            },
        }
    }
}

/// Compose a page's base CTM from its effective page-space rectangle
/// (`/CropBox`, falling back to `/MediaBox`) and `/Rotate`, following the
/// usual convention of translating the box origin to zero and rotating
/// about it, then translating back into the positive quadrant.
fn page_base_ctm(page_box: [f32; 4], rotate: i32) -> Matrix {
    let width = page_box[2] - page_box[0];
    let height = page_box[3] - page_box[1];
    let to_origin = Matrix::translation(-page_box[0], -page_box[1]);
    let rotation = Matrix::rotation_degrees(rotate);
    let post_translate = match rotate.rem_euclid(360) {
        90 => Matrix::translation(height, 0.0),
        180 => Matrix::translation(width, height),
        270 => Matrix::translation(0.0, width),
        _ => Matrix::identity(),
    };
    to_origin.multiply(&rotation).multiply(&post_translate)
}

/// Expand a `/Differences` array into `(code, glyph_name)` pairs: integers
/// set the running code, names consume it and increment.
fn expand_differences(arr: &[Object]) -> Vec<(u32, String)> {
    let mut out = Vec::new();
    let mut code = 0u32;
    for item in arr {
        match item {
            Object::Integer(i) => code = (*i).max(0) as u32,
            Object::Real(r) => code = (*r).max(0.0) as u32,
            Object::Name(name) => {
                out.push((code, name.clone()));
                code += 1;
            },
            _ => {},
        }
    }
    out
}
