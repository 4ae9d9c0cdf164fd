//! `ToUnicode` CMap parsing.
//!
//! CMap streams map character codes (as they appear in a shown string,
//! before encoding) to Unicode text. This module parses the `beginbfchar`/
//! `beginbfrange`/`beginnotdefrange` sections of a `ToUnicode` stream, and
//! also the `begincodespacerange` declarations used for longest-match
//! decoding of non-`ToUnicode` CMaps (e.g. `Identity-H`-style CID fonts
//! with an embedded CMap rather than a predefined name).

use std::collections::HashMap;

use regex::Regex;

use crate::error::Result;

/// A character map from character codes to Unicode strings.
#[derive(Clone, Debug, Default)]
pub struct CMap {
    chars: HashMap<u32, String>,
    /// Declared byte lengths for codespace ranges, longest first, used to
    /// decode a byte string without knowing individual code widths ahead of
    /// time.
    code_lengths: Vec<u8>,
    /// `/WMode 1` declares vertical writing mode for this CMap.
    vertical: bool,
}

impl CMap {
    fn new() -> Self {
        CMap {
            chars: HashMap::new(),
            code_lengths: Vec::new(),
            vertical: false,
        }
    }

    fn insert(&mut self, code: u32, unicode: String) {
        self.chars.insert(code, unicode);
    }

    /// Look up the Unicode string for a single character code.
    pub fn get(&self, code: u32) -> Option<&str> {
        self.chars.get(&code).map(String::as_str)
    }

    /// True if no mappings were parsed.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Number of mappings.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Declared codespace byte lengths, longest first. Empty if the CMap
    /// declared no `codespacerange`.
    pub fn code_lengths(&self) -> &[u8] {
        &self.code_lengths
    }

    /// True if this CMap declared `/WMode 1` (vertical writing mode).
    pub fn is_vertical(&self) -> bool {
        self.vertical
    }

    /// Decode a byte string using longest-match against the declared
    /// codespace ranges, falling back to 1-byte codes if none were declared.
    /// A code with no mapping is consumed silently (no replacement
    /// character emitted) per the recovered-error policy for unmapped
    /// `ToUnicode` bytes.
    pub fn decode_longest_match(&self, bytes: &[u8]) -> String {
        self.decode_longest_match_pairs(bytes)
            .into_iter()
            .map(|(_, s)| s)
            .collect()
    }

    /// Like [`CMap::decode_longest_match`], but also returns the matched
    /// character code for each decoded piece, so callers can look up
    /// per-glyph widths without re-deriving the byte-length split.
    pub fn decode_longest_match_pairs(&self, bytes: &[u8]) -> Vec<(u32, String)> {
        let lengths: Vec<u8> = if self.code_lengths.is_empty() {
            vec![1]
        } else {
            let mut v = self.code_lengths.clone();
            v.sort_unstable_by(|a, b| b.cmp(a));
            v
        };

        let mut out = Vec::new();
        let mut i = 0usize;
        while i < bytes.len() {
            let mut matched = false;
            for &len in &lengths {
                let len = len as usize;
                if len == 0 || i + len > bytes.len() {
                    continue;
                }
                let mut code: u32 = 0;
                for &b in &bytes[i..i + len] {
                    code = (code << 8) | b as u32;
                }
                if let Some(s) = self.get(code) {
                    out.push((code, s.to_string()));
                    i += len;
                    matched = true;
                    break;
                }
            }
            if !matched {
                i += 1;
            }
        }
        out
    }
}

/// Parse a `ToUnicode` CMap stream.
///
/// # Examples
///
/// ```
/// use pdf_textcore::fonts::cmap::parse_tounicode_cmap;
///
/// let stream = b"1 beginbfchar\n<0041> <0042>\nendbfchar";
/// let cmap = parse_tounicode_cmap(stream).unwrap();
/// assert_eq!(cmap.get(0x41), Some("B"));
/// ```
pub fn parse_tounicode_cmap(data: &[u8]) -> Result<CMap> {
    let mut cmap = CMap::new();
    let content = String::from_utf8_lossy(data);

    cmap.vertical = parse_wmode(&content) == Some(1);

    for section in extract_sections(&content, "begincodespacerange", "endcodespacerange") {
        for line in section.lines() {
            if let Some(len) = parse_codespace_line(line) {
                if !cmap.code_lengths.contains(&len) {
                    cmap.code_lengths.push(len);
                }
            }
        }
    }

    for section in extract_sections(&content, "beginbfchar", "endbfchar") {
        for line in section.lines() {
            if let Some((src, dst)) = parse_bfchar_line(line) {
                cmap.insert(src, dst);
            }
        }
    }

    for section in extract_sections(&content, "beginbfrange", "endbfrange") {
        for line in section.lines() {
            if let Some(mappings) = parse_bfrange_line(line) {
                for (src, dst) in mappings {
                    cmap.insert(src, dst);
                }
            }
        }
    }

    for section in extract_sections(&content, "beginnotdefrange", "endnotdefrange") {
        for line in section.lines() {
            if let Some(mappings) = parse_notdefrange_line(line) {
                for (src, dst) in mappings {
                    if !cmap.chars.contains_key(&src) {
                        cmap.insert(src, dst);
                    }
                }
            }
        }
    }

    Ok(cmap)
}

fn extract_sections<'a>(content: &'a str, begin: &str, end: &str) -> Vec<&'a str> {
    let mut sections = Vec::new();
    let mut remaining = content;

    while let Some(begin_pos) = remaining.find(begin) {
        let after_begin = &remaining[begin_pos + begin.len()..];
        if let Some(end_pos) = after_begin.find(end) {
            sections.push(&after_begin[..end_pos]);
            remaining = &after_begin[end_pos + end.len()..];
        } else {
            break;
        }
    }

    sections
}

/// Parse a `/WMode 1 def` declaration out of the CMap's PostScript prologue,
/// returning its integer value (0 = horizontal, 1 = vertical). Absent if the
/// CMap declares no `WMode` at all.
fn parse_wmode(content: &str) -> Option<i32> {
    let re = Regex::new(r"/WMode\s+(-?\d+)").ok()?;
    let caps = re.captures(content)?;
    caps[1].parse().ok()
}

fn parse_codespace_line(line: &str) -> Option<u8> {
    let re = Regex::new(r"<([0-9A-Fa-f]+)>\s*<([0-9A-Fa-f]+)>").ok()?;
    let caps = re.captures(line)?;
    let lo = caps[1].trim();
    Some((lo.len() / 2) as u8)
}

fn parse_escape_sequence(token: &str) -> Option<String> {
    let token = token.trim();
    let token = if token.starts_with('<') && token.ends_with('>') {
        &token[1..token.len() - 1]
    } else {
        token
    };
    match token.to_lowercase().trim() {
        "space" => Some(" ".to_string()),
        "tab" => Some("\t".to_string()),
        "newline" => Some("\n".to_string()),
        "carriage return" => Some("\r".to_string()),
        _ => None,
    }
}

/// Decode a UTF-16 surrogate pair encoded as a 32-bit value, falling back to
/// a direct code point if the bit pattern is not a valid surrogate pair.
fn decode_utf16_surrogate_pair(value: u32) -> Option<String> {
    let high = (value >> 16) as u16;
    let low = (value & 0xFFFF) as u16;

    if (0xD800..=0xDBFF).contains(&high) && (0xDC00..=0xDFFF).contains(&low) {
        let codepoint = 0x10000 + (((high & 0x3FF) as u32) << 10) + ((low & 0x3FF) as u32);
        char::from_u32(codepoint).map(|ch| ch.to_string())
    } else {
        char::from_u32(value).map(|ch| ch.to_string())
    }
}

fn decode_hex_destination(dst_hex: &str) -> Option<String> {
    if dst_hex.len() <= 4 {
        let dst_code = u32::from_str_radix(dst_hex, 16).ok()?;
        char::from_u32(dst_code).map(|c| c.to_string())
    } else if dst_hex.len() == 8 {
        let dst_code = u32::from_str_radix(dst_hex, 16).ok()?;
        decode_utf16_surrogate_pair(dst_code).or_else(|| {
            let mut result = String::new();
            if let Ok(code1) = u32::from_str_radix(&dst_hex[0..4], 16) {
                if let Some(ch) = char::from_u32(code1) {
                    result.push(ch);
                }
            }
            if let Ok(code2) = u32::from_str_radix(&dst_hex[4..8], 16) {
                if let Some(ch) = char::from_u32(code2) {
                    result.push(ch);
                }
            }
            if result.is_empty() { None } else { Some(result) }
        })
    } else {
        let mut result = String::new();
        for i in (0..dst_hex.len()).step_by(4) {
            let end = (i + 4).min(dst_hex.len());
            if let Ok(code) = u32::from_str_radix(&dst_hex[i..end], 16) {
                if let Some(ch) = char::from_u32(code) {
                    result.push(ch);
                }
            }
        }
        if result.is_empty() { None } else { Some(result) }
    }
}

fn parse_bfchar_line(line: &str) -> Option<(u32, String)> {
    let re = Regex::new(r"<([^>]*)>\s*<([^>]*)>").ok()?;
    let caps = re.captures(line)?;

    let src_str = caps[1].trim().replace(char::is_whitespace, "");
    let src = u32::from_str_radix(&src_str, 16).ok()?;

    let dst_str = caps[2].trim();
    let dst = if let Some(escape) = parse_escape_sequence(&format!("<{dst_str}>")) {
        escape
    } else {
        let dst_hex = dst_str.replace(char::is_whitespace, "");
        decode_hex_destination(&dst_hex)?
    };

    Some((src, dst))
}

fn parse_bfrange_line(line: &str) -> Option<Vec<(u32, String)>> {
    let re_array = Regex::new(r"<([^>]*)>\s*<([^>]*)>\s*\[((?:\s*<[^>]+>\s*)+)\]").ok()?;
    let re_seq = Regex::new(r"<([^>]*)>\s*<([^>]*)>\s*<([^>]*)>").ok()?;

    if let Some(caps) = re_array.captures(line) {
        let start_str = caps[1].trim().replace(char::is_whitespace, "");
        let end_str = caps[2].trim().replace(char::is_whitespace, "");
        let start = u32::from_str_radix(&start_str, 16).ok()?;
        let end = u32::from_str_radix(&end_str, 16).ok()?;
        let array_str = &caps[3];

        let re_hex = Regex::new(r"<([^>]*)>").ok()?;
        let dst_hexes: Vec<String> = re_hex
            .captures_iter(array_str)
            .filter_map(|cap| {
                let s = cap.get(1)?.as_str().trim().replace(char::is_whitespace, "");
                if s.is_empty() { None } else { Some(s) }
            })
            .collect();

        let range_size = (end.saturating_sub(start) + 1) as usize;
        let mut result = Vec::new();
        for (i, dst_hex) in dst_hexes.iter().take(range_size).enumerate() {
            let src = start + i as u32;
            if let Some(dst) = decode_hex_destination(dst_hex) {
                result.push((src, dst));
            }
        }
        return Some(result);
    }

    if let Some(caps) = re_seq.captures(line) {
        let start_str = caps[1].trim().replace(char::is_whitespace, "");
        let end_str = caps[2].trim().replace(char::is_whitespace, "");
        let dst_start_str = caps[3].trim().replace(char::is_whitespace, "");
        let start = u32::from_str_radix(&start_str, 16).ok()?;
        let end = u32::from_str_radix(&end_str, 16).ok()?;
        let dst_start = u32::from_str_radix(&dst_start_str, 16).ok()?;

        let range_size = end.saturating_sub(start).min(10_000);
        let mut result = Vec::new();
        for i in 0..=range_size {
            let src = start.wrapping_add(i);
            let dst_code = dst_start.wrapping_add(i);
            let unicode_string = if dst_code > 0xFFFF {
                decode_utf16_surrogate_pair(dst_code)
            } else {
                char::from_u32(dst_code).map(|ch| ch.to_string())
            };
            if let Some(s) = unicode_string {
                result.push((src, s));
            }
        }
        return Some(result);
    }

    None
}

fn parse_notdefrange_line(line: &str) -> Option<Vec<(u32, String)>> {
    let re_seq = Regex::new(r"<([^>]*)>\s*<([^>]*)>\s*<([^>]*)>").ok()?;
    let caps = re_seq.captures(line)?;

    let start_str = caps[1].trim().replace(char::is_whitespace, "");
    let end_str = caps[2].trim().replace(char::is_whitespace, "");
    let dst_str = caps[3].trim();

    let start = u32::from_str_radix(&start_str, 16).ok()?;
    let end = u32::from_str_radix(&end_str, 16).ok()?;

    let dst = if let Some(escape) = parse_escape_sequence(&format!("<{dst_str}>")) {
        escape
    } else {
        decode_hex_destination(&dst_str.replace(char::is_whitespace, ""))?
    };

    let range_size = end.saturating_sub(start).min(10_000);
    Some((0..=range_size).map(|i| (start + i, dst.clone())).collect())
}
