//! Charset dispatch: maps a PDF `/Encoding` name to a decoding strategy, and
//! applies a `/Differences` array on top of a base encoding.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::error::{ExtractError, Result};
use crate::fonts::standard_encodings::{glyph_name_to_unicode, BaseEncoding};

/// A resolved decoding strategy for a font's character codes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConverterMode {
    /// One of the four predefined single-byte base encodings.
    Base(BaseEncoding),
    /// `/Identity-H` or `/Identity-V`: 2-byte codes equal to the CID,
    /// meaningless without a `ToUnicode` CMap.
    IdentityTwoByte,
    /// Big-endian UTF-16 (`/UniXX-UCS2-*`, `/UniXX-UTF16-*`).
    Utf16Be,
    /// Big-endian UTF-32 (`/UniXX-UTF32-*`).
    Utf32Be,
    /// Raw UTF-8 bytes (`/UniXX-UTF8-*`).
    Utf8Passthrough,
    /// A named multi-byte charset backed by `encoding_rs`.
    Named(NamedCharset),
}

/// The named multi-byte charset families this crate can decode directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedCharset {
    /// Simplified Chinese, `GBK` code page.
    Gbk,
    /// Simplified Chinese, `GB18030` code page.
    Gb18030,
    /// Simplified Chinese, `EUC-CN`/`GB2312`.
    EucCn,
    /// Traditional Chinese, `Big5`.
    Big5,
    /// Japanese, `Shift-JIS`.
    ShiftJis,
    /// Japanese, `EUC-JP`.
    EucJp,
    /// Korean, `EUC-KR`.
    EucKr,
    /// Korean, `UHC` (extended `EUC-KR`).
    Uhc,
    /// Japanese, `ISO-2022-JP` (the `H`/`V`/`Add-*`/`Ext-*`/`NWP-*` family).
    Iso2022Jp,
}

impl NamedCharset {
    fn encoding(self) -> &'static encoding_rs::Encoding {
        match self {
            NamedCharset::Gbk => encoding_rs::GBK,
            NamedCharset::Gb18030 => encoding_rs::GB18030,
            NamedCharset::EucCn => encoding_rs::GBK,
            NamedCharset::Big5 => encoding_rs::BIG5,
            NamedCharset::ShiftJis => encoding_rs::SHIFT_JIS,
            NamedCharset::EucJp => encoding_rs::EUC_JP,
            NamedCharset::EucKr => encoding_rs::EUC_KR,
            NamedCharset::Uhc => encoding_rs::EUC_KR,
            NamedCharset::Iso2022Jp => encoding_rs::ISO_2022_JP,
        }
    }
}

lazy_static! {
    static ref PREDEFINED_MODES: HashMap<&'static str, ConverterMode> = {
        let mut m = HashMap::new();
        m.insert("Identity-H", ConverterMode::IdentityTwoByte);
        m.insert("Identity-V", ConverterMode::IdentityTwoByte);
        m
    };
}

/// Resolve a PDF `/Encoding` name string to a [`ConverterMode`].
///
/// # Examples
///
/// ```
/// use pdf_textcore::fonts::charset::{resolve_encoding_name, ConverterMode};
///
/// assert_eq!(resolve_encoding_name("Identity-H").unwrap(), ConverterMode::IdentityTwoByte);
/// assert!(resolve_encoding_name("ISO-2022-KR").is_err());
/// ```
pub fn resolve_encoding_name(name: &str) -> Result<ConverterMode> {
    if let Some(base) = BaseEncoding::from_name(name) {
        return Ok(ConverterMode::Base(base));
    }
    if let Some(&mode) = PREDEFINED_MODES.get(name) {
        return Ok(mode);
    }

    let suffix_h_or_v = |s: &str| s.ends_with("-H") || s.ends_with("-V");

    if name.starts_with("Uni") && name.contains("-UCS2-") || name.starts_with("Uni") && name.contains("-UTF16-") {
        return Ok(ConverterMode::Utf16Be);
    }
    if name.starts_with("Uni") && name.contains("-UTF32-") {
        return Ok(ConverterMode::Utf32Be);
    }
    if name.starts_with("Uni") && name.contains("-UTF8-") {
        return Ok(ConverterMode::Utf8Passthrough);
    }

    if name.starts_with("GBK2K-") {
        return Ok(ConverterMode::Named(NamedCharset::Gb18030));
    }
    if name.starts_with("GBK-EUC-") || name.starts_with("GBKp-EUC-") {
        return Ok(ConverterMode::Named(NamedCharset::Gbk));
    }
    if name.starts_with("GB-EUC-") || name.starts_with("GBpc-EUC-") || name.starts_with("GBT-EUC-") {
        return Ok(ConverterMode::Named(NamedCharset::EucCn));
    }
    if name.starts_with("78-EUC-") || name.starts_with("Hojo-EUC-") {
        return Ok(ConverterMode::Named(NamedCharset::EucJp));
    }

    if name.starts_with("B5-") || name.starts_with("ETen-B5-") || name.starts_with("ETenms-B5-") || name.starts_with("HK")
    {
        return Ok(ConverterMode::Named(NamedCharset::Big5));
    }

    if name.starts_with("RKSJ-")
        || name.starts_with("83pv-RKSJ-")
        || name.starts_with("90")
        || name.starts_with("78")
        || name.starts_with("Add-RKSJ-")
        || name.starts_with("Ext-RKSJ-")
    {
        return Ok(ConverterMode::Named(NamedCharset::ShiftJis));
    }

    if name.starts_with("KSC-EUC-") || name.starts_with("KSCpv-EUC-") {
        return Ok(ConverterMode::Named(NamedCharset::EucKr));
    }
    if name.starts_with("KSCms-EUC-") || name.starts_with("KSC-Johab-") {
        return Ok(ConverterMode::Named(NamedCharset::Uhc));
    }

    if name.starts_with("KSC-") && suffix_h_or_v(name) {
        // ISO-2022-KR; `encoding_rs` carries no such encoding.
        return Err(ExtractError::UnknownEncodingName(name.to_string()));
    }
    if name.starts_with("Hojo-") && suffix_h_or_v(name) {
        // ISO-2022-JP-1, a JIS X 0212 superset of ISO-2022-JP that
        // `encoding_rs` does not implement.
        return Err(ExtractError::UnknownEncodingName(name.to_string()));
    }
    if (name.starts_with("CNS") && suffix_h_or_v(name))
        || ((name.starts_with("GB-") || name.starts_with("GBT-")) && suffix_h_or_v(name))
    {
        // ISO-2022-CN; like ISO-2022-KR, `encoding_rs` has no implementation.
        return Err(ExtractError::UnknownEncodingName(name.to_string()));
    }
    if name == "H" || name == "V" || name.starts_with("Add-") || name.starts_with("Ext-") || name.starts_with("NWP-") {
        return Ok(ConverterMode::Named(NamedCharset::Iso2022Jp));
    }

    Err(ExtractError::UnknownEncodingName(name.to_string()))
}

/// Decode a byte string under a resolved [`ConverterMode`], without
/// consulting any `/Differences` override or `ToUnicode` CMap (those take
/// priority and are applied by [`crate::fonts::converter_engine`]).
pub fn decode_mode(mode: ConverterMode, bytes: &[u8]) -> String {
    match mode {
        ConverterMode::Base(encoding) => bytes.iter().filter_map(|&b| encoding.decode(b)).collect(),
        ConverterMode::IdentityTwoByte => String::new(),
        ConverterMode::Utf16Be => encoding_rs::UTF_16BE.decode(bytes).0.into_owned(),
        ConverterMode::Utf32Be => bytes
            .chunks_exact(4)
            .filter_map(|c| {
                let code = u32::from_be_bytes([c[0], c[1], c[2], c[3]]);
                char::from_u32(code)
            })
            .collect(),
        ConverterMode::Utf8Passthrough => String::from_utf8_lossy(bytes).into_owned(),
        ConverterMode::Named(charset) => charset.encoding().decode(bytes).0.into_owned(),
    }
}

/// A base encoding with a `/Differences` array layered on top.
#[derive(Debug, Clone, Default)]
pub struct DiffConverter {
    overrides: HashMap<u32, String>,
}

impl DiffConverter {
    /// Build from a `/Differences` array: alternating code (integer) and
    /// glyph-name (name) entries, where each name applies to the running
    /// code and increments it.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_textcore::fonts::charset::DiffConverter;
    ///
    /// let diff = DiffConverter::from_pairs(&[(0x64, "rho".to_string())]);
    /// assert_eq!(diff.get(0x64), Some("\u{03C1}".to_string()));
    /// ```
    pub fn from_pairs(pairs: &[(u32, String)]) -> Self {
        let mut overrides = HashMap::new();
        for (code, name) in pairs {
            if let Some(c) = glyph_name_to_unicode(name) {
                overrides.insert(*code, c.to_string());
            }
        }
        Self { overrides }
    }

    /// Look up an override for a single code, resolved through the Adobe
    /// Glyph List at construction time.
    pub fn get(&self, code: u32) -> Option<String> {
        self.overrides.get(&code).cloned()
    }

    /// True if no usable overrides were recorded (every name was either
    /// absent or failed AGL/`uniXXXX` resolution).
    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_encoding_names() {
        assert_eq!(resolve_encoding_name("WinAnsiEncoding").unwrap(), ConverterMode::Base(BaseEncoding::WinAnsi));
    }

    #[test]
    fn test_identity_h() {
        assert_eq!(resolve_encoding_name("Identity-H").unwrap(), ConverterMode::IdentityTwoByte);
    }

    #[test]
    fn test_utf16be_dispatch() {
        assert_eq!(resolve_encoding_name("UniGB-UCS2-H").unwrap(), ConverterMode::Utf16Be);
        assert_eq!(resolve_encoding_name("UniJIS-UTF16-V").unwrap(), ConverterMode::Utf16Be);
    }

    #[test]
    fn test_utf32be_dispatch() {
        assert_eq!(resolve_encoding_name("UniGB-UTF32-H").unwrap(), ConverterMode::Utf32Be);
    }

    #[test]
    fn test_gbk_dispatch() {
        assert_eq!(resolve_encoding_name("GBK-EUC-H").unwrap(), ConverterMode::Named(NamedCharset::Gbk));
    }

    #[test]
    fn test_big5_dispatch() {
        assert_eq!(resolve_encoding_name("ETen-B5-H").unwrap(), ConverterMode::Named(NamedCharset::Big5));
    }

    #[test]
    fn test_unsupported_legacy_cjk_is_unknown_encoding() {
        assert!(matches!(
            resolve_encoding_name("KSC-H"),
            Err(ExtractError::UnknownEncodingName(_))
        ));
    }

    #[test]
    fn test_iso_2022_jp_family_dispatch() {
        assert_eq!(resolve_encoding_name("H").unwrap(), ConverterMode::Named(NamedCharset::Iso2022Jp));
        assert_eq!(resolve_encoding_name("V").unwrap(), ConverterMode::Named(NamedCharset::Iso2022Jp));
        assert_eq!(resolve_encoding_name("Add-H").unwrap(), ConverterMode::Named(NamedCharset::Iso2022Jp));
        assert_eq!(resolve_encoding_name("Ext-V").unwrap(), ConverterMode::Named(NamedCharset::Iso2022Jp));
        assert_eq!(resolve_encoding_name("NWP-H").unwrap(), ConverterMode::Named(NamedCharset::Iso2022Jp));
    }

    #[test]
    fn test_iso_2022_cn_and_kr_families_remain_unsupported() {
        assert!(matches!(resolve_encoding_name("CNS1-H"), Err(ExtractError::UnknownEncodingName(_))));
        assert!(matches!(resolve_encoding_name("GB-H"), Err(ExtractError::UnknownEncodingName(_))));
        assert!(matches!(resolve_encoding_name("GBT-V"), Err(ExtractError::UnknownEncodingName(_))));
        assert!(matches!(resolve_encoding_name("Hojo-H"), Err(ExtractError::UnknownEncodingName(_))));
        assert!(resolve_encoding_name("ISO-2022-KR").is_err());
        assert!(resolve_encoding_name("ISO-2022-CN").is_err());
        assert!(resolve_encoding_name("EUC-TW").is_err());
    }

    #[test]
    fn test_decode_mode_base() {
        let out = decode_mode(ConverterMode::Base(BaseEncoding::WinAnsi), b"Hi");
        assert_eq!(out, "Hi");
    }

    #[test]
    fn test_diff_converter_overrides_base() {
        let diff = DiffConverter::from_pairs(&[(0x64, "rho".to_string())]);
        assert_eq!(diff.get(0x64), Some("\u{03C1}".to_string()));
        assert_eq!(diff.get(0x65), None);
    }

    #[test]
    fn test_diff_converter_unknown_glyph_name_dropped() {
        let diff = DiffConverter::from_pairs(&[(0x10, "notarealglyphname".to_string())]);
        assert!(diff.is_empty());
    }
}
