//! Base single-byte text encodings and the Adobe Glyph List.
//!
//! A simple font's `/Encoding` entry names one of the four predefined base
//! encodings below (or omits `/Encoding`, which behaves as the font's
//! built-in encoding — approximated here as `StandardEncoding`), optionally
//! overridden per-code-point by a `/Differences` array of glyph names. This
//! module supplies the base tables; [`crate::fonts::charset`] applies
//! `/Differences` on top and resolves glyph names through
//! [`glyph_name_to_unicode`].
//!
//! Bytes 0x00-0x7F agree with ASCII across all four base encodings (aside
//! from a handful of typographic punctuation glyphs in `StandardEncoding`);
//! the tables below only need to special-case the upper half.

/// One of the four predefined PDF base encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseEncoding {
    /// `/StandardEncoding` (Adobe's original Type 1 encoding).
    Standard,
    /// `/WinAnsiEncoding` (Windows code page 1252, roughly).
    WinAnsi,
    /// `/MacRomanEncoding`.
    MacRoman,
    /// `/MacExpertEncoding` (small-caps and oldstyle figure variants).
    MacExpert,
}

impl BaseEncoding {
    /// Parse a `/Encoding` name into a base encoding, if it names one of the
    /// four predefined encodings.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "StandardEncoding" => Some(BaseEncoding::Standard),
            "WinAnsiEncoding" => Some(BaseEncoding::WinAnsi),
            "MacRomanEncoding" => Some(BaseEncoding::MacRoman),
            "MacExpertEncoding" => Some(BaseEncoding::MacExpert),
            _ => None,
        }
    }

    /// Decode a single byte to its base-encoding Unicode scalar value.
    pub fn decode(self, byte: u8) -> Option<char> {
        if byte < 0x80 {
            return decode_ascii_range(self, byte);
        }
        match self {
            BaseEncoding::Standard => standard_upper(byte),
            BaseEncoding::WinAnsi => win_ansi_upper(byte),
            BaseEncoding::MacRoman => mac_roman_upper(byte),
            BaseEncoding::MacExpert => None,
        }
    }
}

fn decode_ascii_range(encoding: BaseEncoding, byte: u8) -> Option<char> {
    if encoding == BaseEncoding::Standard {
        match byte {
            0x27 => return Some('\u{2019}'), // quoteright
            0x60 => return Some('\u{2018}'), // quoteleft
            _ => {},
        }
    }
    if byte == 0x00 {
        None
    } else {
        Some(byte as char)
    }
}

fn standard_upper(byte: u8) -> Option<char> {
    match byte {
        0xA1 => Some('\u{00A1}'),
        0xA2 => Some('\u{00A2}'),
        0xA3 => Some('\u{00A3}'),
        0xA4 => Some('\u{2044}'),
        0xA5 => Some('\u{00A5}'),
        0xA7 => Some('\u{00A7}'),
        0xA8 => Some('\u{00A4}'),
        0xA9 => Some('\u{0027}'),
        0xAA => Some('\u{201C}'),
        0xAB => Some('\u{00AB}'),
        0xAC => Some('\u{2039}'),
        0xAD => Some('\u{203A}'),
        0xAE => Some('\u{FB01}'),
        0xAF => Some('\u{FB02}'),
        0xB1 => Some('\u{2013}'),
        0xB2 => Some('\u{2020}'),
        0xB3 => Some('\u{2021}'),
        0xB4 => Some('\u{00B7}'),
        0xB6 => Some('\u{00B6}'),
        0xB7 => Some('\u{2022}'),
        0xB8 => Some('\u{201A}'),
        0xB9 => Some('\u{201E}'),
        0xBA => Some('\u{201D}'),
        0xBB => Some('\u{00BB}'),
        0xBC => Some('\u{2026}'),
        0xBD => Some('\u{2030}'),
        0xBF => Some('\u{00BF}'),
        0xC1 => Some('\u{0060}'),
        0xC2 => Some('\u{00B4}'),
        0xC3 => Some('\u{02C6}'),
        0xC4 => Some('\u{02DC}'),
        0xC5 => Some('\u{00AF}'),
        0xC6 => Some('\u{02D8}'),
        0xC7 => Some('\u{02D9}'),
        0xC8 => Some('\u{00A8}'),
        0xCA => Some('\u{02DA}'),
        0xCB => Some('\u{00B8}'),
        0xCD => Some('\u{02DD}'),
        0xCE => Some('\u{02DB}'),
        0xCF => Some('\u{02C7}'),
        0xD0 => Some('\u{2014}'),
        0xE1 => Some('\u{00C6}'),
        0xE3 => Some('\u{00AA}'),
        0xE8 => Some('\u{0141}'),
        0xE9 => Some('\u{00D8}'),
        0xEA => Some('\u{0152}'),
        0xEB => Some('\u{00BA}'),
        0xF1 => Some('\u{00E6}'),
        0xF5 => Some('\u{0131}'),
        0xF8 => Some('\u{0142}'),
        0xF9 => Some('\u{00F8}'),
        0xFA => Some('\u{0153}'),
        0xFB => Some('\u{00DF}'),
        _ => None,
    }
}

fn win_ansi_upper(byte: u8) -> Option<char> {
    match byte {
        0x80 => Some('\u{20AC}'),
        0x82 => Some('\u{201A}'),
        0x83 => Some('\u{0192}'),
        0x84 => Some('\u{201E}'),
        0x85 => Some('\u{2026}'),
        0x86 => Some('\u{2020}'),
        0x87 => Some('\u{2021}'),
        0x88 => Some('\u{02C6}'),
        0x89 => Some('\u{2030}'),
        0x8A => Some('\u{0160}'),
        0x8B => Some('\u{2039}'),
        0x8C => Some('\u{0152}'),
        0x8E => Some('\u{017D}'),
        0x91 => Some('\u{2018}'),
        0x92 => Some('\u{2019}'),
        0x93 => Some('\u{201C}'),
        0x94 => Some('\u{201D}'),
        0x95 => Some('\u{2022}'),
        0x96 => Some('\u{2013}'),
        0x97 => Some('\u{2014}'),
        0x98 => Some('\u{02DC}'),
        0x99 => Some('\u{2122}'),
        0x9A => Some('\u{0161}'),
        0x9B => Some('\u{203A}'),
        0x9C => Some('\u{0153}'),
        0x9E => Some('\u{017E}'),
        0x9F => Some('\u{0178}'),
        0xA0..=0xFF => char::from_u32(byte as u32),
        _ => None,
    }
}

fn mac_roman_upper(byte: u8) -> Option<char> {
    const TABLE: [char; 128] = [
        '\u{00C4}', '\u{00C5}', '\u{00C7}', '\u{00C9}', '\u{00D1}', '\u{00D6}', '\u{00DC}', '\u{00E1}', '\u{00E0}',
        '\u{00E2}', '\u{00E4}', '\u{00E3}', '\u{00E5}', '\u{00E7}', '\u{00E9}', '\u{00E8}', '\u{00EA}', '\u{00EB}',
        '\u{00ED}', '\u{00EC}', '\u{00EE}', '\u{00EF}', '\u{00F1}', '\u{00F3}', '\u{00F2}', '\u{00F4}', '\u{00F6}',
        '\u{00F5}', '\u{00FA}', '\u{00F9}', '\u{00FB}', '\u{00FC}', '\u{2020}', '\u{00B0}', '\u{00A2}', '\u{00A3}',
        '\u{00A7}', '\u{2022}', '\u{00B6}', '\u{00DF}', '\u{00AE}', '\u{00A9}', '\u{2122}', '\u{00B4}', '\u{00A8}',
        '\u{2260}', '\u{00C6}', '\u{00D8}', '\u{221E}', '\u{00B1}', '\u{2264}', '\u{2265}', '\u{00A5}', '\u{00B5}',
        '\u{2202}', '\u{2211}', '\u{220F}', '\u{03C0}', '\u{222B}', '\u{00AA}', '\u{00BA}', '\u{03A9}', '\u{00E6}',
        '\u{00F8}', '\u{00BF}', '\u{00A1}', '\u{00AC}', '\u{221A}', '\u{0192}', '\u{2248}', '\u{2206}', '\u{00AB}',
        '\u{00BB}', '\u{2026}', '\u{00A0}', '\u{00C0}', '\u{00C3}', '\u{00D5}', '\u{0152}', '\u{0153}', '\u{2013}',
        '\u{2014}', '\u{201C}', '\u{201D}', '\u{2018}', '\u{2019}', '\u{00F7}', '\u{25CA}', '\u{00FF}', '\u{0178}',
        '\u{2044}', '\u{20AC}', '\u{2039}', '\u{203A}', '\u{FB01}', '\u{FB02}', '\u{2021}', '\u{00B7}', '\u{201A}',
        '\u{201E}', '\u{2030}', '\u{00C2}', '\u{00CA}', '\u{00C1}', '\u{00CB}', '\u{00C8}', '\u{00CD}', '\u{00CE}',
        '\u{00CF}', '\u{00CC}', '\u{00D3}', '\u{00D4}', '\u{F8FF}', '\u{00D2}', '\u{00DA}', '\u{00DB}', '\u{00D9}',
        '\u{0131}', '\u{02C6}', '\u{02DC}', '\u{00AF}', '\u{02D8}', '\u{02D9}', '\u{02DA}', '\u{00B8}', '\u{02DD}',
        '\u{02DB}', '\u{02C7}',
    ];
    TABLE.get((byte - 0x80) as usize).copied()
}

/// Resolve a glyph name to a Unicode scalar value via the Adobe Glyph List,
/// falling back to the `uniXXXX`/`uXXXX` hex-name conventions.
///
/// # Examples
///
/// ```
/// use pdf_textcore::fonts::standard_encodings::glyph_name_to_unicode;
///
/// assert_eq!(glyph_name_to_unicode("bullet"), Some('\u{2022}'));
/// assert_eq!(glyph_name_to_unicode("uni0041"), Some('A'));
/// assert_eq!(glyph_name_to_unicode("u1F600"), Some('\u{1F600}'));
/// assert_eq!(glyph_name_to_unicode("A"), Some('A'));
/// ```
pub fn glyph_name_to_unicode(glyph_name: &str) -> Option<char> {
    if let Some(&c) = ADOBE_GLYPH_LIST.get(glyph_name) {
        return Some(c);
    }

    if glyph_name.len() == 1 {
        if let Some(c) = glyph_name.chars().next() {
            if c.is_ascii_alphanumeric() {
                return Some(c);
            }
        }
    }

    if let Some(hex) = glyph_name.strip_prefix("uni") {
        if hex.len() >= 4 {
            if let Ok(code) = u32::from_str_radix(&hex[..4], 16) {
                return char::from_u32(code);
            }
        }
    }

    if let Some(hex) = glyph_name.strip_prefix('u') {
        if (4..=6).contains(&hex.len()) {
            if let Ok(code) = u32::from_str_radix(hex, 16) {
                return char::from_u32(code);
            }
        }
    }

    None
}

/// A representative subset of the Adobe Glyph List: the glyph names that
/// actually appear in `/Differences` arrays in the wild (accented Latin
/// letters, typographic punctuation, and common symbols). Names outside
/// this list fall through to the `uniXXXX`/`uXXXX` conventions above.
static ADOBE_GLYPH_LIST: phf::Map<&'static str, char> = phf::phf_map! {
    "space" => ' ',
    "exclam" => '!',
    "quotedbl" => '"',
    "numbersign" => '#',
    "dollar" => '$',
    "percent" => '%',
    "ampersand" => '&',
    "quotesingle" => '\'',
    "parenleft" => '(',
    "parenright" => ')',
    "asterisk" => '*',
    "plus" => '+',
    "comma" => ',',
    "hyphen" => '-',
    "period" => '.',
    "slash" => '/',
    "colon" => ':',
    "semicolon" => ';',
    "less" => '<',
    "equal" => '=',
    "greater" => '>',
    "question" => '?',
    "at" => '@',
    "bracketleft" => '[',
    "backslash" => '\\',
    "bracketright" => ']',
    "asciicircum" => '^',
    "underscore" => '_',
    "grave" => '`',
    "braceleft" => '{',
    "bar" => '|',
    "braceright" => '}',
    "asciitilde" => '~',
    "bullet" => '\u{2022}',
    "emdash" => '\u{2014}',
    "endash" => '\u{2013}',
    "quoteleft" => '\u{2018}',
    "quoteright" => '\u{2019}',
    "quotedblleft" => '\u{201C}',
    "quotedblright" => '\u{201D}',
    "quotesinglbase" => '\u{201A}',
    "quotedblbase" => '\u{201E}',
    "ellipsis" => '\u{2026}',
    "dagger" => '\u{2020}',
    "daggerdbl" => '\u{2021}',
    "perthousand" => '\u{2030}',
    "trademark" => '\u{2122}',
    "fi" => '\u{FB01}',
    "fl" => '\u{FB02}',
    "florin" => '\u{0192}',
    "guilsinglleft" => '\u{2039}',
    "guilsinglright" => '\u{203A}',
    "guillemotleft" => '\u{00AB}',
    "guillemotright" => '\u{00BB}',
    "Euro" => '\u{20AC}',
    "copyright" => '\u{00A9}',
    "registered" => '\u{00AE}',
    "degree" => '\u{00B0}',
    "plusminus" => '\u{00B1}',
    "multiply" => '\u{00D7}',
    "divide" => '\u{00F7}',
    "minus" => '\u{2212}',
    "periodcentered" => '\u{00B7}',
    "section" => '\u{00A7}',
    "paragraph" => '\u{00B6}',
    "Aacute" => '\u{00C1}',
    "aacute" => '\u{00E1}',
    "Acircumflex" => '\u{00C2}',
    "acircumflex" => '\u{00E2}',
    "Adieresis" => '\u{00C4}',
    "adieresis" => '\u{00E4}',
    "Agrave" => '\u{00C0}',
    "agrave" => '\u{00E0}',
    "Aring" => '\u{00C5}',
    "aring" => '\u{00E5}',
    "Atilde" => '\u{00C3}',
    "atilde" => '\u{00E3}',
    "AE" => '\u{00C6}',
    "ae" => '\u{00E6}',
    "Ccedilla" => '\u{00C7}',
    "ccedilla" => '\u{00E7}',
    "Eacute" => '\u{00C9}',
    "eacute" => '\u{00E9}',
    "Ecircumflex" => '\u{00CA}',
    "ecircumflex" => '\u{00EA}',
    "Edieresis" => '\u{00CB}',
    "edieresis" => '\u{00EB}',
    "Egrave" => '\u{00C8}',
    "egrave" => '\u{00E8}',
    "Iacute" => '\u{00CD}',
    "iacute" => '\u{00ED}',
    "Icircumflex" => '\u{00CE}',
    "icircumflex" => '\u{00EE}',
    "Idieresis" => '\u{00CF}',
    "idieresis" => '\u{00EF}',
    "Igrave" => '\u{00CC}',
    "igrave" => '\u{00EC}',
    "Ntilde" => '\u{00D1}',
    "ntilde" => '\u{00F1}',
    "Oacute" => '\u{00D3}',
    "oacute" => '\u{00F3}',
    "Ocircumflex" => '\u{00D4}',
    "ocircumflex" => '\u{00F4}',
    "Odieresis" => '\u{00D6}',
    "odieresis" => '\u{00F6}',
    "Ograve" => '\u{00D2}',
    "ograve" => '\u{00F2}',
    "Oslash" => '\u{00D8}',
    "oslash" => '\u{00F8}',
    "Otilde" => '\u{00D5}',
    "otilde" => '\u{00F5}',
    "OE" => '\u{0152}',
    "oe" => '\u{0153}',
    "Scaron" => '\u{0160}',
    "scaron" => '\u{0161}',
    "Uacute" => '\u{00DA}',
    "uacute" => '\u{00FA}',
    "Ucircumflex" => '\u{00DB}',
    "ucircumflex" => '\u{00FB}',
    "Udieresis" => '\u{00DC}',
    "udieresis" => '\u{00FC}',
    "Ugrave" => '\u{00D9}',
    "ugrave" => '\u{00F9}',
    "Yacute" => '\u{00DD}',
    "yacute" => '\u{00FD}',
    "Ydieresis" => '\u{0178}',
    "ydieresis" => '\u{00FF}',
    "Zcaron" => '\u{017D}',
    "zcaron" => '\u{017E}',
    "germandbls" => '\u{00DF}',
    "dotlessi" => '\u{0131}',
    "Lslash" => '\u{0141}',
    "lslash" => '\u{0142}',
};
