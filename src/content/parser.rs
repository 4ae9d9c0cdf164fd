//! Content stream tokenizer.
//!
//! Parses already-decoded content stream bytes into a sequence of
//! [`Operator`] values. Content streams use postfix notation: operands are
//! pushed first, the operator name comes last, e.g.
//! `BT /F1 12 Tf 100 700 Td (Hello, World!) Tj ET`.
//!
//! The tokenizer is deliberately tolerant: if an operand or operator cannot
//! be parsed, the offending byte is skipped and tokenizing resumes, so a
//! single malformed run in an otherwise-good stream does not abort the
//! whole page.

use std::collections::HashMap;

use nom::IResult;
use nom::bytes::complete::{tag, take, take_while1};
use nom::character::complete::{digit1, multispace0};

use crate::content::operators::{Operator, TextElement};
use crate::object::Object;

/// Parse a content stream into a sequence of operators.
///
/// # Examples
///
/// ```
/// use pdf_textcore::content::parser::parse_content_stream;
///
/// let stream = b"BT /F1 12 Tf 100 700 Td (Hello) Tj ET";
/// let operators = parse_content_stream(stream);
/// assert!(!operators.is_empty());
/// ```
pub fn parse_content_stream(data: &[u8]) -> Vec<Operator> {
    let mut operators = Vec::new();
    let mut input = data;

    while !input.is_empty() {
        if let Ok((rest, _)) = multispace0::<&[u8], nom::error::Error<&[u8]>>(input) {
            input = rest;
        }
        if input.is_empty() {
            break;
        }

        match parse_operator_with_operands(input) {
            Ok((rest, op)) => {
                operators.push(op);
                input = rest;
            },
            Err(_) => {
                if input.len() > 1 {
                    input = &input[1..];
                } else {
                    break;
                }
            },
        }
    }

    operators
}

fn parse_operator_with_operands(input: &[u8]) -> IResult<&[u8], Operator> {
    let mut operands = Vec::new();
    let mut remaining = input;

    loop {
        let (inp, _) = multispace0(remaining)?;
        remaining = inp;

        if remaining.is_empty() {
            return Err(nom::Err::Error(nom::error::Error::new(
                remaining,
                nom::error::ErrorKind::Eof,
            )));
        }

        if is_operator_start(remaining[0]) {
            let (rest, op_name) = parse_operator_name(remaining)?;

            if op_name == "BI" {
                return parse_inline_image(rest);
            }

            let op = build_operator(&op_name, operands);
            return Ok((rest, op));
        }

        let (inp, obj) = parse_object(remaining)?;
        operands.push(obj);
        remaining = inp;
    }
}

fn is_operator_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'\'' || byte == b'"' || byte == b'*'
}

fn parse_operator_name(input: &[u8]) -> IResult<&[u8], String> {
    if input[0] == b'\'' || input[0] == b'"' {
        let (rest, tok) = take(1usize)(input)?;
        return Ok((rest, String::from_utf8_lossy(tok).into_owned()));
    }
    let (rest, name) = take_while1(|b: u8| b.is_ascii_alphabetic() || b == b'*')(input)?;
    Ok((rest, String::from_utf8_lossy(name).into_owned()))
}

/// Consume an inline image (`BI ... ID <binary> EI`) without extracting its
/// data; inline images are not part of the text-extraction surface, but the
/// tokenizer must still skip past them correctly to avoid desynchronizing on
/// their embedded binary payload.
fn parse_inline_image(mut input: &[u8]) -> IResult<&[u8], Operator> {
    loop {
        match tag::<_, _, nom::error::Error<&[u8]>>("ID")(input) {
            Ok((rest, _)) => {
                input = rest;
                break;
            },
            Err(_) => {
                if input.is_empty() {
                    return Err(nom::Err::Error(nom::error::Error::new(
                        input,
                        nom::error::ErrorKind::Eof,
                    )));
                }
                input = &input[1..];
            },
        }
    }
    // skip the single whitespace byte separating ID from binary data
    if !input.is_empty() {
        input = &input[1..];
    }
    loop {
        match tag::<_, _, nom::error::Error<&[u8]>>("EI")(input) {
            Ok((rest, _)) => return Ok((rest, operator_other_noop())),
            Err(_) => {
                if input.is_empty() {
                    return Err(nom::Err::Error(nom::error::Error::new(
                        input,
                        nom::error::ErrorKind::Eof,
                    )));
                }
                input = &input[1..];
            },
        }
    }
}

fn operator_other_noop() -> Operator {
    Operator::Other {
        name: "BI".to_string(),
        operands: Vec::new(),
    }
}

fn build_operator(name: &str, mut operands: Vec<Object>) -> Operator {
    let num = |o: &Object| o.as_number().unwrap_or(0.0) as f32;
    let text = |o: &Object| o.as_string().map(|s| s.to_vec()).unwrap_or_default();

    match name {
        "q" => Operator::SaveState,
        "Q" => Operator::RestoreState,
        "cm" if operands.len() == 6 => {
            let f = num(&operands[5]);
            let e = num(&operands[4]);
            let d = num(&operands[3]);
            let c = num(&operands[2]);
            let b = num(&operands[1]);
            let a = num(&operands[0]);
            Operator::Cm { a, b, c, d, e, f }
        },
        "BT" => Operator::BeginText,
        "ET" => Operator::EndText,
        "Tf" if operands.len() == 2 => {
            let size = num(&operands[1]);
            let font = operands[0].as_name().unwrap_or_default().to_string();
            Operator::Tf { font, size }
        },
        "Tj" if operands.len() == 1 => Operator::Tj {
            text: text(&operands[0]),
        },
        "TJ" if operands.len() == 1 => {
            let array = match &operands[0] {
                Object::Array(items) => items
                    .iter()
                    .filter_map(|item| match item {
                        Object::String(s) => Some(TextElement::String(s.clone())),
                        Object::Integer(_) | Object::Real(_) => {
                            item.as_number().map(|n| TextElement::Offset(n as f32))
                        },
                        _ => None,
                    })
                    .collect(),
                _ => Vec::new(),
            };
            Operator::TJ { array }
        },
        "'" if operands.len() == 1 => Operator::Quote {
            text: text(&operands[0]),
        },
        "\"" if operands.len() == 3 => {
            let t = text(&operands[2]);
            let char_space = num(&operands[1]);
            let word_space = num(&operands[0]);
            Operator::DoubleQuote {
                word_space,
                char_space,
                text: t,
            }
        },
        "Tz" if operands.len() == 1 => Operator::Tz { scale: num(&operands[0]) },
        "Tc" if operands.len() == 1 => Operator::Tc {
            char_space: num(&operands[0]),
        },
        "Tw" if operands.len() == 1 => Operator::Tw {
            word_space: num(&operands[0]),
        },
        "TL" if operands.len() == 1 => Operator::TL { leading: num(&operands[0]) },
        "T*" => Operator::TStar,
        "Td" if operands.len() == 2 => Operator::Td {
            tx: num(&operands[0]),
            ty: num(&operands[1]),
        },
        "TD" if operands.len() == 2 => Operator::TD {
            tx: num(&operands[0]),
            ty: num(&operands[1]),
        },
        "Tm" if operands.len() == 6 => {
            let f = num(&operands[5]);
            let e = num(&operands[4]);
            let d = num(&operands[3]);
            let c = num(&operands[2]);
            let b = num(&operands[1]);
            let a = num(&operands[0]);
            Operator::Tm { a, b, c, d, e, f }
        },
        "Ts" if operands.len() == 1 => Operator::Ts { rise: num(&operands[0]) },
        "Do" if operands.len() == 1 => Operator::Do {
            name: operands[0].as_name().unwrap_or_default().to_string(),
        },
        _ => Operator::Other {
            name: name.to_string(),
            operands: std::mem::take(&mut operands),
        },
    }
}

fn parse_object(input: &[u8]) -> IResult<&[u8], Object> {
    let (input, _) = multispace0(input)?;
    if input.is_empty() {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Eof,
        )));
    }
    match input[0] {
        b'/' => parse_name(input),
        b'(' => parse_literal_string(input),
        b'<' if input.len() > 1 && input[1] == b'<' => parse_dictionary(input),
        b'<' => parse_hex_string(input),
        b'[' => parse_array(input),
        b't' | b'f' | b'n' => parse_keyword(input),
        _ => parse_number(input),
    }
}

fn parse_name(input: &[u8]) -> IResult<&[u8], Object> {
    let (rest, _) = tag("/")(input)?;
    let (rest, name) = take_while1(|b: u8| !b" \t\r\n\x0c()<>[]/%".contains(&b))(rest)?;
    Ok((rest, Object::Name(String::from_utf8_lossy(name).into_owned())))
}

fn parse_literal_string(input: &[u8]) -> IResult<&[u8], Object> {
    let mut depth = 0i32;
    let mut bytes = Vec::new();
    let mut i = 0usize;
    let data = input;

    if data.is_empty() || data[0] != b'(' {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Char,
        )));
    }
    depth += 1;
    i += 1;

    while i < data.len() && depth > 0 {
        match data[i] {
            b'\\' if i + 1 < data.len() => {
                let escaped = data[i + 1];
                let mapped = match escaped {
                    b'n' => Some(b'\n'),
                    b'r' => Some(b'\r'),
                    b't' => Some(b'\t'),
                    b'b' => Some(0x08),
                    b'f' => Some(0x0c),
                    b'(' => Some(b'('),
                    b')' => Some(b')'),
                    b'\\' => Some(b'\\'),
                    _ => None,
                };
                if let Some(b) = mapped {
                    bytes.push(b);
                }
                i += 2;
            },
            b'(' => {
                depth += 1;
                bytes.push(b'(');
                i += 1;
            },
            b')' => {
                depth -= 1;
                if depth > 0 {
                    bytes.push(b')');
                }
                i += 1;
            },
            other => {
                bytes.push(other);
                i += 1;
            },
        }
    }

    if depth != 0 {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Eof,
        )));
    }

    Ok((&data[i..], Object::String(bytes)))
}

fn parse_hex_string(input: &[u8]) -> IResult<&[u8], Object> {
    let (rest, _) = tag("<")(input)?;
    let end = rest.iter().position(|&b| b == b'>').ok_or_else(|| {
        nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Eof))
    })?;
    let hex_digits: Vec<u8> = rest[..end].iter().copied().filter(|b| !b.is_ascii_whitespace()).collect();
    let mut bytes = Vec::with_capacity(hex_digits.len().div_ceil(2));
    let mut iter = hex_digits.chunks(2);
    for pair in &mut iter {
        let hi = hex_digit_value(pair[0]);
        let lo = if pair.len() == 2 { hex_digit_value(pair[1]) } else { 0 };
        bytes.push((hi << 4) | lo);
    }
    Ok((&rest[end + 1..], Object::String(bytes)))
}

fn hex_digit_value(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        b'A'..=b'F' => b - b'A' + 10,
        _ => 0,
    }
}

fn parse_array(input: &[u8]) -> IResult<&[u8], Object> {
    let (mut rest, _) = tag("[")(input)?;
    let mut items = Vec::new();
    loop {
        let (r, _) = multispace0(rest)?;
        rest = r;
        if rest.first() == Some(&b']') {
            rest = &rest[1..];
            break;
        }
        if rest.is_empty() {
            return Err(nom::Err::Error(nom::error::Error::new(
                input,
                nom::error::ErrorKind::Eof,
            )));
        }
        let (r, obj) = parse_object(rest)?;
        items.push(obj);
        rest = r;
    }
    Ok((rest, Object::Array(items)))
}

/// Minimal inline-dictionary parser, for `BDC`/`DP` marked-content operands.
/// Values are resolved only as far as this module's object grammar goes;
/// nested streams are never present in an operand position.
fn parse_dictionary(input: &[u8]) -> IResult<&[u8], Object> {
    let (mut rest, _) = tag("<<")(input)?;
    let mut map = HashMap::new();
    loop {
        let (r, _) = multispace0(rest)?;
        rest = r;
        if rest.starts_with(b">>") {
            rest = &rest[2..];
            break;
        }
        if rest.is_empty() {
            return Err(nom::Err::Error(nom::error::Error::new(
                input,
                nom::error::ErrorKind::Eof,
            )));
        }
        let (r, key) = parse_name(rest)?;
        let (r, _) = multispace0(r)?;
        let (r, value) = parse_object(r)?;
        if let Object::Name(k) = key {
            map.insert(k, value);
        }
        rest = r;
    }
    Ok((rest, Object::Dictionary(map)))
}

fn parse_keyword(input: &[u8]) -> IResult<&[u8], Object> {
    if let Ok((rest, _)) = tag::<_, _, nom::error::Error<&[u8]>>("true")(input) {
        return Ok((rest, Object::Boolean(true)));
    }
    if let Ok((rest, _)) = tag::<_, _, nom::error::Error<&[u8]>>("false")(input) {
        return Ok((rest, Object::Boolean(false)));
    }
    if let Ok((rest, _)) = tag::<_, _, nom::error::Error<&[u8]>>("null")(input) {
        return Ok((rest, Object::Null));
    }
    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Tag,
    )))
}

fn parse_number(input: &[u8]) -> IResult<&[u8], Object> {
    let mut rest = input;
    let mut text = String::new();
    if let Some(&sign) = rest.first() {
        if sign == b'+' || sign == b'-' {
            text.push(sign as char);
            rest = &rest[1..];
        }
    }
    let (rest2, int_part) = digit1::<&[u8], nom::error::Error<&[u8]>>(rest).unwrap_or((rest, &[][..]));
    text.push_str(&String::from_utf8_lossy(int_part));
    rest = rest2;

    let mut is_real = false;
    if rest.first() == Some(&b'.') {
        is_real = true;
        text.push('.');
        rest = &rest[1..];
        let (rest3, frac) = digit1::<&[u8], nom::error::Error<&[u8]>>(rest).unwrap_or((rest, &[][..]));
        text.push_str(&String::from_utf8_lossy(frac));
        rest = rest3;
    }

    if text.is_empty() || text == "-" || text == "+" {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Digit,
        )));
    }

    if is_real {
        let value: f64 = text.parse().unwrap_or(0.0);
        Ok((rest, Object::Real(value)))
    } else {
        let value: i64 = text.parse().unwrap_or(0);
        Ok((rest, Object::Integer(value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_show() {
        let ops = parse_content_stream(b"BT /F1 12 Tf 100 700 Td (Hello) Tj ET");
        assert!(ops.iter().any(|op| matches!(op, Operator::BeginText)));
        assert!(ops.iter().any(|op| matches!(op, Operator::Tj { text } if text == b"Hello")));
        assert!(ops.iter().any(|op| matches!(op, Operator::EndText)));
    }

    #[test]
    fn test_parse_td_values() {
        let ops = parse_content_stream(b"100 200 Td");
        assert_eq!(ops, vec![Operator::Td { tx: 100.0, ty: 200.0 }]);
    }

    #[test]
    fn test_parse_tj_array_with_kerning() {
        let ops = parse_content_stream(b"[(A) -600 (B)] TJ");
        match &ops[0] {
            Operator::TJ { array } => {
                assert_eq!(array.len(), 3);
                assert_eq!(array[0], TextElement::String(b"A".to_vec()));
                assert_eq!(array[1], TextElement::Offset(-600.0));
                assert_eq!(array[2], TextElement::String(b"B".to_vec()));
            },
            other => panic!("expected TJ, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_escaped_literal_string() {
        let ops = parse_content_stream(b"(He said \\(hi\\)) Tj");
        assert_eq!(
            ops[0],
            Operator::Tj {
                text: b"He said (hi)".to_vec()
            }
        );
    }

    #[test]
    fn test_parse_hex_string() {
        let ops = parse_content_stream(b"<48656C6C6F> Tj");
        assert_eq!(
            ops[0],
            Operator::Tj {
                text: b"Hello".to_vec()
            }
        );
    }

    #[test]
    fn test_tolerant_of_garbage_byte() {
        let ops = parse_content_stream(b"BT \x01 ET");
        assert_eq!(ops, vec![Operator::BeginText, Operator::EndText]);
    }

    #[test]
    fn test_do_operator() {
        let ops = parse_content_stream(b"/Fm0 Do");
        assert_eq!(
            ops[0],
            Operator::Do {
                name: "Fm0".to_string()
            }
        );
    }

    #[test]
    fn test_negative_and_real_numbers() {
        let ops = parse_content_stream(b"0.001 -12.5 TL");
        // TL is single operand; the extra operand before it is discarded at
        // the next operator boundary, matching the lenient operand policy.
        assert_eq!(ops, vec![Operator::TL { leading: -12.5 }]);
    }

    #[test]
    fn test_inline_image_is_skipped_without_desync() {
        let ops = parse_content_stream(b"BT ET BI /W 1 ID \x00\x01\x02 EI BT ET");
        let begin_count = ops.iter().filter(|op| matches!(op, Operator::BeginText)).count();
        assert_eq!(begin_count, 2);
    }
}
