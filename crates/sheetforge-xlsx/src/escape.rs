//! XML escaping for SpreadsheetML text content.
//!
//! On top of the five XML entities, SpreadsheetML cannot carry most
//! control characters literally. They are transported as `_xHHHH_`
//! sequences, and a literal `_xHHHH_` in user data is protected by
//! escaping its leading underscore as `_x005F_`.

/// Returns true for a control character that must be `_xHHHH_`-encoded.
///
/// Tab (0x09), LF (0x0A) and CR (0x0D) are valid in XML and pass through.
fn needs_control_escape(c: char) -> bool {
    matches!(c, '\u{00}'..='\u{08}' | '\u{0B}' | '\u{0C}' | '\u{0E}'..='\u{1F}')
}

/// True when `s[idx..]` starts with a `_xHHHH_` sequence.
fn is_escape_sequence_at(bytes: &[u8], idx: usize) -> bool {
    if idx + 7 > bytes.len() {
        return false;
    }
    bytes[idx] == b'_'
        && bytes[idx + 1] == b'x'
        && bytes[idx + 2..idx + 6]
            .iter()
            .all(|b| b.is_ascii_hexdigit())
        && bytes[idx + 6] == b'_'
}

/// Escapes a string for inclusion in XML text content.
pub fn escape(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len());
    let mut byte_idx = 0;
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '_' if is_escape_sequence_at(bytes, byte_idx) => {
                // A literal "_xHHHH_" would be mistaken for an escape
                // sequence on read, so its underscore is itself escaped.
                out.push_str("_x005F_");
            }
            c if needs_control_escape(c) => {
                out.push_str(&format!("_x{:04X}_", c as u32));
            }
            c => out.push(c),
        }
        byte_idx += c.len_utf8();
    }
    out
}

/// Inverts [`escape`].
pub fn unescape(s: &str) -> String {
    decode_control_sequences(&decode_entities(s))
}

fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        let (entity, len) = if rest.starts_with("&amp;") {
            ('&', 5)
        } else if rest.starts_with("&lt;") {
            ('<', 4)
        } else if rest.starts_with("&gt;") {
            ('>', 4)
        } else if rest.starts_with("&quot;") {
            ('"', 6)
        } else if rest.starts_with("&apos;") {
            ('\'', 6)
        } else {
            ('&', 1)
        };
        out.push(entity);
        rest = &rest[len..];
    }
    out.push_str(rest);
    out
}

/// Decodes `_xHHHH_` sequences without touching XML entities. Used when
/// the XML parser has already unescaped entities in text content.
pub fn decode_control_sequences(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'_' && is_escape_sequence_at(bytes, i) {
            let hex = &s[i + 2..i + 6];
            // "_x005F_xHHHH_" is a protected literal "_xHHHH_".
            if hex.eq_ignore_ascii_case("005F") && is_escape_sequence_at(bytes, i + 6) {
                out.push('_');
                i += 7;
                continue;
            }
            if let Ok(code) = u32::from_str_radix(hex, 16) {
                if let Some(c) = char::from_u32(code) {
                    out.push(c);
                    i += 7;
                    continue;
                }
            }
        }
        let c = s[i..].chars().next().unwrap_or('\u{FFFD}');
        out.push(c);
        i += c.len_utf8();
    }
    out
}

/// Escapes a string for use in an XML attribute value.
pub fn escape_attr(s: &str) -> String {
    escape(s)
}
