//! Input preprocessing: encoding sniffing and the CR/CRLF → LF newline
//! normalization the tokenizer assumes has already happened.
//!
//! @see https://html.spec.whatwg.org/#the-input-byte-stream
//! @see https://html.spec.whatwg.org/#preprocessing-the-input-stream

use encoding_rs::{Encoding, UTF_8};

/// How far into the document the `<meta charset>` prescan looks, per the
/// encoding-sniffing algorithm's bounded lookahead.
const PRESCAN_WINDOW: usize = 1024;

/// Sniffs an encoding from a BOM or a `<meta charset>` declaration, decodes
/// `bytes` with it, and normalizes newlines. Falls back to UTF-8 when
/// nothing is found or the declared label isn't recognized.
pub fn decode_input(bytes: &[u8]) -> String {
    let encoding = sniff_encoding(bytes);
    let (decoded, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        log::debug!("encoding sniffing: {} decode had malformed sequences", encoding.name());
    }
    normalize_newlines(&decoded)
}

fn sniff_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _bom_len)) = Encoding::for_bom(bytes) {
        return encoding;
    }
    match prescan_meta_charset(bytes) {
        Some(encoding) => encoding,
        None => UTF_8,
    }
}

/// A reduced form of the "prescan a byte stream to determine its encoding"
/// algorithm: scans for a `<meta ...charset=...>` tag in the prescan
/// window and resolves the declared label through `Encoding::for_label`.
///
/// @see https://html.spec.whatwg.org/#prescan-a-byte-stream-to-determine-its-encoding
fn prescan_meta_charset(bytes: &[u8]) -> Option<&'static Encoding> {
    let window = &bytes[..bytes.len().min(PRESCAN_WINDOW)];
    let mut pos = 0;
    while let Some(tag_start) = find_ci(&window[pos..], b"<meta") {
        let tag_start = pos + tag_start;
        let Some(tag_end) = find_ci(&window[tag_start..], b">") else {
            break;
        };
        let tag_end = tag_start + tag_end;
        if let Some(label) = extract_charset_label(&window[tag_start..tag_end]) {
            if let Some(encoding) = Encoding::for_label(label.as_bytes()) {
                return Some(encoding.output_encoding());
            }
        }
        pos = tag_end + 1;
    }
    None
}

fn extract_charset_label(tag: &[u8]) -> Option<String> {
    let tag_str = String::from_utf8_lossy(tag);
    let lower = tag_str.to_ascii_lowercase();
    let idx = lower.find("charset=")? + "charset=".len();
    let rest = tag_str[idx..].trim_start_matches(['"', '\'']);
    let end = rest
        .find(|c: char| matches!(c, '"' | '\'' | ' ' | '\t' | '\n' | '>' | ';'))
        .unwrap_or(rest.len());
    let label = rest[..end].trim();
    (!label.is_empty()).then(|| label.to_string())
}

fn find_ci(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle))
}

/// CR LF and bare CR are normalized to a single LF before any other
/// preprocessing step sees the text.
///
/// @see https://html.spec.whatwg.org/#preprocessing-the-input-stream
pub fn normalize_newlines(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_crlf_and_bare_cr() {
        assert_eq!(normalize_newlines("a\r\nb\rc\nd"), "a\nb\nc\nd");
    }

    #[test]
    fn leaves_lf_only_text_untouched() {
        assert_eq!(normalize_newlines("a\nb\nc"), "a\nb\nc");
    }

    #[test]
    fn sniffs_utf8_bom() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"<p>hi</p>");
        assert_eq!(decode_input(&bytes), "<p>hi</p>");
    }

    #[test]
    fn sniffs_meta_charset_windows_1252() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"<meta charset=\"windows-1252\">");
        bytes.push(0x93); // left curly quote in windows-1252
        bytes.extend_from_slice(b"hi");
        bytes.push(0x94);
        let decoded = decode_input(&bytes);
        assert!(decoded.contains('\u{201C}'));
        assert!(decoded.contains('\u{201D}'));
    }

    #[test]
    fn falls_back_to_utf8_without_hints() {
        let bytes = "<p>caf\u{e9}</p>".as_bytes();
        assert_eq!(decode_input(bytes), "<p>caf\u{e9}</p>");
    }
}
