//! Lexer state machine: turns UTF-8 bytes into a stream of [`Token`]s.
//!
//! The reference project models this as a lazy byte-offset cursor
//! (`TagProcessor`) with a handful of high-level `ParserState` variants and a
//! family of `skip_*` scanning helpers rather than one enum variant per named
//! WHATWG state; this module keeps that shape (`TokenizerState` plus scanning
//! functions) but pushes discrete [`Token`]s into a [`TokenSink`] instead of
//! leaving the caller to re-derive them from spans.
//!
//! @see https://html.spec.whatwg.org/#tokenization

use crate::str_fns::stripos;
use crate::tag_name::TagName;
use crate::token::{ParseErrorCode, Token, TokenAttribute};
use entities::{decode, HtmlContext};

/// The tokenizer's "content model flag": which family of states it is
/// lexing in. Programmatically switched by the tree constructor after start
/// tags such as `<script>`, `<title>`, or `<plaintext>`.
///
/// @see https://html.spec.whatwg.org/#tokenization
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum TokenizerState {
    #[default]
    Data,
    RcData,
    RawText,
    ScriptData,
    Plaintext,
}

/// Nesting state for the script-data escape / double-escape states, which
/// exist so that a commented-out `<script>` block inside another `<script>`
/// doesn't prematurely close the outer element.
///
/// @see https://html.spec.whatwg.org/#script-data-escaped-state
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
enum ScriptState {
    #[default]
    Unescaped,
    Escaped,
    DoubleEscaped,
}

/// Receives diagnostics from the tokenizer while it produces a token.
/// Implemented by the tree constructor, which is also the one that reacts to
/// a finished token by switching the tokenizer's state (e.g. RAWTEXT after a
/// `<script>` start tag) — that reaction happens one level up, in the loop
/// that calls [`Tokenizer::next_token`], since it also needs the tree
/// constructor's notion of the current insertion mode.
///
/// @see https://html.spec.whatwg.org/#tree-construction
pub trait TokenSink {
    fn parse_error(&mut self, code: ParseErrorCode, offset: usize);
}

const WHITESPACE: [u8; 5] = [b' ', b'\t', b'\n', 0x0c, b'\r'];

fn is_whitespace(b: u8) -> bool {
    WHITESPACE.contains(&b)
}

pub struct Tokenizer<'i> {
    input: &'i [u8],
    pos: usize,
    state: TokenizerState,
    script_state: ScriptState,
    last_start_tag_name: Option<TagName>,
}

impl<'i> Tokenizer<'i> {
    pub fn new(input: &'i [u8]) -> Self {
        Self {
            input,
            pos: 0,
            state: TokenizerState::Data,
            script_state: ScriptState::Unescaped,
            last_start_tag_name: None,
        }
    }

    pub fn set_state(&mut self, state: TokenizerState) {
        self.state = state;
        self.script_state = ScriptState::Unescaped;
    }

    pub fn state(&self) -> TokenizerState {
        self.state
    }

    pub fn set_last_start_tag_name(&mut self, name: TagName) {
        self.last_start_tag_name = Some(name);
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Drives one token out of the tokenizer, dispatching to the scanning
    /// routine appropriate for the current content-model flag.
    pub fn next_token(&mut self, sink: &mut dyn TokenSink) -> Token {
        if self.at_eof() {
            return Token::Eof;
        }

        match self.state {
            TokenizerState::Data => self.lex_data(sink),
            TokenizerState::RcData => self.lex_escapable_raw_text(sink, true),
            TokenizerState::RawText => self.lex_escapable_raw_text(sink, false),
            TokenizerState::ScriptData => self.lex_script_data(sink),
            TokenizerState::Plaintext => self.lex_plaintext(),
        }
    }

    fn lex_plaintext(&mut self) -> Token {
        let text = &self.input[self.pos..];
        self.pos = self.input.len();
        Token::Character(String::from_utf8_lossy(text).into_owned())
    }

    /// The Data state: text interspersed with tags, comments, and doctypes,
    /// with character references expanded inline.
    ///
    /// @see https://html.spec.whatwg.org/#data-state
    fn lex_data(&mut self, sink: &mut dyn TokenSink) -> Token {
        if self.input[self.pos] != b'<' {
            let rest = &self.input[self.pos..];
            let text_len = memchr::memchr(b'<', rest).unwrap_or(rest.len());
            let raw = &rest[..text_len];
            self.emit_nul_errors(raw, sink);
            self.pos += text_len;
            let decoded = decode(&HtmlContext::BodyText, raw);
            return Token::Character(String::from_utf8_lossy(&decoded).into_owned());
        }

        self.lex_tag_open(sink)
    }

    fn emit_nul_errors(&self, raw: &[u8], sink: &mut dyn TokenSink) {
        if memchr::memchr(0, raw).is_some() {
            sink.parse_error(ParseErrorCode::UnexpectedNullCharacter, self.pos);
        }
    }

    /// Dispatch from `<`: start tag, end tag, markup declaration, or a bogus
    /// `<?...>` processing-instruction-lookalike.
    ///
    /// @see https://html.spec.whatwg.org/#tag-open-state
    fn lex_tag_open(&mut self, sink: &mut dyn TokenSink) -> Token {
        let after_lt = self.pos + 1;
        match self.input.get(after_lt) {
            Some(b) if b.is_ascii_alphabetic() => self.parse_tag(after_lt, false, sink),
            Some(b'/') => self.lex_end_tag_open(sink),
            Some(b'!') => self.lex_markup_declaration_open(sink),
            Some(b'?') => {
                sink.parse_error(ParseErrorCode::UnexpectedQuestionMarkInsteadOfTagName, self.pos);
                self.lex_bogus_comment(after_lt)
            }
            _ => {
                // Not a recognized construct; `<` is literal text.
                self.pos += 1;
                Token::Character("<".to_string())
            }
        }
    }

    fn lex_end_tag_open(&mut self, sink: &mut dyn TokenSink) -> Token {
        let start = self.pos + 2;
        match self.input.get(start) {
            Some(b) if b.is_ascii_alphabetic() => self.parse_tag(start, true, sink),
            Some(b'>') => {
                sink.parse_error(ParseErrorCode::MissingEndTagName, self.pos);
                self.pos = start + 1;
                self.next_token(sink)
            }
            _ => {
                sink.parse_error(ParseErrorCode::InvalidFirstCharacterOfTagName, self.pos);
                self.lex_bogus_comment(start)
            }
        }
    }

    /// Parses a start or end tag's name and attribute list.
    ///
    /// @see https://html.spec.whatwg.org/#tag-name-state
    /// @see https://html.spec.whatwg.org/#attribute-name-state
    fn parse_tag(&mut self, name_start: usize, is_closing: bool, sink: &mut dyn TokenSink) -> Token {
        let tag_start = self.pos;
        let name_len = strcspn!(self.input, b' ' | b'\t' | b'\n' | 0x0c | b'\r' | b'/' | b'>', name_start);
        let name = TagName::from_lowercased_bytes(&self.input[name_start..name_start + name_len]);
        let mut at = name_start + name_len;

        let mut attrs: Vec<TokenAttribute> = Vec::new();
        let mut self_closing = false;

        loop {
            at += strspn!(self.input, b' ' | b'\t' | b'\n' | 0x0c | b'\r', at);

            match self.input.get(at) {
                None => {
                    sink.parse_error(ParseErrorCode::EofInTag, at);
                    self.pos = self.input.len();
                    break;
                }
                Some(b'>') => {
                    at += 1;
                    break;
                }
                Some(b'/') => {
                    if self.input.get(at + 1) == Some(&b'>') {
                        self_closing = true;
                        at += 2;
                        break;
                    }
                    at += 1;
                }
                Some(b'=') => {
                    // A stray `=` before any attribute name.
                    sink.parse_error(ParseErrorCode::UnexpectedEqualsSignBeforeAttributeName, at);
                    at += 1;
                }
                _ => {
                    let (attr, next) = self.parse_attribute(at, sink);
                    at = next;
                    if !attrs.iter().any(|a: &TokenAttribute| a.name == attr.name) {
                        attrs.push(attr);
                    } else {
                        sink.parse_error(ParseErrorCode::DuplicateAttribute, at);
                    }
                }
            }
        }

        self.pos = at;

        if self_closing && !is_closing {
            // Flagging this is informative only; whether it is meaningful
            // depends on whether `name` turns out to be a void/foreign
            // element, which the tree constructor resolves.
        }

        if is_closing {
            if self_closing || !attrs.is_empty() {
                // End tags aren't supposed to carry attributes or a
                // self-closing flag; recovery still emits the bare end tag.
            }
            Token::EndTag { name }
        } else {
            let _ = tag_start;
            Token::StartTag {
                name,
                attrs,
                self_closing,
            }
        }
    }

    /// Parses one `name` or `name="value"` pair starting at `at`.
    ///
    /// @see https://html.spec.whatwg.org/#before-attribute-value-state
    fn parse_attribute(&mut self, at: usize, sink: &mut dyn TokenSink) -> (TokenAttribute, usize) {
        let name_len = strcspn!(
            self.input,
            b' ' | b'\t' | b'\n' | 0x0c | b'\r' | b'=' | b'/' | b'>',
            at
        );
        let name_len = name_len.max(1);
        let raw_name = &self.input[at..at + name_len];
        if memchr::memchr2(b'"', b'\'', raw_name).is_some() || memchr::memchr(b'<', raw_name).is_some() {
            sink.parse_error(ParseErrorCode::UnexpectedCharacterInAttributeName, at);
        }
        let name = String::from_utf8_lossy(raw_name).to_ascii_lowercase().into_boxed_str();
        let mut cursor = at + name_len;

        cursor += strspn!(self.input, b' ' | b'\t' | b'\n' | 0x0c | b'\r', cursor);

        if self.input.get(cursor) != Some(&b'=') {
            return (
                TokenAttribute {
                    name,
                    value: Box::from(""),
                },
                cursor,
            );
        }
        cursor += 1;
        cursor += strspn!(self.input, b' ' | b'\t' | b'\n' | 0x0c | b'\r', cursor);

        let (raw_value, next) = match self.input.get(cursor) {
            Some(&quote @ (b'"' | b'\'')) => {
                let value_start = cursor + 1;
                let len = memchr::memchr(quote, &self.input[value_start..]).unwrap_or_else(|| {
                    sink.parse_error(ParseErrorCode::EofInTag, self.input.len());
                    self.input.len() - value_start
                });
                (
                    &self.input[value_start..value_start + len],
                    value_start + len + 1,
                )
            }
            _ => {
                let len = strcspn!(self.input, b' ' | b'\t' | b'\n' | 0x0c | b'\r' | b'>', cursor);
                let raw = &self.input[cursor..cursor + len];
                if memchr::memchr3(b'"', b'\'', b'<', raw).is_some() {
                    sink.parse_error(ParseErrorCode::UnexpectedCharacterInUnquotedAttributeValue, cursor);
                }
                (raw, cursor + len)
            }
        };

        let decoded = decode(&HtmlContext::Attribute, raw_value);
        (
            TokenAttribute {
                name,
                value: String::from_utf8_lossy(&decoded).into_owned().into_boxed_str(),
            },
            next,
        )
    }

    /// Dispatches `<!`: comments, DOCTYPE, and CDATA sections.
    ///
    /// @see https://html.spec.whatwg.org/#markup-declaration-open-state
    fn lex_markup_declaration_open(&mut self, sink: &mut dyn TokenSink) -> Token {
        let at = self.pos + 2;
        let rest = &self.input[at..];

        if rest.starts_with(b"--") {
            return self.lex_comment(at + 2, sink);
        }
        if rest.len() >= 7 && rest[..7].eq_ignore_ascii_case(b"DOCTYPE") {
            return self.lex_doctype(at, sink);
        }
        if rest.starts_with(b"[CDATA[") {
            return self.lex_cdata(at + 7, sink);
        }

        sink.parse_error(ParseErrorCode::InvalidFirstCharacterOfTagName, self.pos);
        self.lex_bogus_comment(at)
    }

    /// Comment content runs until the first `-->`; an unterminated comment
    /// consumes to EOF.
    ///
    /// @see https://html.spec.whatwg.org/#comment-state
    fn lex_comment(&mut self, content_start: usize, sink: &mut dyn TokenSink) -> Token {
        let haystack = &self.input[content_start..];
        match find_subslice(haystack, b"-->") {
            Some(end) => {
                let content = &haystack[..end];
                self.pos = content_start + end + 3;
                if content.is_empty() {
                    sink.parse_error(ParseErrorCode::AbruptClosingOfEmptyComment, self.pos);
                }
                Token::Comment(decode_comment_text(content))
            }
            None => {
                sink.parse_error(ParseErrorCode::EofInComment, self.input.len());
                self.pos = self.input.len();
                Token::Comment(decode_comment_text(haystack))
            }
        }
    }

    fn lex_bogus_comment(&mut self, content_start: usize) -> Token {
        let haystack = &self.input[content_start..];
        let len = memchr::memchr(b'>', haystack).unwrap_or(haystack.len());
        self.pos = (content_start + len + 1).min(self.input.len());
        Token::Comment(decode_comment_text(&haystack[..len]))
    }

    /// Only valid in foreign content; delegates the whole raw token text to
    /// [`crate::doctype`] per its existing contract.
    ///
    /// @see https://html.spec.whatwg.org/#doctype-state
    fn lex_doctype(&mut self, at: usize, sink: &mut dyn TokenSink) -> Token {
        let doctype_start = self.pos;
        let rest = &self.input[at..];
        match memchr::memchr(b'>', rest) {
            Some(end) => {
                self.pos = at + end + 1;
                let raw = &self.input[doctype_start..self.pos];
                match crate::doctype::HtmlDoctypeInfo::from_doctype_token(raw) {
                    Some(info) => Token::Doctype {
                        name: info.name.map(|n| String::from_utf8_lossy(&n).into_owned().into_boxed_str()),
                        public_id: info
                            .public_identifier
                            .map(|n| String::from_utf8_lossy(&n).into_owned().into_boxed_str()),
                        system_id: info
                            .system_identifier
                            .map(|n| String::from_utf8_lossy(&n).into_owned().into_boxed_str()),
                        compat_mode: info.indicated_compatability_mode,
                    },
                    None => {
                        sink.parse_error(ParseErrorCode::MissingDoctypeName, doctype_start);
                        Token::Doctype {
                            name: None,
                            public_id: None,
                            system_id: None,
                            compat_mode: crate::compat_mode::CompatMode::Quirks,
                        }
                    }
                }
            }
            None => {
                sink.parse_error(ParseErrorCode::EofInDoctype, self.input.len());
                self.pos = self.input.len();
                Token::Doctype {
                    name: None,
                    public_id: None,
                    system_id: None,
                    compat_mode: crate::compat_mode::CompatMode::Quirks,
                }
            }
        }
    }

    /// CDATA sections are only meaningful in foreign content; the tree
    /// constructor is responsible for calling this only when the adjusted
    /// current node is non-HTML. Content is emitted as plain character data.
    ///
    /// @see https://html.spec.whatwg.org/#cdata-section-state
    fn lex_cdata(&mut self, content_start: usize, sink: &mut dyn TokenSink) -> Token {
        let haystack = &self.input[content_start..];
        let (content, next) = match find_subslice(haystack, b"]]>") {
            Some(end) => (&haystack[..end], content_start + end + 3),
            None => {
                sink.parse_error(ParseErrorCode::EofInComment, self.input.len());
                (haystack, self.input.len())
            }
        };
        self.pos = next;
        Token::Character(String::from_utf8_lossy(content).into_owned())
    }

    /// RCDATA (entities decoded) and RAWTEXT (entities not decoded) share
    /// the same "appropriate end tag" closing rule.
    ///
    /// @see https://html.spec.whatwg.org/#rcdata-state
    /// @see https://html.spec.whatwg.org/#rawtext-state
    fn lex_escapable_raw_text(&mut self, sink: &mut dyn TokenSink, decode_refs: bool) -> Token {
        let rest = &self.input[self.pos..];
        match self.find_appropriate_end_tag(rest) {
            Some(0) => {
                self.state = TokenizerState::Data;
                self.lex_end_tag_open(sink)
            }
            Some(text_len) => {
                let raw = &rest[..text_len];
                self.emit_nul_errors(raw, sink);
                self.pos += text_len;
                Token::Character(self.decode_text(raw, decode_refs))
            }
            None => {
                self.emit_nul_errors(rest, sink);
                self.pos = self.input.len();
                Token::Character(self.decode_text(rest, decode_refs))
            }
        }
    }

    fn decode_text(&self, raw: &[u8], decode_refs: bool) -> String {
        if decode_refs {
            String::from_utf8_lossy(&decode(&HtmlContext::BodyText, raw)).into_owned()
        } else {
            String::from_utf8_lossy(raw).into_owned()
        }
    }

    /// Scans `text` for the next `</` + last-start-tag-name, case
    /// insensitively, followed by a tag-terminating character. Returns the
    /// byte offset of the match (0 if `text` itself starts with it), or
    /// `None` if there's no match before EOF.
    ///
    /// @see https://html.spec.whatwg.org/#appropriate-end-tag-token
    fn find_appropriate_end_tag(&self, text: &[u8]) -> Option<usize> {
        let tag_name = self.last_start_tag_name.as_ref()?;
        let needle_len = tag_name.as_str().len();
        let mut search_from = 0;
        loop {
            let rel = memchr::memchr(b'<', &text[search_from..])?;
            let at = search_from + rel;
            if text.get(at + 1) != Some(&b'/') {
                search_from = at + 1;
                continue;
            }
            let name_start = at + 2;
            if text.len() < name_start + needle_len {
                return None;
            }
            let candidate = &text[name_start..name_start + needle_len];
            let terminator = text.get(name_start + needle_len).copied();
            let terminates = matches!(terminator, Some(b' ' | b'\t' | b'\n' | 0x0c | b'\r' | b'/' | b'>') | None);
            if candidate.eq_ignore_ascii_case(tag_name.as_str().as_bytes()) && terminates && terminator.is_some() {
                return Some(at);
            }
            search_from = at + 1;
        }
    }

    /// `<script>` content: normal text, except `<!--` begins an "escaped"
    /// run in which `</script` does not close the element (until a nested
    /// `<script` switches to "double escaped" and a matching `</script`
    /// switches back).
    ///
    /// @see https://html.spec.whatwg.org/#script-data-escaped-state
    fn lex_script_data(&mut self, sink: &mut dyn TokenSink) -> Token {
        let start = self.pos;
        let mut at = self.pos;

        loop {
            if at >= self.input.len() {
                self.pos = at;
                break;
            }

            let rest = &self.input[at..];

            match self.script_state {
                ScriptState::Unescaped => {
                    if rest.starts_with(b"<!--") {
                        self.script_state = ScriptState::Escaped;
                        at += 4;
                        continue;
                    }
                    if at > start && self.is_end_script_tag_at(rest) {
                        self.pos = at;
                        break;
                    }
                    match memchr::memchr(b'<', rest) {
                        Some(0) if self.is_end_script_tag_at(rest) => {
                            self.pos = at;
                            break;
                        }
                        Some(rel) => at += rel.max(1),
                        None => {
                            self.pos = self.input.len();
                            break;
                        }
                    }
                }
                ScriptState::Escaped => {
                    if rest.starts_with(b"-->") {
                        self.script_state = ScriptState::Unescaped;
                        at += 3;
                        continue;
                    }
                    if stripos(rest, b"<script", 0) == Some(0) {
                        self.script_state = ScriptState::DoubleEscaped;
                        at += 7;
                        continue;
                    }
                    if self.is_end_script_tag_at(rest) {
                        // `</script>` inside an escaped comment-like run
                        // still closes the element per the reference
                        // behavior of treating unmatched escape state as
                        // terminating at EOF-of-element boundaries.
                        self.pos = at;
                        self.script_state = ScriptState::Unescaped;
                        break;
                    }
                    at += 1;
                }
                ScriptState::DoubleEscaped => {
                    if stripos(rest, b"</script", 0) == Some(0) {
                        self.script_state = ScriptState::Escaped;
                        at += 8;
                        continue;
                    }
                    at += 1;
                }
            }
        }

        if self.pos == start {
            // `is_end_script_tag_at` fired on the very first byte.
            self.state = TokenizerState::Data;
            return self.lex_end_tag_open(sink);
        }

        let raw = &self.input[start..self.pos];
        self.emit_nul_errors(raw, sink);
        Token::Character(String::from_utf8_lossy(raw).into_owned())
    }

    fn is_end_script_tag_at(&self, text: &[u8]) -> bool {
        let Some(tag_name) = &self.last_start_tag_name else {
            return false;
        };
        if text.get(0) != Some(&b'<') || text.get(1) != Some(&b'/') {
            return false;
        }
        let needle_len = tag_name.as_str().len();
        if text.len() < 2 + needle_len {
            return false;
        }
        let candidate = &text[2..2 + needle_len];
        let terminator = text.get(2 + needle_len).copied();
        candidate.eq_ignore_ascii_case(tag_name.as_str().as_bytes())
            && matches!(terminator, Some(b' ' | b'\t' | b'\n' | 0x0c | b'\r' | b'/' | b'>'))
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn decode_comment_text(raw: &[u8]) -> Box<str> {
    let mut cleaned = Vec::with_capacity(raw.len());
    for &b in raw {
        cleaned.push(if b == 0 { 0xFFu8 } else { b });
    }
    String::from_utf8_lossy(&cleaned).into_owned().into_boxed_str()
}

use crate::{strcspn, strspn};

#[cfg(test)]
mod tests {
    use super::*;

    struct Collector {
        tokens: Vec<Token>,
    }
    impl TokenSink for Collector {
        fn parse_error(&mut self, _code: ParseErrorCode, _offset: usize) {}
    }

    fn tokenize(html: &[u8]) -> Vec<Token> {
        let mut tokenizer = Tokenizer::new(html);
        let mut sink = Collector { tokens: Vec::new() };
        loop {
            let token = tokenizer.next_token(&mut sink);
            let is_eof = matches!(token, Token::Eof);
            sink.tokens.push(token);
            if is_eof {
                break;
            }
        }
        sink.tokens
    }

    #[test]
    fn simple_start_and_end_tag() {
        let tokens = tokenize(b"<p>hi</p>");
        assert!(matches!(&tokens[0], Token::StartTag { name, .. } if name.is("p")));
        assert!(matches!(&tokens[1], Token::Character(s) if s == "hi"));
        assert!(matches!(&tokens[2], Token::EndTag { name } if name.is("p")));
    }

    #[test]
    fn attribute_with_entity() {
        let tokens = tokenize(br#"<a href="x&amp;y">"#);
        match &tokens[0] {
            Token::StartTag { attrs, .. } => {
                assert_eq!(attrs[0].name.as_ref(), "href");
                assert_eq!(attrs[0].value.as_ref(), "x&y");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn comment_token() {
        let tokens = tokenize(b"<!-- hi -->");
        assert!(matches!(&tokens[0], Token::Comment(c) if c.as_ref() == " hi "));
    }

    #[test]
    fn duplicate_attribute_keeps_first() {
        let tokens = tokenize(br#"<p a="1" a="2">"#);
        match &tokens[0] {
            Token::StartTag { attrs, .. } => {
                assert_eq!(attrs.len(), 1);
                assert_eq!(attrs[0].value.as_ref(), "1");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    /// Robustness property: the tokenizer never panics on arbitrary bytes.
    #[quickcheck_macros::quickcheck]
    fn never_panics_on_arbitrary_bytes(bytes: Vec<u8>) -> bool {
        let bytes: Vec<u8> = bytes.into_iter().take(10_000).collect();
        tokenize(&bytes);
        true
    }
}
