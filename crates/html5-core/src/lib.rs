#![allow(non_camel_case_types)]

//! A dependency-free WHATWG-conformant HTML5 parser core: a tokenizer and a
//! tree constructor that together turn bytes into a [`dom::Dom`].
//!
//! @see https://html.spec.whatwg.org/#parsing

pub mod attributes;
pub mod compat_mode;
pub mod doctype;
pub mod dom;
pub mod input_stream;
pub mod macros;
pub mod str_fns;
pub mod tag_name;
pub mod token;
pub mod tokenizer;
pub mod tree_builder;

use dom::Dom;
use tree_builder::TreeBuilder;

/// Parser-wide configuration. Plain, `Copy`, builder-style — there is no
/// config-file or environment-variable layer; a host embedding this crate in
/// a CLI or service owns that concern itself.
///
/// @see https://html.spec.whatwg.org/#parsing
#[derive(Clone, Copy, Debug)]
pub struct Options {
    /// Whether parse errors are recorded on the returned [`ParseResult`]
    /// rather than silently discarded. Collecting them costs an allocation
    /// per error; off by default for throughput-sensitive callers.
    pub collect_errors: bool,
    /// Whether `<script>` content is treated as active script for the
    /// purposes of the scripting flag (affects `<noscript>` handling).
    pub scripting_enabled: bool,
    /// Parse as though this document is the contents of an `<iframe srcdoc>`
    /// attribute, which relaxes a handful of quirks-mode-adjacent rules.
    pub iframe_srcdoc: bool,
    /// Stop tree construction at the first parse error instead of recovering
    /// from it. The triggering error is surfaced as
    /// [`ParseResult::fatal_error`]; the returned tree is whatever had been
    /// built up to that point.
    pub strict: bool,
    /// Run the XML-coercion post-pass over the finished tree: element and
    /// attribute names get rewritten to be well-formed XML names (form feed
    /// to space, Unicode noncharacters to U+FFFD).
    ///
    /// @see https://html.spec.whatwg.org/#coercing-an-html-dom-into-an-infoset
    pub xml_coercion: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            collect_errors: false,
            scripting_enabled: true,
            iframe_srcdoc: false,
            strict: false,
            xml_coercion: false,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collect_errors(mut self, value: bool) -> Self {
        self.collect_errors = value;
        self
    }

    pub fn scripting_enabled(mut self, value: bool) -> Self {
        self.scripting_enabled = value;
        self
    }

    pub fn iframe_srcdoc(mut self, value: bool) -> Self {
        self.iframe_srcdoc = value;
        self
    }

    pub fn strict(mut self, value: bool) -> Self {
        self.strict = value;
        self
    }

    pub fn xml_coercion(mut self, value: bool) -> Self {
        self.xml_coercion = value;
        self
    }
}

/// A parsed document plus whatever parse errors were collected along the way
/// (empty unless [`Options::collect_errors`] was set).
pub struct ParseResult {
    pub dom: Dom,
    pub errors: Vec<token::ParseError>,
    /// Set when [`Options::strict`] is on and a parse error was encountered;
    /// tree construction stopped at that point rather than recovering.
    pub fatal_error: Option<token::ParseError>,
}

/// Parses a complete HTML document from already-decoded text. Still runs
/// the CR/CRLF newline normalization step of the input preprocessor, since
/// that applies regardless of how the caller obtained UTF-8 text.
///
/// @see https://html.spec.whatwg.org/#overview-of-the-parsing-model
pub fn parse(text: &str, options: Options) -> ParseResult {
    let normalized = input_stream::normalize_newlines(text);
    parse_preprocessed(normalized.as_bytes(), options)
}

/// Parses a complete HTML document from raw bytes of unknown encoding: runs
/// the encoding-sniffing algorithm (BOM, then a `<meta charset>` prescan,
/// then UTF-8 fallback) before tokenizing.
///
/// @see https://html.spec.whatwg.org/#the-input-byte-stream
pub fn parse_bytes(bytes: &[u8], options: Options) -> ParseResult {
    let decoded = input_stream::decode_input(bytes);
    parse_preprocessed(decoded.as_bytes(), options)
}

fn parse_preprocessed(bytes: &[u8], options: Options) -> ParseResult {
    let mut builder = TreeBuilder::new(options);
    builder.run(bytes);
    let errors = builder.take_errors();
    let fatal_error = builder.take_fatal_error();
    let mut dom = builder.into_dom();
    if options.xml_coercion {
        dom.coerce_names_to_xml();
    }
    ParseResult { dom, errors, fatal_error }
}

/// Parses an HTML fragment in the context of `context_element` (e.g. `"td"`
/// to parse as though inside a table cell), per the fragment parsing
/// algorithm. Returns the fragment's children as a `DocumentFragment` node.
///
/// @see https://html.spec.whatwg.org/#parsing-html-fragments
pub fn parse_fragment(text: &str, context_element: &str, options: Options) -> ParseResult {
    let normalized = input_stream::normalize_newlines(text);
    let mut builder = TreeBuilder::new(options);
    builder.run_fragment(normalized.as_bytes(), context_element);
    let errors = builder.take_errors();
    let fatal_error = builder.take_fatal_error();
    let mut dom = builder.into_dom();
    if options.xml_coercion {
        dom.coerce_names_to_xml();
    }
    ParseResult { dom, errors, fatal_error }
}
