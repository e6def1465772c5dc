use std::fmt;
use std::rc::Rc;

/// The local name of an element or a non-element token ("html", "div", "svg",
/// "annotation-xml", ...).
///
/// HTML-namespace names are always stored lowercased; foreign-content names
/// (SVG, MathML) retain their original case, per the fixup table in
/// [`crate::attributes`] and the tag-name case table used when switching into
/// foreign content.
///
/// @see https://html.spec.whatwg.org/#tag-name-state
#[derive(Clone, Eq)]
pub struct TagName(Rc<str>);

impl TagName {
    pub fn new(name: &str) -> Self {
        Self(Rc::from(name))
    }

    pub fn from_lowercased_bytes(bytes: &[u8]) -> Self {
        Self(Rc::from(String::from_utf8_lossy(bytes).to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is(&self, other: &str) -> bool {
        self.0.as_ref() == other
    }

    pub fn is_one_of(&self, others: &[&str]) -> bool {
        others.iter().any(|o| self.is(o))
    }
}

impl PartialEq for TagName {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl std::hash::Hash for TagName {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl PartialEq<str> for TagName {
    fn eq(&self, other: &str) -> bool {
        self.0.as_ref() == other
    }
}

impl PartialEq<&str> for TagName {
    fn eq(&self, other: &&str) -> bool {
        self.0.as_ref() == *other
    }
}

impl fmt::Debug for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tags whose content model makes them void elements: they never have children
/// and never receive a matching end tag.
///
/// @see https://html.spec.whatwg.org/#void-elements
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta",
    "param", "source", "track", "wbr",
];

pub fn is_void(name: &TagName) -> bool {
    name.is_one_of(VOID_ELEMENTS)
}

/// Elements special for the purposes of scope predicates and implicit closing.
///
/// @see https://html.spec.whatwg.org/#special
pub const SPECIAL_HTML_ELEMENTS: &[&str] = &[
    "address", "applet", "area", "article", "aside", "base", "basefont",
    "bgsound", "blockquote", "body", "br", "button", "caption", "center",
    "col", "colgroup", "dd", "details", "dir", "div", "dl", "dt", "embed",
    "fieldset", "figcaption", "figure", "footer", "form", "frame", "frameset",
    "h1", "h2", "h3", "h4", "h5", "h6", "head", "header", "hgroup", "hr",
    "html", "iframe", "img", "input", "keygen", "li", "link", "listing",
    "main", "marquee", "menu", "meta", "nav", "noembed", "noframes",
    "noscript", "object", "ol", "p", "param", "plaintext", "pre", "script",
    "section", "select", "source", "style", "summary", "table", "tbody",
    "td", "template", "textarea", "tfoot", "th", "thead", "title", "tr",
    "track", "ul", "wbr", "xmp",
];

pub fn is_special(name: &TagName) -> bool {
    name.is_one_of(SPECIAL_HTML_ELEMENTS)
}

/// Formatting elements participating in the active formatting elements list
/// and the adoption agency algorithm.
///
/// @see https://html.spec.whatwg.org/#formatting
pub const FORMATTING_ELEMENTS: &[&str] = &[
    "a", "b", "big", "code", "em", "font", "i", "nobr", "s", "small",
    "strike", "strong", "tt", "u",
];

pub fn is_formatting(name: &TagName) -> bool {
    name.is_one_of(FORMATTING_ELEMENTS)
}
