//! Foreign content: SVG/MathML tag-name case fixups and HTML/MathML/SVG
//! integration points.
//!
//! @see https://html.spec.whatwg.org/#parsing-tokens-in-foreign-content

use crate::dom::{ElementData, Namespace};

/// Case fixups applied to SVG tag names after the tokenizer has lowercased
/// them, so that e.g. `<foreignobject>` becomes `foreignObject` the way a
/// script querying `tagName` would expect.
///
/// @see https://html.spec.whatwg.org/#adjust-svg-tag-names
pub fn adjust_svg_tag_name(lowercased: &str) -> &str {
    match lowercased {
        "altglyph" => "altGlyph",
        "altglyphdef" => "altGlyphDef",
        "altglyphitem" => "altGlyphItem",
        "animatecolor" => "animateColor",
        "animatemotion" => "animateMotion",
        "animatetransform" => "animateTransform",
        "clippath" => "clipPath",
        "feblend" => "feBlend",
        "fecolormatrix" => "feColorMatrix",
        "fecomponenttransfer" => "feComponentTransfer",
        "fecomposite" => "feComposite",
        "feconvolvematrix" => "feConvolveMatrix",
        "fediffuselighting" => "feDiffuseLighting",
        "fedisplacementmap" => "feDisplacementMap",
        "fedistantlight" => "feDistantLight",
        "fedropshadow" => "feDropShadow",
        "feflood" => "feFlood",
        "fefunca" => "feFuncA",
        "fefuncb" => "feFuncB",
        "fefuncg" => "feFuncG",
        "fefuncr" => "feFuncR",
        "fegaussianblur" => "feGaussianBlur",
        "feimage" => "feImage",
        "femerge" => "feMerge",
        "femergenode" => "feMergeNode",
        "femorphology" => "feMorphology",
        "feoffset" => "feOffset",
        "fepointlight" => "fePointLight",
        "fespecularlighting" => "feSpecularLighting",
        "fespotlight" => "feSpotLight",
        "fetile" => "feTile",
        "feturbulence" => "feTurbulence",
        "foreignobject" => "foreignObject",
        "glyphref" => "glyphRef",
        "lineargradient" => "linearGradient",
        "radialgradient" => "radialGradient",
        "textpath" => "textPath",
        other => other,
    }
}

/// SVG/MathML elements that "break out" of foreign content back into HTML
/// insertion modes when encountered as a start tag, per the big table in the
/// "any other start tag" foreign-content clause.
///
/// @see https://html.spec.whatwg.org/#parsing-main-inforeign
pub const BREAKOUT_START_TAGS: &[&str] = &[
    "b", "big", "blockquote", "body", "br", "center", "code", "dd", "div", "dl", "dt", "em",
    "embed", "h1", "h2", "h3", "h4", "h5", "h6", "head", "hr", "i", "img", "li", "listing",
    "menu", "meta", "nobr", "ol", "p", "pre", "ruby", "s", "small", "span", "strong", "strike",
    "sub", "sup", "table", "tt", "u", "ul", "var",
];

/// Whether `element` is an HTML/MathML/SVG integration point, i.e. a place
/// where foreign-content tokens are briefly treated as HTML again.
///
/// @see https://html.spec.whatwg.org/#html-integration-point
/// @see https://html.spec.whatwg.org/#mathml-text-integration-point
pub fn is_integration_point(element: &ElementData) -> bool {
    match element.namespace {
        Namespace::MathMl => element.name.is_one_of(&["mi", "mo", "mn", "ms", "mtext"]) || {
            element.name.is("annotation-xml")
                && element
                    .attribute("encoding")
                    .map(|v| {
                        let v = v.to_ascii_lowercase();
                        v == "text/html" || v == "application/xhtml+xml"
                    })
                    .unwrap_or(false)
        },
        Namespace::Svg => element.name.is_one_of(&["foreignObject", "desc", "title"]),
        Namespace::Html => false,
    }
}
