use crate::compat_mode::CompatMode;
use crate::tag_name::TagName;
use std::fmt;

#[derive(Clone, Debug)]
pub struct TokenAttribute {
    pub name: Box<str>,
    pub value: Box<str>,
}

/// Structural tokens emitted by the tokenizer into a [`crate::tokenizer::TokenSink`].
///
/// @see https://html.spec.whatwg.org/#tokenization
#[derive(Clone, Debug)]
pub enum Token {
    StartTag {
        name: TagName,
        attrs: Vec<TokenAttribute>,
        self_closing: bool,
    },
    EndTag {
        name: TagName,
    },
    Character(String),
    Comment(Box<str>),
    Doctype {
        name: Option<Box<str>>,
        public_id: Option<Box<str>>,
        system_id: Option<Box<str>>,
        compat_mode: CompatMode,
    },
    Eof,
}

/// Stable identifiers for the fixed WHATWG parse-error catalog.
///
/// @see https://html.spec.whatwg.org/#parse-errors
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ParseErrorCode {
    EofInTag,
    EofInComment,
    EofInDoctype,
    EofInScriptHtmlCommentLikeText,
    MissingEndTagName,
    MissingDoctypeName,
    MissingDoctypePublicIdentifier,
    MissingDoctypeSystemIdentifier,
    MissingWhitespaceAfterDoctypePublicKeyword,
    MissingWhitespaceAfterDoctypeSystemKeyword,
    MissingQuoteBeforeDoctypePublicIdentifier,
    MissingQuoteBeforeDoctypeSystemIdentifier,
    DuplicateAttribute,
    NonVoidHtmlElementStartTagWithTrailingSolidus,
    UnexpectedNullCharacter,
    UnexpectedQuestionMarkInsteadOfTagName,
    AbruptClosingOfEmptyComment,
    IncorrectlyClosedComment,
    NestedComment,
    InvalidFirstCharacterOfTagName,
    UnexpectedCharacterInAttributeName,
    UnexpectedCharacterInUnquotedAttributeValue,
    CdataInHtmlContent,
    UnknownNamedCharacterReference,
    AbsenceOfDigitsInNumericCharacterReference,
    ControlCharacterReference,
    NoncharacterCharacterReference,
    NullCharacterReference,
    CharacterReferenceOutsideUnicodeRange,
    SurrogateCharacterReference,
    MissingSemicolonAfterCharacterReference,
    UnexpectedEqualsSignBeforeAttributeName,
}

impl ParseErrorCode {
    pub fn as_str(self) -> &'static str {
        use ParseErrorCode::*;
        match self {
            EofInTag => "eof-in-tag",
            EofInComment => "eof-in-comment",
            EofInDoctype => "eof-in-doctype",
            EofInScriptHtmlCommentLikeText => "eof-in-script-html-comment-like-text",
            MissingEndTagName => "missing-end-tag-name",
            MissingDoctypeName => "missing-doctype-name",
            MissingDoctypePublicIdentifier => "missing-doctype-public-identifier",
            MissingDoctypeSystemIdentifier => "missing-doctype-system-identifier",
            MissingWhitespaceAfterDoctypePublicKeyword => {
                "missing-whitespace-after-doctype-public-keyword"
            }
            MissingWhitespaceAfterDoctypeSystemKeyword => {
                "missing-whitespace-after-doctype-system-keyword"
            }
            MissingQuoteBeforeDoctypePublicIdentifier => {
                "missing-quote-before-doctype-public-identifier"
            }
            MissingQuoteBeforeDoctypeSystemIdentifier => {
                "missing-quote-before-doctype-system-identifier"
            }
            DuplicateAttribute => "duplicate-attribute",
            NonVoidHtmlElementStartTagWithTrailingSolidus => {
                "non-void-html-element-start-tag-with-trailing-solidus"
            }
            UnexpectedNullCharacter => "unexpected-null-character",
            UnexpectedQuestionMarkInsteadOfTagName => "unexpected-question-mark-instead-of-tag-name",
            AbruptClosingOfEmptyComment => "abrupt-closing-of-empty-comment",
            IncorrectlyClosedComment => "incorrectly-closed-comment",
            NestedComment => "nested-comment",
            InvalidFirstCharacterOfTagName => "invalid-first-character-of-tag-name",
            UnexpectedCharacterInAttributeName => "unexpected-character-in-attribute-name",
            UnexpectedCharacterInUnquotedAttributeValue => {
                "unexpected-character-in-unquoted-attribute-value"
            }
            CdataInHtmlContent => "cdata-in-html-content",
            UnknownNamedCharacterReference => "unknown-named-character-reference",
            AbsenceOfDigitsInNumericCharacterReference => {
                "absence-of-digits-in-numeric-character-reference"
            }
            ControlCharacterReference => "control-character-reference",
            NoncharacterCharacterReference => "noncharacter-character-reference",
            NullCharacterReference => "null-character-reference",
            CharacterReferenceOutsideUnicodeRange => "character-reference-outside-unicode-range",
            SurrogateCharacterReference => "surrogate-character-reference",
            MissingSemicolonAfterCharacterReference => "missing-semicolon-after-character-reference",
            UnexpectedEqualsSignBeforeAttributeName => "unexpected-equals-sign-before-attribute-name",
        }
    }
}

impl fmt::Display for ParseErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single recoverable parse error with its source offset.
///
/// @see https://html.spec.whatwg.org/#parse-errors
#[derive(Clone, Copy, Debug)]
pub struct ParseError {
    pub code: ParseErrorCode,
    pub offset: usize,
}
