//! The "in foreign content" token-handling rules, applied instead of the
//! current insertion mode's own rules while the adjusted current node is an
//! SVG or MathML element that isn't an integration point.
//!
//! @see https://html.spec.whatwg.org/#parsing-main-inforeign

use super::foreign::{adjust_svg_tag_name, BREAKOUT_START_TAGS};
use super::TreeBuilder;
use crate::dom::Namespace;
use crate::tag_name::TagName;
use crate::token::{ParseErrorCode, Token, TokenAttribute};
use crate::tokenizer::Tokenizer;

impl TreeBuilder {
    pub(super) fn step_in_foreign_content(&mut self, token: Token, tok: &mut Tokenizer<'_>) {
        match token {
            Token::Character(ref s) if s.contains('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.insert_character("\u{fffd}");
                self.frameset_ok_to_false_if_non_whitespace("\u{fffd}");
            }
            Token::Character(s) => {
                self.frameset_ok_to_false_if_non_whitespace(&s);
                self.insert_character(&s);
            }
            Token::Comment(data) => self.insert_comment(data),
            Token::Doctype { .. } => self.parse_error(ParseErrorCode::MissingDoctypeName),
            Token::StartTag { ref name, .. } if name.is_one_of(BREAKOUT_START_TAGS) => {
                self.breakout_of_foreign_content(token, tok);
            }
            Token::StartTag { ref name, .. } if name.is("font") && self.has_breakout_font_attrs(&token) => {
                self.breakout_of_foreign_content(token, tok);
            }
            Token::StartTag { .. } => {
                let Token::StartTag { name, attrs, self_closing } = token else { unreachable!() };
                let namespace = self.current_foreign_namespace();
                let adjusted_name = if namespace == Namespace::Svg {
                    TagName::new(adjust_svg_tag_name(name.as_str()))
                } else {
                    name
                };
                self.insert_foreign_element(adjusted_name, attrs, namespace);
                if self_closing {
                    self.open_elements.pop();
                    self.acknowledge_self_closing(true);
                }
            }
            Token::EndTag { ref name } if name.is("script") && self.current_node_is("script") => {
                self.open_elements.pop();
            }
            Token::EndTag { .. } => {
                self.foreign_end_tag(token, tok);
            }
            Token::Eof => self.step_in_body(token, tok),
        }
    }

    fn frameset_ok_to_false_if_non_whitespace(&mut self, s: &str) {
        if !s.chars().all(|c| matches!(c, ' ' | '\t' | '\n' | '\u{0c}' | '\r')) {
            self.frameset_ok = false;
        }
    }

    fn current_foreign_namespace(&self) -> Namespace {
        self.current_node()
            .and_then(|id| self.dom.node(id).as_element().map(|e| e.namespace))
            .unwrap_or(Namespace::Html)
    }

    fn has_breakout_font_attrs(&self, token: &Token) -> bool {
        let Token::StartTag { attrs, .. } = token else { return false };
        attrs.iter().any(|a: &TokenAttribute| {
            matches!(a.name.as_ref(), "color" | "face" | "size")
        })
    }

    /// "Any other start tag" that appears in the breakout list, or `<font>`
    /// with `color`/`face`/`size`: pop back to the nearest HTML/integration
    /// boundary and reprocess using the current insertion mode's HTML rules.
    ///
    /// @see https://html.spec.whatwg.org/#parsing-main-inforeign
    fn breakout_of_foreign_content(&mut self, token: Token, tok: &mut Tokenizer<'_>) {
        while let Some(top) = self.current_node() {
            let Some(el) = self.dom.node(top).as_element() else { break };
            if el.namespace == Namespace::Html
                || super::foreign::is_integration_point(el)
            {
                break;
            }
            self.open_elements.pop();
        }
        self.process_in_current_mode(token, tok);
    }

    /// The generic "any other end tag" algorithm for foreign content: walk
    /// the stack looking for a case-insensitive name match, popping down to
    /// and including it if found.
    ///
    /// @see https://html.spec.whatwg.org/#parsing-main-inforeign
    fn foreign_end_tag(&mut self, token: Token, tok: &mut Tokenizer<'_>) {
        let Token::EndTag { name } = &token else { return };
        let target = name.as_str().to_ascii_lowercase();

        if self.open_elements.is_empty() {
            return;
        }

        let mut index = self.open_elements.stack.len();
        loop {
            if index == 0 {
                break;
            }
            index -= 1;
            let id = self.open_elements.stack[index];
            let Some(el) = self.dom.node(id).as_element() else {
                continue;
            };
            if el.name.as_str().to_ascii_lowercase() == target {
                self.open_elements.stack.truncate(index);
                return;
            }
            if el.namespace == Namespace::Html {
                self.process_in_current_mode(token, tok);
                return;
            }
        }
    }
}
