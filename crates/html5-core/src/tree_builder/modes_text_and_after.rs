//! Trailing insertion modes: AfterBody, InFrameset, AfterFrameset,
//! AfterAfterBody, AfterAfterFrameset.
//!
//! @see https://html.spec.whatwg.org/#the-after-body-insertion-mode

use super::insertion_mode::InsertionMode;
use super::TreeBuilder;
use crate::token::{ParseErrorCode, Token};
use crate::tokenizer::Tokenizer;

fn is_whitespace_only(s: &str) -> bool {
    s.chars().all(|c| matches!(c, ' ' | '\t' | '\n' | '\u{0c}' | '\r'))
}

impl TreeBuilder {
    pub(super) fn step_after_body(&mut self, token: Token, tok: &mut Tokenizer<'_>) {
        match token {
            Token::Character(ref s) if is_whitespace_only(s) => self.step_in_body(token, tok),
            Token::Comment(data) => {
                let html_root = self.open_elements.stack.first().copied();
                let node = self.dom.create_comment(data);
                if let Some(root) = html_root {
                    self.dom.append(root, node);
                } else {
                    self.dom.append(self.dom.document, node);
                }
            }
            Token::Doctype { .. } => self.parse_error(ParseErrorCode::MissingDoctypeName),
            Token::StartTag { ref name, .. } if name.is("html") => self.step_in_body(token, tok),
            Token::EndTag { ref name } if name.is("html") => {
                self.mode = InsertionMode::AfterAfterBody;
            }
            Token::Eof => self.done = true,
            other => {
                self.mode = InsertionMode::InBody;
                self.step_in_body(other, tok);
            }
        }
    }

    pub(super) fn step_in_frameset(&mut self, token: Token, tok: &mut Tokenizer<'_>) {
        match token {
            Token::Character(ref s) if is_whitespace_only(s) => self.insert_character(s),
            Token::Comment(data) => self.insert_comment(data),
            Token::Doctype { .. } => self.parse_error(ParseErrorCode::MissingDoctypeName),
            Token::StartTag { ref name, .. } if name.is("html") => self.step_in_body(token, tok),
            Token::StartTag { ref name, .. } if name.is("frameset") => {
                let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                self.insert_html_element(name, attrs);
            }
            Token::EndTag { ref name } if name.is("frameset") => {
                if self.open_elements.stack.len() == 1 {
                    self.parse_error(ParseErrorCode::MissingEndTagName);
                } else {
                    self.open_elements.pop();
                    if !self.current_node_is("frameset") {
                        self.mode = InsertionMode::AfterFrameset;
                    }
                }
            }
            Token::StartTag { ref name, .. } if name.is("frame") => {
                let Token::StartTag { name, attrs, self_closing } = token else { unreachable!() };
                self.insert_html_element(name, attrs);
                self.open_elements.pop();
                self.acknowledge_self_closing(self_closing);
            }
            Token::StartTag { ref name, .. } if name.is("noframes") => self.step_in_head(token, tok),
            Token::Eof => {
                if self.open_elements.stack.len() != 1 {
                    self.parse_error(ParseErrorCode::EofInTag);
                }
                self.done = true;
            }
            _ => {}
        }
    }

    pub(super) fn step_after_frameset(&mut self, token: Token, tok: &mut Tokenizer<'_>) {
        match token {
            Token::Character(ref s) if is_whitespace_only(s) => self.insert_character(s),
            Token::Comment(data) => self.insert_comment(data),
            Token::Doctype { .. } => self.parse_error(ParseErrorCode::MissingDoctypeName),
            Token::StartTag { ref name, .. } if name.is("html") => self.step_in_body(token, tok),
            Token::EndTag { ref name } if name.is("html") => {
                self.mode = InsertionMode::AfterAfterFrameset;
            }
            Token::StartTag { ref name, .. } if name.is("noframes") => self.step_in_head(token, tok),
            Token::Eof => self.done = true,
            _ => {}
        }
    }

    pub(super) fn step_after_after_body(&mut self, token: Token, tok: &mut Tokenizer<'_>) {
        match token {
            Token::Comment(data) => {
                let node = self.dom.create_comment(data);
                self.dom.append(self.dom.document, node);
            }
            Token::Doctype { .. } => self.step_in_body(token, tok),
            Token::Character(ref s) if is_whitespace_only(s) => self.step_in_body(token, tok),
            Token::StartTag { ref name, .. } if name.is("html") => self.step_in_body(token, tok),
            Token::Eof => self.done = true,
            other => {
                self.mode = InsertionMode::InBody;
                self.step_in_body(other, tok);
            }
        }
    }

    pub(super) fn step_after_after_frameset(&mut self, token: Token, tok: &mut Tokenizer<'_>) {
        match token {
            Token::Comment(data) => {
                let node = self.dom.create_comment(data);
                self.dom.append(self.dom.document, node);
            }
            Token::Doctype { .. } => self.step_in_body(token, tok),
            Token::Character(ref s) if is_whitespace_only(s) => self.step_in_body(token, tok),
            Token::StartTag { ref name, .. } if name.is("html") => self.step_in_body(token, tok),
            Token::StartTag { ref name, .. } if name.is("noframes") => self.step_in_head(token, tok),
            Token::Eof => self.done = true,
            _ => {}
        }
    }
}
