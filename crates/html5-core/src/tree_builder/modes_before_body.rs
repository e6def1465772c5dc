//! Insertion modes that run before `InBody` takes over: Initial, BeforeHtml,
//! BeforeHead, InHead, InHeadNoscript, AfterHead.
//!
//! @see https://html.spec.whatwg.org/#the-initial-insertion-mode

use super::insertion_mode::InsertionMode;
use super::TreeBuilder;
use crate::dom::Namespace;
use crate::tag_name::TagName;
use crate::token::{ParseErrorCode, Token};
use crate::tokenizer::{Tokenizer, TokenizerState};

fn is_whitespace_only(s: &str) -> bool {
    s.chars().all(|c| matches!(c, ' ' | '\t' | '\n' | '\u{0c}' | '\r'))
}

impl TreeBuilder {
    pub(super) fn step_initial(&mut self, token: Token, tok: &mut Tokenizer<'_>) {
        match token {
            Token::Character(s) if is_whitespace_only(&s) => {}
            Token::Comment(data) => self.insert_comment(data),
            Token::Doctype {
                name,
                public_id,
                system_id,
                compat_mode,
            } => {
                // An iframe srcdoc document never enters quirks mode,
                // regardless of what the DOCTYPE itself indicates.
                self.quirks_mode = if self.options.iframe_srcdoc {
                    crate::compat_mode::CompatMode::NoQuirks
                } else {
                    compat_mode
                };
                let node = self.dom.create_doctype(
                    name.unwrap_or_default(),
                    public_id.unwrap_or_default(),
                    system_id.unwrap_or_default(),
                    compat_mode,
                );
                self.dom.append(self.dom.document, node);
                self.mode = InsertionMode::BeforeHtml;
            }
            other => {
                self.mode = InsertionMode::BeforeHtml;
                self.step_before_html(other, tok);
            }
        }
    }

    pub(super) fn step_before_html(&mut self, token: Token, tok: &mut Tokenizer<'_>) {
        match token {
            Token::Doctype { .. } => self.parse_error(ParseErrorCode::MissingDoctypeName),
            Token::Comment(data) => self.insert_comment(data),
            Token::Character(s) if is_whitespace_only(&s) => {}
            Token::StartTag { ref name, .. } if name.is("html") => {
                let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                let html = self.create_element_for_tag(name, attrs, Namespace::Html);
                self.dom.append(self.dom.document, html);
                self.open_elements.push(html);
                self.mode = InsertionMode::BeforeHead;
            }
            Token::EndTag { ref name } if !name.is_one_of(&["head", "body", "html", "br"]) => {}
            other => {
                let html = self.dom.create_element(TagName::new("html"), Namespace::Html, Vec::new(), false);
                self.dom.append(self.dom.document, html);
                self.open_elements.push(html);
                self.mode = InsertionMode::BeforeHead;
                self.step_before_head(other, tok);
            }
        }
    }

    pub(super) fn step_before_head(&mut self, token: Token, tok: &mut Tokenizer<'_>) {
        match token {
            Token::Character(s) if is_whitespace_only(&s) => {}
            Token::Comment(data) => self.insert_comment(data),
            Token::Doctype { .. } => self.parse_error(ParseErrorCode::MissingDoctypeName),
            Token::StartTag { ref name, .. } if name.is("html") => self.step_in_body(token, tok),
            Token::StartTag { ref name, .. } if name.is("head") => {
                let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                let head = self.insert_html_element(name, attrs);
                self.head_element = Some(head);
                self.mode = InsertionMode::InHead;
            }
            Token::EndTag { ref name } if !name.is_one_of(&["head", "body", "html", "br"]) => {}
            other => {
                let head = self.insert_html_element(TagName::new("head"), Vec::new());
                self.head_element = Some(head);
                self.mode = InsertionMode::InHead;
                self.step_in_head(other, tok);
            }
        }
    }

    pub(super) fn step_in_head(&mut self, token: Token, tok: &mut Tokenizer<'_>) {
        match token {
            Token::Character(s) if is_whitespace_only(&s) => self.insert_character(&s),
            Token::Comment(data) => self.insert_comment(data),
            Token::Doctype { .. } => self.parse_error(ParseErrorCode::MissingDoctypeName),
            Token::StartTag { ref name, .. } if name.is("html") => self.step_in_body(token, tok),
            Token::StartTag { ref name, .. }
                if name.is_one_of(&["base", "basefont", "bgsound", "link"]) =>
            {
                let Token::StartTag { name, attrs, self_closing } = token else { unreachable!() };
                self.insert_html_element(name, attrs);
                self.open_elements.pop();
                self.acknowledge_self_closing(self_closing);
            }
            Token::StartTag { ref name, .. } if name.is("meta") => {
                let Token::StartTag { name, attrs, self_closing } = token else { unreachable!() };
                self.insert_html_element(name, attrs);
                self.open_elements.pop();
                self.acknowledge_self_closing(self_closing);
            }
            Token::StartTag { ref name, .. } if name.is("title") => {
                let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                self.generic_text_element(name, attrs, tok, true);
            }
            Token::StartTag { ref name, .. } if name.is("noscript") && self.options.scripting_enabled => {
                let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                self.insert_html_element(name, attrs);
                self.mode = InsertionMode::InHeadNoscript;
            }
            Token::StartTag { ref name, .. } if name.is("noscript") => {
                let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                self.insert_html_element(name, attrs);
            }
            Token::StartTag { ref name, .. } if name.is_one_of(&["noframes", "style"]) => {
                let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                self.generic_text_element(name, attrs, tok, false);
            }
            Token::StartTag { ref name, .. } if name.is("script") => {
                let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                self.insert_html_element(name.clone(), attrs);
                tok.set_last_start_tag_name(name);
                tok.set_state(TokenizerState::ScriptData);
                self.original_mode = self.mode;
                self.mode = InsertionMode::Text;
            }
            Token::EndTag { ref name } if name.is("head") => {
                self.open_elements.pop();
                self.mode = InsertionMode::AfterHead;
            }
            Token::EndTag { ref name } if name.is_one_of(&["body", "html", "br"]) => {
                self.open_elements.pop();
                self.mode = InsertionMode::AfterHead;
                self.step_after_head(Token::EndTag { name: name.clone() }, tok);
            }
            Token::StartTag { ref name, .. } if name.is("template") => {
                let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                self.insert_html_element(name, attrs);
                self.afe.insert_marker();
                self.frameset_ok = false;
                self.mode = InsertionMode::InTemplate;
                self.template_modes.push(InsertionMode::InTemplate);
            }
            Token::EndTag { ref name } if name.is("template") => {
                if self.open_elements.position_of(&self.dom, "template").is_none() {
                    self.parse_error(ParseErrorCode::MissingEndTagName);
                } else {
                    self.generate_implied_end_tags_thoroughly();
                    self.open_elements.pop_until(&self.dom, "template");
                    self.afe.clear_to_last_marker();
                    self.template_modes.pop();
                    self.mode = self.reset_insertion_mode_appropriately();
                }
            }
            Token::StartTag { ref name, .. } if name.is("head") => {}
            Token::EndTag { .. } => {}
            other => {
                self.open_elements.pop();
                self.mode = InsertionMode::AfterHead;
                self.step_after_head(other, tok);
            }
        }
    }

    pub(super) fn step_in_head_noscript(&mut self, token: Token, tok: &mut Tokenizer<'_>) {
        match token {
            Token::Doctype { .. } => self.parse_error(ParseErrorCode::MissingDoctypeName),
            Token::StartTag { ref name, .. } if name.is("html") => self.step_in_body(token, tok),
            Token::EndTag { ref name } if name.is("noscript") => {
                self.open_elements.pop();
                self.mode = InsertionMode::InHead;
            }
            Token::Character(ref s) if is_whitespace_only(s) => self.step_in_head(token, tok),
            Token::Comment(_) => self.step_in_head(token, tok),
            Token::StartTag { ref name, .. }
                if name.is_one_of(&["basefont", "bgsound", "link", "meta", "noframes", "style"]) =>
            {
                self.step_in_head(token, tok);
            }
            Token::EndTag { ref name } if name.is("br") => {
                self.open_elements.pop();
                self.mode = InsertionMode::InHead;
                self.step_in_head(token, tok);
            }
            Token::StartTag { ref name, .. } if name.is_one_of(&["head", "noscript"]) => {}
            Token::EndTag { .. } => {}
            other => {
                self.open_elements.pop();
                self.mode = InsertionMode::InHead;
                self.step_in_head(other, tok);
            }
        }
    }

    pub(super) fn step_after_head(&mut self, token: Token, tok: &mut Tokenizer<'_>) {
        match token {
            Token::Character(s) if is_whitespace_only(&s) => self.insert_character(&s),
            Token::Comment(data) => self.insert_comment(data),
            Token::Doctype { .. } => self.parse_error(ParseErrorCode::MissingDoctypeName),
            Token::StartTag { ref name, .. } if name.is("html") => self.step_in_body(token, tok),
            Token::StartTag { ref name, .. } if name.is("body") => {
                let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                self.insert_html_element(name, attrs);
                self.frameset_ok = false;
                self.mode = InsertionMode::InBody;
            }
            Token::StartTag { ref name, .. } if name.is("frameset") => {
                let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                self.insert_html_element(name, attrs);
                self.mode = InsertionMode::InFrameset;
            }
            Token::StartTag { ref name, .. }
                if name.is_one_of(&[
                    "base", "basefont", "bgsound", "link", "meta", "noframes", "script", "style",
                    "template", "title",
                ]) =>
            {
                self.parse_error(ParseErrorCode::MissingEndTagName);
                let head = self.head_element;
                if let Some(head) = head {
                    self.open_elements.push(head);
                }
                self.step_in_head(token, tok);
                if head.is_some() {
                    self.open_elements.stack.retain(|&id| Some(id) != head);
                }
            }
            Token::EndTag { ref name } if name.is("template") => self.step_in_head(token, tok),
            Token::EndTag { ref name } if name.is_one_of(&["body", "html", "br"]) => {
                self.insert_implicit_body_and_reprocess(token, tok);
            }
            Token::StartTag { ref name, .. } if name.is("head") => {}
            Token::EndTag { .. } => {}
            other => self.insert_implicit_body_and_reprocess(other, tok),
        }
    }

    fn insert_implicit_body_and_reprocess(&mut self, token: Token, tok: &mut Tokenizer<'_>) {
        self.insert_html_element(TagName::new("body"), Vec::new());
        self.mode = InsertionMode::InBody;
        self.step_in_body(token, tok);
    }

    /// Shared by RCDATA (`title`, `textarea`) and RAWTEXT (`style`,
    /// `xmp`, `iframe`, `noembed`, `noframes`, ...) start tags.
    ///
    /// @see https://html.spec.whatwg.org/#generic-raw-text-element-parsing-algorithm
    pub(super) fn generic_text_element(
        &mut self,
        name: TagName,
        attrs: Vec<crate::token::TokenAttribute>,
        tok: &mut Tokenizer<'_>,
        rcdata: bool,
    ) {
        self.insert_html_element(name.clone(), attrs);
        tok.set_last_start_tag_name(name);
        tok.set_state(if rcdata { TokenizerState::RcData } else { TokenizerState::RawText });
        self.original_mode = self.mode;
        self.mode = InsertionMode::Text;
    }
}
