//! The InBody insertion mode — by far the largest, handling most ordinary
//! flow content — plus the Text mode used for RCDATA/RAWTEXT/script-data
//! elements, and the adoption agency algorithm that formatting-element end
//! tags invoke from here.
//!
//! @see https://html.spec.whatwg.org/#parsing-main-inbody

use super::insertion_mode::InsertionMode;
use super::TreeBuilder;
use crate::dom::Namespace;
use crate::tag_name::{self, TagName};
use crate::token::{ParseErrorCode, Token};
use crate::tokenizer::Tokenizer;

const FORMATTING_END_TAGS: &[&str] = &[
    "a", "b", "big", "code", "em", "font", "i", "nobr", "s", "small", "strike", "strong", "tt", "u",
];
const CLOSE_IMPLIED_BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "button", "center", "details", "dialog", "dir",
    "div", "dl", "fieldset", "figcaption", "figure", "footer", "header", "hgroup", "listing",
    "main", "menu", "nav", "ol", "pre", "section", "summary", "ul",
];
const APPLET_MARQUEE_OBJECT: &[&str] = &["applet", "marquee", "object"];

fn is_whitespace_only(s: &str) -> bool {
    s.chars().all(|c| matches!(c, ' ' | '\t' | '\n' | '\u{0c}' | '\r'))
}

impl TreeBuilder {
    pub(super) fn step_in_body(&mut self, token: Token, tok: &mut Tokenizer<'_>) {
        match token {
            Token::Character(ref s) if s.contains('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
            }
            Token::Character(s) => {
                let non_ws = !is_whitespace_only(&s);
                self.reconstruct_active_formatting_elements();
                self.insert_character(&s);
                if non_ws {
                    self.frameset_ok = false;
                }
            }
            Token::Comment(data) => self.insert_comment(data),
            Token::Doctype { .. } => self.parse_error(ParseErrorCode::MissingDoctypeName),
            Token::StartTag { ref name, .. } if name.is("html") => {
                self.parse_error(ParseErrorCode::MissingEndTagName);
                if !self.open_elements.contains_template(&self.dom) {
                    let Token::StartTag { attrs, .. } = &token else { unreachable!() };
                    if let Some(&root) = self.open_elements.stack.first() {
                        if let Some(el) = self.dom.node_mut(root).as_element_mut() {
                            for a in attrs {
                                el.set_attribute_if_absent(a.name.clone(), a.value.clone());
                            }
                        }
                    }
                }
            }
            Token::StartTag { ref name, .. }
                if name.is_one_of(&[
                    "base", "basefont", "bgsound", "link", "meta", "noframes", "script", "style",
                    "template", "title",
                ]) =>
            {
                self.step_in_head(token, tok);
            }
            Token::EndTag { ref name } if name.is("template") => self.step_in_head(token, tok),
            Token::StartTag { ref name, .. } if name.is("body") => {
                self.parse_error(ParseErrorCode::MissingEndTagName);
                let eligible = self.open_elements.stack.len() > 1
                    && self
                        .dom
                        .node(self.open_elements.stack[1])
                        .as_element()
                        .is_some_and(|e| e.name.is("body"))
                    && !self.open_elements.contains_template(&self.dom);
                if eligible {
                    self.frameset_ok = false;
                    let Token::StartTag { attrs, .. } = &token else { unreachable!() };
                    let body = self.open_elements.stack[1];
                    if let Some(el) = self.dom.node_mut(body).as_element_mut() {
                        for a in attrs {
                            el.set_attribute_if_absent(a.name.clone(), a.value.clone());
                        }
                    }
                }
            }
            Token::StartTag { ref name, .. } if name.is("frameset") => {
                self.parse_error(ParseErrorCode::MissingEndTagName);
                let eligible = self.frameset_ok
                    && self.open_elements.stack.len() > 1
                    && self
                        .dom
                        .node(self.open_elements.stack[1])
                        .as_element()
                        .is_some_and(|e| e.name.is("body"));
                if eligible {
                    let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                    let body = self.open_elements.stack[1];
                    self.dom.detach(body);
                    self.open_elements.stack.truncate(1);
                    self.insert_html_element(name, attrs);
                    self.mode = InsertionMode::InFrameset;
                }
            }
            Token::Eof => {
                if !self.template_modes.is_empty() {
                    self.step_in_template(token, tok);
                } else {
                    self.done = true;
                }
            }
            Token::EndTag { ref name } if name.is("body") => {
                if !self.open_elements.has_element_in_scope(&self.dom, "body") {
                    self.parse_error(ParseErrorCode::MissingEndTagName);
                } else {
                    self.mode = InsertionMode::AfterBody;
                }
            }
            Token::EndTag { ref name } if name.is("html") => {
                if !self.open_elements.has_element_in_scope(&self.dom, "body") {
                    self.parse_error(ParseErrorCode::MissingEndTagName);
                } else {
                    self.mode = InsertionMode::AfterBody;
                    self.step_after_body(Token::EndTag { name: name.clone() }, tok);
                }
            }
            Token::StartTag { ref name, .. } if name.is_one_of(CLOSE_IMPLIED_BLOCK_TAGS) && !name.is_one_of(APPLET_MARQUEE_OBJECT) && !name.is("button") => {
                let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                if self.open_elements.has_element_in_button_scope(&self.dom, "p") {
                    self.close_p_element();
                }
                self.insert_html_element(name, attrs);
            }
            Token::StartTag { ref name, .. } if name.is_one_of(super::HEADING_TAGS) => {
                let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                if self.open_elements.has_element_in_button_scope(&self.dom, "p") {
                    self.close_p_element();
                }
                if self.current_node_is_heading() {
                    self.parse_error(ParseErrorCode::MissingEndTagName);
                    self.open_elements.pop();
                }
                self.insert_html_element(name, attrs);
            }
            Token::StartTag { ref name, .. } if name.is_one_of(&["pre", "listing"]) => {
                let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                if self.open_elements.has_element_in_button_scope(&self.dom, "p") {
                    self.close_p_element();
                }
                self.insert_html_element(name, attrs);
                self.ignore_next_lf = true;
                self.frameset_ok = false;
            }
            Token::StartTag { ref name, .. } if name.is("form") => {
                let already_open = self.form_element.is_some() && !self.open_elements.contains_template(&self.dom);
                if already_open {
                    self.parse_error(ParseErrorCode::MissingEndTagName);
                } else {
                    let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                    if self.open_elements.has_element_in_button_scope(&self.dom, "p") {
                        self.close_p_element();
                    }
                    let form = self.insert_html_element(name, attrs);
                    if !self.open_elements.contains_template(&self.dom) {
                        self.form_element = Some(form);
                    }
                }
            }
            Token::StartTag { ref name, .. } if name.is("li") => {
                self.frameset_ok = false;
                self.close_matching_item_scope(&["li"]);
                let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                if self.open_elements.has_element_in_button_scope(&self.dom, "p") {
                    self.close_p_element();
                }
                self.insert_html_element(name, attrs);
            }
            Token::StartTag { ref name, .. } if name.is_one_of(&["dd", "dt"]) => {
                self.frameset_ok = false;
                self.close_matching_item_scope(&["dd", "dt"]);
                let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                if self.open_elements.has_element_in_button_scope(&self.dom, "p") {
                    self.close_p_element();
                }
                self.insert_html_element(name, attrs);
            }
            Token::StartTag { ref name, .. } if name.is("plaintext") => {
                let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                if self.open_elements.has_element_in_button_scope(&self.dom, "p") {
                    self.close_p_element();
                }
                self.insert_html_element(name, attrs);
                tok.set_state(crate::tokenizer::TokenizerState::Plaintext);
            }
            Token::StartTag { ref name, .. } if name.is("button") => {
                if self.open_elements.has_element_in_scope(&self.dom, "button") {
                    self.parse_error(ParseErrorCode::MissingEndTagName);
                    self.generate_implied_end_tags(None);
                    self.open_elements.pop_until(&self.dom, "button");
                }
                self.reconstruct_active_formatting_elements();
                let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                self.insert_html_element(name, attrs);
                self.frameset_ok = false;
            }
            Token::EndTag { ref name } if name.is_one_of(CLOSE_IMPLIED_BLOCK_TAGS) => {
                let tag = name.as_str().to_string();
                if !self.open_elements.has_element_in_scope(&self.dom, &tag) {
                    self.parse_error(ParseErrorCode::MissingEndTagName);
                } else {
                    self.generate_implied_end_tags(None);
                    if !self.current_node_is(&tag) {
                        self.parse_error(ParseErrorCode::MissingEndTagName);
                    }
                    self.open_elements.pop_until(&self.dom, &tag);
                }
            }
            Token::EndTag { ref name } if name.is("form") => {
                if !self.open_elements.contains_template(&self.dom) {
                    let node = self.form_element.take();
                    let scoped = node.is_some_and(|n| {
                        self.dom
                            .node(n)
                            .as_element()
                            .is_some_and(|e| self.open_elements.has_element_in_scope(&self.dom, e.name.as_str()))
                    });
                    if !scoped {
                        self.parse_error(ParseErrorCode::MissingEndTagName);
                    } else if let Some(node) = node {
                        self.generate_implied_end_tags(None);
                        if self.current_node() != Some(node) {
                            self.parse_error(ParseErrorCode::MissingEndTagName);
                        }
                        self.open_elements.stack.retain(|&id| id != node);
                    }
                } else {
                    if !self.open_elements.has_element_in_scope(&self.dom, "form") {
                        self.parse_error(ParseErrorCode::MissingEndTagName);
                    } else {
                        self.generate_implied_end_tags(None);
                        if !self.current_node_is("form") {
                            self.parse_error(ParseErrorCode::MissingEndTagName);
                        }
                        self.open_elements.pop_until(&self.dom, "form");
                    }
                }
            }
            Token::EndTag { ref name } if name.is("p") => {
                if !self.open_elements.has_element_in_button_scope(&self.dom, "p") {
                    self.parse_error(ParseErrorCode::MissingEndTagName);
                    self.insert_html_element(TagName::new("p"), Vec::new());
                }
                self.close_p_element();
            }
            Token::EndTag { ref name } if name.is("li") => {
                if !self.open_elements.has_element_in_list_item_scope(&self.dom, "li") {
                    self.parse_error(ParseErrorCode::MissingEndTagName);
                } else {
                    self.generate_implied_end_tags(Some("li"));
                    if !self.current_node_is("li") {
                        self.parse_error(ParseErrorCode::MissingEndTagName);
                    }
                    self.open_elements.pop_until(&self.dom, "li");
                }
            }
            Token::EndTag { ref name } if name.is_one_of(&["dd", "dt"]) => {
                let tag = name.as_str().to_string();
                if !self.open_elements.has_element_in_scope(&self.dom, &tag) {
                    self.parse_error(ParseErrorCode::MissingEndTagName);
                } else {
                    self.generate_implied_end_tags(Some(tag.as_str()));
                    if !self.current_node_is(&tag) {
                        self.parse_error(ParseErrorCode::MissingEndTagName);
                    }
                    self.open_elements.pop_until(&self.dom, &tag);
                }
            }
            Token::EndTag { ref name } if name.is_one_of(super::HEADING_TAGS) => {
                if !self.open_elements.contains_in_default_scope(&self.dom, super::HEADING_TAGS) {
                    self.parse_error(ParseErrorCode::MissingEndTagName);
                } else {
                    self.generate_implied_end_tags(None);
                    if !self.current_node_is(name.as_str()) {
                        self.parse_error(ParseErrorCode::MissingEndTagName);
                    }
                    self.open_elements
                        .pop_while(&self.dom, |n| !super::HEADING_TAGS.contains(&n));
                    self.open_elements.pop();
                }
            }
            Token::StartTag { ref name, .. } if name.is("a") => {
                if let Some((_, existing)) = self.afe.find_active(&self.dom, "a") {
                    self.parse_error(ParseErrorCode::MissingEndTagName);
                    self.run_adoption_agency("a", tok);
                    self.afe.remove(existing);
                    self.open_elements.stack.retain(|&id| id != existing);
                }
                self.reconstruct_active_formatting_elements();
                let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                let node = self.insert_html_element(name, attrs);
                self.afe.push(&self.dom, node);
            }
            Token::StartTag { ref name, .. }
                if name.is_one_of(&["b", "big", "code", "em", "font", "i", "s", "small", "strike", "strong", "tt", "u"]) =>
            {
                self.reconstruct_active_formatting_elements();
                let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                let node = self.insert_html_element(name, attrs);
                self.afe.push(&self.dom, node);
            }
            Token::StartTag { ref name, .. } if name.is("nobr") => {
                self.reconstruct_active_formatting_elements();
                if self.open_elements.has_element_in_scope(&self.dom, "nobr") {
                    self.parse_error(ParseErrorCode::MissingEndTagName);
                    self.run_adoption_agency("nobr", tok);
                    self.reconstruct_active_formatting_elements();
                }
                let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                let node = self.insert_html_element(name, attrs);
                self.afe.push(&self.dom, node);
            }
            Token::EndTag { ref name } if name.is_one_of(FORMATTING_END_TAGS) => {
                let tag = name.as_str().to_string();
                self.run_adoption_agency(&tag, tok);
            }
            Token::StartTag { ref name, .. } if name.is_one_of(APPLET_MARQUEE_OBJECT) => {
                let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                self.reconstruct_active_formatting_elements();
                self.insert_html_element(name, attrs);
                self.afe.insert_marker();
                self.frameset_ok = false;
            }
            Token::EndTag { ref name } if name.is_one_of(APPLET_MARQUEE_OBJECT) => {
                let tag = name.as_str().to_string();
                if !self.open_elements.has_element_in_scope(&self.dom, &tag) {
                    self.parse_error(ParseErrorCode::MissingEndTagName);
                } else {
                    self.generate_implied_end_tags(None);
                    if !self.current_node_is(&tag) {
                        self.parse_error(ParseErrorCode::MissingEndTagName);
                    }
                    self.open_elements.pop_until(&self.dom, &tag);
                    self.afe.clear_to_last_marker();
                }
            }
            Token::StartTag { ref name, .. } if name.is("table") => {
                let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                if !matches!(self.quirks_mode, crate::compat_mode::CompatMode::Quirks)
                    && self.open_elements.has_element_in_button_scope(&self.dom, "p")
                {
                    self.close_p_element();
                }
                self.insert_html_element(name, attrs);
                self.frameset_ok = false;
                self.mode = InsertionMode::InTable;
            }
            Token::EndTag { ref name } if name.is("br") => {
                self.parse_error(ParseErrorCode::MissingEndTagName);
                self.reconstruct_active_formatting_elements();
                self.insert_html_element(TagName::new("br"), Vec::new());
                self.open_elements.pop();
                self.frameset_ok = false;
            }
            Token::StartTag { ref name, .. } if name.is_one_of(&["area", "br", "embed", "keygen", "wbr"]) => {
                self.reconstruct_active_formatting_elements();
                let Token::StartTag { name, attrs, self_closing } = token else { unreachable!() };
                self.insert_html_element(name, attrs);
                self.open_elements.pop();
                self.acknowledge_self_closing(self_closing);
                self.frameset_ok = false;
            }
            Token::StartTag { ref name, .. } if name.is("img") => {
                self.reconstruct_active_formatting_elements();
                let Token::StartTag { name, attrs, self_closing } = token else { unreachable!() };
                self.insert_html_element(name, attrs);
                self.open_elements.pop();
                self.acknowledge_self_closing(self_closing);
                self.frameset_ok = false;
            }
            Token::StartTag { ref name, .. } if name.is("image") => {
                self.parse_error(ParseErrorCode::MissingEndTagName);
                let Token::StartTag { attrs, self_closing, .. } = token else { unreachable!() };
                self.reconstruct_active_formatting_elements();
                self.insert_html_element(TagName::new("img"), attrs);
                self.open_elements.pop();
                self.acknowledge_self_closing(self_closing);
                self.frameset_ok = false;
            }
            Token::StartTag { ref name, .. } if name.is("input") => {
                let is_hidden = matches!(&token, Token::StartTag { attrs, .. }
                    if attrs.iter().any(|a| a.name.as_ref() == "type" && a.value.eq_ignore_ascii_case("hidden")));
                self.reconstruct_active_formatting_elements();
                let Token::StartTag { name, attrs, self_closing } = token else { unreachable!() };
                self.insert_html_element(name, attrs);
                self.open_elements.pop();
                self.acknowledge_self_closing(self_closing);
                if !is_hidden {
                    self.frameset_ok = false;
                }
            }
            Token::StartTag { ref name, .. } if name.is_one_of(&["param", "source", "track"]) => {
                let Token::StartTag { name, attrs, self_closing } = token else { unreachable!() };
                self.insert_html_element(name, attrs);
                self.open_elements.pop();
                self.acknowledge_self_closing(self_closing);
            }
            Token::StartTag { ref name, .. } if name.is("hr") => {
                if self.open_elements.has_element_in_button_scope(&self.dom, "p") {
                    self.close_p_element();
                }
                let Token::StartTag { name, attrs, self_closing } = token else { unreachable!() };
                self.insert_html_element(name, attrs);
                self.open_elements.pop();
                self.acknowledge_self_closing(self_closing);
                self.frameset_ok = false;
            }
            Token::StartTag { ref name, .. } if name.is("textarea") => {
                let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                self.insert_html_element(name.clone(), attrs);
                tok.set_last_start_tag_name(name);
                tok.set_state(crate::tokenizer::TokenizerState::RcData);
                self.ignore_next_lf = true;
                self.frameset_ok = false;
                self.original_mode = self.mode;
                self.mode = InsertionMode::Text;
            }
            Token::StartTag { ref name, .. } if name.is("xmp") => {
                if self.open_elements.has_element_in_button_scope(&self.dom, "p") {
                    self.close_p_element();
                }
                self.reconstruct_active_formatting_elements();
                self.frameset_ok = false;
                let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                self.generic_text_element(name, attrs, tok, false);
            }
            Token::StartTag { ref name, .. } if name.is("iframe") => {
                self.frameset_ok = false;
                let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                self.generic_text_element(name, attrs, tok, false);
            }
            Token::StartTag { ref name, .. }
                if name.is("noembed") || (name.is("noscript") && self.options.scripting_enabled) =>
            {
                let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                self.generic_text_element(name, attrs, tok, false);
            }
            Token::StartTag { ref name, .. } if name.is("select") => {
                self.reconstruct_active_formatting_elements();
                let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                self.insert_html_element(name, attrs);
                self.frameset_ok = false;
                self.mode = match self.mode {
                    InsertionMode::InTable
                    | InsertionMode::InCaption
                    | InsertionMode::InTableBody
                    | InsertionMode::InRow
                    | InsertionMode::InCell => InsertionMode::InSelectInTable,
                    _ => InsertionMode::InSelect,
                };
            }
            Token::StartTag { ref name, .. } if name.is_one_of(&["optgroup", "option"]) => {
                if self.current_node_is("option") {
                    self.open_elements.pop();
                }
                self.reconstruct_active_formatting_elements();
                let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                self.insert_html_element(name, attrs);
            }
            Token::StartTag { ref name, .. } if name.is_one_of(&["rb", "rtc"]) => {
                if self.open_elements.has_element_in_scope(&self.dom, "ruby") {
                    self.generate_implied_end_tags(None);
                    if !self.current_node_is("ruby") {
                        self.parse_error(ParseErrorCode::MissingEndTagName);
                    }
                }
                let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                self.insert_html_element(name, attrs);
            }
            Token::StartTag { ref name, .. } if name.is_one_of(&["rp", "rt"]) => {
                if self.open_elements.has_element_in_scope(&self.dom, "ruby") {
                    self.generate_implied_end_tags(Some("rtc"));
                    if !self.current_node_is("ruby") && !self.current_node_is("rtc") {
                        self.parse_error(ParseErrorCode::MissingEndTagName);
                    }
                }
                let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                self.insert_html_element(name, attrs);
            }
            Token::StartTag { ref name, .. } if name.is("math") => {
                let Token::StartTag { attrs, self_closing, .. } = token else { unreachable!() };
                self.reconstruct_active_formatting_elements();
                self.insert_foreign_element(TagName::new("math"), attrs, Namespace::MathMl);
                if self_closing {
                    self.open_elements.pop();
                    self.acknowledge_self_closing(true);
                }
            }
            Token::StartTag { ref name, .. } if name.is("svg") => {
                let Token::StartTag { attrs, self_closing, .. } = token else { unreachable!() };
                self.reconstruct_active_formatting_elements();
                self.insert_foreign_element(TagName::new("svg"), attrs, Namespace::Svg);
                if self_closing {
                    self.open_elements.pop();
                    self.acknowledge_self_closing(true);
                }
            }
            Token::StartTag { ref name, .. }
                if name.is_one_of(&[
                    "caption", "col", "colgroup", "frame", "head", "tbody", "td", "tfoot", "th",
                    "thead", "tr",
                ]) =>
            {
                self.parse_error(ParseErrorCode::MissingEndTagName);
            }
            Token::StartTag { .. } => {
                self.reconstruct_active_formatting_elements();
                let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                self.insert_html_element(name, attrs);
            }
            Token::EndTag { .. } => self.any_other_end_tag(token, tok),
        }
    }

    fn current_node_is_heading(&self) -> bool {
        self.current_node()
            .and_then(|id| self.dom.node(id).as_element())
            .is_some_and(|e| super::HEADING_TAGS.contains(&e.name.as_str()))
    }

    /// Shared by `<li>` and `<dd>`/`<dt>`: walk up the stack closing the
    /// nearest matching item, stopping at the first "special" element that
    /// isn't itself address/div/p.
    ///
    /// @see https://html.spec.whatwg.org/#parsing-main-inbody (the "A start
    /// tag whose tag name is "li"" clause and its `dd`/`dt` sibling)
    fn close_matching_item_scope(&mut self, targets: &[&str]) {
        for i in (0..self.open_elements.stack.len()).rev() {
            let id = self.open_elements.stack[i];
            let Some(el) = self.dom.node(id).as_element() else { continue };
            let name = el.name.as_str().to_string();
            if targets.contains(&name.as_str()) {
                self.generate_implied_end_tags(Some(name.as_str()));
                if !self.current_node_is(&name) {
                    self.parse_error(ParseErrorCode::MissingEndTagName);
                }
                self.open_elements.pop_until(&self.dom, &name);
                return;
            }
            if tag_name::is_special(&el.name) && !matches!(name.as_str(), "address" | "div" | "p") {
                return;
            }
        }
    }

    /// The generic "any other end tag" algorithm.
    ///
    /// @see https://html.spec.whatwg.org/#parsing-main-inbody
    fn any_other_end_tag(&mut self, token: Token, tok: &mut Tokenizer<'_>) {
        let Token::EndTag { name } = &token else { return };
        let target = name.clone();
        for i in (0..self.open_elements.stack.len()).rev() {
            let id = self.open_elements.stack[i];
            let Some(el) = self.dom.node(id).as_element() else { continue };
            if el.name.is(target.as_str()) {
                self.generate_implied_end_tags(Some(target.as_str()));
                if !self.current_node_is(target.as_str()) {
                    self.parse_error(ParseErrorCode::MissingEndTagName);
                }
                self.open_elements.stack.truncate(i);
                return;
            }
            if tag_name::is_special(&el.name) {
                self.parse_error(ParseErrorCode::MissingEndTagName);
                return;
            }
        }
        let _ = tok;
    }

    // ---- Text mode ---------------------------------------------------------

    pub(super) fn step_text(&mut self, token: Token, tok: &mut Tokenizer<'_>) {
        match token {
            Token::Character(s) => self.insert_character(&s),
            Token::Eof => {
                self.parse_error(ParseErrorCode::EofInTag);
                if self.current_node_is("script") {
                    // Marks the script as "already started"; execution is
                    // out of scope for this crate.
                }
                self.open_elements.pop();
                self.mode = self.original_mode;
                self.process_in_current_mode(Token::Eof, tok);
            }
            Token::EndTag { ref name } if name.is("script") => {
                self.open_elements.pop();
                self.mode = self.original_mode;
            }
            other => {
                self.open_elements.pop();
                self.mode = self.original_mode;
                let _ = other;
            }
        }
    }

    // ---- Adoption agency algorithm -----------------------------------------

    /// @see https://html.spec.whatwg.org/#adoption-agency-algorithm
    fn run_adoption_agency(&mut self, subject: &str, tok: &mut Tokenizer<'_>) {
        for _outer in 0..8 {
            let Some((afe_index, formatting_node)) = self.afe.find_active(&self.dom, subject) else {
                let end_tag = Token::EndTag { name: TagName::new(subject) };
                self.any_other_end_tag(end_tag, tok);
                return;
            };

            if !self.open_elements.stack.contains(&formatting_node) {
                self.parse_error(ParseErrorCode::MissingEndTagName);
                self.afe.remove(formatting_node);
                return;
            }

            if !self.open_elements.has_element_in_scope(&self.dom, subject) {
                self.parse_error(ParseErrorCode::MissingEndTagName);
                return;
            }

            if self.current_node() != Some(formatting_node) {
                self.parse_error(ParseErrorCode::MissingEndTagName);
            }

            let formatting_index = match self
                .open_elements
                .stack
                .iter()
                .position(|&id| id == formatting_node)
            {
                Some(i) => i,
                None => return,
            };

            let furthest_block = self.open_elements.stack[formatting_index + 1..]
                .iter()
                .copied()
                .find(|&id| {
                    self.dom
                        .node(id)
                        .as_element()
                        .is_some_and(|e| tag_name::is_special(&e.name))
                });

            let Some(furthest_block) = furthest_block else {
                self.open_elements.stack.truncate(formatting_index);
                self.afe.remove(formatting_node);
                return;
            };

            let common_ancestor = self.open_elements.stack[formatting_index.saturating_sub(1)];
            let mut bookmark = afe_index;

            let mut node = furthest_block;
            let mut node_index = self
                .open_elements
                .stack
                .iter()
                .position(|&id| id == node)
                .unwrap();
            let mut last_node = furthest_block;

            for _inner in 0..3 {
                if node_index == 0 {
                    break;
                }
                node_index -= 1;
                node = self.open_elements.stack[node_index];

                if node == formatting_node {
                    break;
                }

                let in_afe = self.afe.position_of(node);
                if in_afe.is_none() {
                    self.open_elements.stack.remove(node_index);
                    continue;
                }
                let node_afe_index = in_afe.unwrap();

                let el = self.dom.node(node).as_element().unwrap().clone();
                let clone = self
                    .dom
                    .create_element(el.name.clone(), el.namespace, el.attrs.clone(), false);
                self.afe.replace_at(node_afe_index, clone);
                self.open_elements.stack[node_index] = clone;
                node = clone;

                // Per adoption agency step 13.6: the bookmark only moves the
                // first time through this loop, while `last_node` is still
                // `furthest_block` — later iterations must not overwrite it.
                if last_node == furthest_block {
                    bookmark = node_afe_index;
                }

                self.dom.detach(last_node);
                self.dom.append(clone, last_node);
                last_node = clone;
            }

            self.dom.detach(last_node);
            match self.appropriate_insertion_point_for_adoption(common_ancestor) {
                super::InsertionPoint::Append(parent) => self.dom.append(parent, last_node),
                super::InsertionPoint::Before(sibling) => self.dom.insert_before(sibling, last_node),
            }

            let formatting_el = self.dom.node(formatting_node).as_element().unwrap().clone();
            let new_formatting = self.dom.create_element(
                formatting_el.name.clone(),
                formatting_el.namespace,
                formatting_el.attrs.clone(),
                false,
            );

            let children: Vec<_> = self.dom.children(furthest_block).collect();
            for child in children {
                self.dom.detach(child);
                self.dom.append(new_formatting, child);
            }
            self.dom.append(furthest_block, new_formatting);

            self.afe.remove(formatting_node);
            let bookmark = bookmark.min(self.afe.entries().len());
            self.afe.insert_at(bookmark, new_formatting);

            self.open_elements.stack.retain(|&id| id != formatting_node);
            let furthest_block_index = self
                .open_elements
                .stack
                .iter()
                .position(|&id| id == furthest_block)
                .unwrap();
            self.open_elements
                .stack
                .insert(furthest_block_index + 1, new_formatting);
        }
    }

    /// Mirrors [`TreeBuilder::appropriate_insertion_point`], but takes the
    /// adoption agency's common ancestor directly rather than reading the
    /// current node, since the common ancestor is not necessarily open at
    /// the top of the stack.
    fn appropriate_insertion_point_for_adoption(
        &self,
        common_ancestor: crate::dom::NodeId,
    ) -> super::InsertionPoint {
        let common_ancestor = self.redirect_into_template_contents(common_ancestor);
        let is_table_ish = self
            .dom
            .node(common_ancestor)
            .as_element()
            .is_some_and(|e| e.name.is_one_of(&["table", "tbody", "tfoot", "thead", "tr"]));
        if self.mode != InsertionMode::InTable || !is_table_ish {
            return super::InsertionPoint::Append(common_ancestor);
        }
        let Some(&table_id) = self
            .open_elements
            .stack
            .iter()
            .rev()
            .find(|&&id| self.dom.node(id).as_element().is_some_and(|e| e.name.is("table")))
        else {
            return super::InsertionPoint::Append(common_ancestor);
        };
        if self.dom.node(table_id).parent.is_some() {
            super::InsertionPoint::Before(table_id)
        } else {
            super::InsertionPoint::Append(common_ancestor)
        }
    }
}
