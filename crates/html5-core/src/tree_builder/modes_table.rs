//! Table-related insertion modes: InTable, InTableText, InCaption,
//! InColumnGroup, InTableBody, InRow, InCell, InSelect, InSelectInTable,
//! InTemplate.
//!
//! @see https://html.spec.whatwg.org/#the-in-table-insertion-mode

use super::insertion_mode::InsertionMode;
use super::TreeBuilder;
use crate::tag_name::TagName;
use crate::token::{ParseErrorCode, Token};
use crate::tokenizer::Tokenizer;

fn is_whitespace_only(s: &str) -> bool {
    s.chars().all(|c| matches!(c, ' ' | '\t' | '\n' | '\u{0c}' | '\r'))
}

impl TreeBuilder {
    pub(super) fn step_in_table(&mut self, token: Token, tok: &mut Tokenizer<'_>) {
        match token {
            Token::Character(_) if self.current_node_is_table_context() => {
                self.pending_table_text.clear();
                self.pending_table_text_non_whitespace = false;
                self.original_mode = self.mode;
                self.mode = InsertionMode::InTableText;
                self.step_in_table_text(token, tok);
            }
            Token::Comment(data) => self.insert_comment(data),
            Token::Doctype { .. } => self.parse_error(ParseErrorCode::MissingDoctypeName),
            Token::StartTag { ref name, .. } if name.is("caption") => {
                let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                self.clear_stack_back_to_table_context();
                self.afe.insert_marker();
                self.insert_html_element(name, attrs);
                self.mode = InsertionMode::InCaption;
            }
            Token::StartTag { ref name, .. } if name.is("colgroup") => {
                let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                self.clear_stack_back_to_table_context();
                self.insert_html_element(name, attrs);
                self.mode = InsertionMode::InColumnGroup;
            }
            Token::StartTag { ref name, .. } if name.is("col") => {
                self.clear_stack_back_to_table_context();
                self.insert_html_element(TagName::new("colgroup"), Vec::new());
                self.mode = InsertionMode::InColumnGroup;
                self.step_in_column_group(token, tok);
            }
            Token::StartTag { ref name, .. } if name.is_one_of(&["tbody", "tfoot", "thead"]) => {
                let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                self.clear_stack_back_to_table_context();
                self.insert_html_element(name, attrs);
                self.mode = InsertionMode::InTableBody;
            }
            Token::StartTag { ref name, .. } if name.is_one_of(&["td", "th", "tr"]) => {
                self.clear_stack_back_to_table_context();
                self.insert_html_element(TagName::new("tbody"), Vec::new());
                self.mode = InsertionMode::InTableBody;
                self.step_in_table_body(token, tok);
            }
            Token::StartTag { ref name, .. } if name.is("table") => {
                self.parse_error(ParseErrorCode::MissingEndTagName);
                if self.open_elements.has_element_in_table_scope(&self.dom, "table") {
                    self.open_elements.pop_until(&self.dom, "table");
                    self.mode = self.reset_insertion_mode_appropriately();
                    self.step_in_current_mode_reprocess(token, tok);
                }
            }
            Token::EndTag { ref name } if name.is("table") => {
                if !self.open_elements.has_element_in_table_scope(&self.dom, "table") {
                    self.parse_error(ParseErrorCode::MissingEndTagName);
                } else {
                    self.open_elements.pop_until(&self.dom, "table");
                    self.mode = self.reset_insertion_mode_appropriately();
                }
            }
            Token::EndTag { ref name }
                if name.is_one_of(&[
                    "body", "caption", "col", "colgroup", "html", "tbody", "td", "tfoot", "th",
                    "thead", "tr",
                ]) =>
            {
                self.parse_error(ParseErrorCode::MissingEndTagName);
            }
            Token::StartTag { ref name, .. } if name.is("style") => self.foreign_text_via_in_head(token, tok),
            Token::StartTag { ref name, .. } if name.is("script") => self.foreign_text_via_in_head(token, tok),
            Token::StartTag { ref name, .. } if name.is("template") => self.step_in_head(token, tok),
            Token::EndTag { ref name } if name.is("template") => self.step_in_head(token, tok),
            Token::StartTag { ref name, .. } if name.is("input") => {
                let is_hidden = matches!(&token, Token::StartTag { attrs, .. }
                    if attrs.iter().any(|a| a.name.as_ref() == "type" && a.value.eq_ignore_ascii_case("hidden")));
                if is_hidden {
                    self.parse_error(ParseErrorCode::MissingEndTagName);
                    let Token::StartTag { name, attrs, self_closing } = token else { unreachable!() };
                    self.insert_html_element(name, attrs);
                    self.open_elements.pop();
                    self.acknowledge_self_closing(self_closing);
                } else {
                    self.foster_parented_in_body(token, tok);
                }
            }
            Token::StartTag { ref name, .. } if name.is("form") => {
                self.parse_error(ParseErrorCode::MissingEndTagName);
                if self.form_element.is_none() && !self.open_elements.contains_template(&self.dom) {
                    let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                    let form = self.insert_html_element(name, attrs);
                    self.form_element = Some(form);
                    self.open_elements.pop();
                }
            }
            Token::Eof => self.step_in_body(token, tok),
            other => self.foster_parented_in_body(other, tok),
        }
    }

    fn current_node_is_table_context(&self) -> bool {
        self.current_node_is("table")
            || self.current_node_is("tbody")
            || self.current_node_is("tfoot")
            || self.current_node_is("thead")
            || self.current_node_is("tr")
    }

    fn clear_stack_back_to_table_context(&mut self) {
        self.open_elements
            .pop_while(&self.dom, |name| !matches!(name, "table" | "template" | "html"));
    }

    fn clear_stack_back_to_table_body_context(&mut self) {
        self.open_elements.pop_while(&self.dom, |name| {
            !matches!(name, "tbody" | "tfoot" | "thead" | "template" | "html")
        });
    }

    fn clear_stack_back_to_table_row_context(&mut self) {
        self.open_elements
            .pop_while(&self.dom, |name| !matches!(name, "tr" | "template" | "html"));
    }

    /// Runs a token through `step_in_body`'s "anything else" foster-parenting
    /// behavior used by several InTable branches.
    fn foster_parented_in_body(&mut self, token: Token, tok: &mut Tokenizer<'_>) {
        self.parse_error(ParseErrorCode::MissingEndTagName);
        self.step_in_body(token, tok);
    }

    fn foreign_text_via_in_head(&mut self, token: Token, tok: &mut Tokenizer<'_>) {
        self.step_in_head(token, tok);
    }

    fn step_in_current_mode_reprocess(&mut self, token: Token, tok: &mut Tokenizer<'_>) {
        self.process_in_current_mode(token, tok);
    }

    pub(super) fn step_in_table_text(&mut self, token: Token, tok: &mut Tokenizer<'_>) {
        match token {
            Token::Character(ref s) if s.contains('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
            }
            Token::Character(s) => {
                if !is_whitespace_only(&s) {
                    self.pending_table_text_non_whitespace = true;
                }
                self.pending_table_text.push_str(&s);
            }
            other => {
                self.flush_pending_table_text();
                self.mode = self.original_mode;
                self.process_in_current_mode(other, tok);
            }
        }
    }

    pub(super) fn step_in_caption(&mut self, token: Token, tok: &mut Tokenizer<'_>) {
        match token {
            Token::EndTag { ref name } if name.is("caption") => {
                if !self.open_elements.has_element_in_table_scope(&self.dom, "caption") {
                    self.parse_error(ParseErrorCode::MissingEndTagName);
                } else {
                    self.generate_implied_end_tags(None);
                    self.open_elements.pop_until(&self.dom, "caption");
                    self.afe.clear_to_last_marker();
                    self.mode = InsertionMode::InTable;
                }
            }
            Token::StartTag { ref name, .. }
                if name.is_one_of(&[
                    "caption", "col", "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr",
                ]) =>
            {
                if !self.open_elements.has_element_in_table_scope(&self.dom, "caption") {
                    self.parse_error(ParseErrorCode::MissingEndTagName);
                } else {
                    self.open_elements.pop_until(&self.dom, "caption");
                    self.afe.clear_to_last_marker();
                    self.mode = InsertionMode::InTable;
                    self.step_in_table(token, tok);
                }
            }
            Token::EndTag { ref name } if name.is_one_of(&["body", "col", "colgroup", "html", "tbody", "td", "tfoot", "th", "thead", "tr"]) => {
                self.parse_error(ParseErrorCode::MissingEndTagName);
            }
            Token::EndTag { ref name } if name.is("table") => {
                if !self.open_elements.has_element_in_table_scope(&self.dom, "caption") {
                    self.parse_error(ParseErrorCode::MissingEndTagName);
                } else {
                    self.open_elements.pop_until(&self.dom, "caption");
                    self.afe.clear_to_last_marker();
                    self.mode = InsertionMode::InTable;
                    self.step_in_table(token, tok);
                }
            }
            other => self.step_in_body(other, tok),
        }
    }

    pub(super) fn step_in_column_group(&mut self, token: Token, tok: &mut Tokenizer<'_>) {
        match token {
            Token::Character(ref s) if is_whitespace_only(s) => self.insert_character(s),
            Token::Comment(data) => self.insert_comment(data),
            Token::Doctype { .. } => self.parse_error(ParseErrorCode::MissingDoctypeName),
            Token::StartTag { ref name, .. } if name.is("html") => self.step_in_body(token, tok),
            Token::StartTag { ref name, .. } if name.is("col") => {
                let Token::StartTag { name, attrs, self_closing } = token else { unreachable!() };
                self.insert_html_element(name, attrs);
                self.open_elements.pop();
                self.acknowledge_self_closing(self_closing);
            }
            Token::EndTag { ref name } if name.is("colgroup") => {
                if !self.current_node_is("colgroup") {
                    self.parse_error(ParseErrorCode::MissingEndTagName);
                } else {
                    self.open_elements.pop();
                    self.mode = InsertionMode::InTable;
                }
            }
            Token::EndTag { ref name } if name.is("col") => {
                self.parse_error(ParseErrorCode::MissingEndTagName);
            }
            Token::EndTag { ref name } if name.is("template") => self.step_in_head(token, tok),
            Token::Eof => self.step_in_body(token, tok),
            other => {
                if !self.current_node_is("colgroup") {
                    self.parse_error(ParseErrorCode::MissingEndTagName);
                } else {
                    self.open_elements.pop();
                    self.mode = InsertionMode::InTable;
                    self.step_in_table(other, tok);
                }
            }
        }
    }

    pub(super) fn step_in_table_body(&mut self, token: Token, tok: &mut Tokenizer<'_>) {
        match token {
            Token::StartTag { ref name, .. } if name.is("tr") => {
                let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                self.clear_stack_back_to_table_body_context();
                self.insert_html_element(name, attrs);
                self.mode = InsertionMode::InRow;
            }
            Token::StartTag { ref name, .. } if name.is_one_of(&["th", "td"]) => {
                self.parse_error(ParseErrorCode::MissingEndTagName);
                self.clear_stack_back_to_table_body_context();
                self.insert_html_element(TagName::new("tr"), Vec::new());
                self.mode = InsertionMode::InRow;
                self.step_in_row(token, tok);
            }
            Token::EndTag { ref name } if name.is_one_of(&["tbody", "tfoot", "thead"]) => {
                if !self.open_elements.has_element_in_table_scope(&self.dom, name.as_str()) {
                    self.parse_error(ParseErrorCode::MissingEndTagName);
                } else {
                    self.clear_stack_back_to_table_body_context();
                    self.open_elements.pop();
                    self.mode = InsertionMode::InTable;
                }
            }
            Token::StartTag { ref name, .. }
                if name.is_one_of(&["caption", "col", "colgroup", "tbody", "tfoot", "thead"]) =>
            {
                if !self.open_elements.contains_in_default_scope(&self.dom, &["tbody", "thead", "tfoot"]) {
                    self.parse_error(ParseErrorCode::MissingEndTagName);
                } else {
                    self.clear_stack_back_to_table_body_context();
                    self.open_elements.pop();
                    self.mode = InsertionMode::InTable;
                    self.step_in_table(token, tok);
                }
            }
            Token::EndTag { ref name } if name.is("table") => {
                if !self.open_elements.contains_in_default_scope(&self.dom, &["tbody", "thead", "tfoot"]) {
                    self.parse_error(ParseErrorCode::MissingEndTagName);
                } else {
                    self.clear_stack_back_to_table_body_context();
                    self.open_elements.pop();
                    self.mode = InsertionMode::InTable;
                    self.step_in_table(token, tok);
                }
            }
            Token::EndTag { ref name }
                if name.is_one_of(&["body", "caption", "col", "colgroup", "html", "td", "th", "tr"]) =>
            {
                self.parse_error(ParseErrorCode::MissingEndTagName);
            }
            other => self.step_in_table(other, tok),
        }
    }

    pub(super) fn step_in_row(&mut self, token: Token, tok: &mut Tokenizer<'_>) {
        match token {
            Token::StartTag { ref name, .. } if name.is_one_of(&["th", "td"]) => {
                let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                self.clear_stack_back_to_table_row_context();
                self.insert_html_element(name, attrs);
                self.mode = InsertionMode::InCell;
                self.afe.insert_marker();
            }
            Token::EndTag { ref name } if name.is("tr") => {
                if !self.open_elements.has_element_in_table_scope(&self.dom, "tr") {
                    self.parse_error(ParseErrorCode::MissingEndTagName);
                } else {
                    self.clear_stack_back_to_table_row_context();
                    self.open_elements.pop();
                    self.mode = InsertionMode::InTableBody;
                }
            }
            Token::StartTag { ref name, .. }
                if name.is_one_of(&["caption", "col", "colgroup", "tbody", "tfoot", "thead", "tr"]) =>
            {
                if !self.open_elements.has_element_in_table_scope(&self.dom, "tr") {
                    self.parse_error(ParseErrorCode::MissingEndTagName);
                } else {
                    self.clear_stack_back_to_table_row_context();
                    self.open_elements.pop();
                    self.mode = InsertionMode::InTableBody;
                    self.step_in_table_body(token, tok);
                }
            }
            Token::EndTag { ref name } if name.is_one_of(&["tbody", "tfoot", "thead"]) => {
                if !self.open_elements.has_element_in_table_scope(&self.dom, name.as_str()) {
                    self.parse_error(ParseErrorCode::MissingEndTagName);
                } else if self.open_elements.has_element_in_table_scope(&self.dom, "tr") {
                    self.clear_stack_back_to_table_row_context();
                    self.open_elements.pop();
                    self.mode = InsertionMode::InTableBody;
                    self.step_in_table_body(token, tok);
                }
            }
            Token::EndTag { ref name }
                if name.is_one_of(&["body", "caption", "col", "colgroup", "html", "td", "th"]) =>
            {
                self.parse_error(ParseErrorCode::MissingEndTagName);
            }
            Token::EndTag { ref name } if name.is("table") => {
                if !self.open_elements.has_element_in_table_scope(&self.dom, "tr") {
                    self.parse_error(ParseErrorCode::MissingEndTagName);
                } else {
                    self.clear_stack_back_to_table_row_context();
                    self.open_elements.pop();
                    self.mode = InsertionMode::InTableBody;
                    self.step_in_table_body(token, tok);
                }
            }
            other => self.step_in_table(other, tok),
        }
    }

    pub(super) fn step_in_cell(&mut self, token: Token, tok: &mut Tokenizer<'_>) {
        match token {
            Token::EndTag { ref name } if name.is_one_of(&["td", "th"]) => {
                let tag = name.as_str().to_string();
                if !self.open_elements.has_element_in_table_scope(&self.dom, &tag) {
                    self.parse_error(ParseErrorCode::MissingEndTagName);
                } else {
                    self.generate_implied_end_tags(None);
                    self.open_elements.pop_until(&self.dom, &tag);
                    self.afe.clear_to_last_marker();
                    self.mode = InsertionMode::InRow;
                }
            }
            Token::StartTag { ref name, .. }
                if name.is_one_of(&[
                    "caption", "col", "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr",
                ]) =>
            {
                if !self.open_elements.contains_in_default_scope(&self.dom, &["td", "th"]) {
                    self.parse_error(ParseErrorCode::MissingEndTagName);
                } else {
                    self.close_table_cell();
                    self.step_in_row(token, tok);
                }
            }
            Token::EndTag { ref name } if name.is_one_of(&["body", "caption", "col", "colgroup", "html"]) => {
                self.parse_error(ParseErrorCode::MissingEndTagName);
            }
            Token::EndTag { ref name } if name.is_one_of(&["table", "tbody", "tfoot", "thead", "tr"]) => {
                if !self.open_elements.has_element_in_table_scope(&self.dom, name.as_str()) {
                    self.parse_error(ParseErrorCode::MissingEndTagName);
                } else {
                    self.close_table_cell();
                    self.step_in_row(token, tok);
                }
            }
            other => self.step_in_body(other, tok),
        }
    }

    fn close_table_cell(&mut self) {
        self.generate_implied_end_tags(None);
        if !self.current_node_is("td") && !self.current_node_is("th") {
            self.parse_error(ParseErrorCode::MissingEndTagName);
        }
        self.open_elements
            .pop_while(&self.dom, |name| name != "td" && name != "th");
        self.open_elements.pop();
        self.afe.clear_to_last_marker();
        self.mode = InsertionMode::InRow;
    }

    pub(super) fn step_in_select(&mut self, token: Token, tok: &mut Tokenizer<'_>) {
        match token {
            Token::Character(ref s) if s.contains('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
            }
            Token::Character(s) => self.insert_character(&s),
            Token::Comment(data) => self.insert_comment(data),
            Token::Doctype { .. } => self.parse_error(ParseErrorCode::MissingDoctypeName),
            Token::StartTag { ref name, .. } if name.is("html") => self.step_in_body(token, tok),
            Token::StartTag { ref name, .. } if name.is("option") => {
                let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                if self.current_node_is("option") {
                    self.open_elements.pop();
                }
                self.insert_html_element(name, attrs);
            }
            Token::StartTag { ref name, .. } if name.is("optgroup") => {
                let Token::StartTag { name, attrs, .. } = token else { unreachable!() };
                if self.current_node_is("option") {
                    self.open_elements.pop();
                }
                if self.current_node_is("optgroup") {
                    self.open_elements.pop();
                }
                self.insert_html_element(name, attrs);
            }
            Token::EndTag { ref name } if name.is("optgroup") => {
                let second_is_optgroup = self.open_elements.stack.len() >= 2
                    && self
                        .dom
                        .node(self.open_elements.stack[self.open_elements.stack.len() - 2])
                        .as_element()
                        .is_some_and(|e| e.name.is("optgroup"));
                if self.current_node_is("option") && second_is_optgroup {
                    self.open_elements.pop();
                }
                if self.current_node_is("optgroup") {
                    self.open_elements.pop();
                } else {
                    self.parse_error(ParseErrorCode::MissingEndTagName);
                }
            }
            Token::EndTag { ref name } if name.is("option") => {
                if self.current_node_is("option") {
                    self.open_elements.pop();
                } else {
                    self.parse_error(ParseErrorCode::MissingEndTagName);
                }
            }
            Token::EndTag { ref name } if name.is("select") => {
                if !self.open_elements.has_element_in_select_scope(&self.dom, "select") {
                    self.parse_error(ParseErrorCode::MissingEndTagName);
                } else {
                    self.open_elements.pop_until(&self.dom, "select");
                    self.mode = self.reset_insertion_mode_appropriately();
                }
            }
            Token::StartTag { ref name, .. } if name.is("select") => {
                self.parse_error(ParseErrorCode::MissingEndTagName);
                self.open_elements.pop_until(&self.dom, "select");
                self.mode = self.reset_insertion_mode_appropriately();
            }
            Token::StartTag { ref name, .. } if name.is_one_of(&["input", "keygen", "textarea"]) => {
                self.parse_error(ParseErrorCode::MissingEndTagName);
                if self.open_elements.has_element_in_select_scope(&self.dom, "select") {
                    self.open_elements.pop_until(&self.dom, "select");
                    self.mode = self.reset_insertion_mode_appropriately();
                    self.process_in_current_mode(token, tok);
                }
            }
            Token::StartTag { ref name, .. } if name.is("script") || name.is("template") => self.step_in_head(token, tok),
            Token::EndTag { ref name } if name.is("template") => self.step_in_head(token, tok),
            Token::Eof => self.step_in_body(token, tok),
            _ => {}
        }
    }

    pub(super) fn step_in_select_in_table(&mut self, token: Token, tok: &mut Tokenizer<'_>) {
        match token {
            Token::StartTag { ref name, .. }
                if name.is_one_of(&["caption", "table", "tbody", "tfoot", "thead", "tr", "td", "th"]) =>
            {
                self.parse_error(ParseErrorCode::MissingEndTagName);
                self.open_elements.pop_until(&self.dom, "select");
                self.mode = self.reset_insertion_mode_appropriately();
                self.process_in_current_mode(token, tok);
            }
            Token::EndTag { ref name }
                if name.is_one_of(&["caption", "table", "tbody", "tfoot", "thead", "tr", "td", "th"]) =>
            {
                if self.open_elements.has_element_in_table_scope(&self.dom, name.as_str()) {
                    self.open_elements.pop_until(&self.dom, "select");
                    self.mode = self.reset_insertion_mode_appropriately();
                    self.process_in_current_mode(token, tok);
                } else {
                    self.parse_error(ParseErrorCode::MissingEndTagName);
                }
            }
            other => self.step_in_select(other, tok),
        }
    }

    pub(super) fn step_in_template(&mut self, token: Token, tok: &mut Tokenizer<'_>) {
        match token {
            Token::Character(_) | Token::Comment(_) | Token::Doctype { .. } => self.step_in_body(token, tok),
            Token::StartTag { ref name, .. }
                if name.is_one_of(&[
                    "base", "basefont", "bgsound", "link", "meta", "noframes", "script", "style",
                    "template", "title",
                ]) =>
            {
                self.step_in_head(token, tok);
            }
            Token::EndTag { ref name } if name.is("template") => self.step_in_head(token, tok),
            Token::StartTag { ref name, .. }
                if name.is_one_of(&["caption", "colgroup", "tbody", "tfoot", "thead"]) =>
            {
                self.template_modes.pop();
                self.template_modes.push(InsertionMode::InTable);
                self.mode = InsertionMode::InTable;
                self.step_in_table(token, tok);
            }
            Token::StartTag { ref name, .. } if name.is("col") => {
                self.template_modes.pop();
                self.template_modes.push(InsertionMode::InColumnGroup);
                self.mode = InsertionMode::InColumnGroup;
                self.step_in_column_group(token, tok);
            }
            Token::StartTag { ref name, .. } if name.is("tr") => {
                self.template_modes.pop();
                self.template_modes.push(InsertionMode::InTableBody);
                self.mode = InsertionMode::InTableBody;
                self.step_in_table_body(token, tok);
            }
            Token::StartTag { ref name, .. } if name.is_one_of(&["td", "th"]) => {
                self.template_modes.pop();
                self.template_modes.push(InsertionMode::InRow);
                self.mode = InsertionMode::InRow;
                self.step_in_row(token, tok);
            }
            Token::StartTag { .. } => {
                self.template_modes.pop();
                self.template_modes.push(InsertionMode::InBody);
                self.mode = InsertionMode::InBody;
                self.step_in_body(token, tok);
            }
            Token::EndTag { .. } => self.parse_error(ParseErrorCode::MissingEndTagName),
            Token::Eof => {
                if !self.open_elements.contains_template(&self.dom) {
                    self.done = true;
                } else {
                    self.parse_error(ParseErrorCode::EofInTag);
                    self.open_elements.pop_until(&self.dom, "template");
                    self.afe.clear_to_last_marker();
                    self.template_modes.pop();
                    self.mode = self.reset_insertion_mode_appropriately();
                    self.process_in_current_mode(token, tok);
                }
            }
        }
    }
}
