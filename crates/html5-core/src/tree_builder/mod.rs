//! Tree construction: the insertion-mode state machine that consumes
//! [`Token`]s and builds a [`Dom`].
//!
//! Grounded on the reference's `html_processor.rs` and its submodules for
//! the `ProcessorState` field set, the `InsertionMode` names, and the
//! `UnsupportedException` taxonomy, but rebuilt around an owned arena `Dom`
//! rather than the reference's `element_queue`/`HTMLStackEvent` push-pop
//! event stream, since this crate returns a genuine tree rather than a
//! cursor API.
//!
//! @see https://html.spec.whatwg.org/#tree-construction

pub mod active_formatting;
pub mod errors;
pub mod foreign;
pub mod insertion_mode;
pub mod open_elements;

use crate::dom::{Attribute, Dom, Namespace, NodeId, NodeKind};
use crate::tag_name::{self, TagName};
use crate::token::{ParseError, ParseErrorCode, Token, TokenAttribute};
use crate::tokenizer::{TokenSink, Tokenizer, TokenizerState};
use crate::Options;
use active_formatting::ActiveFormattingElements;
use insertion_mode::InsertionMode;
use open_elements::OpenElementsStack;

const IMPLIED_END_TAGS: &[&str] = &["dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc"];
const IMPLIED_END_TAGS_THOROUGH: &[&str] = &[
    "caption", "colgroup", "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc",
    "tbody", "td", "tfoot", "th", "thead", "tr",
];
const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];
const TABLE_CONTEXT_TAGS: &[&str] = &["table", "tbody", "tfoot", "thead", "tr"];

#[derive(Clone, Copy)]
enum InsertionPoint {
    Append(NodeId),
    Before(NodeId),
}

pub struct TreeBuilder {
    dom: Dom,
    options: Options,
    open_elements: OpenElementsStack,
    afe: ActiveFormattingElements,
    mode: InsertionMode,
    original_mode: InsertionMode,
    template_modes: Vec<InsertionMode>,
    head_element: Option<NodeId>,
    form_element: Option<NodeId>,
    frameset_ok: bool,
    pending_table_text: String,
    pending_table_text_non_whitespace: bool,
    fragment_context: Option<TagName>,
    quirks_mode: crate::compat_mode::CompatMode,
    /// Set right after inserting a `<pre>`/`<textarea>`/`<listing>` element;
    /// a single leading U+000A is swallowed from the very next character
    /// token, per the "if the next token is a U+000A... ignore it" clauses.
    ///
    /// @see https://html.spec.whatwg.org/#parsing-html-fragments
    ignore_next_lf: bool,
    done: bool,
    errors: Vec<ParseError>,
    fatal_error: Option<ParseError>,
}

impl TreeBuilder {
    pub fn new(options: Options) -> Self {
        Self {
            dom: Dom::new(),
            options,
            open_elements: OpenElementsStack::new(),
            afe: ActiveFormattingElements::new(),
            mode: InsertionMode::Initial,
            original_mode: InsertionMode::Initial,
            template_modes: Vec::new(),
            head_element: None,
            form_element: None,
            frameset_ok: true,
            pending_table_text: String::new(),
            pending_table_text_non_whitespace: false,
            fragment_context: None,
            quirks_mode: crate::compat_mode::CompatMode::NoQuirks,
            ignore_next_lf: false,
            done: false,
            errors: Vec::new(),
            fatal_error: None,
        }
    }

    pub fn into_dom(self) -> Dom {
        self.dom
    }

    pub fn take_errors(&mut self) -> Vec<ParseError> {
        std::mem::take(&mut self.errors)
    }

    pub fn take_fatal_error(&mut self) -> Option<ParseError> {
        self.fatal_error.take()
    }

    pub fn run(&mut self, bytes: &[u8]) {
        let mut tokenizer = Tokenizer::new(bytes);
        loop {
            let token = tokenizer.next_token(self);
            let is_eof = matches!(token, Token::Eof);
            self.dispatch(token, &mut tokenizer);
            if is_eof || self.done {
                break;
            }
        }
    }

    /// Fragment parsing: creates a detached `html` root, seeds the stack
    /// and insertion mode as though `context_element` were the context
    /// node, then runs the ordinary tree construction loop against it.
    ///
    /// @see https://html.spec.whatwg.org/#parsing-html-fragments
    pub fn run_fragment(&mut self, bytes: &[u8], context_element: &str) {
        let context = TagName::new(context_element);
        self.fragment_context = Some(context.clone());

        let root = self.dom.create_element(TagName::new("html"), Namespace::Html, Vec::new(), false);
        self.open_elements.push(root);

        if context.is("template") {
            self.template_modes.push(InsertionMode::InTemplate);
        }

        self.mode = self.reset_insertion_mode_appropriately();

        if context.is("title") || context.is("textarea") {
            // Handled via the tokenizer state directly below.
        }

        let mut tokenizer = Tokenizer::new(bytes);
        if matches!(context.as_str(), "title" | "textarea") {
            tokenizer.set_state(TokenizerState::RcData);
            tokenizer.set_last_start_tag_name(context.clone());
        } else if matches!(
            context.as_str(),
            "style" | "xmp" | "iframe" | "noembed" | "noframes"
        ) {
            tokenizer.set_state(TokenizerState::RawText);
            tokenizer.set_last_start_tag_name(context.clone());
        } else if context.is("script") {
            tokenizer.set_state(TokenizerState::ScriptData);
            tokenizer.set_last_start_tag_name(context.clone());
        } else if context.is("plaintext") {
            tokenizer.set_state(TokenizerState::Plaintext);
        }

        loop {
            let token = tokenizer.next_token(self);
            let is_eof = matches!(token, Token::Eof);
            self.dispatch(token, &mut tokenizer);
            if is_eof || self.done {
                break;
            }
        }

        let fragment = self.dom.create_fragment();
        let children: Vec<NodeId> = self.dom.children(root).collect();
        for child in children {
            self.dom.append(fragment, child);
        }
        self.dom.document = fragment;
    }

    // ---- Tree construction dispatcher -----------------------------------

    /// Decides whether `token` is processed by HTML insertion-mode rules or
    /// by the foreign-content rules, per the tree construction dispatcher.
    ///
    /// @see https://html.spec.whatwg.org/#tree-construction-dispatcher
    fn dispatch(&mut self, token: Token, tok: &mut Tokenizer<'_>) {
        let token = self.consume_ignore_next_lf(token);
        let use_html_rules = self.open_elements.is_empty() || self.current_node_is_html_rules_eligible(&token);

        if use_html_rules {
            self.process_in_current_mode(token, tok);
        } else {
            self.step_in_foreign_content(token, tok);
        }
    }

    fn current_node_is_html_rules_eligible(&self, token: &Token) -> bool {
        let Some(current) = self.open_elements.current_node() else {
            return true;
        };
        let Some(el) = self.dom.node(current).as_element() else {
            return true;
        };
        if el.namespace == Namespace::Html {
            return true;
        }
        if foreign::is_integration_point(el) {
            if el.namespace == Namespace::MathMl {
                return matches!(
                    token,
                    Token::Character(_) | Token::StartTag { .. }
                ) && !matches!(token, Token::StartTag { name, .. } if name.is_one_of(&["mglyph", "malignmark"]));
            }
            return true;
        }
        if el.namespace == Namespace::MathMl && el.name.is("annotation-xml") {
            if let Token::StartTag { name, .. } = token {
                if name.is("svg") {
                    return true;
                }
            }
        }
        matches!(token, Token::Eof)
    }

    fn process_in_current_mode(&mut self, token: Token, tok: &mut Tokenizer<'_>) {
        match self.mode {
            InsertionMode::Initial => self.step_initial(token, tok),
            InsertionMode::BeforeHtml => self.step_before_html(token, tok),
            InsertionMode::BeforeHead => self.step_before_head(token, tok),
            InsertionMode::InHead => self.step_in_head(token, tok),
            InsertionMode::InHeadNoscript => self.step_in_head_noscript(token, tok),
            InsertionMode::AfterHead => self.step_after_head(token, tok),
            InsertionMode::InBody => self.step_in_body(token, tok),
            InsertionMode::Text => self.step_text(token, tok),
            InsertionMode::InTable => self.step_in_table(token, tok),
            InsertionMode::InTableText => self.step_in_table_text(token, tok),
            InsertionMode::InCaption => self.step_in_caption(token, tok),
            InsertionMode::InColumnGroup => self.step_in_column_group(token, tok),
            InsertionMode::InTableBody => self.step_in_table_body(token, tok),
            InsertionMode::InRow => self.step_in_row(token, tok),
            InsertionMode::InCell => self.step_in_cell(token, tok),
            InsertionMode::InSelect => self.step_in_select(token, tok),
            InsertionMode::InSelectInTable => self.step_in_select_in_table(token, tok),
            InsertionMode::InTemplate => self.step_in_template(token, tok),
            InsertionMode::AfterBody => self.step_after_body(token, tok),
            InsertionMode::InFrameset => self.step_in_frameset(token, tok),
            InsertionMode::AfterFrameset => self.step_after_frameset(token, tok),
            InsertionMode::AfterAfterBody => self.step_after_after_body(token, tok),
            InsertionMode::AfterAfterFrameset => self.step_after_after_frameset(token, tok),
        }
    }

    // ---- Shared helpers ---------------------------------------------------

    fn current_node(&self) -> Option<NodeId> {
        self.open_elements.current_node()
    }

    fn consume_ignore_next_lf(&mut self, token: Token) -> Token {
        if !self.ignore_next_lf {
            return token;
        }
        self.ignore_next_lf = false;
        match token {
            Token::Character(s) if s.starts_with('\n') => Token::Character(s[1..].to_string()),
            other => other,
        }
    }

    fn current_node_is(&self, name: &str) -> bool {
        self.current_node()
            .and_then(|id| self.dom.node(id).as_element().map(|e| e.name.is(name)))
            .unwrap_or(false)
    }

    fn appropriate_insertion_point(&self, override_target: Option<NodeId>) -> InsertionPoint {
        let target = override_target.unwrap_or_else(|| self.current_node().unwrap_or(self.dom.document));
        let target = self.redirect_into_template_contents(target);

        if self.mode != InsertionMode::InTable {
            return InsertionPoint::Append(target);
        }
        let is_table_ish = self
            .dom
            .node(target)
            .as_element()
            .is_some_and(|e| e.name.is_one_of(TABLE_CONTEXT_TAGS));
        if !is_table_ish {
            return InsertionPoint::Append(target);
        }

        let Some(&table_id) = self
            .open_elements
            .stack
            .iter()
            .rev()
            .find(|&&id| self.dom.node(id).as_element().is_some_and(|e| e.name.is("table")))
        else {
            return InsertionPoint::Append(self.current_node().unwrap_or(self.dom.document));
        };

        if self.dom.node(table_id).parent.is_some() {
            InsertionPoint::Before(table_id)
        } else {
            let idx = self.open_elements.stack.iter().position(|&id| id == table_id).unwrap();
            let foster_parent = self.open_elements.stack[idx.saturating_sub(1)];
            InsertionPoint::Append(foster_parent)
        }
    }

    fn insert_node_at(&mut self, point: InsertionPoint, node: NodeId) {
        match point {
            InsertionPoint::Append(parent) => self.dom.append(parent, node),
            InsertionPoint::Before(sibling) => self.dom.insert_before(sibling, node),
        }
    }

    fn insert_character(&mut self, text: &str) {
        match self.appropriate_insertion_point(None) {
            InsertionPoint::Append(parent) => self.dom.insert_text(parent, text),
            InsertionPoint::Before(sibling) => {
                let coalesced = self.dom.node(sibling).prev_sibling.is_some_and(|prev| self.dom.node(prev).is_text());
                if coalesced {
                    let prev = self.dom.node(sibling).prev_sibling.unwrap();
                    if let NodeKind::Text(s) = &mut self.dom.node_mut(prev).kind {
                        s.push_str(text);
                        return;
                    }
                }
                let node = self.dom.create_text(text);
                self.dom.insert_before(sibling, node);
            }
        }
    }

    fn insert_comment(&mut self, data: Box<str>) {
        let node = self.dom.create_comment(data);
        self.insert_node_at(self.appropriate_insertion_point(None), node);
    }

    fn create_element_for_tag(&mut self, name: TagName, attrs: Vec<TokenAttribute>, namespace: Namespace) -> NodeId {
        let is_template = name.is("template");
        let attrs = attrs
            .into_iter()
            .map(|a| Attribute { name: a.name, value: a.value })
            .collect();
        let node = self.dom.create_element(name, namespace, attrs, false);

        // A template element's contents live in a detached fragment, never
        // as direct children of the element itself.
        //
        // @see https://html.spec.whatwg.org/#the-template-element
        if is_template {
            let content = self.dom.create_fragment();
            self.dom.node_mut(node).as_element_mut().unwrap().template_content = Some(content);
        }
        node
    }

    /// Where `id` is a `<template>` element, children are actually inserted
    /// into its content fragment rather than the element itself.
    ///
    /// @see https://html.spec.whatwg.org/#appropriate-place-for-inserting-a-node
    fn redirect_into_template_contents(&self, id: NodeId) -> NodeId {
        match self.dom.node(id).as_element() {
            Some(e) if e.name.is("template") => e.template_content.unwrap_or(id),
            _ => id,
        }
    }

    fn insert_html_element(&mut self, name: TagName, attrs: Vec<TokenAttribute>) -> NodeId {
        let node = self.create_element_for_tag(name, attrs, Namespace::Html);
        self.insert_node_at(self.appropriate_insertion_point(None), node);
        self.open_elements.push(node);
        node
    }

    fn insert_foreign_element(&mut self, name: TagName, attrs: Vec<TokenAttribute>, namespace: Namespace) -> NodeId {
        let qualified: Vec<TokenAttribute> = attrs
            .into_iter()
            .map(|a| {
                let renamed = crate::attributes::qualified_attribute_name(a.name.as_bytes(), namespace);
                TokenAttribute {
                    name: String::from_utf8_lossy(&renamed).into_owned().into_boxed_str(),
                    value: a.value,
                }
            })
            .collect();
        let node = self.create_element_for_tag(name, qualified, namespace);
        self.insert_node_at(self.appropriate_insertion_point(None), node);
        self.open_elements.push(node);
        node
    }

    fn generate_implied_end_tags(&mut self, except: Option<&str>) {
        self.open_elements
            .pop_while(&self.dom, |name| IMPLIED_END_TAGS.contains(&name) && Some(name) != except);
    }

    fn generate_implied_end_tags_thoroughly(&mut self) {
        self.open_elements
            .pop_while(&self.dom, |name| IMPLIED_END_TAGS_THOROUGH.contains(&name));
    }

    fn close_p_element(&mut self) {
        self.generate_implied_end_tags(Some("p"));
        self.open_elements.pop_until(&self.dom, "p");
    }

    fn reconstruct_active_formatting_elements(&mut self) {
        self.afe.reconstruct(&mut self.dom, &mut self.open_elements);
    }

    fn acknowledge_self_closing(&self, _self_closing: bool) {
        // No out-of-band side effects (e.g. XML-external parsing) are
        // performed for self-closing void elements; nothing to do.
    }

    /// @see https://html.spec.whatwg.org/#reset-the-insertion-mode-appropriately
    fn reset_insertion_mode_appropriately(&self) -> InsertionMode {
        for (i, &id) in self.open_elements.stack.iter().enumerate().rev() {
            let last = i == 0;
            // At the bottom of the stack, fragment parsing substitutes the
            // context element for the (synthetic) node actually on the stack.
            let name = if last {
                if let Some(context) = &self.fragment_context {
                    context.clone()
                } else {
                    let Some(el) = self.dom.node(id).as_element() else {
                        continue;
                    };
                    el.name.clone()
                }
            } else {
                let Some(el) = self.dom.node(id).as_element() else {
                    continue;
                };
                el.name.clone()
            };
            match name.as_str() {
                "select" => {
                    for &ancestor in self.open_elements.stack[..i].iter().rev() {
                        if let Some(a) = self.dom.node(ancestor).as_element() {
                            if a.name.is("template") {
                                break;
                            }
                            if a.name.is("table") {
                                return InsertionMode::InSelectInTable;
                            }
                        }
                    }
                    return InsertionMode::InSelect;
                }
                "td" | "th" if !last => return InsertionMode::InCell,
                "tr" => return InsertionMode::InRow,
                "tbody" | "thead" | "tfoot" => return InsertionMode::InTableBody,
                "caption" => return InsertionMode::InCaption,
                "colgroup" => return InsertionMode::InColumnGroup,
                "table" => return InsertionMode::InTable,
                "template" => return *self.template_modes.last().unwrap_or(&InsertionMode::InBody),
                "head" if !last => return InsertionMode::InHead,
                "body" => return InsertionMode::InBody,
                "frameset" => return InsertionMode::InFrameset,
                "html" => {
                    return if self.head_element.is_some() {
                        InsertionMode::AfterHead
                    } else {
                        InsertionMode::BeforeHead
                    };
                }
                _ if last => return InsertionMode::InBody,
                _ => {}
            }
        }
        InsertionMode::InBody
    }

    fn record_parse_error(&mut self, code: ParseErrorCode, offset: usize) {
        if self.options.collect_errors {
            self.errors.push(ParseError { code, offset });
        }
        log::debug!("parse error: {code} at {offset}");
        if self.options.strict && self.fatal_error.is_none() {
            self.fatal_error = Some(ParseError { code, offset });
            self.done = true;
        }
    }

    fn parse_error(&mut self, code: ParseErrorCode) {
        self.record_parse_error(code, 0);
    }

    fn flush_pending_table_text(&mut self) {
        if self.pending_table_text.is_empty() {
            return;
        }
        if self.pending_table_text_non_whitespace {
            let text = std::mem::take(&mut self.pending_table_text);
            self.foster_parent_text(&text);
        } else {
            let text = std::mem::take(&mut self.pending_table_text);
            self.insert_character(&text);
        }
        self.pending_table_text_non_whitespace = false;
    }

    fn foster_parent_text(&mut self, text: &str) {
        let saved = self.mode;
        self.mode = InsertionMode::InTable;
        self.insert_character(text);
        self.mode = saved;
    }
}

mod modes_before_body;
mod modes_body;
mod modes_table;
mod modes_text_and_after;
mod foreign_content;

impl TokenSink for TreeBuilder {
    fn parse_error(&mut self, code: ParseErrorCode, offset: usize) {
        self.record_parse_error(code, offset);
    }
}

#[cfg(test)]
mod tests {
    use crate::dom::{Dom, NodeId, NodeKind};
    use crate::{parse, parse_fragment, Options};

    /// Depth-first search for the first element named `tag`.
    fn find(dom: &Dom, start: NodeId, tag: &str) -> Option<NodeId> {
        if let NodeKind::Element(e) = &dom.node(start).kind {
            if e.name.is(tag) {
                return Some(start);
            }
        }
        for child in dom.children(start) {
            if let Some(found) = find(dom, child, tag) {
                return Some(found);
            }
        }
        None
    }

    fn tag_names(dom: &Dom, start: NodeId) -> Vec<String> {
        let mut out = Vec::new();
        collect_tag_names(dom, start, &mut out);
        out
    }

    fn collect_tag_names(dom: &Dom, node: NodeId, out: &mut Vec<String>) {
        if let NodeKind::Element(e) = &dom.node(node).kind {
            out.push(e.name.as_str().to_string());
        }
        for child in dom.children(node) {
            collect_tag_names(dom, child, out);
        }
    }

    fn text_content(dom: &Dom, start: NodeId) -> String {
        let mut out = String::new();
        collect_text(dom, start, &mut out);
        out
    }

    fn collect_text(dom: &Dom, node: NodeId, out: &mut String) {
        if let NodeKind::Text(t) = &dom.node(node).kind {
            out.push_str(t);
        }
        for child in dom.children(node) {
            collect_text(dom, child, out);
        }
    }

    #[test]
    fn implies_html_head_body() {
        let result = parse("<p>hi</p>", Options::new());
        let html = find(&result.dom, result.dom.document, "html").expect("html element");
        find(&result.dom, html, "head").expect("implied head");
        let body = find(&result.dom, html, "body").expect("implied body");
        let p = find(&result.dom, body, "p").expect("p element");
        assert_eq!(text_content(&result.dom, p), "hi");
    }

    #[test]
    fn implied_end_tag_for_paragraph() {
        // A second <p> implicitly closes the first; neither nests the other.
        let result = parse("<p>one<p>two", Options::new());
        let body = find(&result.dom, result.dom.document, "body").unwrap();
        let paragraphs: Vec<NodeId> = result
            .dom
            .children(body)
            .filter(|&c| matches!(&result.dom.node(c).kind, NodeKind::Element(e) if e.name.is("p")))
            .collect();
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(text_content(&result.dom, paragraphs[0]), "one");
        assert_eq!(text_content(&result.dom, paragraphs[1]), "two");
    }

    #[test]
    fn adoption_agency_reparents_misnested_formatting() {
        // <b>1<i>2</b>3</i> must reparent the trailing text under a cloned <i>,
        // not leave it as a dangling sibling of <b>.
        let result = parse("<p><b>1<i>2</b>3</i></p>", Options::new());
        let body = find(&result.dom, result.dom.document, "body").unwrap();
        let names = tag_names(&result.dom, body);
        assert!(names.contains(&"b".to_string()));
        assert!(names.iter().filter(|n| n.as_str() == "i").count() >= 1);
        assert_eq!(text_content(&result.dom, body), "123");
    }

    #[test]
    fn foster_parents_text_before_table() {
        // Character data appearing in "in table" mode is foster-parented out
        // of the table, before it, rather than becoming a table child.
        let result = parse("<table>stray<tr><td>cell</td></tr></table>", Options::new());
        let body = find(&result.dom, result.dom.document, "body").unwrap();
        let table = find(&result.dom, body, "table").expect("table element");

        let foster_text_before_table = result
            .dom
            .children(body)
            .take_while(|&c| c != table)
            .any(|c| matches!(&result.dom.node(c).kind, NodeKind::Text(t) if t.contains("stray")));
        assert!(foster_text_before_table, "stray text must be fostered before the table");

        let td = find(&result.dom, table, "td").expect("td element");
        assert_eq!(text_content(&result.dom, td), "cell");
    }

    #[test]
    fn close_table_cell_stops_at_enclosing_cell() {
        // Regression test: closing a <td> must not pop past the enclosing
        // <tr>/<table>, even when the cell holds other open elements.
        let result = parse(
            "<table><tr><td><b>one<td>two</table>after",
            Options::new(),
        );
        let body = find(&result.dom, result.dom.document, "body").unwrap();
        let table = find(&result.dom, body, "table").expect("table survives");
        let tr = find(&result.dom, table, "tr").expect("row survives");
        let cells: Vec<NodeId> = result
            .dom
            .children(tr)
            .filter(|&c| matches!(&result.dom.node(c).kind, NodeKind::Element(e) if e.name.is("td")))
            .collect();
        assert_eq!(cells.len(), 2, "both cells must remain siblings under the row");
        assert_eq!(text_content(&result.dom, cells[0]), "one");
        assert_eq!(text_content(&result.dom, cells[1]), "two");

        // "after" must land after the table, not trapped inside it.
        assert!(text_content(&result.dom, body).ends_with("after"));
    }

    #[test]
    fn template_content_is_a_detached_fragment() {
        let result = parse("<template><p>hi</p></template>", Options::new());
        let body = find(&result.dom, result.dom.document, "body").unwrap();
        let template = find(&result.dom, body, "template").expect("template element");
        let element = result.dom.node(template).as_element().unwrap();
        let content = element.template_content.expect("template has content fragment");
        assert!(result.dom.children(template).next().is_none(), "content isn't a direct child");
        let p = find(&result.dom, content, "p").expect("p inside template content");
        assert_eq!(text_content(&result.dom, p), "hi");
    }

    #[test]
    fn fragment_parsing_skips_document_structure() {
        let result = parse_fragment("<td>cell</td>", "tr", Options::new());
        assert!(
            find(&result.dom, result.dom.document, "html").is_none(),
            "fragment parsing must not synthesize html/head/body"
        );
        let td = find(&result.dom, result.dom.document, "td").expect("td in fragment context");
        assert_eq!(text_content(&result.dom, td), "cell");
    }

    #[test]
    fn collects_parse_errors_when_requested() {
        let result = parse("</p>", Options::new().collect_errors(true));
        assert!(!result.errors.is_empty(), "a stray end tag should record a parse error");
    }

    /// Robustness property: tree construction never panics, no matter what
    /// garbage bytes the tokenizer feeds it.
    #[quickcheck_macros::quickcheck]
    fn never_panics_on_arbitrary_bytes(bytes: Vec<u8>) -> bool {
        let bytes: Vec<u8> = bytes.into_iter().take(10_000).collect();
        let text = String::from_utf8_lossy(&bytes);
        let _ = parse(&text, Options::new());
        true
    }
}
