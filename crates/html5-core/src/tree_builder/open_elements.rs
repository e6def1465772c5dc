//! The stack of open elements.
//!
//! Grounded on the reference's own `stack_of_open_elements.rs`, which keeps a
//! bare `Vec` of tokens; this version keeps a `Vec<NodeId>` into the arena and
//! adds the scope predicates the reference left unimplemented.
//!
//! @see https://html.spec.whatwg.org/#the-stack-of-open-elements

use crate::dom::{Dom, NodeId};

const DEFAULT_SCOPE: &[&str] = &[
    "applet", "caption", "html", "table", "td", "th", "marquee", "object", "template",
];
const LIST_ITEM_SCOPE_EXTRA: &[&str] = &["ol", "ul"];
const BUTTON_SCOPE_EXTRA: &[&str] = &["button"];
const TABLE_SCOPE: &[&str] = &["html", "table", "template"];
const SELECT_SCOPE_EXCEPT: &[&str] = &["optgroup", "option"];

pub struct OpenElementsStack {
    pub stack: Vec<NodeId>,
}

impl OpenElementsStack {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    pub fn push(&mut self, node: NodeId) {
        self.stack.push(node);
    }

    pub fn pop(&mut self) -> Option<NodeId> {
        self.stack.pop()
    }

    pub fn current_node(&self) -> Option<NodeId> {
        self.stack.last().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn contains_template(&self, dom: &Dom) -> bool {
        self.stack
            .iter()
            .any(|&id| dom.node(id).as_element().is_some_and(|e| e.name.is("template")))
    }

    /// Index (from the top) of the first element on the stack matching
    /// `name`, if any.
    pub fn position_of(&self, dom: &Dom, name: &str) -> Option<usize> {
        self.stack.iter().rposition(|&id| {
            dom.node(id).as_element().is_some_and(|e| e.name.is(name))
        })
    }

    /// Pops elements off the stack until (and including) one named `name`.
    pub fn pop_until(&mut self, dom: &Dom, name: &str) {
        while let Some(&top) = self.stack.last() {
            let is_match = dom.node(top).as_element().is_some_and(|e| e.name.is(name));
            self.stack.pop();
            if is_match {
                break;
            }
        }
    }

    /// Pops elements off the stack while they satisfy `pred`, not including
    /// the first element that doesn't.
    pub fn pop_while(&mut self, dom: &Dom, pred: impl Fn(&str) -> bool) {
        while let Some(&top) = self.stack.last() {
            let name = dom.node(top).as_element().map(|e| e.name.as_str().to_string());
            match name {
                Some(n) if pred(&n) => {
                    self.stack.pop();
                }
                _ => break,
            }
        }
    }

    fn has_element_in_specific_scope(&self, dom: &Dom, target: &str, scope_list: &[&str]) -> bool {
        for &id in self.stack.iter().rev() {
            let Some(el) = dom.node(id).as_element() else {
                continue;
            };
            if el.name.is(target) {
                return true;
            }
            if scope_list.contains(&el.name.as_str()) {
                return false;
            }
        }
        false
    }

    pub fn has_element_in_scope(&self, dom: &Dom, target: &str) -> bool {
        self.has_element_in_specific_scope(dom, target, DEFAULT_SCOPE)
    }

    pub fn has_element_in_list_item_scope(&self, dom: &Dom, target: &str) -> bool {
        let mut scope: Vec<&str> = DEFAULT_SCOPE.to_vec();
        scope.extend_from_slice(LIST_ITEM_SCOPE_EXTRA);
        self.has_element_in_specific_scope(dom, target, &scope)
    }

    pub fn has_element_in_button_scope(&self, dom: &Dom, target: &str) -> bool {
        let mut scope: Vec<&str> = DEFAULT_SCOPE.to_vec();
        scope.extend_from_slice(BUTTON_SCOPE_EXTRA);
        self.has_element_in_specific_scope(dom, target, &scope)
    }

    pub fn has_element_in_table_scope(&self, dom: &Dom, target: &str) -> bool {
        self.has_element_in_specific_scope(dom, target, TABLE_SCOPE)
    }

    /// Select scope is defined by exclusion rather than a terminator list:
    /// every element is transparent except `optgroup`/`option`.
    ///
    /// @see https://html.spec.whatwg.org/#has-an-element-in-select-scope
    pub fn has_element_in_select_scope(&self, dom: &Dom, target: &str) -> bool {
        for &id in self.stack.iter().rev() {
            let Some(el) = dom.node(id).as_element() else {
                continue;
            };
            if el.name.is(target) {
                return true;
            }
            if !SELECT_SCOPE_EXCEPT.contains(&el.name.as_str()) {
                return false;
            }
        }
        false
    }

    pub fn contains_in_default_scope(&self, dom: &Dom, names: &[&str]) -> bool {
        names.iter().any(|n| self.has_element_in_scope(dom, n))
    }
}

impl Default for OpenElementsStack {
    fn default() -> Self {
        Self::new()
    }
}
