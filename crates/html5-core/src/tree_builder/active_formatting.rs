//! The list of active formatting elements.
//!
//! Grounded on the reference's own `active_formatting_elements.rs`, which
//! sketches `Marker`/`Token` entries and a `clear_up_to_last_marker`, but
//! left `push` as a `todo!()` stub. This version finishes it: the Noah's Ark
//! clause, reconstruction, and the entry list the adoption agency algorithm
//! walks.
//!
//! @see https://html.spec.whatwg.org/#the-list-of-active-formatting-elements

use crate::dom::{Dom, ElementData, NodeId};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AfeEntry {
    Marker,
    Element(NodeId),
}

pub struct ActiveFormattingElements {
    entries: Vec<AfeEntry>,
}

impl ActiveFormattingElements {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn insert_marker(&mut self) {
        self.entries.push(AfeEntry::Marker);
    }

    pub fn clear_to_last_marker(&mut self) {
        while let Some(entry) = self.entries.pop() {
            if entry == AfeEntry::Marker {
                break;
            }
        }
    }

    pub fn entries(&self) -> &[AfeEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn position_of(&self, node: NodeId) -> Option<usize> {
        self.entries.iter().position(|e| *e == AfeEntry::Element(node))
    }

    pub fn remove(&mut self, node: NodeId) {
        self.entries.retain(|e| *e != AfeEntry::Element(node));
    }

    pub fn replace_at(&mut self, index: usize, node: NodeId) {
        self.entries[index] = AfeEntry::Element(node);
    }

    pub fn insert_at(&mut self, index: usize, node: NodeId) {
        self.entries.insert(index, AfeEntry::Element(node));
    }

    /// Finds the most recent formatting element named `name` before any
    /// marker (i.e. still "active").
    pub fn find_active(&self, dom: &Dom, name: &str) -> Option<(usize, NodeId)> {
        for (i, entry) in self.entries.iter().enumerate().rev() {
            match entry {
                AfeEntry::Marker => return None,
                AfeEntry::Element(id) => {
                    if dom.node(*id).as_element().is_some_and(|e| e.name.is(name)) {
                        return Some((i, *id));
                    }
                }
            }
        }
        None
    }

    /// Pushes a newly created formatting element onto the list, applying the
    /// Noah's Ark clause: if three elements with the same tag name,
    /// namespace, and attribute set already appear since the last marker,
    /// the earliest is removed first.
    ///
    /// @see https://html.spec.whatwg.org/#push-onto-the-list-of-active-formatting-elements
    pub fn push(&mut self, dom: &Dom, node: NodeId) {
        let Some(new_el) = dom.node(node).as_element() else {
            self.entries.push(AfeEntry::Element(node));
            return;
        };

        let mut matches = Vec::new();
        for (i, entry) in self.entries.iter().enumerate().rev() {
            match entry {
                AfeEntry::Marker => break,
                AfeEntry::Element(id) => {
                    if let Some(existing) = dom.node(*id).as_element() {
                        if elements_match(new_el, existing) {
                            matches.push(i);
                        }
                    }
                }
            }
        }

        if matches.len() >= 3 {
            let earliest = *matches.last().unwrap();
            self.entries.remove(earliest);
        }

        self.entries.push(AfeEntry::Element(node));
    }

    /// Reconstructs the active formatting elements onto the stack of open
    /// elements, cloning each entry since the last marker/stack-member that
    /// is missing from the stack.
    ///
    /// @see https://html.spec.whatwg.org/#reconstruct-the-active-formatting-elements
    pub fn reconstruct(
        &mut self,
        dom: &mut Dom,
        open_elements: &mut super::open_elements::OpenElementsStack,
    ) {
        if self.entries.is_empty() {
            return;
        }
        let Some(AfeEntry::Element(last)) = self.entries.last().copied() else {
            return;
        };
        if open_elements.stack.contains(&last) {
            return;
        }

        let mut index = self.entries.len() - 1;
        loop {
            if index == 0 {
                break;
            }
            index -= 1;
            match self.entries[index] {
                AfeEntry::Marker => {
                    index += 1;
                    break;
                }
                AfeEntry::Element(id) => {
                    if open_elements.stack.contains(&id) {
                        index += 1;
                        break;
                    }
                }
            }
        }

        for i in index..self.entries.len() {
            let AfeEntry::Element(old) = self.entries[i] else {
                continue;
            };
            let el = dom.node(old).as_element().unwrap().clone();
            let clone = dom.create_element(el.name.clone(), el.namespace, el.attrs.clone(), false);
            let current = open_elements.current_node().unwrap_or(dom.document);
            dom.append(current, clone);
            open_elements.push(clone);
            self.entries[i] = AfeEntry::Element(clone);
        }
    }
}

impl Default for ActiveFormattingElements {
    fn default() -> Self {
        Self::new()
    }
}

fn elements_match(a: &ElementData, b: &ElementData) -> bool {
    if a.name != b.name || a.namespace != b.namespace || a.attrs.len() != b.attrs.len() {
        return false;
    }
    a.attrs.iter().all(|attr| {
        b.attrs
            .iter()
            .any(|other| other.name == attr.name && other.value == attr.value)
    })
}
