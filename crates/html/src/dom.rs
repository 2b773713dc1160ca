//! Arena-backed DOM with parent links and live form-control state.
//!
//! Nodes never move between arenas. Parsing and cloning create detached subtrees inside the
//! same `Dom`; callers attach them with [`Dom::append_child`]. Handles stay valid for the
//! lifetime of the arena, detached or not.

use crate::types::{Attribute, Id};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    UnknownNode(Id),
    NotAnElement(Id),
    InvalidParent(Id),
    AlreadyAttached(Id),
    CycleDetected { parent: Id, child: Id },
    NoRootElement,
    MultipleRootElements(usize),
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomError::UnknownNode(id) => write!(f, "unknown node {id:?}"),
            DomError::NotAnElement(id) => write!(f, "node {id:?} is not an element"),
            DomError::InvalidParent(id) => write!(f, "node {id:?} cannot have children"),
            DomError::AlreadyAttached(id) => write!(f, "node {id:?} already has a parent"),
            DomError::CycleDetected { parent, child } => {
                write!(f, "appending {child:?} to {parent:?} would create a cycle")
            }
            DomError::NoRootElement => write!(f, "markup does not contain an element"),
            DomError::MultipleRootElements(count) => write!(
                f,
                "markup contains {count} root elements, but only 1 root element is allowed"
            ),
        }
    }
}

impl std::error::Error for DomError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<Attribute>,
    // Live state. `dirty_value == None` means the value still follows the markup.
    dirty_value: Option<String>,
    checked: bool,
    selected: bool,
}

impl Element {
    pub fn new(name: &str, attributes: Vec<Attribute>) -> Self {
        let checked = attributes
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case("checked"));
        let selected = attributes
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case("selected"));
        Self {
            name: name.to_ascii_lowercase(),
            attributes,
            dirty_value: None,
            checked,
            selected,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is(&self, tag: &str) -> bool {
        self.name.eq_ignore_ascii_case(tag)
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Attribute value; a value-less attribute (`<input checked>`) reads as `""`.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_deref().unwrap_or(""))
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case(name))
    }

    pub fn set_attr(&mut self, name: &str, value: Option<String>) {
        match self
            .attributes
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
        {
            Some((_, v)) => *v = value,
            None => self.attributes.push((name.to_ascii_lowercase(), value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> bool {
        let before = self.attributes.len();
        self.attributes.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        before != self.attributes.len()
    }

    pub fn checked(&self) -> bool {
        self.checked
    }

    pub fn selected(&self) -> bool {
        self.selected
    }

    fn is_input_of_type(&self, ty: &str) -> bool {
        self.is("input")
            && self
                .attr("type")
                .is_some_and(|t| t.trim().eq_ignore_ascii_case(ty))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Element(Element),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
struct NodeRecord {
    kind: NodeKind,
    parent: Option<Id>,
    children: Vec<Id>,
}

impl NodeRecord {
    fn allows_children(&self) -> bool {
        matches!(self.kind, NodeKind::Document | NodeKind::Element(_))
    }
}

/// Node arena. Nodes are never freed; ids are indices and fit in a `u32`, so a single
/// `Dom` holds at most `u32::MAX + 1` nodes and panics when asked to grow past that.
#[derive(Debug, Clone)]
pub struct Dom {
    nodes: Vec<NodeRecord>,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeRecord {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn document(&self) -> Id {
        Id::DOCUMENT
    }

    fn record(&self, id: Id) -> Option<&NodeRecord> {
        self.nodes.get(id.index())
    }

    fn push(&mut self, kind: NodeKind) -> Id {
        let id = id_for_index(self.nodes.len());
        self.nodes.push(NodeRecord {
            kind,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    pub fn create_element(&mut self, name: &str, attributes: Vec<Attribute>) -> Id {
        self.push(NodeKind::Element(Element::new(name, attributes)))
    }

    pub(crate) fn create_element_from(&mut self, element: Element) -> Id {
        self.push(NodeKind::Element(element))
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> Id {
        self.push(NodeKind::Text(text.into()))
    }

    pub fn create_comment(&mut self, text: impl Into<String>) -> Id {
        self.push(NodeKind::Comment(text.into()))
    }

    pub fn kind(&self, id: Id) -> Option<&NodeKind> {
        self.record(id).map(|r| &r.kind)
    }

    pub fn element(&self, id: Id) -> Option<&Element> {
        match self.kind(id)? {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: Id) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(id.index())?.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    fn element_mut_or_err(&mut self, id: Id) -> Result<&mut Element, DomError> {
        if self.record(id).is_none() {
            return Err(DomError::UnknownNode(id));
        }
        self.element_mut(id).ok_or(DomError::NotAnElement(id))
    }

    pub fn tag_name(&self, id: Id) -> Option<&str> {
        self.element(id).map(Element::name)
    }

    pub fn is_element_named(&self, id: Id, tag: &str) -> bool {
        self.element(id).is_some_and(|e| e.is(tag))
    }

    pub fn parent(&self, id: Id) -> Option<Id> {
        self.record(id).and_then(|r| r.parent)
    }

    pub fn children(&self, id: Id) -> &[Id] {
        self.record(id).map(|r| r.children.as_slice()).unwrap_or(&[])
    }

    pub fn append_child(&mut self, parent: Id, child: Id) -> Result<(), DomError> {
        let parent_record = self.record(parent).ok_or(DomError::UnknownNode(parent))?;
        if !parent_record.allows_children() {
            return Err(DomError::InvalidParent(parent));
        }
        let child_record = self.record(child).ok_or(DomError::UnknownNode(child))?;
        if matches!(child_record.kind, NodeKind::Document) {
            return Err(DomError::InvalidParent(child));
        }
        if child_record.parent.is_some() {
            return Err(DomError::AlreadyAttached(child));
        }
        if parent == child || self.is_descendant_of(parent, child) {
            return Err(DomError::CycleDetected { parent, child });
        }
        self.nodes[parent.index()].children.push(child);
        self.nodes[child.index()].parent = Some(parent);
        Ok(())
    }

    /// Removes `id` from its parent; the subtree stays in the arena, detached.
    pub fn detach(&mut self, id: Id) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        self.nodes[parent.index()].children.retain(|c| *c != id);
        self.nodes[id.index()].parent = None;
    }

    /// Proper ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: Id) -> Ancestors<'_> {
        Ancestors {
            dom: self,
            next: self.parent(id),
        }
    }

    /// Nearest element matching `pred`, starting with `id` itself.
    pub fn closest(&self, id: Id, pred: impl Fn(&Element) -> bool) -> Option<Id> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|candidate| self.element(*candidate).is_some_and(&pred))
    }

    /// Strict containment: `node` lies somewhere below `ancestor`.
    pub fn is_descendant_of(&self, node: Id, ancestor: Id) -> bool {
        self.ancestors(node).any(|a| a == ancestor)
    }

    /// Inclusive containment, like `Node.contains`.
    pub fn contains(&self, ancestor: Id, node: Id) -> bool {
        ancestor == node || self.is_descendant_of(node, ancestor)
    }

    /// Descendants of `id` in document order, excluding `id`.
    pub fn descendants(&self, id: Id) -> Descendants<'_> {
        let mut stack: Vec<Id> = self.children(id).to_vec();
        stack.reverse();
        Descendants { dom: self, stack }
    }

    pub fn attr(&self, id: Id, name: &str) -> Option<&str> {
        self.element(id)?.attr(name)
    }

    pub fn has_attr(&self, id: Id, name: &str) -> bool {
        self.element(id).is_some_and(|e| e.has_attr(name))
    }

    pub fn set_attr(&mut self, id: Id, name: &str, value: Option<String>) -> Result<(), DomError> {
        self.element_mut_or_err(id)?.set_attr(name, value);
        Ok(())
    }

    pub fn remove_attr(&mut self, id: Id, name: &str) -> Result<bool, DomError> {
        Ok(self.element_mut_or_err(id)?.remove_attr(name))
    }

    /// First element at or below `root` (document order) carrying attribute `name` = `value`.
    pub fn find_by_attr(&self, root: Id, name: &str, value: &str) -> Option<Id> {
        std::iter::once(root)
            .chain(self.descendants(root))
            .find(|id| self.attr(*id, name) == Some(value))
    }

    pub fn text_content(&self, id: Id) -> String {
        let mut out = String::new();
        match self.kind(id) {
            Some(NodeKind::Text(text)) => out.push_str(text),
            Some(NodeKind::Element(_)) | Some(NodeKind::Document) => {
                for node in self.descendants(id) {
                    if let Some(NodeKind::Text(text)) = self.kind(node) {
                        out.push_str(text);
                    }
                }
            }
            _ => {}
        }
        out
    }

    /// `option` descendants of a `select` (through `optgroup`s) in document order.
    pub fn options(&self, select: Id) -> Vec<Id> {
        self.descendants(select)
            .filter(|id| self.is_element_named(*id, "option"))
            .collect()
    }

    /// The element's `value` property, or `None` for elements that do not have one.
    pub fn value(&self, id: Id) -> Option<String> {
        let element = self.element(id)?;
        let value = match element.name() {
            "input" => match (&element.dirty_value, element.attr("value")) {
                (Some(dirty), _) => dirty.clone(),
                (None, Some(attr)) => attr.to_string(),
                (None, None)
                    if element.is_input_of_type("checkbox")
                        || element.is_input_of_type("radio") =>
                {
                    "on".to_string()
                }
                (None, None) => String::new(),
            },
            "textarea" => match &element.dirty_value {
                Some(dirty) => dirty.clone(),
                None => self.text_content(id),
            },
            "option" => match element.attr("value") {
                Some(attr) => attr.to_string(),
                None => collapse_whitespace(&self.text_content(id)),
            },
            "select" => {
                let options = self.options(id);
                let chosen = options
                    .iter()
                    .copied()
                    .find(|o| self.selected(*o))
                    .or_else(|| {
                        (!element.has_attr("multiple"))
                            .then(|| options.first().copied())
                            .flatten()
                    });
                chosen.and_then(|o| self.value(o)).unwrap_or_default()
            }
            "button" | "data" | "param" => element.attr("value").unwrap_or("").to_string(),
            _ => return None,
        };
        Some(value)
    }

    pub fn set_value(&mut self, id: Id, value: impl Into<String>) -> Result<(), DomError> {
        let value = value.into();
        if self.is_element_named(id, "select") {
            for option in self.options(id) {
                let matches = self.value(option).as_deref() == Some(value.as_str());
                self.element_mut_or_err(option)?.selected = matches;
            }
            return Ok(());
        }
        self.element_mut_or_err(id)?.dirty_value = Some(value);
        Ok(())
    }

    pub fn checked(&self, id: Id) -> bool {
        self.element(id).is_some_and(Element::checked)
    }

    pub fn set_checked(&mut self, id: Id, checked: bool) -> Result<(), DomError> {
        self.element_mut_or_err(id)?.checked = checked;
        Ok(())
    }

    pub fn selected(&self, id: Id) -> bool {
        self.element(id).is_some_and(Element::selected)
    }

    /// Sets an option's selectedness. Selecting an option of a single-select deselects the
    /// other options of that select.
    pub fn set_selected(&mut self, id: Id, selected: bool) -> Result<(), DomError> {
        self.element_mut_or_err(id)?.selected = selected;
        if !selected {
            return Ok(());
        }
        let owner = self
            .ancestors(id)
            .find(|a| self.is_element_named(*a, "select"));
        if let Some(select) = owner
            && !self.has_attr(select, "multiple")
        {
            for option in self.options(select) {
                if option != id {
                    self.element_mut_or_err(option)?.selected = false;
                }
            }
        }
        Ok(())
    }
}

pub struct Ancestors<'a> {
    dom: &'a Dom,
    next: Option<Id>,
}

impl Iterator for Ancestors<'_> {
    type Item = Id;

    fn next(&mut self) -> Option<Id> {
        let current = self.next?;
        self.next = self.dom.parent(current);
        Some(current)
    }
}

pub struct Descendants<'a> {
    dom: &'a Dom,
    stack: Vec<Id>,
}

impl Iterator for Descendants<'_> {
    type Item = Id;

    fn next(&mut self) -> Option<Id> {
        let current = self.stack.pop()?;
        self.stack
            .extend(self.dom.children(current).iter().rev().copied());
        Some(current)
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_ascii_whitespace().collect::<Vec<_>>().join(" ")
}

fn id_for_index(index: usize) -> Id {
    match u32::try_from(index) {
        Ok(raw) => Id(raw),
        Err(_) => panic!("dom arena is full: node index {index} does not fit a u32 id"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_cover_the_full_u32_range() {
        assert_eq!(id_for_index(0), Id::DOCUMENT);
        assert_eq!(id_for_index(u32::MAX as usize), Id(u32::MAX));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    #[should_panic(expected = "dom arena is full")]
    fn id_past_u32_range_panics_instead_of_wrapping() {
        id_for_index(u32::MAX as usize + 1);
    }

    fn attrs(pairs: &[(&str, Option<&str>)]) -> Vec<Attribute> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
            .collect()
    }

    #[test]
    fn append_child_links_parent_and_children() {
        let mut dom = Dom::new();
        let div = dom.create_element("div", Vec::new());
        let span = dom.create_element("span", Vec::new());
        dom.append_child(dom.document(), div).unwrap();
        dom.append_child(div, span).unwrap();

        assert_eq!(dom.parent(span), Some(div));
        assert_eq!(dom.children(div), &[span]);
        assert_eq!(dom.ancestors(span).collect::<Vec<_>>(), vec![div, Id::DOCUMENT]);
    }

    #[test]
    fn append_child_rejects_cycles_and_reattachment() {
        let mut dom = Dom::new();
        let outer = dom.create_element("div", Vec::new());
        let inner = dom.create_element("div", Vec::new());
        dom.append_child(outer, inner).unwrap();

        assert_eq!(
            dom.append_child(inner, outer),
            Err(DomError::CycleDetected {
                parent: inner,
                child: outer
            })
        );
        assert_eq!(
            dom.append_child(outer, inner),
            Err(DomError::AlreadyAttached(inner))
        );

        let text = dom.create_text("x");
        let other = dom.create_element("p", Vec::new());
        assert_eq!(
            dom.append_child(text, other),
            Err(DomError::InvalidParent(text))
        );
    }

    #[test]
    fn detach_keeps_subtree_in_arena() {
        let mut dom = Dom::new();
        let div = dom.create_element("div", Vec::new());
        let span = dom.create_element("span", Vec::new());
        dom.append_child(dom.document(), div).unwrap();
        dom.append_child(div, span).unwrap();

        dom.detach(div);
        assert_eq!(dom.parent(div), None);
        assert!(dom.children(Id::DOCUMENT).is_empty());
        assert_eq!(dom.parent(span), Some(div));
    }

    #[test]
    fn containment_is_strict_or_inclusive_as_named() {
        let mut dom = Dom::new();
        let div = dom.create_element("div", Vec::new());
        let span = dom.create_element("span", Vec::new());
        dom.append_child(div, span).unwrap();

        assert!(dom.is_descendant_of(span, div));
        assert!(!dom.is_descendant_of(div, div));
        assert!(dom.contains(div, div));
        assert!(dom.contains(div, span));
        assert!(!dom.contains(span, div));
    }

    #[test]
    fn descendants_follow_document_order() {
        let mut dom = Dom::new();
        let root = dom.create_element("div", Vec::new());
        let a = dom.create_element("a", Vec::new());
        let a1 = dom.create_element("b", Vec::new());
        let c = dom.create_element("c", Vec::new());
        dom.append_child(root, a).unwrap();
        dom.append_child(a, a1).unwrap();
        dom.append_child(root, c).unwrap();

        assert_eq!(dom.descendants(root).collect::<Vec<_>>(), vec![a, a1, c]);
    }

    #[test]
    fn valueless_attribute_reads_as_empty_string() {
        let element = Element::new("INPUT", attrs(&[("Checked", None), ("name", Some("x"))]));
        assert_eq!(element.name(), "input");
        assert_eq!(element.attr("checked"), Some(""));
        assert_eq!(element.attr("NAME"), Some("x"));
        assert!(element.checked());
        assert_eq!(element.attr("missing"), None);
    }

    #[test]
    fn checkbox_value_defaults_to_on() {
        let mut dom = Dom::new();
        let cb = dom.create_element("input", attrs(&[("type", Some("checkbox"))]));
        let text = dom.create_element("input", Vec::new());
        assert_eq!(dom.value(cb).as_deref(), Some("on"));
        assert_eq!(dom.value(text).as_deref(), Some(""));

        dom.set_value(text, "typed").unwrap();
        assert_eq!(dom.value(text).as_deref(), Some("typed"));
        assert_eq!(dom.attr(text, "value"), None);
    }

    #[test]
    fn option_value_falls_back_to_collapsed_text() {
        let mut dom = Dom::new();
        let option = dom.create_element("option", Vec::new());
        let text = dom.create_text("  Blue \n sky ");
        dom.append_child(option, text).unwrap();
        assert_eq!(dom.value(option).as_deref(), Some("Blue sky"));
    }

    #[test]
    fn single_select_keeps_one_selected_option() {
        let mut dom = Dom::new();
        let select = dom.create_element("select", Vec::new());
        let a = dom.create_element("option", attrs(&[("value", Some("a"))]));
        let b = dom.create_element("option", attrs(&[("value", Some("b"))]));
        dom.append_child(select, a).unwrap();
        dom.append_child(select, b).unwrap();

        assert_eq!(dom.value(select).as_deref(), Some("a"));
        dom.set_selected(b, true).unwrap();
        assert!(!dom.selected(a));
        assert_eq!(dom.value(select).as_deref(), Some("b"));

        dom.set_value(select, "a").unwrap();
        assert!(dom.selected(a));
        assert!(!dom.selected(b));
    }

    #[test]
    fn generic_elements_have_no_value_property() {
        let mut dom = Dom::new();
        let div = dom.create_element("div", attrs(&[("value", Some("x"))]));
        assert_eq!(dom.value(div), None);
    }

    #[test]
    fn find_by_attr_searches_root_and_below() {
        let mut dom = Dom::new();
        let root = dom.create_element("div", attrs(&[("id", Some("root"))]));
        let child = dom.create_element("span", attrs(&[("id", Some("child"))]));
        dom.append_child(root, child).unwrap();

        assert_eq!(dom.find_by_attr(root, "id", "root"), Some(root));
        assert_eq!(dom.find_by_attr(root, "id", "child"), Some(child));
        assert_eq!(dom.find_by_attr(child, "id", "root"), None);
    }
}
