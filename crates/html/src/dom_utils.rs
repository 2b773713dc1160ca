use crate::dom::{Dom, DomError, NodeKind};
use crate::dom_builder::build_fragment;
use crate::entities::{escape_attribute, escape_text};
use crate::tokenizer::tokenize;
use crate::types::{Id, is_void_element};

/// Parses a single-root markup fragment into a detached element living in `dom`.
///
/// Surrounding whitespace is ignored. Fragments without an element, or with more than one root
/// element, are rejected.
pub fn parse_markup_to_element(dom: &mut Dom, html: &str) -> Result<Id, DomError> {
    let roots = build_fragment(dom, tokenize(html.trim()))?;
    let mut elements = roots.iter().copied().filter(|id| dom.element(*id).is_some());
    let Some(first) = elements.next() else {
        return Err(DomError::NoRootElement);
    };
    let extra = elements.count();
    if extra > 0 {
        return Err(DomError::MultipleRootElements(extra + 1));
    }
    Ok(first)
}

/// Parses `html` and appends every top-level node under `parent`; returns the appended nodes.
pub fn append_markup(dom: &mut Dom, parent: Id, html: &str) -> Result<Vec<Id>, DomError> {
    let roots = build_fragment(dom, tokenize(html))?;
    for &root in &roots {
        dom.append_child(parent, root)?;
    }
    Ok(roots)
}

/// Deep structural copy of `element` (attributes, live state, descendants), detached.
pub fn clone_element(dom: &mut Dom, element: Id) -> Result<Id, DomError> {
    let source = dom.element(element).ok_or(DomError::NotAnElement(element))?.clone();
    let copy = dom.create_element_from(source);

    // (source parent, copy parent) pairs; children are copied in order.
    let mut pending: Vec<(Id, Id)> = vec![(element, copy)];
    while let Some((from, to)) = pending.pop() {
        let children = dom.children(from).to_vec();
        for child in children {
            let cloned = match dom.kind(child) {
                Some(NodeKind::Element(e)) => {
                    let e = e.clone();
                    let id = dom.create_element_from(e);
                    pending.push((child, id));
                    id
                }
                Some(NodeKind::Text(text)) => {
                    let text = text.clone();
                    dom.create_text(text)
                }
                Some(NodeKind::Comment(text)) => {
                    let text = text.clone();
                    dom.create_comment(text)
                }
                Some(NodeKind::Document) | None => continue,
            };
            dom.append_child(to, cloned)?;
        }
    }
    Ok(copy)
}

/// The element's start tag only, e.g. `<div class="foo">`. Children and the end tag are never
/// included. Non-elements render as an empty string.
pub fn render_opening_tag(dom: &Dom, id: Id) -> String {
    let mut out = String::new();
    push_opening_tag(dom, id, &mut out);
    out
}

fn push_opening_tag(dom: &Dom, id: Id, out: &mut String) {
    let Some(element) = dom.element(id) else {
        return;
    };
    out.push('<');
    out.push_str(element.name());
    for (name, value) in element.attributes() {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        if let Some(value) = value {
            escape_attribute(value, out);
        }
        out.push('"');
    }
    out.push('>');
}

/// Serializes `id` with its subtree. Void elements get no end tag; live state (typed values,
/// toggled checkboxes) is not reflected, only markup.
pub fn render_outer_html(dom: &Dom, id: Id) -> String {
    enum Step {
        Open(Id),
        Close(Id),
    }

    let mut out = String::new();
    let mut stack = vec![Step::Open(id)];
    while let Some(step) = stack.pop() {
        match step {
            Step::Close(el) => {
                if let Some(name) = dom.tag_name(el) {
                    out.push_str("</");
                    out.push_str(name);
                    out.push('>');
                }
            }
            Step::Open(node) => match dom.kind(node) {
                Some(NodeKind::Element(element)) => {
                    push_opening_tag(dom, node, &mut out);
                    if is_void_element(element.name()) {
                        continue;
                    }
                    stack.push(Step::Close(node));
                    stack.extend(dom.children(node).iter().rev().map(|c| Step::Open(*c)));
                }
                Some(NodeKind::Text(text)) => escape_text(text, &mut out),
                Some(NodeKind::Comment(text)) => {
                    out.push_str("<!--");
                    out.push_str(text);
                    out.push_str("-->");
                }
                Some(NodeKind::Document) => {
                    stack.extend(dom.children(node).iter().rev().map(|c| Step::Open(*c)));
                }
                None => {}
            },
        }
    }
    out
}
