use html::{Dom, Element, Id};

/// `type` of an `<input>`, folded into the groups binding cares about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    /// `text`, `email`, `password`, `search`, `tel`, `url`, and missing or unknown types.
    Text,
    Checkbox,
    Radio,
    /// `number` and `range`.
    Number,
    File,
    Hidden,
    /// Date/time pickers, `color`, buttons.
    Other,
}

/// `None` for anything that is not an `<input>`.
pub fn input_kind(element: &Element) -> Option<InputKind> {
    if !element.is("input") {
        return None;
    }
    let ty = element
        .attr("type")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or("text")
        .to_ascii_lowercase();

    Some(match ty.as_str() {
        "checkbox" => InputKind::Checkbox,
        "radio" => InputKind::Radio,
        "number" | "range" => InputKind::Number,
        "file" => InputKind::File,
        "hidden" => InputKind::Hidden,
        "date" | "datetime-local" | "month" | "week" | "time" | "color" | "submit" | "reset"
        | "button" | "image" => InputKind::Other,
        // text, email, password, search, tel, url; invalid types behave as text
        _ => InputKind::Text,
    })
}

/// How the value extractor treats an element; resolved once per extraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementCategory {
    Checkbox,
    MultiSelect,
    Generic,
}

impl ElementCategory {
    pub fn of(element: &Element) -> Self {
        if input_kind(element) == Some(InputKind::Checkbox) {
            ElementCategory::Checkbox
        } else if element.is("select") && element.has_attr("multiple") {
            ElementCategory::MultiSelect
        } else {
            ElementCategory::Generic
        }
    }
}

/// Elements whose value is typed text: text-like inputs and textareas.
pub fn is_textual_input(dom: &Dom, id: Id) -> bool {
    dom.element(id).is_some_and(|element| {
        element.is("textarea") || input_kind(element) == Some(InputKind::Text)
    })
}

pub fn is_numeric_input(dom: &Dom, id: Id) -> bool {
    dom.element(id)
        .is_some_and(|element| input_kind(element) == Some(InputKind::Number))
}
