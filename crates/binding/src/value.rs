//! Element value extraction and its inverse, write-back from the store into the DOM.

use crate::category::{ElementCategory, InputKind, input_kind};
use crate::config::BindingConfig;
use crate::model::find_model_directive;
use html::{Dom, DomError, Id};
use value_store::{Value, ValueStore};

/// The logical value `element` represents, given the current `store` contents.
///
/// - Checkbox bound to a sequence (or mapping, taken by its values): the sequence with the
///   checkbox value appended when checked and absent, or its first occurrence removed when
///   unchecked. Order of the other entries is kept.
/// - Other checkbox: its `value` attribute when checked, `null` when unchecked; without a
///   `value` attribute, the checked state as a boolean.
/// - Multi-select: values of the selected options in document order.
/// - Anything else: a non-empty value attribute override, then the `value` property, then a
///   plain `value` attribute, else `null`.
///
/// Never fails; unbindable or unresolvable elements degrade to the fallbacks above.
pub fn extract_value(dom: &Dom, element: Id, store: &ValueStore, config: &BindingConfig) -> Value {
    let Some(el) = dom.element(element) else {
        return Value::Null;
    };
    match ElementCategory::of(el) {
        ElementCategory::Checkbox => checkbox_value(dom, element, store, config),
        ElementCategory::MultiSelect => Value::Array(
            dom.options(element)
                .into_iter()
                .filter(|option| dom.selected(*option))
                .filter_map(|option| dom.value(option))
                .map(Value::String)
                .collect(),
        ),
        ElementCategory::Generic => {
            if let Some(value) = el.attr(&config.value_attribute).filter(|v| !v.is_empty()) {
                return Value::String(value.to_string());
            }
            dom.value(element)
                .or_else(|| el.attr("value").map(str::to_string))
                .map_or(Value::Null, Value::String)
        }
    }
}

fn checkbox_value(dom: &Dom, element: Id, store: &ValueStore, config: &BindingConfig) -> Value {
    let checked = dom.checked(element);
    let directive = match find_model_directive(dom, element, config) {
        Ok(directive) => directive,
        Err(err) => {
            log::debug!(
                target: "binding.value",
                "checkbox {} has no usable model: {err}",
                element.0
            );
            None
        }
    };
    let group = directive
        .and_then(|directive| store.get(&directive.action))
        .and_then(|prior| match prior {
            Value::Array(items) => Some(items.clone()),
            Value::Object(map) => Some(map.values().cloned().collect()),
            _ => None,
        });

    if let Some(mut items) = group {
        let own = Value::String(checkbox_own_value(dom, element, config));
        let position = items.iter().position(|item| *item == own);
        match (checked, position) {
            (true, None) => items.push(own),
            (false, Some(index)) => {
                items.remove(index);
            }
            _ => {}
        }
        log::trace!(target: "binding.value", "checkbox {} group value {items:?}", element.0);
        return Value::Array(items);
    }

    match dom.attr(element, "value") {
        Some(value) if checked => Value::String(value.to_string()),
        Some(_) => Value::Null,
        None => Value::Bool(checked),
    }
}

/// A checkbox's value within a group: the value attribute override, else its `value` property.
fn checkbox_own_value(dom: &Dom, element: Id, config: &BindingConfig) -> String {
    dom.attr(element, &config.value_attribute)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .or_else(|| dom.value(element))
        .unwrap_or_default()
}

/// Pushes a store value back into the element's live state.
///
/// File inputs are left alone. Radios are checked when their value matches. Checkboxes are
/// checked when a sequence contains their value, when the value matches their `value`
/// attribute, or, without one, by truthiness. Select options are selected when their value is
/// among the (sequence-wrapped) values. Everything else gets its value set, `null` as `""`.
pub fn apply_value_to_element(
    dom: &mut Dom,
    element: Id,
    value: &Value,
    config: &BindingConfig,
) -> Result<(), DomError> {
    let el = dom.element(element).ok_or(DomError::NotAnElement(element))?;
    let kind = input_kind(el);
    let is_select = el.is("select");

    match kind {
        Some(InputKind::File) => return Ok(()),
        Some(InputKind::Radio) => {
            let own = dom.value(element).unwrap_or_default();
            return dom.set_checked(element, loosely_equals(&own, value));
        }
        Some(InputKind::Checkbox) => {
            let own = checkbox_own_value(dom, element, config);
            let checked = match value {
                Value::Array(items) => items.iter().any(|item| loosely_equals(&own, item)),
                _ if dom.has_attr(element, "value") => loosely_equals(&own, value),
                _ => is_truthy(value),
            };
            return dom.set_checked(element, checked);
        }
        _ => {}
    }

    if is_select {
        let wanted: Vec<String> = match value {
            Value::Array(items) => items.iter().map(display_value).collect(),
            Value::Null => Vec::new(),
            other => vec![display_value(other)],
        };
        for option in dom.options(element) {
            let selected = dom
                .value(option)
                .is_some_and(|own| wanted.iter().any(|w| *w == own));
            dom.set_selected(option, selected)?;
        }
        return Ok(());
    }

    dom.set_value(element, display_value(value))
}

/// String form used when a value lands in the DOM: strings verbatim, `null` as empty.
fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Compares a DOM string against a store value the way form values compare: numbers and
/// booleans numerically, strings exactly, `null` and compound values never.
fn loosely_equals(dom_value: &str, value: &Value) -> bool {
    match value {
        Value::String(s) => s == dom_value,
        Value::Number(n) => dom_value
            .trim()
            .parse::<f64>()
            .is_ok_and(|parsed| Some(parsed) == n.as_f64()),
        Value::Bool(b) => dom_value
            .trim()
            .parse::<f64>()
            .is_ok_and(|parsed| parsed == if *b { 1.0 } else { 0.0 }),
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
