use crate::category::{is_numeric_input, is_textual_input};
use crate::config::BindingConfig;
use crate::error::ResolutionError;
use crate::model::ModelDirective;
use html::{Dom, Id};
use serde_json::Value;
use std::str::FromStr;

/// DOM event that pushes an element's value into the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateEvent {
    Input,
    Change,
}

impl UpdateEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            UpdateEvent::Input => "input",
            UpdateEvent::Change => "change",
        }
    }

    /// `input` for elements edited keystroke by keystroke, `change` for the rest.
    pub fn default_for(dom: &Dom, element: Id) -> Self {
        if is_textual_input(dom, element) {
            UpdateEvent::Input
        } else {
            UpdateEvent::Change
        }
    }
}

/// A model directive with its modifiers interpreted.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelBinding {
    pub model_name: String,
    /// Model name inside a child component, from `parent_model:inner_model`.
    pub inner_model_name: Option<String>,
    pub should_render: bool,
    /// `None` leaves debouncing to the caller's own default.
    pub debounce: Option<u64>,
    pub target_event: Option<UpdateEvent>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
}

impl ModelBinding {
    pub fn from_directive(
        directive: &ModelDirective,
        config: &BindingConfig,
    ) -> Result<Self, ResolutionError> {
        let (model_name, inner_model_name) = match directive.action.split_once(':') {
            Some((outer, inner)) => (outer.to_string(), Some(inner.to_string())),
            None => (directive.action.clone(), None),
        };
        let mut binding = ModelBinding {
            model_name,
            inner_model_name,
            should_render: true,
            debounce: None,
            target_event: None,
            min_length: None,
            max_length: None,
            min_value: None,
            max_value: None,
        };

        for modifier in &directive.modifiers {
            let value = modifier.value.as_deref();
            match modifier.name.as_str() {
                "on" => {
                    binding.target_event = Some(match value {
                        Some("input") => UpdateEvent::Input,
                        Some("change") => UpdateEvent::Change,
                        _ => return Err(invalid_value(&modifier.name, value)),
                    });
                }
                "norender" => binding.should_render = false,
                "debounce" => {
                    binding.debounce = Some(match value {
                        None => config.default_debounce_ms,
                        Some(_) => required(&modifier.name, value)?,
                    });
                }
                "min_length" => binding.min_length = Some(required(&modifier.name, value)?),
                "max_length" => binding.max_length = Some(required(&modifier.name, value)?),
                "min_value" => binding.min_value = Some(required(&modifier.name, value)?),
                "max_value" => binding.max_value = Some(required(&modifier.name, value)?),
                _ => {
                    return Err(ResolutionError::UnknownModifier {
                        name: modifier.name.clone(),
                        directive: directive.to_string(),
                    });
                }
            }
        }
        Ok(binding)
    }

    /// The event this binding listens to on `element`.
    pub fn event_for(&self, dom: &Dom, element: Id) -> UpdateEvent {
        self.target_event
            .unwrap_or_else(|| UpdateEvent::default_for(dom, element))
    }

    /// Applies the length bounds to textual inputs and the value bounds to numeric inputs.
    /// Values that do not parse as numbers pass the value bounds.
    pub fn accepts(&self, dom: &Dom, element: Id, value: &Value) -> bool {
        if is_textual_input(dom, element)
            && let Value::String(text) = value
        {
            let length = text.chars().count();
            if self.min_length.is_some_and(|min| length < min)
                || self.max_length.is_some_and(|max| length > max)
            {
                return false;
            }
        }

        if is_numeric_input(dom, element) {
            let number = match value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            };
            if let Some(number) = number
                && (self.min_value.is_some_and(|min| number < min)
                    || self.max_value.is_some_and(|max| number > max))
            {
                return false;
            }
        }
        true
    }
}

fn required<T: FromStr>(name: &str, value: Option<&str>) -> Result<T, ResolutionError> {
    value
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| invalid_value(name, value))
}

fn invalid_value(name: &str, value: Option<&str>) -> ResolutionError {
    ResolutionError::InvalidModifierValue {
        name: name.to_string(),
        value: value.map(str::to_string),
    }
}
