//! Parser for model attribute values: `modifier(value)|modifier|action`.
//!
//! The last `|`-separated segment is the action (the raw model name); every earlier segment
//! is a modifier with an optional parenthesized value. A `|` inside parentheses does not split.

use crate::error::ResolutionError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modifier {
    pub name: String,
    pub value: Option<String>,
}

impl Modifier {
    pub fn new(name: impl Into<String>, value: Option<&str>) -> Self {
        Self {
            name: name.into(),
            value: value.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawDirective {
    pub(crate) action: String,
    pub(crate) modifiers: Vec<Modifier>,
}

pub(crate) fn parse_model_attribute(
    attribute: &str,
    value: &str,
) -> Result<RawDirective, ResolutionError> {
    let malformed = || ResolutionError::MalformedDirective {
        attribute: attribute.to_string(),
        value: value.to_string(),
    };

    let segments = split_top_level(value).ok_or_else(malformed)?;
    let (action, modifier_segments) = segments.split_last().ok_or_else(malformed)?;

    let (action_name, action_args) = parse_call(action).ok_or_else(malformed)?;
    if action_args.is_some() {
        return Err(ResolutionError::ArgumentsNotSupported {
            attribute: attribute.to_string(),
            value: value.to_string(),
        });
    }

    let modifiers = modifier_segments
        .iter()
        .map(|segment| {
            let (name, arg) = parse_call(segment)?;
            Some(Modifier::new(name, arg))
        })
        .collect::<Option<Vec<_>>>()
        .ok_or_else(malformed)?;

    Ok(RawDirective {
        action: action_name.to_string(),
        modifiers,
    })
}

/// Splits on `|` outside parentheses; `None` when parentheses are unbalanced.
fn split_top_level(value: &str) -> Option<Vec<&str>> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, ch) in value.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.checked_sub(1)?,
            '|' if depth == 0 => {
                segments.push(value[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    segments.push(value[start..].trim());
    Some(segments)
}

/// `name` or `name(arg)`; an empty `()` counts as no argument. `None` for an empty name or
/// trailing text after the closing parenthesis.
fn parse_call(segment: &str) -> Option<(&str, Option<&str>)> {
    let (name, arg) = match segment.split_once('(') {
        Some((name, rest)) => {
            let arg = rest.strip_suffix(')')?.trim();
            (name.trim(), (!arg.is_empty()).then_some(arg))
        }
        None => (segment, None),
    };
    if name.is_empty() {
        return None;
    }
    Some((name, arg))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(value: &str) -> Result<RawDirective, ResolutionError> {
        parse_model_attribute("data-model", value)
    }

    #[test]
    fn plain_action_has_no_modifiers() {
        let directive = parse("user[firstName]").unwrap();
        assert_eq!(directive.action, "user[firstName]");
        assert!(directive.modifiers.is_empty());
    }

    #[test]
    fn modifiers_precede_the_action() {
        let directive = parse("on(change) | debounce(300)|norender|name").unwrap();
        assert_eq!(directive.action, "name");
        assert_eq!(
            directive.modifiers,
            vec![
                Modifier::new("on", Some("change")),
                Modifier::new("debounce", Some("300")),
                Modifier::new("norender", None),
            ]
        );
    }

    #[test]
    fn pipe_inside_parentheses_does_not_split() {
        let directive = parse("min_value(a|b)|x").unwrap();
        assert_eq!(directive.modifiers, vec![Modifier::new("min_value", Some("a|b"))]);
    }

    #[test]
    fn action_arguments_are_rejected() {
        assert_eq!(
            parse("name(1)"),
            Err(ResolutionError::ArgumentsNotSupported {
                attribute: "data-model".to_string(),
                value: "name(1)".to_string(),
            })
        );
    }

    #[test]
    fn malformed_values_are_rejected() {
        for value in ["", "  ", "debounce(|x", "on)|x", "|x", "x|", "on(change)y|x"] {
            assert!(
                matches!(parse(value), Err(ResolutionError::MalformedDirective { .. })),
                "expected {value:?} to be malformed"
            );
        }
    }
}
