use crate::config::BindingConfig;
use crate::directive::{Modifier, parse_model_attribute};
use crate::error::ResolutionError;
use html::{Dom, Id, render_opening_tag};
use std::fmt;

/// Which store path an element is bound to, plus the modifiers written next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDirective {
    /// Normalized dotted model path, e.g. `user.firstName`.
    pub action: String,
    pub modifiers: Vec<Modifier>,
}

impl ModelDirective {
    pub fn modifier(&self, name: &str) -> Option<&Modifier> {
        self.modifiers.iter().find(|m| m.name == name)
    }
}

/// Renders back into attribute syntax: `on(change)|norender|user.name`.
impl fmt::Display for ModelDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in &self.modifiers {
            match &modifier.value {
                Some(value) => write!(f, "{}({value})|", modifier.name)?,
                None => write!(f, "{}|", modifier.name)?,
            }
        }
        f.write_str(&self.action)
    }
}

/// Rewrites form-style names into dotted paths: `user[firstName]` → `user.firstName`,
/// `a[b][c]` → `a.b.c`, `tags[]` → `tags`.
pub fn normalize_model_name(name: &str) -> String {
    let name = name.strip_suffix("[]").unwrap_or(name);
    name.split('[')
        .map(|segment| segment.replacen(']', "", 1))
        .collect::<Vec<_>>()
        .join(".")
}

/// Resolves the model directive for `element`.
///
/// A non-empty model attribute on the element wins. Otherwise, with `allow_form_fallback`, the
/// nearest enclosing form must carry the wildcard directive; the element's `name` then becomes
/// the path and the form's modifiers carry over.
pub fn resolve_model_directive(
    dom: &Dom,
    element: Id,
    allow_form_fallback: bool,
    config: &BindingConfig,
) -> Result<ModelDirective, ResolutionError> {
    if let Some(value) = dom.attr(element, &config.model_attribute)
        && !value.trim().is_empty()
    {
        let raw = parse_model_attribute(&config.model_attribute, value)?;
        let directive = ModelDirective {
            action: normalize_model_name(&raw.action),
            modifiers: raw.modifiers,
        };
        log::trace!(target: "binding.model", "direct model {directive} on node {}", element.0);
        return Ok(directive);
    }

    if allow_form_fallback && let Some(directive) = form_fallback(dom, element, config)? {
        log::trace!(target: "binding.model", "form model {directive} on node {}", element.0);
        return Ok(directive);
    }

    Err(ResolutionError::MissingModel {
        element: render_opening_tag(dom, element),
        attribute: config.model_attribute.clone(),
    })
}

/// Like [`resolve_model_directive`] with form fallback on, but an element with no binding at
/// all yields `Ok(None)`. Malformed directives still fail.
pub fn find_model_directive(
    dom: &Dom,
    element: Id,
    config: &BindingConfig,
) -> Result<Option<ModelDirective>, ResolutionError> {
    match resolve_model_directive(dom, element, true, config) {
        Ok(directive) => Ok(Some(directive)),
        Err(ResolutionError::MissingModel { .. }) => Ok(None),
        Err(err) => Err(err),
    }
}

fn form_fallback(
    dom: &Dom,
    element: Id,
    config: &BindingConfig,
) -> Result<Option<ModelDirective>, ResolutionError> {
    let Some(form) = dom.closest(element, |e| e.is("form")) else {
        return Ok(None);
    };
    let Some(form_value) = dom.attr(form, &config.model_attribute) else {
        return Ok(None);
    };
    let form_value = if form_value.trim().is_empty() {
        config.wildcard.as_str()
    } else {
        form_value
    };
    let raw = parse_model_attribute(&config.model_attribute, form_value)?;
    if raw.action != config.wildcard {
        log::trace!(
            target: "binding.model",
            "form {} binds {:?}, not the wildcard",
            form.0,
            raw.action
        );
        return Ok(None);
    }

    let Some(name) = dom.attr(element, "name").filter(|n| !n.is_empty()) else {
        return Ok(None);
    };
    Ok(Some(ModelDirective {
        action: normalize_model_name(name),
        modifiers: raw.modifiers,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use html::parse_markup_to_element;

    fn setup(markup: &str) -> (Dom, Id) {
        let mut dom = Dom::new();
        let root = parse_markup_to_element(&mut dom, markup).unwrap();
        let target = dom.find_by_attr(root, "id", "target").unwrap();
        (dom, target)
    }

    fn resolve(markup: &str, fallback: bool) -> Result<ModelDirective, ResolutionError> {
        let (dom, target) = setup(markup);
        resolve_model_directive(&dom, target, fallback, &BindingConfig::default())
    }

    #[test]
    fn normalizes_bracket_names() {
        assert_eq!(normalize_model_name("user[firstName]"), "user.firstName");
        assert_eq!(normalize_model_name("a[b][c]"), "a.b.c");
        assert_eq!(normalize_model_name("firstName"), "firstName");
        assert_eq!(normalize_model_name("tags[]"), "tags");
        assert_eq!(normalize_model_name("user[tags][]"), "user.tags");
    }

    #[test]
    fn direct_attribute_wins() {
        let directive = resolve(
            r#"<form data-model="*"><input id="target" name="other" data-model="user[firstName]"></form>"#,
            true,
        )
        .unwrap();
        assert_eq!(directive.action, "user.firstName");
        assert!(directive.modifiers.is_empty());
    }

    #[test]
    fn wildcard_form_supplies_name_and_modifiers() {
        let directive = resolve(
            r#"<form data-model="on(change)|*"><div><input id="target" name="user[lastName]"></div></form>"#,
            true,
        )
        .unwrap();
        assert_eq!(directive.action, "user.lastName");
        assert_eq!(directive.modifiers, vec![Modifier::new("on", Some("change"))]);
        assert_eq!(directive.to_string(), "on(change)|user.lastName");
    }

    #[test]
    fn empty_form_attribute_counts_as_wildcard() {
        let directive =
            resolve(r#"<form data-model><input id="target" name="color"></form>"#, true).unwrap();
        assert_eq!(directive.action, "color");
    }

    #[test]
    fn fallback_disabled_fails_even_inside_wildcard_form() {
        let err = resolve(
            r#"<form data-model="*"><input id="target" name="color"></form>"#,
            false,
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("Cannot determine the model name"));
    }

    #[test]
    fn missing_model_reports_the_opening_tag() {
        let err = resolve(r#"<div><input id="target" name="color"></div>"#, true).unwrap_err();
        assert_eq!(
            err,
            ResolutionError::MissingModel {
                element: r#"<input id="target" name="color">"#.to_string(),
                attribute: "data-model".to_string(),
            }
        );
    }

    #[test]
    fn non_wildcard_or_nameless_form_fallback_fails() {
        for markup in [
            r#"<form data-model="user"><input id="target" name="color"></form>"#,
            r#"<form><input id="target" name="color"></form>"#,
            r#"<form data-model="*"><input id="target"></form>"#,
            r#"<form data-model="*"><input id="target" name=""></form>"#,
        ] {
            assert!(
                matches!(resolve(markup, true), Err(ResolutionError::MissingModel { .. })),
                "expected {markup} to fail"
            );
        }
    }

    #[test]
    fn only_the_nearest_form_is_considered() {
        let result = resolve(
            r#"<form data-model="*"><form><input id="target" name="color"></form></form>"#,
            true,
        );
        assert!(matches!(result, Err(ResolutionError::MissingModel { .. })));
    }

    #[test]
    fn find_model_directive_swallows_only_missing_models() {
        let config = BindingConfig::default();
        let (dom, target) = setup(r#"<div><span id="target"></span></div>"#);
        assert_eq!(find_model_directive(&dom, target, &config), Ok(None));

        let (dom, target) = setup(r#"<div><input id="target" data-model="name(1)"></div>"#);
        assert!(matches!(
            find_model_directive(&dom, target, &config),
            Err(ResolutionError::ArgumentsNotSupported { .. })
        ));
    }

    #[test]
    fn custom_attribute_names_are_honored() {
        let config = BindingConfig {
            model_attribute: "data-live-model".to_string(),
            ..BindingConfig::default()
        };
        let (dom, target) =
            setup(r#"<form data-live-model="*"><input id="target" name="a[b]"></form>"#);
        let directive = resolve_model_directive(&dom, target, true, &config).unwrap();
        assert_eq!(directive.action, "a.b");
    }
}
