use crate::config::BindingConfig;
use crate::error::SyncError;
use crate::model::{find_model_directive, resolve_model_directive};
use crate::model_binding::{ModelBinding, UpdateEvent};
use crate::scope::{ControllerScope, belongs_to_controller};
use crate::value::{apply_value_to_element, extract_value};
use html::{Dom, Id};
use value_store::{Value, ValueStore};

/// A store write produced by a DOM event.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelUpdate {
    pub path: String,
    pub value: Value,
    /// `false` when the store already held `value`.
    pub changed: bool,
    pub should_render: bool,
    pub debounce: Option<u64>,
}

/// Pushes `element`'s current value into `store` in response to `event`.
///
/// Returns `Ok(None)` when the binding listens to the other event or the value falls outside
/// the binding's bounds. An element without a resolvable model is an error.
pub fn update_model_from_element(
    dom: &Dom,
    element: Id,
    store: &mut ValueStore,
    event: UpdateEvent,
    config: &BindingConfig,
) -> Result<Option<ModelUpdate>, SyncError> {
    let directive = resolve_model_directive(dom, element, true, config)?;
    let binding = ModelBinding::from_directive(&directive, config)?;

    let expected = binding.event_for(dom, element);
    if expected != event {
        log::debug!(
            target: "binding.sync",
            "skip {} on node {}: bound to {}",
            event.as_str(),
            element.0,
            expected.as_str()
        );
        return Ok(None);
    }

    let value = extract_value(dom, element, store, config);
    if !binding.accepts(dom, element, &value) {
        log::debug!(
            target: "binding.sync",
            "skip {}: {value} is outside the allowed bounds",
            binding.model_name
        );
        return Ok(None);
    }

    let changed = store.set(&binding.model_name, value.clone())?;
    log::trace!(
        target: "binding.sync",
        "{} = {value} (changed={changed})",
        binding.model_name
    );
    Ok(Some(ModelUpdate {
        path: binding.model_name,
        value,
        changed,
        should_render: binding.should_render,
        debounce: binding.debounce,
    }))
}

/// Writes the store's values back into every bound element in `controller`'s own scope.
///
/// Elements whose model path is absent from the store are left alone. Returns how many
/// elements were written.
pub fn apply_store_to_elements(
    dom: &mut Dom,
    controller: &impl ControllerScope,
    store: &ValueStore,
    config: &BindingConfig,
) -> Result<usize, SyncError> {
    let root = controller.element();
    let mut targets: Vec<(Id, Value)> = Vec::new();
    for node in dom.descendants(root) {
        if dom.element(node).is_none() || !belongs_to_controller(dom, node, controller) {
            continue;
        }
        let Some(directive) = find_model_directive(dom, node, config)? else {
            continue;
        };
        let binding = ModelBinding::from_directive(&directive, config)?;
        if let Some(value) = store.get(&binding.model_name) {
            targets.push((node, value.clone()));
        }
    }

    for (node, value) in &targets {
        apply_value_to_element(dom, *node, value, config)?;
    }
    log::trace!(
        target: "binding.sync",
        "wrote {} elements under node {}",
        targets.len(),
        root.0
    );
    Ok(targets.len())
}
