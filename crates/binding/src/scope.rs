//! Controller ownership: which component instance a DOM node belongs to.
//!
//! Controllers live in a [`ControllerRegistry`]; a controller refers to its children by
//! [`ControllerId`] only, so removing one never leaves a dangling owner behind.

use crate::error::RegistryError;
use html::{Dom, Id};
use std::collections::HashMap;
use value_store::ValueStore;

/// Opaque handle for a registered controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControllerId(u64);

impl ControllerId {
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

/// What ownership checks need to know about a controller.
pub trait ControllerScope {
    /// Root element of the controller.
    fn element(&self) -> Id;
    /// Root elements of the directly nested child controllers.
    fn child_controller_elements(&self) -> Vec<Id>;
}

/// Whether `node` lies inside `controller`'s own scope.
///
/// Requires strict containment: the controller's root itself is not owned. Walking up from
/// `node`, hitting a child controller's root before reaching the controller's root means the
/// node belongs to that child (or deeper) instead.
pub fn belongs_to_controller(dom: &Dom, node: Id, controller: &impl ControllerScope) -> bool {
    let root = controller.element();
    if !dom.is_descendant_of(node, root) {
        return false;
    }
    let children = controller.child_controller_elements();
    for current in std::iter::once(node).chain(dom.ancestors(node)) {
        if current == root {
            return true;
        }
        if children.contains(&current) {
            log::trace!(
                target: "binding.scope",
                "node {} is inside child controller rooted at {}",
                node.0,
                current.0
            );
            return false;
        }
    }
    false
}

#[derive(Debug, Clone)]
pub struct Controller {
    pub id: ControllerId,
    pub element: Id,
    pub data: ValueStore,
    pub parent: Option<ControllerId>,
    pub children: Vec<ControllerId>,
}

#[derive(Debug, Default)]
pub struct ControllerRegistry {
    controllers: HashMap<ControllerId, Controller>,
    next_id: u64,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a controller rooted at `element` and appends it to `parent`'s children.
    pub fn register(
        &mut self,
        element: Id,
        data: ValueStore,
        parent: Option<ControllerId>,
    ) -> Result<ControllerId, RegistryError> {
        let id = ControllerId(self.next_id);
        if let Some(parent) = parent {
            self.controllers
                .get_mut(&parent)
                .ok_or(RegistryError::UnknownController(parent))?
                .children
                .push(id);
        }
        self.next_id += 1;
        self.controllers.insert(
            id,
            Controller {
                id,
                element,
                data,
                parent,
                children: Vec::new(),
            },
        );
        log::trace!(
            target: "binding.scope",
            "registered {id:?} at node {} parent={parent:?}",
            element.0
        );
        Ok(id)
    }

    /// Removes a controller and its entry in the parent's child list. Its own children stay
    /// registered and become top-level.
    pub fn unregister(&mut self, id: ControllerId) -> Result<Controller, RegistryError> {
        let controller = self
            .controllers
            .remove(&id)
            .ok_or(RegistryError::UnknownController(id))?;
        if let Some(parent) = controller.parent
            && let Some(parent) = self.controllers.get_mut(&parent)
        {
            parent.children.retain(|child| *child != id);
        }
        for child in &controller.children {
            if let Some(child) = self.controllers.get_mut(child) {
                child.parent = None;
            }
        }
        Ok(controller)
    }

    pub fn get(&self, id: ControllerId) -> Option<&Controller> {
        self.controllers.get(&id)
    }

    pub fn get_mut(&mut self, id: ControllerId) -> Option<&mut Controller> {
        self.controllers.get_mut(&id)
    }

    /// Registered controllers in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Controller> {
        let mut controllers: Vec<&Controller> = self.controllers.values().collect();
        controllers.sort_by_key(|c| c.id);
        controllers.into_iter()
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    pub fn scope(&self, id: ControllerId) -> Option<RegisteredScope<'_>> {
        let controller = self.controllers.get(&id)?;
        Some(RegisteredScope {
            registry: self,
            controller,
        })
    }
}

/// A registered controller viewed through its registry, so child ids resolve to elements.
pub struct RegisteredScope<'a> {
    registry: &'a ControllerRegistry,
    controller: &'a Controller,
}

impl ControllerScope for RegisteredScope<'_> {
    fn element(&self) -> Id {
        self.controller.element
    }

    fn child_controller_elements(&self) -> Vec<Id> {
        self.controller
            .children
            .iter()
            .filter_map(|child| self.registry.get(*child))
            .map(|child| child.element)
            .collect()
    }
}

/// The controller whose own scope contains `node`, nearest root first.
pub fn find_owning_controller(
    dom: &Dom,
    registry: &ControllerRegistry,
    node: Id,
) -> Option<ControllerId> {
    for ancestor in dom.ancestors(node) {
        for controller in registry.iter().filter(|c| c.element == ancestor) {
            if let Some(scope) = registry.scope(controller.id)
                && belongs_to_controller(dom, node, &scope)
            {
                return Some(controller.id);
            }
        }
    }
    None
}
