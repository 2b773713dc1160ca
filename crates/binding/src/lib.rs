//! # binding
//!
//! Connects form-capable DOM elements to component data.
//!
//! - [`resolve_model_directive`]: which model path an element is bound to (`data-model`, or
//!   the element's `name` inside a `<form data-model="*">`)
//! - [`extract_value`] / [`apply_value_to_element`]: element value in, store value out
//! - [`ModelBinding`]: modifiers (`on(change)`, `debounce(300)`, bounds) interpreted
//! - [`belongs_to_controller`] / [`ControllerRegistry`]: scoping of nodes to nested
//!   component instances
//! - [`update_model_from_element`]: the event-to-store flow tying the above together
//!
//! Attribute names and defaults come from [`BindingConfig`].

mod category;
mod config;
mod directive;
mod error;
mod model;
mod model_binding;
mod scope;
mod sync;
mod value;

pub use category::{ElementCategory, InputKind, input_kind, is_numeric_input, is_textual_input};
pub use config::{BindingConfig, ConfigError};
pub use directive::Modifier;
pub use error::{RegistryError, ResolutionError, SyncError};
pub use model::{
    ModelDirective, find_model_directive, normalize_model_name, resolve_model_directive,
};
pub use model_binding::{ModelBinding, UpdateEvent};
pub use scope::{
    Controller, ControllerId, ControllerRegistry, ControllerScope, RegisteredScope,
    belongs_to_controller, find_owning_controller,
};
pub use sync::{ModelUpdate, apply_store_to_elements, update_model_from_element};
pub use value::{apply_value_to_element, extract_value};
