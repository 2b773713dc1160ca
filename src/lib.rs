//! # live_binding
//!
//! DOM-to-model value resolution and controller scoping for reactive components.
//!
//! - [`html`]: arena DOM, fragment parsing, cloning, opening-tag serialization
//! - [`value_store`]: component data addressed by dotted model paths
//! - [`binding`]: model paths, element values, modifiers, controller ownership
//!
//! The most used items are re-exported at the root.

pub use binding;
pub use html;
pub use value_store;

pub use binding::{
    BindingConfig, ControllerRegistry, ControllerScope, ModelDirective, ModelUpdate,
    ResolutionError, SyncError, UpdateEvent, apply_store_to_elements, apply_value_to_element,
    belongs_to_controller, extract_value, find_owning_controller, resolve_model_directive,
    update_model_from_element,
};
pub use html::{Dom, Id, clone_element, parse_markup_to_element, render_opening_tag};
pub use value_store::ValueStore;
