//! # value_store
//!
//! Component data addressed by dotted model paths (`user.firstName`).
//!
//! - [`ValueStore`]: server-confirmed props plus an overlay of local, not-yet-sent writes
//! - [`get_path`] / [`set_path`]: the path addressing rules, usable on any JSON value
//!
//! Reads only descend through mappings: `tags.0` does not index into a sequence, it reads as
//! absent. Writes create missing intermediate mappings but never replace an existing scalar
//! or sequence.

mod error;
mod path;
mod store;

pub use error::StoreError;
pub use path::{get_path, set_path};
pub use store::ValueStore;

pub use serde_json::{Map, Value};
