//! Component data store: server-confirmed props with an overlay of local writes.
//!
//! Local writes (from DOM interactions) are recorded as dirty until the runtime takes them for
//! sending. Server-pushed props replace the confirmed layer; dirty writes that have not been
//! taken yet stay on top so an in-flight edit is never lost.

use crate::error::StoreError;
use crate::path::{get_path, set_path};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValueStore {
    props: Map<String, Value>,
    dirty: BTreeMap<String, Value>,
    // `props` with `dirty` applied; what every read sees.
    current: Value,
}

impl ValueStore {
    pub fn new(props: Map<String, Value>) -> Self {
        Self {
            current: Value::Object(props.clone()),
            props,
            dirty: BTreeMap::new(),
        }
    }

    /// Builds a store from a JSON value, which must be a mapping.
    pub fn from_value(props: Value) -> Result<Self, StoreError> {
        match props {
            Value::Object(map) => Ok(Self::new(map)),
            _ => Err(StoreError::NotAMapping),
        }
    }

    /// Returns the current value at `path`, dirty writes included.
    pub fn get(&self, path: &str) -> Option<&Value> {
        get_path(&self.current, path)
    }

    /// Returns `true` if a value (including `null`) exists at `path`.
    pub fn has(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Writes `value` at `path` and marks the path dirty.
    ///
    /// Returns `true` if the value actually changed; writing the current value is a no-op and
    /// does not mark anything dirty. Pending writes below `path` are superseded and dropped, so
    /// a parent entry always sorts before any nested entry still pending.
    pub fn set(&mut self, path: &str, value: Value) -> Result<bool, StoreError> {
        if self.get(path) == Some(&value) {
            return Ok(false);
        }
        let changed = set_path(&mut self.current, path, value.clone())?;
        log::trace!(target: "value_store", "set {path} = {value}");
        let nested = format!("{path}.");
        self.dirty.retain(|key, _| !key.starts_with(&nested));
        self.dirty.insert(path.to_string(), value);
        Ok(changed)
    }

    /// Local writes not yet taken by [`take_dirty`](Self::take_dirty), keyed by path.
    pub fn dirty_props(&self) -> &BTreeMap<String, Value> {
        &self.dirty
    }

    pub fn is_dirty(&self, path: &str) -> bool {
        self.dirty.contains_key(path)
    }

    /// Hands the dirty writes to the caller (typically to send them upstream).
    ///
    /// Reads keep observing the taken values until the next
    /// [`reinitialize_all_props`](Self::reinitialize_all_props).
    pub fn take_dirty(&mut self) -> BTreeMap<String, Value> {
        std::mem::take(&mut self.dirty)
    }

    /// Replaces the confirmed props (e.g. after a server round-trip) and re-applies pending
    /// dirty writes on top.
    ///
    /// Returns the top-level keys whose confirmed value changed, added or removed, sorted.
    pub fn reinitialize_all_props(&mut self, props: Map<String, Value>) -> Vec<String> {
        let mut changed: Vec<String> = props
            .iter()
            .filter(|(key, value)| self.props.get(key.as_str()) != Some(*value))
            .map(|(key, _)| key.clone())
            .chain(
                self.props
                    .keys()
                    .filter(|key| !props.contains_key(key.as_str()))
                    .cloned(),
            )
            .collect();
        changed.sort();

        self.props = props;
        self.current = Value::Object(self.props.clone());
        let dirty = std::mem::take(&mut self.dirty);
        for (path, value) in dirty {
            match set_path(&mut self.current, &path, value.clone()) {
                Ok(_) => {
                    self.dirty.insert(path, value);
                }
                Err(err) => {
                    log::debug!(target: "value_store", "dropping dirty write: {err}");
                }
            }
        }
        changed
    }

    /// Current merged view of all props.
    pub fn all_props(&self) -> &Value {
        &self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store(value: Value) -> ValueStore {
        ValueStore::from_value(value).unwrap()
    }

    #[test]
    fn from_value_requires_a_mapping() {
        assert_eq!(
            ValueStore::from_value(json!([1, 2])),
            Err(StoreError::NotAMapping)
        );
    }

    #[test]
    fn get_and_has_follow_nested_paths() {
        let store = store(json!({"user": {"firstName": "Ryan", "nick": null}}));
        assert_eq!(store.get("user.firstName"), Some(&json!("Ryan")));
        assert!(store.has("user.nick"));
        assert!(!store.has("user.lastName"));
        assert!(!store.has("user.firstName.first"));
    }

    #[test]
    fn set_marks_only_real_changes_dirty() {
        let mut store = store(json!({"name": "x"}));
        assert_eq!(store.set("name", json!("x")), Ok(false));
        assert!(store.dirty_props().is_empty());

        assert_eq!(store.set("name", json!("y")), Ok(true));
        assert_eq!(store.get("name"), Some(&json!("y")));
        assert!(store.is_dirty("name"));
    }

    #[test]
    fn nested_writes_are_visible_from_parent_paths() {
        let mut store = store(json!({"user": {"firstName": "Ryan"}}));
        store.set("user.lastName", json!("Weaver")).unwrap();
        assert_eq!(
            store.get("user"),
            Some(&json!({"firstName": "Ryan", "lastName": "Weaver"}))
        );
    }

    #[test]
    fn take_dirty_flushes_but_keeps_values_readable() {
        let mut store = store(json!({}));
        store.set("a", json!(1)).unwrap();
        store.set("b.c", json!(2)).unwrap();

        let taken = store.take_dirty();
        assert_eq!(taken.keys().collect::<Vec<_>>(), vec!["a", "b.c"]);
        assert!(store.dirty_props().is_empty());
        assert_eq!(store.get("b.c"), Some(&json!(2)));
    }

    #[test]
    fn reinitialize_keeps_pending_dirty_writes_on_top() {
        let mut store = store(json!({"name": "a", "count": 1}));
        store.set("name", json!("local")).unwrap();

        let props = json!({"name": "server", "count": 2, "extra": true});
        let Value::Object(props) = props else {
            unreachable!()
        };
        let changed = store.reinitialize_all_props(props);

        assert_eq!(changed, vec!["count", "extra", "name"]);
        assert_eq!(store.get("name"), Some(&json!("local")));
        assert_eq!(store.get("count"), Some(&json!(2)));
        assert!(store.is_dirty("name"));
    }

    #[test]
    fn parent_write_supersedes_pending_nested_writes() {
        let mut store = store(json!({"a": {}}));
        store.set("a.b", json!(1)).unwrap();
        store.set("ab", json!(3)).unwrap();
        store.set("a", json!({"c": 2})).unwrap();
        assert_eq!(store.dirty_props().keys().collect::<Vec<_>>(), vec!["a", "ab"]);

        let Value::Object(props) = json!({"a": {}}) else {
            unreachable!()
        };
        store.reinitialize_all_props(props);
        assert_eq!(store.get("a"), Some(&json!({"c": 2})));
        assert_eq!(store.get("ab"), Some(&json!(3)));

        let taken = store.take_dirty();
        assert_eq!(taken.get("a"), Some(&json!({"c": 2})));
        assert!(!taken.contains_key("a.b"));
    }

    #[test]
    fn nested_write_after_parent_write_replays_on_top() {
        let mut store = store(json!({}));
        store.set("a", json!({"c": 2})).unwrap();
        store.set("a.b", json!(1)).unwrap();

        let Value::Object(props) = json!({}) else {
            unreachable!()
        };
        store.reinitialize_all_props(props);
        assert_eq!(store.get("a"), Some(&json!({"b": 1, "c": 2})));
    }

    #[test]
    fn reinitialize_reports_removed_keys_and_drops_unplaceable_writes() {
        let mut store = store(json!({"a": {"b": 1}, "gone": 1}));
        store.set("a.b", json!(2)).unwrap();

        let Value::Object(props) = json!({"a": 5}) else {
            unreachable!()
        };
        let changed = store.reinitialize_all_props(props);

        assert_eq!(changed, vec!["a", "gone"]);
        assert_eq!(store.get("a"), Some(&json!(5)));
        assert!(store.dirty_props().is_empty());
    }
}
