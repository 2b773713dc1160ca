use crate::error::StoreError;
use serde_json::{Map, Value};

/// Reads the value at a dotted `path`; every segment must step into a mapping.
pub fn get_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    path.split('.')
        .try_fold(root, |current, segment| current.as_object()?.get(segment))
}

/// Writes `value` at a dotted `path`, creating missing (or `null`) intermediate mappings.
///
/// Returns whether the stored value changed. Fails without modifying `root` when an existing
/// intermediate value is not a mapping.
pub fn set_path(root: &mut Value, path: &str, value: Value) -> Result<bool, StoreError> {
    if path.is_empty() {
        return Err(StoreError::EmptyPath);
    }
    let segments: Vec<&str> = path.split('.').collect();
    let (last, parents) = segments
        .split_last()
        .ok_or(StoreError::EmptyPath)?;

    // Validate first so a failing write leaves no half-created branches behind.
    let mut probe = Some(&*root);
    for (depth, segment) in parents.iter().enumerate() {
        match probe {
            Some(Value::Object(map)) => probe = map.get(*segment),
            Some(Value::Null) | None => break,
            Some(_) => {
                return Err(StoreError::ParentNotMapping {
                    path: path.to_string(),
                    parent: parents[..depth].join("."),
                });
            }
        }
    }
    if let Some(found) = probe
        && !found.is_object()
        && !found.is_null()
    {
        return Err(StoreError::ParentNotMapping {
            path: path.to_string(),
            parent: parents.join("."),
        });
    }

    let mut current = root;
    for segment in parents {
        if current.is_null() {
            *current = Value::Object(Map::new());
        }
        current = match current {
            Value::Object(map) => map.entry(*segment).or_insert(Value::Null),
            _ => unreachable!("intermediate segments were validated as mappings"),
        };
    }
    if current.is_null() {
        *current = Value::Object(Map::new());
    }
    let Value::Object(map) = current else {
        unreachable!("parent segment was validated as a mapping");
    };
    if map.get(*last) == Some(&value) {
        return Ok(false);
    }
    map.insert((*last).to_string(), value);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_descends_through_mappings_only() {
        let data = json!({"user": {"firstName": "Ryan"}, "tags": ["a", "b"]});
        assert_eq!(get_path(&data, "user.firstName"), Some(&json!("Ryan")));
        assert_eq!(get_path(&data, "tags"), Some(&json!(["a", "b"])));
        assert_eq!(get_path(&data, "tags.0"), None);
        assert_eq!(get_path(&data, "user.lastName"), None);
        assert_eq!(get_path(&data, "user.firstName.length"), None);
        assert_eq!(get_path(&data, ""), None);
    }

    #[test]
    fn set_creates_missing_intermediate_mappings() {
        let mut data = json!({});
        assert_eq!(set_path(&mut data, "a.b.c", json!(1)), Ok(true));
        assert_eq!(data, json!({"a": {"b": {"c": 1}}}));

        let mut data = json!({"a": null});
        assert_eq!(set_path(&mut data, "a.b", json!(true)), Ok(true));
        assert_eq!(data, json!({"a": {"b": true}}));
    }

    #[test]
    fn set_reports_unchanged_values() {
        let mut data = json!({"name": "x"});
        assert_eq!(set_path(&mut data, "name", json!("x")), Ok(false));
        assert_eq!(set_path(&mut data, "name", json!("y")), Ok(true));
    }

    #[test]
    fn set_refuses_to_replace_scalar_parents() {
        let mut data = json!({"a": {"b": 5}, "list": [1]});
        let before = data.clone();

        assert_eq!(
            set_path(&mut data, "a.b.c.d", json!(1)),
            Err(StoreError::ParentNotMapping {
                path: "a.b.c.d".to_string(),
                parent: "a.b".to_string(),
            })
        );
        assert_eq!(
            set_path(&mut data, "list.x", json!(1)),
            Err(StoreError::ParentNotMapping {
                path: "list.x".to_string(),
                parent: "list".to_string(),
            })
        );
        assert_eq!(data, before);
    }

    #[test]
    fn set_rejects_empty_path() {
        let mut data = json!({});
        assert_eq!(set_path(&mut data, "", json!(1)), Err(StoreError::EmptyPath));
    }
}
