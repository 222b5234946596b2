//! JSON document helpers

use serde_json::{Map, Value};

/// Merge `patch` into `base`
///
/// Objects merge key by key, recursively. Any other value (arrays
/// included) replaces the base value, and an explicit `null` clears it.
pub fn deep_merge(base: &mut Value, patch: &Value) {
    match (base, patch) {
        (Value::Object(base_map), Value::Object(patch_map)) => {
            for (key, patch_value) in patch_map {
                match base_map.get_mut(key) {
                    Some(base_value) if base_value.is_object() && patch_value.is_object() => {
                        deep_merge(base_value, patch_value);
                    }
                    _ => {
                        base_map.insert(key.clone(), patch_value.clone());
                    }
                }
            }
        }
        (base, patch) => *base = patch.clone(),
    }
}

/// Keep only `fields` (plus `id`) of an object
pub fn project(value: Value, fields: &[String]) -> Value {
    match value {
        Value::Object(map) if !fields.is_empty() => {
            let kept: Map<String, Value> = map
                .into_iter()
                .filter(|(key, _)| key == "id" || fields.iter().any(|f| f == key))
                .collect();
            Value::Object(kept)
        }
        other => other,
    }
}

/// Remove keys that clients may not set
pub fn strip_keys(value: &mut Value, keys: &[&str]) {
    if let Value::Object(map) = value {
        for key in keys {
            map.remove(*key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deep_merge_nested_objects() {
        let mut base = json!({
            "email": "a@example.com",
            "profile": { "firstName": "Ada", "lastName": "Lovelace", "phone": "1" }
        });
        deep_merge(
            &mut base,
            &json!({ "profile": { "lastName": "King", "phone": null } }),
        );
        assert_eq!(base["email"], "a@example.com");
        assert_eq!(base["profile"]["firstName"], "Ada");
        assert_eq!(base["profile"]["lastName"], "King");
        assert!(base["profile"]["phone"].is_null());
    }

    #[test]
    fn test_deep_merge_replaces_arrays() {
        let mut base = json!({ "delivery": [1, 2, 3] });
        deep_merge(&mut base, &json!({ "delivery": [4] }));
        assert_eq!(base["delivery"], json!([4]));
    }

    #[test]
    fn test_deep_merge_adds_new_keys() {
        let mut base = json!({ "siteData": { "title": "a" } });
        deep_merge(&mut base, &json!({ "facebook": { "pageId": "1" } }));
        assert_eq!(base["facebook"]["pageId"], "1");
        assert_eq!(base["siteData"]["title"], "a");
    }

    #[test]
    fn test_project_keeps_id() {
        let value = json!({ "id": "user:1", "email": "a@example.com", "role": "customer" });
        let projected = project(value, &["email".to_string()]);
        assert_eq!(projected, json!({ "id": "user:1", "email": "a@example.com" }));
    }

    #[test]
    fn test_project_without_fields_is_identity() {
        let value = json!({ "id": "user:1", "email": "a@example.com" });
        assert_eq!(project(value.clone(), &[]), value);
    }

    #[test]
    fn test_strip_keys() {
        let mut value = json!({ "id": "x", "createdAt": "y", "name": "z" });
        strip_keys(&mut value, &["id", "createdAt"]);
        assert_eq!(value, json!({ "name": "z" }));
    }
}
