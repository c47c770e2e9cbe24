use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

use crate::ir::{CanonicalNode, Person};

/// Adapt an arbitrary input node into the canonical form. Two shapes are
/// accepted: a wrapper record `{ person, spouse? | spouses?, children? }`, or
/// a bare person object carrying the same optional fields inline. Anything
/// that is not an object yields `None`.
///
/// This is the only place in the crate that inspects raw input; the layout
/// and render passes operate on `CanonicalNode` exclusively.
pub fn normalize(value: &Value) -> Option<CanonicalNode> {
    let obj = match value {
        Value::Null => return None,
        Value::Object(obj) => obj,
        other => {
            debug!(kind = json_kind(other), "ignoring non-object tree node");
            return None;
        }
    };

    if let Some(person_value) = obj.get("person") {
        // Wrapper shape: explicit person/spouses/children fields.
        let person = person_from(person_value)?;
        let mut node = CanonicalNode::new(person);
        match obj.get("spouses") {
            Some(Value::Array(entries)) => {
                node.spouses = entries.iter().filter_map(person_from).collect();
            }
            other => {
                if matches!(other, Some(v) if !v.is_null()) {
                    debug!("wrapper `spouses` is not an array, treating as absent");
                }
                if let Some(spouse) = obj.get("spouse").and_then(person_from) {
                    node.spouses.push(spouse);
                }
            }
        }
        node.children = children_from(obj.get("children"));
        return Some(node);
    }

    // Bare person shape: the object itself is the primary person, with
    // optional spouse/spouses/children fields alongside its attributes.
    let person = person_from(value)?;
    let mut node = CanonicalNode::new(person);
    if let Some(spouse) = obj.get("spouse").and_then(person_from) {
        node.spouses.push(spouse);
    }
    if let Some(Value::Array(entries)) = obj.get("spouses") {
        node.spouses.extend(entries.iter().filter_map(person_from));
    }
    node.children = children_from(obj.get("children"));
    Some(node)
}

fn children_from(value: Option<&Value>) -> Vec<CanonicalNode> {
    match value {
        Some(Value::Array(entries)) => entries.iter().filter_map(normalize).collect(),
        Some(other) if !other.is_null() => {
            debug!("`children` is not an array, treating as empty");
            Vec::new()
        }
        _ => Vec::new(),
    }
}

fn person_from(value: &Value) -> Option<Person> {
    let obj = value.as_object()?;
    let mut person = Person::default();
    let mut extra = BTreeMap::new();
    for (key, field) in obj {
        match key.as_str() {
            "id" => person.id = id_string(field),
            "name" => person.name = field.as_str().map(str::to_string),
            // Structural fields belong to the node, not the person record.
            "spouse" | "spouses" | "children" => {}
            _ => {
                extra.insert(key.clone(), field.clone());
            }
        }
    }
    person.extra = extra;
    Some(person)
}

/// Ids arrive as integers from the relational backend and as strings from
/// hand-written fixtures; both are accepted.
fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_input_yields_none() {
        assert!(normalize(&Value::Null).is_none());
        assert!(normalize(&json!(42)).is_none());
    }

    #[test]
    fn wrapper_shape_with_spouses_array() {
        let value = json!({
            "person": { "id": 1, "name": "Ada" },
            "spouses": [{ "id": 2, "name": "Ben" }, null, { "id": 3 }],
            "children": [{ "person": { "id": 4, "name": "Cleo" } }]
        });
        let node = normalize(&value).unwrap();
        assert_eq!(node.person.id.as_deref(), Some("1"));
        assert_eq!(node.spouses.len(), 2);
        assert_eq!(node.spouses[0].name.as_deref(), Some("Ben"));
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.children[0].person.name.as_deref(), Some("Cleo"));
    }

    #[test]
    fn wrapper_singular_spouse_fallback() {
        let value = json!({
            "person": { "id": 1 },
            "spouse": { "id": 2, "name": "Ben" }
        });
        let node = normalize(&value).unwrap();
        assert_eq!(node.spouses.len(), 1);
        assert_eq!(node.spouses[0].id.as_deref(), Some("2"));
    }

    #[test]
    fn bare_person_collects_singular_then_plural_spouses() {
        let value = json!({
            "id": "root",
            "name": "Ada",
            "spouse": { "id": "s1" },
            "spouses": [{ "id": "s2" }],
            "children": [{ "id": "c1" }]
        });
        let node = normalize(&value).unwrap();
        let ids: Vec<_> = node.spouses.iter().filter_map(|s| s.id.as_deref()).collect();
        assert_eq!(ids, ["s1", "s2"]);
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.children[0].person.id.as_deref(), Some("c1"));
    }

    #[test]
    fn malformed_collections_degrade_to_empty() {
        let value = json!({
            "person": { "id": 1 },
            "spouses": "not-a-list",
            "children": { "oops": true }
        });
        let node = normalize(&value).unwrap();
        assert!(node.spouses.is_empty());
        assert!(node.children.is_empty());
    }

    #[test]
    fn extra_attributes_ride_along() {
        let value = json!({
            "id": 7,
            "name": "Ada",
            "birthdate": "1815-12-10",
            "biography": "mathematician"
        });
        let node = normalize(&value).unwrap();
        assert_eq!(node.person.extra.len(), 2);
        assert_eq!(
            node.person.extra.get("birthdate").and_then(|v| v.as_str()),
            Some("1815-12-10")
        );
    }

    #[test]
    fn person_without_id_is_kept_for_layout() {
        // Drawing skips it later; the subtree still occupies space.
        let value = json!({ "name": "mystery" });
        let node = normalize(&value).unwrap();
        assert!(node.person.id.is_none());
        assert_eq!(node.person.display_name(), "mystery");
    }
}
