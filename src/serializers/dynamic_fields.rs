//! Client-selected response fields (`?fields=id,name`)

use serde_json::Value;

/// Keep only `fields` in `value`
///
/// Objects lose every key not listed; arrays are shaped element by
/// element. `None` keeps everything, as do scalars. Names that match no
/// key are ignored.
pub fn select_fields(value: Value, fields: Option<&[String]>) -> Value {
    let Some(fields) = fields else {
        return value;
    };

    match value {
        Value::Object(mut map) => {
            map.retain(|key, _| fields.iter().any(|f| f == key));
            Value::Object(map)
        }
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| select_fields(item, Some(fields)))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_none_keeps_all_fields() {
        let value = json!({"id": 1, "name": "a", "price": 3});
        assert_eq!(select_fields(value.clone(), None), value);
    }

    #[test]
    fn test_object_is_restricted() {
        let value = json!({"id": 1, "name": "a", "price": 3});
        let fields = names(&["id", "name", "unknown"]);
        assert_eq!(
            select_fields(value, Some(&fields)),
            json!({"id": 1, "name": "a"})
        );
    }

    #[test]
    fn test_array_elements_are_restricted() {
        let value = json!([{"id": 1, "name": "a"}, {"id": 2, "name": "b"}]);
        let fields = names(&["id"]);
        assert_eq!(
            select_fields(value, Some(&fields)),
            json!([{"id": 1}, {"id": 2}])
        );
    }

    #[test]
    fn test_scalars_pass_through() {
        let fields = names(&["id"]);
        assert_eq!(select_fields(json!(5), Some(&fields)), json!(5));
    }
}
