use serde_json::Value;

use super::{Field, FieldValue, Walkable};

/// JSON documents are walkable as-is: object members are fields, arrays are
/// sequences and every other value is a scalar.
impl Walkable for Value {
    fn type_name(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    fn fields(&self) -> Vec<Field<'_>> {
        match self {
            Value::Object(members) => members
                .iter()
                .map(|(name, value)| Field::new(name.as_str(), json_field_value(value)))
                .collect(),
            _ => Vec::new(),
        }
    }
}

fn json_field_value(value: &Value) -> FieldValue<'_> {
    match value {
        Value::Null => FieldValue::Null,
        Value::Bool(flag) => FieldValue::scalar(flag),
        Value::Number(number) => FieldValue::scalar(number),
        Value::String(text) => FieldValue::text(text),
        Value::Array(items) => FieldValue::Sequence(items.iter().map(json_field_value).collect()),
        Value::Object(_) => FieldValue::Object(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_members_become_fields() {
        let doc = json!({ "name": "widget", "count": 3, "active": false, "missing": null });
        let rendered: Vec<(String, String)> = doc
            .fields()
            .into_iter()
            .map(|field| (field.name.to_string(), field.value.unwrap().render()))
            .collect();

        assert!(rendered.contains(&("name".to_string(), "widget".to_string())));
        assert!(rendered.contains(&("count".to_string(), "3".to_string())));
        assert!(rendered.contains(&("active".to_string(), "false".to_string())));
        assert!(rendered.contains(&("missing".to_string(), String::new())));
    }

    #[test]
    fn test_arrays_and_nested_objects() {
        let doc = json!({ "tags": ["a", 1], "child": { "id": 9 } });
        for field in doc.fields() {
            match (&*field.name, field.value.unwrap()) {
                ("tags", FieldValue::Sequence(items)) => {
                    let values: Vec<String> = items.iter().map(FieldValue::render).collect();
                    assert_eq!(values, vec!["a", "1"]);
                }
                ("child", FieldValue::Object(child)) => {
                    assert_eq!(child.type_name(), "object");
                    assert_eq!(child.fields().len(), 1);
                }
                (name, value) => panic!("unexpected field {} = {:?}", name, value),
            }
        }
    }

    #[test]
    fn test_non_objects_have_no_fields() {
        assert!(json!([1, 2]).fields().is_empty());
        assert!(json!("text").fields().is_empty());
        assert_eq!(json!(1.5).type_name(), "number");
    }
}
