use crate::core::value::{FieldValue, Value};
use serde::{Deserialize, Serialize};

/// One row from a source table. Rows are owned by the batch that produced
/// them and carry no identity beyond their field values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub field_values: Vec<FieldValue>,
}

impl Record {
    pub fn new(field_values: Vec<FieldValue>) -> Self {
        Record { field_values }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.field_values
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(field))
    }

    pub fn get_value(&self, field: &str) -> Value {
        self.get(field)
            .map(|f| f.value.clone())
            .unwrap_or(Value::Null)
    }

    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .field_values
            .iter()
            .map(|f| {
                let value = match &f.value {
                    Value::Int(v) => serde_json::json!(v),
                    Value::Uint(v) => serde_json::json!(v),
                    Value::Float(v) => serde_json::json!(v),
                    Value::String(v) => serde_json::json!(v),
                    Value::Boolean(v) => serde_json::json!(v),
                    Value::Bytes(v) => serde_json::json!(format!("<{} bytes>", v.len())),
                    Value::Null => serde_json::Value::Null,
                };
                (f.name.clone(), value)
            })
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        Record::new(vec![
            FieldValue::new("id", Value::Uint(1)),
            FieldValue::new("name", Value::String("Ada".into())),
            FieldValue::new("age", Value::Int(36)),
        ])
    }

    #[test]
    fn get_is_case_insensitive() {
        let record = sample();
        assert_eq!(record.get_value("AGE"), Value::Int(36));
        assert_eq!(record.get_value("Name"), Value::String("Ada".into()));
    }

    #[test]
    fn missing_field_is_null() {
        assert_eq!(sample().get_value("email"), Value::Null);
    }

    #[test]
    fn json_projection_keeps_field_names() {
        let json = sample().to_json();
        assert_eq!(json["id"], serde_json::json!(1));
        assert_eq!(json["name"], serde_json::json!("Ada"));
    }
}
