// src/report/record.rs

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Number, Value};

/// One output row: field name → value, serialized in insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OutputRecord {
    fields: Vec<(&'static str, Value)>,
}

impl OutputRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &'static str, value: Value) {
        self.fields.push((name, value));
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(n, _)| *n)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Finite numbers only; anything else becomes `null`.
pub fn number(v: Option<f64>) -> Value {
    v.and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

pub fn text(v: Option<String>) -> Value {
    v.map(Value::String).unwrap_or(Value::Null)
}

impl Serialize for OutputRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
