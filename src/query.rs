use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;

/// A scalar a selector can compare a document field against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl FieldValue {
    fn to_json(&self) -> Value {
        match self {
            FieldValue::String(s) => Value::String(s.clone()),
            FieldValue::Int(i) => Value::from(*i),
            FieldValue::Float(f) => Value::from(*f),
            FieldValue::Bool(b) => Value::Bool(*b),
        }
    }
}

// Helper trait to convert types to FieldValue
pub trait ToFieldValue {
    fn to_field_value(&self) -> FieldValue;
}

impl ToFieldValue for String {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::String(self.clone())
    }
}

impl ToFieldValue for &str {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::String(self.to_string())
    }
}

impl ToFieldValue for i64 {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Int(*self)
    }
}

impl ToFieldValue for i32 {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Int(*self as i64)
    }
}

impl ToFieldValue for f64 {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Float(*self)
    }
}

impl ToFieldValue for bool {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Bool(*self)
    }
}

impl ToFieldValue for FieldValue {
    fn to_field_value(&self) -> FieldValue {
        self.clone()
    }
}

/// Equality conjunction over document fields, rendered as a rich-query
/// selector.
///
/// Fields are kept sorted so two peers building the same selector send the
/// same query text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selector {
    fields: BTreeMap<String, FieldValue>,
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adding the same field twice keeps the last value.
    pub fn where_eq(self, field: &str, value: impl ToFieldValue) -> Self {
        let mut consumed_self = self;
        consumed_self
            .fields
            .insert(field.to_string(), value.to_field_value());
        consumed_self
    }

    pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// `{"selector":{"field":"value","n":1}}`. Strings come out quoted and
    /// escaped, numbers and booleans bare.
    pub fn to_query(&self) -> Result<String, Error> {
        let selector: Map<String, Value> = self
            .fields
            .iter()
            .map(|(field, value)| (field.clone(), value.to_json()))
            .collect();

        let mut root = Map::new();
        root.insert("selector".to_string(), Value::Object(selector));

        serde_json::to_string(&Value::Object(root)).map_err(|e| Error::Serialize(e.to_string()))
    }
}

impl<K: Into<String>, V: ToFieldValue> FromIterator<(K, V)> for Selector {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.to_field_value()))
                .collect(),
        }
    }
}
