use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::classify::OK;
use crate::error::ClientError;

/// Flat field name to value mapping, as supplied by callers and canned data.
pub type Mapping = BTreeMap<String, FieldValue>;

/// A zero-argument value factory, evaluated when a record is built.
#[derive(Clone, Copy)]
pub struct Generator(fn() -> Value);

impl Generator {
    #[must_use]
    pub const fn new(f: fn() -> Value) -> Self {
        Self(f)
    }

    #[must_use]
    pub fn call(self) -> Value {
        (self.0)()
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Generator(..)")
    }
}

impl PartialEq for Generator {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::fn_addr_eq(self.0, other.0)
    }
}

/// How a field gets its value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Constant(Value),
    Generate(Generator),
}

impl FieldValue {
    /// Concrete value of this field, invoking the generator if there is one.
    #[must_use]
    pub fn resolve(&self) -> Value {
        match self {
            FieldValue::Constant(v) => v.clone(),
            FieldValue::Generate(g) => g.call(),
        }
    }

    #[must_use]
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            FieldValue::Constant(v) => Some(v),
            FieldValue::Generate(_) => None,
        }
    }

    #[must_use]
    pub fn is_generator(&self) -> bool {
        matches!(self, FieldValue::Generate(_))
    }
}

impl From<Value> for FieldValue {
    fn from(v: Value) -> Self {
        FieldValue::Constant(v)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Constant(Value::from(s))
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Constant(Value::from(s))
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Constant(Value::from(n))
    }
}

impl From<Generator> for FieldValue {
    fn from(g: Generator) -> Self {
        FieldValue::Generate(g)
    }
}

/// A Bango request or response object.
///
/// Every backend hands back a `Record`: the direct transport builds them from
/// service responses, the proxy re-projects its JSON reply onto one and the
/// mock wraps canned data in one. Callers only ever read named fields, so the
/// three are interchangeable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    type_name: Option<String>,
    fields: Mapping,
}

impl Record {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty record of the named service type.
    #[must_use]
    pub fn typed(type_name: impl Into<String>) -> Self {
        Self {
            type_name: Some(type_name.into()),
            fields: Mapping::new(),
        }
    }

    /// Builds a record whose manifest is the key set of `mapping`.
    ///
    /// With `invoke_generators`, generator values are evaluated now and the
    /// record only holds constants; otherwise they stay callable.
    #[must_use]
    pub fn from_mapping(mapping: Mapping, invoke_generators: bool) -> Self {
        let fields = mapping
            .into_iter()
            .map(|(k, v)| match v {
                FieldValue::Generate(g) if invoke_generators => (k, FieldValue::Constant(g.call())),
                other => (k, other),
            })
            .collect();
        Self {
            type_name: None,
            fields,
        }
    }

    /// Builds a record from a decoded JSON object.
    #[must_use]
    pub fn from_json(object: Map<String, Value>) -> Self {
        Self {
            type_name: None,
            fields: object
                .into_iter()
                .map(|(k, v)| (k, FieldValue::Constant(v)))
                .collect(),
        }
    }

    #[must_use]
    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Field name to value for every key in the manifest.
    #[must_use]
    pub fn to_mapping(&self) -> Mapping {
        self.fields.clone()
    }

    /// JSON view of the record. Pending generators are evaluated.
    #[must_use]
    pub fn to_json(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|(k, v)| (k.clone(), v.resolve()))
            .collect()
    }

    /// The key manifest.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Constant value of a field. Pending generators read as `None`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).and_then(FieldValue::as_value)
    }

    #[must_use]
    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Sets a field, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Textual value of a field; non-string scalars are rendered as JSON.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Takes a nested object field out as its own record, typed after the
    /// field name. Missing or non-object fields yield an empty record.
    #[must_use]
    pub fn take_record(&mut self, key: &str) -> Record {
        let nested = match self.fields.remove(key) {
            Some(FieldValue::Constant(Value::Object(object))) => Record::from_json(object),
            _ => Record::new(),
        };
        nested.with_type_name(key)
    }

    /// # Errors
    /// Returns `ClientError::InvalidResponse` when `responseCode` is missing.
    pub fn response_code(&self) -> Result<String, ClientError> {
        self.text("responseCode")
            .ok_or_else(|| ClientError::InvalidResponse("missing responseCode".to_owned()))
    }

    /// `responseMessage`, or an empty string when absent.
    #[must_use]
    pub fn response_message(&self) -> String {
        self.text("responseMessage").unwrap_or_default()
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.text("responseCode").as_deref() == Some(OK)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.type_name {
            write!(f, "({name})")?;
        }
        f.write_str("{")?;
        for (i, (k, v)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            match v {
                FieldValue::Constant(v) => write!(f, " {k} = {v}")?,
                FieldValue::Generate(_) => write!(f, " {k} = <generator>")?,
            }
        }
        f.write_str(" }")
    }
}

/// Mapping view of any record: each manifest key to its value.
#[must_use]
pub fn response_to_mapping(record: &Record) -> Mapping {
    record.to_mapping()
}

/// Wraps a mapping in a record, optionally evaluating generator values.
#[must_use]
pub fn mapping_to_record(mapping: Mapping, invoke_generators: bool) -> Record {
    Record::from_mapping(mapping, invoke_generators)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn x() -> Value {
        json!("x")
    }

    #[test]
    fn test_convert_data() {
        let mut data = Mapping::new();
        data.insert("foo".to_owned(), "bar".into());
        data.insert("count".to_owned(), 3_i64.into());
        data.insert("flag".to_owned(), json!(true).into());
        data.insert("none".to_owned(), Value::Null.into());
        assert_eq!(response_to_mapping(&mapping_to_record(data.clone(), false)), data);
        assert_eq!(response_to_mapping(&mapping_to_record(data.clone(), true)), data);
    }

    #[test]
    fn test_generators_left_callable() {
        let mut data = Mapping::new();
        data.insert("foo".to_owned(), Generator::new(x).into());

        let lazy = mapping_to_record(data.clone(), false);
        assert!(lazy.field("foo").unwrap().is_generator());
        assert_eq!(lazy.get("foo"), None);
        assert_eq!(lazy.field("foo").unwrap().resolve(), json!("x"));

        let eager = mapping_to_record(data, true);
        assert!(!eager.field("foo").unwrap().is_generator());
        assert_eq!(eager.get("foo"), Some(&json!("x")));
    }

    #[test]
    fn test_manifest_matches_keys() {
        let record = Record::from_json(json!({"b": 1, "a": 2}).as_object().unwrap().clone());
        let keys: Vec<_> = record.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(record.len(), 2);
        assert!(record.contains("a"));
    }

    #[test]
    fn test_response_fields() {
        let mut record = Record::new();
        assert!(matches!(record.response_code(), Err(ClientError::InvalidResponse(_))));
        assert_eq!(record.response_message(), "");

        record.set("responseCode", "OK");
        record.set("packageId", 1_i64);
        assert_eq!(record.response_code().unwrap(), "OK");
        assert!(record.is_ok());
        assert_eq!(record.text("packageId").as_deref(), Some("1"));
    }

    #[test]
    fn test_take_record_and_display() {
        let mut response = Record::typed("CreatePackageResponse");
        response.set("CreatePackageResult", json!({"packageId": null}));
        let mut result = response.take_record("CreatePackageResult");
        result.set("packageId", 7_i64);

        assert_eq!(result.type_name(), Some("CreatePackageResult"));
        assert!(!response.contains("CreatePackageResult"));
        assert_eq!(result.to_string(), "(CreatePackageResult){ packageId = 7 }");

        let empty = Record::new().take_record("Missing");
        assert!(empty.is_empty());
    }

    #[test]
    fn test_serialize_resolves_generators() {
        let mut record = Record::new();
        record.set("foo", Generator::new(x));
        assert_eq!(serde_json::to_value(&record).unwrap(), json!({"foo": "x"}));
    }
}
