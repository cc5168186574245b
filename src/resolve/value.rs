//! Runtime values produced by path resolution.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::resolve::TypeKey;

// == Object Identity ==
/// Process-unique identity of an [`ObjectRef`]. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ObjectId(u64);

impl ObjectId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

// == Object Reference ==
/// A shared, type-erased row object (or nested member object).
///
/// Cloning keeps the identity; wrapping the same data again with
/// [`ObjectRef::from_arc`] creates a new identity.
#[derive(Clone)]
pub struct ObjectRef {
    id: ObjectId,
    ty: TypeKey,
    data: Arc<dyn Any + Send + Sync>,
}

impl ObjectRef {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    pub fn from_arc<T: Any + Send + Sync>(data: Arc<T>) -> Self {
        Self {
            id: ObjectId::next(),
            ty: TypeKey::of::<T>(),
            data,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn type_key(&self) -> TypeKey {
        self.ty
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.data.downcast_ref::<T>()
    }

    pub(crate) fn data(&self) -> &(dyn Any + Send + Sync) {
        &*self.data
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ObjectRef {}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectRef")
            .field("id", &self.id.0)
            .field("type", &self.ty.short_name())
            .finish()
    }
}

// == Value ==
/// A resolved member value.
///
/// `Null` is what a getter reports for an empty member. The resolver turns a
/// `Null` result into absence, so callers only ever see it inside lists.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(Arc<str>),
    List(Arc<[Value]>),
    Object(ObjectRef),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Converts parsed JSON, turning objects into [`Record`] rows.
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Text(s.into()),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => Value::Object(ObjectRef::new(Record::from_json(map))),
        }
    }
}

/// Display text for a cell. Objects show their type name.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => f.write_str(s),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Object(object) => f.write_str(object.type_key().short_name()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::Text(s) => serializer.serialize_str(s),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(object) => match object.downcast_ref::<Record>() {
                Some(record) => record.serialize(serializer),
                None => serializer.serialize_str(object.type_key().short_name()),
            },
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i.into())
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Integer(i.into())
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.into())
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::Text(s.as_str().into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s.into())
    }
}

impl From<ObjectRef> for Value {
    fn from(object: ObjectRef) -> Self {
        Value::Object(object)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

// == Record ==
/// A schemaless row whose members are looked up by name at runtime.
///
/// JSON objects are converted into records once, so nested objects keep a
/// stable identity for as long as the row lives.
#[derive(Debug, Clone, Default)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self {
            fields: map
                .into_iter()
                .map(|(name, json)| (name, Value::from_json(json)))
                .collect(),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_identity() {
        let a = ObjectRef::new(Record::new());
        let b = a.clone();
        let c = ObjectRef::new(Record::new());

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a.id(), c.id());
        assert!(c.id().get() > a.id().get());
    }

    #[test]
    fn test_record_builder() {
        let record = Record::new().with("Name", "Ada").with("Age", 36i64);

        assert_eq!(record.len(), 2);
        assert_eq!(record.get("Name").map(ToString::to_string), Some("Ada".to_string()));
        assert!(matches!(record.get("Age"), Some(Value::Integer(36))));
        assert!(record.get("Missing").is_none());
    }

    #[test]
    fn test_from_json_numbers() {
        assert!(matches!(Value::from_json(json!(3)), Value::Integer(3)));
        assert!(matches!(Value::from_json(json!(2.5)), Value::Float(x) if x == 2.5));
        assert!(Value::from_json(json!(null)).is_null());
    }

    #[test]
    fn test_from_json_object_becomes_record() {
        let value = Value::from_json(json!({"Name": "Ada", "Tags": ["a", "b"]}));
        let object = value.as_object().unwrap();
        let record = object.downcast_ref::<Record>().unwrap();

        assert_eq!(record.len(), 2);
        assert!(matches!(record.get("Tags"), Some(Value::List(items)) if items.len() == 2));
    }

    #[test]
    fn test_display_text() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::from("x").to_string(), "x");
        assert_eq!(Value::from(vec![1i64, 2]).to_string(), "[1, 2]");
        assert_eq!(Value::from(None::<i64>).to_string(), "");
    }

    #[test]
    fn test_serialize_round_trips_json_rows() {
        let original = json!({"Name": "Ada", "Address": {"City": "London"}, "Age": 36});
        let value = Value::from_json(original.clone());

        assert_eq!(serde_json::to_value(&value).unwrap(), original);
    }
}
