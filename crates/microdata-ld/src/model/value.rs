//! Property values.

use serde::{Serialize, Serializer};
use serde_json::{json, Value as Json};

/// A single property value: a primitive or a reference to another item.
///
/// Multi-valued properties are ordered lists of these with no
/// duplicates. Primitives compare by exact string equality and
/// references by identifier equality, which the derived `PartialEq`
/// provides directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Primitive text value.
    Text(String),
    /// Reference to another item by identifier.
    Ref(String),
}

impl Value {
    /// Renders this value as JSON-LD: primitives as strings, references
    /// as node references.
    pub fn to_json(&self) -> Json {
        match self {
            Value::Text(text) => Json::String(text.clone()),
            Value::Ref(id) => json!({ "@id": id }),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
