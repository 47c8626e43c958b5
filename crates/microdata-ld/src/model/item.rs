//! Items: the nodes of the extracted graph.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value as Json};

use crate::model::Value;

/// One logical entity extracted from an annotated subtree.
///
/// Two elements sharing a declared identifier resolve to the same item;
/// later-built types and properties merge into it. The property map is
/// a plain key-value store with no default members, so hostile property
/// names cannot collide with inherited behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Resolved declared identifier, or a synthesized `_:bN` blank id
    /// unique within one parse.
    pub id: String,
    /// Canonicalized type identifiers, ordered, without duplicates.
    pub types: Vec<String>,
    /// Property key to its ordered, de-duplicated values.
    pub properties: BTreeMap<String, Vec<Value>>,
}

impl Item {
    /// Creates an empty item with the given identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            types: Vec::new(),
            properties: BTreeMap::new(),
        }
    }

    /// Merges type identifiers, keeping first-occurrence order and
    /// dropping duplicates.
    pub fn merge_types<I>(&mut self, types: I)
    where
        I: IntoIterator<Item = String>,
    {
        for ty in types {
            if !self.types.contains(&ty) {
                self.types.push(ty);
            }
        }
    }

    /// Merges a value into a property.
    ///
    /// Appends in first-occurrence order and drops duplicates, so
    /// merging the same value twice is a no-op.
    pub fn add_value(&mut self, name: impl Into<String>, value: Value) {
        let values = self.properties.entry(name.into()).or_default();
        if !values.contains(&value) {
            values.push(value);
        }
    }

    /// Rewrites every property key, re-merging values whose keys
    /// collide after the rewrite.
    pub(crate) fn map_keys(&mut self, mut rewrite: impl FnMut(String) -> String) {
        let old = std::mem::take(&mut self.properties);
        for (key, values) in old {
            let key = rewrite(key);
            for value in values {
                self.add_value(key.clone(), value);
            }
        }
    }

    /// Renders this item as a JSON-LD node object. Single types and
    /// single values collapse to scalars.
    pub fn to_json(&self) -> Json {
        let mut map = Map::new();
        if !self.id.is_empty() {
            map.insert("@id".to_string(), Json::String(self.id.clone()));
        }
        match self.types.as_slice() {
            [] => {}
            [ty] => {
                map.insert("@type".to_string(), Json::String(ty.clone()));
            }
            types => {
                map.insert(
                    "@type".to_string(),
                    Json::Array(types.iter().map(|ty| Json::String(ty.clone())).collect()),
                );
            }
        }
        for (key, values) in &self.properties {
            let json = match values.as_slice() {
                [value] => value.to_json(),
                values => Json::Array(values.iter().map(Value::to_json).collect()),
            };
            map.insert(key.clone(), json);
        }
        Json::Object(map)
    }
}

impl Serialize for Item {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
