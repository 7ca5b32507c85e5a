//! Hierarchical result store
//!
//! A JSON value tree with slash-separated paths, standing in for an
//! on-disk container. Fixed layout:
//!
//! ```text
//! version, date, uqtype            sweep header
//! input/params/<name>              serialized Parameter
//! input/param_array                value matrix, one column per parameter
//! output/jobs/<n>/{stdout,stderr}  captured per-job output
//! output/data/<var>                collected outputs per variable
//! <strategy>/<var>/{response,pdf,mean,dev,sensitivity,samples,rmse}
//! ```
//!
//! Everything placed in the store is a plain `serde_json::Value`, so the
//! whole tree round-trips through a single string.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Version tag written into every store header
pub const STORE_VERSION: u32 = 1;

/// A slash-addressed JSON tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultStore {
    root: Map<String, Value>,
}

impl ResultStore {
    /// Empty store with a header naming the active strategy
    #[must_use]
    pub fn new(strategy: &str) -> Self {
        let mut store = Self::default();
        store.set("version", Value::from(STORE_VERSION));
        store.set("uqtype", Value::from(strategy));
        store.set("date", Value::from(jiff::Timestamp::now().to_string()));
        store
    }

    /// Insert a value, creating intermediate objects as needed; an
    /// existing value at the path is replaced
    pub fn set(&mut self, path: &str, value: Value) {
        let mut parts = path.split('/').peekable();
        let mut node = &mut self.root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                node.insert(part.to_string(), value);
                return;
            }
            let child = node
                .entry(part.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            let Value::Object(map) = child else {
                unreachable!("just ensured an object")
            };
            node = map;
        }
    }

    /// Serialize any value into the tree
    pub fn set_json<T: Serialize>(&mut self, path: &str, value: &T) -> serde_json::Result<()> {
        self.set(path, serde_json::to_value(value)?);
        Ok(())
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut node: &Value = &Value::Null;
        let mut first = true;
        for part in path.split('/') {
            node = if first {
                first = false;
                self.root.get(part)?
            } else {
                node.as_object()?.get(part)?
            };
        }
        Some(node)
    }

    /// Deserialize a value out of the tree; `Ok(None)` when the path is
    /// absent
    pub fn get_json<T: DeserializeOwned>(&self, path: &str) -> serde_json::Result<Option<T>> {
        match self.get(path) {
            Some(v) => Ok(Some(serde_json::from_value(v.clone())?)),
            None => Ok(None),
        }
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    /// Render the whole tree as pretty JSON
    pub fn to_string_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.root)
    }

    /// Rebuild a store from rendered JSON
    pub fn from_str(text: &str) -> serde_json::Result<Self> {
        Ok(Self {
            root: serde_json::from_str(text)?,
        })
    }
}
