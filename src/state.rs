//! State deltas handed back to the caller after a request or report.

use serde::Serialize;
use serde_json::{Map, Value};

/// Keys the caller should merge into its own view of the device.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StateDelta(Map<String, Value>);

impl StateDelta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new().with(key, value)
    }

    /// Adds `key`, replacing any earlier value.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Merges this delta into `state`, overwriting existing keys.
    pub fn merge_into(self, state: &mut Map<String, Value>) {
        state.extend(self.0);
    }

    pub fn to_json(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }
}
