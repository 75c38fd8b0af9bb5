//! An in-process `StoreBackend` keyed by an update's `order_key`, holding
//! whatever JSON value each apply call's arguments encode.
//!
//! Intended for tests and demos (see `demos/bluepill`), where a full SQL
//! backend would be overkill.

use std::collections::HashMap;

use dsim_agent::StateUpdate;

use crate::{StoreBackend, StoreError, StoreResult};

#[derive(Default)]
pub struct MemoryBackend {
    rows: HashMap<String, serde_json::Value>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, order_key: &str) -> Option<&serde_json::Value> {
        self.rows.get(order_key)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl StoreBackend for MemoryBackend {
    /// Supports a single method, `"set_state"`, taking one JSON argument:
    /// the new value for `update.order_key`. A concrete deployment backend
    /// (the sqlite one included) typically supports several methods that
    /// map to different table columns or operations; this one keeps
    /// exactly as much as the reference demo and the integration tests
    /// need.
    fn apply(&mut self, update: &StateUpdate) -> StoreResult<()> {
        match update.method.as_str() {
            "set_state" => {
                let value = update.args.first().cloned().ok_or_else(|| StoreError::MalformedArgs {
                    store: update.store_name.clone(),
                    method: update.method.clone(),
                    reason: "set_state requires one argument".to_string(),
                })?;
                self.rows.insert(update.order_key.clone(), value);
                Ok(())
            }
            "delete" => {
                self.rows.remove(&update.order_key);
                Ok(())
            }
            other => Err(StoreError::UnknownMethod {
                store: update.store_name.clone(),
                method: other.to_string(),
            }),
        }
    }
}
