use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// One state-store mutation produced by a single `Agent::step` call.
///
/// Replaces the upstream `(store, method, args, kwargs)` dynamic-dispatch
/// call with a named method plus a fixed JSON argument list: a
/// `dsim-store::StateStore` implementation matches on `method` the way a
/// concrete store type upstream defines one Python method per mutation it
/// supports.
///
/// Ordered by `(store_name, order_key)` only — `method` and `args`
/// deliberately do not participate in comparison, so updates destined for
/// the same store slot sort together regardless of which method produced
/// them (mirrors the upstream dataclass's `compare=False` fields).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StateUpdate {
    /// Which `StateStore` (by registered name) this update targets.
    pub store_name: String,
    /// Primary ordering key within the store — typically the subject's id
    /// rendered as a string, so a store can apply updates to the same
    /// entity in a stable order even when they arrive from different
    /// agents or ranks.
    pub order_key: String,
    /// The store method this update invokes.
    pub method: String,
    /// Positional arguments to `method`, encoded as JSON.
    pub args: Vec<serde_json::Value>,
}

impl StateUpdate {
    pub fn new(
        store_name: impl Into<String>,
        order_key: impl Into<String>,
        method: impl Into<String>,
        args: Vec<serde_json::Value>,
    ) -> Self {
        Self {
            store_name: store_name.into(),
            order_key: order_key.into(),
            method: method.into(),
            args,
        }
    }

    fn sort_key(&self) -> (&str, &str) {
        (&self.store_name, &self.order_key)
    }
}

impl PartialEq for StateUpdate {
    fn eq(&self, other: &Self) -> bool {
        self.sort_key() == other.sort_key()
    }
}

impl Eq for StateUpdate {}

impl PartialOrd for StateUpdate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StateUpdate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}
