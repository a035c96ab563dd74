//! Executable action sequences bound to components.
//!
//! The actions themselves are built by an external factory; this module only
//! defines the handle components keep.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One entry of an executed action chain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    /// Name of the action that produced the entry
    #[serde(default, rename = "actionType")]
    pub action_type: Option<String>,
    /// Produced value, if the action yields one
    #[serde(default)]
    pub result: Option<Value>,
}

impl ActionResult {
    /// An entry carrying a result value.
    pub fn with_result(result: Value) -> Self {
        Self {
            action_type: None,
            result: Some(result),
        }
    }

    /// First entry that carries a result.
    pub fn first_result(results: &[ActionResult]) -> Option<&Value> {
        results.iter().find_map(|entry| entry.result.as_ref())
    }
}

/// An executable action sequence.
#[async_trait]
pub trait ActionChain: Send + Sync {
    /// Run every action in order.
    async fn execute(&self) -> Vec<ActionResult>;
}

/// An action chain bound to a trigger on a component.
#[derive(Clone)]
pub struct BoundAction {
    /// Trigger name (`onClick`, `path`, ...)
    pub trigger: CompactString,
    /// Raw action list the chain was built from
    pub actions: Vec<Value>,
    /// The executable chain
    pub chain: Arc<dyn ActionChain>,
}

impl fmt::Debug for BoundAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundAction")
            .field("trigger", &self.trigger)
            .field("actions", &self.actions.len())
            .finish_non_exhaustive()
    }
}
