//! Events raised on components during resolution.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An observable change raised while resolving a component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ComponentEvent {
    /// An emit-bound property produced a value.
    EmitResolved {
        trigger: CompactString,
        key: CompactString,
        value: Value,
    },
    /// A list produced its item data.
    ListResolved { count: usize },
    /// A resolver stage failed and was skipped.
    StageFailed {
        stage: CompactString,
        message: String,
    },
}
