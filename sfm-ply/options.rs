use serde::{Deserialize, Serialize};

/// What to do when the point and color arrays differ in length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthPolicy {
    /// Refuse to write anything
    #[default]
    Strict,
    /// Pair positionally and stop at the shorter array
    Truncate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub length_policy: LengthPolicy,
}

impl ExportOptions {
    pub fn truncating() -> Self {
        Self {
            length_policy: LengthPolicy::Truncate,
        }
    }
}
