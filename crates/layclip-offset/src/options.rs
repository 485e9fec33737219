use serde::{Deserialize, Serialize};

use crate::join::JoinStyle;

/// Settings for one offset call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OffsetOptions {
    pub join: JoinStyle,
    /// Unite the input rings (non-zero fill) before offsetting, so
    /// overlapping rings grow as one shape.
    pub join_first: bool,
    pub max_noding_passes: usize,
}

impl OffsetOptions {
    pub fn with_join(join: JoinStyle) -> Self {
        Self {
            join,
            ..Self::default()
        }
    }
}

impl Default for OffsetOptions {
    fn default() -> Self {
        Self {
            join: JoinStyle::default(),
            join_first: false,
            max_noding_passes: 32,
        }
    }
}
