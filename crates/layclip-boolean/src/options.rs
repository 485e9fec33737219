use layclip_core::{ClipError, ClipResult, FillRule};
use serde::{Deserialize, Serialize};

/// Settings for one boolean call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipOptions {
    pub subject_fill: FillRule,
    pub clip_fill: FillRule,
    /// Upper bound on noding passes. Each pass after the first only handles
    /// crossings introduced by rounding, so real inputs settle in two or
    /// three.
    pub max_noding_passes: usize,
}

impl ClipOptions {
    /// Same fill rule for both operands.
    pub fn with_fill(fill: FillRule) -> Self {
        Self {
            subject_fill: fill,
            clip_fill: fill,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> ClipResult<()> {
        if self.max_noding_passes == 0 {
            return Err(ClipError::InvalidParameter(
                "max_noding_passes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for ClipOptions {
    fn default() -> Self {
        Self {
            subject_fill: FillRule::NonZero,
            clip_fill: FillRule::NonZero,
            max_noding_passes: 32,
        }
    }
}
