use layclip_core::{ClipError, ClipResult};
use serde::{Deserialize, Serialize};

/// How an offset outline is closed around a convex vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum JoinStyle {
    /// Extend both offset edges to their intersection. When the tip would
    /// lie further than `limit * delta` from the vertex a square join is
    /// used instead. Limits below 2 behave as 2.
    Mitre { limit: f64 },
    /// Arc approximated by a polygon with `steps_per_circle` sides.
    Round { steps_per_circle: u32 },
    /// Cut the corner square to the bisector at distance `delta`.
    Square,
    /// Connect the two offset edge ends directly.
    Bevel,
}

impl JoinStyle {
    pub fn mitre(limit: f64) -> Self {
        JoinStyle::Mitre { limit }
    }

    pub fn round(steps_per_circle: u32) -> Self {
        JoinStyle::Round { steps_per_circle }
    }

    pub fn validate(&self) -> ClipResult<()> {
        match *self {
            JoinStyle::Mitre { limit } if !limit.is_finite() => Err(ClipError::InvalidParameter(
                format!("mitre limit must be finite, got {limit}"),
            )),
            JoinStyle::Round { steps_per_circle } if steps_per_circle < 3 => {
                Err(ClipError::InvalidParameter(format!(
                    "round join needs at least 3 steps per circle, got {steps_per_circle}"
                )))
            }
            _ => Ok(()),
        }
    }
}

impl Default for JoinStyle {
    fn default() -> Self {
        JoinStyle::Mitre { limit: 2.0 }
    }
}
