use serde::{Deserialize, Serialize};
use std::fmt;

/// Confidence score clamped to [0.0, 1.0].
///
/// Used for advisor-local confidence and for the composite confidence of a
/// merged recommendation.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Confidence(f64);

impl Confidence {
    /// Create a new Confidence, clamping to [0.0, 1.0]. NaN maps to 0.0.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Get the raw f64 value.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Clamp into `[floor, 1.0]`.
    pub fn with_floor(self, floor: f64) -> Self {
        Self::new(self.0.max(floor))
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self(1.0)
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

impl From<f64> for Confidence {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Confidence> for f64 {
    fn from(c: Confidence) -> Self {
        c.0
    }
}
