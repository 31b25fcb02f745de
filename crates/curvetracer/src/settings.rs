//! Tunable parameters for the entry angle computation.

use serde::{Deserialize, Serialize};

use crate::error::{CurveTracerError, Result};

/// How a trajectory that misses a structure is reported to callers that
/// need a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoIntersectionPolicy {
    /// No value.
    #[default]
    Empty,
    /// 0.0 degrees, indistinguishable from a true 0° entry.
    Zero,
}

/// Entry angle parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Intersection tolerance in world units.
    pub tolerance: f64,
    /// Reporting of misses.
    pub no_intersection: NoIntersectionPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tolerance: 0.001,
            no_intersection: NoIntersectionPolicy::Empty,
        }
    }
}

impl Settings {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(CurveTracerError::InvalidInput(format!(
                "tolerance must be finite and non-negative, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.tolerance, 0.001);
        assert_eq!(s.no_intersection, NoIntersectionPolicy::Empty);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_tolerance() {
        for tolerance in [-1.0, f64::NAN, f64::INFINITY] {
            let s = Settings {
                tolerance,
                ..Settings::default()
            };
            assert!(matches!(s.validate(), Err(CurveTracerError::InvalidInput(_))));
        }
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let s: Settings = serde_json::from_str(r#"{ "no_intersection": "zero" }"#).unwrap();
        assert_eq!(s.tolerance, 0.001);
        assert_eq!(s.no_intersection, NoIntersectionPolicy::Zero);
    }
}
