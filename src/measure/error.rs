//! Error taxonomy of the measurement core. Nothing here is fatal.

use thiserror::Error;

use super::tools::Tool;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeasureError {
    #[error("{tool:?} needs {need} points, {} more to go", .need - .have)]
    InsufficientPoints { tool: Tool, have: usize, need: usize },

    #[error("only the first waypoint may be a start")]
    InvalidRole,

    #[error("selection arrived for a measurement that is no longer active")]
    StaleAsyncResult,

    #[error("no measurement in progress")]
    NoActiveMeasurement,

    #[error("{tool:?} does not accept {input}")]
    NotAccepted { tool: Tool, input: &'static str },
}

impl MeasureError {
    /// Benign conditions are reported as notices rather than failures
    pub fn is_benign(&self) -> bool {
        matches!(
            self,
            MeasureError::NoActiveMeasurement | MeasureError::StaleAsyncResult
        )
    }

    /// Points still missing, for `InsufficientPoints`
    pub fn missing_points(&self) -> Option<usize> {
        match self {
            MeasureError::InsufficientPoints { have, need, .. } => Some(need.saturating_sub(*have)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_points_message() {
        let err = MeasureError::InsufficientPoints {
            tool: Tool::Area,
            have: 1,
            need: 3,
        };
        assert_eq!(err.to_string(), "Area needs 3 points, 2 more to go");
        assert_eq!(err.missing_points(), Some(2));
        assert!(!err.is_benign());
    }

    #[test]
    fn test_benign_errors() {
        assert!(MeasureError::NoActiveMeasurement.is_benign());
        assert!(MeasureError::StaleAsyncResult.is_benign());
        assert!(!MeasureError::InvalidRole.is_benign());
    }
}
