//! Error types for annscape.
//!
//! Generators and cost models never fail: degenerate inputs are clamped.
//! Errors only come out of boundary validation and checked lookups.

use thiserror::Error;

/// Errors raised at the crate boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// Invalid parameter value (NaN, infinite, negative, or inconsistent).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A node id that does not exist at the requested layer.
    #[error("node {id} does not exist at layer {layer}")]
    UnknownNode { id: usize, layer: usize },
}

pub type Result<T> = std::result::Result<T, SimError>;

/// Reject NaN, infinite, and negative floats.
pub(crate) fn check_non_negative(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(SimError::InvalidParameter(format!(
            "{name} must be a finite non-negative number, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_non_negative() {
        assert!(check_non_negative("spread", 0.0).is_ok());
        assert!(check_non_negative("spread", 1.5).is_ok());
        assert!(check_non_negative("spread", -0.1).is_err());
        assert!(check_non_negative("spread", f64::NAN).is_err());
        assert!(check_non_negative("spread", f64::INFINITY).is_err());
    }

    #[test]
    fn test_display() {
        let err = SimError::UnknownNode { id: 7, layer: 2 };
        assert_eq!(err.to_string(), "node 7 does not exist at layer 2");
    }
}
