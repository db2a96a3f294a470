//! Error types and validation functions for RHIS analysis.
//!
//! This module provides error handling for every stage of the pipeline:
//! input validation for the hypothesis tests, mismatched-evolution checks
//! for the representative-range selector, and state-precondition errors
//! raised by the analyzer.

use thiserror::Error;

/// Error types for RHIS time series analysis operations.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum RhisAnalysisError {
    /// Insufficient data for the requested analysis method.
    #[error("Insufficient data: need at least {required} points, got {actual}")]
    InsufficientData {
        /// Minimum required data points
        required: usize,
        /// Actual number of data points provided
        actual: usize,
    },

    /// Invalid parameter value for analysis configuration.
    #[error("Invalid parameter: {parameter} = {value}, expected {constraint}")]
    InvalidParameter {
        /// Parameter name
        parameter: String,
        /// Invalid value provided
        value: f64,
        /// Valid range or constraint description
        constraint: String,
    },

    /// Numerical computation error due to instability or degeneracy.
    #[error("Numerical computation failed: {reason}")]
    NumericalError {
        /// Detailed reason for numerical failure
        reason: String,
    },

    /// Statistical test computation failure.
    #[error("Statistical test failed: {test_name} could not be computed")]
    StatisticalTestError {
        /// Name of the statistical test that failed
        test_name: String,
    },

    /// Paired backward/forward evolutions of different lengths.
    #[error("Mismatched evolution lengths: backward has {backward}, forward has {forward}")]
    MismatchedLengths {
        /// Length of the backward p-value series
        backward: usize,
        /// Length of the forward p-value series
        forward: usize,
    },

    /// Time series not found in the analyzer registry.
    #[error("Time series not found: {name}")]
    SeriesNotFound {
        /// Name of the time series that was not found
        name: String,
    },

    /// Representative-range selection requested before any evolution ran.
    #[error("No evolution has been performed for series: {name}")]
    EvolutionNotPerformed {
        /// Name of the series whose evolution is missing
        name: String,
    },

    /// Operation incompatible with the configured evolution mode.
    #[error("Operation '{operation}' is not supported in '{mode}' mode")]
    UnsupportedMode {
        /// Operation that was attempted
        operation: String,
        /// Evolution mode in effect
        mode: String,
    },
}

/// Result type for RHIS analysis operations.
///
/// Convenience alias for operations that may fail with [`RhisAnalysisError`].
pub type RhisResult<T> = Result<T, RhisAnalysisError>;

/// Validates that data has sufficient length for analysis.
///
/// # Arguments
/// * `data` - Input time series data
/// * `min_required` - Minimum number of data points required
/// * `operation` - Name of the operation requiring the data
///
/// # Returns
/// * `Ok(())` if data length is sufficient
/// * `Err(RhisAnalysisError::InsufficientData)` if data is too short
pub fn validate_data_length(
    data: &[f64],
    min_required: usize,
    _operation: &str,
) -> RhisResult<()> {
    if data.len() < min_required {
        Err(RhisAnalysisError::InsufficientData {
            required: min_required,
            actual: data.len(),
        })
    } else {
        Ok(())
    }
}

/// Validates that a parameter is within expected bounds (exclusive).
///
/// Used for the significance level `alpha`, which must lie strictly
/// inside `(0, 1)`.
///
/// # Returns
/// * `Ok(())` if value is within bounds
/// * `Err(RhisAnalysisError::InvalidParameter)` otherwise
pub fn validate_parameter(value: f64, min: f64, max: f64, name: &str) -> RhisResult<()> {
    if value.is_nan() {
        return Err(RhisAnalysisError::InvalidParameter {
            parameter: name.to_string(),
            value,
            constraint: "must not be NaN".to_string(),
        });
    }

    if value <= min || value >= max {
        Err(RhisAnalysisError::InvalidParameter {
            parameter: name.to_string(),
            value,
            constraint: format!("({}, {})", min, max),
        })
    } else {
        Ok(())
    }
}

/// Validates that all values in a slice are finite.
///
/// Every test ranks or differences its input, so a single NaN or infinity
/// would silently poison the statistic. Returns on the first offender.
///
/// # Returns
/// * `Ok(())` if all values are finite
/// * `Err(RhisAnalysisError::NumericalError)` if any value is infinite or NaN
pub fn validate_all_finite(data: &[f64], name: &str) -> RhisResult<()> {
    if let Some((i, &value)) = data.iter().enumerate().find(|(_, &v)| !v.is_finite()) {
        return Err(RhisAnalysisError::NumericalError {
            reason: format!("{} contains non-finite value at index {}: {}", name, i, value),
        });
    }

    Ok(())
}
