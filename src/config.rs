//! Configuration for the evolution engine and analyzer.

use crate::errors::{validate_parameter, RhisAnalysisError, RhisResult};

/// How the four per-window p-values are collapsed into an evolution value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EvolutionMode {
    /// Keep all four p-value series separate, one per hypothesis
    Raw,
    /// Minimum of the four p-values. The most conservative summary: a
    /// window passes only when every test passes
    #[default]
    Min,
    /// Arithmetic mean of the four p-values
    Mean,
    /// Median of the four p-values
    Median,
}

impl EvolutionMode {
    /// Lowercase label used in logs and error messages.
    pub fn label(&self) -> &'static str {
        match self {
            EvolutionMode::Raw => "raw",
            EvolutionMode::Min => "min",
            EvolutionMode::Mean => "mean",
            EvolutionMode::Median => "median",
        }
    }
}

impl std::fmt::Display for EvolutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Parameters of a windowed evolution run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvolutionConfig {
    /// Significance level used by every test in the battery
    pub alpha: f64,
    /// Summary applied to the per-window battery results
    pub mode: EvolutionMode,
    /// Explicit minimum window length. `None` picks 10 for series longer
    /// than 100 observations and 5 otherwise
    pub slice_init: Option<usize>,
    /// Representative-range orientation: `true` anchors the range at the
    /// end of the record, `false` at the beginning
    pub most_recent: bool,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            mode: EvolutionMode::Min,
            slice_init: None,
            most_recent: true,
        }
    }
}

impl EvolutionConfig {
    /// Validates the configuration against a series of length `n`.
    ///
    /// The minimum window must leave at least one full window in the
    /// series, and a window below 5 observations starves the battery.
    pub fn validate(&self, n: usize) -> RhisResult<()> {
        validate_parameter(self.alpha, 0.0, 1.0, "alpha")?;

        let w = self.window_length(n);
        if w < 5 {
            return Err(RhisAnalysisError::InvalidParameter {
                parameter: "slice_init".to_string(),
                value: w as f64,
                constraint: "at least 5".to_string(),
            });
        }
        if w > n {
            return Err(RhisAnalysisError::InsufficientData {
                required: w,
                actual: n,
            });
        }
        Ok(())
    }

    /// Minimum window length for a series of `n` observations.
    pub fn window_length(&self, n: usize) -> usize {
        match self.slice_init {
            Some(w) => w,
            None => {
                if n > 100 {
                    10
                } else {
                    5
                }
            }
        }
    }
}
