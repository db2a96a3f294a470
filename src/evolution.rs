//! Windowed evolution of the hypothesis-test battery.
//!
//! Runs the four-test battery on expanding windows in both directions of
//! a series. The forward pass grows windows from the start (`ts[0..=i]`),
//! the backward pass from the end (`ts[i..n]`), so at every index the two
//! passes together describe how much of the record before and after that
//! point still behaves like a single homogeneous sample.

use crate::config::{EvolutionConfig, EvolutionMode};
use crate::errors::{validate_all_finite, RhisAnalysisError, RhisResult};
use crate::statistical_tests::Hypothesis;

/// Orientation of an evolution pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Windows anchored at the start of the series, growing to the right
    Forward,
    /// Windows anchored at the end of the series, growing to the left
    Backward,
}

impl Direction {
    /// Lowercase label used in logs and result tables.
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Backward => "backward",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// P-value series of one evolution pass, one per hypothesis.
///
/// Each vector has the length of the input series. Forward entries before
/// index `w - 1` and backward entries after index `n - w` are `NaN`: no
/// window of the minimum length ends (resp. starts) there.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirectionalEvolution {
    /// Wallis-Moore p-values per window
    pub randomness: Vec<f64>,
    /// Mann-Whitney p-values per window
    pub homogeneity: Vec<f64>,
    /// Wald-Wolfowitz p-values per window
    pub independence: Vec<f64>,
    /// Mann-Kendall p-values per window
    pub stationarity: Vec<f64>,
}

impl DirectionalEvolution {
    /// P-value series of a single hypothesis.
    pub fn hypothesis(&self, hypothesis: Hypothesis) -> &[f64] {
        match hypothesis {
            Hypothesis::Randomness => &self.randomness,
            Hypothesis::Homogeneity => &self.homogeneity,
            Hypothesis::Independence => &self.independence,
            Hypothesis::Stationarity => &self.stationarity,
        }
    }

    /// Number of entries per hypothesis series (the input series length).
    pub fn len(&self) -> usize {
        self.randomness.len()
    }

    /// Whether the pass holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.randomness.is_empty()
    }

    /// Collapses the four per-window p-values into one series.
    ///
    /// `NaN` padding positions stay `NaN`. [`EvolutionMode::Raw`] keeps
    /// the series separate and therefore cannot be summarized.
    pub fn summarize(&self, mode: EvolutionMode) -> RhisResult<Vec<f64>> {
        if mode == EvolutionMode::Raw {
            return Err(RhisAnalysisError::UnsupportedMode {
                operation: "summarize".to_string(),
                mode: mode.label().to_string(),
            });
        }

        let summary = (0..self.len())
            .map(|i| {
                let ps = [
                    self.randomness[i],
                    self.homogeneity[i],
                    self.independence[i],
                    self.stationarity[i],
                ];
                if ps.iter().any(|p| p.is_nan()) {
                    f64::NAN
                } else {
                    combine(&ps, mode)
                }
            })
            .collect();
        Ok(summary)
    }
}

/// Result of a bidirectional evolution run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RhisEvolution {
    /// Minimum window length used by both passes
    pub slice_init: usize,
    /// Expanding windows anchored at the start: entry `i` covers `ts[0..=i]`
    pub forward: DirectionalEvolution,
    /// Expanding windows anchored at the end: entry `i` covers `ts[i..n]`
    pub backward: DirectionalEvolution,
}

impl RhisEvolution {
    /// The pass for a given direction.
    pub fn direction(&self, direction: Direction) -> &DirectionalEvolution {
        match direction {
            Direction::Forward => &self.forward,
            Direction::Backward => &self.backward,
        }
    }
}

/// Runs the battery on expanding windows in both directions.
///
/// Every window of at least the configured minimum length gets the full
/// four-test battery at the configured significance level. A window a
/// test cannot handle contributes the sentinel p-value 0, so degenerate
/// stretches of data surface as rejections rather than gaps.
///
/// # Arguments
/// * `ts` - Time series, all values finite, at least one full window long
/// * `config` - Significance level and window length (the summary mode is
///   applied later, by [`DirectionalEvolution::summarize`])
pub fn rhis_evolution(ts: &[f64], config: &EvolutionConfig) -> RhisResult<RhisEvolution> {
    validate_all_finite(ts, "evolution input")?;
    config.validate(ts.len())?;

    let w = config.window_length(ts.len());
    log::debug!(
        "evolving series of {} observations, minimum window {}",
        ts.len(),
        w
    );

    let forward = expanding_pass(ts, w, config.alpha);

    let reversed: Vec<f64> = ts.iter().rev().copied().collect();
    let mut backward = expanding_pass(&reversed, w, config.alpha);
    // Entry i of the reversed pass covers reversed[0..=i] == ts[n-1-i..n];
    // flipping each series realigns entry i with the window ts[i..n].
    backward.randomness.reverse();
    backward.homogeneity.reverse();
    backward.independence.reverse();
    backward.stationarity.reverse();

    Ok(RhisEvolution {
        slice_init: w,
        forward,
        backward,
    })
}

/// Battery over expanding windows `data[0..k]` for `k` in `w..=n`.
///
/// The first `w - 1` entries of each series are `NaN`.
fn expanding_pass(data: &[f64], w: usize, alpha: f64) -> DirectionalEvolution {
    let n = data.len();
    let mut evolution = DirectionalEvolution {
        randomness: vec![f64::NAN; w - 1],
        homogeneity: vec![f64::NAN; w - 1],
        independence: vec![f64::NAN; w - 1],
        stationarity: vec![f64::NAN; w - 1],
    };

    for k in w..=n {
        let window = &data[..k];
        evolution
            .randomness
            .push(window_p_value(Hypothesis::Randomness, window, alpha));
        evolution
            .homogeneity
            .push(window_p_value(Hypothesis::Homogeneity, window, alpha));
        evolution
            .independence
            .push(window_p_value(Hypothesis::Independence, window, alpha));
        evolution
            .stationarity
            .push(window_p_value(Hypothesis::Stationarity, window, alpha));
    }

    evolution
}

/// P-value of one test on one window, with the failure sentinel.
///
/// A window the test cannot compute on is scored p = 0: the window is
/// treated as failing the battery instead of aborting the whole run.
fn window_p_value(hypothesis: Hypothesis, window: &[f64], alpha: f64) -> f64 {
    match hypothesis.run(window, alpha) {
        Ok(result) => result.p_value,
        Err(e) => {
            log::debug!(
                "{} test failed on window of {} observations ({}), scoring p = 0",
                hypothesis,
                window.len(),
                e
            );
            0.0
        }
    }
}

/// Min, mean or median of a full battery row.
fn combine(ps: &[f64; 4], mode: EvolutionMode) -> f64 {
    match mode {
        EvolutionMode::Min => ps.iter().copied().fold(f64::INFINITY, f64::min),
        EvolutionMode::Mean => ps.iter().sum::<f64>() / ps.len() as f64,
        EvolutionMode::Median => {
            let mut sorted = *ps;
            sorted.sort_by(f64::total_cmp);
            (sorted[1] + sorted[2]) / 2.0
        }
        // Raw is rejected before combine is reached
        EvolutionMode::Raw => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn sample_series() -> Vec<f64> {
        vec![
            9.74, 10.51, 9.77, 9.68, 9.07, 9.79, 11.11, 10.42, 11.04, 10.25, 10.39, 10.19, 8.33,
            10.86, 10.51, 10.5, 8.31, 8.26, 9.11, 9.53,
        ]
    }

    #[test]
    fn test_padding_layout() {
        let ts = sample_series();
        let n = ts.len();
        let evolution = rhis_evolution(&ts, &EvolutionConfig::default()).unwrap();
        assert_eq!(evolution.slice_init, 5);

        for hypothesis in Hypothesis::ALL {
            let fw = evolution.forward.hypothesis(hypothesis);
            let bw = evolution.backward.hypothesis(hypothesis);
            assert_eq!(fw.len(), n);
            assert_eq!(bw.len(), n);
            // Forward: no window of length 5 ends before index 4
            assert!(fw[..4].iter().all(|p| p.is_nan()));
            assert!(fw[4..].iter().all(|p| p.is_finite()));
            // Backward: no window of length 5 starts after index n - 5
            assert!(bw[..=n - 5].iter().all(|p| p.is_finite()));
            assert!(bw[n - 4..].iter().all(|p| p.is_nan()));
        }
    }

    #[test]
    fn test_full_window_agrees_across_directions() {
        // The last forward window and the first backward window are both
        // the whole series, up to reversal, and every battery test is
        // invariant under reversal for an even-length series.
        let ts = sample_series();
        let n = ts.len();
        let evolution = rhis_evolution(&ts, &EvolutionConfig::default()).unwrap();
        for hypothesis in Hypothesis::ALL {
            let fw = evolution.forward.hypothesis(hypothesis);
            let bw = evolution.backward.hypothesis(hypothesis);
            assert_approx_eq!(fw[n - 1], bw[0], 1e-10);
        }
    }

    #[test]
    fn test_p_values_within_unit_interval() {
        let ts = sample_series();
        let evolution = rhis_evolution(&ts, &EvolutionConfig::default()).unwrap();
        for pass in [&evolution.forward, &evolution.backward] {
            for hypothesis in Hypothesis::ALL {
                for &p in pass.hypothesis(hypothesis) {
                    assert!(p.is_nan() || (0.0..=1.0).contains(&p));
                }
            }
        }
    }

    #[test]
    fn test_degenerate_window_scores_zero() {
        // A constant head makes the first forward window degenerate for
        // Wald-Wolfowitz, which the min summary surfaces as p = 0
        let mut ts = vec![2.0; 10];
        ts.extend([4.0, 2.0, 5.0, 3.0, 10.0, 9.0, 9.5, 3.4, 5.7, 2.5]);
        let evolution = rhis_evolution(&ts, &EvolutionConfig::default()).unwrap();
        let summary = evolution.forward.summarize(EvolutionMode::Min).unwrap();
        assert_eq!(summary[4], 0.0);
    }

    #[test]
    fn test_summarize_modes() {
        let pass = DirectionalEvolution {
            randomness: vec![f64::NAN, 0.4],
            homogeneity: vec![f64::NAN, 0.1],
            independence: vec![f64::NAN, 0.3],
            stationarity: vec![f64::NAN, 0.2],
        };
        let min = pass.summarize(EvolutionMode::Min).unwrap();
        let mean = pass.summarize(EvolutionMode::Mean).unwrap();
        let median = pass.summarize(EvolutionMode::Median).unwrap();
        assert!(min[0].is_nan());
        assert_approx_eq!(min[1], 0.1, 1e-12);
        assert_approx_eq!(mean[1], 0.25, 1e-12);
        assert_approx_eq!(median[1], 0.25, 1e-12);
    }

    #[test]
    fn test_summarize_raw_unsupported() {
        let evolution = rhis_evolution(&sample_series(), &EvolutionConfig::default()).unwrap();
        assert!(matches!(
            evolution.forward.summarize(EvolutionMode::Raw),
            Err(RhisAnalysisError::UnsupportedMode { .. })
        ));
    }

    #[test]
    fn test_series_shorter_than_window() {
        let ts = [1.0, 2.0, 3.0];
        assert!(rhis_evolution(&ts, &EvolutionConfig::default()).is_err());
    }

    #[test]
    fn test_explicit_window_length() {
        let ts = sample_series();
        let config = EvolutionConfig {
            slice_init: Some(8),
            ..Default::default()
        };
        let evolution = rhis_evolution(&ts, &config).unwrap();
        assert_eq!(evolution.slice_init, 8);
        assert!(evolution.forward.randomness[6].is_nan());
        assert!(evolution.forward.randomness[7].is_finite());
    }
}
