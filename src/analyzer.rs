//! High-level analyzer managing named series and their evolutions.

use std::collections::BTreeMap;

use crate::config::{EvolutionConfig, EvolutionMode};
use crate::errors::{
    validate_all_finite, validate_data_length, RhisAnalysisError, RhisResult,
};
use crate::evolution::{rhis_evolution, Direction, RhisEvolution};
use crate::representative::select_representative_range;
use crate::results::{EvolutionColumn, EvolutionTable, RepresentativeSummary};
use crate::statistical_tests::Hypothesis;

/// Manages a collection of named time series and runs the battery
/// evolution and representative-range selection over them.
///
/// Series are keyed by name; results are kept per series and recomputed
/// when a series is replaced. All series share one [`EvolutionConfig`].
///
/// # Example
///
/// ```
/// use rhis_timeseries::RhisAnalyzer;
///
/// let mut analyzer = RhisAnalyzer::new();
/// let data: Vec<f64> = (0..40).map(|i| 10.0 + ((i * 13) % 7) as f64).collect();
/// analyzer.add_time_series("gauge", data)?;
/// analyzer.evolve_all_series()?;
/// let range = analyzer.representative_range("gauge")?;
/// assert!(range.range.init_range.1 == 40);
/// # Ok::<(), rhis_timeseries::RhisAnalysisError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct RhisAnalyzer {
    config: EvolutionConfig,
    series: BTreeMap<String, Vec<f64>>,
    evolutions: BTreeMap<String, RhisEvolution>,
}

impl RhisAnalyzer {
    /// Creates an analyzer with the default configuration
    /// (alpha 0.05, min summary, heuristic window, end-anchored ranges).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an analyzer with an explicit configuration.
    pub fn with_config(config: EvolutionConfig) -> Self {
        Self {
            config,
            series: BTreeMap::new(),
            evolutions: BTreeMap::new(),
        }
    }

    /// The configuration shared by all series.
    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// Adds or replaces a named series.
    ///
    /// Replacing a series discards any evolution already computed for it.
    ///
    /// # Arguments
    /// * `name` - Key the series is stored and queried under
    /// * `data` - Observations, all finite, at least 5 points
    pub fn add_time_series(&mut self, name: impl Into<String>, data: Vec<f64>) -> RhisResult<()> {
        let name = name.into();
        validate_data_length(&data, 5, "add_time_series")?;
        validate_all_finite(&data, "time series")?;

        log::debug!("adding series '{}' with {} observations", name, data.len());
        self.evolutions.remove(&name);
        self.series.insert(name, data);
        Ok(())
    }

    /// The stored observations of a series.
    pub fn time_series(&self, name: &str) -> RhisResult<&[f64]> {
        self.series
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| RhisAnalysisError::SeriesNotFound {
                name: name.to_string(),
            })
    }

    /// Names of all stored series, in sorted order.
    pub fn series_names(&self) -> Vec<&str> {
        self.series.keys().map(String::as_str).collect()
    }

    /// Runs the bidirectional evolution for one series.
    pub fn evolve_series(&mut self, name: &str) -> RhisResult<()> {
        let data = self
            .series
            .get(name)
            .ok_or_else(|| RhisAnalysisError::SeriesNotFound {
                name: name.to_string(),
            })?;
        let evolution = rhis_evolution(data, &self.config)?;
        log::info!(
            "evolved series '{}' ({} observations, window {})",
            name,
            data.len(),
            evolution.slice_init
        );
        self.evolutions.insert(name.to_string(), evolution);
        Ok(())
    }

    /// Runs the bidirectional evolution for every stored series.
    pub fn evolve_all_series(&mut self) -> RhisResult<()> {
        let names: Vec<String> = self.series.keys().cloned().collect();
        for name in names {
            self.evolve_series(&name)?;
        }
        Ok(())
    }

    /// The computed evolution of a series.
    pub fn evolution(&self, name: &str) -> RhisResult<&RhisEvolution> {
        if !self.series.contains_key(name) {
            return Err(RhisAnalysisError::SeriesNotFound {
                name: name.to_string(),
            });
        }
        self.evolutions
            .get(name)
            .ok_or_else(|| RhisAnalysisError::EvolutionNotPerformed {
                name: name.to_string(),
            })
    }

    /// Selects the representative range of a series from its evolution.
    ///
    /// Requires a summarizing mode; in [`EvolutionMode::Raw`] the four
    /// p-value series cannot be collapsed into the single pair of curves
    /// the selection works on.
    pub fn representative_range(&self, name: &str) -> RhisResult<RepresentativeSummary> {
        if self.config.mode == EvolutionMode::Raw {
            return Err(RhisAnalysisError::UnsupportedMode {
                operation: "representative_range".to_string(),
                mode: self.config.mode.label().to_string(),
            });
        }

        let evolution = self.evolution(name)?;
        let backward = evolution.backward.summarize(self.config.mode)?;
        let forward = evolution.forward.summarize(self.config.mode)?;
        let range = select_representative_range(
            &backward,
            &forward,
            self.config.alpha,
            self.config.most_recent,
        )?;
        log::info!(
            "series '{}': representative range {:?}, extension {:?}",
            name,
            range.init_range,
            range.extension_range
        );

        Ok(RepresentativeSummary {
            series: name.to_string(),
            series_length: backward.len(),
            alpha: self.config.alpha,
            mode: self.config.mode,
            most_recent: self.config.most_recent,
            range,
        })
    }

    /// The series with everything outside its representative range
    /// masked to `NaN`.
    pub fn representative_series(&self, name: &str) -> RhisResult<Vec<f64>> {
        let summary = self.representative_range(name)?;
        let data = self.time_series(name)?;
        Ok(summary.apply(data))
    }

    /// Flattens every computed evolution into an [`EvolutionTable`].
    ///
    /// In raw mode the table carries one column per hypothesis and
    /// direction; in summarizing modes one summary column per direction.
    /// Backward columns precede forward ones.
    pub fn evolution_table(&self) -> RhisResult<EvolutionTable> {
        let mut columns = Vec::new();
        for (name, evolution) in &self.evolutions {
            for direction in [Direction::Backward, Direction::Forward] {
                let pass = evolution.direction(direction);
                if self.config.mode == EvolutionMode::Raw {
                    for hypothesis in Hypothesis::ALL {
                        columns.push(EvolutionColumn {
                            series: name.clone(),
                            direction,
                            hypothesis: Some(hypothesis),
                            p_values: pass.hypothesis(hypothesis).to_vec(),
                        });
                    }
                } else {
                    columns.push(EvolutionColumn {
                        series: name.clone(),
                        direction,
                        hypothesis: None,
                        p_values: pass.summarize(self.config.mode)?,
                    });
                }
            }
        }
        Ok(EvolutionTable { columns })
    }
}
