//! # RHIS Time Series Analysis
//!
//! Non-parametric screening of hydrological time series for the four
//! assumptions frequency analysis rests on: Randomness, Homogeneity,
//! Independence and Stationarity (RHIS).
//!
//! The crate runs a battery of classical hypothesis tests over expanding
//! windows in both directions of a record, tracks how the p-values evolve
//! as the windows grow, and from the two evolution curves selects the
//! longest stretch of the record that still behaves like a single
//! homogeneous sample, the representative range.
//!
//! ## Key Features
//!
//! - **Four-test battery**: Wallis-Moore (randomness), Mann-Whitney
//!   (homogeneity), Wald-Wolfowitz (independence) and Mann-Kendall
//!   (stationarity), all with tie-corrected variances and a shared
//!   normal-approximation decision rule
//! - **Bidirectional evolution**: expanding-window p-value series from
//!   both ends of the record
//! - **Representative range selection**: end-anchored or start-anchored
//!   ranges with an optional extension candidate
//! - **Summary modes**: min (conservative default), mean, median, or the
//!   raw per-hypothesis series
//!
//! ## Quick Start
//!
//! ```rust
//! use rhis_timeseries::{RhisAnalyzer, RhisAnalysisError};
//!
//! fn main() -> Result<(), RhisAnalysisError> {
//!     let mut analyzer = RhisAnalyzer::new();
//!
//!     // An annual flow record: a shift around index 14
//!     let flows = vec![
//!         10.85, 8.74, 9.39, 10.33, 9.09, 9.94, 10.16, 9.25, 8.82, 10.17,
//!         10.89, 9.42, 9.7, 11.48, 11.5, 11.54, 14.16, 10.62, 12.72, 10.2,
//!         11.46, 13.35, 13.1, 11.19, 11.59, 12.07, 10.87, 12.5,
//!     ];
//!     analyzer.add_time_series("gauge", flows)?;
//!     analyzer.evolve_all_series()?;
//!
//!     let summary = analyzer.representative_range("gauge")?;
//!     let (start, end) = summary.range.init_range;
//!     println!("representative range: {}..{}", start, end);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! The crate is organized around the [`RhisAnalyzer`], which manages
//! named series and orchestrates evolution and range selection. The
//! individual tests in [`statistical_tests`] and the engine functions
//! [`rhis_evolution`] and [`select_representative_range`] can also be
//! used directly.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
pub mod analyzer;
pub mod config;
pub mod errors;
pub mod evolution;
pub mod ranks;
pub mod representative;
pub mod results;

// Re-exports for convenience - main public API
pub use analyzer::RhisAnalyzer;
pub use config::{EvolutionConfig, EvolutionMode};
pub use errors::{RhisAnalysisError, RhisResult};
pub use evolution::{rhis_evolution, Direction, DirectionalEvolution, RhisEvolution};
pub use ranks::{ordinal_ranks, ranks_with_ties, ties_report, TiesReport};
pub use representative::{select_representative_range, RepresentativeRange};
pub use results::{EvolutionColumn, EvolutionTable, RepresentativeSummary};
pub use statistical_tests::{
    mann_kendall, mann_whitney, mann_whitney_with_config, runs_test, wald_wolfowitz,
    wald_wolfowitz_with_config, wallis_moore, Alternative, Hypothesis, MannWhitneyConfig,
    TestResult, WaldWolfowitzConfig,
};
