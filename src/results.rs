//! Result containers for evolution runs and range selection.

use crate::config::EvolutionMode;
use crate::evolution::Direction;
use crate::representative::RepresentativeRange;
use crate::statistical_tests::Hypothesis;

/// One p-value column of an evolution table.
///
/// A column with a `hypothesis` carries that test's raw per-window
/// p-values; a column without one carries the summarized series.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvolutionColumn {
    /// Name of the series the column belongs to
    pub series: String,
    /// Which evolution pass produced the column
    pub direction: Direction,
    /// The hypothesis behind the column, `None` for a summary column
    pub hypothesis: Option<Hypothesis>,
    /// Per-index p-values, `NaN` where no full window exists
    pub p_values: Vec<f64>,
}

impl EvolutionColumn {
    /// Column label of the form `series_direction[_hypothesis]`.
    pub fn label(&self) -> String {
        match self.hypothesis {
            Some(h) => format!("{}_{}_{}", self.series, self.direction, h),
            None => format!("{}_{}", self.series, self.direction),
        }
    }
}

/// Flat, export-friendly view of every evolution the analyzer holds.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvolutionTable {
    /// All columns, grouped by series and ordered backward before forward
    pub columns: Vec<EvolutionColumn>,
}

impl EvolutionTable {
    /// Looks up a column by series, direction and (optional) hypothesis.
    pub fn column(
        &self,
        series: &str,
        direction: Direction,
        hypothesis: Option<Hypothesis>,
    ) -> Option<&EvolutionColumn> {
        self.columns
            .iter()
            .find(|c| c.series == series && c.direction == direction && c.hypothesis == hypothesis)
    }

    /// Number of columns in the table.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the table holds no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// A selected representative range together with the selection inputs.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RepresentativeSummary {
    /// Name of the series the range was selected for
    pub series: String,
    /// Length of the full record
    pub series_length: usize,
    /// Significance level the selection compared against
    pub alpha: f64,
    /// Summary mode the evolution series were collapsed with
    pub mode: EvolutionMode,
    /// Whether the range is anchored at the end of the record
    pub most_recent: bool,
    /// The selected range
    pub range: RepresentativeRange,
}

impl RepresentativeSummary {
    /// Copies `ts` with everything outside the representative range
    /// masked to `NaN`, preserving the record's index alignment.
    pub fn apply(&self, ts: &[f64]) -> Vec<f64> {
        let (start, end) = self.range.init_range;
        ts.iter()
            .enumerate()
            .map(|(i, &v)| if i >= start && i < end { v } else { f64::NAN })
            .collect()
    }
}
