//! Representative range selection from bidirectional evolution series.
//!
//! Given the summarized backward and forward p-value series of a record,
//! finds the longest stretch anchored at one end of the record over which
//! the battery does not reject, i.e. the stretch that can represent the
//! current (or original) regime of the process.

use crate::errors::{
    validate_parameter, RhisAnalysisError, RhisResult,
};

/// A representative stretch of a record, as half-open index ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RepresentativeRange {
    /// The representative range itself, `start..end` into the record
    pub init_range: (usize, usize),
    /// Optional stretch adjacent to `init_range` that the forward pass
    /// alone would still accept, a candidate for extending the range
    pub extension_range: Option<(usize, usize)>,
}

impl RepresentativeRange {
    /// Whether the whole record was found representative.
    pub fn is_whole(&self, n: usize) -> bool {
        self.init_range == (0, n)
    }

    /// Length of the representative range in observations.
    pub fn len(&self) -> usize {
        self.init_range.1 - self.init_range.0
    }

    /// Whether the representative range is empty.
    pub fn is_empty(&self) -> bool {
        self.init_range.1 == self.init_range.0
    }
}

/// Selects the representative range of a record.
///
/// `backward[i]` must hold the summarized p-value of the window `ts[i..n]`
/// and `forward[i]` that of `ts[0..=i]`, as produced by the evolution
/// engine with any summary mode. Entries where no full window exists are
/// `NaN`; the minimum window length is recovered from that padding.
///
/// With `most_recent` the range is anchored at the end of the record:
///
/// * If the full record passes from either end (`backward[0] > alpha` or
///   `forward[n-1] > alpha`), the whole record is representative.
/// * Otherwise the backward series is scanned from the start for the
///   first window that passes; its start index anchors the range. If the
///   forward series also passes somewhere, the latest stretch it accepts
///   is split off as the extension range.
///
/// With `most_recent = false` the range is anchored at the start; this is
/// the same selection run on the index-reversed record, so the two
/// directions swap roles and the resulting ranges are mirrored back.
///
/// Note the asymmetry with the tests themselves: a window passes the
/// selection when `p > alpha`, so a p-value exactly at the level counts
/// as a rejection here.
pub fn select_representative_range(
    backward: &[f64],
    forward: &[f64],
    alpha: f64,
    most_recent: bool,
) -> RhisResult<RepresentativeRange> {
    validate_parameter(alpha, 0.0, 1.0, "alpha")?;
    if backward.len() != forward.len() {
        return Err(RhisAnalysisError::MismatchedLengths {
            backward: backward.len(),
            forward: forward.len(),
        });
    }
    let n = backward.len();
    let valid = backward.iter().filter(|p| p.is_finite()).count();
    if valid == 0 {
        return Err(RhisAnalysisError::NumericalError {
            reason: "evolution series contains no finite p-values".to_string(),
        });
    }
    // NaN padding occupies w - 1 entries of each series
    let w = n - valid + 1;
    if !backward[0].is_finite() || !forward[n - 1].is_finite() {
        return Err(RhisAnalysisError::NumericalError {
            reason: "full-record p-value is not finite".to_string(),
        });
    }

    if most_recent {
        Ok(select_most_recent(backward, forward, alpha, w))
    } else {
        // Reversing the record swaps the two passes: the forward series of
        // the reversed record is the reversed backward series and vice
        // versa. Select on the mirror, then map indices back.
        let mirrored_backward: Vec<f64> = forward.iter().rev().copied().collect();
        let mirrored_forward: Vec<f64> = backward.iter().rev().copied().collect();
        let mirrored = select_most_recent(&mirrored_backward, &mirrored_forward, alpha, w);

        let (start, end) = mirrored.init_range;
        Ok(RepresentativeRange {
            init_range: (n - end, n - start),
            extension_range: mirrored
                .extension_range
                .map(|(start, end)| (n - end, n - start)),
        })
    }
}

/// The end-anchored selection on already-oriented series.
fn select_most_recent(
    backward: &[f64],
    forward: &[f64],
    alpha: f64,
    w: usize,
) -> RepresentativeRange {
    let n = backward.len();

    if backward[0] > alpha || forward[n - 1] > alpha {
        log::debug!("full record accepted as representative");
        return RepresentativeRange {
            init_range: (0, n),
            extension_range: None,
        };
    }

    let mut backward_anchor = 0;
    let mut forward_anchor = 0;
    // backward[n - w] is the last window the backward pass evaluates; if
    // even that shortest tail window fails, no proper suffix passes and
    // the anchors stay at zero.
    if backward[n - w] > alpha {
        let mut i = 0;
        while backward[i] <= alpha && i < n - w {
            i += 1;
        }
        backward_anchor = i;

        if forward[w - 1] > alpha {
            let mut j = n - 1;
            while forward[j] <= alpha && j > w - 1 {
                j -= 1;
            }
            forward_anchor = j + 1;
        }
    }

    if forward_anchor > backward_anchor {
        RepresentativeRange {
            init_range: (forward_anchor, n),
            extension_range: Some((backward_anchor, forward_anchor)),
        }
    } else {
        RepresentativeRange {
            init_range: (backward_anchor, n),
            extension_range: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAN: f64 = f64::NAN;

    #[test]
    fn test_whole_record_accepted_from_backward() {
        let backward = [0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, NAN, NAN];
        let forward = [NAN, NAN, 0.01, 0.01, 0.01, 0.01, 0.01, 0.01, 0.01, 0.01];
        let range = select_representative_range(&backward, &forward, 0.05, true).unwrap();
        assert_eq!(range.init_range, (0, 10));
        assert_eq!(range.extension_range, None);
        assert!(range.is_whole(10));
    }

    #[test]
    fn test_whole_record_accepted_from_forward() {
        let backward = [0.01, 0.01, 0.02, 0.03, 0.04, 0.1, 0.3, 0.2, NAN, NAN];
        let forward = [NAN, NAN, 0.01, 0.01, 0.01, 0.01, 0.01, 0.01, 0.01, 0.2];
        let range = select_representative_range(&backward, &forward, 0.05, true).unwrap();
        assert_eq!(range.init_range, (0, 10));
    }

    #[test]
    fn test_most_recent_anchor_without_extension() {
        // Backward passes from index 3 on; the forward pass never passes
        let backward = [0.01, 0.01, 0.04, 0.2, 0.3, 0.4, 0.5, 0.6, NAN, NAN];
        let forward = [NAN, NAN, 0.01, 0.01, 0.01, 0.01, 0.01, 0.01, 0.01, 0.01];
        let range = select_representative_range(&backward, &forward, 0.05, true).unwrap();
        assert_eq!(range.init_range, (3, 10));
        assert_eq!(range.extension_range, None);
        assert_eq!(range.len(), 7);
    }

    #[test]
    fn test_most_recent_anchor_with_extension() {
        let backward = [0.01, 0.01, 0.04, 0.2, 0.3, 0.4, 0.5, 0.6, NAN, NAN];
        let forward = [NAN, NAN, 0.2, 0.3, 0.1, 0.04, 0.03, 0.02, 0.01, 0.01];
        let range = select_representative_range(&backward, &forward, 0.05, true).unwrap();
        assert_eq!(range.init_range, (5, 10));
        assert_eq!(range.extension_range, Some((3, 5)));
    }

    #[test]
    fn test_boundary_p_value_counts_as_rejection() {
        // p == alpha does not pass the selection
        let backward = [0.05, 0.05, 0.05, 0.2, 0.3, 0.4, 0.5, 0.6, NAN, NAN];
        let forward = [NAN, NAN, 0.01, 0.01, 0.01, 0.01, 0.01, 0.01, 0.01, 0.05];
        let range = select_representative_range(&backward, &forward, 0.05, true).unwrap();
        assert_eq!(range.init_range, (3, 10));
    }

    #[test]
    fn test_no_passing_tail_window() {
        // Even the shortest tail window fails: anchors stay at the start
        let backward = [0.01, 0.02, 0.01, 0.03, 0.01, 0.02, 0.01, 0.02, NAN, NAN];
        let forward = [NAN, NAN, 0.01, 0.01, 0.01, 0.01, 0.01, 0.01, 0.01, 0.01];
        let range = select_representative_range(&backward, &forward, 0.05, true).unwrap();
        assert_eq!(range.init_range, (0, 10));
        assert_eq!(range.extension_range, None);
    }

    #[test]
    fn test_earliest_mode_mirrors_selection() {
        let backward = [0.01, 0.01, 0.04, 0.2, 0.3, 0.4, 0.5, 0.6, NAN, NAN];
        let forward = [NAN, NAN, 0.2, 0.3, 0.1, 0.04, 0.03, 0.02, 0.01, 0.01];
        let range = select_representative_range(&backward, &forward, 0.05, false).unwrap();
        assert_eq!(range.init_range, (0, 3));
        assert_eq!(range.extension_range, Some((3, 5)));
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let backward = [0.2, 0.3, NAN];
        let forward = [NAN, 0.1, 0.2, 0.3];
        assert!(matches!(
            select_representative_range(&backward, &forward, 0.05, true),
            Err(RhisAnalysisError::MismatchedLengths { .. })
        ));
    }

    #[test]
    fn test_all_nan_rejected() {
        let series = [NAN, NAN, NAN];
        assert!(select_representative_range(&series, &series, 0.05, true).is_err());
    }

    #[test]
    fn test_invalid_alpha_rejected() {
        let backward = [0.2, 0.3, NAN];
        let forward = [NAN, 0.1, 0.2];
        assert!(select_representative_range(&backward, &forward, 0.0, true).is_err());
    }
}
