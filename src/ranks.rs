//! Rank computation with tie correction.
//!
//! Every rank-based test in the battery (Mann-Whitney, Wald-Wolfowitz on
//! ranks, Mann-Kendall's variance reduction) needs ranks where tied values
//! receive the arithmetic mean of the positional ranks they would otherwise
//! occupy, plus the sizes of the tie groups for variance-correction terms.

use crate::errors::{validate_all_finite, RhisResult};

/// Tie-corrected ranks of a sequence together with tie bookkeeping.
///
/// Derived deterministically from the input; recomputed per test call.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TiesReport {
    /// Tie-averaged ranks in the original (unsorted) order
    pub ranks: Vec<f64>,
    /// Original-order index groups of tied observations (groups of size >= 2)
    pub ties_indexes: Vec<Vec<usize>>,
    /// Number of distinct rank values in `ranks`
    pub ties_count: usize,
    /// For each distinct rank value (ascending), how many observations share it
    pub ties_groups_count: Vec<usize>,
}

/// Computes tie-averaged ranks of `x` in its original order.
///
/// Ranks partition `1..=n`: a run of `k` equal values starting at sorted
/// position `i` (0-based) all receive the mean of `i+1..=i+k`, so the rank
/// sum is always `n(n+1)/2`.
///
/// # Returns
/// * `Ok(ranks)` - One rank per input element, original order
/// * `Err` - If the input contains non-finite values
pub fn ranks_with_ties(x: &[f64]) -> RhisResult<Vec<f64>> {
    Ok(ties_report(x)?.ranks)
}

/// Computes ordinal (positional) ranks of `x` without tie averaging.
///
/// Tied values receive distinct consecutive ranks in order of appearance
/// in the sorted sequence. Used by the rank-transform variant of the
/// Wald-Wolfowitz test when tie correction is disabled.
pub fn ordinal_ranks(x: &[f64]) -> RhisResult<Vec<f64>> {
    validate_all_finite(x, "ranks input")?;

    let order = sort_order(x);
    let mut ranks = vec![0.0; x.len()];
    for (pos, &orig) in order.iter().enumerate() {
        ranks[orig] = (pos + 1) as f64;
    }

    Ok(ranks)
}

/// Computes tie-averaged ranks plus full tie bookkeeping for `x`.
///
/// `ties_groups_count` reports, for each distinct rank value appearing in
/// the corrected rank array, how many observations share it; singleton
/// groups contribute 1 and cancel out of the Mann-Kendall correction term.
///
/// An all-equal input yields a single tie group spanning the whole sequence.
pub fn ties_report(x: &[f64]) -> RhisResult<TiesReport> {
    validate_all_finite(x, "ranks input")?;

    let n = x.len();
    let order = sort_order(x);

    let mut ranks = vec![0.0; n];
    let mut ties_indexes = Vec::new();
    let mut ties_groups_count = Vec::new();

    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && x[order[j]] == x[order[i]] {
            j += 1;
        }
        // Mean of the positional ranks i+1..=j
        let avg_rank = (i + 1 + j) as f64 / 2.0;
        for &orig in &order[i..j] {
            ranks[orig] = avg_rank;
        }
        ties_groups_count.push(j - i);
        if j - i > 1 {
            ties_indexes.push(order[i..j].to_vec());
        }
        i = j;
    }

    if !ties_indexes.is_empty() {
        log::debug!(
            "tie correction applied: {} tie group(s) in {} observations",
            ties_indexes.len(),
            n
        );
    }

    Ok(TiesReport {
        ranks,
        ties_indexes,
        ties_count: ties_groups_count.len(),
        ties_groups_count,
    })
}

/// Indices of `x` in ascending value order (stable for ties).
fn sort_order(x: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..x.len()).collect();
    order.sort_by(|&a, &b| x[a].total_cmp(&x[b]));
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranks_without_ties() {
        let ranks = ranks_with_ties(&[30.0, 10.0, 20.0]).unwrap();
        assert_eq!(ranks, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_ranks_with_tie_groups() {
        // Two tie groups: {2.2, 2.2} -> 2.5 and {8, 8} -> 5.5
        let report = ties_report(&[5.0, 1.0, 2.2, 2.2, 8.0, 8.0]).unwrap();
        assert_eq!(report.ranks, vec![4.0, 1.0, 2.5, 2.5, 5.5, 5.5]);
        assert_eq!(report.ties_groups_count, vec![1, 2, 1, 2]);
        assert_eq!(report.ties_count, 4);
        assert_eq!(report.ties_indexes.len(), 2);
        assert_eq!(report.ties_indexes[0], vec![2, 3]);
        assert_eq!(report.ties_indexes[1], vec![4, 5]);
    }

    #[test]
    fn test_rank_sum_invariant() {
        // sum(ranks) == n(n+1)/2 regardless of ties
        let inputs: Vec<Vec<f64>> = vec![
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
            vec![2.0, 2.0, 2.0, 1.0, 5.0, 5.0],
            vec![7.0; 9],
            vec![3.1, -2.0, 3.1, 0.0, 3.1, 100.0],
        ];
        for input in inputs {
            let n = input.len() as f64;
            let ranks = ranks_with_ties(&input).unwrap();
            let sum: f64 = ranks.iter().sum();
            assert!((sum - n * (n + 1.0) / 2.0).abs() < 1e-10, "rank sum broken for {:?}", input);
        }
    }

    #[test]
    fn test_all_equal_single_group() {
        let report = ties_report(&[4.0; 6]).unwrap();
        assert_eq!(report.ranks, vec![3.5; 6]);
        assert_eq!(report.ties_groups_count, vec![6]);
        assert_eq!(report.ties_count, 1);
        assert_eq!(report.ties_indexes.len(), 1);
        assert_eq!(report.ties_indexes[0].len(), 6);
    }

    #[test]
    fn test_ordinal_ranks_break_ties_positionally() {
        let ranks = ordinal_ranks(&[2.0, 2.0, 1.0]).unwrap();
        assert_eq!(ranks, vec![2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_non_finite_input_rejected() {
        assert!(ranks_with_ties(&[1.0, f64::NAN, 2.0]).is_err());
        assert!(ties_report(&[1.0, f64::INFINITY]).is_err());
    }

    #[test]
    fn test_empty_input() {
        let report = ties_report(&[]).unwrap();
        assert!(report.ranks.is_empty());
        assert_eq!(report.ties_count, 0);
    }
}
