//! Rank and quantile estimation over strided vectors.
//!
//! Queries work on a sorted scratch copy of the source; the source itself is
//! never reordered. Quantiles interpolate linearly between order statistics
//! at position `r * (n - 1)`; ranks invert that map through bisection.
//!
//! NaN handling follows the poison convention for quantiles: a NaN anywhere
//! in the source, or a rank outside `[0, 1]`, turns every output slot into
//! NaN. Ranks need an ordering to bisect against, so a NaN source value or a
//! NaN query fails instead.

use bitflags::bitflags;
use lineal_core::{Error, Result, Vector};
use log::trace;

bitflags! {
    /// Endpoint inclusion for a normalized rank grid.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct RankEndpoints: u8 {
        /// Include `0/q`.
        const ZERO = 0b01;
        /// Include `q/q`.
        const ONE = 0b10;
    }
}

fn sorted_copy(x: &Vector) -> (Vec<f64>, bool) {
    let mut values = x.to_vec();
    let has_nan = values.iter().any(|v| v.is_nan());
    values.sort_unstable_by(f64::total_cmp);
    (values, has_nan)
}

fn interpolate(sorted: &[f64], r: f64) -> f64 {
    let pos = r * (sorted.len() - 1) as f64;
    let index = pos.floor() as usize;
    let frac = pos - index as f64;
    if frac > 0.0 {
        sorted[index] + (sorted[index + 1] - sorted[index]) * frac
    } else {
        sorted[index]
    }
}

/// Interpolated quantiles of `x` at the given normalized ranks.
///
/// A NaN in the source or any rank outside `[0, 1]` poisons the whole query:
/// every output slot becomes NaN.
pub fn quantiles(x: &Vector, ranks: &[f64]) -> Vec<f64> {
    let (sorted, mut poisoned) = sorted_copy(x);
    poisoned = poisoned || ranks.iter().any(|r| !(0.0..=1.0).contains(r));
    if poisoned {
        trace!("quantiles: poisoned query over {} values", sorted.len());
        return vec![f64::NAN; ranks.len()];
    }
    ranks.iter().map(|&r| interpolate(&sorted, r)).collect()
}

/// Interpolated quantile of `x` at a single normalized rank.
pub fn quantile(x: &Vector, rank: f64) -> f64 {
    quantiles(x, &[rank])[0]
}

/// The 0.5 quantile.
pub fn median(x: &Vector) -> f64 {
    quantile(x, 0.5)
}

fn rank_of(sorted: &[f64], q: f64) -> Result<f64> {
    if q.is_nan() {
        return Err(Error::argument("rank query is NaN"));
    }
    let n = sorted.len();
    if q <= sorted[0] {
        return Ok(0.0);
    }
    if q >= sorted[n - 1] {
        return Ok(1.0);
    }
    // Tightest bracketing pair sorted[below] < q <= sorted[above].
    let above = sorted.partition_point(|&v| v < q);
    let below = above - 1;
    Ok(
        (below as f64 + (q - sorted[below]) / (sorted[above] - sorted[below]))
            / (n - 1) as f64,
    )
}

/// Normalized ranks of the given query values within `x`.
///
/// Values at or below the minimum map to 0, at or above the maximum to 1,
/// and anything in between to the interpolated position of its bracketing
/// pair. Requires at least two source values; fails on NaN in the source or
/// in a query.
pub fn ranks(x: &Vector, queries: &[f64]) -> Result<Vec<f64>> {
    if x.len() < 2 {
        return Err(Error::argument(
            "rank source must hold at least two values",
        ));
    }
    let (sorted, has_nan) = sorted_copy(x);
    if has_nan {
        return Err(Error::argument("rank source contains NaN"));
    }
    queries.iter().map(|&q| rank_of(&sorted, q)).collect()
}

/// Normalized rank of a single query value within `x`.
pub fn rank(x: &Vector, query: f64) -> Result<f64> {
    Ok(ranks(x, &[query])?[0])
}

/// The grid `{k/q}` with endpoint inclusion selected by `endpoints`.
///
/// Without flags the grid runs from `1/q` to `(q-1)/q`; `ZERO` prepends 0 and
/// `ONE` appends 1.
pub fn normalized_ranks(q: usize, endpoints: RankEndpoints) -> Result<Vec<f64>> {
    if q == 0 {
        return Err(Error::argument("rank grid denominator must be positive"));
    }
    let lo = if endpoints.contains(RankEndpoints::ZERO) {
        0
    } else {
        1
    };
    let hi = if endpoints.contains(RankEndpoints::ONE) {
        q
    } else {
        q - 1
    };
    Ok((lo..=hi).map(|k| k as f64 / q as f64).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn vec_of(values: &[f64]) -> Vector {
        Vector::from_slice(values).unwrap()
    }

    #[test]
    fn test_quantile_reference_points() {
        let x = vec_of(&[1.0, 2.0, 4.0]);
        assert_eq!(quantile(&x, 0.0), 1.0);
        assert_eq!(quantile(&x, 0.5), 2.0);
        assert_eq!(quantile(&x, 1.0), 4.0);
        assert_eq!(quantile(&x, 0.75), 3.0);
    }

    #[test]
    fn test_quantile_unsorted_source() {
        let x = vec_of(&[4.0, 1.0, 2.0]);
        assert_eq!(quantile(&x, 0.5), 2.0);
        // The source is untouched by the scratch sort.
        assert_eq!(x.to_vec(), vec![4.0, 1.0, 2.0]);
    }

    #[test]
    fn test_quantile_nan_poisons_all_slots() {
        let x = vec_of(&[1.0, f64::NAN, 3.0]);
        let out = quantiles(&x, &[0.0, 0.5, 1.0]);
        assert!(out.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_out_of_range_rank_poisons_all_slots() {
        let x = vec_of(&[1.0, 2.0, 3.0]);
        let out = quantiles(&x, &[0.5, 1.5]);
        assert!(out.iter().all(|v| v.is_nan()));
        assert!(quantile(&x, -0.1).is_nan());
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&vec_of(&[5.0, 1.0, 3.0])), 3.0);
        assert_eq!(median(&vec_of(&[1.0, 2.0, 3.0, 4.0])), 2.5);
    }

    #[test]
    fn test_rank_reference_points() {
        let x = vec_of(&[1.0, 2.0, 4.0]);
        assert_eq!(rank(&x, 2.0).unwrap(), 0.5);
        assert_eq!(rank(&x, 0.5).unwrap(), 0.0);
        assert_eq!(rank(&x, 1.0).unwrap(), 0.0);
        assert_eq!(rank(&x, 4.0).unwrap(), 1.0);
        assert_eq!(rank(&x, 9.0).unwrap(), 1.0);
        assert_relative_eq!(rank(&x, 3.0).unwrap(), 0.75, epsilon = 1e-12);
    }

    #[test]
    fn test_rank_failures() {
        assert!(rank(&vec_of(&[1.0]), 1.0).is_err());
        assert!(rank(&vec_of(&[1.0, 2.0]), f64::NAN).is_err());
        assert!(rank(&vec_of(&[1.0, f64::NAN]), 1.5).is_err());
    }

    #[test]
    fn test_round_trip_law() {
        let x = vec_of(&[0.3, 1.8, 2.2, 4.9, 7.5, 9.1]);
        for r in [0.0, 0.1, 0.25, 0.5, 0.77, 0.9, 1.0] {
            let q = quantile(&x, r);
            assert_relative_eq!(rank(&x, q).unwrap(), r, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_normalized_ranks_modes() {
        assert_eq!(
            normalized_ranks(4, RankEndpoints::ZERO | RankEndpoints::ONE).unwrap(),
            vec![0.0, 0.25, 0.5, 0.75, 1.0]
        );
        assert_eq!(
            normalized_ranks(4, RankEndpoints::empty()).unwrap(),
            vec![0.25, 0.5, 0.75]
        );
        assert_eq!(
            normalized_ranks(4, RankEndpoints::ZERO).unwrap(),
            vec![0.0, 0.25, 0.5, 0.75]
        );
        assert_eq!(
            normalized_ranks(4, RankEndpoints::ONE).unwrap(),
            vec![0.25, 0.5, 0.75, 1.0]
        );
        assert!(normalized_ranks(0, RankEndpoints::empty()).is_err());
    }

    #[test]
    fn test_quantile_over_strided_view() {
        use lineal_core::{Matrix, Order};
        let m = Matrix::from_nested(&[vec![3.0, 9.0], vec![1.0, 9.0], vec![2.0, 9.0]], Order::RowMajor)
            .unwrap();
        let col = m.minor(0).unwrap();
        assert_eq!(quantile(&col, 0.5), 2.0);
    }
}
