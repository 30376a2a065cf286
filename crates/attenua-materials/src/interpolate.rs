//! Piecewise-linear interpolation for tabulated attenuation data.
//!
//! Mass attenuation tables are sparse (a handful of energies spanning
//! several decades). Between knots the value is interpolated linearly;
//! outside the table the nearest edge segment is extended with its own
//! slope, so there is no plateau at the data boundary.

use serde::Serialize;

use crate::provider::MaterialError;

/// A piecewise-linear interpolator over strictly increasing knots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearInterpolator {
    /// Sorted x values (knots).
    #[serde(rename = "x")]
    pub(crate) xs: Vec<f64>,
    /// Corresponding y values.
    #[serde(rename = "y")]
    pub(crate) ys: Vec<f64>,
}

impl LinearInterpolator {
    /// Construct an interpolator from data points.
    ///
    /// # Arguments
    /// * `xs` - Strictly increasing, finite x values.
    /// * `ys` - Corresponding finite y values (same length as `xs`).
    ///
    /// # Errors
    /// [`MaterialError::InvalidInput`] if the lengths differ, fewer than 2
    /// points are given, any value is not finite, or `xs` is not strictly
    /// increasing.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self, MaterialError> {
        if xs.len() != ys.len() {
            return Err(MaterialError::InvalidInput(format!(
                "grid has {} points but {} values",
                xs.len(),
                ys.len()
            )));
        }
        if xs.len() < 2 {
            return Err(MaterialError::InvalidInput(format!(
                "need at least 2 data points, got {}",
                xs.len()
            )));
        }
        if let Some(i) = xs.iter().chain(ys.iter()).position(|v| !v.is_finite()) {
            return Err(MaterialError::InvalidInput(format!(
                "non-finite value at position {i} of the table"
            )));
        }
        if let Some(i) = (1..xs.len()).find(|&i| xs[i] <= xs[i - 1]) {
            return Err(MaterialError::InvalidInput(format!(
                "grid must be strictly increasing (x[{}] = {} <= x[{}] = {})",
                i,
                xs[i],
                i - 1,
                xs[i - 1]
            )));
        }

        Ok(Self { xs, ys })
    }

    /// Evaluate the interpolant at `x`.
    ///
    /// Exact at the knots. Beyond the first or last knot the edge segment
    /// is extrapolated linearly.
    pub fn evaluate(&self, x: f64) -> f64 {
        let n = self.xs.len();

        // Binary search for the enclosing interval. Out-of-range x settles
        // on the first or last segment.
        let mut lo = 0;
        let mut hi = n - 1;
        while hi - lo > 1 {
            let mid = (lo + hi) / 2;
            if self.xs[mid] > x {
                hi = mid;
            } else {
                lo = mid;
            }
        }

        let h = self.xs[hi] - self.xs[lo];
        let a = (self.xs[hi] - x) / h;
        let b = (x - self.xs[lo]) / h;

        a * self.ys[lo] + b * self.ys[hi]
    }

    /// Knot positions.
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Tabulated values.
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// Closed interval covered by the knots.
    pub fn domain(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }

    /// Whether `x` lies inside the tabulated domain.
    pub fn contains(&self, x: f64) -> bool {
        let (lo, hi) = self.domain();
        x >= lo && x <= hi
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> LinearInterpolator {
        LinearInterpolator::new(vec![1.0, 2.0, 4.0, 5.0], vec![2.0, 3.0, 7.0, 1.0]).unwrap()
    }

    #[test]
    fn test_passes_through_data_points() {
        let interp = sample();
        for (x, y) in interp.xs().iter().zip(interp.ys().iter()) {
            assert_eq!(interp.evaluate(*x), *y, "interp({x}) should be exactly {y}");
        }
    }

    #[test]
    fn test_midpoints_are_linear() {
        let interp = sample();
        assert_relative_eq!(interp.evaluate(1.5), 2.5, epsilon = 1e-12);
        assert_relative_eq!(interp.evaluate(3.0), 5.0, epsilon = 1e-12);
        assert_relative_eq!(interp.evaluate(4.5), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_extrapolates_with_edge_slopes() {
        let interp = sample();
        // First segment slope = 1
        assert_relative_eq!(interp.evaluate(0.0), 1.0, epsilon = 1e-12);
        // Last segment slope = -6, no clamping
        assert_relative_eq!(interp.evaluate(6.0), -5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_length_mismatch() {
        let err = LinearInterpolator::new(vec![1.0, 2.0, 3.0], vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(err, MaterialError::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_single_point() {
        assert!(LinearInterpolator::new(vec![1.0], vec![1.0]).is_err());
    }

    #[test]
    fn test_rejects_unsorted_grid() {
        assert!(LinearInterpolator::new(vec![1.0, 3.0, 2.0], vec![0.0, 0.0, 0.0]).is_err());
        assert!(LinearInterpolator::new(vec![1.0, 1.0], vec![0.0, 0.0]).is_err());
    }

    #[test]
    fn test_rejects_nan() {
        assert!(LinearInterpolator::new(vec![1.0, 2.0], vec![f64::NAN, 0.0]).is_err());
    }

    #[test]
    fn test_domain_and_contains() {
        let interp = sample();
        assert_eq!(interp.domain(), (1.0, 5.0));
        assert!(interp.contains(1.0));
        assert!(interp.contains(5.0));
        assert!(!interp.contains(5.0001));
    }
}
