//! The Beer-Lambert transmission law.
//!
//! A narrow beam of intensity $I_0$ crossing a homogeneous slab of
//! thickness $x$ with linear attenuation coefficient $\mu$ leaves with
//!
//! $$I = I_0 \, e^{-\mu x}$$
//!
//! No sign check is made on $\mu$: a negative value (amplification) only
//! arises from extrapolating a material table far outside its range, and
//! is passed through unchanged.

use ndarray::{Array, ArrayView, Dimension};

use crate::engine::TransmissionError;

/// Transmitted intensity through a single slab.
///
/// Zero thickness returns `i0` exactly.
///
/// # Arguments
/// * `i0` - Incident intensity ($\geq 0$).
/// * `mu` - Linear attenuation coefficient (cm⁻¹).
/// * `thickness_cm` - Slab thickness ($\geq 0$, cm).
pub fn transmitted_intensity(i0: f64, mu: f64, thickness_cm: f64) -> f64 {
    i0 * transmission_fraction(mu, thickness_cm)
}

/// Element-wise [`transmitted_intensity`] over an array of thicknesses.
///
/// The result has the same shape as `thickness_cm`.
pub fn transmitted_intensity_array<D: Dimension>(
    i0: f64,
    mu: f64,
    thickness_cm: ArrayView<'_, f64, D>,
) -> Array<f64, D> {
    thickness_cm.mapv(|t| transmitted_intensity(i0, mu, t))
}

/// Fraction of the incident beam that survives a slab, $e^{-\mu x}$.
pub fn transmission_fraction(mu: f64, thickness_cm: f64) -> f64 {
    (-mu * thickness_cm).exp()
}

/// Check that an incident intensity is finite and non-negative.
pub fn validate_intensity(i0: f64) -> Result<(), TransmissionError> {
    if i0.is_finite() && i0 >= 0.0 {
        Ok(())
    } else {
        Err(TransmissionError::InvalidInput(format!(
            "incident intensity must be finite and non-negative, got {i0}"
        )))
    }
}

/// Check that a photon energy is finite and non-negative.
pub fn validate_energy(energy_mev: f64) -> Result<(), TransmissionError> {
    if energy_mev.is_finite() && energy_mev >= 0.0 {
        Ok(())
    } else {
        Err(TransmissionError::InvalidInput(format!(
            "photon energy must be finite and non-negative, got {energy_mev} MeV"
        )))
    }
}

/// Check that every thickness in a curve grid is finite and non-negative.
pub fn validate_thicknesses<'a>(
    thickness_cm: impl IntoIterator<Item = &'a f64>,
) -> Result<(), TransmissionError> {
    match thickness_cm.into_iter().find(|t| !(t.is_finite() && **t >= 0.0)) {
        Some(t) => Err(TransmissionError::InvalidInput(format!(
            "thickness must be finite and non-negative, got {t}"
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{array, Array1, Array2};

    #[test]
    fn test_zero_thickness_is_identity() {
        assert_eq!(transmitted_intensity(1000.0, 0.35, 0.0), 1000.0);
        assert_eq!(transmitted_intensity(1000.0, -0.2, 0.0), 1000.0);
    }

    #[test]
    fn test_water_at_five_cm() {
        let i = transmitted_intensity(1000.0, 0.07, 5.0);
        assert_relative_eq!(i, 1000.0 * (-0.35f64).exp(), max_relative = 1e-15);
        assert_relative_eq!(i, 704.688, epsilon = 1e-3);
    }

    #[test]
    fn test_non_increasing_in_thickness() {
        for &mu in &[0.0, 0.017, 0.35, 54.7] {
            let mut prev = transmitted_intensity(500.0, mu, 0.0);
            for step in 1..200 {
                let i = transmitted_intensity(500.0, mu, step as f64 * 0.05);
                assert!(i <= prev, "mu={mu}: I rose from {prev} to {i}");
                prev = i;
            }
        }
    }

    #[test]
    fn test_negative_mu_amplifies() {
        assert!(transmitted_intensity(1.0, -0.1, 2.0) > 1.0);
    }

    #[test]
    fn test_array_matches_scalar_and_keeps_shape() {
        let t: Array1<f64> = Array1::linspace(0.0, 10.0, 11);
        let out = transmitted_intensity_array(1000.0, 0.2, t.view());
        assert_eq!(out.len(), 11);
        for (ti, ii) in t.iter().zip(out.iter()) {
            assert_eq!(*ii, transmitted_intensity(1000.0, 0.2, *ti));
        }

        let grid: Array2<f64> = array![[0.0, 1.0], [2.0, 3.0]];
        let out = transmitted_intensity_array(1.0, 1.0, grid.view());
        assert_eq!(out.shape(), &[2, 2]);
        assert_eq!(out[[0, 0]], 1.0);
    }

    #[test]
    fn test_fraction() {
        assert_relative_eq!(transmission_fraction(0.5, 2.0), (-1.0f64).exp());
    }

    #[test]
    fn test_validation() {
        assert!(validate_intensity(0.0).is_ok());
        assert!(validate_intensity(-1.0).is_err());
        assert!(validate_intensity(f64::NAN).is_err());
        assert!(validate_energy(0.0).is_ok());
        assert!(validate_energy(-0.1).is_err());
        assert!(validate_energy(f64::INFINITY).is_err());
        assert!(validate_thicknesses(&[0.0, 1.0, 2.0]).is_ok());
        assert!(validate_thicknesses(&[0.0, -1.0]).is_err());
    }
}
