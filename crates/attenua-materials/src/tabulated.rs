//! Tabulated mass attenuation coefficients for biological materials.
//!
//! Each material carries a sparse table of mass attenuation coefficients
//! $\mu/\rho$ (cm²/g) at photon energies in MeV, plus its density
//! (g/cm³). The linear attenuation coefficient is
//! $\mu(E) = (\mu/\rho)(E) \cdot \rho$.
//!
//! ## Built-in materials
//!
//! | Identifier | Constructor | Density (g/cm³) |
//! |-----------|-------------|-----------------|
//! | `bone` | [`TabulatedMaterial::bone()`] | 1.92 |
//! | `soft_tissue` | [`TabulatedMaterial::soft_tissue()`] | 1.03 |
//! | `air` | [`TabulatedMaterial::air()`] | 0.001225 |
//!
//! All three share the energy grid [`REFERENCE_ENERGIES_MEV`].

use serde::Serialize;

use crate::interpolate::LinearInterpolator;
use crate::provider::{title_case, MaterialError};

/// Photon energies (MeV) at which the built-in materials are tabulated.
pub const REFERENCE_ENERGIES_MEV: [f64; 5] = [0.01, 0.1, 1.0, 10.0, 20.0];

/// A homogeneous material with interpolated mass attenuation data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TabulatedMaterial {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    /// Density (g/cm³).
    density: f64,
    /// $\mu/\rho$ (cm²/g) against energy (MeV).
    #[serde(rename = "mass_attenuation")]
    table: LinearInterpolator,
}

impl TabulatedMaterial {
    /// Construct from tabulated data.
    ///
    /// # Arguments
    /// * `name` - Material identifier (catalog key).
    /// * `energies_mev` - Strictly increasing positive photon energies.
    /// * `mac` - Mass attenuation coefficients (cm²/g), non-negative.
    /// * `density` - Density in g/cm³, positive.
    pub fn new(
        name: impl Into<String>,
        energies_mev: Vec<f64>,
        mac: Vec<f64>,
        density: f64,
    ) -> Result<Self, MaterialError> {
        let name = name.into();
        let invalid = |msg: String| MaterialError::InvalidInput(format!("material '{name}': {msg}"));

        if !(density.is_finite() && density > 0.0) {
            return Err(invalid(format!("density must be positive, got {density}")));
        }
        if let Some(&e) = energies_mev.iter().find(|&&e| e <= 0.0) {
            return Err(invalid(format!("energies must be positive, got {e}")));
        }
        if let Some(&m) = mac.iter().find(|&&m| m < 0.0) {
            return Err(invalid(format!(
                "mass attenuation coefficients must be non-negative, got {m}"
            )));
        }
        let table = LinearInterpolator::new(energies_mev, mac).map_err(|e| match e {
            MaterialError::InvalidInput(msg) => invalid(msg),
            other => other,
        })?;

        Ok(Self {
            name,
            label: None,
            density,
            table,
        })
    }

    /// Attach a display label used by plots and reports.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Cortical bone.
    ///
    /// Dominated by photoelectric absorption in calcium below ~0.1 MeV,
    /// hence the steep drop between the first two energies.
    pub fn bone() -> Self {
        Self::reference("bone", &[28.51, 0.1855, 0.0656, 0.02314, 0.02068], 1.92)
    }

    /// Soft tissue (ICRU four-component, close to water).
    pub fn soft_tissue() -> Self {
        Self::reference("soft_tissue", &[4.937, 0.1688, 0.07003, 0.02191, 0.01785], 1.03)
    }

    /// Dry air at sea level.
    pub fn air() -> Self {
        Self::reference("air", &[5.120, 0.1541, 0.06358, 0.02045, 0.01705], 0.001225)
    }

    fn reference(name: &str, mac: &[f64; 5], density: f64) -> Self {
        Self {
            name: name.to_owned(),
            label: None,
            density,
            table: LinearInterpolator {
                xs: REFERENCE_ENERGIES_MEV.to_vec(),
                ys: mac.to_vec(),
            },
        }
    }

    /// Material identifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display label: the explicit label if one was attached, otherwise the
    /// title-cased identifier.
    pub fn label(&self) -> String {
        self.label.clone().unwrap_or_else(|| title_case(&self.name))
    }

    /// Density (g/cm³).
    pub fn density(&self) -> f64 {
        self.density
    }

    /// Tabulated energies (MeV).
    pub fn energies(&self) -> &[f64] {
        self.table.xs()
    }

    /// Tabulated mass attenuation coefficients (cm²/g).
    pub fn mac_values(&self) -> &[f64] {
        self.table.ys()
    }

    /// Energy range (MeV) covered by the table.
    pub fn energy_range(&self) -> (f64, f64) {
        self.table.domain()
    }

    /// Whether `energy_mev` lies inside the table (no extrapolation needed).
    pub fn contains_energy(&self, energy_mev: f64) -> bool {
        self.table.contains(energy_mev)
    }

    /// Interpolated $\mu/\rho$ (cm²/g). Linearly extrapolated outside the table.
    pub fn mass_attenuation(&self, energy_mev: f64) -> f64 {
        self.table.evaluate(energy_mev)
    }

    /// Linear attenuation coefficient $\mu$ (cm⁻¹).
    pub fn linear_attenuation(&self, energy_mev: f64) -> f64 {
        self.mass_attenuation(energy_mev) * self.density
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_presets_reproduce_table_exactly() {
        let bone = TabulatedMaterial::bone();
        for (e, m) in bone.energies().iter().zip(bone.mac_values()) {
            assert_eq!(bone.linear_attenuation(*e), m * 1.92);
        }
    }

    #[test]
    fn test_bone_attenuates_more_than_soft_tissue_at_low_energy() {
        let bone = TabulatedMaterial::bone();
        let tissue = TabulatedMaterial::soft_tissue();
        assert!(bone.linear_attenuation(0.05) > tissue.linear_attenuation(0.05));
    }

    #[test]
    fn test_air_is_nearly_transparent() {
        let air = TabulatedMaterial::air();
        assert!(air.linear_attenuation(0.1) < 1e-3);
    }

    #[test]
    fn test_interpolates_between_knots() {
        let tissue = TabulatedMaterial::soft_tissue();
        let expected = 0.5 * (0.1688 + 0.07003) * 1.03;
        assert_relative_eq!(tissue.linear_attenuation(0.55), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_non_positive_density() {
        let err = TabulatedMaterial::new("x", vec![0.1, 1.0], vec![0.2, 0.1], 0.0).unwrap_err();
        assert!(matches!(err, MaterialError::InvalidInput(_)));
        assert!(TabulatedMaterial::new("x", vec![0.1, 1.0], vec![0.2, 0.1], -1.0).is_err());
        assert!(TabulatedMaterial::new("x", vec![0.1, 1.0], vec![0.2, 0.1], f64::NAN).is_err());
    }

    #[test]
    fn test_rejects_negative_mac_and_energy() {
        assert!(TabulatedMaterial::new("x", vec![0.1, 1.0], vec![-0.2, 0.1], 1.0).is_err());
        assert!(TabulatedMaterial::new("x", vec![0.0, 1.0], vec![0.2, 0.1], 1.0).is_err());
    }

    #[test]
    fn test_error_names_material() {
        let err = TabulatedMaterial::new("lung", vec![0.1], vec![0.2], 0.3).unwrap_err();
        assert!(err.to_string().contains("lung"), "got: {err}");
    }

    #[test]
    fn test_label_defaults_to_title_case() {
        assert_eq!(TabulatedMaterial::soft_tissue().label(), "Soft Tissue");
        assert_eq!(TabulatedMaterial::bone().with_label("Pelvis").label(), "Pelvis");
    }

    #[test]
    fn test_json_carries_table() {
        let json = serde_json::to_value(TabulatedMaterial::bone()).unwrap();
        assert_eq!(json["name"], "bone");
        assert_eq!(json["density"], 1.92);
        assert!(json.get("label").is_none());
        let x = json["mass_attenuation"]["x"].as_array().unwrap();
        let y = json["mass_attenuation"]["y"].as_array().unwrap();
        assert_eq!(x.len(), REFERENCE_ENERGIES_MEV.len());
        assert_eq!(y.len(), x.len());
        assert_eq!(x[0], 0.01);
    }
}
