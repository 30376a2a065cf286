//! Immutable material catalog.
//!
//! [`AttenuationModel`] owns every [`TabulatedMaterial`] for its lifetime.
//! It is assembled once through [`CatalogBuilder`], which validates the
//! whole catalog up front. After that it is read-only and can be shared
//! across threads behind an `Arc`.

use std::collections::BTreeMap;

use crate::provider::{AttenuationSource, MaterialError};
use crate::tabulated::TabulatedMaterial;

/// Catalog of materials keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct AttenuationModel {
    materials: BTreeMap<String, TabulatedMaterial>,
}

impl AttenuationModel {
    /// Start building a custom catalog.
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// Catalog of the built-in biological materials: `bone`, `soft_tissue`
    /// and `air`.
    pub fn biological() -> Self {
        let materials = [
            TabulatedMaterial::bone(),
            TabulatedMaterial::soft_tissue(),
            TabulatedMaterial::air(),
        ]
        .into_iter()
        .map(|m| (m.name().to_owned(), m))
        .collect();

        Self { materials }
    }

    /// Look up a material entry.
    pub fn material(&self, material_id: &str) -> Result<&TabulatedMaterial, MaterialError> {
        self.materials
            .get(material_id)
            .ok_or_else(|| MaterialError::UnknownMaterial(material_id.to_owned()))
    }

    /// Material identifiers in sorted order.
    pub fn material_ids(&self) -> impl Iterator<Item = &str> {
        self.materials.keys().map(String::as_str)
    }

    /// All entries in identifier order.
    pub fn materials(&self) -> impl Iterator<Item = &TabulatedMaterial> {
        self.materials.values()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Interpolated mass attenuation coefficient $\mu/\rho$ (cm²/g).
    pub fn mass_attenuation_coefficient(
        &self,
        material_id: &str,
        energy_mev: f64,
    ) -> Result<f64, MaterialError> {
        check_energy(energy_mev)?;
        let material = self.material(material_id)?;
        let mac = material.mass_attenuation(energy_mev);

        if !material.contains_energy(energy_mev) {
            let (lo, hi) = material.energy_range();
            log::debug!(
                "'{}' queried at {} MeV, outside table [{}, {}] MeV; extrapolating",
                material_id,
                energy_mev,
                lo,
                hi
            );
            if mac < 0.0 {
                log::warn!(
                    "Extrapolated mass attenuation for '{}' at {} MeV is negative ({:.4e} cm²/g)",
                    material_id,
                    energy_mev,
                    mac
                );
            }
        }

        Ok(mac)
    }

    /// Linear attenuation coefficient $\mu = (\mu/\rho) \cdot \rho$ (cm⁻¹).
    ///
    /// Energies outside the tabulated range are linearly extrapolated from
    /// the nearest edge segment and may produce non-physical values.
    ///
    /// # Errors
    /// * [`MaterialError::UnknownMaterial`] if `material_id` is not in the catalog.
    /// * [`MaterialError::InvalidInput`] if `energy_mev` is negative or not finite.
    pub fn linear_attenuation_coefficient(
        &self,
        material_id: &str,
        energy_mev: f64,
    ) -> Result<f64, MaterialError> {
        let mac = self.mass_attenuation_coefficient(material_id, energy_mev)?;
        let density = self.material(material_id)?.density();
        Ok(mac * density)
    }
}

fn check_energy(energy_mev: f64) -> Result<(), MaterialError> {
    if energy_mev.is_finite() && energy_mev >= 0.0 {
        Ok(())
    } else {
        Err(MaterialError::InvalidInput(format!(
            "photon energy must be finite and non-negative, got {energy_mev}"
        )))
    }
}

impl AttenuationSource for AttenuationModel {
    fn linear_attenuation_coefficient(
        &self,
        material_id: &str,
        energy_mev: f64,
    ) -> Result<f64, MaterialError> {
        AttenuationModel::linear_attenuation_coefficient(self, material_id, energy_mev)
    }

    fn contains(&self, material_id: &str) -> bool {
        self.materials.contains_key(material_id)
    }

    fn display_label(&self, material_id: &str) -> String {
        match self.materials.get(material_id) {
            Some(material) => material.label(),
            None => crate::provider::title_case(material_id),
        }
    }
}

/// Collects materials and produces a validated [`AttenuationModel`].
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    materials: Vec<TabulatedMaterial>,
    pending_error: Option<MaterialError>,
}

impl CatalogBuilder {
    /// Add the built-in `bone`, `soft_tissue` and `air` entries.
    pub fn with_biological(mut self) -> Self {
        self.materials.extend(AttenuationModel::biological().materials.into_values());
        self
    }

    /// Add an already-validated material.
    pub fn material(mut self, material: TabulatedMaterial) -> Self {
        self.materials.push(material);
        self
    }

    /// Add a material from raw table data. Validation errors surface from
    /// [`CatalogBuilder::build`].
    pub fn tabulated(
        mut self,
        name: impl Into<String>,
        energies_mev: Vec<f64>,
        mac: Vec<f64>,
        density: f64,
    ) -> Self {
        match TabulatedMaterial::new(name, energies_mev, mac, density) {
            Ok(material) => self.materials.push(material),
            Err(e) => {
                self.pending_error.get_or_insert(e);
            }
        }
        self
    }

    /// Validate and freeze the catalog.
    ///
    /// # Errors
    /// [`MaterialError::InvalidInput`] for the first malformed table or a
    /// duplicate identifier.
    pub fn build(self) -> Result<AttenuationModel, MaterialError> {
        if let Some(e) = self.pending_error {
            return Err(e);
        }

        let mut materials = BTreeMap::new();
        for material in self.materials {
            let name = material.name().to_owned();
            if materials.insert(name.clone(), material).is_some() {
                return Err(MaterialError::InvalidInput(format!(
                    "duplicate material identifier '{name}'"
                )));
            }
        }

        log::debug!("Material catalog built with {} entries", materials.len());
        Ok(AttenuationModel { materials })
    }
}
