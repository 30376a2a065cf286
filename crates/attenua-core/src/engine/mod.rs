//! Layered transmission engine.
//!
//! [`LayeredTransmissionEngine`] folds the Beer-Lambert law over a
//! [`LayerStack`], carrying the exit intensity of each layer forward as the
//! entry intensity of the next. It resolves attenuation coefficients
//! through any [`AttenuationSource`], usually an
//! [`AttenuationModel`](attenua_materials::AttenuationModel).
//!
//! The fold over one stack is sequential. Independent stacks or energies
//! can be evaluated concurrently; see [`crate::sweep`].

mod boundaries;
mod continuous;

use std::sync::Arc;

use attenua_materials::{AttenuationModel, AttenuationSource, MaterialError};
use ndarray::ArrayView1;
use thiserror::Error;

use crate::beer_lambert::{
    transmitted_intensity_array, validate_energy, validate_intensity, validate_thicknesses,
};
use crate::types::{AttenuationCurve, BoundaryProfile, ContinuousProfile, LayerBand, LayerStack};

/// Errors that can occur while evaluating a stack or curve.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransmissionError {
    #[error(transparent)]
    Material(#[from] MaterialError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Default number of samples per layer for continuous profiles.
pub const DEFAULT_POINTS_PER_LAYER: usize = 50;

/// Computes boundary and continuous intensity profiles through layer stacks.
#[derive(Clone)]
pub struct LayeredTransmissionEngine {
    source: Arc<dyn AttenuationSource>,
}

impl std::fmt::Debug for LayeredTransmissionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayeredTransmissionEngine").finish_non_exhaustive()
    }
}

impl From<AttenuationModel> for LayeredTransmissionEngine {
    fn from(model: AttenuationModel) -> Self {
        Self::new(Arc::new(model))
    }
}

impl LayeredTransmissionEngine {
    pub fn new(source: Arc<dyn AttenuationSource>) -> Self {
        Self { source }
    }

    /// The attenuation source backing this engine.
    pub fn source(&self) -> &dyn AttenuationSource {
        self.source.as_ref()
    }

    /// Intensity at every layer boundary.
    ///
    /// Returns `len(stack) + 1` points, starting with `(0, I0)`. The whole
    /// stack is evaluated at the single photon energy `energy_mev`.
    ///
    /// # Errors
    /// * [`TransmissionError::Material`] with
    ///   [`MaterialError::UnknownMaterial`] for the first layer whose
    ///   material is not in the catalog. No partial profile is returned.
    /// * [`TransmissionError::InvalidInput`] for a negative or non-finite
    ///   `energy_mev` or `i0`, checked before any layer is resolved.
    pub fn compute_layer_boundaries(
        &self,
        stack: &LayerStack,
        energy_mev: f64,
        i0: f64,
    ) -> Result<BoundaryProfile, TransmissionError> {
        validate_energy(energy_mev)?;
        validate_intensity(i0)?;
        boundaries::walk(self.source(), stack, energy_mev, i0)
    }

    /// Densely sampled intensity curve through the stack.
    ///
    /// Each layer is sampled at `points_per_layer` evenly spaced depths,
    /// both faces included, starting from that layer's entry intensity.
    ///
    /// # Errors
    /// As [`compute_layer_boundaries`](Self::compute_layer_boundaries), and
    /// [`TransmissionError::InvalidInput`] when `points_per_layer < 2`.
    pub fn compute_continuous_attenuation(
        &self,
        stack: &LayerStack,
        energy_mev: f64,
        i0: f64,
        points_per_layer: usize,
    ) -> Result<ContinuousProfile, TransmissionError> {
        validate_energy(energy_mev)?;
        validate_intensity(i0)?;
        if points_per_layer < 2 {
            return Err(TransmissionError::InvalidInput(format!(
                "points_per_layer must be at least 2 to sample both layer faces, got {points_per_layer}"
            )));
        }
        continuous::sample(self.source(), stack, energy_mev, i0, points_per_layer)
    }

    /// Transmitted intensity through a single material versus thickness.
    pub fn attenuation_curve(
        &self,
        material_id: &str,
        energy_mev: f64,
        i0: f64,
        thickness_cm: ArrayView1<'_, f64>,
    ) -> Result<AttenuationCurve, TransmissionError> {
        validate_energy(energy_mev)?;
        validate_intensity(i0)?;
        validate_thicknesses(thickness_cm.iter())?;

        let mu = self.source.linear_attenuation_coefficient(material_id, energy_mev)?;
        let intensity = transmitted_intensity_array(i0, mu, thickness_cm);

        Ok(AttenuationCurve {
            material_id: material_id.to_owned(),
            energy_mev,
            mu,
            thickness_cm: thickness_cm.to_vec(),
            intensity: intensity.to_vec(),
        })
    }

    /// Depth span and display label of every layer, for shaded plot bands.
    ///
    /// Purely geometric: materials are not resolved, so unknown identifiers
    /// get a title-cased label instead of an error.
    pub fn layer_bands(&self, stack: &LayerStack) -> Vec<LayerBand> {
        let mut start_cm = 0.0;
        stack
            .iter()
            .map(|layer| {
                let end_cm = start_cm + layer.thickness_cm();
                let band = LayerBand {
                    material_id: layer.material_id().to_owned(),
                    label: self.source.display_label(layer.material_id()),
                    start_cm,
                    end_cm,
                };
                start_cm = end_cm;
                band
            })
            .collect()
    }
}
