//! Densely sampled intensity profile through a layer stack.
//!
//! Within a layer the curve is a single exponential anchored at the
//! layer's entry intensity. Sample `j` of `n` sits at fractional depth
//! `j / (n - 1)`, so the last sample lands exactly on the exit face and the
//! next layer starts from exactly that intensity.

use attenua_materials::AttenuationSource;

use super::TransmissionError;
use crate::beer_lambert::transmitted_intensity;
use crate::types::{ContinuousProfile, LayerStack, ProfilePoint};

pub(super) fn sample(
    source: &dyn AttenuationSource,
    stack: &LayerStack,
    energy_mev: f64,
    i0: f64,
    points_per_layer: usize,
) -> Result<ContinuousProfile, TransmissionError> {
    debug_assert!(points_per_layer >= 2);

    let mut points = Vec::with_capacity(stack.len() * points_per_layer);
    let mut i_current = i0;
    let mut current_pos = 0.0;
    let last = (points_per_layer - 1) as f64;

    for layer in stack {
        let mu = source.linear_attenuation_coefficient(layer.material_id(), energy_mev)?;
        let thickness = layer.thickness_cm();

        for j in 0..points_per_layer {
            let offset = thickness * (j as f64 / last);
            points.push(ProfilePoint {
                position_cm: current_pos + offset,
                intensity: transmitted_intensity(i_current, mu, offset),
            });
        }

        // Exit intensity of this layer; the vector is non-empty here.
        if let Some(exit) = points.last() {
            i_current = exit.intensity;
        }
        current_pos += thickness;
    }

    log::debug!(
        "Continuous profile: {} layers x {} points at {} MeV",
        stack.len(),
        points_per_layer,
        energy_mev
    );

    Ok(ContinuousProfile {
        energy_mev,
        points_per_layer,
        points,
    })
}
