//! Boundary-only walk over a layer stack.

use attenua_materials::AttenuationSource;

use super::TransmissionError;
use crate::beer_lambert::transmitted_intensity;
use crate::types::{BoundaryProfile, LayerStack, ProfilePoint};

/// Fold Beer-Lambert decay over `stack`, recording the intensity at the
/// exit face of each layer.
pub(super) fn walk(
    source: &dyn AttenuationSource,
    stack: &LayerStack,
    energy_mev: f64,
    i0: f64,
) -> Result<BoundaryProfile, TransmissionError> {
    let mut points = Vec::with_capacity(stack.len() + 1);
    let mut i_current = i0;
    let mut position_cm = 0.0;
    points.push(ProfilePoint {
        position_cm,
        intensity: i_current,
    });

    for layer in stack {
        let mu = source.linear_attenuation_coefficient(layer.material_id(), energy_mev)?;
        i_current = transmitted_intensity(i_current, mu, layer.thickness_cm());
        position_cm += layer.thickness_cm();

        log::debug!(
            "{}: mu={:.4e} cm⁻¹, exit at {:.3} cm with I={:.4e}",
            layer.material_id(),
            mu,
            position_cm,
            i_current
        );

        points.push(ProfilePoint {
            position_cm,
            intensity: i_current,
        });
    }

    Ok(BoundaryProfile { energy_mev, points })
}
