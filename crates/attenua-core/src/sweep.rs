//! Parallel evaluation over many photon energies.
//!
//! Every energy is an independent computation against the same immutable
//! catalog, so energies are spread across the Rayon thread pool. Layers of
//! a single stack are still folded sequentially inside each task. Results
//! are returned in the order of the input energies.

use ndarray::ArrayView1;
use rayon::prelude::*;

use crate::engine::{LayeredTransmissionEngine, TransmissionError};
use crate::types::{AttenuationCurve, BoundaryProfile, ContinuousProfile, LayerStack};

impl LayeredTransmissionEngine {
    /// Boundary profiles of one stack at each of `energies_mev`.
    ///
    /// Fails with the first error in energy order; no profiles are returned
    /// in that case.
    pub fn compute_boundaries_sweep(
        &self,
        stack: &LayerStack,
        energies_mev: &[f64],
        i0: f64,
    ) -> Result<Vec<BoundaryProfile>, TransmissionError> {
        log::debug!(
            "Boundary sweep: {} energies over {} threads",
            energies_mev.len(),
            rayon::current_num_threads()
        );
        energies_mev
            .par_iter()
            .map(|&energy| self.compute_layer_boundaries(stack, energy, i0))
            .collect()
    }

    /// Continuous profiles of one stack at each of `energies_mev`.
    pub fn compute_continuous_sweep(
        &self,
        stack: &LayerStack,
        energies_mev: &[f64],
        i0: f64,
        points_per_layer: usize,
    ) -> Result<Vec<ContinuousProfile>, TransmissionError> {
        energies_mev
            .par_iter()
            .map(|&energy| self.compute_continuous_attenuation(stack, energy, i0, points_per_layer))
            .collect()
    }

    /// Single-material attenuation curves, one per energy.
    ///
    /// This is the data behind a "transmitted intensity versus thickness"
    /// chart with one line per energy.
    pub fn attenuation_curves(
        &self,
        material_id: &str,
        energies_mev: &[f64],
        i0: f64,
        thickness_cm: ArrayView1<'_, f64>,
    ) -> Result<Vec<AttenuationCurve>, TransmissionError> {
        energies_mev
            .par_iter()
            .map(|&energy| self.attenuation_curve(material_id, energy, i0, thickness_cm))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attenua_materials::AttenuationModel;
    use ndarray::Array1;

    fn engine() -> LayeredTransmissionEngine {
        LayeredTransmissionEngine::from(AttenuationModel::biological())
    }

    #[test]
    fn test_sweep_matches_sequential_and_keeps_order() {
        let e = engine();
        let stack = LayerStack::from_pairs([("bone", 2.0), ("soft_tissue", 3.0)]).unwrap();
        let energies = [0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0, 20.0];

        let swept = e.compute_boundaries_sweep(&stack, &energies, 1000.0).unwrap();
        assert_eq!(swept.len(), energies.len());
        for (profile, &energy) in swept.iter().zip(energies.iter()) {
            assert_eq!(profile.energy_mev, energy);
            let sequential = e.compute_layer_boundaries(&stack, energy, 1000.0).unwrap();
            assert_eq!(*profile, sequential);
        }
    }

    #[test]
    fn test_sweep_fails_as_a_whole() {
        let stack = LayerStack::from_pairs([("bone", 2.0), ("marrow", 1.0)]).unwrap();
        assert!(engine()
            .compute_boundaries_sweep(&stack, &[0.1, 1.0], 1000.0)
            .is_err());
    }

    #[test]
    fn test_higher_energy_penetrates_further() {
        let t = Array1::linspace(0.0, 10.0, 51);
        let curves = engine()
            .attenuation_curves("bone", &[0.1, 1.0, 10.0], 1.0, t.view())
            .unwrap();
        assert_eq!(curves.len(), 3);
        let exits: Vec<f64> = curves.iter().map(|c| c.intensity[50]).collect();
        assert!(exits[0] < exits[1] && exits[1] < exits[2], "exits: {exits:?}");
    }

    #[test]
    fn test_continuous_sweep() {
        let stack = LayerStack::from_pairs([("soft_tissue", 1.0)]).unwrap();
        let profiles = engine()
            .compute_continuous_sweep(&stack, &[0.1, 1.0], 100.0, 10)
            .unwrap();
        assert!(profiles.iter().all(|p| p.len() == 10));
    }
}
