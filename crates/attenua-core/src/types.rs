//! Core types shared across the Attenua framework.
//!
//! Layer stacks describe what the beam passes through; profiles and curves
//! hold what comes out. Positions and thicknesses are in centimetres,
//! energies in MeV, intensities in the caller's units (typically counts or
//! percent of the incident beam).

use serde::{Deserialize, Serialize};

use crate::engine::TransmissionError;

/// One homogeneous slab in a layer stack.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSpec {
    material_id: String,
    /// Slab thickness (cm), always finite and positive.
    thickness_cm: f64,
}

impl LayerSpec {
    /// Create a layer, rejecting non-positive or non-finite thickness.
    pub fn new(material_id: impl Into<String>, thickness_cm: f64) -> Result<Self, TransmissionError> {
        let material_id = material_id.into();
        if !(thickness_cm.is_finite() && thickness_cm > 0.0) {
            return Err(TransmissionError::InvalidInput(format!(
                "layer '{material_id}' must have a positive thickness, got {thickness_cm}"
            )));
        }
        Ok(Self {
            material_id,
            thickness_cm,
        })
    }

    pub fn material_id(&self) -> &str {
        &self.material_id
    }

    pub fn thickness_cm(&self) -> f64 {
        self.thickness_cm
    }
}

/// Ordered sequence of layers in traversal order. The first layer is where
/// the beam enters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayerStack {
    layers: Vec<LayerSpec>,
}

impl LayerStack {
    /// An empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a stack from `(material, thickness)` pairs.
    ///
    /// ```
    /// use attenua_core::types::LayerStack;
    ///
    /// let stack = LayerStack::from_pairs([("bone", 2.0), ("soft_tissue", 3.0)]).unwrap();
    /// assert_eq!(stack.len(), 2);
    /// assert_eq!(stack.total_thickness_cm(), 5.0);
    /// ```
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, TransmissionError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let layers = pairs
            .into_iter()
            .map(|(material, thickness)| LayerSpec::new(material, thickness))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { layers })
    }

    /// Append a layer at the exit side of the stack.
    pub fn push(&mut self, layer: LayerSpec) {
        self.layers.push(layer);
    }

    /// Builder-style append.
    pub fn with_layer(
        mut self,
        material_id: impl Into<String>,
        thickness_cm: f64,
    ) -> Result<Self, TransmissionError> {
        self.layers.push(LayerSpec::new(material_id, thickness_cm)?);
        Ok(self)
    }

    pub fn layers(&self) -> &[LayerSpec] {
        &self.layers
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LayerSpec> {
        self.layers.iter()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Sum of all layer thicknesses (cm).
    pub fn total_thickness_cm(&self) -> f64 {
        self.layers.iter().map(LayerSpec::thickness_cm).sum()
    }
}

impl<'a> IntoIterator for &'a LayerStack {
    type Item = &'a LayerSpec;
    type IntoIter = std::slice::Iter<'a, LayerSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.layers.iter()
    }
}

/// A single `(position, intensity)` sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfilePoint {
    /// Depth along the beam (cm), measured from the entry face.
    pub position_cm: f64,
    /// Beam intensity at this depth.
    pub intensity: f64,
}

/// Intensity at every layer interface, including the entry face.
///
/// Always holds `len(stack) + 1` points, the first being `(0, I0)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryProfile {
    /// Photon energy the whole stack was evaluated at (MeV).
    pub energy_mev: f64,
    pub points: Vec<ProfilePoint>,
}

/// Densely sampled intensity curve through a stack.
///
/// Each layer contributes `points_per_layer` samples spanning its full
/// thickness. Interface positions therefore appear twice, once as the last
/// sample of one layer and once as the first sample of the next, with
/// identical intensities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinuousProfile {
    /// Photon energy the whole curve was evaluated at (MeV).
    pub energy_mev: f64,
    pub points_per_layer: usize,
    pub points: Vec<ProfilePoint>,
}

macro_rules! profile_accessors {
    ($ty:ty) => {
        impl $ty {
            /// Sample positions (cm).
            pub fn positions(&self) -> Vec<f64> {
                self.points.iter().map(|p| p.position_cm).collect()
            }

            /// Sample intensities.
            pub fn intensities(&self) -> Vec<f64> {
                self.points.iter().map(|p| p.intensity).collect()
            }

            /// Intensity at the exit face of the stack.
            pub fn exit_intensity(&self) -> Option<f64> {
                self.points.last().map(|p| p.intensity)
            }

            pub fn len(&self) -> usize {
                self.points.len()
            }

            pub fn is_empty(&self) -> bool {
                self.points.is_empty()
            }
        }
    };
}

profile_accessors!(BoundaryProfile);
profile_accessors!(ContinuousProfile);

/// Transmitted intensity through one material as a function of thickness
/// at a single energy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttenuationCurve {
    pub material_id: String,
    pub energy_mev: f64,
    /// Linear attenuation coefficient used for the curve (cm⁻¹).
    pub mu: f64,
    pub thickness_cm: Vec<f64>,
    pub intensity: Vec<f64>,
}

/// Extent and label of one layer, for drawing shaded bands behind a
/// profile plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerBand {
    pub material_id: String,
    pub label: String,
    pub start_cm: f64,
    pub end_cm: f64,
}

impl LayerBand {
    /// Centre of the band, where a label annotation sits.
    pub fn midpoint_cm(&self) -> f64 {
        0.5 * (self.start_cm + self.end_cm)
    }
}
