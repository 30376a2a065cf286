//! # Attenua Materials
//!
//! X-ray attenuation data for the Attenua framework. Materials are
//! tabulated mass attenuation coefficients $\mu/\rho(E)$ plus a density,
//! collected into an immutable [`AttenuationModel`](catalog::AttenuationModel)
//! that resolves linear attenuation coefficients for any
//! `(material, energy)` pair.
//!
//! ## Built-in data
//!
//! | Material | Identifier | Density (g/cm³) |
//! |----------|------------|-----------------|
//! | Cortical bone | `bone` | 1.92 |
//! | Soft tissue | `soft_tissue` | 1.03 |
//! | Air | `air` | 0.001225 |
//!
//! ## Interpolation
//!
//! Tables are interpolated piecewise-linearly
//! ([`interpolate::LinearInterpolator`]). Outside the table the edge
//! segments are extrapolated without clamping, so far out-of-range
//! energies can yield non-physical (negative) coefficients.

pub mod catalog;
pub mod interpolate;
pub mod provider;
pub mod tabulated;

pub use catalog::{AttenuationModel, CatalogBuilder};
pub use provider::{AttenuationSource, MaterialError};
pub use tabulated::TabulatedMaterial;
