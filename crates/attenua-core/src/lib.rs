//! # Attenua Core
//!
//! Closed-form X-ray transmission through layered biological media. Given
//! a material catalog from `attenua-materials` and an ordered stack of
//! slabs, this crate predicts how beam intensity decays with depth using
//! the Beer-Lambert law at a single effective photon energy.
//!
//! ## Modules
//!
//! - [`types`] — Layer stacks and result containers.
//! - [`beer_lambert`] — The transmission law, scalar and vectorised.
//! - [`engine`] — Boundary and continuous profiles through a stack.
//! - [`sweep`] — Parallel evaluation over many energies.
//!
//! ```
//! use attenua_core::engine::LayeredTransmissionEngine;
//! use attenua_core::types::LayerStack;
//! use attenua_materials::AttenuationModel;
//!
//! let engine = LayeredTransmissionEngine::from(AttenuationModel::biological());
//! let stack = LayerStack::from_pairs([("bone", 2.0), ("soft_tissue", 3.0)]).unwrap();
//! let profile = engine.compute_layer_boundaries(&stack, 0.1, 1000.0).unwrap();
//! assert_eq!(profile.len(), 3);
//! ```

pub mod beer_lambert;
pub mod engine;
pub mod sweep;
pub mod types;

pub use engine::{LayeredTransmissionEngine, TransmissionError};
