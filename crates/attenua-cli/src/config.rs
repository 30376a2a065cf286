//! TOML configuration deserialisation for attenuation jobs.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Deserialize;

use attenua_core::types::{LayerSpec, LayerStack};
use attenua_materials::{AttenuationModel, AttenuationSource, TabulatedMaterial};

/// Top-level job configuration.
#[derive(Debug, Deserialize)]
pub struct JobConfig {
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Custom materials, as `[[material]]` tables.
    #[serde(default, rename = "material")]
    pub materials: Vec<MaterialConfig>,
    /// Layer stack in beam order, as `[[layer]]` tables.
    #[serde(rename = "layer")]
    pub layers: Vec<LayerConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Simulation parameters from TOML.
#[derive(Debug, Deserialize)]
pub struct SimulationConfig {
    /// Effective photon energy for the layer profiles (MeV).
    pub energy: f64,
    #[serde(default = "default_initial_intensity")]
    pub initial_intensity: f64,
    #[serde(default = "default_points_per_layer")]
    pub points_per_layer: usize,
    /// Extra energies at which to evaluate boundary profiles (MeV).
    #[serde(default)]
    pub sweep_energies: Vec<f64>,
    /// Energies for single-material attenuation curves (MeV). Empty disables curves.
    #[serde(default)]
    pub curve_energies: Vec<f64>,
    /// Largest thickness on the curve grid (cm).
    #[serde(default = "default_curve_max_thickness")]
    pub curve_max_thickness: f64,
    #[serde(default = "default_curve_points")]
    pub curve_points: usize,
}

fn default_initial_intensity() -> f64 {
    1000.0
}
fn default_points_per_layer() -> usize {
    attenua_core::engine::DEFAULT_POINTS_PER_LAYER
}
fn default_curve_max_thickness() -> f64 {
    10.0
}
fn default_curve_points() -> usize {
    100
}

/// Which materials make up the catalog.
#[derive(Debug, Deserialize)]
pub struct CatalogConfig {
    /// Include the built-in `bone`, `soft_tissue` and `air` entries (default: true).
    #[serde(default = "default_true")]
    pub builtin: bool,
    /// Plot colours by material identifier. Presentation only.
    #[serde(default)]
    pub colors: BTreeMap<String, String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            builtin: true,
            colors: BTreeMap::new(),
        }
    }
}

/// A custom tabulated material.
#[derive(Debug, Deserialize)]
pub struct MaterialConfig {
    pub name: String,
    /// Density in g/cm³.
    pub density: f64,
    /// Photon energies in MeV, strictly increasing.
    pub energies: Vec<f64>,
    /// Mass attenuation coefficients in cm²/g.
    pub mac: Vec<f64>,
    pub label: Option<String>,
    pub color: Option<String>,
}

/// One slab of the layer stack.
#[derive(Debug, Deserialize)]
pub struct LayerConfig {
    pub material: String,
    /// Thickness in cm.
    pub thickness: f64,
}

/// Output configuration.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Output directory (default: "./output").
    #[serde(default = "default_output_dir")]
    pub directory: String,
    /// Whether to save profiles as CSV (default: true).
    #[serde(default = "default_true")]
    pub save_csv: bool,
    /// Whether to also save everything as one JSON document (default: false).
    #[serde(default)]
    pub save_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            save_csv: true,
            save_json: false,
        }
    }
}

fn default_output_dir() -> String {
    "./output".into()
}
fn default_true() -> bool {
    true
}

impl JobConfig {
    /// Build the immutable material catalog described by this job.
    pub fn build_model(&self) -> Result<AttenuationModel> {
        let mut builder = AttenuationModel::builder();
        if self.catalog.builtin {
            builder = builder.with_biological();
        }
        for m in &self.materials {
            let mut material =
                TabulatedMaterial::new(&m.name, m.energies.clone(), m.mac.clone(), m.density)?;
            if let Some(label) = &m.label {
                material = material.with_label(label);
            }
            builder = builder.material(material);
        }
        let model = builder.build().context("Invalid material catalog")?;
        if model.is_empty() {
            anyhow::bail!("Material catalog is empty: enable [catalog] builtin or add [[material]] tables");
        }
        Ok(model)
    }

    /// Build the layer stack in beam order.
    pub fn build_stack(&self) -> Result<LayerStack> {
        let mut stack = LayerStack::new();
        for (i, layer) in self.layers.iter().enumerate() {
            let spec = LayerSpec::new(&layer.material, layer.thickness)
                .with_context(|| format!("Layer {} ({})", i + 1, layer.material))?;
            stack.push(spec);
        }
        Ok(stack)
    }

    /// Plot colours by material, from `[catalog.colors]` and per-material `color` keys.
    pub fn colors(&self) -> BTreeMap<String, String> {
        let mut colors = self.catalog.colors.clone();
        for m in &self.materials {
            if let Some(color) = &m.color {
                colors.insert(m.name.clone(), color.clone());
            }
        }
        colors
    }

    /// Check everything that can be checked without running the job.
    pub fn validate(&self) -> Result<(AttenuationModel, LayerStack)> {
        let model = self.build_model()?;
        let stack = self.build_stack()?;

        if stack.is_empty() {
            anyhow::bail!("Job has no [[layer]] tables");
        }
        if let Some(layer) = stack.iter().find(|l| !model.contains(l.material_id())) {
            anyhow::bail!(
                "Unknown material '{}'. Available: {}",
                layer.material_id(),
                model.material_ids().collect::<Vec<_>>().join(", ")
            );
        }

        let sim = &self.simulation;
        check_energy("simulation.energy", sim.energy)?;
        for &e in &sim.sweep_energies {
            check_energy("simulation.sweep_energies", e)?;
        }
        for &e in &sim.curve_energies {
            check_energy("simulation.curve_energies", e)?;
        }
        if sim.points_per_layer < 2 {
            anyhow::bail!(
                "simulation.points_per_layer must be at least 2, got {}",
                sim.points_per_layer
            );
        }
        if !sim.curve_energies.is_empty() && sim.curve_points < 2 {
            anyhow::bail!("simulation.curve_points must be at least 2, got {}", sim.curve_points);
        }
        if !(sim.curve_max_thickness.is_finite() && sim.curve_max_thickness > 0.0) {
            anyhow::bail!(
                "simulation.curve_max_thickness must be positive, got {}",
                sim.curve_max_thickness
            );
        }

        Ok((model, stack))
    }
}

fn check_energy(key: &str, energy: f64) -> Result<()> {
    if !(energy.is_finite() && energy >= 0.0) {
        anyhow::bail!("{key} must be non-negative, got {energy}");
    }
    Ok(())
}

/// Load and parse a TOML job configuration file.
pub fn load_config(path: &std::path::Path) -> Result<JobConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Parse a TOML job configuration from a string.
pub fn parse_config(content: &str) -> Result<JobConfig> {
    let config: JobConfig = toml::from_str(content)?;
    Ok(config)
}
