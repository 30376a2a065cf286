//! Job runner: ties together the material catalog, layer stack and engine.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use ndarray::Array1;
use serde::Serialize;

use attenua_core::engine::LayeredTransmissionEngine;
use attenua_core::types::{
    AttenuationCurve, BoundaryProfile, ContinuousProfile, LayerBand, LayerStack,
};
use attenua_materials::{AttenuationModel, TabulatedMaterial};

use crate::config::JobConfig;

/// Results from a job run.
#[derive(Debug, Serialize)]
pub struct JobOutput {
    pub boundaries: BoundaryProfile,
    pub continuous: ContinuousProfile,
    pub bands: Vec<LayerBand>,
    /// Boundary profiles at `simulation.sweep_energies`.
    pub sweep: Vec<BoundaryProfile>,
    /// Single-material curves at `simulation.curve_energies`.
    pub curves: Vec<AttenuationCurve>,
    /// Label and colour per material in the stack, for the plotting side.
    pub presentation: BTreeMap<String, MaterialStyle>,
    /// Attenuation tables of the materials in the stack, in order of first appearance.
    pub materials: Vec<TabulatedMaterial>,
}

/// How one material should be drawn.
#[derive(Debug, Clone, Serialize)]
pub struct MaterialStyle {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Run a full job from a parsed configuration.
pub fn run_job(job: &JobConfig) -> Result<JobOutput> {
    let (model, stack) = job.validate()?;
    let sim = &job.simulation;
    let materials = stack_materials(&model, &stack)?;
    let engine = LayeredTransmissionEngine::from(model);

    println!(
        "  Stack: {} layers, {:.3} cm total",
        stack.len(),
        stack.total_thickness_cm()
    );
    for (i, layer) in stack.iter().enumerate() {
        println!(
            "    [{}] {:<14} {:>8.3} cm",
            i + 1,
            layer.material_id(),
            layer.thickness_cm()
        );
    }

    let boundaries = engine
        .compute_layer_boundaries(&stack, sim.energy, sim.initial_intensity)
        .context("Boundary computation failed")?;
    let continuous = engine
        .compute_continuous_attenuation(&stack, sim.energy, sim.initial_intensity, sim.points_per_layer)
        .context("Continuous profile computation failed")?;

    if let Some(exit) = boundaries.exit_intensity() {
        println!(
            "  E={} MeV: I0={:.4e} -> I={:.4e} ({:.3}% transmitted)",
            sim.energy,
            sim.initial_intensity,
            exit,
            percent(exit, sim.initial_intensity)
        );
    }

    let sweep = engine
        .compute_boundaries_sweep(&stack, &sim.sweep_energies, sim.initial_intensity)
        .context("Energy sweep failed")?;
    for profile in &sweep {
        if let Some(exit) = profile.exit_intensity() {
            println!(
                "  sweep E={:>8.4} MeV: {:.3}% transmitted",
                profile.energy_mev,
                percent(exit, sim.initial_intensity)
            );
        }
    }

    let curves = compute_curves(&engine, &stack, job)?;
    let bands = engine.layer_bands(&stack);
    let presentation = material_styles(&engine, &stack, job);

    Ok(JobOutput {
        boundaries,
        continuous,
        bands,
        sweep,
        curves,
        presentation,
        materials,
    })
}

fn percent(exit: f64, i0: f64) -> f64 {
    if i0 > 0.0 {
        100.0 * exit / i0
    } else {
        0.0
    }
}

/// Attenuation curves for every distinct material in the stack, in order of
/// first appearance.
fn compute_curves(
    engine: &LayeredTransmissionEngine,
    stack: &LayerStack,
    job: &JobConfig,
) -> Result<Vec<AttenuationCurve>> {
    let sim = &job.simulation;
    if sim.curve_energies.is_empty() {
        return Ok(Vec::new());
    }

    let thickness = Array1::linspace(0.0, sim.curve_max_thickness, sim.curve_points);
    let mut curves = Vec::new();
    for material_id in distinct_materials(stack) {
        let per_energy = engine
            .attenuation_curves(material_id, &sim.curve_energies, sim.initial_intensity, thickness.view())
            .with_context(|| format!("Attenuation curves for '{material_id}'"))?;
        curves.extend(per_energy);
    }
    log::info!("Computed {} attenuation curves", curves.len());
    Ok(curves)
}

fn distinct_materials(stack: &LayerStack) -> Vec<&str> {
    let mut seen = Vec::new();
    for layer in stack {
        if !seen.contains(&layer.material_id()) {
            seen.push(layer.material_id());
        }
    }
    seen
}

fn stack_materials(
    model: &AttenuationModel,
    stack: &LayerStack,
) -> Result<Vec<TabulatedMaterial>> {
    distinct_materials(stack)
        .into_iter()
        .map(|id| Ok(model.material(id)?.clone()))
        .collect()
}

fn material_styles(
    engine: &LayeredTransmissionEngine,
    stack: &LayerStack,
    job: &JobConfig,
) -> BTreeMap<String, MaterialStyle> {
    let colors = job.colors();
    distinct_materials(stack)
        .into_iter()
        .map(|id| {
            let style = MaterialStyle {
                label: engine.source().display_label(id),
                color: colors.get(id).cloned(),
            };
            (id.to_owned(), style)
        })
        .collect()
}

fn create_file(path: &Path) -> Result<std::fs::File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::File::create(path).with_context(|| format!("Failed to create {}", path.display()))
}

fn write_header(file: &mut std::fs::File, title: &str, job: &JobConfig) -> Result<()> {
    writeln!(file, "# Attenua — {title}")?;
    writeln!(file, "# Version: {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(file, "# initial_intensity: {}", job.simulation.initial_intensity)?;
    for (i, layer) in job.layers.iter().enumerate() {
        writeln!(
            file,
            "# layer {}: material={}, thickness={} cm",
            i + 1,
            layer.material,
            layer.thickness
        )?;
    }
    writeln!(file, "#")?;
    Ok(())
}

/// Write boundary intensities (main energy plus any sweep energies) to CSV.
pub fn write_boundaries_csv(output: &JobOutput, path: &Path, job: &JobConfig) -> Result<()> {
    let mut file = create_file(path)?;
    write_header(&mut file, "Layer Boundary Intensities", job)?;
    writeln!(file, "energy_mev,position_cm,intensity")?;

    for profile in std::iter::once(&output.boundaries).chain(output.sweep.iter()) {
        for p in &profile.points {
            writeln!(
                file,
                "{},{:.6},{:.6e}",
                profile.energy_mev, p.position_cm, p.intensity
            )?;
        }
    }

    println!("Boundaries written to: {}", path.display());
    Ok(())
}

/// Write the continuous profile to CSV, tagging each sample with its layer.
pub fn write_profile_csv(output: &JobOutput, path: &Path, job: &JobConfig) -> Result<()> {
    let mut file = create_file(path)?;
    write_header(&mut file, "Continuous Intensity Profile", job)?;
    writeln!(file, "# energy_mev: {}", output.continuous.energy_mev)?;
    writeln!(file, "layer,material,position_cm,intensity")?;

    let n = output.continuous.points_per_layer;
    for (i, p) in output.continuous.points.iter().enumerate() {
        let layer = i / n;
        let material = output
            .bands
            .get(layer)
            .map(|b| b.material_id.as_str())
            .unwrap_or("");
        writeln!(
            file,
            "{},{},{:.6},{:.6e}",
            layer + 1,
            material,
            p.position_cm,
            p.intensity
        )?;
    }

    println!("Profile written to: {}", path.display());
    Ok(())
}

/// Write the depth span of every layer to CSV, with the centre for labels.
pub fn write_bands_csv(output: &JobOutput, path: &Path, job: &JobConfig) -> Result<()> {
    let mut file = create_file(path)?;
    write_header(&mut file, "Layer Bands", job)?;
    writeln!(file, "layer,material,label,start_cm,end_cm,label_position_cm")?;

    for (i, band) in output.bands.iter().enumerate() {
        writeln!(
            file,
            "{},{},{},{:.6},{:.6},{:.6}",
            i + 1,
            band.material_id,
            band.label,
            band.start_cm,
            band.end_cm,
            band.midpoint_cm()
        )?;
    }

    println!("Bands written to: {}", path.display());
    Ok(())
}

/// Write single-material attenuation curves to CSV in long format.
pub fn write_curves_csv(output: &JobOutput, path: &Path, job: &JobConfig) -> Result<()> {
    let mut file = create_file(path)?;
    write_header(&mut file, "Single-Material Attenuation Curves", job)?;
    writeln!(file, "material,energy_mev,mu_per_cm,thickness_cm,intensity")?;

    for curve in &output.curves {
        for (t, i) in curve.thickness_cm.iter().zip(curve.intensity.iter()) {
            writeln!(
                file,
                "{},{},{:.6e},{:.6},{:.6e}",
                curve.material_id, curve.energy_mev, curve.mu, t, i
            )?;
        }
    }

    println!("Curves written to: {}", path.display());
    Ok(())
}

/// Write the whole job output as one JSON document.
pub fn write_json(output: &JobOutput, path: &Path) -> Result<()> {
    let file = create_file(path)?;
    serde_json::to_writer_pretty(file, output).context("JSON serialisation error")?;
    println!("JSON written to: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use approx::assert_relative_eq;

    const SAMPLE_JOB: &str = include_str!("../../../jobs/bone_soft_tissue.toml");

    #[test]
    fn test_sample_job_runs() {
        let job = parse_config(SAMPLE_JOB).unwrap();
        let output = run_job(&job).unwrap();

        assert_eq!(output.boundaries.len(), job.layers.len() + 1);
        assert_eq!(
            output.continuous.len(),
            job.layers.len() * job.simulation.points_per_layer
        );
        assert_eq!(output.sweep.len(), job.simulation.sweep_energies.len());
        assert_eq!(output.bands.len(), job.layers.len());

        // air, soft_tissue, bone: three distinct materials
        assert_eq!(output.curves.len(), 3 * job.simulation.curve_energies.len());
        assert_eq!(output.presentation.len(), 3);
        assert_eq!(output.presentation["soft_tissue"].label, "Soft Tissue");
        assert_eq!(output.presentation["bone"].color.as_deref(), Some("lightgray"));
        let ids: Vec<_> = output.materials.iter().map(|m| m.name()).collect();
        assert_eq!(ids, vec!["air", "soft_tissue", "bone"]);

        let exit_b = output.boundaries.exit_intensity().unwrap();
        let exit_c = output.continuous.exit_intensity().unwrap();
        assert_relative_eq!(exit_b, exit_c, max_relative = 1e-15);
    }

    #[test]
    fn test_outputs_are_written() {
        let job = parse_config(SAMPLE_JOB).unwrap();
        let output = run_job(&job).unwrap();

        let dir = std::env::temp_dir().join(format!("attenua-runner-{}", std::process::id()));
        write_boundaries_csv(&output, &dir.join("boundaries.csv"), &job).unwrap();
        write_profile_csv(&output, &dir.join("profile.csv"), &job).unwrap();
        write_curves_csv(&output, &dir.join("curves.csv"), &job).unwrap();
        write_bands_csv(&output, &dir.join("bands.csv"), &job).unwrap();
        write_json(&output, &dir.join("profile.json")).unwrap();

        let csv = std::fs::read_to_string(dir.join("boundaries.csv")).unwrap();
        let rows = csv.lines().filter(|l| !l.starts_with('#')).count();
        // header + (1 + sweep) profiles of (layers + 1) points
        let expected = 1 + (1 + job.simulation.sweep_energies.len()) * (job.layers.len() + 1);
        assert_eq!(rows, expected);

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.join("profile.json")).unwrap())
                .unwrap();
        assert!(json["continuous"]["points"].is_array());

        let materials = json["materials"].as_array().unwrap();
        assert_eq!(materials.len(), 3);
        assert_eq!(materials[2]["name"], "bone");
        assert_eq!(materials[2]["density"], 1.92);
        assert_eq!(materials[2]["mass_attenuation"]["y"].as_array().unwrap().len(), 5);

        let bands = std::fs::read_to_string(dir.join("bands.csv")).unwrap();
        let rows: Vec<&str> = bands.lines().filter(|l| !l.starts_with('#')).collect();
        assert_eq!(rows.len(), 1 + job.layers.len());
        // air 0..2, soft_tissue 2..5: label centred at 3.5
        assert_eq!(rows[2], "2,soft_tissue,Soft Tissue,2.000000,5.000000,3.500000");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_distinct_materials_keeps_first_appearance() {
        let stack =
            LayerStack::from_pairs([("soft_tissue", 1.0), ("bone", 1.0), ("soft_tissue", 1.0)])
                .unwrap();
        assert_eq!(distinct_materials(&stack), vec!["soft_tissue", "bone"]);
    }
}
