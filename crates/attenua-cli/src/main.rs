//! Attenua command-line interface.
//!
//! Run layered attenuation jobs from TOML configuration files:
//! ```sh
//! attenua run job.toml
//! attenua validate job.toml
//! attenua materials
//! ```

mod config;
mod runner;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use attenua_materials::AttenuationModel;

#[derive(Parser)]
#[command(name = "attenua")]
#[command(about = "Attenua: layered X-ray attenuation model")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a job from a TOML configuration file.
    Run {
        /// Path to the job configuration file.
        config: PathBuf,
        /// Output directory (overrides config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file without running the job.
    Validate {
        /// Path to the job configuration file.
        config: PathBuf,
    },
    /// Display the built-in material tables.
    Materials,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, output } => {
            println!("Attenua Layered Transmission");
            println!("============================");
            let job = config::load_config(&config)?;
            println!("Configuration: {}", config.display());

            let result = runner::run_job(&job)?;

            let out_dir = output.unwrap_or_else(|| PathBuf::from(&job.output.directory));

            if job.output.save_csv {
                runner::write_boundaries_csv(&result, &out_dir.join("boundaries.csv"), &job)?;
                runner::write_profile_csv(&result, &out_dir.join("profile.csv"), &job)?;
                runner::write_bands_csv(&result, &out_dir.join("bands.csv"), &job)?;
                if !result.curves.is_empty() {
                    runner::write_curves_csv(&result, &out_dir.join("curves.csv"), &job)?;
                }
            }

            if job.output.save_json {
                runner::write_json(&result, &out_dir.join("profile.json"))?;
            }

            println!("Job complete.");
            Ok(())
        }
        Commands::Validate { config } => {
            let job = config::load_config(&config)?;
            let (model, stack) = job.validate()?;
            println!("Configuration is valid: {}", config.display());
            println!(
                "  {} materials, {} layers, {:.3} cm total",
                model.len(),
                stack.len(),
                stack.total_thickness_cm()
            );
            Ok(())
        }
        Commands::Materials => {
            println!("Built-in materials:");
            println!();
            let model = AttenuationModel::biological();
            for material in model.materials() {
                let (lo, hi) = material.energy_range();
                println!(
                    "  {:<12} — {:<12} ρ={} g/cm³, {}–{} MeV ({} points)",
                    material.name(),
                    material.label(),
                    material.density(),
                    lo,
                    hi,
                    material.energies().len()
                );
            }
            println!();
            println!("Energies outside a table are linearly extrapolated.");
            Ok(())
        }
    }
}
