use clap::Parser;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use rspecgen::builder::{generate_profile, TopologyBuilder};
use rspecgen::param_loader;
use rspecgen::params::ParamValue;
use rspecgen::preset::Preset;

/// Configuration utility for generating testbed resource specifications
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Profile preset to build ("openstack" or "magnum")
    #[arg(short = 'P', long, default_value = "openstack")]
    preset: String,

    /// Path to a YAML file of parameter overrides
    #[arg(short, long)]
    params: Option<PathBuf>,

    /// Output directory (or .yaml file path) for the RSpec document
    #[arg(short, long, default_value = "rspec_output")]
    output: PathBuf,

    /// Validate parameters and print the parameter table without emitting
    #[arg(long)]
    check: bool,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse command-line arguments
    let args = Args::parse();

    // Initialize logging with default filter level of "info"
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    info!("Starting rspecgen");
    info!("Preset: {}", args.preset);
    info!("Output: {:?}", args.output);

    let preset = Preset::from_name(&args.preset)?;

    // Load parameter overrides, if any
    let overrides: BTreeMap<String, ParamValue> = match &args.params {
        Some(path) => param_loader::load_overrides(path)?,
        None => BTreeMap::new(),
    };

    if args.check {
        return check_parameters(preset, &overrides);
    }

    // Generate the resource graph
    let profile = generate_profile(preset, &overrides)?;

    // Determine output directory and final RSpec path
    let (output_dir, rspec_path) = if args.output.extension().map_or(false, |ext| ext == "yaml") {
        (
            args.output
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .to_path_buf(),
            args.output.clone(),
        )
    } else {
        (args.output.clone(), args.output.join("rspec.yaml"))
    };

    fs::create_dir_all(&output_dir)
        .wrap_err_with(|| format!("Failed to create output directory '{}'", output_dir.display()))?;

    // Write the RSpec document
    let rspec_yaml = serde_yaml::to_string(&profile.graph)?;
    fs::write(&rspec_path, rspec_yaml)
        .wrap_err_with(|| format!("Failed to write RSpec '{}'", rspec_path.display()))?;

    // Write the parameter bindings alongside it so the experimenter can see
    // exactly what was requested
    let bindings_path = output_dir.join("bindings.json");
    let bindings_json = serde_json::to_string_pretty(&profile.bindings)?;
    fs::write(&bindings_path, bindings_json)
        .wrap_err_with(|| format!("Failed to write bindings '{}'", bindings_path.display()))?;

    info!("Generated RSpec document: {:?}", rspec_path);
    info!("  - Nodes: {}", profile.graph.nodes.len());
    for lan in &profile.graph.lans {
        info!("  - LAN '{}': {} interfaces", lan.name, lan.interfaces.len());
    }
    info!("  - Parameter bindings: {:?}", bindings_path);

    info!("Resource specification completed successfully");
    Ok(())
}

/// Print the declared parameter table and validate overrides against it.
fn check_parameters(preset: Preset, overrides: &BTreeMap<String, ParamValue>) -> Result<()> {
    let mut builder = TopologyBuilder::new(preset)?;

    println!("Parameters for preset '{}':", preset.name());
    for spec in builder.registry().specs() {
        let mut constraints = Vec::new();
        if let Some((min, max)) = spec.bounds {
            constraints.push(format!("range {}-{}", min, max));
        }
        if let Some(allowed) = &spec.allowed {
            constraints.push(format!("one of [{}]", allowed.join(", ")));
        }
        if spec.required {
            constraints.push("required".to_string());
        }
        let suffix = if constraints.is_empty() {
            String::new()
        } else {
            format!(" ({})", constraints.join(", "))
        };
        println!(
            "  {} [{}] default '{}'{}",
            spec.name, spec.param_type, spec.default, suffix
        );
    }

    match builder.bind_parameters(overrides) {
        Some(_) => {
            println!("Parameter validation succeeded");
            Ok(())
        }
        None => {
            for error in builder.reporter().errors() {
                println!("  error: {}", error);
            }
            color_eyre::eyre::bail!(
                "parameter validation failed with {} error(s)",
                builder.reporter().errors().len()
            )
        }
    }
}
