use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use invase_core::config::InvaseConfig;

/// Configuration for the `train` subcommand: data location, artifact
/// paths and the model hyper-parameters.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TrainConfig {
    /// Path to the delimited numeric data file (features + last-column
    /// integer label).
    pub data: String,
    /// Directory the three safetensors artifacts are written to.
    pub output_dir: String,
    /// Optional directory to warm-start all three networks from.
    pub checkpoint_dir: Option<String>,
    pub device: String,
    #[serde(default)]
    pub model: InvaseConfig,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            data: String::new(),
            output_dir: String::from("model"),
            checkpoint_dir: None,
            device: String::from("cpu"),
            model: InvaseConfig::default(),
        }
    }
}

impl TrainConfig {
    /// Build the config from an optional JSON file plus CLI overrides.
    pub fn from_arguments(matches: &ArgMatches) -> Result<Self> {
        let mut config = if let Some(config_path) = matches.get_one::<PathBuf>("config") {
            let config_json = fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
            serde_json::from_str(&config_json)
                .with_context(|| format!("Failed to parse config file: {:?}", config_path))?
        } else {
            TrainConfig::default()
        };

        if let Some(data) = matches.get_one::<String>("data") {
            config.data = data.clone();
        }
        validate_csv_file(&config.data)?;

        if let Some(output_dir) = matches.get_one::<String>("output_dir") {
            config.output_dir = output_dir.clone();
        }

        if let Some(checkpoint_dir) = matches.get_one::<String>("checkpoint_dir") {
            config.checkpoint_dir = Some(checkpoint_dir.clone());
        }

        if let Some(device) = matches.get_one::<String>("device") {
            config.device = device.clone();
        }

        if let Some(iterations) = matches.get_one::<usize>("iterations") {
            config.model.iterations = *iterations;
        }

        if let Some(lambda) = matches.get_one::<f64>("lambda") {
            config.model.lambda = *lambda;
        }

        if let Some(seed) = matches.get_one::<u64>("seed") {
            config.model.seed = Some(*seed);
        }

        Ok(config)
    }
}

pub fn validate_csv_file(path: &str) -> Result<()> {
    let pb = PathBuf::from(path);

    let ext = pb
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());
    match ext.as_deref() {
        Some("csv") | Some("tsv") | Some("txt") => {}
        _ => anyhow::bail!("Data file must have a .csv, .tsv or .txt extension: {}", path),
    }

    if !pb.exists() {
        anyhow::bail!("Data file does not exist: {}", path);
    }

    Ok(())
}
