use anyhow::Result;
use clap::{Arg, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;

use invase_cli::train::input::TrainConfig;
use invase_cli::train::trainer;

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("INVASE_LOG", "error,invase=info"))
        .init();

    let matches = Command::new("invase")
        .version(clap::crate_version!())
        .about("Instance-wise variable selection with actor/critic/baseline networks")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("train")
                .about("Train an INVASE model and report test-set metrics")
                .arg(
                    Arg::new("data")
                        .help("Path to the delimited numeric data file (last column is the class label)")
                        .required(true)
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .help("Path to a JSON training configuration file")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("output_dir")
                        .short('o')
                        .long("output_dir")
                        .help(
                            "Directory the trained safetensors artifacts will be written to. \
                             Overrides the directory specified in the configuration file.",
                        )
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("checkpoint_dir")
                        .short('c')
                        .long("checkpoint_dir")
                        .help(
                            "Directory with saved safetensors artifacts to warm-start from. \
                             Overrides the checkpoint_dir specified in the configuration file.",
                        )
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .value_hint(ValueHint::DirPath),
                )
                .arg(
                    Arg::new("device")
                        .long("device")
                        .help("Compute device: cpu, cuda or cuda:N")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new())
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("iterations")
                        .long("iterations")
                        .help("Override the number of training iterations")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("lambda")
                        .long("lambda")
                        .help("Override the sparsity hyper-parameter")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .help("Seed for the shared random stream")
                        .value_parser(clap::value_parser!(u64)),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("train", sub_m)) => handle_train(sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn handle_train(matches: &ArgMatches) -> Result<()> {
    let config = TrainConfig::from_arguments(matches)?;
    log::info!("[INVASE] Training on: {}", config.data);

    match trainer::run_training(&config) {
        Ok(_) => Ok(()),
        Err(e) => {
            log::error!("Training failed: {:#}", e);
            std::process::exit(1)
        }
    }
}
