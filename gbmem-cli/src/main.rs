mod config;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use gbmem_core::ArtifactKind;

use crate::config::CliConfig;

#[derive(Parser)]
struct Cli {
    #[arg(short = 'f', long = "gb_file_path")]
    gb_file_path: String,
    /// TOML config file; flags given on the command line take precedence
    #[arg(short = 'c', long = "config")]
    config: Option<String>,
    #[arg(short = 'o', long = "output_dir")]
    output_dir: Option<String>,
    /// Comma separated list of report, hexdump, audio
    #[arg(short = 'a', long = "artifacts", value_delimiter = ',')]
    artifacts: Option<Vec<ArtifactKind>>,
    /// Skip loading the cartridge into the address space
    #[arg(long = "no_load")]
    no_load: bool,
    /// Print the decoded header to stdout as TOML
    #[arg(long = "print_header")]
    print_header: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Cli::parse();

    let cli_config = match &args.config {
        Some(config_path) => CliConfig::from_toml_file(config_path)?,
        None => CliConfig::default(),
    };

    let mut run_config = cli_config.into_run_config(args.gb_file_path);
    if let Some(output_dir) = args.output_dir {
        run_config.output_dir = output_dir;
    }
    if let Some(artifacts) = args.artifacts {
        run_config.artifacts = artifacts;
    }
    if args.no_load {
        run_config.load_into_memory = false;
    }

    log::info!("Running with config:\n{run_config}");

    let summary = gbmem_core::run(&run_config)
        .with_context(|| format!("error analyzing '{}'", run_config.gb_file_path))?;

    if args.print_header {
        let header_toml = toml::to_string_pretty(&summary.header)
            .context("error serializing header into TOML")?;
        print!("{header_toml}");
    }

    Ok(())
}
