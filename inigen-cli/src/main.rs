use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use env_logger::Builder as LoggerBuilder;
use inigen::GeneratorConfig;
use log::LevelFilter;

#[derive(Debug, Clone, ValueEnum)]
enum Verbosity {
    Silent,
    Warnings,
    Info,
    Debug,
}

/// Writes prefixed environment variables into .ini files.
///
/// A variable named `<PREFIX><file>__<section>__<key>` sets `key` in section `[section]` of
/// `<OUTPUT_DIR>/<file>.ini`.
#[derive(Parser, Debug)]
#[command(version, about, long_about)]
struct Args {
    /// Prefix selecting the variables to materialize
    #[arg(short, long, env = "INI_ENVIRONMENT_PREFIX")]
    prefix: String,

    /// Directory the .ini files are written to
    #[arg(short, long, env = "INI_FILES_PATH")]
    output_dir: PathBuf,

    /// Log level
    #[arg(short, long, value_enum, default_value_t = Verbosity::Info)]
    verbosity: Verbosity,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.verbosity {
        Verbosity::Silent => (),
        Verbosity::Warnings => LoggerBuilder::new().filter(None, LevelFilter::Warn).init(),
        Verbosity::Info => LoggerBuilder::new().filter(None, LevelFilter::Info).init(),
        Verbosity::Debug => LoggerBuilder::new().filter(None, LevelFilter::Debug).init(),
    }

    let config = GeneratorConfig {
        environment_prefix: args.prefix,
        ini_files_path: args.output_dir,
    };

    // Variables that are not valid unicode cannot name an ini file or key.
    let vars = std::env::vars_os()
        .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)));

    let written = inigen::generate(&config, vars)
        .with_context(|| format!("Failed to generate ini files in {}", config.ini_files_path.display()))?;

    if written.is_empty() {
        log::warn!("No variables start with prefix {}", config.environment_prefix);
    }

    Ok(())
}
