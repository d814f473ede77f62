// Licensed under the Apache-2.0 license

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use regmap_generator::{flatten, schema, GeneratorConfig, DEFAULT_SCHEMA};
use simple_logger::SimpleLogger;
use std::fmt::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "regmap-gen",
    author,
    version,
    about = "Generate Rust register declarations from a register map"
)]
struct Cli {
    /// Register map schema
    #[arg(value_name = "SCHEMA", default_value = DEFAULT_SCHEMA)]
    schema: PathBuf,

    /// TOML generator configuration
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the output to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print the resolved register table instead of code
    #[arg(long)]
    list: bool,

    /// Increase log verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let _ = SimpleLogger::new().with_level(level).init();

    let config = match &cli.config {
        Some(path) => GeneratorConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GeneratorConfig::default(),
    };

    let root = schema::load(&cli.schema)
        .with_context(|| format!("Failed to read {}", cli.schema.display()))?;

    let output = if cli.list {
        let mut table = String::new();
        for reg in flatten(&root, config.root_base, config.transform())? {
            writeln!(table, "{reg}")?;
        }
        table
    } else {
        regmap_generator::compile_node(&root, &config)
            .with_context(|| format!("Failed to generate {}", cli.schema.display()))?
    };

    match &cli.output {
        Some(path) => std::fs::write(path, &output)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{output}"),
    }
    Ok(())
}
