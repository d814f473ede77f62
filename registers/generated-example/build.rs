// Licensed under the Apache-2.0 license

use anyhow::Context;
use regmap_generator::{compile_file, GeneratorConfig};
use std::env;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    let schema = manifest_dir.join("schema").join("example.xml");

    let code = compile_file(&schema, &GeneratorConfig::default())
        .with_context(|| format!("Failed to generate registers from {}", schema.display()))?;
    std::fs::write(out_dir.join("registers.rs"), code)?;

    println!("cargo:rerun-if-changed=schema/example.xml");
    Ok(())
}
