//! The `quizforge init` command.

use std::path::Path;

use anyhow::{Context, Result};

use quizforge_core::config::{starter_config, LOCAL_CONFIG};
use quizforge_core::manifest::Manifest;

const MANIFEST_PATH: &str = "manifests/abstract-reasoning.toml";

const MANIFEST_HEADER: &str = "\
# Standard abstract-reasoning corpus: 120 questions.
# Batches run in file order; reordering them changes every later question.

";

pub fn execute() -> Result<()> {
    write_if_missing(Path::new(LOCAL_CONFIG), &starter_config()?)?;

    std::fs::create_dir_all("manifests").context("failed to create manifests directory")?;
    let manifest = format!("{MANIFEST_HEADER}{}", Manifest::standard().to_toml_string()?);
    write_if_missing(Path::new(MANIFEST_PATH), &manifest)?;

    println!("\nNext steps:");
    println!("  1. Edit {LOCAL_CONFIG} to point at your data directory");
    println!("  2. Run: quizforge generate --dry-run");
    println!("  3. Run: quizforge generate");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("Created {}", path.display());
    }
    Ok(())
}
