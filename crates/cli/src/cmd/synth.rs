//! Implementation of the `xa synth` command.
//!
//! Writes the full manifest as JSON, to a file or stdout.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::load_manifest;
use crate::config::UnitArgs;
use crate::output::print_success;

pub fn cmd_synth(file: &Path, unit_args: &UnitArgs, output: Option<&Path>) -> Result<()> {
  let manifest = load_manifest(file, unit_args)?;
  let manifest_json = serde_json::to_string_pretty(&manifest).context("Failed to serialize manifest")?;

  match output {
    Some(path) => {
      if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
      {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create directory: {}", parent.display()))?;
      }
      fs::write(path, &manifest_json).with_context(|| format!("Failed to write manifest: {}", path.display()))?;
      info!(path = %path.display(), "manifest written");
      print_success(&format!("Manifest written to {}", path.display()));
    }
    None => println!("{}", manifest_json),
  }

  Ok(())
}
