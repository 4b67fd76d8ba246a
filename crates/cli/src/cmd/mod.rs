mod dispatch;
mod plan;
mod synth;

pub use dispatch::cmd_dispatch;
pub use plan::cmd_plan;
pub use synth::cmd_synth;

use std::path::Path;

use anyhow::{Context, Result};

use xaccess_lib::eval::evaluate_config;
use xaccess_lib::manifest::Manifest;

use crate::config::UnitArgs;
use crate::output::print_warning;

/// Evaluate `file` into a manifest for the unit described by `unit_args`.
fn load_manifest(file: &Path, unit_args: &UnitArgs) -> Result<Manifest> {
  let unit = unit_args.resolve(file)?.into_unit();
  let manifest =
    evaluate_config(file, unit).with_context(|| format!("Failed to evaluate config: {}", file.display()))?;

  for (family, targets) in &manifest.unmanaged_targets {
    print_warning(&format!(
      "{} grants without a manager: {}",
      family,
      targets.join(", ")
    ));
  }
  Ok(manifest)
}
