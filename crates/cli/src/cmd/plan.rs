//! Implementation of the `xa plan` command.
//!
//! This command evaluates a Lua configuration file and summarizes the
//! management roles and lifecycle managers it declares.

use std::path::Path;

use anyhow::{Context, Result};

use xaccess_lib::manager::Operation;
use xaccess_lib::util::hash::Hashable;

use super::load_manifest;
use crate::config::UnitArgs;
use crate::output::{format_timeout, print_info, print_json, print_stat, print_success, symbols, truncate_hash};

pub fn cmd_plan(file: &Path, unit_args: &UnitArgs, verbose: bool, json: bool) -> Result<()> {
  let manifest = load_manifest(file, unit_args)?;
  let hash = manifest.compute_hash().context("Failed to compute manifest hash")?;

  if json {
    let managers: Vec<_> = manifest
      .managers
      .iter()
      .map(|(key, manager)| {
        serde_json::json!({
          "key": key,
          "function_name": manager.agent.function_name,
          "management_role_arn": manager.management_role_arn,
          "accessors": manager.accessors,
        })
      })
      .collect();
    let roles: Vec<_> = manifest
      .management_roles
      .values()
      .map(|role| serde_json::json!({ "role_name": role.role_name, "trusted": role.trusted_principals() }))
      .collect();
    let json_output = serde_json::json!({
      "plan": hash.0,
      "unit": manifest.unit,
      "account_id": manifest.account_id,
      "management_roles": roles,
      "managers": managers,
      "unmanaged_targets": manifest.unmanaged_targets,
    });
    return print_json(&json_output);
  }

  print_success(&format!("Plan: {}", truncate_hash(&hash.0)));
  print_stat("Unit", &format!("{} ({})", manifest.unit, manifest.account_id));
  print_stat("Management roles", &manifest.management_roles.len().to_string());
  print_stat("Managers", &manifest.managers.len().to_string());

  if manifest.is_empty() {
    println!();
    print_info("Nothing declared.");
    return Ok(());
  }

  for role in manifest.management_roles.values() {
    println!();
    println!("  {} {}", symbols::INFO, role.role_name);
    for principal in role.trusted_principals() {
      println!("      {} {}", symbols::ARROW, principal);
    }
  }

  for (key, manager) in &manifest.managers {
    println!();
    println!(
      "  {} {} {} {}",
      symbols::INFO,
      key,
      symbols::ARROW,
      manager.management_role_arn
    );
    println!(
      "      agent {} (timeout {}, caller timeout {})",
      manager.agent.function_name,
      format_timeout(manager.agent.timeout_secs),
      format_timeout(manager.caller_timeout_secs)
    );
    if manager.accessors.is_empty() {
      println!("      no accessors");
    }
    for (accessor, permissions) in &manager.accessors {
      println!("      {}: {}", accessor, permissions.join(", "));
    }
    if verbose {
      let payload = manager
        .payload(Operation::Create)
        .to_json()
        .context("Failed to serialize payload")?;
      println!("      payload: {}", payload);
    }
  }

  Ok(())
}
