//! Implementation of the `xa dispatch` command.
//!
//! Evaluates a configuration and delivers one lifecycle operation for every
//! manager to the local recording agent, then prints what was delivered.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};

use xaccess_lib::execute::{DispatchConfig, RecordingAgent, dispatch_all};
use xaccess_lib::manager::{LifecycleManager, Operation};

use super::load_manifest;
use crate::config::UnitArgs;
use crate::output::{print_error, print_info, print_json, print_success, symbols, truncate_hash};

pub fn cmd_dispatch(
  file: &Path,
  unit_args: &UnitArgs,
  operation: Operation,
  parallelism: usize,
  json: bool,
) -> Result<()> {
  let manifest = load_manifest(file, unit_args)?;
  let managers: Vec<LifecycleManager> = manifest.managers.into_values().collect();

  if managers.is_empty() {
    print_info("No managers declared.");
    return Ok(());
  }

  let agent = Arc::new(RecordingAgent::new());
  let config = DispatchConfig { parallelism };

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let (report, mut delivered) = rt.block_on(async {
    let report = dispatch_all(&managers, operation, agent.clone(), &config).await;
    (report, agent.delivered().await)
  });
  delivered.sort_by(|a, b| a.function_name.cmp(&b.function_name));

  if json {
    let requests: Vec<_> = delivered
      .iter()
      .map(|request| {
        serde_json::json!({
          "function_name": request.function_name,
          "physical_resource_id": request.physical_resource_id,
          "payload": request.payload,
        })
      })
      .collect();
    let failed: Vec<_> = report
      .failed
      .iter()
      .map(|(key, e)| serde_json::json!({ "key": key, "error": e.to_string() }))
      .collect();
    print_json(&serde_json::json!({ "operation": operation, "delivered": requests, "failed": failed }))?;
  } else {
    for (key, ack) in &report.delivered {
      print_success(&format!(
        "{} {} {} {}",
        key,
        symbols::ARROW,
        ack.function_name,
        truncate_hash(&ack.idempotency_key.0)
      ));
    }
    for request in &delivered {
      let payload = request.payload.to_json().context("Failed to serialize payload")?;
      println!("  {}", payload);
    }
    for (key, e) in &report.failed {
      print_error(&format!("{}: {}", key, e));
    }
  }

  if !report.is_success() {
    bail!("{} of {} {} request(s) failed", report.failed.len(), report.total(), operation);
  }
  Ok(())
}
