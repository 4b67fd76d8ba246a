//! Consumption tracking for one (deployment unit, manager family) partition.
//!
//! A target starts `OPEN` and moves to `CONSUMED` exactly once, when its
//! lifecycle manager reads the registered grants. The mark is never reset.
//! Every `register` checks the tracker before writing; `consume` checks and
//! sets it under the same registry lock.

use serde::{Deserialize, Serialize};

use super::types::RegistryError;

/// Consumption state of a single target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumptionMark {
  pub target: String,
  pub consumed: bool,
}

#[derive(Debug, Default, Clone)]
pub struct ConsumptionTracker {
  marks: Vec<ConsumptionMark>,
}

impl ConsumptionTracker {
  pub fn new() -> Self {
    Self::default()
  }

  /// Whether `target` has been consumed. Unknown targets are open.
  pub fn is_consumed(&self, target: &str) -> bool {
    self
      .marks
      .iter()
      .find(|mark| mark.target == target)
      .is_some_and(|mark| mark.consumed)
  }

  /// Fail if `accessor` may no longer be registered for `target`.
  pub fn ensure_open(&self, target: &str, accessor: &str) -> Result<(), RegistryError> {
    if self.is_consumed(target) {
      return Err(RegistryError::AlreadyConsumed {
        target: target.to_string(),
        accessor: Some(accessor.to_string()),
      });
    }
    Ok(())
  }

  /// Flip `target` to consumed. Fails if it already was.
  pub fn mark_consumed(&mut self, target: &str) -> Result<(), RegistryError> {
    if self.is_consumed(target) {
      return Err(RegistryError::AlreadyConsumed {
        target: target.to_string(),
        accessor: None,
      });
    }
    self.marks.push(ConsumptionMark {
      target: target.to_string(),
      consumed: true,
    });
    Ok(())
  }

  pub fn marks(&self) -> &[ConsumptionMark] {
    &self.marks
  }
}
