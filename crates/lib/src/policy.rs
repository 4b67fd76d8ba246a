//! Minimal IAM policy statement model.
//!
//! Only what the management and execution roles need: allow statements over
//! actions and resources, optionally bound to principals.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
  Allow,
  Deny,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyStatement {
  pub effect: Effect,
  #[serde(rename = "Action")]
  pub actions: Vec<String>,
  #[serde(rename = "Resource", default, skip_serializing_if = "Vec::is_empty")]
  pub resources: Vec<String>,
  #[serde(rename = "Principal", default, skip_serializing_if = "Vec::is_empty")]
  pub principals: Vec<String>,
}

impl PolicyStatement {
  /// Allow `actions` on `resources`.
  pub fn allow<A, R>(actions: A, resources: R) -> Self
  where
    A: IntoIterator,
    A::Item: Into<String>,
    R: IntoIterator,
    R::Item: Into<String>,
  {
    Self {
      effect: Effect::Allow,
      actions: actions.into_iter().map(Into::into).collect(),
      resources: resources.into_iter().map(Into::into).collect(),
      principals: Vec::new(),
    }
  }

  /// Allow `principals` to perform `actions` (a trust statement).
  pub fn trust<A, P>(actions: A, principals: P) -> Self
  where
    A: IntoIterator,
    A::Item: Into<String>,
    P: IntoIterator,
    P::Item: Into<String>,
  {
    Self {
      effect: Effect::Allow,
      actions: actions.into_iter().map(Into::into).collect(),
      resources: Vec::new(),
      principals: principals.into_iter().map(Into::into).collect(),
    }
  }
}
