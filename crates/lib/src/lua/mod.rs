//! Lua runtime and declarations.
//!
//! This module provides the Lua environment for xaccess configurations. It
//! registers the `xa` global table and loads configuration files; the
//! declaration/manager phases themselves are driven by [`crate::eval`].
//!
//! # Submodules
//!
//! - [`families`] - Per-family tables (`xa.bucket`, `xa.key`)
//! - [`globals`] - The `xa` global table
//! - [`runtime`] - Low-level Lua VM management

pub mod families;
pub mod globals;
pub mod runtime;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::manifest::Manifest;
use crate::unit::DeploymentUnit;

/// State shared by every Lua function registered for one evaluation.
#[derive(Debug, Clone)]
pub struct LuaContext {
  pub unit: Arc<DeploymentUnit>,
  pub manifest: Rc<RefCell<Manifest>>,
}

impl LuaContext {
  pub fn new(unit: Arc<DeploymentUnit>) -> Self {
    let manifest = Rc::new(RefCell::new(Manifest::new(&unit)));
    Self { unit, manifest }
  }
}
