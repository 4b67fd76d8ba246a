//! xaccess-lib: cross-account resource policy management
//!
//! This crate provides the types and logic behind `xa`:
//! - `DeploymentUnit`: an isolated set of declarations owning its grant registry
//! - `GrantRegistry`: accumulates accessor grants until a manager consumes them
//! - `LifecycleManager`: turns a frozen grant set into create/update/delete requests
//! - `ManagementRole`: the owning-side role a manager assumes
//! - `Manifest`: the evaluated result of a Lua configuration

pub mod consts;
pub mod eval;
pub mod execute;
pub mod lua;
pub mod manager;
pub mod manifest;
pub mod naming;
pub mod policy;
pub mod provision;
pub mod registry;
pub mod unit;
pub mod util;
