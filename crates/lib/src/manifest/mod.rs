//! Deployment unit manifests.
//!
//! Manifests are the evaluated result of Lua configuration: the management
//! roles and lifecycle managers of one sealed deployment unit, ready to be
//! synthesized or dispatched.

mod types;

pub use types::*;
