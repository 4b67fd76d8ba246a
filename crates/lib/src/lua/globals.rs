//! The `xa` global table.
//!
//! This module registers the `xa` global table which provides:
//! - `xa.unit` - `{ name, account_id }` of the deployment unit being evaluated
//! - `xa.bucket` - `allow_cloudfront{}`, `manager{}`, `provision{}` for bucket policies
//! - `xa.key` - `allow_cloudfront{}`, `manager{}`, `provision{}` for key policies
//! - `xa.is_sealed()` - Whether the declaration phase is over

use mlua::prelude::*;

use super::LuaContext;
use super::families::{create_family_table, register_bucket_provision, register_key_provision};
use crate::manager::{BucketPolicy, KeyPolicy};

/// Register the `xa` global table in the Lua runtime.
pub fn register_globals(lua: &Lua, ctx: &LuaContext) -> LuaResult<()> {
  let xa = lua.create_table()?;

  let unit = lua.create_table()?;
  unit.set("name", ctx.unit.name())?;
  unit.set("account_id", ctx.unit.account_id())?;
  xa.set("unit", unit)?;

  let bucket = create_family_table::<BucketPolicy>(lua, ctx)?;
  register_bucket_provision(lua, &bucket, ctx)?;
  xa.set("bucket", bucket)?;

  let key = create_family_table::<KeyPolicy>(lua, ctx)?;
  register_key_provision(lua, &key, ctx)?;
  xa.set("key", key)?;

  let unit_ref = ctx.unit.clone();
  let is_sealed = lua.create_function(move |_, ()| unit_ref.is_sealed().map_err(LuaError::external))?;
  xa.set("is_sealed", is_sealed)?;

  lua.globals().set("xa", xa)?;
  Ok(())
}
