//! Lua tables for manager families.
//!
//! Every [`ManagedResource`] gets the same two functions, keyed by its target
//! label (`bucket` or `key_id`):
//!
//! ```lua
//! xa.bucket.allow_cloudfront({ bucket = "assets", distribution_id = "E123", actions = { "s3:GetObject" } })
//! xa.bucket.manager({ bucket = "assets", account = "098765432109", manager_timeout = 60 })
//! ```
//!
//! Owning-side `provision` functions differ per family and are registered
//! separately.

use std::time::Duration;

use mlua::prelude::*;
use tracing::debug;

use super::LuaContext;
use crate::manager::{AllowAccessor, LifecycleManager, ManagedResource, ManagerProps};
use crate::provision::ManagementRole;

/// Build the `allow_cloudfront`/`manager` table for `M`.
pub fn create_family_table<M: ManagedResource + 'static>(lua: &Lua, ctx: &LuaContext) -> LuaResult<LuaTable> {
  let table = lua.create_table()?;

  let unit = ctx.unit.clone();
  let allow_fn = lua.create_function(move |_, spec: LuaTable| {
    let request = AllowAccessor {
      target: required(&spec, M::TARGET_LABEL)?,
      accessor: required(&spec, "distribution_id")?,
      permissions: spec.get::<Option<Vec<String>>>("actions")?,
    };
    debug!(family = %M::FAMILY, resource = %request.target, accessor = %request.accessor, "lua allow");
    M::allow_accessor(&unit, request).map_err(LuaError::external)
  })?;
  table.set("allow_cloudfront", allow_fn)?;

  let ctx = ctx.clone();
  let manager_fn = lua.create_function(move |lua, spec: LuaTable| {
    let target: String = required(&spec, M::TARGET_LABEL)?;
    let account: String = required(&spec, "account")?;
    let mut props = ManagerProps::new(target, account);
    if let Some(secs) = spec.get::<Option<u64>>("manager_timeout")? {
      props = props.with_manager_timeout(Duration::from_secs(secs));
    }
    if let Some(secs) = spec.get::<Option<u64>>("caller_timeout")? {
      props = props.with_caller_timeout(Duration::from_secs(secs));
    }

    let manager = LifecycleManager::new::<M>(&ctx.unit, props).map_err(LuaError::external)?;

    let handle = lua.create_table()?;
    handle.set("key", manager.key())?;
    handle.set("function_name", manager.agent.function_name.as_str())?;
    handle.set("management_role_arn", manager.management_role_arn.as_str())?;

    ctx.manifest.borrow_mut().add_manager(manager).map_err(LuaError::external)?;
    Ok(handle)
  })?;
  table.set("manager", manager_fn)?;

  Ok(table)
}

/// Register `provision{ name, accounts }` on the bucket table.
pub fn register_bucket_provision(lua: &Lua, table: &LuaTable, ctx: &LuaContext) -> LuaResult<()> {
  let ctx = ctx.clone();
  let provision_fn = lua.create_function(move |_, spec: LuaTable| {
    let name: String = required(&spec, "name")?;
    let accounts: Vec<String> = required(&spec, "accounts")?;
    let role = ManagementRole::for_bucket(&name, &accounts).map_err(LuaError::external)?;
    add_role(&ctx, role)
  })?;
  table.set("provision", provision_fn)
}

/// Register `provision{ key_id, key_arn, accounts }` on the key table.
pub fn register_key_provision(lua: &Lua, table: &LuaTable, ctx: &LuaContext) -> LuaResult<()> {
  let ctx = ctx.clone();
  let provision_fn = lua.create_function(move |_, spec: LuaTable| {
    let key_id: String = required(&spec, "key_id")?;
    let key_arn: String = required(&spec, "key_arn")?;
    let accounts: Vec<String> = required(&spec, "accounts")?;
    let role = ManagementRole::for_key(&key_id, &key_arn, &accounts).map_err(LuaError::external)?;
    add_role(&ctx, role)
  })?;
  table.set("provision", provision_fn)
}

fn add_role(ctx: &LuaContext, role: ManagementRole) -> LuaResult<String> {
  let role_name = role.role_name.clone();
  ctx
    .manifest
    .borrow_mut()
    .add_management_role(role)
    .map_err(LuaError::external)?;
  Ok(role_name)
}

fn required<T: FromLua>(spec: &LuaTable, field: &str) -> LuaResult<T> {
  spec
    .get::<Option<T>>(field)?
    .ok_or_else(|| LuaError::external(format!("missing required field '{}'", field)))
}
