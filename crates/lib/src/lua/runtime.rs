use std::path::Path;

use mlua::prelude::*;

use super::{LuaContext, globals};

/// Create a new Lua runtime with the `xa` global registered for `ctx`.
pub fn create_runtime(ctx: &LuaContext) -> LuaResult<Lua> {
  let lua = Lua::new();
  globals::register_globals(&lua, ctx)?;
  Ok(lua)
}

/// Load and execute a Lua file, returning its result.
///
/// Sets `xa.dir` to the directory of the loaded file.
pub fn load_file(lua: &Lua, path: &Path) -> LuaResult<LuaValue> {
  let canonical_path = path
    .canonicalize()
    .map_err(|e| LuaError::external(format!("cannot canonicalize '{}': {}", path.display(), e)))?;
  let content = std::fs::read_to_string(&canonical_path)
    .map_err(|e| LuaError::external(format!("cannot read '{}': {}", canonical_path.display(), e)))?;

  let xa: LuaTable = lua.globals().get("xa")?;
  xa.set(
    "dir",
    canonical_path
      .parent()
      .unwrap_or(Path::new(""))
      .to_string_lossy()
      .to_string(),
  )?;

  load_str(lua, &content, &format!("@{}", canonical_path.display()))
}

/// Execute Lua source under `chunk_name`, returning its result.
pub fn load_str(lua: &Lua, source: &str, chunk_name: &str) -> LuaResult<LuaValue> {
  lua.load(source).set_name(chunk_name).eval::<LuaValue>()
}
