//! Local caller identity: a stable anonymous user id kept in `<dir>/config.json`.

use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const DIR_ENV: &str = "MEM0_DIR";
const CONFIG_FILE: &str = "config.json";

/// `$MEM0_DIR`, else `~/.mem0`.
pub fn default_dir(lookup: impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    lookup(DIR_ENV)
        .filter(|d| !d.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".mem0")))
}

/// Return the user id stored in `dir`, creating and persisting one if needed.
///
/// Persisting is best effort: when the file can't be written the fresh id is
/// still returned, it just won't survive the process.
pub fn resolve_user_id(dir: &Path) -> String {
    let path = dir.join(CONFIG_FILE);
    let existing = read_config(&path);
    if let Some(id) = existing
        .as_ref()
        .and_then(|cfg| cfg.get("user_id"))
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
    {
        return id.to_string();
    }

    let id = Uuid::new_v4().to_string();
    let mut config = existing.unwrap_or_default();
    config.insert("user_id".to_string(), Value::from(id.as_str()));
    if let Err(e) = write_config(dir, &path, config) {
        tracing::warn!(path = %path.display(), error = %e, "could not persist user id");
    }
    id
}

/// A fresh id that is never written anywhere.
pub fn ephemeral_user_id() -> String {
    Uuid::new_v4().to_string()
}

fn read_config(path: &Path) -> Option<Map<String, Value>> {
    let content = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn write_config(dir: &Path, path: &Path, config: Map<String, Value>) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;
    let bytes = serde_json::to_vec_pretty(&Value::Object(config))?;
    fs::write(path, bytes)
}
