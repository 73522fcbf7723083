//! Config file location.

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{Result, bail};

/// Directory under the config home holding `config.toml`.
const APP_DIR: &str = "rgl";

/// Config file name.
const CONFIG_FILE: &str = "config.toml";

/// Resolves the config file path.
///
/// - `--dir` given: `{dir}/config.toml`.
/// - `$XDG_CONFIG_HOME` set to an absolute path: `$XDG_CONFIG_HOME/rgl/config.toml`.
/// - Otherwise `~/.config/rgl/config.toml`.
///
/// # Errors
///
/// Returns an error if no `--dir` is given and neither `XDG_CONFIG_HOME`
/// nor `HOME` is usable.
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join(CONFIG_FILE));
    }

    let home = config_home(
        std::env::var_os("XDG_CONFIG_HOME"),
        std::env::var_os("HOME"),
    )?;
    Ok(home.join(APP_DIR).join(CONFIG_FILE))
}

/// Picks the base config directory from the XDG and HOME variables.
fn config_home(xdg_config_home: Option<OsString>, home: Option<OsString>) -> Result<PathBuf> {
    if let Some(xdg) = xdg_config_home
        .map(PathBuf::from)
        .filter(|p| p.is_absolute())
    {
        return Ok(xdg);
    }

    match home.filter(|h| !h.is_empty()) {
        Some(home) => Ok(PathBuf::from(home).join(".config")),
        None => bail!("HOME environment variable is not set"),
    }
}
