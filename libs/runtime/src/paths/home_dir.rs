use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

/// Resolve the server home directory into an absolute path.
///
/// - `configured`: value from `server.home_dir`; `None` selects the platform default
///   (`%APPDATA%/<default_subdir>` on Windows, `$HOME/<default_subdir>` elsewhere).
/// - A leading `~` is expanded to the user's home directory.
/// - Relative paths are resolved against the current working directory.
/// - When `create` is set the directory is created if missing.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf> {
    let path = match configured {
        Some(raw) => expand_tilde(raw.trim())?,
        None => platform_base_dir()?.join(default_subdir),
    };

    let path = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .context("cannot read current directory")?
            .join(path)
    };

    if create {
        std::fs::create_dir_all(&path)
            .with_context(|| format!("cannot create home_dir {}", path.display()))?;
    }

    Ok(path)
}

fn expand_tilde(raw: &str) -> Result<PathBuf> {
    if raw == "~" {
        return user_home();
    }
    if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        return Ok(user_home()?.join(rest));
    }
    Ok(Path::new(raw).to_path_buf())
}

fn user_home() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| anyhow!("user home directory is not available"))
}

#[cfg(target_os = "windows")]
fn platform_base_dir() -> Result<PathBuf> {
    dirs::config_dir().ok_or_else(|| anyhow!("APPDATA directory is not available"))
}

#[cfg(not(target_os = "windows"))]
fn platform_base_dir() -> Result<PathBuf> {
    user_home()
}
