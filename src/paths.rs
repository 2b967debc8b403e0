//! Path resolution for the state database and config file.

fn home_dir() -> String {
    std::env::var("HOME").unwrap_or_else(|_| ".".into())
}

/// Resolve the state database path.
/// Checks `TASKLENS_DB`, falls back to `$HOME/.tasklens/tasklens.db`.
pub fn db_path() -> String {
    std::env::var("TASKLENS_DB").unwrap_or_else(|_| format!("{}/.tasklens/tasklens.db", home_dir()))
}

/// Resolve the config file path.
/// Checks `TASKLENS_CONFIG`, falls back to `$HOME/.tasklens/config.toml`.
pub fn config_path() -> String {
    std::env::var("TASKLENS_CONFIG")
        .unwrap_or_else(|_| format!("{}/.tasklens/config.toml", home_dir()))
}

/// Create the parent directory of `path` if it is missing.
pub fn ensure_parent_dir(path: &str) -> anyhow::Result<()> {
    use anyhow::Context;

    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
    }
    Ok(())
}
