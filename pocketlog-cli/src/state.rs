use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub fn pocketlog_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".pocketlog"))
}

pub fn ensure_pocketlog_home() -> Result<PathBuf> {
    let dir = pocketlog_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Where the chat UI sends its logs while it owns the terminal
pub fn log_path() -> Result<PathBuf> {
    Ok(ensure_pocketlog_home()?.join("pocketlog.log"))
}
