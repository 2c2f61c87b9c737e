use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::Result;

/// Environment variable naming the database file
pub const DATABASE_ENV: &str = "BANK_REVIEWS_DB";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BankReviewsConfig {
    pub database: Option<String>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("bank-reviews.toml")
}

pub fn default_database_path() -> PathBuf {
    PathBuf::from("bank_reviews.db")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<BankReviewsConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: BankReviewsConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}

/// Fail if `path` holds a config that must not be overwritten
pub fn check_config_writable(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }
    Ok(())
}

pub fn write_config(path: &Path, config: &BankReviewsConfig, force: bool) -> anyhow::Result<()> {
    check_config_writable(path, force)?;

    let contents = toml::to_string_pretty(config)?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// Pick the database file: explicit flag, then environment, then config, then default.
pub fn resolve_database_path(
    flag: Option<&Path>,
    env_value: Option<String>,
    config: Option<&BankReviewsConfig>,
) -> PathBuf {
    if let Some(path) = flag {
        return path.to_path_buf();
    }
    if let Some(value) = env_value.filter(|v| !v.trim().is_empty()) {
        return PathBuf::from(value);
    }
    config
        .and_then(|c| c.database.as_ref())
        .map(PathBuf::from)
        .unwrap_or_else(default_database_path)
}

pub fn ensure_db_dir(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
