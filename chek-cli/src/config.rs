use anyhow::{Context, Result};
use chek_core::CategoryRules;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Ledger database file. Defaults to `~/.chek/ledger.db`;
    /// the `CHEK_DB` env var overrides both.
    pub database: Option<PathBuf>,
    /// Optional TOML file with category rules replacing the built-ins.
    pub rules_file: Option<PathBuf>,
    /// Timeout for fetching receipt URLs, in seconds.
    pub fetch_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: None,
            rules_file: None,
            fetch_timeout_secs: 15,
        }
    }
}

pub fn chek_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".chek"))
}

pub fn ensure_chek_home() -> Result<PathBuf> {
    let dir = chek_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn config_path() -> Result<PathBuf> {
    Ok(chek_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    read_config(&p)
}

fn read_config(path: &Path) -> Result<Config> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn database_path(cfg: &Config) -> Result<PathBuf> {
    if let Ok(p) = std::env::var("CHEK_DB") {
        return Ok(PathBuf::from(p));
    }
    match &cfg.database {
        Some(p) => Ok(p.clone()),
        None => Ok(ensure_chek_home()?.join("ledger.db")),
    }
}

/// Category rules: the configured override file when present, the built-in
/// set otherwise. Loaded once at startup, immutable afterwards.
pub fn load_rules(cfg: &Config) -> Result<CategoryRules> {
    match &cfg.rules_file {
        Some(path) => {
            let s = fs::read_to_string(path)
                .with_context(|| format!("read rules {}", path.display()))?;
            CategoryRules::from_toml_str(&s)
                .with_context(|| format!("parse rules {}", path.display()))
        }
        None => Ok(CategoryRules::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "database = \"/tmp/test-ledger.db\"\nfetch_timeout_secs = 3\n",
        )
        .unwrap();

        let cfg = read_config(&path).unwrap();
        assert_eq!(cfg.database, Some(PathBuf::from("/tmp/test-ledger.db")));
        assert_eq!(cfg.fetch_timeout_secs, 3);
        assert_eq!(cfg.rules_file, None);
    }

    #[test]
    fn test_load_rules_falls_back_to_builtin() {
        let rules = load_rules(&Config::default()).unwrap();
        assert_eq!(rules.classify("bread"), "Bakery");
    }

    #[test]
    fn test_load_rules_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.toml");
        fs::write(
            &path,
            "[[rule]]\nkeyword = \"pizza\"\ncategory = \"Takeout\"\n",
        )
        .unwrap();

        let cfg = Config {
            rules_file: Some(path),
            ..Config::default()
        };
        let rules = load_rules(&cfg).unwrap();
        assert_eq!(rules.classify("Pizza Margherita"), "Takeout");
        assert_eq!(rules.classify("bread"), "Other");
    }
}
