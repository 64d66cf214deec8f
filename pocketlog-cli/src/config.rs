use anyhow::{Context, Result};
use pocketlog_parser::{CategoryCatalog, KeywordTable};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::pocketlog_home;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub catalog: CategoryCatalog,
    /// Replaces the built-in keyword table when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<KeywordTable>,
    pub chat: ChatSection,
    pub log: LogSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChatSection {
    /// Pause before a reply shows up in the chat, in milliseconds (0 = instant)
    pub typing_delay_ms: u64,
    /// How many transactions the side panel and /list show
    pub recent_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogSection {
    /// tracing filter level; POCKETLOG_LOG overrides it
    pub level: String,
}

impl Default for ChatSection {
    fn default() -> Self {
        Self {
            typing_delay_ms: 600,
            recent_limit: 8,
        }
    }
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    pub fn keyword_table(&self) -> KeywordTable {
        self.keywords.clone().unwrap_or_default()
    }
}

/// Where the effective configuration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    File,
    Defaults,
}

/// `--config` wins; otherwise `~/.pocketlog/config.toml`.
/// Nothing is created here; `save_config` makes the directory when it writes.
pub fn config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(p) => Ok(p.to_path_buf()),
        None => Ok(pocketlog_home()?.join("config.toml")),
    }
}

/// Runs before logging is set up, so the caller reports the source.
pub fn load_config(path: &Path) -> Result<(Config, ConfigSource)> {
    if !path.exists() {
        return Ok((Config::default(), ConfigSource::Defaults));
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg = parse_config(&s).with_context(|| format!("parse {}", path.display()))?;
    Ok((cfg, ConfigSource::File))
}

pub fn parse_config(s: &str) -> Result<Config> {
    Ok(toml::from_str(s)?)
}

pub fn render_config(cfg: &Config) -> Result<String> {
    toml::to_string_pretty(cfg).context("serialize config")
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    fs::write(path, render_config(cfg)?).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        println!("Config already exists: {}", path.display());
        return Ok(());
    }
    // Write the keyword table out too so it can be edited in place.
    let cfg = Config {
        keywords: Some(KeywordTable::default()),
        ..Config::default()
    };
    save_config(path, &cfg)?;
    println!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(parse_config("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_config() {
        let cfg = parse_config(
            r#"
[catalog]
income = ["Salary"]
expense = ["Food", "Pets"]

[chat]
typing_delay_ms = 0
"#,
        )
        .unwrap();
        assert_eq!(cfg.catalog.expense, vec!["Food", "Pets"]);
        assert_eq!(cfg.chat.typing_delay_ms, 0);
        assert_eq!(cfg.chat.recent_limit, 8);
        assert_eq!(cfg.log.level, "warn");
        assert_eq!(cfg.keyword_table(), KeywordTable::default());
    }

    #[test]
    fn test_catalog_section_with_one_list() {
        let cfg = parse_config("[catalog]\nexpense = [\"Food\", \"Pets\"]\n").unwrap();
        assert_eq!(cfg.catalog.expense, vec!["Food", "Pets"]);
        assert_eq!(cfg.catalog.income, CategoryCatalog::default().income);
    }

    #[test]
    fn test_keywords_section_with_only_rules() {
        let cfg = parse_config(
            r#"
[[keywords.rules]]
name = "pets"
pattern = "vet|kibble"
category = "Pets"
"#,
        )
        .unwrap();
        let table = cfg.keyword_table();
        let defaults = KeywordTable::default();
        assert_eq!(table.query, defaults.query);
        assert_eq!(table.expense, defaults.expense);
        assert_eq!(table.income, defaults.income);
        assert_eq!(table.rules.len(), 1);
        assert_eq!(table.rules[0].category, "Pets");
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let path = std::env::temp_dir()
            .join(format!("pocketlog-missing-{}", std::process::id()))
            .join("config.toml");
        let (cfg, source) = load_config(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(source, ConfigSource::Defaults);
        assert!(!path.parent().unwrap().exists());
    }

    #[test]
    fn test_config_path_creates_nothing() {
        let dir = std::env::temp_dir().join(format!("pocketlog-path-{}", std::process::id()));
        let explicit = dir.join("config.toml");
        assert_eq!(config_path(Some(&explicit)).unwrap(), explicit);
        assert!(!dir.exists());

        if let Ok(home) = pocketlog_home() {
            assert_eq!(config_path(None).unwrap(), home.join("config.toml"));
        }
    }

    #[test]
    fn test_save_config_creates_parent_dir() {
        let dir = std::env::temp_dir().join(format!("pocketlog-save-{}", std::process::id()));
        let path = dir.join("nested").join("config.toml");
        save_config(&path, &Config::default()).unwrap();

        let (cfg, source) = load_config(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(source, ConfigSource::File);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_rendered_config_parses_back() {
        let cfg = Config {
            keywords: Some(KeywordTable::default()),
            ..Config::default()
        };
        let text = render_config(&cfg).unwrap();
        assert!(text.contains("[[keywords.rules]]"));
        assert_eq!(parse_config(&text).unwrap(), cfg);
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        assert!(parse_config("[chat]\ntyping_delay_ms = \"soon\"").is_err());
    }
}
