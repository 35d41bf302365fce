//! Configuration file handling.
//!
//! The config lives at `$XDG_CONFIG_HOME/reelgrid/config.toml` unless a path
//! is given on the command line. A missing default file means defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::assets::{AssetKind, ScriptedFetcher};
use crate::layout::{Breakpoints, GridPlanner, MAX_ROWS};
use crate::models::{Catalog, DEFAULT_ROWS};

const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub catalog: CatalogConfig,
    pub assets: AssetsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// First width (px) of the tablet tier.
    pub tablet: u32,
    /// First width (px) of the desktop tier.
    pub desktop: u32,
    pub rows: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let bp = Breakpoints::default();
        Self {
            tablet: bp.tablet,
            desktop: bp.desktop,
            rows: DEFAULT_ROWS,
        }
    }
}

impl LayoutConfig {
    pub fn breakpoints(&self) -> Breakpoints {
        Breakpoints {
            tablet: self.tablet,
            desktop: self.desktop,
        }
    }

    pub fn planner(&self) -> GridPlanner {
        GridPlanner::new(self.rows)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Video ids in display order. Unset means the built-in portfolio.
    pub ids: Option<Vec<String>>,
}

impl CatalogConfig {
    pub fn catalog(&self) -> Catalog {
        match &self.ids {
            Some(ids) => ids.iter().cloned().collect(),
            None => Catalog::builtin().clone(),
        }
    }
}

/// Settings for the asset queue and the simulated fetch backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    pub workers: usize,
    pub cache_entries: usize,
    pub delay_ms: u64,
    pub fail_thumbnails: Vec<String>,
    pub fail_previews: Vec<String>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            workers: 2,
            cache_entries: 128,
            delay_ms: 0,
            fail_thumbnails: Vec::new(),
            fail_previews: Vec::new(),
        }
    }
}

impl AssetsConfig {
    pub fn fetcher(&self) -> ScriptedFetcher {
        let fetcher = ScriptedFetcher::new().with_delay(Duration::from_millis(self.delay_ms));
        let fetcher = self
            .fail_thumbnails
            .iter()
            .fold(fetcher, |f, id| f.fail(AssetKind::Thumbnail, id.clone()));
        self.fail_previews
            .iter()
            .fold(fetcher, |f, id| f.fail(AssetKind::Preview, id.clone()))
    }
}

impl Config {
    /// Default config file location, if a home directory can be found.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "reelgrid", "reelgrid")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load from an explicit path, or from the default location if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => {
                    debug!("No config file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {:?}", path))?;
        let config =
            Self::parse(&text).with_context(|| format!("Invalid config: {:?}", path))?;
        debug!(?path, "Loaded config");
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.layout.desktop <= self.layout.tablet {
            bail!(
                "desktop breakpoint ({}) must be greater than tablet breakpoint ({})",
                self.layout.desktop,
                self.layout.tablet
            );
        }
        if self.layout.rows == 0 || self.layout.rows > MAX_ROWS {
            bail!("layout.rows must be between 1 and {}", MAX_ROWS);
        }
        if self.assets.workers == 0 {
            bail!("assets.workers must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_is_default() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.layout.breakpoints(), Breakpoints::default());
        assert_eq!(config.catalog.catalog().len(), 12);
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::parse(
            r#"
            [layout]
            desktop = 1280

            [catalog]
            ids = ["a", "b", "c"]

            [assets]
            fail_previews = ["b"]
            "#,
        )
        .unwrap();
        assert_eq!(config.layout.tablet, 768);
        assert_eq!(config.layout.desktop, 1280);
        assert_eq!(config.layout.rows, 2);
        let ids: Vec<String> = config
            .catalog
            .catalog()
            .items()
            .iter()
            .map(|i| i.id.clone())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(config.assets.fail_previews, vec!["b"]);
    }

    #[test]
    fn test_rejects_inverted_breakpoints() {
        let err = Config::parse("[layout]\ntablet = 1024\ndesktop = 768\n").unwrap_err();
        assert!(err.to_string().contains("desktop breakpoint"));
    }

    #[test]
    fn test_rejects_zero_rows() {
        assert!(Config::parse("[layout]\nrows = 0\n").is_err());
    }

    #[test]
    fn test_rejects_huge_rows() {
        let err = Config::parse("[layout]\nrows = 9223372036854775807\n").unwrap_err();
        assert!(format!("{:#}", err).contains("layout.rows"));
        assert!(Config::parse("[layout]\nrows = 64\n").is_ok());
    }

    #[test]
    fn test_rejects_unknown_types() {
        assert!(Config::parse("[layout]\nrows = \"two\"\n").is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[layout]\nrows = 3").unwrap();
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.layout.rows, 3);
        assert_eq!(config.layout.planner().rows, 3);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Config::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_toml_roundtrip() {
        let mut config = Config::default();
        config.assets.fail_thumbnails = vec!["x".into()];
        let text = toml::to_string(&config).unwrap();
        assert_eq!(Config::parse(&text).unwrap(), config);
    }
}
