//! CLI command implementations.

pub mod config;
pub mod diff;
pub mod judge;
pub mod latest;
pub mod portfolio;
pub mod score;
pub mod screen;
pub mod signals;

// Re-export submodules for convenience
pub use config::ConfigArgs;
pub use diff::DiffArgs;
pub use judge::JudgeArgs;
pub use latest::LatestArgs;
pub use portfolio::PortfolioArgs;
pub use score::ScoreArgs;
pub use screen::ScreenArgs;
pub use signals::SignalsArgs;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::debug;

use cbscreen_config::ScreenConfig;
use cbscreen_core::Date;
use cbscreen_ext_file::{load_file, load_unlisted, SnapshotFile};
use cbscreen_screen::loader::LoadedSnapshot;

use crate::error::{CliError, CliResult};
use crate::output::print_warning;

/// Parses a date string in YYYY-MM-DD format.
pub fn parse_date(s: &str) -> CliResult<Date> {
    Date::parse(s).map_err(|_| CliError::InvalidDate(s.to_string()))
}

/// Validates a count argument that must be positive.
pub fn validate_count(name: &str, value: usize) -> CliResult<usize> {
    if value == 0 {
        return Err(CliError::InvalidArgument(format!("{name} must be at least 1")));
    }
    Ok(value)
}

/// Location of the per-user configuration file.
pub fn config_path() -> Result<PathBuf> {
    let base = dirs::config_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    Ok(base.join("cbscreen").join("config.toml"))
}

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// `--config` or `CBSCREEN_CONFIG`.
    Explicit(PathBuf),
    /// The per-user configuration file.
    User(PathBuf),
    /// Built-in defaults.
    Defaults,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Explicit(path) | Self::User(path) => write!(f, "{}", path.display()),
            Self::Defaults => write!(f, "built-in defaults"),
        }
    }
}

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    /// Effective configuration.
    pub config: ScreenConfig,
    /// Where `config` was loaded from.
    pub source: ConfigSource,
    date: Option<Date>,
}

impl Context {
    /// Resolves configuration and the `--date` override.
    pub fn new(config: Option<&Path>, date: Option<&str>) -> Result<Self> {
        let date = date.map(parse_date).transpose()?;

        let (config, source) = match config {
            Some(path) => (
                ScreenConfig::from_file(path)?,
                ConfigSource::Explicit(path.to_path_buf()),
            ),
            None => match config_path() {
                Ok(path) if path.exists() => {
                    (ScreenConfig::from_file(&path)?, ConfigSource::User(path))
                }
                _ => (ScreenConfig::default(), ConfigSource::Defaults),
            },
        };
        debug!(source = %source, "configuration resolved");

        Ok(Self {
            config,
            source,
            date,
        })
    }

    /// The `--date` override, if given.
    pub fn date(&self) -> Option<Date> {
        self.date
    }

    /// Reference date for the current snapshot: `--date`, else the date in a
    /// `conv_YYYYMMDD.csv` file name, else today.
    pub fn reference_date(&self, path: &Path) -> Date {
        self.date
            .or_else(|| file_date(path))
            .unwrap_or_else(Date::today)
    }

    /// Reference date for an earlier snapshot: its file-name date wins over
    /// `--date`, since `--date` describes the current one.
    pub fn prior_reference_date(&self, path: &Path) -> Date {
        file_date(path)
            .or(self.date)
            .unwrap_or_else(Date::today)
    }

    /// Loads a snapshot file, excluding bonds listed as unlisted in `base_info`.
    pub fn load(
        &self,
        path: &Path,
        reference_date: Date,
        base_info: Option<&Path>,
    ) -> Result<LoadedSnapshot> {
        let unlisted = unlisted_codes(base_info)?;
        let loaded = load_file(path, reference_date, &unlisted, &self.config)?;
        if loaded.report.dropped_unparseable > 0 {
            print_warning(&format!(
                "{}: skipped {} unparseable rows",
                path.display(),
                loaded.report.dropped_unparseable
            ));
        }
        Ok(loaded)
    }
}

/// Reads the unlisted set, or an empty set without a base-info file.
pub fn unlisted_codes(base_info: Option<&Path>) -> Result<HashSet<String>> {
    Ok(match base_info {
        Some(path) => load_unlisted(path)?,
        None => HashSet::new(),
    })
}

fn file_date(path: &Path) -> Option<Date> {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(SnapshotFile::date_from_name)
}
