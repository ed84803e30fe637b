//! Declarative configuration, split into one file per category.
//!
//! [`Settings`] aggregates all categories. Values come from an optional
//! `unused-analyzer.toml`, applied as a patch over the defaults, with CLI
//! flags patched on top by `main`; `normalize` then clamps and absolutizes
//! everything once, after the last patch.

pub(crate) mod driver;
pub(crate) mod logging;
pub(crate) mod scope;

use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use serde::Deserialize;

pub use driver::{DriverSettings, MAX_JOBS, MIN_JOBS};
use driver::DriverSettingsPatch;
pub use logging::{LogLevel, LoggingSettings};
use logging::LoggingSettingsPatch;
pub use scope::ScopeSettings;
use scope::ScopeSettingsPatch;

pub const SETTINGS_FILE_NAME: &str = "unused-analyzer.toml";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Settings {
    pub scope: ScopeSettings,
    pub driver: DriverSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Load settings from `explicit` when given, otherwise from
    /// `unused-analyzer.toml` in the current directory when present,
    /// otherwise defaults. The result is not yet normalized so CLI
    /// overrides can still be patched in.
    pub fn load(explicit: Option<&Path>) -> Result<Self, SettingsError> {
        let path = match explicit {
            Some(path) => Some(PathBuf::from(path)),
            None => {
                let candidate = PathBuf::from(SETTINGS_FILE_NAME);
                candidate.is_file().then_some(candidate)
            },
        };
        let mut settings = Self::default();
        if let Some(path) = path {
            let content = std::fs::read_to_string(&path).map_err(|source| SettingsError::Read {
                path: path.clone(),
                source,
            })?;
            let patch: SettingsPatch =
                toml::from_str(&content).map_err(|source| SettingsError::Parse { path, source })?;
            settings.apply_patch(patch);
        }
        Ok(settings)
    }

    pub fn apply_patch(&mut self, patch: SettingsPatch) {
        if let Some(p) = patch.scope {
            self.scope.apply_patch(p);
        }
        if let Some(p) = patch.driver {
            self.driver.apply_patch(p);
        }
        if let Some(p) = patch.logging {
            self.logging.apply_patch(p);
        }
    }

    pub fn normalize(&mut self) {
        self.scope.normalize();
        self.driver.normalize();
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsPatch {
    pub(crate) scope: Option<ScopeSettingsPatch>,
    pub(crate) driver: Option<DriverSettingsPatch>,
    pub(crate) logging: Option<LoggingSettingsPatch>,
}

#[derive(Debug)]
pub enum SettingsError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            },
            Self::Parse { path, source } => {
                write!(f, "failed to parse {}: {source}", path.display())
            },
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src/config/settings_tests.rs"]
mod tests;
