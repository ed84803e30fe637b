use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use toml::Value;

use crate::usage::ScopeConfig;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScopeSettings {
    /// Absolute project root. Empty means "current directory" until
    /// `normalize` runs.
    pub project_root: String,
    /// The compiler's working directory; defaults to the project root.
    pub build_dir: String,
    /// Project-root-relative subpaths holding third-party code.
    pub exclude: Vec<String>,
}

impl ScopeSettings {
    pub(crate) fn apply_patch(&mut self, patch: ScopeSettingsPatch) {
        if let Some(v) = patch.project_root {
            self.project_root = v;
        }
        if let Some(v) = patch.build_dir {
            self.build_dir = v;
        }
        if let Some(v) = patch.exclude {
            self.exclude = v;
        }
    }

    pub(crate) fn normalize(&mut self) {
        self.project_root = absolutize(self.project_root.trim());
        if self.build_dir.trim().is_empty() {
            self.build_dir = self.project_root.clone();
        } else {
            self.build_dir = absolutize(self.build_dir.trim());
        }
        self.exclude = self
            .exclude
            .iter()
            .map(|e| {
                e.trim()
                    .trim_start_matches("./")
                    .trim_end_matches('/')
                    .to_string()
            })
            .filter(|e| !e.is_empty())
            .collect();
    }

    pub fn to_scope_config(&self) -> ScopeConfig {
        ScopeConfig {
            project_root: self.project_root.clone(),
            build_dir: self.build_dir.clone(),
            excluded: self.exclude.clone(),
        }
    }
}

/// Resolve a possibly-relative path against the current directory and
/// strip any trailing separator. Purely textual beyond the cwd lookup;
/// nothing here touches the filesystem.
fn absolutize(path: &str) -> String {
    let joined = if path.is_empty() || !path.starts_with('/') {
        let cwd = std::env::current_dir().unwrap_or_else(|_| Path::new("/").to_path_buf());
        if path.is_empty() {
            cwd.display().to_string()
        } else {
            format!("{}/{path}", cwd.display())
        }
    } else {
        path.to_string()
    };
    let trimmed = joined.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct ScopeSettingsPatch {
    pub(crate) project_root: Option<String>,
    pub(crate) build_dir: Option<String>,
    pub(crate) exclude: Option<Vec<String>>,
    #[serde(flatten)]
    pub(crate) _extra: HashMap<String, Value>,
}
