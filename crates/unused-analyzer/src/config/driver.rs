use std::collections::HashMap;

use serde::Deserialize;
use toml::Value;

pub const MIN_JOBS: usize = 1;
pub const MAX_JOBS: usize = 128;

#[derive(Debug, Clone, PartialEq)]
pub struct DriverSettings {
    /// Concurrent translation units. Zero means "one per core".
    pub jobs: usize,
    pub cache: bool,
    /// Cache root; empty selects the default under `$HOME`.
    pub cache_dir: String,
    /// Extra executable names recognized as C/C++ compilers, on top of the
    /// builtin cc/gcc/clang set.
    pub compilers: Vec<String>,
    /// Flags appended to every AST-dump invocation.
    pub extra_flags: Vec<String>,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            jobs: 0,
            cache: true,
            cache_dir: String::new(),
            compilers: Vec::new(),
            extra_flags: Vec::new(),
        }
    }
}

impl DriverSettings {
    pub(crate) fn apply_patch(&mut self, patch: DriverSettingsPatch) {
        if let Some(v) = patch.jobs {
            self.jobs = v;
        }
        if let Some(v) = patch.cache {
            self.cache = v;
        }
        if let Some(v) = patch.cache_dir {
            self.cache_dir = v;
        }
        if let Some(v) = patch.compilers {
            self.compilers = v;
        }
        if let Some(v) = patch.extra_flags {
            self.extra_flags = v;
        }
    }

    pub(crate) fn normalize(&mut self) {
        if self.jobs == 0 {
            self.jobs = std::thread::available_parallelism().map_or(1, |n| n.get());
        }
        self.jobs = self.jobs.clamp(MIN_JOBS, MAX_JOBS);
        self.compilers = self
            .compilers
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        self.extra_flags = self
            .extra_flags
            .iter()
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect();
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct DriverSettingsPatch {
    pub(crate) jobs: Option<usize>,
    pub(crate) cache: Option<bool>,
    pub(crate) cache_dir: Option<String>,
    pub(crate) compilers: Option<Vec<String>>,
    pub(crate) extra_flags: Option<Vec<String>>,
    #[serde(flatten)]
    pub(crate) _extra: HashMap<String, Value>,
}
