use std::fmt::{Display, Formatter};

/// What counts as project code.
///
/// All paths use `/` separators; the compiler emits Unix-style paths and
/// Windows-style input is undefined here. `excluded` entries are
/// project-root-relative, normalized, and never empty (the settings layer
/// filters blanks out before construction).
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeConfig {
    pub project_root: String,
    pub build_dir: String,
    pub excluded: Vec<String>,
}

#[derive(Debug)]
pub enum ScopeError {
    RelativeRoot { field: &'static str, path: String },
    EmptyExclusion,
}

impl Display for ScopeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RelativeRoot { field, path } => {
                write!(f, "{field} must be an absolute path, got {path:?}")
            },
            Self::EmptyExclusion => write!(f, "excluded subpaths must not be empty"),
        }
    }
}

impl std::error::Error for ScopeError {}

/// Classifies compiler-reported file paths as in-scope or out-of-scope and
/// canonicalizes the former to a project-relative form.
#[derive(Debug, Clone)]
pub struct PathScope {
    /// Normalized components of the project root.
    root: Vec<String>,
    build_dir: String,
    excluded: Vec<String>,
}

impl PathScope {
    pub fn new(config: ScopeConfig) -> Result<Self, ScopeError> {
        if !config.project_root.starts_with('/') {
            return Err(ScopeError::RelativeRoot {
                field: "project root",
                path: config.project_root,
            });
        }
        if !config.build_dir.starts_with('/') {
            return Err(ScopeError::RelativeRoot {
                field: "build dir",
                path: config.build_dir,
            });
        }
        let mut excluded = Vec::with_capacity(config.excluded.len());
        for entry in config.excluded {
            let entry = entry.trim_end_matches('/');
            if entry.is_empty() {
                return Err(ScopeError::EmptyExclusion);
            }
            excluded.push(entry.to_owned());
        }
        let mut root = Vec::new();
        push_components(&mut root, &config.project_root);
        Ok(Self {
            root,
            build_dir: config.build_dir,
            excluded,
        })
    }

    /// Canonicalize `path` to its project-relative form, or `None` when it
    /// falls outside the project or inside an excluded subpath.
    ///
    /// Relative input is interpreted against the build dir, `.` and `..`
    /// segments are resolved lexically, and exclusion matches only on whole
    /// path components (`third_party` does not shadow `third_party_other`).
    pub fn resolve(&self, path: &str) -> Option<String> {
        let mut components = Vec::new();
        if !path.starts_with('/') {
            push_components(&mut components, &self.build_dir);
        }
        push_components(&mut components, path);

        if components.len() < self.root.len() {
            return None;
        }
        if components[..self.root.len()]
            .iter()
            .zip(&self.root)
            .any(|(a, b)| a != b)
        {
            return None;
        }
        let relative = components[self.root.len()..].join("/");
        for excluded in &self.excluded {
            if relative == *excluded
                || relative
                    .strip_prefix(excluded.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
            {
                return None;
            }
        }
        Some(relative)
    }
}

/// Append the normalized components of `path` onto `out`, resolving `.`
/// and `..` lexically. `..` above the stack bottom is dropped, matching
/// the usual lexical treatment of `/../x`.
fn push_components(out: &mut Vec<String>, path: &str) {
    for part in path.split('/') {
        match part {
            "" | "." => {},
            ".." => {
                out.pop();
            },
            other => out.push(other.to_owned()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src/usage/scope_tests.rs"]
mod tests;
