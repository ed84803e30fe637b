//! Everything between the build system and the core analysis: compiler
//! invocation extraction, AST dump spawning, the per-TU result cache, and
//! cross-TU aggregation.

pub(crate) mod aggregate;
pub(crate) mod cache;
pub(crate) mod commands;
pub(crate) mod compiler;

use std::fmt::{Display, Formatter};
use std::io::Read;
use std::path::PathBuf;

use crate::ast::{ScanError, scan};
use crate::usage::{PathScope, ScopeConfig, ScopeError, UsageAnalyzer, sort_records};

pub use aggregate::{analyze_all, emit, write_report};
pub use commands::{
    CompileCommand, from_compile_commands, from_command_stream, read_command_stream,
};

#[derive(Debug)]
pub enum DriverError {
    Scope(ScopeError),
    /// The AST dump for one translation unit failed to scan.
    Scan { file: String, source: ScanError },
    Spawn {
        program: String,
        source: std::io::Error,
    },
    /// The compiler exited non-zero without producing a scannable dump.
    CompilerFailed { file: String, detail: String },
    CompileCommands {
        path: PathBuf,
        source: serde_json::Error,
    },
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for DriverError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scope(error) => write!(f, "{error}"),
            Self::Scan { file, source } => write!(f, "failed to scan AST of {file}: {source}"),
            Self::Spawn { program, source } => write!(f, "failed to launch {program}: {source}"),
            Self::CompilerFailed { file, detail } => {
                write!(f, "compiler failed on {file}: {detail}")
            },
            Self::CompileCommands { path, source } => {
                write!(f, "failed to parse {}: {source}", path.display())
            },
            Self::Io { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            },
        }
    }
}

impl std::error::Error for DriverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Scope(error) => Some(error),
            Self::Scan { source, .. } => Some(source),
            Self::Spawn { source, .. } => Some(source),
            Self::CompilerFailed { .. } => None,
            Self::CompileCommands { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<ScopeError> for DriverError {
    fn from(error: ScopeError) -> Self {
        Self::Scope(error)
    }
}

/// Analyze a single pre-produced AST dump (the `--ast-json` mode), reading
/// the stream straight through the scanner.
pub fn analyze_dump(
    reader: impl Read,
    name: &str,
    scope: &ScopeConfig,
) -> Result<Vec<(bool, String)>, DriverError> {
    let mut analyzer = UsageAnalyzer::new(PathScope::new(scope.clone())?);
    scan(reader, &mut analyzer).map_err(|source| DriverError::Scan {
        file: name.to_owned(),
        source,
    })?;
    let mut records = analyzer.into_records();
    sort_records(&mut records);
    Ok(records)
}
