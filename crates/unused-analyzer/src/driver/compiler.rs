use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::ast::scan;
use crate::usage::{PathScope, ScopeConfig, UsageAnalyzer};

use super::commands::{CompileCommand, dump_arguments};
use super::{DriverError, cache};

/// Analyze one translation unit, consulting the per-TU cache when a root
/// is given.
pub(crate) fn analyze_invocation(
    command: &CompileCommand,
    scope: &ScopeConfig,
    extra_flags: &[String],
    cache_root: Option<&Path>,
) -> Result<Vec<(bool, String)>, DriverError> {
    let arguments = dump_arguments(command, extra_flags);
    let source_file = command.absolute_file();

    if let Some(root) = cache_root
        && let Some(source_hash) = cache::source_fingerprint(&source_file)
    {
        let command_hash = cache::args_fingerprint(&arguments);
        if let Some(records) = cache::load(root, &source_file, &source_hash, &command_hash) {
            return Ok(records);
        }
        let records = run_dump(command, &arguments, scope)?;
        cache::save(root, &source_file, &source_hash, &command_hash, &records);
        return Ok(records);
    }

    run_dump(command, &arguments, scope)
}

/// Spawn the compiler and stream its stdout straight through the scanner,
/// so even a multi-gigabyte dump never lands in memory.
fn run_dump(
    command: &CompileCommand,
    arguments: &[String],
    scope: &ScopeConfig,
) -> Result<Vec<(bool, String)>, DriverError> {
    let (program, rest) = match arguments.split_first() {
        Some(split) => split,
        None => {
            return Err(DriverError::CompilerFailed {
                file: command.file.clone(),
                detail: "empty invocation".to_owned(),
            });
        },
    };

    debug!("[ast-dump] {} {}", program, rest.join(" "));

    let mut child = Command::new(program)
        .args(rest)
        .current_dir(&command.directory)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| DriverError::Spawn {
            program: program.clone(),
            source,
        })?;

    let Some(stdout) = child.stdout.take() else {
        return Err(DriverError::Spawn {
            program: program.clone(),
            source: std::io::Error::other("stdout was not captured"),
        });
    };
    // Drain stderr on the side; a chatty compiler can fill the pipe and
    // deadlock against our stdout read otherwise.
    let stderr = child.stderr.take();
    let stderr_reader = std::thread::spawn(move || {
        let mut text = String::new();
        if let Some(mut stderr) = stderr {
            let _ = stderr.read_to_string(&mut text);
        }
        text
    });

    let mut analyzer = UsageAnalyzer::new(PathScope::new(scope.clone())?);
    let scanned = scan(stdout, &mut analyzer);

    let stderr_text = stderr_reader.join().unwrap_or_default();
    let status = child.wait().map_err(|source| DriverError::Spawn {
        program: program.clone(),
        source,
    })?;

    if !status.success() {
        for line in stderr_text.lines().filter(|l| l.contains("error:")) {
            warn!("[ast-dump] {line}");
        }
        if scanned.is_err() {
            let detail = stderr_text
                .lines()
                .find(|l| l.contains("error:"))
                .unwrap_or("no usable JSON produced")
                .to_owned();
            return Err(DriverError::CompilerFailed {
                file: command.file.clone(),
                detail,
            });
        }
        // A partial AST behind a successful scan is still usable.
        debug!("[ast-dump] {} exited with {status}", command.file);
    }

    scanned.map_err(|source| DriverError::Scan {
        file: command.file.clone(),
        source,
    })?;

    debug!(
        "[ast-dump] {}: {} locations",
        command.file,
        analyzer.pool().len()
    );
    Ok(analyzer.into_records())
}
