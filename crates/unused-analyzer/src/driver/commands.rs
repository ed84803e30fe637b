use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use super::DriverError;

/// One compiler invocation, however it was discovered.
#[derive(Debug, Clone, PartialEq)]
pub struct CompileCommand {
    /// Working directory of the invocation.
    pub directory: String,
    /// The primary source file, as spelled on the command line.
    pub file: String,
    /// Full argv, compiler first.
    pub arguments: Vec<String>,
}

impl CompileCommand {
    /// The source path made absolute against the invocation directory.
    pub fn absolute_file(&self) -> String {
        if self.file.starts_with('/') {
            self.file.clone()
        } else {
            format!("{}/{}", self.directory.trim_end_matches('/'), self.file)
        }
    }
}

/// Executables recognized as C/C++ compiler drivers, with optional
/// version suffixes (`clang++-17`, `gcc-13.2`).
static COMPILER_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:cc|c\+\+|gcc|g\+\+|clang|clang\+\+)(?:-[0-9.]+)?$").expect("compiler name pattern"));

/// Wrapper executables that prefix the real compiler on a command line.
const WRAPPERS: &[&str] = &["ccache", "sccache", "distcc", "icecc", "env", "nice"];

fn basename(word: &str) -> &str {
    word.rsplit('/').next().unwrap_or(word)
}

fn is_compiler(word: &str, extra: &[String]) -> bool {
    let base = basename(word);
    COMPILER_NAME.is_match(base) || extra.iter().any(|c| basename(c) == base)
}

fn is_source_file(word: &str) -> bool {
    let Some((stem, extension)) = word.rsplit_once('.') else {
        return false;
    };
    if stem.is_empty() {
        return false;
    }
    // `.C` is C++, `.c` is C; the match must stay case-sensitive.
    matches!(extension, "c" | "cc" | "cpp" | "cxx" | "C")
}

/// Parse a `compile_commands.json` document into invocations.
pub fn from_compile_commands(path: &Path) -> Result<Vec<CompileCommand>, DriverError> {
    let content = std::fs::read_to_string(path).map_err(|source| DriverError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let entries: Vec<RawEntry> =
        serde_json::from_str(&content).map_err(|source| DriverError::CompileCommands {
            path: path.to_path_buf(),
            source,
        })?;
    let mut commands = Vec::with_capacity(entries.len());
    for entry in entries {
        let arguments = match (entry.arguments, entry.command) {
            (Some(arguments), _) => arguments,
            (None, Some(command)) => shell_split(&command),
            (None, None) => continue,
        };
        if arguments.is_empty() {
            continue;
        }
        commands.push(CompileCommand {
            directory: entry.directory,
            file: entry.file,
            arguments,
        });
    }
    Ok(commands)
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    directory: String,
    file: String,
    #[serde(default)]
    command: Option<String>,
    #[serde(default)]
    arguments: Option<Vec<String>>,
}

/// Extract compiler invocations from a raw build-command stream: one shell
/// command per line, the way `ninja -t commands` or `make --dry-run` print
/// them. Lines that do not invoke a known compiler on a C/C++ source are
/// skipped.
pub fn from_command_stream(
    text: &str,
    build_dir: &str,
    extra_compilers: &[String],
) -> Vec<CompileCommand> {
    let mut commands = Vec::new();
    for line in text.lines() {
        let words = shell_split(line);
        let Some(command) = extract_invocation(words, build_dir, extra_compilers) else {
            continue;
        };
        commands.push(command);
    }
    debug!("extracted {} compiler invocations", commands.len());
    commands
}

fn extract_invocation(
    mut words: Vec<String>,
    build_dir: &str,
    extra_compilers: &[String],
) -> Option<CompileCommand> {
    // Peel `VAR=value` assignments and wrapper executables off the front
    // until the real compiler shows up.
    while let Some(first) = words.first() {
        if first.contains('=') || WRAPPERS.contains(&basename(first)) {
            words.remove(0);
        } else {
            break;
        }
    }
    let compiler = words.first()?;
    if !is_compiler(compiler, extra_compilers) {
        return None;
    }
    let file = words.iter().skip(1).find(|w| is_source_file(w))?.clone();
    Some(CompileCommand {
        directory: build_dir.to_owned(),
        file,
        arguments: words,
    })
}

/// Minimal shell-word splitter: whitespace separates words; single quotes,
/// double quotes, and backslash escapes group them. Substitution syntax is
/// left verbatim.
pub(crate) fn shell_split(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut word = String::new();
    let mut in_word = false;
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        match c {
            ' ' | '\t' => {
                if in_word {
                    words.push(std::mem::take(&mut word));
                    in_word = false;
                }
            },
            '\\' => {
                in_word = true;
                if let Some(next) = chars.next() {
                    word.push(next);
                }
            },
            '\'' => {
                in_word = true;
                for next in chars.by_ref() {
                    if next == '\'' {
                        break;
                    }
                    word.push(next);
                }
            },
            '"' => {
                in_word = true;
                while let Some(next) = chars.next() {
                    match next {
                        '"' => break,
                        '\\' => {
                            if let Some(escaped) = chars.next() {
                                word.push(escaped);
                            }
                        },
                        other => word.push(other),
                    }
                }
            },
            other => {
                in_word = true;
                word.push(other);
            },
        }
    }
    if in_word {
        words.push(word);
    }
    words
}

/// Flags whose argument travels in the following word and must be dropped
/// together with it.
const DROP_WITH_VALUE: &[&str] = &["-o", "-MF", "-MT", "-MQ"];
/// Flags dropped outright: compile/link-stage selection and depfile
/// emission have no business in a syntax-only dump run.
const DROP_ALONE: &[&str] = &["-c", "-S", "-E", "-M", "-MM", "-MD", "-MMD", "-MG", "-MP"];

/// Rewrite an invocation's argv for the AST dump run.
pub(crate) fn dump_arguments(command: &CompileCommand, extra_flags: &[String]) -> Vec<String> {
    let mut arguments = Vec::with_capacity(command.arguments.len() + 6);
    let mut skip_next = false;
    for argument in &command.arguments {
        if skip_next {
            skip_next = false;
            continue;
        }
        if DROP_WITH_VALUE.contains(&argument.as_str()) {
            skip_next = true;
            continue;
        }
        if DROP_ALONE.contains(&argument.as_str()) {
            continue;
        }
        arguments.push(argument.clone());
    }
    arguments.extend(extra_flags.iter().cloned());
    arguments.extend(
        [
            "-Xclang",
            "-ast-dump=json",
            "-fsyntax-only",
            "-fno-color-diagnostics",
        ]
        .map(str::to_owned),
    );
    arguments
}

/// Read a command stream from a file, or stdin when the path is `-`.
pub fn read_command_stream(path: &Path) -> Result<String, DriverError> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin().lock(), &mut text).map_err(
            |source| DriverError::Io {
                path: PathBuf::from("-"),
                source,
            },
        )?;
        return Ok(text);
    }
    std::fs::read_to_string(path).map_err(|source| DriverError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[path = "../../tests/src/driver/commands_tests.rs"]
mod tests;
