use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

const CACHE_SCHEMA_VERSION: u32 = 1;

/// On-disk result of one translation unit's analysis, keyed by source
/// content and by the exact dump invocation.
#[derive(Debug, Serialize, Deserialize)]
struct CachedTuReport {
    schema_version: u32,
    source_file: String,
    source_hash: String,
    command_hash: String,
    records: Vec<(bool, String)>,
}

pub(crate) fn load(
    root: &Path,
    source_file: &str,
    source_hash: &str,
    command_hash: &str,
) -> Option<Vec<(bool, String)>> {
    let cache_file = cache_file_path(root, source_file);
    let content = std::fs::read_to_string(&cache_file).ok()?;
    let payload = serde_json::from_str::<CachedTuReport>(&content).ok()?;

    let valid = payload.schema_version == CACHE_SCHEMA_VERSION
        && payload.source_file == source_file
        && payload.source_hash == source_hash
        && payload.command_hash == command_hash;
    if !valid {
        return None;
    }

    debug!("[tu-cache] hit {source_file}");
    Some(payload.records)
}

pub(crate) fn save(
    root: &Path,
    source_file: &str,
    source_hash: &str,
    command_hash: &str,
    records: &[(bool, String)],
) {
    if std::fs::create_dir_all(root).is_err() {
        return;
    }
    let payload = CachedTuReport {
        schema_version: CACHE_SCHEMA_VERSION,
        source_file: source_file.to_owned(),
        source_hash: source_hash.to_owned(),
        command_hash: command_hash.to_owned(),
        records: records.to_vec(),
    };
    let Ok(json) = serde_json::to_string(&payload) else {
        return;
    };
    let _ = std::fs::write(cache_file_path(root, source_file), json);
}

pub(crate) fn default_cache_root() -> PathBuf {
    if let Some(home) = std::env::var_os("HOME") {
        return PathBuf::from(home).join(".unused-analyzer").join("tu-cache");
    }
    std::env::temp_dir().join("unused-analyzer-tu-cache")
}

fn cache_file_path(root: &Path, source_file: &str) -> PathBuf {
    root.join(format!("{}.json", stable_hash_hex(source_file)))
}

/// Fingerprint of the source file's current content, or `None` when it
/// cannot be read (caching is then skipped for this TU).
pub(crate) fn source_fingerprint(source_file: &str) -> Option<String> {
    let content = std::fs::read(source_file).ok()?;
    Some(hash_hex(&content))
}

pub(crate) fn args_fingerprint(arguments: &[String]) -> String {
    stable_hash_hex(&arguments.join("\n"))
}

fn stable_hash_hex(input: &str) -> String {
    hash_hex(input.as_bytes())
}

/// FNV-1a, stable across runs and platforms.
fn hash_hex(input: &[u8]) -> String {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in input {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(0x100000001b3);
    }
    format!("{hash:016x}")
}

#[cfg(test)]
#[path = "../../tests/src/driver/cache_tests.rs"]
mod tests;
