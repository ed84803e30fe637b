use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Semaphore;
use tokio::task;
use tracing::info;

use crate::config::Settings;
use crate::usage::{PathScope, sort_records};

use super::commands::CompileCommand;
use super::compiler::analyze_invocation;
use super::{DriverError, cache};

pub use crate::usage::write_report;

/// Run every invocation through its own analyzer instance, bounded by the
/// configured job count, and union the per-TU verdicts by location string:
/// a location used anywhere is used.
pub async fn analyze_all(
    commands: Vec<CompileCommand>,
    settings: &Settings,
) -> Result<Vec<(bool, String)>, DriverError> {
    let scope = settings.scope.to_scope_config();
    // Surface a bad scope once, up front, instead of once per TU.
    PathScope::new(scope.clone())?;

    let cache_root: Option<PathBuf> = settings.driver.cache.then(|| {
        if settings.driver.cache_dir.is_empty() {
            cache::default_cache_root()
        } else {
            PathBuf::from(&settings.driver.cache_dir)
        }
    });

    info!(
        "analyzing {} translation units with {} jobs",
        commands.len(),
        settings.driver.jobs
    );

    let merged: Arc<DashMap<String, bool>> = Arc::new(DashMap::new());
    let semaphore = Arc::new(Semaphore::new(settings.driver.jobs));
    let extra_flags = Arc::new(settings.driver.extra_flags.clone());
    let scope = Arc::new(scope);
    let cache_root = Arc::new(cache_root);

    let mut tasks = Vec::with_capacity(commands.len());
    for command in commands {
        let merged = Arc::clone(&merged);
        let semaphore = Arc::clone(&semaphore);
        let extra_flags = Arc::clone(&extra_flags);
        let scope = Arc::clone(&scope);
        let cache_root = Arc::clone(&cache_root);
        tasks.push(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .expect("semaphore is never closed");
            let handle = task::spawn_blocking(move || {
                analyze_invocation(&command, &scope, &extra_flags, cache_root.as_deref())
            });
            let records = match handle.await {
                Ok(result) => result?,
                Err(join_error) => std::panic::resume_unwind(join_error.into_panic()),
            };
            for (is_used, location) in records {
                merged
                    .entry(location)
                    .and_modify(|used| *used |= is_used)
                    .or_insert(is_used);
            }
            Ok::<(), DriverError>(())
        });
    }
    futures::future::try_join_all(tasks).await?;

    let mut records: Vec<(bool, String)> = merged
        .iter()
        .map(|entry| (*entry.value(), entry.key().clone()))
        .collect();
    sort_records(&mut records);
    Ok(records)
}

/// Write the final report to `out` and log a one-line summary.
pub fn emit(records: &[(bool, String)], out: &mut impl Write) -> std::io::Result<()> {
    write_report(records, out)?;
    let unused = records.iter().filter(|(used, _)| !used).count();
    info!("{} locations, {} unused", records.len(), unused);
    Ok(())
}
