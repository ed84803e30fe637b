use std::cmp::Ordering;
use std::io::Write;

use super::analyzer::UsageAnalyzer;

/// One reported declaration site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationRecord<'a> {
    pub is_used: bool,
    /// Canonical `<project-relative-file>:<line>:<col>`.
    pub location: &'a str,
}

impl UsageAnalyzer {
    /// Enumerate every recorded location with its verdict. Order is
    /// whatever the pool produced; callers wanting determinism sort with
    /// [`sort_records`].
    pub fn records(&self) -> impl Iterator<Item = LocationRecord<'_>> {
        self.pool().iter().map(|(id, location)| LocationRecord {
            is_used: self.is_used(id),
            location,
        })
    }

    /// Owned copy of the records, for handing across task boundaries.
    pub fn into_records(self) -> Vec<(bool, String)> {
        self.records()
            .map(|r| (r.is_used, r.location.to_owned()))
            .collect()
    }
}

/// Sort by file, then line and column compared as unsigned integers, so
/// `a.cpp:9:2` orders before `a.cpp:10:1`.
pub fn sort_records(records: &mut [(bool, String)]) {
    records.sort_by(|a, b| compare_locations(&a.1, &b.1).then(a.0.cmp(&b.0)));
}

fn compare_locations(a: &str, b: &str) -> Ordering {
    let (a_file, a_line, a_col) = split_location(a);
    let (b_file, b_line, b_col) = split_location(b);
    a_file
        .cmp(b_file)
        .then(a_line.cmp(&b_line))
        .then(a_col.cmp(&b_col))
}

fn split_location(location: &str) -> (&str, u64, u64) {
    let mut parts = location.rsplitn(3, ':');
    let col = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0);
    let line = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0);
    let file = parts.next().unwrap_or("");
    (file, line, col)
}

/// Serialize records one per line as `<0|1> <location>`.
pub fn write_report(records: &[(bool, String)], out: &mut impl Write) -> std::io::Result<()> {
    for (is_used, location) in records {
        writeln!(out, "{} {location}", u8::from(*is_used))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/src/usage/report_tests.rs"]
mod tests;
