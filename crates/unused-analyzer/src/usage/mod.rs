//! Per-translation-unit usage analysis.
//!
//! The scanner's node stream flows into [`UsageAnalyzer`], which leans on
//! [`PathScope`] to decide which files are project code and on
//! [`StringPool`] to collapse repeated location strings into dense
//! handles. [`records`](UsageAnalyzer::records) reads the verdicts back
//! out.

mod analyzer;
mod report;
mod scope;
mod string_pool;

pub use analyzer::{MAX_FILE_LEN, MAX_LINE_LEN, UsageAnalyzer};
pub use report::{LocationRecord, sort_records, write_report};
pub use scope::{PathScope, ScopeConfig, ScopeError};
pub use string_pool::{StrId, StringPool};
