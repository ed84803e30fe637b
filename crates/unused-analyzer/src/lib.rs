pub mod ast;
pub mod config;
pub mod driver;
pub mod usage;

pub use ast::{AstNode, AstScanner, NodeLoc, NodeSink, ScanError, scan};
pub use config::Settings;
pub use driver::{CompileCommand, DriverError, analyze_all, analyze_dump};
pub use usage::{
    LocationRecord, PathScope, ScopeConfig, ScopeError, StrId, StringPool, UsageAnalyzer,
    sort_records, write_report,
};
