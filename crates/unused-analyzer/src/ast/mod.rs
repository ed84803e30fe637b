//! Streaming scanner for clang's `-ast-dump=json` output.
//!
//! AST dumps routinely run to gigabytes, so the whole module works in
//! bounded memory: bytes stream through a fixed window
//! ([`tokenizer::JsonTokenizer`]), a per-node state machine
//! ([`scanner::AstScanner`]) projects each node object into an [`AstNode`]
//! scratch value, and the scratch is handed to a [`NodeSink`] the moment the
//! node completes. Nothing of the tree is ever materialized.
//!
//! The dump format guarantees that `inner` (the child array) is the last key
//! of its node, which is what makes a single-pass pre-order walk possible:
//! the scanner flushes the parent when it sees `inner`, then descends. The
//! scanner fails loudly (`ExpectedNode`) if a dump ever violates this.

mod error;
mod scanner;
mod tokenizer;

pub use error::ScanError;
pub use scanner::AstScanner;

use std::io::Read;

/// One source position as spelled in the dump.
///
/// Fields are kept textual; an empty string means the dump omitted the
/// field on this node.
#[derive(Debug, Default)]
pub struct NodeLoc {
    pub file: String,
    pub line: String,
    pub presumed_file: String,
    pub presumed_line: String,
    pub col: String,
}

impl NodeLoc {
    fn clear(&mut self) {
        self.file.clear();
        self.line.clear();
        self.presumed_file.clear();
        self.presumed_line.clear();
        self.col.clear();
    }
}

/// Projection of a single AST node object.
///
/// This is scanner-owned scratch, reset at every node boundary; a sink must
/// copy out anything it wants to keep past its `node` callback.
#[derive(Debug, Default)]
pub struct AstNode {
    pub id: String,
    pub kind: String,
    /// Back-reference to an earlier declaration of the same entity.
    pub previous_decl: String,
    pub mangled_name: String,
    pub is_implicit: bool,
    pub is_used: bool,
    pub is_explicitly_deleted: bool,
    /// Primary location. `expansionLoc` fields fold into this one.
    pub loc: NodeLoc,
    /// Macro spelling location; populated only from `spellingLoc`.
    pub spelling: NodeLoc,
}

impl AstNode {
    fn clear(&mut self) {
        self.id.clear();
        self.kind.clear();
        self.previous_decl.clear();
        self.mangled_name.clear();
        self.is_implicit = false;
        self.is_used = false;
        self.is_explicitly_deleted = false;
        self.loc.clear();
        self.spelling.clear();
    }
}

/// Receives node objects in pre-order as the scanner flushes them.
///
/// Parents arrive before their children; siblings arrive in dump order. A
/// `previousDecl` reference on an incoming node always names a node that was
/// already delivered.
pub trait NodeSink {
    fn node(&mut self, node: &AstNode) -> Result<(), ScanError>;
}

/// Scan a complete AST dump from `reader`, flushing every node to `sink`.
pub fn scan<R: Read>(reader: R, sink: &mut impl NodeSink) -> Result<(), ScanError> {
    AstScanner::new(reader).run(sink)
}
