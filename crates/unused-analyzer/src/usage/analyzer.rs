use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::ast::{AstNode, NodeSink, ScanError};

use super::scope::PathScope;
use super::string_pool::{StrId, StringPool};

/// Fixed capacity of the inherited-file buffer. Real compiler dumps never
/// come close; anything longer is treated as hostile input.
pub const MAX_FILE_LEN: usize = 4096;
/// Fixed capacity of the inherited-line buffer.
pub const MAX_LINE_LEN: usize = 16;

/// The closed set of declaration kinds worth reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclKind {
    Function,
    Method,
    Constructor,
    Conversion,
}

/// Destructors are deliberately absent: an "unused destructor" report is
/// never actionable.
fn decl_kind(kind: &str) -> Option<DeclKind> {
    match kind {
        "FunctionDecl" => Some(DeclKind::Function),
        "CXXMethodDecl" => Some(DeclKind::Method),
        "CXXConstructorDecl" => Some(DeclKind::Constructor),
        "CXXConversionDecl" => Some(DeclKind::Conversion),
        _ => None,
    }
}

/// Node ids print as hex (`0x2f41d58`); plain decimal also parses for the
/// benefit of hand-written fixtures.
fn parse_node_id(text: &str) -> Option<u64> {
    match text.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None if !text.is_empty() => text.parse().ok(),
        None => None,
    }
}

/// Consumes the scanner's node stream for one translation unit and
/// aggregates a used/unused verdict per declared location.
///
/// The dump omits location fields that repeat the previous node's, so the
/// analyzer carries `current_file`/`current_line` cursors across nodes;
/// pre-order delivery is what makes that inheritance sound. Both cursors
/// are capped at a fixed capacity so pathological input cannot grow them.
pub struct UsageAnalyzer {
    scope: PathScope,
    pool: StringPool,
    id_to_loc: HashMap<u64, StrId>,
    id_to_spelling: HashMap<u64, StrId>,
    used: HashSet<StrId>,
    current_file: String,
    current_line: String,
    scratch: String,
}

impl UsageAnalyzer {
    pub fn new(scope: PathScope) -> Self {
        Self {
            scope,
            pool: StringPool::new(),
            id_to_loc: HashMap::new(),
            id_to_spelling: HashMap::new(),
            used: HashSet::new(),
            current_file: String::new(),
            current_line: String::new(),
            scratch: String::new(),
        }
    }

    pub fn pool(&self) -> &StringPool {
        &self.pool
    }

    pub fn is_used(&self, id: StrId) -> bool {
        self.used.contains(&id)
    }

    /// Step 1: fold this node's location into the inherited cursors.
    ///
    /// The presumed file/line win over the plain ones: `# line` directives
    /// from code generators surface there, and the original source is what
    /// a maintainer wants reported. An out-of-scope file clears
    /// `current_file`, which suppresses everything until an in-scope file
    /// shows up again.
    fn inherit(&mut self, node: &AstNode) -> Result<(), ScanError> {
        let file = if node.loc.presumed_file.is_empty() {
            &node.loc.file
        } else {
            &node.loc.presumed_file
        };
        if !file.is_empty() {
            match self.scope.resolve(file) {
                Some(relative) => {
                    if relative.len() > MAX_FILE_LEN {
                        return Err(ScanError::StringTooLong {
                            what: "file path",
                            limit: MAX_FILE_LEN,
                        });
                    }
                    self.current_file.clear();
                    self.current_file.push_str(&relative);
                },
                None => self.current_file.clear(),
            }
        }
        if !self.current_file.is_empty() {
            let line = if node.loc.presumed_line.is_empty() {
                &node.loc.line
            } else {
                &node.loc.presumed_line
            };
            if !line.is_empty() {
                if line.len() > MAX_LINE_LEN {
                    return Err(ScanError::StringTooLong {
                        what: "line number",
                        limit: MAX_LINE_LEN,
                    });
                }
                self.current_line.clear();
                self.current_line.push_str(line);
            }
        }
        Ok(())
    }

    fn intern_primary(&mut self, col: &str) -> StrId {
        let Self {
            pool,
            scratch,
            current_file,
            current_line,
            ..
        } = self;
        scratch.clear();
        scratch.push_str(current_file);
        scratch.push(':');
        scratch.push_str(current_line);
        scratch.push(':');
        scratch.push_str(col);
        pool.intern(scratch)
    }

    /// Intern the macro-spelling location, when the node has one. Absent
    /// spelling fields fall back to the inherited cursors; a spelling file
    /// that resolves out of scope drops the secondary location entirely.
    fn intern_spelling(&mut self, node: &AstNode) -> Option<StrId> {
        if node.spelling.col.is_empty() {
            return None;
        }
        let Self {
            scope,
            pool,
            scratch,
            current_file,
            current_line,
            ..
        } = self;
        let resolved;
        let file: &str = if node.spelling.file.is_empty() {
            current_file
        } else {
            resolved = scope.resolve(&node.spelling.file)?;
            &resolved
        };
        let line: &str = if node.spelling.line.is_empty() {
            current_line
        } else {
            &node.spelling.line
        };
        scratch.clear();
        scratch.push_str(file);
        scratch.push(':');
        scratch.push_str(line);
        scratch.push(':');
        scratch.push_str(&node.spelling.col);
        Some(pool.intern(scratch))
    }

    /// Step 4: bind `id` to its handles. Two nodes sharing an id must agree
    /// on the location; disagreement is a bug in this analyzer, not in the
    /// input.
    fn record(&mut self, id: u64, loc: StrId, spelling: Option<StrId>) {
        match self.id_to_loc.entry(id) {
            Entry::Occupied(existing) => assert_eq!(
                *existing.get(),
                loc,
                "node 0x{id:x} resolved to conflicting locations"
            ),
            Entry::Vacant(slot) => {
                slot.insert(loc);
            },
        }
        let Some(spelling) = spelling else { return };
        match self.id_to_spelling.entry(id) {
            Entry::Occupied(existing) => assert_eq!(
                *existing.get(),
                spelling,
                "node 0x{id:x} resolved to conflicting spelling locations"
            ),
            Entry::Vacant(slot) => {
                slot.insert(spelling);
            },
        }
    }
}

impl NodeSink for UsageAnalyzer {
    fn node(&mut self, node: &AstNode) -> Result<(), ScanError> {
        self.inherit(node)?;

        if decl_kind(&node.kind).is_none() {
            return Ok(());
        }
        // Compiler builtins carry no location at all.
        if self.current_file.is_empty() || self.current_line.is_empty() || node.loc.col.is_empty() {
            return Ok(());
        }
        // Synthesized declarations (defaulted constructors, lambda __invoke
        // thunks) and `= delete` declarations cannot meaningfully be unused.
        if node.is_implicit || node.is_explicitly_deleted {
            return Ok(());
        }
        let Some(id) = parse_node_id(&node.id) else {
            return Ok(());
        };

        let (loc, spelling) = if node.previous_decl.is_empty() {
            let loc = self.intern_primary(&node.loc.col);
            (loc, self.intern_spelling(node))
        } else {
            // This node is the definition of an earlier prototype: reuse
            // the prototype's location so both reconcile to one record.
            let Some(previous) = parse_node_id(&node.previous_decl) else {
                return Ok(());
            };
            match self.id_to_loc.get(&previous) {
                Some(&loc) => (loc, self.id_to_spelling.get(&previous).copied()),
                None => {
                    // clang occasionally emits a back-reference to a node
                    // it never printed; those nodes are dropped.
                    warn!("dangling previousDecl 0x{:x}, dropping node 0x{:x}", previous, id);
                    return Ok(());
                },
            }
        };

        self.record(id, loc, spelling);

        if node.is_used || node.mangled_name == "main" {
            self.used.insert(loc);
            if let Some(spelling) = spelling {
                self.used.insert(spelling);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/src/usage/analyzer_tests.rs"]
mod tests;
