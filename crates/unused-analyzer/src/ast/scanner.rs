use std::io::Read;

use super::error::ScanError;
use super::tokenizer::{JsonTokenizer, Token, append_unescaped};
use super::{AstNode, NodeSink};

/// Which `loc`-shaped object the current fields belong to.
///
/// `expansionLoc` fields fold into the primary location (where the macro
/// was invoked); `spellingLoc` fields populate the secondary location
/// (where the expanded text is spelled).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LocCtx {
    Top,
    Expansion,
    Spelling,
}

#[derive(Debug, Clone, Copy)]
enum NodeField {
    Id,
    Kind,
    PreviousDecl,
    MangledName,
}

#[derive(Debug, Clone, Copy)]
enum LocField {
    File,
    Line,
    PresumedFile,
    PresumedLine,
    Col,
}

#[derive(Debug, Clone, Copy)]
enum FlagField {
    IsUsed,
    IsImplicit,
    IsExplicitlyDeleted,
}

#[derive(Debug, Clone, Copy)]
enum IgnoreReturn {
    Node,
    NodeLoc(LocCtx),
}

#[derive(Debug, Clone, Copy)]
enum State {
    /// Between node objects: before the root, between elements of an
    /// `inner` array, or unwinding the closers of already-flushed parents.
    OutsideNode,
    /// Inside a node object, expecting a key or the closing brace.
    Node,
    /// Inside a `loc`-shaped object.
    NodeLoc(LocCtx),
    /// Landing states: consume exactly one token into a registered
    /// destination, then return to the stored continuation.
    ExpectNodeScalar(NodeField),
    ExpectLocScalar(LocCtx, LocField),
    ExpectBool(FlagField),
    ExpectLocObject,
    ExpectNestedLoc(LocCtx),
    ExpectInnerArray,
    /// Swallow exactly one value of any shape, tracked by a depth counter.
    Ignore(IgnoreReturn),
}

/// The per-node state machine. Split from the tokenizer so a live token
/// slice and the mutable node scratch can coexist.
struct NodeMachine {
    node: AstNode,
    state: State,
    ignore_depth: u32,
    flushed: u64,
}

impl NodeMachine {
    fn new() -> Self {
        Self {
            node: AstNode::default(),
            state: State::OutsideNode,
            ignore_depth: 0,
            flushed: 0,
        }
    }

    fn flush(&mut self, sink: &mut impl NodeSink) -> Result<(), ScanError> {
        self.flushed += 1;
        sink.node(&self.node)
    }

    fn step(
        &mut self,
        token: Token<'_>,
        line: u64,
        col: u64,
        sink: &mut impl NodeSink,
    ) -> Result<(), ScanError> {
        match self.state {
            State::OutsideNode => match token {
                Token::ObjectBegin => {
                    self.node.clear();
                    self.state = State::Node;
                },
                // Closers for an `inner` array or for a parent that was
                // already flushed when its `inner` key appeared.
                Token::ObjectEnd | Token::ArrayEnd => {},
                _ => return Err(ScanError::ExpectedNode { line, col }),
            },

            State::Node => match token {
                Token::ObjectEnd => {
                    self.flush(sink)?;
                    self.state = State::OutsideNode;
                },
                Token::Str { raw, escaped } => {
                    if escaped {
                        return Err(ScanError::UnsupportedObjectKeyEscapes { line, col });
                    }
                    self.state = match raw {
                        b"id" => State::ExpectNodeScalar(NodeField::Id),
                        b"kind" => State::ExpectNodeScalar(NodeField::Kind),
                        b"previousDecl" => State::ExpectNodeScalar(NodeField::PreviousDecl),
                        b"mangledName" => State::ExpectNodeScalar(NodeField::MangledName),
                        b"loc" => State::ExpectLocObject,
                        b"isUsed" => State::ExpectBool(FlagField::IsUsed),
                        b"isImplicit" => State::ExpectBool(FlagField::IsImplicit),
                        b"explicitlyDeleted" => State::ExpectBool(FlagField::IsExplicitlyDeleted),
                        b"inner" => {
                            // Children follow; flush the parent now so the
                            // sink sees the tree in pre-order.
                            self.flush(sink)?;
                            State::ExpectInnerArray
                        },
                        _ => {
                            self.ignore_depth = 0;
                            State::Ignore(IgnoreReturn::Node)
                        },
                    };
                },
                _ => return Err(ScanError::UnexpectedToken { line, col }),
            },

            State::NodeLoc(ctx) => match token {
                Token::ObjectEnd => {
                    self.state = match ctx {
                        LocCtx::Top => State::Node,
                        LocCtx::Expansion | LocCtx::Spelling => State::NodeLoc(LocCtx::Top),
                    };
                },
                Token::Str { raw, escaped } => {
                    if escaped {
                        return Err(ScanError::UnsupportedObjectKeyEscapes { line, col });
                    }
                    self.state = match raw {
                        b"file" => State::ExpectLocScalar(ctx, LocField::File),
                        b"line" => State::ExpectLocScalar(ctx, LocField::Line),
                        b"presumedFile" => State::ExpectLocScalar(ctx, LocField::PresumedFile),
                        b"presumedLine" => State::ExpectLocScalar(ctx, LocField::PresumedLine),
                        b"col" => State::ExpectLocScalar(ctx, LocField::Col),
                        // The nested forms never recurse in clang's output.
                        b"expansionLoc" if ctx == LocCtx::Top => {
                            State::ExpectNestedLoc(LocCtx::Expansion)
                        },
                        b"spellingLoc" if ctx == LocCtx::Top => {
                            State::ExpectNestedLoc(LocCtx::Spelling)
                        },
                        _ => {
                            self.ignore_depth = 0;
                            State::Ignore(IgnoreReturn::NodeLoc(ctx))
                        },
                    };
                },
                _ => return Err(ScanError::UnexpectedToken { line, col }),
            },

            State::ExpectNodeScalar(field) => {
                let dest = match field {
                    NodeField::Id => &mut self.node.id,
                    NodeField::Kind => &mut self.node.kind,
                    NodeField::PreviousDecl => &mut self.node.previous_decl,
                    NodeField::MangledName => &mut self.node.mangled_name,
                };
                write_scalar(dest, token, line, col)?;
                self.state = State::Node;
            },

            State::ExpectLocScalar(ctx, field) => {
                let loc = match ctx {
                    LocCtx::Top | LocCtx::Expansion => &mut self.node.loc,
                    LocCtx::Spelling => &mut self.node.spelling,
                };
                let dest = match field {
                    LocField::File => &mut loc.file,
                    LocField::Line => &mut loc.line,
                    LocField::PresumedFile => &mut loc.presumed_file,
                    LocField::PresumedLine => &mut loc.presumed_line,
                    LocField::Col => &mut loc.col,
                };
                write_scalar(dest, token, line, col)?;
                self.state = State::NodeLoc(ctx);
            },

            State::ExpectBool(flag) => {
                let value = match token {
                    Token::True => true,
                    Token::False => false,
                    _ => return Err(ScanError::ExpectedBool { line, col }),
                };
                match flag {
                    FlagField::IsUsed => self.node.is_used = value,
                    FlagField::IsImplicit => self.node.is_implicit = value,
                    FlagField::IsExplicitlyDeleted => self.node.is_explicitly_deleted = value,
                }
                self.state = State::Node;
            },

            State::ExpectLocObject => match token {
                Token::ObjectBegin => self.state = State::NodeLoc(LocCtx::Top),
                _ => return Err(ScanError::ExpectedObject { line, col }),
            },

            State::ExpectNestedLoc(ctx) => match token {
                Token::ObjectBegin => self.state = State::NodeLoc(ctx),
                _ => return Err(ScanError::ExpectedObject { line, col }),
            },

            State::ExpectInnerArray => match token {
                Token::ArrayBegin => self.state = State::OutsideNode,
                _ => return Err(ScanError::ExpectedArray { line, col }),
            },

            State::Ignore(ret) => {
                match token {
                    Token::ObjectBegin | Token::ArrayBegin => self.ignore_depth += 1,
                    Token::ObjectEnd | Token::ArrayEnd => {
                        if self.ignore_depth == 0 {
                            return Err(ScanError::UnexpectedToken { line, col });
                        }
                        self.ignore_depth -= 1;
                    },
                    _ => {},
                }
                if self.ignore_depth == 0 {
                    self.state = match ret {
                        IgnoreReturn::Node => State::Node,
                        IgnoreReturn::NodeLoc(ctx) => State::NodeLoc(ctx),
                    };
                }
            },
        }
        Ok(())
    }
}

fn write_scalar(dest: &mut String, token: Token<'_>, line: u64, col: u64) -> Result<(), ScanError> {
    dest.clear();
    match token {
        Token::Str { raw, escaped } => {
            if escaped {
                append_unescaped(dest, raw);
            } else {
                dest.push_str(&String::from_utf8_lossy(raw));
            }
            Ok(())
        },
        Token::Number(raw) => {
            dest.push_str(&String::from_utf8_lossy(raw));
            Ok(())
        },
        _ => Err(ScanError::ExpectedStringOrNumber { line, col }),
    }
}

/// Push-parser over a byte producer. Drives the tokenizer, tracks overall
/// nesting, and delegates per-node work to the state machine.
pub struct AstScanner<R> {
    tokens: JsonTokenizer<R>,
    machine: NodeMachine,
    depth: i64,
    seen_value: bool,
}

impl<R: Read> AstScanner<R> {
    pub fn new(reader: R) -> Self {
        Self {
            tokens: JsonTokenizer::new(reader),
            machine: NodeMachine::new(),
            depth: 0,
            seen_value: false,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_window(reader: R, window: usize) -> Self {
        Self {
            tokens: JsonTokenizer::with_window(reader, window),
            machine: NodeMachine::new(),
            depth: 0,
            seen_value: false,
        }
    }

    /// Nodes flushed so far. Equals the number of node objects consumed.
    pub fn nodes_flushed(&self) -> u64 {
        self.machine.flushed
    }

    /// Consume the whole stream, flushing each node to `sink`.
    pub fn run(&mut self, sink: &mut impl NodeSink) -> Result<(), ScanError> {
        loop {
            let Some((token, line, col)) = self.tokens.next()? else {
                break;
            };
            self.seen_value = true;
            match token {
                Token::ObjectBegin | Token::ArrayBegin => self.depth += 1,
                Token::ObjectEnd | Token::ArrayEnd => {
                    self.depth -= 1;
                    if self.depth < 0 {
                        return Err(ScanError::UnexpectedToken { line, col });
                    }
                },
                _ => {},
            }
            self.machine.step(token, line, col, sink)?;
        }
        if !self.seen_value || self.depth != 0 {
            let (line, col) = self.tokens.position();
            return Err(ScanError::UnexpectedEndOfInput { line, col });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/src/ast/scanner_tests.rs"]
mod tests;
