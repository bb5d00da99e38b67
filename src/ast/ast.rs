use super::ast_kind::NodeKind;
use super::lexer::Token;
use super::runtime::Runtime;
use std::fmt;

/// A context for a GraphQL document which holds an arena allocator.
///
/// For the duration of lexing, parsing, and converting an AST it's performant
/// and convenient to allocate memory in one chunk for the AST's operations.
/// This context represents the lifetime of an AST and its derivatives: token
/// values either borrow from the source text or live on this arena, as do the
/// child lists of all nodes.
///
/// Once a document is done with, the entire allocated memory is dropped at
/// once, so it's inadvisable to reuse an AST Context across unrelated inputs.
pub struct ASTContext {
    /// An arena allocator that holds the memory allocated for the AST
    /// Context's lifetime
    pub arena: bumpalo::Bump,
}

impl ASTContext {
    /// Create a new AST context with a preallocated arena.
    pub fn new() -> Self {
        ASTContext {
            arena: bumpalo::Bump::new(),
        }
    }

    /// Put the value of `item` onto the arena and return a reference to it.
    #[inline]
    pub fn alloc<T>(&self, item: T) -> &T {
        self.arena.alloc(item)
    }

    /// Allocate an `&str` slice onto the arena and return a reference to it.
    ///
    /// This is useful when the original slice has an undefined lifetime.
    #[inline]
    pub fn alloc_str(&self, str: &str) -> &str {
        self.arena.alloc_str(str)
    }

    /// Puts a `String` onto the arena and returns a reference to it to tie the
    /// `String`'s lifetime to this AST context without reallocating or copying
    /// it.
    #[inline]
    pub fn alloc_string(&self, str: String) -> &str {
        self.arena.alloc(str)
    }
}

impl Default for ASTContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A node in the AST.
///
/// Every node has the same shape: a [NodeKind] tag, the lexer token it
/// originates from (which carries the value for value-bearing kinds and the
/// location for all kinds), an ordered child list, and an optional opaque
/// runtime attachment supplied by a [`super::RuntimeProvider`].
///
/// The [`fmt::Display`] implementation renders the node and its subtree as an
/// indented tree, one node per line, with value-bearing nodes rendered as
/// `Kind: value`.
pub struct ASTNode<'a> {
    /// Kind of the node.
    pub kind: NodeKind,
    /// Lexer token of this node.
    pub token: Token<'a>,
    /// Child nodes.
    pub children: bumpalo::collections::Vec<'a, ASTNode<'a>>,
    /// Runtime component for this node. The parser stores and invalidates
    /// this; it never introspects or invokes it.
    pub runtime: Option<Box<dyn Runtime>>,
}

impl<'a> ASTNode<'a> {
    /// Create a node of the given kind without a runtime attachment.
    pub fn new(ctx: &'a ASTContext, kind: NodeKind, token: Token<'a>) -> Self {
        ASTNode {
            kind,
            token,
            children: bumpalo::collections::Vec::new_in(&ctx.arena),
            runtime: None,
        }
    }

    fn level_string(&self, indent: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..indent {
            f.write_str("  ")?;
        }
        if self.kind.is_value_node() {
            writeln!(f, "{}: {}", self.kind, self.token.value)?;
        } else {
            writeln!(f, "{}", self.kind)?;
        }
        for child in self.children.iter() {
            child.level_string(indent + 1, f)?;
        }
        Ok(())
    }
}

impl<'a> fmt::Display for ASTNode<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.level_string(0, f)
    }
}

impl<'a> fmt::Debug for ASTNode<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
