//! `graphql_ast`
//! =========
//!
//! _A GraphQL query language front-end: lexer, Pratt parser, and
//! pretty-printer over a generic AST._
//!
//! The **`graphql_ast`** library converts GraphQL (June 2018) source text into
//! a typed abstract syntax tree and back. Given valid input it produces a
//! tree whose structure mirrors the GraphQL grammar; given invalid input it
//! produces a single precise diagnostic with the source name, error kind,
//! offending token, and its line and column.
//!
//! The lexer is a UTF-8 rune-by-rune scanner with multi-rune lookahead,
//! block-string normalization, and escape handling. The parser is a top-down
//! operator precedence (Pratt) parser with only null denotations, since
//! GraphQL has no infix operators; context flags switch the meaning of `{`,
//! `(`, and `...` while values and variable definitions are parsed. The
//! pretty-printer produces canonical source whose re-parse yields a
//! structurally identical AST.
//!
//! The AST is deliberately generic: one node shape with a kind tag, the
//! originating token, and ordered children. A reversible plain form (nested
//! maps and lists) makes documents easy to serialize and rebuild, and an
//! optional [`ast::RuntimeProvider`] hook lets downstream interpreters attach
//! runtime components to every node as it is created or rewritten.
//!
//! Schema handling, validation against a schema, and query execution are out
//! of scope.
//!
//! ```
//! use graphql_ast::ast::*;
//!
//! let ctx = ASTContext::new();
//!
//! let ast = parse(&ctx, "demo", "query Q { user(id: 4) { name } }").unwrap();
//! assert_eq!(
//!     pretty_print(&ast).unwrap(),
//!     "query Q {\n  user(id: 4) {\n    name\n  }\n}"
//! );
//! ```

pub mod ast;
pub mod error;

pub use bumpalo;
