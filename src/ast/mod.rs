//! # GraphQL Query Language AST
//!
//! The `graphql_ast::ast` module contains the GraphQL query language AST and
//! the functions to lex, parse, and print it. This crate is specialized to
//! the executable side of the GraphQL June 2018 language: operations and
//! fragments, as clients send them to a GraphQL service.
//!
//! Unlike typed ASTs, every node here has the same shape: a [NodeKind] tag,
//! the [Token] it originates from, and an ordered child list. This keeps the
//! tree trivially serializable (see [`ASTNode::plain`] and [ast_from_plain])
//! and lets external runtimes attach behavior per node via [RuntimeProvider].
//!
//! Its three main parts are:
//! - [`ASTContext`], a context containing an arena that defines the lifetime
//!   of an AST
//! - [`parse`] (and [`parse_with_runtime`]), which turn source text into a
//!   `Document` AST
//! - [`pretty_print`], which turns an AST back into canonical source text
//!
//! The following describes the minimum done using this module while an AST
//! context is active in the given scope:
//!
//! ```
//! use graphql_ast::ast::*;
//!
//! // Create an AST Context for a document
//! let ctx = ASTContext::new();
//!
//! // Parse a source text into a Document AST root node
//! let ast = parse(&ctx, "demo", "{ field }").unwrap();
//!
//! // Print the Document node back to canonical source text
//! assert_eq!(pretty_print(&ast).unwrap(), "{\n  field\n}");
//! ```

#[allow(clippy::module_inception)]
mod ast;

mod ast_conversion;
mod ast_kind;
mod lexer;
mod parser;
mod printer;
mod runtime;

pub use ast::*;
pub use ast_conversion::ast_from_plain;
pub use ast_kind::NodeKind;
pub use lexer::{lex, lex_to_list, Lexer, Token, TokenKind};
pub use parser::{parse, parse_with_runtime};
pub use printer::pretty_print;
pub use runtime::{Runtime, RuntimeProvider};
