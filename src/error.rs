//! # Error and Result for this crate
//!
//! This crate defines a common [Error] structure that all fallible operations
//! return. Parse errors carry the source name and the exact line and column of
//! the token that triggered them; printer and plain-AST conversion errors are
//! plain messages.

use std::{error, fmt, result};

/// This crate's result type using the [Error] structure.
pub type Result<T> = result::Result<T, Error>;

/// The closed set of parse error kinds.
///
/// The [`fmt::Display`] form of each kind is stable and appears verbatim in
/// rendered parse errors.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ParseErrorKind {
    /// A terminator token (`}`, `:`, `)`, `=`, `]`) appeared at the head of an
    /// expression.
    ImpossibleNullDenotation,
    /// The lexer emitted an `Error` token; the detail carries its message.
    LexicalError,
    /// A Name token was required at this position.
    NameExpected,
    /// A fragment definition lacked its `on` type-condition introducer.
    OnExpected,
    /// A mandatory `{ … }` selection set was missing.
    SelectionSetExpected,
    /// A bare top-level selection set appeared next to another definition.
    MultipleShorthand,
    /// The input ended in the middle of a production.
    UnexpectedEnd,
    /// A token appeared where the grammar forbids it.
    UnexpectedToken,
    /// The dispatch table has no entry for the current token.
    UnknownToken,
    /// A `$name` variable was required (variable-definition list).
    VariableExpected,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::ImpossibleNullDenotation => {
                f.write_str("Term cannot start an expression")
            }
            ParseErrorKind::LexicalError => f.write_str("Lexical error"),
            ParseErrorKind::NameExpected => f.write_str("Name expected"),
            ParseErrorKind::OnExpected => {
                f.write_str("Type condition starting with 'on' expected")
            }
            ParseErrorKind::SelectionSetExpected => f.write_str("Selection Set expected"),
            ParseErrorKind::MultipleShorthand => {
                f.write_str("Query shorthand only allowed for one query operation")
            }
            ParseErrorKind::UnexpectedEnd => f.write_str("Unexpected end"),
            ParseErrorKind::UnexpectedToken => f.write_str("Unexpected term"),
            ParseErrorKind::UnknownToken => f.write_str("Unknown term"),
            ParseErrorKind::VariableExpected => f.write_str("Variable expected"),
        }
    }
}

/// This crate's error structure.
///
/// Parsing stops at the first error, so a failed parse yields exactly one
/// [`Error::Parse`] and no document.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Error {
    /// A parse error located at a concrete token of a named source.
    Parse {
        /// Name of the source which was given to the parser.
        source: String,
        /// The error kind, used for equality checks.
        kind: ParseErrorKind,
        /// Details of this error, e.g. the diagnostic form of the offending
        /// token. May be empty.
        detail: String,
        /// 1-based line of the error.
        line: usize,
        /// 1-based column of the error.
        pos: usize,
    },
    /// The pretty-printer found a node it has no rule for.
    Print(String),
    /// A plain AST could not be converted back into an AST.
    Conversion(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse {
                source,
                kind,
                detail,
                line,
                pos,
            } => {
                if detail.is_empty() {
                    write!(f, "Parse error in {}: {} (Line:{} Pos:{})", source, kind, line, pos)
                } else {
                    write!(
                        f,
                        "Parse error in {}: {} ({}) (Line:{} Pos:{})",
                        source, kind, detail, line, pos
                    )
                }
            }
            Error::Print(message) => f.write_str(message),
            Error::Conversion(message) => f.write_str(message),
        }
    }
}

impl error::Error for Error {}

impl Error {
    /// Returns the parse error kind if this is a parse error.
    pub fn parse_kind(&self) -> Option<ParseErrorKind> {
        match self {
            Error::Parse { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display() {
        let err = Error::Parse {
            source: "mytest".to_string(),
            kind: ParseErrorKind::VariableExpected,
            detail: "<foo>".to_string(),
            line: 1,
            pos: 8,
        };
        assert_eq!(
            err.to_string(),
            "Parse error in mytest: Variable expected (<foo>) (Line:1 Pos:8)"
        );
    }

    #[test]
    fn parse_error_display_without_detail() {
        let err = Error::Parse {
            source: "mytest".to_string(),
            kind: ParseErrorKind::UnexpectedEnd,
            detail: String::new(),
            line: 1,
            pos: 7,
        };
        assert_eq!(
            err.to_string(),
            "Parse error in mytest: Unexpected end (Line:1 Pos:7)"
        );
    }
}
