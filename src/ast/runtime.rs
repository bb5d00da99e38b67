use super::ast::ASTNode;
use crate::error::Result;
use serde_json::{Map, Value};

/// Runtime component attached to an [ASTNode].
///
/// The parser only stores attachments and drops them again when a node's kind
/// is rewritten; interpreting a parse tree through `validate` and `eval` is
/// entirely the concern of downstream users.
pub trait Runtime {
    /// Validate this runtime component and all its child components.
    fn validate(&self) -> Result<()>;

    /// Evaluate this runtime component.
    fn eval(&self) -> Result<Map<String, Value>>;
}

/// Provides runtime components for a parse tree.
///
/// When a provider is passed to [`super::parse_with_runtime`] it is asked for
/// an attachment once per node creation and once more whenever a node's kind
/// is rewritten in place (the stale attachment is dropped first).
pub trait RuntimeProvider {
    /// Returns a runtime component for a given node.
    fn runtime(&self, node: &ASTNode) -> Box<dyn Runtime>;
}
