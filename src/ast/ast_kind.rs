use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// The closed set of AST node kinds.
///
/// Each kind's [`fmt::Display`] form is the wire-stable string that appears in
/// the tree rendering of an AST and in the `name` field of the plain AST.
/// [`NodeKind::from_str`] accepts exactly those strings.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum NodeKind {
    Alias,
    Argument,
    Arguments,
    DefaultValue,
    Directive,
    Directives,
    Document,
    EnumValue,
    EOF,
    ExecutableDefinition,
    Field,
    FragmentDefinition,
    FragmentName,
    FragmentSpread,
    InlineFragment,
    ListValue,
    Name,
    ObjectField,
    ObjectValue,
    OperationDefinition,
    OperationType,
    SelectionSet,
    Type,
    TypeCondition,
    Value,
    Variable,
    VariableDefinition,
    VariableDefinitions,
}

impl NodeKind {
    /// The wire-stable name of this node kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Alias => "Alias",
            NodeKind::Argument => "Argument",
            NodeKind::Arguments => "Arguments",
            NodeKind::DefaultValue => "DefaultValue",
            NodeKind::Directive => "Directive",
            NodeKind::Directives => "Directives",
            NodeKind::Document => "Document",
            NodeKind::EnumValue => "EnumValue",
            NodeKind::EOF => "EOF",
            NodeKind::ExecutableDefinition => "ExecutableDefinition",
            NodeKind::Field => "Field",
            NodeKind::FragmentDefinition => "FragmentDefinition",
            NodeKind::FragmentName => "FragmentName",
            NodeKind::FragmentSpread => "FragmentSpread",
            NodeKind::InlineFragment => "InlineFragment",
            NodeKind::ListValue => "ListValue",
            NodeKind::Name => "Name",
            NodeKind::ObjectField => "ObjectField",
            NodeKind::ObjectValue => "ObjectValue",
            NodeKind::OperationDefinition => "OperationDefinition",
            NodeKind::OperationType => "OperationType",
            NodeKind::SelectionSet => "SelectionSet",
            NodeKind::Type => "Type",
            NodeKind::TypeCondition => "TypeCondition",
            NodeKind::Value => "Value",
            NodeKind::Variable => "Variable",
            NodeKind::VariableDefinition => "VariableDefinition",
            NodeKind::VariableDefinitions => "VariableDefinitions",
        }
    }

    /// Whether nodes of this kind carry a significant value in their token.
    ///
    /// Value-bearing nodes serialize their token value into the plain AST and
    /// render as `Kind: value` in the tree form.
    pub fn is_value_node(&self) -> bool {
        matches!(
            self,
            NodeKind::Alias
                | NodeKind::DefaultValue
                | NodeKind::EnumValue
                | NodeKind::FragmentName
                | NodeKind::FragmentSpread
                | NodeKind::Name
                | NodeKind::ObjectField
                | NodeKind::OperationType
                | NodeKind::Type
                | NodeKind::TypeCondition
                | NodeKind::Value
                | NodeKind::Variable
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Alias" => Ok(NodeKind::Alias),
            "Argument" => Ok(NodeKind::Argument),
            "Arguments" => Ok(NodeKind::Arguments),
            "DefaultValue" => Ok(NodeKind::DefaultValue),
            "Directive" => Ok(NodeKind::Directive),
            "Directives" => Ok(NodeKind::Directives),
            "Document" => Ok(NodeKind::Document),
            "EnumValue" => Ok(NodeKind::EnumValue),
            "EOF" => Ok(NodeKind::EOF),
            "ExecutableDefinition" => Ok(NodeKind::ExecutableDefinition),
            "Field" => Ok(NodeKind::Field),
            "FragmentDefinition" => Ok(NodeKind::FragmentDefinition),
            "FragmentName" => Ok(NodeKind::FragmentName),
            "FragmentSpread" => Ok(NodeKind::FragmentSpread),
            "InlineFragment" => Ok(NodeKind::InlineFragment),
            "ListValue" => Ok(NodeKind::ListValue),
            "Name" => Ok(NodeKind::Name),
            "ObjectField" => Ok(NodeKind::ObjectField),
            "ObjectValue" => Ok(NodeKind::ObjectValue),
            "OperationDefinition" => Ok(NodeKind::OperationDefinition),
            "OperationType" => Ok(NodeKind::OperationType),
            "SelectionSet" => Ok(NodeKind::SelectionSet),
            "Type" => Ok(NodeKind::Type),
            "TypeCondition" => Ok(NodeKind::TypeCondition),
            "Value" => Ok(NodeKind::Value),
            "Variable" => Ok(NodeKind::Variable),
            "VariableDefinition" => Ok(NodeKind::VariableDefinition),
            "VariableDefinitions" => Ok(NodeKind::VariableDefinitions),
            _ => Err(Error::Conversion(format!(
                "Found plain ast node with an unknown name: {}",
                s
            ))),
        }
    }
}
