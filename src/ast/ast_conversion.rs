//! Conversion between ASTs and the plain AST form.
//!
//! A plain AST is a nested, JSON-serializable map structure:
//!
//! ```json
//! {
//!     "name": "<node kind>",
//!     "value": "<node value, for value-bearing kinds>",
//!     "children": [ "<child nodes>" ]
//! }
//! ```

use super::ast::{ASTContext, ASTNode};
use super::ast_kind::NodeKind;
use super::lexer::Token;
use crate::error::{Error, Result};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

impl<'a> ASTNode<'a> {
    /// Returns this node and all its children as a plain AST.
    ///
    /// A plain AST only contains maps, lists, and strings and can be
    /// serialized with JSON. Child lists are omitted when empty; the `value`
    /// key is present exactly for value-bearing node kinds.
    pub fn plain(&self) -> Value {
        let mut map = Map::new();
        map.insert("name".to_string(), Value::String(self.kind.to_string()));

        if !self.children.is_empty() {
            let children: Vec<Value> = self.children.iter().map(ASTNode::plain).collect();
            map.insert("children".to_string(), Value::Array(children));
        }

        if self.kind.is_value_node() {
            map.insert(
                "value".to_string(),
                Value::String(self.token.value.to_string()),
            );
        }

        Value::Object(map)
    }
}

/// Nodes serialize as their plain AST form.
impl<'a> Serialize for ASTNode<'a> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("name", self.kind.as_str())?;
        if !self.children.is_empty() {
            map.serialize_entry("children", &self.children[..])?;
        }
        if self.kind.is_value_node() {
            map.serialize_entry("value", self.token.value)?;
        }
        map.end()
    }
}

/// Creates an AST from a plain AST.
///
/// A missing `name` key is an error, as is a missing `value` key on a
/// value-bearing node kind. Child order is preserved. The rebuilt nodes carry
/// [`super::TokenKind::General`] tokens without positions.
pub fn ast_from_plain<'a>(ctx: &'a ASTContext, plain: &Value) -> Result<ASTNode<'a>> {
    let Value::Object(map) = plain else {
        return Err(Error::Conversion(format!(
            "Found plain ast node without a name: {}",
            plain
        )));
    };

    let name = match map.get("name") {
        Some(name) => stringify(name),
        None => {
            return Err(Error::Conversion(format!(
                "Found plain ast node without a name: {}",
                plain
            )))
        }
    };
    let kind: NodeKind = name.parse()?;

    let value = map.get("value").map(stringify);
    if kind.is_value_node() && value.is_none() {
        return Err(Error::Conversion(format!(
            "Found plain ast value node without a value: {}",
            name
        )));
    }
    let token_value = match value {
        Some(value) => ctx.alloc_string(value),
        None => "",
    };

    let mut node = ASTNode::new(ctx, kind, Token::general(token_value));

    if let Some(children) = map.get("children") {
        let Value::Array(children) = children else {
            return Err(Error::Conversion(format!(
                "Found plain ast node with invalid children: {}",
                name
            )));
        };
        for child in children {
            node.children.push(ast_from_plain(ctx, child)?);
        }
    }

    Ok(node)
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::super::parser::parse;
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_ast_shape() {
        let input = "query {\n  likeStory(storyID: 12345) {\n    story {\n      likeCount\n    }\n  }\n}\n";
        let ctx = ASTContext::new();
        let ast = parse(&ctx, "mytest", input).unwrap();

        let expected = json!({
            "name": "Document",
            "children": [
                {
                    "name": "ExecutableDefinition",
                    "children": [
                        {
                            "name": "OperationDefinition",
                            "children": [
                                {
                                    "name": "OperationType",
                                    "value": "query"
                                },
                                {
                                    "name": "SelectionSet",
                                    "children": [
                                        {
                                            "name": "Field",
                                            "children": [
                                                {
                                                    "name": "Name",
                                                    "value": "likeStory"
                                                },
                                                {
                                                    "name": "Arguments",
                                                    "children": [
                                                        {
                                                            "name": "Argument",
                                                            "children": [
                                                                {
                                                                    "name": "Name",
                                                                    "value": "storyID"
                                                                },
                                                                {
                                                                    "name": "Value",
                                                                    "value": "12345"
                                                                }
                                                            ]
                                                        }
                                                    ]
                                                },
                                                {
                                                    "name": "SelectionSet",
                                                    "children": [
                                                        {
                                                            "name": "Field",
                                                            "children": [
                                                                {
                                                                    "name": "Name",
                                                                    "value": "story"
                                                                },
                                                                {
                                                                    "name": "SelectionSet",
                                                                    "children": [
                                                                        {
                                                                            "name": "Field",
                                                                            "children": [
                                                                                {
                                                                                    "name": "Name",
                                                                                    "value": "likeCount"
                                                                                }
                                                                            ]
                                                                        }
                                                                    ]
                                                                }
                                                            ]
                                                        }
                                                    ]
                                                }
                                            ]
                                        }
                                    ]
                                }
                            ]
                        }
                    ]
                }
            ]
        });

        assert_eq!(ast.plain(), expected);

        // Serialize produces the same plain form
        assert_eq!(serde_json::to_value(&ast).unwrap(), expected);
    }

    #[test]
    fn plain_round_trip() {
        let input = "query Q($d: Int, $f: bar=123) {\n  user(id: 4) @include(if: true) {\n    ...G\n    ... on User {\n      id\n    }\n  }\n}";
        let ctx = ASTContext::new();
        let ast = parse(&ctx, "mytest", input).unwrap();

        let rebuilt = ast_from_plain(&ctx, &ast.plain()).unwrap();
        assert_eq!(ast.to_string(), rebuilt.to_string());
        assert_eq!(ast.plain(), rebuilt.plain());
    }

    #[test]
    fn conversion_errors() {
        let ctx = ASTContext::new();
        let ast = parse(&ctx, "mytest", "{ a }").unwrap();
        let mut plain = ast.plain();

        plain["children"][0]["name"] = json!("Value");
        let err = ast_from_plain(&ctx, &plain).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Found plain ast value node without a value: Value"
        );

        plain["children"][0].as_object_mut().unwrap().remove("name");
        let err = ast_from_plain(&ctx, &plain).unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Found plain ast node without a name"));

        let err = ast_from_plain(&ctx, &json!({ "name": "NotAKind" })).unwrap_err();
        assert!(err.to_string().contains("unknown name"));
    }
}
