use super::ast::ASTNode;
use super::ast_kind::NodeKind;
use crate::error::{Error, Result};

/// The level of indentation the pretty printer uses.
const INDENTATION_LEVEL: usize = 2;

/// Produces pretty printed GraphQL source from a given AST.
///
/// The output, fed back through the parser, yields a structurally identical
/// AST. Printing fails only for node kind and child count combinations that
/// cannot occur in parsed documents.
pub fn pretty_print(ast: &ASTNode) -> Result<String> {
    let mut path = vec![ast.kind];
    let res = visit(ast, &mut path)?;
    Ok(res.trim().to_string())
}

fn visit(ast: &ASTNode, path: &mut Vec<NodeKind>) -> Result<String> {
    // Handle special cases which don't have children but values

    match ast.kind {
        NodeKind::Value => {
            let val = ast.token.value;
            let is_num = val.parse::<f64>().is_ok();
            let is_const = matches!(val, "true" | "false" | "null");
            return Ok(quote_value(val, is_const || is_num));
        }
        NodeKind::Variable => return Ok(format!("${}", ast.token.value)),
        NodeKind::Alias => return Ok(format!("{} :", ast.token.value)),
        NodeKind::FragmentSpread => {
            let out = format!("...{}\n", ast.token.value);
            return Ok(pp_post_processing(ast.kind, path, out));
        }
        NodeKind::TypeCondition => return Ok(format!("on {}", ast.token.value)),
        NodeKind::DefaultValue => return Ok(format!("={}", ast.token.value)),
        _ => {}
    }

    // Pretty print children first

    let mut children: Vec<String> = Vec::with_capacity(ast.children.len());
    for child in ast.children.iter() {
        path.push(child.kind);
        let res = visit(child, path);
        path.pop();
        children.push(res?);
    }

    // Handle special cases requiring children

    let out = match ast.kind {
        NodeKind::Document => pp_post_processing(ast.kind, path, join_children(ast, &children, "\n\n")),

        NodeKind::OperationType
        | NodeKind::Name
        | NodeKind::FragmentName
        | NodeKind::Type
        | NodeKind::EnumValue => ast.token.value.to_string(),

        NodeKind::Arguments | NodeKind::VariableDefinitions => {
            let out = format!("({})", children.join(", "));
            pp_post_processing(ast.kind, path, out)
        }

        NodeKind::ListValue => {
            let out = format!("[{}]", children.join(", "));
            pp_post_processing(ast.kind, path, out)
        }

        NodeKind::SelectionSet => {
            let out = format!("{{\n{}}}", children.concat());
            pp_post_processing(ast.kind, path, out)
        }

        NodeKind::ObjectValue => {
            let out = format!("{{{}}}", children.join(", "));
            pp_post_processing(ast.kind, path, out)
        }

        NodeKind::ObjectField => {
            let value = children.first().map(String::as_str).unwrap_or("");
            return Ok(format!("{} : {}", ast.token.value, value));
        }

        NodeKind::Field => {
            let mut out = join_children(ast, &children, " ");
            if !children.is_empty() {
                out.push('\n');
            }
            pp_post_processing(ast.kind, path, out)
        }

        NodeKind::Directives => {
            pp_post_processing(ast.kind, path, join_children(ast, &children, " "))
        }

        // Templated shapes, selected by node kind and child count
        kind => {
            let out = match (kind, children.len()) {
                (NodeKind::Argument, 2) => format!("{}: {}", children[0], children[1]),
                (NodeKind::OperationDefinition, 1..=5) => children.join(" "),
                (NodeKind::FragmentDefinition, 3..=4) => {
                    format!("fragment {}", children.join(" "))
                }
                (NodeKind::InlineFragment, 1..=3) => format!("... {}\n", children.join(" ")),
                (NodeKind::ExecutableDefinition, 1) => children[0].clone(),
                (NodeKind::VariableDefinition, 2) => format!("{}: {}", children[0], children[1]),
                (NodeKind::VariableDefinition, 3) => {
                    format!("{}: {}{}", children[0], children[1], children[2])
                }
                (NodeKind::Directive, 1) => format!("@{}", children[0]),
                (NodeKind::Directive, 2) => format!("@{}{}", children[0], children[1]),
                (kind, len) => {
                    let tempkey = if len > 0 {
                        format!("{}_{}", kind, len)
                    } else {
                        kind.to_string()
                    };
                    return Err(Error::Print(format!(
                        "Could not find template for {} (tempkey: {})",
                        kind, tempkey
                    )));
                }
            };
            pp_post_processing(ast.kind, path, out)
        }
    };

    Ok(out)
}

/// Joins printed children with a separator, except in front of an `Arguments`
/// child, which attaches directly to what precedes it.
fn join_children(ast: &ASTNode, children: &[String], separator: &str) -> String {
    let mut buf = String::new();
    for (i, child) in children.iter().enumerate() {
        buf.push_str(child);
        if i + 1 < children.len() && ast.children[i + 1].kind != NodeKind::Arguments {
            buf.push_str(separator);
        }
    }
    buf
}

/// Applies post processing rules: selections are indented relative to their
/// parent, and trailing whitespace is stripped from every line.
fn pp_post_processing(kind: NodeKind, path: &[NodeKind], input: String) -> String {
    let mut ret = input;

    if path.len() > 1
        && matches!(
            kind,
            NodeKind::Field | NodeKind::FragmentSpread | NodeKind::InlineFragment
        )
    {
        let indent = " ".repeat(INDENTATION_LEVEL);
        ret = ret.replace('\n', &format!("\n{}", indent));
        ret = format!("{}{}", indent, ret);

        // Remove indentation from the last line so the closing bracket sits
        // at the parent's indent, unless the containing selection set belongs
        // to a field or operation definition
        let grandparent = path.len().checked_sub(3).map(|i| path[i]);
        if !matches!(
            grandparent,
            Some(NodeKind::Field | NodeKind::OperationDefinition)
        ) {
            if let Some(idx) = ret.rfind('\n') {
                if ret.len() >= idx + 1 + INDENTATION_LEVEL {
                    ret = format!("{}{}", &ret[..idx + 1], &ret[idx + 1 + INDENTATION_LEVEL..]);
                }
            }
        }
    }

    // Remove all trailing spaces
    let lines: Vec<&str> = ret.split('\n').map(str::trim_end).collect();
    lines.join("\n")
}

/// Emits a value bare when it is a number or inline-safe identifier and
/// non-quotation is allowed; quotes it otherwise. Embedded quotes are
/// escaped, and values containing a newline print as block strings.
fn quote_value(val: &str, allow_non_quotation: bool) -> String {
    if val.is_empty() {
        return "\"\"".to_string();
    }

    let mut chars = val.chars();
    let is_number = matches!(chars.next(), Some(r) if r.is_ascii_digit())
        && chars.all(|r| r.is_ascii_digit() || matches!(r, '.' | 'e' | '-' | '+'));
    let is_inline_string = val
        .chars()
        .all(|r| r.is_ascii_alphanumeric() || matches!(r, '_' | ':' | '.'));

    if allow_non_quotation && (is_number || is_inline_string) {
        return val.to_string();
    }

    let val = if val.contains('"') {
        val.replace('"', "\\\"")
    } else {
        val.to_string()
    };
    if val.contains('\n') {
        format!("\"\"\"{}\"\"\"", val)
    } else {
        format!("\"{}\"", val)
    }
}
