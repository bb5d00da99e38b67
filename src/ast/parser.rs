use super::ast::{ASTContext, ASTNode};
use super::ast_kind::NodeKind;
use super::lexer::{lex, Lexer, Token, TokenKind};
use super::runtime::RuntimeProvider;
use crate::error::{Error, ParseErrorKind, Result};

/// Parses an input into a [`NodeKind::Document`] AST.
///
/// The returned node owns the parse tree. On failure no tree is returned,
/// only an [`Error::Parse`] naming the source, the error kind, the offending
/// token, and its line and column.
pub fn parse<'a>(ctx: &'a ASTContext, name: &str, input: &str) -> Result<ASTNode<'a>> {
    parse_document(ctx, name, input, None)
}

/// Parses an input into a [`NodeKind::Document`] AST and decorates the
/// resulting parse tree with runtime components which can be used to
/// interpret the parsed query.
pub fn parse_with_runtime<'a>(
    ctx: &'a ASTContext,
    name: &str,
    input: &str,
    provider: &dyn RuntimeProvider,
) -> Result<ASTNode<'a>> {
    parse_document(ctx, name, input, Some(provider))
}

/// Null denotations: each dispatchable token carries the handler that parses
/// whatever follows it when it appears at the head of an expression. GraphQL
/// has no infix operators, so there are no left denotations.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum Nud {
    Term,
    OperationDefinition,
    FragmentDefinition,
    SelectionSet,
    ArgumentList,
    Directives,
    Variable,
    FragmentSpread,
    ListValue,
}

/// The parser's one-token lookahead: the token itself together with the node
/// kind and null denotation the dispatch table assigned to it. Terminator
/// tokens (`}`, `:`, `)`, `=`, `]`) carry neither.
#[derive(Clone)]
struct Lookahead<'a> {
    kind: Option<NodeKind>,
    nud: Option<Nud>,
    token: Token<'a>,
}

/// Maps a token to its node kind and null denotation.
///
/// Tokens dispatch by exact value first and by token kind second. While a
/// value is being parsed only punctuators dispatch by value, so that keywords
/// like `null`, `true`, or `query` classify as plain names; string tokens
/// never dispatch by value.
fn classify(token: &Token, is_value: bool) -> Option<(Option<NodeKind>, Option<Nud>)> {
    if (!is_value || token.kind == TokenKind::Punctuator) && token.kind != TokenKind::StringValue {
        match token.value {
            "query" | "mutation" | "subscription" => {
                return Some((
                    Some(NodeKind::OperationDefinition),
                    Some(Nud::OperationDefinition),
                ))
            }
            "fragment" => {
                return Some((
                    Some(NodeKind::FragmentDefinition),
                    Some(Nud::FragmentDefinition),
                ))
            }
            "{" => return Some((Some(NodeKind::SelectionSet), Some(Nud::SelectionSet))),
            "(" => return Some((Some(NodeKind::Arguments), Some(Nud::ArgumentList))),
            "@" => return Some((Some(NodeKind::Directives), Some(Nud::Directives))),
            "$" => return Some((Some(NodeKind::Variable), Some(Nud::Variable))),
            "..." => return Some((Some(NodeKind::FragmentSpread), Some(Nud::FragmentSpread))),
            "[" => return Some((Some(NodeKind::ListValue), Some(Nud::ListValue))),

            // Terminators close expressions but never start one
            "}" | ":" | ")" | "=" | "]" if token.kind == TokenKind::Punctuator => {
                return Some((None, None))
            }
            _ => {}
        }
    }
    match token.kind {
        TokenKind::Name => Some((Some(NodeKind::Name), Some(Nud::Term))),
        TokenKind::IntValue | TokenKind::StringValue | TokenKind::FloatValue => {
            Some((Some(NodeKind::Value), Some(Nud::Term)))
        }
        TokenKind::EOF => Some((Some(NodeKind::EOF), Some(Nud::Term))),
        _ => None,
    }
}

struct Parser<'a, 'p> {
    /// Name to identify the input
    name: String,
    ctx: &'a ASTContext,
    /// Token source feeding the parser
    tokens: Lexer<'a>,
    /// Current lookahead
    node: Lookahead<'a>,
    /// Runtime provider which creates runtime components
    provider: Option<&'p dyn RuntimeProvider>,

    // Context flags
    /// The next bracket list is parsed as variable definitions
    is_var_def: bool,
    /// The next expression is parsed as a value
    is_value: bool,
}

fn parse_document<'a>(
    ctx: &'a ASTContext,
    name: &str,
    input: &str,
    provider: Option<&dyn RuntimeProvider>,
) -> Result<ASTNode<'a>> {
    let source = ctx.alloc_str(input);
    let mut p = Parser {
        name: name.to_string(),
        ctx,
        tokens: lex(ctx, source),
        node: Lookahead {
            kind: None,
            nud: None,
            token: Token::general(""),
        },
        provider,
        is_var_def: false,
        is_value: false,
    };
    p.node = p.next()?;

    let mut doc = p.new_node(NodeKind::Document, p.node.token.clone());

    while p.node.kind != Some(NodeKind::EOF) {
        let node = p.run()?;

        match node.kind {
            NodeKind::SelectionSet => {
                // Query shorthand is only legal as the sole definition
                if !doc.children.is_empty() {
                    return Err(p.error(
                        ParseErrorKind::MultipleShorthand,
                        node.token.to_string(),
                        &node.token,
                    ));
                }
                let mut ed = p.new_node(NodeKind::ExecutableDefinition, node.token.clone());
                let mut od = p.new_node(NodeKind::OperationDefinition, node.token.clone());
                od.children.push(node);
                ed.children.push(od);
                doc.children.push(ed);
            }
            NodeKind::OperationDefinition | NodeKind::FragmentDefinition => {
                let mut ed = p.new_node(NodeKind::ExecutableDefinition, node.token.clone());
                ed.children.push(node);
                doc.children.push(ed);
            }
            _ => {
                return Err(p.error(
                    ParseErrorKind::UnexpectedToken,
                    node.token.value.to_string(),
                    &node.token,
                ));
            }
        }
    }

    Ok(doc)
}

impl<'a, 'p> Parser<'a, 'p> {
    fn error(&self, kind: ParseErrorKind, detail: String, token: &Token) -> Error {
        Error::Parse {
            source: self.name.clone(),
            kind,
            detail,
            line: token.line,
            pos: token.column,
        }
    }

    /// Creates a node and asks the runtime provider for its attachment.
    fn new_node(&self, kind: NodeKind, token: Token<'a>) -> ASTNode<'a> {
        let mut node = ASTNode::new(self.ctx, kind, token);
        if let Some(provider) = self.provider {
            node.runtime = Some(provider.runtime(&node));
        }
        node
    }

    /// Rewrites a node's kind in place. The stale runtime attachment is
    /// dropped and the provider is asked for a new one.
    fn change_node(&self, node: &mut ASTNode<'a>, kind: NodeKind) {
        node.kind = kind;
        node.runtime = None;
        if let Some(provider) = self.provider {
            let runtime = provider.runtime(node);
            node.runtime = Some(runtime);
        }
    }

    /// Materializes a lookahead into a tree node.
    fn node_from(&self, lookahead: &Lookahead<'a>) -> ASTNode<'a> {
        self.new_node(
            lookahead.kind.unwrap_or(NodeKind::Name),
            lookahead.token.clone(),
        )
    }

    /// Retrieves the next lexer token and resolves it against the dispatch
    /// table.
    fn next(&mut self) -> Result<Lookahead<'a>> {
        match self.tokens.next() {
            None => {
                // The token stream is exhausted; the associated token is an
                // empty placeholder
                let token = Token {
                    kind: TokenKind::Error,
                    value: "",
                    pos: 0,
                    line: 0,
                    column: 0,
                };
                Err(self.error(ParseErrorKind::UnexpectedEnd, String::new(), &token))
            }
            Some(token) if token.kind == TokenKind::Error => Err(self.error(
                ParseErrorKind::LexicalError,
                token.value.to_string(),
                &token,
            )),
            Some(token) => match classify(&token, self.is_value) {
                Some((kind, nud)) => Ok(Lookahead { kind, nud, token }),
                None => {
                    let detail = format!("id:{:?} ({})", token.kind, token);
                    Err(self.error(ParseErrorKind::UnknownToken, detail, &token))
                }
            },
        }
    }

    fn advance(&mut self) -> Result<()> {
        self.node = self.next()?;
        Ok(())
    }

    /// The main parser function: consumes the current lookahead as the head
    /// of an expression and runs its null denotation.
    fn run(&mut self) -> Result<ASTNode<'a>> {
        let head = self.node.clone();
        self.advance()?;

        let Some(nud) = head.nud else {
            return Err(self.error(
                ParseErrorKind::ImpossibleNullDenotation,
                self.node.token.value.to_string(),
                &self.node.token,
            ));
        };

        let node = self.node_from(&head);
        match nud {
            Nud::Term => Ok(node),
            Nud::OperationDefinition => self.nd_operation_definition(node),
            Nud::FragmentDefinition => self.nd_fragment_definition(node),
            Nud::SelectionSet => self.nd_selection_set(node),
            Nud::ArgumentList => self.nd_args_or_var_def(node),
            Nud::Directives => self.nd_directives(node),
            Nud::Variable => self.nd_variable(node),
            Nud::FragmentSpread => self.nd_fragment_spread(node),
            Nud::ListValue => self.nd_list_value(node),
        }
    }

    /// Skips over the current token if it has the given value.
    fn skip_token(&mut self, value: &str) -> Result<()> {
        if self.node.token.value != value {
            if self.node.token.kind == TokenKind::EOF {
                return Err(self.error(
                    ParseErrorKind::UnexpectedEnd,
                    String::new(),
                    &self.node.token,
                ));
            }
            return Err(self.error(
                ParseErrorKind::UnexpectedToken,
                self.node.token.value.to_string(),
                &self.node.token,
            ));
        }
        self.advance()
    }

    /// Accepts the current token as a child of the given node.
    fn accept_child(&mut self, parent: &mut ASTNode<'a>, kind: TokenKind) -> Result<()> {
        let current = self.node.clone();
        self.advance()?;

        if current.token.kind == kind {
            parent.children.push(self.node_from(&current));
            Ok(())
        } else {
            Err(self.error(
                ParseErrorKind::UnexpectedToken,
                current.token.value.to_string(),
                &current.token,
            ))
        }
    }

    /// Variables: `$name`.
    fn nd_variable(&mut self, mut node: ASTNode<'a>) -> Result<ASTNode<'a>> {
        if self.node.token.kind == TokenKind::Name {
            // The variable takes over the name's token
            node.token = self.node.token.clone();
            self.advance()?;
        }
        Ok(node)
    }

    /// List values: `[ … ]` with zero or more values.
    fn nd_list_value(&mut self, mut node: ASTNode<'a>) -> Result<ASTNode<'a>> {
        while self.node.token.kind != TokenKind::EOF && self.node.token.value != "]" {
            let value = self.parse_value()?;
            node.children.push(value);
        }
        self.skip_token("]")?;
        Ok(node)
    }

    /// Input object literals: `{ name : value, … }`. Entered through
    /// [`Parser::nd_selection_set`] while a value is being parsed; the
    /// selection-set node is rewritten to an object value.
    fn nd_input_object(&mut self, mut node: ASTNode<'a>) -> Result<ASTNode<'a>> {
        self.change_node(&mut node, NodeKind::ObjectValue);

        while self.node.token.kind != TokenKind::EOF && self.node.token.value != "}" {
            let current = self.run()?;
            if current.kind != NodeKind::Name {
                return Err(self.error(
                    ParseErrorKind::NameExpected,
                    current.token.to_string(),
                    &current.token,
                ));
            }

            let mut field = self.new_node(NodeKind::ObjectField, current.token.clone());
            self.is_value = true;
            self.skip_token(":")?;
            let value = self.parse_value()?;
            field.children.push(value);
            node.children.push(field);
        }

        self.skip_token("}")?;
        Ok(node)
    }

    /// Fragment spreads and inline fragments: after `...` either a fragment
    /// name, a type condition introduced by `on`, or directives and a
    /// selection set. A selection set rewrites the node to an inline
    /// fragment; `on` without a following name falls back to a fragment
    /// spread literally named `on`.
    fn nd_fragment_spread(&mut self, mut node: ASTNode<'a>) -> Result<ASTNode<'a>> {
        let mut expected_name: Option<Token<'a>> = None;

        if self.node.token.value == "on" {
            // We might have an inline fragment
            let on_token = self.node.token.clone();
            self.advance()?;

            if self.node.kind == Some(NodeKind::Name) {
                let mut condition = self.node_from(&self.node);
                self.change_node(&mut condition, NodeKind::TypeCondition);
                node.children.push(condition);
                self.advance()?;
            } else {
                node.token = on_token;
            }
        } else if self.node.token.kind == TokenKind::Name {
            // The spread takes over the fragment name's token
            node.token = self.node.token.clone();
            self.advance()?;
        } else {
            expected_name = Some(self.node.token.clone());
        }

        if self.node.token.value == "@" {
            let directives = self.run()?;
            node.children.push(directives);
        }

        if self.node.token.value == "{" {
            let set = self.run()?;
            node.children.push(set);

            // If there is a selection set we must have an inline fragment
            self.change_node(&mut node, NodeKind::InlineFragment);
        } else if let Some(token) = expected_name {
            // The spread operator without a name or a selection set
            return Err(self.error(ParseErrorKind::NameExpected, token.to_string(), &token));
        }

        Ok(node)
    }

    /// Operation definitions: the operation type keyword followed by an
    /// optional name, optional variable definitions, optional directives, and
    /// a mandatory selection set.
    fn nd_operation_definition(&mut self, mut node: ASTNode<'a>) -> Result<ASTNode<'a>> {
        let op_type = self.new_node(NodeKind::OperationType, node.token.clone());
        node.children.push(op_type);

        // Tracks the last parsed part for the mandatory selection set error
        let mut current_token = self.node.token.clone();

        if self.node.token.kind == TokenKind::Name {
            let name = self.node_from(&self.node);
            node.children.push(name);
            self.advance()?;
        }

        if self.node.token.value == "(" {
            self.is_var_def = true;
            let result = self.run();
            self.is_var_def = false;

            let var_defs = result?;
            current_token = var_defs.token.clone();
            node.children.push(var_defs);
        }

        if self.node.token.value == "@" {
            let directives = self.run()?;
            current_token = directives.token.clone();
            node.children.push(directives);
        }

        if self.node.token.value == "{" {
            let set = self.run()?;
            node.children.push(set);
        } else {
            // Selection set is mandatory
            return Err(self.error(
                ParseErrorKind::SelectionSetExpected,
                current_token.to_string(),
                &current_token,
            ));
        }

        Ok(node)
    }

    /// Fragment definitions: `fragment Name on Type [directives] { … }`.
    fn nd_fragment_definition(&mut self, mut node: ASTNode<'a>) -> Result<ASTNode<'a>> {
        if self.node.token.kind == TokenKind::Name {
            let mut name = self.node_from(&self.node);
            self.change_node(&mut name, NodeKind::FragmentName);
            node.children.push(name);
            self.advance()?;
        } else {
            return Err(self.error(
                ParseErrorKind::NameExpected,
                self.node.token.to_string(),
                &self.node.token,
            ));
        }

        // Type conditions must start with `on`
        if self.node.token.value != "on" {
            return Err(self.error(
                ParseErrorKind::OnExpected,
                self.node.token.to_string(),
                &self.node.token,
            ));
        }
        self.advance()?;

        if self.node.token.kind == TokenKind::Name {
            let mut condition = self.node_from(&self.node);
            self.change_node(&mut condition, NodeKind::TypeCondition);
            node.children.push(condition);
            self.advance()?;
        } else {
            return Err(self.error(
                ParseErrorKind::NameExpected,
                self.node.token.to_string(),
                &self.node.token,
            ));
        }

        if self.node.token.value == "@" {
            let directives = self.run()?;
            node.children.push(directives);
        }

        if self.node.token.value == "{" {
            let set = self.run()?;
            node.children.push(set);
        } else {
            // Selection set is mandatory
            return Err(self.error(
                ParseErrorKind::SelectionSetExpected,
                self.node.token.to_string(),
                &self.node.token,
            ));
        }

        Ok(node)
    }

    /// Selection sets: one or more fields, fragment spreads, or inline
    /// fragments between braces. While a value is being parsed a `{` opens an
    /// input object literal instead.
    fn nd_selection_set(&mut self, mut node: ASTNode<'a>) -> Result<ASTNode<'a>> {
        if self.is_value {
            return self.nd_input_object(node);
        }

        while self.node.token.kind != TokenKind::EOF && self.node.token.value != "}" {
            if self.node.token.value == "..." {
                let spread = self.run()?;
                node.children.push(spread);
            } else {
                self.accept_field_expression(&mut node)?;
            }
        }

        self.skip_token("}")?;
        Ok(node)
    }

    /// Field expressions: `[alias :] name [arguments] [directives]
    /// [selection set]`. The scanner reads two tokens ahead to decide whether
    /// the first name is an alias.
    fn accept_field_expression(&mut self, parent: &mut ASTNode<'a>) -> Result<()> {
        // The field node gets the first token of the field expression
        let mut field = self.new_node(NodeKind::Field, self.node.token.clone());
        let mut current = self.node.clone();
        self.advance()?;

        if self.node.kind != Some(NodeKind::EOF) {
            if self.node.token.value == ":" {
                // The last node was an alias, not a name
                let mut alias = self.node_from(&current);
                self.change_node(&mut alias, NodeKind::Alias);
                field.children.push(alias);

                self.advance()?;
                if self.node.kind != Some(NodeKind::EOF) {
                    current = self.node.clone();
                    self.advance()?;
                }
            }

            if self.node.kind != Some(NodeKind::EOF) {
                // The next node must be a name
                if current.kind == Some(NodeKind::Name) {
                    field.children.push(self.node_from(&current));
                } else {
                    return Err(self.error(
                        ParseErrorKind::NameExpected,
                        current.token.to_string(),
                        &current.token,
                    ));
                }

                if self.node.token.value == "(" {
                    let arguments = self.run()?;
                    field.children.push(arguments);
                }

                if self.node.token.value == "@" {
                    let directives = self.run()?;
                    field.children.push(directives);
                }

                if self.node.token.value == "{" {
                    let set = self.run()?;
                    field.children.push(set);
                }
            }
        }

        parent.children.push(field);
        Ok(())
    }

    /// Argument lists and variable-definition lists: between `(` and `)`,
    /// either `name : value` pairs or `$variable : Type [= default]` items,
    /// depending on the variable-definition flag.
    fn nd_args_or_var_def(&mut self, _node: ASTNode<'a>) -> Result<ASTNode<'a>> {
        let (list_kind, item_kind) = if self.is_var_def {
            (NodeKind::VariableDefinitions, NodeKind::VariableDefinition)
        } else {
            (NodeKind::Arguments, NodeKind::Argument)
        };
        let mut args = self.new_node(list_kind, self.node.token.clone());

        while self.node.token.kind != TokenKind::EOF && self.node.token.value != ")" {
            let mut arg = self.new_node(item_kind, self.node.token.clone());

            let current = self.run()?;
            if !self.is_var_def && current.kind != NodeKind::Name {
                return Err(self.error(
                    ParseErrorKind::NameExpected,
                    current.token.to_string(),
                    &current.token,
                ));
            }
            if self.is_var_def && current.kind != NodeKind::Variable {
                return Err(self.error(
                    ParseErrorKind::VariableExpected,
                    current.token.to_string(),
                    &current.token,
                ));
            }
            arg.children.push(current);

            if self.is_var_def {
                self.skip_token(":")?;
                let mut of_type = self.run()?;
                self.change_node(&mut of_type, NodeKind::Type);
                arg.children.push(of_type);

                if self.node.token.value == "=" {
                    self.is_value = true;
                    self.skip_token("=")?;
                    let mut default = self.parse_value()?;
                    self.change_node(&mut default, NodeKind::DefaultValue);
                    arg.children.push(default);
                }
            } else {
                self.is_value = true;
                self.skip_token(":")?;
                let value = self.parse_value()?;
                arg.children.push(value);
            }

            args.children.push(arg);
        }

        // Must have a closing bracket
        self.skip_token(")")?;
        Ok(args)
    }

    /// Parses a value and classifies the result: constants and literal
    /// tokens become `Value`, bare names become `EnumValue`; anything else
    /// must already be a variable, list value, or object value.
    fn parse_value(&mut self) -> Result<ASTNode<'a>> {
        self.is_value = true;
        let result = self.run();
        self.is_value = false;
        let mut current = result?;

        if current.token.value == "true"
            || current.token.value == "false"
            || current.token.value == "null"
            || current.token.kind == TokenKind::IntValue
            || current.token.kind == TokenKind::FloatValue
            || current.token.kind == TokenKind::StringValue
        {
            // Simple constant values
            self.change_node(&mut current, NodeKind::Value);
        } else if current.kind == NodeKind::Name {
            // Enum values
            self.change_node(&mut current, NodeKind::EnumValue);
        } else if !matches!(
            current.kind,
            NodeKind::Variable | NodeKind::ListValue | NodeKind::ObjectValue
        ) {
            return Err(self.error(
                ParseErrorKind::UnexpectedToken,
                current.token.value.to_string(),
                &current.token,
            ));
        }

        Ok(current)
    }

    /// Directives: one or more `@name [arguments]`, chained while the next
    /// token is `@`.
    fn nd_directives(&mut self, mut node: ASTNode<'a>) -> Result<ASTNode<'a>> {
        loop {
            let mut directive = self.new_node(NodeKind::Directive, self.node.token.clone());
            self.accept_child(&mut directive, TokenKind::Name)?;

            if self.node.token.value == "(" {
                let arguments = self.run()?;
                directive.children.push(arguments);
            }
            node.children.push(directive);

            if self.node.token.value != "@" {
                return Ok(node);
            }
            self.advance()?;
        }
    }
}
