use super::ast::ASTContext;
use std::borrow::Cow;
use std::fmt;

/// The kind of a [Token] produced by the lexer.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum TokenKind {
    /// A lexing error; the token value carries the diagnostic message.
    Error,
    /// The end-of-file token terminating every complete token sequence.
    EOF,
    /// One of `! $ ( ) : = @ [ ] { | }` or the three-rune ellipsis `...`.
    Punctuator,
    /// An identifier matching `[_A-Za-z][_0-9A-Za-z]*`.
    Name,
    /// An integer number without leading zeros.
    IntValue,
    /// A float number with a decimal point or exponent, lowercased.
    FloatValue,
    /// A string or block-string literal, unescaped respectively normalized.
    StringValue,
    /// A token without lexical origin, used by the plain-AST bridge.
    General,
}

/// A token returned by the lexer.
///
/// String values are already unescaped (simple strings) or stripped of uniform
/// indentation and blank edge lines (block strings); float values are
/// lowercased. Positions count runes, not bytes.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Token<'a> {
    /// Token kind.
    pub kind: TokenKind,
    /// Token value.
    pub value: &'a str,
    /// Starting position of this token in the input (in runes).
    pub pos: usize,
    /// Line in the input this token appears on (1-based).
    pub line: usize,
    /// Rune position within the line this token appears at (1-based).
    pub column: usize,
}

impl<'a> Token<'a> {
    /// A placeholder token for nodes that have no lexical origin.
    pub fn general(value: &'a str) -> Self {
        Token {
            kind: TokenKind::General,
            value,
            pos: 0,
            line: 0,
            column: 0,
        }
    }

    /// The position of this token in the original input as a string.
    pub fn pos_string(&self) -> String {
        format!("Line {}, Pos {}", self.line, self.column)
    }
}

/// The diagnostic form of a token, as embedded in parse error details.
impl<'a> fmt::Display for Token<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::EOF => f.write_str("EOF"),
            TokenKind::Error => write!(f, "Error: {} ({})", self.value, self.pos_string()),
            TokenKind::Name => write!(f, "<{}>", self.value),
            TokenKind::StringValue => write!(f, "\"{}\"", self.value),
            TokenKind::IntValue => write!(f, "int({})", self.value),
            TokenKind::FloatValue => write!(f, "flt({})", self.value),
            _ => f.write_str(self.value),
        }
    }
}

/// Lexes a source text into a token sequence.
///
/// The returned [Lexer] yields tokens on demand and ends after a single
/// [`TokenKind::EOF`] token, or shortly after a [`TokenKind::Error`] token
/// describing a lexical failure in string mode. It is not restartable.
pub fn lex<'a>(ctx: &'a ASTContext, source: &'a str) -> Lexer<'a> {
    Lexer::new(ctx, source)
}

/// Lexes a source text into a materialized token list.
pub fn lex_to_list<'a>(ctx: &'a ASTContext, source: &'a str) -> Vec<Token<'a>> {
    lex(ctx, source).collect()
}

/// Scanner over a GraphQL source text.
///
/// The scanner works rune by rune: after skipping ignored runes (Unicode
/// whitespace and control characters, commas, and the byte-order mark) it
/// collects a maximal text block, stopping at punctuators, comments, string
/// openers, and the ellipsis, and classifies the collected text. String mode
/// handles escape sequences and block-string normalization; processed string
/// values are allocated on the [ASTContext] arena.
pub struct Lexer<'a> {
    ctx: &'a ASTContext,
    input: &'a str,
    pos: usize,    // current byte offset
    rpos: usize,   // current rune offset
    start: usize,  // byte offset of the current token
    rstart: usize, // rune offset of the current token
    line: usize,   // current line (0-based, reported +1)
    lastnl: usize, // rune offset bookkeeping of the last newline
    done: bool,
    halted: bool, // a string-mode error was emitted
}

const ESCAPE_ERROR: &str = "Could not interpret escape sequence: invalid syntax";

impl<'a> Lexer<'a> {
    fn new(ctx: &'a ASTContext, input: &'a str) -> Self {
        Lexer {
            ctx,
            input,
            pos: 0,
            rpos: 0,
            start: 0,
            rstart: 0,
            line: 0,
            lastnl: 0,
            done: false,
            halted: false,
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Peeks the nth following rune without consuming.
    fn peek(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    /// Checks if the upcoming runes equal the given sequence.
    fn has_sequence(&self, s: &str) -> bool {
        self.rest().starts_with(s)
    }

    fn bump(&mut self) -> Option<char> {
        let r = self.rest().chars().next()?;
        self.pos += r.len_utf8();
        self.rpos += 1;
        Some(r)
    }

    fn start_new(&mut self) {
        self.start = self.pos;
        self.rstart = self.rpos;
    }

    fn emit(&self, kind: TokenKind, value: &'a str) -> Token<'a> {
        Token {
            kind,
            value,
            pos: self.rstart,
            line: self.line + 1,
            column: (self.rstart + 1).saturating_sub(self.lastnl),
        }
    }

    fn eof_token(&mut self) -> Token<'a> {
        self.rstart = self.rpos.saturating_sub(1);
        self.emit(TokenKind::EOF, "")
    }

    /// Skips ignored runes. Returns false when the end of the input is
    /// reached.
    fn skip_ignored(&mut self) -> bool {
        loop {
            match self.peek(0) {
                None => return false,
                Some(r) if is_ignored(r) => {
                    if r == '\n' {
                        self.line += 1;
                        self.lastnl = self.rpos;
                    }
                    self.bump();
                }
                Some(_) => return true,
            }
        }
    }

    /// Skips all runes until the next newline.
    fn skip_rest_of_line(&mut self) {
        while let Some(r) = self.bump() {
            if r == '\n' {
                self.line += 1;
                self.lastnl = self.rpos - 1;
                return;
            }
        }
    }

    /// Collects a block of text without ignored runes. Stops before
    /// punctuators, comments, string openers, and the ellipsis; a single
    /// stop rune (or the full ellipsis) forms a block of its own.
    fn lex_text_block(&mut self) {
        let Some(r) = self.peek(0) else {
            return;
        };
        if is_symbol(r) || r == '#' || r == '"' {
            self.bump();
            return;
        }
        if r == '.' && self.has_sequence("...") {
            self.bump();
            self.bump();
            self.bump();
            return;
        }
        loop {
            self.bump();
            match self.peek(0) {
                None => return,
                Some(next) => {
                    if is_symbol(next) || next == '#' || next == '"' || is_ignored(next) {
                        return;
                    }
                    if next == '.' && self.has_sequence("...") {
                        return;
                    }
                }
            }
        }
    }

    /// Lexes a string value either as a simple string or a block string.
    ///
    /// Values can be declared in different ways:
    ///
    /// `" … "` a normal string (escape sequences are interpreted)
    ///
    /// `""" … """` a multi-line string (escape sequences are not interpreted;
    /// uniform indentation and blank initial/trailing lines are removed)
    fn lex_string_value(&mut self) -> Token<'a> {
        // The opening quote is already consumed; lookahead decides the mode.
        let is_block = self.peek(0) == Some('"') && self.peek(1) == Some('"');

        // Newlines inside the literal update the line counter only after the
        // token is emitted, so the token reports its opening position.
        let mut line = self.line;
        let mut lastnl = self.lastnl;

        if is_block {
            self.bump();
            self.bump();
            loop {
                match self.bump() {
                    None => {
                        self.halted = true;
                        return self.emit(TokenKind::Error, "EOF inside quotes");
                    }
                    Some('"') if self.peek(0) == Some('"') && self.peek(1) == Some('"') => break,
                    Some('\n') => {
                        line += 1;
                        lastnl = self.rpos;
                    }
                    Some(_) => {}
                }
            }
            self.bump();
            self.bump();

            // Block strings represent freeform text often used in indented
            // positions, so their value excludes uniform indentation and
            // blank initial and trailing lines.
            let raw = &self.input[self.start + 3..self.pos - 3];
            let stripped = strip_uniform_indentation(raw);
            let value = self.ctx.alloc_string(trim_blank_lines(&stripped).to_string());

            let token = self.emit(TokenKind::StringValue, value);
            self.line = line;
            self.lastnl = lastnl;
            token
        } else {
            loop {
                match self.bump() {
                    None => {
                        self.halted = true;
                        return self.emit(TokenKind::Error, "EOF inside quotes");
                    }
                    Some('"') => break,
                    Some('\\') => {
                        // The escaped rune never terminates the literal.
                        if self.bump().is_none() {
                            self.halted = true;
                            return self.emit(TokenKind::Error, "EOF inside quotes");
                        }
                    }
                    Some('\n') => {
                        line += 1;
                        lastnl = self.rpos;
                    }
                    Some(_) => {}
                }
            }

            let raw = &self.input[self.start + 1..self.pos - 1];
            match unquote(raw) {
                Ok(Cow::Borrowed(value)) => {
                    let token = self.emit(TokenKind::StringValue, value);
                    self.line = line;
                    self.lastnl = lastnl;
                    token
                }
                Ok(Cow::Owned(value)) => {
                    let value = self.ctx.alloc_string(value);
                    let token = self.emit(TokenKind::StringValue, value);
                    self.line = line;
                    self.lastnl = lastnl;
                    token
                }
                Err(message) => {
                    self.halted = true;
                    self.emit(TokenKind::Error, message)
                }
            }
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if self.done {
            return None;
        }
        if self.halted {
            // After a string-mode error only a trailing EOF may follow, and
            // only if the rest of the input is entirely ignorable.
            self.done = true;
            if self.skip_ignored() {
                return None;
            }
            return Some(self.eof_token());
        }
        loop {
            if !self.skip_ignored() {
                self.done = true;
                return Some(self.eof_token());
            }
            self.start_new();
            self.lex_text_block();
            let text = &self.input[self.start..self.pos];

            // Comment - consume to end of line and resume
            if text == "#" {
                self.skip_rest_of_line();
                continue;
            }

            // String mode
            if text == "\"" {
                return Some(self.lex_string_value());
            }

            // Punctuator
            if text == "..." || (text.chars().count() == 1 && text.chars().all(is_symbol)) {
                return Some(self.emit(TokenKind::Punctuator, text));
            }

            // Name
            if is_name(text) {
                return Some(self.emit(TokenKind::Name, text));
            }

            // IntValue - leading zeros on non-zero integers are lexical errors
            if is_int(text) {
                return Some(self.emit(TokenKind::IntValue, text));
            }

            // FloatValue, emitted lowercased
            if is_float(text) {
                let value = self.ctx.alloc_string(text.to_lowercase());
                return Some(self.emit(TokenKind::FloatValue, value));
            }

            // Everything else is an error
            return Some(self.emit(TokenKind::Error, text));
        }
    }
}

/// Ignored runes: Unicode whitespace and control characters, commas, and the
/// byte-order mark.
fn is_ignored(r: char) -> bool {
    r.is_whitespace() || r.is_control() || r == ',' || r == '\u{feff}'
}

fn is_symbol(r: char) -> bool {
    matches!(
        r,
        '!' | '$' | '(' | ')' | ':' | '=' | '@' | '[' | ']' | '{' | '|' | '}'
    )
}

/// `[_A-Za-z][_0-9A-Za-z]*`
fn is_name(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(r) if r == '_' || r.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|r| r == '_' || r.is_ascii_alphanumeric())
}

/// `-?0` or `-?[1-9][0-9]*`
fn is_int(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    match digits.as_bytes() {
        [] => false,
        [b'0'] => true,
        [b'1'..=b'9', rest @ ..] => rest.iter().all(u8::is_ascii_digit),
        _ => false,
    }
}

/// `[0-9]*.[0-9]*`, `[0-9][eE][+-]?[0-9]*` or `[0-9]*.[0-9][eE][+-]?[0-9]*`
fn is_float(text: &str) -> bool {
    let bytes = text.as_bytes();
    if let Some(dot) = text.find('.') {
        let (int_part, frac_part) = (&bytes[..dot], &bytes[dot + 1..]);
        if !int_part.iter().all(u8::is_ascii_digit) {
            return false;
        }
        if frac_part.iter().all(u8::is_ascii_digit) {
            return true;
        }
        // fraction of exactly one digit followed by an exponent
        matches!(frac_part, [b'0'..=b'9', rest @ ..] if is_exponent(rest))
    } else {
        // a single digit followed by an exponent
        matches!(bytes, [b'0'..=b'9', rest @ ..] if is_exponent(rest))
    }
}

fn is_exponent(bytes: &[u8]) -> bool {
    match bytes {
        [b'e' | b'E', rest @ ..] => {
            let digits = match rest {
                [b'+' | b'-', digits @ ..] => digits,
                digits => digits,
            };
            digits.iter().all(u8::is_ascii_digit)
        }
        _ => false,
    }
}

/// Interprets backslash escapes in a simple string literal.
///
/// Returns the input unchanged when it contains no escapes. A literal newline
/// or an unknown escape is a syntax error.
fn unquote(raw: &str) -> std::result::Result<Cow<'_, str>, &'static str> {
    if raw.contains('\n') {
        return Err(ESCAPE_ERROR);
    }
    if !raw.contains('\\') {
        return Ok(Cow::Borrowed(raw));
    }

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(r) = chars.next() {
        if r != '\\' {
            out.push(r);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some('a') => out.push('\u{0007}'),
            Some('b') => out.push('\u{0008}'),
            Some('f') => out.push('\u{000C}'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('v') => out.push('\u{000B}'),
            Some('x') => out.push(unescape_hex(&mut chars, 2)?),
            Some('u') => out.push(unescape_hex(&mut chars, 4)?),
            Some('U') => out.push(unescape_hex(&mut chars, 8)?),
            _ => return Err(ESCAPE_ERROR),
        }
    }
    Ok(Cow::Owned(out))
}

fn unescape_hex(chars: &mut std::str::Chars, len: usize) -> std::result::Result<char, &'static str> {
    let mut code: u32 = 0;
    for _ in 0..len {
        let digit = chars
            .next()
            .and_then(|r| r.to_digit(16))
            .ok_or(ESCAPE_ERROR)?;
        code = code * 16 + digit;
    }
    char::from_u32(code).ok_or(ESCAPE_ERROR)
}

/// Removes uniform indentation from a string: the smallest leading-whitespace
/// count over all non-blank lines is removed from every line, and blank lines
/// are emptied.
fn strip_uniform_indentation(s: &str) -> String {
    fn leading_whitespace(line: &str) -> Option<usize> {
        let mut count = 0;
        for r in line.chars() {
            if r.is_whitespace() || r.is_control() {
                count += 1;
            } else {
                return Some(count);
            }
        }
        // line is full of whitespace
        None
    }

    let min_count = s.lines().filter_map(leading_whitespace).min().unwrap_or(0);

    let mut buf = String::with_capacity(s.len());
    for line in s.lines() {
        if !line.trim().is_empty() {
            buf.extend(line.chars().skip(min_count));
        }
        buf.push('\n');
    }
    if !s.ends_with('\n') {
        buf.pop();
    }
    buf
}

/// Removes blank initial and trailing lines.
fn trim_blank_lines(s: &str) -> &str {
    s.trim_matches(|r| r == '\r' || r == '\n')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn print_tokens(tokens: &[Token]) -> String {
        let parts: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        format!("[{}]", parts.join(" "))
    }

    fn lex_string(input: &str) -> String {
        let ctx = ASTContext::new();
        print_tokens(&lex_to_list(&ctx, input))
    }

    #[test]
    fn peeking() {
        let ctx = ASTContext::new();
        let mut l = Lexer::new(&ctx, "Test");

        assert_eq!(l.peek(0), Some('T'));
        assert_eq!(l.peek(1), Some('e'));
        assert_eq!(l.peek(2), Some('s'));
        assert_eq!(l.peek(3), Some('t'));
        assert_eq!(l.peek(4), None);
        assert_eq!(l.pos, 0);

        assert_eq!(l.bump(), Some('T'));
        assert_eq!(l.pos, 1);
        assert_eq!(l.bump(), Some('e'));
        assert_eq!(l.pos, 2);
        assert!(l.has_sequence("st"));
    }

    #[test]
    fn simple_lexing() {
        assert_eq!(lex_string("\u{feff}1!23"), "[int(1) ! int(23) EOF]");

        assert_eq!(
            lex_string("1!23.4e+11 3E-5 11.1 .4$"),
            "[int(1) ! flt(23.4e+11) flt(3e-5) flt(11.1) flt(.4) $ EOF]"
        );

        assert_eq!(
            lex_string("12!foo...bar99"),
            "[int(12) ! <foo> ... <bar99> EOF]"
        );

        assert_eq!(
            lex_string("-0 0 1230 0123"),
            "[int(-0) int(0) int(1230) Error: 0123 (Line 1, Pos 11) EOF]"
        );
    }

    #[test]
    fn lexing_errors() {
        assert_eq!(
            lex_string(r#""te"#),
            "[Error: EOF inside quotes (Line 1, Pos 1) EOF]"
        );

        assert_eq!(
            lex_string(r#""bl\*a""#),
            "[Error: Could not interpret escape sequence: invalid syntax (Line 1, Pos 1) EOF]"
        );

        // After a bad escape, pending text does not produce further tokens
        assert_eq!(
            lex_string(r#""bl\*a" x"#),
            "[Error: Could not interpret escape sequence: invalid syntax (Line 1, Pos 1)]"
        );
    }

    #[test]
    fn multiline_lexing() {
        assert_eq!(
            lex_string("1!23#...4e+11\n123\ntrue\n"),
            "[int(1) ! int(23) int(123) <true> EOF]"
        );

        assert_eq!(
            lex_string("\"\"\"\n123\n\"\"\"\n\"[\"\n[\n\"123\"\n\"123\\u2318\"\n\"\"\"123\\u2318\"\"\"\n\"\"\"\n  bla\n\"\"\"\n"),
            "[\"123\" \"[\" [ \"123\" \"123\u{2318}\" \"123\\u2318\" \"bla\" EOF]"
        );

        assert_eq!(
            lex_string(
                "\"\"\"\n    Hello,\n      World!\n\n    Yours,\n      GraphQL.\n  \"\"\"\n"
            ),
            "[\"Hello,\n  World!\n\nYours,\n  GraphQL.\" EOF]"
        );

        assert_eq!(
            lex_string("\"Hello,\\n  World!\\n\\nYours,\\n  GraphQL.\"\n"),
            "[\"Hello,\n  World!\n\nYours,\n  GraphQL.\" EOF]"
        );

        let ctx = ASTContext::new();
        let tokens = lex_to_list(&ctx, "\"Hello,\\n  World!\\n\\nYours,\\n  GraphQL.\"\n");
        assert_eq!(tokens[tokens.len() - 1].pos_string(), "Line 2, Pos 1");
    }

    #[test]
    fn escaped_quotes() {
        let ctx = ASTContext::new();
        let tokens = lex_to_list(&ctx, r#""a\"a""#);
        assert_eq!(tokens[0].kind, TokenKind::StringValue);
        assert_eq!(tokens[0].value, "a\"a");
        assert_eq!(tokens[1].kind, TokenKind::EOF);
    }

    #[test]
    fn ignored_lexing() {
        assert_eq!(
            lex_string("1,2,3...abc\t\r\n#123\n"),
            "[int(1) int(2) int(3) ... <abc> EOF]"
        );

        assert_eq!(
            lex_string("1,2,3 .. x abc\r\n#123\n"),
            "[int(1) int(2) int(3) Error: .. (Line 1, Pos 7) <x> <abc> EOF]"
        );

        // A comment running to the end of the input is still followed by EOF
        assert_eq!(
            lex_string("1,2,3 .. x abc\r\n#123"),
            "[int(1) int(2) int(3) Error: .. (Line 1, Pos 7) <x> <abc> EOF]"
        );
    }

    #[test]
    fn token_positions() {
        let ctx = ASTContext::new();
        let tokens = lex_to_list(&ctx, "query (foo:bar) {}");
        let foo = tokens.iter().find(|t| t.value == "foo").unwrap();
        assert_eq!(foo.pos, 7);
        assert_eq!((foo.line, foo.column), (1, 8));

        // Positions count runes, not bytes
        let tokens = lex_to_list(&ctx, "\"⌘⌘\" name");
        let name = tokens.iter().find(|t| t.value == "name").unwrap();
        assert_eq!(name.pos, 5);
        assert_eq!((name.line, name.column), (1, 6));
    }

    #[test]
    fn sample_query_lexing() {
        let input = "\nquery StudentsNormal {\n  allStudents(pagination: {offset: 0, limit: 10}, sort: {fields: [{field: \"studentNumber\", order: ASC}]}, \n                           filter: {fields: [{op: NIN, value: \"[Harry]\", field: \"name\"}]}) {\n    result {\n      ...studentFields\n      subjects {\n        name\n        classroom\n      }\n    }\n    pagination {\n      offset\n      limit\n      total\n    }\n  }\n}\n";
        let expected = "[<query> <StudentsNormal> { <allStudents> ( <pagination> : { <offset> : int(0) <limit> : int(10) } <sort> : { <fields> : [ { <field> : \"studentNumber\" <order> : <ASC> } ] } <filter> : { <fields> : [ { <op> : <NIN> <value> : \"[Harry]\" <field> : \"name\" } ] } ) { <result> { ... <studentFields> <subjects> { <name> <classroom> } } <pagination> { <offset> <limit> <total> } } } EOF]";
        assert_eq!(lex_string(input), expected);
    }

    #[test]
    fn strip_indentation() {
        assert_eq!(
            strip_uniform_indentation("  a\n    b\n\n  c\n"),
            "a\n  b\n\nc\n"
        );
        assert_eq!(strip_uniform_indentation("a\n  b"), "a\n  b");
        assert_eq!(strip_uniform_indentation("   \n  a\n   \n"), "\na\n\n");
        assert_eq!(strip_uniform_indentation(""), "");
    }

    #[test]
    fn trim_blanks() {
        assert_eq!(trim_blank_lines("\n\na\nb\n\n"), "a\nb");
        assert_eq!(trim_blank_lines("a"), "a");
        assert_eq!(trim_blank_lines("\r\n\r\n"), "");
    }

    #[test]
    fn float_forms() {
        assert!(is_float(".4"));
        assert!(is_float("3e-5"));
        assert!(is_float("23.4e+11"));
        assert!(is_float("11.1"));
        assert!(!is_float("23e5"));
        assert!(!is_float("1.2.3"));
        assert!(!is_int("0123"));
        assert!(is_int("-0"));
    }
}
