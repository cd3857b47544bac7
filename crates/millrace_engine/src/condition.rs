//! Compilation of condition text into a condition AST.
//!
//! The rule-authoring front-ends accept conditions as text, e.g.
//! `"$d.patient == $r.patient && $r.temperature >= 100"`. Each condition
//! is compiled exactly once, at rule set construction; matching never
//! parses text. The grammar is a conjunction of comparisons whose
//! operands are `$variable.attribute` references or literals.

use millrace_foundation::{Error, Result, Value};

// =============================================================================
// Condition AST
// =============================================================================

/// A parsed condition: a conjunction of comparisons.
#[derive(Clone, Debug, PartialEq)]
pub struct ConditionAst {
    /// The conjoined comparisons, in source order.
    pub comparisons: Vec<Comparison>,
}

/// A single comparison between two operands.
#[derive(Clone, Debug, PartialEq)]
pub struct Comparison {
    /// Left operand.
    pub lhs: Operand,
    /// Comparison operator.
    pub op: CompareOp,
    /// Right operand.
    pub rhs: Operand,
}

/// An operand of a comparison.
#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    /// An attribute reference like `$r.temperature`. The variable name
    /// keeps its `$` prefix, matching how pattern variables are
    /// declared.
    Field {
        /// The pattern variable, including the `$` prefix.
        variable: String,
        /// The attribute name.
        attribute: String,
    },
    /// A literal value (`100`, `98.6`, `true`, `"text"`).
    Literal(Value),
}

/// Comparison operators.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CompareOp {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl CompareOp {
    /// Returns the operator's source form.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }

    /// Returns true for `<`, `<=`, `>`, `>=`.
    #[must_use]
    pub const fn is_relational(self) -> bool {
        matches!(self, Self::Lt | Self::Le | Self::Gt | Self::Ge)
    }
}

/// Parses a condition string into its AST.
///
/// # Errors
/// Returns a definition error (`ConditionParse`) describing the first
/// offending token and its byte offset.
pub fn parse(source: &str) -> Result<ConditionAst> {
    Parser::new(source).parse()
}

// =============================================================================
// Lexer
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
enum TokenKind {
    Field { variable: String, attribute: String },
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
    AndAnd,
    Op(CompareOp),
    Eof,
}

#[derive(Clone, Debug)]
struct Token {
    kind: TokenKind,
    offset: usize,
}

struct Lexer<'src> {
    rest: &'src str,
    position: usize,
}

impl<'src> Lexer<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            rest: source,
            position: 0,
        }
    }

    fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();
        let offset = self.position;

        let Some(c) = self.peek() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                offset,
            });
        };

        let kind = match c {
            '$' => self.scan_field(offset)?,
            '"' => self.scan_string(offset)?,
            '&' => {
                self.advance();
                if self.peek() == Some('&') {
                    self.advance();
                    TokenKind::AndAnd
                } else {
                    return Err(Error::condition_parse("expected `&&`", offset));
                }
            }
            '=' => {
                self.advance();
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::Op(CompareOp::Eq)
                } else {
                    return Err(Error::condition_parse(
                        "single `=` is not an operator, use `==`",
                        offset,
                    ));
                }
            }
            '!' => {
                self.advance();
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::Op(CompareOp::Ne)
                } else {
                    return Err(Error::condition_parse("expected `!=`", offset));
                }
            }
            '<' => {
                self.advance();
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::Op(CompareOp::Le)
                } else {
                    TokenKind::Op(CompareOp::Lt)
                }
            }
            '>' => {
                self.advance();
                if self.peek() == Some('=') {
                    self.advance();
                    TokenKind::Op(CompareOp::Ge)
                } else {
                    TokenKind::Op(CompareOp::Gt)
                }
            }
            c if c.is_ascii_digit() || c == '-' => self.scan_number(offset)?,
            c if is_ident_start(c) => self.scan_word(offset)?,
            c => {
                return Err(Error::condition_parse(
                    format!("unexpected character `{c}`"),
                    offset,
                ));
            }
        };

        Ok(Token { kind, offset })
    }

    fn scan_field(&mut self, offset: usize) -> Result<TokenKind> {
        self.advance(); // consume '$'
        let variable = self.scan_ident();
        if variable.is_empty() {
            return Err(Error::condition_parse(
                "expected variable name after `$`",
                offset,
            ));
        }
        if self.peek() != Some('.') {
            return Err(Error::condition_parse(
                format!("expected `.` after `${variable}`"),
                self.position,
            ));
        }
        self.advance(); // consume '.'
        let attribute = self.scan_ident();
        if attribute.is_empty() {
            return Err(Error::condition_parse(
                format!("expected attribute name after `${variable}.`"),
                self.position,
            ));
        }
        Ok(TokenKind::Field {
            variable: format!("${variable}"),
            attribute,
        })
    }

    fn scan_string(&mut self, offset: usize) -> Result<TokenKind> {
        self.advance(); // consume opening quote
        let mut text = String::new();
        loop {
            match self.peek() {
                None => {
                    return Err(Error::condition_parse("unterminated string", offset));
                }
                Some('"') => {
                    self.advance();
                    return Ok(TokenKind::Str(text));
                }
                Some('\\') => {
                    self.advance();
                    match self.peek() {
                        Some('"') => text.push('"'),
                        Some('\\') => text.push('\\'),
                        _ => {
                            return Err(Error::condition_parse(
                                "invalid escape sequence",
                                self.position,
                            ));
                        }
                    }
                    self.advance();
                }
                Some(c) => {
                    text.push(c);
                    self.advance();
                }
            }
        }
    }

    fn scan_number(&mut self, offset: usize) -> Result<TokenKind> {
        let start = self.rest;
        let mut len = 0;
        if self.peek() == Some('-') {
            self.advance();
            len += 1;
        }
        let mut is_float = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.advance();
                len += 1;
            } else if c == '.' && !is_float {
                is_float = true;
                self.advance();
                len += 1;
            } else {
                break;
            }
        }
        let text = &start[..len];
        if is_float {
            text.parse::<f64>().map(TokenKind::Float).map_err(|_| {
                Error::condition_parse(format!("invalid number `{text}`"), offset)
            })
        } else {
            text.parse::<i64>().map(TokenKind::Int).map_err(|_| {
                Error::condition_parse(format!("invalid number `{text}`"), offset)
            })
        }
    }

    fn scan_word(&mut self, offset: usize) -> Result<TokenKind> {
        let word = self.scan_ident();
        match word.as_str() {
            "true" => Ok(TokenKind::Bool(true)),
            "false" => Ok(TokenKind::Bool(false)),
            _ => Err(Error::condition_parse(
                format!("unexpected word `{word}` (attribute references need a `$variable.` prefix)"),
                offset,
            )),
        }
    }

    fn scan_ident(&mut self) -> String {
        let mut ident = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                ident.push(c);
                self.advance();
            } else {
                break;
            }
        }
        ident
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            let len = c.len_utf8();
            self.rest = &self.rest[len..];
            self.position += len;
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

// =============================================================================
// Parser
// =============================================================================

struct Parser<'src> {
    lexer: Lexer<'src>,
    current: Option<Token>,
}

impl<'src> Parser<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            lexer: Lexer::new(source),
            current: None,
        }
    }

    fn parse(mut self) -> Result<ConditionAst> {
        self.bump()?;

        let mut comparisons = vec![self.parse_comparison()?];
        loop {
            let token = self.current();
            match token.kind {
                TokenKind::Eof => break,
                TokenKind::AndAnd => {
                    self.bump()?;
                    comparisons.push(self.parse_comparison()?);
                }
                _ => {
                    return Err(Error::condition_parse(
                        "expected `&&` or end of condition",
                        token.offset,
                    ));
                }
            }
        }

        Ok(ConditionAst { comparisons })
    }

    fn parse_comparison(&mut self) -> Result<Comparison> {
        let lhs = self.parse_operand()?;

        let token = self.current();
        let TokenKind::Op(op) = token.kind else {
            return Err(Error::condition_parse(
                "expected a comparison operator",
                token.offset,
            ));
        };
        self.bump()?;

        let rhs = self.parse_operand()?;
        Ok(Comparison { lhs, op, rhs })
    }

    fn parse_operand(&mut self) -> Result<Operand> {
        let token = self.current();
        let operand = match token.kind {
            TokenKind::Field {
                variable,
                attribute,
            } => Operand::Field {
                variable,
                attribute,
            },
            TokenKind::Int(n) => Operand::Literal(Value::Int(n)),
            TokenKind::Float(n) => Operand::Literal(Value::Float(n)),
            TokenKind::Str(s) => Operand::Literal(Value::from(s)),
            TokenKind::Bool(b) => Operand::Literal(Value::Bool(b)),
            _ => {
                return Err(Error::condition_parse(
                    "expected an attribute reference or literal",
                    token.offset,
                ));
            }
        };
        self.bump()?;
        Ok(operand)
    }

    // Invariant: parse() primes the parser with bump() before any read.
    fn current(&self) -> Token {
        self.current.clone().expect("parser primed with bump")
    }

    fn bump(&mut self) -> Result<()> {
        self.current = Some(self.lexer.next_token()?);
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
