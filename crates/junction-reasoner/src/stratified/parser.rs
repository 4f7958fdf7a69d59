//! Lexer and parser for the supported program subset.
//!
//! ```text
//! program   := statement*
//! statement := atom '.' | atom ':-' body '.' | ':-' body '.'
//! body      := literal (',' literal)*
//! literal   := 'not' atom | arg op arg | atom
//! atom      := ident ('(' arg (',' arg)* ')')?
//! arg       := Variable | ident | integer | "string"
//! op        := '=' | '==' | '!=' | '<' | '<=' | '>' | '>='
//! ```
//!
//! `%` starts a line comment and `%* ... *%` a block comment. `#show` and
//! `#program` directives are skipped; any other directive is an error.

use junction_core::{Atom, Term};

use crate::error::OracleError;
use crate::stratified::syntax::{Arg, CmpOp, Literal, Pattern, Rule};

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    Ident(String),
    Var(String),
    Int(i64),
    LParen,
    RParen,
    Comma,
    Dot,
    If,
    Not,
    Op(CmpOp),
}

struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    anonymous: usize,
}

fn parse_err(line: usize, message: impl Into<String>) -> OracleError {
    OracleError::Parse {
        line,
        message: message.into(),
    }
}

impl<'a> Lexer<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
            line: 1,
            anonymous: 0,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn word(&mut self, first: char) -> String {
        let mut out = String::from(first);
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_alphanumeric() || c == '_' || c == '\'' {
                out.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        out
    }

    fn skip_line(&mut self) {
        while let Some(&c) = self.chars.peek() {
            if c == '\n' {
                break;
            }
            self.chars.next();
        }
    }

    fn skip_block_comment(&mut self, start: usize) -> Result<(), OracleError> {
        let mut prev = '\0';
        while let Some(c) = self.bump() {
            if prev == '*' && c == '%' {
                return Ok(());
            }
            prev = c;
        }
        Err(parse_err(start, "unterminated block comment"))
    }

    fn tokenize(mut self) -> Result<Vec<(Tok, usize)>, OracleError> {
        let mut out = Vec::new();
        while let Some(c) = self.bump() {
            let line = self.line;
            let tok = match c {
                c if c.is_whitespace() => continue,
                '%' => {
                    if self.chars.peek() == Some(&'*') {
                        self.chars.next();
                        self.skip_block_comment(line)?;
                    } else {
                        self.skip_line();
                    }
                    continue;
                }
                '#' => {
                    let directive = match self.chars.next() {
                        Some(first) if first.is_ascii_alphabetic() => self.word(first),
                        _ => return Err(parse_err(line, "empty directive")),
                    };
                    if directive != "show" && directive != "program" {
                        return Err(parse_err(
                            line,
                            format!("unsupported directive #{directive}"),
                        ));
                    }
                    loop {
                        match self.bump() {
                            Some('.') => break,
                            Some(_) => {}
                            None => {
                                return Err(parse_err(line, "unterminated directive"));
                            }
                        }
                    }
                    continue;
                }
                '(' => Tok::LParen,
                ')' => Tok::RParen,
                ',' => Tok::Comma,
                '.' => Tok::Dot,
                ':' => match self.chars.next() {
                    Some('-') => Tok::If,
                    _ => return Err(parse_err(line, "expected ':-'")),
                },
                '!' => match self.chars.next() {
                    Some('=') => Tok::Op(CmpOp::Ne),
                    _ => return Err(parse_err(line, "expected '!='")),
                },
                '=' => {
                    if self.chars.peek() == Some(&'=') {
                        self.chars.next();
                    }
                    Tok::Op(CmpOp::Eq)
                }
                '<' | '>' => {
                    let or_equal = self.chars.peek() == Some(&'=');
                    if or_equal {
                        self.chars.next();
                    }
                    Tok::Op(match (c, or_equal) {
                        ('<', false) => CmpOp::Lt,
                        ('<', true) => CmpOp::Le,
                        (_, false) => CmpOp::Gt,
                        (_, true) => CmpOp::Ge,
                    })
                }
                '-' | '0'..='9' => {
                    let mut digits = String::from(c);
                    while let Some(&d) = self.chars.peek() {
                        if d.is_ascii_digit() {
                            digits.push(d);
                            self.chars.next();
                        } else {
                            break;
                        }
                    }
                    let value = digits
                        .parse::<i64>()
                        .map_err(|_| parse_err(line, format!("invalid integer {digits:?}")))?;
                    Tok::Int(value)
                }
                '"' => {
                    let mut s = String::from('"');
                    loop {
                        match self.bump() {
                            Some('\\') => {
                                s.push('\\');
                                if let Some(escaped) = self.bump() {
                                    s.push(escaped);
                                }
                            }
                            Some('"') => break,
                            Some(other) => s.push(other),
                            None => return Err(parse_err(line, "unterminated string")),
                        }
                    }
                    s.push('"');
                    Tok::Ident(s)
                }
                c if c.is_ascii_lowercase() => {
                    let word = self.word(c);
                    if word == "not" {
                        Tok::Not
                    } else {
                        Tok::Ident(word)
                    }
                }
                c if c.is_ascii_uppercase() || c == '_' => {
                    let word = self.word(c);
                    if word == "_" {
                        self.anonymous += 1;
                        Tok::Var(format!("_{}", self.anonymous))
                    } else {
                        Tok::Var(word)
                    }
                }
                other => return Err(parse_err(line, format!("unexpected character {other:?}"))),
            };
            out.push((tok, line));
        }
        Ok(out)
    }
}

struct Parser {
    tokens: Vec<(Tok, usize)>,
    pos: usize,
    last_line: usize,
}

impl Parser {
    fn new(tokens: Vec<(Tok, usize)>) -> Self {
        let last_line = tokens.last().map(|(_, l)| *l).unwrap_or(1);
        Self {
            tokens,
            pos: 0,
            last_line,
        }
    }

    fn peek(&self) -> Option<&Tok> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn peek_at(&self, offset: usize) -> Option<&Tok> {
        self.tokens.get(self.pos + offset).map(|(t, _)| t)
    }

    fn line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|(_, l)| *l)
            .unwrap_or(self.last_line)
    }

    fn next(&mut self) -> Option<Tok> {
        let tok = self.tokens.get(self.pos).map(|(t, _)| t.clone());
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, want: Tok, what: &str) -> Result<(), OracleError> {
        let line = self.line();
        match self.next() {
            Some(tok) if tok == want => Ok(()),
            Some(tok) => Err(parse_err(line, format!("expected {what}, found {tok:?}"))),
            None => Err(parse_err(line, format!("expected {what}, found end of input"))),
        }
    }

    fn arg(&mut self) -> Result<Arg, OracleError> {
        let line = self.line();
        let arg = match self.next() {
            Some(Tok::Var(name)) => Arg::Var(name),
            Some(Tok::Ident(name)) => Arg::Const(Term::Symbol(name)),
            Some(Tok::Int(value)) => Arg::Const(Term::Int(value)),
            Some(tok) => return Err(parse_err(line, format!("expected a term, found {tok:?}"))),
            None => return Err(parse_err(line, "expected a term, found end of input")),
        };
        if self.peek() == Some(&Tok::LParen) {
            return Err(parse_err(line, "function terms are not supported"));
        }
        Ok(arg)
    }

    fn atom(&mut self) -> Result<Pattern, OracleError> {
        let line = self.line();
        let predicate = match self.next() {
            Some(Tok::Ident(name)) if !name.starts_with('"') => name,
            Some(tok) => return Err(parse_err(line, format!("expected a predicate, found {tok:?}"))),
            None => return Err(parse_err(line, "expected a predicate, found end of input")),
        };
        let mut args = Vec::new();
        if self.peek() == Some(&Tok::LParen) {
            self.next();
            loop {
                args.push(self.arg()?);
                match self.next() {
                    Some(Tok::Comma) => continue,
                    Some(Tok::RParen) => break,
                    _ => return Err(parse_err(line, "expected ',' or ')' in argument list")),
                }
            }
        }
        Ok(Pattern { predicate, args })
    }

    fn literal(&mut self) -> Result<Literal, OracleError> {
        match (self.peek(), self.peek_at(1)) {
            (Some(Tok::Not), _) => {
                self.next();
                Ok(Literal::Neg(self.atom()?))
            }
            (Some(Tok::Ident(_)), Some(Tok::Op(_)))
            | (Some(Tok::Var(_)), _)
            | (Some(Tok::Int(_)), _) => {
                let lhs = self.arg()?;
                let line = self.line();
                let op = match self.next() {
                    Some(Tok::Op(op)) => op,
                    _ => return Err(parse_err(line, "expected a comparison operator")),
                };
                let rhs = self.arg()?;
                Ok(Literal::Cmp(lhs, op, rhs))
            }
            _ => Ok(Literal::Pos(self.atom()?)),
        }
    }

    fn body(&mut self) -> Result<Vec<Literal>, OracleError> {
        let mut body = vec![self.literal()?];
        while self.peek() == Some(&Tok::Comma) {
            self.next();
            body.push(self.literal()?);
        }
        self.expect(Tok::Dot, "'.'")?;
        Ok(body)
    }

    fn statement(&mut self) -> Result<Rule, OracleError> {
        let line = self.line();
        if self.peek() == Some(&Tok::If) {
            self.next();
            let body = self.body()?;
            return Ok(Rule {
                head: None,
                body,
                line,
            });
        }
        let head = self.atom()?;
        let body = match self.next() {
            Some(Tok::Dot) => Vec::new(),
            Some(Tok::If) => self.body()?,
            _ => return Err(parse_err(line, "expected '.' or ':-' after head")),
        };
        Ok(Rule {
            head: Some(head),
            body,
            line,
        })
    }
}

/// Parse a program into rules, rejecting unsafe rules.
pub fn parse_program(text: &str) -> Result<Vec<Rule>, OracleError> {
    let mut parser = Parser::new(Lexer::new(text).tokenize()?);
    let mut rules = Vec::new();
    while parser.peek().is_some() {
        let rule = parser.statement()?;
        if let Some(variable) = rule.unsafe_var() {
            return Err(OracleError::UnsafeRule {
                line: rule.line,
                variable,
            });
        }
        rules.push(rule);
    }
    Ok(rules)
}

/// Parse one ground atom such as `hasRightOfWay(v_car7)`.
pub fn parse_ground_atom(text: &str) -> Result<Atom, OracleError> {
    let mut parser = Parser::new(Lexer::new(text).tokenize()?);
    let pattern = parser.atom()?;
    if parser.peek().is_some() {
        return Err(parse_err(parser.line(), format!("trailing input after atom in {text:?}")));
    }
    let mut args = Vec::with_capacity(pattern.args.len());
    for arg in pattern.args {
        match arg {
            Arg::Const(term) => args.push(term),
            Arg::Var(name) => {
                return Err(parse_err(1, format!("atom {text:?} is not ground (variable {name})")));
            }
        }
    }
    Ok(Atom::new(pattern.predicate, args))
}
