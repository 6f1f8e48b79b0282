//! Recursive descent parser for the filter expression grammar.
//!
//! Precedence, loosest first: OR, AND, NOT, comparison / IN / IS NULL,
//! additive (`+ - ||`), multiplicative (`* / %`), unary minus, primary.

use super::lexer::{SpannedToken, Token};
use super::ParseError;

/// Parsed expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    ColumnRef(String),
    Variable(String),
    FunctionCall { name: String, args: Vec<Expr> },
    Unary { op: UnaryOp, operand: Box<Expr> },
    Binary { op: BinaryOp, left: Box<Expr>, right: Box<Expr> },
    InList { value: Box<Expr>, list: Vec<Expr>, negated: bool },
    IsNull { value: Box<Expr>, negated: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    String(String),
    Bool(bool),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Negate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Like,
    ILike,
    Add,
    Sub,
    Concat,
    Mul,
    Div,
    Mod,
}

/// Parse a full token stream into a tree.
///
/// `source_len` anchors end-of-input errors at the right byte offset.
pub fn parse_tokens(tokens: &[SpannedToken], source_len: usize) -> Result<Expr, ParseError> {
    let mut parser = Parser {
        tokens,
        pos: 0,
        source_len,
    };
    let expr = parser.parse_expr()?;
    if let Some(trailing) = parser.peek() {
        return Err(ParseError::new(
            format!("syntax error, unexpected {}", trailing.token.describe()),
            trailing.start,
        ));
    }
    Ok(expr)
}

struct Parser<'a> {
    tokens: &'a [SpannedToken],
    pos: usize,
    source_len: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&'a SpannedToken> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&'a SpannedToken> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Consume the next token when it equals `expected`.
    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek().map(|t| &t.token) == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Syntax error at the current position.
    fn unexpected(&self, expecting: &str) -> ParseError {
        match self.peek() {
            Some(found) => ParseError::new(
                format!(
                    "syntax error, unexpected {}, expecting {}",
                    found.token.describe(),
                    expecting
                ),
                found.start,
            ),
            None => ParseError::new(
                format!(
                    "syntax error, unexpected end of input, expecting {}",
                    expecting
                ),
                self.source_len,
            ),
        }
    }

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;
        while self.eat(&Token::Or) {
            let right = self.parse_and()?;
            left = Expr::Binary {
                op: BinaryOp::Or,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_not()?;
        while self.eat(&Token::And) {
            let right = self.parse_not()?;
            left = Expr::Binary {
                op: BinaryOp::And,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expr, ParseError> {
        if self.eat(&Token::Not) {
            let operand = self.parse_not()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
            });
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_additive()?;

        if self.eat(&Token::Is) {
            let negated = self.eat(&Token::Not);
            if !self.eat(&Token::Null) {
                return Err(self.unexpected("NULL"));
            }
            return Ok(Expr::IsNull {
                value: Box::new(left),
                negated,
            });
        }

        if self.eat(&Token::Not) {
            if self.eat(&Token::In) {
                return self.parse_in_list(left, true);
            }
            if let Some(op) = self.eat_like() {
                let right = self.parse_additive()?;
                let comparison = Expr::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                };
                return Ok(Expr::Unary {
                    op: UnaryOp::Not,
                    operand: Box::new(comparison),
                });
            }
            return Err(self.unexpected("IN or LIKE"));
        }

        if self.eat(&Token::In) {
            return self.parse_in_list(left, false);
        }

        let op = match self.peek().map(|t| &t.token) {
            Some(Token::Eq) => Some(BinaryOp::Eq),
            Some(Token::NotEq) => Some(BinaryOp::NotEq),
            Some(Token::Lt) => Some(BinaryOp::Lt),
            Some(Token::LtEq) => Some(BinaryOp::LtEq),
            Some(Token::Gt) => Some(BinaryOp::Gt),
            Some(Token::GtEq) => Some(BinaryOp::GtEq),
            Some(Token::Like) => Some(BinaryOp::Like),
            Some(Token::ILike) => Some(BinaryOp::ILike),
            _ => None,
        };
        if let Some(op) = op {
            self.pos += 1;
            let right = self.parse_additive()?;
            return Ok(Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            });
        }

        Ok(left)
    }

    fn eat_like(&mut self) -> Option<BinaryOp> {
        if self.eat(&Token::Like) {
            return Some(BinaryOp::Like);
        }
        if self.eat(&Token::ILike) {
            return Some(BinaryOp::ILike);
        }
        None
    }

    fn parse_in_list(&mut self, value: Expr, negated: bool) -> Result<Expr, ParseError> {
        if !self.eat(&Token::LeftParen) {
            return Err(self.unexpected("'('"));
        }
        let mut list = vec![self.parse_expr()?];
        loop {
            if self.eat(&Token::Comma) {
                list.push(self.parse_expr()?);
                continue;
            }
            if self.eat(&Token::RightParen) {
                break;
            }
            return Err(self.unexpected("',' or ')'"));
        }
        Ok(Expr::InList {
            value: Box::new(value),
            list,
            negated,
        })
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek().map(|t| &t.token) {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                Some(Token::Concat) => BinaryOp::Concat,
                _ => break,
            };
            self.pos += 1;
            let right = self.parse_multiplicative()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek().map(|t| &t.token) {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::Percent) => BinaryOp::Mod,
                _ => break,
            };
            self.pos += 1;
            let right = self.parse_unary()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if self.eat(&Token::Minus) {
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Negate,
                operand: Box::new(operand),
            });
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let Some(spanned) = self.advance() else {
            return Err(ParseError::new(
                "syntax error, unexpected end of input, expecting an expression",
                self.source_len,
            ));
        };

        match &spanned.token {
            Token::Number(value) => Ok(Expr::Literal(Literal::Number(*value))),
            Token::String(value) => Ok(Expr::Literal(Literal::String(value.clone()))),
            Token::True => Ok(Expr::Literal(Literal::Bool(true))),
            Token::False => Ok(Expr::Literal(Literal::Bool(false))),
            Token::Null => Ok(Expr::Literal(Literal::Null)),
            Token::Variable(name) => Ok(Expr::Variable(name.clone())),
            Token::QuotedIdentifier(name) => Ok(Expr::ColumnRef(name.clone())),
            Token::Identifier(name) => {
                if self.eat(&Token::LeftParen) {
                    self.parse_function_args(name.clone())
                } else {
                    Ok(Expr::ColumnRef(name.clone()))
                }
            }
            Token::LeftParen => {
                let inner = self.parse_expr()?;
                if !self.eat(&Token::RightParen) {
                    return Err(self.unexpected("')'"));
                }
                Ok(inner)
            }
            _ => Err(ParseError::new(
                format!(
                    "syntax error, unexpected {}, expecting an expression",
                    spanned.token.describe()
                ),
                spanned.start,
            )),
        }
    }

    fn parse_function_args(&mut self, name: String) -> Result<Expr, ParseError> {
        let mut args = Vec::new();
        if self.eat(&Token::RightParen) {
            return Ok(Expr::FunctionCall { name, args });
        }
        args.push(self.parse_expr()?);
        loop {
            if self.eat(&Token::Comma) {
                args.push(self.parse_expr()?);
                continue;
            }
            if self.eat(&Token::RightParen) {
                break;
            }
            return Err(self.unexpected("',' or ')'"));
        }
        Ok(Expr::FunctionCall { name, args })
    }
}
