//! Tokenizer for the filter expression grammar.

use super::ParseError;

/// A token and the byte range it occupies in the source text.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    /// Single quoted string constant, unescaped.
    String(String),
    /// Bare column or function name.
    Identifier(String),
    /// Double quoted column reference, unescaped.
    QuotedIdentifier(String),
    /// `$name` special variable.
    Variable(String),

    // Keywords
    And,
    Or,
    Not,
    In,
    Is,
    Like,
    ILike,
    Null,
    True,
    False,

    // Operators and punctuation
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Concat,
    LeftParen,
    RightParen,
    Comma,
}

impl Token {
    /// How the token reads in a syntax error message.
    pub(crate) fn describe(&self) -> String {
        match self {
            Token::Number(_) => "number".to_string(),
            Token::String(_) => "string constant".to_string(),
            Token::Identifier(name) => format!("'{}'", name),
            Token::QuotedIdentifier(name) => format!("\"{}\"", name),
            Token::Variable(name) => format!("'${}'", name),
            Token::And => "AND".to_string(),
            Token::Or => "OR".to_string(),
            Token::Not => "NOT".to_string(),
            Token::In => "IN".to_string(),
            Token::Is => "IS".to_string(),
            Token::Like => "LIKE".to_string(),
            Token::ILike => "ILIKE".to_string(),
            Token::Null => "NULL".to_string(),
            Token::True => "TRUE".to_string(),
            Token::False => "FALSE".to_string(),
            Token::Eq => "'='".to_string(),
            Token::NotEq => "'<>'".to_string(),
            Token::Lt => "'<'".to_string(),
            Token::LtEq => "'<='".to_string(),
            Token::Gt => "'>'".to_string(),
            Token::GtEq => "'>='".to_string(),
            Token::Plus => "'+'".to_string(),
            Token::Minus => "'-'".to_string(),
            Token::Star => "'*'".to_string(),
            Token::Slash => "'/'".to_string(),
            Token::Percent => "'%'".to_string(),
            Token::Concat => "'||'".to_string(),
            Token::LeftParen => "'('".to_string(),
            Token::RightParen => "')'".to_string(),
            Token::Comma => "','".to_string(),
        }
    }
}

fn keyword(word: &str) -> Option<Token> {
    match word.to_ascii_uppercase().as_str() {
        "AND" => Some(Token::And),
        "OR" => Some(Token::Or),
        "NOT" => Some(Token::Not),
        "IN" => Some(Token::In),
        "IS" => Some(Token::Is),
        "LIKE" => Some(Token::Like),
        "ILIKE" => Some(Token::ILike),
        "NULL" => Some(Token::Null),
        "TRUE" => Some(Token::True),
        "FALSE" => Some(Token::False),
        _ => None,
    }
}

/// Tokenize an expression, keeping byte spans for every token.
pub fn lex(input: &str) -> Result<Vec<SpannedToken>, ParseError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let Some(c) = input[pos..].chars().next() else {
            break;
        };

        if c.is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        let start = pos;
        let token = match c {
            '0'..='9' => lex_number(input, &mut pos)?,
            '.' if pos + 1 < bytes.len() && bytes[pos + 1].is_ascii_digit() => {
                lex_number(input, &mut pos)?
            }
            '\'' => lex_string(input, &mut pos)?,
            '"' => lex_quoted_identifier(input, &mut pos)?,
            '$' => {
                pos += 1;
                let name = lex_word(input, &mut pos);
                if name.is_empty() {
                    return Err(ParseError::new("unexpected character '$'", start));
                }
                Token::Variable(name)
            }
            'a'..='z' | 'A'..='Z' | '_' => {
                let word = lex_word(input, &mut pos);
                keyword(&word).unwrap_or(Token::Identifier(word))
            }
            '=' => {
                pos += 1;
                Token::Eq
            }
            '!' => {
                if bytes.get(pos + 1) == Some(&b'=') {
                    pos += 2;
                    Token::NotEq
                } else {
                    return Err(ParseError::new("unexpected character '!'", start));
                }
            }
            '<' => match bytes.get(pos + 1) {
                Some(b'=') => {
                    pos += 2;
                    Token::LtEq
                }
                Some(b'>') => {
                    pos += 2;
                    Token::NotEq
                }
                _ => {
                    pos += 1;
                    Token::Lt
                }
            },
            '>' => {
                if bytes.get(pos + 1) == Some(&b'=') {
                    pos += 2;
                    Token::GtEq
                } else {
                    pos += 1;
                    Token::Gt
                }
            }
            '|' => {
                if bytes.get(pos + 1) == Some(&b'|') {
                    pos += 2;
                    Token::Concat
                } else {
                    return Err(ParseError::new("unexpected character '|'", start));
                }
            }
            '+' => {
                pos += 1;
                Token::Plus
            }
            '-' => {
                pos += 1;
                Token::Minus
            }
            '*' => {
                pos += 1;
                Token::Star
            }
            '/' => {
                pos += 1;
                Token::Slash
            }
            '%' => {
                pos += 1;
                Token::Percent
            }
            '(' => {
                pos += 1;
                Token::LeftParen
            }
            ')' => {
                pos += 1;
                Token::RightParen
            }
            ',' => {
                pos += 1;
                Token::Comma
            }
            other => {
                return Err(ParseError::new(
                    format!("unexpected character '{}'", other),
                    start,
                ));
            }
        };

        tokens.push(SpannedToken {
            token,
            start,
            end: pos,
        });
    }

    Ok(tokens)
}

fn lex_word(input: &str, pos: &mut usize) -> String {
    let bytes = input.as_bytes();
    let start = *pos;
    while *pos < bytes.len() && (bytes[*pos].is_ascii_alphanumeric() || bytes[*pos] == b'_') {
        *pos += 1;
    }
    input[start..*pos].to_string()
}

fn lex_number(input: &str, pos: &mut usize) -> Result<Token, ParseError> {
    let bytes = input.as_bytes();
    let start = *pos;
    while *pos < bytes.len() && bytes[*pos].is_ascii_digit() {
        *pos += 1;
    }
    if *pos < bytes.len() && bytes[*pos] == b'.' {
        *pos += 1;
        while *pos < bytes.len() && bytes[*pos].is_ascii_digit() {
            *pos += 1;
        }
    }
    if *pos < bytes.len() && (bytes[*pos] == b'e' || bytes[*pos] == b'E') {
        let mut lookahead = *pos + 1;
        if lookahead < bytes.len() && (bytes[lookahead] == b'+' || bytes[lookahead] == b'-') {
            lookahead += 1;
        }
        if lookahead < bytes.len() && bytes[lookahead].is_ascii_digit() {
            *pos = lookahead;
            while *pos < bytes.len() && bytes[*pos].is_ascii_digit() {
                *pos += 1;
            }
        }
    }
    let value: f64 = input[start..*pos]
        .parse()
        .map_err(|_| ParseError::new(format!("invalid number '{}'", &input[start..*pos]), start))?;
    Ok(Token::Number(value))
}

/// Single quoted string, with `''` as the escape for a quote.
fn lex_string(input: &str, pos: &mut usize) -> Result<Token, ParseError> {
    let bytes = input.as_bytes();
    let start = *pos;
    *pos += 1;
    let mut value = String::new();
    loop {
        match bytes.get(*pos) {
            None => return Err(ParseError::new("unterminated string constant", start)),
            Some(b'\'') => {
                if bytes.get(*pos + 1) == Some(&b'\'') {
                    value.push('\'');
                    *pos += 2;
                } else {
                    *pos += 1;
                    return Ok(Token::String(value));
                }
            }
            Some(_) => {
                let c = input[*pos..].chars().next().unwrap_or('\0');
                value.push(c);
                *pos += c.len_utf8();
            }
        }
    }
}

/// Double quoted column reference, with `""` as the escape for a quote.
fn lex_quoted_identifier(input: &str, pos: &mut usize) -> Result<Token, ParseError> {
    let bytes = input.as_bytes();
    let start = *pos;
    *pos += 1;
    let mut value = String::new();
    loop {
        match bytes.get(*pos) {
            None => return Err(ParseError::new("unterminated quoted identifier", start)),
            Some(b'"') => {
                if bytes.get(*pos + 1) == Some(&b'"') {
                    value.push('"');
                    *pos += 2;
                } else {
                    *pos += 1;
                    return Ok(Token::QuotedIdentifier(value));
                }
            }
            Some(_) => {
                let c = input[*pos..].chars().next().unwrap_or('\0');
                value.push(c);
                *pos += c.len_utf8();
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
