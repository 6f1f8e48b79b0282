//! The engine's filter expression language.
//!
//! Atlas feature filters arrive as text (`EXP_FILTER=id in (1, 2)`). This
//! module tokenizes and parses that text, and checks every column reference
//! against a layer schema before the engine is asked to evaluate it. The
//! token spans produced by the lexer also drive the `$id` rewrite in the
//! protocol crate, so replacements never touch string constants.

pub mod lexer;
pub mod parser;

use thiserror::Error;

use atlas_common::schema::LayerSchema;

pub use lexer::{lex, SpannedToken, Token};
pub use parser::{BinaryOp, Expr, Literal, UnaryOp};

/// Error raised while tokenizing or parsing an expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    /// Byte offset in the source where the error was detected.
    pub position: usize,
}

impl ParseError {
    pub(crate) fn new(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

/// Error raised when an expression references something the layer does not
/// have.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct EvalError {
    pub message: String,
}

impl EvalError {
    fn new(message: String) -> Self {
        Self { message }
    }
}

/// A parsed filter expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    root: Expr,
}

impl Expression {
    pub fn root(&self) -> &Expr {
        &self.root
    }

    /// Check every column and variable reference against a layer schema.
    ///
    /// Mirrors what the engine does when it prepares a filter: the
    /// expression is not evaluated, only resolved.
    pub fn prepare(&self, schema: &LayerSchema) -> Result<(), EvalError> {
        check_references(&self.root, schema)
    }
}

/// Tokenize and parse an expression.
pub fn parse(input: &str) -> Result<Expression, ParseError> {
    let tokens = lexer::lex(input)?;
    let root = parser::parse_tokens(&tokens, input.len())?;
    Ok(Expression { root })
}

fn check_references(expr: &Expr, schema: &LayerSchema) -> Result<(), EvalError> {
    match expr {
        Expr::ColumnRef(name) => {
            if !schema.has_field(name) {
                return Err(EvalError::new(format!("Column '{}' not found", name)));
            }
            Ok(())
        }
        Expr::Variable(name) => {
            // The row id is the only variable the atlas context defines.
            if name != "id" {
                return Err(EvalError::new(format!("Variable '{}' not found", name)));
            }
            Ok(())
        }
        Expr::Literal(_) => Ok(()),
        Expr::FunctionCall { args, .. } => {
            for arg in args {
                check_references(arg, schema)?;
            }
            Ok(())
        }
        Expr::Unary { operand, .. } => check_references(operand, schema),
        Expr::Binary { left, right, .. } => {
            check_references(left, schema)?;
            check_references(right, schema)
        }
        Expr::InList { value, list, .. } => {
            check_references(value, schema)?;
            for item in list {
                check_references(item, schema)?;
            }
            Ok(())
        }
        Expr::IsNull { value, .. } => check_references(value, schema),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_common::schema::{Field, FieldType};

    fn schema() -> LayerSchema {
        LayerSchema::new(
            vec![
                Field::new("id", FieldType::Integer),
                Field::new("name", FieldType::String),
            ],
            vec![0],
        )
    }

    #[test]
    fn test_parse_simple_comparison() {
        let expr = parse("id = 3").unwrap();
        assert!(matches!(expr.root(), Expr::Binary { .. }));
    }

    #[test]
    fn test_parse_in_list() {
        let expr = parse("id in (1, 2)").unwrap();
        let Expr::InList { list, negated, .. } = expr.root() else {
            panic!("expected IN list");
        };
        assert_eq!(list.len(), 2);
        assert!(!negated);
    }

    #[test]
    fn test_parse_unclosed_in_list() {
        let err = parse("id in (1, 2").unwrap_err();
        assert_eq!(
            err.message,
            "syntax error, unexpected end of input, expecting ',' or ')'"
        );
        assert_eq!(err.position, 11);
    }

    #[test]
    fn test_parse_empty_input() {
        let err = parse("").unwrap_err();
        assert!(err.message.contains("unexpected end of input"));
    }

    #[test]
    fn test_parse_trailing_token() {
        let err = parse("1 2").unwrap_err();
        assert_eq!(err.message, "syntax error, unexpected number");
    }

    #[test]
    fn test_prepare_known_column() {
        let expr = parse("id in (1, 2) and name = 'x'").unwrap();
        assert!(expr.prepare(&schema()).is_ok());
    }

    #[test]
    fn test_prepare_unknown_column() {
        let expr = parse("fakeId in (1, 2)").unwrap();
        let err = expr.prepare(&schema()).unwrap_err();
        assert_eq!(err.message, "Column 'fakeId' not found");
    }

    #[test]
    fn test_prepare_quoted_column() {
        let expr = parse("\"name\" = 'x'").unwrap();
        assert!(expr.prepare(&schema()).is_ok());

        let expr = parse("\"Name\" = 'x'").unwrap();
        assert!(expr.prepare(&schema()).is_err());
    }

    #[test]
    fn test_prepare_row_id_variable() {
        let expr = parse("$id = 3").unwrap();
        assert!(expr.prepare(&schema()).is_ok());
    }

    #[test]
    fn test_prepare_unknown_variable() {
        let expr = parse("$foo = 3").unwrap();
        let err = expr.prepare(&schema()).unwrap_err();
        assert_eq!(err.message, "Variable 'foo' not found");
    }

    #[test]
    fn test_prepare_function_arguments_checked() {
        let expr = parse("lower(name) = 'x'").unwrap();
        assert!(expr.prepare(&schema()).is_ok());

        let expr = parse("lower(missing) = 'x'").unwrap();
        assert!(expr.prepare(&schema()).is_err());
    }

    #[test]
    fn test_parse_operator_precedence() {
        // a = 1 or b = 2 and c = 3  parses as  a = 1 or (b = 2 and c = 3)
        let expr = parse("a = 1 or b = 2 and c = 3").unwrap();
        let Expr::Binary { op, right, .. } = expr.root() else {
            panic!("expected binary expression");
        };
        assert_eq!(*op, BinaryOp::Or);
        assert!(matches!(
            right.as_ref(),
            Expr::Binary {
                op: BinaryOp::And,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_is_null() {
        let expr = parse("name is null").unwrap();
        assert!(matches!(expr.root(), Expr::IsNull { negated: false, .. }));

        let expr = parse("name is not null").unwrap();
        assert!(matches!(expr.root(), Expr::IsNull { negated: true, .. }));
    }

    #[test]
    fn test_parse_not_in() {
        let expr = parse("id not in (1, 2)").unwrap();
        assert!(matches!(expr.root(), Expr::InList { negated: true, .. }));
    }
}
