//! Filter rewrite: `$id` to the primary key column.

use std::str::FromStr;

use tracing::info;

use atlas_common::schema::{FieldType, LayerSchema};
use layout_engine::expression::{lex, Token};

/// Which primary key column types may replace `$id`.
///
/// Feature row ids are integers. Substituting a column of another type
/// shifts comparison semantics, so how far the rewrite reaches is a
/// deployment choice rather than a constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PkPolicy {
    /// Integer columns only.
    IntegerOnly,
    /// Integer and floating point columns.
    #[default]
    Numeric,
    /// Any single primary key column.
    Any,
}

impl PkPolicy {
    pub fn allows(&self, field_type: FieldType) -> bool {
        match self {
            PkPolicy::IntegerOnly => field_type.is_integer(),
            PkPolicy::Numeric => field_type.is_numeric(),
            PkPolicy::Any => true,
        }
    }
}

impl FromStr for PkPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "integer-only" | "integer" => Ok(PkPolicy::IntegerOnly),
            "numeric" => Ok(PkPolicy::Numeric),
            "any" => Ok(PkPolicy::Any),
            other => Err(format!("unknown primary key policy '{}'", other)),
        }
    }
}

/// Replace `$id` tokens in a filter with the layer's primary key column.
///
/// Filtering on `$id` forces the engine to scan every feature, while an
/// indexed key column does not. The rewrite only fires when it is provably
/// safe: the filter must tokenize, the layer must declare exactly one
/// primary key column, and that column's type must pass `policy`. On any
/// other input the filter comes back unchanged. Never fails.
///
/// Replacement is token based. Only `$id` tokens are touched; the same
/// characters inside a string constant are plain text and survive as-is.
pub fn optimize_expression(schema: &LayerSchema, filter: &str, policy: PkPolicy) -> String {
    let Ok(tokens) = lex(filter) else {
        // Not tokenizable; validation will report the syntax error.
        return filter.to_string();
    };

    let spans: Vec<(usize, usize)> = tokens
        .iter()
        .filter(|t| matches!(&t.token, Token::Variable(name) if name == "id"))
        .map(|t| (t.start, t.end))
        .collect();
    if spans.is_empty() {
        return filter.to_string();
    }

    let Some(field) = schema.single_primary_key() else {
        return filter.to_string();
    };
    if !policy.allows(field.field_type) {
        return filter.to_string();
    }

    let replacement = quote_identifier(&field.name);
    let mut out = String::with_capacity(filter.len() + replacement.len());
    let mut cursor = 0;
    for (start, end) in spans {
        out.push_str(&filter[cursor..start]);
        out.push_str(&replacement);
        cursor = end;
    }
    out.push_str(&filter[cursor..]);

    info!(column = %field.name, "$id has been replaced by the primary key column");
    out
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

// ============================================================================
// Tests
// ============================================================================
