//! GetPrint request validation.
//!
//! Validation happens in two stages. [`validate_print_params`] checks what
//! can be checked from the query string alone; [`resolve_print`] then
//! consults the project for the layout, and parses and rewrites the filter
//! when the layout is an atlas. The stages run in a fixed order so a given
//! bad request always reports the same error.

use atlas_common::error::{AtlasError, AtlasResult};
use layout_engine::expression;
use layout_engine::{LayoutInfo, OutputFormat, Project};

use crate::optimizer::{optimize_expression, PkPolicy};
use crate::params::RequestParams;

/// Parameter level form of a GetPrint request, before the project is
/// consulted.
#[derive(Debug, Clone, PartialEq)]
pub struct PrintParams {
    pub template: String,
    /// Raw EXP_FILTER value; empty values count as absent.
    pub filter: Option<String>,
    pub fixed_scale: Option<i64>,
    pub scales: Option<Vec<i64>>,
    pub format: OutputFormat,
    /// Lower-cased extra parameters offered to layout text items.
    pub substitutions: Vec<(String, String)>,
}

/// A print request resolved against a project.
#[derive(Debug, Clone)]
pub struct ResolvedPrint {
    pub params: PrintParams,
    pub layout: LayoutInfo,
    /// Filter to hand to the engine, `$id` rewrite applied. None for
    /// reports, which have no coverage layer.
    pub filter: Option<String>,
}

/// Validate the pure parameter part of a GetPrint request.
///
/// Order: TEMPLATE presence, SCALE/SCALES conflict, SCALE parse, SCALES
/// parse.
pub fn validate_print_params(params: &RequestParams) -> AtlasResult<PrintParams> {
    let template = params
        .get_nonempty("TEMPLATE")
        .ok_or_else(|| AtlasError::MissingParameter("TEMPLATE".to_string()))?
        .to_string();

    let scale = params.get_nonempty("SCALE");
    let scales = params.get_nonempty("SCALES");
    if scale.is_some() && scales.is_some() {
        return Err(AtlasError::ConflictingScales);
    }

    let fixed_scale = match scale {
        Some(value) => Some(parse_scale(value, "SCALE")?),
        None => None,
    };

    let scales = match scales {
        Some(value) => Some(
            value
                .split(',')
                .map(|entry| parse_scale(entry, "SCALES"))
                .collect::<AtlasResult<Vec<i64>>>()?,
        ),
        None => None,
    };

    let format = params
        .get_nonempty("FORMAT")
        .map(OutputFormat::from_param)
        .unwrap_or_default();

    Ok(PrintParams {
        template,
        filter: params.get_nonempty("EXP_FILTER").map(str::to_string),
        fixed_scale,
        scales,
        format,
        substitutions: params
            .extras()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    })
}

fn parse_scale(value: &str, param: &str) -> AtlasResult<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| AtlasError::InvalidNumber(param.to_string()))
}

/// Resolve a validated request against a project.
///
/// Order: unknown layout, unsupported layout kind, missing filter, filter
/// syntax, filter column references. Reports skip the filter work
/// entirely; EXP_FILTER and scales are ignored for them.
pub fn resolve_print(
    project: &dyn Project,
    params: PrintParams,
    policy: PkPolicy,
) -> AtlasResult<ResolvedPrint> {
    let layout = project
        .layout(&params.template)
        .ok_or_else(|| AtlasError::LayoutNotFound(params.template.clone()))?;

    if layout.is_report() {
        return Ok(ResolvedPrint {
            filter: None,
            layout,
            params,
        });
    }

    let Some(atlas) = layout.atlas.clone().filter(|a| a.enabled) else {
        return Err(AtlasError::UnsupportedLayout(params.template.clone()));
    };

    let raw_filter = params.filter.clone().ok_or(AtlasError::FilterRequired)?;

    let schema = project
        .layer_schema(&atlas.coverage_layer)
        .ok_or_else(|| {
            AtlasError::Internal(format!(
                "Coverage layer '{}' has no schema",
                atlas.coverage_layer
            ))
        })?;

    let optimized = optimize_expression(schema, &raw_filter, policy);

    let parsed = expression::parse(&optimized)
        .map_err(|e| AtlasError::ExpressionSyntax(e.to_string()))?;
    parsed
        .prepare(schema)
        .map_err(|e| AtlasError::ExpressionEval(e.to_string()))?;

    Ok(ResolvedPrint {
        filter: Some(optimized),
        layout,
        params,
    })
}

// ============================================================================
// Tests
// ============================================================================
