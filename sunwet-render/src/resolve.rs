//! Data resolution.
//!
//! Turns `FieldOrLiteral` / `QueryOrField` references into values against the
//! current row. `resolve_query_or_field` is the only place the engine waits
//! on anything.

use indexmap::IndexMap;
use sunwet_api::{DataContext, FieldOrLiteral, FileRef, QueryOrField, QueryRef, Value};
use tracing::debug;

use crate::collab::{FileUrls, QuerySource};
use crate::config::CompositePolicy;
use crate::error::RenderError;

/// Look up a field of a record row.
pub(crate) fn lookup<'a>(ctx: &'a DataContext, field: &str) -> Result<&'a Value, RenderError> {
    if !ctx.is_record() {
        return Err(RenderError::type_mismatch(format!(
            "can't read field `{}` from a {} row",
            field,
            ctx.value().kind_name()
        )));
    }
    ctx.get(field)
        .ok_or_else(|| RenderError::MissingField(field.to_string()))
}

pub fn resolve_field_or_literal(ctx: &DataContext, spec: &FieldOrLiteral) -> Result<Value, RenderError> {
    match spec {
        FieldOrLiteral::Literal(value) => Ok(value.clone()),
        FieldOrLiteral::Field(field) => lookup(ctx, field).cloned(),
    }
}

/// Resolve the rows of a `DataRows` widget.
///
/// Query parameters are resolved against `ctx`, the context of the widget
/// issuing the query.
pub async fn resolve_query_or_field(
    queries: &dyn QuerySource,
    ctx: &DataContext,
    spec: &QueryOrField,
) -> Result<Vec<DataContext>, RenderError> {
    match spec {
        QueryOrField::Field(field) => {
            let value = lookup(ctx, field)?;
            match value.as_list() {
                Some(items) => Ok(DataContext::rows(items)),
                None => Err(RenderError::type_mismatch(format!(
                    "field `{}` is a {}, not a list",
                    field,
                    value.kind_name()
                ))),
            }
        }
        QueryOrField::Query(query) => {
            let params = resolve_params(ctx, query)?;
            debug!(query = %query.id, params = params.len(), "dispatching query");
            let rows = queries
                .query(&query.id, &params)
                .await
                .map_err(|e| RenderError::Query {
                    id: query.id.clone(),
                    message: format!("{:#}", e),
                })?;
            debug!(query = %query.id, rows = rows.len(), "query settled");
            Ok(rows)
        }
    }
}

fn resolve_params(ctx: &DataContext, query: &QueryRef) -> Result<IndexMap<String, Value>, RenderError> {
    let mut params = IndexMap::with_capacity(query.params.len());
    for (name, spec) in &query.params {
        let value = resolve_field_or_literal(ctx, spec)?;
        if value.is_composite() {
            return Err(RenderError::type_mismatch(format!(
                "parameter `{}` of query `{}` is a {}, not a scalar",
                name,
                query.id,
                value.kind_name()
            )));
        }
        params.insert(name.clone(), value);
    }
    Ok(params)
}

fn composite(value: &Value, policy: CompositePolicy) -> Result<String, RenderError> {
    match policy {
        CompositePolicy::Serialize => Ok(value.to_json_string()),
        CompositePolicy::Reject => Err(RenderError::config(format!(
            "a {} value can't be shown in a leaf",
            value.kind_name()
        ))),
    }
}

/// Text for a leaf.
pub fn value_to_display_string(value: &Value, policy: CompositePolicy) -> Result<String, RenderError> {
    match value {
        Value::Null => Ok("-".to_string()),
        Value::Bool(true) => Ok("yes".to_string()),
        Value::Bool(false) => Ok("no".to_string()),
        Value::Int(n) => Ok(n.to_string()),
        // JSON number formatting keeps `4.0` and exponent forms intact.
        Value::Float(f) => Ok(serde_json::Number::from_f64(*f)
            .map(|n| n.to_string())
            .unwrap_or_else(|| f.to_string())),
        Value::String(s) => Ok(s.clone()),
        // Passed through as its token; never fetched.
        Value::File(file) => Ok(file.token()),
        Value::List(_) | Value::Record(_) => composite(value, policy),
    }
}

/// URL for an image or link.
pub fn value_to_url(value: &Value, files: &dyn FileUrls, policy: CompositePolicy) -> Result<String, RenderError> {
    match value {
        Value::File(file) => Ok(files.file_url(file)),
        Value::String(s) => match s.parse::<FileRef>() {
            Ok(file) => Ok(files.file_url(&file)),
            Err(_) => Ok(s.clone()),
        },
        Value::List(_) | Value::Record(_) => composite(value, policy),
        other => Err(RenderError::type_mismatch(format!(
            "a {} value isn't a url",
            other.kind_name()
        ))),
    }
}
