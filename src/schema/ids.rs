/// Conversion between wire ids and store keys
///
/// GraphQL `ID`s travel as strings while the store keys rows by `i64`. All
/// parsing goes through [`parse_id`] so malformed input is rejected the same
/// way everywhere.

use crate::error::ApiError;
use async_graphql::dynamic::ResolverContext;
use async_graphql::{ErrorExtensions, Value};

/// Parse a wire id into a store key.
///
/// Only a non-empty run of ASCII digits that fits in `i64` is accepted; signs,
/// whitespace and anything else is an [`ApiError::InvalidId`].
pub fn parse_id(raw: &str) -> Result<i64, ApiError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::InvalidId(raw.to_string()));
    }

    raw.parse::<i64>()
        .map_err(|_| ApiError::InvalidId(raw.to_string()))
}

/// Render a store key as a wire id.
pub fn format_id(id: i64) -> Value {
    Value::String(id.to_string())
}

/// Read an `ID` argument as its raw string form.
///
/// `ID` literals may arrive as strings or integers. Returns `None` when the
/// argument is absent or null.
pub fn id_argument(ctx: &ResolverContext<'_>, name: &str) -> async_graphql::Result<Option<String>> {
    let Some(accessor) = ctx.args.get(name) else {
        return Ok(None);
    };

    match accessor.as_value() {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(ApiError::InvalidId(other.to_string()).extend()),
    }
}

/// Read and parse a required `ID` argument.
pub fn required_id(ctx: &ResolverContext<'_>, name: &str) -> async_graphql::Result<(String, i64)> {
    let raw = id_argument(ctx, name)?
        .ok_or_else(|| ApiError::InvalidId(String::new()).extend())?;
    let id = parse_id(&raw).map_err(|e| e.extend())?;
    Ok((raw, id))
}
