/// Custom GraphQL scalar for timestamps
///
/// `DateTime` values are RFC 3339 strings in UTC.

use async_graphql::dynamic::Scalar;
use async_graphql::Value;
use chrono::{DateTime as ChronoDateTime, Utc};

pub const DATE_TIME: &str = "DateTime";

/// Scalars registered alongside the object types
pub fn register_custom_scalars() -> Vec<Scalar> {
    vec![datetime_scalar()]
}

fn datetime_scalar() -> Scalar {
    Scalar::new(DATE_TIME)
        .description("RFC 3339 timestamp in UTC")
        .validator(|value| {
            if let Value::String(s) = value {
                ChronoDateTime::parse_from_rfc3339(s.as_str()).is_ok()
            } else {
                false
            }
        })
}

/// Render a timestamp for the `DateTime` scalar
pub fn format_datetime(at: &ChronoDateTime<Utc>) -> Value {
    Value::String(at.to_rfc3339())
}
