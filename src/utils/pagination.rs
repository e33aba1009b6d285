use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

pub const DEFAULT_LIMIT: i64 = 10;

/// Query-string numbers arrive as strings; empty values (`?limit=`) are
/// treated as absent rather than rejected.
fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s.parse::<i64>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub total: i64,
    pub limit: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    pub has_more: bool,
}

/// Offset pagination, with `page` accepted as an alternative to `offset`
/// (`offset = (page - 1) * limit`).
///
/// Out-of-range values are a validation error, not something to clamp:
/// a `limit` of zero or less gets a 422, never a silent default.
#[derive(Debug, Default, Deserialize, Validate, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    #[validate(range(min = 0, message = "offset must not be negative"))]
    pub offset: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    #[validate(range(min = 1, message = "page must be positive"))]
    pub page: Option<i64>,
}

impl PaginationParams {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        if let Some(page) = self.page {
            (page - 1).saturating_mul(self.limit())
        } else {
            self.offset.unwrap_or(0)
        }
    }

    pub fn page(&self) -> Option<i64> {
        self.page
    }
}
