use super::contract::Criterion;
use dsc_error::{ConnectorError, ErrorCode, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_LIMIT: usize = 50;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = ConnectorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ASC" => Ok(SortOrder::Asc),
            "DESC" => Ok(SortOrder::Desc),
            other => Err(ConnectorError::new(
                ErrorCode::InvalidRequest,
                format!("Invalid sort order '{}', expected ASC or DESC", other),
            )),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "ASC"),
            SortOrder::Desc => write!(f, "DESC"),
        }
    }
}

/// Paging, sorting and filtering for list queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuerySpec {
    pub offset: usize,
    pub limit: usize,
    pub sort_order: SortOrder,
    pub sort_field: Option<String>,
    pub filter: Option<String>,
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_LIMIT,
            sort_order: SortOrder::Asc,
            sort_field: None,
            filter: None,
        }
    }
}

impl QuerySpec {
    pub fn none() -> Self {
        Self::default()
    }

    /// Parses `filter` as `field op value`; the value may contain spaces.
    pub fn filter_expression(&self) -> Result<Option<Criterion>> {
        let Some(filter) = self.filter.as_deref().map(str::trim) else {
            return Ok(None);
        };
        if filter.is_empty() {
            return Ok(None);
        }

        let mut parts = filter.splitn(3, char::is_whitespace);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(left), Some(op), Some(right)) if !right.trim().is_empty() => Ok(Some(
                Criterion::new(left, op, right.trim().to_string()),
            )),
            _ => Err(ConnectorError::new(
                ErrorCode::InvalidRequest,
                format!(
                    "Filter expression '{}' must have the form 'field operator value'",
                    filter
                ),
            )),
        }
    }
}
