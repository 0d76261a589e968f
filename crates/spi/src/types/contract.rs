use dsc_error::{ConnectorError, ErrorCode, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single `left op right` comparison used to select assets or filter queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Criterion {
    pub operand_left: String,
    pub operator: String,
    pub operand_right: Value,
}

impl Criterion {
    pub fn new(
        operand_left: impl Into<String>,
        operator: impl Into<String>,
        operand_right: impl Into<Value>,
    ) -> Self {
        Self {
            operand_left: operand_left.into(),
            operator: operator.into(),
            operand_right: operand_right.into(),
        }
    }

    /// Evaluates the criterion against a candidate property value.
    ///
    /// A missing candidate only satisfies `!=`. Unknown operators are errors.
    pub fn matches(&self, candidate: Option<&Value>) -> Result<bool> {
        let operator = self.operator.trim().to_ascii_lowercase();
        let Some(candidate) = candidate else {
            return match operator.as_str() {
                "!=" => Ok(true),
                "=" | "in" | "like" => Ok(false),
                _ => Err(self.unsupported()),
            };
        };

        match operator.as_str() {
            "=" => Ok(value_text(candidate) == value_text(&self.operand_right)),
            "!=" => Ok(value_text(candidate) != value_text(&self.operand_right)),
            "in" => {
                let needle = value_text(candidate);
                Ok(self.right_list().iter().any(|v| *v == needle))
            }
            "like" => Ok(like_matches(
                &value_text(candidate),
                &value_text(&self.operand_right),
            )),
            _ => Err(self.unsupported()),
        }
    }

    fn right_list(&self) -> Vec<String> {
        match &self.operand_right {
            Value::Array(items) => items.iter().map(value_text).collect(),
            other => value_text(other)
                .trim_start_matches('(')
                .trim_end_matches(')')
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    fn unsupported(&self) -> ConnectorError {
        ConnectorError::new(
            ErrorCode::InvalidRequest,
            format!("Operator [{}] is not supported", self.operator),
        )
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `%` matches any run of characters, everything else is literal.
fn like_matches(text: &str, pattern: &str) -> bool {
    let parts: Vec<&str> = pattern.split('%').collect();
    if parts.len() == 1 {
        return text == pattern;
    }

    let first = parts[0];
    let last = parts[parts.len() - 1];
    if !text.starts_with(first) || text.len() < first.len() + last.len() {
        return false;
    }

    let mut rest = &text[first.len()..];
    for part in &parts[1..parts.len() - 1] {
        match rest.find(part) {
            Some(pos) => rest = &rest[pos + part.len()..],
            None => return false,
        }
    }
    rest.ends_with(last)
}

/// Selects assets whose properties satisfy every criterion. Empty selects all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetSelectorExpression {
    pub criteria: Vec<Criterion>,
}

impl AssetSelectorExpression {
    pub fn select_all() -> Self {
        Self::default()
    }

    pub fn new(criteria: Vec<Criterion>) -> Self {
        Self { criteria }
    }

    pub fn with_constraint(
        mut self,
        left: impl Into<String>,
        operator: impl Into<String>,
        right: impl Into<Value>,
    ) -> Self {
        self.criteria.push(Criterion::new(left, operator, right));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractDefinition {
    pub id: String,
    pub access_policy_id: String,
    pub contract_policy_id: String,
    pub selector_expression: AssetSelectorExpression,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractAgreement {
    pub id: String,
    pub provider_agent_id: String,
    pub consumer_agent_id: String,
    pub contract_signing_date: i64,
    pub contract_start_date: i64,
    /// Epoch seconds.
    pub contract_end_date: i64,
    pub asset_id: String,
    pub policy_id: String,
}

impl ContractAgreement {
    pub fn is_expired_at(&self, epoch_seconds: i64) -> bool {
        self.contract_end_date < epoch_seconds
    }
}
