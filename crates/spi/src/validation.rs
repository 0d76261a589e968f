use dsc_error::Result;
use serde_json::{Map, Value};

pub type Claims = Map<String, Value>;

/// A check applied to the claims of an already-verified token.
pub trait ValidationRule: Send + Sync {
    fn check_rule(&self, claims: &Claims) -> Result<()>;
}
