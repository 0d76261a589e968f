//! # Error Contexts
//!
//! Structured metadata attached to errors so API clients can react to them
//! programmatically.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ErrorContext {
    /// Context for DSC-1001/1002 (setting errors)
    Setting { key: String, value: Option<String> },

    /// Context for DSC-1003 (port mapping conflicts)
    PortMapping {
        key: String,
        existing: std::collections::BTreeMap<String, String>,
    },

    /// Context for DSC-2001 (ObjectNotFound) and DSC-3001
    ObjectNotFound { object_type: String, id: String },

    /// Context for DSC-2002 (ObjectExists)
    ObjectExists { object_type: String, id: String },

    /// Context for DSC-2003/3005 (validation failures)
    Validation { errors: Vec<String> },

    /// Context for DSC-5005 (unsatisfied injection point)
    InjectionPoint {
        extension: String,
        feature: String,
        available_features: Vec<String>,
    },

    /// Generic key-value context for extensibility
    Generic {
        #[serde(flatten)]
        data: std::collections::HashMap<String, serde_json::Value>,
    },
}
