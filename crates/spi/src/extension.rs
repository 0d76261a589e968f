use crate::context::ServiceExtensionContext;
use async_trait::async_trait;
use dsc_error::Result;
use std::fmt;

/// A feature an extension needs from another extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InjectionPoint {
    pub feature: String,
    pub required: bool,
}

impl InjectionPoint {
    pub fn required(feature: impl Into<String>) -> Self {
        Self {
            feature: feature.into(),
            required: true,
        }
    }

    pub fn optional(feature: impl Into<String>) -> Self {
        Self {
            feature: feature.into(),
            required: false,
        }
    }
}

impl fmt::Display for InjectionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.required {
            write!(f, "required feature \"{}\"", self.feature)
        } else {
            write!(f, "optional feature \"{}\"", self.feature)
        }
    }
}

/// A pluggable component booted by the runtime.
///
/// Extensions are initialised in dependency order, then started, and shut
/// down in reverse order.
#[async_trait]
pub trait ServiceExtension: Send + Sync {
    fn name(&self) -> &str;

    fn provides(&self) -> Vec<&'static str> {
        Vec::new()
    }

    fn requires(&self) -> Vec<InjectionPoint> {
        Vec::new()
    }

    /// Reads settings, resolves services and registers its own.
    fn initialize(&mut self, context: &mut ServiceExtensionContext) -> Result<()>;

    async fn start(&mut self) -> Result<()> {
        Ok(())
    }

    async fn shutdown(&mut self) {}
}
