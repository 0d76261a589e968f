//! Orders extensions by the features they provide and require, then boots them.
use dsc_error::{suggest, ConnectorError, ErrorCode, ErrorContext, Result};
use dsc_spi::{ServiceExtension, ServiceExtensionContext};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

pub struct ExtensionLoader;

impl ExtensionLoader {
    /// Sorts extensions so that every provider precedes its dependents.
    ///
    /// Ties keep registration order. A required feature that no extension
    /// provides is an error, as is a dependency cycle.
    pub fn sort_extensions(
        extensions: Vec<Box<dyn ServiceExtension>>,
    ) -> Result<Vec<Box<dyn ServiceExtension>>> {
        let mut providers: BTreeMap<&'static str, Vec<usize>> = BTreeMap::new();
        for (index, extension) in extensions.iter().enumerate() {
            for feature in extension.provides() {
                providers.entry(feature).or_default().push(index);
            }
        }

        let mut dependencies: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); extensions.len()];
        for (index, extension) in extensions.iter().enumerate() {
            for point in extension.requires() {
                match providers.get(point.feature.as_str()) {
                    Some(indices) => {
                        dependencies[index].extend(indices.iter().copied().filter(|i| *i != index));
                    }
                    None if point.required => {
                        let available: Vec<String> =
                            providers.keys().map(|f| f.to_string()).collect();
                        let mut err = ConnectorError::new(
                            ErrorCode::UnsatisfiedDependency,
                            format!(
                                "Extension \"{}\" has an unsatisfied {}",
                                extension.name(),
                                point
                            ),
                        );
                        if let Some(candidate) = suggest(&point.feature, &available) {
                            err = err.with_hint(format!("Did you mean \"{}\"?", candidate));
                        }
                        return Err(err.with_context(ErrorContext::InjectionPoint {
                            extension: extension.name().to_string(),
                            feature: point.feature.clone(),
                            available_features: available,
                        }));
                    }
                    None => {
                        debug!(
                            extension = extension.name(),
                            feature = %point.feature,
                            "Optional feature not provided"
                        );
                    }
                }
            }
        }

        let mut order = Vec::with_capacity(extensions.len());
        let mut placed = vec![false; extensions.len()];
        while order.len() < extensions.len() {
            let next = (0..extensions.len()).find(|&i| {
                !placed[i] && dependencies[i].iter().all(|dep| placed[*dep])
            });
            match next {
                Some(i) => {
                    placed[i] = true;
                    order.push(i);
                }
                None => {
                    let stuck: Vec<&str> = (0..extensions.len())
                        .filter(|i| !placed[*i])
                        .map(|i| extensions[i].name())
                        .collect();
                    return Err(ConnectorError::new(
                        ErrorCode::DependencyCycle,
                        format!(
                            "Dependency cycle detected between extensions: {}",
                            stuck.join(", ")
                        ),
                    ));
                }
            }
        }

        let mut slots: Vec<Option<Box<dyn ServiceExtension>>> =
            extensions.into_iter().map(Some).collect();
        Ok(order
            .into_iter()
            .filter_map(|i| slots[i].take())
            .collect())
    }

    /// Initialises every extension in order, then starts every extension.
    pub async fn boot_extensions(
        extensions: &mut [Box<dyn ServiceExtension>],
        context: &mut ServiceExtensionContext,
    ) -> Result<()> {
        for extension in extensions.iter_mut() {
            extension.initialize(context)?;
            for feature in extension.provides() {
                context.register_feature(feature);
            }
            info!("Initialized {}", extension.name());
        }

        for extension in extensions.iter_mut() {
            extension.start().await?;
            info!("Started {}", extension.name());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use dsc_spi::InjectionPoint;

    struct Fake {
        name: &'static str,
        provides: Vec<&'static str>,
        requires: Vec<InjectionPoint>,
    }

    #[async_trait]
    impl ServiceExtension for Fake {
        fn name(&self) -> &str {
            self.name
        }

        fn provides(&self) -> Vec<&'static str> {
            self.provides.clone()
        }

        fn requires(&self) -> Vec<InjectionPoint> {
            self.requires.clone()
        }

        fn initialize(&mut self, _context: &mut ServiceExtensionContext) -> Result<()> {
            Ok(())
        }
    }

    fn fake(
        name: &'static str,
        provides: &[&'static str],
        requires: Vec<InjectionPoint>,
    ) -> Box<dyn ServiceExtension> {
        Box::new(Fake {
            name,
            provides: provides.to_vec(),
            requires,
        })
    }

    fn names(extensions: &[Box<dyn ServiceExtension>]) -> Vec<&str> {
        extensions.iter().map(|e| e.name()).collect()
    }

    #[test]
    fn test_providers_come_first() {
        let sorted = ExtensionLoader::sort_extensions(vec![
            fake("api", &[], vec![InjectionPoint::required("web")]),
            fake("web", &["web"], vec![InjectionPoint::required("core")]),
            fake("core", &["core"], vec![]),
        ])
        .unwrap();
        assert_eq!(names(&sorted), vec!["core", "web", "api"]);
    }

    #[test]
    fn test_registration_order_is_stable() {
        let sorted = ExtensionLoader::sort_extensions(vec![
            fake("b", &[], vec![]),
            fake("a", &[], vec![]),
            fake("c", &[], vec![]),
        ])
        .unwrap();
        assert_eq!(names(&sorted), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_missing_required_feature() {
        let err = ExtensionLoader::sort_extensions(vec![
            fake("core", &["dsc:core:retry"], vec![]),
            fake("api", &[], vec![InjectionPoint::required("dsc:core:retyr")]),
        ])
        .err()
        .unwrap();
        assert_eq!(err.code, ErrorCode::UnsatisfiedDependency);
        assert!(err.message.contains("\"api\""));
        assert!(err.message.contains("dsc:core:retyr"));
        assert_eq!(err.hint.as_deref(), Some("Did you mean \"dsc:core:retry\"?"));
    }

    #[test]
    fn test_missing_optional_feature_is_ignored() {
        let sorted = ExtensionLoader::sort_extensions(vec![fake(
            "api",
            &[],
            vec![InjectionPoint::optional("metrics")],
        )])
        .unwrap();
        assert_eq!(names(&sorted), vec!["api"]);
    }

    #[test]
    fn test_cycle_is_detected() {
        let err = ExtensionLoader::sort_extensions(vec![
            fake("a", &["a"], vec![InjectionPoint::required("b")]),
            fake("b", &["b"], vec![InjectionPoint::required("a")]),
        ])
        .err()
        .unwrap();
        assert_eq!(err.code, ErrorCode::DependencyCycle);
        assert!(err.message.contains("a, b"));
    }

    #[tokio::test]
    async fn test_boot_registers_features() {
        let mut extensions = vec![fake("core", &["core"], vec![])];
        let mut context = ServiceExtensionContext::new(dsc_common::config::empty());
        ExtensionLoader::boot_extensions(&mut extensions, &mut context)
            .await
            .unwrap();
        assert!(context.has_feature("core"));
    }
}
