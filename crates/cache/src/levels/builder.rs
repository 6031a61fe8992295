//! Level table construction

use crate::compression::CompressionDefaults;
use crate::config::LevelConfig;
use crate::registry::{create_backend, BackendRegistry};
use splitcache_core::{BackendContext, CacheError, Result};
use tracing::{debug, info, warn};

use super::{Level, LevelTable, Threshold};

impl LevelTable {
    /// Build the table from level descriptors, fastest first
    ///
    /// Thresholds are derived so they strictly increase; global compression
    /// options are copied into levels whose backend type supports them.
    /// Any failure aborts the whole build.
    pub async fn build(
        configs: Vec<LevelConfig>,
        compression: CompressionDefaults,
        registry: &BackendRegistry,
        context: &BackendContext,
    ) -> Result<Self> {
        if configs.is_empty() {
            return Err(CacheError::invalid_backend(
                "split",
                "at least one cache level must be configured",
            ));
        }

        let mut levels = Vec::with_capacity(configs.len());
        let mut running_max: Option<Threshold> = None;

        for (ordinal, mut config) in configs.into_iter().enumerate() {
            let requested = config.take_max_lifetime()?;
            let threshold = Threshold::derive(requested, running_max);

            match (requested, threshold) {
                _ if running_max.is_some_and(|max| !max.is_bounded()) => {
                    warn!(
                        level = ordinal,
                        "Level follows an unbounded level and will not receive writes"
                    );
                }
                (Some(requested), Threshold::Bounded(derived)) if derived != requested => {
                    debug!(
                        level = ordinal,
                        requested, derived, "Raised level max lifetime above previous level"
                    );
                }
                _ => {}
            }
            running_max = Some(threshold);

            let registration = registry.resolve(&config.backend)?;
            if registration.supports_compression() {
                let applied = compression.apply_to(&mut config.options);
                if !applied.is_empty() {
                    debug!(level = ordinal, options = ?applied, "Propagated compression options");
                }
            }

            let backend = create_backend(
                registry,
                &config.backend,
                &config.options,
                &context.for_level(ordinal),
            )
            .await?;

            levels.push(Level {
                ordinal,
                backend_type: config.backend,
                threshold,
                options: config.options,
                backend,
            });
        }

        let table = Self { levels };

        info!(
            levels = table.len(),
            thresholds = %table
                .thresholds()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
            "Built split cache level table"
        );

        Ok(table)
    }
}

#[cfg(test)]
impl LevelTable {
    /// Table of null backends with fixed thresholds
    pub(crate) fn with_thresholds(thresholds: &[Threshold]) -> Self {
        use crate::backends::NullBackend;

        let levels = thresholds
            .iter()
            .enumerate()
            .map(|(ordinal, threshold)| Level {
                ordinal,
                backend_type: NullBackend::TYPE.to_string(),
                threshold: *threshold,
                options: Default::default(),
                backend: Box::new(NullBackend::new()),
            })
            .collect();

        Self { levels }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use splitcache_core::options::{COMPRESSION_LEVEL_OPTION, COMPRESSION_OPTION};
    use splitcache_core::NamedFrontend;
    use std::sync::Arc;

    fn context() -> BackendContext {
        BackendContext::new(Arc::new(NamedFrontend::new("levels_test")))
    }

    #[tokio::test]
    async fn test_thresholds_are_derived() {
        let configs = vec![
            LevelConfig::new("memory").with_max_lifetime(3600),
            LevelConfig::new("memory").with_max_lifetime(60),
            LevelConfig::new("null"),
        ];

        let table = LevelTable::build(
            configs,
            CompressionDefaults::default(),
            &BackendRegistry::default(),
            &context(),
        )
        .await
        .unwrap();

        assert_eq!(
            table.thresholds(),
            vec![
                Threshold::Bounded(3600),
                Threshold::Bounded(3601),
                Threshold::Unbounded
            ]
        );
        assert_eq!(table.max_level(), 2);
        assert_eq!(table.get(2).unwrap().backend_type(), "null");
    }

    #[tokio::test]
    async fn test_compression_is_propagated_to_capable_levels() {
        let configs = vec![
            LevelConfig::new("memory").with_max_lifetime(60),
            LevelConfig::new("memory")
                .with_max_lifetime(600)
                .with_option(COMPRESSION_LEVEL_OPTION, 9),
            LevelConfig::new("null"),
        ];

        let table = LevelTable::build(
            configs,
            CompressionDefaults::new(Some(true), Some(2)),
            &BackendRegistry::default(),
            &context(),
        )
        .await
        .unwrap();

        let first = table.get(0).unwrap().options();
        assert_eq!(first.get(COMPRESSION_OPTION), Some(&json!(true)));
        assert_eq!(first.get(COMPRESSION_LEVEL_OPTION), Some(&json!(2)));

        let second = table.get(1).unwrap().options();
        assert_eq!(second.get(COMPRESSION_OPTION), Some(&json!(true)));
        assert_eq!(second.get(COMPRESSION_LEVEL_OPTION), Some(&json!(9)));

        assert!(table.get(2).unwrap().options().is_empty());
    }

    #[tokio::test]
    async fn test_empty_table_is_rejected() {
        let err = LevelTable::build(
            Vec::new(),
            CompressionDefaults::default(),
            &BackendRegistry::default(),
            &context(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, CacheError::InvalidBackend { .. }));
    }

    #[tokio::test]
    async fn test_unknown_backend_aborts_build() {
        let configs = vec![
            LevelConfig::new("memory").with_max_lifetime(60),
            LevelConfig::new("apcu"),
        ];

        let err = LevelTable::build(
            configs,
            CompressionDefaults::default(),
            &BackendRegistry::default(),
            &context(),
        )
        .await
        .unwrap_err();

        match err {
            CacheError::InvalidBackend { backend_type, .. } => assert_eq!(backend_type, "apcu"),
            other => panic!("expected InvalidBackend, got {other:?}"),
        }
    }

    #[test]
    fn test_route_for_picks_first_admitting_level() {
        let table = LevelTable::with_thresholds(&[
            Threshold::Bounded(60),
            Threshold::Bounded(3600),
            Threshold::Bounded(86400),
        ]);

        assert_eq!(table.route_for(1), 0);
        assert_eq!(table.route_for(60), 0);
        assert_eq!(table.route_for(61), 1);
        assert_eq!(table.route_for(3600), 1);
        assert_eq!(table.route_for(86400), 2);
        // Nothing admits it: catch-all
        assert_eq!(table.route_for(86401), 2);
    }

    #[test]
    fn test_unlimited_lifetime_routes_numerically() {
        let table =
            LevelTable::with_thresholds(&[Threshold::Bounded(60), Threshold::Unbounded]);
        assert_eq!(table.route_for(0), 0);
        assert_eq!(table.route_for(u64::MAX), 1);
    }

    #[test]
    fn test_single_level_takes_everything() {
        let table = LevelTable::with_thresholds(&[Threshold::Bounded(10)]);
        assert_eq!(table.route_for(5), 0);
        assert_eq!(table.route_for(500), 0);
    }
}
