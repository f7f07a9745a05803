//! The set of upstream sources the service serves

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use indexmap::IndexMap;
use tokio::time::sleep;
use tracing::info;

use crate::config::FETCH_STAGGER_DELAY_MS;
use crate::version::cache::CacheStore;
use crate::version::refresh::{CacheOutcome, get_or_refresh};
use crate::version::source::{MinecraftSource, SourceKind, VersionSource};
use crate::version::sources::{
    DockerHubSource, ForgeSource, LoaderMetaSource, MojangSource, NeoForgeSource, PaperSource,
    PurpurSource,
};
use crate::version::types::NodeVersion;

/// Result of refreshing one source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshSummary {
    pub kind: SourceKind,
    pub count: usize,
    pub outcome: CacheOutcome,
}

/// Minecraft sources keyed by kind, plus the Node image source
pub struct SourceCatalog {
    minecraft: IndexMap<SourceKind, Arc<MinecraftSource>>,
    node: Arc<dyn VersionSource<Item = NodeVersion>>,
}

impl SourceCatalog {
    /// Builds a catalog from explicit sources, keyed by each source's kind
    pub fn new(
        minecraft: Vec<Arc<MinecraftSource>>,
        node: Arc<dyn VersionSource<Item = NodeVersion>>,
    ) -> Self {
        let minecraft = minecraft
            .into_iter()
            .map(|source| (source.kind(), source))
            .collect();
        Self { minecraft, node }
    }

    pub fn minecraft(&self, kind: SourceKind) -> Option<&Arc<MinecraftSource>> {
        self.minecraft.get(&kind)
    }

    pub fn minecraft_kinds(&self) -> impl Iterator<Item = SourceKind> + '_ {
        self.minecraft.keys().copied()
    }

    pub fn node(&self) -> &Arc<dyn VersionSource<Item = NodeVersion>> {
        &self.node
    }

    /// Runs [`get_or_refresh`] for every source.
    ///
    /// Sources run concurrently with staggered starts; each source still issues
    /// its own upstream calls one at a time.
    pub async fn refresh_all<C>(&self, cache: &C) -> Vec<RefreshSummary>
    where
        C: CacheStore + ?Sized,
    {
        let minecraft = self.minecraft.values().enumerate().map(|(i, source)| {
            let delay = Duration::from_millis(FETCH_STAGGER_DELAY_MS * i as u64);
            async move {
                sleep(delay).await;
                let refreshed = get_or_refresh(cache, source.as_ref()).await;
                RefreshSummary {
                    kind: source.kind(),
                    count: refreshed.items.len(),
                    outcome: refreshed.outcome,
                }
            }
        });

        let node = async {
            let refreshed = get_or_refresh(cache, self.node.as_ref()).await;
            RefreshSummary {
                kind: self.node.kind(),
                count: refreshed.items.len(),
                outcome: refreshed.outcome,
            }
        };

        let (mut summaries, node) = futures::join!(join_all(minecraft), node);
        summaries.push(node);

        for summary in &summaries {
            info!(
                "Refreshed {}: {} items ({:?})",
                summary.kind, summary.count, summary.outcome
            );
        }

        summaries
    }
}

impl Default for SourceCatalog {
    fn default() -> Self {
        let minecraft: Vec<Arc<MinecraftSource>> = vec![
            Arc::new(MojangSource::default()),
            Arc::new(PaperSource::default()),
            Arc::new(PurpurSource::default()),
            Arc::new(LoaderMetaSource::fabric()),
            Arc::new(ForgeSource::default()),
            Arc::new(NeoForgeSource::default()),
            Arc::new(LoaderMetaSource::quilt()),
        ];

        Self::new(minecraft, Arc::new(DockerHubSource::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::cache::MemoryCache;
    use crate::version::error::SourceError;
    use crate::version::source::MockVersionSource;
    use crate::version::types::{RangeAxis, VersionRecord};

    struct StaticNodeSource(Vec<NodeVersion>);

    #[async_trait::async_trait]
    impl VersionSource for StaticNodeSource {
        type Item = NodeVersion;

        fn kind(&self) -> SourceKind {
            SourceKind::DockerNode
        }

        async fn fetch(&self) -> Result<Vec<NodeVersion>, SourceError> {
            Ok(self.0.clone())
        }
    }

    fn mock_source(kind: SourceKind, ids: &'static [&'static str]) -> Arc<MinecraftSource> {
        let mut source = MockVersionSource::new();
        source.expect_kind().return_const(kind);
        source.expect_fetch().returning(move || {
            Ok(ids
                .iter()
                .map(|id| VersionRecord::release(id, RangeAxis::None))
                .collect())
        });
        Arc::new(source)
    }

    #[test]
    fn default_catalog_covers_every_minecraft_source() {
        let catalog = SourceCatalog::default();

        let kinds: Vec<_> = catalog.minecraft_kinds().collect();
        assert_eq!(kinds, SourceKind::MINECRAFT.to_vec());
        assert_eq!(catalog.node().kind(), SourceKind::DockerNode);
    }

    #[tokio::test]
    async fn refresh_all_populates_cache_for_every_source() {
        let cache = MemoryCache::new();
        let catalog = SourceCatalog::new(
            vec![
                mock_source(SourceKind::Vanilla, &["1.21", "1.20.4"]),
                mock_source(SourceKind::Paper, &[]),
            ],
            Arc::new(StaticNodeSource(vec![NodeVersion::new(22, 1, 0)])),
        );

        let summaries = catalog.refresh_all(&cache).await;

        assert_eq!(
            summaries,
            vec![
                RefreshSummary {
                    kind: SourceKind::Vanilla,
                    count: 2,
                    outcome: CacheOutcome::Fetched,
                },
                RefreshSummary {
                    kind: SourceKind::Paper,
                    count: 0,
                    outcome: CacheOutcome::Fetched,
                },
                RefreshSummary {
                    kind: SourceKind::DockerNode,
                    count: 1,
                    outcome: CacheOutcome::Fetched,
                },
            ]
        );
        assert!(cache.get("minecraft:vanilla").unwrap().is_some());
        assert!(cache.get("minecraft:paper").unwrap().is_none());
        assert!(cache.get("docker:node").unwrap().is_some());
    }

    #[tokio::test]
    async fn minecraft_returns_none_for_unregistered_kind() {
        let catalog = SourceCatalog::new(
            vec![mock_source(SourceKind::Forge, &["1.20.4"])],
            Arc::new(StaticNodeSource(vec![])),
        );

        assert!(catalog.minecraft(SourceKind::Forge).is_some());
        assert!(catalog.minecraft(SourceKind::Quilt).is_none());
    }
}
