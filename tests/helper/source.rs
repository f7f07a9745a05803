//! Fake version sources

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use version_proxy::version::error::SourceError;
use version_proxy::version::source::{SourceKind, VersionSource};
use version_proxy::version::types::{NodeVersion, RangeAxis, VersionRecord};

/// Source returning a fixed list, or failing every time
pub struct FakeSource<T> {
    kind: SourceKind,
    items: Option<Vec<T>>,
    calls: AtomicUsize,
}

impl<T> FakeSource<T> {
    pub fn failing(kind: SourceKind) -> Self {
        Self {
            kind,
            items: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_items(kind: SourceKind, items: Vec<T>) -> Self {
        Self {
            kind,
            items: Some(items),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times `fetch` ran
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FakeSource<VersionRecord> {
    /// Minecraft source serving plain releases with the given ids
    pub fn releases(kind: SourceKind, ids: &[&str]) -> Self {
        Self::with_items(
            kind,
            ids.iter()
                .map(|id| VersionRecord::release(id, RangeAxis::None))
                .collect(),
        )
    }
}

impl FakeSource<NodeVersion> {
    pub fn node(versions: &[(u32, u32, u32)]) -> Self {
        Self::with_items(
            SourceKind::DockerNode,
            versions
                .iter()
                .map(|&(major, minor, patch)| NodeVersion::new(major, minor, patch))
                .collect(),
        )
    }
}

#[async_trait]
impl<T> VersionSource for FakeSource<T>
where
    T: serde::Serialize + serde::de::DeserializeOwned + Clone + Send + Sync + 'static,
{
    type Item = T;

    fn kind(&self) -> SourceKind {
        self.kind
    }

    async fn fetch(&self) -> Result<Vec<T>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.items
            .clone()
            .ok_or_else(|| SourceError::InvalidResponse("fake upstream failure".to_string()))
    }
}
