//! Fabric and Quilt meta APIs
//!
//! Both expose the same two endpoints: a newest-first list of loader versions
//! and a list of game versions flagged stable or not.

use serde::Deserialize;

use crate::version::cutoff::take_until_oldest;
use crate::version::error::SourceError;
use crate::version::source::{SourceKind, VersionSource};
use crate::version::sources::http::{build_client, get_json};
use crate::version::types::{RangeAxis, VersionRange, VersionRecord};

const FABRIC_BASE_URL: &str = "https://meta.fabricmc.net/v2";
const QUILT_BASE_URL: &str = "https://meta.quiltmc.org/v3";

#[derive(Debug, Deserialize)]
struct LoaderVersion {
    version: String,
}

#[derive(Debug, Deserialize)]
struct GameVersion {
    version: String,
    stable: bool,
}

/// Source for mod loaders published through a Fabric-style meta API
pub struct LoaderMetaSource {
    kind: SourceKind,
    client: reqwest::Client,
    base_url: String,
}

impl LoaderMetaSource {
    /// Creates a source for `kind` whose endpoints live under `base_url`
    pub fn new(kind: SourceKind, base_url: &str) -> Self {
        Self {
            kind,
            client: build_client(),
            base_url: base_url.to_string(),
        }
    }

    pub fn fabric() -> Self {
        Self::new(SourceKind::Fabric, FABRIC_BASE_URL)
    }

    pub fn quilt() -> Self {
        Self::new(SourceKind::Quilt, QUILT_BASE_URL)
    }

    /// Oldest to newest loader, from a newest-first list
    fn loader_range(loaders: &[LoaderVersion]) -> Option<VersionRange> {
        let newest = loaders.first()?;
        let oldest = loaders.last()?;
        Some(VersionRange::new(
            oldest.version.as_str(),
            newest.version.as_str(),
        ))
    }
}

#[async_trait::async_trait]
impl VersionSource for LoaderMetaSource {
    type Item = VersionRecord;

    fn kind(&self) -> SourceKind {
        self.kind
    }

    async fn fetch(&self) -> Result<Vec<VersionRecord>, SourceError> {
        let loader_url = format!("{}/versions/loader", self.base_url);
        let game_url = format!("{}/versions/game", self.base_url);

        let loaders: Vec<LoaderVersion> = get_json(&self.client, &loader_url).await?;
        let games: Vec<GameVersion> = get_json(&self.client, &game_url).await?;

        let range = Self::loader_range(&loaders).ok_or_else(|| {
            SourceError::InvalidResponse(format!("{} returned no loader versions", loader_url))
        })?;

        let stable = games.into_iter().filter(|game| game.stable);

        Ok(take_until_oldest(stable, |game| game.version.as_str())
            .into_iter()
            .map(|game| VersionRecord::release(&game.version, RangeAxis::Loaders(range.clone())))
            .collect())
    }
}
