//! Mojang launcher manifest (vanilla releases)

use serde::Deserialize;

use crate::version::cutoff::take_until_oldest;
use crate::version::error::SourceError;
use crate::version::source::{SourceKind, VersionSource};
use crate::version::sources::http::{build_client, get_json};
use crate::version::types::{RangeAxis, VersionRecord};

/// Default base URL for Mojang launcher metadata
const DEFAULT_BASE_URL: &str = "https://launchermeta.mojang.com";

/// Response from the version manifest endpoint
#[derive(Debug, Deserialize)]
struct VersionManifest {
    versions: Vec<ManifestEntry>,
}

#[derive(Debug, Deserialize)]
struct ManifestEntry {
    id: String,
    #[serde(rename = "type")]
    kind: String,
}

/// Source for vanilla Minecraft releases
pub struct MojangSource {
    client: reqwest::Client,
    base_url: String,
}

impl MojangSource {
    /// Creates a new MojangSource with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            client: build_client(),
            base_url: base_url.to_string(),
        }
    }
}

impl Default for MojangSource {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait::async_trait]
impl VersionSource for MojangSource {
    type Item = VersionRecord;

    fn kind(&self) -> SourceKind {
        SourceKind::Vanilla
    }

    async fn fetch(&self) -> Result<Vec<VersionRecord>, SourceError> {
        let url = format!("{}/mc/game/version_manifest.json", self.base_url);
        let manifest: VersionManifest = get_json(&self.client, &url).await?;

        // Manifest is newest first
        let releases = manifest
            .versions
            .into_iter()
            .filter(|entry| entry.kind == "release");

        Ok(take_until_oldest(releases, |entry| entry.id.as_str())
            .into_iter()
            .map(|entry| VersionRecord::release(&entry.id, RangeAxis::None))
            .collect())
    }
}
