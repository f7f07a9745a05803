//! NeoForge maven metadata API

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::version::cutoff::take_until_oldest;
use crate::version::error::SourceError;
use crate::version::source::{SourceKind, VersionSource};
use crate::version::sources::http::{build_client, get_json};
use crate::version::types::{RangeAxis, VersionRange, VersionRecord, VersionType};

/// Default base URL for the NeoForge maven
const DEFAULT_BASE_URL: &str = "https://maven.neoforged.net";

/// First dotted numeric run with two or three components, each taken whole
static BASE_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.\d+(?:\.\d+)?)").expect("valid regex"));

#[derive(Debug, Deserialize)]
struct MavenVersions {
    versions: Vec<String>,
}

/// Extracts the base version embedded in a NeoForge version string
fn base_version(version: &str) -> Option<&str> {
    BASE_VERSION_RE
        .captures(version)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Source for NeoForge releases
pub struct NeoForgeSource {
    client: reqwest::Client,
    base_url: String,
}

impl NeoForgeSource {
    /// Creates a new NeoForgeSource with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            client: build_client(),
            base_url: base_url.to_string(),
        }
    }
}

impl Default for NeoForgeSource {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait::async_trait]
impl VersionSource for NeoForgeSource {
    type Item = VersionRecord;

    fn kind(&self) -> SourceKind {
        SourceKind::NeoForge
    }

    async fn fetch(&self) -> Result<Vec<VersionRecord>, SourceError> {
        let url = format!(
            "{}/api/maven/versions/releases/net/neoforged/neoforge",
            self.base_url
        );
        let response: MavenVersions = get_json(&self.client, &url).await?;

        let matched = response.versions.iter().filter_map(|version| {
            let base = base_version(version);
            if base.is_none() {
                debug!("Skipping NeoForge {}: no base version", version);
            }
            base.map(|base| (version.as_str(), base))
        });

        Ok(take_until_oldest(matched, |(_, base)| *base)
            .into_iter()
            .map(|(version, base)| {
                VersionRecord::new(
                    version,
                    base,
                    VersionType::Release,
                    true,
                    RangeAxis::Builds(VersionRange::single(version)),
                )
            })
            .collect())
    }
}
