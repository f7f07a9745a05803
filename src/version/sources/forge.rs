//! Forge promotions feed

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::warn;

use crate::version::cutoff::{OLDEST_VERSION, take_until_oldest};
use crate::version::error::SourceError;
use crate::version::source::{SourceKind, VersionSource};
use crate::version::sources::http::{build_client, get_json};
use crate::version::types::{RangeAxis, VersionRange, VersionRecord, VersionType};

/// Default base URL for Forge files
const DEFAULT_BASE_URL: &str = "https://files.minecraftforge.net";

/// Response from `promotions_slim.json`.
///
/// Keys look like `1.20.4-recommended` or `1.20.4-latest`; upstream order is kept.
#[derive(Debug, Deserialize)]
struct Promotions {
    promos: IndexMap<String, String>,
}

/// A promotion entry reduced to the fields a record needs
struct Promotion {
    minecraft: String,
    forge: String,
    recommended: bool,
}

impl Promotion {
    fn from_entry(key: &str, forge: String) -> Option<Self> {
        let recommended = key.contains("recommended");
        if !recommended && !key.contains("latest") {
            return None;
        }

        let minecraft = key.split('-').next().unwrap_or(key).to_string();
        Some(Self {
            minecraft,
            forge,
            recommended,
        })
    }
}

/// Source for Forge promoted builds
pub struct ForgeSource {
    client: reqwest::Client,
    base_url: String,
}

impl ForgeSource {
    /// Creates a new ForgeSource with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            client: build_client(),
            base_url: base_url.to_string(),
        }
    }
}

impl Default for ForgeSource {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait::async_trait]
impl VersionSource for ForgeSource {
    type Item = VersionRecord;

    fn kind(&self) -> SourceKind {
        SourceKind::Forge
    }

    async fn fetch(&self) -> Result<Vec<VersionRecord>, SourceError> {
        let url = format!(
            "{}/net/minecraftforge/forge/promotions_slim.json",
            self.base_url
        );
        let response: Promotions = get_json(&self.client, &url).await?;

        let promotions: Vec<Promotion> = response
            .promos
            .into_iter()
            .filter_map(|(key, forge)| Promotion::from_entry(&key, forge))
            .collect();
        let total = promotions.len();

        // The feed is not guaranteed newest-first, so the cutoff may drop newer entries
        let kept = take_until_oldest(promotions, |p| p.minecraft.as_str());
        if kept.len() < total {
            warn!(
                "Forge promotions reached {} with {} entries left; upstream order may not be newest-first",
                OLDEST_VERSION,
                total - kept.len()
            );
        }

        Ok(kept
            .into_iter()
            .map(|p| {
                VersionRecord::new(
                    format!("{}-{}", p.minecraft, p.forge),
                    p.minecraft,
                    VersionType::Release,
                    p.recommended,
                    RangeAxis::Builds(VersionRange::single(p.forge)),
                )
            })
            .collect())
    }
}
