//! PaperMC project API

use serde::Deserialize;
use tracing::{debug, warn};

use crate::version::cutoff::take_until_oldest;
use crate::version::error::SourceError;
use crate::version::source::{SourceKind, VersionSource};
use crate::version::sources::http::{build_client, get_json};
use crate::version::sources::snapshot_aware_record;
use crate::version::types::{VersionRange, VersionRecord};

/// Default base URL for the PaperMC API
const DEFAULT_BASE_URL: &str = "https://api.papermc.io";

/// Response from `/v2/projects/paper`
#[derive(Debug, Deserialize)]
struct ProjectResponse {
    versions: Vec<String>,
}

/// Response from `/v2/projects/paper/versions/{version}/builds`
#[derive(Debug, Deserialize)]
struct BuildsResponse {
    #[serde(default)]
    builds: Vec<Build>,
}

#[derive(Debug, Deserialize)]
struct Build {
    build: u64,
}

/// Source for Paper server builds
pub struct PaperSource {
    client: reqwest::Client,
    base_url: String,
}

impl PaperSource {
    /// Creates a new PaperSource with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            client: build_client(),
            base_url: base_url.to_string(),
        }
    }

    /// Returns the first and last build of `version`, or `None` if it has none
    async fn build_range(&self, version: &str) -> Result<Option<VersionRange>, SourceError> {
        let url = format!(
            "{}/v2/projects/paper/versions/{}/builds",
            self.base_url, version
        );
        let response: BuildsResponse = get_json(&self.client, &url).await?;

        Ok(match (response.builds.first(), response.builds.last()) {
            (Some(first), Some(last)) => Some(VersionRange::new(
                first.build.to_string(),
                last.build.to_string(),
            )),
            _ => None,
        })
    }
}

impl Default for PaperSource {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait::async_trait]
impl VersionSource for PaperSource {
    type Item = VersionRecord;

    fn kind(&self) -> SourceKind {
        SourceKind::Paper
    }

    async fn fetch(&self) -> Result<Vec<VersionRecord>, SourceError> {
        let url = format!("{}/v2/projects/paper", self.base_url);
        let project: ProjectResponse = get_json(&self.client, &url).await?;

        let mut versions = Vec::new();

        // One request at a time to stay gentle on the upstream
        for version in take_until_oldest(project.versions, |v| v.as_str()) {
            match self.build_range(&version).await {
                Ok(Some(range)) => versions.push(snapshot_aware_record(&version, range)),
                Ok(None) => debug!("Skipping Paper {}: no builds", version),
                Err(e) => warn!("Skipping Paper {}: failed to fetch builds: {}", version, e),
            }
        }

        Ok(versions)
    }
}
