//! PurpurMC API

use serde::Deserialize;
use tracing::{debug, warn};

use crate::version::cutoff::take_until_oldest;
use crate::version::error::SourceError;
use crate::version::source::{SourceKind, VersionSource};
use crate::version::sources::http::{build_client, get_json};
use crate::version::sources::snapshot_aware_record;
use crate::version::types::{VersionRange, VersionRecord};

/// Default base URL for the PurpurMC API
const DEFAULT_BASE_URL: &str = "https://api.purpurmc.org";

#[derive(Debug, Deserialize)]
struct ProjectResponse {
    versions: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct VersionResponse {
    builds: Builds,
}

#[derive(Debug, Deserialize)]
struct Builds {
    #[serde(default)]
    all: Vec<String>,
}

/// Source for Purpur server builds
pub struct PurpurSource {
    client: reqwest::Client,
    base_url: String,
}

impl PurpurSource {
    /// Creates a new PurpurSource with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            client: build_client(),
            base_url: base_url.to_string(),
        }
    }

    async fn build_range(&self, version: &str) -> Result<Option<VersionRange>, SourceError> {
        let url = format!("{}/v2/purpur/{}", self.base_url, version);
        let response: VersionResponse = get_json(&self.client, &url).await?;
        let all = response.builds.all;

        Ok(match (all.first(), all.last()) {
            (Some(first), Some(last)) => Some(VersionRange::new(first.as_str(), last.as_str())),
            _ => None,
        })
    }
}

impl Default for PurpurSource {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait::async_trait]
impl VersionSource for PurpurSource {
    type Item = VersionRecord;

    fn kind(&self) -> SourceKind {
        SourceKind::Purpur
    }

    async fn fetch(&self) -> Result<Vec<VersionRecord>, SourceError> {
        let url = format!("{}/v2/purpur", self.base_url);
        let project: ProjectResponse = get_json(&self.client, &url).await?;

        let mut versions = Vec::new();

        for version in take_until_oldest(project.versions, |v| v.as_str()) {
            match self.build_range(&version).await {
                Ok(Some(range)) => versions.push(snapshot_aware_record(&version, range)),
                Ok(None) => debug!("Skipping Purpur {}: no builds", version),
                Err(e) => warn!("Skipping Purpur {}: failed to fetch builds: {}", version, e),
            }
        }

        Ok(versions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn fetch_uses_first_and_last_build_ids() {
        let mut server = Server::new_async().await;

        server
            .mock("GET", "/v2/purpur")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"project": "purpur", "versions": ["1.20.4", "1.21"]}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/v2/purpur/1.20.4")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"builds": {"all": ["2108", "2140", "2176"], "latest": "2176"}}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/v2/purpur/1.21")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"builds": {"all": ["2227"], "latest": "2227"}}"#)
            .create_async()
            .await;

        let source = PurpurSource::new(&server.url());
        let result = source.fetch().await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].build_numbers, Some(VersionRange::new("2108", "2176")));
        assert_eq!(result[1].build_numbers, Some(VersionRange::single("2227")));
        assert_eq!(result[1].java_versions.recommended, "21");
    }

    #[tokio::test]
    async fn fetch_skips_version_with_malformed_builds() {
        let mut server = Server::new_async().await;

        server
            .mock("GET", "/v2/purpur")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"versions": ["1.20.4", "1.21"]}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/v2/purpur/1.20.4")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"builds": "gone"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/v2/purpur/1.21")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"builds": {"all": ["2227"]}}"#)
            .create_async()
            .await;

        let source = PurpurSource::new(&server.url());
        let result = source.fetch().await.unwrap();

        let ids: Vec<_> = result.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["1.21"]);
    }

    #[tokio::test]
    async fn fetch_stops_build_lookups_at_oldest_version() {
        let mut server = Server::new_async().await;

        server
            .mock("GET", "/v2/purpur")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"versions": ["1.14.1", "1.7.10", "1.7.2", "1.6.4"]}"#)
            .create_async()
            .await;
        let kept = server
            .mock("GET", "/v2/purpur/1.14.1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"builds": {"all": ["1", "52"], "latest": "52"}}"#)
            .create_async()
            .await;
        let oldest = server
            .mock("GET", "/v2/purpur/1.7.10")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"builds": {"all": ["7"], "latest": "7"}}"#)
            .create_async()
            .await;
        let past_cutoff = server
            .mock("GET", Matcher::Regex(r"^/v2/purpur/1\.(7\.2|6\.4)$".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"builds": {"all": ["1"], "latest": "1"}}"#)
            .expect(0)
            .create_async()
            .await;

        let source = PurpurSource::new(&server.url());
        let result = source.fetch().await.unwrap();

        kept.assert_async().await;
        oldest.assert_async().await;
        past_cutoff.assert_async().await;
        let ids: Vec<_> = result.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["1.14.1", "1.7.10"]);
    }
}
