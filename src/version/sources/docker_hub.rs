//! Docker Hub tag listing for official images

use indexmap::IndexSet;
use serde::Deserialize;
use tracing::debug;

use crate::config::{DOCKER_MAX_PAGES, DOCKER_PAGE_SIZE, MIN_NODE_MAJOR};
use crate::version::classifier::leading_number;
use crate::version::error::SourceError;
use crate::version::ordered_set::UniqueOrderedSet;
use crate::version::source::{SourceKind, VersionSource};
use crate::version::sources::http::{RetryPolicy, build_client, get_json_with_retry};
use crate::version::types::NodeVersion;

/// Default base URL for Docker Hub
const DEFAULT_BASE_URL: &str = "https://hub.docker.com";

/// One page of `/v2/repositories/library/{image}/tags`
#[derive(Debug, Deserialize)]
struct TagPage {
    next: Option<String>,
    results: Vec<Tag>,
}

#[derive(Debug, Deserialize)]
struct Tag {
    name: String,
}

/// Parses a tag such as "20.11.1" or "20.11.1-alpine" into a Node version.
///
/// Only the first three dot-separated components count, each read by its
/// leading digits. Tags with fewer components, a non-numeric component or a
/// major below [`MIN_NODE_MAJOR`] are rejected.
pub fn parse_node_tag(tag: &str) -> Option<NodeVersion> {
    let mut parts = tag.split('.');
    let major = leading_number(parts.next()?)?;
    let minor = leading_number(parts.next()?)?;
    let patch = leading_number(parts.next()?)?;

    (major >= MIN_NODE_MAJOR).then(|| NodeVersion::new(major, minor, patch))
}

/// Source for the Node.js versions published as `library/node` tags
pub struct DockerHubSource {
    client: reqwest::Client,
    base_url: String,
    image: String,
    retry: RetryPolicy,
}

impl DockerHubSource {
    /// Creates a source listing `image` tags from a custom base URL
    pub fn new(base_url: &str, image: &str) -> Self {
        Self {
            client: build_client(),
            base_url: base_url.to_string(),
            image: image.to_string(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Lists distinct tag names, following `next` links up to the page cap
    pub async fn list_tags(&self) -> Result<Vec<String>, SourceError> {
        let mut next_url = Some(format!(
            "{}/v2/repositories/library/{}/tags?page_size={}",
            self.base_url, self.image, DOCKER_PAGE_SIZE
        ));
        let mut tags = IndexSet::new();
        let mut pages = 0;

        while let Some(url) = next_url {
            let page: TagPage = get_json_with_retry(&self.client, &url, &self.retry).await?;
            tags.extend(page.results.into_iter().map(|tag| tag.name));

            pages += 1;
            next_url = page.next;
            if pages >= DOCKER_MAX_PAGES {
                if next_url.is_some() {
                    debug!(
                        "Stopping {} tag listing at the {} page cap",
                        self.image, DOCKER_MAX_PAGES
                    );
                }
                break;
            }
        }

        debug!("Found {} tags for {} in {} pages", tags.len(), self.image, pages);
        Ok(tags.into_iter().collect())
    }
}

impl Default for DockerHubSource {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, "node")
    }
}

#[async_trait::async_trait]
impl VersionSource for DockerHubSource {
    type Item = NodeVersion;

    fn kind(&self) -> SourceKind {
        SourceKind::DockerNode
    }

    async fn fetch(&self) -> Result<Vec<NodeVersion>, SourceError> {
        let tags = self.list_tags().await?;

        let mut versions = UniqueOrderedSet::new();
        for version in tags.iter().filter_map(|tag| parse_node_tag(tag)) {
            versions.add(version.key(), version);
        }

        Ok(versions.sort(|a, b| a.cmp(b)))
    }
}
