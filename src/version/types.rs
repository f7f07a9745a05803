//! Normalized version shapes shared by every upstream source

use serde::{Deserialize, Serialize};

use crate::version::classifier::classify;

/// Release channel of a Minecraft version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionType {
    Release,
    Snapshot,
}

/// Java runtime versions a Minecraft version runs on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JavaVersions {
    pub minimum: String,
    pub maximum: String,
    /// Always an LTS release
    pub recommended: String,
}

/// Inclusive build or loader range attached to a version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRange {
    pub min: String,
    pub max: String,
}

impl VersionRange {
    pub fn new(min: impl Into<String>, max: impl Into<String>) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }

    /// Range covering exactly one build
    pub fn single(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            min: value.clone(),
            max: value,
        }
    }
}

/// Extra axis a source attaches to its records.
///
/// A source is either build-oriented or loader-oriented, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeAxis {
    None,
    Builds(VersionRange),
    Loaders(VersionRange),
}

/// One Minecraft version (or build of it) as served by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub version_type: VersionType,
    pub base_version: String,
    pub is_stable: bool,
    pub java_versions: JavaVersions,
    pub supports_datapacks: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_numbers: Option<VersionRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loader_versions: Option<VersionRange>,
    pub is_snapshot: bool,
}

impl VersionRecord {
    /// Builds a record, deriving Java and datapack metadata from `base_version`.
    pub fn new(
        id: impl Into<String>,
        base_version: impl Into<String>,
        version_type: VersionType,
        is_stable: bool,
        axis: RangeAxis,
    ) -> Self {
        let base_version = base_version.into();
        let classification = classify(&base_version);

        let (build_numbers, loader_versions) = match axis {
            RangeAxis::None => (None, None),
            RangeAxis::Builds(range) => (Some(range), None),
            RangeAxis::Loaders(range) => (None, Some(range)),
        };

        Self {
            id: id.into(),
            version_type,
            base_version,
            is_stable,
            java_versions: classification.java_versions(),
            supports_datapacks: classification.supports_datapacks,
            build_numbers,
            loader_versions,
            is_snapshot: version_type == VersionType::Snapshot,
        }
    }

    /// Shorthand for a stable release whose id is its base version
    pub fn release(id: &str, axis: RangeAxis) -> Self {
        Self::new(id, id, VersionType::Release, true, axis)
    }
}

/// A Node.js release published as a container image tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl NodeVersion {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Dotted form used as the deduplication key
    pub fn key(&self) -> String {
        format!("{}.{}.{}", self.major, self.minor, self.patch)
    }
}
