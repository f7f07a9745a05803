//! Source trait for fetching normalized versions from an upstream API

#[cfg(test)]
use mockall::automock;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::version::error::SourceError;
use crate::version::types::VersionRecord;

/// Upstream a list of versions comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Mojang launcher manifest
    Vanilla,
    /// PaperMC
    Paper,
    /// PurpurMC
    Purpur,
    /// FabricMC meta
    Fabric,
    /// Forge promotions
    Forge,
    /// NeoForge maven
    NeoForge,
    /// QuiltMC meta
    Quilt,
    /// Docker Hub `library/node` tags
    DockerNode,
}

impl SourceKind {
    pub const MINECRAFT: [SourceKind; 7] = [
        SourceKind::Vanilla,
        SourceKind::Paper,
        SourceKind::Purpur,
        SourceKind::Fabric,
        SourceKind::Forge,
        SourceKind::NeoForge,
        SourceKind::Quilt,
    ];

    /// Returns the string representation of the source
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Vanilla => "vanilla",
            SourceKind::Paper => "paper",
            SourceKind::Purpur => "purpur",
            SourceKind::Fabric => "fabric",
            SourceKind::Forge => "forge",
            SourceKind::NeoForge => "neoforge",
            SourceKind::Quilt => "quilt",
            SourceKind::DockerNode => "node",
        }
    }

    /// Key the source's list is cached under
    pub fn cache_key(&self) -> &'static str {
        match self {
            SourceKind::Vanilla => "minecraft:vanilla",
            SourceKind::Paper => "minecraft:paper",
            SourceKind::Purpur => "minecraft:purpur",
            SourceKind::Fabric => "minecraft:fabric",
            SourceKind::Forge => "minecraft:forge",
            SourceKind::NeoForge => "minecraft:neoforge",
            SourceKind::Quilt => "minecraft:quilt",
            SourceKind::DockerNode => "docker:node",
        }
    }

    pub fn is_minecraft(&self) -> bool {
        !matches!(self, SourceKind::DockerNode)
    }
}

impl std::str::FromStr for SourceKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vanilla" => Ok(SourceKind::Vanilla),
            "paper" => Ok(SourceKind::Paper),
            "purpur" => Ok(SourceKind::Purpur),
            "fabric" => Ok(SourceKind::Fabric),
            "forge" => Ok(SourceKind::Forge),
            "neoforge" => Ok(SourceKind::NeoForge),
            "quilt" => Ok(SourceKind::Quilt),
            "node" => Ok(SourceKind::DockerNode),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for fetching the full, normalized version list of one upstream
#[cfg_attr(test, automock(type Item = VersionRecord;))]
#[async_trait::async_trait]
pub trait VersionSource: Send + Sync {
    /// Normalized item this source produces
    type Item: Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Returns the upstream this implementation handles
    fn kind(&self) -> SourceKind;

    /// Fetches every version of interest from the upstream
    ///
    /// # Returns
    /// * `Ok(Vec<Item>)` - Normalized items in the order the API serves them
    /// * `Err(SourceError)` - If the whole upstream could not be read
    async fn fetch(&self) -> Result<Vec<Self::Item>, SourceError>;
}

/// Boxed source producing Minecraft version records
pub type MinecraftSource = dyn VersionSource<Item = VersionRecord>;
