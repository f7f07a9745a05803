//! Upstream source implementations

pub mod docker_hub;
pub(crate) mod http;
pub mod forge;
pub mod loader_meta;
pub mod mojang;
pub mod neoforge;
pub mod paper;
pub mod purpur;

pub use docker_hub::DockerHubSource;
pub use forge::ForgeSource;
pub use http::RetryPolicy;
pub use loader_meta::LoaderMetaSource;
pub use mojang::MojangSource;
pub use neoforge::NeoForgeSource;
pub use paper::PaperSource;
pub use purpur::PurpurSource;

use crate::version::types::{RangeAxis, VersionRange, VersionRecord, VersionType};

/// Record for a build-oriented server whose ids mark snapshots inline
/// (e.g. "1.21-snapshot")
fn snapshot_aware_record(version: &str, builds: VersionRange) -> VersionRecord {
    let is_snapshot = version.contains("snapshot");
    let version_type = if is_snapshot {
        VersionType::Snapshot
    } else {
        VersionType::Release
    };

    VersionRecord::new(
        version,
        version,
        version_type,
        !is_snapshot,
        RangeAxis::Builds(builds),
    )
}
