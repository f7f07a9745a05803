//! Java runtime and datapack support derived from a Minecraft version id

use crate::version::types::JavaVersions;

/// Newest Java LTS release
const LATEST_LTS_JAVA: u8 = 21;

/// Patch releases that predate datapacks but compare above the cutoff
const NO_DATAPACK_VERSIONS: &[&str] = &["1.9.4", "1.8.8"];

/// Last minor release without datapack support
const LAST_MINOR_WITHOUT_DATAPACKS: (u32, u32) = (1, 12);

/// Last minor release that recommends Java 8.
///
/// Thresholds compare `(major, minor)` tuples, not `major.minor` parsed as a
/// float: as a float "1.8" would sort above "1.12" and "1.2" above "1.16".
const LAST_MINOR_ON_JAVA_8: (u32, u32) = (1, 16);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub recommended_java: u8,
    pub supports_datapacks: bool,
}

impl Classification {
    pub fn java_versions(&self) -> JavaVersions {
        let minimum = if self.recommended_java >= 17 { "17" } else { "8" };
        JavaVersions {
            minimum: minimum.to_string(),
            maximum: LATEST_LTS_JAVA.to_string(),
            recommended: self.recommended_java.to_string(),
        }
    }
}

/// Classifies a dotted version id such as "1.20.4".
///
/// Ids whose first two components do not start with digits (snapshots like
/// "24w14a") match none of the thresholds and get the newest defaults.
pub fn classify(version_id: &str) -> Classification {
    let minor = minor_version(version_id);

    let recommended_java = match minor {
        Some((1, 20)) => 17,
        Some(v) if v <= LAST_MINOR_ON_JAVA_8 => 8,
        _ => LATEST_LTS_JAVA,
    };

    let supports_datapacks = match minor {
        Some(v) if v <= LAST_MINOR_WITHOUT_DATAPACKS => false,
        _ => !NO_DATAPACK_VERSIONS.contains(&version_id),
    };

    Classification {
        recommended_java,
        supports_datapacks,
    }
}

/// Parses the `(major, minor)` pair from the leading digits of the first two
/// components. A missing minor component counts as 0.
fn minor_version(version_id: &str) -> Option<(u32, u32)> {
    let mut parts = version_id.split('.');
    let major = leading_number(parts.next()?)?;
    let minor = match parts.next() {
        Some(part) => leading_number(part)?,
        None => 0,
    };
    Some((major, minor))
}

/// Parses the run of ASCII digits at the start of `s`
pub(crate) fn leading_number(s: &str) -> Option<u32> {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    s[..end].parse().ok()
}
