use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Accepted field names for the version number in `build_info.json`, first match wins
pub const VERSION_ALIASES: [&str; 3] = ["DEVICE_SW_VERSION_NUM", "version_num", "version"];

/// Accepted field names for the build number in `build_info.json`, first match wins
pub const BUILD_ALIASES: [&str; 3] = ["DEVICE_SW_BUILD_NUM", "build_num", "build"];

/// Accepted field names for the human readable version label
pub const LABEL_ALIASES: [&str; 1] = ["DEVICE_SW_VERSION"];

/// Dotted numeric version, e.g. `v1.2.3-rc1` -> `[1, 2, 3]`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct VersionTuple(pub Vec<u64>);

impl VersionTuple {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let trimmed = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);
        let release = trimmed.split('-').next().unwrap_or_default();

        Self(
            release
                .split('.')
                .map(parse_segment)
                .collect(),
        )
    }

    pub fn segments(&self) -> &[u64] {
        &self.0
    }
}

/// Non-numeric segments count as 0; all-digit segments too large for `u64`
/// saturate so they still order above any smaller number
fn parse_segment(segment: &str) -> u64 {
    match segment.parse::<u64>() {
        Ok(value) => value,
        Err(_) if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) => u64::MAX,
        Err(_) => 0,
    }
}

impl std::fmt::Display for VersionTuple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.0.iter().map(u64::to_string).collect();
        write!(f, "{}", parts.join("."))
    }
}

/// Build number reduced to its digits, normally a `YYYYMMDDHHMMSS` timestamp.
///
/// Two identifiers of different width still compare lexicographically, which is
/// not guaranteed to be chronological.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuildIdentifier(pub String);

impl BuildIdentifier {
    pub fn parse(raw: &str) -> Self {
        Self(raw.chars().filter(char::is_ascii_digit).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Firmware identity, either of the running device or of a remote OTA image
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FirmwareDescriptor {
    /// Version string as received, used for display and the OTA form
    pub raw_version: String,
    pub version: VersionTuple,
    pub build: BuildIdentifier,
    pub display_label: String,
}

impl FirmwareDescriptor {
    pub fn new(version: &str, build: &str, label: Option<&str>) -> Self {
        let raw_version = version.trim().to_string();
        let build = BuildIdentifier::parse(build);
        let display_label = match label.map(str::trim) {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => format!("{raw_version} build {}", build.as_str()),
        };

        Self {
            version: VersionTuple::parse(&raw_version),
            raw_version,
            build,
            display_label,
        }
    }
}

/// Reasons an update check could not produce a comparison
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum UpdateCheckError {
    #[error("Firmware update check failed: {0}")]
    NetworkFailure(String),
    #[error("Firmware build info is incomplete: {0}")]
    SchemaError(String),
    #[error("Firmware URL is not a valid address: {0}")]
    InvalidLocation(String),
}

/// Outcome of the most recent update check
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum UpdateVerdict {
    UpToDate { current: FirmwareDescriptor },
    UpdateAvailable { candidate: FirmwareDescriptor },
    CheckFailed { reason: UpdateCheckError },
}

impl UpdateVerdict {
    pub fn candidate(&self) -> Option<&FirmwareDescriptor> {
        match self {
            Self::UpdateAvailable { candidate } => Some(candidate),
            _ => None,
        }
    }
}

/// Raw `build_info.json` payload; field names vary between firmware generations
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct BuildInfo(pub Map<String, Value>);

impl BuildInfo {
    /// Returns the first alias with a usable value; numbers are accepted as text
    pub fn field(&self, aliases: &[&str]) -> Option<String> {
        aliases.iter().find_map(|alias| match self.0.get(*alias) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    }

    /// Builds the remote descriptor, or names the missing field
    pub fn to_descriptor(&self) -> Result<FirmwareDescriptor, UpdateCheckError> {
        let version = self
            .field(&VERSION_ALIASES)
            .ok_or_else(|| UpdateCheckError::SchemaError("missing version".to_string()))?;
        let build = self
            .field(&BUILD_ALIASES)
            .ok_or_else(|| UpdateCheckError::SchemaError("missing build number".to_string()))?;
        let label = self.field(&LABEL_ALIASES);

        Ok(FirmwareDescriptor::new(&version, &build, label.as_deref()))
    }
}

/// Form fields posted to `/ota-update`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OtaUpdateForm {
    pub current_sw_version: String,
    pub current_sw_build: String,
    pub new_sw_version: String,
    pub new_sw_version_num: String,
    pub new_sw_build_num: String,
}

impl OtaUpdateForm {
    pub fn new(current: &FirmwareDescriptor, candidate: &FirmwareDescriptor) -> Self {
        Self {
            current_sw_version: current.raw_version.clone(),
            current_sw_build: current.build.as_str().to_string(),
            new_sw_version: candidate.display_label.clone(),
            new_sw_version_num: candidate.raw_version.clone(),
            new_sw_build_num: candidate.build.as_str().to_string(),
        }
    }

    /// `application/x-www-form-urlencoded` body
    pub fn encode(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair("current_sw_version", &self.current_sw_version)
            .append_pair("current_sw_build", &self.current_sw_build)
            .append_pair("new_sw_version", &self.new_sw_version)
            .append_pair("new_sw_version_num", &self.new_sw_version_num)
            .append_pair("new_sw_build_num", &self.new_sw_build_num)
            .finish()
    }
}
