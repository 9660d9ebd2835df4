//! Manifest media types and eligibility checks

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// File name an exported image keeps its manifest under
pub const MANIFEST_JSON: &str = "manifest.json";

pub const DOCKER_MANIFEST_V2: &str = "application/vnd.docker.distribution.manifest.v2+json";
pub const OCI_MANIFEST_V1: &str = "application/vnd.oci.image.manifest.v1+json";

/// Only schema version accepted for either media type
pub const SUPPORTED_SCHEMA_VERSION: u64 = 2;

/// Manifest dialects that can be served
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MediaType {
    DockerManifestV2,
    OciManifestV1,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::DockerManifestV2 => DOCKER_MANIFEST_V2,
            MediaType::OciManifestV1 => OCI_MANIFEST_V1,
        }
    }

    pub fn parse(media_type: &str) -> Option<Self> {
        match media_type {
            DOCKER_MANIFEST_V2 => Some(MediaType::DockerManifestV2),
            OCI_MANIFEST_V1 => Some(MediaType::OciManifestV1),
            _ => None,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reason a `manifest.json` does not describe a servable image
#[derive(Debug, Error, PartialEq)]
pub enum ManifestRejection {
    #[error("failed to decode JSON: {0}")]
    InvalidJson(String),
    #[error("manifest is empty")]
    Empty,
    #[error("manifest is not a JSON object")]
    NotAnObject,
    #[error("invalid schemaVersion: {0}")]
    SchemaVersion(String),
    #[error("invalid mediaType: {0}")]
    MediaType(String),
}

/// Check raw manifest bytes and return the media type to serve them with.
///
/// Only the `schemaVersion` and `mediaType` fields are inspected; everything
/// else in the document is ignored.
pub fn check_manifest(data: &[u8]) -> std::result::Result<MediaType, ManifestRejection> {
    let value: Value = serde_json::from_slice(data)
        .map_err(|e| ManifestRejection::InvalidJson(e.to_string()))?;

    let object = match value {
        Value::Object(object) => object,
        Value::Null | Value::Bool(false) => return Err(ManifestRejection::Empty),
        Value::Array(ref items) if items.is_empty() => return Err(ManifestRejection::Empty),
        _ => return Err(ManifestRejection::NotAnObject),
    };

    if object.is_empty() {
        return Err(ManifestRejection::Empty);
    }

    match object.get("schemaVersion") {
        Some(version) if version.as_u64() == Some(SUPPORTED_SCHEMA_VERSION) => {}
        Some(other) => return Err(ManifestRejection::SchemaVersion(other.to_string())),
        None => return Err(ManifestRejection::SchemaVersion("missing".to_string())),
    }

    match object.get("mediaType") {
        Some(Value::String(media_type)) => MediaType::parse(media_type)
            .ok_or_else(|| ManifestRejection::MediaType(media_type.clone())),
        Some(other) => Err(ManifestRejection::MediaType(other.to_string())),
        None => Err(ManifestRejection::MediaType("missing".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_docker_v2() {
        let data = br#"{"schemaVersion": 2, "mediaType": "application/vnd.docker.distribution.manifest.v2+json", "layers": []}"#;
        assert_eq!(check_manifest(data), Ok(MediaType::DockerManifestV2));
    }

    #[test]
    fn test_accepts_oci_v1() {
        let data = br#"{"schemaVersion": 2, "mediaType": "application/vnd.oci.image.manifest.v1+json"}"#;
        assert_eq!(check_manifest(data), Ok(MediaType::OciManifestV1));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            check_manifest(b"{not json"),
            Err(ManifestRejection::InvalidJson(_))
        ));
    }

    #[test]
    fn test_rejects_empty_documents() {
        assert_eq!(check_manifest(b"{}"), Err(ManifestRejection::Empty));
        assert_eq!(check_manifest(b"null"), Err(ManifestRejection::Empty));
        assert_eq!(check_manifest(b"[]"), Err(ManifestRejection::Empty));
        assert_eq!(check_manifest(b"[1]"), Err(ManifestRejection::NotAnObject));
    }

    #[test]
    fn test_schema_version_must_be_integer_two() {
        for version in ["1", "\"2\"", "2.0", "3"] {
            let data = format!(
                r#"{{"schemaVersion": {}, "mediaType": "{}"}}"#,
                version, DOCKER_MANIFEST_V2
            );
            assert!(
                matches!(
                    check_manifest(data.as_bytes()),
                    Err(ManifestRejection::SchemaVersion(_))
                ),
                "schemaVersion {} should be rejected",
                version
            );
        }

        let data = format!(r#"{{"mediaType": "{}"}}"#, DOCKER_MANIFEST_V2);
        assert!(matches!(
            check_manifest(data.as_bytes()),
            Err(ManifestRejection::SchemaVersion(_))
        ));
    }

    #[test]
    fn test_rejects_manifest_lists() {
        let data = br#"{"schemaVersion": 2, "mediaType": "application/vnd.docker.distribution.manifest.list.v2+json"}"#;
        assert_eq!(
            check_manifest(data),
            Err(ManifestRejection::MediaType(
                "application/vnd.docker.distribution.manifest.list.v2+json".to_string()
            ))
        );
    }

    #[test]
    fn test_media_type_round_trips_through_str() {
        for media_type in [MediaType::DockerManifestV2, MediaType::OciManifestV1] {
            assert_eq!(MediaType::parse(media_type.as_str()), Some(media_type));
        }
        assert_eq!(MediaType::parse("application/json"), None);
    }
}
