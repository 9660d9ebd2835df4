//! Typed nginx routing rules
//!
//! Every rule renders as one fragment: a leading newline followed by an nginx
//! `location` block (or a comment). Interpolated values are built by
//! [`RepositoryPath`] and the JSON helpers, never by ad hoc concatenation.

use crate::error::Result;
use crate::image::{MediaType, Sha256Digest};
use crate::routes::json::{ErrorBody, TagList, to_spaced_json};
use crate::routes::path::RepositoryPath;
use std::fmt;

/// Named location used as the `error_page` target of manifest routes
pub const TAG_INVALID_LOCATION: &str = "@404_tag";

/// Serves one manifest file, addressed either by tag or by digest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRoute {
    /// Exact request path
    pub path: String,
    /// Directory holding `manifest.json`, with trailing slash
    pub alias: String,
    pub media_type: MediaType,
    pub digest: Sha256Digest,
}

/// Resolves blob digests by probing each tag directory in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobRoute {
    /// Regex capturing the hex digest as `$1`
    pub pattern: String,
    /// Image directory, with trailing slash
    pub alias: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteRule {
    /// `/v2` redirects to `/v2/`
    ApiRedirect,
    /// `/v2/` answers the API version check
    ApiVersionCheck,
    /// Internal-only target answering 404 with a TAG_INVALID error body
    TagInvalidFallback { payload: String },
    /// Exact `tags/list` route with a precomputed JSON body
    TagList { path: String, payload: String },
    Manifest(ManifestRoute),
    /// Marker left where a duplicate digest route would have gone
    DigestAlreadyServed { name: String, tag: String },
    Blob(BlobRoute),
}

impl RouteRule {
    pub fn tag_invalid_fallback() -> Result<Self> {
        Ok(RouteRule::TagInvalidFallback {
            payload: to_spaced_json(&ErrorBody::tag_invalid())?,
        })
    }

    /// Tag listing for `repository`; `tags` must already be sorted
    pub fn tag_list(repository: &RepositoryPath, tags: Vec<String>) -> Result<Self> {
        let body = TagList {
            name: repository.name().to_string(),
            tags,
        };
        Ok(RouteRule::TagList {
            path: repository.tags_list(),
            payload: to_spaced_json(&body)?,
        })
    }

    /// Whether this rule only exists once per generated configuration
    pub fn is_global(&self) -> bool {
        matches!(
            self,
            RouteRule::ApiRedirect
                | RouteRule::ApiVersionCheck
                | RouteRule::TagInvalidFallback { .. }
        )
    }
}

impl fmt::Display for RouteRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteRule::ApiRedirect => {
                writeln!(f)?;
                writeln!(f, "location = /v2 {{")?;
                writeln!(f, "    return 301 /v2/;")?;
                writeln!(f, "}}")
            }
            RouteRule::ApiVersionCheck => {
                writeln!(f)?;
                writeln!(f, "location = /v2/ {{")?;
                writeln!(f, "    return 200 'ok';")?;
                writeln!(f, "}}")
            }
            RouteRule::TagInvalidFallback { payload } => {
                writeln!(f)?;
                writeln!(f, "location {} {{", TAG_INVALID_LOCATION)?;
                writeln!(f, "    internal;")?;
                writeln!(f, "    types {{ }} default_type \"application/json\";")?;
                writeln!(f, "    return 404 '{}';", payload)?;
                writeln!(f, "}}")
            }
            RouteRule::TagList { path, payload } => {
                writeln!(f)?;
                writeln!(f, "location = {} {{", path)?;
                writeln!(f, "    types {{ }} default_type \"application/json\";")?;
                writeln!(f, "    return 200 '{}';", payload)?;
                writeln!(f, "}}")
            }
            RouteRule::Manifest(route) => {
                writeln!(f)?;
                writeln!(f, "location = \"{}\" {{", route.path)?;
                writeln!(f, "    alias {};", route.alias)?;
                writeln!(f, "    types {{ }} default_type \"{}\";", route.media_type)?;
                writeln!(f, "    add_header 'Docker-Content-Digest' '{}';", route.digest)?;
                writeln!(f, "    try_files manifest.json =404;")?;
                writeln!(f, "    error_page 404 {};", TAG_INVALID_LOCATION)?;
                writeln!(f, "}}")
            }
            RouteRule::DigestAlreadyServed { name, tag } => {
                writeln!(f)?;
                writeln!(f, "# Digest for \"{}:{}\" already served", name, tag)
            }
            RouteRule::Blob(route) => {
                writeln!(f)?;
                writeln!(f, "location ~ \"{}\" {{", route.pattern)?;
                writeln!(f, "    alias {};", route.alias)?;
                write!(f, "    try_files")?;
                for tag in &route.tags {
                    write!(f, " {}/$1", tag)?;
                }
                writeln!(f, " =404;")?;
                writeln!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::DigestUtils;
    use crate::routes::path::NamePrefix;

    #[test]
    fn test_global_rules_render() {
        let rendered = format!(
            "{}{}{}",
            RouteRule::ApiRedirect,
            RouteRule::ApiVersionCheck,
            RouteRule::tag_invalid_fallback().unwrap()
        );
        let expected = r#"
location = /v2 {
    return 301 /v2/;
}

location = /v2/ {
    return 200 'ok';
}

location @404_tag {
    internal;
    types { } default_type "application/json";
    return 404 '{"errors": [{"code": "TAG_INVALID", "message": "manifest tag did not match URI", "detail": ""}]}';
}
"#;
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_tag_list_renders() {
        let repository = RepositoryPath::new(&NamePrefix::default(), "app");
        let rule = RouteRule::tag_list(&repository, vec!["v1".into(), "v2".into()]).unwrap();
        assert_eq!(
            rule.to_string(),
            r#"
location = /v2/app/tags/list {
    types { } default_type "application/json";
    return 200 '{"name": "app", "tags": ["v1", "v2"]}';
}
"#
        );
    }

    #[test]
    fn test_manifest_renders() {
        let digest = DigestUtils::compute_sha256(b"hello world");
        let rule = RouteRule::Manifest(ManifestRoute {
            path: "/v2/app/manifests/v1".to_string(),
            alias: "/srv/app/v1/".to_string(),
            media_type: MediaType::OciManifestV1,
            digest,
        });
        assert_eq!(
            rule.to_string(),
            r#"
location = "/v2/app/manifests/v1" {
    alias /srv/app/v1/;
    types { } default_type "application/vnd.oci.image.manifest.v1+json";
    add_header 'Docker-Content-Digest' 'sha256:b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9';
    try_files manifest.json =404;
    error_page 404 @404_tag;
}
"#
        );
    }

    #[test]
    fn test_blob_renders_try_order() {
        let rule = RouteRule::Blob(BlobRoute {
            pattern: "/v2/app/blobs/sha256:([a-f0-9]{64})".to_string(),
            alias: "/srv/app/".to_string(),
            tags: vec!["v1".to_string(), "v2".to_string()],
        });
        assert_eq!(
            rule.to_string(),
            r#"
location ~ "/v2/app/blobs/sha256:([a-f0-9]{64})" {
    alias /srv/app/;
    try_files v1/$1 v2/$1 =404;
}
"#
        );
    }

    #[test]
    fn test_duplicate_digest_comment() {
        let rule = RouteRule::DigestAlreadyServed {
            name: "app".to_string(),
            tag: "v2".to_string(),
        };
        assert_eq!(rule.to_string(), "\n# Digest for \"app:v2\" already served\n");
        assert!(!rule.is_global());
    }
}
