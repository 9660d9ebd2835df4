//! Registry path building and embedding rules for names, tags and prefixes

use crate::error::{RegistryError, Result};
use std::fmt;

/// Characters that would break out of, or be interpreted by, nginx syntax
const UNSAFE_CHARS: &[char] = &['"', '\'', '\\', ';', '{', '}', '$', '#'];

/// PCRE metacharacters escaped when a literal is interpolated into a regex
const REGEX_META: &[char] = &['\\', '.', '+', '*', '?', '(', ')', '[', ']', '{', '}', '|', '^', '$'];

/// Whether `segment` can be embedded verbatim in a location, alias or
/// `try_files` argument.
pub fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && !segment
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || UNSAFE_CHARS.contains(&c))
}

/// Escape a literal for use inside a PCRE pattern
pub fn escape_regex(literal: &str) -> String {
    let mut escaped = String::with_capacity(literal.len());
    for c in literal.chars() {
        if REGEX_META.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Prefix prepended to every image-scoped API path.
///
/// Stored without surrounding slashes and rendered as `""` when empty or as
/// `"{prefix}/"` otherwise, so `/v2/{prefix}{name}` never contains `//`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamePrefix(String);

impl NamePrefix {
    pub fn new(prefix: &str) -> Result<Self> {
        let trimmed = prefix.trim_matches('/');
        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        if trimmed.split('/').any(|part| !is_safe_segment(part)) {
            return Err(RegistryError::Validation(format!(
                "Name prefix '{}' contains empty segments or characters that cannot be embedded in nginx configuration",
                prefix
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Escaped for interpolation into a regex, trailing slash included
    pub fn regex(&self) -> String {
        escape_regex(&self.to_string())
    }
}

impl fmt::Display for NamePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            Ok(())
        } else {
            write!(f, "{}/", self.0)
        }
    }
}

/// `/v2/{prefix}{name}` API paths for a single repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryPath {
    prefix: NamePrefix,
    name: String,
}

impl RepositoryPath {
    pub fn new(prefix: &NamePrefix, name: &str) -> Self {
        Self {
            prefix: prefix.clone(),
            name: name.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tags_list(&self) -> String {
        format!("/v2/{}{}/tags/list", self.prefix, self.name)
    }

    /// Manifest path for a tag or a `sha256:<hex>` reference
    pub fn manifest(&self, reference: &str) -> String {
        format!("/v2/{}{}/manifests/{}", self.prefix, self.name, reference)
    }

    /// Blob pattern capturing the 64 hex characters of the digest as `$1`
    pub fn blob_pattern(&self) -> String {
        format!(
            "/v2/{}{}/blobs/sha256:([a-f0-9]{{64}})",
            self.prefix.regex(),
            escape_regex(&self.name)
        )
    }
}
