//! JSON response bodies embedded in the generated configuration
//!
//! Bodies are rendered on one line with `", "` and `": "` separators and every
//! non-printable or non-ASCII character escaped as `\uXXXX`. Deployments diff
//! generated configuration, so this exact text is part of the output contract.

use crate::error::Result;
use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};
use std::io;

/// `GET /v2/<name>/tags/list` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagList {
    pub name: String,
    pub tags: Vec<String>,
}

/// Registry API error envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub errors: Vec<ErrorDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub detail: String,
}

impl ErrorBody {
    /// Body returned when a manifest reference has no file behind it
    pub fn tag_invalid() -> Self {
        Self {
            errors: vec![ErrorDetail {
                code: "TAG_INVALID".to_string(),
                message: "manifest tag did not match URI".to_string(),
                detail: String::new(),
            }],
        }
    }
}

/// `serde_json` formatter for spaced, ASCII-only single-line JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct SpacedAsciiFormatter;

impl Formatter for SpacedAsciiFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut units = [0u16; 2];
        for c in fragment.chars() {
            if (' '..='~').contains(&c) {
                writer.write_all(&[c as u8])?;
            } else {
                for unit in c.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}

/// Serialize `value` with [`SpacedAsciiFormatter`]
pub fn to_spaced_json<T: Serialize>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, SpacedAsciiFormatter);
    value.serialize(&mut serializer)?;
    // Every byte written above is ASCII
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_invalid_body() {
        assert_eq!(
            to_spaced_json(&ErrorBody::tag_invalid()).unwrap(),
            r#"{"errors": [{"code": "TAG_INVALID", "message": "manifest tag did not match URI", "detail": ""}]}"#
        );
    }

    #[test]
    fn test_tag_list_body() {
        let body = TagList {
            name: "app".to_string(),
            tags: vec!["v1".to_string(), "v2".to_string()],
        };
        assert_eq!(
            to_spaced_json(&body).unwrap(),
            r#"{"name": "app", "tags": ["v1", "v2"]}"#
        );
    }

    #[test]
    fn test_empty_array() {
        let body = TagList {
            name: "app".to_string(),
            tags: vec![],
        };
        assert_eq!(to_spaced_json(&body).unwrap(), r#"{"name": "app", "tags": []}"#);
    }

    #[test]
    fn test_non_ascii_is_escaped() {
        let body = TagList {
            name: "café".to_string(),
            tags: vec!["🐳".to_string(), "del\u{7f}".to_string()],
        };
        assert_eq!(
            to_spaced_json(&body).unwrap(),
            r#"{"name": "caf\u00e9", "tags": ["\ud83d\udc33", "del\u007f"]}"#
        );
    }

    #[test]
    fn test_quotes_and_controls_use_short_escapes() {
        let body = TagList {
            name: "a\"b\\c\nd".to_string(),
            tags: vec![],
        };
        assert_eq!(
            to_spaced_json(&body).unwrap(),
            r#"{"name": "a\"b\\c\nd", "tags": []}"#
        );
    }
}
