//! Classification of image references handed over by the host.
//!
//! Fetching and decoding stay with the host; we only decide which loader a
//! reference belongs to.

use serde::{Deserialize, Serialize};

use crate::error::SequenceError;

const FILE_PREFIX: &str = "file://";

/// Where a frame's image data lives.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "location", rename_all = "camelCase")]
pub enum FrameSource {
    /// `http://` or `https://` URL, kept verbatim.
    Remote(String),
    /// Local file path with the `file://` prefix stripped.
    File(String),
    /// Name of an asset bundled with the host application.
    Resource(String),
}

impl FrameSource {
    pub fn parse(uri: &str) -> Result<Self, SequenceError> {
        let uri = uri.trim();
        if uri.is_empty() {
            return Err(SequenceError::EmptySource);
        }
        if uri.starts_with("http://") || uri.starts_with("https://") {
            return Ok(Self::Remote(uri.to_string()));
        }
        if let Some(path) = uri.strip_prefix(FILE_PREFIX) {
            if path.is_empty() {
                return Err(SequenceError::EmptySource);
            }
            return Ok(Self::File(path.to_string()));
        }
        Ok(Self::Resource(uri.to_string()))
    }

    /// Parse every reference, failing on the first malformed one.
    pub fn parse_all<S: AsRef<str>>(uris: &[S]) -> Result<Vec<Self>, SequenceError> {
        uris.iter().map(|u| Self::parse(u.as_ref())).collect()
    }

    pub fn location(&self) -> &str {
        match self {
            Self::Remote(s) | Self::File(s) | Self::Resource(s) => s,
        }
    }

    #[inline]
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}
