//! Version 3 source map objects

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::SegmentLines;
use crate::vlq::{self, VlqError};

/// Errors produced while converting a source map to or from text
#[derive(Debug, Error)]
pub enum SourceMapError {
    #[error("failed to serialize source map: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid mappings: {0}")]
    Mappings(#[from] VlqError),
}

/// A source map whose mappings are still per-line segment lists
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecodedMap {
    pub file: Option<String>,
    pub sources: Vec<String>,
    pub sources_content: Option<Vec<String>>,
    pub names: Vec<String>,
    pub mappings: SegmentLines,
    pub x_google_ignore_list: Option<Vec<u32>>,
}

/// A version 3 source map with encoded mappings
///
/// Serializes to the standard JSON shape; absent optional fields are
/// omitted rather than written as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMap {
    pub version: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    pub sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources_content: Option<Vec<String>>,
    pub names: Vec<String>,
    pub mappings: String,
    #[serde(
        rename = "x_google_ignoreList",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub x_google_ignore_list: Option<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_id: Option<String>,
}

impl From<DecodedMap> for SourceMap {
    fn from(decoded: DecodedMap) -> Self {
        SourceMap {
            version: 3,
            file: decoded.file,
            sources: decoded.sources,
            sources_content: decoded.sources_content,
            names: decoded.names,
            mappings: vlq::encode(&decoded.mappings),
            x_google_ignore_list: decoded.x_google_ignore_list,
            debug_id: None,
        }
    }
}

impl SourceMap {
    /// Attach a debug id, carried through to the JSON unchanged
    pub fn with_debug_id(mut self, debug_id: impl Into<String>) -> Self {
        self.debug_id = Some(debug_id.into());
        self
    }

    /// Serialize to compact JSON
    pub fn to_json(&self) -> Result<String, SourceMapError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a source map from JSON
    pub fn from_json(json: &str) -> Result<Self, SourceMapError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode as a self-contained `data:` URL (UTF-8 JSON, Base64)
    pub fn to_url(&self) -> Result<String, SourceMapError> {
        let json = self.to_json()?;
        Ok(format!(
            "data:application/json;charset=utf-8;base64,{}",
            STANDARD.encode(json.as_bytes())
        ))
    }

    /// Decode the mappings string back into segments
    pub fn decode(&self) -> Result<DecodedMap, SourceMapError> {
        Ok(DecodedMap {
            file: self.file.clone(),
            sources: self.sources.clone(),
            sources_content: self.sources_content.clone(),
            names: self.names.clone(),
            mappings: vlq::decode(&self.mappings)?,
            x_google_ignore_list: self.x_google_ignore_list.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Segment;

    fn sample() -> DecodedMap {
        DecodedMap {
            file: Some("out.js".to_string()),
            sources: vec!["in.js".to_string()],
            sources_content: None,
            names: vec![],
            mappings: vec![vec![Segment::mapped(0, 0, 0, 0)], vec![]],
            x_google_ignore_list: None,
        }
    }

    #[test]
    fn test_json_omits_absent_fields() {
        let map = SourceMap::from(sample());
        insta::assert_snapshot!(
            map.to_json().unwrap(),
            @r#"{"version":3,"file":"out.js","sources":["in.js"],"names":[],"mappings":"AAAA;"}"#
        );
    }

    #[test]
    fn test_json_includes_passthrough_fields() {
        let mut decoded = sample();
        decoded.file = None;
        decoded.sources_content = Some(vec!["x".to_string()]);
        decoded.x_google_ignore_list = Some(vec![0]);
        let map = SourceMap::from(decoded).with_debug_id("abc");
        insta::assert_snapshot!(
            map.to_json().unwrap(),
            @r#"{"version":3,"sources":["in.js"],"sourcesContent":["x"],"names":[],"mappings":"AAAA;","x_google_ignoreList":[0],"debugId":"abc"}"#
        );
    }

    #[test]
    fn test_to_url_round_trips_through_base64() {
        let map = SourceMap::from(sample());
        let url = map.to_url().unwrap();
        let payload = url
            .strip_prefix("data:application/json;charset=utf-8;base64,")
            .unwrap();
        let json = String::from_utf8(STANDARD.decode(payload).unwrap()).unwrap();
        assert_eq!(SourceMap::from_json(&json).unwrap(), map);
    }

    #[test]
    fn test_decode_restores_segments() {
        let map = SourceMap::from(sample());
        assert_eq!(map.decode().unwrap(), sample());
    }
}
