//! Reader for `.heapprofile` JSON files.

use super::schema::{RawFrameNode, RawProfile};
use crate::utils::error::AnalysisError;
use log::debug;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// Read and parse a heap profile from disk
///
/// **Public** - main entry point for loading input
///
/// # Errors
/// * `AnalysisError::Read` - File cannot be read
/// * `AnalysisError::Parse` - Content is not a valid heap profile
pub fn read_heap_profile(path: impl AsRef<Path>) -> Result<RawProfile, AnalysisError> {
    let path = path.as_ref();
    debug!("Reading heap profile from: {}", path.display());

    let raw = std::fs::read_to_string(path).map_err(|source| AnalysisError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_heap_profile(&raw)
}

/// Parse heap profile JSON from a string
///
/// Call trees routinely nest deeper than serde_json's default recursion
/// limit, so the limit is lifted and `serde_stacker` grows the stack on
/// the heap as the nesting deepens.
///
/// # Errors
/// * `AnalysisError::Parse` - Malformed JSON or missing fields
/// * `AnalysisError::InvalidProfile` - Two frames share an id
pub fn parse_heap_profile(raw: &str) -> Result<RawProfile, AnalysisError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    deserializer.disable_recursion_limit();

    let profile = RawProfile::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
    deserializer.end()?;

    let frame_count = check_unique_ids(&profile.head)?;

    debug!(
        "Parsed heap profile: {} frames, {} samples",
        frame_count,
        profile.samples.len()
    );

    Ok(profile)
}

/// Frame ids are the lookup key of the model, so they must be unique
///
/// Returns the number of frames.
fn check_unique_ids(head: &RawFrameNode) -> Result<usize, AnalysisError> {
    let mut seen = HashSet::new();
    let mut stack = vec![head];

    while let Some(node) = stack.pop() {
        if !seen.insert(node.id) {
            return Err(AnalysisError::InvalidProfile(format!(
                "duplicate frame id {}",
                node.id
            )));
        }
        stack.extend(node.children.iter());
    }

    Ok(seen.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_profile() {
        let raw = r#"{
            "head": {
                "callFrame": {"functionName": "(root)", "url": "", "lineNumber": -1, "columnNumber": -1},
                "children": [],
                "id": 1,
                "selfSize": 0
            },
            "samples": [{"nodeId": 1, "size": 64, "ordinal": 3}]
        }"#;

        let profile = parse_heap_profile(raw).unwrap();
        assert_eq!(profile.head.id, 1);
        assert_eq!(profile.samples.len(), 1);
        assert_eq!(profile.sample_sizes().get(&1), Some(&64));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let result = parse_heap_profile("not json");
        assert!(matches!(result, Err(AnalysisError::Parse(_))));
    }

    #[test]
    fn test_parse_rejects_duplicate_ids() {
        let raw = r#"{"head": {"callFrame": {}, "id": 1, "children": [
            {"callFrame": {"functionName": "a"}, "id": 2},
            {"callFrame": {"functionName": "b"}, "id": 2}
        ]}}"#;
        assert!(matches!(
            parse_heap_profile(raw),
            Err(AnalysisError::InvalidProfile(_))
        ));
    }

    #[test]
    fn test_parse_rejects_trailing_content() {
        let raw = r#"{"head": {"callFrame": {}, "id": 1}} extra"#;
        assert!(parse_heap_profile(raw).is_err());
    }

    #[test]
    fn test_parse_deep_tree() {
        // Far beyond the default 128-level limit
        let depth = 500;
        let mut raw = String::from(r#"{"head":"#);
        for i in 0..depth {
            raw.push_str(&format!(
                r#"{{"callFrame":{{"functionName":"f{}"}},"id":{},"selfSize":1,"children":["#,
                i, i
            ));
        }
        for _ in 0..depth {
            raw.push_str("]}");
        }
        raw.push('}');

        let profile = parse_heap_profile(&raw).unwrap();
        assert_eq!(profile.head.count_nodes(), depth);
    }
}
