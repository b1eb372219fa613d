//! JSON persistence of keypoints and matches between pipeline stages.
//!
//! Archives hold the record form, so files stay readable by anything that
//! understands nested JSON arrays.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::codec::{deserialize_keypoints, deserialize_matches, serialize_keypoints, serialize_matches};
use crate::error::{CodecError, CodecResult};
use crate::types::{DMatch, Keypoint, KeypointRecord, MatchRecord};

/// Fails on NaN or infinite fields, which JSON would store as `null`
pub fn keypoints_to_json(keypoints: &[Keypoint]) -> CodecResult<String> {
    for (index, kp) in keypoints.iter().enumerate() {
        check_finite(
            index,
            &[("x", kp.x), ("y", kp.y), ("size", kp.size), ("angle", kp.angle), ("response", kp.response)],
        )?;
    }
    Ok(serde_json::to_string(&serialize_keypoints(keypoints))?)
}

pub fn keypoints_from_json(json: &str) -> CodecResult<Vec<Keypoint>> {
    let records: Vec<KeypointRecord> = serde_json::from_str(json)?;
    Ok(deserialize_keypoints(&records))
}

/// Fails on a NaN or infinite distance, which JSON would store as `null`
pub fn matches_to_json(matches: &[DMatch]) -> CodecResult<String> {
    for (index, m) in matches.iter().enumerate() {
        check_finite(index, &[("distance", m.distance)])?;
    }
    Ok(serde_json::to_string(&serialize_matches(matches))?)
}

pub fn matches_from_json(json: &str) -> CodecResult<Vec<DMatch>> {
    let records: Vec<MatchRecord> = serde_json::from_str(json)?;
    Ok(deserialize_matches(&records))
}

/// Save keypoints to a JSON archive, replacing any existing file
pub fn save_keypoints<P: AsRef<Path>>(path: P, keypoints: &[Keypoint]) -> CodecResult<()> {
    let path = path.as_ref();
    write_archive(path, &keypoints_to_json(keypoints)?)?;
    debug!(path = %path.display(), count = keypoints.len(), "saved keypoints");
    Ok(())
}

pub fn load_keypoints<P: AsRef<Path>>(path: P) -> CodecResult<Vec<Keypoint>> {
    let path = path.as_ref();
    let keypoints = keypoints_from_json(&read_archive(path)?)?;
    debug!(path = %path.display(), count = keypoints.len(), "loaded keypoints");
    Ok(keypoints)
}

/// Save matches to a JSON archive, replacing any existing file
pub fn save_matches<P: AsRef<Path>>(path: P, matches: &[DMatch]) -> CodecResult<()> {
    let path = path.as_ref();
    write_archive(path, &matches_to_json(matches)?)?;
    debug!(path = %path.display(), count = matches.len(), "saved matches");
    Ok(())
}

pub fn load_matches<P: AsRef<Path>>(path: P) -> CodecResult<Vec<DMatch>> {
    let path = path.as_ref();
    let matches = matches_from_json(&read_archive(path)?)?;
    debug!(path = %path.display(), count = matches.len(), "loaded matches");
    Ok(matches)
}

fn check_finite(index: usize, fields: &[(&'static str, f32)]) -> CodecResult<()> {
    match fields.iter().find(|(_, v)| !v.is_finite()) {
        Some(&(field, _)) => Err(CodecError::NonFinite { index, field }),
        None => Ok(()),
    }
}

fn write_archive(path: &Path, contents: &str) -> CodecResult<()> {
    fs::write(path, contents).map_err(|source| CodecError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_archive(path: &Path) -> CodecResult<String> {
    fs::read_to_string(path).map_err(|source| CodecError::Io {
        path: path.to_path_buf(),
        source,
    })
}
