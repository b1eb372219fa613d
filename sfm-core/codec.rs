//! Conversion between detector value types and their plain record form.
//!
//! Element order is preserved in both directions; it lines up with descriptor
//! rows elsewhere in the pipeline.

use crate::types::{DMatch, Keypoint, KeypointRecord, MatchRecord};

pub fn serialize_keypoints(keypoints: &[Keypoint]) -> Vec<KeypointRecord> {
    keypoints.iter().map(Keypoint::to_record).collect()
}

pub fn deserialize_keypoints(records: &[KeypointRecord]) -> Vec<Keypoint> {
    records.iter().map(Keypoint::from_record).collect()
}

pub fn serialize_matches(matches: &[DMatch]) -> Vec<MatchRecord> {
    matches.iter().map(DMatch::to_record).collect()
}

pub fn deserialize_matches(records: &[MatchRecord]) -> Vec<DMatch> {
    records.iter().map(DMatch::from_record).collect()
}
