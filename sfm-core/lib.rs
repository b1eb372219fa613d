pub mod archive;
pub mod codec;
pub mod error;
pub mod types;

pub use archive::{load_keypoints, load_matches, save_keypoints, save_matches};
pub use codec::{deserialize_keypoints, deserialize_matches, serialize_keypoints, serialize_matches};
pub use error::{CodecError, CodecResult};
pub use types::{DMatch, Keypoint, KeypointRecord, MatchRecord};
