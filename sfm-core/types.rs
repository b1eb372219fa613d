use serde::{Deserialize, Serialize};

/// Plain record form of a [`Keypoint`]:
/// `(position, size, angle, response, octave, class_id)`
pub type KeypointRecord = ((f32, f32), f32, f32, f32, i32, Option<i32>);

/// Plain record form of a [`DMatch`]:
/// `(query_idx, train_idx, img_idx, distance)`
pub type MatchRecord = (usize, usize, usize, f32);

/// Detected interest point with scale, orientation and strength metadata
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    /// Diameter of the meaningful neighbourhood
    pub size: f32,
    /// Orientation in degrees, -1 when not computed
    pub angle: f32,
    pub response: f32,
    /// Pyramid octave the keypoint was extracted from
    pub octave: i32,
    /// Object class, if the detector assigned one
    pub class_id: Option<i32>,
}

impl Keypoint {
    /// Keypoint at `(x, y)` with detector defaults for everything but size
    pub fn new(x: f32, y: f32, size: f32) -> Self {
        Self {
            x,
            y,
            size,
            angle: -1.0,
            response: 0.0,
            octave: 0,
            class_id: None,
        }
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_response(mut self, response: f32) -> Self {
        self.response = response;
        self
    }

    pub fn with_octave(mut self, octave: i32) -> Self {
        self.octave = octave;
        self
    }

    pub fn with_class_id(mut self, class_id: i32) -> Self {
        self.class_id = Some(class_id);
        self
    }

    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub fn to_record(&self) -> KeypointRecord {
        (
            self.position(),
            self.size,
            self.angle,
            self.response,
            self.octave,
            self.class_id,
        )
    }

    pub fn from_record(record: &KeypointRecord) -> Self {
        let &((x, y), size, angle, response, octave, class_id) = record;
        Self {
            x,
            y,
            size,
            angle,
            response,
            octave,
            class_id,
        }
    }
}

/// Correspondence between a query keypoint and a train keypoint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DMatch {
    pub query_idx: usize,
    pub train_idx: usize,
    /// Train image index when matching against several images
    pub img_idx: usize,
    pub distance: f32,
}

impl DMatch {
    pub fn new(query_idx: usize, train_idx: usize, img_idx: usize, distance: f32) -> Self {
        Self {
            query_idx,
            train_idx,
            img_idx,
            distance,
        }
    }

    pub fn to_record(&self) -> MatchRecord {
        (self.query_idx, self.train_idx, self.img_idx, self.distance)
    }

    pub fn from_record(record: &MatchRecord) -> Self {
        let &(query_idx, train_idx, img_idx, distance) = record;
        Self::new(query_idx, train_idx, img_idx, distance)
    }
}
