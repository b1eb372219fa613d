use serde::{Deserialize, Serialize};

/// Colors and limits for correspondence plots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotStyle {
    /// RGBA of observed (detected) points
    pub observed_color: [u8; 4],
    /// RGBA of reprojected points
    pub reprojected_color: [u8; 4],
    /// RGBA of the observed -> reprojected segments
    pub line_color: [u8; 4],
    pub marker_radius: u32,
    /// Draw only the first N correspondences; markers and lines alike
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draw_only: Option<usize>,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            observed_color: [0, 255, 0, 255],
            reprojected_color: [255, 0, 0, 255],
            line_color: [0, 0, 255, 255],
            marker_radius: 3,
            draw_only: None,
        }
    }
}

impl PlotStyle {
    pub fn with_draw_only(mut self, limit: usize) -> Self {
        self.draw_only = Some(limit);
        self
    }

    pub fn with_marker_radius(mut self, radius: u32) -> Self {
        self.marker_radius = radius;
        self
    }

    /// Number of correspondences drawn out of `available`
    pub fn visible_count(&self, available: usize) -> usize {
        self.draw_only.map_or(available, |limit| limit.min(available))
    }
}
