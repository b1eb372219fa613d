pub mod axes;
pub mod correspondences;
pub mod error;
pub mod style;

pub use axes::{Axes, RasterAxes};
pub use correspondences::{draw_correspondences, mean_reprojection_error};
pub use error::{PlotError, PlotResult};
pub use style::PlotStyle;
