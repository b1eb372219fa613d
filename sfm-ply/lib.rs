pub mod color;
pub mod error;
pub mod options;
pub mod writer;

pub use color::ColorChannel;
pub use error::{PlyError, PlyResult};
pub use options::{ExportOptions, LengthPolicy};
pub use writer::{export_point_cloud, write_ply, PointCloud};
