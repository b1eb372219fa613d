use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("Correspondence count mismatch: {observed} observed, {reprojected} reprojected points")]
    LengthMismatch { observed: usize, reprojected: usize },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type PlotResult<T> = Result<T, PlotError>;
