use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlyError {
    #[error("Point/color count mismatch: {points} points, {colors} colors")]
    LengthMismatch { points: usize, colors: usize },

    #[error("Color channel {value} of vertex {index} does not fit in an unsigned byte")]
    ColorOutOfRange { index: usize, value: f64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PlyResult<T> = Result<T, PlyError>;
