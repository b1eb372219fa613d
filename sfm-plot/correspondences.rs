use image::{DynamicImage, Rgba};
use tracing::debug;

use crate::axes::Axes;
use crate::error::{PlotError, PlotResult};
use crate::style::PlotStyle;

/// Overlay observed points, their reprojections and the segments joining them
///
/// `img` becomes the background of `ax`. The i-th observed point is joined to
/// the i-th reprojected point. `style.draw_only` caps markers and segments to
/// the first N pairs. Returns `ax` so calls can be chained.
pub fn draw_correspondences<'a, A: Axes + ?Sized>(
    img: &DynamicImage,
    observed: &[[f32; 2]],
    reprojected: &[[f32; 2]],
    ax: &'a mut A,
    style: &PlotStyle,
) -> PlotResult<&'a mut A> {
    if observed.len() != reprojected.len() {
        return Err(PlotError::LengthMismatch {
            observed: observed.len(),
            reprojected: reprojected.len(),
        });
    }

    let n = style.visible_count(observed.len());
    let (observed, reprojected) = (&observed[..n], &reprojected[..n]);

    ax.imshow(img);

    for &pt in observed {
        ax.plot_marker(pt, style.marker_radius, Rgba(style.observed_color));
    }
    for &pt in reprojected {
        ax.plot_marker(pt, style.marker_radius, Rgba(style.reprojected_color));
    }
    for (&from, &to) in observed.iter().zip(reprojected) {
        ax.plot_line(from, to, Rgba(style.line_color));
    }

    debug!(drawn = n, "drew correspondences");
    Ok(ax)
}

/// Mean Euclidean distance between paired points, `None` when there are none
pub fn mean_reprojection_error(observed: &[[f32; 2]], reprojected: &[[f32; 2]]) -> PlotResult<Option<f32>> {
    if observed.len() != reprojected.len() {
        return Err(PlotError::LengthMismatch {
            observed: observed.len(),
            reprojected: reprojected.len(),
        });
    }
    if observed.is_empty() {
        return Ok(None);
    }

    let total: f32 = observed
        .iter()
        .zip(reprojected)
        .map(|(a, b)| ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt())
        .sum();
    Ok(Some(total / observed.len() as f32))
}
