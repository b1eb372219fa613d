use std::path::Path;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};

use crate::error::PlotResult;

/// Drawing surface supplied by the caller
///
/// Coordinates are image pixels, x to the right and y down.
pub trait Axes {
    /// Replace the surface background with `img`
    fn imshow(&mut self, img: &DynamicImage);

    fn plot_marker(&mut self, at: [f32; 2], radius: u32, color: Rgba<u8>);

    fn plot_line(&mut self, from: [f32; 2], to: [f32; 2], color: Rgba<u8>);
}

/// [`Axes`] backed by an RGBA raster
#[derive(Debug, Clone)]
pub struct RasterAxes {
    canvas: RgbaImage,
}

impl RasterAxes {
    /// Blank white surface
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255])),
        }
    }

    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.canvas.dimensions()
    }

    pub fn into_image(self) -> RgbaImage {
        self.canvas
    }

    /// Save the surface; format follows the file extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> PlotResult<()> {
        let path = path.as_ref();
        match ImageFormat::from_path(path) {
            // JPEG has no alpha channel
            Ok(ImageFormat::Jpeg) => DynamicImage::ImageRgba8(self.canvas.clone()).to_rgb8().save(path)?,
            _ => self.canvas.save(path)?,
        }
        Ok(())
    }
}

impl Axes for RasterAxes {
    fn imshow(&mut self, img: &DynamicImage) {
        self.canvas = img.to_rgba8();
    }

    fn plot_marker(&mut self, at: [f32; 2], radius: u32, color: Rgba<u8>) {
        let (w, h) = self.canvas.dimensions();
        let r = radius as f32;
        let visible = at.iter().all(|v| v.is_finite())
            && at[0] >= -r
            && at[1] >= -r
            && at[0] <= w as f32 + r
            && at[1] <= h as f32 + r;
        if !visible {
            return;
        }
        let center = (at[0].round() as i32, at[1].round() as i32);
        draw_filled_circle_mut(&mut self.canvas, center, radius as i32, color);
    }

    fn plot_line(&mut self, from: [f32; 2], to: [f32; 2], color: Rgba<u8>) {
        let (w, h) = self.canvas.dimensions();
        if let Some((a, b)) = clip_segment(from, to, w as f32, h as f32) {
            draw_line_segment_mut(&mut self.canvas, (a[0], a[1]), (b[0], b[1]), color);
        }
    }
}

/// Liang-Barsky clip of a segment to `[0, w] x [0, h]`; `None` when nothing is left
fn clip_segment(from: [f32; 2], to: [f32; 2], w: f32, h: f32) -> Option<([f32; 2], [f32; 2])> {
    if !from.iter().chain(&to).all(|v| v.is_finite()) {
        return None;
    }
    let (x0, y0) = (from[0] as f64, from[1] as f64);
    let (dx, dy) = (to[0] as f64 - x0, to[1] as f64 - y0);
    let (w, h) = (w as f64, h as f64);

    let mut t0 = 0.0f64;
    let mut t1 = 1.0f64;
    for (p, q) in [(-dx, x0), (dx, w - x0), (-dy, y0), (dy, h - y0)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let t = q / p;
            if p < 0.0 {
                t0 = t0.max(t);
            } else {
                t1 = t1.min(t);
            }
        }
    }
    if t0 > t1 {
        return None;
    }

    let at = |t: f64| [(x0 + t * dx) as f32, (y0 + t * dy) as f32];
    Some((at(t0), at(t1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GrayImage;

    const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    #[test]
    fn test_imshow_replaces_background() {
        let mut ax = RasterAxes::new(4, 4);
        ax.imshow(&DynamicImage::ImageLuma8(GrayImage::from_pixel(16, 8, image::Luma([40]))));
        assert_eq!(ax.dimensions(), (16, 8));
        assert_eq!(ax.canvas().get_pixel(3, 3), &Rgba([40, 40, 40, 255]));
    }

    #[test]
    fn test_marker_covers_center() {
        let mut ax = RasterAxes::new(20, 20);
        ax.plot_marker([10.2, 9.8], 2, GREEN);
        assert_eq!(ax.canvas().get_pixel(10, 10), &GREEN);
        assert_eq!(ax.canvas().get_pixel(11, 10), &GREEN);
        assert_eq!(ax.canvas().get_pixel(0, 0), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_line_between_points() {
        let mut ax = RasterAxes::new(20, 20);
        ax.plot_line([2.0, 5.0], [17.0, 5.0], BLUE);
        for x in 3..=16 {
            assert_eq!(ax.canvas().get_pixel(x, 5), &BLUE);
        }
        assert_eq!(ax.canvas().get_pixel(10, 6), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_drawing_outside_canvas_is_clipped() {
        let mut ax = RasterAxes::new(10, 10);
        ax.plot_marker([-50.0, 400.0], 3, GREEN);
        ax.plot_line([-20.0, -20.0], [-5.0, -1.0], BLUE);
        assert!(ax.canvas().pixels().all(|p| *p == Rgba([255, 255, 255, 255])));
    }

    #[test]
    fn test_far_marker_is_skipped() {
        let mut ax = RasterAxes::new(64, 48);
        ax.plot_marker([3.0e9, 10.0], 3, GREEN);
        ax.plot_marker([10.0, -1.0e12], 3, GREEN);
        ax.plot_marker([f32::NAN, 10.0], 3, GREEN);
        assert!(ax.canvas().pixels().all(|p| *p == Rgba([255, 255, 255, 255])));

        // Partly visible markers still draw their inside part
        ax.plot_marker([-2.0, 10.0], 3, GREEN);
        assert_eq!(ax.canvas().get_pixel(0, 10), &GREEN);
    }

    #[test]
    fn test_far_line_is_clipped() {
        let mut ax = RasterAxes::new(64, 48);
        let start = std::time::Instant::now();
        ax.plot_line([10.0, 10.0], [1.0e9, 10.0], BLUE);
        ax.plot_line([10.0, 20.0], [1.0e9, 5.0e8], BLUE);
        assert!(start.elapsed() < std::time::Duration::from_secs(1));

        assert_eq!(ax.canvas().get_pixel(10, 10), &BLUE);
        assert_eq!(ax.canvas().get_pixel(63, 10), &BLUE);
        assert_eq!(ax.canvas().get_pixel(10, 20), &BLUE);
    }

    #[test]
    fn test_clip_segment() {
        assert_eq!(
            clip_segment([-10.0, 5.0], [30.0, 5.0], 20.0, 10.0),
            Some(([0.0, 5.0], [20.0, 5.0]))
        );
        assert_eq!(
            clip_segment([2.0, 3.0], [4.0, 6.0], 20.0, 10.0),
            Some(([2.0, 3.0], [4.0, 6.0]))
        );
        assert_eq!(clip_segment([-10.0, -5.0], [-1.0, -1.0], 20.0, 10.0), None);
        assert_eq!(clip_segment([30.0, 2.0], [30.0, 8.0], 20.0, 10.0), None);
        assert_eq!(clip_segment([0.0, 0.0], [f32::INFINITY, 1.0], 20.0, 10.0), None);
    }

    #[test]
    fn test_save_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overlay.png");
        let mut ax = RasterAxes::new(8, 8);
        ax.plot_marker([4.0, 4.0], 1, GREEN);
        ax.save(&path).unwrap();

        let reloaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(reloaded.get_pixel(4, 4), &GREEN);
    }
}
