use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::color::ColorChannel;
use crate::error::{PlyError, PlyResult};
use crate::options::{ExportOptions, LengthPolicy};

const PLY_HEADER_PROPERTIES: &str = "property float x\n\
property float y\n\
property float z\n\
property uchar red\n\
property uchar green\n\
property uchar blue\n";

/// Triangulated points with per-point colors, as produced by a geometry stage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointCloud {
    pub points: Vec<[f64; 3]>,
    pub colors: Vec<[f64; 3]>,
}

impl PointCloud {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn export<P: AsRef<Path>>(&self, path: P, options: &ExportOptions) -> PlyResult<usize> {
        export_point_cloud(path, &self.points, &self.colors, options)
    }
}

type Vertex = ([f64; 3], [u8; 3]);

/// Write `points` and `colors` as an ASCII PLY document, returning the vertex count
///
/// Nothing reaches `writer` unless every vertex passes validation.
pub fn write_ply<W: Write, C: ColorChannel>(
    mut writer: W,
    points: &[[f64; 3]],
    colors: &[[C; 3]],
    options: &ExportOptions,
) -> PlyResult<usize> {
    let vertices = pair_vertices(points, colors, options)?;
    write_vertices(&mut writer, &vertices)?;
    Ok(vertices.len())
}

/// Export a point cloud to `path`, overwriting whatever is there
///
/// The file is closed on every return path; a failed flush is reported.
pub fn export_point_cloud<P: AsRef<Path>, C: ColorChannel>(
    path: P,
    points: &[[f64; 3]],
    colors: &[[C; 3]],
    options: &ExportOptions,
) -> PlyResult<usize> {
    let path = path.as_ref();
    let vertices = pair_vertices(points, colors, options)?;

    let mut writer = BufWriter::new(File::create(path)?);
    write_vertices(&mut writer, &vertices)?;
    writer.flush()?;

    debug!(path = %path.display(), vertices = vertices.len(), "exported point cloud");
    Ok(vertices.len())
}

fn pair_vertices<C: ColorChannel>(
    points: &[[f64; 3]],
    colors: &[[C; 3]],
    options: &ExportOptions,
) -> PlyResult<Vec<Vertex>> {
    if points.len() != colors.len() {
        match options.length_policy {
            LengthPolicy::Strict => {
                return Err(PlyError::LengthMismatch {
                    points: points.len(),
                    colors: colors.len(),
                });
            }
            LengthPolicy::Truncate => {
                warn!(
                    points = points.len(),
                    colors = colors.len(),
                    "point/color count mismatch, truncating to the shorter array"
                );
            }
        }
    }

    points
        .iter()
        .zip(colors)
        .enumerate()
        .map(|(index, (&point, color))| -> PlyResult<Vertex> {
            let mut rgb = [0u8; 3];
            for (dst, &channel) in rgb.iter_mut().zip(color) {
                *dst = channel.to_uchar().ok_or_else(|| PlyError::ColorOutOfRange {
                    index,
                    value: channel.as_f64(),
                })?;
            }
            Ok((point, rgb))
        })
        .collect()
}

fn write_vertices<W: Write>(writer: &mut W, vertices: &[Vertex]) -> std::io::Result<()> {
    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "element vertex {}", vertices.len())?;
    writer.write_all(PLY_HEADER_PROPERTIES.as_bytes())?;
    writeln!(writer, "end_header")?;

    for ([x, y, z], [r, g, b]) in vertices {
        // Debug formatting keeps the fractional part on integral floats ("1.0")
        writeln!(writer, "{:?} {:?} {:?} {} {} {}", x, y, z, r, g, b)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn render<C: ColorChannel>(points: &[[f64; 3]], colors: &[[C; 3]], options: &ExportOptions) -> PlyResult<String> {
        let mut buf = Vec::new();
        write_ply(&mut buf, points, colors, options)?;
        Ok(String::from_utf8(buf).unwrap())
    }

    #[test]
    fn test_header_layout() {
        let out = render::<u8>(&[[0.0, 0.0, 0.0]], &[[1, 2, 3]], &ExportOptions::default()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            &lines[..9],
            &[
                "ply",
                "format ascii 1.0",
                "element vertex 1",
                "property float x",
                "property float y",
                "property float z",
                "property uchar red",
                "property uchar green",
                "property uchar blue",
            ]
        );
        assert_eq!(lines[9], "end_header");
        assert_eq!(lines[10], "0.0 0.0 0.0 1 2 3");
    }

    #[test]
    fn test_colors_truncated_not_rounded() {
        let points = [[0.0, 0.0, 0.0], [1.0, 2.0, 3.0]];
        let colors = [[255.0, 0.0, 0.0], [0.0, 255.9, 0.0]];
        let out = render(&points, &colors, &ExportOptions::default()).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[2], "element vertex 2");
        assert_eq!(&lines[10..], &["0.0 0.0 0.0 255 0 0", "1.0 2.0 3.0 0 255 0"]);
    }

    #[test]
    fn test_fractional_coordinates() {
        let out = render(&[[-0.5, 2.25, 1e-3]], &[[10i32, 20, 30]], &ExportOptions::default()).unwrap();
        assert_eq!(out.lines().last(), Some("-0.5 2.25 0.001 10 20 30"));
    }

    #[test]
    fn test_empty_cloud_writes_header_only() {
        let out = render::<f64>(&[], &[], &ExportOptions::default()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[2], "element vertex 0");
        assert_eq!(lines[9], "end_header");
    }

    #[test]
    fn test_strict_length_mismatch() {
        let mut buf = Vec::new();
        let result = write_ply(
            &mut buf,
            &[[0.0; 3], [1.0; 3]],
            &[[0u8; 3]],
            &ExportOptions::default(),
        );
        assert!(matches!(result, Err(PlyError::LengthMismatch { points: 2, colors: 1 })));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_truncate_length_mismatch() {
        let out = render(
            &[[0.0; 3], [1.0; 3], [2.0; 3]],
            &[[9u8, 9, 9], [8, 8, 8]],
            &ExportOptions::truncating(),
        )
        .unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[2], "element vertex 2");
        assert_eq!(lines.len(), 12);
        assert_eq!(lines[11], "1.0 1.0 1.0 8 8 8");
    }

    #[test]
    fn test_color_out_of_range() {
        let result = render(&[[0.0; 3], [0.0; 3]], &[[0.0, 0.0, 0.0], [0.0, 256.0, 0.0]], &ExportOptions::default());
        match result {
            Err(PlyError::ColorOutOfRange { index, value }) => {
                assert_eq!(index, 1);
                assert_eq!(value, 256.0);
            }
            other => panic!("expected color error, got {:?}", other),
        }
    }

    #[test]
    fn test_export_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cloud.ply");
        let points = [[0.5, 1.5, 2.5], [3.0, 4.0, 5.0]];
        let colors = [[12.7, 40.0, 250.2], [0.0, 0.0, 0.0]];

        let n = export_point_cloud(&path, &points, &colors, &ExportOptions::default()).unwrap();
        assert_eq!(n, 2);
        let first = std::fs::read(&path).unwrap();
        export_point_cloud(&path, &points, &colors, &ExportOptions::default()).unwrap();
        let second = std::fs::read(&path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_export_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cloud.ply");
        std::fs::write(&path, "stale contents that are longer than the new file ".repeat(20)).unwrap();

        let cloud = PointCloud {
            points: vec![[1.0, 1.0, 1.0]],
            colors: vec![[1.0, 2.0, 3.0]],
        };
        cloud.export(&path, &ExportOptions::default()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("ply\n"));
        assert!(written.ends_with("1.0 1.0 1.0 1 2 3\n"));
        assert!(!written.contains("stale"));
    }

    #[test]
    fn test_export_to_missing_directory_is_io_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("cloud.ply");
        let result = export_point_cloud::<_, u8>(&path, &[], &[], &ExportOptions::default());
        assert!(matches!(result, Err(PlyError::Io(_))));
    }
}
