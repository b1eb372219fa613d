pub mod config;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::info;

use sfm_core::{DMatch, Keypoint};
use sfm_plot::{draw_correspondences, mean_reprojection_error, RasterAxes};
use sfm_ply::{LengthPolicy, PointCloud};

pub use config::{ConfigError, ToolsConfig};

#[derive(Debug, Parser)]
#[command(name = "sfm-tools", version, about = "Structure-from-motion debugging helpers")]
pub struct Cli {
    /// Config file (.toml or .json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Export a JSON point cloud to ASCII PLY
    Ply(PlyArgs),
    /// Draw observed vs. reprojected points over an image
    Correspondences(CorrespondenceArgs),
    /// Summarize a keypoint archive
    InspectKeypoints {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Summarize a match archive
    InspectMatches {
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[derive(Debug, Args)]
pub struct PlyArgs {
    /// JSON file with `points` and `colors` arrays
    #[arg(short, long)]
    pub input: PathBuf,

    #[arg(short, long, default_value = "out.ply")]
    pub output: PathBuf,

    /// Pair points and colors up to the shorter array instead of failing
    #[arg(long)]
    pub truncate: bool,
}

#[derive(Debug, Args)]
pub struct CorrespondenceArgs {
    /// Background image
    #[arg(long)]
    pub image: PathBuf,

    /// JSON file with `observed` and `reprojected` arrays
    #[arg(short, long)]
    pub input: PathBuf,

    #[arg(short, long, default_value = "correspondences.png")]
    pub output: PathBuf,

    /// Draw only the first N correspondences
    #[arg(long)]
    pub draw_only: Option<usize>,
}

/// Observed image points and the reprojections of their 3D estimates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrespondenceSet {
    pub observed: Vec<[f32; 2]>,
    pub reprojected: Vec<[f32; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeypointSummary {
    pub count: usize,
    pub response_range: Option<(f32, f32)>,
    pub max_octave: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchSummary {
    pub count: usize,
    pub distance_range: Option<(f32, f32)>,
    pub images: usize,
}

pub fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ToolsConfig::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => ToolsConfig::default(),
    };

    match cli.command {
        Command::Ply(args) => {
            export_ply(&args, &config)?;
        }
        Command::Correspondences(args) => {
            plot_correspondences(&args, &config)?;
        }
        Command::InspectKeypoints { input } => {
            let kps = sfm_core::load_keypoints(&input)
                .with_context(|| format!("loading keypoints {}", input.display()))?;
            let summary = summarize_keypoints(&kps);
            info!(
                count = summary.count,
                response_range = ?summary.response_range,
                max_octave = ?summary.max_octave,
                "keypoint archive"
            );
        }
        Command::InspectMatches { input } => {
            let matches = sfm_core::load_matches(&input)
                .with_context(|| format!("loading matches {}", input.display()))?;
            let summary = summarize_matches(&matches);
            info!(
                count = summary.count,
                distance_range = ?summary.distance_range,
                images = summary.images,
                "match archive"
            );
        }
    }
    Ok(())
}

/// Run the `ply` subcommand; returns the number of vertices written
pub fn export_ply(args: &PlyArgs, config: &ToolsConfig) -> Result<usize> {
    let cloud: PointCloud = read_json(&args.input)?;

    let mut options = config.export.clone();
    if args.truncate {
        options.length_policy = LengthPolicy::Truncate;
    }

    let n = cloud
        .export(&args.output, &options)
        .with_context(|| format!("exporting point cloud to {}", args.output.display()))?;
    info!(vertices = n, output = %args.output.display(), "wrote PLY");
    Ok(n)
}

/// Run the `correspondences` subcommand; returns the mean reprojection error
pub fn plot_correspondences(args: &CorrespondenceArgs, config: &ToolsConfig) -> Result<Option<f32>> {
    let pairs: CorrespondenceSet = read_json(&args.input)?;
    let img = image::open(&args.image).with_context(|| format!("opening image {}", args.image.display()))?;

    let mut style = config.plot.clone();
    if let Some(limit) = args.draw_only {
        style = style.with_draw_only(limit);
    }

    let mut ax = RasterAxes::new(img.width(), img.height());
    draw_correspondences(&img, &pairs.observed, &pairs.reprojected, &mut ax, &style)?;
    ax.save(&args.output)
        .with_context(|| format!("saving overlay {}", args.output.display()))?;

    let error = mean_reprojection_error(&pairs.observed, &pairs.reprojected)?;
    info!(
        pairs = pairs.observed.len(),
        mean_error = ?error,
        output = %args.output.display(),
        "wrote correspondence overlay"
    );
    Ok(error)
}

pub fn summarize_keypoints(kps: &[Keypoint]) -> KeypointSummary {
    KeypointSummary {
        count: kps.len(),
        response_range: min_max(kps.iter().map(|kp| kp.response)),
        max_octave: kps.iter().map(|kp| kp.octave).max(),
    }
}

pub fn summarize_matches(matches: &[DMatch]) -> MatchSummary {
    let mut images: Vec<usize> = matches.iter().map(|m| m.img_idx).collect();
    images.sort_unstable();
    images.dedup();

    MatchSummary {
        count: matches.len(),
        distance_range: min_max(matches.iter().map(|m| m.distance)),
        images: images.len(),
    }
}

fn min_max(values: impl Iterator<Item = f32>) -> Option<(f32, f32)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}
