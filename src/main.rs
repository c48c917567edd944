use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use contour_mask::io::{load_contour_file, write_mask, ReferenceImage, DEFAULT_CONTOUR_KEY};
use contour_mask::math::rounding::RoundingMode;
use contour_mask::operations::BoundsPolicy;
use contour_mask::{ContourToMask, MaskOptions};

/// Mask volume written to the working directory.
const OUTPUT_PATH: &str = "binary_mask.nii.gz";

/// Filter used when `RUST_LOG` is unset or invalid.
const DEFAULT_LOG_FILTER: &str = "warn,contour_mask=info";

/// Convert a contour export to a binary mask on a reference image grid
#[derive(Parser, Debug)]
#[command(name = "contour-mask")]
#[command(about = "Convert contour to binary mask", long_about = None)]
struct Args {
    /// Reference NIfTI image supplying the voxel grid and affine
    #[arg(short, long = "img_path", visible_alias = "img-path")]
    img_path: String,

    /// JSON contour export with voxel-space point coordinates
    #[arg(short, long = "contour_path", visible_alias = "contour-path")]
    contour_path: String,

    /// Key in the contour file holding the point mapping
    #[arg(long, default_value = DEFAULT_CONTOUR_KEY)]
    key: String,

    /// Handling of points that round outside the image grid
    #[arg(long, value_enum, default_value = "reject")]
    bounds: BoundsArg,

    /// Tie-breaking rule when snapping coordinates to voxels
    #[arg(long, value_enum, default_value = "half-even")]
    rounding: RoundingArg,

    /// Process slices on a single thread
    #[arg(long)]
    sequential: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BoundsArg {
    Reject,
    Clamp,
}

impl From<BoundsArg> for BoundsPolicy {
    fn from(arg: BoundsArg) -> Self {
        match arg {
            BoundsArg::Reject => BoundsPolicy::Reject,
            BoundsArg::Clamp => BoundsPolicy::Clamp,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RoundingArg {
    HalfEven,
    HalfAwayFromZero,
}

impl From<RoundingArg> for RoundingMode {
    fn from(arg: RoundingArg) -> Self {
        match arg {
            RoundingArg::HalfEven => RoundingMode::HalfEven,
            RoundingArg::HalfAwayFromZero => RoundingMode::HalfAwayFromZero,
        }
    }
}

/// Builds the log filter. `RUST_LOG` replaces the default entirely, so
/// e.g. `RUST_LOG=contour_mask=trace` exposes per-slice statistics.
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn main() -> Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref()))
        .init();

    let args = Args::parse();

    let reference = ReferenceImage::load(&args.img_path)
        .with_context(|| format!("loading reference image {}", args.img_path))?;
    info!(extents = ?reference.domain().extents(), "reference image grid");

    let points = load_contour_file(&args.contour_path, &args.key)
        .with_context(|| format!("loading contour file {}", args.contour_path))?;
    info!(
        keys = points.key_count(),
        points = points.point_count(),
        "contour points"
    );

    let options = MaskOptions {
        rounding: args.rounding.into(),
        bounds: args.bounds.into(),
        parallel: !args.sequential,
    };
    let mask = ContourToMask::new(reference.domain(), &points)
        .with_options(options)
        .execute()
        .context("converting contour to mask")?;

    write_mask(OUTPUT_PATH, &mask, reference.affine())
        .with_context(|| format!("writing {OUTPUT_PATH}"))?;
    info!(
        path = OUTPUT_PATH,
        filled_voxels = mask.filled_count(),
        "saved binary mask"
    );

    Ok(())
}
