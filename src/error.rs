use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for contour-to-mask conversion.
#[derive(Debug, Error)]
pub enum MaskError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Contour(#[from] ContourError),

    #[error(transparent)]
    File(#[from] FileError),
}

/// Errors related to the image domain shape.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("image domain needs at least 3 dimensions, got {rank}")]
    RankTooLow { rank: usize },

    #[error("image domain axis {axis} has zero extent")]
    ZeroExtent { axis: usize },

    #[error("image domain axis {axis} extent {extent} exceeds the slice image limit")]
    ExtentTooLarge { axis: usize, extent: usize },
}

/// Errors related to contour points and contour files.
#[derive(Debug, Error)]
pub enum ContourError {
    #[error(
        "contour point {key}[{index}] at {coordinate:?} rounds to voxel {voxel:?}, \
         outside domain {domain:?}"
    )]
    OutOfBounds {
        key: String,
        index: usize,
        coordinate: [f64; 3],
        voxel: [i64; 3],
        domain: [usize; 3],
    },

    #[error("contour point {key}[{index}] has non-finite {axis} coordinate {value}")]
    NonFiniteCoordinate {
        key: String,
        index: usize,
        axis: char,
        value: f64,
    },

    #[error("contour file has no `{key}` entry")]
    MissingKey { key: String },

    #[error("malformed contour data in {context}: {message}")]
    Malformed { context: String, message: String },
}

/// Errors related to reading and writing input and output files.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("failed to open {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read NIfTI volume {}", path.display())]
    ReadVolume {
        path: PathBuf,
        #[source]
        source: nifti::NiftiError,
    },

    #[error("failed to write NIfTI volume {}", path.display())]
    WriteVolume {
        path: PathBuf,
        #[source]
        source: nifti::NiftiError,
    },
}

/// Convenience type alias for results using [`MaskError`].
pub type Result<T> = std::result::Result<T, MaskError>;
