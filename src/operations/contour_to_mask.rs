use image::GrayImage;
use rayon::prelude::*;
use tracing::{debug, trace};

use super::fill::FillContour;
use super::quantize::{BoundsPolicy, QuantizePoints};
use super::select::largest_contour;
use super::trace::TraceSlice;
use crate::error::Result;
use crate::math::rounding::RoundingMode;
use crate::model::{ContourPointSet, ImageDomain, MaskVolume, PresenceVolume};

/// Options controlling contour rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskOptions {
    /// How fractional coordinates snap to voxels.
    pub rounding: RoundingMode,
    /// What to do with points that snap outside the domain.
    pub bounds: BoundsPolicy,
    /// Process axial slices on the rayon thread pool.
    pub parallel: bool,
}

impl Default for MaskOptions {
    fn default() -> Self {
        Self {
            rounding: RoundingMode::HalfEven,
            bounds: BoundsPolicy::Reject,
            parallel: true,
        }
    }
}

/// Converts a contour point set into a binary mask volume.
///
/// Points are snapped to their nearest voxels. On every axial slice the
/// largest-area border traced through the snapped points is filled with
/// 255. Slices without an enclosing border stay zero.
pub struct ContourToMask<'a> {
    domain: ImageDomain,
    points: &'a ContourPointSet,
    options: MaskOptions,
}

impl<'a> ContourToMask<'a> {
    /// Creates a conversion with default options.
    #[must_use]
    pub fn new(domain: ImageDomain, points: &'a ContourPointSet) -> Self {
        Self {
            domain,
            points,
            options: MaskOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: MaskOptions) -> Self {
        self.options = options;
        self
    }

    /// Executes the conversion.
    ///
    /// # Errors
    ///
    /// Returns an error if a point has a non-finite coordinate, or snaps
    /// outside the domain under [`BoundsPolicy::Reject`].
    pub fn execute(&self) -> Result<MaskVolume> {
        let presence = QuantizePoints::new(self.domain, self.points)
            .with_rounding(self.options.rounding)
            .with_bounds(self.options.bounds)
            .execute()?;

        let slice_count = presence.slice_count();
        let slices: Vec<Option<GrayImage>> = if self.options.parallel {
            (0..slice_count)
                .into_par_iter()
                .map(|k| enclose_slice(&presence, k))
                .collect()
        } else {
            (0..slice_count).map(|k| enclose_slice(&presence, k)).collect()
        };

        let mut mask = MaskVolume::zeros(self.domain);
        for (k, filled) in slices.iter().enumerate() {
            if let Some(img) = filled {
                mask.write_slice(k, img);
            }
        }
        debug!(
            slices = slice_count,
            filled_voxels = mask.filled_count(),
            "rasterized contour mask"
        );
        Ok(mask)
    }
}

/// Converts with default [`MaskOptions`].
///
/// # Errors
///
/// See [`ContourToMask::execute`].
pub fn convert_contour_to_mask(
    domain: ImageDomain,
    points: &ContourPointSet,
) -> Result<MaskVolume> {
    ContourToMask::new(domain, points).execute()
}

/// Fills the largest border on slice `k`. Returns `None` when there is
/// nothing to fill.
fn enclose_slice(presence: &PresenceVolume, k: usize) -> Option<GrayImage> {
    if presence.slice(k).iter().all(|&v| v == 0) {
        return None;
    }
    let img = presence.slice_image(k);
    let contours = TraceSlice::new(&img).execute();
    let Some(selected) = largest_contour(&contours) else {
        trace!(slice = k, contours = contours.len(), "no enclosing contour");
        return None;
    };
    trace!(
        slice = k,
        contours = contours.len(),
        area = selected.area,
        "filling largest contour"
    );

    let (width, height) = img.dimensions();
    let mut filled = GrayImage::new(width, height);
    FillContour::new(&selected.points).execute(&mut filled);
    Some(filled)
}
