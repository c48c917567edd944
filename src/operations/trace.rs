use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};

use crate::math::polygon_2d::{polygon_area_2d, simplify_chain};
use crate::math::Pixel;

/// A border traced on one axial slice.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceContour {
    /// Corner points of the border, in tracing order.
    pub points: Vec<Pixel>,
    /// `true` for the inner border of a hole.
    pub is_hole: bool,
    /// Enclosed area in pixel units (shoelace over `points`).
    pub area: f64,
}

/// Traces every border (outer and hole) of the non-zero pixels of a slice
/// image using Suzuki-Abe border following.
///
/// Contours come back in detection order: raster order of each border's
/// starting pixel. Chains are compressed to their corner points.
pub struct TraceSlice<'a> {
    image: &'a GrayImage,
}

impl<'a> TraceSlice<'a> {
    #[must_use]
    pub fn new(image: &'a GrayImage) -> Self {
        Self { image }
    }

    #[must_use]
    pub fn execute(&self) -> Vec<SliceContour> {
        find_contours::<i32>(self.image)
            .into_iter()
            .map(|contour| {
                let chain: Vec<Pixel> = contour
                    .points
                    .iter()
                    .map(|p| Pixel::new(p.x, p.y))
                    .collect();
                let points = simplify_chain(&chain);
                let area = polygon_area_2d(&points);
                SliceContour {
                    points,
                    is_hole: contour.border_type == BorderType::Hole,
                    area,
                }
            })
            .collect()
    }
}
