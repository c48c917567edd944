use image::{GrayImage, Luma};
use imageproc::drawing::draw_line_segment_mut;

use crate::math::Pixel;
use crate::model::FILLED;

/// Renders a closed pixel polygon as a solid region, boundary included.
///
/// Rows are filled with an even-odd scanline test at pixel centres, using
/// half-open edge spans so each vertex is counted once. The polygon edges
/// are then stamped on top, which covers horizontal edges and spurs that
/// enclose no area.
pub struct FillContour<'a> {
    points: &'a [Pixel],
}

impl<'a> FillContour<'a> {
    #[must_use]
    pub fn new(points: &'a [Pixel]) -> Self {
        Self { points }
    }

    /// Fills the polygon into `canvas` with [`FILLED`].
    ///
    /// Polygons with fewer than three vertices enclose nothing and leave the
    /// canvas untouched. Parts outside the canvas are clipped.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn execute(&self, canvas: &mut GrayImage) {
        let n = self.points.len();
        if n < 3 {
            return;
        }
        let (width, height) = canvas.dimensions();
        let max_x = i32::try_from(width).unwrap_or(i32::MAX) - 1;
        let max_y = i32::try_from(height).unwrap_or(i32::MAX) - 1;

        let y_lo = self.points.iter().map(|p| p.y).min().unwrap_or(0).max(0);
        let y_hi = self.points.iter().map(|p| p.y).max().unwrap_or(0).min(max_y);

        let mut crossings: Vec<f64> = Vec::new();
        for y in y_lo..=y_hi {
            crossings.clear();
            for i in 0..n {
                let a = self.points[i];
                let b = self.points[(i + 1) % n];
                if (a.y <= y) != (b.y <= y) {
                    let t = f64::from(y - a.y) / f64::from(b.y - a.y);
                    crossings.push(f64::from(a.x) + t * f64::from(b.x - a.x));
                }
            }
            crossings.sort_by(f64::total_cmp);
            for span in crossings.chunks_exact(2) {
                let from = (span[0].ceil() as i32).max(0);
                let to = (span[1].floor() as i32).min(max_x);
                for x in from..=to {
                    canvas.put_pixel(x as u32, y as u32, Luma([FILLED]));
                }
            }
        }

        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            draw_line_segment_mut(
                canvas,
                (a.x as f32, a.y as f32),
                (b.x as f32, b.y as f32),
                Luma([FILLED]),
            );
        }
    }
}
