use tracing::{debug, warn};

use crate::error::{ContourError, Result};
use crate::math::rounding::RoundingMode;
use crate::model::{ContourPointSet, ImageDomain, PresenceVolume};

/// What to do with a point whose rounded voxel falls outside the domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BoundsPolicy {
    /// Fail with `ContourError::OutOfBounds`.
    #[default]
    Reject,
    /// Clamp each axis into the domain and log a warning.
    Clamp,
}

/// Snaps every contour point to its nearest voxel and marks it in a
/// [`PresenceVolume`].
pub struct QuantizePoints<'a> {
    domain: ImageDomain,
    points: &'a ContourPointSet,
    rounding: RoundingMode,
    bounds: BoundsPolicy,
}

impl<'a> QuantizePoints<'a> {
    /// Creates a quantization with half-to-even rounding and rejection of
    /// out-of-bounds points.
    #[must_use]
    pub fn new(domain: ImageDomain, points: &'a ContourPointSet) -> Self {
        Self {
            domain,
            points,
            rounding: RoundingMode::default(),
            bounds: BoundsPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_rounding(mut self, rounding: RoundingMode) -> Self {
        self.rounding = rounding;
        self
    }

    #[must_use]
    pub fn with_bounds(mut self, bounds: BoundsPolicy) -> Self {
        self.bounds = bounds;
        self
    }

    /// Executes the quantization.
    ///
    /// # Errors
    ///
    /// Returns `ContourError::NonFiniteCoordinate` for NaN or infinite
    /// coordinates, and `ContourError::OutOfBounds` for points outside the
    /// domain under [`BoundsPolicy::Reject`].
    pub fn execute(&self) -> Result<PresenceVolume> {
        let mut presence = PresenceVolume::zeros(self.domain);
        let mut clamped = 0usize;
        let mut quantized = 0usize;

        for (key, index, point) in self.points.iter() {
            let coordinate = [point.x, point.y, point.z];
            let mut voxel = [0i64; 3];
            for (axis, (&value, slot)) in ['x', 'y', 'z']
                .into_iter()
                .zip(coordinate.iter().zip(voxel.iter_mut()))
            {
                *slot = self.rounding.to_index(value).ok_or_else(|| {
                    ContourError::NonFiniteCoordinate {
                        key: key.to_owned(),
                        index,
                        axis,
                        value,
                    }
                })?;
            }

            let cell = match (self.domain.checked_index(voxel), self.bounds) {
                (Some(cell), _) => cell,
                (None, BoundsPolicy::Clamp) => {
                    clamped += 1;
                    self.domain.clamp_index(voxel)
                }
                (None, BoundsPolicy::Reject) => {
                    return Err(ContourError::OutOfBounds {
                        key: key.to_owned(),
                        index,
                        coordinate,
                        voxel,
                        domain: self.domain.extents(),
                    }
                    .into());
                }
            };
            presence.mark(cell);
            quantized += 1;
        }

        if clamped > 0 {
            warn!(clamped, "clamped out-of-bounds contour points into the image domain");
        }
        debug!(
            points = quantized,
            marked = presence.marked_count(),
            "quantized contour points"
        );
        Ok(presence)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::MaskError;
    use crate::model::ContourPoint;

    fn domain() -> ImageDomain {
        ImageDomain::new(10, 10, 3).unwrap()
    }

    fn single(x: f64, y: f64, z: f64) -> ContourPointSet {
        let mut set = ContourPointSet::new();
        set.insert("0", ContourPoint::new(x, y, z));
        set
    }

    #[test]
    fn rounds_half_to_even_by_default() {
        let points = single(2.5, 3.5, 0.5);
        let presence = QuantizePoints::new(domain(), &points).execute().unwrap();
        assert!(presence.is_marked([2, 4, 0]));
        assert_eq!(presence.marked_count(), 1);
    }

    #[test]
    fn rounds_half_away_from_zero_when_asked() {
        let points = single(2.5, 3.5, 0.5);
        let presence = QuantizePoints::new(domain(), &points)
            .with_rounding(RoundingMode::HalfAwayFromZero)
            .execute()
            .unwrap();
        assert!(presence.is_marked([3, 4, 1]));
        assert_eq!(presence.marked_count(), 1);
    }

    #[test]
    fn coincident_points_mark_once() {
        let mut points = ContourPointSet::new();
        points.insert_sequence(
            "spline",
            vec![
                ContourPoint::new(4.1, 4.0, 1.0),
                ContourPoint::new(3.9, 4.2, 1.1),
                ContourPoint::new(6.0, 4.0, 1.0),
            ],
        );
        let presence = QuantizePoints::new(domain(), &points).execute().unwrap();
        assert_eq!(presence.marked_count(), 2);
    }

    #[test]
    fn rejects_out_of_bounds() {
        let points = single(9.6, 0.0, 1.0);
        let err = QuantizePoints::new(domain(), &points).execute().unwrap_err();
        match err {
            MaskError::Contour(ContourError::OutOfBounds { key, voxel, domain, .. }) => {
                assert_eq!(key, "0");
                assert_eq!(voxel, [10, 0, 1]);
                assert_eq!(domain, [10, 10, 3]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_negative_index() {
        let points = single(-0.6, 2.0, 1.0);
        assert!(QuantizePoints::new(domain(), &points).execute().is_err());
    }

    #[test]
    fn clamps_out_of_bounds() {
        let points = single(12.0, -3.0, 1.0);
        let presence = QuantizePoints::new(domain(), &points)
            .with_bounds(BoundsPolicy::Clamp)
            .execute()
            .unwrap();
        assert!(presence.is_marked([9, 0, 1]));
    }

    #[test]
    fn rejects_non_finite() {
        let points = single(1.0, f64::NAN, 1.0);
        let err = QuantizePoints::new(domain(), &points)
            .with_bounds(BoundsPolicy::Clamp)
            .execute()
            .unwrap_err();
        assert!(matches!(
            err,
            MaskError::Contour(ContourError::NonFiniteCoordinate { axis: 'y', .. })
        ));
    }
}
