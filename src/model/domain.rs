use crate::error::{DomainError, Result};

/// Voxel-grid extents `(I, J, K)` of a reference image.
///
/// The third axis is the axial (slice) axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageDomain {
    extents: [usize; 3],
}

impl ImageDomain {
    /// Creates a domain from three extents.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ZeroExtent` if any extent is zero and
    /// `DomainError::ExtentTooLarge` if one does not fit in `u32`, the
    /// largest slice image side.
    pub fn new(i: usize, j: usize, k: usize) -> Result<Self> {
        let extents = [i, j, k];
        for (axis, &extent) in extents.iter().enumerate() {
            if extent == 0 {
                return Err(DomainError::ZeroExtent { axis }.into());
            }
            if u32::try_from(extent).is_err() {
                return Err(DomainError::ExtentTooLarge { axis, extent }.into());
            }
        }
        Ok(Self { extents })
    }

    /// Creates a domain from the leading three entries of a shape.
    ///
    /// Higher-dimensional shapes (e.g. a 4D time series) are accepted and
    /// their trailing axes ignored.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::RankTooLow` for fewer than three dimensions and
    /// `DomainError::ZeroExtent` if a leading extent is zero.
    pub fn from_shape(shape: &[usize]) -> Result<Self> {
        match shape {
            [i, j, k, ..] => Self::new(*i, *j, *k),
            _ => Err(DomainError::RankTooLow { rank: shape.len() }.into()),
        }
    }

    #[must_use]
    pub fn extents(&self) -> [usize; 3] {
        self.extents
    }

    /// Number of axial slices (extent of the third axis).
    #[must_use]
    pub fn slice_count(&self) -> usize {
        self.extents[2]
    }

    /// Total number of voxels.
    #[must_use]
    pub fn voxel_count(&self) -> usize {
        self.extents.iter().product()
    }

    /// Shape tuple for `ndarray` allocation.
    #[must_use]
    pub fn dim(&self) -> (usize, usize, usize) {
        (self.extents[0], self.extents[1], self.extents[2])
    }

    /// Returns the voxel as unsigned indices if it lies inside the domain.
    #[must_use]
    pub fn checked_index(&self, voxel: [i64; 3]) -> Option<[usize; 3]> {
        let mut index = [0usize; 3];
        for ((slot, &v), &extent) in index.iter_mut().zip(&voxel).zip(&self.extents) {
            *slot = usize::try_from(v).ok().filter(|&v| v < extent)?;
        }
        Some(index)
    }

    /// Clamps each axis of the voxel into `[0, extent - 1]`.
    #[must_use]
    pub fn clamp_index(&self, voxel: [i64; 3]) -> [usize; 3] {
        let mut index = [0usize; 3];
        for ((slot, &v), &extent) in index.iter_mut().zip(&voxel).zip(&self.extents) {
            *slot = usize::try_from(v).map_or(0, |v| v.min(extent - 1));
        }
        index
    }
}
