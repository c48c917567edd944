use image::GrayImage;
use ndarray::{Array3, ArrayView2, Axis};

use super::ImageDomain;

/// Value of an enclosed voxel in a [`MaskVolume`].
pub const FILLED: u8 = 255;

/// Binary marker volume: 1 where at least one contour point snapped to the
/// voxel, 0 elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceVolume {
    data: Array3<u8>,
}

impl PresenceVolume {
    /// Allocates an all-zero volume covering `domain`.
    #[must_use]
    pub fn zeros(domain: ImageDomain) -> Self {
        Self {
            data: Array3::zeros(domain.dim()),
        }
    }

    /// Marks a voxel. Returns `true` if it was previously unmarked.
    pub fn mark(&mut self, index: [usize; 3]) -> bool {
        let cell = &mut self.data[index];
        let fresh = *cell == 0;
        *cell = 1;
        fresh
    }

    #[must_use]
    pub fn is_marked(&self, index: [usize; 3]) -> bool {
        self.data[index] != 0
    }

    /// Number of marked voxels.
    #[must_use]
    pub fn marked_count(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    #[must_use]
    pub fn slice_count(&self) -> usize {
        self.data.len_of(Axis(2))
    }

    /// Axial slice `k` as an `(I, J)` view.
    #[must_use]
    pub fn slice(&self, k: usize) -> ArrayView2<'_, u8> {
        self.data.index_axis(Axis(2), k)
    }

    /// Axial slice `k` scaled to an 8-bit image (0 or 255).
    ///
    /// Rows are the first axis and columns the second, so pixel
    /// `(x = j, y = i)` holds voxel `(i, j, k)`.
    #[must_use]
    pub fn slice_image(&self, k: usize) -> GrayImage {
        let slice = self.slice(k);
        let (rows, cols) = slice.dim();
        let mut img = GrayImage::new(to_u32(cols), to_u32(rows));
        for ((i, j), &v) in slice.indexed_iter() {
            if v != 0 {
                img.put_pixel(to_u32(j), to_u32(i), image::Luma([FILLED]));
            }
        }
        img
    }
}

/// Output mask: 255 inside the enclosed region of each axial slice, 0
/// elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskVolume {
    data: Array3<u8>,
}

impl MaskVolume {
    /// Allocates an all-zero mask covering `domain`.
    #[must_use]
    pub fn zeros(domain: ImageDomain) -> Self {
        Self {
            data: Array3::zeros(domain.dim()),
        }
    }

    /// Copies a filled slice image into axial slice `k`.
    ///
    /// Any non-zero pixel is stored as [`FILLED`].
    pub(crate) fn write_slice(&mut self, k: usize, img: &GrayImage) {
        let mut slice = self.data.index_axis_mut(Axis(2), k);
        for ((i, j), v) in slice.indexed_iter_mut() {
            let pixel = img.get_pixel(to_u32(j), to_u32(i)).0[0];
            *v = if pixel == 0 { 0 } else { FILLED };
        }
    }

    #[must_use]
    pub fn shape(&self) -> [usize; 3] {
        let (i, j, k) = self.data.dim();
        [i, j, k]
    }

    #[must_use]
    pub fn get(&self, index: [usize; 3]) -> u8 {
        self.data[index]
    }

    /// Axial slice `k` as an `(I, J)` view.
    #[must_use]
    pub fn slice(&self, k: usize) -> ArrayView2<'_, u8> {
        self.data.index_axis(Axis(2), k)
    }

    /// Number of filled voxels in the whole volume.
    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.data.iter().filter(|&&v| v == FILLED).count()
    }

    /// Number of filled voxels in axial slice `k`.
    #[must_use]
    pub fn slice_filled_count(&self, k: usize) -> usize {
        self.slice(k).iter().filter(|&&v| v == FILLED).count()
    }

    /// `true` if every voxel is 0 or [`FILLED`].
    #[must_use]
    pub fn is_binary(&self) -> bool {
        self.data.iter().all(|&v| v == 0 || v == FILLED)
    }

    #[must_use]
    pub fn as_array(&self) -> &Array3<u8> {
        &self.data
    }

    #[must_use]
    pub fn into_array(self) -> Array3<u8> {
        self.data
    }
}

// Slice extents come from an `ImageDomain`, which rejects extents beyond
// `u32::MAX`.
#[allow(clippy::cast_possible_truncation)]
fn to_u32(v: usize) -> u32 {
    v as u32
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn presence_slice_image_orientation() {
        let domain = ImageDomain::new(4, 6, 2).unwrap();
        let mut presence = PresenceVolume::zeros(domain);
        assert!(presence.mark([1, 3, 1]));
        assert!(!presence.mark([1, 3, 1]));
        assert_eq!(presence.marked_count(), 1);

        let img = presence.slice_image(1);
        assert_eq!(img.dimensions(), (6, 4));
        assert_eq!(img.get_pixel(3, 1).0[0], FILLED);
        assert_eq!(img.pixels().filter(|p| p.0[0] != 0).count(), 1);
        assert!(presence.slice_image(0).pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn mask_write_slice_binarizes() {
        let domain = ImageDomain::new(3, 3, 2).unwrap();
        let mut mask = MaskVolume::zeros(domain);
        let mut img = GrayImage::new(3, 3);
        img.put_pixel(2, 0, image::Luma([17]));
        img.put_pixel(0, 1, image::Luma([FILLED]));
        mask.write_slice(1, &img);

        assert_eq!(mask.get([0, 2, 1]), FILLED);
        assert_eq!(mask.get([1, 0, 1]), FILLED);
        assert_eq!(mask.slice_filled_count(0), 0);
        assert_eq!(mask.slice_filled_count(1), 2);
        assert_eq!(mask.filled_count(), 2);
        assert!(mask.is_binary());
        assert_eq!(mask.shape(), [3, 3, 2]);
    }
}
