use std::path::Path;

use nalgebra::{Matrix3, Quaternion, UnitQuaternion, Vector3};
use nifti::writer::WriterOptions;
use nifti::NiftiHeader;
use tracing::debug;

use crate::error::{FileError, Result};
use crate::math::Matrix4;
use crate::model::{ImageDomain, MaskVolume};

/// Sform code marking the affine as aligned to another image.
const SFORM_ALIGNED: i16 = 2;

/// Grid description of a reference volume: its voxel extents and the affine
/// mapping voxel indices to physical space.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceImage {
    domain: ImageDomain,
    affine: Matrix4,
}

impl ReferenceImage {
    /// Reads the NIfTI-1 header of `path` (`.nii` or `.nii.gz`).
    ///
    /// Only the header is decoded; voxel data is never loaded.
    ///
    /// # Errors
    ///
    /// Returns `FileError::ReadVolume` if the header cannot be read, and a
    /// `DomainError` if the image has fewer than three dimensions or a zero
    /// extent.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let header = NiftiHeader::from_file(path).map_err(|source| FileError::ReadVolume {
            path: path.to_path_buf(),
            source,
        })?;
        let reference = Self::from_header(&header)?;
        debug!(
            path = %path.display(),
            extents = ?reference.domain.extents(),
            "loaded reference image header"
        );
        Ok(reference)
    }

    /// Builds the grid description from a decoded header.
    ///
    /// # Errors
    ///
    /// Returns a `DomainError` for a rank below three or a zero extent.
    pub fn from_header(header: &NiftiHeader) -> Result<Self> {
        let rank = usize::from(header.dim[0]).min(header.dim.len() - 1);
        let shape: Vec<usize> = header.dim[1..=rank].iter().map(|&d| usize::from(d)).collect();
        Ok(Self {
            domain: ImageDomain::from_shape(&shape)?,
            affine: affine_from_header(header),
        })
    }

    #[must_use]
    pub fn domain(&self) -> ImageDomain {
        self.domain
    }

    #[must_use]
    pub fn affine(&self) -> &Matrix4 {
        &self.affine
    }
}

/// Voxel-to-world affine of a NIfTI-1 header.
///
/// The sform is used when `sform_code > 0`, otherwise the qform when
/// `qform_code > 0`, otherwise a plain scaling by the voxel sizes.
#[must_use]
pub fn affine_from_header(header: &NiftiHeader) -> Matrix4 {
    if header.sform_code > 0 {
        let mut affine = Matrix4::identity();
        for (r, row) in [header.srow_x, header.srow_y, header.srow_z].iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                affine[(r, c)] = f64::from(v);
            }
        }
        return affine;
    }

    let zooms = Vector3::new(
        f64::from(header.pixdim[1]),
        f64::from(header.pixdim[2]),
        f64::from(header.pixdim[3]),
    );
    if header.qform_code > 0 {
        let b = f64::from(header.quatern_b);
        let c = f64::from(header.quatern_c);
        let d = f64::from(header.quatern_d);
        let a = (1.0 - (b * b + c * c + d * d)).max(0.0).sqrt();
        let rotation = UnitQuaternion::from_quaternion(Quaternion::new(a, b, c, d));
        let qfac = if header.pixdim[0] < 0.0 { -1.0 } else { 1.0 };
        let scale = Matrix3::from_diagonal(&Vector3::new(zooms.x, zooms.y, zooms.z * qfac));
        let mut affine = (rotation.to_rotation_matrix().matrix() * scale).to_homogeneous();
        affine[(0, 3)] = f64::from(header.quatern_x);
        affine[(1, 3)] = f64::from(header.quatern_y);
        affine[(2, 3)] = f64::from(header.quatern_z);
        return affine;
    }

    Matrix4::new_nonuniform_scaling(&zooms)
}

/// Writes `mask` as an unsigned 8-bit NIfTI-1 volume carrying `affine`.
///
/// A fresh header is written, so no intensity scaling or metadata of the
/// reference image carries over. Paths ending in `.gz` are compressed.
///
/// # Errors
///
/// Returns `FileError::WriteVolume` if the file cannot be written.
pub fn write_mask(path: impl AsRef<Path>, mask: &MaskVolume, affine: &Matrix4) -> Result<()> {
    let path = path.as_ref();
    let header = mask_header(affine);
    WriterOptions::new(path)
        .reference_header(&header)
        .write_nifti(mask.as_array())
        .map_err(|source| FileError::WriteVolume {
            path: path.to_path_buf(),
            source,
        })?;
    debug!(
        path = %path.display(),
        filled_voxels = mask.filled_count(),
        "wrote mask volume"
    );
    Ok(())
}

#[allow(clippy::cast_possible_truncation)]
fn mask_header(affine: &Matrix4) -> NiftiHeader {
    let row = |r: usize| -> [f32; 4] { std::array::from_fn(|c| affine[(r, c)] as f32) };
    let mut header = NiftiHeader {
        srow_x: row(0),
        srow_y: row(1),
        srow_z: row(2),
        sform_code: SFORM_ALIGNED,
        qform_code: 0,
        ..NiftiHeader::default()
    };
    for axis in 0..3 {
        header.pixdim[axis + 1] = affine.fixed_view::<3, 1>(0, axis).norm() as f32;
    }
    header
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{DomainError, MaskError};
    use approx::assert_relative_eq;
    use image::GrayImage;
    use ndarray::{Array3, Ix3};
    use nifti::{IntoNdArray, NiftiObject, ReaderOptions};

    fn header_with_dims(dims: &[u16]) -> NiftiHeader {
        let mut header = NiftiHeader::default();
        header.dim = [1; 8];
        header.dim[0] = u16::try_from(dims.len()).unwrap();
        header.dim[1..=dims.len()].copy_from_slice(dims);
        header
    }

    #[test]
    fn mask_round_trips_with_affine() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mask.nii.gz");

        let domain = ImageDomain::new(4, 5, 3).unwrap();
        let mut mask = MaskVolume::zeros(domain);
        let mut img = GrayImage::new(5, 4);
        img.put_pixel(2, 1, image::Luma([255]));
        mask.write_slice(2, &img);

        #[rustfmt::skip]
        let affine = Matrix4::new(
            0.0, -2.0, 0.0, 10.0,
            1.5,  0.0, 0.0, -4.0,
            0.0,  0.0, 3.0,  7.0,
            0.0,  0.0, 0.0,  1.0,
        );
        write_mask(&path, &mask, &affine).unwrap();

        let reference = ReferenceImage::load(&path).unwrap();
        assert_eq!(reference.domain(), domain);
        assert_relative_eq!(*reference.affine(), affine, epsilon = 1e-5);

        let data: Array3<u8> = ReaderOptions::new()
            .read_file(&path)
            .unwrap()
            .into_volume()
            .into_ndarray::<u8>()
            .unwrap()
            .into_dimensionality::<Ix3>()
            .unwrap();
        assert_eq!(&data, mask.as_array());
        assert_eq!(data[[1, 2, 2]], 255);
    }

    #[test]
    fn missing_reference_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ReferenceImage::load(dir.path().join("absent.nii.gz")).unwrap_err();
        assert!(matches!(err, MaskError::File(FileError::ReadVolume { .. })));
    }

    #[test]
    fn four_dimensional_header_uses_leading_axes() {
        let reference = ReferenceImage::from_header(&header_with_dims(&[10, 12, 3, 5])).unwrap();
        assert_eq!(reference.domain().extents(), [10, 12, 3]);
    }

    #[test]
    fn two_dimensional_header_is_rejected() {
        let err = ReferenceImage::from_header(&header_with_dims(&[10, 12])).unwrap_err();
        assert!(matches!(
            err,
            MaskError::Domain(DomainError::RankTooLow { rank: 2 })
        ));
    }

    #[test]
    fn sform_takes_precedence() {
        let header = NiftiHeader {
            sform_code: 1,
            srow_x: [2.0, 0.0, 0.0, 1.0],
            srow_y: [0.0, 2.0, 0.0, 2.0],
            srow_z: [0.0, 0.0, 2.0, 3.0],
            qform_code: 1,
            quatern_d: 1.0,
            ..NiftiHeader::default()
        };
        let affine = affine_from_header(&header);
        assert_relative_eq!(affine[(0, 0)], 2.0);
        assert_relative_eq!(affine[(2, 3)], 3.0);
    }

    #[test]
    fn qform_quaternion_affine() {
        let half = std::f32::consts::FRAC_1_SQRT_2;
        let mut header = NiftiHeader {
            qform_code: 1,
            sform_code: 0,
            quatern_b: 0.0,
            quatern_c: 0.0,
            quatern_d: half,
            quatern_x: 5.0,
            quatern_y: 6.0,
            quatern_z: 7.0,
            ..NiftiHeader::default()
        };
        header.pixdim[..4].copy_from_slice(&[-1.0, 2.0, 3.0, 4.0]);

        #[rustfmt::skip]
        let expected = Matrix4::new(
            0.0, -3.0,  0.0, 5.0,
            2.0,  0.0,  0.0, 6.0,
            0.0,  0.0, -4.0, 7.0,
            0.0,  0.0,  0.0, 1.0,
        );
        assert_relative_eq!(affine_from_header(&header), expected, epsilon = 1e-5);
    }

    #[test]
    fn fallback_is_voxel_scaling() {
        let mut header = NiftiHeader {
            qform_code: 0,
            sform_code: 0,
            ..NiftiHeader::default()
        };
        header.pixdim[1..4].copy_from_slice(&[1.5, 2.0, 2.5]);
        let affine = affine_from_header(&header);
        assert_relative_eq!(
            affine,
            Matrix4::new_nonuniform_scaling(&Vector3::new(1.5, 2.0, 2.5))
        );
    }
}
