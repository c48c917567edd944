mod contour_file;
mod nifti_volume;

pub use contour_file::{load_contour_file, parse_contour_document, DEFAULT_CONTOUR_KEY};
pub use nifti_volume::{affine_from_header, write_mask, ReferenceImage};
