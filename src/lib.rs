pub mod error;
pub mod io;
pub mod math;
pub mod model;
pub mod operations;

pub use error::{MaskError, Result};
pub use model::{ContourPoint, ContourPointSet, ImageDomain, MaskVolume};
pub use operations::{convert_contour_to_mask, ContourToMask, MaskOptions};
