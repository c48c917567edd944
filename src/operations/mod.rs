mod contour_to_mask;
mod fill;
mod quantize;
mod select;
mod trace;

pub use contour_to_mask::{convert_contour_to_mask, ContourToMask, MaskOptions};
pub use fill::FillContour;
pub use quantize::{BoundsPolicy, QuantizePoints};
pub use select::largest_contour;
pub use trace::{SliceContour, TraceSlice};
