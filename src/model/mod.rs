mod contour_points;
mod domain;
mod volume;

pub use contour_points::{ContourPoint, ContourPointSet, PointEntry};
pub use domain::ImageDomain;
pub use volume::{MaskVolume, PresenceVolume, FILLED};
