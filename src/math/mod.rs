pub mod polygon_2d;
pub mod rounding;

/// Integer pixel coordinate on an axial slice (`x` = column, `y` = row).
pub type Pixel = nalgebra::Point2<i32>;

/// 4x4 transformation matrix mapping voxel indices to physical space.
pub type Matrix4 = nalgebra::Matrix4<f64>;
