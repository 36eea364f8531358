//! Vector type alias for RGB tints.

use nalgebra::Vector3;

/// 3-component vector, used for the smoke tint color.
///
/// This is a simple alias for `nalgebra::Vector3<f32>`; with the
/// `serde-serialize` feature it reads and writes as `[x, y, z]`.
pub type Vec3 = Vector3<f32>;
