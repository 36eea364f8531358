//! Flame intensity kernel
//!
//! Recomputes the flame field from the reaction coordinate. The flame field
//! keeps no state of its own: every visited cell is overwritten, so running
//! the kernel twice gives the same result. It must run after `process_burn`
//! in the same step.

use super::profiler::KernelTimer;
use super::traversal::par_for_each_cell;
use crate::error::Result;
use crate::grid::{KernelRegion, RealGrid};

/// Flame intensity for a reaction value
#[inline]
pub fn flame_intensity(react: f32) -> f32 {
    if react > 0.0 {
        react.sqrt()
    } else {
        0.0
    }
}

/// Write `sqrt(react)` into `flame` over the interior of the grid
///
/// # Errors
///
/// Returns `KernelError::DimensionMismatch` if `flame` differs in shape from
/// `react`
pub fn update_flame(react: &RealGrid, flame: &mut RealGrid) -> Result<()> {
    let region = KernelRegion::interior(react.dims());
    update_flame_in(&region, react, flame)
}

/// Flame update over an explicit region
pub fn update_flame_in(
    region: &KernelRegion,
    react: &RealGrid,
    flame: &mut RealGrid,
) -> Result<()> {
    let _timer = KernelTimer::new("update_flame", region.cell_count());
    par_for_each_cell(
        region,
        (&["react"], &["flame"], &[]),
        [react],
        [flame],
        [],
        |_, [react], [flame], []| {
            *flame = flame_intensity(react);
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridDims;
    use approx::assert_relative_eq;

    #[test]
    fn test_flame_intensity() {
        assert_eq!(flame_intensity(0.25), 0.5);
        assert_eq!(flame_intensity(0.0), 0.0);
        assert_eq!(flame_intensity(-0.5), 0.0);
    }

    #[test]
    fn test_update_overwrites_stale_flame() {
        let dims = GridDims::planar(3, 3).unwrap();
        let react = RealGrid::from_vec(
            dims,
            vec![0.0, 0.0, 0.0, 0.0, 0.64, -1.0, 0.0, 0.0, 0.09],
        )
        .unwrap();
        let mut flame = RealGrid::with_value(dims, 9.0);

        update_flame(&react, &mut flame).unwrap();

        assert_relative_eq!(flame.get(1, 1, 0), 0.8, epsilon = 1e-6);
        assert_eq!(flame.get(2, 1, 0), 0.0);
        assert_relative_eq!(flame.get(2, 2, 0), 0.3, epsilon = 1e-6);
        // boundary cells are outside the kernel region
        assert_eq!(flame.get(0, 0, 0), 9.0);
    }

    #[test]
    fn test_update_is_idempotent() {
        let dims = GridDims::new(4, 4, 4).unwrap();
        let values = (0..dims.cell_count()).map(|n| (n % 7) as f32 * 0.1 - 0.2).collect();
        let react = RealGrid::from_vec(dims, values).unwrap();
        let mut flame = RealGrid::new(dims);

        update_flame(&react, &mut flame).unwrap();
        let first = flame.clone();
        update_flame(&react, &mut flame).unwrap();

        assert_eq!(first, flame);
    }
}
