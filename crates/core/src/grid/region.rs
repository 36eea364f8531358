//! Iteration region for per-cell kernels
//!
//! Kernels skip the index-0 boundary cells in x and y. In z they run over a
//! solver-supplied layer range, or a single `k = 0` pass for planar grids.

use super::simulation_grid::GridDims;
use crate::error::{KernelError, Result};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Half-open layer range in z
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerRange {
    pub min: usize,
    pub max: usize,
}

/// Cell region a kernel dispatch covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelRegion {
    dims: GridDims,
    x: Range<usize>,
    y: Range<usize>,
    z: Range<usize>,
}

impl KernelRegion {
    /// Interior region: `i ∈ [1, nx)`, `j ∈ [1, ny)` and `k ∈ [1, nz)`, or
    /// only `k = 0` when the grid is planar
    pub fn interior(dims: GridDims) -> Self {
        let z = if dims.is_3d() { 1..dims.nz } else { 0..1 };
        Self {
            dims,
            x: 1..dims.nx,
            y: 1..dims.ny,
            z,
        }
    }

    /// Every cell of the grid, boundary included
    pub fn full(dims: GridDims) -> Self {
        Self {
            dims,
            x: 0..dims.nx,
            y: 0..dims.ny,
            z: 0..dims.nz,
        }
    }

    /// Replace the z range with a solver-supplied layer range
    ///
    /// Planar grids ignore the override and keep their single `k = 0` pass.
    ///
    /// # Errors
    ///
    /// Returns `KernelError::InvalidLayerRange` if the range is reversed or
    /// reaches past the grid depth
    pub fn with_layers(mut self, layers: LayerRange) -> Result<Self> {
        if layers.min > layers.max || layers.max > self.dims.nz {
            return Err(KernelError::InvalidLayerRange {
                min: layers.min,
                max: layers.max,
                depth: self.dims.nz,
            });
        }
        if self.dims.is_3d() {
            self.z = layers.min..layers.max;
        }
        Ok(self)
    }

    /// Dimensions of the grids this region was built for
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Range of `i` visited in each row
    pub fn x_range(&self) -> Range<usize> {
        self.x.clone()
    }

    /// Whether the x-row at `(j, k)` is part of the region
    #[inline]
    pub fn contains_row(&self, j: usize, k: usize) -> bool {
        self.y.contains(&j) && self.z.contains(&k)
    }

    /// Number of cells the region visits
    pub fn cell_count(&self) -> usize {
        self.x.len() * self.y.len() * self.z.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interior_3d_skips_low_boundary() {
        let region = KernelRegion::interior(GridDims::new(4, 5, 6).unwrap());
        assert_eq!(region.x_range(), 1..4);
        assert!(!region.contains_row(0, 3));
        assert!(!region.contains_row(2, 0));
        assert!(region.contains_row(4, 5));
        assert_eq!(region.cell_count(), 3 * 4 * 5);
    }

    #[test]
    fn test_interior_planar_uses_layer_zero() {
        let region = KernelRegion::interior(GridDims::planar(4, 4).unwrap());
        assert!(region.contains_row(1, 0));
        assert_eq!(region.cell_count(), 9);
    }

    #[test]
    fn test_single_cell_interior_is_empty() {
        let dims = GridDims::new(1, 1, 1).unwrap();
        assert_eq!(KernelRegion::interior(dims).cell_count(), 0);
        assert_eq!(KernelRegion::full(dims).cell_count(), 1);
    }

    #[test]
    fn test_layer_override() {
        let dims = GridDims::new(3, 3, 8).unwrap();
        let region = KernelRegion::interior(dims)
            .with_layers(LayerRange { min: 2, max: 5 })
            .unwrap();
        assert!(!region.contains_row(1, 1));
        assert!(region.contains_row(1, 4));
        assert!(!region.contains_row(1, 5));

        let err = KernelRegion::interior(dims).with_layers(LayerRange { min: 0, max: 9 });
        assert_eq!(
            err,
            Err(KernelError::InvalidLayerRange {
                min: 0,
                max: 9,
                depth: 8
            })
        );
    }
}
