//! Dense 3D simulation grid
//!
//! Each physical field (fuel, smoke density, reaction progress, ...) lives in
//! its own `SimulationGrid`. Cells are stored in a flat `Vec` in x-fastest
//! order: `[k * (ny * nx) + j * nx + i]`, so one grid row along x is a
//! contiguous slice. The traversal harness relies on that layout to hand
//! disjoint rows to worker threads.

use crate::error::{KernelError, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Grid resolution in cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDims")]
pub struct GridDims {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
}

impl GridDims {
    /// Create validated dimensions
    ///
    /// # Errors
    ///
    /// Returns `KernelError::InvalidDimensions` if any extent is zero or the
    /// cell storage would not fit in memory
    pub fn new(nx: usize, ny: usize, nz: usize) -> Result<Self> {
        let bytes = nx
            .checked_mul(ny)
            .and_then(|n| n.checked_mul(nz))
            .and_then(|n| n.checked_mul(std::mem::size_of::<f32>()));
        match bytes {
            Some(bytes) if bytes > 0 && bytes <= isize::MAX as usize => Ok(Self { nx, ny, nz }),
            _ => Err(KernelError::InvalidDimensions { nx, ny, nz }),
        }
    }

    /// Single-layer (2D) dimensions
    pub fn planar(nx: usize, ny: usize) -> Result<Self> {
        Self::new(nx, ny, 1)
    }

    /// Total number of cells
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    /// Number of x-rows (one per `(j, k)` pair)
    #[inline]
    pub fn row_count(&self) -> usize {
        self.ny * self.nz
    }

    /// Whether the grid has more than one layer in z
    #[inline]
    pub fn is_3d(&self) -> bool {
        self.nz > 1
    }

    /// Flat cell index from `(i, j, k)`
    #[inline]
    pub fn index(&self, i: usize, j: usize, k: usize) -> usize {
        k * (self.ny * self.nx) + j * self.nx + i
    }

    /// Whether `(i, j, k)` lies inside the grid
    #[inline]
    pub fn contains(&self, i: usize, j: usize, k: usize) -> bool {
        i < self.nx && j < self.ny && k < self.nz
    }

    /// Check that `found` equals these dimensions
    ///
    /// # Errors
    ///
    /// Returns `KernelError::DimensionMismatch` naming `field` when they differ
    pub fn ensure_matches(&self, field: &str, found: GridDims) -> Result<()> {
        if *self == found {
            Ok(())
        } else {
            Err(KernelError::DimensionMismatch {
                field: field.to_string(),
                expected: *self,
                found,
            })
        }
    }
}

#[derive(Deserialize)]
struct RawDims {
    nx: usize,
    ny: usize,
    nz: usize,
}

impl TryFrom<RawDims> for GridDims {
    type Error = KernelError;

    fn try_from(raw: RawDims) -> Result<Self> {
        Self::new(raw.nx, raw.ny, raw.nz)
    }
}

impl std::fmt::Display for GridDims {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}x{}", self.nx, self.ny, self.nz)
    }
}

/// Dense 3D array of per-cell values for one physical field
///
/// Storage always holds exactly `dims.cell_count()` values; deserialization
/// goes through the same length check as [`SimulationGrid::from_vec`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid<T>")]
pub struct SimulationGrid<T> {
    dims: GridDims,
    data: Vec<T>,
}

#[derive(Deserialize)]
struct RawGrid<T> {
    dims: GridDims,
    data: Vec<T>,
}

impl<T> TryFrom<RawGrid<T>> for SimulationGrid<T> {
    type Error = KernelError;

    fn try_from(raw: RawGrid<T>) -> Result<Self> {
        check_storage(raw.dims, raw.data.len())?;
        Ok(Self {
            dims: raw.dims,
            data: raw.data,
        })
    }
}

fn check_storage(dims: GridDims, len: usize) -> Result<()> {
    if len == dims.cell_count() {
        Ok(())
    } else {
        Err(KernelError::StorageLength {
            expected: dims.cell_count(),
            found: len,
        })
    }
}

/// Grid of real-valued cells, the only kind the fire kernels touch
pub type RealGrid = SimulationGrid<f32>;

impl<T: Copy + Default> SimulationGrid<T> {
    /// Create a grid filled with `T::default()`
    pub fn new(dims: GridDims) -> Self {
        Self::with_value(dims, T::default())
    }
}

impl<T: Copy> SimulationGrid<T> {
    /// Create a grid with every cell set to `value`
    pub fn with_value(dims: GridDims, value: T) -> Self {
        Self {
            dims,
            data: vec![value; dims.cell_count()],
        }
    }

    /// Wrap existing storage laid out as `[k][j][i]`
    ///
    /// # Errors
    ///
    /// Returns `KernelError::StorageLength` if `data` does not hold exactly
    /// one value per cell
    pub fn from_vec(dims: GridDims, data: Vec<T>) -> Result<Self> {
        check_storage(dims, data.len())?;
        Ok(Self { dims, data })
    }

    /// Build a grid whose storage disagrees with its dimensions
    #[cfg(test)]
    pub(crate) fn from_raw_unchecked(dims: GridDims, data: Vec<T>) -> Self {
        Self { dims, data }
    }

    /// Grid dimensions
    #[inline]
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Value at `(i, j, k)`
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds
    #[inline]
    pub fn get(&self, i: usize, j: usize, k: usize) -> T {
        assert!(self.dims.contains(i, j, k), "Coordinates out of bounds");
        self.data[self.dims.index(i, j, k)]
    }

    /// Value at `(i, j, k)`, or `None` outside the grid
    pub fn get_checked(&self, i: usize, j: usize, k: usize) -> Option<T> {
        if self.dims.contains(i, j, k) {
            Some(self.data[self.dims.index(i, j, k)])
        } else {
            None
        }
    }

    /// Set value at `(i, j, k)`
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, k: usize, value: T) {
        assert!(self.dims.contains(i, j, k), "Coordinates out of bounds");
        let idx = self.dims.index(i, j, k);
        self.data[idx] = value;
    }

    /// Mutable reference to the cell at `(i, j, k)`
    #[inline]
    pub fn cell_mut(&mut self, i: usize, j: usize, k: usize) -> &mut T {
        assert!(self.dims.contains(i, j, k), "Coordinates out of bounds");
        let idx = self.dims.index(i, j, k);
        &mut self.data[idx]
    }

    /// Flat view of all cells
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Flat mutable view of all cells
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Overwrite every cell
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Check that the storage holds one value per cell of `dims`
    ///
    /// # Errors
    ///
    /// Returns `KernelError::DimensionMismatch` naming `field` if the grid
    /// has other dimensions, or `KernelError::StorageLength` if its storage
    /// length is wrong
    pub fn ensure_shape(&self, field: &str, dims: GridDims) -> Result<()> {
        dims.ensure_matches(field, self.dims)?;
        check_storage(dims, self.data.len())
    }

    /// Check that `other` has the same dimensions as this grid
    ///
    /// # Errors
    ///
    /// Returns `KernelError::DimensionMismatch` naming `field` when the
    /// shapes differ
    pub fn ensure_same_dims<U>(&self, field: &str, other: &SimulationGrid<U>) -> Result<()> {
        self.dims.ensure_matches(field, other.dims)
    }
}

impl RealGrid {
    /// Sum of all cells (parallel reduction)
    pub fn sum(&self) -> f32 {
        self.data.par_iter().sum()
    }

    /// Largest cell value, `0.0` for an all-negative grid
    pub fn max_value(&self) -> f32 {
        self.data.par_iter().copied().reduce(|| 0.0, f32::max)
    }

    /// Number of cells strictly above `threshold`
    pub fn count_above(&self, threshold: f32) -> usize {
        self.data.par_iter().filter(|&&v| v > threshold).count()
    }
}
