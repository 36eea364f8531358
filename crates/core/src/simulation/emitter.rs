//! Fuel inflow sources
//!
//! A burning plume needs fresh fuel every step. An emitter raises fuel and
//! reaction inside a box of cells to at least its target values, optionally
//! jittered so the plume does not look stamped.

use crate::error::{KernelError, Result};
use crate::grid::{GridDims, RealGrid};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Box-shaped fuel source in cell coordinates, half-open `[min, max)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelEmitter {
    pub min: [usize; 3],
    pub max: [usize; 3],
    /// Target fuel level inside the box
    pub fuel: f32,
    /// Target reaction coordinate inside the box
    pub react: f32,
    /// Relative fuel jitter, `0` for a uniform source
    #[serde(default)]
    pub jitter: f32,
    #[serde(default)]
    pub seed: u64,
}

impl FuelEmitter {
    pub fn new(min: [usize; 3], max: [usize; 3], fuel: f32, react: f32) -> Self {
        Self {
            min,
            max,
            fuel,
            react,
            jitter: 0.0,
            seed: 0,
        }
    }

    /// Vary the fuel target by up to `jitter` (relative) per cell
    pub fn with_jitter(mut self, jitter: f32, seed: u64) -> Self {
        self.jitter = jitter;
        self.seed = seed;
        self
    }

    /// Check the box is non-empty and inside `dims`
    ///
    /// # Errors
    ///
    /// Returns `KernelError::InvalidRegion` otherwise
    pub fn validate(&self, dims: GridDims) -> Result<()> {
        let extents = [dims.nx, dims.ny, dims.nz];
        let valid = (0..3)
            .all(|axis| self.min[axis] < self.max[axis] && self.max[axis] <= extents[axis]);
        if valid {
            Ok(())
        } else {
            Err(KernelError::InvalidRegion {
                min: self.min,
                max: self.max,
                dims,
            })
        }
    }

    /// Number of cells inside the box
    pub fn cell_count(&self) -> usize {
        (0..3)
            .map(|axis| self.max[axis].saturating_sub(self.min[axis]))
            .product()
    }

    /// Raise fuel and reaction inside the box for simulation step `step`
    ///
    /// Jitter is drawn from a generator seeded by the emitter seed and the
    /// step, so a rerun with the same inputs injects the same fuel.
    pub fn apply(&self, fuel: &mut RealGrid, react: &mut RealGrid, step: u64) -> Result<()> {
        let dims = fuel.dims();
        self.validate(dims)?;
        dims.ensure_matches("react", react.dims())?;

        let mut rng = StdRng::seed_from_u64(self.seed ^ step.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        for k in self.min[2]..self.max[2] {
            for j in self.min[1]..self.max[1] {
                for i in self.min[0]..self.max[0] {
                    let target = if self.jitter > 0.0 {
                        self.fuel * (1.0 + self.jitter * rng.random_range(-1.0_f32..=1.0))
                    } else {
                        self.fuel
                    };
                    let cell = fuel.cell_mut(i, j, k);
                    *cell = cell.max(target);
                    let cell = react.cell_mut(i, j, k);
                    *cell = cell.max(self.react);
                }
            }
        }
        Ok(())
    }
}
