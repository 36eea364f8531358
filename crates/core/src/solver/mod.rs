//! Per-cell grid kernels and the parallel traversal that dispatches them
//!
//! Every kernel is a plain function over borrowed grids. Dispatch goes through
//! [`par_for_each_cell`], which validates field shapes, splits the grids into
//! rows and runs the cell operation on Rayon's thread pool.
//!
//! # Example
//!
//! ```rust,ignore
//! use fire_kernels_core::grid::{GridDims, RealGrid};
//! use fire_kernels_core::solver::{process_burn, update_flame, BurnFields, BurnParams};
//!
//! let dims = GridDims::planar(64, 64)?;
//! let mut fuel = RealGrid::with_value(dims, 1.0);
//! let mut density = RealGrid::new(dims);
//! let mut react = RealGrid::with_value(dims, 1.0);
//! let mut flame = RealGrid::new(dims);
//! let fields = BurnFields::new(&mut fuel, &mut density, &mut react);
//! process_burn(fields, &BurnParams::default())?;
//! update_flame(&react, &mut flame)?;
//! ```

mod combustion;
mod flame;
mod params;
pub mod profiler;
mod traversal;

// Re-exports
pub use combustion::{
    burn_cell, process_burn, process_burn_in, smoke_emission, BurnCell, BurnFields, FUEL_EPSILON,
};
pub use flame::{flame_intensity, update_flame, update_flame_in};
pub use params::{
    BurnParams, DEFAULT_BURNING_RATE, DEFAULT_DT, DEFAULT_FLAME_SMOKE, DEFAULT_FLAME_SMOKE_COLOR,
    DEFAULT_IGNITION_TEMP, DEFAULT_MAX_TEMP,
};
pub use profiler::KernelTimer;
pub use traversal::{par_for_each_cell, CellIndex};
