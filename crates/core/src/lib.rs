//! Fire Kernels Core Library
//!
//! Grid kernels for smoke and fire simulation: a combustion step that burns
//! fuel into smoke, heat and tinted color, and a flame intensity pass derived
//! from the reaction coordinate.
//!
//! ## Layout
//!
//! - [`grid`]: dense 3D field storage and kernel iteration regions
//! - [`solver`]: the per-cell kernels and the Rayon traversal that runs them
//! - [`simulation`]: named field sets, fuel emitters and the time-step driver

// Core types and utilities
pub mod core_types;
pub mod error;

pub mod grid;
pub mod simulation;
pub mod solver;

// Re-export core types
pub use core_types::Vec3;
pub use error::{KernelError, Result};

// Re-export grid and kernel types
pub use grid::{GridDims, KernelRegion, LayerRange, RealGrid, SimulationGrid};
pub use solver::{process_burn, update_flame, BurnFields, BurnParams};

// Re-export simulation types
pub use simulation::{
    FieldName, FireFields, FireSimulation, FireSimulationConfig, FireStats, FuelEmitter,
};
