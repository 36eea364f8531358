//! Grid storage and kernel iteration regions

pub mod region;
pub mod simulation_grid;

// Re-export main types
pub use region::*;
pub use simulation_grid::*;
