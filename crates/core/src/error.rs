//! Error type for kernel dispatch and field registry operations
//!
//! The per-cell kernels themselves have no failure path. Everything here is a
//! precondition violation detected before any cell is touched.

use crate::grid::GridDims;
use crate::simulation::FieldName;

/// Errors raised while validating or dispatching a kernel step
#[derive(Debug, Clone, PartialEq)]
pub enum KernelError {
    /// A grid was requested with a zero extent
    InvalidDimensions { nx: usize, ny: usize, nz: usize },
    /// A field does not share the reference field's dimensions
    DimensionMismatch {
        field: String,
        expected: GridDims,
        found: GridDims,
    },
    /// Backing storage length does not match the requested dimensions
    StorageLength { expected: usize, found: usize },
    /// Layer range is reversed or exceeds the grid depth
    InvalidLayerRange { min: usize, max: usize, depth: usize },
    /// A scalar parameter is NaN or infinite
    NonFiniteParameter { name: &'static str, value: f32 },
    /// No field is registered under this name
    UnknownField(String),
    /// The field name is known but the field was not enabled
    MissingField(FieldName),
    /// An emitter box is empty or reaches outside the grid
    InvalidRegion {
        min: [usize; 3],
        max: [usize; 3],
        dims: GridDims,
    },
}

impl std::fmt::Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::InvalidDimensions { nx, ny, nz } => {
                write!(f, "Invalid grid dimensions {nx}x{ny}x{nz}: extents must be non-zero")
            }
            KernelError::DimensionMismatch {
                field,
                expected,
                found,
            } => write!(
                f,
                "Field '{field}' has dimensions {found}, expected {expected}"
            ),
            KernelError::StorageLength { expected, found } => {
                write!(f, "Grid storage holds {found} values, expected {expected}")
            }
            KernelError::InvalidLayerRange { min, max, depth } => write!(
                f,
                "Layer range {min}..{max} is invalid for a grid of depth {depth}"
            ),
            KernelError::NonFiniteParameter { name, value } => {
                write!(f, "Parameter '{name}' must be finite, got {value}")
            }
            KernelError::UnknownField(name) => write!(f, "Unknown field '{name}'"),
            KernelError::MissingField(name) => {
                write!(f, "Field '{name}' is not enabled for this simulation")
            }
            KernelError::InvalidRegion { min, max, dims } => write!(
                f,
                "Region {min:?}..{max:?} is empty or outside grid {dims}"
            ),
        }
    }
}

impl std::error::Error for KernelError {}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, KernelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_mentions_field_and_dims() {
        let err = KernelError::DimensionMismatch {
            field: "density".to_string(),
            expected: GridDims { nx: 4, ny: 4, nz: 1 },
            found: GridDims { nx: 4, ny: 3, nz: 1 },
        };
        let msg = err.to_string();
        assert!(msg.contains("density"), "{msg}");
        assert!(msg.contains("4x3x1"), "{msg}");
        assert!(msg.contains("4x4x1"), "{msg}");
    }

    #[test]
    fn test_missing_field_uses_lowercase_name() {
        let err = KernelError::MissingField(FieldName::Heat);
        assert_eq!(err.to_string(), "Field 'heat' is not enabled for this simulation");
    }
}
