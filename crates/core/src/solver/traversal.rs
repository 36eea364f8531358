//! Parallel per-cell traversal shared by every grid kernel
//!
//! A kernel names `I` read-only inputs, `R` required output fields and `O`
//! optional output fields. The harness
//! splits each field into x-rows, bundles the rows that share a `(j, k)`
//! coordinate, and hands whole bundles to Rayon workers. Every worker
//! therefore owns a disjoint set of rows across all fields, so the per-cell
//! operation gets plain `&mut f32` access with no locking.
//!
//! The operation must only touch the cell it is given; there is no ordering
//! between cells.

use crate::error::{KernelError, Result};
use crate::grid::{KernelRegion, RealGrid};
use rayon::prelude::*;

/// Cell coordinate passed to the per-cell operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellIndex {
    pub i: usize,
    pub j: usize,
    pub k: usize,
}

/// Rows of every participating field at one `(j, k)`
struct RowBundle<'a, const I: usize, const R: usize, const O: usize> {
    j: usize,
    k: usize,
    inputs: [&'a [f32]; I],
    required: [&'a mut [f32]; R],
    optional: [Option<&'a mut [f32]>; O],
}

/// Run `op` on every cell of `region`, in parallel
///
/// All fields must match `region.dims()` and hold one value per cell; the
/// check runs before any cell is touched so a mismatched step leaves every
/// field unmodified. `names` label
/// the inputs, the required fields and the optional ones, for error messages.
///
/// # Errors
///
/// Returns `KernelError::DimensionMismatch` if a field's shape differs from
/// the region's grid dimensions, or `KernelError::StorageLength` if a field's
/// storage does not cover its dimensions
pub fn par_for_each_cell<const I: usize, const R: usize, const O: usize, F>(
    region: &KernelRegion,
    names: (&[&str; I], &[&str; R], &[&str; O]),
    inputs: [&RealGrid; I],
    required: [&mut RealGrid; R],
    optional: [Option<&mut RealGrid>; O],
    op: F,
) -> Result<()>
where
    F: Fn(CellIndex, [f32; I], [&mut f32; R], [Option<&mut f32>; O]) + Sync,
{
    let dims = region.dims();
    for (name, grid) in names.0.iter().zip(inputs.iter()) {
        grid.ensure_shape(name, dims)?;
    }
    for (name, grid) in names.1.iter().zip(required.iter()) {
        grid.ensure_shape(name, dims)?;
    }
    for (name, grid) in names.2.iter().zip(optional.iter()) {
        if let Some(grid) = grid {
            grid.ensure_shape(name, dims)?;
        }
    }

    let nx = dims.nx;
    let mut input_rows = inputs.map(|grid| grid.as_slice().chunks_exact(nx));
    let mut required_rows = required.map(|grid| grid.as_mut_slice().chunks_exact_mut(nx));
    let mut optional_rows =
        optional.map(|grid| grid.map(|grid| grid.as_mut_slice().chunks_exact_mut(nx)));

    let mut bundles = Vec::with_capacity(dims.row_count());
    for row in 0..dims.row_count() {
        // Advance every field for every row so they stay aligned
        let inputs: Vec<&[f32]> = input_rows.iter_mut().filter_map(Iterator::next).collect();
        let required: Vec<&mut [f32]> = required_rows
            .iter_mut()
            .filter_map(Iterator::next)
            .collect();
        let optional: [Option<&mut [f32]>; O] =
            std::array::from_fn(|n| optional_rows[n].as_mut().and_then(Iterator::next));

        let (j, k) = (row % dims.ny, row / dims.ny);
        if !region.contains_row(j, k) {
            continue;
        }
        // Shapes were checked above, so every field yields this row
        let (Ok(inputs), Ok(required)) = (
            <[&[f32]; I]>::try_from(inputs),
            <[&mut [f32]; R]>::try_from(required),
        ) else {
            return Err(KernelError::StorageLength {
                expected: dims.cell_count(),
                found: row * nx,
            });
        };
        bundles.push(RowBundle {
            j,
            k,
            inputs,
            required,
            optional,
        });
    }

    let x_range = region.x_range();
    bundles.into_par_iter().for_each(|mut bundle| {
        for i in x_range.clone() {
            let inputs = bundle.inputs.map(|row| row[i]);
            let required = bundle.required.each_mut().map(|row| &mut row[i]);
            let optional = bundle
                .optional
                .each_mut()
                .map(|row| row.as_deref_mut().map(|row| &mut row[i]));
            op(
                CellIndex {
                    i,
                    j: bundle.j,
                    k: bundle.k,
                },
                inputs,
                required,
                optional,
            );
        }
    });

    Ok(())
}
