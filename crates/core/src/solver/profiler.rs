//! Kernel timing helpers.
//!
//! Provides an RAII scope that reports each kernel dispatch through `tracing`.
use std::time::Instant;
use tracing::trace;

/// A timing scope around one kernel dispatch.
///
/// Elapsed time is emitted as a `trace!` event when dropped.
pub struct KernelTimer {
    start: Instant,
    name: &'static str,
    cells: usize,
}

impl KernelTimer {
    /// Starts timing `name` over a region of `cells` cells.
    pub fn new(name: &'static str, cells: usize) -> Self {
        Self {
            start: Instant::now(),
            name,
            cells,
        }
    }

    /// Gets elapsed time in milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for KernelTimer {
    fn drop(&mut self) {
        trace!(
            kernel = self.name,
            cells = self.cells,
            elapsed_ms = self.elapsed_ms(),
            "kernel dispatch finished"
        );
    }
}
