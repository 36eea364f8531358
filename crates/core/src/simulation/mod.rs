//! Time-stepped fire simulation driving the grid kernels
//!
//! `FireSimulation` owns a field set and runs one step as:
//! 1. fuel inflow from every emitter
//! 2. `process_burn` over the kernel region
//! 3. `update_flame`, when a flame field exists
//!
//! The kernels run strictly in that order since the flame is derived from
//! the reaction coordinate the combustion kernel just wrote.

pub mod emitter;
pub mod fields;
pub mod stats;

pub use emitter::FuelEmitter;
pub use fields::{FieldName, FireFields};
pub use stats::FireStats;

use crate::core_types::Vec3;
use crate::error::Result;
use crate::grid::{GridDims, KernelRegion, LayerRange, RealGrid};
use crate::solver::{process_burn_in, update_flame_in, BurnParams};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Everything needed to build a `FireSimulation`, loadable from a config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireSimulationConfig {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
    /// Maintain a flame intensity field
    pub flame: bool,
    /// Initial heat, `None` disables the heat field
    pub heat: Option<f32>,
    /// Initial smoke color, `None` disables the color channels
    pub color: Option<Vec3>,
    /// Fuel present everywhere at start
    pub initial_fuel: f32,
    /// Reaction coordinate everywhere at start
    pub initial_react: f32,
    /// Layer range override for 3D grids
    pub layers: Option<LayerRange>,
    pub params: BurnParams,
    pub emitters: Vec<FuelEmitter>,
}

impl Default for FireSimulationConfig {
    fn default() -> Self {
        Self {
            nx: 64,
            ny: 64,
            nz: 1,
            flame: true,
            heat: Some(0.0),
            color: None,
            initial_fuel: 0.0,
            initial_react: 0.0,
            layers: None,
            params: BurnParams::default(),
            emitters: Vec::new(),
        }
    }
}

/// Grid-based smoke and fire simulation
pub struct FireSimulation {
    fields: FireFields,
    params: BurnParams,
    region: KernelRegion,
    emitters: Vec<FuelEmitter>,
    simulation_time: f32,
    step_count: u64,
}

impl FireSimulation {
    /// Create a simulation over an existing field set
    ///
    /// The kernels run over the interior region of the field dimensions.
    ///
    /// # Errors
    ///
    /// Returns `KernelError::NonFiniteParameter` if `params` are invalid
    pub fn new(fields: FireFields, params: BurnParams) -> Result<Self> {
        params.validate()?;
        let dims = fields.dims();
        info!(
            "Creating fire simulation: {} grid, flame={}, heat={}, color={}",
            dims,
            fields.has(FieldName::Flame),
            fields.has(FieldName::Heat),
            fields.has(FieldName::Red),
        );
        Ok(Self {
            region: KernelRegion::interior(dims),
            fields,
            params,
            emitters: Vec::new(),
            simulation_time: 0.0,
            step_count: 0,
        })
    }

    /// Build a simulation from a config
    ///
    /// # Errors
    ///
    /// Fails on zero grid extents, invalid parameters, an invalid layer
    /// range, or an emitter outside the grid
    pub fn from_config(config: &FireSimulationConfig) -> Result<Self> {
        let dims = GridDims::new(config.nx, config.ny, config.nz)?;
        let mut fields = FireFields::new(dims);
        fields.insert(
            FieldName::Fuel,
            RealGrid::with_value(dims, config.initial_fuel),
        )?;
        fields.insert(
            FieldName::React,
            RealGrid::with_value(dims, config.initial_react),
        )?;
        if config.flame {
            fields = fields.with_flame();
        }
        if let Some(heat) = config.heat {
            fields = fields.with_heat(heat);
        }
        if let Some(color) = config.color {
            fields = fields.with_color(color);
        }

        let mut sim = Self::new(fields, config.params)?;
        if let Some(layers) = config.layers {
            sim = sim.with_layers(layers)?;
        }
        for emitter in &config.emitters {
            sim.add_emitter(emitter.clone())?;
        }
        Ok(sim)
    }

    /// Restrict the kernels to a layer range in z
    pub fn with_layers(mut self, layers: LayerRange) -> Result<Self> {
        self.region = KernelRegion::interior(self.fields.dims()).with_layers(layers)?;
        Ok(self)
    }

    /// Register a fuel source applied at the start of every step
    ///
    /// # Errors
    ///
    /// Returns `KernelError::InvalidRegion` if the emitter box does not fit
    /// the grid
    pub fn add_emitter(&mut self, emitter: FuelEmitter) -> Result<()> {
        emitter.validate(self.fields.dims())?;
        debug!(
            "Adding emitter {:?}..{:?} ({} cells)",
            emitter.min,
            emitter.max,
            emitter.cell_count()
        );
        self.emitters.push(emitter);
        Ok(())
    }

    /// Advance the simulation by one step of `params.dt`
    ///
    /// # Errors
    ///
    /// Returns an error and leaves every field untouched if any field's shape
    /// differs from the set's dimensions
    pub fn step(&mut self) -> Result<()> {
        self.fields.validate()?;
        {
            let (fuel, react) = self.fields.source_fields();
            for emitter in &self.emitters {
                emitter.apply(fuel, react, self.step_count)?;
            }
        }

        process_burn_in(&self.region, self.fields.burn_fields(), &self.params)?;

        if let Some((react, flame)) = self.fields.flame_fields() {
            update_flame_in(&self.region, react, flame)?;
        }

        self.simulation_time += self.params.dt;
        self.step_count += 1;
        debug!(
            "Step {} complete: t={:.3}",
            self.step_count, self.simulation_time
        );
        Ok(())
    }

    /// Run `steps` consecutive steps
    pub fn run(&mut self, steps: u32) -> Result<()> {
        for _ in 0..steps {
            self.step()?;
        }
        Ok(())
    }

    /// Current whole-grid statistics
    pub fn stats(&self) -> FireStats {
        FireStats::collect(&self.fields)
    }

    pub fn fields(&self) -> &FireFields {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut FireFields {
        &mut self.fields
    }

    /// Look a field up by name
    pub fn field(&self, name: &str) -> Result<&RealGrid> {
        self.fields.by_name(name)
    }

    pub fn params(&self) -> &BurnParams {
        &self.params
    }

    /// Replace the burn parameters between steps
    ///
    /// # Errors
    ///
    /// Returns `KernelError::NonFiniteParameter` and keeps the old parameters
    /// if `params` are invalid
    pub fn set_params(&mut self, params: BurnParams) -> Result<()> {
        params.validate()?;
        self.params = params;
        Ok(())
    }

    pub fn region(&self) -> &KernelRegion {
        &self.region
    }

    /// Simulated time, the sum of `dt` over all steps
    pub fn simulation_time(&self) -> f32 {
        self.simulation_time
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }
}
