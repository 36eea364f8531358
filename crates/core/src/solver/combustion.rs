//! Combustion kernel
//!
//! Burns fuel in every cell of the kernel region, decays the reaction
//! coordinate with the remaining fuel fraction, emits smoke density and tints
//! it, and writes the flame temperature profile into the heat field.
//!
//! # Per-cell update
//!
//! 1. `fuel -= burning_rate * dt`, floored at 0
//! 2. `react *= fuel / orig_fuel`, or `react = 0` once the cell had no fuel
//! 3. `flame = sqrt(react)` (local only)
//! 4. smoke emission grows with the fuel actually burned, and is larger where
//!    fuel was already scarce
//! 5. `density += emit`, clamped to `[0, 1]`
//! 6. `heat = lerp(ignition_temp, max_temp, flame)` where a flame exists
//! 7. color channels are tinted by the emitted smoke and renormalized to the
//!    new density
//!
//! The update reads and writes only its own cell.

use super::params::BurnParams;
use super::profiler::KernelTimer;
use super::traversal::par_for_each_cell;
use crate::error::Result;
use crate::grid::{KernelRegion, RealGrid};

/// Below this a cell counts as holding no fuel, and emission as zero
pub const FUEL_EPSILON: f32 = f32::EPSILON;

/// Mutable view of one cell's combustion state
pub struct BurnCell<'a> {
    pub fuel: &'a mut f32,
    pub density: &'a mut f32,
    pub react: &'a mut f32,
    pub red: Option<&'a mut f32>,
    pub green: Option<&'a mut f32>,
    pub blue: Option<&'a mut f32>,
    pub heat: Option<&'a mut f32>,
}

/// Fields borrowed by one `process_burn` dispatch
///
/// The color channels and heat are independently optional; a missing channel
/// is simply not tinted.
pub struct BurnFields<'a> {
    pub fuel: &'a mut RealGrid,
    pub density: &'a mut RealGrid,
    pub react: &'a mut RealGrid,
    pub red: Option<&'a mut RealGrid>,
    pub green: Option<&'a mut RealGrid>,
    pub blue: Option<&'a mut RealGrid>,
    pub heat: Option<&'a mut RealGrid>,
}

impl<'a> BurnFields<'a> {
    /// Mandatory fields only
    pub fn new(fuel: &'a mut RealGrid, density: &'a mut RealGrid, react: &'a mut RealGrid) -> Self {
        Self {
            fuel,
            density,
            react,
            red: None,
            green: None,
            blue: None,
            heat: None,
        }
    }

    pub fn with_heat(mut self, heat: &'a mut RealGrid) -> Self {
        self.heat = Some(heat);
        self
    }

    /// Attach all three color channels
    pub fn with_color(
        mut self,
        red: &'a mut RealGrid,
        green: &'a mut RealGrid,
        blue: &'a mut RealGrid,
    ) -> Self {
        self.red = Some(red);
        self.green = Some(green);
        self.blue = Some(blue);
        self
    }
}

/// Smoke density emitted when a cell's fuel drops from `orig_fuel` to `fuel`
#[inline]
pub fn smoke_emission(orig_fuel: f32, fuel: f32, flame_smoke: f32) -> f32 {
    let scarcity = if orig_fuel < 1.0 {
        (1.0 - orig_fuel) * 0.5
    } else {
        0.0
    };
    (scarcity + 0.5) * (orig_fuel - fuel) * 0.1 * flame_smoke
}

/// Apply one combustion step to a single cell
#[inline]
pub fn burn_cell(cell: BurnCell<'_>, params: &BurnParams) {
    let BurnCell {
        fuel,
        density,
        react,
        red,
        green,
        blue,
        heat,
    } = cell;

    let orig_fuel = *fuel;
    let orig_smoke = *density;

    *fuel = (orig_fuel - params.fuel_burned_per_step()).max(0.0);

    let flame = if orig_fuel > FUEL_EPSILON {
        *react *= *fuel / orig_fuel;
        react.sqrt()
    } else {
        // No memory of the reaction once the fuel is gone
        *react = 0.0;
        0.0
    };

    let emit = smoke_emission(orig_fuel, *fuel, params.flame_smoke);
    *density = (*density + emit).clamp(0.0, 1.0);

    if let Some(heat) = heat {
        if flame != 0.0 {
            *heat = (1.0 - flame) * params.ignition_temp + flame * params.max_temp;
        }
    }

    if emit > FUEL_EPSILON {
        let smoke_factor = *density / (orig_smoke + emit);
        let tint = params.flame_smoke_color;
        for (channel, component) in [(red, tint.x), (green, tint.y), (blue, tint.z)] {
            if let Some(channel) = channel {
                *channel = (*channel + component * emit) * smoke_factor;
            }
        }
    }
}

/// Run the combustion kernel over the interior of the fuel grid
///
/// # Errors
///
/// Returns an error, leaving every field untouched, if a parameter is not
/// finite or a field's dimensions differ from `fuel`
pub fn process_burn(fields: BurnFields<'_>, params: &BurnParams) -> Result<()> {
    let region = KernelRegion::interior(fields.fuel.dims());
    process_burn_in(&region, fields, params)
}

/// Run the combustion kernel over an explicit region
///
/// # Errors
///
/// Same as [`process_burn`], with `region` as the shape reference
pub fn process_burn_in(
    region: &KernelRegion,
    fields: BurnFields<'_>,
    params: &BurnParams,
) -> Result<()> {
    params.validate()?;
    let _timer = KernelTimer::new("process_burn", region.cell_count());

    let BurnFields {
        fuel,
        density,
        react,
        red,
        green,
        blue,
        heat,
    } = fields;

    par_for_each_cell(
        region,
        (&[], &["fuel", "density", "react"], &["red", "green", "blue", "heat"]),
        [],
        [fuel, density, react],
        [red, green, blue, heat],
        |_, [], [fuel, density, react], [red, green, blue, heat]| {
            burn_cell(
                BurnCell {
                    fuel,
                    density,
                    react,
                    red,
                    green,
                    blue,
                    heat,
                },
                params,
            );
        },
    )
}
