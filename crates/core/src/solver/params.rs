//! Scalar parameters of the combustion kernel
//!
//! The defaults are the values existing smoke/fire presets were tuned
//! against; partial configs deserialize on top of them.

use crate::core_types::Vec3;
use crate::error::{KernelError, Result};
use serde::{Deserialize, Serialize};

/// Fuel burned per unit time
pub const DEFAULT_BURNING_RATE: f32 = 0.75;
/// Smoke emission multiplier
pub const DEFAULT_FLAME_SMOKE: f32 = 1.0;
/// Temperature written where the flame is just igniting
pub const DEFAULT_IGNITION_TEMP: f32 = 1.25;
/// Temperature written at full flame intensity
pub const DEFAULT_MAX_TEMP: f32 = 1.75;
/// Step length
pub const DEFAULT_DT: f32 = 0.1;
/// Grey smoke tint per color channel
pub const DEFAULT_FLAME_SMOKE_COLOR: f32 = 0.7;

/// Parameters for `process_burn`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BurnParams {
    /// Fuel consumed per unit time
    pub burning_rate: f32,
    /// Global smoke-intensity multiplier applied to emission
    pub flame_smoke: f32,
    /// Heat written at flame intensity 0
    pub ignition_temp: f32,
    /// Heat written at flame intensity 1
    pub max_temp: f32,
    /// Time step
    pub dt: f32,
    /// RGB tint mixed into the color channels per unit of emitted smoke
    pub flame_smoke_color: Vec3,
}

impl Default for BurnParams {
    fn default() -> Self {
        Self {
            burning_rate: DEFAULT_BURNING_RATE,
            flame_smoke: DEFAULT_FLAME_SMOKE,
            ignition_temp: DEFAULT_IGNITION_TEMP,
            max_temp: DEFAULT_MAX_TEMP,
            dt: DEFAULT_DT,
            flame_smoke_color: Vec3::repeat(DEFAULT_FLAME_SMOKE_COLOR),
        }
    }
}

impl BurnParams {
    pub fn with_burning_rate(mut self, burning_rate: f32) -> Self {
        self.burning_rate = burning_rate;
        self
    }

    pub fn with_flame_smoke(mut self, flame_smoke: f32) -> Self {
        self.flame_smoke = flame_smoke;
        self
    }

    /// Set the heat range the flame profile interpolates over
    pub fn with_temperatures(mut self, ignition_temp: f32, max_temp: f32) -> Self {
        self.ignition_temp = ignition_temp;
        self.max_temp = max_temp;
        self
    }

    pub fn with_dt(mut self, dt: f32) -> Self {
        self.dt = dt;
        self
    }

    pub fn with_flame_smoke_color(mut self, color: Vec3) -> Self {
        self.flame_smoke_color = color;
        self
    }

    /// Fuel removed from a cell in one step
    #[inline]
    pub fn fuel_burned_per_step(&self) -> f32 {
        self.burning_rate * self.dt
    }

    /// Reject NaN or infinite parameters
    ///
    /// # Errors
    ///
    /// Returns `KernelError::NonFiniteParameter` for the first offending value
    pub fn validate(&self) -> Result<()> {
        let scalars = [
            ("burning_rate", self.burning_rate),
            ("flame_smoke", self.flame_smoke),
            ("ignition_temp", self.ignition_temp),
            ("max_temp", self.max_temp),
            ("dt", self.dt),
            ("flame_smoke_color.x", self.flame_smoke_color.x),
            ("flame_smoke_color.y", self.flame_smoke_color.y),
            ("flame_smoke_color.z", self.flame_smoke_color.z),
        ];
        for (name, value) in scalars {
            if !value.is_finite() {
                return Err(KernelError::NonFiniteParameter { name, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_presets() {
        let params = BurnParams::default();
        assert_eq!(params.burning_rate, 0.75);
        assert_eq!(params.flame_smoke, 1.0);
        assert_eq!(params.ignition_temp, 1.25);
        assert_eq!(params.max_temp, 1.75);
        assert_eq!(params.dt, 0.1);
        assert_eq!(params.flame_smoke_color, Vec3::new(0.7, 0.7, 0.7));
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let params = BurnParams::default()
            .with_burning_rate(0.5)
            .with_dt(0.2)
            .with_temperatures(1.0, 3.0);
        assert_eq!(params.fuel_burned_per_step(), 0.1);
        assert_eq!(params.ignition_temp, 1.0);
        assert_eq!(params.max_temp, 3.0);
        assert_eq!(params.flame_smoke, 1.0);
    }

    #[test]
    fn test_non_finite_rejected() {
        let params = BurnParams::default().with_dt(f32::NAN);
        assert!(matches!(
            params.validate(),
            Err(KernelError::NonFiniteParameter { name: "dt", .. })
        ));

        let params =
            BurnParams::default().with_flame_smoke_color(Vec3::new(0.1, f32::INFINITY, 0.1));
        assert!(matches!(
            params.validate(),
            Err(KernelError::NonFiniteParameter {
                name: "flame_smoke_color.y",
                ..
            })
        ));
    }
}
