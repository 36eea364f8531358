//! Named field set for one fire simulation
//!
//! `fuel`, `density` and `react` always exist. The flame, heat and color
//! fields are enabled per simulation; each color channel is independent.

use crate::core_types::Vec3;
use crate::error::{KernelError, Result};
use crate::grid::{GridDims, RealGrid};
use crate::solver::BurnFields;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Names under which fields are looked up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldName {
    Fuel,
    Density,
    React,
    Flame,
    Heat,
    Red,
    Green,
    Blue,
}

impl FieldName {
    pub const ALL: [FieldName; 8] = [
        FieldName::Fuel,
        FieldName::Density,
        FieldName::React,
        FieldName::Flame,
        FieldName::Heat,
        FieldName::Red,
        FieldName::Green,
        FieldName::Blue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Fuel => "fuel",
            FieldName::Density => "density",
            FieldName::React => "react",
            FieldName::Flame => "flame",
            FieldName::Heat => "heat",
            FieldName::Red => "red",
            FieldName::Green => "green",
            FieldName::Blue => "blue",
        }
    }

    /// Whether every simulation carries this field
    pub fn is_mandatory(&self) -> bool {
        matches!(self, FieldName::Fuel | FieldName::Density | FieldName::React)
    }
}

impl std::fmt::Display for FieldName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self> {
        FieldName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| KernelError::UnknownField(s.to_string()))
    }
}

/// The grids a fire simulation owns, all sharing one set of dimensions
///
/// Grids only enter the set through checked paths (`insert`, the builders,
/// deserialization), and `field_mut` hands out cell values rather than the
/// grid, so the shared shape cannot be broken from outside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFields")]
pub struct FireFields {
    dims: GridDims,
    fuel: RealGrid,
    density: RealGrid,
    react: RealGrid,
    flame: Option<RealGrid>,
    heat: Option<RealGrid>,
    red: Option<RealGrid>,
    green: Option<RealGrid>,
    blue: Option<RealGrid>,
}

impl FireFields {
    /// Mandatory fields, all zero
    pub fn new(dims: GridDims) -> Self {
        Self {
            dims,
            fuel: RealGrid::new(dims),
            density: RealGrid::new(dims),
            react: RealGrid::new(dims),
            flame: None,
            heat: None,
            red: None,
            green: None,
            blue: None,
        }
    }

    pub fn with_flame(mut self) -> Self {
        self.flame = Some(RealGrid::new(self.dims));
        self
    }

    pub fn with_heat(mut self, initial: f32) -> Self {
        self.heat = Some(RealGrid::with_value(self.dims, initial));
        self
    }

    /// Enable all three color channels, initialized to `initial`
    pub fn with_color(mut self, initial: Vec3) -> Self {
        self.red = Some(RealGrid::with_value(self.dims, initial.x));
        self.green = Some(RealGrid::with_value(self.dims, initial.y));
        self.blue = Some(RealGrid::with_value(self.dims, initial.z));
        self
    }

    /// Enable an optional field; mandatory fields are reset to `initial`
    pub fn enable(&mut self, name: FieldName, initial: f32) {
        let grid = RealGrid::with_value(self.dims, initial);
        match self.slot_mut(name) {
            Slot::Mandatory(field) => *field = grid,
            Slot::Optional(field) => *field = Some(grid),
        }
    }

    /// Replace a field with an externally built grid
    ///
    /// # Errors
    ///
    /// Returns `KernelError::DimensionMismatch` if `grid` has other
    /// dimensions than the field set
    pub fn insert(&mut self, name: FieldName, grid: RealGrid) -> Result<()> {
        self.dims.ensure_matches(name.as_str(), grid.dims())?;
        match self.slot_mut(name) {
            Slot::Mandatory(field) => *field = grid,
            Slot::Optional(field) => *field = Some(grid),
        }
        Ok(())
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Whether the field exists in this set
    pub fn has(&self, name: FieldName) -> bool {
        self.field(name).is_ok()
    }

    /// Look a field up by name
    ///
    /// # Errors
    ///
    /// Returns `KernelError::MissingField` if an optional field is not enabled
    pub fn field(&self, name: FieldName) -> Result<&RealGrid> {
        let field = match name {
            FieldName::Fuel => Some(&self.fuel),
            FieldName::Density => Some(&self.density),
            FieldName::React => Some(&self.react),
            FieldName::Flame => self.flame.as_ref(),
            FieldName::Heat => self.heat.as_ref(),
            FieldName::Red => self.red.as_ref(),
            FieldName::Green => self.green.as_ref(),
            FieldName::Blue => self.blue.as_ref(),
        };
        field.ok_or(KernelError::MissingField(name))
    }

    /// Mutable cell values of a field, in x-fastest order
    ///
    /// Use `insert` to replace a whole grid.
    pub fn field_mut(&mut self, name: FieldName) -> Result<&mut [f32]> {
        match self.slot_mut(name) {
            Slot::Mandatory(field) => Ok(field.as_mut_slice()),
            Slot::Optional(field) => field
                .as_mut()
                .map(RealGrid::as_mut_slice)
                .ok_or(KernelError::MissingField(name)),
        }
    }

    /// Check that every present field has the set's dimensions and storage
    ///
    /// # Errors
    ///
    /// Returns the first `KernelError::DimensionMismatch` or
    /// `KernelError::StorageLength` found
    pub fn validate(&self) -> Result<()> {
        for name in FieldName::ALL {
            if let Ok(grid) = self.field(name) {
                grid.ensure_shape(name.as_str(), self.dims)?;
            }
        }
        Ok(())
    }

    /// Swap a grid in without the shape check
    #[cfg(test)]
    pub(crate) fn replace_unchecked(&mut self, name: FieldName, grid: RealGrid) {
        match self.slot_mut(name) {
            Slot::Mandatory(field) => *field = grid,
            Slot::Optional(field) => *field = Some(grid),
        }
    }

    /// Look a field up by its string name
    ///
    /// # Errors
    ///
    /// Returns `KernelError::UnknownField` for a name no field uses, or
    /// `KernelError::MissingField` if the field is not enabled
    pub fn by_name(&self, name: &str) -> Result<&RealGrid> {
        self.field(name.parse()?)
    }

    /// Borrow the fields the combustion kernel runs on
    pub fn burn_fields(&mut self) -> BurnFields<'_> {
        BurnFields {
            fuel: &mut self.fuel,
            density: &mut self.density,
            react: &mut self.react,
            red: self.red.as_mut(),
            green: self.green.as_mut(),
            blue: self.blue.as_mut(),
            heat: self.heat.as_mut(),
        }
    }

    /// Borrow the reaction field and the flame output, if flame is enabled
    pub fn flame_fields(&mut self) -> Option<(&RealGrid, &mut RealGrid)> {
        let react = &self.react;
        self.flame.as_mut().map(|flame| (react, flame))
    }

    /// Borrow fuel and reaction for source injection
    pub fn source_fields(&mut self) -> (&mut RealGrid, &mut RealGrid) {
        (&mut self.fuel, &mut self.react)
    }

    fn slot_mut(&mut self, name: FieldName) -> Slot<'_> {
        match name {
            FieldName::Fuel => Slot::Mandatory(&mut self.fuel),
            FieldName::Density => Slot::Mandatory(&mut self.density),
            FieldName::React => Slot::Mandatory(&mut self.react),
            FieldName::Flame => Slot::Optional(&mut self.flame),
            FieldName::Heat => Slot::Optional(&mut self.heat),
            FieldName::Red => Slot::Optional(&mut self.red),
            FieldName::Green => Slot::Optional(&mut self.green),
            FieldName::Blue => Slot::Optional(&mut self.blue),
        }
    }
}

enum Slot<'a> {
    Mandatory(&'a mut RealGrid),
    Optional(&'a mut Option<RealGrid>),
}

#[derive(Deserialize)]
struct RawFields {
    dims: GridDims,
    fuel: RealGrid,
    density: RealGrid,
    react: RealGrid,
    flame: Option<RealGrid>,
    heat: Option<RealGrid>,
    red: Option<RealGrid>,
    green: Option<RealGrid>,
    blue: Option<RealGrid>,
}

impl TryFrom<RawFields> for FireFields {
    type Error = KernelError;

    fn try_from(raw: RawFields) -> Result<Self> {
        let fields = Self {
            dims: raw.dims,
            fuel: raw.fuel,
            density: raw.density,
            react: raw.react,
            flame: raw.flame,
            heat: raw.heat,
            red: raw.red,
            green: raw.green,
            blue: raw.blue,
        };
        fields.validate()?;
        Ok(fields)
    }
}
