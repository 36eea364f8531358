//! Aggregate statistics over a field set

use super::fields::{FieldName, FireFields};
use crate::grid::RealGrid;
use serde::{Deserialize, Serialize};

/// Snapshot of whole-grid totals, for reporting
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FireStats {
    /// Sum of fuel over all cells
    pub total_fuel: f32,
    /// Sum of smoke density over all cells
    pub total_density: f32,
    /// Cells with a live reaction (`react > 0`)
    pub burning_cells: usize,
    /// Largest flame intensity, `0` when no flame field exists
    pub max_flame: f32,
    /// Mean heat over all cells, `None` when no heat field exists
    pub mean_heat: Option<f32>,
}

impl FireStats {
    /// Gather statistics from every field in the set
    pub fn collect(fields: &FireFields) -> Self {
        let cell_count = fields.dims().cell_count() as f32;
        let sum = |name| fields.field(name).map(RealGrid::sum);

        Self {
            total_fuel: sum(FieldName::Fuel).unwrap_or_default(),
            total_density: sum(FieldName::Density).unwrap_or_default(),
            burning_cells: fields
                .field(FieldName::React)
                .map(|react| react.count_above(0.0))
                .unwrap_or_default(),
            max_flame: fields
                .field(FieldName::Flame)
                .map(RealGrid::max_value)
                .unwrap_or_default(),
            mean_heat: sum(FieldName::Heat).ok().map(|total| total / cell_count),
        }
    }
}

impl std::fmt::Display for FireStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "fuel={:.3} smoke={:.3} burning={} max_flame={:.3}",
            self.total_fuel, self.total_density, self.burning_cells, self.max_flame
        )?;
        if let Some(heat) = self.mean_heat {
            write!(f, " mean_heat={heat:.3}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridDims;

    #[test]
    fn test_collect() {
        let dims = GridDims::planar(2, 2).unwrap();
        let mut fields = FireFields::new(dims).with_flame().with_heat(1.5);
        let center = dims.index(1, 1, 0);
        fields.field_mut(FieldName::Fuel).unwrap().fill(0.5);
        fields.field_mut(FieldName::React).unwrap()[center] = 0.25;
        fields.field_mut(FieldName::Flame).unwrap()[center] = 0.5;

        let stats = FireStats::collect(&fields);
        assert_eq!(stats.total_fuel, 2.0);
        assert_eq!(stats.total_density, 0.0);
        assert_eq!(stats.burning_cells, 1);
        assert_eq!(stats.max_flame, 0.5);
        assert_eq!(stats.mean_heat, Some(1.5));
        assert!(stats.to_string().contains("mean_heat=1.500"));
    }

    #[test]
    fn test_optional_fields_absent() {
        let fields = FireFields::new(GridDims::planar(2, 2).unwrap());
        let stats = FireStats::collect(&fields);
        assert_eq!(stats.max_flame, 0.0);
        assert_eq!(stats.mean_heat, None);
        assert!(!stats.to_string().contains("mean_heat"));
    }
}
