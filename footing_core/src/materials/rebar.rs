//! Deformed reinforcing bar sizes (metric)

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// A metric deformed bar identified by its nominal diameter
///
/// # Example
/// ```
/// use footing_core::materials::BarSize;
///
/// let bar = BarSize::new(16.0);
/// assert_eq!(bar.label(), "16mm");
/// assert!((bar.area_mm2() - 201.06).abs() < 0.01);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarSize {
    /// Nominal diameter (mm)
    pub diameter_mm: f64,
}

impl BarSize {
    pub fn new(diameter_mm: f64) -> Self {
        BarSize { diameter_mm }
    }

    /// Nominal cross-sectional area (mm^2)
    pub fn area_mm2(&self) -> f64 {
        PI * self.diameter_mm * self.diameter_mm / 4.0
    }

    /// Display label, e.g. "16mm"
    pub fn label(&self) -> String {
        format!("{}mm", self.diameter_mm)
    }
}

impl std::fmt::Display for BarSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_areas() {
        assert!((BarSize::new(10.0).area_mm2() - 78.54).abs() < 0.01);
        assert!((BarSize::new(25.0).area_mm2() - 490.87).abs() < 0.01);
    }

    #[test]
    fn test_label() {
        assert_eq!(BarSize::new(20.0).to_string(), "20mm");
    }
}
