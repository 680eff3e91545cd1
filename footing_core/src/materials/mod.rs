//! # Materials
//!
//! Concrete and reinforcement properties for footing design, validated
//! against the bounds of the active [`DesignCode`].
//!
//! ## Example
//!
//! ```rust
//! use footing_core::materials::MaterialProperties;
//! use footing_core::code::ACI_318M_25;
//!
//! let materials = MaterialProperties::new(30.0, 420.0);
//! let advisories = materials.validate(&ACI_318M_25).unwrap();
//! assert!(advisories.is_empty());
//! assert!((materials.beta1(&ACI_318M_25) - 0.836).abs() < 1e-3);
//! ```

pub mod rebar;

pub use rebar::BarSize;

use serde::{Deserialize, Serialize};

use crate::code::{aci_ref, DesignCode};
use crate::errors::{CalcError, CalcResult};

/// Exposure class of concrete cast against earth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Exposure {
    #[default]
    Normal,
    /// Aggressive soil or freeze-thaw
    Severe,
    /// Seawater or chlorides
    Marine,
}

impl Exposure {
    pub fn display_name(&self) -> &'static str {
        match self {
            Exposure::Normal => "Normal",
            Exposure::Severe => "Severe",
            Exposure::Marine => "Marine",
        }
    }
}

fn default_cover_mm() -> f64 {
    75.0
}

fn default_bar_diameter_mm() -> f64 {
    16.0
}

fn default_aggregate_mm() -> f64 {
    20.0
}

/// Concrete, steel and detailing properties of a footing
///
/// # JSON Format
/// ```json
/// { "fc_mpa": 30.0, "fy_mpa": 420.0, "cover_mm": 75.0,
///   "bar_diameter_x_mm": 16.0, "bar_diameter_y_mm": 16.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialProperties {
    /// Specified concrete compressive strength f'c (MPa)
    pub fc_mpa: f64,
    /// Specified reinforcement yield strength fy (MPa)
    pub fy_mpa: f64,
    /// Clear cover to the bottom layer (mm)
    #[serde(default = "default_cover_mm")]
    pub cover_mm: f64,
    /// Bars spanning in x (bottom layer)
    #[serde(default = "default_bar_diameter_mm")]
    pub bar_diameter_x_mm: f64,
    /// Bars spanning in y (second layer)
    #[serde(default = "default_bar_diameter_mm")]
    pub bar_diameter_y_mm: f64,
    /// Nominal maximum aggregate size (mm)
    #[serde(default = "default_aggregate_mm")]
    pub aggregate_size_mm: f64,
    #[serde(default)]
    pub exposure: Exposure,
}

impl MaterialProperties {
    /// Materials with 75 mm cover, 16 mm bars both ways and 20 mm aggregate
    pub fn new(fc_mpa: f64, fy_mpa: f64) -> Self {
        MaterialProperties {
            fc_mpa,
            fy_mpa,
            cover_mm: default_cover_mm(),
            bar_diameter_x_mm: default_bar_diameter_mm(),
            bar_diameter_y_mm: default_bar_diameter_mm(),
            aggregate_size_mm: default_aggregate_mm(),
            exposure: Exposure::Normal,
        }
    }

    /// Set the bar diameters (builder pattern)
    pub fn with_bars(mut self, diameter_x_mm: f64, diameter_y_mm: f64) -> Self {
        self.bar_diameter_x_mm = diameter_x_mm;
        self.bar_diameter_y_mm = diameter_y_mm;
        self
    }

    /// Set cover and exposure class (builder pattern)
    pub fn with_cover(mut self, cover_mm: f64, exposure: Exposure) -> Self {
        self.cover_mm = cover_mm;
        self.exposure = exposure;
        self
    }

    pub fn bar_x(&self) -> BarSize {
        BarSize::new(self.bar_diameter_x_mm)
    }

    pub fn bar_y(&self) -> BarSize {
        BarSize::new(self.bar_diameter_y_mm)
    }

    /// Stress-block depth factor beta1
    pub fn beta1(&self, code: &DesignCode) -> f64 {
        let rules = &code.flexure;
        let reduced = rules.beta1_max
            - rules.beta1_reduction_per_mpa * (self.fc_mpa - rules.beta1_reduction_start_mpa);
        reduced.clamp(rules.beta1_min, rules.beta1_max)
    }

    /// Validate against the code bounds.
    ///
    /// Out-of-range strengths and bars missing from the catalog are errors.
    /// Combinations that are legal but unusual come back as advisories.
    pub fn validate(&self, code: &DesignCode) -> CalcResult<Vec<String>> {
        let limits = &code.materials;
        let mut advisories = Vec::new();

        if !(self.fc_mpa >= limits.fc_min_mpa && self.fc_mpa <= limits.fc_max_mpa) {
            return Err(CalcError::invalid_input(
                "fc_mpa",
                self.fc_mpa.to_string(),
                format!(
                    "Concrete strength must be between {} and {} MPa ({})",
                    limits.fc_min_mpa,
                    limits.fc_max_mpa,
                    aci_ref::CONCRETE_LIMITS
                ),
            ));
        }
        if !(self.fy_mpa >= limits.fy_min_mpa && self.fy_mpa <= limits.fy_max_mpa) {
            return Err(CalcError::invalid_input(
                "fy_mpa",
                self.fy_mpa.to_string(),
                format!(
                    "Steel yield strength must be between {} and {} MPa ({})",
                    limits.fy_min_mpa,
                    limits.fy_max_mpa,
                    aci_ref::STEEL_LIMITS
                ),
            ));
        }
        for (field, diameter) in [
            ("bar_diameter_x_mm", self.bar_diameter_x_mm),
            ("bar_diameter_y_mm", self.bar_diameter_y_mm),
        ] {
            if code.bar(diameter).is_none() {
                return Err(CalcError::invalid_input(
                    field,
                    diameter.to_string(),
                    "Bar size is not in the design code's bar catalog",
                ));
            }
        }
        if !(self.aggregate_size_mm > 0.0) {
            return Err(CalcError::invalid_input(
                "aggregate_size_mm",
                self.aggregate_size_mm.to_string(),
                "Aggregate size must be positive",
            ));
        }

        let min_cover = code.cover.minimum_mm(self.exposure);
        if !(self.cover_mm >= min_cover) {
            return Err(CalcError::invalid_input(
                "cover_mm",
                self.cover_mm.to_string(),
                format!(
                    "Cover for {} exposure must be at least {} mm ({})",
                    self.exposure.display_name(),
                    min_cover,
                    aci_ref::COVER
                ),
            ));
        }

        if self.fc_mpa < limits.fc_advisory_mpa {
            advisories.push(format!(
                "f'c = {} MPa is below {} MPa; check durability requirements",
                self.fc_mpa, limits.fc_advisory_mpa
            ));
        }
        if self.fy_mpa > limits.high_fy_advisory_mpa && self.fc_mpa < limits.high_fy_low_fc_mpa {
            advisories.push(format!(
                "High-strength steel (fy = {} MPa) with low-strength concrete (f'c = {} MPa)",
                self.fy_mpa, self.fc_mpa
            ));
        }
        Ok(advisories)
    }
}
