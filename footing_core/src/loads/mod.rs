//! Column actions and load combinations per ACI 318M-25
//!
//! This module provides the unfactored column actions delivered to a footing
//! and the factored combinations used for strength and bearing checks.
//!
//! # Overview
//!
//! - [`LoadType`] - Load categories (D, L, W)
//! - [`ColumnActions`] - Axial force, horizontal shears and moments at the column base
//! - [`ServiceLoads`] - Unfactored actions by load type
//! - [`CombinationRule`] - A code row of load factors
//! - [`LoadCombination`] - The factored actions produced by one rule
//! - [`LimitState`] - Ultimate (strength) vs service (bearing)
//!
//! # Example
//!
//! ```
//! use footing_core::loads::{ColumnActions, ServiceLoads, generate_combinations};
//! use footing_core::code::ACI_318M_25;
//!
//! let loads = ServiceLoads::new(ColumnActions::axial(800.0), ColumnActions::axial(300.0));
//!
//! let ultimate = generate_combinations(&loads, &ACI_318M_25.ultimate_combinations).unwrap();
//! let max_axial = ultimate.iter()
//!     .map(|c| c.actions.axial_kn)
//!     .fold(0.0f64, f64::max);
//!
//! assert!((max_axial - 1440.0).abs() < 1e-9);
//! ```

pub mod combinations;
pub mod load_types;

pub use combinations::{
    aci318_service_combinations, aci318_ultimate_combinations,
    generate_combinations, CombinationRule, LoadCombination,
};
pub use load_types::LoadType;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Which family of combinations a row belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LimitState {
    /// Factored loads for strength design (flexure, shear)
    #[default]
    Ultimate,
    /// Unfactored or lightly factored loads for allowable bearing
    Service,
}

impl LimitState {
    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            LimitState::Ultimate => "Ultimate (strength design)",
            LimitState::Service => "Service (allowable bearing)",
        }
    }

    /// Short abbreviation
    pub fn code(&self) -> &'static str {
        match self {
            LimitState::Ultimate => "ULS",
            LimitState::Service => "SLS",
        }
    }
}

impl std::fmt::Display for LimitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Forces at the column base, applied at the top surface of the footing.
///
/// Sign convention: positive axial force is compression. `moment_x_knm` and
/// `shear_x_kn` raise the pressure toward +x; `moment_y_knm` and
/// `shear_y_kn` raise it toward +y.
///
/// # JSON Format
/// ```json
/// { "axial_kn": 800.0, "moment_x_knm": 40.0 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnActions {
    pub axial_kn: f64,
    pub shear_x_kn: f64,
    pub shear_y_kn: f64,
    pub moment_x_knm: f64,
    pub moment_y_knm: f64,
}

impl ColumnActions {
    /// Pure axial action
    pub fn axial(axial_kn: f64) -> Self {
        ColumnActions {
            axial_kn,
            ..Default::default()
        }
    }

    /// Add moments (builder pattern)
    pub fn with_moments(mut self, moment_x_knm: f64, moment_y_knm: f64) -> Self {
        self.moment_x_knm = moment_x_knm;
        self.moment_y_knm = moment_y_knm;
        self
    }

    /// Add horizontal shears (builder pattern)
    pub fn with_shears(mut self, shear_x_kn: f64, shear_y_kn: f64) -> Self {
        self.shear_x_kn = shear_x_kn;
        self.shear_y_kn = shear_y_kn;
        self
    }

    /// Every component multiplied by `factor`
    pub fn scaled(&self, factor: f64) -> Self {
        ColumnActions {
            axial_kn: self.axial_kn * factor,
            shear_x_kn: self.shear_x_kn * factor,
            shear_y_kn: self.shear_y_kn * factor,
            moment_x_knm: self.moment_x_knm * factor,
            moment_y_knm: self.moment_y_knm * factor,
        }
    }

    /// Component-wise sum
    pub fn plus(&self, other: &ColumnActions) -> Self {
        ColumnActions {
            axial_kn: self.axial_kn + other.axial_kn,
            shear_x_kn: self.shear_x_kn + other.shear_x_kn,
            shear_y_kn: self.shear_y_kn + other.shear_y_kn,
            moment_x_knm: self.moment_x_knm + other.moment_x_knm,
            moment_y_knm: self.moment_y_knm + other.moment_y_knm,
        }
    }

    /// Whether every component is exactly zero
    pub fn is_zero(&self) -> bool {
        *self == ColumnActions::default()
    }

    fn components(&self) -> [(&'static str, f64); 5] {
        [
            ("axial_kn", self.axial_kn),
            ("shear_x_kn", self.shear_x_kn),
            ("shear_y_kn", self.shear_y_kn),
            ("moment_x_knm", self.moment_x_knm),
            ("moment_y_knm", self.moment_y_knm),
        ]
    }
}

/// Unfactored column actions by load type
///
/// # Example
/// ```
/// use footing_core::loads::{ColumnActions, LoadType, ServiceLoads};
///
/// let loads = ServiceLoads::new(ColumnActions::axial(1200.0), ColumnActions::axial(600.0));
/// assert_eq!(loads.get(LoadType::Live).axial_kn, 600.0);
/// assert!(!loads.has_wind());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ServiceLoads {
    pub dead: ColumnActions,
    #[serde(default)]
    pub live: ColumnActions,
    #[serde(default)]
    pub wind: ColumnActions,
}

impl ServiceLoads {
    /// Dead and live actions, no wind
    pub fn new(dead: ColumnActions, live: ColumnActions) -> Self {
        ServiceLoads {
            dead,
            live,
            wind: ColumnActions::default(),
        }
    }

    /// Add wind actions (builder pattern)
    pub fn with_wind(mut self, wind: ColumnActions) -> Self {
        self.wind = wind;
        self
    }

    /// Actions for one load type
    pub fn get(&self, load_type: LoadType) -> &ColumnActions {
        match load_type {
            LoadType::Dead => &self.dead,
            LoadType::Live => &self.live,
            LoadType::Wind => &self.wind,
        }
    }

    /// Whether any wind action is present
    pub fn has_wind(&self) -> bool {
        !self.wind.is_zero()
    }

    /// Validate the load set
    ///
    /// All components must be finite and gravity axial loads must be
    /// compressive (non-negative).
    pub fn validate(&self) -> CalcResult<()> {
        for load_type in LoadType::ALL {
            let actions = self.get(load_type);
            for (name, value) in actions.components() {
                if !value.is_finite() {
                    return Err(CalcError::invalid_input(
                        format!("loads.{}.{}", load_type.code(), name),
                        value.to_string(),
                        "Load components must be finite",
                    ));
                }
            }
            if load_type.is_gravity() && actions.axial_kn < 0.0 {
                return Err(CalcError::invalid_input(
                    format!("loads.{}.axial_kn", load_type.code()),
                    actions.axial_kn.to_string(),
                    format!("{} axial force cannot be negative", load_type.description()),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaled_and_plus() {
        let a = ColumnActions::axial(100.0).with_moments(10.0, -5.0);
        let b = ColumnActions::axial(50.0).with_shears(2.0, 0.0);
        let sum = a.scaled(1.2).plus(&b.scaled(1.6));
        assert!((sum.axial_kn - 200.0).abs() < 1e-9);
        assert!((sum.moment_x_knm - 12.0).abs() < 1e-9);
        assert!((sum.moment_y_knm + 6.0).abs() < 1e-9);
        assert!((sum.shear_x_kn - 3.2).abs() < 1e-9);
    }

    #[test]
    fn test_negative_dead_axial_rejected() {
        let loads = ServiceLoads::new(ColumnActions::axial(-10.0), ColumnActions::default());
        let err = loads.validate().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_negative_wind_axial_allowed() {
        let loads = ServiceLoads::new(ColumnActions::axial(500.0), ColumnActions::default())
            .with_wind(ColumnActions::axial(-50.0).with_moments(80.0, 0.0));
        assert!(loads.validate().is_ok());
        assert!(loads.has_wind());
    }

    #[test]
    fn test_non_finite_rejected() {
        let loads = ServiceLoads::new(
            ColumnActions::axial(500.0).with_moments(f64::NAN, 0.0),
            ColumnActions::default(),
        );
        assert!(loads.validate().is_err());
    }

    #[test]
    fn test_service_loads_json_defaults() {
        let json = r#"{ "dead": { "axial_kn": 800.0 } }"#;
        let loads: ServiceLoads = serde_json::from_str(json).unwrap();
        assert_eq!(loads.dead.axial_kn, 800.0);
        assert!(loads.live.is_zero());
        assert!(!loads.has_wind());
    }
}
