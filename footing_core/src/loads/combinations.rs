//! ACI 318M-25 Load Combinations
//!
//! This module provides the strength (ultimate) and service combinations
//! used for footing design.
//!
//! ## Wind Load Sign Convention
//!
//! Wind (W) actions are entered with their own signs. Every row containing W
//! has a reversed (') variant with the opposite wind factor, so a wind moment
//! that relieves one edge in the entered direction is also checked loading it.
//! The 0.9D + 1.0W and 0.6D + 0.6W rows are the minimum-dead variants that
//! govern overturning and partial contact.
//!
//! When no wind is present the W rows collapse onto gravity rows and are
//! skipped by [`generate_combinations`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::load_types::LoadType;
use super::{ColumnActions, LimitState, ServiceLoads};
use crate::errors::CalcResult;
use crate::geometry::FoundationGeometry;

/// One row of a code's load factor table
///
/// # Example
/// ```
/// use footing_core::loads::{CombinationRule, ColumnActions, LimitState, LoadType, ServiceLoads};
///
/// let rule = CombinationRule::new("U2", "1.2D + 1.6L", LimitState::Ultimate)
///     .with_factor(LoadType::Dead, 1.2)
///     .with_factor(LoadType::Live, 1.6);
///
/// let loads = ServiceLoads::new(ColumnActions::axial(20.0), ColumnActions::axial(50.0));
/// let combo = rule.apply(&loads);
/// assert!((combo.actions.axial_kn - 104.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationRule {
    /// Combination identifier (e.g., "U2", "S4'")
    pub name: String,

    /// Human-readable equation for display (e.g., "1.2D + 1.6L")
    pub equation: String,

    pub limit_state: LimitState,

    /// Load factors keyed by load type
    pub factors: HashMap<LoadType, f64>,
}

impl CombinationRule {
    /// Create a new rule with no factors
    pub fn new(name: impl Into<String>, equation: impl Into<String>, limit_state: LimitState) -> Self {
        CombinationRule {
            name: name.into(),
            equation: equation.into(),
            limit_state,
            factors: HashMap::new(),
        }
    }

    /// Add a load factor (builder pattern)
    pub fn with_factor(mut self, load_type: LoadType, factor: f64) -> Self {
        self.factors.insert(load_type, factor);
        self
    }

    /// Get the factor for a specific load type (0.0 if not in the rule)
    pub fn get_factor(&self, load_type: LoadType) -> f64 {
        self.factors.get(&load_type).copied().unwrap_or(0.0)
    }

    /// Whether the rule carries any load that can reverse direction
    pub fn includes_directional(&self) -> bool {
        LoadType::ALL
            .iter()
            .any(|load_type| load_type.is_directional() && self.get_factor(*load_type) != 0.0)
    }

    /// Apply this rule to the service loads
    pub fn apply(&self, loads: &ServiceLoads) -> LoadCombination {
        let actions = LoadType::ALL
            .iter()
            .fold(ColumnActions::default(), |acc, load_type| {
                acc.plus(&loads.get(*load_type).scaled(self.get_factor(*load_type)))
            });

        LoadCombination {
            name: self.name.clone(),
            equation: self.equation.clone(),
            limit_state: self.limit_state,
            dead_factor: self.get_factor(LoadType::Dead),
            actions,
        }
    }
}

/// Factored column actions for one combination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadCombination {
    pub name: String,
    pub equation: String,
    pub limit_state: LimitState,
    /// Factor applied to dead load; also applied to footing self-weight
    /// and soil surcharge
    pub dead_factor: f64,
    /// Factored actions at the column base
    pub actions: ColumnActions,
}

impl LoadCombination {
    /// Moments about the plan centroid at the underside of the footing (kNm)
    ///
    /// Adds the horizontal shears acting over the footing thickness and the
    /// axial force acting at the column offset from the centroid.
    pub fn base_moments(&self, geometry: &FoundationGeometry) -> (f64, f64) {
        let h_m = geometry.thickness_mm / 1000.0;
        let (offset_x_m, offset_y_m) = geometry.column_offset_m();
        let a = &self.actions;
        (
            a.moment_x_knm + a.shear_x_kn * h_m + a.axial_kn * offset_x_m,
            a.moment_y_knm + a.shear_y_kn * h_m + a.axial_kn * offset_y_m,
        )
    }
}

/// Build the factored combinations for a set of rules
///
/// Rules containing a directional load (wind) are skipped when no wind
/// actions are present.
///
/// # Example
/// ```
/// use footing_core::loads::{ColumnActions, ServiceLoads, generate_combinations};
/// use footing_core::code::ACI_318M_25;
///
/// let loads = ServiceLoads::new(ColumnActions::axial(800.0), ColumnActions::axial(300.0));
/// let service = generate_combinations(&loads, &ACI_318M_25.service_combinations).unwrap();
/// assert_eq!(service.len(), 2);
/// assert_eq!(service[1].name, "S2");
/// ```
pub fn generate_combinations(
    loads: &ServiceLoads,
    rules: &[CombinationRule],
) -> CalcResult<Vec<LoadCombination>> {
    loads.validate()?;
    let has_wind = loads.has_wind();

    Ok(rules
        .iter()
        .filter(|rule| has_wind || !rule.includes_directional())
        .map(|rule| rule.apply(loads))
        .collect())
}

/// ACI 318M-25 strength combinations (Section 5.3.1) for D, L and W
///
/// # Example
/// ```
/// use footing_core::loads::{aci318_ultimate_combinations, LoadType};
///
/// let combos = aci318_ultimate_combinations();
/// let u1 = combos.iter().find(|c| c.name == "U1").unwrap();
/// assert_eq!(u1.get_factor(LoadType::Dead), 1.4);
/// ```
pub fn aci318_ultimate_combinations() -> Vec<CombinationRule> {
    let u = LimitState::Ultimate;
    vec![
        // 5.3.1a
        CombinationRule::new("U1", "1.4D", u)
            .with_factor(LoadType::Dead, 1.4),

        // 5.3.1b
        CombinationRule::new("U2", "1.2D + 1.6L", u)
            .with_factor(LoadType::Dead, 1.2)
            .with_factor(LoadType::Live, 1.6),

        // 5.3.1c
        CombinationRule::new("U3", "1.2D + 1.6L + 0.5W", u)
            .with_factor(LoadType::Dead, 1.2)
            .with_factor(LoadType::Live, 1.6)
            .with_factor(LoadType::Wind, 0.5),

        CombinationRule::new("U3'", "1.2D + 1.6L - 0.5W", u)
            .with_factor(LoadType::Dead, 1.2)
            .with_factor(LoadType::Live, 1.6)
            .with_factor(LoadType::Wind, -0.5),

        // 5.3.1d
        CombinationRule::new("U4", "1.2D + 1.0L + 1.0W", u)
            .with_factor(LoadType::Dead, 1.2)
            .with_factor(LoadType::Live, 1.0)
            .with_factor(LoadType::Wind, 1.0),

        CombinationRule::new("U4'", "1.2D + 1.0L - 1.0W", u)
            .with_factor(LoadType::Dead, 1.2)
            .with_factor(LoadType::Live, 1.0)
            .with_factor(LoadType::Wind, -1.0),

        // 5.3.1f, minimum dead
        CombinationRule::new("U5", "0.9D + 1.0W", u)
            .with_factor(LoadType::Dead, 0.9)
            .with_factor(LoadType::Wind, 1.0),

        CombinationRule::new("U5'", "0.9D - 1.0W", u)
            .with_factor(LoadType::Dead, 0.9)
            .with_factor(LoadType::Wind, -1.0),
    ]
}

/// Service combinations for the allowable bearing check
pub fn aci318_service_combinations() -> Vec<CombinationRule> {
    let s = LimitState::Service;
    vec![
        CombinationRule::new("S1", "D", s)
            .with_factor(LoadType::Dead, 1.0),

        CombinationRule::new("S2", "D + L", s)
            .with_factor(LoadType::Dead, 1.0)
            .with_factor(LoadType::Live, 1.0),

        CombinationRule::new("S3", "D + 0.6W", s)
            .with_factor(LoadType::Dead, 1.0)
            .with_factor(LoadType::Wind, 0.6),

        CombinationRule::new("S3'", "D - 0.6W", s)
            .with_factor(LoadType::Dead, 1.0)
            .with_factor(LoadType::Wind, -0.6),

        CombinationRule::new("S4", "D + 0.75L + 0.45W", s)
            .with_factor(LoadType::Dead, 1.0)
            .with_factor(LoadType::Live, 0.75)
            .with_factor(LoadType::Wind, 0.45),

        CombinationRule::new("S4'", "D + 0.75L - 0.45W", s)
            .with_factor(LoadType::Dead, 1.0)
            .with_factor(LoadType::Live, 0.75)
            .with_factor(LoadType::Wind, -0.45),

        // minimum dead
        CombinationRule::new("S5", "0.6D + 0.6W", s)
            .with_factor(LoadType::Dead, 0.6)
            .with_factor(LoadType::Wind, 0.6),

        CombinationRule::new("S5'", "0.6D - 0.6W", s)
            .with_factor(LoadType::Dead, 0.6)
            .with_factor(LoadType::Wind, -0.6),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gravity_loads() -> ServiceLoads {
        ServiceLoads::new(ColumnActions::axial(800.0), ColumnActions::axial(300.0))
    }

    #[test]
    fn test_combination_counts() {
        assert_eq!(aci318_ultimate_combinations().len(), 8);
        assert_eq!(aci318_service_combinations().len(), 8);
    }

    #[test]
    fn test_gravity_only_skips_wind_rows() {
        let combos = generate_combinations(&gravity_loads(), &aci318_ultimate_combinations()).unwrap();
        let names: Vec<&str> = combos.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["U1", "U2"]);
    }

    #[test]
    fn test_largest_ultimate_axial() {
        let combos = generate_combinations(&gravity_loads(), &aci318_ultimate_combinations()).unwrap();
        let governing = combos
            .iter()
            .max_by(|a, b| a.actions.axial_kn.total_cmp(&b.actions.axial_kn))
            .unwrap();
        // 1.2 * 800 + 1.6 * 300 = 1440 vs 1.4 * 800 = 1120
        assert_eq!(governing.name, "U2");
        assert!((governing.actions.axial_kn - 1440.0).abs() < 1e-9);
        assert_eq!(governing.dead_factor, 1.2);
    }

    #[test]
    fn test_directional_rules() {
        let rules = aci318_ultimate_combinations();
        let directional: Vec<&str> = rules
            .iter()
            .filter(|r| r.includes_directional())
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(directional.len(), 6);
        assert!(!directional.contains(&"U1"));
        assert!(!directional.contains(&"U2"));
    }

    #[test]
    fn test_wind_reversal_variants() {
        let loads = gravity_loads().with_wind(ColumnActions::default().with_moments(100.0, 0.0));
        let combos = generate_combinations(&loads, &aci318_ultimate_combinations()).unwrap();
        assert_eq!(combos.len(), 8);

        let u5 = combos.iter().find(|c| c.name == "U5").unwrap();
        let u5r = combos.iter().find(|c| c.name == "U5'").unwrap();
        assert!((u5.actions.moment_x_knm - 100.0).abs() < 1e-9);
        assert!((u5r.actions.moment_x_knm + 100.0).abs() < 1e-9);
        assert!((u5.actions.axial_kn - 720.0).abs() < 1e-9);
    }

    #[test]
    fn test_service_minimum_dead() {
        let loads = gravity_loads().with_wind(ColumnActions::axial(-100.0));
        let combos = generate_combinations(&loads, &aci318_service_combinations()).unwrap();
        let s5r = combos.iter().find(|c| c.name == "S5'").unwrap();
        // 0.6 * 800 + 0.6 * 100 = 540
        assert!((s5r.actions.axial_kn - 540.0).abs() < 1e-9);
        assert_eq!(s5r.limit_state, LimitState::Service);
    }

    #[test]
    fn test_invalid_loads_propagate() {
        let loads = ServiceLoads::new(ColumnActions::axial(800.0), ColumnActions::axial(-1.0));
        assert!(generate_combinations(&loads, &aci318_service_combinations()).is_err());
    }

    #[test]
    fn test_rule_serialization() {
        let rule = CombinationRule::new("U1", "1.4D", LimitState::Ultimate)
            .with_factor(LoadType::Dead, 1.4);
        let json = serde_json::to_string(&rule).unwrap();
        let parsed: CombinationRule = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, rule);
    }

    #[test]
    fn test_base_moments_include_shear_and_offset() {
        let geometry = FoundationGeometry::new(2500.0, 2500.0, 400.0, 400.0, 400.0)
            .with_column_position(1450.0, 1250.0);
        let combo = CombinationRule::new("T", "D", LimitState::Service)
            .with_factor(LoadType::Dead, 1.0)
            .apply(&ServiceLoads::new(
                ColumnActions::axial(1000.0).with_moments(20.0, 5.0).with_shears(10.0, 0.0),
                ColumnActions::default(),
            ));
        let (mx, my) = combo.base_moments(&geometry);
        // 20 + 10 * 0.4 + 1000 * 0.2
        assert!((mx - 224.0).abs() < 1e-9);
        assert!((my - 5.0).abs() < 1e-9);
    }
}
