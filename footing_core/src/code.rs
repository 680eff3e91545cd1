//! # Design Code Tables
//!
//! Every code-defined number the engine uses (load factor rows, strength
//! reduction factors, validity bounds, stress-block and shear coefficients,
//! bar catalog, spacing and development rules) lives in one read-only
//! [`DesignCode`] record.
//!
//! The built-in edition is ACI 318M-25, available as the process-wide static
//! [`ACI_318M_25`]. A different edition can be substituted by deserializing a
//! table from TOML or JSON:
//!
//! ```rust
//! use footing_core::code::{DesignCode, ACI_318M_25};
//!
//! let json = ACI_318M_25.to_json_string().unwrap();
//! let mut edited: DesignCode = serde_json::from_str(&json).unwrap();
//! edited.edition = "Office standard (phi_v = 0.70)".to_string();
//! edited.phi.shear = 0.70;
//! assert!(edited.validate().is_ok());
//! ```

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::loads::combinations::{aci318_service_combinations, aci318_ultimate_combinations};
use crate::loads::CombinationRule;
use crate::materials::{BarSize, Exposure};

/// ACI 318M-25 section references for the checks performed by the engine.
pub mod aci_ref {
    /// Required strength (load combinations)
    pub const LOAD_COMBINATIONS: &str = "ACI 318M-25 5.3.1";
    /// Strength reduction factors
    pub const PHI: &str = "ACI 318M-25 21.2.1";
    /// Specified concrete strength limits
    pub const CONCRETE_LIMITS: &str = "ACI 318M-25 19.2.1";
    /// Specified reinforcement strength limits
    pub const STEEL_LIMITS: &str = "ACI 318M-25 20.2.2.4";
    /// Equivalent rectangular stress block
    pub const STRESS_BLOCK: &str = "ACI 318M-25 22.2.2.4";
    /// Tension-controlled strain limit
    pub const TENSION_CONTROLLED: &str = "ACI 318M-25 21.2.2";
    /// Minimum flexural reinforcement
    pub const MIN_FLEXURAL_STEEL: &str = "ACI 318M-25 9.6.1.2";
    /// One-way shear strength
    pub const ONE_WAY_SHEAR: &str = "ACI 318M-25 22.5.5.1";
    /// Two-way shear critical section
    pub const PUNCHING_PERIMETER: &str = "ACI 318M-25 22.6.4.1";
    /// Two-way shear strength
    pub const PUNCHING_SHEAR: &str = "ACI 318M-25 22.6.5.2";
    /// Critical section for moment in footings
    pub const FOOTING_MOMENT: &str = "ACI 318M-25 13.2.7.1";
    /// Minimum footing depth above bottom reinforcement
    pub const MIN_FOOTING_DEPTH: &str = "ACI 318M-25 13.3.1.2";
    /// Concrete cover
    pub const COVER: &str = "ACI 318M-25 20.5.1.3";
    /// Reinforcement spacing
    pub const SPACING: &str = "ACI 318M-25 7.7.2";
    /// Development length of deformed bars in tension
    pub const DEVELOPMENT: &str = "ACI 318M-25 25.4.2";
}

/// Strength reduction factors (phi) by failure mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrengthReductionFactors {
    /// Tension-controlled flexure
    pub flexure: f64,
    /// Shear (one-way and two-way)
    pub shear: f64,
}

/// Validity bounds and advisory thresholds for material strengths (MPa)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialLimits {
    pub fc_min_mpa: f64,
    pub fc_max_mpa: f64,
    pub fy_min_mpa: f64,
    pub fy_max_mpa: f64,
    /// Below this f'c an advisory is raised
    pub fc_advisory_mpa: f64,
    /// Steel above this fy combined with concrete below
    /// `high_fy_low_fc_mpa` raises an advisory
    pub high_fy_advisory_mpa: f64,
    pub high_fy_low_fc_mpa: f64,
}

/// Flexural stress-block rules
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlexureRules {
    /// Usable concrete compressive strain
    pub concrete_strain_limit: f64,
    /// Net tensile strain at the tension-controlled limit
    pub tension_controlled_strain: f64,
    /// Steel modulus of elasticity (MPa)
    pub steel_modulus_mpa: f64,
    /// Intensity of the equivalent stress block (0.85 f'c)
    pub stress_block_intensity: f64,
    pub beta1_max: f64,
    pub beta1_min: f64,
    /// f'c at which beta1 starts to drop (MPa)
    pub beta1_reduction_start_mpa: f64,
    /// Reduction of beta1 per MPa above the start value
    pub beta1_reduction_per_mpa: f64,
    /// As,min >= coefficient * b * d / fy
    pub min_steel_coefficient: f64,
    /// As,min >= sqrt(f'c) * b * d / (divisor * fy)
    pub min_steel_sqrt_divisor: f64,
}

/// Shear strength coefficients (all stresses in MPa with sqrt(f'c) in MPa)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShearRules {
    /// One-way: Vc = coefficient * lambda * sqrt(f'c) * b * d
    pub one_way_coefficient: f64,
    /// Two-way upper bound: vc = coefficient * lambda * sqrt(f'c)
    pub punching_upper_bound_coefficient: f64,
    /// Two-way aspect term: vc = coefficient * (1 + 2/beta) * lambda * sqrt(f'c)
    pub punching_aspect_coefficient: f64,
    /// Two-way location term: vc = coefficient * (2 + alpha_s d / bo) * lambda * sqrt(f'c)
    pub punching_location_coefficient: f64,
    pub location_factor_interior: f64,
    pub location_factor_edge: f64,
    pub location_factor_corner: f64,
    /// Lightweight concrete modification factor
    pub lambda: f64,
    /// Apply the size-effect factor lambda_s = sqrt(2 / (1 + 0.004 d)) <= 1
    #[serde(default)]
    pub apply_size_effect: bool,
}

/// Bar spacing rules for footing mats
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpacingRules {
    /// Spacings are chosen in multiples of this step (mm)
    pub step_mm: f64,
    /// Absolute maximum centre-to-centre spacing (mm)
    pub max_spacing_mm: f64,
    /// Maximum spacing as a multiple of the footing thickness
    pub max_spacing_thickness_multiple: f64,
    /// Absolute minimum clear spacing (mm)
    pub min_clear_spacing_mm: f64,
    /// Minimum clear spacing as a multiple of the aggregate size
    pub aggregate_multiple: f64,
}

/// Tension development length rules
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DevelopmentRules {
    /// ld = fy * db / (divisor * sqrt(f'c))
    pub base_divisor: f64,
    /// Applied when cover + db/2 < confinement_bar_multiple * db
    pub confinement_factor: f64,
    pub confinement_bar_multiple: f64,
    /// Applied to bars larger than `large_bar_threshold_mm`
    pub large_bar_factor: f64,
    pub large_bar_threshold_mm: f64,
    pub min_length_mm: f64,
    pub min_length_bar_multiple: f64,
}

/// Minimum cover for concrete cast against earth (mm)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverRules {
    pub normal_mm: f64,
    pub severe_mm: f64,
    pub marine_mm: f64,
    /// Least depth of concrete above the bottom reinforcement
    #[serde(default = "default_min_depth_above_steel_mm")]
    pub min_depth_above_steel_mm: f64,
}

fn default_min_depth_above_steel_mm() -> f64 {
    150.0
}

impl CoverRules {
    /// Minimum cover for an exposure class
    pub fn minimum_mm(&self, exposure: Exposure) -> f64 {
        match exposure {
            Exposure::Normal => self.normal_mm,
            Exposure::Severe => self.severe_mm,
            Exposure::Marine => self.marine_mm,
        }
    }
}

/// The complete set of code tables for one code edition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignCode {
    /// Edition label carried into every result (e.g. "ACI 318M-25")
    pub edition: String,
    /// Strength-design combinations
    pub ultimate_combinations: Vec<CombinationRule>,
    /// Service combinations for the bearing check
    pub service_combinations: Vec<CombinationRule>,
    pub phi: StrengthReductionFactors,
    pub materials: MaterialLimits,
    pub flexure: FlexureRules,
    pub shear: ShearRules,
    pub spacing: SpacingRules,
    pub development: DevelopmentRules,
    pub cover: CoverRules,
    /// Available bar sizes, ascending
    pub bar_catalog: Vec<BarSize>,
}

/// Built-in ACI 318M-25 tables, initialised on first use and never mutated
pub static ACI_318M_25: Lazy<DesignCode> = Lazy::new(DesignCode::aci_318m_25);

impl DesignCode {
    /// ACI 318M-25 (metric) tables
    pub fn aci_318m_25() -> Self {
        DesignCode {
            edition: "ACI 318M-25".to_string(),
            ultimate_combinations: aci318_ultimate_combinations(),
            service_combinations: aci318_service_combinations(),
            phi: StrengthReductionFactors {
                flexure: 0.90,
                shear: 0.75,
            },
            materials: MaterialLimits {
                fc_min_mpa: 17.0,
                fc_max_mpa: 83.0,
                fy_min_mpa: 280.0,
                fy_max_mpa: 550.0,
                fc_advisory_mpa: 21.0,
                high_fy_advisory_mpa: 420.0,
                high_fy_low_fc_mpa: 28.0,
            },
            flexure: FlexureRules {
                concrete_strain_limit: 0.003,
                tension_controlled_strain: 0.005,
                steel_modulus_mpa: 200_000.0,
                stress_block_intensity: 0.85,
                beta1_max: 0.85,
                beta1_min: 0.65,
                beta1_reduction_start_mpa: 28.0,
                beta1_reduction_per_mpa: 0.05 / 7.0,
                min_steel_coefficient: 1.4,
                min_steel_sqrt_divisor: 4.0,
            },
            shear: ShearRules {
                one_way_coefficient: 0.17,
                punching_upper_bound_coefficient: 0.33,
                punching_aspect_coefficient: 0.17,
                punching_location_coefficient: 0.083,
                location_factor_interior: 40.0,
                location_factor_edge: 30.0,
                location_factor_corner: 20.0,
                lambda: 1.0,
                apply_size_effect: false,
            },
            spacing: SpacingRules {
                step_mm: 25.0,
                max_spacing_mm: 300.0,
                max_spacing_thickness_multiple: 3.0,
                min_clear_spacing_mm: 25.0,
                aggregate_multiple: 4.0 / 3.0,
            },
            development: DevelopmentRules {
                base_divisor: 2.1,
                confinement_factor: 1.3,
                confinement_bar_multiple: 3.0,
                large_bar_factor: 1.3,
                large_bar_threshold_mm: 20.0,
                min_length_mm: 300.0,
                min_length_bar_multiple: 12.0,
            },
            cover: CoverRules {
                normal_mm: 75.0,
                severe_mm: 100.0,
                marine_mm: 100.0,
                min_depth_above_steel_mm: 150.0,
            },
            bar_catalog: [10.0, 12.0, 16.0, 20.0, 25.0, 32.0, 40.0]
                .iter()
                .map(|&d| BarSize::new(d))
                .collect(),
        }
    }

    /// Parse a substitute table from TOML and validate it
    pub fn from_toml_str(text: &str) -> CalcResult<Self> {
        let code: DesignCode = toml::from_str(text)?;
        code.validate()?;
        Ok(code)
    }

    /// Parse a substitute table from JSON and validate it
    pub fn from_json_str(text: &str) -> CalcResult<Self> {
        let code: DesignCode = serde_json::from_str(text)?;
        code.validate()?;
        Ok(code)
    }

    /// Serialize the table as pretty JSON (a starting point for edits)
    pub fn to_json_string(&self) -> CalcResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Find a bar in the catalog by nominal diameter
    pub fn bar(&self, diameter_mm: f64) -> Option<BarSize> {
        self.bar_catalog
            .iter()
            .copied()
            .find(|bar| (bar.diameter_mm - diameter_mm).abs() < 1e-9)
    }

    /// Check internal consistency of the tables
    pub fn validate(&self) -> CalcResult<()> {
        if self.ultimate_combinations.is_empty() {
            return Err(CalcError::configuration("no ultimate combinations defined"));
        }
        if self.service_combinations.is_empty() {
            return Err(CalcError::configuration("no service combinations defined"));
        }
        for (name, phi) in [("flexure", self.phi.flexure), ("shear", self.phi.shear)] {
            if !(phi > 0.0 && phi <= 1.0) {
                return Err(CalcError::configuration(format!(
                    "phi for {} must be in (0, 1], got {}",
                    name, phi
                )));
            }
        }
        let m = &self.materials;
        if !(m.fc_min_mpa > 0.0 && m.fc_min_mpa < m.fc_max_mpa) {
            return Err(CalcError::configuration("concrete strength bounds are not ordered"));
        }
        if !(m.fy_min_mpa > 0.0 && m.fy_min_mpa < m.fy_max_mpa) {
            return Err(CalcError::configuration("steel strength bounds are not ordered"));
        }
        let f = &self.flexure;
        if !(f.beta1_min > 0.0 && f.beta1_min <= f.beta1_max && f.beta1_max <= 1.0) {
            return Err(CalcError::configuration("beta1 bounds must satisfy 0 < min <= max <= 1"));
        }
        if f.concrete_strain_limit <= 0.0 || f.tension_controlled_strain <= 0.0 {
            return Err(CalcError::configuration("strain limits must be positive"));
        }
        if self.spacing.step_mm <= 0.0 || self.spacing.max_spacing_mm < self.spacing.step_mm {
            return Err(CalcError::configuration(
                "spacing step must be positive and not exceed the maximum spacing",
            ));
        }
        if self.cover.min_depth_above_steel_mm <= 0.0 {
            return Err(CalcError::configuration("minimum footing depth must be positive"));
        }
        if self.bar_catalog.is_empty() {
            return Err(CalcError::configuration("bar catalog is empty"));
        }
        if self
            .bar_catalog
            .windows(2)
            .any(|pair| pair[0].diameter_mm >= pair[1].diameter_mm)
        {
            return Err(CalcError::configuration("bar catalog must be strictly ascending"));
        }
        Ok(())
    }
}

impl Default for DesignCode {
    fn default() -> Self {
        DesignCode::aci_318m_25()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_are_valid() {
        assert!(ACI_318M_25.validate().is_ok());
        assert_eq!(ACI_318M_25.edition, "ACI 318M-25");
        assert_eq!(ACI_318M_25.phi.flexure, 0.90);
        assert_eq!(ACI_318M_25.phi.shear, 0.75);
    }

    #[test]
    fn test_bar_lookup() {
        let bar = ACI_318M_25.bar(16.0).unwrap();
        assert!((bar.area_mm2() - 201.06).abs() < 0.01);
        assert!(ACI_318M_25.bar(18.0).is_none());
    }

    #[test]
    fn test_json_substitution() {
        let json = ACI_318M_25.to_json_string().unwrap();
        let parsed = DesignCode::from_json_str(&json).unwrap();
        assert_eq!(parsed, *ACI_318M_25);
    }

    #[test]
    fn test_invalid_phi_rejected() {
        let mut code = DesignCode::aci_318m_25();
        code.phi.shear = 1.5;
        let err = code.validate().unwrap_err();
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
    }

    #[test]
    fn test_unsorted_catalog_rejected() {
        let mut code = DesignCode::aci_318m_25();
        code.bar_catalog.reverse();
        assert!(code.validate().is_err());
    }

    #[test]
    fn test_toml_parse_error_is_serialization_error() {
        let err = DesignCode::from_toml_str("edition = ").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_cover_by_exposure() {
        assert_eq!(ACI_318M_25.cover.minimum_mm(Exposure::Normal), 75.0);
        assert_eq!(ACI_318M_25.cover.minimum_mm(Exposure::Marine), 100.0);
    }
}
