//! # Footing Geometry
//!
//! Plan dimensions, column position and the overburden above a rectangular
//! pad footing.
//!
//! Plan coordinates are measured from the lower-left corner of the footing:
//! x runs along `length_mm`, y along `width_mm`. The column is a rectangle
//! `column_length_mm` (in x) by `column_width_mm` (in y) centred at
//! (`column_x_mm`, `column_y_mm`); when no position is given it sits at the
//! plan centroid.

use serde::{Deserialize, Serialize};

use crate::code::{aci_ref, DesignCode};
use crate::errors::{CalcError, CalcResult};
use crate::materials::MaterialProperties;

/// Plan direction of a strip, bar layer or eccentricity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    X,
    Y,
}

impl Direction {
    pub const BOTH: [Direction; 2] = [Direction::X, Direction::Y];

    pub fn other(&self) -> Direction {
        match self {
            Direction::X => Direction::Y,
            Direction::Y => Direction::X,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::X => write!(f, "X"),
            Direction::Y => write!(f, "Y"),
        }
    }
}

/// Rectangular pad footing with one rectangular column
///
/// # Example
/// ```
/// use footing_core::geometry::FoundationGeometry;
///
/// let geometry = FoundationGeometry::new(2500.0, 2500.0, 400.0, 400.0, 400.0);
/// assert!(geometry.validate().is_ok());
/// assert!((geometry.area_m2() - 6.25).abs() < 1e-12);
/// assert_eq!(geometry.column_offset_m(), (0.0, 0.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoundationGeometry {
    /// Plan dimension in x (mm)
    pub length_mm: f64,
    /// Plan dimension in y (mm)
    pub width_mm: f64,
    pub thickness_mm: f64,
    /// Column dimension in x (mm)
    pub column_length_mm: f64,
    /// Column dimension in y (mm)
    pub column_width_mm: f64,
    /// Column centre x from the plan origin; centroid when absent
    #[serde(default)]
    pub column_x_mm: Option<f64>,
    /// Column centre y from the plan origin; centroid when absent
    #[serde(default)]
    pub column_y_mm: Option<f64>,
}

impl FoundationGeometry {
    /// Footing with the column at the plan centroid
    pub fn new(
        length_mm: f64,
        width_mm: f64,
        thickness_mm: f64,
        column_length_mm: f64,
        column_width_mm: f64,
    ) -> Self {
        FoundationGeometry {
            length_mm,
            width_mm,
            thickness_mm,
            column_length_mm,
            column_width_mm,
            column_x_mm: None,
            column_y_mm: None,
        }
    }

    /// Place the column centre (builder pattern)
    pub fn with_column_position(mut self, x_mm: f64, y_mm: f64) -> Self {
        self.column_x_mm = Some(x_mm);
        self.column_y_mm = Some(y_mm);
        self
    }

    /// Same footing with the column moved to the plan centroid
    pub fn centred(mut self) -> Self {
        self.column_x_mm = None;
        self.column_y_mm = None;
        self
    }

    /// Same footing with new plan dimensions, column kept at the centroid
    /// if it was unplaced
    pub fn with_plan(mut self, length_mm: f64, width_mm: f64) -> Self {
        self.length_mm = length_mm;
        self.width_mm = width_mm;
        self
    }

    pub fn area_m2(&self) -> f64 {
        self.length_mm * self.width_mm / 1.0e6
    }

    /// Column centre (mm from origin)
    pub fn column_center_mm(&self) -> (f64, f64) {
        (
            self.column_x_mm.unwrap_or(self.length_mm / 2.0),
            self.column_y_mm.unwrap_or(self.width_mm / 2.0),
        )
    }

    /// Column centre relative to the plan centroid (m)
    pub fn column_offset_m(&self) -> (f64, f64) {
        let (cx, cy) = self.column_center_mm();
        (
            (cx - self.length_mm / 2.0) / 1000.0,
            (cy - self.width_mm / 2.0) / 1000.0,
        )
    }

    /// Plan extent along a direction (mm)
    pub fn span_mm(&self, direction: Direction) -> f64 {
        match direction {
            Direction::X => self.length_mm,
            Direction::Y => self.width_mm,
        }
    }

    /// Plan extent across a direction; the width of a strip spanning it (mm)
    pub fn strip_width_mm(&self, direction: Direction) -> f64 {
        self.span_mm(direction.other())
    }

    /// Column dimension along a direction (mm)
    pub fn column_size_mm(&self, direction: Direction) -> f64 {
        match direction {
            Direction::X => self.column_length_mm,
            Direction::Y => self.column_width_mm,
        }
    }

    /// Positions of the two column faces along a direction (mm)
    pub fn column_faces_mm(&self, direction: Direction) -> (f64, f64) {
        let (cx, cy) = self.column_center_mm();
        let center = match direction {
            Direction::X => cx,
            Direction::Y => cy,
        };
        let half = self.column_size_mm(direction) / 2.0;
        (center - half, center + half)
    }

    /// Ratio of long to short column side
    pub fn column_aspect_ratio(&self) -> f64 {
        let long = self.column_length_mm.max(self.column_width_mm);
        let short = self.column_length_mm.min(self.column_width_mm);
        long / short
    }

    /// Validate dimensions and that the column lies within the plan
    pub fn validate(&self) -> CalcResult<()> {
        for (field, value) in [
            ("length_mm", self.length_mm),
            ("width_mm", self.width_mm),
            ("thickness_mm", self.thickness_mm),
            ("column_length_mm", self.column_length_mm),
            ("column_width_mm", self.column_width_mm),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(CalcError::invalid_input(
                    field,
                    value.to_string(),
                    "Dimension must be positive",
                ));
            }
        }

        let tolerance = 1e-9;
        for direction in Direction::BOTH {
            let (low, high) = self.column_faces_mm(direction);
            let field = match direction {
                Direction::X => "column_x_mm",
                Direction::Y => "column_y_mm",
            };
            if !(low.is_finite() && high.is_finite())
                || low < -tolerance
                || high > self.span_mm(direction) + tolerance
            {
                return Err(CalcError::invalid_input(
                    field,
                    format!("{:.1}..{:.1}", low, high),
                    format!(
                        "Column footprint must lie within the footing (0..{:.1} mm)",
                        self.span_mm(direction)
                    ),
                ));
            }
        }
        Ok(())
    }
}

/// Effective depths of the two bar layers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectiveDepths {
    /// Bottom layer, spanning x (mm)
    pub x_mm: f64,
    /// Second layer, spanning y (mm)
    pub y_mm: f64,
}

impl EffectiveDepths {
    /// d = h - cover - db_x/2 for the bottom layer and
    /// d = h - cover - db_x - db_y/2 for the layer above it.
    ///
    /// Both layers must keep the code's minimum depth above the steel.
    pub fn compute(
        geometry: &FoundationGeometry,
        materials: &MaterialProperties,
        code: &DesignCode,
    ) -> CalcResult<Self> {
        let x_mm = geometry.thickness_mm - materials.cover_mm - materials.bar_diameter_x_mm / 2.0;
        let y_mm = geometry.thickness_mm
            - materials.cover_mm
            - materials.bar_diameter_x_mm
            - materials.bar_diameter_y_mm / 2.0;
        let min_mm = code.cover.min_depth_above_steel_mm;
        if y_mm < min_mm {
            return Err(CalcError::invalid_input(
                "thickness_mm",
                geometry.thickness_mm.to_string(),
                format!(
                    "Effective depth {:.1} mm is below the {:.0} mm minimum ({})",
                    y_mm,
                    min_mm,
                    aci_ref::MIN_FOOTING_DEPTH
                ),
            ));
        }
        Ok(EffectiveDepths { x_mm, y_mm })
    }

    pub fn get(&self, direction: Direction) -> f64 {
        match direction {
            Direction::X => self.x_mm,
            Direction::Y => self.y_mm,
        }
    }

    /// Mean of the two layers, used for punching shear
    pub fn average_mm(&self) -> f64 {
        (self.x_mm + self.y_mm) / 2.0
    }
}

fn default_soil_unit_weight() -> f64 {
    18.0
}

fn default_concrete_unit_weight() -> f64 {
    24.0
}

/// Backfill above the footing and unit weights for self-weight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilOverburden {
    /// Depth of soil over the top of the footing (mm)
    #[serde(default)]
    pub soil_depth_mm: f64,
    #[serde(default = "default_soil_unit_weight")]
    pub soil_unit_weight_kn_m3: f64,
    #[serde(default = "default_concrete_unit_weight")]
    pub concrete_unit_weight_kn_m3: f64,
}

impl Default for SoilOverburden {
    fn default() -> Self {
        SoilOverburden {
            soil_depth_mm: 0.0,
            soil_unit_weight_kn_m3: default_soil_unit_weight(),
            concrete_unit_weight_kn_m3: default_concrete_unit_weight(),
        }
    }
}

impl SoilOverburden {
    /// Overburden with default unit weights (18 kN/m3 soil, 24 kN/m3 concrete)
    pub fn with_soil_depth(soil_depth_mm: f64) -> Self {
        SoilOverburden {
            soil_depth_mm,
            ..Default::default()
        }
    }

    /// Concrete self-weight of the footing (kN)
    pub fn self_weight_kn(&self, geometry: &FoundationGeometry) -> f64 {
        geometry.area_m2() * geometry.thickness_mm / 1000.0 * self.concrete_unit_weight_kn_m3
    }

    /// Weight of soil over the whole plan (kN)
    pub fn surcharge_kn(&self, geometry: &FoundationGeometry) -> f64 {
        geometry.area_m2() * self.soil_depth_mm / 1000.0 * self.soil_unit_weight_kn_m3
    }

    /// Self-weight plus surcharge spread over the plan (kN/m2)
    pub fn pressure_kn_m2(&self, geometry: &FoundationGeometry) -> f64 {
        geometry.thickness_mm / 1000.0 * self.concrete_unit_weight_kn_m3
            + self.soil_depth_mm / 1000.0 * self.soil_unit_weight_kn_m3
    }

    pub fn validate(&self) -> CalcResult<()> {
        for (field, value) in [
            ("soil_depth_mm", self.soil_depth_mm),
            ("soil_unit_weight_kn_m3", self.soil_unit_weight_kn_m3),
            ("concrete_unit_weight_kn_m3", self.concrete_unit_weight_kn_m3),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(CalcError::invalid_input(
                    field,
                    value.to_string(),
                    "Overburden values must be non-negative",
                ));
            }
        }
        Ok(())
    }
}
