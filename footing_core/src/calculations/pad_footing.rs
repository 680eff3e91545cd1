//! # Pad Footing Design
//!
//! Complete design check of an isolated rectangular footing under one
//! column.
//!
//! ## Pipeline
//!
//! 1. Validate geometry, materials, loads and overburden
//! 2. Build service and ultimate combinations
//! 3. Service combinations: contact pressure vs allowable bearing
//! 4. Ultimate combinations: net pressure, strip forces in x and y,
//!    punching demand
//! 5. Governing combination per check: flexure and bar selection,
//!    one-way shear, two-way shear
//! 6. Aggregate into [`DesignResult`]; overall pass is the AND of bearing,
//!    flexure (including bar layout), one-way shear and punching shear
//!
//! A failing check is a normal result. Errors are reserved for invalid
//! input, loads the footprint cannot carry, and solver failures.
//!
//! ## Example
//!
//! ```rust
//! use footing_core::calculations::pad_footing::{calculate, PadFootingInput};
//! use footing_core::code::ACI_318M_25;
//! use footing_core::geometry::{FoundationGeometry, SoilOverburden};
//! use footing_core::loads::{ColumnActions, ServiceLoads};
//! use footing_core::materials::MaterialProperties;
//!
//! let input = PadFootingInput {
//!     label: "F1".to_string(),
//!     geometry: FoundationGeometry::new(2500.0, 2500.0, 400.0, 400.0, 400.0),
//!     materials: MaterialProperties::new(40.0, 420.0),
//!     loads: ServiceLoads::new(ColumnActions::axial(800.0), ColumnActions::axial(300.0)),
//!     overburden: SoilOverburden::with_soil_depth(700.0),
//!     allowable_bearing_kn_m2: 200.0,
//!     settings: Default::default(),
//! };
//!
//! let result = calculate(&input, &ACI_318M_25).unwrap();
//! assert!(result.passes);
//! println!("{}: governed by {}", result.label, result.governing_condition());
//! ```

use serde::{Deserialize, Serialize};

use super::flexure::{design_flexure, nominal_moment_knm, FlexuralDesign};
use super::pressure::{solve_pressure, DistributionKind, PressureField};
use super::reinforcement::{development_length, select_reinforcement, DevelopmentLength, ReinforcementSelection};
use super::shear::{check_one_way_shear, check_punching_shear, OneWayShearCheck, PunchingShearCheck};
use super::strip::{analyze_strip, critical_perimeter, punching_demand, PunchingDemand, StripDiagram, StripResult};
use super::DesignCheck;
use crate::code::DesignCode;
use crate::errors::{CalcError, CalcResult};
use crate::geometry::{Direction, EffectiveDepths, FoundationGeometry, SoilOverburden};
use crate::loads::{generate_combinations, LimitState, LoadCombination, ServiceLoads};
use crate::materials::MaterialProperties;
use crate::numeric::SolverSettings;

fn default_strip_samples() -> usize {
    200
}

fn default_pressure_grid() -> usize {
    100
}

/// Numeric resolution of the analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// Evenly spaced stations per strip diagram (critical sections are added)
    #[serde(default = "default_strip_samples")]
    pub strip_samples: usize,
    /// Cells per side for biaxial partial contact and punching integration
    #[serde(default = "default_pressure_grid")]
    pub pressure_grid: usize,
    #[serde(default)]
    pub solver: SolverSettings,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            strip_samples: default_strip_samples(),
            pressure_grid: default_pressure_grid(),
            solver: SolverSettings::default(),
        }
    }
}

impl AnalysisSettings {
    pub fn validate(&self) -> CalcResult<()> {
        if self.strip_samples < 11 {
            return Err(CalcError::invalid_input(
                "settings.strip_samples",
                self.strip_samples.to_string(),
                "At least 11 strip samples are required",
            ));
        }
        if self.pressure_grid < 10 {
            return Err(CalcError::invalid_input(
                "settings.pressure_grid",
                self.pressure_grid.to_string(),
                "Pressure grid must have at least 10 cells per side",
            ));
        }
        if !(self.solver.tolerance > 0.0) || self.solver.max_iterations == 0 {
            return Err(CalcError::invalid_input(
                "settings.solver",
                format!("{:?}", self.solver),
                "Solver tolerance must be positive and at least one iteration allowed",
            ));
        }
        Ok(())
    }
}

/// Input for a pad footing design check
///
/// # JSON Format
/// ```json
/// {
///   "label": "F1",
///   "geometry": { "length_mm": 2500, "width_mm": 2500, "thickness_mm": 400,
///                 "column_length_mm": 400, "column_width_mm": 400 },
///   "materials": { "fc_mpa": 40, "fy_mpa": 420 },
///   "loads": { "dead": { "axial_kn": 800 }, "live": { "axial_kn": 300 } },
///   "overburden": { "soil_depth_mm": 700 },
///   "allowable_bearing_kn_m2": 200
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PadFootingInput {
    /// User-provided label for this footing
    pub label: String,
    pub geometry: FoundationGeometry,
    pub materials: MaterialProperties,
    pub loads: ServiceLoads,
    #[serde(default)]
    pub overburden: SoilOverburden,
    /// Allowable gross bearing pressure (kN/m2)
    pub allowable_bearing_kn_m2: f64,
    #[serde(default)]
    pub settings: AnalysisSettings,
}

impl PadFootingInput {
    /// Validate all inputs, returning material advisories
    pub fn validate(&self, code: &DesignCode) -> CalcResult<Vec<String>> {
        self.geometry.validate()?;
        let advisories = self.materials.validate(code)?;
        self.loads.validate()?;
        self.overburden.validate()?;
        self.settings.validate()?;
        if !(self.allowable_bearing_kn_m2.is_finite() && self.allowable_bearing_kn_m2 > 0.0) {
            return Err(CalcError::invalid_input(
                "allowable_bearing_kn_m2",
                self.allowable_bearing_kn_m2.to_string(),
                "Allowable bearing pressure must be positive",
            ));
        }
        Ok(advisories)
    }
}

/// One evaluated combination, for reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinationSummary {
    pub name: String,
    pub equation: String,
    pub limit_state: LimitState,
    /// Total vertical load at the base including factored self-weight and surcharge (kN)
    pub total_load_kn: f64,
    pub base_moment_x_knm: f64,
    pub base_moment_y_knm: f64,
    pub max_pressure_kn_m2: f64,
    pub distribution: DistributionKind,
}

/// Governing service bearing pressure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BearingCheck {
    pub combination: String,
    pub distribution: DistributionKind,
    pub total_load_kn: f64,
    pub eccentricity_x_mm: f64,
    pub eccentricity_y_mm: f64,
    pub max_pressure_kn_m2: f64,
    pub min_pressure_kn_m2: f64,
    pub allowable_kn_m2: f64,
    pub check: DesignCheck,
}

/// Design of the bars spanning one direction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionDesign {
    pub direction: Direction,
    pub effective_depth_mm: f64,
    pub strip_width_mm: f64,
    /// Combination with the largest face moment
    pub moment_combination: String,
    pub flexure: FlexuralDesign,
    pub reinforcement: ReinforcementSelection,
    /// Mu against phi Mn of the provided bars; passes only with a bar layout
    pub flexure_check: DesignCheck,
    /// Advisory; not part of the overall pass flag
    pub development: DevelopmentLength,
    pub one_way_shear: OneWayShearCheck,
    /// Shear and moment diagram for the moment combination
    pub diagram: StripDiagram,
}

impl DirectionDesign {
    pub fn passes(&self) -> bool {
        self.flexure_check.passes && self.one_way_shear.check.passes
    }
}

/// Complete pad footing design result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignResult {
    pub label: String,
    pub design_code: String,
    pub self_weight_kn: f64,
    pub surcharge_kn: f64,
    pub effective_depths: EffectiveDepths,
    /// Every combination evaluated, service first
    pub combinations: Vec<CombinationSummary>,
    pub bearing: BearingCheck,
    pub x: DirectionDesign,
    pub y: DirectionDesign,
    pub punching: PunchingShearCheck,
    pub advisories: Vec<String>,
    pub passes: bool,
}

impl DesignResult {
    /// Design for one direction
    pub fn direction(&self, direction: Direction) -> &DirectionDesign {
        match direction {
            Direction::X => &self.x,
            Direction::Y => &self.y,
        }
    }

    /// Every check contributing to the overall pass flag
    pub fn checks(&self) -> Vec<(&'static str, DesignCheck)> {
        vec![
            ("Bearing", self.bearing.check),
            ("Flexure X", self.x.flexure_check),
            ("Flexure Y", self.y.flexure_check),
            ("One-way shear X", self.x.one_way_shear.check),
            ("One-way shear Y", self.y.one_way_shear.check),
            ("Punching shear", self.punching.check),
        ]
    }

    /// Get the governing (highest) demand/capacity ratio
    pub fn governing_ratio(&self) -> f64 {
        self.checks()
            .iter()
            .map(|(_, check)| check.ratio)
            .fold(0.0, f64::max)
    }

    /// Get a description of what governs the design
    pub fn governing_condition(&self) -> &'static str {
        self.checks()
            .into_iter()
            .max_by(|a, b| a.1.ratio.total_cmp(&b.1.ratio))
            .map(|(name, _)| name)
            .unwrap_or("None")
    }

    /// Names of the checks that fail
    pub fn failed_checks(&self) -> Vec<&'static str> {
        self.checks()
            .into_iter()
            .filter(|(_, check)| !check.passes)
            .map(|(name, _)| name)
            .collect()
    }
}

/// Pressure under one combination with the factored overburden included
pub(crate) fn combination_pressure(
    combination: &LoadCombination,
    geometry: &FoundationGeometry,
    overburden: &SoilOverburden,
    settings: &AnalysisSettings,
) -> CalcResult<PressureField> {
    let overburden_kn = overburden.self_weight_kn(geometry) + overburden.surcharge_kn(geometry);
    let total = combination.actions.axial_kn + combination.dead_factor * overburden_kn;
    let (moment_x, moment_y) = combination.base_moments(geometry);
    let field = solve_pressure(
        geometry,
        total,
        moment_x,
        moment_y,
        &combination.name,
        settings.pressure_grid,
        &settings.solver,
    )?;
    tracing::debug!(
        combination = %combination.name,
        limit_state = %combination.limit_state,
        total_load_kn = total,
        max_pressure_kn_m2 = field.max_pressure_kn_m2,
        "contact pressure"
    );
    Ok(field)
}

fn summarize(combination: &LoadCombination, geometry: &FoundationGeometry, field: &PressureField) -> CombinationSummary {
    let (moment_x, moment_y) = combination.base_moments(geometry);
    CombinationSummary {
        name: combination.name.clone(),
        equation: combination.equation.clone(),
        limit_state: combination.limit_state,
        total_load_kn: field.total_load_kn,
        base_moment_x_knm: moment_x,
        base_moment_y_knm: moment_y,
        max_pressure_kn_m2: field.max_pressure_kn_m2,
        distribution: field.kind,
    }
}

/// Governing service bearing check
pub(crate) fn bearing_check(
    geometry: &FoundationGeometry,
    overburden: &SoilOverburden,
    loads: &ServiceLoads,
    allowable_kn_m2: f64,
    settings: &AnalysisSettings,
    code: &DesignCode,
) -> CalcResult<(BearingCheck, Vec<CombinationSummary>)> {
    let service = generate_combinations(loads, &code.service_combinations)?;
    let mut summaries = Vec::with_capacity(service.len());
    let mut governing: Option<PressureField> = None;

    for combination in &service {
        let field = combination_pressure(combination, geometry, overburden, settings)?;
        summaries.push(summarize(combination, geometry, &field));
        let is_worse = governing
            .as_ref()
            .map_or(true, |g| field.max_pressure_kn_m2 > g.max_pressure_kn_m2);
        if is_worse {
            governing = Some(field);
        }
    }

    let field = governing.ok_or_else(|| CalcError::configuration("no service combinations apply"))?;
    let check = BearingCheck {
        combination: field.combination.clone(),
        distribution: field.kind,
        total_load_kn: field.total_load_kn,
        eccentricity_x_mm: field.eccentricity_x_mm,
        eccentricity_y_mm: field.eccentricity_y_mm,
        max_pressure_kn_m2: field.max_pressure_kn_m2,
        min_pressure_kn_m2: field.min_pressure_kn_m2,
        allowable_kn_m2,
        check: DesignCheck::new(field.max_pressure_kn_m2, allowable_kn_m2),
    };
    Ok((check, summaries))
}

/// Strength-stage output for one ultimate combination
struct UltimateStage {
    strips: [StripResult; 2],
    punching: PunchingDemand,
}

impl UltimateStage {
    fn strip(&self, direction: Direction) -> &StripResult {
        match direction {
            Direction::X => &self.strips[0],
            Direction::Y => &self.strips[1],
        }
    }
}

fn design_direction(
    direction: Direction,
    stages: &[UltimateStage],
    input: &PadFootingInput,
    depths: &EffectiveDepths,
    code: &DesignCode,
) -> CalcResult<DirectionDesign> {
    let geometry = &input.geometry;
    let materials = &input.materials;
    let moment_strip = stages
        .iter()
        .map(|stage| stage.strip(direction))
        .max_by(|a, b| a.face_moment_knm.total_cmp(&b.face_moment_knm))
        .ok_or_else(|| CalcError::configuration("no ultimate combinations apply"))?;
    let shear_strip = stages
        .iter()
        .map(|stage| stage.strip(direction))
        .max_by(|a, b| a.shear_at_d_kn.abs().total_cmp(&b.shear_at_d_kn.abs()))
        .ok_or_else(|| CalcError::configuration("no ultimate combinations apply"))?;

    let width = geometry.strip_width_mm(direction);
    let depth = depths.get(direction);
    let flexure = design_flexure(moment_strip.face_moment_knm, width, depth, materials, code, &input.settings.solver)?;

    let bar = match direction {
        Direction::X => materials.bar_x(),
        Direction::Y => materials.bar_y(),
    };
    let reinforcement = select_reinforcement(
        direction,
        flexure.as_required_mm2,
        width,
        geometry.thickness_mm,
        &[bar],
        materials,
        code,
    );

    let provided_capacity = match &reinforcement.layout {
        Some(layout) => {
            let provided_mm2 = layout.area_per_metre_mm2 * width / 1000.0;
            code.phi.flexure * nominal_moment_knm(provided_mm2, width, depth, materials, code)
        }
        None => flexure.max_design_moment_knm,
    };
    let mut flexure_check = DesignCheck::new(flexure.moment_demand_knm, provided_capacity);
    flexure_check.passes = flexure.passes && reinforcement.passes;

    let (face_low, face_high) = geometry.column_faces_mm(direction);
    let cantilever = if moment_strip.face_position_mm <= face_low {
        face_low
    } else {
        geometry.span_mm(direction) - face_high
    };
    let development = development_length(bar, cantilever - materials.cover_mm, materials, code);
    let one_way_shear = check_one_way_shear(shear_strip, width, materials, code);

    Ok(DirectionDesign {
        direction,
        effective_depth_mm: depth,
        strip_width_mm: width,
        moment_combination: moment_strip.combination.clone(),
        flexure,
        reinforcement,
        flexure_check,
        development,
        one_way_shear,
        diagram: moment_strip.diagram.clone(),
    })
}

/// Run the complete design check.
///
/// # Arguments
/// * `input` - Footing geometry, materials, loads and overburden
/// * `code` - Code tables, normally [`crate::code::ACI_318M_25`]
///
/// # Returns
/// * `Ok(DesignResult)` - Design completed (check `passes` for the outcome)
/// * `Err(CalcError)` - Invalid input, infeasible geometry or solver failure
pub fn calculate(input: &PadFootingInput, code: &DesignCode) -> CalcResult<DesignResult> {
    let span = tracing::info_span!("pad_footing", label = %input.label);
    let _guard = span.enter();

    let mut advisories = input.validate(code)?;
    let geometry = &input.geometry;
    let depths = EffectiveDepths::compute(geometry, &input.materials, code)?;

    // Service stage
    let (bearing, mut combinations) = bearing_check(
        geometry,
        &input.overburden,
        &input.loads,
        input.allowable_bearing_kn_m2,
        &input.settings,
        code,
    )?;

    // Ultimate stage
    let ultimate = generate_combinations(&input.loads, &code.ultimate_combinations)?;
    let perimeter = critical_perimeter(geometry, depths.average_mm());
    let overburden_pressure = input.overburden.pressure_kn_m2(geometry);
    let mut stages = Vec::with_capacity(ultimate.len());

    for combination in &ultimate {
        let field = combination_pressure(combination, geometry, &input.overburden, &input.settings)?;
        combinations.push(summarize(combination, geometry, &field));

        let net_overburden = combination.dead_factor * overburden_pressure;
        let column_load = combination.actions.axial_kn;
        let strip_x = analyze_strip(
            &field,
            geometry,
            Direction::X,
            net_overburden,
            column_load,
            depths.x_mm,
            input.settings.strip_samples,
        )?;
        let strip_y = analyze_strip(
            &field,
            geometry,
            Direction::Y,
            net_overburden,
            column_load,
            depths.y_mm,
            input.settings.strip_samples,
        )?;
        let punching = punching_demand(&field, &perimeter, net_overburden, column_load, input.settings.pressure_grid);
        stages.push(UltimateStage {
            strips: [strip_x, strip_y],
            punching,
        });
    }

    let x = design_direction(Direction::X, &stages, input, &depths, code)?;
    let y = design_direction(Direction::Y, &stages, input, &depths, code)?;

    let punching_governing = stages
        .iter()
        .map(|stage| &stage.punching)
        .max_by(|a, b| a.shear_kn.total_cmp(&b.shear_kn))
        .ok_or_else(|| CalcError::configuration("no ultimate combinations apply"))?;
    let punching = check_punching_shear(
        punching_governing,
        &perimeter,
        depths.average_mm(),
        geometry.column_aspect_ratio(),
        &input.materials,
        code,
    );

    for design in [&x, &y] {
        if !design.development.adequate {
            advisories.push(format!(
                "{} bars: development length {:.0} mm exceeds available {:.0} mm",
                design.direction, design.development.required_mm, design.development.available_mm
            ));
        }
    }
    for advisory in &advisories {
        tracing::warn!(advisory = %advisory, "design advisory");
    }

    let passes = bearing.check.passes && x.passes() && y.passes() && punching.check.passes;
    let result = DesignResult {
        label: input.label.clone(),
        design_code: code.edition.clone(),
        self_weight_kn: input.overburden.self_weight_kn(geometry),
        surcharge_kn: input.overburden.surcharge_kn(geometry),
        effective_depths: depths,
        combinations,
        bearing,
        x,
        y,
        punching,
        advisories,
        passes,
    };

    for name in result.failed_checks() {
        tracing::warn!(check = name, "design check failed");
    }
    tracing::info!(
        passes = result.passes,
        governing = result.governing_condition(),
        governing_ratio = result.governing_ratio(),
        "footing design complete"
    );
    Ok(result)
}
