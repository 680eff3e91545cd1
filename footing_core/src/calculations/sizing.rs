//! # Plan Sizing
//!
//! Smallest square plan, on a 50 mm module, whose governing service
//! pressure stays within the allowable bearing pressure. Thickness, column
//! and overburden come from the input; the column is centred.

use serde::{Deserialize, Serialize};

use super::pad_footing::{bearing_check, BearingCheck, PadFootingInput};
use crate::code::DesignCode;
use crate::errors::{CalcError, CalcResult};
use crate::geometry::FoundationGeometry;
use crate::loads::generate_combinations;

/// Plan dimensions are rounded to this module (mm)
pub const PLAN_MODULE_MM: f64 = 50.0;

/// Maximum number of module steps tried past the starting size
pub const MAX_SIZING_STEPS: usize = 400;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSize {
    pub side_mm: f64,
    pub area_m2: f64,
    /// Bearing check at the selected size
    pub bearing: BearingCheck,
    /// Number of sizes tried
    pub iterations: usize,
}

impl PlanSize {
    /// The sized plan applied to a footing, column centred as it was sized
    pub fn apply_to(&self, geometry: &FoundationGeometry) -> FoundationGeometry {
        geometry.centred().with_plan(self.side_mm, self.side_mm)
    }
}

fn round_up_to_module(value_mm: f64) -> f64 {
    (value_mm / PLAN_MODULE_MM).ceil() * PLAN_MODULE_MM
}

/// Size a square plan for bearing.
///
/// The search starts at sqrt(P / (q_allow - q_overburden)) for the largest
/// service axial load and grows one module at a time. Sizes too small to
/// keep the resultant inside the footprint are skipped.
pub fn size_square_plan(input: &PadFootingInput, code: &DesignCode) -> CalcResult<PlanSize> {
    let span = tracing::info_span!("size_square_plan", label = %input.label);
    let _guard = span.enter();

    input.loads.validate()?;
    input.overburden.validate()?;
    input.settings.validate()?;

    let mut geometry = input.geometry.centred();

    let overburden_pressure = input.overburden.pressure_kn_m2(&geometry);
    let available = input.allowable_bearing_kn_m2 - overburden_pressure;
    if !(available > 0.0) {
        return Err(CalcError::invalid_input(
            "allowable_bearing_kn_m2",
            input.allowable_bearing_kn_m2.to_string(),
            format!(
                "Allowable bearing must exceed the overburden pressure of {:.1} kN/m2",
                overburden_pressure
            ),
        ));
    }

    let service = generate_combinations(&input.loads, &code.service_combinations)?;
    let max_axial = service
        .iter()
        .map(|c| c.actions.axial_kn)
        .fold(0.0, f64::max);
    let column = geometry.column_length_mm.max(geometry.column_width_mm);
    let mut side = round_up_to_module((max_axial / available).sqrt() * 1000.0).max(round_up_to_module(column));

    for step in 1..=MAX_SIZING_STEPS {
        geometry = geometry.with_plan(side, side);
        geometry.validate()?;

        match bearing_check(
            &geometry,
            &input.overburden,
            &input.loads,
            input.allowable_bearing_kn_m2,
            &input.settings,
            code,
        ) {
            Ok((bearing, _)) if bearing.check.passes => {
                tracing::info!(side_mm = side, iterations = step, "plan sized");
                return Ok(PlanSize {
                    side_mm: side,
                    area_m2: geometry.area_m2(),
                    bearing,
                    iterations: step,
                });
            }
            Ok((bearing, _)) => {
                tracing::trace!(side_mm = side, max_pressure_kn_m2 = bearing.max_pressure_kn_m2, "plan too small");
            }
            Err(CalcError::GeometryInfeasible { .. }) => {
                tracing::trace!(side_mm = side, "resultant outside plan");
            }
            Err(e) => return Err(e),
        }
        side += PLAN_MODULE_MM;
    }

    Err(CalcError::convergence_failed(
        "plan sizing",
        MAX_SIZING_STEPS,
        PLAN_MODULE_MM,
        side,
    ))
}
