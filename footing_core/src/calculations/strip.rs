//! # Strip Method Internal Forces
//!
//! The footing is treated as two cantilevers projecting from the column
//! faces, loaded upward by the net soil pressure. For each direction the net
//! pressure is integrated across the full footing width to a line load
//! `w(s)`, then integrated along the span to shear and moment:
//!
//! ```text
//! V(s) = integral_0^s w dt        M(s) = integral_0^s V dt
//! ```
//!
//! Moments are taken at the column faces and one-way shears at distance `d`
//! from them. This module also builds the two-way (punching) critical
//! section at `d/2` around the column, clipped to the footing plan.
//!
//! Net pressure is the gross contact pressure less the uniform self-weight
//! and surcharge pressure factored with the combination's dead factor.

use serde::{Deserialize, Serialize};

use super::pressure::PressureField;
use crate::code::aci_ref;
use crate::errors::{CalcError, CalcResult};
use crate::geometry::{Direction, FoundationGeometry};
use crate::numeric::{interpolate, linspace};

/// Internal force diagram along one direction (positions in mm from the
/// plan origin, forces for the full strip width)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StripDiagram {
    pub positions_mm: Vec<f64>,
    /// Net upward soil line load less the column load (kN/m)
    pub line_load_kn_m: Vec<f64>,
    pub shear_kn: Vec<f64>,
    pub moment_knm: Vec<f64>,
}

impl StripDiagram {
    /// Shear diagram as (position mm, kN) pairs for plotting
    pub fn shear_diagram(&self) -> Vec<(f64, f64)> {
        self.positions_mm.iter().copied().zip(self.shear_kn.iter().copied()).collect()
    }

    /// Moment diagram as (position mm, kNm) pairs for plotting
    pub fn moment_diagram(&self) -> Vec<(f64, f64)> {
        self.positions_mm.iter().copied().zip(self.moment_knm.iter().copied()).collect()
    }

    /// Shear at a position (mm), interpolated between samples
    pub fn shear_at(&self, position_mm: f64) -> f64 {
        interpolate(&self.positions_mm, &self.shear_kn, position_mm)
    }

    /// Moment at a position (mm), interpolated between samples
    pub fn moment_at(&self, position_mm: f64) -> f64 {
        interpolate(&self.positions_mm, &self.moment_knm, position_mm)
    }
}

/// Strip forces for one direction and one combination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StripResult {
    pub combination: String,
    pub direction: Direction,
    pub effective_depth_mm: f64,
    /// Larger sagging moment of the two cantilevers at the column faces (kNm)
    pub face_moment_knm: f64,
    pub face_position_mm: f64,
    /// Larger of the two cantilever shears at distance d from the faces (kN).
    /// Zero when both sections fall outside the footing.
    pub shear_at_d_kn: f64,
    pub shear_section_position_mm: f64,
    pub diagram: StripDiagram,
}

/// Analyze one direction of the footing for a pressure field.
///
/// `overburden_kn_m2` is the factored uniform pressure from self-weight and
/// surcharge, `column_load_kn` the factored column axial force.
pub fn analyze_strip(
    field: &PressureField,
    geometry: &FoundationGeometry,
    direction: Direction,
    overburden_kn_m2: f64,
    column_load_kn: f64,
    effective_depth_mm: f64,
    samples: usize,
) -> CalcResult<StripResult> {
    if samples < 2 {
        return Err(CalcError::invalid_input(
            "strip_samples",
            samples.to_string(),
            "At least two sample points are required",
        ));
    }

    let span = geometry.span_mm(direction) / 1000.0;
    let strip_width = geometry.strip_width_mm(direction) / 1000.0;
    let (face_low_mm, face_high_mm) = geometry.column_faces_mm(direction);
    let face_low = face_low_mm / 1000.0;
    let face_high = face_high_mm / 1000.0;
    let column_size = face_high - face_low;
    let d = effective_depth_mm / 1000.0;
    let section_low = face_low - d;
    let section_high = face_high + d;

    let positions = sample_positions(span, samples, &[face_low, face_high, section_low, section_high]);
    let soil_load: Vec<f64> = positions
        .iter()
        .map(|&s| field.line_load(direction, s) - overburden_kn_m2 * strip_width)
        .collect();

    // Cumulative soil-only shear and moment from the s = 0 edge
    let count = positions.len();
    let mut soil_shear = vec![0.0; count];
    let mut soil_moment = vec![0.0; count];
    for i in 1..count {
        let ds = positions[i] - positions[i - 1];
        soil_shear[i] = soil_shear[i - 1] + 0.5 * (soil_load[i - 1] + soil_load[i]) * ds;
        soil_moment[i] = soil_moment[i - 1] + 0.5 * (soil_shear[i - 1] + soil_shear[i]) * ds;
    }
    let total_shear = soil_shear[count - 1];
    let total_moment = soil_moment[count - 1];
    let index_of = |s: f64| nearest_index(&positions, s);

    // Low-side cantilever
    let low_face = index_of(face_low);
    let moment_low = soil_moment[low_face];
    let shear_low = if section_low > 0.0 {
        soil_shear[index_of(section_low)]
    } else {
        0.0
    };

    // High-side cantilever, integrated back from the far edge
    let high_face = index_of(face_high);
    let moment_high =
        total_shear * (span - positions[high_face]) - (total_moment - soil_moment[high_face]);
    let shear_high = if section_high < span {
        total_shear - soil_shear[index_of(section_high)]
    } else {
        0.0
    };

    // Bottom steel: the larger sagging moment governs
    let (face_moment_knm, face_position_mm) = if moment_high > moment_low {
        (moment_high, face_high_mm)
    } else {
        (moment_low, face_low_mm)
    };
    let (shear_at_d_kn, shear_section_position_mm) = if shear_high.abs() > shear_low.abs() {
        (shear_high, section_high * 1000.0)
    } else {
        (shear_low, section_low * 1000.0)
    };

    // Column load spread over the column width closes the diagram
    let column_intensity = if column_size > 0.0 {
        column_load_kn / column_size
    } else {
        0.0
    };
    let mut diagram = StripDiagram {
        positions_mm: Vec::with_capacity(count),
        line_load_kn_m: Vec::with_capacity(count),
        shear_kn: Vec::with_capacity(count),
        moment_knm: Vec::with_capacity(count),
    };
    for (i, &s) in positions.iter().enumerate() {
        let inside = (s - face_low).clamp(0.0, column_size);
        let column_shear = column_intensity * inside;
        let column_moment = if s <= face_high {
            0.5 * column_intensity * inside * inside
        } else {
            column_intensity * column_size * (column_size / 2.0 + (s - face_high))
        };
        let column_line_load = if s > face_low && s < face_high {
            column_intensity
        } else {
            0.0
        };
        diagram.positions_mm.push(s * 1000.0);
        diagram.line_load_kn_m.push(soil_load[i] - column_line_load);
        diagram.shear_kn.push(soil_shear[i] - column_shear);
        diagram.moment_knm.push(soil_moment[i] - column_moment);
    }

    tracing::debug!(
        combination = %field.combination,
        direction = %direction,
        face_moment_knm,
        shear_at_d_kn,
        reference = aci_ref::FOOTING_MOMENT,
        "strip forces"
    );

    Ok(StripResult {
        combination: field.combination.clone(),
        direction,
        effective_depth_mm,
        face_moment_knm,
        face_position_mm,
        shear_at_d_kn,
        shear_section_position_mm,
        diagram,
    })
}

/// Evenly spaced samples plus the critical stations that fall inside the span
fn sample_positions(span: f64, samples: usize, critical: &[f64]) -> Vec<f64> {
    let mut positions = linspace(0.0, span, samples);
    positions.extend(critical.iter().copied().filter(|&s| s > 0.0 && s < span));
    positions.sort_by(|a, b| a.total_cmp(b));
    let epsilon = span * 1e-9;
    positions.dedup_by(|a, b| (*a - *b).abs() < epsilon);
    positions
}

fn nearest_index(positions: &[f64], s: f64) -> usize {
    let upper = positions.partition_point(|&p| p < s).min(positions.len() - 1);
    if upper > 0 && (s - positions[upper - 1]).abs() < (positions[upper] - s).abs() {
        upper - 1
    } else {
        upper
    }
}

/// Where the column sits relative to the footing edges, for the two-way
/// shear location factor alpha_s
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnLocation {
    /// Critical section complete on four sides
    Interior,
    /// Critical section cut by one edge, or by two opposite edges
    Edge,
    /// Critical section cut by edges in both directions
    Corner,
}

impl ColumnLocation {
    pub fn display_name(&self) -> &'static str {
        match self {
            ColumnLocation::Interior => "Interior",
            ColumnLocation::Edge => "Edge",
            ColumnLocation::Corner => "Corner",
        }
    }
}

/// Two-way shear critical section at d/2 from the column faces
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriticalPerimeter {
    pub location: ColumnLocation,
    /// Offset from the column faces (mm)
    pub offset_mm: f64,
    /// Clipped section bounds (mm from origin)
    pub x0_mm: f64,
    pub x1_mm: f64,
    pub y0_mm: f64,
    pub y1_mm: f64,
    /// Length of the sides that lie inside the footing (mm)
    pub perimeter_mm: f64,
}

impl CriticalPerimeter {
    /// Area enclosed by the clipped section (m2)
    pub fn enclosed_area_m2(&self) -> f64 {
        (self.x1_mm - self.x0_mm) * (self.y1_mm - self.y0_mm) / 1.0e6
    }
}

/// Build the two-way critical section for an average effective depth.
///
/// Sides that would fall outside the plan are clipped to the footing edge
/// and do not count toward the perimeter.
pub fn critical_perimeter(geometry: &FoundationGeometry, average_depth_mm: f64) -> CriticalPerimeter {
    let offset = average_depth_mm / 2.0;
    let (cx0, cx1) = geometry.column_faces_mm(Direction::X);
    let (cy0, cy1) = geometry.column_faces_mm(Direction::Y);

    let left_cut = cx0 - offset <= 0.0;
    let right_cut = cx1 + offset >= geometry.length_mm;
    let bottom_cut = cy0 - offset <= 0.0;
    let top_cut = cy1 + offset >= geometry.width_mm;

    let x0 = (cx0 - offset).max(0.0);
    let x1 = (cx1 + offset).min(geometry.length_mm);
    let y0 = (cy0 - offset).max(0.0);
    let y1 = (cy1 + offset).min(geometry.width_mm);

    let mut perimeter = 0.0;
    if !left_cut {
        perimeter += y1 - y0;
    }
    if !right_cut {
        perimeter += y1 - y0;
    }
    if !bottom_cut {
        perimeter += x1 - x0;
    }
    if !top_cut {
        perimeter += x1 - x0;
    }

    let x_cut = left_cut || right_cut;
    let y_cut = bottom_cut || top_cut;
    let location = match (x_cut, y_cut) {
        (false, false) => ColumnLocation::Interior,
        (true, true) => ColumnLocation::Corner,
        _ => ColumnLocation::Edge,
    };

    CriticalPerimeter {
        location,
        offset_mm: offset,
        x0_mm: x0,
        x1_mm: x1,
        y0_mm: y0,
        y1_mm: y1,
        perimeter_mm: perimeter,
    }
}

/// Two-way shear demand for one combination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PunchingDemand {
    pub combination: String,
    pub column_load_kn: f64,
    /// Net soil reaction inside the critical section (kN)
    pub reaction_inside_kn: f64,
    /// Vu = column load - reaction inside (kN)
    pub shear_kn: f64,
}

/// Net shear transferred through the critical section
pub fn punching_demand(
    field: &PressureField,
    perimeter: &CriticalPerimeter,
    overburden_kn_m2: f64,
    column_load_kn: f64,
    subdivisions: usize,
) -> PunchingDemand {
    let gross = field.resultant_over(
        perimeter.x0_mm / 1000.0,
        perimeter.x1_mm / 1000.0,
        perimeter.y0_mm / 1000.0,
        perimeter.y1_mm / 1000.0,
        subdivisions,
    );
    let reaction_inside_kn = gross - overburden_kn_m2 * perimeter.enclosed_area_m2();
    PunchingDemand {
        combination: field.combination.clone(),
        column_load_kn,
        reaction_inside_kn,
        shear_kn: column_load_kn - reaction_inside_kn,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::pressure::solve_pressure;
    use crate::numeric::SolverSettings;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        if b.abs() < 1e-10 {
            a.abs() < tol
        } else {
            ((a - b) / b).abs() < tol
        }
    }

    /// 2.5 m square, 400 mm column, column load only (no overburden)
    fn uniform_case(column_load: f64) -> (FoundationGeometry, PressureField) {
        let geometry = FoundationGeometry::new(2500.0, 2500.0, 400.0, 400.0, 400.0);
        let field = solve_pressure(&geometry, column_load, 0.0, 0.0, "U2", 100, &SolverSettings::default()).unwrap();
        (geometry, field)
    }

    #[test]
    fn test_uniform_face_moment() {
        let (geometry, field) = uniform_case(1440.0);
        let strip = analyze_strip(&field, &geometry, Direction::X, 0.0, 1440.0, 317.0, 200).unwrap();
        // q = 230.4 kN/m2, w = 576 kN/m, cantilever 1.05 m
        let expected = 576.0 * 1.05 * 1.05 / 2.0;
        assert!(approx_eq(strip.face_moment_knm, expected, 1e-9));
        // shear at d: 576 * (1.05 - 0.317)
        assert!(approx_eq(strip.shear_at_d_kn, 576.0 * 0.733, 1e-9));
        assert!(approx_eq(strip.diagram.moment_at(1050.0), expected, 1e-9));
        assert!(approx_eq(strip.diagram.shear_at(733.0), 576.0 * 0.733, 1e-9));
    }

    #[test]
    fn test_diagram_closes_to_zero() {
        let (geometry, field) = uniform_case(1440.0);
        let strip = analyze_strip(&field, &geometry, Direction::Y, 0.0, 1440.0, 301.0, 200).unwrap();
        let diagram = &strip.diagram;
        let last = diagram.positions_mm.len() - 1;
        assert!(diagram.shear_kn[last].abs() < 1e-6);
        assert!(diagram.moment_knm[last].abs() < 1e-6);
        assert_eq!(diagram.shear_diagram().len(), diagram.positions_mm.len());
    }

    #[test]
    fn test_moment_shear_load_relations() {
        let geometry = FoundationGeometry::new(3000.0, 2400.0, 500.0, 500.0, 400.0)
            .with_column_position(1400.0, 1200.0);
        let field = solve_pressure(&geometry, 1800.0, 150.0, 0.0, "U3", 100, &SolverSettings::default()).unwrap();
        let strip = analyze_strip(&field, &geometry, Direction::X, 0.0, 1800.0, 409.0, 200).unwrap();
        let d = &strip.diagram;
        let (face_low, face_high) = geometry.column_faces_mm(Direction::X);
        for i in 1..d.positions_mm.len() {
            let ds = (d.positions_mm[i] - d.positions_mm[i - 1]) / 1000.0;
            let dm = d.moment_knm[i] - d.moment_knm[i - 1];
            assert!((dm - 0.5 * (d.shear_kn[i] + d.shear_kn[i - 1]) * ds).abs() < 1e-6);

            let touches_face = [face_low, face_high]
                .iter()
                .any(|&f| (d.positions_mm[i] - f).abs() < 1e-6 || (d.positions_mm[i - 1] - f).abs() < 1e-6);
            if !touches_face {
                let dv = d.shear_kn[i] - d.shear_kn[i - 1];
                assert!((dv - 0.5 * (d.line_load_kn_m[i] + d.line_load_kn_m[i - 1]) * ds).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_eccentric_column_governs_long_side() {
        let geometry = FoundationGeometry::new(3000.0, 2500.0, 500.0, 400.0, 400.0)
            .with_column_position(1000.0, 1250.0);
        let field = solve_pressure(&geometry, 1000.0, 0.0, 0.0, "T", 100, &SolverSettings::default()).unwrap();
        let strip = analyze_strip(&field, &geometry, Direction::X, 0.0, 1000.0, 409.0, 200).unwrap();
        assert_eq!(strip.face_position_mm, 1200.0);
        // q = 1000 / 7.5, w = q * 2.5 = 333.3 kN/m, long cantilever 1.8 m
        let w = 1000.0 / 7.5 * 2.5;
        assert!(approx_eq(strip.face_moment_knm, w * 1.8 * 1.8 / 2.0, 1e-9));
    }

    #[test]
    fn test_sagging_face_governs_over_hogging() {
        // Long cantilever sits under light pressure and heavy overburden
        let geometry = FoundationGeometry::new(3000.0, 2500.0, 500.0, 400.0, 400.0)
            .with_column_position(1000.0, 1250.0);
        let field = solve_pressure(&geometry, 1000.0, -450.0, 0.0, "T", 100, &SolverSettings::default()).unwrap();
        let strip = analyze_strip(&field, &geometry, Direction::X, 100.0, 1000.0, 409.0, 200).unwrap();
        // q = 253.33 - 80 s; short side: 2.5 * (153.33 * 0.8^2 / 2 - 80 * 0.8^3 / 6) = 105.6
        // long side hogs at about -156.6
        assert_eq!(strip.face_position_mm, 800.0);
        assert!(strip.face_moment_knm > 0.0);
        assert!(approx_eq(strip.face_moment_knm, 105.6, 1e-3));
    }

    #[test]
    fn test_shear_section_outside_plan_is_zero() {
        let geometry = FoundationGeometry::new(1200.0, 1200.0, 600.0, 400.0, 400.0);
        let field = solve_pressure(&geometry, 500.0, 0.0, 0.0, "T", 100, &SolverSettings::default()).unwrap();
        let strip = analyze_strip(&field, &geometry, Direction::X, 0.0, 500.0, 517.0, 200).unwrap();
        assert_eq!(strip.shear_at_d_kn, 0.0);
        assert!(strip.face_moment_knm > 0.0);
    }

    #[test]
    fn test_too_few_samples_rejected() {
        let (geometry, field) = uniform_case(1000.0);
        assert!(analyze_strip(&field, &geometry, Direction::X, 0.0, 1000.0, 317.0, 1).is_err());
    }

    #[test]
    fn test_interior_perimeter() {
        let geometry = FoundationGeometry::new(2500.0, 2500.0, 400.0, 400.0, 400.0);
        let perimeter = critical_perimeter(&geometry, 309.0);
        assert_eq!(perimeter.location, ColumnLocation::Interior);
        assert!(approx_eq(perimeter.perimeter_mm, 4.0 * 709.0, 1e-12));
        assert!(approx_eq(perimeter.enclosed_area_m2(), 0.709 * 0.709, 1e-12));
    }

    #[test]
    fn test_edge_perimeter() {
        let geometry = FoundationGeometry::new(2500.0, 2500.0, 400.0, 400.0, 400.0)
            .with_column_position(300.0, 1250.0);
        let perimeter = critical_perimeter(&geometry, 309.0);
        assert_eq!(perimeter.location, ColumnLocation::Edge);
        // x from 0 to 654.5, y from 895.5 to 1604.5; left side lost
        assert!(approx_eq(perimeter.perimeter_mm, 709.0 + 2.0 * 654.5, 1e-12));
    }

    #[test]
    fn test_corner_perimeter() {
        let geometry = FoundationGeometry::new(2500.0, 2500.0, 400.0, 400.0, 400.0)
            .with_column_position(250.0, 250.0);
        let perimeter = critical_perimeter(&geometry, 309.0);
        assert_eq!(perimeter.location, ColumnLocation::Corner);
        assert!(approx_eq(perimeter.perimeter_mm, 2.0 * 604.5, 1e-12));
    }

    #[test]
    fn test_punching_demand_uniform() {
        let (geometry, field) = uniform_case(1440.0);
        let perimeter = critical_perimeter(&geometry, 309.0);
        let demand = punching_demand(&field, &perimeter, 0.0, 1440.0, 100);
        // 1440 - 230.4 * 0.709^2
        assert!(approx_eq(demand.shear_kn, 1440.0 - 230.4 * 0.502681, 1e-9));
    }
}
