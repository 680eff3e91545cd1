//! # Soil Pressure Distribution
//!
//! Contact pressure under a rigid rectangular footing for one combination.
//! The soil cannot carry tension, so the field is a plane clipped at zero:
//!
//! ```text
//! p(x, y) = max(0, q0 + gx * (x - L/2) + gy * (y - B/2))
//! ```
//!
//! Three regimes:
//!
//! - **Full contact** when `|ex|/L + |ey|/B <= 1/6`: the linear formula
//!   `P/A +/- M c / I` (uniform when there is no moment).
//! - **Uniaxial partial contact** when only one eccentricity is non-zero and
//!   it exceeds the kern: closed-form triangle with contact length
//!   `3 (L/2 - e)` and peak `2P / (3 B (L/2 - e))`.
//! - **Biaxial partial contact** otherwise: the plane is found by a damped
//!   Newton iteration on vertical and moment equilibrium, integrated over a
//!   grid of plan cells.
//!
//! A resultant at or beyond the plan edge has no equilibrium and is
//! reported as [`CalcError::GeometryInfeasible`].

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::geometry::{Direction, FoundationGeometry};
use crate::numeric::{positive_part_integral, SolverSettings};

/// Shape of the contact pressure
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum DistributionKind {
    Uniform,
    /// Full contact, linearly varying
    Trapezoidal,
    /// Uniaxial eccentricity outside the kern
    Triangular {
        axis: Direction,
        contact_length_mm: f64,
    },
    /// Biaxial eccentricity outside the kern
    PartialBiaxial { contact_fraction: f64 },
}

impl DistributionKind {
    pub fn is_full_contact(&self) -> bool {
        matches!(self, DistributionKind::Uniform | DistributionKind::Trapezoidal)
    }
}

/// Gross contact pressure field for one combination (kN/m2)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PressureField {
    pub combination: String,
    pub length_m: f64,
    pub width_m: f64,
    /// Plane value at the plan centroid before clipping (kN/m2)
    pub base_kn_m2: f64,
    /// Plane slope along x (kN/m2 per m)
    pub gradient_x_kn_m3: f64,
    /// Plane slope along y (kN/m2 per m)
    pub gradient_y_kn_m3: f64,
    pub kind: DistributionKind,
    /// Total vertical load including self-weight and surcharge (kN)
    pub total_load_kn: f64,
    pub eccentricity_x_mm: f64,
    pub eccentricity_y_mm: f64,
    pub max_pressure_kn_m2: f64,
    pub min_pressure_kn_m2: f64,
    /// Newton iterations for biaxial partial contact, zero otherwise
    pub iterations: usize,
}

impl PressureField {
    fn from_plane(
        combination: &str,
        geometry: &FoundationGeometry,
        plane: (f64, f64, f64),
        kind: DistributionKind,
        total_load_kn: f64,
        eccentricity_mm: (f64, f64),
        iterations: usize,
    ) -> Self {
        let mut field = PressureField {
            combination: combination.to_string(),
            length_m: geometry.length_mm / 1000.0,
            width_m: geometry.width_mm / 1000.0,
            base_kn_m2: plane.0,
            gradient_x_kn_m3: plane.1,
            gradient_y_kn_m3: plane.2,
            kind,
            total_load_kn,
            eccentricity_x_mm: eccentricity_mm.0,
            eccentricity_y_mm: eccentricity_mm.1,
            max_pressure_kn_m2: 0.0,
            min_pressure_kn_m2: 0.0,
            iterations,
        };
        let corners = [
            (0.0, 0.0),
            (field.length_m, 0.0),
            (0.0, field.width_m),
            (field.length_m, field.width_m),
        ]
        .map(|(x, y)| field.pressure_at(x, y));
        field.max_pressure_kn_m2 = corners.iter().copied().fold(0.0, f64::max);
        field.min_pressure_kn_m2 = corners.iter().copied().fold(f64::INFINITY, f64::min);
        field
    }

    /// Pressure at a plan point measured from the origin corner (m)
    pub fn pressure_at(&self, x_m: f64, y_m: f64) -> f64 {
        let plane = self.base_kn_m2
            + self.gradient_x_kn_m3 * (x_m - self.length_m / 2.0)
            + self.gradient_y_kn_m3 * (y_m - self.width_m / 2.0);
        plane.max(0.0)
    }

    /// Pressure integrated across the footing between `from_m` and `to_m`,
    /// at station `station_m` along `direction` (kN/m)
    pub fn integral_across(&self, direction: Direction, station_m: f64, from_m: f64, to_m: f64) -> f64 {
        match direction {
            Direction::X => {
                let alpha = self.base_kn_m2
                    + self.gradient_x_kn_m3 * (station_m - self.length_m / 2.0)
                    - self.gradient_y_kn_m3 * self.width_m / 2.0;
                positive_part_integral(alpha, self.gradient_y_kn_m3, from_m, to_m)
            }
            Direction::Y => {
                let alpha = self.base_kn_m2
                    + self.gradient_y_kn_m3 * (station_m - self.width_m / 2.0)
                    - self.gradient_x_kn_m3 * self.length_m / 2.0;
                positive_part_integral(alpha, self.gradient_x_kn_m3, from_m, to_m)
            }
        }
    }

    /// Line load on a full-width strip spanning `direction` (kN/m)
    pub fn line_load(&self, direction: Direction, station_m: f64) -> f64 {
        let width = match direction {
            Direction::X => self.width_m,
            Direction::Y => self.length_m,
        };
        self.integral_across(direction, station_m, 0.0, width)
    }

    /// Resultant of the pressure over a plan rectangle (kN)
    pub fn resultant_over(&self, x0_m: f64, x1_m: f64, y0_m: f64, y1_m: f64, subdivisions: usize) -> f64 {
        if x1_m <= x0_m || y1_m <= y0_m {
            return 0.0;
        }
        let n = subdivisions.max(1);
        let dx = (x1_m - x0_m) / n as f64;
        (0..n)
            .map(|i| {
                let x = x0_m + (i as f64 + 0.5) * dx;
                self.integral_across(Direction::X, x, y0_m, y1_m) * dx
            })
            .sum()
    }

    /// Resultant over the whole plan (kN)
    pub fn total_resultant(&self, subdivisions: usize) -> f64 {
        self.resultant_over(0.0, self.length_m, 0.0, self.width_m, subdivisions)
    }
}

/// Solve the contact pressure for a total vertical load and the moments
/// about the plan centroid at the footing base.
///
/// `moment_x_knm` raises pressure toward +x, `moment_y_knm` toward +y.
pub fn solve_pressure(
    geometry: &FoundationGeometry,
    total_load_kn: f64,
    moment_x_knm: f64,
    moment_y_knm: f64,
    combination: &str,
    grid: usize,
    solver: &SolverSettings,
) -> CalcResult<PressureField> {
    let length = geometry.length_mm / 1000.0;
    let width = geometry.width_mm / 1000.0;
    let area = length * width;

    if total_load_kn == 0.0 && moment_x_knm == 0.0 && moment_y_knm == 0.0 {
        return Ok(PressureField::from_plane(
            combination,
            geometry,
            (0.0, 0.0, 0.0),
            DistributionKind::Uniform,
            0.0,
            (0.0, 0.0),
            0,
        ));
    }
    if !(total_load_kn > 0.0) {
        return Err(CalcError::geometry_infeasible(
            combination,
            format!("net vertical load {:.1} kN is not compressive", total_load_kn),
        ));
    }

    let ex = moment_x_knm / total_load_kn;
    let ey = moment_y_knm / total_load_kn;
    let ex_ratio = ex.abs() / length;
    let ey_ratio = ey.abs() / width;
    let eccentricity_mm = (ex * 1000.0, ey * 1000.0);

    if ex_ratio >= 0.5 || ey_ratio >= 0.5 {
        return Err(CalcError::geometry_infeasible(
            combination,
            format!(
                "resultant at e = ({:.0}, {:.0}) mm lies outside the {:.0} x {:.0} mm plan",
                eccentricity_mm.0, eccentricity_mm.1, geometry.length_mm, geometry.width_mm
            ),
        ));
    }

    let kern_tolerance = 1e-12;
    if ex_ratio + ey_ratio <= 1.0 / 6.0 + kern_tolerance {
        let inertia_x = width * length.powi(3) / 12.0;
        let inertia_y = length * width.powi(3) / 12.0;
        let kind = if moment_x_knm == 0.0 && moment_y_knm == 0.0 {
            DistributionKind::Uniform
        } else {
            DistributionKind::Trapezoidal
        };
        return Ok(PressureField::from_plane(
            combination,
            geometry,
            (total_load_kn / area, moment_x_knm / inertia_x, moment_y_knm / inertia_y),
            kind,
            total_load_kn,
            eccentricity_mm,
            0,
        ));
    }

    if ey_ratio <= kern_tolerance || ex_ratio <= kern_tolerance {
        let (axis, span, across, e) = if ey_ratio <= kern_tolerance {
            (Direction::X, length, width, ex)
        } else {
            (Direction::Y, width, length, ey)
        };
        let contact = 3.0 * (span / 2.0 - e.abs());
        let peak = 2.0 * total_load_kn / (across * contact);
        // Plane through zero at the contact boundary, peak at the loaded edge
        let slope = peak / contact * e.signum();
        let base = peak / contact * (contact - span / 2.0);
        let plane = match axis {
            Direction::X => (base, slope, 0.0),
            Direction::Y => (base, 0.0, slope),
        };
        return Ok(PressureField::from_plane(
            combination,
            geometry,
            plane,
            DistributionKind::Triangular {
                axis,
                contact_length_mm: contact * 1000.0,
            },
            total_load_kn,
            eccentricity_mm,
            0,
        ));
    }

    let solution = solve_no_tension(
        length,
        width,
        total_load_kn,
        moment_x_knm,
        moment_y_knm,
        combination,
        grid,
        solver,
    )?;
    Ok(PressureField::from_plane(
        combination,
        geometry,
        solution.plane,
        DistributionKind::PartialBiaxial {
            contact_fraction: solution.contact_fraction,
        },
        total_load_kn,
        eccentricity_mm,
        solution.iterations,
    ))
}

struct NoTensionSolution {
    plane: (f64, f64, f64),
    contact_fraction: f64,
    iterations: usize,
}

/// Damped Newton solve for the clipped plane carrying (P, Mx, My).
///
/// The equilibrium residual is the gradient of the convex potential
/// `sum 0.5 max(0, plane)^2 dA - theta . (P, Mx, My)`, so each step is
/// accepted only when that potential decreases.
#[allow(clippy::too_many_arguments)]
fn solve_no_tension(
    length: f64,
    width: f64,
    total_load_kn: f64,
    moment_x_knm: f64,
    moment_y_knm: f64,
    combination: &str,
    grid: usize,
    solver: &SolverSettings,
) -> CalcResult<NoTensionSolution> {
    let n = grid.max(10);
    let dx = length / n as f64;
    let dy = width / n as f64;
    let cell_area = dx * dy;
    let xs: Vec<f64> = (0..n).map(|i| -length / 2.0 + (i as f64 + 0.5) * dx).collect();
    let ys: Vec<f64> = (0..n).map(|j| -width / 2.0 + (j as f64 + 0.5) * dy).collect();
    let target = Vector3::new(total_load_kn, moment_x_knm, moment_y_knm);

    let potential = |theta: &Vector3<f64>| -> f64 {
        let mut sum = 0.0;
        for &x in &xs {
            for &y in &ys {
                let q = theta[0] + theta[1] * x + theta[2] * y;
                if q > 0.0 {
                    sum += 0.5 * q * q;
                }
            }
        }
        sum * cell_area - theta.dot(&target)
    };

    let mut theta = Vector3::new(
        total_load_kn / (length * width),
        moment_x_knm / (width * length.powi(3) / 12.0),
        moment_y_knm / (length * width.powi(3) / 12.0),
    );
    let mut residual = f64::INFINITY;

    for iteration in 1..=solver.max_iterations {
        let mut gradient = -target;
        let mut hessian = Matrix3::zeros();
        let mut contact_cells = 0usize;
        for &x in &xs {
            for &y in &ys {
                let phi = Vector3::new(1.0, x, y);
                let q = theta.dot(&phi);
                if q > 0.0 {
                    contact_cells += 1;
                    gradient += phi * (q * cell_area);
                    hessian += phi * phi.transpose() * cell_area;
                }
            }
        }

        residual = ((gradient[0] / total_load_kn).powi(2)
            + (gradient[1] / (total_load_kn * length)).powi(2)
            + (gradient[2] / (total_load_kn * width)).powi(2))
        .sqrt();
        tracing::trace!(combination, iteration, residual, contact_cells, "no-tension pressure step");

        if residual <= solver.tolerance {
            return Ok(NoTensionSolution {
                plane: (theta[0], theta[1], theta[2]),
                contact_fraction: contact_cells as f64 / (n * n) as f64,
                iterations: iteration,
            });
        }

        let step = hessian.lu().solve(&(-gradient)).ok_or_else(|| {
            CalcError::geometry_infeasible(
                combination,
                "contact region too small to resolve the pressure plane",
            )
        })?;

        let start = potential(&theta);
        let slope = gradient.dot(&step);
        let mut damping = 1.0;
        loop {
            let candidate = theta + step * damping;
            if potential(&candidate) <= start + 1e-4 * damping * slope || damping < 1e-10 {
                theta = candidate;
                break;
            }
            damping *= 0.5;
        }
    }

    Err(CalcError::convergence_failed(
        "no-tension pressure",
        solver.max_iterations,
        solver.tolerance,
        residual,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        if b.abs() < 1e-10 {
            a.abs() < tol
        } else {
            ((a - b) / b).abs() < tol
        }
    }

    fn square(side_mm: f64) -> FoundationGeometry {
        FoundationGeometry::new(side_mm, side_mm, 500.0, 400.0, 400.0)
    }

    fn solve(p: f64, mx: f64, my: f64) -> CalcResult<PressureField> {
        solve_pressure(&square(2000.0), p, mx, my, "T", 100, &SolverSettings::default())
    }

    #[test]
    fn test_uniform_pressure() {
        let field = solve(1000.0, 0.0, 0.0).unwrap();
        assert_eq!(field.kind, DistributionKind::Uniform);
        assert!(approx_eq(field.max_pressure_kn_m2, 250.0, 1e-12));
        assert!(approx_eq(field.min_pressure_kn_m2, 250.0, 1e-12));
        assert!(approx_eq(field.pressure_at(0.3, 1.7), 250.0, 1e-12));
    }

    #[test]
    fn test_trapezoidal_pressure() {
        // e = 0.1 m, I = 2 * 8 / 12, gx = 75 kN/m3
        let field = solve(1000.0, 100.0, 0.0).unwrap();
        assert_eq!(field.kind, DistributionKind::Trapezoidal);
        assert!(approx_eq(field.max_pressure_kn_m2, 325.0, 1e-9));
        assert!(approx_eq(field.min_pressure_kn_m2, 175.0, 1e-9));
        assert!(field.pressure_at(2.0, 1.0) > field.pressure_at(0.0, 1.0));
        assert!(approx_eq(field.eccentricity_x_mm, 100.0, 1e-9));
    }

    #[test]
    fn test_kern_boundary_is_full_contact() {
        let field = solve(1000.0, 1000.0 * 2.0 / 6.0, 0.0).unwrap();
        assert!(field.kind.is_full_contact());
        assert!(field.min_pressure_kn_m2.abs() < 1e-9);
        assert!(approx_eq(field.max_pressure_kn_m2, 500.0, 1e-9));
    }

    #[test]
    fn test_triangular_partial_contact() {
        // e = 0.5 m: contact = 3 * (1 - 0.5) = 1.5 m, peak = 2000 / (3 * 2 * 0.5)
        let field = solve(1000.0, 500.0, 0.0).unwrap();
        match field.kind {
            DistributionKind::Triangular {
                axis,
                contact_length_mm,
            } => {
                assert_eq!(axis, Direction::X);
                assert!(approx_eq(contact_length_mm, 1500.0, 1e-9));
            }
            other => panic!("expected triangular, got {:?}", other),
        }
        assert!(approx_eq(field.max_pressure_kn_m2, 2000.0 / 3.0, 1e-9));
        assert_eq!(field.pressure_at(0.4, 1.0), 0.0);
        assert!(approx_eq(field.total_resultant(400), 1000.0, 1e-3));
    }

    #[test]
    fn test_triangular_negative_eccentricity_mirrors() {
        let positive = solve(1000.0, 0.0, 500.0).unwrap();
        let negative = solve(1000.0, 0.0, -500.0).unwrap();
        assert!(approx_eq(positive.pressure_at(1.0, 1.9), negative.pressure_at(1.0, 0.1), 1e-9));
    }

    #[test]
    fn test_continuity_across_kern_boundary() {
        let inside = solve(1000.0, 1000.0 * (2.0 / 6.0 - 1e-9), 0.0).unwrap();
        let outside = solve(1000.0, 1000.0 * (2.0 / 6.0 + 1e-9), 0.0).unwrap();
        assert!(approx_eq(inside.max_pressure_kn_m2, outside.max_pressure_kn_m2, 1e-6));
    }

    #[test]
    fn test_biaxial_partial_contact_equilibrium() {
        let field = solve(1000.0, 250.0, 250.0).unwrap();
        assert!(matches!(field.kind, DistributionKind::PartialBiaxial { .. }));
        assert_eq!(field.min_pressure_kn_m2, 0.0);
        // linear formula would give 625 at the corner; losing contact raises it
        assert!(field.max_pressure_kn_m2 > 625.0);
        assert!(approx_eq(field.total_resultant(400), 1000.0, 0.01));
        assert!(approx_eq(field.pressure_at(1.8, 0.5), field.pressure_at(0.5, 1.8), 1e-6));
    }

    #[test]
    fn test_newton_matches_closed_form_uniaxial() {
        let solution = solve_no_tension(2.0, 2.0, 1000.0, 500.0, 0.0, "T", 100, &SolverSettings::default()).unwrap();
        let (base, gx, gy) = solution.plane;
        let peak = base + gx * 1.0;
        assert!(approx_eq(peak, 2000.0 / 3.0, 0.02));
        assert!(gy.abs() < 1e-6);
        assert!(approx_eq(solution.contact_fraction, 0.75, 0.02));
    }

    #[test]
    fn test_resultant_outside_plan_is_infeasible() {
        let err = solve(1000.0, 1000.0, 0.0).unwrap_err();
        assert_eq!(err.error_code(), "GEOMETRY_INFEASIBLE");
    }

    #[test]
    fn test_uplift_is_infeasible() {
        let err = solve(-10.0, 0.0, 0.0).unwrap_err();
        assert!(matches!(err, CalcError::GeometryInfeasible { .. }));
    }

    #[test]
    fn test_zero_load() {
        let field = solve(0.0, 0.0, 0.0).unwrap();
        assert_eq!(field.max_pressure_kn_m2, 0.0);
        assert_eq!(field.line_load(Direction::X, 1.0), 0.0);
    }

    #[test]
    fn test_line_load_uniform() {
        let field = solve(1000.0, 0.0, 0.0).unwrap();
        assert!(approx_eq(field.line_load(Direction::X, 0.5), 500.0, 1e-12));
        assert!(approx_eq(field.line_load(Direction::Y, 1.5), 500.0, 1e-12));
    }
}
