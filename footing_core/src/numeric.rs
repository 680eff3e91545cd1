//! Bounded iterative solvers and sampling helpers shared by the analysis
//! modules.

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

fn default_tolerance() -> f64 {
    1e-6
}

fn default_max_iterations() -> usize {
    50
}

/// Convergence controls for every iterative solve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverSettings {
    /// Relative change (or scaled residual) at which a solve stops
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

impl Default for SolverSettings {
    fn default() -> Self {
        SolverSettings {
            tolerance: default_tolerance(),
            max_iterations: default_max_iterations(),
        }
    }
}

/// A converged estimate and the iterations it took
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Converged {
    pub value: f64,
    pub iterations: usize,
}

/// Iterate `x = g(x)` from `initial` until the relative change falls below
/// the tolerance.
///
/// # Example
/// ```
/// use footing_core::numeric::{fixed_point, SolverSettings};
///
/// // x = cos(x)
/// let root = fixed_point("cosine", 1.0, &SolverSettings { tolerance: 1e-10, max_iterations: 200 }, f64::cos).unwrap();
/// assert!((root.value - 0.739085).abs() < 1e-6);
/// ```
pub fn fixed_point<F>(solver: &str, initial: f64, settings: &SolverSettings, g: F) -> CalcResult<Converged>
where
    F: Fn(f64) -> f64,
{
    let mut current = initial;
    for iteration in 1..=settings.max_iterations {
        let next = g(current);
        if !next.is_finite() {
            return Err(CalcError::convergence_failed(
                solver,
                iteration,
                settings.tolerance,
                current,
            ));
        }
        let scale = next.abs().max(f64::MIN_POSITIVE);
        if (next - current).abs() <= settings.tolerance * scale || next == current {
            return Ok(Converged {
                value: next,
                iterations: iteration,
            });
        }
        current = next;
    }
    Err(CalcError::convergence_failed(
        solver,
        settings.max_iterations,
        settings.tolerance,
        current,
    ))
}

/// `count` evenly spaced positions from `start` to `end` inclusive
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Linear interpolation of sampled `values` at `x`; clamps outside the range
pub fn interpolate(positions: &[f64], values: &[f64], x: f64) -> f64 {
    if positions.is_empty() {
        return 0.0;
    }
    if x <= positions[0] {
        return values[0];
    }
    let last = positions.len() - 1;
    if x >= positions[last] {
        return values[last];
    }
    let upper = positions.partition_point(|&p| p < x);
    let lower = upper - 1;
    let span = positions[upper] - positions[lower];
    if span <= 0.0 {
        return values[upper];
    }
    let t = (x - positions[lower]) / span;
    values[lower] + t * (values[upper] - values[lower])
}

/// Integral of `max(0, alpha + beta * t)` over `[t0, t1]`
///
/// Exact for the clipped linear profiles of a contact pressure field.
pub fn positive_part_integral(alpha: f64, beta: f64, t0: f64, t1: f64) -> f64 {
    if t1 <= t0 {
        return 0.0;
    }
    if beta == 0.0 {
        return alpha.max(0.0) * (t1 - t0);
    }
    let root = -alpha / beta;
    let (lo, hi) = if beta > 0.0 {
        (root.max(t0), t1)
    } else {
        (t0, root.min(t1))
    };
    if hi <= lo {
        return 0.0;
    }
    0.5 * ((alpha + beta * lo) + (alpha + beta * hi)) * (hi - lo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_point_converges() {
        // x = (x + 2/x) / 2 -> sqrt(2)
        let result = fixed_point("sqrt2", 1.0, &SolverSettings::default(), |x| (x + 2.0 / x) / 2.0).unwrap();
        assert!((result.value - 2f64.sqrt()).abs() < 1e-9);
        assert!(result.iterations < 10);
    }

    #[test]
    fn test_fixed_point_iteration_cap() {
        let settings = SolverSettings {
            tolerance: 1e-12,
            max_iterations: 5,
        };
        let err = fixed_point("drift", 0.0, &settings, |x| x + 1.0).unwrap_err();
        match err {
            CalcError::ConvergenceFailed {
                iterations,
                last_estimate,
                ..
            } => {
                assert_eq!(iterations, 5);
                assert_eq!(last_estimate, 5.0);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_fixed_point_non_finite() {
        let err = fixed_point("blowup", 1.0, &SolverSettings::default(), |_| f64::NAN).unwrap_err();
        assert_eq!(err.error_code(), "CONVERGENCE_FAILED");
    }

    #[test]
    fn test_linspace() {
        let xs = linspace(0.0, 2.0, 5);
        assert_eq!(xs, vec![0.0, 0.5, 1.0, 1.5, 2.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_interpolate() {
        let xs = [0.0, 1.0, 3.0];
        let ys = [0.0, 10.0, 30.0];
        assert_eq!(interpolate(&xs, &ys, 0.5), 5.0);
        assert_eq!(interpolate(&xs, &ys, 2.0), 20.0);
        assert_eq!(interpolate(&xs, &ys, 1.0), 10.0);
        assert_eq!(interpolate(&xs, &ys, -1.0), 0.0);
        assert_eq!(interpolate(&xs, &ys, 5.0), 30.0);
    }

    #[test]
    fn test_positive_part_integral() {
        // fully positive
        assert!((positive_part_integral(2.0, 0.0, 0.0, 3.0) - 6.0).abs() < 1e-12);
        // 1 - t on [0, 2]: triangle of area 0.5
        assert!((positive_part_integral(1.0, -1.0, 0.0, 2.0) - 0.5).abs() < 1e-12);
        // t - 1 on [0, 2]: triangle of area 0.5
        assert!((positive_part_integral(-1.0, 1.0, 0.0, 2.0) - 0.5).abs() < 1e-12);
        // entirely negative
        assert_eq!(positive_part_integral(-1.0, -1.0, 0.0, 2.0), 0.0);
    }
}
