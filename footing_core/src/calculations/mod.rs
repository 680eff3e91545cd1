//! # Foundation Calculations
//!
//! Each stage of the footing pipeline is a pure function of its inputs:
//!
//! - [`pressure`] - Contact pressure for one combination
//! - [`strip`] - Strip-method shear and moment, punching critical section
//! - [`flexure`] - Stress-block steel design
//! - [`shear`] - One-way and two-way shear capacity
//! - [`reinforcement`] - Bar spacing and development length
//! - [`pad_footing`] - `PadFootingInput` / `DesignResult` / `calculate()`
//! - [`sizing`] - Square plan auto-sizing for bearing
//!
//! All inputs and results serialize to JSON.

pub mod flexure;
pub mod pad_footing;
pub mod pressure;
pub mod reinforcement;
pub mod shear;
pub mod sizing;
pub mod strip;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use pad_footing::{calculate, AnalysisSettings, DesignResult, PadFootingInput};
pub use pressure::{solve_pressure, DistributionKind, PressureField};
pub use sizing::{size_square_plan, PlanSize};
pub use strip::{ColumnLocation, CriticalPerimeter, StripDiagram};

/// Demand against capacity for one design check.
///
/// A failing check is a normal outcome, reported through `passes` and the
/// demand/capacity `ratio`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DesignCheck {
    pub demand: f64,
    pub capacity: f64,
    /// demand / capacity
    pub ratio: f64,
    pub passes: bool,
}

impl DesignCheck {
    pub fn new(demand: f64, capacity: f64) -> Self {
        let ratio = if capacity > 0.0 {
            demand / capacity
        } else if demand > 0.0 {
            f64::MAX
        } else {
            0.0
        };
        DesignCheck {
            demand,
            capacity,
            ratio,
            passes: demand <= capacity,
        }
    }
}
