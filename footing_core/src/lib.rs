//! # footing_core - Pad Footing Analysis and Design Engine
//!
//! `footing_core` checks isolated rectangular pad footings under a single
//! column to ACI 318M-25. All inputs and outputs are JSON-serializable, so
//! the engine can sit behind a CLI, a web service or a batch job.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Failing is not an error**: A footing that does not work is a result
//!   with `passes == false`
//!
//! ## Quick Start
//!
//! ```rust
//! use footing_core::{calculate, PadFootingInput, ACI_318M_25};
//! use footing_core::geometry::{FoundationGeometry, SoilOverburden};
//! use footing_core::loads::{ColumnActions, ServiceLoads};
//! use footing_core::materials::MaterialProperties;
//!
//! let input = PadFootingInput {
//!     label: "F1".to_string(),
//!     geometry: FoundationGeometry::new(3800.0, 3800.0, 500.0, 500.0, 500.0),
//!     materials: MaterialProperties::new(40.0, 420.0),
//!     loads: ServiceLoads::new(ColumnActions::axial(1200.0), ColumnActions::axial(600.0)),
//!     overburden: SoilOverburden::with_soil_depth(700.0),
//!     allowable_bearing_kn_m2: 150.0,
//!     settings: Default::default(),
//! };
//!
//! let result = calculate(&input, &ACI_318M_25).unwrap();
//! assert!(result.passes);
//!
//! let json = serde_json::to_string_pretty(&result).unwrap();
//! assert!(json.contains("\"punching\""));
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Pressure, strip forces, flexure, shear, bars, pipeline
//! - [`code`] - Code tables, built-in ACI 318M-25 edition
//! - [`loads`] - Service loads and load combinations
//! - [`materials`] - Concrete, steel and bar sizes
//! - [`geometry`] - Plan, column, overburden and effective depths
//! - [`numeric`] - Bounded iterative solvers
//! - [`batch`] - Parallel evaluation of many footings
//! - [`errors`] - Structured error types

pub mod batch;
pub mod calculations;
pub mod code;
pub mod errors;
pub mod geometry;
pub mod loads;
pub mod materials;
pub mod numeric;

// Re-export commonly used types at crate root for convenience
pub use batch::{analyze_batch, BatchSummary};
pub use calculations::{calculate, size_square_plan, DesignCheck, DesignResult, PadFootingInput};
pub use code::{DesignCode, ACI_318M_25};
pub use errors::{CalcError, CalcResult};
