//! # Batch Evaluation
//!
//! Independent footings share nothing but the read-only code tables, so a
//! batch is a plain `par_iter` over the inputs. Results come back in input
//! order.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::calculations::pad_footing::{calculate, DesignResult, PadFootingInput};
use crate::code::DesignCode;
use crate::errors::{CalcError, CalcResult};

/// Run the design check for every input in parallel.
pub fn analyze_batch(inputs: &[PadFootingInput], code: &DesignCode) -> Vec<CalcResult<DesignResult>> {
    tracing::debug!(count = inputs.len(), "batch analysis");
    inputs.par_iter().map(|input| calculate(input, code)).collect()
}

/// One line of a batch report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub label: String,
    pub passes: bool,
    /// Highest demand/capacity ratio; `None` when the analysis errored
    pub governing_ratio: Option<f64>,
    pub governing_condition: Option<String>,
    pub error: Option<CalcError>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    pub entries: Vec<BatchEntry>,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
}

impl BatchSummary {
    pub fn from_results(inputs: &[PadFootingInput], results: &[CalcResult<DesignResult>]) -> Self {
        let mut summary = BatchSummary::default();
        for (input, result) in inputs.iter().zip(results) {
            let entry = match result {
                Ok(design) => {
                    if design.passes {
                        summary.passed += 1;
                    } else {
                        summary.failed += 1;
                    }
                    BatchEntry {
                        label: design.label.clone(),
                        passes: design.passes,
                        governing_ratio: Some(design.governing_ratio()),
                        governing_condition: Some(design.governing_condition().to_string()),
                        error: None,
                    }
                }
                Err(e) => {
                    summary.errored += 1;
                    BatchEntry {
                        label: input.label.clone(),
                        passes: false,
                        governing_ratio: None,
                        governing_condition: None,
                        error: Some(e.clone()),
                    }
                }
            };
            summary.entries.push(entry);
        }
        summary
    }

    pub fn all_pass(&self) -> bool {
        self.failed == 0 && self.errored == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::ACI_318M_25;
    use crate::geometry::{FoundationGeometry, SoilOverburden};
    use crate::loads::{ColumnActions, ServiceLoads};
    use crate::materials::MaterialProperties;

    fn footing(label: &str, dead: f64, allowable: f64) -> PadFootingInput {
        PadFootingInput {
            label: label.to_string(),
            geometry: FoundationGeometry::new(2500.0, 2500.0, 400.0, 400.0, 400.0),
            materials: MaterialProperties::new(40.0, 420.0),
            loads: ServiceLoads::new(ColumnActions::axial(dead), ColumnActions::axial(300.0)),
            overburden: SoilOverburden::with_soil_depth(700.0),
            allowable_bearing_kn_m2: allowable,
            settings: Default::default(),
        }
    }

    #[test]
    fn test_batch_matches_sequential() {
        let inputs = vec![
            footing("F1", 800.0, 200.0),
            footing("F2", 600.0, 200.0),
            footing("F3", 800.0, 150.0),
        ];
        let results = analyze_batch(&inputs, &ACI_318M_25);
        assert_eq!(results.len(), 3);
        for (input, result) in inputs.iter().zip(&results) {
            let sequential = calculate(input, &ACI_318M_25).unwrap();
            assert_eq!(result.as_ref().unwrap(), &sequential);
        }
    }

    #[test]
    fn test_summary_counts() {
        let inputs = vec![
            footing("ok", 800.0, 200.0),
            footing("overstressed", 800.0, 150.0),
            footing("invalid", -10.0, 200.0),
        ];
        let results = analyze_batch(&inputs, &ACI_318M_25);
        let summary = BatchSummary::from_results(&inputs, &results);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.errored, 1);
        assert!(!summary.all_pass());
        assert_eq!(summary.entries[2].label, "invalid");
        assert_eq!(summary.entries[2].error.as_ref().unwrap().error_code(), "INVALID_INPUT");
        assert_eq!(summary.entries[1].governing_condition.as_deref(), Some("Bearing"));
    }
}
