//! Load type definitions for column actions on a footing
//!
//! The column delivers dead, live and wind actions to the top of the
//! footing. Each is entered as an unfactored (service) set of forces.

use serde::{Deserialize, Serialize};

/// Load categories acting on the column
///
/// # Example
/// ```
/// use footing_core::loads::LoadType;
///
/// let dead = LoadType::Dead;
/// assert_eq!(dead.code(), "D");
/// assert_eq!(dead.description(), "Dead load");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoadType {
    /// D - Dead load (permanent, including superstructure self-weight)
    Dead,
    /// L - Live load (occupancy)
    Live,
    /// W - Wind load
    Wind,
}

impl LoadType {
    /// All load types in standard order
    pub const ALL: [LoadType; 3] = [LoadType::Dead, LoadType::Live, LoadType::Wind];

    /// Standard abbreviation code (D, L, W)
    pub fn code(&self) -> &'static str {
        match self {
            LoadType::Dead => "D",
            LoadType::Live => "L",
            LoadType::Wind => "W",
        }
    }

    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            LoadType::Dead => "Dead load",
            LoadType::Live => "Live load",
            LoadType::Wind => "Wind load",
        }
    }

    /// Whether the load can reverse, so combinations need a -W variant
    pub fn is_directional(&self) -> bool {
        matches!(self, LoadType::Wind)
    }

    /// Whether the axial component of this load must be compressive
    pub fn is_gravity(&self) -> bool {
        matches!(self, LoadType::Dead | LoadType::Live)
    }
}

impl std::fmt::Display for LoadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}
