// sensing/perception.rs

// Reduces a range scan to the three edge distances the wall follower works
// with: straight ahead, full left, and the closest return swept between them.
// Scans too short for the configured indices are rejected, never indexed.

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Straight-ahead beam of the reference 640-beam scanner
pub const DEFAULT_FRONT_INDEX: usize = 319;
/// Full-left (90°) beam of the reference 640-beam scanner
pub const DEFAULT_LEFT_INDEX: usize = 639;

/// Scan indices used for edge extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerceptionConfig {
    /// Index of the beam pointing straight ahead
    pub front_index: usize,
    /// Index of the beam pointing 90° to the left
    pub left_index: usize,
}

impl Default for PerceptionConfig {
    fn default() -> Self {
        PerceptionConfig {
            front_index: DEFAULT_FRONT_INDEX,
            left_index: DEFAULT_LEFT_INDEX,
        }
    }
}

/// Edge distances extracted from one scan, in meters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeReadings {
    /// Range straight ahead
    pub front: f64,
    /// Range 90° to the left
    pub left: f64,
    /// Smallest range from front to left inclusive
    pub closest: f64,
}

/// Perception error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PerceptionError {
    /// Scan is shorter than the configured indices require
    OutOfBounds {
        /// Minimum scan length
        required: usize,
        /// Actual scan length
        len: usize,
    },
    /// Front index lies after the left index
    InvalidIndices {
        /// Configured front index
        front_index: usize,
        /// Configured left index
        left_index: usize,
    },
}

impl fmt::Display for PerceptionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PerceptionError::OutOfBounds { required, len } => write!(
                f,
                "scan has {} ranges, at least {} required",
                len, required
            ),
            PerceptionError::InvalidIndices {
                front_index,
                left_index,
            } => write!(
                f,
                "front index {} is past left index {}",
                front_index, left_index
            ),
        }
    }
}

impl std::error::Error for PerceptionError {}

/// Extracts front, left and closest edges from range scans
#[derive(Debug, Clone)]
pub struct EdgeExtractor {
    front_index: usize,
    left_index: usize,
}

impl EdgeExtractor {
    /// Creates an extractor for the given indices
    pub fn new(config: &PerceptionConfig) -> Result<Self, PerceptionError> {
        if config.front_index > config.left_index {
            return Err(PerceptionError::InvalidIndices {
                front_index: config.front_index,
                left_index: config.left_index,
            });
        }

        Ok(EdgeExtractor {
            front_index: config.front_index,
            left_index: config.left_index,
        })
    }

    /// Minimum scan length this extractor accepts
    pub fn required_len(&self) -> usize {
        self.left_index + 1
    }

    /// Extracts edge readings from a scan.
    ///
    /// The closest edge is seeded with the front range and only replaced by a
    /// strictly smaller one, so ties keep the front-most beam and NaN returns
    /// never win. A NaN front range therefore yields a NaN closest edge.
    pub fn extract(&self, ranges: &[f32]) -> Result<EdgeReadings, PerceptionError> {
        let out_of_bounds = PerceptionError::OutOfBounds {
            required: self.required_len(),
            len: ranges.len(),
        };
        let sweep = ranges
            .get(self.front_index..=self.left_index)
            .ok_or_else(|| out_of_bounds.clone())?;
        let (&front, rest) = sweep.split_first().ok_or_else(|| out_of_bounds.clone())?;
        let &left = sweep.last().ok_or(out_of_bounds)?;

        let closest = rest
            .iter()
            .fold(front, |min, &range| if range < min { range } else { min });

        debug!("closest_edge : {}", closest);

        Ok(EdgeReadings {
            front: f64::from(front),
            left: f64::from(left),
            closest: f64::from(closest),
        })
    }
}
