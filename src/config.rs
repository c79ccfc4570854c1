//! Classifier calibration and shape thresholds.
//!
//! The defaults reproduce the reference behavior. A JSON file can override
//! any field; missing fields keep their default.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::measure::FaceShape;

/// Assumed average human face width, used to convert pixels to centimeters.
pub const STANDARD_FACE_WIDTH_CM: f64 = 14.0;

/// Width/height ratio bands for each face shape.
///
/// Bands are checked in a fixed order: Round, Long, Square, then Oval as the
/// fallback. Round and Long use strict comparisons, the Square band is closed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeThresholds {
    /// Ratios strictly above this are Round.
    pub round_above: f64,
    /// Ratios strictly below this are Long.
    pub long_below: f64,
    /// Lower bound of the Square band (inclusive).
    pub square_min: f64,
    /// Upper bound of the Square band (inclusive).
    pub square_max: f64,
}

impl Default for ShapeThresholds {
    fn default() -> Self {
        Self {
            round_above: 0.95,
            long_below: 0.75,
            square_min: 0.85,
            square_max: 0.95,
        }
    }
}

impl ShapeThresholds {
    pub fn classify(&self, ratio: f64) -> FaceShape {
        if ratio > self.round_above {
            FaceShape::Round
        } else if ratio < self.long_below {
            FaceShape::Long
        } else if ratio >= self.square_min && ratio <= self.square_max {
            FaceShape::Square
        } else {
            FaceShape::Oval
        }
    }

    fn validate(&self) -> Result<()> {
        let ordered = self.long_below <= self.square_min
            && self.square_min <= self.square_max
            && self.square_max <= self.round_above;
        let finite = [
            self.round_above,
            self.long_below,
            self.square_min,
            self.square_max,
        ]
        .iter()
        .all(|t| t.is_finite());

        if !finite || !ordered {
            return Err(Error::InvalidConfig(format!(
                "thresholds must be finite and ordered long_below <= square_min <= square_max <= round_above, got {:?}",
                self
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Real-world face width the measured pixel width is mapped to.
    pub standard_face_width_cm: f64,
    pub thresholds: ShapeThresholds,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            standard_face_width_cm: STANDARD_FACE_WIDTH_CM,
            thresholds: ShapeThresholds::default(),
        }
    }
}

impl ClassifierConfig {
    /// Load and validate a JSON config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let width = self.standard_face_width_cm;
        if !width.is_finite() || width <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "standard_face_width_cm must be positive, got {}",
                width
            )));
        }
        self.thresholds.validate()
    }
}
