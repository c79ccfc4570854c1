//! Landmark detector interface.
//!
//! Detection and landmark localization are done elsewhere. Anything that can
//! turn a frame into a [`LandmarkSet`] plugs in through [`LandmarkDetector`].

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::LandmarkSet;

/// Produces landmarks for a single face in a frame.
pub trait LandmarkDetector {
    /// Detect one face. Returns `Ok(None)` if no face is found.
    fn detect(&mut self, frame: &RgbaImage) -> Result<Option<LandmarkSet>>;
}

impl<F> LandmarkDetector for F
where
    F: FnMut(&RgbaImage) -> Result<Option<LandmarkSet>>,
{
    fn detect(&mut self, frame: &RgbaImage) -> Result<Option<LandmarkSet>> {
        self(frame)
    }
}

/// On-disk layout of a landmark file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LandmarkFile {
    /// Dimensions of the image the landmarks were computed on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default)]
    pub faces: Vec<LandmarkSet>,
}

/// Detector that replays landmarks computed by an external tool.
///
/// The file may contain several faces; like a single-face detector, only the
/// first one is returned.
#[derive(Debug, Clone)]
pub struct PrecomputedLandmarks {
    file: LandmarkFile,
}

impl PrecomputedLandmarks {
    pub fn new(file: LandmarkFile) -> Self {
        Self { file }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let file: LandmarkFile = serde_json::from_reader(reader)?;
        Ok(Self::new(file))
    }

    /// Image dimensions recorded in the file, if both are present.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.file.width.zip(self.file.height)
    }

    pub fn num_faces(&self) -> usize {
        self.file.faces.len()
    }
}

impl LandmarkDetector for PrecomputedLandmarks {
    fn detect(&mut self, frame: &RgbaImage) -> Result<Option<LandmarkSet>> {
        if let Some((width, height)) = self.dimensions() {
            let (frame_width, frame_height) = frame.dimensions();
            if (width, height) != (frame_width, frame_height) {
                return Err(Error::FrameMismatch {
                    width,
                    height,
                    frame_width,
                    frame_height,
                });
            }
        }

        if self.file.faces.len() > 1 {
            log::debug!(
                "{} faces in landmark file, using the first",
                self.file.faces.len()
            );
        }
        Ok(self.file.faces.first().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point;

    #[test]
    fn closure_detector() {
        let mut calls = 0;
        let mut detector = |_: &RgbaImage| -> Result<Option<LandmarkSet>> {
            calls += 1;
            Ok(None)
        };
        let frame = RgbaImage::new(4, 4);
        assert!(detector.detect(&frame).unwrap().is_none());
        assert!(detector.detect(&frame).unwrap().is_none());
        drop(detector);
        assert_eq!(calls, 2);
    }

    #[test]
    fn first_face_wins() {
        let json = r#"{
            "faces": [
                { "points": [{ "x": 1.0, "y": 2.0 }] },
                { "points": [{ "x": 3.0, "y": 4.0 }] }
            ]
        }"#;
        let mut detector = PrecomputedLandmarks::from_reader(json.as_bytes()).unwrap();
        assert_eq!(detector.num_faces(), 2);
        assert_eq!(detector.dimensions(), None);

        let face = detector.detect(&RgbaImage::new(8, 8)).unwrap().unwrap();
        assert_eq!(face.points, vec![Point::new(1.0, 2.0)]);
    }

    #[test]
    fn empty_file_means_no_face() {
        let mut detector = PrecomputedLandmarks::from_reader("{}".as_bytes()).unwrap();
        assert!(detector.detect(&RgbaImage::new(8, 8)).unwrap().is_none());
    }

    #[test]
    fn dimension_mismatch() {
        let json = r#"{ "width": 640, "height": 480, "faces": [] }"#;
        let mut detector = PrecomputedLandmarks::from_reader(json.as_bytes()).unwrap();
        assert_eq!(detector.dimensions(), Some((640, 480)));

        assert!(matches!(
            detector.detect(&RgbaImage::new(320, 240)),
            Err(Error::FrameMismatch { frame_width: 320, .. })
        ));
        assert!(detector.detect(&RgbaImage::new(640, 480)).is_ok());
    }
}
