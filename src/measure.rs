//! Face width, height and shape estimation.
//!
//! Width is the mean distance between the three outermost jaw points on each
//! side. Height is the mean distance between the two eyebrow midpoints and the
//! three jaw points around the chin. Both are converted to centimeters by
//! assuming the face is [`STANDARD_FACE_WIDTH_CM`] wide.
//!
//! Because the scale factor is derived from the measured width itself,
//! `width_cm` always equals the calibration width and only `height_cm`
//! carries information. The shape label depends on their ratio alone.

use serde::{Deserialize, Serialize};

use crate::config::{ClassifierConfig, ShapeThresholds, STANDARD_FACE_WIDTH_CM};
use crate::error::{Error, Result};
use crate::types::{index, LandmarkSet, Point};

/// Face shape categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FaceShape {
    /// Width close to or above height.
    Round,
    /// Clearly taller than wide.
    Long,
    Square,
    Oval,
}

impl FaceShape {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Round => "Round",
            Self::Long => "Long",
            Self::Square => "Square",
            Self::Oval => "Oval",
        }
    }

    /// Classify a width/height ratio with the default thresholds.
    pub fn from_ratio(ratio: f64) -> Self {
        ShapeThresholds::default().classify(ratio)
    }
}

impl std::fmt::Display for FaceShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Estimated face dimensions and shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceMeasurement {
    pub width_cm: f64,
    pub height_cm: f64,
    pub shape: FaceShape,

    /// Mean jaw width in pixels
    pub width_px: f64,
    /// Mean eyebrow-to-chin distance in pixels
    pub height_px: f64,
    /// width_cm / height_cm
    pub ratio: f64,
}

/// Face shape classifier with a fixed calibration.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Measure a face from its landmarks.
    ///
    /// Fails with [`Error::IncompleteLandmarkSet`] if a required landmark is
    /// missing and with [`Error::DegenerateGeometry`] if the reference points
    /// collapse so that no finite ratio exists.
    pub fn measure(&self, landmarks: &LandmarkSet) -> Result<FaceMeasurement> {
        landmarks.validate()?;

        let width_px = face_width_px(landmarks)?;
        let height_px = face_height_px(landmarks)?;

        if !(width_px.is_finite() && width_px > 0.0) {
            return Err(Error::DegenerateGeometry(format!(
                "face width is {} px",
                width_px
            )));
        }
        if !(height_px.is_finite() && height_px > 0.0) {
            return Err(Error::DegenerateGeometry(format!(
                "face height is {} px",
                height_px
            )));
        }

        let pixels_per_cm = width_px / self.config.standard_face_width_cm;
        let width_cm = width_px / pixels_per_cm;
        let height_cm = height_px / pixels_per_cm;
        let ratio = width_cm / height_cm;

        if !ratio.is_finite() {
            return Err(Error::DegenerateGeometry(format!(
                "width/height ratio is {}",
                ratio
            )));
        }

        let shape = self.config.thresholds.classify(ratio);
        log::trace!(
            "width {:.2}px height {:.2}px scale {:.3}px/cm ratio {:.3} -> {}",
            width_px,
            height_px,
            pixels_per_cm,
            ratio,
            shape
        );

        Ok(FaceMeasurement {
            width_cm,
            height_cm,
            shape,
            width_px,
            height_px,
            ratio,
        })
    }
}

/// Measure a face with the default calibration of [`STANDARD_FACE_WIDTH_CM`].
pub fn measure(landmarks: &LandmarkSet) -> Result<FaceMeasurement> {
    Classifier::default().measure(landmarks)
}

/// Mean distance over all 9 left-jaw/right-jaw pairs.
pub fn face_width_px(landmarks: &LandmarkSet) -> Result<f64> {
    let left = landmarks.select(index::LEFT_JAW)?;
    let right = landmarks.select(index::RIGHT_JAW)?;
    Ok(mean_pairwise_distance(&left, &right))
}

/// Mean distance over all 6 forehead/chin pairs.
pub fn face_height_px(landmarks: &LandmarkSet) -> Result<f64> {
    let forehead = landmarks.select(index::FOREHEAD)?;
    let chin = landmarks.select(index::CHIN)?;
    Ok(mean_pairwise_distance(&forehead, &chin))
}

/// Average distance between every point in `a` and every point in `b`.
fn mean_pairwise_distance(a: &[Point], b: &[Point]) -> f64 {
    let pairs = a.len() * b.len();
    if pairs == 0 {
        return 0.0;
    }

    let mut total = 0.0;
    for p in a {
        for q in b {
            total += p.distance(q);
        }
    }
    total / pairs as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a 68-point set with all jaw pairs `width` apart and all
    /// forehead/chin pairs `height` apart.
    fn face(width: f32, height: f32) -> LandmarkSet {
        let mut set = LandmarkSet::new(vec![Point::new(width / 2.0, 0.0); LandmarkSet::FULL]);
        for i in index::LEFT_JAW {
            set[i] = Point::new(0.0, 0.0);
        }
        for i in index::RIGHT_JAW {
            set[i] = Point::new(width, 0.0);
        }
        for i in index::FOREHEAD {
            set[i] = Point::new(width / 2.0, 0.0);
        }
        for i in index::CHIN {
            set[i] = Point::new(width / 2.0, height);
        }
        set
    }

    #[test]
    fn mean_distance() {
        let a = [Point::new(0.0, 0.0), Point::new(0.0, 2.0)];
        let b = [Point::new(3.0, 0.0)];
        // 3 and sqrt(13)
        let expected = (3.0 + 13.0f64.sqrt()) / 2.0;
        assert!((mean_pairwise_distance(&a, &b) - expected).abs() < 1e-5);
        assert_eq!(mean_pairwise_distance(&[], &b), 0.0);
    }

    #[test]
    fn width_averages_all_nine_pairs() {
        let mut set = face(100.0, 100.0);
        // Shift one left point down by 30: its three pairs become 104.40 apart.
        set[1] = Point::new(0.0, 30.0);
        let expected = (6.0 * 100.0 + 3.0 * (100.0f64 * 100.0 + 30.0 * 30.0).sqrt()) / 9.0;
        assert!((face_width_px(&set).unwrap() - expected).abs() < 1e-3);
    }

    #[test]
    fn height_uses_chin_and_eyebrows() {
        let set = face(140.0, 100.0);
        assert!((face_height_px(&set).unwrap() - 100.0).abs() < 1e-4);
    }

    #[test]
    fn round_face() {
        let m = measure(&face(140.0, 100.0)).unwrap();
        assert!((m.width_px - 140.0).abs() < 1e-4);
        assert!((m.height_px - 100.0).abs() < 1e-4);
        assert!((m.width_cm - 14.0).abs() < 1e-4);
        assert!((m.height_cm - 10.0).abs() < 1e-4);
        assert!((m.ratio - 1.4).abs() < 1e-4);
        assert_eq!(m.shape, FaceShape::Round);
    }

    #[test]
    fn long_face() {
        let m = measure(&face(100.0, 150.0)).unwrap();
        assert_eq!(m.shape, FaceShape::Long);
    }

    #[test]
    fn oval_face() {
        // ratio 0.8
        let m = measure(&face(100.0, 125.0)).unwrap();
        assert!((m.ratio - 0.8).abs() < 1e-4);
        assert_eq!(m.shape, FaceShape::Oval);
    }

    #[test]
    fn exact_boundary_ratios_from_landmarks() {
        // Integer geometry whose computed ratio lands exactly on a threshold.
        let m = measure(&face(57.0, 60.0)).unwrap();
        assert_eq!(m.ratio, 0.95);
        assert_eq!(m.shape, FaceShape::Square);

        let m = measure(&face(68.0, 80.0)).unwrap();
        assert_eq!(m.ratio, 0.85);
        assert_eq!(m.shape, FaceShape::Square);

        let m = measure(&face(60.0, 80.0)).unwrap();
        assert_eq!(m.ratio, 0.75);
        assert_eq!(m.shape, FaceShape::Oval);
    }

    #[test]
    fn short_set_fails_before_measuring() {
        // Enough points for the jaw but not for the eyebrows.
        let set = LandmarkSet::new(vec![Point::new(1.0, 1.0); 17]);
        match measure(&set) {
            Err(Error::IncompleteLandmarkSet { required, found }) => {
                assert_eq!(required, 19);
                assert_eq!(found, 17);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn ratio_bands() {
        assert_eq!(FaceShape::from_ratio(1.2), FaceShape::Round);
        assert_eq!(FaceShape::from_ratio(0.951), FaceShape::Round);
        assert_eq!(FaceShape::from_ratio(0.95), FaceShape::Square);
        assert_eq!(FaceShape::from_ratio(0.9), FaceShape::Square);
        assert_eq!(FaceShape::from_ratio(0.85), FaceShape::Square);
        assert_eq!(FaceShape::from_ratio(0.8), FaceShape::Oval);
        assert_eq!(FaceShape::from_ratio(0.75), FaceShape::Oval);
        assert_eq!(FaceShape::from_ratio(0.749), FaceShape::Long);
    }

    #[test]
    fn custom_calibration_scales_height() {
        let config = ClassifierConfig {
            standard_face_width_cm: 15.0,
            ..Default::default()
        };
        let m = Classifier::new(config).measure(&face(150.0, 200.0)).unwrap();
        assert!((m.width_cm - 15.0).abs() < 1e-4);
        assert!((m.height_cm - 20.0).abs() < 1e-4);
        assert_eq!(m.shape, FaceShape::Oval);
    }

    #[test]
    fn collapsed_jaw_is_degenerate() {
        let mut set = face(100.0, 100.0);
        for i in index::LEFT_JAW.into_iter().chain(index::RIGHT_JAW) {
            set[i] = Point::new(50.0, 50.0);
        }
        assert!(matches!(measure(&set), Err(Error::DegenerateGeometry(_))));
    }

    #[test]
    fn collapsed_height_is_degenerate() {
        let set = face(100.0, 0.0);
        assert!(matches!(measure(&set), Err(Error::DegenerateGeometry(_))));
    }

    #[test]
    fn non_finite_points_are_degenerate() {
        let mut set = face(100.0, 100.0);
        set[15] = Point::new(f32::NAN, 0.0);
        assert!(matches!(measure(&set), Err(Error::DegenerateGeometry(_))));
    }

    #[test]
    fn shape_display() {
        assert_eq!(FaceShape::Square.to_string(), "Square");
        assert_eq!(format!("{}", FaceShape::Long), "Long");
    }
}
