//! # face-shape
//!
//! Face width, height and shape estimation from 68-point facial landmarks.
//!
//! This crate provides:
//! - **Measurement**: face width and height in centimeters from jaw and eyebrow landmarks
//! - **Classification**: Round, Long, Square or Oval from the width/height ratio
//! - **Capture flow**: a capture/retake state machine around a pluggable detector
//! - **Overlay**: landmark drawing on the captured frame
//!
//! Face detection and landmark localization are not part of this crate.
//! Anything producing a [`LandmarkSet`] can be plugged in via [`LandmarkDetector`].
//!
//! ## Algorithm Overview
//!
//! 1. Width: mean distance between jaw points {0,1,2} and {14,15,16} (9 pairs)
//! 2. Height: mean distance between eyebrow points {19,24} and chin points {7,8,9} (6 pairs)
//! 3. Scale: pixels per centimeter, assuming the face is 14 cm wide
//! 4. Shape: from the ratio of width to height in centimeters
//!
//! Since the scale is derived from the width itself, the reported width is
//! always the calibration width.
//!
//! ## Quick Start
//!
//! ```rust
//! use face_shape::{measure, FaceShape, LandmarkSet, Point};
//!
//! let mut landmarks = LandmarkSet::new(vec![Point::new(70.0, 0.0); 68]);
//! for i in [0, 1, 2] {
//!     landmarks[i] = Point::new(0.0, 0.0);
//! }
//! for i in [14, 15, 16] {
//!     landmarks[i] = Point::new(140.0, 0.0);
//! }
//! for i in [7, 8, 9] {
//!     landmarks[i] = Point::new(70.0, 100.0);
//! }
//!
//! let m = measure(&landmarks).unwrap();
//! assert_eq!(m.shape, FaceShape::Round);
//! println!("{:.1} x {:.1} cm", m.width_cm, m.height_cm);
//! ```
//!
//! ## Custom Detectors
//!
//! Implement [`LandmarkDetector`] for your own detector, or pass a closure:
//!
//! ```rust
//! use face_shape::{CaptureSession, Classifier, LandmarkSet, Result};
//! use image::RgbaImage;
//!
//! let detector = |_frame: &RgbaImage| -> Result<Option<LandmarkSet>> {
//!     // Run a face detector and landmark model here
//!     Ok(None)
//! };
//! let mut session = CaptureSession::new(detector, Classifier::default());
//! assert!(session.capture(&RgbaImage::new(64, 64)).is_err());
//! ```

mod config;
mod detector;
mod error;
mod measure;
mod overlay;
mod session;
mod types;

pub use config::{ClassifierConfig, ShapeThresholds, STANDARD_FACE_WIDTH_CM};
pub use detector::{LandmarkDetector, LandmarkFile, PrecomputedLandmarks};
pub use error::{Error, Result};
pub use measure::{face_height_px, face_width_px, measure, Classifier, FaceMeasurement, FaceShape};
pub use overlay::{draw_landmarks, OverlayStyle};
pub use session::{
    transition, CaptureSession, Event, State, ANALYSIS_FAILED_MESSAGE, NO_FACE_MESSAGE,
};
pub use types::{index, LandmarkSet, Point};
