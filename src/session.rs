//! Capture/retake flow as an explicit state machine.
//!
//! ```text
//!            capture                 success
//!   Live ───────────────▶ Analyzing ─────────▶ Captured
//!    ▲                     │    ▲                 │
//!    │ retake      failure │    │ capture         │ retake
//!    │                     ▼    │                 │
//!    └──────────────────── Error                  │
//!    ▲                                            │
//!    └────────────────────────────────────────────┘
//! ```

use image::RgbaImage;

use crate::detector::LandmarkDetector;
use crate::error::{Error, Result};
use crate::measure::{Classifier, FaceMeasurement};
use crate::types::LandmarkSet;

pub const NO_FACE_MESSAGE: &str = "No face detected! Please ensure your face is clearly visible.";
pub const ANALYSIS_FAILED_MESSAGE: &str = "Error analyzing face. Please try again.";

#[derive(Debug, Clone, PartialEq)]
pub enum State {
    /// Showing the live camera feed, ready to capture.
    Live,
    /// A frame was captured and is being analyzed.
    Analyzing,
    /// Analysis finished, the frame and its measurement are on display.
    Captured { measurement: FaceMeasurement },
    /// Analysis failed; `message` is meant for the user.
    Error { message: String },
}

impl State {
    pub fn name(&self) -> &'static str {
        match self {
            State::Live => "live",
            State::Analyzing => "analyzing",
            State::Captured { .. } => "captured",
            State::Error { .. } => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    CaptureRequested,
    AnalysisSucceeded(FaceMeasurement),
    AnalysisFailed(String),
    RetakeRequested,
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::CaptureRequested => "capture",
            Event::AnalysisSucceeded(_) => "analysis success",
            Event::AnalysisFailed(_) => "analysis failure",
            Event::RetakeRequested => "retake",
        }
    }
}

/// Compute the state following `event`, or reject the pair.
pub fn transition(state: &State, event: Event) -> Result<State> {
    let next = match (state, event) {
        (State::Live | State::Error { .. }, Event::CaptureRequested) => State::Analyzing,
        (State::Analyzing, Event::AnalysisSucceeded(measurement)) => {
            State::Captured { measurement }
        }
        (State::Analyzing, Event::AnalysisFailed(message)) => State::Error { message },
        (State::Captured { .. } | State::Error { .. }, Event::RetakeRequested) => State::Live,
        (state, event) => {
            return Err(Error::InvalidTransition {
                state: state.name(),
                event: event.name(),
            })
        }
    };
    Ok(next)
}

/// Runs capture attempts through a detector and classifier.
pub struct CaptureSession<D> {
    detector: D,
    classifier: Classifier,
    state: State,
    landmarks: Option<LandmarkSet>,
}

impl<D: LandmarkDetector> CaptureSession<D> {
    pub fn new(detector: D, classifier: Classifier) -> Self {
        Self {
            detector,
            classifier,
            state: State::Live,
            landmarks: None,
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    /// The latest successful measurement, if one is on display.
    pub fn measurement(&self) -> Option<&FaceMeasurement> {
        match &self.state {
            State::Captured { measurement } => Some(measurement),
            _ => None,
        }
    }

    /// Landmarks found in the last captured frame, kept until the next
    /// capture or retake.
    pub fn landmarks(&self) -> Option<&LandmarkSet> {
        self.landmarks.as_ref()
    }

    pub fn can_capture(&self) -> bool {
        matches!(self.state, State::Live | State::Error { .. })
    }

    pub fn can_retake(&self) -> bool {
        matches!(self.state, State::Captured { .. } | State::Error { .. })
    }

    /// Apply an event, leaving the state untouched if it is rejected.
    pub fn handle(&mut self, event: Event) -> Result<&State> {
        let next = transition(&self.state, event)?;
        log::debug!("{} -> {}", self.state.name(), next.name());
        self.state = next;
        Ok(&self.state)
    }

    /// Capture `frame` and analyze it.
    ///
    /// An empty frame is rejected before any state change. Otherwise the
    /// session ends up in `Captured` on success or `Error` on failure, and the
    /// underlying error is returned to the caller.
    pub fn capture(&mut self, frame: &RgbaImage) -> Result<FaceMeasurement> {
        let (width, height) = frame.dimensions();
        if width == 0 || height == 0 {
            return Err(Error::FrameNotReady { width, height });
        }

        self.handle(Event::CaptureRequested)?;
        self.landmarks = None;

        match self.analyze(frame) {
            Ok(measurement) => {
                self.handle(Event::AnalysisSucceeded(measurement))?;
                Ok(measurement)
            }
            Err(err) => {
                let message = match &err {
                    Error::NoFaceDetected => {
                        log::warn!("no face detected in the captured frame");
                        NO_FACE_MESSAGE
                    }
                    other => {
                        log::error!("face analysis failed: {}", other);
                        ANALYSIS_FAILED_MESSAGE
                    }
                };
                self.handle(Event::AnalysisFailed(message.to_string()))?;
                Err(err)
            }
        }
    }

    /// Discard the current result and go back to the live feed.
    pub fn retake(&mut self) -> Result<()> {
        self.handle(Event::RetakeRequested)?;
        self.landmarks = None;
        Ok(())
    }

    fn analyze(&mut self, frame: &RgbaImage) -> Result<FaceMeasurement> {
        let landmarks = self
            .detector
            .detect(frame)?
            .ok_or(Error::NoFaceDetected)?;
        log::debug!("face detected with {} landmarks", landmarks.num_landmarks());
        let landmarks = self.landmarks.insert(landmarks);
        self.classifier.measure(landmarks)
    }
}
