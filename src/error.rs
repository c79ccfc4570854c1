use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Incomplete landmark set: landmark {required} required, only {found} points present")]
    IncompleteLandmarkSet { required: usize, found: usize },

    #[error("Degenerate face geometry: {0}")]
    DegenerateGeometry(String),

    #[error("No face detected")]
    NoFaceDetected,

    #[error("Frame not ready: {width}x{height}")]
    FrameNotReady { width: u32, height: u32 },

    #[error("Frame is {frame_width}x{frame_height} but landmarks were computed on a {width}x{height} image")]
    FrameMismatch {
        width: u32,
        height: u32,
        frame_width: u32,
        frame_height: u32,
    },

    #[error("Cannot handle {event} while {state}")]
    InvalidTransition {
        state: &'static str,
        event: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
