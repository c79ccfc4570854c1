//! CLI application for face shape estimation from precomputed landmarks.
//!
//! Usage:
//!   face-shape <landmarks.json>                          # Human-readable output
//!   face-shape <landmarks.json> --json                   # JSON output
//!   face-shape <landmarks.json> -o result.json --json    # Save to file
//!   face-shape <landmarks.json> --image photo.jpg --overlay annotated.png

use clap::Parser;
use face_shape::{
    draw_landmarks, CaptureSession, Classifier, ClassifierConfig, FaceMeasurement, OverlayStyle,
    PrecomputedLandmarks, State,
};
use image::RgbaImage;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "face-shape")]
#[command(author, version, about = "Face width, height and shape from facial landmarks", long_about = None)]
struct Args {
    /// Landmark file written by a face landmark detector
    #[arg(required = true)]
    landmarks: PathBuf,

    /// Image the landmarks were computed on
    #[arg(long)]
    image: Option<PathBuf>,

    /// Write the image with landmarks drawn to this path
    #[arg(long, requires = "image")]
    overlay: Option<PathBuf>,

    /// Classifier calibration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(short, long)]
    json: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Output structure for JSON serialization
#[derive(Serialize)]
struct Output {
    landmarks: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    landmark_count: usize,
    measurement: FaceMeasurement,
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => {
            log::debug!("Loading classifier config from {:?}", path);
            ClassifierConfig::load(path)?
        }
        None => ClassifierConfig::default(),
    };

    log::debug!("Loading landmarks from {:?}", args.landmarks);
    let detector = PrecomputedLandmarks::load(&args.landmarks)?;
    log::debug!("{} face(s) in landmark file", detector.num_faces());

    let frame = match &args.image {
        Some(path) => {
            log::debug!("Loading image {:?}", path);
            image::open(path)?.to_rgba8()
        }
        None => {
            // Without an image, stand in a frame of the recorded size.
            let (width, height) = detector.dimensions().unwrap_or((1, 1));
            RgbaImage::new(width, height)
        }
    };

    let mut session = CaptureSession::new(detector, Classifier::new(config));
    let measurement = match session.capture(&frame) {
        Ok(m) => m,
        Err(e) => {
            if let State::Error { message } = session.state() {
                return Err(message.clone().into());
            }
            return Err(e.into());
        }
    };

    let landmarks = session.landmarks();

    if let (Some(path), Some(landmarks)) = (&args.overlay, landmarks) {
        let mut annotated = frame.clone();
        draw_landmarks(&mut annotated, landmarks, &OverlayStyle::default());
        annotated.save(path)?;
        log::debug!("Overlay written to {:?}", path);
    }

    let output = Output {
        landmarks: args.landmarks.display().to_string(),
        image: args.image.as_ref().map(|p| p.display().to_string()),
        landmark_count: landmarks.map(|l| l.num_landmarks()).unwrap_or(0),
        measurement,
    };

    let output_str = if args.json {
        serde_json::to_string_pretty(&output)?
    } else {
        format_human_readable(&output)
    };

    if let Some(ref path) = args.output {
        std::fs::write(path, &output_str)?;
        log::debug!("Output written to {:?}", path);
    } else {
        println!("{}", output_str);
    }

    Ok(())
}

fn format_human_readable(output: &Output) -> String {
    let m = &output.measurement;
    let mut s = String::new();

    s.push_str(&format!(
        "Landmarks: {} ({} points)\n",
        output.landmarks, output.landmark_count
    ));
    if let Some(ref image) = output.image {
        s.push_str(&format!("Image: {}\n", image));
    }

    s.push_str("\nFace:\n");
    s.push_str(&format!("  Width:  {:.1} cm\n", m.width_cm));
    s.push_str(&format!("  Height: {:.1} cm\n", m.height_cm));
    s.push_str(&format!("  Shape:  {}\n", m.shape));

    s.push_str("\nMeasured:\n");
    s.push_str(&format!("  Width:  {:.1} px\n", m.width_px));
    s.push_str(&format!("  Height: {:.1} px\n", m.height_px));
    s.push_str(&format!("  Ratio:  {:.2}", m.ratio));

    s
}
