//! Draw landmarks on top of a captured frame.

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::types::{LandmarkSet, Point};

/// Point groups connected by lines on a 68-point set.
const CONNECTIONS: &[&[usize]] = &[
    // Jaw
    &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16],
    // Eyebrows
    &[17, 18, 19, 20, 21],
    &[22, 23, 24, 25, 26],
    // Nose bridge and base
    &[27, 28, 29, 30],
    &[31, 32, 33, 34, 35],
    // Eyes
    &[36, 37, 38, 39, 40, 41, 36],
    &[42, 43, 44, 45, 46, 47, 42],
    // Lips
    &[48, 49, 50, 51, 52, 53, 54, 55, 56, 57, 58, 59, 48],
    &[60, 61, 62, 63, 64, 65, 66, 67, 60],
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    /// RGBA
    pub color: [u8; 4],
    pub line_width: u32,
    pub draw_lines: bool,
    pub point_radius: u32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            color: [0, 255, 0, 255],
            line_width: 2,
            draw_lines: true,
            point_radius: 2,
        }
    }
}

/// Draw every landmark and, for a full 68-point set, the feature outlines.
pub fn draw_landmarks(img: &mut RgbaImage, landmarks: &LandmarkSet, style: &OverlayStyle) {
    let color = Rgba(style.color);

    if style.draw_lines && landmarks.is_full() {
        let radius = style.line_width / 2;
        for group in CONNECTIONS {
            for pair in group.windows(2) {
                let a = landmarks[pair[0]];
                let b = landmarks[pair[1]];
                draw_line(img, a, b, radius, color);
            }
        }
    }

    for p in &landmarks.points {
        draw_dot(img, *p, style.point_radius, color);
    }
}

fn put_clipped(img: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>) {
    let (w, h) = img.dimensions();
    if x >= 0 && y >= 0 && (x as u32) < w && (y as u32) < h {
        img.put_pixel(x as u32, y as u32, color);
    }
}

/// Pixel rectangle a mark of `radius` can touch, as `(min, max)` corners.
fn reach(img: &RgbaImage, radius: u32) -> ((f64, f64), (f64, f64)) {
    let r = radius as f64;
    let (w, h) = img.dimensions();
    ((-r, -r), (w as f64 - 1.0 + r, h as f64 - 1.0 + r))
}

/// Filled disc. Points whose disc cannot touch the image are skipped.
fn draw_dot(img: &mut RgbaImage, center: Point, radius: u32, color: Rgba<u8>) {
    if !center.is_finite() {
        return;
    }
    let ((x0, y0), (x1, y1)) = reach(img, radius);
    let (x, y) = (center.x.round() as f64, center.y.round() as f64);
    if x < x0 || x > x1 || y < y0 || y > y1 {
        return;
    }
    stamp(img, x as i32, y as i32, radius, color);
}

fn stamp(img: &mut RgbaImage, cx: i32, cy: i32, radius: u32, color: Rgba<u8>) {
    let r = radius as i32;
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy <= r * r {
                put_clipped(img, cx + dx, cy + dy, color);
            }
        }
    }
}

/// Liang-Barsky clipping of the segment `a`-`b` to an axis-aligned rectangle.
fn clip_segment(
    a: (f64, f64),
    b: (f64, f64),
    (min, max): ((f64, f64), (f64, f64)),
) -> Option<((f64, f64), (f64, f64))> {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let (mut t0, mut t1) = (0.0f64, 1.0f64);

    for (p, q) in [
        (-dx, a.0 - min.0),
        (dx, max.0 - a.0),
        (-dy, a.1 - min.1),
        (dy, max.1 - a.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let t = q / p;
            if p < 0.0 {
                t0 = t0.max(t);
            } else {
                t1 = t1.min(t);
            }
            if t0 > t1 {
                return None;
            }
        }
    }

    Some((
        (a.0 + t0 * dx, a.1 + t0 * dy),
        (a.0 + t1 * dx, a.1 + t1 * dy),
    ))
}

/// Bresenham line, thickened by stamping a dot of `radius` at each step.
/// Only the part of the segment that can touch the image is rasterized.
fn draw_line(img: &mut RgbaImage, from: Point, to: Point, radius: u32, color: Rgba<u8>) {
    if !(from.is_finite() && to.is_finite()) {
        return;
    }

    let a = (from.x as f64, from.y as f64);
    let b = (to.x as f64, to.y as f64);
    let Some((a, b)) = clip_segment(a, b, reach(img, radius)) else {
        return;
    };

    let (mut x, mut y) = (a.0.round() as i32, a.1.round() as i32);
    let (x1, y1) = (b.0.round() as i32, b.1.round() as i32);

    let dx = (x1 - x).abs();
    let dy = (y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    loop {
        stamp(img, x, y, radius, color);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
}
