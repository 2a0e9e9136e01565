// SPDX-License-Identifier: GPL-3.0-only

//! Point markers drawn over a rendered depth image
//!
//! Markers come from the command line as `COLOR X Y` triples. A marker with a
//! bad color or coordinate is reported and skipped; the others still draw.

use super::GrayscaleImage;
use crate::errors::{AppError, AppResult};
use image::Rgb;
use tracing::{debug, warn};

/// Unparsed `COLOR X Y` triple
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSpec {
    pub color: String,
    pub x: String,
    pub y: String,
}

impl MarkerSpec {
    /// Group trailing arguments into triples
    ///
    /// Fails when the count is not a multiple of three.
    pub fn from_args(args: &[String]) -> AppResult<Vec<MarkerSpec>> {
        if args.len() % 3 != 0 {
            return Err(AppError::invalid(format!(
                "marker arguments come in COLOR X Y triples, got {} values",
                args.len()
            )));
        }

        Ok(args
            .chunks_exact(3)
            .map(|triple| MarkerSpec {
                color: triple[0].clone(),
                x: triple[1].clone(),
                y: triple[2].clone(),
            })
            .collect())
    }

    pub fn parse(&self) -> AppResult<Marker> {
        Ok(Marker {
            x: parse_coordinate(&self.x)?,
            y: parse_coordinate(&self.y)?,
            color: parse_color(&self.color)?,
        })
    }
}

/// A colored point in image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub x: u32,
    pub y: u32,
    pub color: Rgb<u8>,
}

/// Fill the `2·radius` square centered on the marker, clipped to the image
pub fn draw_marker(image: &mut GrayscaleImage, marker: &Marker, radius: u32) {
    let (width, height) = (image.width() as i64, image.height() as i64);
    let radius = radius as i64;
    let (cx, cy) = (marker.x as i64, marker.y as i64);

    let x0 = (cx - radius).max(0);
    let x1 = (cx + radius).min(width);
    let y0 = (cy - radius).max(0);
    let y1 = (cy + radius).min(height);

    for y in y0..y1 {
        for x in x0..x1 {
            image.set_color(x as u32, y as u32, marker.color);
        }
    }
}

/// Draw every valid marker in order, returning the errors of the skipped ones
pub fn apply_markers(
    image: &mut GrayscaleImage,
    specs: &[MarkerSpec],
    radius: u32,
) -> Vec<AppError> {
    let mut errors = Vec::new();

    for spec in specs {
        match spec.parse() {
            Ok(marker) => {
                debug!(x = marker.x, y = marker.y, color = ?marker.color.0, "Drawing marker");
                draw_marker(image, &marker, radius);
            }
            Err(e) => {
                warn!(color = %spec.color, x = %spec.x, y = %spec.y, "Skipping marker: {}", e);
                errors.push(e);
            }
        }
    }

    errors
}

/// Decimal coordinate, fractional part truncated
fn parse_coordinate(text: &str) -> AppResult<u32> {
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|_| AppError::invalid(format!("'{}' is not a number", text)))?;

    if !value.is_finite() || value < 0.0 || value > u32::MAX as f64 {
        return Err(AppError::invalid(format!(
            "coordinate '{}' is out of range",
            text
        )));
    }

    Ok(value as u32)
}

/// Parse a color string
///
/// Accepts `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`,
/// `rgba(r, g, b, a)` and common color names. Alpha is ignored.
pub fn parse_color(text: &str) -> AppResult<Rgb<u8>> {
    let trimmed = text.trim();
    let malformed = || AppError::invalid(format!("malformed color '{}'", text));

    if let Some(hex) = trimmed.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(malformed);
    }

    let lower = trimmed.to_ascii_lowercase();
    if let Some(args) = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let expected = if lower.starts_with("rgba(") { 4 } else { 3 };
        return parse_functional(args, expected).ok_or_else(malformed);
    }

    named_color(&lower).ok_or_else(malformed)
}

fn parse_hex(hex: &str) -> Option<Rgb<u8>> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok();
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        // #rgb / #rgba: each digit is doubled
        3 | 4 => Some(Rgb([nibble(0)? * 17, nibble(1)? * 17, nibble(2)? * 17])),
        6 | 8 => Some(Rgb([byte(0)?, byte(2)?, byte(4)?])),
        _ => None,
    }
}

fn parse_functional(args: &str, expected: usize) -> Option<Rgb<u8>> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != expected {
        return None;
    }

    let mut channels = [0u8; 3];
    for (channel, part) in channels.iter_mut().zip(&parts) {
        *channel = part.parse().ok()?;
    }

    // Alpha may be fractional; it only has to be well formed
    if expected == 4 {
        parts[3].parse::<f64>().ok()?;
    }

    Some(Rgb(channels))
}

fn named_color(name: &str) -> Option<Rgb<u8>> {
    let rgb = match name {
        "black" => [0, 0, 0],
        "white" => [255, 255, 255],
        "red" => [255, 0, 0],
        "green" => [0, 128, 0],
        "lime" => [0, 255, 0],
        "blue" => [0, 0, 255],
        "yellow" => [255, 255, 0],
        "cyan" | "aqua" => [0, 255, 255],
        "magenta" | "fuchsia" => [255, 0, 255],
        "orange" => [255, 165, 0],
        "purple" => [128, 0, 128],
        "pink" => [255, 192, 203],
        "brown" => [165, 42, 42],
        "gray" | "grey" => [128, 128, 128],
        "darkgray" | "darkgrey" => [169, 169, 169],
        "lightgray" | "lightgrey" => [211, 211, 211],
        "navy" => [0, 0, 128],
        "teal" => [0, 128, 128],
        "olive" => [128, 128, 0],
        "maroon" => [128, 0, 0],
        "gold" => [255, 215, 0],
        "violet" => [238, 130, 238],
        _ => return None,
    };
    Some(Rgb(rgb))
}
