//! Edge Bleeding for Sprite Transparency Halos
//!
//! Problem: fully transparent pixels that still carry RGB(0,0,0) cause grey
//! halos when a renderer's texture sampler interpolates between transparent
//! and opaque pixels at sprite edges.
//!
//! Fix: rewrite the color channels of those pixels to the color of their
//! nearest opaque neighbor, so filtering blends toward the visible color
//! instead of black. The alpha channel is never modified.

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::Result;

/// Alpha values above this count as opaque when searching for a bleed source.
const OPAQUE_CUTOFF: u8 = 128;

/// Color written when no opaque pixel exists within the search radius.
/// Matches the white-transparent convention for empty sprite regions.
const FALLBACK_RGB: [u8; 3] = [255, 255, 255];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BleedSettings {
    /// Maximum ring radius to search for an opaque neighbor (default: 10)
    pub max_radius: u32,
}

impl Default for BleedSettings {
    fn default() -> Self {
        Self { max_radius: 10 }
    }
}

/// Per-image status after a bleed pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FixStatus {
    /// No fix targets in the image
    #[serde(rename = "OK")]
    Ok,
    /// Fix targets found and rewritten
    #[serde(rename = "fixed")]
    Fixed,
    /// Preview mode: fix targets counted, nothing modified
    #[serde(rename = "would fix")]
    WouldFix,
}

impl fmt::Display for FixStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixStatus::Ok => write!(f, "OK"),
            FixStatus::Fixed => write!(f, "fixed"),
            FixStatus::WouldFix => write!(f, "would fix"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct BleedOutcome {
    /// Number of pixels rewritten (or counted, in preview mode)
    pub pixels: usize,
    pub status: FixStatus,
}

// ============================================================================
// CORE ALGORITHM
// ============================================================================

/// Scan the image in row-major order and collect every fix target: a fully
/// transparent pixel whose RGB is not already white.
///
/// The list is complete before any mutation starts. White-transparent pixels
/// need no repair, which also terminates propagation between passes.
pub fn find_fix_targets(img: &RgbaImage) -> Vec<(u32, u32)> {
    let (width, height) = img.dimensions();
    let mut targets = Vec::new();

    for y in 0..height {
        for x in 0..width {
            let pixel = img.get_pixel(x, y);
            if pixel[3] == 0 && (pixel[0], pixel[1], pixel[2]) != (255, 255, 255) {
                targets.push((x, y));
            }
        }
    }

    targets
}

/// Find the color of the nearest opaque pixel via expanding ring search.
///
/// Rings are square perimeters at Chebyshev distance 1..=max_radius. Each
/// ring is enumerated with dx ascending then dy ascending, and the first
/// opaque pixel found wins, so ties within a ring are broken by scan order
/// rather than Euclidean distance. Returns white when every ring comes up
/// empty.
pub fn nearest_opaque_color(img: &RgbaImage, x: u32, y: u32, max_radius: u32) -> [u8; 3] {
    let (width, height) = img.dimensions();

    for radius in 1..=max_radius as i32 {
        for dx in -radius..=radius {
            for dy in -radius..=radius {
                if dx.abs() != radius && dy.abs() != radius {
                    // Interior of the ring was covered at a smaller radius
                    continue;
                }

                let nx = x as i32 + dx;
                let ny = y as i32 + dy;
                if nx < 0 || ny < 0 || nx >= width as i32 || ny >= height as i32 {
                    continue;
                }

                let pixel = img.get_pixel(nx as u32, ny as u32);
                if pixel[3] > OPAQUE_CUTOFF {
                    return [pixel[0], pixel[1], pixel[2]];
                }
            }
        }
    }

    FALLBACK_RGB
}

/// Rewrite the color channels of every fix target in place.
///
/// Alpha is preserved exactly, so a fixed pixel can never be picked up as an
/// opaque neighbor by a later search in the same pass.
pub fn bleed_image(img: &mut RgbaImage, settings: &BleedSettings) -> BleedOutcome {
    let targets = find_fix_targets(img);
    if targets.is_empty() {
        return BleedOutcome {
            pixels: 0,
            status: FixStatus::Ok,
        };
    }

    for &(x, y) in &targets {
        let [r, g, b] = nearest_opaque_color(img, x, y, settings.max_radius);
        let alpha = img.get_pixel(x, y)[3];
        img.put_pixel(x, y, Rgba([r, g, b, alpha]));
    }

    BleedOutcome {
        pixels: targets.len(),
        status: FixStatus::Fixed,
    }
}

/// Count fix targets without touching the image. The count reflects how many
/// pixels qualify, independent of whether a neighbor search would succeed.
pub fn preview_image(img: &RgbaImage) -> BleedOutcome {
    let pixels = find_fix_targets(img).len();
    let status = if pixels == 0 {
        FixStatus::Ok
    } else {
        FixStatus::WouldFix
    };
    BleedOutcome { pixels, status }
}

// ============================================================================
// FILE-LEVEL OPERATION
// ============================================================================

/// Fix a single sprite file in place.
///
/// The file is rewritten only when at least one pixel changed; preview mode
/// never writes. PNG re-encoding of the RGBA buffer is lossless, so pixels
/// outside the fix set survive the round-trip byte-identical.
pub fn fix_sprite(path: &Path, settings: &BleedSettings, preview: bool) -> Result<BleedOutcome> {
    let mut img = image::open(path)?.to_rgba8();

    if preview {
        return Ok(preview_image(&img));
    }

    let outcome = bleed_image(&mut img, settings);
    if outcome.pixels > 0 {
        img.save(path)?;
    }
    Ok(outcome)
}

// ============================================================================
// TESTS
// ============================================================================
