//! Node colors: a cyclic rainbow keyed by depth.
//!
//! The rainbow walks the cubehelix color space so that hue wraps around
//! smoothly; depth `0` and depth `height` sit at the two ends of the scale.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fill used for internal nodes whose children are hidden.
pub const COLLAPSED_FILL: Rgb = Rgb::new(0x55, 0x55, 0x55);

/// An opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` or `#rgb`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            6 => Some(Self::new(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
            3 => {
                let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Some(Self::new(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<Rgb> for egui::Color32 {
    fn from(c: Rgb) -> Self {
        egui::Color32::from_rgb(c.r, c.g, c.b)
    }
}

/// Samples the cyclic rainbow at `t`; values outside `[0, 1]` wrap.
pub fn rainbow(t: f32) -> Rgb {
    let t = if (0.0..=1.0).contains(&t) { t } else { t - t.floor() };
    let ts = (t - 0.5).abs();
    cubehelix(360.0 * t - 100.0, 1.5 - 1.5 * ts, 0.8 - 0.9 * ts)
}

fn cubehelix(hue_degrees: f32, saturation: f32, lightness: f32) -> Rgb {
    const A: f32 = -0.14861;
    const B: f32 = 1.78277;
    const C: f32 = -0.29227;
    const D: f32 = -0.90649;
    const E: f32 = 1.97294;

    let h = (hue_degrees + 120.0).to_radians();
    let l = lightness;
    let a = saturation * l * (1.0 - l);
    let (sin_h, cos_h) = h.sin_cos();

    let to_u8 = |v: f32| (255.0 * v).round().clamp(0.0, 255.0) as u8;
    Rgb::new(
        to_u8(l + a * (A * cos_h + B * sin_h)),
        to_u8(l + a * (C * cos_h + D * sin_h)),
        to_u8(l + a * (E * cos_h)),
    )
}

/// Maps a depth in `[0, height]` onto the rainbow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthColorScale {
    height: usize,
}

impl DepthColorScale {
    pub fn new(height: usize) -> Self {
        Self { height }
    }

    /// A degenerate domain (single-level tree) maps to the middle of the scale.
    pub fn color(&self, depth: usize) -> Rgb {
        if self.height == 0 {
            rainbow(0.5)
        } else {
            rainbow(depth as f32 / self.height as f32)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rainbow_endpoints() {
        assert_eq!(rainbow(0.0).to_hex(), "#6e40aa");
        assert_eq!(rainbow(0.0), rainbow(1.0));
        assert_eq!(rainbow(0.25), rainbow(1.25));
    }

    #[test]
    fn test_depth_scale_spreads_colors() {
        let scale = DepthColorScale::new(3);
        let colors: Vec<Rgb> = (0..=3).map(|d| scale.color(d)).collect();
        assert_ne!(colors[1], colors[2]);
        assert_eq!(colors[0], rainbow(0.0));
        assert_eq!(DepthColorScale::new(0).color(0), rainbow(0.5));
    }

    #[test]
    fn test_hex_round_trip() {
        assert_eq!(Rgb::from_hex("#555"), Some(COLLAPSED_FILL));
        assert_eq!(Rgb::from_hex("ff8000"), Some(Rgb::new(255, 128, 0)));
        assert_eq!(Rgb::from_hex("#12345"), None);
        assert_eq!(Rgb::from_hex("#zzzzzz"), None);
        assert_eq!(Rgb::new(1, 2, 3).to_string(), "#010203");
    }
}
