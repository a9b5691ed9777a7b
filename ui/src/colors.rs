use std::fmt;

use serde::{Serialize, Serializer};

use model::DistributionSummary;

/// Short waits
pub const MIN_WAIT_COLOR: Color = Color::rgb(0x3f, 0xb9, 0x50);
/// Average waits
pub const MEAN_WAIT_COLOR: Color = Color::rgb(0xf2, 0xe3, 0x4b);
/// Long waits
pub const MAX_WAIT_COLOR: Color = Color::rgb(0xd7, 0x3a, 0x49);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn lerp(self, other: Color, pct: f64) -> Color {
        Color {
            r: lerp_channel(self.r, other.r, pct),
            g: lerp_channel(self.g, other.g, pct),
            b: lerp_channel(self.b, other.b, pct),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

// Embedders get the form they can feed straight to a fill attribute
impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn lerp_channel(a: u8, b: u8, pct: f64) -> u8 {
    (a as f64 + (b as f64 - a as f64) * pct).round() as u8
}

/// Piecewise-linear green -> yellow -> red over [min, mean, max], clamped at
/// both ends. The control points evaluate to their colors exactly.
#[derive(Clone, Copy, Debug)]
pub struct WaitColorRamp {
    min: f64,
    mean: f64,
    max: f64,
}

impl WaitColorRamp {
    pub fn new(summary: &DistributionSummary) -> Self {
        Self {
            min: summary.min,
            mean: summary.mean,
            max: summary.max,
        }
    }

    pub fn eval(&self, wait: f64) -> Color {
        if wait <= self.min {
            MIN_WAIT_COLOR
        } else if wait < self.mean {
            MIN_WAIT_COLOR.lerp(MEAN_WAIT_COLOR, (wait - self.min) / (self.mean - self.min))
        } else if wait < self.max {
            MEAN_WAIT_COLOR.lerp(MAX_WAIT_COLOR, (wait - self.mean) / (self.max - self.mean))
        } else {
            MAX_WAIT_COLOR
        }
    }
}
