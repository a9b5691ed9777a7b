use model::DistributionSummary;

pub const MIN_RADIUS: f64 = 3.0;
pub const MAX_RADIUS: f64 = 33.0;
/// The baseline zoom level bubbles are sized for
pub const REFERENCE_ZOOM: f64 = 12.0;

/// Square-root scale from wait time to a pixel radius, so bubble area (not
/// radius) grows linearly with wait. Clamped to [min, max], same as the color
/// ramp.
#[derive(Clone, Copy, Debug)]
pub struct RadiusScale {
    min: f64,
    max: f64,
}

impl RadiusScale {
    pub fn new(summary: &DistributionSummary) -> Self {
        Self {
            min: summary.min,
            max: summary.max,
        }
    }

    pub fn base(&self, wait: f64) -> f64 {
        if self.max == self.min {
            return MIN_RADIUS;
        }
        let pct = ((wait - self.min) / (self.max - self.min)).clamp(0.0, 1.0);
        MIN_RADIUS + pct.sqrt() * (MAX_RADIUS - MIN_RADIUS)
    }

    /// Scales the base radius so bubbles keep a consistent screen size as the
    /// map zooms in and out.
    pub fn at_zoom(&self, wait: f64, zoom: f64) -> f64 {
        self.base(wait) * 2f64.powf(zoom - REFERENCE_ZOOM)
    }
}
