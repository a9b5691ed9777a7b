use serde::Serialize;

use model::DistributionSummary;

use crate::colors::{Color, WaitColorRamp};
use crate::scale::RadiusScale;

/// A declarative legend: what the encodings mean, with none of the markup.
/// The embedder renders it however it likes.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Legend {
    pub title: String,
    /// The color ramp's control points, left to right
    pub ramp: Vec<RampStop>,
    /// Sample bubble sizes at the quartiles and mean
    pub sizes: Vec<SizeSwatch>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RampStop {
    pub label: String,
    pub color: Color,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SizeSwatch {
    pub label: String,
    pub diameter: f64,
}

impl Legend {
    pub fn build(
        summary: &DistributionSummary,
        ramp: &WaitColorRamp,
        scale: &RadiusScale,
    ) -> Self {
        let ramp_stop = |label: String, wait: f64| RampStop {
            label,
            color: ramp.eval(wait),
        };
        let swatch = |wait: f64| SizeSwatch {
            label: format!("{wait:.1}m"),
            diameter: 2.0 * scale.base(wait),
        };
        Self {
            title: "Wait time".to_string(),
            ramp: vec![
                ramp_stop(format!("{:.1}m", summary.min), summary.min),
                ramp_stop(format!("avg {:.1}m", summary.mean), summary.mean),
                ramp_stop(format!("{:.1}m", summary.max), summary.max),
            ],
            sizes: vec![swatch(summary.q1), swatch(summary.mean), swatch(summary.q3)],
        }
    }
}
