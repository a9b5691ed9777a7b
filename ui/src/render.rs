use serde::Serialize;

use model::{Model, StopId};

use crate::colors::{Color, WaitColorRamp};
use crate::scale::RadiusScale;
use crate::viewport::{ScreenPt, Viewport};

/// Stop labels only appear once zoomed in this far
pub const LABEL_MIN_ZOOM: f64 = 15.0;
// Small bubbles still get a comfortable click target
const MIN_HIT_RADIUS: f64 = 14.0;
const LABEL_GAP: f64 = 6.0;

/// Everything needed to draw one stop this frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Bubble {
    pub id: StopId,
    pub center: ScreenPt,
    pub radius: f64,
    pub fill: Color,
    /// The invisible circle used for pointer targeting
    pub hit_radius: f64,
    /// Where the stop label sits, just above the bubble
    pub label_anchor: ScreenPt,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Frame {
    pub bubbles: Vec<Bubble>,
    pub labels_visible: bool,
}

/// Recomputes every stop's screen position, size, and fill from the current
/// viewport. A full pass, not a diff; calling it again with nothing changed
/// yields an identical frame.
pub fn draw_frame(
    model: &Model,
    viewport: &dyn Viewport,
    ramp: &WaitColorRamp,
    scale: &RadiusScale,
) -> Frame {
    let zoom = viewport.zoom();
    let mut bubbles = Vec::with_capacity(model.records.len());
    for rec in model.records.values() {
        let center = viewport.project(rec.lat, rec.lon);
        let radius = scale.at_zoom(rec.wait, zoom);
        bubbles.push(Bubble {
            id: rec.id.clone(),
            center,
            radius,
            fill: ramp.eval(rec.wait),
            hit_radius: (0.8 * radius).max(MIN_HIT_RADIUS),
            label_anchor: ScreenPt::new(center.x, center.y - (radius + LABEL_GAP)),
        });
    }
    Frame {
        bubbles,
        labels_visible: zoom >= LABEL_MIN_ZOOM,
    }
}

#[cfg(test)]
pub mod test_viewport {
    use crate::viewport::{ScreenPt, Viewport};

    /// Equirectangular stand-in for the real map camera.
    pub struct FakeViewport {
        pub zoom: f64,
        pub scale: f64,
    }

    impl FakeViewport {
        pub fn at_zoom(zoom: f64) -> Self {
            Self { zoom, scale: 100.0 }
        }
    }

    impl Viewport for FakeViewport {
        fn zoom(&self) -> f64 {
            self.zoom
        }

        fn project(&self, lat: f64, lon: f64) -> ScreenPt {
            ScreenPt::new(self.scale * lon, -self.scale * lat)
        }
    }
}
