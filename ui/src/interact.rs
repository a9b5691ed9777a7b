use serde::Serialize;

use model::{Model, StopId, StopRecord};

use crate::render::Frame;
use crate::viewport::ScreenPt;

// The tooltip floats just above the pointer
const TOOLTIP_LIFT: f64 = 10.0;

#[derive(Clone, Debug, PartialEq)]
pub enum Interaction {
    Idle,
    Hovering(StopId),
    Selected(StopId),
}

/// Ephemeral, follows the pointer while it's over a bubble's hit-region.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Tooltip {
    pub x: f64,
    pub y: f64,
    pub title: String,
    pub subtitle: String,
}

/// The persistent detail panel, opened by clicking a bubble.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PanelContent {
    pub title: String,
    pub wait_text: String,
    pub rank_text: String,
    pub percent_text: String,
    /// Width of the proportional meter bar, 0 to 100
    pub meter_percent: f64,
}

/// A marker pinned to the selected stop on the map.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MapMarker {
    pub lat: f64,
    pub lon: f64,
    pub title: String,
    pub subtitle: String,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ClickOutcome {
    /// A bubble was clicked; replace whatever the panel showed before.
    Selected {
        panel: PanelContent,
        marker: MapMarker,
    },
    /// Background click; any open panel closes.
    Cleared,
}

/// Resolves pointer events against the most recent frame. Owns the selection;
/// at most one stop is selected, last click wins.
pub struct Controller {
    state: Interaction,
}

impl Controller {
    pub fn new() -> Self {
        Self {
            state: Interaction::Idle,
        }
    }

    pub fn state(&self) -> &Interaction {
        &self.state
    }

    /// Hovering is transient and never disturbs an open selection.
    pub fn on_pointer_move(
        &mut self,
        model: &Model,
        frame: &Frame,
        pointer: ScreenPt,
    ) -> Option<Tooltip> {
        let hit = hit_test(frame, pointer);
        match (&self.state, &hit) {
            (Interaction::Selected(_), _) => {}
            (_, Some(id)) => {
                self.state = Interaction::Hovering((*id).clone());
            }
            (_, None) => {
                self.state = Interaction::Idle;
            }
        }
        let record = &model.records[hit?];
        Some(Tooltip {
            x: pointer.x,
            y: pointer.y - TOOLTIP_LIFT,
            title: format!("Stop {}", record.id.0),
            subtitle: format!("Avg wait: {:.1} min", record.wait),
        })
    }

    pub fn on_click(&mut self, model: &Model, frame: &Frame, pointer: ScreenPt) -> ClickOutcome {
        match hit_test(frame, pointer) {
            Some(id) => {
                let record = &model.records[id];
                self.state = Interaction::Selected(id.clone());
                ClickOutcome::Selected {
                    panel: panel_content(model, record),
                    marker: MapMarker {
                        lat: record.lat,
                        lon: record.lon,
                        title: format!("Stop {}", record.id.0),
                        subtitle: format!("Avg wait: {:.1} min", record.wait),
                    },
                }
            }
            None => {
                self.state = Interaction::Idle;
                ClickOutcome::Cleared
            }
        }
    }

    /// The panel's explicit close affordance.
    pub fn on_close(&mut self) {
        self.state = Interaction::Idle;
    }
}

/// The bubble whose hit-region contains the pointer, nearest center first.
/// Ties break towards the earlier stop in the keyed order, so picking is
/// deterministic.
fn hit_test(frame: &Frame, pointer: ScreenPt) -> Option<&StopId> {
    let mut best: Option<(f64, &StopId)> = None;
    for bubble in &frame.bubbles {
        let dist = bubble.center.dist_to(pointer);
        if dist > bubble.hit_radius {
            continue;
        }
        if best.map_or(true, |(best_dist, _)| dist < best_dist) {
            best = Some((dist, &bubble.id));
        }
    }
    best.map(|(_, id)| id)
}

fn panel_content(model: &Model, record: &StopRecord) -> PanelContent {
    let standing = model.standing(record.wait);
    PanelContent {
        title: format!("Stop {}", record.id.0),
        wait_text: format!("{:.2} min", record.wait),
        rank_text: format!("{} of {}", standing.rank(), standing.total),
        percent_text: format!("{:.1}%", standing.percentile()),
        meter_percent: standing.percentile(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use model::Model;

    use super::{ClickOutcome, Controller, Interaction};
    use crate::colors::WaitColorRamp;
    use crate::render::test_viewport::FakeViewport;
    use crate::render::{draw_frame, Frame};
    use crate::scale::RadiusScale;
    use crate::viewport::ScreenPt;

    fn setup(csv: &str) -> (Model, Frame) {
        let model = Model::from_csv(csv.as_bytes()).unwrap();
        let ramp = WaitColorRamp::new(&model.summary);
        let scale = RadiusScale::new(&model.summary);
        let frame = draw_frame(&model, &FakeViewport::at_zoom(12.0), &ramp, &scale);
        (model, frame)
    }

    const FOUR_STOPS: &str = "\
stop_id,stop_lat,stop_lon,wait_time
A,10.0,10.0,2
B,10.0,20.0,4
C,10.0,30.0,4
D,10.0,40.0,7
";

    #[test]
    fn clicking_a_bubble_opens_the_panel() {
        let (model, frame) = setup(FOUR_STOPS);
        let mut controller = Controller::new();

        // Stop B sits at x=2000, y=-1000 under the fake projection
        let outcome = controller.on_click(&model, &frame, ScreenPt::new(2001.0, -1002.0));
        match outcome {
            ClickOutcome::Selected { panel, marker } => {
                assert_eq!(panel.title, "Stop B");
                assert_eq!(panel.wait_text, "4.00 min");
                assert_eq!(panel.rank_text, "2 of 4");
                assert_eq!(panel.percent_text, "33.3%");
                assert!((panel.meter_percent - 100.0 / 3.0).abs() < 1e-9);
                assert_eq!(marker.lat, 10.0);
                assert_eq!(marker.lon, 20.0);
                assert_eq!(marker.subtitle, "Avg wait: 4.0 min");
            }
            ClickOutcome::Cleared => panic!("expected a selection"),
        }
        assert!(matches!(controller.state(), Interaction::Selected(_)));
    }

    #[test]
    fn background_click_clears_the_selection() {
        let (model, frame) = setup(FOUR_STOPS);
        let mut controller = Controller::new();

        controller.on_click(&model, &frame, ScreenPt::new(2000.0, -1000.0));
        let outcome = controller.on_click(&model, &frame, ScreenPt::new(9999.0, 9999.0));
        assert_eq!(outcome, ClickOutcome::Cleared);
        assert_eq!(controller.state(), &Interaction::Idle);
    }

    #[test]
    fn a_new_click_replaces_the_selection() {
        let (model, frame) = setup(FOUR_STOPS);
        let mut controller = Controller::new();

        controller.on_click(&model, &frame, ScreenPt::new(2000.0, -1000.0));
        let outcome = controller.on_click(&model, &frame, ScreenPt::new(4000.0, -1000.0));
        match outcome {
            ClickOutcome::Selected { panel, .. } => {
                assert_eq!(panel.title, "Stop D");
                assert_eq!(panel.rank_text, "4 of 4");
                assert_eq!(panel.percent_text, "100.0%");
            }
            ClickOutcome::Cleared => panic!("expected a selection"),
        }
    }

    #[test]
    fn hovering_shows_a_tooltip_without_selecting() {
        let (model, frame) = setup(FOUR_STOPS);
        let mut controller = Controller::new();

        let tooltip = controller
            .on_pointer_move(&model, &frame, ScreenPt::new(1000.0, -1000.0))
            .unwrap();
        assert_eq!(tooltip.title, "Stop A");
        assert_eq!(tooltip.subtitle, "Avg wait: 2.0 min");
        assert_eq!(tooltip.y, -1010.0);
        assert_eq!(controller.state(), &Interaction::Hovering(frame.bubbles[0].id.clone()));

        // Moving off the bubble drops back to idle, no tooltip
        assert!(controller
            .on_pointer_move(&model, &frame, ScreenPt::new(5000.0, 5000.0))
            .is_none());
        assert_eq!(controller.state(), &Interaction::Idle);
    }

    #[test]
    fn hovering_does_not_disturb_a_selection() {
        let (model, frame) = setup(FOUR_STOPS);
        let mut controller = Controller::new();

        controller.on_click(&model, &frame, ScreenPt::new(2000.0, -1000.0));
        let tooltip = controller.on_pointer_move(&model, &frame, ScreenPt::new(1000.0, -1000.0));
        assert!(tooltip.is_some());
        assert!(matches!(controller.state(), Interaction::Selected(_)));
    }

    #[test]
    fn overlapping_bubbles_pick_the_nearest_center() {
        let (model, frame) = setup(
            "stop_id,stop_lat,stop_lon,wait_time\n\
             near,10.0,10.0,5\n\
             far,10.0,10.1,5\n",
        );
        let mut controller = Controller::new();

        // Between the two, slightly closer to `far`
        let outcome = controller.on_click(&model, &frame, ScreenPt::new(1006.0, -1000.0));
        match outcome {
            ClickOutcome::Selected { panel, .. } => assert_eq!(panel.title, "Stop far"),
            ClickOutcome::Cleared => panic!("expected a selection"),
        }
    }
}
