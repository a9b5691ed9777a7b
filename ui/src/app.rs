use std::io::Cursor;
use std::time::Instant;

use anyhow::Result;

use model::Model;

use crate::basemap::BasemapPicker;
use crate::colors::WaitColorRamp;
use crate::interact::{ClickOutcome, Controller, Tooltip};
use crate::legend::Legend;
use crate::loader::DatasetFetch;
use crate::render::{draw_frame, Frame};
use crate::scale::RadiusScale;
use crate::viewport::{Debouncer, ScreenPt, Viewport, DEBOUNCE_DELAY};

pub const LOADING_TEXT: &str = "Loading data...";
pub const LOAD_FAILED_TEXT: &str = "Failed to load data";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataFormat {
    /// A precomputed stop_id,stop_lat,stop_lon,wait_time file
    WaitTimeCsv,
    /// A raw GTFS feed archive; wait times get derived from the timetable
    GtfsZip,
}

/// The whole app: one startup fetch, then a session over the loaded dataset.
/// A failed load is terminal; there's no retry beyond reloading the page.
pub struct App {
    state: AppState,
}

enum AppState {
    Loading { fetch: DatasetFetch, format: DataFormat },
    Failed(String),
    Ready(Session),
}

impl App {
    pub fn new(fetch: DatasetFetch, format: DataFormat) -> Self {
        Self {
            state: AppState::Loading { fetch, format },
        }
    }

    /// Drive the startup fetch from the event loop. True when the state
    /// changed, meaning the status element and overlay need refreshing.
    pub fn poll_load(&mut self, viewport: &dyn Viewport) -> bool {
        let (result, format) = match &mut self.state {
            AppState::Loading { fetch, format } => match fetch.poll() {
                Some(result) => (result, *format),
                None => {
                    return false;
                }
            },
            _ => {
                return false;
            }
        };

        self.state = match result.and_then(|bytes| parse(&bytes, format)) {
            Ok(model) => AppState::Ready(Session::new(model, viewport)),
            Err(err) => {
                error!("Loading the dataset failed: {err}");
                AppState::Failed(LOAD_FAILED_TEXT.to_string())
            }
        };
        true
    }

    /// What the loading-status element should show; None once it can hide.
    pub fn status_text(&self) -> Option<&str> {
        match &self.state {
            AppState::Loading { .. } => Some(LOADING_TEXT),
            AppState::Failed(msg) => Some(msg),
            AppState::Ready(_) => None,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            AppState::Ready(session) => Some(session),
            _ => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        match &mut self.state {
            AppState::Ready(session) => Some(session),
            _ => None,
        }
    }

    pub fn frame(&self) -> Option<&Frame> {
        self.session().map(|session| &session.frame)
    }
}

fn parse(bytes: &[u8], format: DataFormat) -> Result<Model> {
    match format {
        DataFormat::WaitTimeCsv => Model::from_csv(bytes),
        DataFormat::GtfsZip => Model::from_gtfs_zip(Cursor::new(bytes)),
    }
}

/// Everything alive after a successful load. The dataset and its encodings
/// are fixed; only the frame and the interaction state change.
pub struct Session {
    pub model: Model,
    pub ramp: WaitColorRamp,
    pub scale: RadiusScale,
    pub legend: Legend,
    pub basemaps: BasemapPicker,
    pub controller: Controller,
    pub frame: Frame,
    debouncer: Debouncer,
}

impl Session {
    fn new(model: Model, viewport: &dyn Viewport) -> Self {
        let ramp = WaitColorRamp::new(&model.summary);
        let scale = RadiusScale::new(&model.summary);
        let legend = Legend::build(&model.summary, &ramp, &scale);
        // First render happens immediately; later ones wait on the debouncer
        let frame = draw_frame(&model, viewport, &ramp, &scale);
        Self {
            model,
            ramp,
            scale,
            legend,
            basemaps: BasemapPicker::new(),
            controller: Controller::new(),
            frame,
            debouncer: Debouncer::new(DEBOUNCE_DELAY),
        }
    }

    /// Any pan/zoom/resize notification from the map.
    pub fn on_viewport_event(&mut self, now: Instant) {
        self.debouncer.bump(now);
    }

    /// Call once per event-loop turn. Rerenders at most once per debounce
    /// window, against whatever the viewport says at that moment.
    pub fn on_tick(&mut self, now: Instant, viewport: &dyn Viewport) -> bool {
        if !self.debouncer.fire(now) {
            return false;
        }
        self.frame = draw_frame(&self.model, viewport, &self.ramp, &self.scale);
        true
    }

    pub fn on_pointer_move(&mut self, pointer: ScreenPt) -> Option<Tooltip> {
        self.controller
            .on_pointer_move(&self.model, &self.frame, pointer)
    }

    pub fn on_click(&mut self, pointer: ScreenPt) -> ClickOutcome {
        self.controller.on_click(&self.model, &self.frame, pointer)
    }

    pub fn on_panel_closed(&mut self) {
        self.controller.on_close();
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use crate::loader::begin_fetch;
    use crate::render::test_viewport::FakeViewport;
    use crate::render::LABEL_MIN_ZOOM;

    use super::{App, DataFormat, LOADING_TEXT, LOAD_FAILED_TEXT};

    const CSV: &str = "\
stop_id,stop_lat,stop_lon,wait_time
A,45.5,-122.6,2
B,45.6,-122.7,4
C,45.7,-122.8,6
";

    #[test]
    fn load_then_render() {
        let (tx, fetch) = begin_fetch();
        let mut app = App::new(fetch, DataFormat::WaitTimeCsv);
        let viewport = FakeViewport::at_zoom(12.0);

        assert_eq!(app.status_text(), Some(LOADING_TEXT));
        assert!(!app.poll_load(&viewport));
        assert!(app.frame().is_none());

        tx.finish(Ok(CSV.as_bytes().to_vec()));
        assert!(app.poll_load(&viewport));
        assert_eq!(app.status_text(), None);
        assert_eq!(app.frame().unwrap().bubbles.len(), 3);
        assert_eq!(app.session().unwrap().legend.ramp.len(), 3);
    }

    #[test]
    fn fetch_failure_is_terminal() {
        let (tx, fetch) = begin_fetch();
        let mut app = App::new(fetch, DataFormat::WaitTimeCsv);
        let viewport = FakeViewport::at_zoom(12.0);

        tx.finish(Err(anyhow!("connection reset")));
        assert!(app.poll_load(&viewport));
        assert_eq!(app.status_text(), Some(LOAD_FAILED_TEXT));
        assert!(app.frame().is_none());
        // Polling again does nothing; the failure sticks
        assert!(!app.poll_load(&viewport));
    }

    #[test]
    fn a_dataset_with_no_valid_rows_fails_the_load() {
        let (tx, fetch) = begin_fetch();
        let mut app = App::new(fetch, DataFormat::WaitTimeCsv);
        let viewport = FakeViewport::at_zoom(12.0);

        tx.finish(Ok(
            b"stop_id,stop_lat,stop_lon,wait_time\nA,nope,nope,nope\n".to_vec()
        ));
        assert!(app.poll_load(&viewport));
        assert_eq!(app.status_text(), Some(LOAD_FAILED_TEXT));
    }

    #[test]
    fn viewport_bursts_rerender_once_with_the_latest_state() {
        let (tx, fetch) = begin_fetch();
        let mut app = App::new(fetch, DataFormat::WaitTimeCsv);
        tx.finish(Ok(CSV.as_bytes().to_vec()));
        assert!(app.poll_load(&FakeViewport::at_zoom(12.0)));

        let session = app.session_mut().unwrap();
        assert!(!session.frame.labels_visible);

        // A pan/zoom gesture: several events, then quiet
        let start = Instant::now();
        for i in 0..5 {
            session.on_viewport_event(start + Duration::from_millis(i));
        }
        // Mid-gesture, nothing renders
        assert!(!session.on_tick(
            start + Duration::from_millis(10),
            &FakeViewport::at_zoom(13.0)
        ));

        // The window expires; the render sees the final viewport, not any
        // intermediate one
        let zoomed = FakeViewport::at_zoom(LABEL_MIN_ZOOM);
        assert!(session.on_tick(start + Duration::from_millis(60), &zoomed));
        assert!(session.frame.labels_visible);
        assert!(!session.on_tick(start + Duration::from_millis(70), &zoomed));
    }
}
