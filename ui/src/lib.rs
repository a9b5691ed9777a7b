#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod app;
mod basemap;
mod colors;
mod interact;
mod legend;
mod loader;
mod render;
mod scale;
mod viewport;

pub use self::app::{App, DataFormat, Session, LOADING_TEXT, LOAD_FAILED_TEXT};
pub use self::basemap::{Basemap, BasemapPicker};
pub use self::colors::{Color, WaitColorRamp, MAX_WAIT_COLOR, MEAN_WAIT_COLOR, MIN_WAIT_COLOR};
pub use self::interact::{
    ClickOutcome, Controller, Interaction, MapMarker, PanelContent, Tooltip,
};
pub use self::legend::{Legend, RampStop, SizeSwatch};
pub use self::loader::{begin_fetch, DatasetFetch, DatasetSender};
pub use self::render::{draw_frame, Bubble, Frame, LABEL_MIN_ZOOM};
pub use self::scale::{RadiusScale, MAX_RADIUS, MIN_RADIUS, REFERENCE_ZOOM};
pub use self::viewport::{Debouncer, ScreenPt, Viewport, DEBOUNCE_DELAY};
