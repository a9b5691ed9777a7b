use std::time::{Duration, Instant};

use serde::Serialize;

pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(30);

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ScreenPt {
    pub x: f64,
    pub y: f64,
}

impl ScreenPt {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dist_to(self, other: ScreenPt) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// The external map camera. The transform changes with every pan/zoom/resize,
/// so project() must be called fresh for every record on every render pass;
/// results are never cacheable across viewport changes.
pub trait Viewport {
    fn zoom(&self) -> f64;
    fn project(&self, lat: f64, lon: f64) -> ScreenPt;
}

/// Coalesces bursts of viewport events into one render. The render that
/// eventually fires always sees the latest viewport state; intermediate
/// states within the window are never rendered.
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Call on every viewport event; restarts the window.
    pub fn bump(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// True exactly once per burst, after the window goes quiet.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn pending(&self) -> bool {
        self.deadline.is_some()
    }
}
