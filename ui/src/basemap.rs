use serde::Serialize;

/// The interchangeable background tile layers, one active at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Basemap {
    Street,
    Dark,
}

impl Basemap {
    pub const ALL: [Basemap; 2] = [Basemap::Street, Basemap::Dark];

    pub fn label(self) -> &'static str {
        match self {
            Basemap::Street => "Street",
            Basemap::Dark => "Dark",
        }
    }

    pub fn tile_url(self) -> &'static str {
        match self {
            Basemap::Street => "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
            Basemap::Dark => "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png",
        }
    }

    pub fn attribution(self) -> &'static str {
        match self {
            Basemap::Street => "© OpenStreetMap contributors",
            Basemap::Dark => "© CARTO, OSM",
        }
    }

    pub fn max_zoom(self) -> Option<f64> {
        match self {
            Basemap::Street => Some(19.0),
            Basemap::Dark => None,
        }
    }
}

/// The layer-switcher control's state.
pub struct BasemapPicker {
    active: Basemap,
}

impl BasemapPicker {
    pub fn new() -> Self {
        Self {
            active: Basemap::Street,
        }
    }

    pub fn active(&self) -> Basemap {
        self.active
    }

    pub fn choose(&mut self, basemap: Basemap) {
        self.active = basemap;
    }
}
