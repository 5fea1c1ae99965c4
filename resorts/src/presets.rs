//! Default camera positions for resorts we ship data for.

use crate::ViewState;

pub struct Preset {
    pub name: &'static str,
    pub view: ViewState,
}

const fn view(latitude: f64, longitude: f64, pitch: f64) -> ViewState {
    ViewState {
        latitude,
        longitude,
        zoom: 13.0,
        bearing: 0.0,
        pitch,
    }
}

pub const PRESETS: &[Preset] = &[
    Preset {
        name: "Palisades Tahoe Olympic Valley",
        view: view(39.1969, -120.2358, 80.0),
    },
    Preset {
        name: "Palisades Tahoe Alpine Meadows",
        view: view(39.1646, -120.2389, 60.0),
    },
    Preset {
        name: "Northstar at Tahoe",
        view: view(39.2746, -120.1211, 60.0),
    },
    Preset {
        name: "Heavenly Mountain",
        view: view(38.9353, -119.9400, 60.0),
    },
    Preset {
        name: "Kirkwood Mountain",
        view: view(38.6850, -120.0654, 60.0),
    },
    Preset {
        name: "Mammoth Mountain",
        view: view(37.6308, -119.0326, 60.0),
    },
];

/// Returns the preset for exactly `name`.
pub fn preset(name: &str) -> Option<ViewState> {
    PRESETS
        .iter()
        .find(|preset| preset.name == name)
        .map(|preset| preset.view)
}

pub fn names() -> impl Iterator<Item = &'static str> {
    PRESETS.iter().map(|preset| preset.name)
}
