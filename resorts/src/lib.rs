//! Ski resort data: runs, lifts, and ski areas from GeoJSON, recorded
//! GPX tracks, geotagged photos, and saved map camera positions.
//!
//! Geometry is measured with [`slopes`]; this crate only finds,
//! reads, and writes the data.

mod atomic;
mod data_dir;
mod error;
mod features;
mod photos;
pub mod presets;
mod ski_area;
mod tracks;
mod view_state;

pub use crate::{
    data_dir::DataDir,
    error::ResortsError,
    features::{
        append_resort, augment, feature_name, feature_paths, positions, read_metrics,
        sanitize_file_name, write_collection, FeatureSource, ResortMatch, SplitOutput,
    },
    photos::{read_location, sanitize_photo_name, Photo, PhotoLibrary, PhotoLocation},
    ski_area::{Bounds, SkiArea},
    tracks::{Imported, Track, TrackLibrary, TrackPoint},
    view_state::{Fallback, JsonFileStore, MemStore, ViewState, ViewStateStore},
};
pub use {geojson, slopes};
