use std::path::{Path, PathBuf};

/// File layout of resort data on disk.
///
/// Every file defaults to a fixed name under `root`, and each can be
/// pointed elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDir {
    root: PathBuf,
    runs: Option<PathBuf>,
    lifts: Option<PathBuf>,
    ski_areas: Option<PathBuf>,
    view_states: Option<PathBuf>,
    tracks: Option<PathBuf>,
    photos: Option<PathBuf>,
}

impl Default for DataDir {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ROOT)
    }
}

impl DataDir {
    pub const DEFAULT_ROOT: &'static str = "JSON";
    pub const RUNS: &'static str = "runs.geojson";
    pub const LIFTS: &'static str = "lifts.geojson";
    pub const SKI_AREAS: &'static str = "ski_areas.geojson";
    pub const VIEW_STATES: &'static str = "ski_areas_viewstate.json";
    pub const TRACKS: &'static str = "GPS";
    pub const PHOTOS: &'static str = "uploads";

    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            runs: None,
            lifts: None,
            ski_areas: None,
            view_states: None,
            tracks: None,
            photos: None,
        }
    }

    #[must_use]
    pub fn with_runs(mut self, path: Option<PathBuf>) -> Self {
        self.runs = path;
        self
    }

    #[must_use]
    pub fn with_lifts(mut self, path: Option<PathBuf>) -> Self {
        self.lifts = path;
        self
    }

    #[must_use]
    pub fn with_ski_areas(mut self, path: Option<PathBuf>) -> Self {
        self.ski_areas = path;
        self
    }

    #[must_use]
    pub fn with_view_states(mut self, path: Option<PathBuf>) -> Self {
        self.view_states = path;
        self
    }

    #[must_use]
    pub fn with_tracks(mut self, path: Option<PathBuf>) -> Self {
        self.tracks = path;
        self
    }

    #[must_use]
    pub fn with_photos(mut self, path: Option<PathBuf>) -> Self {
        self.photos = path;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn runs(&self) -> PathBuf {
        self.resolve(self.runs.as_deref(), Self::RUNS)
    }

    pub fn lifts(&self) -> PathBuf {
        self.resolve(self.lifts.as_deref(), Self::LIFTS)
    }

    pub fn ski_areas(&self) -> PathBuf {
        self.resolve(self.ski_areas.as_deref(), Self::SKI_AREAS)
    }

    pub fn view_states(&self) -> PathBuf {
        self.resolve(self.view_states.as_deref(), Self::VIEW_STATES)
    }

    /// Directory of uploaded GPX tracks.
    pub fn tracks(&self) -> PathBuf {
        self.resolve(self.tracks.as_deref(), Self::TRACKS)
    }

    /// Directory of uploaded photos and their thumbnails.
    pub fn photos(&self) -> PathBuf {
        self.resolve(self.photos.as_deref(), Self::PHOTOS)
    }

    fn resolve(&self, custom: Option<&Path>, default_name: &str) -> PathBuf {
        custom.map_or_else(|| self.root.join(default_name), Path::to_path_buf)
    }
}
