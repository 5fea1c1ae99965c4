use clap::{builder::NonEmptyStringValueParser, ArgGroup, Args, Parser, Subcommand};
use resorts::DataDir;
use std::path::PathBuf;

/// Explore ski resort runs, lifts, and recorded tracks.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding resort data.
    #[arg(short, long, env = "SKIMAP_DATA_DIR", default_value = DataDir::DEFAULT_ROOT)]
    pub data_dir: PathBuf,

    /// Runs GeoJSON (defaults to <DATA_DIR>/runs.geojson).
    #[arg(long, env = "SKIMAP_RUNS")]
    pub runs: Option<PathBuf>,

    /// Lifts GeoJSON (defaults to <DATA_DIR>/lifts.geojson).
    #[arg(long, env = "SKIMAP_LIFTS")]
    pub lifts: Option<PathBuf>,

    /// Ski area GeoJSON (defaults to <DATA_DIR>/ski_areas.geojson).
    #[arg(long, env = "SKIMAP_SKI_AREAS")]
    pub ski_areas: Option<PathBuf>,

    /// Saved view states (defaults to
    /// <DATA_DIR>/ski_areas_viewstate.json).
    #[arg(long, env = "SKIMAP_VIEW_STATES")]
    pub view_states: Option<PathBuf>,

    /// GPX track directory (defaults to <DATA_DIR>/GPS).
    #[arg(long, env = "SKIMAP_TRACKS")]
    pub tracks: Option<PathBuf>,

    /// Photo directory (defaults to <DATA_DIR>/uploads).
    #[arg(long, env = "SKIMAP_PHOTOS")]
    pub photos: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Command,
}

impl Cli {
    pub fn data_dir(&self) -> DataDir {
        DataDir::new(&self.data_dir)
            .with_runs(self.runs.clone())
            .with_lifts(self.lifts.clone())
            .with_ski_areas(self.ski_areas.clone())
            .with_view_states(self.view_states.clone())
            .with_tracks(self.tracks.clone())
            .with_photos(self.photos.clone())
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print a resort's runs, with length, drop, and slope.
    Runs(Resort),

    /// Print a resort's lifts, with length, drop, and slope.
    Lifts(Resort),

    /// Print a ski area's boundary and bounding box.
    Area(Area),

    /// Manage recorded GPX tracks.
    #[command(subcommand)]
    Track(TrackCmd),

    /// Manage geotagged photos.
    #[command(subcommand)]
    Photo(PhotoCmd),

    /// Print marker positions animating along a lift or track.
    Animate(Animate),

    /// Read or save a resort's map camera.
    #[command(subcommand)]
    ViewState(ViewStateCmd),

    /// Copy one resort's features out of a large GeoJSON file.
    Extract(Extract),

    /// Append each resort's features to its own file.
    Split(Split),
}

#[derive(Debug, Clone, Args)]
pub struct Resort {
    /// Resort name, or any part of it (case-insensitive).
    #[arg(short, long, value_parser = NonEmptyStringValueParser::new())]
    pub resort: String,

    /// Print a CSV summary instead of GeoJSON.
    #[arg(long)]
    pub csv: bool,
}

#[derive(Debug, Clone, Args)]
pub struct Area {
    /// Ski area name, or any part of it (case-insensitive).
    #[arg(short, long, value_parser = NonEmptyStringValueParser::new())]
    pub name: String,
}

#[derive(Debug, Clone, Subcommand)]
pub enum TrackCmd {
    /// List tracks in the library.
    List,

    /// Print a track's metrics.
    Show(ShowTrack),

    /// Add a GPX file to the library.
    Import(ImportTrack),
}

#[derive(Debug, Clone, Args)]
pub struct ShowTrack {
    /// Track file name, as printed by `track list`.
    #[arg(value_parser = NonEmptyStringValueParser::new())]
    pub file: String,

    /// Plot the elevation profile to the terminal.
    #[arg(long)]
    pub plot: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ImportTrack {
    /// GPX file to import.
    pub path: PathBuf,
}

#[derive(Debug, Clone, Subcommand)]
pub enum PhotoCmd {
    /// List photos with their GPS positions.
    List,

    /// Add a geotagged JPEG to the library and make its thumbnail.
    Import(ImportPhoto),
}

#[derive(Debug, Clone, Args)]
pub struct ImportPhoto {
    /// JPEG file to import.
    pub path: PathBuf,
}

#[derive(Debug, Clone, Args)]
#[command(group(ArgGroup::new("source").required(true).args(["lift", "track"])))]
pub struct Animate {
    /// Lift name, or any part of it (case-insensitive).
    #[arg(long, requires = "resort", value_parser = NonEmptyStringValueParser::new())]
    pub lift: Option<String>,

    /// Resort the lift belongs to.
    #[arg(short, long, value_parser = NonEmptyStringValueParser::new())]
    pub resort: Option<String>,

    /// Track file name from the library.
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    pub track: Option<String>,

    /// Number of frames to print.
    #[arg(short, long, default_value_t = 60)]
    pub frames: usize,

    /// Time for one pass, in milliseconds.
    #[arg(short, long, default_value_t = 6_000)]
    pub period_ms: u64,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ViewStateCmd {
    /// Print the saved (or default) camera for a resort.
    Get(GetViewState),

    /// Save a resort's camera.
    Set(SetViewState),
}

#[derive(Debug, Clone, Args)]
pub struct GetViewState {
    /// Exact resort name.
    #[arg(short, long, value_parser = NonEmptyStringValueParser::new())]
    pub resort: String,
}

#[derive(Debug, Clone, Args)]
pub struct SetViewState {
    /// Exact resort name.
    #[arg(short, long, value_parser = NonEmptyStringValueParser::new())]
    pub resort: String,

    #[arg(long, allow_negative_numbers = true)]
    pub latitude: f64,

    #[arg(long, allow_negative_numbers = true)]
    pub longitude: f64,

    #[arg(long)]
    pub zoom: f64,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub bearing: f64,

    #[arg(long, default_value_t = 0.0)]
    pub pitch: f64,
}

#[derive(Debug, Clone, Args)]
pub struct Extract {
    /// Source GeoJSON feature collection.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Exact ski area name.
    #[arg(short, long, value_parser = NonEmptyStringValueParser::new())]
    pub resort: String,

    /// Output file (defaults to `filtered_<input name>` beside the
    /// input).
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct Split {
    /// Source GeoJSON feature collection.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output directory (defaults to the input's directory).
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Exact ski area names to split out.
    #[arg(
        short,
        long = "resort",
        required = true,
        value_parser = NonEmptyStringValueParser::new()
    )]
    pub resorts: Vec<String>,
}
