use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResortsError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    GeoJson(#[from] geojson::Error),

    #[error("{0}")]
    Gpx(#[from] gpx::errors::GpxError),

    #[error("{0}")]
    Exif(#[from] exif::Error),

    #[error("{0}")]
    Image(#[from] image::ImageError),

    #[error("expected a GeoJSON FeatureCollection")]
    NotFeatureCollection,

    #[error("invalid file name '{0}'")]
    InvalidName(String),

    #[error("'{0}' is not a JPEG")]
    NotJpeg(String),

    #[error("'{0}' has no GPS position")]
    NoLocation(String),
}
