//! Geotagged photos, stored with a square thumbnail beside them.

use crate::ResortsError;
use exif::{DateTime, Exif, In, Tag, Value};
use image::{codecs::jpeg::JpegEncoder, imageops::FilterType, ImageFormat};
use log::debug;
use serde::Serialize;
use std::{
    collections::BTreeSet,
    ffi::OsStr,
    fs::{self, File, OpenOptions},
    io::{BufRead, BufReader, Cursor, ErrorKind, Seek, Write},
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

/// Where, and maybe when, a photo was taken.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhotoLocation {
    pub latitude: f64,
    pub longitude: f64,

    /// `DateTimeOriginal` as `YYYY-MM-DDTHH:MM:SS`, camera local time.
    pub timestamp: Option<String>,
}

/// Reads the EXIF GPS position of a JPEG.
///
/// Returns `None` when the image has no EXIF data or no GPS position.
pub fn read_location<R: BufRead + Seek>(
    reader: &mut R,
) -> Result<Option<PhotoLocation>, ResortsError> {
    let exif = match exif::Reader::new().read_from_container(reader) {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(_)) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let (Some(latitude), Some(longitude)) = (
        coordinate(&exif, Tag::GPSLatitude, Tag::GPSLatitudeRef, b"S"),
        coordinate(&exif, Tag::GPSLongitude, Tag::GPSLongitudeRef, b"W"),
    ) else {
        return Ok(None);
    };
    Ok(Some(PhotoLocation {
        latitude,
        longitude,
        timestamp: timestamp(&exif),
    }))
}

/// Degrees, minutes, and seconds folded into signed decimal degrees.
fn coordinate(exif: &Exif, tag: Tag, ref_tag: Tag, negative: &[u8]) -> Option<f64> {
    let Value::Rational(dms) = &exif.get_field(tag, In::PRIMARY)?.value else {
        return None;
    };
    let [deg, min, sec] = dms.as_slice() else {
        return None;
    };
    let degrees = deg.to_f64() + min.to_f64() / 60.0 + sec.to_f64() / 3_600.0;
    if !degrees.is_finite() {
        return None;
    }
    if ascii(exif, ref_tag) == Some(negative) {
        Some(-degrees)
    } else {
        Some(degrees)
    }
}

fn timestamp(exif: &Exif) -> Option<String> {
    let dt = DateTime::from_ascii(ascii(exif, Tag::DateTimeOriginal)?).ok()?;
    Some(format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
        dt.year, dt.month, dt.day, dt.hour, dt.minute, dt.second
    ))
}

fn ascii(exif: &Exif, tag: Tag) -> Option<&[u8]> {
    match &exif.get_field(tag, In::PRIMARY)?.value {
        Value::Ascii(values) => values.first().map(Vec::as_slice),
        _ => None,
    }
}

/// A photo added by [`PhotoLibrary::import`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Photo {
    /// Stored file name, for [`PhotoLibrary::photo_path`].
    pub file: String,

    /// Thumbnail file name, for [`PhotoLibrary::thumbnail_path`].
    pub thumbnail: String,

    #[serde(flatten)]
    pub location: PhotoLocation,
}

/// A directory of JPEG photos with a `thumbnails` directory inside.
#[derive(Debug, Clone)]
pub struct PhotoLibrary {
    dir: PathBuf,
}

impl PhotoLibrary {
    pub const THUMBNAILS: &'static str = "thumbnails";

    /// Width and height of every thumbnail.
    pub const THUMBNAIL_SIZE: u32 = 120;

    const THUMBNAIL_QUALITY: u8 = 80;

    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the sorted file names of all stored photos.
    ///
    /// The directory is created if it doesn't exist yet.
    pub fn list(&self) -> Result<Vec<String>, ResortsError> {
        fs::create_dir_all(&self.dir)?;
        let mut names = BTreeSet::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.is_file() || !is_jpeg_name(&path) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(OsStr::to_str) {
                names.insert(name.to_owned());
            }
        }
        Ok(names.into_iter().collect())
    }

    /// Copies the photo at `src` into the library and writes its
    /// thumbnail.
    ///
    /// The file must be a JPEG with a GPS position. It is stored under
    /// a new unique name, so nothing already in the library is ever
    /// overwritten.
    pub fn import<P: AsRef<Path>>(&self, src: P) -> Result<Photo, ResortsError> {
        let src = src.as_ref();
        let name = src
            .file_name()
            .and_then(OsStr::to_str)
            .ok_or_else(|| ResortsError::InvalidName(src.display().to_string()))?;
        let now = std::time::Instant::now();

        let bytes = fs::read(src)?;
        if image::guess_format(&bytes).ok() != Some(ImageFormat::Jpeg) {
            return Err(ResortsError::NotJpeg(name.to_owned()));
        }
        let location = read_location(&mut Cursor::new(&bytes))?
            .ok_or_else(|| ResortsError::NoLocation(name.to_owned()))?;
        let thumbnail = thumbnail(&bytes)?;

        fs::create_dir_all(self.thumbnail_dir())?;
        let (file, mut out) = self.create_unique(&sanitize_photo_name(name))?;
        out.write_all(&bytes)?;
        let thumbnail_name = format!("thumb-{file}");
        fs::write(self.thumbnail_dir().join(&thumbnail_name), thumbnail)?;

        debug!(
            "photo; src: {}, file: {file}, bytes: {}, import_exec: {:?}",
            src.display(),
            bytes.len(),
            now.elapsed()
        );
        Ok(Photo {
            file,
            thumbnail: thumbnail_name,
            location,
        })
    }

    pub fn photo_path(&self, name: &str) -> Result<PathBuf, ResortsError> {
        Ok(self.dir.join(checked(name)?))
    }

    pub fn thumbnail_path(&self, name: &str) -> Result<PathBuf, ResortsError> {
        Ok(self.thumbnail_dir().join(checked(name)?))
    }

    /// Reads the location of a stored photo.
    pub fn location(&self, name: &str) -> Result<Option<PhotoLocation>, ResortsError> {
        let file = File::open(self.photo_path(name)?)?;
        read_location(&mut BufReader::new(file))
    }

    fn thumbnail_dir(&self) -> PathBuf {
        self.dir.join(Self::THUMBNAILS)
    }

    /// Creates `<unix millis>-<n>-<name>` for the first `n` not taken.
    fn create_unique(&self, name: &str) -> Result<(String, File), ResortsError> {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_millis());
        for n in 0_u32.. {
            let file = format!("{millis}-{n}-{name}");
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(self.dir.join(&file))
            {
                Ok(out) => return Ok((file, out)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
                Err(e) => return Err(e.into()),
            }
        }
        Err(ResortsError::InvalidName(name.to_owned()))
    }
}

/// A 120x120 center crop, scaled to cover, as JPEG.
fn thumbnail(jpeg: &[u8]) -> Result<Vec<u8>, ResortsError> {
    let size = PhotoLibrary::THUMBNAIL_SIZE;
    let thumb = image::load_from_memory_with_format(jpeg, ImageFormat::Jpeg)?
        .resize_to_fill(size, size, FilterType::Triangle)
        .to_rgb8();
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, PhotoLibrary::THUMBNAIL_QUALITY)
        .encode_image(&thumb)?;
    Ok(out)
}

fn is_jpeg_name(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .map_or(false, |ext| {
            ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg")
        })
}

fn checked(name: &str) -> Result<&str, ResortsError> {
    if name.is_empty() || name.contains("..") || name.contains(['/', '\\']) {
        Err(ResortsError::InvalidName(name.to_owned()))
    } else {
        Ok(name)
    }
}

/// Keeps `[A-Za-z0-9.-]`, with no two dots in a row, and makes sure
/// the result ends in `.jpg` or `.jpeg`.
pub fn sanitize_photo_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        let keep = ch.is_ascii_alphanumeric() || ch == '-' || ch == '.';
        if !keep || (ch == '.' && out.ends_with('.')) {
            continue;
        }
        out.push(ch);
    }
    if out.is_empty() || out.starts_with('.') {
        out.insert_str(0, "photo");
    }
    if !is_jpeg_name(Path::new(&out)) {
        out.push_str(".jpg");
    }
    out
}
