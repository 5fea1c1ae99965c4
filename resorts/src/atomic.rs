use crate::ResortsError;
use serde::Serialize;
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// Writes `value` as pretty JSON to `path`.
///
/// Output goes to a sibling `.tmp` file first and is renamed over
/// `path` once complete, so readers never see a partial file.
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ResortsError> {
    let tmp_path = tmp_path(path);
    {
        let mut writer = BufWriter::new(File::create(&tmp_path)?);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush()?;
    }
    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut p = path.as_os_str().to_owned();
    p.push(".tmp");
    PathBuf::from(p)
}
