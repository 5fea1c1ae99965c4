use crate::{options::PhotoCmd, print_json};
use anyhow::{Context, Result};
use log::warn;
use resorts::{PhotoLibrary, PhotoLocation};
use std::io::Write;

impl PhotoCmd {
    pub fn run(&self, library: &PhotoLibrary) -> Result<()> {
        match self {
            Self::List => {
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "file,latitude,longitude,timestamp")?;
                for file in library.list()? {
                    let location = library.location(&file).unwrap_or_else(|e| {
                        warn!("reading location of {file}: {e}");
                        None
                    });
                    writeln!(stdout, "{}", csv_row(&file, location.as_ref()))?;
                }
                Ok(())
            }
            Self::Import(import) => {
                let photo = library
                    .import(&import.path)
                    .with_context(|| format!("importing {}", import.path.display()))?;
                print_json(&photo)
            }
        }
    }
}

/// Empty columns for a photo without a location.
fn csv_row(file: &str, location: Option<&PhotoLocation>) -> String {
    match location {
        Some(PhotoLocation {
            latitude,
            longitude,
            timestamp,
        }) => format!(
            "{file},{latitude},{longitude},{}",
            timestamp.as_deref().unwrap_or_default()
        ),
        None => format!("{file},,,"),
    }
}
