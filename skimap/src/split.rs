use crate::{
    options::{Extract, Split},
    progress,
};
use anyhow::{Context, Result};
use log::info;
use resorts::{append_resort, write_collection, FeatureSource};
use std::path::{Path, PathBuf};

fn open(path: &Path) -> Result<FeatureSource> {
    FeatureSource::open(path).with_context(|| format!("reading {}", path.display()))
}

impl Extract {
    pub fn run(&self) -> Result<()> {
        let out = self.out.clone().unwrap_or_else(|| filtered_path(&self.input));
        let collection = open(&self.input)?.exact_resort(&self.resort);
        write_collection(&out, &collection)?;
        println!(
            "wrote {} features for {} to {}",
            collection.features.len(),
            self.resort,
            out.display()
        );
        Ok(())
    }
}

impl Split {
    pub fn run(&self) -> Result<()> {
        let out_dir = self
            .out_dir
            .clone()
            .unwrap_or_else(|| parent_dir(&self.input));
        std::fs::create_dir_all(&out_dir)?;

        let source = open(&self.input)?;
        let pb = progress::bar(format!("Split {}", self.input.display()), self.resorts.len() as u64);
        for resort in &self.resorts {
            pb.set_message(resort.clone());
            match append_resort(&source, resort, &out_dir)? {
                Some(out) => pb.println(format!(
                    "wrote {} new features (total: {}) to {}",
                    out.added,
                    out.total,
                    out.path.display()
                )),
                None => info!("no features for {resort}"),
            }
            pb.inc(1);
        }
        pb.finish_and_clear();
        Ok(())
    }
}

fn parent_dir(input: &Path) -> PathBuf {
    input
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

/// `dir/runs.json` becomes `dir/filtered_runs.json`.
fn filtered_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    parent_dir(input).join(format!("filtered_{name}"))
}

#[cfg(test)]
mod tests {
    use super::filtered_path;
    use std::path::Path;

    #[test]
    fn test_filtered_path() {
        assert_eq!(
            filtered_path(Path::new("JSON/runs.geojson")),
            Path::new("JSON/filtered_runs.geojson")
        );
        assert_eq!(
            filtered_path(Path::new("runs.json")),
            Path::new("filtered_runs.json")
        );
    }
}
