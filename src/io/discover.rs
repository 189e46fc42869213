//! Locating and loading antenna `.s2p` captures from a directory.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::AnalysisConfig;
use crate::dataset::AntennaDataset;
use crate::errors::AntennaMatchError;
use crate::touchstone::read_touchstone_file;

/// Number formed by all digits in the file stem, e.g. `antenna12_b.s2p` gives 12.
///
/// Returns `None` when the stem contains no digits.
#[must_use]
pub fn antenna_number(path: &Path) -> Option<u64> {
    let stem = path.file_stem()?.to_str()?;
    let digits: String = stem.chars().filter(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Lists `<prefix>*.s2p` files in `directory`, ordered by antenna number.
///
/// Files without a number sort after numbered ones, then by name.
pub fn discover_antenna_files(directory: &Path, prefix: &str) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(directory)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let is_s2p = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("s2p"));
        if is_s2p && name.starts_with(prefix) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| {
        let key = |p: &PathBuf| (antenna_number(p).is_none(), antenna_number(p), p.file_name().map(ToOwned::to_owned));
        key(a).cmp(&key(b))
    });
    debug!(directory = %directory.display(), count = files.len(), "discovered antenna files");
    Ok(files)
}

/// Loads one capture as a dataset named after the file stem.
pub fn load_dataset(path: &Path) -> Result<AntennaDataset, AntennaMatchError> {
    let network = read_touchstone_file(path)?;
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("antenna")
        .to_string();
    Ok(AntennaDataset::from_network(name, &network)?)
}

/// Loads every antenna capture in the configured directory.
///
/// Files that fail to parse or validate are logged and skipped; only a
/// failure to list the directory is an error.
pub fn load_antenna_datasets(config: &AnalysisConfig) -> Result<Vec<AntennaDataset>, AntennaMatchError> {
    let files = discover_antenna_files(&config.directory, &config.file_prefix)?;
    let mut datasets = Vec::with_capacity(files.len());
    for path in files {
        match load_dataset(&path) {
            Ok(dataset) => {
                info!(file = %path.display(), points = dataset.len(), "loaded antenna capture");
                datasets.push(dataset);
            }
            Err(err) => warn!(file = %path.display(), error = %err, "skipping antenna capture"),
        }
    }
    Ok(datasets)
}
