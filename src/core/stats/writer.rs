use std::path::Path;
use tracing::info;

use super::LabelCounts;
use crate::core::error::{DatasetError, Result};
use crate::core::manifest::Label;

/// Header row of every stats file: digit, image count.
pub const STATS_HEADER: [&str; 2] = ["Chiffre", "Nombre d'images"];

/// Write counts as CSV, replacing any existing file at `path`.
pub fn write_stats(counts: &LabelCounts, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record(STATS_HEADER)?;
    for (label, count) in counts.iter() {
        writer.write_record([label.to_string(), count.to_string()])?;
    }
    writer.flush()?;

    info!("Saved stats for {} labels to {:?}", counts.len(), path);
    Ok(())
}

/// Load a stats file produced by [`write_stats`].
pub fn read_stats(path: impl AsRef<Path>) -> Result<LabelCounts> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(DatasetError::not_found(path));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;

    let headers = reader.headers()?;
    if headers.iter().ne(STATS_HEADER) {
        return Err(DatasetError::malformed(
            path,
            format!("unexpected stats header {:?}", headers),
        ));
    }

    let mut counts = Vec::new();
    for result in reader.records() {
        let row = result?;
        let label = row.get(0).and_then(Label::parse).ok_or_else(|| {
            DatasetError::malformed(path, format!("bad label in row {:?}", row))
        })?;
        let count = row
            .get(1)
            .and_then(|c| c.parse::<usize>().ok())
            .ok_or_else(|| DatasetError::malformed(path, format!("bad count in row {:?}", row)))?;
        counts.push((label, count));
    }

    Ok(counts.into_iter().collect())
}
