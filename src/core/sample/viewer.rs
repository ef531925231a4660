use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use super::{GridLayout, GridPresenter, ImageLoader, Tile};
use crate::core::error::{DatasetError, Result};
use crate::core::manifest::{log_row_issue, read_rows, validate_row, Label, RowIssue};

/// Where a previewed image was found and what it is labeled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleEntry {
    pub path: PathBuf,
    pub label: Label,
}

/// Loaded samples keyed by image file name.
pub type SampleSet = BTreeMap<String, SampleEntry>;

/// Why a selected row did not make it into the preview.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SampleIssue {
    #[error("{0}")]
    Row(RowIssue),

    #[error("no file name in manifest path {path:?}")]
    MissingFileName { path: String },

    #[error("could not read image or image is empty: {path:?}")]
    Unreadable { path: PathBuf },
}

#[derive(Debug, Clone, Default)]
pub struct SampleOutcome {
    /// Only the samples whose image actually loaded.
    pub samples: SampleSet,
    pub issues: Vec<SampleIssue>,
    /// Grid sized for every selected row, loadable or not.
    pub layout: GridLayout,
    /// How many rows were drawn from the manifest.
    pub selected: usize,
}

impl SampleOutcome {
    pub fn has_samples(&self) -> bool {
        !self.samples.is_empty()
    }
}

/// Draw up to `count` rows from a manifest, load their images from
/// `image_root`, and hand the loadable ones to `presenter`.
///
/// Rows are sampled without replacement, so the result never holds more than
/// the manifest has. Only the file name of each manifest path is used to find
/// the image. A manifest with no data rows fails with `Empty` before any image
/// is touched. If nothing loads, the presenter is not called.
pub fn preview_samples<R, L, P>(
    manifest: &Path,
    image_root: &Path,
    count: usize,
    rng: &mut R,
    loader: &L,
    presenter: &mut P,
) -> Result<SampleOutcome>
where
    R: Rng + ?Sized,
    L: ImageLoader + ?Sized,
    P: GridPresenter + ?Sized,
{
    let rows = match read_rows(manifest) {
        Ok(rows) => rows,
        Err(DatasetError::Malformed { .. }) => return Err(DatasetError::empty(manifest)),
        Err(e) => return Err(e),
    };
    if rows.is_empty() {
        return Err(DatasetError::empty(manifest));
    }

    let wanted = count.min(rows.len());
    let chosen: Vec<_> = rows.choose_multiple(rng, wanted).collect();
    let layout = GridLayout::for_count(chosen.len());
    info!(
        "Selected {} of {} rows from {:?} for preview",
        chosen.len(),
        rows.len(),
        manifest
    );

    let mut outcome = SampleOutcome {
        layout,
        selected: chosen.len(),
        ..SampleOutcome::default()
    };
    let mut tiles = Vec::new();

    for row in chosen {
        let record = match validate_row(row) {
            Ok(record) => record,
            Err(issue) => {
                log_row_issue(&issue);
                outcome.issues.push(SampleIssue::Row(issue));
                continue;
            }
        };

        let Some(name) = record.file_name().map(str::to_string) else {
            warn!("No file name in manifest path {:?}", record.path);
            outcome.issues.push(SampleIssue::MissingFileName {
                path: record.path.clone(),
            });
            continue;
        };
        let path = image_root.join(&name);

        let Some(image) = loader.load_gray(&path) else {
            warn!("Could not read image or image is empty: {:?}", path);
            outcome.issues.push(SampleIssue::Unreadable { path });
            continue;
        };

        outcome.samples.insert(
            name.clone(),
            SampleEntry {
                path,
                label: record.label,
            },
        );
        tiles.push(Tile {
            name,
            label: record.label,
            image,
        });
    }

    if tiles.is_empty() {
        warn!("No valid images to display");
    } else {
        info!("Presenting {} images", tiles.len());
        presenter.present(tiles, layout);
    }

    Ok(outcome)
}
