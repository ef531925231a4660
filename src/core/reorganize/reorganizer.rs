use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::{Split, SplitSource};
use crate::core::error::Result;
use crate::core::manifest::{read_manifest, Label, RowIssue};
use crate::core::stats::LabelCounts;

/// Inputs for a full train/test reorganization.
#[derive(Debug, Clone)]
pub struct ReorganizeRequest {
    pub train: SplitSource,
    pub test: SplitSource,
    /// Root of the produced `<split>/<label>/` tree.
    pub destination: PathBuf,
}

impl ReorganizeRequest {
    pub fn source(&self, split: Split) -> &SplitSource {
        match split {
            Split::Train => &self.train,
            Split::Test => &self.test,
        }
    }
}

/// An item that was skipped while copying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CopyIssue {
    #[error("{split}: {issue}")]
    Row { split: Split, issue: RowIssue },

    #[error("{split}: no file name in manifest path {path:?}")]
    MissingFileName { split: Split, path: String },

    #[error("{split}: source image not found: {path:?}")]
    SourceMissing { split: Split, path: PathBuf },
}

/// Per split, the number of files copied for each label.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Reorganization {
    pub counts: BTreeMap<Split, LabelCounts>,
    #[serde(skip)]
    pub issues: Vec<CopyIssue>,
}

impl Reorganization {
    pub fn split(&self, split: Split) -> Option<&LabelCounts> {
        self.counts.get(&split)
    }

    pub fn total_copied(&self) -> usize {
        self.counts.values().map(LabelCounts::total).sum()
    }

    pub fn to_report(&self) -> String {
        let mut lines = vec!["Images copied per label:".to_string()];
        for (split, counts) in &self.counts {
            let entries: Vec<String> = counts
                .iter()
                .map(|(label, count)| format!("{}: {}", label, count))
                .collect();
            lines.push(format!(
                "  {} ({} total): {{{}}}",
                split,
                counts.total(),
                entries.join(", ")
            ));
        }
        if !self.issues.is_empty() {
            lines.push(format!("Skipped {} items", self.issues.len()));
        }
        lines.join("\n") + "\n"
    }
}

/// Create `<root>/<split>/<label>/` for every split and label.
///
/// Safe to call repeatedly; existing directories are left alone.
pub fn ensure_layout(root: &Path) -> Result<()> {
    for split in Split::ALL {
        for label in Label::ALL {
            let dir = root.join(split.as_str()).join(label.as_dir_name());
            fs::create_dir_all(&dir)?;
        }
    }
    debug!("Destination layout ready under {:?}", root);
    Ok(())
}

/// Destination of an image inside the reorganized tree.
pub fn destination_path(root: &Path, split: Split, label: Label, file_name: &str) -> PathBuf {
    root.join(split.as_str())
        .join(label.as_dir_name())
        .join(file_name)
}

/// Copy every valid image of one split into `<root>/<split>/<label>/`.
///
/// Rows with a bad label, a path with no file name, or a missing source file
/// are recorded in `issues` and skipped. Copy failures abort the split; files already copied stay.
pub fn reorganize_split(
    split: Split,
    source: &SplitSource,
    root: &Path,
    issues: &mut Vec<CopyIssue>,
) -> Result<LabelCounts> {
    info!(
        "Reorganizing {} split from {:?} (images in {:?})",
        split, source.manifest, source.images
    );

    let read = read_manifest(&source.manifest)?;
    issues.extend(
        read.issues
            .into_iter()
            .map(|issue| CopyIssue::Row { split, issue }),
    );

    let mut counts = LabelCounts::new();
    for record in &read.records {
        let Some(file_name) = record.file_name() else {
            warn!("No file name in manifest path {:?}", record.path);
            issues.push(CopyIssue::MissingFileName {
                split,
                path: record.path.clone(),
            });
            continue;
        };
        let src = source.images.join(file_name);
        let dst = destination_path(root, split, record.label, file_name);

        if !src.is_file() {
            warn!("Source image not found: {:?}", src);
            issues.push(CopyIssue::SourceMissing { split, path: src });
            continue;
        }

        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(&src, &dst)?;
        debug!("Copied {:?} -> {:?}", src, dst);
        counts.increment(record.label);
    }

    info!("{} split: copied {} images", split, counts.total());
    Ok(counts)
}

/// Lay out the destination tree, then copy the train split followed by the
/// test split.
///
/// Not transactional: if the test manifest is missing the train copies are
/// already on disk when the error is returned.
pub fn reorganize(request: &ReorganizeRequest) -> Result<Reorganization> {
    ensure_layout(&request.destination)?;

    let mut result = Reorganization::default();
    for split in Split::ALL {
        let counts = reorganize_split(
            split,
            request.source(split),
            &request.destination,
            &mut result.issues,
        )?;
        result.counts.insert(split, counts);
    }

    info!(
        "Reorganization complete: {} images copied, {} items skipped",
        result.total_copied(),
        result.issues.len()
    );
    Ok(result)
}
