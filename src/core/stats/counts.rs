use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use crate::core::error::Result;
use crate::core::manifest::{read_manifest, Label, ManifestRecord};

/// Image count per label.
///
/// Only labels that actually occurred have an entry. Iteration is always in
/// ascending digit order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelCounts {
    counts: BTreeMap<Label, usize>,
}

impl LabelCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, label: Label) {
        *self.counts.entry(label).or_insert(0) += 1;
    }

    /// Count for `label`, `None` if it never occurred.
    pub fn get(&self, label: Label) -> Option<usize> {
        self.counts.get(&label).copied()
    }

    /// Sum over all labels.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// `(label, count)` pairs in ascending label order.
    pub fn iter(&self) -> impl Iterator<Item = (Label, usize)> + '_ {
        self.counts.iter().map(|(label, count)| (*label, *count))
    }

    /// Adds another set of counts into this one.
    pub fn merge(&mut self, other: &LabelCounts) {
        for (label, count) in other.iter() {
            *self.counts.entry(label).or_insert(0) += count;
        }
    }

    /// Human-readable listing, one line per label.
    pub fn to_report(&self, title: &str) -> String {
        let mut lines = vec![format!("Statistics for {}:", title)];
        if self.is_empty() {
            lines.push("  (no valid images)".to_string());
        }
        lines.extend(
            self.iter()
                .map(|(label, count)| format!("  Digit {} : {} images", label, count)),
        );
        lines.join("\n") + "\n"
    }
}

impl FromIterator<Label> for LabelCounts {
    fn from_iter<T: IntoIterator<Item = Label>>(iter: T) -> Self {
        let mut counts = LabelCounts::new();
        for label in iter {
            counts.increment(label);
        }
        counts
    }
}

impl FromIterator<(Label, usize)> for LabelCounts {
    fn from_iter<T: IntoIterator<Item = (Label, usize)>>(iter: T) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

/// Count records per label. Records are already validated, none is rejected.
pub fn aggregate(records: &[ManifestRecord]) -> LabelCounts {
    records.iter().map(|record| record.label).collect()
}

/// Read a manifest and count its valid records per label.
pub fn count_labels(manifest: impl AsRef<Path>) -> Result<LabelCounts> {
    let manifest = manifest.as_ref();
    let read = read_manifest(manifest)?;
    let counts = aggregate(&read.records);
    info!(
        "Counted {} images over {} labels in {:?}",
        counts.total(),
        counts.len(),
        manifest
    );
    Ok(counts)
}
