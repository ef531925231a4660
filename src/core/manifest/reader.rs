use csv::StringRecord;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::Label;
use crate::core::error::{DatasetError, Result};

/// One valid manifest row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRecord {
    /// Image path exactly as written in the manifest.
    pub path: String,
    pub label: Label,
}

impl ManifestRecord {
    /// The image file name. Any directory prefix in the manifest is ignored.
    ///
    /// `None` when the path field ends in a separator or is empty. Such a
    /// record still counts towards statistics but cannot be resolved to a file.
    pub fn file_name(&self) -> Option<&str> {
        Some(file_name_of(&self.path)).filter(|name| !name.is_empty())
    }
}

/// Strip every directory component from a manifest path field.
///
/// Both `/` and `\` count as separators so manifests written on another
/// platform still resolve.
pub fn file_name_of(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Why a single manifest row was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowIssue {
    #[error("line {line}: expected at least 2 fields, found {fields}")]
    TooFewFields { line: u64, fields: usize },

    #[error("line {line}: invalid label {value:?}")]
    InvalidLabel { line: u64, value: String },
}

/// Valid records and the rows that were dropped, kept as separate channels.
#[derive(Debug, Clone, Default)]
pub struct ManifestRead {
    pub records: Vec<ManifestRecord>,
    pub issues: Vec<RowIssue>,
}

impl ManifestRead {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Read every data row of a manifest, header excluded.
///
/// Fails with `NotFound` if the file is absent and `Malformed` if it holds no
/// rows at all. Rows are returned unvalidated.
pub fn read_rows(path: &Path) -> Result<Vec<StringRecord>> {
    if !path.exists() {
        return Err(DatasetError::not_found(path));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        rows.push(result?);
    }

    if rows.is_empty() {
        return Err(DatasetError::malformed(path, "file is empty, no header row"));
    }

    // Header is never validated
    rows.remove(0);
    debug!("Read {} data rows from {:?}", rows.len(), path);
    Ok(rows)
}

/// Check one raw row. Extra fields past the label are ignored, and the path
/// field is taken as written.
pub fn validate_row(row: &StringRecord) -> std::result::Result<ManifestRecord, RowIssue> {
    let line = row.position().map(|p| p.line()).unwrap_or(0);

    if row.len() < 2 {
        return Err(RowIssue::TooFewFields {
            line,
            fields: row.len(),
        });
    }

    let path = &row[0];
    let value = &row[1];

    let label = Label::parse(value).ok_or_else(|| RowIssue::InvalidLabel {
        line,
        value: value.to_string(),
    })?;

    Ok(ManifestRecord {
        path: path.to_string(),
        label,
    })
}

/// Split raw rows into valid records and issues, logging each skipped row.
pub fn partition_rows<'a, I>(rows: I) -> ManifestRead
where
    I: IntoIterator<Item = &'a StringRecord>,
{
    let mut read = ManifestRead::default();
    for row in rows {
        match validate_row(row) {
            Ok(record) => read.records.push(record),
            Err(issue) => {
                log_row_issue(&issue);
                read.issues.push(issue);
            }
        }
    }
    read
}

pub(crate) fn log_row_issue(issue: &RowIssue) {
    match issue {
        // Short rows are routine in hand-edited manifests
        RowIssue::TooFewFields { .. } => debug!("Skipping row: {}", issue),
        _ => warn!("Skipping row: {}", issue),
    }
}

/// Parse a manifest into validated records.
pub fn read_manifest(path: impl AsRef<Path>) -> Result<ManifestRead> {
    let path = path.as_ref();
    info!("Reading manifest {:?}", path);

    let rows = read_rows(path)?;
    let read = partition_rows(&rows);

    info!(
        "Manifest {:?}: {} valid records, {} skipped",
        path,
        read.records.len(),
        read.issues.len()
    );
    Ok(read)
}
