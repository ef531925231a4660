mod label;
mod reader;

pub use label::Label;
pub use reader::{
    file_name_of, partition_rows, read_manifest, read_rows, validate_row, ManifestRead,
    ManifestRecord, RowIssue,
};
pub(crate) use reader::log_row_issue;
