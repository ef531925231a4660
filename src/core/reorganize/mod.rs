mod reorganizer;
mod split;

pub use reorganizer::{
    destination_path, ensure_layout, reorganize, reorganize_split, CopyIssue, Reorganization,
    ReorganizeRequest,
};
pub use split::{Split, SplitSource};
