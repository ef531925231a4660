mod layout;
mod presenter;
mod viewer;

pub use layout::GridLayout;
pub use presenter::{FsImageLoader, GridPresenter, ImageLoader, LogPresenter, Tile};
pub use viewer::{preview_samples, SampleEntry, SampleIssue, SampleOutcome, SampleSet};
