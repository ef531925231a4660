use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Train,
    Test,
}

impl Split {
    pub const ALL: [Split; 2] = [Split::Train, Split::Test];

    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Test => "test",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Manifest of a split plus the directory its images currently live in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitSource {
    pub manifest: PathBuf,
    pub images: PathBuf,
}

impl SplitSource {
    pub fn new(manifest: impl Into<PathBuf>, images: impl Into<PathBuf>) -> Self {
        Self {
            manifest: manifest.into(),
            images: images.into(),
        }
    }
}
