use serde::{Deserialize, Serialize};
use std::fmt;

/// A digit class, `0` through `9`.
///
/// Ordering is numeric, so any ordered collection keyed by `Label` iterates
/// in ascending digit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Label(u8);

impl Label {
    /// Number of distinct labels.
    pub const COUNT: usize = 10;

    /// Every label in ascending order.
    pub const ALL: [Label; Label::COUNT] = [
        Label(0),
        Label(1),
        Label(2),
        Label(3),
        Label(4),
        Label(5),
        Label(6),
        Label(7),
        Label(8),
        Label(9),
    ];

    /// Parse a manifest label field.
    ///
    /// Accepts exactly one ASCII digit. `"10"`, `"-1"`, `"a"`, `" 3"` and the
    /// empty string are all rejected.
    pub fn parse(value: &str) -> Option<Label> {
        match value.as_bytes() {
            [digit @ b'0'..=b'9'] => Some(Label(digit - b'0')),
            _ => None,
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Directory name used for this label in the reorganized tree.
    pub fn as_dir_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Label {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Label::parse(&value).ok_or_else(|| format!("invalid label: {:?}", value))
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        label.to_string()
    }
}
