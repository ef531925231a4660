mod counts;
mod writer;

pub use counts::{aggregate, count_labels, LabelCounts};
pub use writer::{read_stats, write_stats, STATS_HEADER};
