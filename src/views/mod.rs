//! View transformations: pure functions from the immutable [`RecordTable`]
//! plus a few selection values to a chart-ready result.
//!
//! No view keeps state between calls and none mutates the table, so the
//! same inputs always produce the same output.
//!
//! [`RecordTable`]: crate::data::RecordTable

pub mod compare;
pub mod correlation;
pub mod distribution;
pub mod scatter;
pub mod top_songs;

pub use compare::{MetricTotal, compare_artists};
pub use correlation::{CorrelationMatrix, correlation_matrix, pearson};
pub use distribution::{Distribution, distribution};
pub use scatter::{ScatterSeries, feature_pairs};
pub use top_songs::{TOP_N, TopSong, top_n_songs, top_songs};
