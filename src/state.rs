use std::sync::Arc;

use stream_dash::data::{RecordTable, Value};
use stream_dash::views::{
    self, CorrelationMatrix, Distribution, MetricTotal, ScatterSeries, TopSong,
};
use stream_dash::{DashError, DashResult};

// ---------------------------------------------------------------------------
// Selection state
// ---------------------------------------------------------------------------

/// Current dropdown values. Owned by the UI, never by the views.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub artist1: Value,
    pub artist2: Value,
    pub top_artist: Value,
    pub distribution_column: String,
    pub feature_x: String,
    pub feature_y: String,
}

impl Selection {
    /// First artist against the second (or itself when only one exists),
    /// first numeric column for the histogram, first two for the scatter.
    pub fn defaults(artists: &[Value], numeric_columns: &[String]) -> Self {
        let first_artist = artists.first().cloned().unwrap_or(Value::Null);
        let second_artist = artists.get(1).cloned().unwrap_or_else(|| first_artist.clone());
        let first_col = numeric_columns.first().cloned().unwrap_or_default();
        let second_col = numeric_columns
            .get(1)
            .cloned()
            .unwrap_or_else(|| first_col.clone());

        Selection {
            artist1: first_artist.clone(),
            artist2: second_artist,
            top_artist: first_artist,
            distribution_column: first_col.clone(),
            feature_x: first_col,
            feature_y: second_col,
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Each chart keeps the last result of its view; a setter recomputes only
/// the views bound to the selection it changed.
pub struct AppState {
    pub table: Arc<RecordTable>,

    /// Dropdown options, fixed for the table's lifetime.
    pub artists: Vec<Value>,
    pub numeric_columns: Vec<String>,

    pub selection: Selection,

    pub comparison: DashResult<Vec<MetricTotal>>,
    pub top_songs: DashResult<Vec<TopSong>>,
    pub distribution: DashResult<Distribution>,
    pub correlation: DashResult<CorrelationMatrix>,
    pub scatter: DashResult<ScatterSeries>,
}

impl AppState {
    /// Build the state for a loaded table and run every view once.
    pub fn new(table: Arc<RecordTable>) -> DashResult<Self> {
        let artists = table.artists()?;
        if artists.is_empty() {
            return Err(DashError::InsufficientData("dataset has no artists".into()));
        }
        let numeric_columns = table.numeric_columns().to_vec();
        let selection = Selection::defaults(&artists, &numeric_columns);

        let comparison = logged(
            "artist comparison",
            views::compare_artists(&table, &selection.artist1, &selection.artist2),
        );
        let top_songs = logged("top songs", views::top_songs(&table, &selection.top_artist));
        let distribution = logged(
            "distribution",
            views::distribution(&table, &selection.distribution_column),
        );
        let correlation = logged("correlation heatmap", views::correlation_matrix(&table));
        let scatter = logged(
            "feature scatter",
            views::feature_pairs(&table, &selection.feature_x, &selection.feature_y),
        );

        Ok(AppState {
            table,
            artists,
            numeric_columns,
            selection,
            comparison,
            top_songs,
            distribution,
            correlation,
            scatter,
        })
    }

    pub fn set_artist1(&mut self, artist: Value) {
        if self.selection.artist1 != artist {
            self.selection.artist1 = artist;
            self.refresh_comparison();
        }
    }

    pub fn set_artist2(&mut self, artist: Value) {
        if self.selection.artist2 != artist {
            self.selection.artist2 = artist;
            self.refresh_comparison();
        }
    }

    pub fn set_top_artist(&mut self, artist: Value) {
        if self.selection.top_artist != artist {
            self.selection.top_artist = artist;
            self.refresh_top_songs();
        }
    }

    pub fn set_distribution_column(&mut self, column: String) {
        if self.selection.distribution_column != column {
            self.selection.distribution_column = column;
            self.refresh_distribution();
        }
    }

    pub fn set_feature_x(&mut self, column: String) {
        if self.selection.feature_x != column {
            self.selection.feature_x = column;
            self.refresh_scatter();
        }
    }

    pub fn set_feature_y(&mut self, column: String) {
        if self.selection.feature_y != column {
            self.selection.feature_y = column;
            self.refresh_scatter();
        }
    }

    fn refresh_comparison(&mut self) {
        let s = &self.selection;
        self.comparison = logged(
            "artist comparison",
            views::compare_artists(&self.table, &s.artist1, &s.artist2),
        );
    }

    fn refresh_top_songs(&mut self) {
        self.top_songs = logged(
            "top songs",
            views::top_songs(&self.table, &self.selection.top_artist),
        );
    }

    fn refresh_distribution(&mut self) {
        self.distribution = logged(
            "distribution",
            views::distribution(&self.table, &self.selection.distribution_column),
        );
    }

    fn refresh_scatter(&mut self) {
        let s = &self.selection;
        self.scatter = logged(
            "feature scatter",
            views::feature_pairs(&self.table, &s.feature_x, &s.feature_y),
        );
    }
}

fn logged<T>(view: &str, result: DashResult<T>) -> DashResult<T> {
    if let Err(e) = &result {
        log::warn!("{view} unavailable: {e}");
    }
    result
}
