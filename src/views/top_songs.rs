use serde::Serialize;

use crate::data::{RecordTable, Value};
use crate::error::DashResult;

/// How many songs the top-songs chart shows.
pub const TOP_N: usize = 5;

/// One bar of the top-songs chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopSong {
    pub track: Value,
    pub streams: f64,
}

/// The artist's [`TOP_N`] most streamed tracks.
pub fn top_songs(table: &RecordTable, artist: &Value) -> DashResult<Vec<TopSong>> {
    top_n_songs(table, artist, TOP_N)
}

/// The artist's `n` most streamed tracks, descending.
///
/// Ties keep their original row order. Rows without a stream count are
/// skipped; fewer than `n` matches returns all of them.
pub fn top_n_songs(table: &RecordTable, artist: &Value, n: usize) -> DashResult<Vec<TopSong>> {
    let roles = table.roles();
    table.require_column(&roles.artist)?;
    table.require_column(&roles.track)?;
    table.require_numeric(&roles.stream)?;

    let mut songs: Vec<TopSong> = table
        .rows()
        .iter()
        .filter(|row| row.get(&roles.artist) == artist)
        .filter_map(|row| {
            let streams = row.get(&roles.stream).as_f64()?;
            (!streams.is_nan()).then(|| TopSong {
                track: row.get(&roles.track).clone(),
                streams,
            })
        })
        .collect();

    // `sort_by` is stable, so equal counts stay in row order.
    songs.sort_by(|a, b| b.streams.total_cmp(&a.streams));
    songs.truncate(n);
    Ok(songs)
}
