use eframe::egui::{self, Align2, Color32, FontId, Rect, Sense, Ui, Vec2};
use egui_plot::{Bar, BarChart, GridMark, Legend, Plot, PlotPoints, Points};

use stream_dash::color::{self, ColorScale, HISTOGRAM_COLOR, SCATTER_COLOR};
use stream_dash::views::{CorrelationMatrix, Distribution, MetricTotal, ScatterSeries, TopSong};

use super::histogram::auto_bins;

const PLOT_HEIGHT: f32 = 320.0;

/// Tick labels for categorical x positions `0, 1, 2, …`.
fn category_formatter(labels: Vec<String>) -> impl Fn(GridMark, &std::ops::RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let idx = mark.value.round();
        if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Grouped bar chart: artist comparison
// ---------------------------------------------------------------------------

/// One bar group per artist, one coloured series per metric.
pub fn comparison_chart(ui: &mut Ui, totals: &[MetricTotal]) {
    let mut artists: Vec<String> = Vec::new();
    let mut metrics: Vec<&str> = Vec::new();
    for t in totals {
        let artist = t.artist.to_string();
        if !artists.contains(&artist) {
            artists.push(artist);
        }
        if !metrics.contains(&t.metric.as_str()) {
            metrics.push(&t.metric);
        }
    }

    let bar_width = 0.8 / metrics.len().max(1) as f64;
    let charts: Vec<BarChart> = metrics
        .iter()
        .enumerate()
        .map(|(m, metric)| {
            let offset = (m as f64 - (metrics.len() as f64 - 1.0) / 2.0) * bar_width;
            let bars = totals
                .iter()
                .filter(|t| t.metric == *metric)
                .filter_map(|t| {
                    let x = artists.iter().position(|a| *a == t.artist.to_string())?;
                    Some(
                        Bar::new(x as f64 + offset, t.value)
                            .width(bar_width)
                            .name(format!("{} – {metric}", t.artist)),
                    )
                })
                .collect();
            BarChart::new(bars)
                .color(color::metric_color(m))
                .name(*metric)
        })
        .collect();

    Plot::new("comparison_plot")
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .x_axis_label("Artist")
        .y_axis_label("value")
        .x_axis_formatter(category_formatter(artists))
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// Bar chart: top songs, coloured by stream count
// ---------------------------------------------------------------------------

pub fn top_songs_chart(ui: &mut Ui, songs: &[TopSong]) {
    let min = songs.iter().map(|s| s.streams).fold(f64::INFINITY, f64::min);
    let max = songs.iter().map(|s| s.streams).fold(f64::NEG_INFINITY, f64::max);
    let scale = ColorScale::blues(min, max);

    let bars: Vec<Bar> = songs
        .iter()
        .enumerate()
        .map(|(i, s)| {
            Bar::new(i as f64, s.streams)
                .width(0.7)
                .name(s.track.to_string())
                .fill(scale.color_for(s.streams))
        })
        .collect();
    let labels = songs.iter().map(|s| s.track.to_string()).collect();

    Plot::new("top_songs_plot")
        .height(PLOT_HEIGHT)
        .x_axis_label("Track")
        .y_axis_label("Stream")
        .x_axis_formatter(category_formatter(labels))
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Stream"));
        });
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

pub fn distribution_chart(ui: &mut Ui, dist: &Distribution) {
    let bars: Vec<Bar> = auto_bins(&dist.values)
        .iter()
        .map(|b| {
            Bar::new(b.center(), b.count as f64)
                .width(b.width())
                .name(format!("[{:.3}, {:.3})", b.start, b.end))
        })
        .collect();

    Plot::new("distribution_plot")
        .height(PLOT_HEIGHT)
        .x_axis_label(dist.column.clone())
        .y_axis_label("count")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .color(color::hex(HISTOGRAM_COLOR))
                    .name(&dist.column),
            );
        });
}

// ---------------------------------------------------------------------------
// Heatmap: correlation matrix
// ---------------------------------------------------------------------------

/// Paint the matrix as a grid of cells on the Blues scale from -1 to 1.
/// Undefined correlations are grey; hovering a cell names its pair.
pub fn correlation_heatmap(ui: &mut Ui, matrix: &CorrelationMatrix) {
    let n = matrix.len();
    if n == 0 {
        return;
    }
    let label_width = 120.0;
    let cell = ((ui.available_width() - label_width) / n as f32).clamp(18.0, 64.0);
    let grid = cell * n as f32;
    let (rect, response) =
        ui.allocate_exact_size(Vec2::new(label_width + grid, grid + 24.0), Sense::hover());

    let painter = ui.painter_at(rect);
    let scale = ColorScale::blues(-1.0, 1.0);
    let text_color = ui.visuals().text_color();
    let origin = rect.min + Vec2::new(label_width, 0.0);

    for (i, row_name) in matrix.columns.iter().enumerate() {
        painter.text(
            egui::pos2(origin.x - 6.0, origin.y + (i as f32 + 0.5) * cell),
            Align2::RIGHT_CENTER,
            row_name,
            FontId::proportional(12.0),
            text_color,
        );
        for (j, &r) in matrix.values[i].iter().enumerate() {
            let min = origin + Vec2::new(j as f32 * cell, i as f32 * cell);
            let cell_rect = Rect::from_min_size(min, Vec2::splat(cell)).shrink(0.5);
            painter.rect_filled(cell_rect, 0.0, scale.color_for(r));
            if cell >= 36.0 {
                let label = if r.is_nan() { "–".to_string() } else { format!("{r:.2}") };
                let ink = if r > 0.4 { Color32::WHITE } else { Color32::BLACK };
                painter.text(
                    cell_rect.center(),
                    Align2::CENTER_CENTER,
                    label,
                    FontId::proportional(10.0),
                    ink,
                );
            }
        }
    }

    // Column index under the grid; full names are in the hover text.
    for j in 0..n {
        painter.text(
            egui::pos2(origin.x + (j as f32 + 0.5) * cell, origin.y + grid + 12.0),
            Align2::CENTER_CENTER,
            (j + 1).to_string(),
            FontId::proportional(11.0),
            text_color,
        );
    }

    if let Some(pos) = response.hover_pos() {
        let local = pos - origin;
        if local.x >= 0.0 && local.y >= 0.0 {
            let (i, j) = ((local.y / cell) as usize, (local.x / cell) as usize);
            if i < n && j < n {
                let r = matrix.values[i][j];
                let value = if r.is_nan() { "undefined".to_string() } else { format!("{r:.3}") };
                response.on_hover_text_at_pointer(format!(
                    "{} × {}: {value}",
                    matrix.columns[i], matrix.columns[j]
                ));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Scatter plot: two features
// ---------------------------------------------------------------------------

pub fn scatter_chart(ui: &mut Ui, series: &ScatterSeries) {
    let points: PlotPoints = series
        .points
        .iter()
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|&(x, y)| [x, y])
        .collect();

    Plot::new("scatter_plot")
        .height(PLOT_HEIGHT)
        .x_axis_label(series.x_column.clone())
        .y_axis_label(series.y_column.clone())
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(points)
                    .color(color::hex(SCATTER_COLOR))
                    .radius(2.5)
                    .name(format!("{} vs {}", series.x_column, series.y_column)),
            );
        });
}
