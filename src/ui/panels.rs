use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};
use serde::Serialize;

use stream_dash::data::Value;
use stream_dash::views::TOP_N;
use stream_dash::DashResult;

use crate::state::AppState;
use crate::ui::plot;

// ---------------------------------------------------------------------------
// Shared widgets
// ---------------------------------------------------------------------------

/// A labelled dropdown. Returns the newly picked option, if any.
fn dropdown<T: Clone + PartialEq + ToString>(
    ui: &mut Ui,
    id: &str,
    label: &str,
    current: &T,
    options: &[T],
) -> Option<T> {
    let mut picked = None;
    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new(label).strong());
        egui::ComboBox::from_id_salt(id)
            .selected_text(current.to_string())
            .width(220.0)
            .show_ui(ui, |ui: &mut Ui| {
                for option in options {
                    if ui
                        .selectable_label(option == current, option.to_string())
                        .clicked()
                    {
                        picked = Some(option.clone());
                    }
                }
            });
    });
    picked.filter(|p| p != current)
}

/// Draw a view result, or the error in place of the chart.
fn chart_or_error<T: Serialize>(
    ui: &mut Ui,
    result: &DashResult<T>,
    draw: impl FnOnce(&mut Ui, &T),
) {
    match result {
        Ok(data) => {
            copy_json_button(ui, data);
            draw(ui, data);
        }
        Err(e) => {
            ui.label(RichText::new(format!("Chart unavailable: {e}")).color(Color32::RED));
        }
    }
}

/// Put the chart-ready data on the clipboard as pretty JSON.
fn copy_json_button<T: Serialize>(ui: &mut Ui, data: &T) {
    if ui.small_button("Copy JSON").clicked() {
        match serde_json::to_string_pretty(data) {
            Ok(json) => ui.ctx().copy_text(json),
            Err(e) => log::error!("Failed to serialise chart data: {e}"),
        }
    }
}

fn section_heading(ui: &mut Ui, title: &str) {
    ui.add_space(8.0);
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(title);
    });
    ui.add_space(4.0);
}

// ---------------------------------------------------------------------------
// Dashboard sections
// ---------------------------------------------------------------------------

pub fn comparison_section(ui: &mut Ui, state: &mut AppState) {
    section_heading(ui, "Compare Two Artists");

    let s = state.selection.clone();
    if let Some(a) = dropdown(ui, "artist1", "Select First Artist:", &s.artist1, &state.artists) {
        state.set_artist1(a);
    }
    if let Some(a) = dropdown(ui, "artist2", "Select Second Artist:", &s.artist2, &state.artists) {
        state.set_artist2(a);
    }

    ui.label(format!(
        "Comparison: {} vs {}",
        state.selection.artist1, state.selection.artist2
    ));
    chart_or_error(ui, &state.comparison, |ui, totals| {
        plot::comparison_chart(ui, totals);
        ui.push_id("comparison_table", |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .column(Column::auto().at_least(160.0))
                .column(Column::auto().at_least(80.0))
                .column(Column::remainder())
                .header(20.0, |mut header| {
                    for title in ["Artist", "Metric", "value"] {
                        header.col(|ui| {
                            ui.strong(title);
                        });
                    }
                })
                .body(|mut body| {
                    for t in totals {
                        body.row(18.0, |mut row| {
                            row.col(|ui| {
                                ui.label(t.artist.to_string());
                            });
                            row.col(|ui| {
                                ui.label(&t.metric);
                            });
                            row.col(|ui| {
                                ui.label(format!("{}", t.value));
                            });
                        });
                    }
                });
        });
    });
}

pub fn top_songs_section(ui: &mut Ui, state: &mut AppState) {
    section_heading(ui, &format!("Top {TOP_N} Songs of An Artist"));

    let current: Value = state.selection.top_artist.clone();
    if let Some(a) = dropdown(ui, "top_artist", "Select an Artist:", &current, &state.artists) {
        state.set_top_artist(a);
    }

    chart_or_error(ui, &state.top_songs, |ui, songs| {
        if songs.is_empty() {
            ui.label("No songs with a stream count for this artist.");
        } else {
            plot::top_songs_chart(ui, songs);
        }
    });
}

pub fn distribution_section(ui: &mut Ui, state: &mut AppState) {
    section_heading(ui, "Distribution Graph");

    let current = state.selection.distribution_column.clone();
    if let Some(c) = dropdown(
        ui,
        "distribution_column",
        "Select a Feature for Distribution:",
        &current,
        &state.numeric_columns,
    ) {
        state.set_distribution_column(c);
    }

    chart_or_error(ui, &state.distribution, plot::distribution_chart);
}

pub fn heatmap_section(ui: &mut Ui, state: &AppState) {
    section_heading(ui, "Correlation Heatmap");

    chart_or_error(ui, &state.correlation, |ui, matrix| {
        plot::correlation_heatmap(ui, matrix);
        ui.horizontal_wrapped(|ui: &mut Ui| {
            for (j, name) in matrix.columns.iter().enumerate() {
                ui.small(format!("{} = {name}", j + 1));
            }
        });
    });
}

pub fn scatter_section(ui: &mut Ui, state: &mut AppState) {
    section_heading(ui, "Feature Correlation");

    let s = state.selection.clone();
    if let Some(c) = dropdown(
        ui,
        "feature_x",
        "Select First Feature:",
        &s.feature_x,
        &state.numeric_columns,
    ) {
        state.set_feature_x(c);
    }
    if let Some(c) = dropdown(
        ui,
        "feature_y",
        "Select Second Feature:",
        &s.feature_y,
        &state.numeric_columns,
    ) {
        state.set_feature_y(c);
    }

    chart_or_error(ui, &state.scatter, plot::scatter_chart);
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Title and dataset summary.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.heading(RichText::new("Spotify Data Analysis Dashboard").color(Color32::from_rgb(0x2c, 0x3e, 0x50)));
        ui.separator();
        ui.label(format!(
            "{} rows, {} artists, {} numeric columns",
            state.table.len(),
            state.artists.len(),
            state.numeric_columns.len()
        ));
    });
}
