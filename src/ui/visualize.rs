use std::ops::RangeInclusive;

use eframe::egui::{self, Color32, RichText, ScrollArea, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, GridMark, Legend, Line, LineStyle, Plot, PlotPoint, PlotPoints, PlotUi,
    Polygon, Text, VLine,
};

use crate::analysis::compare::{self, ComparisonTable};
use crate::analysis::correlation::{self, CorrelationMatrix};
use crate::analysis::radar::{self, RadarAxis};
use crate::analysis::ranking::{self, PercentileEntry, RankEntry};
use crate::color::{diverging_color, generate_palette, ColorMap};
use crate::data::model::PlayerTable;
use crate::state::{AppState, VisualizeState, VizTab};

// ---------------------------------------------------------------------------
// Visualization page
// ---------------------------------------------------------------------------

pub fn visualize_panel(ui: &mut Ui, state: &mut AppState) {
    let AppState {
        table,
        config,
        visualize,
        ..
    } = state;
    let Some(table) = table else {
        ui.label("Sin datos cargados.");
        return;
    };

    // ---- Tab strip + metric group ----
    ui.horizontal(|ui: &mut Ui| {
        for tab in VizTab::ALL {
            if ui
                .selectable_label(visualize.tab == tab, tab.label())
                .clicked()
            {
                visualize.tab = tab;
            }
        }
        ui.separator();
        ui.label("Métricas:");
        egui::ComboBox::from_id_salt("metric_group")
            .selected_text(visualize.metric_group.as_str())
            .show_ui(ui, |ui: &mut Ui| {
                for group in &config.metric_groups {
                    ui.selectable_value(
                        &mut visualize.metric_group,
                        group.label.clone(),
                        &group.label,
                    );
                }
            });
    });
    ui.separator();

    let metrics: Vec<String> = config
        .metric_group(&visualize.metric_group)
        .map(|group| group.columns.clone())
        .unwrap_or_default();

    match visualize.tab {
        VizTab::Radar => radar_tab(ui, table, visualize, &metrics),
        VizTab::Compare => compare_tab(ui, table, visualize, &metrics),
        VizTab::Ranking => ranking_tab(ui, table, visualize, &metrics),
        VizTab::Percentiles => percentiles_tab(ui, table, visualize, &metrics),
        VizTab::Correlation => correlation_tab(ui, table, visualize, &metrics),
    }
}

// ---------------------------------------------------------------------------
// Shared selectors
// ---------------------------------------------------------------------------

fn player_names(table: &PlayerTable) -> Vec<String> {
    table
        .identity_column("jugador")
        .and_then(|col| table.distinct(col))
        .map(|values| values.iter().map(|v| v.to_string()).collect())
        .unwrap_or_default()
}

fn player_combo(ui: &mut Ui, id: &str, label: &str, selection: &mut String, names: &[String]) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(label);
        egui::ComboBox::from_id_salt(id)
            .selected_text(if selection.is_empty() {
                "elige un jugador"
            } else {
                selection.as_str()
            })
            .width(200.0)
            .show_ui(ui, |ui: &mut Ui| {
                for name in names {
                    if ui.selectable_label(*selection == *name, name).clicked() {
                        *selection = name.clone();
                    }
                }
            });
    });
}

fn position_combo(ui: &mut Ui, id: &str, table: &PlayerTable, selection: &mut String) {
    let positions: Vec<String> = table
        .identity_column("pos")
        .and_then(|col| table.distinct(col))
        .map(|values| values.iter().map(|v| v.to_string()).collect())
        .unwrap_or_default();

    egui::ComboBox::from_id_salt(id)
        .selected_text(if selection.is_empty() {
            "Todas"
        } else {
            selection.as_str()
        })
        .show_ui(ui, |ui: &mut Ui| {
            if ui.selectable_label(selection.is_empty(), "Todas").clicked() {
                selection.clear();
            }
            for position in &positions {
                if ui
                    .selectable_label(*selection == *position, position)
                    .clicked()
                {
                    *selection = position.clone();
                }
            }
        });
}

fn minutes_drag(ui: &mut Ui, minutes: &mut f64) {
    ui.label("Min. minutos:");
    ui.add(
        egui::DragValue::new(minutes)
            .range(0.0..=5000.0)
            .speed(10),
    );
}

// ---------------------------------------------------------------------------
// Radar
// ---------------------------------------------------------------------------

fn radar_tab(ui: &mut Ui, table: &PlayerTable, viz: &mut VisualizeState, metrics: &[String]) {
    let names = player_names(table);
    if names.is_empty() {
        ui.label("El dataset no tiene columna de jugador.");
        return;
    }
    player_combo(ui, "radar_player", "Jugador:", &mut viz.radar_player, &names);
    if viz.radar_player.is_empty() {
        ui.label("Elige un jugador para ver su radar.");
        return;
    }

    match radar::radar_data(table, &viz.radar_player, metrics) {
        Ok(axes) => {
            draw_radar(ui, "radar_plot", &[(viz.radar_player.clone(), axes.clone())]);
            ui.add_space(6.0);
            radar_table(ui, &axes);
        }
        Err(e) => {
            ui.colored_label(Color32::RED, e.to_string());
        }
    }
}

/// Draw one radar chart with a polygon per player. All players share
/// the spokes of the first one; values are pre-normalized to `[0, 1]`.
fn draw_radar(ui: &mut Ui, id: &str, players: &[(String, Vec<RadarAxis>)]) {
    let Some((_, axes)) = players.first() else {
        return;
    };
    let n = axes.len();
    if n == 0 {
        return;
    }
    // Spoke 0 points up, later spokes go clockwise.
    let angle = |k: usize| {
        std::f64::consts::FRAC_PI_2 - std::f64::consts::TAU * k as f64 / n as f64
    };

    let plot = Plot::new(id.to_string())
        .data_aspect(1.0)
        .height(340.0)
        .show_axes([false, false])
        .show_grid([false, false])
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .include_x(-1.45)
        .include_x(1.45)
        .include_y(-1.45)
        .include_y(1.45)
        .legend(Legend::default());

    plot.show(ui, |plot_ui: &mut PlotUi| {
        // ---- Rings ----
        for ring in [0.25, 0.5, 0.75, 1.0] {
            let points: PlotPoints = (0..=n)
                .map(|k| {
                    let a = angle(k % n);
                    [ring * a.cos(), ring * a.sin()]
                })
                .collect();
            plot_ui.line(Line::new(points).color(Color32::from_gray(70)).width(0.5));
        }

        // ---- Spokes and metric labels ----
        for (k, axis) in axes.iter().enumerate() {
            let a = angle(k);
            let spoke = PlotPoints::from(vec![[0.0, 0.0], [a.cos(), a.sin()]]);
            plot_ui.line(Line::new(spoke).color(Color32::from_gray(60)).width(0.5));
            plot_ui.text(
                Text::new(
                    PlotPoint::new(1.18 * a.cos(), 1.18 * a.sin()),
                    axis.metric.clone(),
                )
                .color(Color32::LIGHT_GRAY),
            );
        }

        // ---- Player polygons ----
        let palette = generate_palette(players.len());
        for (index, (name, axes)) in players.iter().enumerate() {
            if axes.is_empty() {
                continue;
            }
            let color = palette[index];
            let points: PlotPoints = (0..axes.len())
                .map(|k| {
                    let a = angle(k);
                    let r = axes[k].normalized;
                    [r * a.cos(), r * a.sin()]
                })
                .collect();
            plot_ui.polygon(
                Polygon::new(points)
                    .name(name)
                    .stroke(Stroke::new(1.5, color))
                    .fill_color(color.gamma_multiply(0.25)),
            );
        }
    });
}

fn radar_table(ui: &mut Ui, axes: &[RadarAxis]) {
    egui::Grid::new("radar_values")
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            ui.strong("Métrica");
            ui.strong("Valor");
            ui.strong("Escalado");
            ui.end_row();
            for axis in axes {
                ui.label(&axis.metric);
                ui.label(
                    axis.raw
                        .map(|v| format!("{v:.2}"))
                        .unwrap_or_else(|| "-".into()),
                );
                ui.label(format!("{:.2}", axis.normalized));
                ui.end_row();
            }
        });
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

fn compare_tab(ui: &mut Ui, table: &PlayerTable, viz: &mut VisualizeState, metrics: &[String]) {
    let names = player_names(table);
    if names.is_empty() {
        ui.label("El dataset no tiene columna de jugador.");
        return;
    }

    // ---- Selected players as removable chips ----
    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.label("Jugadores:");
        let mut removed: Option<usize> = None;
        for (index, player) in viz.compare_players.iter().enumerate() {
            if ui.small_button(format!("{player} ✕")).clicked() {
                removed = Some(index);
            }
        }
        if let Some(index) = removed {
            viz.compare_players.remove(index);
        }

        egui::ComboBox::from_id_salt("compare_add")
            .selected_text("añadir…")
            .show_ui(ui, |ui: &mut Ui| {
                for name in &names {
                    if viz.compare_players.contains(name) {
                        continue;
                    }
                    if ui.selectable_label(false, name).clicked() {
                        viz.compare_players.push(name.clone());
                    }
                }
            });

        if !viz.compare_players.is_empty() && ui.small_button("Limpiar").clicked() {
            viz.compare_players.clear();
        }
    });

    if viz.compare_players.is_empty() {
        ui.label("Añade jugadores para compararlos.");
        return;
    }
    ui.separator();

    match compare::comparison_table(table, &viz.compare_players, metrics) {
        Ok(grid) => {
            comparison_grid(ui, &grid);

            let overlays: Vec<(String, Vec<RadarAxis>)> = viz
                .compare_players
                .iter()
                .filter_map(|player| {
                    radar::radar_data(table, player, metrics)
                        .ok()
                        .map(|axes| (player.clone(), axes))
                })
                .collect();
            if overlays.len() >= 2 {
                ui.add_space(8.0);
                draw_radar(ui, "compare_radar", &overlays);
            }
        }
        Err(e) => {
            ui.colored_label(Color32::RED, e.to_string());
        }
    }
}

fn comparison_grid(ui: &mut Ui, grid: &ComparisonTable) {
    ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        egui::Grid::new("comparison_grid")
            .striped(true)
            .show(ui, |ui: &mut Ui| {
                for column in &grid.columns {
                    ui.strong(column);
                }
                ui.end_row();
                for row in &grid.rows {
                    for cell in row {
                        ui.label(cell);
                    }
                    ui.end_row();
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Bars drawn in the ranking chart; the table below shows every entry.
const RANKING_CHART_BARS: usize = 15;

fn ranking_tab(ui: &mut Ui, table: &PlayerTable, viz: &mut VisualizeState, metrics: &[String]) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Métrica:");
        egui::ComboBox::from_id_salt("rank_metric")
            .selected_text(if viz.rank_metric.is_empty() {
                "elige una métrica"
            } else {
                viz.rank_metric.as_str()
            })
            .show_ui(ui, |ui: &mut Ui| {
                for metric in metrics {
                    if table.has_column(metric) {
                        ui.selectable_value(&mut viz.rank_metric, metric.clone(), metric);
                    }
                }
            });

        ui.label("Posición:");
        position_combo(ui, "rank_position", table, &mut viz.rank_position);
        minutes_drag(ui, &mut viz.min_minutes);
        ui.label("Top:");
        ui.add(egui::Slider::new(&mut viz.rank_limit, 5..=100));
    });
    ui.separator();

    if viz.rank_metric.is_empty() {
        ui.label("Elige una métrica para el ranking.");
        return;
    }

    let position = (!viz.rank_position.is_empty()).then_some(viz.rank_position.as_str());
    match ranking::rank_players(
        table,
        &viz.rank_metric,
        viz.min_minutes,
        position,
        viz.rank_limit,
    ) {
        Ok(entries) if entries.is_empty() => {
            ui.label("Ningún jugador cumple los requisitos.");
        }
        Ok(entries) => {
            ranking_chart(ui, table, &viz.rank_metric, &entries);
            ui.add_space(6.0);
            ranking_table(ui, &entries);
        }
        Err(e) => {
            ui.colored_label(Color32::RED, e.to_string());
        }
    }
}

fn ranking_chart(ui: &mut Ui, table: &PlayerTable, metric: &str, entries: &[RankEntry]) {
    let shown = &entries[..entries.len().min(RANKING_CHART_BARS)];

    let team_column = table.identity_column("equipo").map(str::to_string);
    let color_map = team_column
        .as_deref()
        .and_then(|col| table.distinct(col).map(|values| ColorMap::new(col, values)));

    let bars: Vec<Bar> = shown
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let value = entry.value?;
            let mut bar = Bar::new(index as f64, value).name(&entry.player).width(0.7);
            if let (Some(map), Some(col)) = (&color_map, team_column.as_deref()) {
                if let Some(team) = table.rows[entry.row].get(col) {
                    bar = bar.fill(map.color_for(team));
                }
            }
            Some(bar)
        })
        .collect();
    let labels: Vec<String> = shown.iter().map(|e| e.player.clone()).collect();

    Plot::new("ranking_chart")
        .height(260.0)
        .show_grid([false, true])
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            let index = mark.value.round() as usize;
            if (mark.value - index as f64).abs() < 0.25 {
                labels.get(index).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        })
        .show(ui, |plot_ui: &mut PlotUi| {
            plot_ui.bar_chart(BarChart::new(bars).name(metric));
        });
}

fn ranking_table(ui: &mut Ui, entries: &[RankEntry]) {
    ScrollArea::vertical()
        .max_height(280.0)
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("ranking_table")
                .striped(true)
                .show(ui, |ui: &mut Ui| {
                    for header in ["#", "Jugador", "Equipo", "Pos", "Min", "Valor"] {
                        ui.strong(header);
                    }
                    ui.end_row();
                    for (index, entry) in entries.iter().enumerate() {
                        ui.label((index + 1).to_string());
                        ui.label(&entry.player);
                        ui.label(&entry.team);
                        ui.label(&entry.position);
                        ui.label(
                            entry
                                .minutes
                                .map(|m| format!("{m:.0}"))
                                .unwrap_or_else(|| "-".into()),
                        );
                        ui.label(
                            entry
                                .value
                                .map(|v| format!("{v:.2}"))
                                .unwrap_or_else(|| "-".into()),
                        );
                        ui.end_row();
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Percentiles
// ---------------------------------------------------------------------------

fn percentiles_tab(ui: &mut Ui, table: &PlayerTable, viz: &mut VisualizeState, metrics: &[String]) {
    let names = player_names(table);
    if names.is_empty() {
        ui.label("El dataset no tiene columna de jugador.");
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        player_combo(
            ui,
            "percentile_player",
            "Jugador:",
            &mut viz.percentile_player,
            &names,
        );
        minutes_drag(ui, &mut viz.min_minutes);
    });
    ui.label("Los percentiles se calculan contra jugadores de la misma posición.");
    ui.separator();

    if viz.percentile_player.is_empty() {
        ui.label("Elige un jugador.");
        return;
    }

    match ranking::player_percentiles(
        table,
        &viz.percentile_player,
        metrics,
        viz.min_minutes,
        None,
    ) {
        Ok(entries) if entries.is_empty() => {
            ui.label("Sin pares suficientes para calcular percentiles.");
        }
        Ok(entries) => percentile_chart(ui, &entries),
        Err(e) => {
            ui.colored_label(Color32::RED, e.to_string());
        }
    }
}

/// Traffic-light bands of a percentile bar.
fn percentile_color(percentile: f64) -> Color32 {
    if percentile < 25.0 {
        Color32::from_rgb(220, 70, 60)
    } else if percentile < 50.0 {
        Color32::from_rgb(235, 180, 60)
    } else if percentile < 75.0 {
        Color32::from_rgb(150, 200, 90)
    } else {
        Color32::from_rgb(60, 170, 90)
    }
}

fn percentile_chart(ui: &mut Ui, entries: &[PercentileEntry]) {
    let bars: Vec<Bar> = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            Bar::new(index as f64, entry.percentile)
                .name(format!("{} ({:.2})", entry.metric, entry.value))
                .fill(percentile_color(entry.percentile))
                .width(0.6)
        })
        .collect();
    let labels: Vec<String> = entries.iter().map(|e| e.metric.clone()).collect();

    Plot::new("percentile_chart")
        .height(34.0 * entries.len() as f32 + 50.0)
        .include_x(0.0)
        .include_x(100.0)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show_grid([true, false])
        .y_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            let index = mark.value.round() as usize;
            if (mark.value - index as f64).abs() < 0.25 {
                labels.get(index).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        })
        .show(ui, |plot_ui: &mut PlotUi| {
            for guide in [25.0, 50.0, 75.0] {
                plot_ui.vline(
                    VLine::new(guide)
                        .color(Color32::from_gray(90))
                        .style(LineStyle::dashed_loose()),
                );
            }
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
        });
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

fn correlation_tab(ui: &mut Ui, table: &PlayerTable, viz: &mut VisualizeState, metrics: &[String]) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Posición:");
        position_combo(ui, "corr_position", table, &mut viz.rank_position);
        minutes_drag(ui, &mut viz.min_minutes);
    });
    ui.separator();

    let position = (!viz.rank_position.is_empty()).then_some(viz.rank_position.as_str());
    match correlation::correlation_matrix(table, metrics, viz.min_minutes, position) {
        Ok(matrix) => correlation_grid(ui, &matrix),
        Err(e) => {
            ui.colored_label(Color32::RED, e.to_string());
        }
    }
}

fn correlation_grid(ui: &mut Ui, matrix: &CorrelationMatrix) {
    ScrollArea::both().show(ui, |ui: &mut Ui| {
        egui::Grid::new("correlation_grid").show(ui, |ui: &mut Ui| {
            ui.label("");
            for metric in &matrix.metrics {
                ui.strong(metric);
            }
            ui.end_row();
            for (i, metric) in matrix.metrics.iter().enumerate() {
                ui.strong(metric);
                for j in 0..matrix.metrics.len() {
                    let value = matrix.get(i, j);
                    let text = if value.is_nan() {
                        "-".to_string()
                    } else {
                        format!("{value:+.2}")
                    };
                    ui.label(
                        RichText::new(text)
                            .monospace()
                            .color(Color32::BLACK)
                            .background_color(diverging_color(value)),
                    );
                }
                ui.end_row();
            }
        });
    });
}
