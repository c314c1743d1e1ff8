use eframe::egui::{self, Align, Color32, Layout, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::export;
use crate::data::filter::{FilterDescriptor, FilterKind, FilterValue};
use crate::data::format::NumericFormat;
use crate::data::model::{PlayerRow, PlayerTable};
use crate::state::{AppState, DatabaseState, ROWS_PER_PAGE_OPTIONS};

// ---------------------------------------------------------------------------
// Left side panel – active filter widgets
// ---------------------------------------------------------------------------

/// Render the filter panel: one widget per active filter, in the order
/// the filters were switched on.
pub fn filter_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filtros");
    ui.separator();

    let AppState {
        table, database, ..
    } = state;
    let Some(table) = table else {
        ui.label("Sin datos cargados.");
        return;
    };

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Añadir filtros…").clicked() {
            database.open_filter_picker();
        }
        if !database.active.is_empty() && ui.button("Limpiar").clicked() {
            database.clear_filters(table);
        }
    });
    ui.separator();

    if database.active.is_empty() {
        ui.label("Ningún filtro activo.");
        return;
    }

    // Column list is snapshotted so widgets can mutate the set.
    let columns: Vec<String> = database.active.columns().map(str::to_string).collect();
    let mut removed: Option<String> = None;
    let mut changed = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for column in &columns {
                let Some(descriptor) = database.schema.descriptor(column).cloned() else {
                    continue;
                };
                let Some(value) = database.active.value_mut(column) else {
                    continue;
                };

                ui.horizontal(|ui: &mut Ui| {
                    ui.strong(column);
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui: &mut Ui| {
                        if ui.small_button("✕").clicked() {
                            removed = Some(column.clone());
                        }
                    });
                });
                changed |= filter_widget(ui, column, &descriptor.kind, value);
                ui.separator();
            }
        });

    if let Some(column) = removed {
        database.remove_filter(table, &column);
    } else if changed {
        database.refilter(table);
    }
}

/// One filter's widget. Returns true when the constraint changed.
fn filter_widget(ui: &mut Ui, column: &str, kind: &FilterKind, value: &mut FilterValue) -> bool {
    match (kind, value) {
        (
            FilterKind::Range {
                min,
                max,
                step,
                format,
            },
            FilterValue::Range { lo, hi },
        ) => {
            let mut changed = false;
            ui.horizontal(|ui: &mut Ui| {
                ui.label("de");
                changed |= range_drag(ui, lo, *min, *max, *step, *format);
                ui.label("a");
                changed |= range_drag(ui, hi, *min, *max, *step, *format);
            });
            changed
        }
        (FilterKind::MultiSelect { options }, FilterValue::Selected(selected)) => {
            let mut changed = false;
            let summary = if selected.is_empty() {
                "todos".to_string()
            } else {
                format!("{} seleccionados", selected.len())
            };
            egui::CollapsingHeader::new(summary)
                .id_salt(column)
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    for option in options {
                        let mut checked = selected.contains(option);
                        if ui.checkbox(&mut checked, option).changed() {
                            if checked {
                                selected.insert(option.clone());
                            } else {
                                selected.remove(option);
                            }
                            changed = true;
                        }
                    }
                });
            changed
        }
        (FilterKind::Text, FilterValue::Needle(needle)) => ui
            .add(egui::TextEdit::singleline(needle).hint_text("contiene…"))
            .changed(),
        (FilterKind::Toggle, FilterValue::On(on)) => ui.checkbox(on, "solo sí").changed(),
        // Kind and value no longer agree (dataset reloaded); hide it.
        _ => false,
    }
}

fn range_drag(
    ui: &mut Ui,
    value: &mut f64,
    min: f64,
    max: f64,
    step: f64,
    format: NumericFormat,
) -> bool {
    ui.add(
        egui::DragValue::new(value)
            .range(min..=max)
            .speed(step)
            .custom_formatter(move |v, _| format.render(v)),
    )
    .changed()
}

// ---------------------------------------------------------------------------
// Central panel – paginated player table
// ---------------------------------------------------------------------------

pub fn table_view(ui: &mut Ui, state: &mut AppState) {
    let AppState {
        table,
        database,
        status,
        ..
    } = state;
    let Some(table) = table else {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.add_space(40.0);
            ui.heading("Sin datos");
            ui.label("Coloca exportaciones (.csv, .parquet, .json) en el directorio de datos.");
        });
        return;
    };

    // ---- Toolbar ----
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Columnas…").clicked() {
            database.open_column_picker();
        }
        if ui.button("Filtros…").clicked() {
            database.open_filter_picker();
        }
        ui.separator();

        ui.label("Filas:");
        let mut per_page = database.pager.per_page;
        egui::ComboBox::from_id_salt("rows_per_page")
            .selected_text(per_page.to_string())
            .width(64.0)
            .show_ui(ui, |ui: &mut Ui| {
                for option in ROWS_PER_PAGE_OPTIONS {
                    ui.selectable_value(&mut per_page, option, option.to_string());
                }
            });
        database.pager.set_per_page(per_page);
        ui.separator();

        let total = database.visible.len();
        let pages = database.pager.page_count(total);
        if ui
            .add_enabled(database.pager.page > 0, egui::Button::new("◀ Anterior"))
            .clicked()
        {
            database.pager.prev();
        }
        ui.label(format!("Página {} de {}", database.pager.page + 1, pages));
        if ui
            .add_enabled(
                database.pager.page + 1 < pages,
                egui::Button::new("Siguiente ▶"),
            )
            .clicked()
        {
            database.pager.next(total);
        }

        ui.with_layout(Layout::right_to_left(Align::Center), |ui: &mut Ui| {
            if ui.button("Exportar CSV").clicked() {
                export_dialog(table, database, status);
            }
        });
    });
    ui.add_space(4.0);

    // ---- Table ----
    let total = database.visible.len();
    let start = database.pager.start();
    let end = database.pager.end(total);
    let page_rows: Vec<usize> = database.visible[start..end].to_vec();
    let columns = database.selected_columns.clone();

    if columns.is_empty() {
        ui.label("Ninguna columna seleccionada.");
    } else {
        let row_height = egui::TextStyle::Body.resolve(ui.style()).size + 8.0;
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(Layout::left_to_right(Align::Center))
            .columns(Column::auto().at_least(60.0), columns.len())
            .header(22.0, |mut header| {
                for column in &columns {
                    header.col(|ui| {
                        ui.strong(column);
                    });
                }
            })
            .body(|body| {
                body.rows(row_height, page_rows.len(), |mut row| {
                    let player = &table.rows[page_rows[row.index()]];
                    for column in &columns {
                        row.col(|ui| {
                            ui.label(cell_text(database, player, column));
                        });
                    }
                });
            });

        ui.add_space(4.0);
        let shown = if total == 0 { 0 } else { start + 1 };
        ui.label(format!("Filas {shown} a {end} de {total}"));
    }

    column_picker_window(ui.ctx(), database, table);
    filter_picker_window(ui.ctx(), database, table);
}

/// Cell rendering: numeric columns follow their inferred display format,
/// null and missing cells show a dash.
fn cell_text(database: &DatabaseState, row: &PlayerRow, column: &str) -> String {
    let value = match row.get(column) {
        Some(v) if !v.is_null() => v,
        _ => return "-".to_string(),
    };
    if let Some(FilterDescriptor {
        kind: FilterKind::Range { format, .. },
        ..
    }) = database.schema.descriptor(column)
    {
        if let Some(number) = value.as_f64() {
            return format.render(number);
        }
    }
    value.to_string()
}

fn export_dialog(table: &PlayerTable, database: &DatabaseState, status: &mut Option<String>) {
    let Some(path) = rfd::FileDialog::new()
        .set_title("Exportar jugadores filtrados")
        .set_file_name(export::export_file_name())
        .add_filter("CSV", &["csv"])
        .save_file()
    else {
        return;
    };

    let result = std::fs::File::create(&path)
        .map_err(anyhow::Error::from)
        .and_then(|file| {
            export::write_csv(table, &database.selected_columns, &database.visible, file)
        });
    match result {
        Ok(()) => {
            log::info!(
                "exported {} rows to {}",
                database.visible.len(),
                path.display()
            );
        }
        Err(e) => {
            log::error!("exporting CSV: {e:#}");
            *status = Some(format!("Error al exportar: {e}"));
        }
    }
}

// ---------------------------------------------------------------------------
// Pickers
// ---------------------------------------------------------------------------

fn column_picker_window(ctx: &egui::Context, database: &mut DatabaseState, table: &PlayerTable) {
    if !database.column_picker_open {
        return;
    }
    egui::Window::new("Columnas visibles")
        .collapsible(false)
        .resizable(true)
        .default_width(320.0)
        .show(ctx, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("Seleccionar todo").clicked() {
                    database.column_draft = table.columns.iter().cloned().collect();
                }
                if ui.small_button("Ninguna").clicked() {
                    database.column_draft.clear();
                }
            });
            ui.separator();
            ScrollArea::vertical()
                .max_height(360.0)
                .show(ui, |ui: &mut Ui| {
                    for column in &table.columns {
                        let mut checked = database.column_draft.contains(column);
                        if ui.checkbox(&mut checked, column).changed() {
                            if checked {
                                database.column_draft.insert(column.clone());
                            } else {
                                database.column_draft.remove(column);
                            }
                        }
                    }
                });
            ui.separator();
            ui.horizontal(|ui: &mut Ui| {
                if ui.button("Aplicar").clicked() {
                    database.apply_column_picker(table);
                }
                if ui.button("Cerrar").clicked() {
                    database.close_column_picker();
                }
            });
        });
}

fn filter_picker_window(ctx: &egui::Context, database: &mut DatabaseState, table: &PlayerTable) {
    if !database.filter_picker_open {
        return;
    }
    egui::Window::new("Elegir filtros")
        .collapsible(false)
        .default_width(340.0)
        .show(ctx, |ui: &mut Ui| {
            ScrollArea::vertical()
                .max_height(400.0)
                .show(ui, |ui: &mut Ui| {
                    for (label, descriptors) in &database.schema.groups {
                        if descriptors.is_empty() {
                            continue;
                        }
                        egui::CollapsingHeader::new(RichText::new(label).strong())
                            .id_salt(label)
                            .default_open(label == &database.group)
                            .show(ui, |ui: &mut Ui| {
                                for descriptor in descriptors {
                                    let mut checked =
                                        database.filter_draft.contains(&descriptor.column);
                                    if ui.checkbox(&mut checked, &descriptor.column).changed() {
                                        if checked {
                                            database.filter_draft.insert(descriptor.column.clone());
                                        } else {
                                            database.filter_draft.remove(&descriptor.column);
                                        }
                                    }
                                }
                            });
                    }
                });
            ui.separator();
            ui.horizontal(|ui: &mut Ui| {
                if ui.button("Confirmar").clicked() {
                    database.apply_filter_picker(table);
                }
                if ui.button("Cerrar").clicked() {
                    database.close_filter_picker();
                }
            });
        });
}
