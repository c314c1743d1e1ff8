use std::fs;
use std::path::Path;

use eframe::egui::{self, Align, Color32, Layout, RichText, ScrollArea, Ui};
use egui_extras::{Column, DatePickerButton, TableBuilder};

use crate::report::pdf;
use crate::state::{AppState, ReportsState, ReportsView};
use crate::store::{Store, User};

// ---------------------------------------------------------------------------
// Scouting reports page
// ---------------------------------------------------------------------------

pub fn reports_panel(ui: &mut Ui, state: &mut AppState) {
    let AppState {
        store,
        reports,
        user,
        ..
    } = state;
    let Some(store) = store else {
        ui.colored_label(Color32::RED, "Base de datos no disponible.");
        return;
    };

    if reports.dirty {
        reports.refresh(store);
    }

    match reports.view {
        ReportsView::List => list_view(ui, store, reports),
        ReportsView::Detail(_) => detail_view(ui, reports),
        ReportsView::Create => create_view(ui, store, reports, user.as_ref()),
    }
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

fn list_view(ui: &mut Ui, store: &Store, reports: &mut ReportsState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Buscar jugador:");
        if ui.text_edit_singleline(&mut reports.search).changed() {
            reports.pager.page = 0;
            reports.dirty = true;
        }
        ui.with_layout(Layout::right_to_left(Align::Center), |ui: &mut Ui| {
            if ui.button("Nuevo informe").clicked() {
                reports.begin_create();
            }
        });
    });
    if let Some(error) = &reports.error {
        ui.colored_label(Color32::RED, error);
    }
    ui.separator();

    if reports.listing.is_empty() {
        ui.label("No hay informes.");
        return;
    }

    let mut open: Option<i64> = None;
    TableBuilder::new(ui)
        .striped(true)
        .cell_layout(Layout::left_to_right(Align::Center))
        .column(Column::auto().at_least(90.0))
        .column(Column::auto().at_least(140.0))
        .column(Column::auto().at_least(120.0))
        .column(Column::auto().at_least(120.0))
        .column(Column::auto().at_least(60.0))
        .column(Column::auto().at_least(100.0))
        .column(Column::remainder())
        .header(22.0, |mut header| {
            for title in ["Fecha", "Jugador", "Club", "Partido", "Nota", "Ojeador", ""] {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            let row_height = 22.0;
            body.rows(row_height, reports.listing.len(), |mut row| {
                let stored = &reports.listing[row.index()];
                let report = &stored.report;
                row.col(|ui: &mut Ui| {
                    ui.label(report.match_date.format("%d/%m/%Y").to_string());
                });
                row.col(|ui: &mut Ui| {
                    ui.label(&report.player_name);
                });
                row.col(|ui: &mut Ui| {
                    ui.label(&report.player_club);
                });
                row.col(|ui: &mut Ui| {
                    ui.label(format!("{} - {}", report.local_team, report.visitor_team));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(format!("{}/10", report.overall_rating));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(&stored.scout_name);
                });
                row.col(|ui: &mut Ui| {
                    if ui.small_button("Ver").clicked() {
                        open = Some(stored.id);
                    }
                });
            });
        });
    if let Some(id) = open {
        reports.open_detail(store, id);
    }

    // ---- Pagination ----
    ui.separator();
    ui.horizontal(|ui: &mut Ui| {
        let pages = reports.pager.page_count(reports.total);
        if ui
            .add_enabled(reports.pager.page > 0, egui::Button::new("◀ Anterior"))
            .clicked()
        {
            reports.pager.prev();
            reports.dirty = true;
        }
        ui.label(format!("Página {} de {}", reports.pager.page + 1, pages));
        if ui
            .add_enabled(
                reports.pager.page + 1 < pages,
                egui::Button::new("Siguiente ▶"),
            )
            .clicked()
        {
            reports.pager.next(reports.total);
            reports.dirty = true;
        }
        ui.with_layout(Layout::right_to_left(Align::Center), |ui: &mut Ui| {
            ui.label(format!("{} informes", reports.total));
        });
    });
}

// ---------------------------------------------------------------------------
// Detail
// ---------------------------------------------------------------------------

fn detail_view(ui: &mut Ui, reports: &mut ReportsState) {
    let mut back = false;
    let mut export = false;
    {
        let Some(stored) = &reports.detail else {
            reports.back_to_list();
            return;
        };
        let report = &stored.report;

        ui.horizontal(|ui: &mut Ui| {
            if ui.button("← Volver").clicked() {
                back = true;
            }
            ui.heading(format!("Informe: {}", report.player_name));
            ui.with_layout(Layout::right_to_left(Align::Center), |ui: &mut Ui| {
                if ui.button("Exportar PDF").clicked() {
                    export = true;
                }
            });
        });
        if let Some(error) = &reports.error {
            ui.colored_label(Color32::RED, error);
        }
        ui.separator();

        ScrollArea::vertical().show(ui, |ui: &mut Ui| {
            egui::Grid::new("report_facts")
                .num_columns(2)
                .spacing([16.0, 4.0])
                .show(ui, |ui: &mut Ui| {
                    let facts = [
                        (
                            "Fecha del informe",
                            report.report_date.format("%d/%m/%Y").to_string(),
                        ),
                        (
                            "Fecha del partido",
                            report.match_date.format("%d/%m/%Y").to_string(),
                        ),
                        (
                            "Partido",
                            format!("{} - {}", report.local_team, report.visitor_team),
                        ),
                        ("Resultado", report.result.clone()),
                        ("Club", report.player_club.clone()),
                        ("Posición", report.position.clone()),
                        ("Valoración", format!("{}/10", report.overall_rating)),
                        (
                            "Titular",
                            if report.is_starter { "Sí" } else { "No" }.to_string(),
                        ),
                        ("Minutos jugados", report.minutes_played.to_string()),
                        ("Ojeador", stored.scout_name.clone()),
                    ];
                    for (label, value) in facts {
                        ui.strong(label);
                        ui.label(value);
                        ui.end_row();
                    }
                });

            if let Some(path) = &report.photo_path {
                ui.add_space(8.0);
                ui.add(
                    egui::Image::from_uri(format!("file://{path}"))
                        .max_width(240.0)
                        .max_height(320.0),
                );
            }

            for (title, text) in report.sections() {
                ui.add_space(8.0);
                ui.strong(title);
                ui.label(if text.trim().is_empty() { "-" } else { text });
            }
        });
    }

    if back {
        reports.back_to_list();
    } else if export {
        export_pdf(reports);
    }
}

fn export_pdf(reports: &mut ReportsState) {
    let Some(stored) = &reports.detail else {
        return;
    };
    let report = &stored.report;
    let Some(path) = rfd::FileDialog::new()
        .set_file_name(format!("informe_{}.pdf", slug(&report.player_name)))
        .save_file()
    else {
        return;
    };

    let photo: Option<Vec<u8>> = report.photo_path.as_ref().and_then(|p| {
        fs::read(Path::new(p))
            .map_err(|e| log::warn!("could not read report photo {p}: {e}"))
            .ok()
    });

    match pdf::render_pdf(report, photo.as_deref())
        .and_then(|bytes| fs::write(&path, bytes).map_err(Into::into))
    {
        Ok(()) => {
            log::info!("exported report {} to {}", stored.id, path.display());
            reports.error = None;
        }
        Err(e) => {
            log::error!("pdf export failed: {e:#}");
            reports.error = Some("No se pudo exportar el PDF".into());
        }
    }
}

fn slug(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

fn create_view(ui: &mut Ui, store: &Store, reports: &mut ReportsState, user: Option<&User>) {
    let mut back = false;
    let mut save = false;

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("← Volver").clicked() {
            back = true;
        }
        ui.heading("Nuevo informe");
    });
    if let Some(error) = &reports.error {
        ui.colored_label(Color32::RED, error);
    }
    ui.separator();

    ScrollArea::vertical().show(ui, |ui: &mut Ui| {
        let form = &mut reports.form;
        egui::Grid::new("report_form")
            .num_columns(2)
            .spacing([12.0, 6.0])
            .show(ui, |ui: &mut Ui| {
                ui.label("Fecha del informe");
                ui.add(DatePickerButton::new(&mut form.report_date).id_salt("report_date"));
                ui.end_row();

                ui.label("Fecha del partido");
                ui.add(DatePickerButton::new(&mut form.match_date).id_salt("match_date"));
                ui.end_row();

                for (label, text) in [
                    ("Equipo local", &mut form.local_team),
                    ("Equipo visitante", &mut form.visitor_team),
                    ("Resultado", &mut form.result),
                    ("Jugador", &mut form.player_name),
                    ("Club", &mut form.player_club),
                    ("Posición", &mut form.position),
                ] {
                    ui.label(label);
                    ui.text_edit_singleline(text);
                    ui.end_row();
                }

                ui.label("Valoración (1-10)");
                ui.add(egui::DragValue::new(&mut form.overall_rating).range(1..=10));
                ui.end_row();

                ui.label("Titular");
                ui.checkbox(&mut form.is_starter, "");
                ui.end_row();

                ui.label("Minutos jugados");
                ui.add(egui::DragValue::new(&mut form.minutes_played).range(0..=120));
                ui.end_row();

                ui.label("Foto");
                ui.horizontal(|ui: &mut Ui| {
                    match &form.photo_path {
                        Some(path) => {
                            ui.label(RichText::new(path).monospace());
                        }
                        None => {
                            ui.weak("sin foto");
                        }
                    }
                    if ui.small_button("Elegir…").clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Imagen", &["png", "jpg", "jpeg"])
                            .pick_file()
                        {
                            form.photo_path = Some(path.display().to_string());
                        }
                    }
                    if form.photo_path.is_some() && ui.small_button("Quitar").clicked() {
                        form.photo_path = None;
                    }
                });
                ui.end_row();
            });

        ui.add_space(8.0);
        for (title, text) in [
            ("Aspectos técnicos", &mut form.technical),
            ("Aspectos tácticos", &mut form.tactical),
            ("Aspectos físicos", &mut form.physical),
            ("Aspectos psicológicos", &mut form.psychological),
            ("Observaciones", &mut form.observations),
        ] {
            ui.strong(title);
            ui.add(
                egui::TextEdit::multiline(text)
                    .desired_rows(3)
                    .desired_width(f32::INFINITY),
            );
            ui.add_space(4.0);
        }

        if ui.button("Guardar informe").clicked() {
            save = true;
        }
    });

    if back {
        reports.back_to_list();
    } else if save {
        save_report(store, reports, user);
    }
}

fn save_report(store: &Store, reports: &mut ReportsState, user: Option<&User>) {
    let Some(user) = user else {
        reports.error = Some("Sesión no válida".into());
        return;
    };
    match reports.form.build() {
        Ok(report) => match store.insert_report(&report, user.id) {
            Ok(id) => {
                log::info!("saved scouting report {id} for {}", report.player_name);
                reports.back_to_list();
            }
            Err(e) => {
                log::error!("could not save report: {e:#}");
                reports.error = Some("No se pudo guardar el informe".into());
            }
        },
        Err(message) => reports.error = Some(message),
    }
}
