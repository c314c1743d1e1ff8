use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::{AppState, Page};

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar: data menu, page tabs, row counter and
/// the session controls on the right.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Datos", |ui: &mut Ui| {
            if ui.button("Recargar datos").clicked() {
                state.reload_dataset();
                ui.close_menu();
            }
        });

        ui.separator();

        for page in visible_pages(state) {
            if ui
                .selectable_label(state.page == page, page.label())
                .clicked()
            {
                state.page = page;
            }
        }

        ui.separator();

        if let Some(table) = &state.table {
            ui.label(format!(
                "{} de {} jugadores",
                state.database.visible.len(),
                table.len()
            ));
        }

        if let Some(msg) = &state.status {
            ui.label(RichText::new(msg).color(Color32::RED));
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
            if ui.button("Salir").clicked() {
                state.logout();
            }
            if let Some(user) = &state.user {
                ui.label(format!("{} ({})", user.username, user.role.as_str()));
            }
        });
    });
}

fn visible_pages(state: &AppState) -> Vec<Page> {
    let mut pages = vec![Page::Database, Page::Visualize, Page::Reports];
    if state.is_admin() {
        pages.push(Page::Admin);
    }
    pages
}

// ---------------------------------------------------------------------------
// Login screen
// ---------------------------------------------------------------------------

/// Full-window login form shown until a user authenticates.
pub fn login_screen(ui: &mut Ui, state: &mut AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add_space(ui.available_height() * 0.22);
        ui.heading("Ojeador");
        ui.label("Plataforma de scouting");
        ui.add_space(16.0);

        ui.group(|ui: &mut Ui| {
            ui.set_max_width(280.0);

            ui.label("Usuario");
            ui.text_edit_singleline(&mut state.login.username);
            ui.add_space(4.0);
            ui.label("Contraseña");
            let response = ui.add(
                egui::TextEdit::singleline(&mut state.login.password).password(true),
            );
            let submitted =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

            ui.add_space(8.0);
            if ui.button("Entrar").clicked() || submitted {
                state.try_login();
            }

            if let Some(error) = &state.login.error {
                ui.add_space(4.0);
                ui.colored_label(Color32::RED, error);
            }
        });
    });
}
