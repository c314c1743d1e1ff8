use std::fs;
use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::loader;
use crate::state::AppState;
use crate::store::Role;

// ---------------------------------------------------------------------------
// Administration page
// ---------------------------------------------------------------------------

pub fn admin_panel(ui: &mut Ui, state: &mut AppState) {
    if !state.is_admin() {
        ui.colored_label(Color32::RED, "Solo los administradores pueden entrar aquí.");
        return;
    }
    if let Some(notice) = &state.admin.notice {
        ui.label(notice.clone());
        ui.separator();
    }

    ScrollArea::vertical().show(ui, |ui: &mut Ui| {
        users_section(ui, state);
        ui.separator();
        data_section(ui, state);
        ui.separator();
        password_section(ui, state);
    });
}

// ---------------------------------------------------------------------------
// User management
// ---------------------------------------------------------------------------

fn users_section(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Usuarios");
    let Some(store) = &state.store else {
        ui.colored_label(Color32::RED, "Base de datos no disponible.");
        return;
    };

    if state.admin.users_dirty {
        match store.list_users() {
            Ok(users) => {
                state.admin.users = users;
                state.admin.users_dirty = false;
            }
            Err(e) => log::error!("could not list users: {e:#}"),
        }
    }

    // The signed-in account cannot delete itself.
    let current_id = state.user.as_ref().map(|u| u.id);
    let mut deleted: Option<i64> = None;
    egui::Grid::new("user_table")
        .striped(true)
        .spacing([16.0, 4.0])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Usuario");
            ui.strong("Rol");
            ui.strong("");
            ui.end_row();
            for user in &state.admin.users {
                ui.label(&user.username);
                ui.label(user.role.as_str());
                if ui
                    .add_enabled(
                        Some(user.id) != current_id,
                        egui::Button::new("Eliminar").small(),
                    )
                    .clicked()
                {
                    deleted = Some(user.id);
                }
                ui.end_row();
            }
        });
    if let Some(id) = deleted {
        match store.delete_user(id) {
            Ok(()) => {
                log::info!("deleted user {id}");
                state.admin.users_dirty = true;
                state.admin.notice = None;
            }
            Err(e) => {
                log::error!("could not delete user {id}: {e:#}");
                state.admin.notice = Some(format!("Error: {e}"));
            }
        }
    }

    // ---- New account ----
    ui.add_space(6.0);
    ui.horizontal(|ui: &mut Ui| {
        let admin = &mut state.admin;
        ui.add(
            egui::TextEdit::singleline(&mut admin.new_username)
                .hint_text("usuario")
                .desired_width(120.0),
        );
        ui.add(
            egui::TextEdit::singleline(&mut admin.new_password)
                .hint_text("contraseña")
                .password(true)
                .desired_width(120.0),
        );
        egui::ComboBox::from_id_salt("new_role")
            .selected_text(admin.new_role.as_str())
            .show_ui(ui, |ui: &mut Ui| {
                for role in [Role::Scout, Role::Admin] {
                    ui.selectable_value(&mut admin.new_role, role, role.as_str());
                }
            });
        if ui.button("Crear usuario").clicked() {
            match store.create_user(admin.new_username.trim(), &admin.new_password, admin.new_role)
            {
                Ok(user) => {
                    log::info!("created user {} ({})", user.username, user.role.as_str());
                    admin.new_username.clear();
                    admin.new_password.clear();
                    admin.users_dirty = true;
                    admin.notice = None;
                }
                Err(e) => {
                    log::error!("could not create user: {e:#}");
                    admin.notice = Some(format!("Error: {e}"));
                }
            }
        }
    });
}

// ---------------------------------------------------------------------------
// Data files
// ---------------------------------------------------------------------------

fn data_section(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Archivos de datos");

    match loader::list_data_files(&state.data_dir) {
        Ok(files) if files.is_empty() => {
            ui.label("No hay archivos de datos.");
        }
        Ok(files) => {
            let mut removed: Option<PathBuf> = None;
            egui::Grid::new("data_files")
                .striped(true)
                .spacing([16.0, 4.0])
                .show(ui, |ui: &mut Ui| {
                    for file in &files {
                        let name = file
                            .file_name()
                            .map(|n| n.to_string_lossy().into_owned())
                            .unwrap_or_default();
                        ui.label(RichText::new(name).monospace());
                        let size = fs::metadata(file).map(|m| m.len()).unwrap_or(0);
                        ui.label(format_size(size));
                        if ui.add(egui::Button::new("Eliminar").small()).clicked() {
                            removed = Some(file.clone());
                        }
                        ui.end_row();
                    }
                });
            if let Some(file) = removed {
                match fs::remove_file(&file) {
                    Ok(()) => {
                        log::info!("removed data file {}", file.display());
                        state.reload_dataset();
                    }
                    Err(e) => {
                        log::error!("could not remove {}: {e:#}", file.display());
                        state.status = Some(format!("Error al borrar: {e}"));
                    }
                }
            }
        }
        Err(e) => {
            ui.colored_label(Color32::RED, format!("Error al listar archivos: {e}"));
        }
    }

    ui.add_space(6.0);
    if ui.button("Importar archivo…").clicked() {
        import_data_file(state);
    }
}

fn format_size(bytes: u64) -> String {
    if bytes >= 1_048_576 {
        format!("{:.1} MB", bytes as f64 / 1_048_576.0)
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{bytes} B")
    }
}

fn import_data_file(state: &mut AppState) {
    let Some(source) = rfd::FileDialog::new()
        .add_filter("Datos", &["csv", "parquet", "pq", "json"])
        .pick_file()
    else {
        return;
    };
    let Some(name) = source.file_name() else {
        return;
    };
    let target = state.data_dir.join(name);

    match fs::create_dir_all(&state.data_dir).and_then(|()| fs::copy(&source, &target).map(|_| ()))
    {
        Ok(()) => {
            log::info!("imported data file {}", target.display());
            state.reload_dataset();
        }
        Err(e) => {
            log::error!("could not import {}: {e:#}", source.display());
            state.status = Some(format!("Error al importar: {e}"));
        }
    }
}

// ---------------------------------------------------------------------------
// Own password
// ---------------------------------------------------------------------------

fn password_section(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Cambiar contraseña");
    let AppState {
        store, user, admin, ..
    } = state;
    let (Some(store), Some(user)) = (store.as_ref(), user.as_ref()) else {
        return;
    };

    egui::Grid::new("password_form")
        .num_columns(2)
        .spacing([12.0, 4.0])
        .show(ui, |ui: &mut Ui| {
            for (label, text) in [
                ("Contraseña actual", &mut admin.current_password),
                ("Nueva contraseña", &mut admin.new_password1),
                ("Repetir nueva contraseña", &mut admin.new_password2),
            ] {
                ui.label(label);
                ui.add(egui::TextEdit::singleline(text).password(true));
                ui.end_row();
            }
        });

    if ui.button("Actualizar").clicked() {
        if admin.new_password1 != admin.new_password2 {
            admin.notice = Some("Las contraseñas no coinciden".into());
        } else if admin.new_password1.is_empty() {
            admin.notice = Some("La contraseña no puede estar vacía".into());
        } else {
            match store.change_password(user.id, &admin.current_password, &admin.new_password1) {
                Ok(true) => {
                    log::info!("password changed for {}", user.username);
                    admin.current_password.clear();
                    admin.new_password1.clear();
                    admin.new_password2.clear();
                    admin.notice = Some("Contraseña actualizada".into());
                }
                Ok(false) => {
                    admin.notice = Some("La contraseña actual no es correcta".into());
                }
                Err(e) => {
                    log::error!("could not change password: {e:#}");
                    admin.notice = Some(format!("Error: {e}"));
                }
            }
        }
    }
}
