/// UI layer: egui rendering over [`AppState`](crate::state::AppState).
/// Panels only mutate state; dataset and database decisions live in the
/// data, analysis and store modules.

pub mod admin;
pub mod database;
pub mod panels;
pub mod reports;
pub mod visualize;
