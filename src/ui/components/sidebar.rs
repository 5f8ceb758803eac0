use eframe::egui;

use crate::ui::state::AppState;

/// Admin directory. Returns the id of a newly clicked user.
pub fn render(ui: &mut egui::Ui, state: &AppState) -> Option<String> {
    ui.heading("Users");
    ui.separator();

    if state.users.is_empty() {
        ui.label(egui::RichText::new("Loading...").weak());
        return None;
    }

    let mut picked = None;
    egui::ScrollArea::vertical().show(ui, |ui| {
        for user in &state.users {
            let selected = state
                .selected_user
                .as_ref()
                .is_some_and(|current| current.id == user.id);
            if ui.selectable_label(selected, user.label()).clicked() && !selected {
                picked = Some(user.id.clone());
            }
        }
    });
    picked
}
