use beehive_dashboard::common::types::parse_timestamp;
use eframe::egui;

use crate::ui::state::AppState;

#[derive(Default)]
pub struct PanelActions {
    pub load_more: bool,
    pub close: bool,
}

pub fn render(ui: &mut egui::Ui, state: &AppState) -> PanelActions {
    let mut actions = PanelActions::default();

    ui.horizontal(|ui| {
        ui.heading("Notifications");
        if ui.button("×").clicked() {
            actions.close = true;
        }
    });
    ui.separator();

    if state.notifications.is_empty() {
        ui.label(egui::RichText::new("No notifications").weak());
        return actions;
    }

    egui::ScrollArea::vertical()
        .max_height(320.0)
        .show(ui, |ui| {
            for item in &state.notifications {
                ui.horizontal(|ui| {
                    let marker = if item.seen { "○" } else { "●" };
                    ui.colored_label(egui::Color32::from_rgb(234, 179, 8), marker);
                    ui.vertical(|ui| {
                        ui.label(&item.title);
                        let mut meta = Vec::new();
                        if let Some(username) = &item.username {
                            meta.push(username.clone());
                        }
                        if let Some(at) = item.timestamp.as_deref().and_then(parse_timestamp) {
                            meta.push(
                                at.with_timezone(&chrono::Local)
                                    .format("%Y-%m-%d %H:%M")
                                    .to_string(),
                            );
                        }
                        if !meta.is_empty() {
                            ui.label(egui::RichText::new(meta.join(" · ")).small().weak());
                        }
                    });
                });
                ui.separator();
            }
        });

    if state.has_more && ui.button("Load more").clicked() {
        actions.load_more = true;
    }

    actions
}
