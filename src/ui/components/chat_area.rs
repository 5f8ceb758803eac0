use beehive_dashboard::common::Message;
use eframe::egui;

use crate::ui::state::AppState;

pub fn render(ui: &mut egui::Ui, state: &AppState) {
    egui::ScrollArea::vertical()
        .stick_to_bottom(true)
        .auto_shrink([false, false])
        .show(ui, |ui| {
            if state.messages.is_empty() {
                ui.label(egui::RichText::new("No messages yet.").weak());
                return;
            }
            for message in &state.messages {
                render_message(ui, message, state.is_mine(message));
            }
        });
}

fn render_message(ui: &mut egui::Ui, message: &Message, mine: bool) {
    let layout = if mine {
        egui::Layout::right_to_left(egui::Align::TOP)
    } else {
        egui::Layout::left_to_right(egui::Align::TOP)
    };
    let fill = if mine {
        egui::Color32::from_rgb(254, 243, 199)
    } else {
        egui::Color32::from_gray(235)
    };
    let time = message
        .sent_at()
        .map(|at| at.with_timezone(&chrono::Local).format("%H:%M").to_string())
        .unwrap_or_default();

    ui.with_layout(layout, |ui| {
        egui::Frame::new()
            .fill(fill)
            .corner_radius(egui::CornerRadius::same(8))
            .inner_margin(egui::Margin::same(6))
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.label(egui::RichText::new(&message.content).color(egui::Color32::BLACK));
                    if !time.is_empty() {
                        ui.label(egui::RichText::new(time).small().weak());
                    }
                });
            });
    });
}
