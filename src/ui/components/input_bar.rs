use eframe::egui;

/// Returns the draft when the user submits. The draft itself is left alone;
/// it is cleared once the core confirms the send.
pub fn render(ui: &mut egui::Ui, input_text: &mut String, enabled: bool) -> Option<String> {
    let mut send = false;
    ui.add_enabled_ui(enabled, |ui| {
        ui.horizontal(|ui| {
            let response = ui.add(
                egui::TextEdit::singleline(input_text).hint_text("Type a message..."),
            );
            let has_text = !input_text.trim().is_empty();
            if ui.add_enabled(has_text, egui::Button::new("Send")).clicked() {
                send = true;
            }

            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                send = true;
            }
        });
    });

    if send && enabled && !input_text.trim().is_empty() {
        return Some(input_text.clone());
    }

    None
}
