use beehive_dashboard::common::{DashboardCommand, DashboardEvent, Identity};
use eframe::egui;
use tokio::sync::mpsc;

use super::components::{chat_area, input_bar, notification_panel, sidebar};
use super::state::AppState;

pub struct DashboardApp {
    state: AppState,
    command_sender: mpsc::Sender<DashboardCommand>,
    event_receiver: mpsc::Receiver<DashboardEvent>,
}

impl DashboardApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        identity: Option<Identity>,
        command_sender: mpsc::Sender<DashboardCommand>,
        event_receiver: mpsc::Receiver<DashboardEvent>,
    ) -> Self {
        Self {
            state: AppState::new(identity),
            command_sender,
            event_receiver,
        }
    }

    fn handle_events(&mut self) {
        while let Ok(event) = self.event_receiver.try_recv() {
            self.state.apply(event);
        }
    }

    fn send_command(&self, command: DashboardCommand) -> bool {
        match self.command_sender.try_send(command) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("Failed to send command to dashboard runtime: {err}");
                false
            }
        }
    }

    fn toggle_chat(&mut self) {
        self.state.chat_open = !self.state.chat_open;
        let command = if self.state.chat_open {
            DashboardCommand::OpenChat
        } else {
            DashboardCommand::CloseChat
        };
        self.send_command(command);
    }

    fn toggle_panel(&mut self) {
        self.state.panel_open = !self.state.panel_open;
        let command = if self.state.panel_open {
            DashboardCommand::OpenNotifications
        } else {
            DashboardCommand::CloseNotifications
        };
        self.send_command(command);
    }

    fn render_top_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Beehive");
            ui.label(egui::RichText::new(&self.state.viewer_name).weak());

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Sign out").clicked() {
                    self.send_command(DashboardCommand::SignOut);
                }
                if ui.button("💬 Chat").clicked() {
                    self.toggle_chat();
                }
                if self.state.is_admin() {
                    let bell = if self.state.unseen_count > 0 {
                        format!("🔔 {}", self.state.unseen_count)
                    } else {
                        "🔔".to_string()
                    };
                    if ui.button(bell).clicked() {
                        self.toggle_panel();
                    }
                }
            });
        });
    }

    fn render_chat(&mut self, ctx: &egui::Context) {
        if self.state.is_admin() {
            egui::SidePanel::left("directory_sidebar")
                .resizable(true)
                .default_width(200.0)
                .show(ctx, |ui| {
                    if let Some(user_id) = sidebar::render(ui, &self.state) {
                        self.send_command(DashboardCommand::SelectTarget { user_id });
                    }
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(self.state.chat_title());
            ui.separator();

            let input_height = 40.0;
            ui.allocate_ui(
                egui::vec2(ui.available_width(), ui.available_height() - input_height),
                |ui| chat_area::render(ui, &self.state),
            );

            ui.separator();
            if let Some(error) = &self.state.last_error {
                ui.colored_label(egui::Color32::RED, error);
            }
            let enabled = self.state.can_send();
            if let Some(content) = input_bar::render(ui, &mut self.state.input_text, enabled) {
                if self.send_command(DashboardCommand::SendMessage(content)) {
                    self.state.sending = true;
                }
            }
        });
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_events();

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            self.render_top_bar(ui);
        });

        if self.state.signed_out {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.heading("Signed out");
                ui.label("Run `beehive-dashboard login` to sign in again.");
            });
            return;
        }

        if self.state.panel_open {
            egui::SidePanel::right("notification_panel")
                .resizable(true)
                .default_width(300.0)
                .show(ctx, |ui| {
                    let actions = notification_panel::render(ui, &self.state);
                    if actions.load_more {
                        self.send_command(DashboardCommand::LoadMoreNotifications);
                    }
                    if actions.close {
                        self.toggle_panel();
                    }
                });
        }

        if self.state.chat_open {
            self.render_chat(ctx);
        } else {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.heading("Dashboard");
                ui.label("Open the chat or the notification bell from the top bar.");
            });
        }

        ctx.request_repaint_after(std::time::Duration::from_millis(250));
    }
}
