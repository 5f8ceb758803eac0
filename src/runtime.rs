//! Command loop between the UI and the session controllers.
//!
//! The UI sends [`DashboardCommand`]s and drains [`DashboardEvent`]s; this
//! task owns the chat session and notification center and is the only
//! place that drives them.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::chat::{ChatError, ChatSession, SendOutcome};
use crate::common::events::emit;
use crate::common::{DashboardCommand, DashboardEvent};
use crate::config::AppConfig;
use crate::network::DashboardApi;
use crate::notifications::{NotificationCenter, NotifyError};
use crate::session::IdentityStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub chat_period: Duration,
    pub badge_period: Duration,
    pub page_size: u32,
}

impl From<&AppConfig> for PollSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            chat_period: config.chat_poll_period(),
            badge_period: config.badge_poll_period(),
            page_size: config.page_size(),
        }
    }
}

pub struct DashboardRuntime {
    identity: IdentityStore,
    command_receiver: mpsc::Receiver<DashboardCommand>,
    events: Option<mpsc::Sender<DashboardEvent>>,
    chat: ChatSession,
    notifications: NotificationCenter,
}

impl DashboardRuntime {
    pub fn new(
        api: Arc<dyn DashboardApi>,
        identity: IdentityStore,
        settings: PollSettings,
        command_receiver: mpsc::Receiver<DashboardCommand>,
        event_sender: mpsc::Sender<DashboardEvent>,
    ) -> Self {
        let chat = ChatSession::new(api.clone(), identity.clone(), settings.chat_period)
            .with_events(event_sender.clone());
        let notifications = NotificationCenter::new(
            api,
            identity.clone(),
            settings.page_size,
            settings.badge_period,
        )
        .with_events(event_sender.clone());

        Self {
            identity,
            command_receiver,
            events: Some(event_sender),
            chat,
            notifications,
        }
    }

    /// Runs until the command channel closes, then releases both pollers.
    pub async fn run(mut self) {
        if self.notifications.start_badge() {
            log::info!("Notification badge polling started");
        }
        log::info!("Dashboard runtime started");

        while let Some(command) = self.command_receiver.recv().await {
            self.handle_command(command).await;
        }

        self.chat.close().await;
        self.notifications.stop_badge();
        log::info!("Dashboard runtime stopped");
    }

    async fn handle_command(&mut self, command: DashboardCommand) {
        match command {
            DashboardCommand::OpenChat => {
                if let Err(err) = self.chat.open().await {
                    log::warn!("Cannot open chat: {err}");
                }
            }
            DashboardCommand::CloseChat => self.chat.close().await,
            DashboardCommand::SelectTarget { user_id } => {
                if let Err(err) = self.chat.select_target_by_id(&user_id).await {
                    log::warn!("Cannot select chat target {user_id}: {err}");
                }
            }
            DashboardCommand::SendMessage(content) => {
                let mut draft = content;
                match self.chat.send(&mut draft).await {
                    Ok(SendOutcome::Sent) => emit(&self.events, DashboardEvent::MessageSent).await,
                    Ok(SendOutcome::Skipped) => log::debug!("Nothing to send"),
                    Err(err) => {
                        emit(&self.events, DashboardEvent::SendFailed(send_error_text(&err)))
                            .await
                    }
                }
            }
            DashboardCommand::OpenNotifications => {
                // The badge may not be running yet if the viewer signed in as admin later.
                self.notifications.start_badge();
                if let Err(err) = self.notifications.open_panel().await {
                    self.report_notification_error(err).await;
                }
            }
            DashboardCommand::CloseNotifications => self.notifications.close_panel(),
            DashboardCommand::LoadMoreNotifications => {
                if let Err(err) = self.notifications.load_more().await {
                    self.report_notification_error(err).await;
                }
            }
            DashboardCommand::SignOut => self.sign_out().await,
        }
    }

    async fn report_notification_error(&self, err: NotifyError) {
        log::warn!("Notification request failed: {err}");
        emit(&self.events, DashboardEvent::NotificationsFailed(err.to_string())).await;
    }

    async fn sign_out(&mut self) {
        if let Err(err) = self.identity.clear_credential() {
            log::error!("Failed to clear credential: {err}");
        }
        self.chat.close().await;
        self.notifications.stop_badge();
        self.notifications.close_panel();
        log::info!("Signed out");
        emit(&self.events, DashboardEvent::SignedOut).await;
    }
}

fn send_error_text(err: &ChatError) -> String {
    match err {
        ChatError::NotAuthenticated => "Your session has expired. Sign in again.".to_string(),
        other => other.to_string(),
    }
}
