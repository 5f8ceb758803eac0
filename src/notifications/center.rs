use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, mpsc};

use crate::common::events::emit;
use crate::common::{DashboardEvent, Notification};
use crate::network::{DashboardApi, Poller};
use crate::session::IdentityStore;

use super::{LoadMore, NotifyError, PanelSummary};

pub const BADGE_POLL_PERIOD: Duration = Duration::from_secs(10);
pub const NOTIFICATION_PAGE_SIZE: u32 = 5;

#[derive(Debug, Default)]
struct Badge {
    count: u64,
    /// Bumped by local decrements so an older poll response cannot undo them.
    generation: u64,
}

#[derive(Clone)]
struct BadgeContext {
    api: Arc<dyn DashboardApi>,
    identity: IdentityStore,
    badge: Arc<Mutex<Badge>>,
    events: Option<mpsc::Sender<DashboardEvent>>,
    page_size: u32,
}

impl BadgeContext {
    async fn refresh(&self) {
        let generation = self.badge.lock().await.generation;

        let page = match self.api.fetch_notifications(1, self.page_size).await {
            Ok(page) => page,
            Err(err) => {
                // The badge keeps its last value until a later tick succeeds.
                log::debug!("Badge poll failed: {err}");
                return;
            }
        };
        if !self.identity.is_admin() {
            log::debug!("Dropping badge poll: viewer is no longer a live admin");
            return;
        }

        {
            let mut badge = self.badge.lock().await;
            if badge.generation != generation {
                log::debug!("Dropping badge poll issued before a local update");
                return;
            }
            badge.count = page.unseen_count;
        }
        emit(&self.events, DashboardEvent::BadgeUpdated(page.unseen_count)).await;
    }
}

/// Unseen badge, paged listing and seen-marking for the admin bell.
///
/// The badge is polled on a timer; the listing only moves on explicit
/// calls (`open_panel`, `load_more`).
pub struct NotificationCenter {
    ctx: BadgeContext,
    badge_period: Duration,
    poller: Option<Poller>,
    items: Vec<Notification>,
    page: u32,
    has_more: bool,
    panel_open: bool,
    /// Ids this client already marked seen; never submitted twice.
    acknowledged: HashSet<String>,
}

impl NotificationCenter {
    pub fn new(
        api: Arc<dyn DashboardApi>,
        identity: IdentityStore,
        page_size: u32,
        badge_period: Duration,
    ) -> Self {
        Self {
            ctx: BadgeContext {
                api,
                identity,
                badge: Arc::new(Mutex::new(Badge::default())),
                events: None,
                page_size: page_size.max(1),
            },
            badge_period,
            poller: None,
            items: Vec::new(),
            page: 1,
            // Nothing to page through until `open_panel` has loaded page 1.
            has_more: false,
            panel_open: false,
            acknowledged: HashSet::new(),
        }
    }

    pub fn with_events(mut self, events: mpsc::Sender<DashboardEvent>) -> Self {
        self.ctx.events = Some(events);
        self
    }

    /// Arms the badge poller (first poll happens immediately). Only live
    /// admins get a badge; returns whether the poller is running.
    pub fn start_badge(&mut self) -> bool {
        if self.is_badge_running() {
            return true;
        }
        if !self.ctx.identity.is_admin() {
            log::debug!("Badge polling skipped: viewer is not a live admin");
            return false;
        }

        let ctx = self.ctx.clone();
        self.poller = Some(Poller::start("badge", self.badge_period, move || {
            let ctx = ctx.clone();
            async move { ctx.refresh().await }
        }));
        true
    }

    pub fn stop_badge(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop();
        }
    }

    pub fn is_badge_running(&self) -> bool {
        self.poller.as_ref().is_some_and(Poller::is_running)
    }

    /// One badge poll outside the timer.
    pub async fn refresh_badge(&self) {
        self.ctx.refresh().await;
    }

    pub async fn unseen_count(&self) -> u64 {
        self.ctx.badge.lock().await.count
    }

    /// Loads page 1 and marks its unseen entries as seen.
    ///
    /// Only ids that are unseen on the fetched page, and not already marked by
    /// this client, are submitted. On success the badge drops by that many
    /// (floored at zero) without re-polling.
    pub async fn open_panel(&mut self) -> Result<PanelSummary, NotifyError> {
        if !self.ctx.identity.is_admin() {
            return Err(NotifyError::NotAuthenticated);
        }
        self.panel_open = true;

        let page = self
            .ctx
            .api
            .fetch_notifications(1, self.ctx.page_size)
            .await?;
        self.items = page.notifications;
        self.page = 1;
        self.has_more = self.items.len() == self.ctx.page_size as usize;

        let unseen: Vec<String> = self
            .items
            .iter()
            .filter(|item| !item.seen && !self.acknowledged.contains(&item.id))
            .map(|item| item.id.clone())
            .collect();
        if unseen.is_empty() {
            self.emit_listing().await;
            return Ok(PanelSummary {
                shown: self.items.len(),
                marked: 0,
            });
        }

        if let Err(err) = self.ctx.api.mark_seen(&unseen).await {
            self.emit_listing().await;
            return Err(err.into());
        }

        for item in self.items.iter_mut().filter(|item| unseen.contains(&item.id)) {
            item.seen = true;
        }
        self.emit_listing().await;
        self.acknowledged.extend(unseen.iter().cloned());
        let count = {
            let mut badge = self.ctx.badge.lock().await;
            badge.count = badge.count.saturating_sub(unseen.len() as u64);
            badge.generation += 1;
            badge.count
        };
        log::debug!("Marked {} notifications seen", unseen.len());
        emit(&self.ctx.events, DashboardEvent::BadgeUpdated(count)).await;

        Ok(PanelSummary {
            shown: self.items.len(),
            marked: unseen.len(),
        })
    }

    async fn emit_listing(&self) {
        emit(
            &self.ctx.events,
            DashboardEvent::NotificationsReplaced {
                items: self.items.clone(),
                has_more: self.has_more,
            },
        )
        .await;
    }

    pub fn close_panel(&mut self) {
        self.panel_open = false;
    }

    /// Appends the next page. An empty page ends pagination without moving
    /// the cursor; a short page is appended and ends it. Once ended, or
    /// before `open_panel` has loaded page 1, no request is made.
    pub async fn load_more(&mut self) -> Result<LoadMore, NotifyError> {
        if !self.has_more {
            return Ok(LoadMore::Exhausted);
        }
        if !self.ctx.identity.is_admin() {
            return Err(NotifyError::NotAuthenticated);
        }

        let next_page = self.page + 1;
        let page = self
            .ctx
            .api
            .fetch_notifications(next_page, self.ctx.page_size)
            .await?;
        let fetched = page.notifications;

        if fetched.is_empty() {
            self.has_more = false;
            emit(
                &self.ctx.events,
                DashboardEvent::NotificationsAppended {
                    items: Vec::new(),
                    has_more: false,
                },
            )
            .await;
            return Ok(LoadMore::Appended(0));
        }

        let appended = fetched.len();
        if appended < self.ctx.page_size as usize {
            self.has_more = false;
        }
        self.items.extend(fetched.iter().cloned());
        self.page = next_page;
        emit(
            &self.ctx.events,
            DashboardEvent::NotificationsAppended {
                items: fetched,
                has_more: self.has_more,
            },
        )
        .await;
        Ok(LoadMore::Appended(appended))
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_panel_open(&self) -> bool {
        self.panel_open
    }

    pub fn page_size(&self) -> u32 {
        self.ctx.page_size
    }
}
