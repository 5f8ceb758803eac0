mod support;

use std::time::Duration;

use beehive_dashboard::common::{DashboardCommand, DashboardEvent, Role};
use beehive_dashboard::{DashboardRuntime, PollSettings};
use tokio::sync::mpsc;
use tokio::time::timeout;

use support::{FakeApi, message, notification, signed_in, user};

fn settings() -> PollSettings {
    PollSettings {
        chat_period: Duration::from_secs(5),
        badge_period: Duration::from_secs(10),
        page_size: 5,
    }
}

/// Skips events until one matches; the pollers keep emitting in between.
async fn wait_for<F>(events: &mut mpsc::Receiver<DashboardEvent>, mut pred: F) -> DashboardEvent
where
    F: FnMut(&DashboardEvent) -> bool,
{
    timeout(Duration::from_secs(120), async {
        loop {
            match events.recv().await {
                Some(event) if pred(&event) => return event,
                Some(_) => continue,
                None => panic!("runtime stopped before the expected event"),
            }
        }
    })
    .await
    .expect("expected event never arrived")
}

#[tokio::test(start_paused = true)]
async fn user_opens_chat_and_sends() {
    let api = FakeApi::new();
    api.set_conversation(
        "admin",
        vec![message("m1", "admin", "user-1", Role::User, "2024-05-01T10:00:00")],
    );
    let identity = signed_in("user-1", Role::User);
    let (cmd_tx, cmd_rx) = mpsc::channel(100);
    let (event_tx, mut event_rx) = mpsc::channel(100);
    let runtime = DashboardRuntime::new(api.clone(), identity, settings(), cmd_rx, event_tx);
    let handle = tokio::spawn(runtime.run());

    cmd_tx.send(DashboardCommand::OpenChat).await.unwrap();
    let changed = wait_for(&mut event_rx, |event| {
        matches!(event, DashboardEvent::ConversationChanged(Some(_)))
    })
    .await;
    assert!(matches!(
        changed,
        DashboardEvent::ConversationChanged(Some(key)) if key.counterpart_id == "admin"
    ));
    let replaced = wait_for(&mut event_rx, |event| {
        matches!(event, DashboardEvent::MessagesReplaced { .. })
    })
    .await;
    assert!(matches!(
        replaced,
        DashboardEvent::MessagesReplaced { messages, .. } if messages.len() == 1
    ));

    cmd_tx
        .send(DashboardCommand::SendMessage("hello".into()))
        .await
        .unwrap();
    wait_for(&mut event_rx, |event| matches!(event, DashboardEvent::MessageSent)).await;
    assert_eq!(api.sent()[0].content, "hello");

    // Users never get a badge.
    assert!(api.notification_fetches().is_empty());

    drop(cmd_tx);
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn send_failure_is_reported() {
    let api = FakeApi::new();
    api.fail_send(true);
    let (cmd_tx, cmd_rx) = mpsc::channel(100);
    let (event_tx, mut event_rx) = mpsc::channel(100);
    let runtime = DashboardRuntime::new(
        api.clone(),
        signed_in("user-1", Role::User),
        settings(),
        cmd_rx,
        event_tx,
    );
    tokio::spawn(runtime.run());

    cmd_tx.send(DashboardCommand::OpenChat).await.unwrap();
    cmd_tx
        .send(DashboardCommand::SendMessage("hello".into()))
        .await
        .unwrap();
    let failed = wait_for(&mut event_rx, |event| {
        matches!(event, DashboardEvent::SendFailed(_))
    })
    .await;
    assert!(matches!(failed, DashboardEvent::SendFailed(reason) if reason.contains("503")));
}

#[tokio::test(start_paused = true)]
async fn admin_panel_flow_and_sign_out() {
    let api = FakeApi::new();
    api.set_directory(vec![user("u1", "Ada")]);
    api.set_notifications(vec![
        notification("n1", false),
        notification("n2", false),
        notification("n3", false),
        notification("n4", true),
        notification("n5", true),
    ]);
    let identity = signed_in("admin-1", Role::Admin);
    let (cmd_tx, cmd_rx) = mpsc::channel(100);
    let (event_tx, mut event_rx) = mpsc::channel(100);
    let runtime =
        DashboardRuntime::new(api.clone(), identity.clone(), settings(), cmd_rx, event_tx);
    tokio::spawn(runtime.run());

    wait_for(&mut event_rx, |event| matches!(event, DashboardEvent::BadgeUpdated(3))).await;

    cmd_tx.send(DashboardCommand::OpenNotifications).await.unwrap();
    let listed = wait_for(&mut event_rx, |event| {
        matches!(event, DashboardEvent::NotificationsReplaced { .. })
    })
    .await;
    assert!(matches!(
        listed,
        DashboardEvent::NotificationsReplaced { items, has_more: true } if items.len() == 5
    ));
    wait_for(&mut event_rx, |event| matches!(event, DashboardEvent::BadgeUpdated(0))).await;
    assert_eq!(api.mark_seen_calls(), [vec!["n1", "n2", "n3"]]);

    cmd_tx.send(DashboardCommand::OpenChat).await.unwrap();
    let selected = wait_for(&mut event_rx, |event| {
        matches!(event, DashboardEvent::TargetSelected(_))
    })
    .await;
    assert!(matches!(selected, DashboardEvent::TargetSelected(picked) if picked.id == "u1"));

    cmd_tx.send(DashboardCommand::SignOut).await.unwrap();
    wait_for(&mut event_rx, |event| matches!(event, DashboardEvent::SignedOut)).await;
    assert!(identity.credential().is_none());
}
