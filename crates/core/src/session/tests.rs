use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use ops_agent_model::CannedReply;
use tokio::sync::mpsc;
use tokio::time::sleep;

use crate::clock::ManualClock;
use crate::conversation::{Conversation, DEFAULT_TITLE, Role};
use crate::exchange::{DEFAULT_REPLY_DELAY, ReplyPolicy};
use crate::{ConversationId, Error, SessionBuilder};

fn two_pm() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(14, 0, 0)
        .unwrap()
}

fn builder() -> SessionBuilder {
    SessionBuilder::new()
        .with_clock(ManualClock::new(two_pm()))
        .with_composer(CannedReply::with_body("ok"))
}

/// Waits until every reply scheduled so far has had time to land.
async fn past_reply_delay() {
    sleep(DEFAULT_REPLY_DELAY + Duration::from_millis(100)).await;
}

async fn message_count(
    session: &crate::Session,
    id: &ConversationId,
) -> usize {
    session
        .conversation(id.clone())
        .await
        .unwrap()
        .map_or(0, |c| c.messages().len())
}

#[tokio::test(start_paused = true)]
async fn test_starts_with_one_conversation() {
    let session = builder().build().unwrap();
    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.conversations.len(), 1);
    assert_eq!(snapshot.conversations[0].title, DEFAULT_TITLE);
    assert_eq!(snapshot.active_id.as_ref(), Some(&snapshot.conversations[0].id));
    assert_eq!(snapshot.model.id, "operations-pro");
}

#[tokio::test(start_paused = true)]
async fn test_seeded_session() {
    let session = builder()
        .with_conversations(vec![
            Conversation::new("1".into(), "Check order ORD-001", "2 hours ago"),
            Conversation::new("2".into(), "Update stock SP-003", "1 day ago"),
        ])
        .build()
        .unwrap();
    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.conversations.len(), 2);
    assert_eq!(snapshot.active_id.unwrap().as_str(), "1");
}

#[tokio::test(start_paused = true)]
async fn test_create_conversations() {
    let session = builder().build().unwrap();
    let mut ids = HashSet::new();
    let mut last = None;
    for _ in 0..4 {
        let id = session.create_conversation().await.unwrap();
        assert!(ids.insert(id.clone()));
        last = Some(id);
    }

    let snapshot = session.snapshot().await.unwrap();
    // Four created plus the one made at startup.
    assert_eq!(snapshot.conversations.len(), 5);
    assert_eq!(snapshot.conversations[0].id, last.clone().unwrap());
    assert_eq!(snapshot.active_id, last);
    assert!(snapshot.messages.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_blank_messages_change_nothing() {
    let session = builder().build().unwrap();
    assert!(!session.send_message("").await.unwrap());
    assert!(!session.send_message("   ").await.unwrap());
    past_reply_delay().await;

    let snapshot = session.snapshot().await.unwrap();
    assert!(snapshot.messages.is_empty());
    assert_eq!(snapshot.conversations[0].title, DEFAULT_TITLE);
}

#[tokio::test(start_paused = true)]
async fn test_send_and_receive_reply() {
    let session = builder().build().unwrap();
    assert!(session.send_message("hello").await.unwrap());

    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.conversations[0].title, "hello...");
    assert_eq!(snapshot.messages.len(), 1);
    assert_eq!(snapshot.messages[0].timestamp(), "14:00");
    assert_eq!(snapshot.pending_replies, 1);

    // Not yet.
    sleep(DEFAULT_REPLY_DELAY - Duration::from_millis(100)).await;
    assert_eq!(session.snapshot().await.unwrap().messages.len(), 1);

    past_reply_delay().await;
    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.messages.len(), 2);
    assert_eq!(snapshot.messages[1].role(), Role::Assistant);
    assert_eq!(snapshot.messages[1].content(), "[Operations Pro] ok");
    assert_eq!(snapshot.pending_replies, 0);

    session.send_message("again").await.unwrap();
    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.conversations[0].title, "hello...");
}

#[tokio::test(start_paused = true)]
async fn test_reply_follows_the_conversation_it_was_sent_from() {
    let session = builder().build().unwrap();
    let b = session.snapshot().await.unwrap().active_id.unwrap();
    let a = session.create_conversation().await.unwrap();

    session.send_message("x").await.unwrap();
    assert!(session.select_conversation(b.clone()).await.unwrap());

    past_reply_delay().await;
    assert_eq!(message_count(&session, &a).await, 2);
    assert_eq!(message_count(&session, &b).await, 0);

    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.active_id, Some(b));
    assert!(snapshot.messages.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_model_switch_relabels_reply_in_flight() {
    let session = builder().build().unwrap();
    session.send_message("x").await.unwrap();
    let model = session.select_model("gpt-4o").await.unwrap();
    assert_eq!(model.name, "GPT-4o");

    past_reply_delay().await;
    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.messages[1].content(), "[GPT-4o] ok");
}

#[tokio::test(start_paused = true)]
async fn test_unknown_model_is_rejected() {
    let session = builder().build().unwrap();
    session.select_model("grok-3").await.unwrap();

    let err = session.select_model("unknown-id").await.unwrap_err();
    assert!(matches!(err, Error::UnknownModel(ref e) if e.id() == "unknown-id"));
    assert_eq!(session.current_model().await.unwrap().id, "grok-3");
}

#[tokio::test(start_paused = true)]
async fn test_unknown_default_model() {
    let result = builder().with_default_model("gpt-2").build();
    assert!(matches!(result, Err(Error::UnknownModel(_))));
}

#[tokio::test(start_paused = true)]
async fn test_rename_survives_reselection() {
    let session = builder().build().unwrap();
    let a = session.snapshot().await.unwrap().active_id.unwrap();
    let b = session.create_conversation().await.unwrap();

    assert!(session.rename_conversation(a.clone(), "Orders").await.unwrap());
    assert!(!session.rename_conversation(a.clone(), " ").await.unwrap());
    session.select_conversation(a.clone()).await.unwrap();
    session.select_conversation(b).await.unwrap();
    session.select_conversation(a.clone()).await.unwrap();

    let conversation = session.conversation(a).await.unwrap().unwrap();
    assert_eq!(conversation.title(), "Orders");
}

#[tokio::test(start_paused = true)]
async fn test_delete_active_conversation() {
    let session = builder().build().unwrap();
    let c = session.snapshot().await.unwrap().active_id.unwrap();
    let b = session.create_conversation().await.unwrap();
    let a = session.create_conversation().await.unwrap();

    assert!(session.delete_conversation(a).await.unwrap());
    let snapshot = session.snapshot().await.unwrap();
    let ids: Vec<_> = snapshot.conversations.iter().map(|c| c.id.clone()).collect();
    assert_eq!(ids, [b.clone(), c]);
    assert_eq!(snapshot.active_id, Some(b));
}

#[tokio::test(start_paused = true)]
async fn test_delete_last_conversation() {
    let session = builder().build().unwrap();
    let only = session.snapshot().await.unwrap().active_id.unwrap();
    session.send_message("hi").await.unwrap();

    assert!(session.delete_conversation(only.clone()).await.unwrap());
    assert!(!session.delete_conversation(only.clone()).await.unwrap());

    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.conversations.len(), 1);
    assert_ne!(snapshot.active_id, Some(only));
    assert_eq!(snapshot.conversations[0].title, DEFAULT_TITLE);
    assert!(snapshot.messages.is_empty());

    // The reply for the deleted conversation never shows up anywhere.
    past_reply_delay().await;
    assert!(session.snapshot().await.unwrap().messages.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_replies_all_arrive() {
    let session = builder().build().unwrap();
    session.send_message("one").await.unwrap();
    sleep(Duration::from_millis(500)).await;
    session.send_message("two").await.unwrap();

    sleep(Duration::from_millis(1100)).await;
    let roles: Vec<Role> = session
        .snapshot()
        .await
        .unwrap()
        .messages
        .iter()
        .map(|m| m.role())
        .collect();
    assert_eq!(roles, [Role::User, Role::User, Role::Assistant]);

    past_reply_delay().await;
    assert_eq!(session.snapshot().await.unwrap().messages.len(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_serialized_replies_wait_for_each_other() {
    let session = builder()
        .with_reply_policy(ReplyPolicy::Serialized)
        .build()
        .unwrap();
    session.send_message("one").await.unwrap();
    session.send_message("two").await.unwrap();
    assert_eq!(session.snapshot().await.unwrap().pending_replies, 2);

    past_reply_delay().await;
    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.messages.len(), 3);
    assert_eq!(snapshot.pending_replies, 1);

    past_reply_delay().await;
    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.messages.len(), 4);
    assert_eq!(snapshot.pending_replies, 0);
}

#[tokio::test(start_paused = true)]
async fn test_callbacks() {
    let (reply_tx, mut reply_rx) = mpsc::unbounded_channel();
    let idle_count = Arc::new(AtomicUsize::new(0));
    let session = builder()
        .with_reply_delay(Duration::from_millis(10))
        .on_reply(move |id, msg| {
            reply_tx.send((id.clone(), msg.content().to_owned())).ok();
        })
        .on_idle({
            let idle_count = Arc::clone(&idle_count);
            move || {
                idle_count.fetch_add(1, Ordering::SeqCst);
            }
        })
        .build()
        .unwrap();
    let id = session.snapshot().await.unwrap().active_id.unwrap();

    session.send_message("a").await.unwrap();
    session.send_message("b").await.unwrap();
    sleep(Duration::from_millis(20)).await;

    let (target, content) = reply_rx.recv().await.unwrap();
    assert_eq!(target, id);
    assert_eq!(content, "[Operations Pro] ok");
    assert_eq!(reply_rx.recv().await.unwrap().0, id);
    assert_eq!(idle_count.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_deleting_pending_conversation_goes_idle() {
    let idle_count = Arc::new(AtomicUsize::new(0));
    let session = builder()
        .on_idle({
            let idle_count = Arc::clone(&idle_count);
            move || {
                idle_count.fetch_add(1, Ordering::SeqCst);
            }
        })
        .build()
        .unwrap();
    let id = session.snapshot().await.unwrap().active_id.unwrap();
    session.send_message("a").await.unwrap();

    session.delete_conversation(id).await.unwrap();
    assert_eq!(idle_count.load(Ordering::SeqCst), 1);

    past_reply_delay().await;
    assert_eq!(idle_count.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown() {
    let session = builder().build().unwrap();
    session.shutdown();
    tokio::task::yield_now().await;

    let err = session.snapshot().await.unwrap_err();
    assert_eq!(err, Error::SessionClosed);
    assert_eq!(err.to_string(), "the session has been closed");
}
