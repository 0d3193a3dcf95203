use super::*;
use crate::models::{Discussion, DiscussionLog, DiscussionStatus, LogStatus};
use std::time::Duration;

fn log_event(discussion_id: i64, content: &str) -> DiscussionEvent {
    DiscussionEvent::Log(DiscussionLog::new(
        discussion_id,
        1,
        LogStatus::Success,
        content,
        10,
    ))
}

#[tokio::test]
async fn test_subscribe_receives_own_discussion_only() {
    let bus = DiscussionBroadcaster::default();
    let mut sub = bus.subscribe(1).await;

    assert_eq!(bus.broadcast(log_event(2, "elsewhere")).await, 0);
    assert_eq!(bus.broadcast(log_event(1, "here")).await, 1);

    match sub.receiver.recv().await.unwrap() {
        DiscussionEvent::Log(log) => assert_eq!(log.content, "here"),
        other => panic!("unexpected event: {:?}", other),
    }
    assert!(sub.receiver.try_recv().is_err());
}

#[tokio::test]
async fn test_multiple_listeners() {
    let bus = DiscussionBroadcaster::default();
    let mut a = bus.subscribe(7).await;
    let mut b = bus.subscribe(7).await;
    assert_eq!(bus.listener_count(7).await, 2);

    assert_eq!(bus.broadcast(log_event(7, "x")).await, 2);
    assert_eq!(a.receiver.recv().await.unwrap().discussion_id(), 7);
    assert_eq!(b.receiver.recv().await.unwrap().discussion_id(), 7);
}

#[tokio::test]
async fn test_full_buffer_drops_without_blocking() {
    let bus = DiscussionBroadcaster::new(2);
    let mut slow = bus.subscribe(1).await;
    let mut fast = bus.subscribe(1).await;

    for i in 0..2 {
        bus.broadcast(log_event(1, &format!("e{i}"))).await;
    }
    // Drain the fast listener so only the slow one is full
    fast.receiver.recv().await.unwrap();
    fast.receiver.recv().await.unwrap();

    // Must return promptly even though `slow` never reads
    let delivered = tokio::time::timeout(
        Duration::from_secs(1),
        bus.broadcast(log_event(1, "overflow")),
    )
    .await
    .expect("broadcast blocked on a full listener");
    assert_eq!(delivered, 1);

    let mut seen = Vec::new();
    while let Ok(DiscussionEvent::Log(log)) = slow.receiver.try_recv() {
        seen.push(log.content);
    }
    assert_eq!(seen, vec!["e0", "e1"]);

    match fast.receiver.recv().await.unwrap() {
        DiscussionEvent::Log(log) => assert_eq!(log.content, "overflow"),
        other => panic!("unexpected event: {:?}", other),
    }
}

#[tokio::test]
async fn test_unsubscribe() {
    let bus = DiscussionBroadcaster::default();
    let sub = bus.subscribe(3).await;
    let other = bus.subscribe(3).await;

    assert!(bus.unsubscribe(3, sub.id).await);
    assert!(!bus.unsubscribe(3, sub.id).await);
    assert_eq!(bus.listener_count(3).await, 1);

    assert!(bus.unsubscribe(3, other.id).await);
    assert_eq!(bus.listener_count(3).await, 0);
    assert_eq!(bus.broadcast(log_event(3, "nobody")).await, 0);
}

#[tokio::test]
async fn test_dropped_receivers_are_pruned() {
    let bus = DiscussionBroadcaster::default();
    let gone = bus.subscribe(4).await;
    drop(gone);

    assert_eq!(bus.broadcast(log_event(4, "x")).await, 0);
    let _live = bus.subscribe(4).await;
    assert_eq!(bus.listener_count(4).await, 1);
}

#[test]
fn test_event_serialization() {
    let event = log_event(9, "hello");
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "log");
    assert_eq!(json["discussion_id"], 9);
    assert_eq!(json["status"], "success");

    let mut discussion = Discussion::new("topic", vec![1, 2]);
    discussion.status = DiscussionStatus::Completed;
    let event = DiscussionEvent::Discussion(discussion);
    assert!(event.is_terminal());
    assert_eq!(event.name(), "discussion");
    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains("\"type\":\"discussion\""));
    let back: DiscussionEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(back, event);
}
