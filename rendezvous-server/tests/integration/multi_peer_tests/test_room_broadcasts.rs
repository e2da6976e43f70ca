use rendezvous_core::{ConnectionId, ServerEvent};

use crate::integration::{create_test_manager, init_tracing};
use crate::utils::{addressed_to, join, leave, settle};

#[tokio::test]
async fn test_join_is_announced_to_others_only() {
    init_tracing();

    let (cmd_tx, mut signal_rx, _signaling) = create_test_manager();
    let (a, b, c) = (ConnectionId::new(), ConnectionId::new(), ConnectionId::new());

    join(&cmd_tx, a, "alpha").await.unwrap();
    join(&cmd_tx, b, "alpha").await.unwrap();
    join(&cmd_tx, c, "alpha").await.unwrap();

    let delivered = settle(&cmd_tx, &mut signal_rx).await.unwrap();
    assert_eq!(
        addressed_to(&delivered, &a),
        vec![ServerEvent::UserJoined(b), ServerEvent::UserJoined(c)]
    );
    assert_eq!(addressed_to(&delivered, &b), vec![ServerEvent::UserJoined(c)]);
    assert!(addressed_to(&delivered, &c).is_empty());
}

#[tokio::test]
async fn test_leave_is_announced_to_remaining_members() {
    init_tracing();

    let (cmd_tx, mut signal_rx, _signaling) = create_test_manager();
    let (a, b, c) = (ConnectionId::new(), ConnectionId::new(), ConnectionId::new());

    for conn in [a, b, c] {
        join(&cmd_tx, conn, "alpha").await.unwrap();
    }
    settle(&cmd_tx, &mut signal_rx).await.unwrap();

    leave(&cmd_tx, b, "alpha").await.unwrap();
    let delivered = settle(&cmd_tx, &mut signal_rx).await.unwrap();
    assert_eq!(addressed_to(&delivered, &a), vec![ServerEvent::UserLeft(b)]);
    assert_eq!(addressed_to(&delivered, &c), vec![ServerEvent::UserLeft(b)]);
    assert!(addressed_to(&delivered, &b).is_empty());
}

#[tokio::test]
async fn test_join_then_leave_leaves_no_trace() {
    init_tracing();

    let (cmd_tx, mut signal_rx, _signaling) = create_test_manager();
    let (a, b) = (ConnectionId::new(), ConnectionId::new());

    join(&cmd_tx, a, "alpha").await.unwrap();
    leave(&cmd_tx, a, "alpha").await.unwrap();
    join(&cmd_tx, b, "alpha").await.unwrap();

    let delivered = settle(&cmd_tx, &mut signal_rx).await.unwrap();
    assert!(delivered.is_empty(), "{delivered:?}");
}

#[tokio::test]
async fn test_rooms_are_isolated() {
    init_tracing();

    let (cmd_tx, mut signal_rx, _signaling) = create_test_manager();
    let (a, b, c) = (ConnectionId::new(), ConnectionId::new(), ConnectionId::new());

    join(&cmd_tx, a, "alpha").await.unwrap();
    join(&cmd_tx, c, "beta").await.unwrap();
    join(&cmd_tx, b, "alpha").await.unwrap();

    let delivered = settle(&cmd_tx, &mut signal_rx).await.unwrap();
    assert_eq!(addressed_to(&delivered, &a), vec![ServerEvent::UserJoined(b)]);
    assert!(addressed_to(&delivered, &c).is_empty());
}
