use rendezvous_core::{ConnectionId, RelayKind, ServerEvent};
use serde_json::json;

use crate::integration::{create_test_manager, init_tracing};
use crate::utils::{addressed_to, join, leave, relay, settle};

#[tokio::test]
async fn test_joining_second_room_leaves_first() {
    init_tracing();

    let (cmd_tx, mut signal_rx, _signaling) = create_test_manager();
    let (a, b, c) = (ConnectionId::new(), ConnectionId::new(), ConnectionId::new());

    join(&cmd_tx, a, "alpha").await.unwrap();
    join(&cmd_tx, b, "alpha").await.unwrap();
    join(&cmd_tx, c, "beta").await.unwrap();
    settle(&cmd_tx, &mut signal_rx).await.unwrap();

    join(&cmd_tx, b, "beta").await.unwrap();
    let delivered = settle(&cmd_tx, &mut signal_rx).await.unwrap();
    assert_eq!(addressed_to(&delivered, &a), vec![ServerEvent::UserLeft(b)]);
    assert_eq!(addressed_to(&delivered, &c), vec![ServerEvent::UserJoined(b)]);
    assert!(addressed_to(&delivered, &b).is_empty());

    // B now relays with C, no longer with A.
    relay(&cmd_tx, a, RelayKind::Offer, &b, json!({"sdp": "v=0"}))
        .await
        .unwrap();
    relay(&cmd_tx, c, RelayKind::Offer, &b, json!({"sdp": "v=1"}))
        .await
        .unwrap();
    let delivered = settle(&cmd_tx, &mut signal_rx).await.unwrap();
    assert_eq!(
        addressed_to(&delivered, &a),
        vec![ServerEvent::error("Peers must be in the same room")]
    );
    assert_eq!(
        addressed_to(&delivered, &b),
        vec![ServerEvent::Offer {
            offer: json!({"sdp": "v=1"}),
            sender: c
        }]
    );
}

#[tokio::test]
async fn test_rejoining_same_room_announces_again() {
    init_tracing();

    let (cmd_tx, mut signal_rx, _signaling) = create_test_manager();
    let (a, b) = (ConnectionId::new(), ConnectionId::new());

    join(&cmd_tx, a, "alpha").await.unwrap();
    join(&cmd_tx, b, "alpha").await.unwrap();
    settle(&cmd_tx, &mut signal_rx).await.unwrap();

    join(&cmd_tx, b, "alpha").await.unwrap();
    let delivered = settle(&cmd_tx, &mut signal_rx).await.unwrap();
    assert_eq!(addressed_to(&delivered, &a), vec![ServerEvent::UserJoined(b)]);
    assert!(addressed_to(&delivered, &b).is_empty());

    // B is still listed once, so one leave is enough.
    leave(&cmd_tx, b, "alpha").await.unwrap();
    let delivered = settle(&cmd_tx, &mut signal_rx).await.unwrap();
    assert_eq!(addressed_to(&delivered, &a), vec![ServerEvent::UserLeft(b)]);
}
