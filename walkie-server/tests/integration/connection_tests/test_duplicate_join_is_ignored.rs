use walkie_core::{RoomMember, ServerEvent};

use crate::integration::{init_tracing, spawn_test_relay};
use crate::utils::{connect, drain_events, join_room, recv_event};

#[tokio::test]
async fn test_duplicate_join_is_ignored() {
    init_tracing();

    let (cmd_tx, sink, mut rx) = spawn_test_relay();

    let alice = connect(&cmd_tx).await;
    join_room(&cmd_tx, &alice, "Alice", "r1").await;
    drain_events(&mut rx, 2).await;

    // Rejoining (same or different room) is not supported; the second
    // join produces no broadcast and mutates nothing.
    join_room(&cmd_tx, &alice, "Alice2", "r2").await;

    let marker = connect(&cmd_tx).await;
    let (to, event) = recv_event(&mut rx).await;
    assert_eq!(to, marker);
    assert!(matches!(event, ServerEvent::Welcome { .. }));

    // Alice only ever saw her welcome and her first join broadcast.
    assert_eq!(sink.events_for(&alice).await.len(), 2);

    // r2 was not created for her: a later joiner finds it empty.
    let bob = connect(&cmd_tx).await;
    join_room(&cmd_tx, &bob, "Bob", "r2").await;
    drain_events(&mut rx, 1).await; // welcome(bob)

    let (to, event) = recv_event(&mut rx).await;
    assert_eq!(to, bob);
    assert_eq!(
        event,
        ServerEvent::UserJoined {
            user_id: bob.clone(),
            username: "Bob".into(),
            users_in_room: vec![RoomMember {
                id: bob,
                username: "Bob".into(),
            }],
        }
    );

    // And her original membership in r1 is intact, under the first name.
    let carol = connect(&cmd_tx).await;
    join_room(&cmd_tx, &carol, "Carol", "r1").await;
    drain_events(&mut rx, 1).await; // welcome(carol)

    let (to, event) = recv_event(&mut rx).await;
    assert_eq!(to, alice);
    assert_eq!(
        event,
        ServerEvent::UserJoined {
            user_id: carol.clone(),
            username: "Carol".into(),
            users_in_room: vec![
                RoomMember {
                    id: alice,
                    username: "Alice".into(),
                },
                RoomMember {
                    id: carol,
                    username: "Carol".into(),
                },
            ],
        }
    );
}
