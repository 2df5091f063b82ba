use serde_json::{Value, json};
use walkie_core::{ClientEvent, ServerEvent};

use crate::integration::{init_tracing, spawn_test_relay};
use crate::utils::{connect, drain_events, join_room, recv_event, send_client_event};

#[tokio::test]
async fn test_answer_reject_end_forwarding() {
    init_tracing();

    let (cmd_tx, _sink, mut rx) = spawn_test_relay();

    let alice = connect(&cmd_tx).await;
    join_room(&cmd_tx, &alice, "Alice", "r1").await;
    let bob = connect(&cmd_tx).await;
    join_room(&cmd_tx, &bob, "Bob", "r1").await;
    drain_events(&mut rx, 5).await;

    // answerCall is forwarded without checking for a prior initiateCall.
    let answer = json!({"type": "answer", "sdp": "v=0"});
    send_client_event(
        &cmd_tx,
        &bob,
        ClientEvent::AnswerCall {
            target_user_id: alice.clone(),
            answer: answer.clone(),
        },
    )
    .await;

    let (to, event) = recv_event(&mut rx).await;
    assert_eq!(to, alice);
    assert_eq!(
        event,
        ServerEvent::CallAnswered {
            from: bob.clone(),
            answer,
        }
    );

    send_client_event(
        &cmd_tx,
        &bob,
        ClientEvent::AnswerCall {
            target_user_id: alice.clone(),
            answer: Value::Null,
        },
    )
    .await;

    let (to, event) = recv_event(&mut rx).await;
    assert_eq!(to, alice);
    assert!(matches!(event, ServerEvent::CallAnswered { answer: Value::Null, .. }));

    send_client_event(
        &cmd_tx,
        &alice,
        ClientEvent::RejectCall {
            target_user_id: bob.clone(),
        },
    )
    .await;

    let (to, event) = recv_event(&mut rx).await;
    assert_eq!(to, bob);
    assert_eq!(
        event,
        ServerEvent::CallRejected {
            from: alice.clone(),
        }
    );

    send_client_event(
        &cmd_tx,
        &alice,
        ClientEvent::EndCall {
            target_user_id: bob.clone(),
        },
    )
    .await;

    let (to, event) = recv_event(&mut rx).await;
    assert_eq!(to, bob);
    assert_eq!(event, ServerEvent::CallEnded { from: alice });
}
