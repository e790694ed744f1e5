use std::sync::Arc;

use bytes::Bytes;

use concierge::application::ports::TransportError;
use concierge::application::services::{
    ChatController, ExchangeError, SubmitOutcome, SubmitRejection, TranscriptStore,
};
use concierge::domain::{FAILURE_TEXT, GREETING_TEXT, MessageState, Sender};

use crate::helpers::{ScriptedGenerationClient, channel_client, chunk};

fn controller_with(
    client: ScriptedGenerationClient,
) -> (
    Arc<ScriptedGenerationClient>,
    Arc<TranscriptStore>,
    ChatController<ScriptedGenerationClient>,
) {
    let client = Arc::new(client);
    let store = Arc::new(TranscriptStore::new());
    let controller = ChatController::new(Arc::clone(&client), &store);
    (client, store, controller)
}

#[tokio::test]
async fn given_three_chunk_reply_when_submitting_then_transcript_ends_with_full_reply() {
    let (client, store, controller) =
        controller_with(ScriptedGenerationClient::chunks(&["I ", "can ", "help."]));

    let outcome = controller.submit("What credit cards do you offer?").await;

    assert!(matches!(outcome, SubmitOutcome::Completed { ref text, .. } if text == "I can help."));
    let transcript = store.snapshot();
    assert_eq!(transcript.len(), 3);
    assert_eq!(transcript.messages()[1].sender, Sender::User);
    assert_eq!(
        transcript.messages()[1].text(),
        "What credit cards do you offer?"
    );
    let reply = &transcript.messages()[2];
    assert_eq!(reply.sender, Sender::Bot);
    assert_eq!(reply.text(), "I can help.");
    assert!(!reply.is_streaming());
    assert_eq!(
        client.queries(),
        vec!["What credit cards do you offer?".to_string()]
    );
    assert!(!controller.is_busy());
}

#[tokio::test]
async fn given_padded_input_when_submitting_then_query_is_trimmed() {
    let (client, store, controller) = controller_with(ScriptedGenerationClient::chunks(&["ok"]));

    controller.submit("   rewards points?  \n").await;

    assert_eq!(store.snapshot().messages()[1].text(), "rewards points?");
    assert_eq!(client.queries(), vec!["rewards points?".to_string()]);
}

#[tokio::test]
async fn given_blank_input_when_submitting_then_nothing_happens() {
    let (client, store, controller) = controller_with(ScriptedGenerationClient::chunks(&["ok"]));

    for input in ["", "   ", "\n\t"] {
        let outcome = controller.submit(input).await;
        assert!(matches!(
            outcome,
            SubmitOutcome::Rejected(SubmitRejection::EmptyQuery)
        ));
    }

    assert_eq!(store.snapshot().len(), 1);
    assert_eq!(client.open_count(), 0);
}

#[tokio::test]
async fn given_connection_drop_after_partial_reply_when_streaming_then_partial_text_is_discarded() {
    let (_client, store, controller) = controller_with(ScriptedGenerationClient::raw(vec![
        chunk("Hel"),
        chunk("lo"),
        Err(TransportError::Body("connection reset".to_string())),
    ]));

    let outcome = controller.submit("hi").await;

    assert!(matches!(
        outcome,
        SubmitOutcome::Failed {
            error: ExchangeError::Transport(TransportError::Body(_)),
            ..
        }
    ));
    let reply = store.snapshot().messages()[2].clone();
    assert_eq!(reply.text(), FAILURE_TEXT);
    assert_ne!(reply.text(), "Hello");
    assert!(matches!(reply.state(), MessageState::Failed { .. }));
    assert!(!reply.is_streaming());
}

#[tokio::test]
async fn given_error_status_when_opening_then_fails_without_streaming() {
    let (client, store, controller) =
        controller_with(ScriptedGenerationClient::failing(TransportError::Status {
            status: 500,
            body: "Server error".to_string(),
        }));

    let outcome = controller.submit("hi").await;

    assert!(matches!(
        outcome,
        SubmitOutcome::Failed {
            error: ExchangeError::Transport(TransportError::Status { status: 500, .. }),
            ..
        }
    ));
    assert_eq!(store.snapshot().messages()[2].text(), FAILURE_TEXT);
    assert_eq!(client.open_count(), 1);
    assert!(!controller.is_busy());
}

#[tokio::test]
async fn given_malformed_bytes_when_streaming_then_fails_like_transport_error() {
    let (_client, store, controller) = controller_with(ScriptedGenerationClient::raw(vec![
        chunk("fine "),
        Ok(Bytes::from_static(&[0xFF])),
    ]));

    let outcome = controller.submit("hi").await;

    assert!(matches!(
        outcome,
        SubmitOutcome::Failed {
            error: ExchangeError::Decode(_),
            ..
        }
    ));
    assert_eq!(store.snapshot().messages()[2].text(), FAILURE_TEXT);
}

#[tokio::test]
async fn given_failed_exchange_when_submitting_again_then_controller_accepts() {
    let (client, store, controller) =
        controller_with(ScriptedGenerationClient::failing(TransportError::Connect(
            "refused".to_string(),
        )));

    controller.submit("first").await;
    let outcome = controller.submit("second").await;

    assert!(outcome.is_accepted());
    assert_eq!(store.snapshot().len(), 5);
    assert_eq!(client.open_count(), 2);
}

#[tokio::test]
async fn given_exchange_in_flight_when_submitting_again_then_rejected_without_request() {
    let (client, store, controller) = controller_with(ScriptedGenerationClient::chunks(&["ok"]));
    let exchange = controller.begin("first").unwrap();
    assert!(controller.is_busy());

    let second = controller.submit("second").await;

    assert!(matches!(
        second,
        SubmitOutcome::Rejected(SubmitRejection::Busy)
    ));
    assert_eq!(store.snapshot().len(), 3);
    assert_eq!(client.open_count(), 0);

    exchange.run().await;

    assert_eq!(client.open_count(), 1);
    assert_eq!(client.queries(), vec!["first".to_string()]);
    assert_eq!(store.snapshot().len(), 3);
    assert!(!controller.is_busy());
}

#[tokio::test]
async fn given_chunks_arriving_when_observing_then_reply_grows_and_only_it_streams() {
    let (client, sender) = channel_client();
    let store = Arc::new(TranscriptStore::new());
    let controller = ChatController::new(Arc::clone(&client), &store);
    let mut observer = store.subscribe();

    let exchange = controller.begin("hi").unwrap();
    let reply_id = exchange.reply_id();
    observer.borrow_and_update();
    let running = tokio::spawn(exchange.run());

    let mut lengths = Vec::new();
    for piece in ["Hel", "lo", " there"] {
        sender.send(chunk(piece)).unwrap();
        observer.changed().await.unwrap();
        let snapshot = observer.borrow_and_update().clone();
        assert_eq!(snapshot.streaming_count(), 1);
        let reply = snapshot.get(reply_id).unwrap();
        assert!(reply.is_streaming());
        lengths.push(reply.text().len());
    }
    drop(sender);

    let outcome = running.await.unwrap();

    assert_eq!(lengths, vec![3, 5, 11]);
    assert!(matches!(outcome, SubmitOutcome::Completed { ref text, .. } if text == "Hello there"));
    assert_eq!(store.snapshot().streaming_count(), 0);
    assert_eq!(client.open_count(), 1);
}

#[tokio::test]
async fn given_reset_during_exchange_when_reply_finishes_then_transcript_stays_reset() {
    let (_client, store, controller) =
        controller_with(ScriptedGenerationClient::chunks(&["late ", "reply"]));
    let exchange = controller.begin("hi").unwrap();

    store.reset();
    let outcome = exchange.run().await;

    assert!(matches!(outcome, SubmitOutcome::Completed { .. }));
    let transcript = store.snapshot();
    assert_eq!(transcript.len(), 1);
    assert_eq!(transcript.messages()[0].text(), GREETING_TEXT);
    assert!(!controller.is_busy());
}

#[tokio::test]
async fn given_torn_down_transcript_when_reply_streams_then_drains_silently() {
    let (client, store, controller) =
        controller_with(ScriptedGenerationClient::chunks(&["still ", "arriving"]));
    let exchange = controller.begin("hi").unwrap();

    drop(store);
    let outcome = exchange.run().await;

    assert!(matches!(outcome, SubmitOutcome::Completed { ref text, .. } if text == "still arriving"));
    assert_eq!(client.open_count(), 1);
    assert!(matches!(
        controller.submit("again").await,
        SubmitOutcome::Rejected(SubmitRejection::Detached)
    ));
}

#[tokio::test]
async fn given_abandoned_exchange_when_dropped_then_reply_fails_and_controller_idles() {
    let (client, store, controller) = controller_with(ScriptedGenerationClient::chunks(&["ok"]));
    let exchange = controller.begin("hi").unwrap();

    drop(exchange);

    let transcript = store.snapshot();
    assert_eq!(transcript.messages()[2].text(), FAILURE_TEXT);
    assert_eq!(transcript.streaming_count(), 0);
    assert!(!controller.is_busy());
    assert_eq!(client.open_count(), 0);
}
