use concierge::domain::{GREETING_TEXT, Message, MessageState, Sender};

#[test]
fn given_user_message_when_created_then_is_completed_and_not_streaming() {
    let message = Message::user("How do I apply?");

    assert_eq!(message.sender, Sender::User);
    assert_eq!(message.text(), "How do I apply?");
    assert!(!message.is_streaming());
    assert!(message.state().is_terminal());
}

#[test]
fn given_placeholder_when_created_then_is_empty_streaming_bot_message() {
    let message = Message::placeholder();

    assert_eq!(message.sender, Sender::Bot);
    assert_eq!(message.text(), "");
    assert_eq!(message.state(), &MessageState::Pending);
    assert!(message.is_streaming());
}

#[test]
fn given_greeting_when_created_then_is_final_bot_message() {
    let message = Message::greeting();

    assert_eq!(message.sender, Sender::Bot);
    assert_eq!(message.text(), GREETING_TEXT);
    assert!(!message.is_streaming());
}

#[test]
fn given_two_messages_when_created_then_ids_differ() {
    assert_ne!(Message::user("a").id, Message::user("a").id);
}

#[test]
fn given_states_when_checking_terminal_then_only_completed_and_failed_are_final() {
    assert!(!MessageState::Pending.is_terminal());
    assert!(!MessageState::Streaming("I ".to_string()).is_terminal());
    assert!(MessageState::Completed("I can help.".to_string()).is_terminal());
    assert!(
        MessageState::Failed {
            reason: "connection reset".to_string()
        }
        .is_terminal()
    );
}

#[test]
fn given_sender_names_when_parsing_then_matches_display() {
    assert_eq!("bot".parse::<Sender>(), Ok(Sender::Bot));
    assert_eq!(Sender::User.to_string(), "user");
    assert!("assistant".parse::<Sender>().is_err());
}
