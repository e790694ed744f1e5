mod message;
mod message_id;
mod sender;
mod transcript;

pub use message::{FAILURE_TEXT, GREETING_TEXT, Message, MessageState};
pub use message_id::MessageId;
pub use sender::Sender;
pub use transcript::{Transcript, TranscriptError};
