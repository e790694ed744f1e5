mod chat_controller;
mod input_dispatcher;
mod stream_decoder;
mod transcript_store;

pub use chat_controller::{ChatController, Exchange, ExchangeError, SubmitOutcome, SubmitRejection};
pub use input_dispatcher::InputDispatcher;
pub use stream_decoder::{DecodeError, Utf8StreamDecoder};
pub use transcript_store::TranscriptStore;
