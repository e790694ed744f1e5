#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid UTF-8 sequence at byte {offset}")]
    InvalidSequence { offset: usize },
    #[error("stream ended inside a multi-byte character ({pending} byte(s) pending)")]
    Truncated { pending: usize },
}

/// Incremental UTF-8 decoder for chunked bodies.
///
/// A character split across chunk boundaries is held back until its
/// remaining bytes arrive. Malformed input is an error, never replaced.
#[derive(Debug, Default)]
pub struct Utf8StreamDecoder {
    pending: Vec<u8>,
    consumed: usize,
}

impl Utf8StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decode(&mut self, chunk: &[u8]) -> Result<String, DecodeError> {
        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(chunk);

        match std::str::from_utf8(&bytes) {
            Ok(text) => {
                self.consumed += bytes.len();
                Ok(text.to_owned())
            }
            Err(e) if e.error_len().is_some() => Err(DecodeError::InvalidSequence {
                offset: self.consumed + e.valid_up_to(),
            }),
            Err(e) => {
                let valid = e.valid_up_to();
                let text = String::from_utf8_lossy(&bytes[..valid]).into_owned();
                self.pending = bytes[valid..].to_vec();
                self.consumed += valid;
                Ok(text)
            }
        }
    }

    /// Call once the stream is exhausted.
    pub fn finish(&mut self) -> Result<(), DecodeError> {
        if self.pending.is_empty() {
            Ok(())
        } else {
            Err(DecodeError::Truncated {
                pending: self.pending.len(),
            })
        }
    }
}
