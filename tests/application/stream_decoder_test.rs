use concierge::application::services::{DecodeError, Utf8StreamDecoder};

#[test]
fn given_ascii_chunks_when_decoding_then_passes_through() {
    let mut decoder = Utf8StreamDecoder::new();

    assert_eq!(decoder.decode(b"I can ").unwrap(), "I can ");
    assert_eq!(decoder.decode(b"help.").unwrap(), "help.");
    assert!(decoder.finish().is_ok());
}

#[test]
fn given_two_byte_char_split_across_chunks_when_decoding_then_reassembles() {
    let mut decoder = Utf8StreamDecoder::new();

    assert_eq!(decoder.decode(&[b'c', b'a', b'f', 0xC3]).unwrap(), "caf");
    assert_eq!(decoder.decode(&[0xA9]).unwrap(), "é");
    assert!(decoder.finish().is_ok());
}

#[test]
fn given_four_byte_char_split_over_three_chunks_when_decoding_then_reassembles() {
    let mut decoder = Utf8StreamDecoder::new();
    let bytes = "😀".as_bytes();

    assert_eq!(decoder.decode(&bytes[..1]).unwrap(), "");
    assert_eq!(decoder.decode(&bytes[1..3]).unwrap(), "");
    assert_eq!(decoder.decode(&[bytes[3], b'!']).unwrap(), "😀!");
    assert!(decoder.finish().is_ok());
}

#[test]
fn given_invalid_byte_when_decoding_then_reports_stream_offset() {
    let mut decoder = Utf8StreamDecoder::new();
    decoder.decode(b"ok").unwrap();

    let result = decoder.decode(&[0xFF, b'x']);

    assert_eq!(result, Err(DecodeError::InvalidSequence { offset: 2 }));
}

#[test]
fn given_stream_ending_mid_character_when_finishing_then_reports_truncation() {
    let mut decoder = Utf8StreamDecoder::new();

    assert_eq!(decoder.decode(&[0xE2, 0x82]).unwrap(), "");

    assert_eq!(decoder.finish(), Err(DecodeError::Truncated { pending: 2 }));
}
