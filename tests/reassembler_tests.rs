//! Tests for StreamReassembler
//!
//! These tests verify:
//! - Responses split across arbitrary reads
//! - Garbage before a frame is dropped
//! - Left-over bytes carry into the next response
//! - Fatal conditions: closed connection, I/O error, oversize frames

mod common;

use std::io::ErrorKind;

use common::{codec, frame, ScriptedStream};
use spkctl::network::{ReceiveBuffer, StreamReassembler};
use spkctl::protocol::MAGIC;
use spkctl::SpkError;

const RESPONSE: &[u8] = br#"{"msg":"EQ_VIEW_INFO","result":"ok","data":{"i_curr_eq":3}}"#;

// =============================================================================
// ReceiveBuffer Tests
// =============================================================================

#[test]
fn test_receive_buffer_fill_and_compact() {
    let mut buffer = ReceiveBuffer::with_capacity(8).unwrap();
    let mut stream = ScriptedStream::new().chunk(&[1, 2, 3, 4, 5]);

    assert!(buffer.is_empty());
    assert_eq!(buffer.fill_from(&mut stream).unwrap(), 5);
    assert_eq!(buffer.filled(), &[1, 2, 3, 4, 5]);

    buffer.compact(3);
    assert_eq!(buffer.filled(), &[4, 5]);
    assert_eq!(buffer.capacity(), 8);
}

#[test]
fn test_receive_buffer_compact_everything() {
    let mut buffer = ReceiveBuffer::with_capacity(4).unwrap();
    let mut stream = ScriptedStream::new().chunk(&[9, 9]);
    buffer.fill_from(&mut stream).unwrap();

    buffer.compact(100);
    assert!(buffer.is_empty());
}

#[test]
fn test_receive_buffer_reads_only_into_free_space() {
    let mut buffer = ReceiveBuffer::with_capacity(4).unwrap();
    let mut stream = ScriptedStream::new().chunk(&[1, 2, 3, 4, 5, 6]);

    assert_eq!(buffer.fill_from(&mut stream).unwrap(), 4);
    assert!(buffer.is_full());
    assert_eq!(stream.pending(), 1);
}

#[test]
fn test_receive_buffer_zero_read_is_closed() {
    let mut buffer = ReceiveBuffer::with_capacity(4).unwrap();
    let mut stream = ScriptedStream::new();

    assert!(matches!(
        buffer.fill_from(&mut stream),
        Err(SpkError::ConnectionClosed)
    ));
}

#[test]
fn test_receive_buffer_retries_interrupted() {
    let mut buffer = ReceiveBuffer::with_capacity(4).unwrap();
    let mut stream = ScriptedStream::new()
        .fail(ErrorKind::Interrupted)
        .chunk(&[7]);

    assert_eq!(buffer.fill_from(&mut stream).unwrap(), 1);
    assert_eq!(buffer.filled(), &[7]);
}

// =============================================================================
// Reassembly Tests
// =============================================================================

#[test]
fn test_single_read() {
    let codec = codec();
    let mut reassembler = StreamReassembler::new(4096).unwrap();
    let mut stream = ScriptedStream::new().chunk(&frame(RESPONSE));

    let response = reassembler.next_response(&codec, &mut stream).unwrap();
    assert_eq!(response, RESPONSE);
    assert_eq!(reassembler.buffered(), 0);
}

#[test]
fn test_one_byte_at_a_time() {
    let codec = codec();
    let bytes = frame(RESPONSE);
    let mut reassembler = StreamReassembler::new(4096).unwrap();
    let mut stream = ScriptedStream::new().chunks(&bytes, 1);

    let response = reassembler.next_response(&codec, &mut stream).unwrap();
    assert_eq!(response, RESPONSE);
    assert_eq!(stream.reads, bytes.len());
}

#[test]
fn test_split_inside_header() {
    let codec = codec();
    let bytes = frame(RESPONSE);
    let mut reassembler = StreamReassembler::new(4096).unwrap();
    let mut stream = ScriptedStream::new()
        .chunk(&bytes[..3])
        .chunk(&bytes[3..40])
        .chunk(&bytes[40..]);

    let response = reassembler.next_response(&codec, &mut stream).unwrap();
    assert_eq!(response, RESPONSE);
}

#[test]
fn test_garbage_before_frame() {
    let codec = codec();
    let mut bytes = vec![0xFF, 0x00, 0x33, 0xC0, 0x01];
    bytes.extend_from_slice(&frame(RESPONSE));

    let mut reassembler = StreamReassembler::new(4096).unwrap();
    let mut stream = ScriptedStream::new().chunks(&bytes, 7);

    let response = reassembler.next_response(&codec, &mut stream).unwrap();
    assert_eq!(response, RESPONSE);
}

#[test]
fn test_garbage_larger_than_window_is_dropped() {
    // Marker-free garbage is discarded on every pass and never fills the window
    let codec = codec();
    let mut reassembler = StreamReassembler::new(64).unwrap();
    let garbage = vec![0xAB; 1000];
    let mut stream = ScriptedStream::new()
        .chunks(&garbage, 50)
        .chunk(&frame(b"{\"ok\":1}"));

    let response = reassembler.next_response(&codec, &mut stream).unwrap();
    assert_eq!(response, b"{\"ok\":1}");
}

#[test]
fn test_back_to_back_responses_in_one_read() {
    let codec = codec();
    let first = br#"{"msg":"PLAY_INFO","result":"ok","data":{}}"#;
    let second = br#"{"msg":"PRODUCT_INFO","result":true,"data":{}}"#;

    let mut bytes = frame(first);
    bytes.extend_from_slice(&frame(second));

    let mut reassembler = StreamReassembler::new(4096).unwrap();
    let mut stream = ScriptedStream::new().chunk(&bytes);

    assert_eq!(reassembler.next_response(&codec, &mut stream).unwrap(), first);
    assert!(reassembler.buffered() > 0);
    let reads = stream.reads;

    // Served from the buffer without touching the transport
    assert_eq!(reassembler.next_response(&codec, &mut stream).unwrap(), second);
    assert_eq!(stream.reads, reads);
    assert_eq!(reassembler.buffered(), 0);
}

#[test]
fn test_partial_second_response_waits_for_more() {
    let codec = codec();
    let first = frame(b"{\"n\":1}");
    let second = frame(b"{\"n\":2}");

    let mut head = first.clone();
    head.extend_from_slice(&second[..6]);

    let mut reassembler = StreamReassembler::new(4096).unwrap();
    let mut stream = ScriptedStream::new().chunk(&head).chunk(&second[6..]);

    assert_eq!(reassembler.next_response(&codec, &mut stream).unwrap(), b"{\"n\":1}");
    assert_eq!(reassembler.buffered(), 6);
    assert_eq!(reassembler.next_response(&codec, &mut stream).unwrap(), b"{\"n\":2}");
}

// =============================================================================
// Fatal Condition Tests
// =============================================================================

#[test]
fn test_connection_closed_mid_frame() {
    let codec = codec();
    let bytes = frame(RESPONSE);
    let mut reassembler = StreamReassembler::new(4096).unwrap();
    let mut stream = ScriptedStream::new().chunk(&bytes[..bytes.len() / 2]);

    assert!(matches!(
        reassembler.next_response(&codec, &mut stream),
        Err(SpkError::ConnectionClosed)
    ));
}

#[test]
fn test_transport_error_is_fatal() {
    let codec = codec();
    let mut reassembler = StreamReassembler::new(4096).unwrap();
    let mut stream = ScriptedStream::new()
        .chunk(&[MAGIC, 0])
        .fail(ErrorKind::ConnectionReset);

    match reassembler.next_response(&codec, &mut stream) {
        Err(SpkError::Io(e)) => assert_eq!(e.kind(), ErrorKind::ConnectionReset),
        other => panic!("Expected Io error, got {:?}", other.map(|r| r.to_vec())),
    }
}

#[test]
fn test_window_exhausted_without_frame() {
    let codec = codec();
    let mut reassembler = StreamReassembler::new(32).unwrap();

    // Claims a payload far larger than the 64-byte window
    let mut bytes = vec![MAGIC, 0x7F, 0xFF, 0xFF, 0xF0];
    bytes.extend_from_slice(&[0u8; 200]);
    let mut stream = ScriptedStream::new().chunks(&bytes, 16);

    match reassembler.next_response(&codec, &mut stream) {
        Err(SpkError::FrameTooLarge { capacity }) => assert_eq!(capacity, 64),
        other => panic!("Expected FrameTooLarge, got {:?}", other.map(|r| r.to_vec())),
    }
}

#[test]
fn test_response_larger_than_limit() {
    let codec = codec();
    let mut reassembler = StreamReassembler::new(32).unwrap();

    // 40 bytes of plaintext -> 48 encrypted, fits the window but not the limit
    let mut stream = ScriptedStream::new().chunk(&frame(&[b'a'; 40]));

    match reassembler.next_response(&codec, &mut stream) {
        Err(SpkError::ResponseTooLarge { required, capacity }) => {
            assert_eq!(required, 48);
            assert_eq!(capacity, 32);
        }
        other => panic!("Expected ResponseTooLarge, got {:?}", other.map(|r| r.to_vec())),
    }
}

#[test]
fn test_malformed_payload_is_fatal() {
    let codec = codec();
    let mut reassembler = StreamReassembler::new(64).unwrap();
    let mut stream = ScriptedStream::new().chunk(&[MAGIC, 0, 0, 0, 0]);

    assert!(matches!(
        reassembler.next_response(&codec, &mut stream),
        Err(SpkError::MalformedPayload(_))
    ));
}

#[test]
fn test_zero_limit_rejected() {
    assert!(matches!(
        StreamReassembler::new(0),
        Err(SpkError::InvalidArgument(_))
    ));
}
