extern crate tk_http1;

use tk_http1::{Limits, Recv, ResponseReceiver, Status, TxResponse};

fn receive_all(receiver: &mut ResponseReceiver, data: &[u8])
    -> (Recv, usize)
{
    let mut pos = 0;
    loop {
        let outcome = receiver.receive(data, &mut pos);
        if outcome != Recv::Incomplete || pos == data.len() {
            return (outcome, pos);
        }
    }
}

#[test]
fn simple_response() {
    let mut receiver = ResponseReceiver::new(Limits::default());
    let (outcome, _) = receive_all(&mut receiver,
        b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nhello");
    assert_eq!(outcome, Recv::Valid);
    assert_eq!(receiver.response().status(), 200);
    assert_eq!(receiver.response().reason_phrase(), "OK");
    assert_eq!(receiver.body(), b"hello");
    assert!(receiver.response().keep_alive());
}

#[test]
fn connection_close_is_reported() {
    let mut receiver = ResponseReceiver::new(Limits::default());
    let (outcome, _) = receive_all(&mut receiver,
        b"HTTP/1.1 200 OK\r\nConnection: close\r\n\
          Content-Length: 0\r\n\r\n");
    assert_eq!(outcome, Recv::Valid);
    assert!(!receiver.response().keep_alive());
}

#[test]
fn chunked_response_concatenated() {
    let mut receiver = ResponseReceiver::new(Limits::default());
    let (outcome, _) = receive_all(&mut receiver,
        b"HTTP/1.1 200 OK\r\nTransfer-Encoding: Chunked\r\n\r\n\
          5\r\nhello\r\n6\r\n world\r\n0\r\n\r\n");
    assert_eq!(outcome, Recv::Valid);
    assert_eq!(receiver.body(), b"hello world");
}

#[test]
fn chunked_response_progressive() {
    let mut receiver = ResponseReceiver::new(Limits::default());
    receiver.set_concatenate_chunks(false);
    let data: &[u8] =
        b"HTTP/1.1 200 OK\r\nTransfer-Encoding: Chunked\r\n\r\n\
          5\r\nhello\r\n0\r\nExpires: never\r\n\r\n";
    let mut pos = 0;
    assert_eq!(receiver.receive(data, &mut pos), Recv::Valid);
    assert_eq!(receiver.response().status(), 200);
    assert_eq!(receiver.receive(data, &mut pos), Recv::Chunk);
    assert_eq!(receiver.chunk().data(), b"hello");
    assert_eq!(receiver.receive(data, &mut pos), Recv::Chunk);
    assert!(receiver.chunk().is_last());
    assert_eq!(receiver.chunk().trailers().find("expires"), Some("never"));
    assert_eq!(pos, data.len());
}

#[test]
fn read_until_close_framing() {
    let mut receiver = ResponseReceiver::new(Limits::default());
    let mut pos = 0;
    let head: &[u8] = b"HTTP/1.0 200 OK\r\n\r\n";
    assert_eq!(receiver.receive(head, &mut pos), Recv::Incomplete);
    // no framing header and no body byte yet: still undecided
    assert!(!receiver.read_until_close());
    assert_eq!(receiver.receive_eof(), Recv::Incomplete);

    let mut pos = 0;
    assert_eq!(receiver.receive(b"some ", &mut pos), Recv::Incomplete);
    assert!(receiver.read_until_close());
    let mut pos = 0;
    assert_eq!(receiver.receive(b"body", &mut pos), Recv::Incomplete);
    assert_eq!(receiver.receive_eof(), Recv::Valid);
    assert_eq!(receiver.body(), b"some body");
}

#[test]
fn invalid_status_line() {
    let mut receiver = ResponseReceiver::new(Limits::default());
    let (outcome, _) = receive_all(&mut receiver,
        b"HTXP/1.1 200 OK\r\n\r\n");
    assert_eq!(outcome, Recv::Invalid);
}

#[test]
fn status_number_cap() {
    let mut limits = Limits::default();
    limits.max_status_number = 999;
    let mut receiver = ResponseReceiver::new(limits);
    let (outcome, _) = receive_all(&mut receiver,
        b"HTTP/1.1 1000 Whoa\r\nContent-Length: 0\r\n\r\n");
    assert_eq!(outcome, Recv::Invalid);
}

#[test]
fn clear_is_idempotent() {
    let data: &[u8] = b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nhi";
    let mut used = ResponseReceiver::new(Limits::default());
    let (outcome, _) = receive_all(&mut used,
        b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n");
    assert_eq!(outcome, Recv::Valid);
    used.clear();
    used.clear();

    let mut fresh = ResponseReceiver::new(Limits::default());
    let (used_outcome, _) = receive_all(&mut used, data);
    let (fresh_outcome, _) = receive_all(&mut fresh, data);
    assert_eq!(used_outcome, fresh_outcome);
    assert_eq!(used.response().status(), fresh.response().status());
    assert_eq!(used.body(), fresh.body());
}

#[test]
fn byte_at_a_time_feed() {
    let data: &[u8] =
        b"HTTP/1.1 201 Created\r\nContent-Length: 3\r\n\r\nyes";
    let mut receiver = ResponseReceiver::new(Limits::default());
    let mut outcome = Recv::Incomplete;
    for i in 0..data.len() {
        let mut pos = 0;
        outcome = receiver.receive(&data[i..i + 1], &mut pos);
        if i < data.len() - 1 {
            assert_eq!(outcome, Recv::Incomplete, "byte {}", i);
        }
    }
    assert_eq!(outcome, Recv::Valid);
    assert_eq!(receiver.response().status(), 201);
    assert_eq!(receiver.body(), b"yes");
}

#[test]
fn encoder_message_with_headers() {
    let mut response = TxResponse::new(Status::NotFound);
    response.add_header("Content-Type", "text/plain");
    let message = response.message(9);
    assert!(message.starts_with("HTTP/1.1 404 Not Found\r\n"));
    assert!(message.contains("Content-Type: text/plain\r\n"));
    assert!(message.contains("Content-Length: 9\r\n"));
    assert!(message.ends_with("\r\n\r\n"));
}

#[test]
fn encoder_rejects_split_headers() {
    // S6
    let mut response = TxResponse::new(Status::Ok);
    response.set_header_string("X-Evil: a\r\n\r\nGET /b HTTP/1.1\r\n");
    assert!(!response.is_valid());
}

#[test]
fn encoder_response_line_round_trip() {
    let response = TxResponse::new(Status::ServiceUnavailable);
    let text = response.message(0);
    let mut receiver = ResponseReceiver::new(Limits::default());
    let (outcome, _) = receive_all(&mut receiver, text.as_bytes());
    assert_eq!(outcome, Recv::Valid);
    assert_eq!(receiver.response().status(), 503);
    assert_eq!(receiver.response().reason_phrase(),
               "Service Unavailable");
}
