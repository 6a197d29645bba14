extern crate tk_http1;

use tk_http1::chunked::{chunk_header, ChunkHeader, LastChunk, RxChunk};
use tk_http1::Limits;

#[test]
fn header_exact_and_one_over_size() {
    let mut limits = Limits::default();
    limits.max_chunk_size = 26;

    let mut header = ChunkHeader::new(limits);
    let mut pos = 0;
    assert!(header.parse(b"1a\r\n", &mut pos));
    assert_eq!(header.size(), 26);

    let mut header = ChunkHeader::new(limits);
    let mut pos = 0;
    assert!(!header.parse(b"1b\r\n", &mut pos));
    assert!(header.fail());
}

#[test]
fn extension_is_captured() {
    let mut header = ChunkHeader::new(Limits::default());
    let mut pos = 0;
    assert!(header.parse(b"f; name=value\r\n", &mut pos));
    assert_eq!(header.size(), 15);
    assert_eq!(header.extension(), "name=value");
}

#[test]
fn chunk_data_with_crlf_tail() {
    let mut chunk = RxChunk::new(Limits::default());
    let mut pos = 0;
    assert!(chunk.parse(b"4\r\nwiki\r\n", &mut pos));
    assert_eq!(chunk.data(), b"wiki");
    assert_eq!(pos, 9);
}

#[test]
fn chunk_data_missing_tail_is_an_error() {
    let mut chunk = RxChunk::new(Limits::default());
    let mut pos = 0;
    assert!(!chunk.parse(b"4\r\nwikiXY", &mut pos));
    assert!(chunk.fail());
}

#[test]
fn split_across_arbitrary_boundaries() {
    let data: &[u8] = b"1a\r\nabcdefghijklmnopqrstuvwxyz\r\n";
    for split in 1..data.len() {
        let mut chunk = RxChunk::new(Limits::default());
        let mut pos = 0;
        assert!(!chunk.parse(&data[..split], &mut pos),
                "split at {}", split);
        assert!(!chunk.fail(), "split at {}", split);
        let mut pos = 0;
        assert!(chunk.parse(&data[split..], &mut pos),
                "split at {}", split);
        assert_eq!(chunk.data(), b"abcdefghijklmnopqrstuvwxyz",
                   "split at {}", split);
    }
}

#[test]
fn last_chunk_with_trailers() {
    let mut chunk = RxChunk::new(Limits::default());
    let mut pos = 0;
    assert!(chunk.parse(b"0\r\nAge: 30\r\n\r\n", &mut pos));
    assert!(chunk.is_last());
    assert_eq!(chunk.trailers().find("age"), Some("30"));
}

#[test]
fn sixteen_hex_digits_is_the_limit() {
    // 17 hex digits cannot fit a 64 bit length
    let mut chunk = ChunkHeader::new(Limits::default());
    let mut pos = 0;
    assert!(!chunk.parse(b"00000000000000000\r\n", &mut pos));
    assert!(chunk.fail());
}

#[test]
fn encoders() {
    assert_eq!(chunk_header(15, ""), "f\r\n");
    assert_eq!(chunk_header(15, "ext"), "f; ext\r\n");
    assert_eq!(LastChunk::new("", "").to_string(), "0\r\n\r\n");

    let mut last = LastChunk::new("", "");
    last.add_trailer("Age", "30");
    assert_eq!(last.to_string(), "0\r\nAge: 30\r\n\r\n");
}

#[test]
fn encode_parse_round_trip() {
    let mut wire = chunk_header(5, "").into_bytes();
    wire.extend_from_slice(b"hello\r\n");
    let mut chunk = RxChunk::new(Limits::default());
    let mut pos = 0;
    assert!(chunk.parse(&wire, &mut pos));
    assert_eq!(chunk.size(), 5);
    assert_eq!(chunk.data(), b"hello");
}
