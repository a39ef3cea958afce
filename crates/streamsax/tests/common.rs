//! Shared test helpers: UTF-8-safe chunk splitting (ported from the
//! teacher's own `chunk_utils.rs`) plus a small convenience wrapper for
//! feeding a whole document through the public `Parser` API and collecting
//! every integer it dispatches.

#![allow(dead_code)]

use streamsax::json::{ByteWindow, ParseError, Parser};

/// Splits `payload` into `parts` roughly equal, UTF-8-safe chunks.
///
/// # Panics
///
/// Panics if `parts` is zero.
pub fn produce_chunks(payload: &str, parts: usize) -> Vec<&str> {
    assert!(parts > 0);
    let len = payload.len();
    let chunk_size = len.div_ceil(parts);
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < len {
        let mut end = (start + chunk_size).min(len);
        while end < len && !payload.is_char_boundary(end) {
            end += 1;
        }
        chunks.push(&payload[start..end]);
        start = end;
    }
    chunks
}

/// Feeds `chunks` through `parser` one at a time, then calls `finish`.
pub fn feed_chunks(parser: &mut Parser, chunks: &[&str]) -> Result<bool, ParseError> {
    for chunk in chunks {
        let mut window = ByteWindow::new(chunk.as_bytes());
        if !parser.parse(&mut window)? {
            return Ok(false);
        }
    }
    parser.finish()
}

/// Feeds `input` as a single chunk, then calls `finish`.
pub fn feed_all(parser: &mut Parser, input: &[u8]) -> Result<bool, ParseError> {
    let mut window = ByteWindow::new(input);
    if !parser.parse(&mut window)? {
        return Ok(false);
    }
    parser.finish()
}

#[test]
fn produce_chunks_respects_char_boundaries() {
    let s = "a😃b😃c";
    for parts in 1..=6 {
        let chunks = produce_chunks(s, parts);
        assert_eq!(chunks.concat(), s);
    }
}
