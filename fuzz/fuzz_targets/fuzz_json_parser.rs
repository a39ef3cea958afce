#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use streamsax::json::{ByteWindow, Parser, ParserOptions, TopLevelStrategy};

/// Fuzz input: a handful of option flags, a chunk-split seed, and the raw
/// document bytes. Kept as one `Arbitrary` struct (rather than hand-rolled
/// byte slicing) since `arbitrary`'s derive already does exactly the
/// header/payload split the teacher's own mutator builds by hand.
#[derive(Debug, Arbitrary)]
struct Input {
    allow_comments: bool,
    dont_validate_strings: bool,
    allow_partial_values: bool,
    each_token_must_be_handled: bool,
    top_level_strategy: u8,
    split_seed: u32,
    document: Vec<u8>,
}

/// Splits `bytes` into boundary-agnostic chunks (no UTF-8 safety needed —
/// the parser itself must tolerate a chunk boundary anywhere, including
/// mid-codepoint, since input is raw bytes not `&str`).
fn split_into_chunks(bytes: &[u8], seed: u32) -> Vec<&[u8]> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let len = bytes.len();
    let seed = u64::from(seed).max(1);
    while start < len {
        let remaining = len - start;
        let size = (seed as usize % remaining) + 1;
        chunks.push(&bytes[start..start + size]);
        start += size;
    }
    chunks
}

fn run(input: Input) {
    if input.document.is_empty() {
        return;
    }

    let options = ParserOptions {
        allow_comments: input.allow_comments,
        dont_validate_strings: input.dont_validate_strings,
        allow_partial_values: input.allow_partial_values,
        each_token_must_be_handled: input.each_token_must_be_handled,
        top_level_strategy: match input.top_level_strategy % 3 {
            0 => TopLevelStrategy::SingleObject,
            1 => TopLevelStrategy::AllowTrailingGarbage,
            _ => TopLevelStrategy::AllowMultipleValues,
        },
    };

    let mut parser = match Parser::builder()
        .options(options)
        .on_object_open(|| Ok(true))
        .on_object_close(|| Ok(true))
        .on_array_open(|| Ok(true))
        .on_array_close(|| Ok(true))
        .on_object_key(|_| Ok(true))
        .on_string_value(|_| Ok(true))
        .on_boolean(|_| Ok(true))
        .on_null(|| Ok(true))
        .on_integer(|_| Ok(true))
        .on_floating(|_| Ok(true))
        .build()
    {
        Ok(p) => p,
        Err(_) => return,
    };

    for chunk in split_into_chunks(&input.document, input.split_seed) {
        let mut window = ByteWindow::new(chunk);
        // Errors and cancellations are expected outcomes on arbitrary
        // bytes, not fuzz failures — only a panic is one.
        match parser.parse(&mut window) {
            Ok(true) => {}
            Ok(false) | Err(_) => return,
        }
    }
    let _ = parser.finish();
}

fuzz_target!(|input: Input| {
    run(input);
});
