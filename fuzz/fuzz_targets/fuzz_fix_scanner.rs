#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use streamsax::fix::FixScanner;
use streamsax::json::ByteWindow;

#[derive(Debug, Arbitrary)]
struct Input {
    split_seed: u32,
    message: Vec<u8>,
}

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
    if input.message.is_empty() {
        return;
    }

    let mut scanner = FixScanner::new();
    for chunk in split_into_chunks(&input.message, input.split_seed) {
        let mut window = ByteWindow::new(chunk);
        // A malformed or incomplete field is never an error here (spec
        // §4.7's lenient treatment) — only the handler failing or a panic
        // would be a real finding.
        if scanner.feed(&mut window, |_tag, _value| Ok(true)).is_err() {
            return;
        }
    }
}

fuzz_target!(|input: Input| {
    run(input);
});
