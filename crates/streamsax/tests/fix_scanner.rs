//! Integration coverage for the FIX field scanner (C7), spec §8 scenario
//! S6: a full FIX message (`8`..`10`, `BeginString`..`CheckSum`) scanned out
//! of arbitrary chunk splits, with the reassembled fields equal to what a
//! single-shot scan produces.

use streamsax::fix::{FixScanner, ScanOutcome};
use streamsax::json::ByteWindow;

const MESSAGE: &[u8] = b"8=FIX.4.2\x019=65\x0135=A\x0134=1\x0149=SENDER\x0156=TARGET\x0152=20260731-00:00:00\x0198=0\x01108=30\x0110=231\x01";

fn scan_in_one_shot(msg: &[u8]) -> Vec<(u64, Vec<u8>)> {
    let mut scanner = FixScanner::new();
    let mut window = ByteWindow::new(msg);
    let mut fields = Vec::new();
    scanner
        .feed(&mut window, |tag, value| {
            fields.push((tag, value.to_vec()));
            Ok(true)
        })
        .unwrap();
    fields
}

fn scan_in_chunks(msg: &[u8], chunk_lens: &[usize]) -> Vec<(u64, Vec<u8>)> {
    let mut scanner = FixScanner::new();
    let mut fields = Vec::new();
    let mut pos = 0;
    for &len in chunk_lens {
        let end = (pos + len).min(msg.len());
        if end <= pos {
            continue;
        }
        let chunk = &msg[pos..end];
        let mut window = ByteWindow::new(chunk);
        scanner
            .feed(&mut window, |tag, value| {
                fields.push((tag, value.to_vec()));
                Ok(true)
            })
            .unwrap();
        pos = end;
    }
    if pos < msg.len() {
        let mut window = ByteWindow::new(&msg[pos..]);
        scanner
            .feed(&mut window, |tag, value| {
                fields.push((tag, value.to_vec()));
                Ok(true)
            })
            .unwrap();
    }
    fields
}

#[test]
fn full_message_round_trips_in_one_chunk_s6() {
    let fields = scan_in_one_shot(MESSAGE);
    let tags: Vec<u64> = fields.iter().map(|(t, _)| *t).collect();
    assert_eq!(tags, vec![8, 9, 35, 34, 49, 56, 52, 98, 108, 10]);
    assert_eq!(fields[0].1, b"FIX.4.2");
    assert_eq!(fields[2].1, b"A");
    assert_eq!(fields.last().unwrap().1, b"231");
}

#[test]
fn reassembled_values_equal_the_original_slices() {
    let fields = scan_in_one_shot(MESSAGE);
    let mut rebuilt = Vec::new();
    for (tag, value) in &fields {
        rebuilt.extend_from_slice(tag.to_string().as_bytes());
        rebuilt.push(b'=');
        rebuilt.extend_from_slice(value);
        rebuilt.push(0x01);
    }
    assert_eq!(rebuilt, MESSAGE);
}

#[test]
fn every_chunk_size_from_one_byte_up_matches_single_shot() {
    let single = scan_in_one_shot(MESSAGE);
    for chunk_size in 1..=MESSAGE.len() {
        let n_chunks = MESSAGE.len().div_ceil(chunk_size);
        let lens: Vec<usize> = std::iter::repeat(chunk_size).take(n_chunks).collect();
        let chunked = scan_in_chunks(MESSAGE, &lens);
        assert_eq!(chunked, single, "diverged at chunk_size={chunk_size}");
    }
}

#[test]
fn field_straddling_a_chunk_boundary_reassembles_correctly() {
    // Split right in the middle of the `9=65` field's value.
    let split = MESSAGE.iter().position(|&b| b == b'6').unwrap() + 1;
    let chunked = scan_in_chunks(MESSAGE, &[split, MESSAGE.len() - split]);
    assert_eq!(chunked, scan_in_one_shot(MESSAGE));
}

#[test]
fn malformed_field_is_skipped_without_raising_an_error() {
    let msg = b"8=FIX.4.2\x01notanumber=oops\x0135=A\x01";
    let fields = scan_in_one_shot(msg);
    assert_eq!(fields, vec![(8, b"FIX.4.2".to_vec()), (35, b"A".to_vec())]);
}

#[test]
fn incomplete_trailing_field_needs_more_input() {
    let mut scanner = FixScanner::new();
    let mut window = ByteWindow::new(b"8=FIX.4.2\x019=1");
    let outcome = scanner.feed(&mut window, |_, _| Ok(true)).unwrap();
    assert_eq!(outcome, ScanOutcome::NeedMoreInput);
}

#[test]
fn cancelling_mid_message_stops_the_scan() {
    let mut scanner = FixScanner::new();
    let mut window = ByteWindow::new(MESSAGE);
    let mut seen = Vec::new();
    let outcome = scanner
        .feed(&mut window, |tag, value| {
            seen.push(tag);
            Ok(tag != 35)
        })
        .unwrap();
    assert_eq!(outcome, ScanOutcome::Cancelled);
    assert_eq!(seen, vec![8, 9, 35]);
}
