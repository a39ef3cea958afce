//! C7 — the FIX field scanner (spec §4.7): a small, independent sibling of
//! the JSON parser that walks `tag=value\x01`-delimited fields out of a FIX
//! message body.
//!
//! Grounded on the same chunked-input shape as the JSON side (`ByteWindow`,
//! spec §5's "caller-owned input windows, parser-owned carry buffer") but
//! deliberately far simpler: there is no lexer, no state stack, just a
//! single scan-and-slice loop. Kept in its own top-level module rather than
//! under `json/` because the spec treats it as an independent component
//! that merely shares the handler-error and window types.

use crate::error::HandlerError;
use crate::json::window::ByteWindow;

/// Returned by the field handler: `Ok(true)` to continue scanning, `Ok(false)`
/// to stop early, `Err(_)` to abort with a wrapped cause.
pub type FieldResult = Result<bool, HandlerError>;

/// A tag number is `SOH`/`=`-delimited and, per spec, always non-negative;
/// malformed tags (non-digits, empty) are not an error condition — the
/// field is simply left for the next chunk to complete, per §4.7.
pub type Tag = u64;

/// Why a `feed` call stopped scanning before the window was exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The handler returned `Ok(false)`.
    Cancelled,
    /// The window was fully consumed (modulo a trailing partial field, which
    /// has been copied into the scanner's carry buffer).
    NeedMoreInput,
}

/// Raised when `feed`'s handler returns `Err(_)`. There is no lexical or
/// syntax error kind here — malformed fields are silently deferred, not
/// rejected (spec §4.7).
#[derive(Debug, thiserror::Error)]
#[error("FIX field handler failed")]
pub struct FixError(#[source] pub HandlerError);

/// Scans `tag=value\x01` fields out of a byte stream fed in arbitrary-sized
/// chunks, invoking a handler once per complete field.
///
/// Holds its own carry buffer (spec §5: "the carry buffer is owned by the
/// parser and grows monotonically within a single parse in progress") since
/// a caller's [`ByteWindow`] is not retained past a single `feed` call.
#[derive(Debug, Default)]
pub struct FixScanner {
    carry: Vec<u8>,
}

impl FixScanner {
    /// A scanner with an empty carry buffer.
    pub fn new() -> Self {
        Self { carry: Vec::new() }
    }

    /// Discards any buffered partial field, returning to a clean state.
    pub fn reset(&mut self) {
        self.carry.clear();
    }

    /// Feeds one chunk, invoking `on_field(tag, value)` for every complete
    /// field found. `value` is a borrow into `window` for fields entirely
    /// within this chunk, or into the scanner's own carry buffer for a
    /// field that straddled the previous chunk boundary — in both cases the
    /// borrow is only valid for the duration of the callback, per spec §6.
    ///
    /// Implements the algorithm of spec §4.7 verbatim for the steady-state
    /// batch phase (locate the last `0x01`, lower the limit to it, process
    /// every complete field up to that limit, then restore the limit and
    /// leave the cursor at the start of any trailing partial field) plus a
    /// carry-completion phase at entry so a field split across two `feed`
    /// calls is reassembled before the batch phase runs.
    pub fn feed(
        &mut self,
        window: &mut ByteWindow<'_>,
        mut on_field: impl FnMut(Tag, &[u8]) -> FieldResult,
    ) -> Result<ScanOutcome, FixError> {
        if !self.carry.is_empty() {
            if let Some(outcome) = self.complete_carry(window, &mut on_field)? {
                return Ok(outcome);
            }
        }

        let outcome = self.scan_batch(window, &mut on_field)?;
        if let ScanOutcome::NeedMoreInput = outcome {
            self.carry.extend_from_slice(window.remaining_bytes());
            window.advance(window.remaining());
        }
        Ok(outcome)
    }

    /// Tries to find the terminator for the field sitting in `self.carry`.
    /// Returns `Ok(Some(outcome))` if the caller should return immediately
    /// (either the field completed and the handler cancelled, or no
    /// terminator was found and the whole window was absorbed into carry),
    /// or `Ok(None)` to fall through into the batch phase with whatever
    /// window bytes remain after the completed field.
    fn complete_carry(
        &mut self,
        window: &mut ByteWindow<'_>,
        on_field: &mut impl FnMut(Tag, &[u8]) -> FieldResult,
    ) -> Result<Option<ScanOutcome>, FixError> {
        let start = window.position();
        let chunk = window.remaining_bytes();
        let Some(rel) = chunk.iter().position(|&b| b == 0x01) else {
            self.carry.extend_from_slice(chunk);
            window.advance(chunk.len());
            return Ok(Some(ScanOutcome::NeedMoreInput));
        };

        self.carry.extend_from_slice(&chunk[..rel]);
        window.set_position(start + rel + 1);

        let field = std::mem::take(&mut self.carry);
        let outcome = match parse_field(&field) {
            Some((tag, value)) => {
                if !on_field(tag, value).map_err(FixError)? {
                    Some(ScanOutcome::Cancelled)
                } else {
                    None
                }
            }
            // Malformed tag: drop the field silently and keep scanning,
            // per spec §4.7's lenient treatment of malformed fields.
            None => None,
        };
        Ok(outcome)
    }

    /// The steady-state batch phase: locate the last `0x01` in the window,
    /// process every complete field up to (and including) it, and leave the
    /// cursor at the start of whatever trailing partial field remains.
    fn scan_batch(
        &mut self,
        window: &mut ByteWindow<'_>,
        on_field: &mut impl FnMut(Tag, &[u8]) -> FieldResult,
    ) -> Result<ScanOutcome, FixError> {
        let base = window.position();
        let chunk = window.remaining_bytes();
        let Some(last_soh) = chunk.iter().rposition(|&b| b == 0x01) else {
            return Ok(ScanOutcome::NeedMoreInput);
        };
        let safe_limit = base + last_soh + 1;

        let mut cursor = base;
        while cursor < safe_limit {
            let Some(rel_soh) = window.slice(cursor, safe_limit).iter().position(|&b| b == 0x01) else {
                break;
            };
            let field_end = cursor + rel_soh;
            let field_bytes = window.slice(cursor, field_end);
            cursor = field_end + 1;

            let Some((tag, value)) = parse_field(field_bytes) else {
                // Malformed field: skip past it and keep going (spec §4.7:
                // no distinct error type for a malformed tag).
                continue;
            };
            window.set_position(cursor);
            if !on_field(tag, value).map_err(FixError)? {
                return Ok(ScanOutcome::Cancelled);
            }
        }

        window.set_position(cursor);
        Ok(ScanOutcome::NeedMoreInput)
    }
}

/// Splits `tag=value` (without the trailing `0x01`) into a parsed tag and
/// the raw value bytes. Returns `None` for anything that doesn't match —
/// no `=`, an empty tag, or a non-digit tag.
fn parse_field(bytes: &[u8]) -> Option<(Tag, &[u8])> {
    let eq = bytes.iter().position(|&b| b == b'=')?;
    let (tag_bytes, rest) = bytes.split_at(eq);
    let value = &rest[1..];
    if tag_bytes.is_empty() || !tag_bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let tag_str = std::str::from_utf8(tag_bytes).ok()?;
    let tag = tag_str.parse::<Tag>().ok()?;
    Some((tag, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(msg: &[u8]) -> Vec<(Tag, Vec<u8>)> {
        let mut scanner = FixScanner::new();
        let mut window = ByteWindow::new(msg);
        let mut out = Vec::new();
        scanner
            .feed(&mut window, |tag, value| {
                out.push((tag, value.to_vec()));
                Ok(true)
            })
            .unwrap();
        out
    }

    #[test]
    fn scans_a_full_message_in_one_chunk() {
        let msg = b"8=FIX.4.2\x019=12\x0135=0\x0110=128\x01";
        let got = fields(msg);
        assert_eq!(
            got,
            vec![
                (8, b"FIX.4.2".to_vec()),
                (9, b"12".to_vec()),
                (35, b"0".to_vec()),
                (10, b"128".to_vec()),
            ]
        );
    }

    #[test]
    fn leaves_trailing_partial_field_for_next_chunk() {
        let mut scanner = FixScanner::new();
        let mut w1 = ByteWindow::new(b"8=FIX.4.2\x019=12\x0135=0\x0110=1");
        let mut seen = Vec::new();
        let outcome = scanner
            .feed(&mut w1, |tag, value| {
                seen.push((tag, value.to_vec()));
                Ok(true)
            })
            .unwrap();
        assert_eq!(outcome, ScanOutcome::NeedMoreInput);
        assert_eq!(
            seen,
            vec![(8, b"FIX.4.2".to_vec()), (9, b"12".to_vec()), (35, b"0".to_vec())]
        );
        assert_eq!(scanner.carry, b"10=1");

        let mut w2 = ByteWindow::new(b"28\x01");
        scanner
            .feed(&mut w2, |tag, value| {
                seen.push((tag, value.to_vec()));
                Ok(true)
            })
            .unwrap();
        assert_eq!(seen[3], (10, b"128".to_vec()));
        assert!(scanner.carry.is_empty());
    }

    #[test]
    fn byte_at_a_time_feeding_still_reassembles_fields() {
        let msg = b"8=FIX.4.2\x019=5\x0110=0\x01";
        let mut scanner = FixScanner::new();
        let mut seen = Vec::new();
        for &byte in msg.iter() {
            let chunk = [byte];
            let mut w = ByteWindow::new(&chunk);
            scanner
                .feed(&mut w, |tag, value| {
                    seen.push((tag, value.to_vec()));
                    Ok(true)
                })
                .unwrap();
        }
        assert_eq!(seen, vec![(8, b"FIX.4.2".to_vec()), (9, b"5".to_vec()), (10, b"0".to_vec())]);
    }

    #[test]
    fn cancelling_stops_the_scan_and_keeps_the_rest_for_later() {
        let mut scanner = FixScanner::new();
        let mut w = ByteWindow::new(b"8=FIX.4.2\x019=12\x0135=0\x0110=128\x01");
        let mut seen = Vec::new();
        let outcome = scanner
            .feed(&mut w, |tag, value| {
                seen.push(tag);
                Ok(value.is_empty() || tag != 9)
            })
            .unwrap();
        assert_eq!(outcome, ScanOutcome::Cancelled);
        assert_eq!(seen, vec![8, 9]);
    }

    #[test]
    fn malformed_tag_is_skipped_without_raising_an_error() {
        let msg = b"8=FIX.4.2\x01garbage=oops\x0135=0\x01";
        let got = fields(msg);
        assert_eq!(got, vec![(8, b"FIX.4.2".to_vec()), (35, b"0".to_vec())]);
    }

    #[test]
    fn missing_terminator_at_eof_buffers_the_whole_tail() {
        let mut scanner = FixScanner::new();
        let mut w = ByteWindow::new(b"8=FIX.4.2\x019=12");
        let seen: Vec<(Tag, Vec<u8>)> = {
            let mut out = Vec::new();
            scanner
                .feed(&mut w, |tag, value| {
                    out.push((tag, value.to_vec()));
                    Ok(true)
                })
                .unwrap();
            out
        };
        assert_eq!(seen, vec![(8, b"FIX.4.2".to_vec())]);
        assert_eq!(scanner.carry, b"9=12");
    }

    #[test]
    fn handler_error_is_wrapped_and_propagated() {
        let mut scanner = FixScanner::new();
        let mut w = ByteWindow::new(b"8=FIX.4.2\x01");
        let err = scanner
            .feed(&mut w, |_tag, _value| Err(HandlerError::new(std::io::Error::other("boom"))))
            .unwrap_err();
        assert_eq!(err.to_string(), "FIX field handler failed");
    }

    #[test]
    fn reset_discards_buffered_partial_field() {
        let mut scanner = FixScanner::new();
        let mut w = ByteWindow::new(b"8=FIX");
        scanner.feed(&mut w, |_, _| Ok(true)).unwrap();
        assert!(!scanner.carry.is_empty());
        scanner.reset();
        assert!(scanner.carry.is_empty());
    }
}
