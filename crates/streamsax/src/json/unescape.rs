//! C3 — the unescaper: decodes a JSON string body into a character buffer.
//!
//! Escapes are decoded into 16-bit code units rather than `char`s so that a
//! `😃` surrogate pair can be preserved verbatim (spec S4) instead
//! of being recombined and re-encoded at this stage — the teacher's own
//! `DecodeMode::SurrogatePreserving` documents exactly this requirement but
//! notes its `std`/UTF-8-only build "degrades to ReplaceInvalid"; here the
//! payload type is a UTF-16 code-unit sequence rather than a `String`, so no
//! degradation is needed.

use std::borrow::Cow;

/// A decoded JSON string or object-key payload.
///
/// `Borrowed` is the zero-copy fast path taken when the source bytes had no
/// escapes: it borrows directly from the window (or carry) the token was
/// lexed from. `Owned` is produced whenever at least one escape was present;
/// it holds UTF-16 code units rather than a `String` so that unpaired or
/// paired surrogates from `\uXXXX` escapes survive unmodified.
#[derive(Debug, Clone, PartialEq)]
pub enum StrValue<'a> {
    Borrowed(&'a str),
    Owned(Vec<u16>),
}

impl<'a> StrValue<'a> {
    /// Renders the value as a `str`, replacing any unpaired surrogate with
    /// U+FFFD. Borrowed values are returned as-is; this is the fallback for
    /// callers that don't need to inspect raw code units.
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        match self {
            Self::Borrowed(s) => Cow::Borrowed(s),
            Self::Owned(units) => Cow::Owned(
                char::decode_utf16(units.iter().copied())
                    .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
                    .collect(),
            ),
        }
    }

    /// The raw UTF-16 code units, whichever representation is held.
    pub fn code_units(&self) -> Cow<'_, [u16]> {
        match self {
            Self::Borrowed(s) => Cow::Owned(s.encode_utf16().collect()),
            Self::Owned(units) => Cow::Borrowed(units),
        }
    }
}

/// Decodes `src` (the raw bytes between a string's quotes, already
/// lexically validated: every escape sequence is known-well-formed) into
/// `dest`, appending.
///
/// No escape other than `" \ / b f n r t u` can appear here — the lexer has
/// already rejected anything else — so any other case is an internal
/// invariant violation, not a reportable error (spec §4.3: "Failure kinds:
/// none (input is pre-validated); implementations may assert.").
pub fn decode(src: &[u8], dest: &mut Vec<u16>) {
    let mut i = 0;
    while i < src.len() {
        let b = src[i];
        if b != b'\\' {
            // Decode one UTF-8 scalar and re-encode it as UTF-16.
            let s = core::str::from_utf8(&src[i..])
                .expect("lexer guarantees the unescaped run is valid UTF-8");
            let ch = s.chars().next().expect("non-empty slice has a first char");
            let mut buf = [0u16; 2];
            dest.extend_from_slice(ch.encode_utf16(&mut buf));
            i += ch.len_utf8();
            continue;
        }

        i += 1;
        let esc = src[i];
        match esc {
            b'"' => dest.push(u16::from(b'"')),
            b'\\' => dest.push(u16::from(b'\\')),
            b'/' => dest.push(u16::from(b'/')),
            b'b' => dest.push(0x08),
            b'f' => dest.push(0x0C),
            b'n' => dest.push(0x0A),
            b'r' => dest.push(0x0D),
            b't' => dest.push(0x09),
            b'u' => {
                i += 1;
                let hex = core::str::from_utf8(&src[i..i + 4])
                    .expect("lexer guarantees four ASCII hex digits follow \\u");
                let code = u16::from_str_radix(hex, 16)
                    .expect("lexer guarantees the four bytes are valid hex digits");
                dest.push(code);
                i += 4;
                continue;
            }
            other => unreachable!("lexer rejected all escapes except \" \\ / b f n r t u, got {other:#x}"),
        }
        i += 1;
    }
}
