//! C4 — the lexer: turns a byte window (plus, when a token straddles a
//! chunk boundary, the carry buffer) into one [`TokenDescriptor`] per call.
//!
//! The lexer never panics on malformed input and never throws: failures are
//! returned as `TokenKind::Error` descriptors with the cause recorded in
//! [`Lexer::last_error`] (spec §4.4 "State exposure"). Unlike the teacher's
//! `parser.rs`, which fuses lexical state (`LexState`) with grammar state
//! (`ParseState`) in one big `dispatch_parse_state`/`lex_state_step` pair,
//! this lexer is context-free: it knows nothing about object/array nesting
//! or "expected next token" — that lives entirely in [`super::state`]. This
//! mirrors the clean C4/C5/C6 split the distilled spec describes, at the
//! cost of diverging from the teacher's own (more tangled) state machine.

use super::carry::CarryBuffer;
use super::char_class::{self, CHAR_CLASS};
use super::error::LexError;
use super::token::{TokenDescriptor, TokenKind};
use super::window::ByteWindow;

#[derive(Debug, Clone, Copy)]
enum CommentState {
    AfterSlash,
    Line,
    Block,
    BlockStar,
}

enum CommentOutcome {
    Done,
    Pending(CommentState),
    Error(LexError),
}

enum SkipOutcome {
    Done,
    Pending,
    Error(LexError),
}

#[derive(Debug, Clone, Copy)]
enum StringMode {
    Normal,
    Escape,
    /// Hex digits of a `\uXXXX` escape consumed so far (0..=3 when paused).
    UnicodeEscape(u8),
}

#[derive(Debug, Clone, Copy)]
struct StringState {
    mode: StringMode,
    has_escapes: bool,
}

#[derive(Debug, Clone, Copy)]
enum NumberPhase {
    /// Nothing of the number consumed yet; next byte is `-` or a digit.
    Start,
    /// Just consumed a leading `-`; next byte must be a digit.
    Minus,
    /// Consuming the (optional, zero-or-more) digits after a nonzero lead.
    IntDigits,
    /// Integer part is complete; look for `.` or `e`/`E`, else done.
    CheckFracOrExp,
    /// Just consumed `.`; next byte must be a digit.
    PointFirst,
    /// Consuming fraction digits.
    Frac,
    /// Fraction part is complete; look for `e`/`E`, else done.
    CheckExp,
    /// Just consumed `e`/`E`; an optional sign may follow.
    ExpSign,
    /// Next byte must be a digit (first exponent digit).
    ExpFirst,
    /// Consuming exponent digits.
    ExpDigits,
}

#[derive(Debug, Clone, Copy)]
struct NumberState {
    phase: NumberPhase,
    is_double: bool,
}

#[derive(Debug, Clone, Copy)]
struct KeywordState {
    literal: &'static [u8],
    matched: u8,
    kind: TokenKind,
}

enum Resume {
    None,
    Comment(CommentState),
    Number(NumberState),
    Str(StringState),
    Keyword(KeywordState),
}

enum DigitRun {
    NeedMore,
    Terminated,
}

/// Expected UTF-8 sequence length from a leading byte, or `None` if `b0` is
/// not a valid multi-byte lead (stray continuation byte or invalid range).
fn utf8_seq_len(b0: u8) -> Option<usize> {
    match b0 {
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}

/// Consumes bytes from a [`ByteWindow`], emitting one [`TokenDescriptor`]
/// per call. See the module doc for the lexer/parser split this
/// implementation makes.
pub struct Lexer {
    carry: CarryBuffer,
    buf_in_use: bool,
    resume: Resume,
    allow_comments: bool,
    validate_utf8: bool,
    last_error: Option<LexError>,
}

impl Lexer {
    pub fn new(allow_comments: bool, validate_utf8: bool) -> Self {
        Self {
            carry: CarryBuffer::new(),
            buf_in_use: false,
            resume: Resume::None,
            allow_comments,
            validate_utf8,
            last_error: None,
        }
    }

    /// The cause of the most recent `Error` token, if any.
    pub fn last_error(&self) -> Option<LexError> {
        self.last_error
    }

    /// Clears the carry buffer and any in-progress token state.
    pub fn reset(&mut self) {
        self.carry.clear();
        self.buf_in_use = false;
        self.resume = Resume::None;
        self.last_error = None;
    }

    /// Whichever of `window` or the carry buffer currently holds a token's
    /// payload, as a byte slice, given the `(source, offset, length)` a
    /// [`TokenDescriptor`] carries.
    pub fn payload_bytes<'a>(&'a self, window: &ByteWindow<'a>, desc: &TokenDescriptor) -> &'a [u8] {
        match desc.source {
            super::token::TokenSource::Window => window.slice(desc.offset, desc.offset + desc.length),
            super::token::TokenSource::Carry => &self.carry.as_bytes()[desc.offset..desc.offset + desc.length],
        }
    }

    /// Consumes `n` bytes from `window`, mirroring them into the carry
    /// buffer when a token is currently being stitched across a chunk
    /// boundary.
    fn advance_and_record(&mut self, window: &mut ByteWindow<'_>, n: usize) {
        if n == 0 {
            return;
        }
        if self.buf_in_use {
            let start = window.position();
            let bytes = window.slice(start, start + n);
            self.carry.append(bytes);
        }
        window.advance(n);
    }

    /// The first time a token runs out of window bytes, copies whatever of
    /// it has been consumed so far into the carry and flips `buf_in_use`.
    /// A no-op on subsequent calls for the same token.
    fn begin_carry_if_needed(&mut self, window: &ByteWindow<'_>, token_start: usize) {
        if !self.buf_in_use {
            let end = window.position();
            self.carry.clear();
            self.carry.append(window.slice(token_start, end));
            self.buf_in_use = true;
        }
    }

    fn fail(&mut self, err: LexError) -> TokenDescriptor {
        self.last_error = Some(err);
        TokenDescriptor::error(err)
    }

    /// Builds the final descriptor for a completed token: zero-copy into
    /// `window` if the carry was never needed, otherwise into the carry
    /// (left intact — the caller reads it before the next `lex` call, which
    /// is the only place it can be overwritten).
    fn finish_token(&mut self, window: &ByteWindow<'_>, token_start: usize, kind: TokenKind) -> TokenDescriptor {
        if self.buf_in_use {
            let len = self.carry.len();
            self.buf_in_use = false;
            TokenDescriptor::payload(kind, super::token::TokenSource::Carry, 0, len)
        } else {
            let end = window.position();
            TokenDescriptor::payload(kind, super::token::TokenSource::Window, token_start, end - token_start)
        }
    }

    /// Consumes one token from `window`, resuming any in-progress token
    /// left over from a previous call whose input ran out mid-scan.
    pub fn lex(&mut self, window: &mut ByteWindow<'_>) -> TokenDescriptor {
        match core::mem::replace(&mut self.resume, Resume::None) {
            Resume::None => {}
            Resume::Comment(state) => match self.continue_comment(window, state) {
                CommentOutcome::Done => {}
                CommentOutcome::Pending(state) => {
                    self.resume = Resume::Comment(state);
                    return TokenDescriptor::eof();
                }
                CommentOutcome::Error(e) => return self.fail(e),
            },
            Resume::Number(st) => return self.continue_number(window, st),
            Resume::Str(st) => return self.continue_string(window, st),
            Resume::Keyword(st) => return self.continue_keyword(window, st),
        }

        match self.skip_ignorable(window) {
            SkipOutcome::Done => {}
            SkipOutcome::Pending => return TokenDescriptor::eof(),
            SkipOutcome::Error(e) => return self.fail(e),
        }

        let Some(b) = window.peek() else {
            return TokenDescriptor::eof();
        };

        match b {
            b'{' => {
                window.advance(1);
                TokenDescriptor::simple(TokenKind::ObjectOpen)
            }
            b'}' => {
                window.advance(1);
                TokenDescriptor::simple(TokenKind::ObjectClose)
            }
            b'[' => {
                window.advance(1);
                TokenDescriptor::simple(TokenKind::ArrayOpen)
            }
            b']' => {
                window.advance(1);
                TokenDescriptor::simple(TokenKind::ArrayClose)
            }
            b',' => {
                window.advance(1);
                TokenDescriptor::simple(TokenKind::Comma)
            }
            b':' => {
                window.advance(1);
                TokenDescriptor::simple(TokenKind::Colon)
            }
            b'"' => {
                window.advance(1);
                self.start_string(window)
            }
            b'-' | b'0'..=b'9' => self.start_number(window),
            b't' => self.start_keyword(window, b"true", TokenKind::Bool),
            b'f' => self.start_keyword(window, b"false", TokenKind::Bool),
            b'n' => self.start_keyword(window, b"null", TokenKind::Null),
            _ => self.fail(LexError::InvalidChar),
        }
    }

    fn skip_ignorable(&mut self, window: &mut ByteWindow<'_>) -> SkipOutcome {
        loop {
            let Some(b) = window.peek() else {
                return SkipOutcome::Done;
            };
            match b {
                b'\t' | b'\n' | 0x0B | 0x0C | b'\r' | b' ' => {
                    window.advance(1);
                }
                b'/' if self.allow_comments => {
                    window.advance(1);
                    match self.continue_comment(window, CommentState::AfterSlash) {
                        CommentOutcome::Done => {}
                        CommentOutcome::Pending(state) => {
                            self.resume = Resume::Comment(state);
                            return SkipOutcome::Pending;
                        }
                        CommentOutcome::Error(e) => return SkipOutcome::Error(e),
                    }
                }
                b'/' => return SkipOutcome::Error(LexError::UnallowedComment),
                _ => return SkipOutcome::Done,
            }
        }
    }

    fn continue_comment(&mut self, window: &mut ByteWindow<'_>, mut state: CommentState) -> CommentOutcome {
        loop {
            let Some(b) = window.peek() else {
                return CommentOutcome::Pending(state);
            };
            match state {
                CommentState::AfterSlash => {
                    window.advance(1);
                    if b == b'*' {
                        state = CommentState::Block;
                    } else if b == b'/' {
                        state = CommentState::Line;
                    } else {
                        return CommentOutcome::Error(LexError::InvalidChar);
                    }
                }
                CommentState::Line => {
                    window.advance(1);
                    if b == b'\n' {
                        return CommentOutcome::Done;
                    }
                }
                CommentState::Block => {
                    window.advance(1);
                    if b == b'*' {
                        state = CommentState::BlockStar;
                    }
                }
                CommentState::BlockStar => {
                    window.advance(1);
                    if b == b'/' {
                        return CommentOutcome::Done;
                    } else if b != b'*' {
                        state = CommentState::Block;
                    }
                }
            }
        }
    }

    fn start_string(&mut self, window: &mut ByteWindow<'_>) -> TokenDescriptor {
        self.continue_string(
            window,
            StringState {
                mode: StringMode::Normal,
                has_escapes: false,
            },
        )
    }

    fn continue_string(&mut self, window: &mut ByteWindow<'_>, mut st: StringState) -> TokenDescriptor {
        let token_start = window.position();
        loop {
            match st.mode {
                StringMode::Normal => {
                    let stop_mask = char_class::INVALID_JSON_CHAR
                        | char_class::NEEDS_FURTHER_PROCESSING
                        | if self.validate_utf8 { char_class::NEEDS_UTF8_CHECK } else { 0 };
                    let run = window
                        .remaining_bytes()
                        .iter()
                        .take_while(|&&b| CHAR_CLASS[b as usize] & stop_mask == 0)
                        .count();
                    if run > 0 {
                        self.advance_and_record(window, run);
                    }
                    let Some(b) = window.peek() else {
                        self.begin_carry_if_needed(window, token_start);
                        self.resume = Resume::Str(st);
                        return TokenDescriptor::eof();
                    };
                    if b == b'"' {
                        window.advance(1);
                        let kind = if st.has_escapes {
                            TokenKind::StringWithEscapes
                        } else {
                            TokenKind::String
                        };
                        return self.finish_token(window, token_start, kind);
                    }
                    if b == b'\\' {
                        self.advance_and_record(window, 1);
                        st.mode = StringMode::Escape;
                        continue;
                    }
                    if CHAR_CLASS[b as usize] & char_class::INVALID_JSON_CHAR != 0 {
                        return self.fail(LexError::StringInvalidJsonChar);
                    }
                    match utf8_seq_len(b) {
                        None => return self.fail(LexError::StringInvalidUtf8),
                        Some(n) => {
                            if window.remaining() < n {
                                self.begin_carry_if_needed(window, token_start);
                                self.resume = Resume::Str(st);
                                return TokenDescriptor::eof();
                            }
                            let pos = window.position();
                            let candidate = window.slice(pos, pos + n);
                            if core::str::from_utf8(candidate).is_err() {
                                return self.fail(LexError::StringInvalidUtf8);
                            }
                            self.advance_and_record(window, n);
                            continue;
                        }
                    }
                }
                StringMode::Escape => {
                    let Some(e) = window.peek() else {
                        self.begin_carry_if_needed(window, token_start);
                        self.resume = Resume::Str(st);
                        return TokenDescriptor::eof();
                    };
                    st.has_escapes = true;
                    if e == b'u' {
                        self.advance_and_record(window, 1);
                        st.mode = StringMode::UnicodeEscape(0);
                        continue;
                    }
                    if CHAR_CLASS[e as usize] & char_class::VALID_ESCAPE_CHAR == 0 {
                        return self.fail(LexError::StringInvalidEscapedChar);
                    }
                    self.advance_and_record(window, 1);
                    st.mode = StringMode::Normal;
                    continue;
                }
                StringMode::UnicodeEscape(mut consumed) => {
                    while consumed < 4 {
                        let Some(h) = window.peek() else {
                            self.begin_carry_if_needed(window, token_start);
                            st.mode = StringMode::UnicodeEscape(consumed);
                            self.resume = Resume::Str(st);
                            return TokenDescriptor::eof();
                        };
                        if CHAR_CLASS[h as usize] & char_class::VALID_HEX_CHAR == 0 {
                            return self.fail(LexError::StringInvalidHexChar);
                        }
                        self.advance_and_record(window, 1);
                        consumed += 1;
                    }
                    st.mode = StringMode::Normal;
                    continue;
                }
            }
        }
    }

    fn start_number(&mut self, window: &mut ByteWindow<'_>) -> TokenDescriptor {
        self.continue_number(
            window,
            NumberState {
                phase: NumberPhase::Start,
                is_double: false,
            },
        )
    }

    fn number_need_more(&mut self, window: &mut ByteWindow<'_>, token_start: usize, st: NumberState) -> TokenDescriptor {
        self.begin_carry_if_needed(window, token_start);
        self.resume = Resume::Number(st);
        TokenDescriptor::eof()
    }

    fn consume_digit_run(&mut self, window: &mut ByteWindow<'_>) -> DigitRun {
        let run = window.remaining_bytes().iter().take_while(|b| b.is_ascii_digit()).count();
        if run > 0 {
            self.advance_and_record(window, run);
        }
        if window.peek().is_some() {
            DigitRun::Terminated
        } else {
            DigitRun::NeedMore
        }
    }

    fn continue_number(&mut self, window: &mut ByteWindow<'_>, mut st: NumberState) -> TokenDescriptor {
        let token_start = window.position();
        loop {
            match st.phase {
                NumberPhase::Start => {
                    let Some(b) = window.peek() else {
                        return self.number_need_more(window, token_start, st);
                    };
                    self.advance_and_record(window, 1);
                    st.phase = if b == b'-' {
                        NumberPhase::Minus
                    } else if b == b'0' {
                        NumberPhase::CheckFracOrExp
                    } else {
                        NumberPhase::IntDigits
                    };
                }
                NumberPhase::Minus => {
                    let Some(b) = window.peek() else {
                        return self.number_need_more(window, token_start, st);
                    };
                    if !b.is_ascii_digit() {
                        return self.fail(LexError::MissingIntegerAfterMinus);
                    }
                    self.advance_and_record(window, 1);
                    st.phase = if b == b'0' {
                        NumberPhase::CheckFracOrExp
                    } else {
                        NumberPhase::IntDigits
                    };
                }
                NumberPhase::IntDigits => match self.consume_digit_run(window) {
                    DigitRun::NeedMore => return self.number_need_more(window, token_start, st),
                    DigitRun::Terminated => st.phase = NumberPhase::CheckFracOrExp,
                },
                NumberPhase::CheckFracOrExp => {
                    let Some(b) = window.peek() else {
                        return self.number_need_more(window, token_start, st);
                    };
                    if b == b'.' {
                        self.advance_and_record(window, 1);
                        st.is_double = true;
                        st.phase = NumberPhase::PointFirst;
                    } else if b == b'e' || b == b'E' {
                        self.advance_and_record(window, 1);
                        st.is_double = true;
                        st.phase = NumberPhase::ExpSign;
                    } else {
                        return self.finish_token(window, token_start, TokenKind::Integer);
                    }
                }
                NumberPhase::PointFirst => {
                    let Some(b) = window.peek() else {
                        return self.number_need_more(window, token_start, st);
                    };
                    if !b.is_ascii_digit() {
                        return self.fail(LexError::MissingIntegerAfterDecimal);
                    }
                    self.advance_and_record(window, 1);
                    st.phase = NumberPhase::Frac;
                }
                NumberPhase::Frac => match self.consume_digit_run(window) {
                    DigitRun::NeedMore => return self.number_need_more(window, token_start, st),
                    DigitRun::Terminated => st.phase = NumberPhase::CheckExp,
                },
                NumberPhase::CheckExp => {
                    let Some(b) = window.peek() else {
                        return self.number_need_more(window, token_start, st);
                    };
                    if b == b'e' || b == b'E' {
                        self.advance_and_record(window, 1);
                        st.phase = NumberPhase::ExpSign;
                    } else {
                        return self.finish_token(window, token_start, TokenKind::Double);
                    }
                }
                NumberPhase::ExpSign => {
                    let Some(b) = window.peek() else {
                        return self.number_need_more(window, token_start, st);
                    };
                    if b == b'+' || b == b'-' {
                        self.advance_and_record(window, 1);
                    }
                    st.phase = NumberPhase::ExpFirst;
                }
                NumberPhase::ExpFirst => {
                    let Some(b) = window.peek() else {
                        return self.number_need_more(window, token_start, st);
                    };
                    if !b.is_ascii_digit() {
                        return self.fail(LexError::MissingIntegerAfterExponent);
                    }
                    self.advance_and_record(window, 1);
                    st.phase = NumberPhase::ExpDigits;
                }
                NumberPhase::ExpDigits => match self.consume_digit_run(window) {
                    DigitRun::NeedMore => return self.number_need_more(window, token_start, st),
                    DigitRun::Terminated => return self.finish_token(window, token_start, TokenKind::Double),
                },
            }
        }
    }

    fn start_keyword(&mut self, window: &mut ByteWindow<'_>, literal: &'static [u8], kind: TokenKind) -> TokenDescriptor {
        self.continue_keyword(window, KeywordState { literal, matched: 0, kind })
    }

    fn continue_keyword(&mut self, window: &mut ByteWindow<'_>, mut st: KeywordState) -> TokenDescriptor {
        let token_start = window.position();
        while (st.matched as usize) < st.literal.len() {
            let Some(b) = window.peek() else {
                self.begin_carry_if_needed(window, token_start);
                self.resume = Resume::Keyword(st);
                return TokenDescriptor::eof();
            };
            if b != st.literal[st.matched as usize] {
                return self.fail(LexError::InvalidString);
            }
            self.advance_and_record(window, 1);
            st.matched += 1;
        }
        self.finish_token(window, token_start, st.kind)
    }
}
