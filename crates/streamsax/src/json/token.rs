//! Token descriptors produced by the lexer (C4) and consumed by the pull
//! parser (C6).

use super::error::LexError;

/// The lexical class of a token. `Eof` signals "no complete token yet, feed
/// more bytes"; `Error` signals a lexical failure (see
/// [`super::lexer::Lexer::last_error`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    ObjectOpen,
    ObjectClose,
    ArrayOpen,
    ArrayClose,
    Comma,
    Colon,
    Bool,
    Null,
    Integer,
    Double,
    String,
    StringWithEscapes,
    Eof,
    Error,
}

impl TokenKind {
    /// Whether this token kind carries a `(buffer, offset, length)` payload.
    pub fn has_payload(self) -> bool {
        matches!(
            self,
            Self::Bool | Self::Integer | Self::Double | Self::String | Self::StringWithEscapes
        )
    }
}

/// Where a token's payload bytes live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    /// The payload is a zero-copy slice of the window passed to the current
    /// `lex` call.
    Window,
    /// The payload lives in the lexer's carry buffer (the token straddled a
    /// chunk boundary, or a multi-byte value handler needed accumulation).
    Carry,
}

/// A lexed token: its kind, and — when `kind.has_payload()` — the location
/// of its payload bytes, excluding any surrounding delimiters (e.g. the
/// quotes of a string).
#[derive(Debug, Clone, Copy)]
pub struct TokenDescriptor {
    pub kind: TokenKind,
    pub source: TokenSource,
    pub offset: usize,
    pub length: usize,
    /// Populated only when `kind == TokenKind::Error`.
    pub error: Option<LexError>,
}

impl TokenDescriptor {
    pub(crate) fn simple(kind: TokenKind) -> Self {
        Self {
            kind,
            source: TokenSource::Window,
            offset: 0,
            length: 0,
            error: None,
        }
    }

    pub(crate) fn eof() -> Self {
        Self::simple(TokenKind::Eof)
    }

    pub(crate) fn error(err: LexError) -> Self {
        Self {
            kind: TokenKind::Error,
            source: TokenSource::Window,
            offset: 0,
            length: 0,
            error: Some(err),
        }
    }

    pub(crate) fn payload(kind: TokenKind, source: TokenSource, offset: usize, length: usize) -> Self {
        Self {
            kind,
            source,
            offset,
            length,
            error: None,
        }
    }
}
