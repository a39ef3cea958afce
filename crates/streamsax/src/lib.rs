//! A streaming, event-driven (SAX-style) JSON parser, plus an independent
//! FIX protocol field scanner, both built around chunked byte input that
//! need not align with any token boundary.
//!
//! The JSON side (see [`json`]) never materializes a value tree: it drives
//! a caller-supplied set of handlers directly off a lexer and a small state
//! stack, so arbitrarily large documents can be streamed through constant
//! memory (modulo the longest single string/number literal). The FIX side
//! (see [`fix`]) is a much smaller sibling that shares only the handler
//! error type and the byte-window abstraction.
//!
//! Both halves are pull-based: the caller owns the input buffers and feeds
//! them in whatever chunks arrive off the wire, and both retain just enough
//! internal state (a carry buffer) to resume a token interrupted at a chunk
//! boundary.

pub mod error;
pub mod fix;
pub mod json;

pub use error::HandlerError;
pub use fix::{FieldResult, FixError, FixScanner, ScanOutcome, Tag};
pub use json::{ByteWindow, ParseError, Parser, ParserBuilder, ParserOptions, StrValue};
