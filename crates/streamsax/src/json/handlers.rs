//! The caller-supplied handler set (spec §6 "External Interfaces"): boxed
//! `FnMut` closures for each structural/value event, plus a reset hook.
//!
//! Deliberately out of scope per spec §1 ("the callback interface types
//! themselves... builder/configuration ergonomics... are thin and
//! uninteresting relative to the lexer/parser core") — this module exists
//! so the core has something concrete to dispatch to, grounded on the
//! teacher's boxed-closure event-handling style rather than a generic
//! trait-object visitor (simpler, and what a caller of a SAX-style API
//! expects to write: one closure per event, not an object implementing a
//! dozen-method trait).

use crate::error::HandlerError;

use super::unescape::StrValue;

/// Returned by every handler: `Ok(true)` to continue, `Ok(false)` to
/// cancel, `Err(_)` to raise a recoverable failure that the parser wraps
/// into a [`super::error::ParseError`].
pub type ContinueResult = Result<bool, HandlerError>;

/// The handler set a [`super::parser::Parser`] dispatches to. Every field
/// is optional; [`super::parser::ParserBuilder::build`] enforces that at
/// least one *token* handler (anything but `reset_hook`) is registered, and
/// that `raw_number` is not combined with `integer`/`floating`.
#[derive(Default)]
pub struct Handlers {
    pub(crate) object_open: Option<Box<dyn FnMut() -> ContinueResult>>,
    pub(crate) object_close: Option<Box<dyn FnMut() -> ContinueResult>>,
    pub(crate) array_open: Option<Box<dyn FnMut() -> ContinueResult>>,
    pub(crate) array_close: Option<Box<dyn FnMut() -> ContinueResult>>,
    pub(crate) object_key: Option<Box<dyn FnMut(StrValue<'_>) -> ContinueResult>>,
    pub(crate) string_value: Option<Box<dyn FnMut(StrValue<'_>) -> ContinueResult>>,
    pub(crate) boolean: Option<Box<dyn FnMut(bool) -> ContinueResult>>,
    pub(crate) null: Option<Box<dyn FnMut() -> ContinueResult>>,
    pub(crate) integer: Option<Box<dyn FnMut(i64) -> ContinueResult>>,
    pub(crate) floating: Option<Box<dyn FnMut(f64) -> ContinueResult>>,
    pub(crate) raw_number: Option<Box<dyn FnMut(&str) -> ContinueResult>>,
    pub(crate) reset_hook: Option<Box<dyn FnMut()>>,
}

impl Handlers {
    pub(crate) fn has_any_token_handler(&self) -> bool {
        self.object_open.is_some()
            || self.object_close.is_some()
            || self.array_open.is_some()
            || self.array_close.is_some()
            || self.object_key.is_some()
            || self.string_value.is_some()
            || self.boolean.is_some()
            || self.null.is_some()
            || self.integer.is_some()
            || self.floating.is_some()
            || self.raw_number.is_some()
    }

    pub(crate) fn conflicting_number_handlers(&self) -> bool {
        self.raw_number.is_some() && (self.integer.is_some() || self.floating.is_some())
    }
}

impl std::fmt::Debug for Handlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handlers")
            .field("object_open", &self.object_open.is_some())
            .field("object_close", &self.object_close.is_some())
            .field("array_open", &self.array_open.is_some())
            .field("array_close", &self.array_close.is_some())
            .field("object_key", &self.object_key.is_some())
            .field("string_value", &self.string_value.is_some())
            .field("boolean", &self.boolean.is_some())
            .field("null", &self.null.is_some())
            .field("integer", &self.integer.is_some())
            .field("floating", &self.floating.is_some())
            .field("raw_number", &self.raw_number.is_some())
            .field("reset_hook", &self.reset_hook.is_some())
            .finish()
    }
}
