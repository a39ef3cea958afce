//! Error types shared by the JSON parser and the FIX field scanner.

use std::fmt;

/// The cause a callback raised, wrapped so it can travel through a
/// [`crate::json::ParseError`] or be returned directly by the FIX scanner.
///
/// Handlers signal *cancel* with `Ok(false)`; they signal a recoverable
/// failure by returning `Err(HandlerError)`. There is no distinct
/// "unrecoverable" variant in this port: Rust has no checked/unchecked
/// exception split, so every handler failure is wrapped uniformly, with the
/// original cause preserved as the [`std::error::Error::source`].
pub struct HandlerError(Box<dyn std::error::Error + Send + Sync + 'static>);

impl HandlerError {
    /// Wraps an arbitrary error raised by a callback.
    pub fn new<E>(cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self(Box::new(cause))
    }
}

impl fmt::Debug for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for HandlerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.0.as_ref())
    }
}
