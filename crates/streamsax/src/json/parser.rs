//! C6 — the pull parser: drives the lexer, consults the state stack,
//! dispatches to caller-registered handlers, and enforces the JSON grammar.
//!
//! This is where the spec's two halves — lexical tokens (C4) and grammar
//! state (C5) — meet. Kept as two distinct types rather than the teacher's
//! fused `LexState`/`ParseState` pair (see DESIGN.md); `Parser` owns a
//! [`Lexer`] and a [`StateStack`] and never inspects the lexer's internal
//! resume state directly.

use super::error::{ConfigError, ParseError, SyntaxError};
use super::handlers::{ContinueResult, Handlers};
use super::lexer::Lexer;
use super::numbers;
use super::options::{ParserOptions, TopLevelStrategy};
use super::state::{StateStack, StateTag};
use super::token::{TokenDescriptor, TokenKind, TokenSource};
use super::unescape::{self, StrValue};
use super::window::ByteWindow;

/// What a grammar step tells the driving loop in [`Parser::parse`] to do
/// next: keep dispatching tokens, or stop and hand a result back to the
/// caller.
enum Step {
    Continue,
    Return(bool),
}

/// Builds a char sequence for a `String`/`StringWithEscapes`/key token.
/// Written as a free function taking explicit field borrows (`&lexer`,
/// `&mut scratch`) rather than a `Parser` method, so the borrow checker sees
/// it touch only those two fields — a sibling `&mut self.handlers` borrow at
/// the call site stays legal. See `Parser::dispatch_key_or_config` for why
/// that matters.
fn build_str_value<'a>(lexer: &'a Lexer, window: &ByteWindow<'a>, desc: &TokenDescriptor, scratch: &'a mut Vec<u16>) -> StrValue<'a> {
    let payload = lexer.payload_bytes(window, desc);
    if desc.kind == TokenKind::StringWithEscapes {
        unescape::decode(payload, scratch);
        return StrValue::Owned(core::mem::take(scratch));
    }
    match core::str::from_utf8(payload) {
        Ok(s) => StrValue::Borrowed(s),
        Err(_) => {
            // Only reachable with UTF-8 validation disabled: fall back to a
            // lossy re-encoding rather than panicking on malformed bytes.
            let units: Vec<u16> = String::from_utf8_lossy(payload).encode_utf16().collect();
            StrValue::Owned(units)
        }
    }
}

/// Drives lexing and grammar for one JSON document (or, under
/// `AllowMultipleValues`, a sequence of them). Build with [`ParserBuilder`].
pub struct Parser {
    lexer: Lexer,
    state: StateStack,
    handlers: Handlers,
    options: ParserOptions,
    scratch_utf16: Vec<u16>,
}

impl Parser {
    pub fn builder() -> ParserBuilder {
        ParserBuilder::new()
    }

    /// Feeds one chunk of input. Drives the state machine until the window
    /// is exhausted (`Ok(true)`), a handler cancels (`Ok(false)`), or a
    /// lexical/grammar/handler/configuration failure occurs (`Err`).
    pub fn parse(&mut self, window: &mut ByteWindow<'_>) -> Result<bool, ParseError> {
        loop {
            let top = self.state.top();
            if top.is_sticky() {
                return Err(ParseError::syntax(window.position(), SyntaxError::Sticky));
            }
            let step = match top {
                StateTag::ParseComplete => self.step_parse_complete(window)?,
                StateTag::Start | StateTag::GotValue | StateTag::MapNeedVal | StateTag::ArrayNeedVal | StateTag::ArrayStart => {
                    self.step_value(window, top)?
                }
                StateTag::MapStart | StateTag::MapNeedKey => self.step_object_key(window, top)?,
                StateTag::MapSep => self.step_map_sep(window)?,
                StateTag::MapGotVal => self.step_map_got_val(window)?,
                StateTag::ArrayGotVal => self.step_array_got_val(window)?,
                StateTag::ParseError | StateTag::LexicalError | StateTag::HandlerCancel | StateTag::HandlerException => {
                    unreachable!("sticky states are returned above")
                }
            };
            match step {
                Step::Continue => continue,
                Step::Return(v) => return Ok(v),
            }
        }
    }

    /// Forces closure of any trailing number by feeding a single synthetic
    /// whitespace byte, then checks whether the document is complete.
    pub fn finish(&mut self) -> Result<bool, ParseError> {
        let synthetic = [b' '];
        let mut window = ByteWindow::new(&synthetic);
        if !self.parse(&mut window)? {
            return Ok(false);
        }
        match self.state.top() {
            StateTag::ParseComplete | StateTag::GotValue => Ok(true),
            _ if self.options.allow_partial_values => Ok(true),
            _ => Err(ParseError::syntax(0, SyntaxError::PrematureEof)),
        }
    }

    /// Clears the carry buffer, the state stack, and the last lexical error,
    /// then invokes the reset hook if one is registered.
    pub fn reset(&mut self) {
        self.lexer.reset();
        self.state.clear();
        if let Some(hook) = self.handlers.reset_hook.as_mut() {
            hook();
        }
    }

    fn step_parse_complete(&mut self, window: &mut ByteWindow<'_>) -> Result<Step, ParseError> {
        match self.options.top_level_strategy {
            TopLevelStrategy::AllowTrailingGarbage => Ok(Step::Return(true)),
            TopLevelStrategy::AllowMultipleValues => {
                self.state.set(StateTag::GotValue);
                Ok(Step::Continue)
            }
            TopLevelStrategy::SingleObject => {
                let token_start = window.position();
                let desc = self.lexer.lex(window);
                match desc.kind {
                    TokenKind::Eof => Ok(Step::Return(true)),
                    TokenKind::Error => {
                        self.state.set(StateTag::LexicalError);
                        Err(ParseError::lexical(token_start, desc.error.expect("Error token carries a cause")))
                    }
                    _ => {
                        Self::rewind_to_token_start(window, token_start, &desc);
                        self.state.set(StateTag::ParseError);
                        Err(ParseError::syntax(token_start, SyntaxError::TrailingGarbage))
                    }
                }
            }
        }
    }

    fn step_value(&mut self, window: &mut ByteWindow<'_>, top: StateTag) -> Result<Step, ParseError> {
        let token_start = window.position();
        let desc = self.lexer.lex(window);
        match desc.kind {
            TokenKind::Eof => Ok(Step::Return(true)),
            TokenKind::Error => {
                self.state.set(StateTag::LexicalError);
                Err(ParseError::lexical(token_start, desc.error.expect("Error token carries a cause")))
            }
            TokenKind::ArrayClose if top == StateTag::ArrayStart => {
                if !self.dispatch_unit_or_config(token_start, |h| h.array_close.as_mut(), TokenKind::ArrayClose)? {
                    return Ok(Step::Return(false));
                }
                self.state.pop();
                self.accept_value();
                Ok(Step::Continue)
            }
            TokenKind::ObjectOpen => {
                if !self.dispatch_unit_or_config(token_start, |h| h.object_open.as_mut(), TokenKind::ObjectOpen)? {
                    return Ok(Step::Return(false));
                }
                self.state.push(StateTag::MapStart);
                Ok(Step::Continue)
            }
            TokenKind::ArrayOpen => {
                if !self.dispatch_unit_or_config(token_start, |h| h.array_open.as_mut(), TokenKind::ArrayOpen)? {
                    return Ok(Step::Return(false));
                }
                self.state.push(StateTag::ArrayStart);
                Ok(Step::Continue)
            }
            TokenKind::Bool => {
                let value = self.lexer.payload_bytes(window, &desc).first() == Some(&b't');
                if !self.dispatch_bool_or_config(token_start, value)? {
                    return Ok(Step::Return(false));
                }
                self.accept_value();
                Ok(Step::Continue)
            }
            TokenKind::Null => {
                if !self.dispatch_unit_or_config(token_start, |h| h.null.as_mut(), TokenKind::Null)? {
                    return Ok(Step::Return(false));
                }
                self.accept_value();
                Ok(Step::Continue)
            }
            TokenKind::String | TokenKind::StringWithEscapes => {
                if !self.dispatch_string_value_or_config(window, token_start, &desc)? {
                    return Ok(Step::Return(false));
                }
                self.accept_value();
                Ok(Step::Continue)
            }
            TokenKind::Integer | TokenKind::Double => {
                if !self.dispatch_number_or_config(window, token_start, &desc)? {
                    return Ok(Step::Return(false));
                }
                self.accept_value();
                Ok(Step::Continue)
            }
            // (Integer/Double overflow rewinds the window itself, from
            // within dispatch_number_or_config, before returning its Err.)
            _ => {
                Self::rewind_to_token_start(window, token_start, &desc);
                self.state.set(StateTag::ParseError);
                Err(ParseError::syntax(token_start, SyntaxError::UnexpectedToken))
            }
        }
    }

    fn step_object_key(&mut self, window: &mut ByteWindow<'_>, top: StateTag) -> Result<Step, ParseError> {
        let token_start = window.position();
        let desc = self.lexer.lex(window);
        match desc.kind {
            TokenKind::Eof => Ok(Step::Return(true)),
            TokenKind::Error => {
                self.state.set(StateTag::LexicalError);
                Err(ParseError::lexical(token_start, desc.error.expect("Error token carries a cause")))
            }
            TokenKind::ObjectClose if top == StateTag::MapStart => {
                if !self.dispatch_unit_or_config(token_start, |h| h.object_close.as_mut(), TokenKind::ObjectClose)? {
                    return Ok(Step::Return(false));
                }
                self.state.pop();
                self.accept_value();
                Ok(Step::Continue)
            }
            TokenKind::String | TokenKind::StringWithEscapes => {
                if !self.dispatch_key_or_config(window, token_start, &desc)? {
                    return Ok(Step::Return(false));
                }
                self.state.set(StateTag::MapSep);
                Ok(Step::Continue)
            }
            _ => {
                Self::rewind_to_token_start(window, token_start, &desc);
                self.state.set(StateTag::ParseError);
                Err(ParseError::syntax(token_start, SyntaxError::InvalidObjectKey))
            }
        }
    }

    fn step_map_sep(&mut self, window: &mut ByteWindow<'_>) -> Result<Step, ParseError> {
        let token_start = window.position();
        let desc = self.lexer.lex(window);
        match desc.kind {
            TokenKind::Eof => Ok(Step::Return(true)),
            TokenKind::Error => {
                self.state.set(StateTag::LexicalError);
                Err(ParseError::lexical(token_start, desc.error.expect("Error token carries a cause")))
            }
            TokenKind::Colon => {
                self.state.set(StateTag::MapNeedVal);
                Ok(Step::Continue)
            }
            _ => {
                Self::rewind_to_token_start(window, token_start, &desc);
                self.state.set(StateTag::ParseError);
                Err(ParseError::syntax(token_start, SyntaxError::MissingColon))
            }
        }
    }

    fn step_map_got_val(&mut self, window: &mut ByteWindow<'_>) -> Result<Step, ParseError> {
        let token_start = window.position();
        let desc = self.lexer.lex(window);
        match desc.kind {
            TokenKind::Eof => Ok(Step::Return(true)),
            TokenKind::Error => {
                self.state.set(StateTag::LexicalError);
                Err(ParseError::lexical(token_start, desc.error.expect("Error token carries a cause")))
            }
            TokenKind::Comma => {
                self.state.set(StateTag::MapNeedKey);
                Ok(Step::Continue)
            }
            TokenKind::ObjectClose => {
                if !self.dispatch_unit_or_config(token_start, |h| h.object_close.as_mut(), TokenKind::ObjectClose)? {
                    return Ok(Step::Return(false));
                }
                self.state.pop();
                self.accept_value();
                Ok(Step::Continue)
            }
            _ => {
                Self::rewind_to_token_start(window, token_start, &desc);
                self.state.set(StateTag::ParseError);
                Err(ParseError::syntax(token_start, SyntaxError::UnexpectedToken))
            }
        }
    }

    fn step_array_got_val(&mut self, window: &mut ByteWindow<'_>) -> Result<Step, ParseError> {
        let token_start = window.position();
        let desc = self.lexer.lex(window);
        match desc.kind {
            TokenKind::Eof => Ok(Step::Return(true)),
            TokenKind::Error => {
                self.state.set(StateTag::LexicalError);
                Err(ParseError::lexical(token_start, desc.error.expect("Error token carries a cause")))
            }
            TokenKind::Comma => {
                self.state.set(StateTag::ArrayNeedVal);
                Ok(Step::Continue)
            }
            TokenKind::ArrayClose => {
                if !self.dispatch_unit_or_config(token_start, |h| h.array_close.as_mut(), TokenKind::ArrayClose)? {
                    return Ok(Step::Return(false));
                }
                self.state.pop();
                self.accept_value();
                Ok(Step::Continue)
            }
            _ => {
                Self::rewind_to_token_start(window, token_start, &desc);
                self.state.set(StateTag::ParseError);
                Err(ParseError::syntax(token_start, SyntaxError::UnexpectedToken))
            }
        }
    }

    /// Applies the "value accepted" transition to whatever value-slot state
    /// is currently on top — called for scalar tokens directly, and again
    /// (on the newly exposed parent frame) right after a container close.
    fn accept_value(&mut self) {
        let next = match self.state.top() {
            StateTag::Start | StateTag::GotValue => StateTag::ParseComplete,
            StateTag::MapNeedVal => StateTag::MapGotVal,
            StateTag::ArrayNeedVal | StateTag::ArrayStart => StateTag::ArrayGotVal,
            other => unreachable!("accept_value called from non-value-slot state {other:?}"),
        };
        self.state.set(next);
    }

    /// Error-offset restoration (spec §4.6): rewinds `window` so the caller
    /// observes it positioned at the start of the offending token — or, when
    /// the token was partly stitched from the carry buffer, at the start of
    /// the current chunk, since the carry-resident prefix is no longer part
    /// of `window` at all.
    fn rewind_to_token_start(window: &mut ByteWindow<'_>, chunk_start: usize, desc: &TokenDescriptor) {
        let pos = match desc.source {
            TokenSource::Window => desc.offset,
            TokenSource::Carry => chunk_start,
        };
        window.set_position(pos);
    }

    fn check_unhandled(&self, offset: usize, kind: TokenKind) -> Result<(), ParseError> {
        if self.options.each_token_must_be_handled {
            Err(ParseError::config(offset, ConfigError::UnhandledToken(kind)))
        } else {
            Ok(())
        }
    }

    fn unhandled_continue(&self, offset: usize, kind: TokenKind) -> Result<bool, ParseError> {
        self.check_unhandled(offset, kind)?;
        Ok(true)
    }

    fn dispatch_unit_or_config(
        &mut self,
        offset: usize,
        pick: impl FnOnce(&mut Handlers) -> Option<&mut Box<dyn FnMut() -> ContinueResult>>,
        kind: TokenKind,
    ) -> Result<bool, ParseError> {
        match pick(&mut self.handlers) {
            None => self.unhandled_continue(offset, kind),
            Some(h) => match h() {
                Ok(true) => Ok(true),
                Ok(false) => {
                    self.state.set(StateTag::HandlerCancel);
                    Ok(false)
                }
                Err(e) => {
                    self.state.set(StateTag::HandlerException);
                    Err(ParseError::handler(offset, e))
                }
            },
        }
    }

    fn dispatch_bool_or_config(&mut self, offset: usize, value: bool) -> Result<bool, ParseError> {
        if self.handlers.boolean.is_none() {
            return self.unhandled_continue(offset, TokenKind::Bool);
        }
        match self.handlers.boolean.as_mut().expect("checked above")(value) {
            Ok(true) => Ok(true),
            Ok(false) => {
                self.state.set(StateTag::HandlerCancel);
                Ok(false)
            }
            Err(e) => {
                self.state.set(StateTag::HandlerException);
                Err(ParseError::handler(offset, e))
            }
        }
    }

    fn dispatch_key_or_config(&mut self, window: &ByteWindow<'_>, offset: usize, desc: &TokenDescriptor) -> Result<bool, ParseError> {
        if self.handlers.object_key.is_none() {
            return self.unhandled_continue(offset, desc.kind);
        }
        let value = build_str_value(&self.lexer, window, desc, &mut self.scratch_utf16);
        match self.handlers.object_key.as_mut().expect("checked above")(value) {
            Ok(true) => Ok(true),
            Ok(false) => {
                self.state.set(StateTag::HandlerCancel);
                Ok(false)
            }
            Err(e) => {
                self.state.set(StateTag::HandlerException);
                Err(ParseError::handler(offset, e))
            }
        }
    }

    fn dispatch_string_value_or_config(&mut self, window: &ByteWindow<'_>, offset: usize, desc: &TokenDescriptor) -> Result<bool, ParseError> {
        if self.handlers.string_value.is_none() {
            return self.unhandled_continue(offset, desc.kind);
        }
        let value = build_str_value(&self.lexer, window, desc, &mut self.scratch_utf16);
        match self.handlers.string_value.as_mut().expect("checked above")(value) {
            Ok(true) => Ok(true),
            Ok(false) => {
                self.state.set(StateTag::HandlerCancel);
                Ok(false)
            }
            Err(e) => {
                self.state.set(StateTag::HandlerException);
                Err(ParseError::handler(offset, e))
            }
        }
    }

    fn dispatch_number_or_config(&mut self, window: &mut ByteWindow<'_>, offset: usize, desc: &TokenDescriptor) -> Result<bool, ParseError> {
        let payload = self.lexer.payload_bytes(window, desc);
        if self.handlers.raw_number.is_some() {
            let text = core::str::from_utf8(payload).expect("lexer guarantees ASCII number bytes");
            return match self.handlers.raw_number.as_mut().expect("checked above")(text) {
                Ok(true) => Ok(true),
                Ok(false) => {
                    self.state.set(StateTag::HandlerCancel);
                    Ok(false)
                }
                Err(e) => {
                    self.state.set(StateTag::HandlerException);
                    Err(ParseError::handler(offset, e))
                }
            };
        }
        match desc.kind {
            TokenKind::Integer => {
                if self.handlers.integer.is_none() {
                    return self.unhandled_continue(offset, TokenKind::Integer);
                }
                let negative = payload.first() == Some(&b'-');
                let digits = if negative { &payload[1..] } else { payload };
                let value = match numbers::parse_i64(digits, negative) {
                    Some(v) => v,
                    None => {
                        Self::rewind_to_token_start(window, offset, desc);
                        self.state.set(StateTag::ParseError);
                        return Err(ParseError::syntax(offset, SyntaxError::IntegerOverflow));
                    }
                };
                match self.handlers.integer.as_mut().expect("checked above")(value) {
                    Ok(true) => Ok(true),
                    Ok(false) => {
                        self.state.set(StateTag::HandlerCancel);
                        Ok(false)
                    }
                    Err(e) => {
                        self.state.set(StateTag::HandlerException);
                        Err(ParseError::handler(offset, e))
                    }
                }
            }
            TokenKind::Double => {
                if self.handlers.floating.is_none() {
                    return self.unhandled_continue(offset, TokenKind::Double);
                }
                let value = match numbers::parse_f64(payload) {
                    Some(v) => v,
                    None => {
                        Self::rewind_to_token_start(window, offset, desc);
                        self.state.set(StateTag::ParseError);
                        return Err(ParseError::syntax(offset, SyntaxError::FloatOverflow));
                    }
                };
                match self.handlers.floating.as_mut().expect("checked above")(value) {
                    Ok(true) => Ok(true),
                    Ok(false) => {
                        self.state.set(StateTag::HandlerCancel);
                        Ok(false)
                    }
                    Err(e) => {
                        self.state.set(StateTag::HandlerException);
                        Err(ParseError::handler(offset, e))
                    }
                }
            }
            _ => unreachable!("dispatch_number_or_config only called for Integer/Double tokens"),
        }
    }
}

macro_rules! unit_setter {
    ($name:ident, $field:ident) => {
        pub fn $name(mut self, f: impl FnMut() -> ContinueResult + 'static) -> Self {
            self.handlers.$field = Some(Box::new(f));
            self
        }
    };
}

/// Fluent builder for a [`Parser`]: registers options and zero or more
/// handlers, then validates the handler set at [`ParserBuilder::build`].
#[derive(Default)]
pub struct ParserBuilder {
    options: ParserOptions,
    handlers: Handlers,
}

impl ParserBuilder {
    pub fn new() -> Self {
        Self {
            options: ParserOptions::default(),
            handlers: Handlers::default(),
        }
    }

    pub fn options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    unit_setter!(on_object_open, object_open);
    unit_setter!(on_object_close, object_close);
    unit_setter!(on_array_open, array_open);
    unit_setter!(on_array_close, array_close);
    unit_setter!(on_null, null);

    pub fn on_object_key(mut self, f: impl FnMut(StrValue<'_>) -> ContinueResult + 'static) -> Self {
        self.handlers.object_key = Some(Box::new(f));
        self
    }

    pub fn on_string_value(mut self, f: impl FnMut(StrValue<'_>) -> ContinueResult + 'static) -> Self {
        self.handlers.string_value = Some(Box::new(f));
        self
    }

    pub fn on_boolean(mut self, f: impl FnMut(bool) -> ContinueResult + 'static) -> Self {
        self.handlers.boolean = Some(Box::new(f));
        self
    }

    pub fn on_integer(mut self, f: impl FnMut(i64) -> ContinueResult + 'static) -> Self {
        self.handlers.integer = Some(Box::new(f));
        self
    }

    pub fn on_floating(mut self, f: impl FnMut(f64) -> ContinueResult + 'static) -> Self {
        self.handlers.floating = Some(Box::new(f));
        self
    }

    pub fn on_raw_number(mut self, f: impl FnMut(&str) -> ContinueResult + 'static) -> Self {
        self.handlers.raw_number = Some(Box::new(f));
        self
    }

    pub fn on_reset(mut self, f: impl FnMut() + 'static) -> Self {
        self.handlers.reset_hook = Some(Box::new(f));
        self
    }

    /// Validates the handler set (spec §4.6 "Handler-set constraints") and
    /// builds the parser.
    pub fn build(self) -> Result<Parser, ConfigError> {
        if !self.handlers.has_any_token_handler() {
            return Err(ConfigError::NoHandlersRegistered);
        }
        if self.handlers.conflicting_number_handlers() {
            return Err(ConfigError::ConflictingNumberHandlers);
        }
        let lexer = Lexer::new(self.options.allow_comments, self.options.validate_utf8());
        Ok(Parser {
            lexer,
            state: StateStack::new(),
            handlers: self.handlers,
            options: self.options,
            scratch_utf16: Vec::new(),
        })
    }
}
