//! Parser configuration (spec §4.6 "Configuration (enumerated)"), in the
//! style of the teacher's `options.rs`: a plain `Copy`, `Default`-deriving
//! struct with one doc comment per field.

/// How the parser behaves once it has produced one complete top-level
/// value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TopLevelStrategy {
    /// Require end-of-input after the single top-level value (besides
    /// trailing whitespace, which is silently accepted). Any other trailing
    /// token is a `"trailing garbage"` error. This is the default.
    #[default]
    SingleObject,
    /// Accept a complete top-level value and then stop looking at the rest
    /// of the input entirely — whatever follows (garbage or not) is never
    /// lexed.
    AllowTrailingGarbage,
    /// After a complete top-level value, accept another one: `parse`
    /// returns to `GotValue` and keeps driving the state machine across
    /// any number of top-level values.
    AllowMultipleValues,
}

/// Parser configuration. All boolean options default to `false`, matching
/// the teacher's `ParserOptions` convention that the permissive defaults
/// are the ones requiring an explicit opt-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Allow `//` and `/* */` comments outside of strings. When `false`,
    /// a bare `/` outside a string is a lexical error.
    pub allow_comments: bool,
    /// Skip UTF-8 validation of string bodies. When `false` (the default),
    /// the lexer enforces well-formed UTF-8 per RFC 3629.
    pub dont_validate_strings: bool,
    /// When `finish()` is called and the state stack is not in a complete
    /// state, treat this as success instead of a `"premature EOF"` error.
    pub allow_partial_values: bool,
    /// When a token arrives for which no handler is registered, raise a
    /// configuration error instead of silently dropping it. Default `true`.
    pub each_token_must_be_handled: bool,
    /// What happens after a complete top-level value has been parsed.
    pub top_level_strategy: TopLevelStrategy,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            allow_comments: false,
            dont_validate_strings: false,
            allow_partial_values: false,
            each_token_must_be_handled: true,
            top_level_strategy: TopLevelStrategy::default(),
        }
    }
}

impl ParserOptions {
    /// Whether the lexer should enforce UTF-8 validity of string bodies.
    pub(crate) fn validate_utf8(&self) -> bool {
        !self.dont_validate_strings
    }
}
