use thiserror::Error;

/// Argument parsing error.
///
/// Raised when the parsed argument vector itself is at fault. Every variant
/// carries the offending option name or token. A `ParseError` aborts the whole
/// parse call; no partial [`ParseResult`](crate::ParseResult) is produced.
///
/// Unknown options deliberately do not produce a `ParseError`: they degrade to
/// a single-line diagnostic so that options meant for a different consumer can
/// pass through.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The same option was recognized twice within one parse call.
    #[error("parse error, option '{0}' is defined twice")]
    DuplicateOption(String),

    /// A value-taking option had no `=value` suffix, or reached the end of
    /// the argument vector before its value.
    #[error("parse error, option '{0}' requires an argument, but none is given")]
    MissingValue(String),

    /// Two value-consuming options collided within one short-option chain.
    #[error("parse error, multiple options with required arguments defined in the same group '{0}'")]
    ArgGroupingConflict(String),

    /// The first non-option token matched no declared subcommand.
    #[error("parse error, '{0}' is not a valid subcommand")]
    NoMatchingSubcommand(String),
}

impl ParseError {
    /// The option name or token that caused parsing to fail.
    pub fn offender(&self) -> &str {
        match self {
            ParseError::DuplicateOption(name) | ParseError::MissingValue(name) => name,
            ParseError::ArgGroupingConflict(token) | ParseError::NoMatchingSubcommand(token) => token,
        }
    }
}

/// A mistake in how the library is used, as opposed to bad command line input.
///
/// Usage errors surface at definition, registration or query time and are
/// never deferred to the middle of a parse. They indicate a defect in the
/// calling program rather than something a user typed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("option name cannot be empty")]
    EmptyName,

    #[error("option name '{0}' cannot contain spaces")]
    NameContainsSpace(String),

    #[error("option shorthand cannot be a space")]
    SpaceShorthand,

    /// A value-taking option was built without a converter, either because
    /// its type has no default in the registry or no override was supplied.
    #[error("option '{0}' has no value converter")]
    MissingConverter(String),

    #[error("subcommand name cannot be empty")]
    EmptySubcommandName,

    /// A result was queried with a descriptor that was never registered with
    /// the parser that produced it.
    #[error("option '{0}' is not registered with this parser")]
    UnknownOption(String),

    #[error("option '{0}' was not set")]
    NotSet(String),

    #[error("option '{0}' does not take a value")]
    TakesNoValue(String),

    /// The value was queried through a same-named descriptor declaring a
    /// different value type than the one that parsed it.
    #[error("option '{0}' was not queried with its value type")]
    ValueTypeMismatch(String),
}
