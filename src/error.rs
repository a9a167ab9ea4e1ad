//! Error types for model construction, decoding and text reading.

use thiserror::Error;

/// Rejections raised while building a [`Model`](crate::hmm::Model).
///
/// Every variant is fatal: no partially populated model is ever returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A model needs distinct start and end states.
    #[error("model needs at least 2 states (start and end), got {0}")]
    TooFewStates(usize),

    /// The same name was given to two states.
    #[error("state name '{0}' is used more than once")]
    DuplicateState(String),

    #[error("alphabet size must be > 0")]
    EmptyAlphabet,

    /// A dense table of `rows x cols` probabilities cannot be addressed.
    #[error("a {rows} x {cols} probability table is too large")]
    TableTooLarge { rows: usize, cols: usize },

    /// A transition leaves the end state.
    #[error("transition from end state '{from}' to '{to}' is forbidden")]
    TransitionFromEnd { from: String, to: String },

    /// A transition enters the start state.
    #[error("transition from '{from}' to start state '{to}' is forbidden")]
    TransitionToStart { from: String, to: String },

    /// An emission is attached to the start or end state.
    #[error("emission from boundary state '{state}' is forbidden")]
    BoundaryEmission { state: String },

    #[error("unknown state '{0}'")]
    UnknownState(String),

    #[error("symbol {symbol} is outside the alphabet of size {alphabet_size}")]
    SymbolOutOfRange { symbol: usize, alphabet_size: usize },

    /// Probabilities must be finite and non-negative. No upper bound is checked.
    #[error("probability {0} is not a finite non-negative number")]
    InvalidProbability(f64),
}

/// Rejections raised by the Viterbi decoder before any table is filled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("empty observation sequence")]
    EmptyObservations,

    #[error("observation {step} has symbol {symbol}, outside the alphabet of size {alphabet_size}")]
    SymbolOutOfRange {
        step: usize,
        symbol: usize,
        alphabet_size: usize,
    },
}

/// Failure to resolve a state name against a built model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("state '{0}' is not part of the model")]
    UnknownState(String),
}

/// Malformed text handed to the reader.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unexpected end of input while reading {0}")]
    UnexpectedEof(&'static str),

    #[error("cannot read {what} from token '{token}'")]
    InvalidNumber { what: &'static str, token: String },

    /// Symbols are single lowercase letters.
    #[error("symbol token '{0}' is not a lowercase letter")]
    InvalidSymbol(String),
}

/// Unified error type for everything the crate can fail at.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid model: {0}")]
    Validation(#[from] ValidationError),

    #[error("decoding failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("lookup failed: {0}")]
    Lookup(#[from] LookupError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// I/O error while reading a model or an experiment.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used by the reader and by callers chaining operations.
pub type Result<T> = std::result::Result<T, Error>;
