//! Reader for the whitespace-separated model and experiment text formats.
//!
//! A model is written as
//!
//! ```text
//! <nstates> <name>...
//! <alphabet_size>
//! <ntransitions> (<from> <to> <probability>)...
//! <nemissions> (<state> <symbol> <probability>)...
//! ```
//!
//! and an experiment as `<nsteps> (<step> <state> <symbol>)...`. Symbols are
//! lowercase letters, `a` being symbol `0`; only the first character of a
//! symbol token is looked at. Line breaks carry no meaning.

use std::io::Read;
use std::str::SplitWhitespace;

use log::debug;

use crate::error::{ParseError, Result};
use crate::hmm::experiment::ExperimentData;
use crate::hmm::model::{Emission, Model, SymbolIndex, Transition};

/// Parse and validate a model description.
///
/// # Errors
///
/// Returns [`Error::Parse`](crate::Error::Parse) for malformed text and
/// [`Error::Validation`](crate::Error::Validation) for a well-formed but
/// invalid model.
///
/// # Example
///
/// ```
/// use hmm_viterbi::hmm::reader::read_model;
///
/// let model = read_model("3 begin mid end 1  2 begin mid 1.0 mid end 1.0  1 mid a 1.0").unwrap();
/// assert_eq!(model.num_states(), 3);
/// assert_eq!(model.emission(1, 0), 1.0);
/// ```
pub fn read_model(source: &str) -> Result<Model> {
    let mut tokens = Tokens::new(source);

    let nstates = tokens.next_usize("state count")?;
    let names = (0..nstates)
        .map(|_| tokens.next_token("state name"))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let alphabet_size = tokens.next_usize("alphabet size")?;

    let ntransitions = tokens.next_usize("transition count")?;
    let mut transitions = Vec::new();
    for _ in 0..ntransitions {
        let from = tokens.next_token("transition source")?;
        let to = tokens.next_token("transition target")?;
        let probability = tokens.next_f64("transition probability")?;
        transitions.push(Transition::new(from, to, probability));
    }

    let nemissions = tokens.next_usize("emission count")?;
    let mut emissions = Vec::new();
    for _ in 0..nemissions {
        let state = tokens.next_token("emitting state")?;
        let symbol = tokens.next_symbol("emitted symbol")?;
        let probability = tokens.next_f64("emission probability")?;
        emissions.push(Emission::new(state, symbol, probability));
    }

    debug!(
        "read model: {} states, {} transitions, {} emissions",
        nstates, ntransitions, nemissions
    );

    Ok(Model::build(&names[..], alphabet_size, &transitions, &emissions)?)
}

/// Parse an experiment, resolving state names against `model`.
///
/// # Errors
///
/// Returns [`Error::Parse`](crate::Error::Parse) for malformed text and
/// [`Error::Lookup`](crate::Error::Lookup) for an unknown state name.
pub fn read_experiment(model: &Model, source: &str) -> Result<ExperimentData> {
    let mut tokens = Tokens::new(source);

    let nsteps = tokens.next_usize("step count")?;
    let mut records = Vec::new();
    for _ in 0..nsteps {
        let step = tokens.next_usize("step number")?;
        let state = tokens.next_token("step state")?;
        let symbol = tokens.next_symbol("step symbol")?;
        records.push((step, state, symbol));
    }

    debug!("read experiment: {} steps", nsteps);

    Ok(ExperimentData::resolve(model, records)?)
}

/// [`read_model`] over any byte source.
pub fn read_model_from<R: Read>(mut reader: R) -> Result<Model> {
    let mut source = String::new();
    reader.read_to_string(&mut source)?;
    read_model(&source)
}

/// [`read_experiment`] over any byte source.
pub fn read_experiment_from<R: Read>(model: &Model, mut reader: R) -> Result<ExperimentData> {
    let mut source = String::new();
    reader.read_to_string(&mut source)?;
    read_experiment(model, &source)
}

/// Map a symbol token to its index by its first character.
pub fn symbol_index(token: &str) -> std::result::Result<SymbolIndex, ParseError> {
    match token.bytes().next() {
        Some(c @ b'a'..=b'z') => Ok(usize::from(c - b'a')),
        _ => Err(ParseError::InvalidSymbol(token.to_owned())),
    }
}

struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            inner: source.split_whitespace(),
        }
    }

    fn next_token(&mut self, what: &'static str) -> std::result::Result<&'a str, ParseError> {
        self.inner.next().ok_or(ParseError::UnexpectedEof(what))
    }

    fn next_usize(&mut self, what: &'static str) -> std::result::Result<usize, ParseError> {
        let token = self.next_token(what)?;
        token.parse().map_err(|_| ParseError::InvalidNumber {
            what,
            token: token.to_owned(),
        })
    }

    fn next_f64(&mut self, what: &'static str) -> std::result::Result<f64, ParseError> {
        let token = self.next_token(what)?;
        token.parse().map_err(|_| ParseError::InvalidNumber {
            what,
            token: token.to_owned(),
        })
    }

    fn next_symbol(&mut self, what: &'static str) -> std::result::Result<SymbolIndex, ParseError> {
        symbol_index(self.next_token(what)?)
    }
}
