//! Validated left-to-right HMM topology and probability tables.
//!
//! States are addressed by dense indices assigned in the order their names are
//! given: index `0` is the start state and the last index is the end state.
//! Neither boundary state emits symbols, nothing enters the start state and
//! nothing leaves the end state.

use std::collections::HashMap;

use log::debug;
use ndarray::{Array2, ArrayView2};

use crate::error::{LookupError, ValidationError};

/// Dense index of a hidden state, in `[0, num_states)`.
pub type StateIndex = usize;

/// Dense index of an emitted symbol, in `[0, alphabet_size)`.
pub type SymbolIndex = usize;

/// A `(from, to, probability)` triple referencing states by name.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub from: String,
    pub to: String,
    pub probability: f64,
}

impl Transition {
    pub fn new(from: impl Into<String>, to: impl Into<String>, probability: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            probability,
        }
    }
}

/// A `(state, symbol, probability)` triple referencing the state by name.
#[derive(Debug, Clone, PartialEq)]
pub struct Emission {
    pub state: String,
    pub symbol: SymbolIndex,
    pub probability: f64,
}

impl Emission {
    pub fn new(state: impl Into<String>, symbol: SymbolIndex, probability: f64) -> Self {
        Self {
            state: state.into(),
            symbol,
            probability,
        }
    }
}

/// A discrete Hidden Markov Model with designated start and end states.
///
/// - `transition[[i, j]]`: probability of moving from state `i` to state `j`
/// - `emission[[s, k]]`: probability that state `s` emits symbol `k`
///
/// Both tables are dense; entries that were never specified hold `0.0`.
/// A `Model` is immutable once built and can be shared between any number of
/// decoding runs, including across threads.
#[derive(Debug, Clone)]
pub struct Model {
    state_names: Vec<String>,
    state_index: HashMap<String, StateIndex>,
    alphabet_size: usize,
    transition: Array2<f64>,
    emission: Array2<f64>,
}

impl Model {
    /// Build a model from state names, an alphabet size and probability triples.
    ///
    /// The position of each name in `state_names` becomes its index. When the
    /// same cell is given more than once the last triple wins.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if:
    /// - fewer than two states are named, or a name repeats
    /// - `alphabet_size` is zero, or a table would be too large to address
    /// - a triple names an unknown state or a symbol outside the alphabet
    /// - a transition leaves the end state or enters the start state
    /// - an emission is attached to the start or end state
    /// - a probability is negative, infinite or NaN
    ///
    /// # Example
    ///
    /// ```
    /// use hmm_viterbi::hmm::{Emission, Model, Transition};
    ///
    /// let model = Model::build(
    ///     &["begin", "mid", "end"],
    ///     1,
    ///     &[Transition::new("begin", "mid", 1.0), Transition::new("mid", "end", 1.0)],
    ///     &[Emission::new("mid", 0, 1.0)],
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(model.num_states(), 3);
    /// assert_eq!(model.state_index("mid"), Ok(1));
    /// assert_eq!(model.transition(0, 1), 1.0);
    /// ```
    pub fn build<S: AsRef<str>>(
        state_names: &[S],
        alphabet_size: usize,
        transitions: &[Transition],
        emissions: &[Emission],
    ) -> Result<Self, ValidationError> {
        let nstates = state_names.len();
        if nstates < 2 {
            return Err(ValidationError::TooFewStates(nstates));
        }

        let mut state_index = HashMap::with_capacity(nstates);
        for (i, name) in state_names.iter().enumerate() {
            let name = name.as_ref();
            if state_index.insert(name.to_owned(), i).is_some() {
                return Err(ValidationError::DuplicateState(name.to_owned()));
            }
        }

        if alphabet_size == 0 {
            return Err(ValidationError::EmptyAlphabet);
        }

        let end = nstates - 1;

        let mut transition = zeroed_table(nstates, nstates)?;
        for t in transitions {
            let from = resolve(&state_index, &t.from)?;
            let to = resolve(&state_index, &t.to)?;
            if from == end {
                return Err(ValidationError::TransitionFromEnd {
                    from: t.from.clone(),
                    to: t.to.clone(),
                });
            }
            if to == 0 {
                return Err(ValidationError::TransitionToStart {
                    from: t.from.clone(),
                    to: t.to.clone(),
                });
            }
            transition[[from, to]] = check_probability(t.probability)?;
        }

        let mut emission = zeroed_table(nstates, alphabet_size)?;
        for e in emissions {
            let state = resolve(&state_index, &e.state)?;
            if state == 0 || state == end {
                return Err(ValidationError::BoundaryEmission {
                    state: e.state.clone(),
                });
            }
            if e.symbol >= alphabet_size {
                return Err(ValidationError::SymbolOutOfRange {
                    symbol: e.symbol,
                    alphabet_size,
                });
            }
            emission[[state, e.symbol]] = check_probability(e.probability)?;
        }

        debug!(
            "built model: {} states, alphabet of {}, {} transitions, {} emissions",
            nstates,
            alphabet_size,
            transitions.len(),
            emissions.len()
        );

        Ok(Self {
            state_names: state_names.iter().map(|s| s.as_ref().to_owned()).collect(),
            state_index,
            alphabet_size,
            transition,
            emission,
        })
    }

    /// Number of states, boundary states included.
    pub fn num_states(&self) -> usize {
        self.state_names.len()
    }

    pub fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    /// Index of the start state, always `0`.
    pub fn start_state(&self) -> StateIndex {
        0
    }

    /// Index of the end state, always `num_states() - 1`.
    pub fn end_state(&self) -> StateIndex {
        self.num_states() - 1
    }

    /// Resolve a state name to its index.
    pub fn state_index(&self, name: &str) -> Result<StateIndex, LookupError> {
        self.state_index
            .get(name)
            .copied()
            .ok_or_else(|| LookupError::UnknownState(name.to_owned()))
    }

    /// Name of the state at `index`, or `None` if out of range.
    pub fn state_name(&self, index: StateIndex) -> Option<&str> {
        self.state_names.get(index).map(String::as_str)
    }

    /// State names in index order.
    pub fn state_names(&self) -> &[String] {
        &self.state_names
    }

    /// Translate a decoded path into state names.
    ///
    /// # Panics
    ///
    /// Panics if `path` holds an index outside the model.
    pub fn path_names(&self, path: &[StateIndex]) -> Vec<&str> {
        path.iter().map(|&s| self.state_names[s].as_str()).collect()
    }

    /// Probability of moving from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is outside the model.
    pub fn transition(&self, from: StateIndex, to: StateIndex) -> f64 {
        self.transition[[from, to]]
    }

    /// Probability that `state` emits `symbol`.
    ///
    /// # Panics
    ///
    /// Panics if `state` or `symbol` is out of range.
    pub fn emission(&self, state: StateIndex, symbol: SymbolIndex) -> f64 {
        self.emission[[state, symbol]]
    }

    /// The full `num_states x num_states` transition table.
    pub fn transitions(&self) -> ArrayView2<'_, f64> {
        self.transition.view()
    }

    /// The full `num_states x alphabet_size` emission table.
    pub fn emissions(&self) -> ArrayView2<'_, f64> {
        self.emission.view()
    }
}

/// Free-function form of [`Model::build`].
pub fn build_model<S: AsRef<str>>(
    state_names: &[S],
    alphabet_size: usize,
    transitions: &[Transition],
    emissions: &[Emission],
) -> Result<Model, ValidationError> {
    Model::build(state_names, alphabet_size, transitions, emissions)
}

fn resolve(index: &HashMap<String, StateIndex>, name: &str) -> Result<StateIndex, ValidationError> {
    index
        .get(name)
        .copied()
        .ok_or_else(|| ValidationError::UnknownState(name.to_owned()))
}

/// A zero-filled `rows x cols` table, or `TableTooLarge` when its byte size
/// does not fit in `isize`.
fn zeroed_table(rows: usize, cols: usize) -> Result<Array2<f64>, ValidationError> {
    rows.checked_mul(cols)
        .and_then(|len| len.checked_mul(std::mem::size_of::<f64>()))
        .filter(|&bytes| bytes <= isize::MAX as usize)
        .ok_or(ValidationError::TableTooLarge { rows, cols })?;
    Ok(Array2::zeros((rows, cols)))
}

fn check_probability(p: f64) -> Result<f64, ValidationError> {
    if p.is_finite() && p >= 0.0 {
        Ok(p)
    } else {
        Err(ValidationError::InvalidProbability(p))
    }
}
