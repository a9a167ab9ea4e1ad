//! Viterbi decoding: the single most probable hidden-state path.
//!
//! For observations `o_0..o_{T-1}` the decoder fills two `T x N` tables:
//!
//! - `sequence_probability[[t, s]]`: probability of the best state sequence
//!   explaining `o_0..=o_t` and ending in state `s`
//! - `back_pointer[[t, s]]`: the state at `t - 1` on that best sequence
//!
//! Predecessors are scanned in increasing index order and the running best is
//! replaced only on a strictly greater candidate, so ties always resolve to
//! the lowest-indexed state. The final state is chosen by the same rule.
//!
//! The returned path holds one state per observation. The start and end
//! states are implicit boundaries and are never added to it.

use log::{debug, trace, warn};
use ndarray::{Array2, ArrayView1};
use rayon::prelude::*;

use crate::error::DecodeError;
use crate::hmm::experiment::ExperimentData;
use crate::hmm::model::{Model, StateIndex, SymbolIndex};

/// The implicit predecessor of every state at time `0`.
pub const START_STATE: StateIndex = 0;

/// Probability of being in the start state before the first observation.
pub const BEGIN_STATE_PROBABILITY: f64 = 1.0;

/// Configuration options for the decoder.
#[derive(Debug, Clone)]
pub struct ViterbiConfig {
    /// Compute each time step's row across states on the rayon pool.
    pub parallel: bool,
    /// Smallest state count for which the parallel row scan is used.
    pub parallel_min_states: usize,
}

impl ViterbiConfig {
    /// Sequential decoding; parallel rows kick in at 64 states once enabled.
    pub fn new() -> Self {
        Self {
            parallel: false,
            parallel_min_states: 64,
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_parallel_min_states(mut self, parallel_min_states: usize) -> Self {
        self.parallel_min_states = parallel_min_states;
        self
    }

    fn use_parallel(&self, nstates: usize) -> bool {
        self.parallel && nstates >= self.parallel_min_states
    }
}

impl Default for ViterbiConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A decoded path together with its joint probability.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoding {
    pub path: Vec<StateIndex>,
    /// Joint probability of `path` and the observations.
    ///
    /// Never negative. Weights above `1.0` can overflow the products to
    /// `inf`, in which case the path is still a valid but arbitrary choice
    /// among the overflowing ones.
    pub probability: f64,
}

/// The filled dynamic-programming tables for one decoding run.
#[derive(Debug, Clone)]
pub struct ViterbiTable {
    sequence_probability: Array2<f64>,
    back_pointer: Array2<Option<StateIndex>>,
}

impl ViterbiTable {
    fn fill(model: &Model, symbols: &[SymbolIndex], config: &ViterbiConfig) -> Self {
        let maxtime = symbols.len();
        let nstates = model.num_states();
        let parallel = config.use_parallel(nstates);

        let mut sequence_probability = Array2::zeros((maxtime, nstates));
        let mut back_pointer = Array2::from_elem((maxtime, nstates), None);

        for cur in 0..nstates {
            sequence_probability[[0, cur]] = BEGIN_STATE_PROBABILITY
                * model.transition(START_STATE, cur)
                * model.emission(cur, symbols[0]);
        }

        for t in 1..maxtime {
            let symbol = symbols[t];
            let row: Vec<(f64, StateIndex)> = {
                let prev = sequence_probability.row(t - 1);
                if parallel {
                    (0..nstates)
                        .into_par_iter()
                        .map(|cur| best_transition_source(model, prev, cur, symbol))
                        .collect()
                } else {
                    (0..nstates)
                        .map(|cur| best_transition_source(model, prev, cur, symbol))
                        .collect()
                }
            };
            for (cur, (probability, source)) in row.into_iter().enumerate() {
                sequence_probability[[t, cur]] = probability;
                back_pointer[[t, cur]] = Some(source);
            }
            trace!("step {}: symbol {}", t, symbol);
        }

        Self {
            sequence_probability,
            back_pointer,
        }
    }

    /// Number of time steps covered.
    pub fn len(&self) -> usize {
        self.sequence_probability.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Best probability of any sequence for observations `0..=t` ending in `state`.
    ///
    /// # Panics
    ///
    /// Panics if `t` or `state` is out of range.
    pub fn probability(&self, t: usize, state: StateIndex) -> f64 {
        self.sequence_probability[[t, state]]
    }

    /// Predecessor of `state` at `t` on its best sequence.
    ///
    /// `None` at `t == 0`, where the predecessor is the implicit start state.
    ///
    /// # Panics
    ///
    /// Panics if `t` or `state` is out of range.
    pub fn back_pointer(&self, t: usize, state: StateIndex) -> Option<StateIndex> {
        self.back_pointer[[t, state]]
    }

    /// The state that ends the most probable sequence, or `None` for an empty table.
    pub fn best_final_state(&self) -> Option<StateIndex> {
        let last = self.len().checked_sub(1)?;
        Some(first_max_index(self.sequence_probability.row(last)))
    }

    /// Walk back pointers from `last_state` at the final step to time `0`.
    ///
    /// # Panics
    ///
    /// Panics if `last_state` is out of range.
    pub fn backtrack(&self, last_state: StateIndex) -> Vec<StateIndex> {
        let Some(mut t) = self.len().checked_sub(1) else {
            return Vec::new();
        };
        let mut state = last_state;
        let mut path = Vec::with_capacity(self.len());
        path.push(state);
        while let Some(prev) = self.back_pointer[[t, state]] {
            path.push(prev);
            state = prev;
            t -= 1;
        }
        path.reverse();
        debug_assert_eq!(path.len(), self.len());
        path
    }
}

/// A Viterbi decoder bound to one model.
#[derive(Debug, Clone)]
pub struct Viterbi<'m> {
    model: &'m Model,
    config: ViterbiConfig,
}

impl<'m> Viterbi<'m> {
    pub fn new(model: &'m Model) -> Self {
        Self {
            model,
            config: ViterbiConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ViterbiConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ViterbiConfig {
        &self.config
    }

    /// Fill the DP tables for `data` without extracting a path.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::EmptyObservations`] if `data` has no observations
    /// - [`DecodeError::SymbolOutOfRange`] if a symbol is outside the model's alphabet
    pub fn table(&self, data: &ExperimentData) -> Result<ViterbiTable, DecodeError> {
        let symbols = self.checked_symbols(data)?;
        debug!(
            "viterbi: {} observations over {} states",
            symbols.len(),
            self.model.num_states()
        );
        Ok(ViterbiTable::fill(self.model, &symbols, &self.config))
    }

    /// Most probable state sequence and its probability.
    pub fn decode_detailed(&self, data: &ExperimentData) -> Result<Decoding, DecodeError> {
        let table = self.table(data)?;
        let last_state = table
            .best_final_state()
            .ok_or(DecodeError::EmptyObservations)?;
        let probability = table.probability(table.len() - 1, last_state);
        if probability == 0.0 {
            warn!("no observation path has non-zero probability; returning the lowest-index path");
        } else if !probability.is_finite() {
            warn!("path probability overflowed to {}", probability);
        }
        Ok(Decoding {
            path: table.backtrack(last_state),
            probability,
        })
    }

    /// Most probable state sequence, one state per observation.
    pub fn decode(&self, data: &ExperimentData) -> Result<Vec<StateIndex>, DecodeError> {
        self.decode_detailed(data).map(|d| d.path)
    }

    fn checked_symbols(&self, data: &ExperimentData) -> Result<Vec<SymbolIndex>, DecodeError> {
        if data.is_empty() {
            return Err(DecodeError::EmptyObservations);
        }
        let alphabet_size = self.model.alphabet_size();
        data.observations()
            .iter()
            .enumerate()
            .map(|(step, o)| {
                if o.symbol < alphabet_size {
                    Ok(o.symbol)
                } else {
                    Err(DecodeError::SymbolOutOfRange {
                        step,
                        symbol: o.symbol,
                        alphabet_size,
                    })
                }
            })
            .collect()
    }
}

/// Decode the most probable state sequence with the default configuration.
///
/// # Example
///
/// ```
/// use hmm_viterbi::hmm::{decode, Emission, ExperimentData, Model, Transition};
///
/// let model = Model::build(
///     &["begin", "mid", "end"],
///     1,
///     &[Transition::new("begin", "mid", 1.0), Transition::new("mid", "end", 1.0)],
///     &[Emission::new("mid", 0, 1.0)],
/// )
/// .unwrap();
///
/// let path = decode(&model, &ExperimentData::from_symbols(&[0])).unwrap();
/// assert_eq!(path, vec![1]);
/// ```
pub fn decode(model: &Model, data: &ExperimentData) -> Result<Vec<StateIndex>, DecodeError> {
    Viterbi::new(model).decode(data)
}

/// Best predecessor of `cur` given the previous row, with its probability.
///
/// The start-state candidate seeds the scan. The start state never emits, so
/// that candidate is `0.0` and the result is never negative.
fn best_transition_source(
    model: &Model,
    prev_row: ArrayView1<'_, f64>,
    cur: StateIndex,
    symbol: SymbolIndex,
) -> (f64, StateIndex) {
    let emit = model.emission(cur, symbol);
    let mut best_prob = prev_row[START_STATE] * model.transition(START_STATE, cur) * emit;
    let mut best_prev = START_STATE;
    for (prev, &prev_prob) in prev_row.iter().enumerate().skip(START_STATE + 1) {
        let candidate = prev_prob * model.transition(prev, cur) * emit;
        if candidate > best_prob {
            best_prob = candidate;
            best_prev = prev;
        }
    }
    (best_prob, best_prev)
}

/// Index of the first maximum; later equal values do not replace it.
fn first_max_index(row: ArrayView1<'_, f64>) -> StateIndex {
    let mut best = 0;
    for (i, &p) in row.iter().enumerate() {
        if p > row[best] {
            best = i;
        }
    }
    best
}
