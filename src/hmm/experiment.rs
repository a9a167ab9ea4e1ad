//! Observed symbol sequences with their ground-truth state labels.

use crate::error::LookupError;
use crate::hmm::model::{Model, StateIndex, SymbolIndex};

/// One discrete time step of an experiment.
///
/// `state` is the ground-truth label, kept for accuracy reporting only; the
/// decoder reads nothing but `symbol`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub step: usize,
    pub state: StateIndex,
    pub symbol: SymbolIndex,
}

impl Observation {
    pub fn new(step: usize, state: StateIndex, symbol: SymbolIndex) -> Self {
        Self {
            step,
            state,
            symbol,
        }
    }
}

/// Time-ordered observations for a single decoding run.
///
/// Only the order of the records matters; `step` numbers are carried along
/// but never interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExperimentData {
    observations: Vec<Observation>,
    labelled: bool,
}

impl ExperimentData {
    /// Observations whose `state` fields are real ground-truth labels.
    pub fn new(observations: Vec<Observation>) -> Self {
        Self {
            observations,
            labelled: true,
        }
    }

    /// Build an unlabelled experiment from bare symbols, numbering steps from
    /// zero.
    ///
    /// The `state` fields hold the start state as a placeholder and
    /// [`ground_truth`](Self::ground_truth) returns `None`.
    pub fn from_symbols(symbols: &[SymbolIndex]) -> Self {
        let observations = symbols
            .iter()
            .enumerate()
            .map(|(step, &symbol)| Observation::new(step, 0, symbol))
            .collect();
        Self {
            observations,
            labelled: false,
        }
    }

    /// Resolve `(step, state name, symbol)` records against `model`.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::UnknownState`] for the first record whose state
    /// name the model does not know.
    pub fn resolve<'a, I>(model: &Model, records: I) -> Result<Self, LookupError>
    where
        I: IntoIterator<Item = (usize, &'a str, SymbolIndex)>,
    {
        let observations = records
            .into_iter()
            .map(|(step, name, symbol)| {
                model
                    .state_index(name)
                    .map(|state| Observation::new(step, state, symbol))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(observations))
    }

    /// Number of time steps (`maxtime`).
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Emitted symbols in time order.
    pub fn symbols(&self) -> impl Iterator<Item = SymbolIndex> + '_ {
        self.observations.iter().map(|o| o.symbol)
    }

    /// Whether the observations carry ground-truth labels.
    pub fn is_labelled(&self) -> bool {
        self.labelled
    }

    /// Ground-truth states in time order, or `None` for an unlabelled run.
    pub fn ground_truth(&self) -> Option<Vec<StateIndex>> {
        self.labelled
            .then(|| self.observations.iter().map(|o| o.state).collect())
    }
}

impl FromIterator<Observation> for ExperimentData {
    fn from_iter<T: IntoIterator<Item = Observation>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
