//! Most-probable-path decoding for discrete left-to-right hidden Markov models.
//!
//! A [`Model`] has a start state (index `0`) and an end state (the last
//! index), dense transition and emission tables, and a small integer
//! alphabet. [`decode`] runs the Viterbi algorithm over an
//! [`ExperimentData`] and returns one state index per observation.
//!
//! ```
//! use hmm_viterbi::{decode, Emission, ExperimentData, Model, Transition};
//!
//! let model = Model::build(
//!     &["begin", "fair", "loaded", "end"],
//!     2,
//!     &[
//!         Transition::new("begin", "fair", 0.5),
//!         Transition::new("begin", "loaded", 0.5),
//!         Transition::new("fair", "fair", 0.9),
//!         Transition::new("fair", "loaded", 0.1),
//!         Transition::new("loaded", "loaded", 0.9),
//!         Transition::new("loaded", "fair", 0.1),
//!     ],
//!     &[
//!         Emission::new("fair", 0, 0.5),
//!         Emission::new("fair", 1, 0.5),
//!         Emission::new("loaded", 0, 0.9),
//!         Emission::new("loaded", 1, 0.1),
//!     ],
//! )?;
//!
//! let data = ExperimentData::from_symbols(&[0, 0, 0, 0]);
//! let path = decode(&model, &data)?;
//! assert_eq!(model.path_names(&path), vec!["loaded"; 4]);
//! # Ok::<(), hmm_viterbi::Error>(())
//! ```

pub mod error;
pub mod hmm;

pub use error::{DecodeError, Error, LookupError, ParseError, Result, ValidationError};
pub use hmm::{
    build_model, decode, Emission, ExperimentData, Model, Observation, StateIndex, SymbolIndex,
    Transition, Viterbi, ViterbiConfig,
};
