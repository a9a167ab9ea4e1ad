pub mod experiment;
pub mod model;
pub mod reader;
pub mod viterbi;

// Re-export the model and decoder with descriptive names
pub use experiment::{ExperimentData, Observation};
pub use model::{build_model, Emission, Model, StateIndex, SymbolIndex, Transition};
pub use reader::{read_experiment, read_model};
pub use viterbi::{decode, Decoding, Viterbi, ViterbiConfig, ViterbiTable};
