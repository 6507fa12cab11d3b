//! Error types for circuit construction, evaluation and stream ingestion.

use crate::graph::{GateType, Value};
use thiserror::Error;

/// Errors produced by the simulator.
#[derive(Debug, Error)]
pub enum Error {
    /// A gate references a fan-in signal that is never defined.
    #[error("Cannot find fanin {fanin} for signal {gate}")]
    MissingFanin { fanin: String, gate: String },

    /// The same signal is driven by two definitions.
    #[error("Signal {0} is defined more than once")]
    DuplicateGate(String),

    /// An OUTPUT declaration names a signal that is never driven.
    #[error("Output {0} is not driven by any gate")]
    UndefinedOutput(String),

    /// Evaluation left gates waiting on each other.
    #[error("Feedback loop present in circuit among: {}", .gates.join(", "))]
    CircuitHasCycle { gates: Vec<String> },

    /// Evaluation finished without ever reaching some primary outputs.
    #[error("No path to primary output: {}", .outputs.join(", "))]
    OutputUnreachable { outputs: Vec<String> },

    /// The number of values does not match the number of primary inputs.
    #[error("Mismatch between numbers of inputs ({expected}) and values ({actual})")]
    InputLengthMismatch { expected: usize, actual: usize },

    /// A gate type token is not one of the recognized kinds.
    #[error("Invalid gate type `{token}` on line {line}")]
    InvalidGateType { token: String, line: usize },

    /// A bridge type token is neither AND nor OR.
    #[error("Invalid bridge type: {0}")]
    InvalidBridgeType(String),

    /// A bridge fault must couple at least two sites.
    #[error("Bridge fault needs at least two sites, got {0}")]
    BridgeTooNarrow(usize),

    /// A gate has a fan-in count its kind does not allow.
    #[error("Gate {gate} of type {ty} cannot have {count} fanin")]
    BadArity {
        gate: String,
        ty: GateType,
        count: usize,
    },

    /// A line of a strict input format could not be understood.
    #[error("Malformed line {line}: `{content}`")]
    MalformedLine { line: usize, content: String },

    /// A site name does not resolve to a signal of the circuit.
    #[error("Unknown site: {0}")]
    UnknownSite(String),

    /// A value token is not one of 0, 1, D, D_b or X.
    #[error("Invalid value `{0}`")]
    InvalidValue(String),

    /// A value was assigned to a signal that must be a primary input.
    #[error("Signal {0} is not a primary input")]
    NotAnInput(String),

    /// A stuck-at fault must hold a determined logic value.
    #[error("Fault value must be 0 or 1, got {0}")]
    InvalidFaultValue(Value),

    /// An algebra operation name other than AND, OR or XOR.
    #[error("Unrecognized optype {0}")]
    InvalidOperation(String),

    /// A gate kind that has no evaluation rule.
    #[error("Gate {gate} of type {ty} cannot be evaluated")]
    InvalidGateKind { gate: String, ty: GateType },

    /// A logic gate was evaluated with no fan-in to fold.
    #[error("Gate {0} has no fanin to evaluate")]
    EmptyFanin(String),

    #[error("Failed to parse configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
