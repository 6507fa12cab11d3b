use super::value::{Op, Value};
use crate::error::{Error, Result};
use indexmap::IndexSet;
use smallvec::SmallVec;
use std::fmt::{self, Display, Formatter};
use strum::{EnumIter, EnumString};
use tracing::trace;

/// Represents the index of a gate in a [super::Circuit].
#[repr(transparent)]
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub struct GateIndex {
    pub(super) idx: usize,
}

/// Returns a new GateIndex from a provided usize.
macro_rules! gi {
    ( $x:expr ) => {{
        GateIndex::new($x)
    }};
}

impl GateIndex {
    /// Returns a new GateIndex from a provided usize.
    pub(crate) const fn new(idx: usize) -> GateIndex {
        GateIndex { idx }
    }

    /// Returns the position of the gate in its circuit's arena.
    pub fn idx(&self) -> usize {
        self.idx
    }
}

impl Display for GateIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.idx)
    }
}

/// Enum representing the kinds of gates a circuit description can declare.
///
/// Parsing is case insensitive and display is upper case, matching the description format.
///
/// # Example
/// ```
/// # use rothsim::graph::GateType;
/// assert_eq!("nand".parse::<GateType>().unwrap(), GateType::Nand);
/// assert_eq!(GateType::Buff.to_string(), "BUFF");
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, EnumString, strum::Display, EnumIter)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum GateType {
    And,
    Nand,
    Or,
    Nor,
    Xor,
    Xnor,
    Buff,
    Not,
    /// Placeholder, always evaluates to [Value::X].
    Dff,
    Input,
    Undefined,
}
use GateType::*;

impl GateType {
    /// Returns the operation folded over the fan-in of multi input gates.
    pub fn op(&self) -> Option<Op> {
        match self {
            And | Nand => Some(Op::And),
            Or | Nor => Some(Op::Or),
            Xor | Xnor => Some(Op::Xor),
            Buff | Not | Dff | Input | Undefined => None,
        }
    }

    /// Returns true if `self` is [Not], [Nor], [Nand] or [Xnor].
    pub fn is_negated(&self) -> bool {
        matches!(self, Nor | Nand | Not | Xnor)
    }

    /// Returns true if the value of the gate doesn't depend on its fan-in during a pass.
    ///
    /// Sources are marked as visited before an evaluation pass starts, this is what lets
    /// a loop through a [Dff] evaluate without being reported as a feedback loop.
    pub fn is_source(&self) -> bool {
        matches!(self, Input | Dff | Undefined)
    }

    /// Returns true if a gate of this kind may have `count` fan-in.
    pub fn accepts_fanin(&self, count: usize) -> bool {
        match self {
            And | Nand | Or | Nor | Xor | Xnor => count >= 1,
            Buff | Not | Dff => count == 1,
            Input => count == 0,
            Undefined => true,
        }
    }
}

/// Amount of fan-in kept inline for a gate.
/// If a gate has more than GATE_FANIN_TINYVEC_SIZE, they will spill into the heap.
pub(super) const GATE_FANIN_TINYVEC_SIZE: usize = 2;

/// A single gate: its kind, its ordered fan-in, the set of gates it feeds and its current value.
///
/// A gate is named after the signal it drives. Fan-in and fan-out are indices into the owning
/// circuit, gates never own each other.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Gate {
    pub(super) name: String,
    pub(super) ty: GateType,
    pub(super) fanin: SmallVec<[GateIndex; GATE_FANIN_TINYVEC_SIZE]>,
    pub(super) fanout: IndexSet<GateIndex>,
    pub(super) value: Value,
    pub(super) output: bool,
}

impl Gate {
    /// Returns a new [Gate] with no edges and an unknown value.
    pub(super) fn new(name: String, ty: GateType) -> Self {
        Gate {
            name,
            ty,
            fanin: SmallVec::new(),
            fanout: IndexSet::new(),
            value: Value::X,
            output: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> GateType {
        self.ty
    }

    pub fn fanin(&self) -> &[GateIndex] {
        &self.fanin
    }

    pub fn fanout(&self) -> &IndexSet<GateIndex> {
        &self.fanout
    }

    pub fn value(&self) -> Value {
        self.value
    }

    /// Returns true if the gate drives a primary output.
    pub fn is_output(&self) -> bool {
        self.output
    }

    /// Calculates the value of the gate from the values of its fan-in, read through `lookup`.
    ///
    /// # Errors
    ///
    /// [Error::InvalidGateKind] if `self` is an [Input], inputs are assigned, never evaluated.
    ///
    /// [Error::EmptyFanin] if a gate that needs fan-in has none.
    pub fn compute<F: Fn(GateIndex) -> Value>(&self, lookup: F) -> Result<Value> {
        let value = match self.ty {
            And | Nand | Or | Nor | Xor | Xnor => {
                let op = self.ty.op().ok_or_else(|| self.invalid_kind())?;
                let folded = op
                    .fold(self.fanin.iter().map(|dep| lookup(*dep)))
                    .ok_or_else(|| Error::EmptyFanin(self.name.clone()))?;
                if self.ty.is_negated() {
                    folded.invert()
                } else {
                    folded
                }
            }
            Buff => self.single_fanin(&lookup)?,
            Not => self.single_fanin(&lookup)?.invert(),
            Dff | Undefined => Value::X,
            Input => return Err(self.invalid_kind()),
        };
        let inputs: SmallVec<[Value; 4]> = self.fanin.iter().map(|dep| lookup(*dep)).collect();
        trace!(
            gate = %self.name,
            ty = %self.ty,
            ?inputs,
            result = %value,
            "gate eval"
        );
        Ok(value)
    }

    /// Calculates the value of the gate with [Gate::compute] and stores it.
    pub fn evaluate<F: Fn(GateIndex) -> Value>(&mut self, lookup: F) -> Result<Value> {
        let value = self.compute(lookup)?;
        self.value = value;
        Ok(value)
    }

    fn single_fanin<F: Fn(GateIndex) -> Value>(&self, lookup: &F) -> Result<Value> {
        self.fanin
            .first()
            .map(|dep| lookup(*dep))
            .ok_or_else(|| Error::EmptyFanin(self.name.clone()))
    }

    fn invalid_kind(&self) -> Error {
        Error::InvalidGateKind {
            gate: self.name.clone(),
            ty: self.ty,
        }
    }
}
