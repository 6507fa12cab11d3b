use super::gate::*;
use super::Circuit;
use crate::error::{Error, Result};
use casey::pascal;
use indexmap::{IndexMap, IndexSet};
use smallvec::SmallVec;
use tracing::debug;

use GateType::*;

/// Creates a named constructor for every gate kind, `and` declares an [And] gate and so on.
macro_rules! gate_constructors {
    ($name:ident,$($rest:ident),*) => {
        gate_constructors!($name);
        gate_constructors!($($rest),*);
    };
    ($name:ident) => {
        #[doc=concat!(
            "Declares a new `",
            stringify!($name),
            "` gate driving signal `name`, fed by the signals in `fanin` in order.\n\n",
            "Fan-in names are only resolved by [CircuitBuilder::build], so they may be declared later."
        )]
        pub fn $name<S, I, T>(&mut self, name: S, fanin: I) -> &mut Self
        where
            S: Into<String>,
            I: IntoIterator<Item = T>,
            T: Into<String>,
        {
            self.gate(name, pascal!($name), fanin)
        }
    };
}

/// A gate as declared, with its fan-in still referenced by name.
#[derive(Debug, Clone, Eq, PartialEq)]
struct Declaration {
    name: String,
    ty: GateType,
    fanin: SmallVec<[String; GATE_FANIN_TINYVEC_SIZE]>,
}

/// Collects gate declarations and turns them into a [Circuit].
///
/// Declarations can come in any order, a gate may name fan-in that is declared after it.
/// Nothing is checked until [CircuitBuilder::build] is called.
///
/// # Example
/// ```
/// # use rothsim::graph::{CircuitBuilder, Value};
/// let mut b = CircuitBuilder::new();
/// b.input("A").input("B").output("Y");
/// b.and("Y", ["A", "B"]);
///
/// let mut circuit = b.build().unwrap();
/// circuit.set_inputs(&[Value::One, Value::D]).unwrap();
/// circuit.evaluate().unwrap();
///
/// assert_eq!(circuit.outputs().collect::<Vec<_>>(), vec![Value::D]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CircuitBuilder {
    decls: Vec<Declaration>,
    outputs: IndexSet<String>,
}

impl CircuitBuilder {
    /// Returns an empty [CircuitBuilder].
    pub fn new() -> Self {
        Default::default()
    }

    /// Declares a primary input, inputs are ordered by declaration.
    pub fn input<S: Into<String>>(&mut self, name: S) -> &mut Self {
        self.gate(name, Input, std::iter::empty::<String>())
    }

    /// Declares the signal `name` as a primary output, outputs are ordered by declaration.
    ///
    /// This doesn't create a gate, declaring the same output twice has no effect.
    pub fn output<S: Into<String>>(&mut self, name: S) -> &mut Self {
        self.outputs.insert(name.into());
        self
    }

    /// Declares a gate of kind `ty` driving signal `name`, fed by the signals in `fanin` in order.
    pub fn gate<S, I, T>(&mut self, name: S, ty: GateType, fanin: I) -> &mut Self
    where
        S: Into<String>,
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.decls.push(Declaration {
            name: name.into(),
            ty,
            fanin: fanin.into_iter().map(Into::into).collect(),
        });
        self
    }

    gate_constructors!(and, nand, or, nor, xor, xnor, buff, not, dff);

    /// Returns the number of gates declared so far, inputs included.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    /// Returns a new [Circuit] with every fan-in resolved.
    ///
    /// The first pass instantiates the gates and records the primary inputs,
    /// the second pass resolves fan-in names and fills in the fan-out of every gate.
    ///
    /// # Errors
    ///
    /// [Error::DuplicateGate] if two declarations drive the same signal.
    ///
    /// [Error::BadArity] if a gate has a fan-in count its kind doesn't accept.
    ///
    /// [Error::MissingFanin] if a fan-in name was never declared.
    ///
    /// [Error::UndefinedOutput] if an output names a signal that was never declared.
    pub fn build(self) -> Result<Circuit> {
        let CircuitBuilder { decls, outputs } = self;

        let mut gates = Vec::with_capacity(decls.len());
        let mut names = IndexMap::<String, GateIndex>::with_capacity(decls.len());
        let mut inputs = Vec::new();

        for (i, decl) in decls.iter().enumerate() {
            if names.contains_key(&decl.name) {
                return Err(Error::DuplicateGate(decl.name.clone()));
            }
            if !decl.ty.accepts_fanin(decl.fanin.len()) {
                return Err(Error::BadArity {
                    gate: decl.name.clone(),
                    ty: decl.ty,
                    count: decl.fanin.len(),
                });
            }
            let idx = gi!(i);
            names.insert(decl.name.clone(), idx);
            if decl.ty == Input {
                inputs.push(idx);
            }
            gates.push(Gate::new(decl.name.clone(), decl.ty));
        }
        debug!(gates = gates.len(), inputs = inputs.len(), "gates instantiated");

        for (i, decl) in decls.iter().enumerate() {
            for fanin in &decl.fanin {
                let dep = *names.get(fanin).ok_or_else(|| Error::MissingFanin {
                    fanin: fanin.clone(),
                    gate: decl.name.clone(),
                })?;
                gates[i].fanin.push(dep);
                gates[dep.idx].fanout.insert(gi!(i));
            }
        }

        let mut output_indices = Vec::with_capacity(outputs.len());
        for output in outputs {
            let idx = *names
                .get(&output)
                .ok_or_else(|| Error::UndefinedOutput(output.clone()))?;
            gates[idx.idx].output = true;
            output_indices.push(idx);
        }
        debug!(outputs = output_indices.len(), "fanin resolved");

        Ok(Circuit::new(gates, names, inputs, output_indices))
    }
}
