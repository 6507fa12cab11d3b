//! Read only reports on a circuit.
use crate::faults::FaultClass;
use crate::graph::{Circuit, GateType};
use std::fmt::{self, Display, Formatter};
use std::io::{self, Write};
use strum::IntoEnumIterator;

/// Gate counts and the number of signal lines of a circuit.
///
/// A gate with a single reader drives one line. Any other gate drives its stem plus one line
/// per fan-out branch.
///
/// # Example
/// ```
/// # use rothsim::graph::Circuit;
/// # use rothsim::report::Summary;
/// let c: Circuit = "INPUT(a)\nINPUT(b)\nOUTPUT(y)\ny = NAND(a, b)\nz = NOT(a)".parse().unwrap();
/// let summary = Summary::of(&c);
///
/// // a: 3, b: 1, y: 1, z: 1
/// assert_eq!(summary.signals(), 6);
/// assert!(summary.to_string().contains("# NAND:         1\n"));
/// ```
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Summary {
    counts: Vec<(GateType, usize)>,
    outputs: usize,
    signals: usize,
}

impl Summary {
    pub fn of(circuit: &Circuit) -> Summary {
        let mut counts: Vec<(GateType, usize)> = GateType::iter().map(|ty| (ty, 0)).collect();
        let mut signals = 0;
        for gate in circuit.gates() {
            if let Some((_, count)) = counts.iter_mut().find(|(ty, _)| *ty == gate.ty()) {
                *count += 1;
            }
            signals += match gate.fanout().len() {
                1 => 1,
                n => n + 1,
            };
        }
        Summary {
            counts,
            outputs: circuit.output_indices().len(),
            signals,
        }
    }

    pub fn signals(&self) -> usize {
        self.signals
    }

    pub fn outputs(&self) -> usize {
        self.outputs
    }

    /// Returns the number of gates of kind `ty`.
    pub fn count(&self, ty: GateType) -> usize {
        self.counts
            .iter()
            .find(|(t, _)| *t == ty)
            .map_or(0, |(_, count)| *count)
    }
}

impl Display for Summary {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "=====CIRCUIT SUMMARY=====")?;
        writeln!(f, "Total signals:\t{}", self.signals)?;
        for (ty, count) in &self.counts {
            writeln!(f, "# {:<14}{}", format!("{}:", ty), count)?;
        }
        writeln!(f, "# {:<14}{}", "OUTPUTS:", self.outputs)
    }
}

/// Every gate and its value name, sorted by gate name.
pub struct StateReport<'a>(pub &'a Circuit);

impl Display for StateReport<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut gates: Vec<_> = self.0.gates().collect();
        gates.sort_by(|a, b| a.name().cmp(b.name()));
        writeln!(f, "=====CIRCUIT STATE=====")?;
        for gate in gates {
            writeln!(f, "{} :\t{}", gate.name(), gate.value().name())?;
        }
        Ok(())
    }
}

/// Writes every fault class tree in `classes`, one after the other.
pub fn write_fault_classes<W: Write>(w: &mut W, classes: &[FaultClass]) -> io::Result<()> {
    for class in classes {
        class.write(w, 0)?;
    }
    Ok(())
}
