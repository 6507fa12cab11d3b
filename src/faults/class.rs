use super::Fault;
use std::fmt::{self, Display, Formatter};
use std::io::{self, Write};

/// A class of faults detected by the same tests, and the classes it dominates.
///
/// The structure only records the relations, computing them is up to the caller.
/// Every test detecting the representative also detects the faults of the dominated classes.
///
/// # Example
/// ```
/// # use rothsim::faults::{Fault, FaultClass};
/// # use rothsim::graph::Value::*;
/// let mut class = FaultClass::new(Fault::on_stem("Y", Zero).unwrap());
/// class.add_equivalent(Fault::on_stem("A", Zero).unwrap());
///
/// let mut child = FaultClass::new(Fault::on_stem("Y", One).unwrap());
/// child.add_equivalent(Fault::on_branch("A", "Y", One).unwrap());
/// class.add_dominated(child);
///
/// assert_eq!(
///     class.to_string(),
///     "H> Y stuck-at 0
///    Equivalent faults:
///    E> A stuck-at 0
///    Dominates:
///     1-D> Y stuck-at 1
///        Equivalent faults:
///        E> A->Y stuck-at 1
/// "
/// );
/// ```
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FaultClass {
    representative: Fault,
    equivalent: Vec<Fault>,
    dominated: Vec<FaultClass>,
}

impl FaultClass {
    /// Returns a new [FaultClass] containing only `representative`.
    pub fn new(representative: Fault) -> Self {
        FaultClass {
            representative,
            equivalent: Vec::new(),
            dominated: Vec::new(),
        }
    }

    pub fn representative(&self) -> &Fault {
        &self.representative
    }

    /// Returns the faults equivalent to the representative, in insertion order.
    pub fn equivalent(&self) -> &[Fault] {
        &self.equivalent
    }

    pub fn dominated(&self) -> &[FaultClass] {
        &self.dominated
    }

    pub fn add_equivalent(&mut self, fault: Fault) {
        self.equivalent.push(fault);
    }

    pub fn add_dominated(&mut self, class: FaultClass) {
        self.dominated.push(class);
    }

    /// Returns true if `fault` is the representative or one of its equivalents.
    pub fn contains(&self, fault: &Fault) -> bool {
        self.representative == *fault || self.equivalent.contains(fault)
    }

    /// Returns the number of faults in this class and all the classes below it.
    pub fn fault_count(&self) -> usize {
        1 + self.equivalent.len()
            + self
                .dominated
                .iter()
                .map(FaultClass::fault_count)
                .sum::<usize>()
    }

    /// Writes the tree rooted at `self`, indented 4 spaces per `level`.
    ///
    /// Roots are written as `H> fault` and dominated classes as `<level>-D> fault`,
    /// followed by their equivalents and then, recursively, the classes they dominate.
    pub fn write<W: Write>(&self, w: &mut W, level: usize) -> io::Result<()> {
        let pad = " ".repeat(level * 4);
        if level > 0 {
            writeln!(w, "{}{}-D> {}", pad, level, self.representative)?;
        } else {
            writeln!(w, "{}H> {}", pad, self.representative)?;
        }

        if !self.equivalent.is_empty() {
            writeln!(w, "{}   Equivalent faults:", pad)?;
            for fault in &self.equivalent {
                writeln!(w, "{}   E> {}", pad, fault)?;
            }
        }

        if !self.dominated.is_empty() {
            writeln!(w, "{}   Dominates:", pad)?;
            for class in &self.dominated {
                class.write(w, level + 1)?;
            }
        }
        Ok(())
    }
}

impl Display for FaultClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut buf = Vec::new();
        self.write(&mut buf, 0).map_err(|_| fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&buf))
    }
}
