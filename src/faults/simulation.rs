use super::Fault;
use crate::error::Result;
use crate::graph::{Circuit, Value};
use smallvec::SmallVec;
use std::fmt::{self, Display, Formatter};
use tracing::{debug, info};

/// Serial fault simulator: every fault is injected in turn and the circuit is re-evaluated.
///
/// A fault is detected by a vector if any primary output ends up carrying D or D_b.
///
/// # Example
/// ```
/// # use rothsim::faults::{Fault, FaultSimulator};
/// # use rothsim::graph::{Circuit, Value::*};
/// let mut c: Circuit = "INPUT(a)\nINPUT(b)\nOUTPUT(y)\ny = AND(a, b)".parse().unwrap();
/// let faults = Fault::enumerate(&c, false);
///
/// let coverage = FaultSimulator::new(faults)
///     .run(&mut c, &[vec![One, One], vec![Zero, One], vec![One, Zero]])
///     .unwrap();
///
/// assert_eq!(coverage.detected().count(), 6);
/// assert_eq!(coverage.ratio(), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct FaultSimulator {
    faults: Vec<Fault>,
    drop_detected: bool,
}

impl FaultSimulator {
    pub fn new(faults: Vec<Fault>) -> Self {
        FaultSimulator {
            faults,
            drop_detected: false,
        }
    }

    /// Stops simulating a fault after the first vector that detects it.
    pub fn drop_detected(mut self, drop_detected: bool) -> Self {
        self.drop_detected = drop_detected;
        self
    }

    pub fn faults(&self) -> &[Fault] {
        &self.faults
    }

    /// Simulates every fault against every vector in `vectors`.
    ///
    /// The fault active in `circuit` before the call is restored afterwards, input assignments are not.
    pub fn run(&self, circuit: &mut Circuit, vectors: &[Vec<Value>]) -> Result<FaultCoverage> {
        let previous = circuit.clear_fault();
        let result = self.run_inner(circuit, vectors);
        circuit.clear_fault();
        if let Some(fault) = previous {
            circuit.inject_fault(fault)?;
        }
        result
    }

    fn run_inner(&self, circuit: &mut Circuit, vectors: &[Vec<Value>]) -> Result<FaultCoverage> {
        let mut detections: Vec<SmallVec<[usize; 2]>> = vec![SmallVec::new(); self.faults.len()];

        for (v, vector) in vectors.iter().enumerate() {
            circuit.set_inputs(vector)?;
            for (f, fault) in self.faults.iter().enumerate() {
                if self.drop_detected && !detections[f].is_empty() {
                    continue;
                }
                circuit.inject_fault(fault.clone())?;
                circuit.evaluate()?;
                if circuit.outputs().any(Value::is_fault_effect) {
                    detections[f].push(v);
                }
            }
            debug!(vector = v, "vector simulated");
        }

        let coverage = FaultCoverage {
            faults: self.faults.clone(),
            detections,
            vectors: vectors.len(),
        };
        info!(
            detected = coverage.detected().count(),
            faults = coverage.faults.len(),
            vectors = coverage.vectors,
            "fault simulation done"
        );
        Ok(coverage)
    }
}

/// The outcome of a [FaultSimulator] run: which vectors detected which fault.
#[derive(Debug, Clone, PartialEq)]
pub struct FaultCoverage {
    faults: Vec<Fault>,
    detections: Vec<SmallVec<[usize; 2]>>,
    vectors: usize,
}

impl FaultCoverage {
    /// Returns the indices of the vectors that detected `fault`, None if it wasn't simulated.
    pub fn detecting(&self, fault: &Fault) -> Option<&[usize]> {
        let position = self.faults.iter().position(|f| f == fault)?;
        Some(&self.detections[position])
    }

    /// Returns the faults detected by at least one vector.
    pub fn detected(&self) -> impl Iterator<Item = &Fault> {
        self.faults
            .iter()
            .zip(&self.detections)
            .filter(|(_, d)| !d.is_empty())
            .map(|(f, _)| f)
    }

    /// Returns the faults no vector detected.
    pub fn undetected(&self) -> impl Iterator<Item = &Fault> {
        self.faults
            .iter()
            .zip(&self.detections)
            .filter(|(_, d)| d.is_empty())
            .map(|(f, _)| f)
    }

    /// Returns the fraction of detected faults, 1.0 when there are no faults.
    pub fn ratio(&self) -> f64 {
        if self.faults.is_empty() {
            return 1.0;
        }
        self.detected().count() as f64 / self.faults.len() as f64
    }

    /// Returns the number of vectors simulated.
    pub fn vectors(&self) -> usize {
        self.vectors
    }
}

impl Display for FaultCoverage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Detected {}/{} faults with {} vectors ({:.2}%)",
            self.detected().count(),
            self.faults.len(),
            self.vectors,
            self.ratio() * 100.
        )?;
        for fault in self.undetected() {
            writeln!(f, "  undetected: {}", fault)?;
        }
        Ok(())
    }
}
