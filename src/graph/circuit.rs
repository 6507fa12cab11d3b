use super::gate::*;
use super::value::Value;
use crate::data_structures::{Frontier, Visited};
use crate::error::{Error, Result};
use crate::faults::Fault;
use indexmap::{IndexMap, IndexSet};
use std::collections::VecDeque;
use std::io::{BufRead, Write};
use tracing::{debug, trace};

use GateType::*;
use Value::X;

/// A fault injected into a circuit, with its sites resolved to gates.
#[derive(Debug, Clone)]
struct ActiveFault {
    fault: Fault,
    stem: GateIndex,
    branch: Option<GateIndex>,
}

/// A gate level circuit simulated in the five valued algebra.
///
/// Gates are kept in an arena and reference each other by [GateIndex].
/// Primary inputs and outputs keep their declaration order, which defines the order of test vectors.
///
/// Every call to [Circuit::evaluate] recomputes the whole circuit from the assigned input values,
/// the active [Fault] and the lines pinned by [Circuit::assign].
///
/// # Example
/// ```
/// # use rothsim::graph::{Circuit, Value::*};
/// # use rothsim::faults::Fault;
/// let mut c: Circuit = "
/// INPUT(A)
/// INPUT(B)
/// OUTPUT(Y)
/// Y = AND(A, B)
/// ".parse().unwrap();
///
/// c.set_inputs(&[One, One]).unwrap();
/// c.evaluate().unwrap();
/// assert_eq!(c.outputs().collect::<Vec<_>>(), vec![One]);
///
/// c.inject_fault(Fault::on_stem("B", Zero).unwrap()).unwrap();
/// c.evaluate().unwrap();
/// assert_eq!(c.outputs().collect::<Vec<_>>(), vec![D]);
/// ```
#[derive(Debug, Clone)]
pub struct Circuit {
    gates: Vec<Gate>,
    names: IndexMap<String, GateIndex>,
    inputs: Vec<GateIndex>,
    outputs: Vec<GateIndex>,
    assigned: IndexMap<GateIndex, Value>,
    pins: IndexMap<GateIndex, Value>,
    fault: Option<ActiveFault>,
    visited: Visited,
    frontier: Frontier<GateIndex>,
    conflicts: IndexSet<GateIndex>,
    unjustified: IndexSet<GateIndex>,
}

#[allow(clippy::len_without_is_empty)]
impl Circuit {
    pub(super) fn new(
        gates: Vec<Gate>,
        names: IndexMap<String, GateIndex>,
        inputs: Vec<GateIndex>,
        outputs: Vec<GateIndex>,
    ) -> Circuit {
        let assigned = inputs.iter().map(|idx| (*idx, X)).collect();
        let visited = Visited::new(gates.len());
        Circuit {
            gates,
            names,
            inputs,
            outputs,
            assigned,
            pins: Default::default(),
            fault: None,
            visited,
            frontier: Default::default(),
            conflicts: Default::default(),
            unjustified: Default::default(),
        }
    }

    /// Returns the number of gates in the circuit, primary inputs included.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Returns a reference to the gate at `idx`.
    ///
    /// # Panics
    ///
    /// Will panic if `idx` doesn't belong to this circuit.
    pub fn gate(&self, idx: GateIndex) -> &Gate {
        &self.gates[idx.idx]
    }

    /// Returns an iterator over every gate, in declaration order.
    pub fn gates(&self) -> impl Iterator<Item = &Gate> {
        self.gates.iter()
    }

    /// Returns the index of the gate driving signal `name`.
    pub fn index_of(&self, name: &str) -> Option<GateIndex> {
        self.names.get(name).copied()
    }

    /// Returns the index of the gate driving signal `name`, failing with [Error::UnknownSite].
    pub fn resolve(&self, name: &str) -> Result<GateIndex> {
        self.index_of(name)
            .ok_or_else(|| Error::UnknownSite(name.to_string()))
    }

    /// Returns the name of the signal driven by `idx`.
    pub fn name(&self, idx: GateIndex) -> &str {
        &self.gates[idx.idx].name
    }

    /// Returns the current value of signal `name`.
    pub fn value(&self, name: &str) -> Option<Value> {
        self.index_of(name).map(|idx| self.gates[idx.idx].value)
    }

    pub fn inputs(&self) -> &[GateIndex] {
        &self.inputs
    }

    pub fn output_indices(&self) -> &[GateIndex] {
        &self.outputs
    }

    pub fn input_names(&self) -> impl Iterator<Item = &str> {
        self.inputs.iter().map(move |idx| self.name(*idx))
    }

    pub fn output_names(&self) -> impl Iterator<Item = &str> {
        self.outputs.iter().map(move |idx| self.name(*idx))
    }

    /// Assigns `values` to the primary inputs in declaration order.
    /// Values are only propagated by the next [Circuit::evaluate].
    ///
    /// # Errors
    ///
    /// [Error::InputLengthMismatch] if `values` doesn't have one value per input, nothing is assigned.
    pub fn set_inputs(&mut self, values: &[Value]) -> Result<()> {
        if values.len() != self.inputs.len() {
            return Err(Error::InputLengthMismatch {
                expected: self.inputs.len(),
                actual: values.len(),
            });
        }
        for (slot, value) in self.assigned.values_mut().zip(values) {
            *slot = *value;
        }
        Ok(())
    }

    /// Assigns `value` to the primary input `name`.
    pub fn set_input(&mut self, name: &str, value: Value) -> Result<()> {
        let idx = self.resolve(name)?;
        let slot = self
            .assigned
            .get_mut(&idx)
            .ok_or_else(|| Error::NotAnInput(name.to_string()))?;
        *slot = value;
        Ok(())
    }

    /// Assigns `value` to signal `name`.
    ///
    /// Primary inputs are [set](Circuit::set_input). Any other line is pinned: while its evaluated
    /// value is [X] the pinned value is used instead, a determined evaluated value that disagrees
    /// is recorded as a [conflict](Circuit::conflicts). Assigning [X] removes the pin.
    pub fn assign(&mut self, name: &str, value: Value) -> Result<()> {
        let idx = self.resolve(name)?;
        if let Some(slot) = self.assigned.get_mut(&idx) {
            *slot = value;
        } else if value == X {
            self.pins.shift_remove(&idx);
        } else {
            self.pins.insert(idx, value);
        }
        Ok(())
    }

    /// Returns the value of every primary output in declaration order.
    ///
    /// Reading outputs never evaluates the circuit, the iterator can be cloned and consumed many times.
    pub fn outputs(&self) -> impl Iterator<Item = Value> + Clone + '_ {
        self.outputs.iter().map(move |idx| self.gates[idx.idx].value)
    }

    /// Sets every gate and every assigned input to [X] and removes all pinned lines.
    /// The injected fault is kept.
    pub fn reset_values(&mut self) {
        for gate in &mut self.gates {
            gate.value = X;
        }
        for value in self.assigned.values_mut() {
            *value = X;
        }
        self.pins.clear();
        self.conflicts.clear();
        self.unjustified.clear();
    }

    /// Clears the traversal state of the last evaluation pass.
    pub fn reset_flags(&mut self) {
        self.visited.clear();
        self.frontier.clear();
    }

    /// Injects `fault`, replacing the active one. Takes effect on the next [Circuit::evaluate].
    ///
    /// # Errors
    ///
    /// [Error::UnknownSite] if the stem doesn't exist or the branch isn't fed by the stem.
    pub fn inject_fault(&mut self, fault: Fault) -> Result<()> {
        let stem = self.resolve(fault.stem())?;
        let branch = match fault.branch() {
            Some(branch) => {
                let idx = self.resolve(branch)?;
                if !self.gates[stem.idx].fanout.contains(&idx) {
                    return Err(Error::UnknownSite(format!("{}->{}", fault.stem(), branch)));
                }
                Some(idx)
            }
            None => None,
        };
        debug!(%fault, "fault injected");
        self.fault = Some(ActiveFault {
            fault,
            stem,
            branch,
        });
        Ok(())
    }

    /// Removes the active fault and returns it.
    pub fn clear_fault(&mut self) -> Option<Fault> {
        self.fault.take().map(|active| active.fault)
    }

    /// Returns the active fault.
    pub fn fault(&self) -> Option<&Fault> {
        self.fault.as_ref().map(|active| &active.fault)
    }

    /// Returns the value at the site of the active fault, as seen by the branch for branch faults.
    pub fn fault_site_value(&self) -> Option<Value> {
        let active = self.fault.as_ref()?;
        Some(match active.branch {
            Some(branch) => self.read(branch, active.stem),
            None => self.gates[active.stem.idx].value,
        })
    }

    /// Returns the value gate `gate` reads from its fan-in at `position`, branch faults included.
    pub fn fanin_value(&self, gate: GateIndex, position: usize) -> Option<Value> {
        let dep = *self.gates[gate.idx].fanin.get(position)?;
        Some(self.read(gate, dep))
    }

    /// Value of `dep` as read by `consumer`.
    #[inline(always)]
    fn read(&self, consumer: GateIndex, dep: GateIndex) -> Value {
        let value = self.gates[dep.idx].value;
        match &self.fault {
            Some(ActiveFault {
                fault,
                stem,
                branch: Some(branch),
            }) if *stem == dep && *branch == consumer => fault.apply(value),
            _ => value,
        }
    }

    /// Turns the value computed for `idx` into the value it is stored with,
    /// applying a stem fault and any pinned value.
    fn settle(&mut self, idx: GateIndex, computed: Value) -> Value {
        let stem_fault = match &self.fault {
            Some(active) if active.stem == idx && active.branch.is_none() => Some(&active.fault),
            _ => None,
        };
        let faulted = stem_fault.map_or(computed, |fault| fault.apply(computed));
        let Some(pin) = self.pins.get(&idx) else {
            return faulted;
        };
        let pinned = stem_fault.map_or(*pin, |fault| fault.apply(*pin));

        if faulted == X {
            self.unjustified.insert(idx);
            pinned
        } else {
            if faulted != pinned {
                self.conflicts.insert(idx);
            }
            faulted
        }
    }

    /// Recomputes every gate from the primary inputs, returns the number of gates evaluated.
    ///
    /// Primary inputs, [Dff] and [Undefined] gates are sources. Gates are taken from a frontier in no
    /// particular order, a gate whose fan-in isn't settled yet is deferred until another gate settles.
    /// Every gate is evaluated at most once.
    ///
    /// # Errors
    ///
    /// [Error::CircuitHasCycle] if gates are still deferred once the frontier runs dry, or if a
    /// feedback loop no source feeds was never reached. Deferred gates are listed first.
    ///
    /// [Error::OutputUnreachable] if a primary output was never evaluated. A cycle is reported first.
    pub fn evaluate(&mut self) -> Result<usize> {
        self.visited.resize(self.gates.len());
        self.reset_flags();
        self.conflicts.clear();
        self.unjustified.clear();

        for i in 0..self.gates.len() {
            let idx = gi!(i);
            let raw = match self.gates[i].ty {
                Input => self.assigned.get(&idx).copied().unwrap_or(X),
                Dff | Undefined => X,
                _ => {
                    self.gates[i].value = X;
                    continue;
                }
            };
            let value = self.settle(idx, raw);
            self.gates[i].value = value;
            self.visited.mark(i);
        }
        for gate in &self.gates {
            if gate.ty.is_source() {
                for next in &gate.fanout {
                    if !self.visited.get(next.idx) {
                        self.frontier.push(*next);
                    }
                }
            }
        }

        let mut evaluated = 0;
        while let Some(idx) = self.frontier.pop() {
            if self.visited.get(idx.idx) {
                continue;
            }
            let ready = self.gates[idx.idx]
                .fanin
                .iter()
                .all(|dep| self.visited.get(dep.idx));
            if !ready {
                trace!(gate = %self.name(idx), "deferred");
                self.frontier.defer(idx);
                continue;
            }

            let computed = self.gates[idx.idx].compute(|dep| self.read(idx, dep))?;
            let value = self.settle(idx, computed);
            self.gates[idx.idx].value = value;
            self.visited.mark(idx.idx);
            evaluated += 1;

            let gate = &self.gates[idx.idx];
            for next in &gate.fanout {
                if !self.visited.get(next.idx) {
                    self.frontier.push(*next);
                }
            }
            self.frontier.readmit();
        }

        // Sources are visited up front and every other gate has fan-in, so a gate the frontier
        // never reached sits on a feedback loop or behind one.
        let mut stuck: IndexSet<GateIndex> = self.frontier.deferred().copied().collect();
        stuck.extend(
            (0..self.gates.len())
                .map(|i| gi!(i))
                .filter(|idx| !self.visited.get(idx.idx)),
        );
        if !stuck.is_empty() {
            return Err(Error::CircuitHasCycle {
                gates: stuck.iter().map(|idx| self.name(*idx).to_string()).collect(),
            });
        }

        self.check_outputs_reached()?;

        debug!(
            evaluated,
            conflicts = self.conflicts.len(),
            unjustified = self.unjustified.len(),
            "evaluation pass"
        );
        Ok(evaluated)
    }

    /// Fails with [Error::OutputUnreachable] listing every primary output the last pass didn't visit.
    fn check_outputs_reached(&self) -> Result<()> {
        let unreachable: Vec<String> = self
            .outputs
            .iter()
            .filter(|idx| !self.visited.get(idx.idx))
            .map(|idx| self.name(*idx).to_string())
            .collect();
        if unreachable.is_empty() {
            Ok(())
        } else {
            Err(Error::OutputUnreachable {
                outputs: unreachable,
            })
        }
    }

    /// Returns the gates whose value is still [X] while a fan-in carries D or D_b.
    pub fn d_frontier(&self) -> Vec<GateIndex> {
        (0..self.gates.len())
            .map(|i| gi!(i))
            .filter(|idx| {
                let gate = &self.gates[idx.idx];
                gate.value == X
                    && !gate.ty.is_source()
                    && gate
                        .fanin
                        .iter()
                        .any(|dep| self.read(*idx, *dep).is_fault_effect())
            })
            .collect()
    }

    /// Returns the pinned lines whose fan-in doesn't determine them yet.
    pub fn j_frontier(&self) -> impl Iterator<Item = GateIndex> + '_ {
        self.unjustified.iter().copied()
    }

    /// Returns the pinned lines whose fan-in determines a different value.
    pub fn conflicts(&self) -> impl Iterator<Item = GateIndex> + '_ {
        self.conflicts.iter().copied()
    }

    /// Returns the shortest path of [X] valued gates from a D-frontier gate to a primary output.
    pub fn x_path(&self) -> Option<Vec<GateIndex>> {
        let mut parents = IndexMap::<GateIndex, Option<GateIndex>>::new();
        let mut queue = VecDeque::new();
        for idx in self.d_frontier() {
            parents.insert(idx, None);
            queue.push_back(idx);
        }

        while let Some(idx) = queue.pop_front() {
            if self.gates[idx.idx].output {
                let mut path = vec![idx];
                let mut current = idx;
                while let Some(Some(parent)) = parents.get(&current) {
                    path.push(*parent);
                    current = *parent;
                }
                path.reverse();
                return Some(path);
            }
            for next in &self.gates[idx.idx].fanout {
                if self.gates[next.idx].value == X && !parents.contains_key(next) {
                    parents.insert(*next, Some(idx));
                    queue.push_back(*next);
                }
            }
        }
        None
    }

    /// Writes the value of every gate sorted by name, between a `Circuit State` header and a `$` line.
    pub fn write_state<W: Write>(&self, mut w: W) -> Result<()> {
        let mut names: Vec<&String> = self.names.keys().collect();
        names.sort();
        writeln!(w, "Circuit State")?;
        for name in names {
            writeln!(w, "{}: {}", name, self.gates[self.names[name].idx].value)?;
        }
        writeln!(w, "$")?;
        Ok(())
    }

    /// Loads gate values written by [Circuit::write_state], primary inputs are assigned too.
    ///
    /// Reading stops at a `$` line. Nothing is changed unless every line is valid.
    ///
    /// # Errors
    ///
    /// [Error::MalformedLine] for a line that isn't `NAME: VALUE`.
    ///
    /// [Error::UnknownSite] for a name that doesn't belong to the circuit.
    pub fn load_state<R: BufRead>(&mut self, r: R) -> Result<usize> {
        let mut values = Vec::new();
        for (i, line) in r.lines().enumerate() {
            let line = line?;
            let content = line.trim();
            if content == "$" {
                break;
            }
            if content.is_empty() || content == "Circuit State" {
                continue;
            }
            let malformed = || Error::MalformedLine {
                line: i + 1,
                content: content.to_string(),
            };
            let (name, value) = content.split_once(':').ok_or_else(malformed)?;
            let idx = self.resolve(name.trim())?;
            let value: Value = value.parse().map_err(|_| malformed())?;
            values.push((idx, value));
        }

        for (idx, value) in &values {
            self.gates[idx.idx].value = *value;
            if let Some(slot) = self.assigned.get_mut(idx) {
                *slot = *value;
            }
        }
        Ok(values.len())
    }

    /// Returns the label of `gate` in format "OUT:?GATE_TYPE:GATE_NAME".
    ///
    /// OUT:? means if the gate is a primary output it will be "OUT:" otherwise, it will be "".
    fn full_name(&self, gate: GateIndex) -> String {
        let gate = &self.gates[gate.idx];
        let out = if gate.output { "OUT:" } else { "" };
        format!("{}{}:{}", out, gate.ty, gate.name)
    }

    /// Writes the circuit in [dot](https://en.wikipedia.org/wiki/DOT_(graph_description_language)) format to `w`.
    pub fn to_dot<W: Write>(&self, mut w: W) -> Result<()> {
        use petgraph::dot::{Config, Dot};
        let mut graph = petgraph::Graph::<_, ()>::with_capacity(self.gates.len(), 0);
        let nodes: Vec<_> = (0..self.gates.len())
            .map(|i| graph.add_node(self.full_name(gi!(i))))
            .collect();
        for (i, gate) in self.gates.iter().enumerate() {
            graph.extend_with_edges(gate.fanin.iter().map(|dep| (nodes[dep.idx], nodes[i])));
        }
        write!(w, "{:?}", Dot::with_config(&graph, &[Config::EdgeNoLabel]))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::CircuitBuilder;
    use Value::*;

    fn and_circuit() -> Circuit {
        let mut b = CircuitBuilder::new();
        b.input("A").input("B").output("Y");
        b.and("Y", ["A", "B"]);
        b.build().unwrap()
    }

    fn run(c: &mut Circuit, inputs: &[Value]) -> Vec<Value> {
        c.set_inputs(inputs).unwrap();
        c.evaluate().unwrap();
        c.outputs().collect()
    }

    /// A fans out to two AND gates, Y1 = AND(A, B) and Y2 = AND(A, C).
    fn fanout_circuit() -> Circuit {
        let mut b = CircuitBuilder::new();
        b.input("A").input("B").input("C");
        b.output("Y1").output("Y2");
        b.and("Y1", ["A", "B"]);
        b.and("Y2", ["A", "C"]);
        b.build().unwrap()
    }

    #[test]
    fn test_and_scenario() {
        let mut c = and_circuit();
        assert_eq!(run(&mut c, &[One, One]), vec![One]);
        assert_eq!(run(&mut c, &[One, Zero]), vec![Zero]);
        assert_eq!(run(&mut c, &[One, D]), vec![D]);
        assert_eq!(run(&mut c, &[One, X]), vec![X]);
    }

    #[test]
    fn test_outputs_can_be_read_twice() {
        let mut c = and_circuit();
        run(&mut c, &[One, One]);
        let outputs = c.outputs();
        assert_eq!(outputs.clone().count(), 1);
        assert_eq!(outputs.collect::<Vec<_>>(), vec![One]);
    }

    #[test]
    fn test_length_mismatch_leaves_state() {
        let mut c = and_circuit();
        run(&mut c, &[One, D]);
        let before: Vec<Value> = c.gates().map(|g| g.value()).collect();

        match c.set_inputs(&[Zero]) {
            Err(Error::InputLengthMismatch { expected, actual }) => {
                assert_eq!(expected, 2);
                assert_eq!(actual, 1);
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(c.set_inputs(&[Zero, Zero, Zero]).is_err());

        let after: Vec<Value> = c.gates().map(|g| g.value()).collect();
        assert_eq!(before, after);
        c.evaluate().unwrap();
        assert_eq!(c.outputs().collect::<Vec<_>>(), vec![D]);
    }

    #[test]
    fn test_idempotent_under_reset() {
        let mut c = fanout_circuit();
        let first = run(&mut c, &[One, D, DBar]);
        c.reset_values();
        c.reset_flags();
        assert_eq!(c.outputs().collect::<Vec<_>>(), vec![X, X]);
        let second = run(&mut c, &[One, D, DBar]);
        assert_eq!(first, second);
        assert_eq!(first, vec![D, DBar]);
    }

    #[test]
    fn test_cycle_is_reported() {
        let mut b = CircuitBuilder::new();
        b.input("A").output("R");
        b.and("P", ["A", "R"]);
        b.not("R", ["P"]);
        let mut c = b.build().unwrap();
        c.set_inputs(&[One]).unwrap();
        match c.evaluate() {
            Err(Error::CircuitHasCycle { gates }) => assert!(gates.contains(&"P".to_string())),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unfed_loop_is_reported() {
        let mut c: Circuit = "INPUT(A)\nOUTPUT(Y)\nY = BUFF(A)\nP = NOT(Q)\nQ = NOT(P)"
            .parse()
            .unwrap();
        c.set_inputs(&[One]).unwrap();
        match c.evaluate() {
            Err(Error::CircuitHasCycle { gates }) => assert_eq!(gates, vec!["P", "Q"]),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_cycle_reported_before_unreachable_output() {
        let mut c: Circuit = "INPUT(A)\nOUTPUT(Y)\nOUTPUT(P)\nY = BUFF(A)\nP = NOT(Q)\nQ = NOT(P)"
            .parse()
            .unwrap();
        c.set_inputs(&[One]).unwrap();
        match c.evaluate() {
            Err(Error::CircuitHasCycle { gates }) => assert_eq!(gates, vec!["P", "Q"]),
            other => panic!("unexpected {:?}", other),
        }
        // The pass stopped without visiting P.
        match c.check_outputs_reached() {
            Err(Error::OutputUnreachable { outputs }) => assert_eq!(outputs, vec!["P"]),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_outputs_unreachable_before_evaluation() {
        let c = and_circuit();
        match c.check_outputs_reached() {
            Err(Error::OutputUnreachable { outputs }) => assert_eq!(outputs, vec!["Y"]),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_dff_breaks_loops() {
        let mut b = CircuitBuilder::new();
        b.input("A").output("N");
        b.dff("Q", ["N"]);
        b.and("N", ["A", "Q"]);
        let mut c = b.build().unwrap();

        assert_eq!(run(&mut c, &[Zero]), vec![Zero]);
        assert_eq!(run(&mut c, &[One]), vec![X]);
        assert_eq!(c.value("Q"), Some(X));
    }

    #[test]
    fn test_each_gate_evaluated_once() {
        let mut c = fanout_circuit();
        c.set_inputs(&[One, One, Zero]).unwrap();
        assert_eq!(c.evaluate().unwrap(), 2);
    }

    #[test]
    fn test_stem_and_branch_faults() {
        let mut c = fanout_circuit();
        c.inject_fault(Fault::on_stem("A", Zero).unwrap()).unwrap();
        assert_eq!(run(&mut c, &[One, One, One]), vec![D, D]);
        assert_eq!(c.fault_site_value(), Some(D));

        c.inject_fault(Fault::on_branch("A", "Y2", Zero).unwrap())
            .unwrap();
        assert_eq!(run(&mut c, &[One, One, One]), vec![One, D]);
        assert_eq!(c.value("A"), Some(One));
        assert_eq!(c.fault_site_value(), Some(D));
        let y2 = c.index_of("Y2").unwrap();
        assert_eq!(c.fanin_value(y2, 0), Some(D));

        assert!(c.clear_fault().is_some());
        assert_eq!(run(&mut c, &[One, One, One]), vec![One, One]);
    }

    #[test]
    fn test_branch_must_be_fed_by_stem() {
        let mut c = fanout_circuit();
        let err = c
            .inject_fault(Fault::on_branch("B", "Y2", One).unwrap())
            .unwrap_err();
        assert!(matches!(err, Error::UnknownSite(site) if site == "B->Y2"));
        assert!(c.fault().is_none());
    }

    #[test]
    fn test_pins_and_frontiers() {
        let mut b = CircuitBuilder::new();
        b.input("A").input("B").input("C").output("Z");
        b.and("G", ["A", "B"]);
        b.or("Z", ["G", "C"]);
        let mut c = b.build().unwrap();

        c.inject_fault(Fault::on_stem("G", Zero).unwrap()).unwrap();
        c.assign("G", One).unwrap();
        c.evaluate().unwrap();
        assert_eq!(c.value("G"), Some(D));
        let g = c.index_of("G").unwrap();
        assert_eq!(c.j_frontier().collect::<Vec<_>>(), vec![g]);
        let z = c.index_of("Z").unwrap();
        assert_eq!(c.d_frontier(), vec![z]);
        assert_eq!(c.x_path(), Some(vec![z]));

        c.assign("A", One).unwrap();
        c.assign("B", One).unwrap();
        c.evaluate().unwrap();
        assert_eq!(c.j_frontier().count(), 0);
        assert_eq!(c.conflicts().count(), 0);

        c.assign("C", Zero).unwrap();
        c.evaluate().unwrap();
        assert_eq!(c.value("Z"), Some(D));
        assert!(c.d_frontier().is_empty());

        c.assign("B", Zero).unwrap();
        c.evaluate().unwrap();
        assert_eq!(c.conflicts().collect::<Vec<_>>(), vec![g]);
    }

    #[test]
    fn test_assign_unknown_site() {
        let mut c = and_circuit();
        assert!(matches!(c.assign("Q", One), Err(Error::UnknownSite(_))));
        assert!(matches!(c.set_input("Y", One), Err(Error::NotAnInput(_))));
    }

    #[test]
    fn test_state_round_trip() {
        let mut c = fanout_circuit();
        run(&mut c, &[One, D, Zero]);
        let mut buf = Vec::new();
        c.write_state(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "Circuit State\nA: 1\nB: D\nC: 0\nY1: D\nY2: 0\n$\n");

        let mut other = fanout_circuit();
        assert_eq!(other.load_state(text.as_bytes()).unwrap(), 5);
        assert_eq!(other.value("Y1"), Some(D));
        other.evaluate().unwrap();
        assert_eq!(other.outputs().collect::<Vec<_>>(), vec![D, Zero]);
    }

    #[test]
    fn test_load_state_is_all_or_nothing() {
        let mut c = fanout_circuit();
        let text = "Circuit State\nA: 1\nB: 7\n$\n";
        assert!(matches!(
            c.load_state(text.as_bytes()),
            Err(Error::MalformedLine { line: 3, .. })
        ));
        assert_eq!(c.value("A"), Some(X));

        let text = "A: 1\nNOPE: 0\n";
        assert!(matches!(c.load_state(text.as_bytes()), Err(Error::UnknownSite(_))));
        assert_eq!(c.value("A"), Some(X));
    }

    #[test]
    fn test_to_dot() {
        let c = and_circuit();
        let mut buf = Vec::new();
        c.to_dot(&mut buf).unwrap();
        let dot = String::from_utf8(buf).unwrap();
        assert!(dot.contains("OUT:AND:Y"));
        assert!(dot.contains("INPUT:A"));
        assert!(dot.contains("->"));
    }
}
