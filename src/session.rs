//! Replays command streams against a circuit.
use crate::error::{Error, Result};
use crate::faults::Fault;
use crate::graph::{Circuit, GateIndex, Value};
use crate::stream::Command;
use std::fmt::{self, Display, Formatter};
use tracing::{debug, info};

/// What an `imply` did to the circuit, checked in this order.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, strum::Display)]
pub enum ImplyOutcome {
    /// A pinned line disagrees with the value its fan-in determines.
    Conflict,
    /// A primary output carries D or D_b.
    Detected,
    /// The fault site carries D or D_b and the D-frontier is not empty.
    Activated,
    /// The fault can't show up anymore: its site holds the stuck value,
    /// or its effect was blocked before reaching any output.
    Masked,
    /// Nothing decided yet.
    Normal,
}

/// The answer to a single [Command].
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Response {
    Fault(Fault),
    Imply(ImplyOutcome),
    DFrontier(Vec<String>),
    JFrontier(Vec<String>),
    XPath(Option<Vec<String>>),
    Display(String),
}

impl Display for Response {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Response::Fault(fault) => write!(f, "fault: {}", fault),
            Response::Imply(outcome) => write!(f, "imply: {}", outcome),
            Response::DFrontier(gates) => write!(f, "D-frontier: {}", gates.join(" ")),
            Response::JFrontier(gates) => write!(f, "J-frontier: {}", gates.join(" ")),
            Response::XPath(Some(path)) => write!(f, "x-path: {}", path.join(" -> ")),
            Response::XPath(None) => write!(f, "x-path: none"),
            Response::Display(state) => write!(f, "{}", state.trim_end()),
        }
    }
}

/// Turns the value of a `fault_site` command into the stuck value.
///
/// D is good 1 / faulty 0, so it stands for stuck-at 0. D_b stands for stuck-at 1.
fn stuck_value(value: Value) -> Result<Value> {
    match value {
        Value::D => Ok(Value::Zero),
        Value::DBar => Ok(Value::One),
        Value::Zero | Value::One => Ok(value),
        Value::X => Err(Error::InvalidFaultValue(value)),
    }
}

/// Owns a [Circuit] and applies commands to it, one at a time.
///
/// # Example
/// ```
/// # use rothsim::session::{ImplyOutcome, Response, Session};
/// # use rothsim::stream::read_commands;
/// let circuit = "INPUT(a)\nINPUT(b)\nOUTPUT(y)\ny = AND(a, b)".parse().unwrap();
/// let commands = read_commands("fault_site(a, 2)\nimply(a, 1)\nimply(b, 1)\n".as_bytes()).unwrap();
///
/// let mut session = Session::new(circuit);
/// let responses = session.replay(commands).unwrap();
///
/// assert_eq!(responses[2], Response::Imply(ImplyOutcome::Detected));
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    circuit: Circuit,
}

impl Session {
    pub fn new(circuit: Circuit) -> Self {
        Session { circuit }
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub fn circuit_mut(&mut self) -> &mut Circuit {
        &mut self.circuit
    }

    pub fn into_inner(self) -> Circuit {
        self.circuit
    }

    fn names<I: IntoIterator<Item = GateIndex>>(&self, gates: I) -> Vec<String> {
        gates
            .into_iter()
            .map(|idx| self.circuit.name(idx).to_string())
            .collect()
    }

    fn outcome(&self) -> ImplyOutcome {
        let c = &self.circuit;
        if c.conflicts().next().is_some() {
            return ImplyOutcome::Conflict;
        }
        if c.outputs().any(Value::is_fault_effect) {
            return ImplyOutcome::Detected;
        }
        match c.fault_site_value() {
            Some(site) if site.is_fault_effect() => {
                if c.d_frontier().is_empty() {
                    ImplyOutcome::Masked
                } else {
                    ImplyOutcome::Activated
                }
            }
            Some(site) if site.is_determined() => ImplyOutcome::Masked,
            _ => ImplyOutcome::Normal,
        }
    }

    /// Applies a single command.
    ///
    /// # Errors
    ///
    /// Fails if a site doesn't exist, a fault value is [Value::X] or evaluation hits a structural error.
    pub fn apply(&mut self, command: &Command) -> Result<Response> {
        debug!(%command, "applying command");
        Ok(match command {
            Command::Fault { site, value } => {
                let fault = Fault::from_site(site, stuck_value(*value)?)?;
                self.circuit.inject_fault(fault.clone())?;
                self.circuit.evaluate()?;
                Response::Fault(fault)
            }
            Command::Imply { site, value } => {
                self.circuit.assign(site, *value)?;
                self.circuit.evaluate()?;
                Response::Imply(self.outcome())
            }
            Command::DFrontier => Response::DFrontier(self.names(self.circuit.d_frontier())),
            Command::JFrontier => Response::JFrontier(self.names(self.circuit.j_frontier())),
            Command::XPath => Response::XPath(self.circuit.x_path().map(|path| self.names(path))),
            Command::Display => {
                let mut buf = Vec::new();
                self.circuit.write_state(&mut buf)?;
                Response::Display(String::from_utf8_lossy(&buf).into_owned())
            }
        })
    }

    /// Applies every command in order, stops at the first error.
    pub fn replay<I: IntoIterator<Item = Command>>(&mut self, commands: I) -> Result<Vec<Response>> {
        let responses = commands
            .into_iter()
            .map(|command| self.apply(&command))
            .collect::<Result<Vec<_>>>()?;
        info!(commands = responses.len(), "replay done");
        Ok(responses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::CircuitBuilder;
    use Value::*;

    /// G = AND(A, B), Z = OR(G, C).
    fn session() -> Session {
        let mut b = CircuitBuilder::new();
        b.input("A").input("B").input("C").output("Z");
        b.and("G", ["A", "B"]);
        b.or("Z", ["G", "C"]);
        Session::new(b.build().unwrap())
    }

    fn imply(site: &str, value: Value) -> Command {
        Command::Imply {
            site: site.into(),
            value,
        }
    }

    #[test]
    fn test_fault_value_decoding() {
        let mut s = session();
        let fault = |value| Command::Fault {
            site: "G".into(),
            value,
        };
        assert_eq!(
            s.apply(&fault(D)).unwrap(),
            Response::Fault(Fault::on_stem("G", Zero).unwrap())
        );
        assert_eq!(
            s.apply(&fault(DBar)).unwrap(),
            Response::Fault(Fault::on_stem("G", One).unwrap())
        );
        assert!(matches!(s.apply(&fault(X)), Err(Error::InvalidFaultValue(X))));
    }

    #[test]
    fn test_sensitize_path() {
        let mut s = session();
        s.apply(&Command::Fault {
            site: "G".into(),
            value: D,
        })
        .unwrap();

        assert_eq!(s.apply(&imply("G", One)).unwrap(), Response::Imply(ImplyOutcome::Activated));
        assert_eq!(
            s.apply(&Command::JFrontier).unwrap(),
            Response::JFrontier(vec!["G".into()])
        );
        assert_eq!(
            s.apply(&Command::DFrontier).unwrap(),
            Response::DFrontier(vec!["Z".into()])
        );
        assert_eq!(
            s.apply(&Command::XPath).unwrap(),
            Response::XPath(Some(vec!["Z".into()]))
        );

        assert_eq!(s.apply(&imply("A", One)).unwrap(), Response::Imply(ImplyOutcome::Activated));
        assert_eq!(s.apply(&imply("B", One)).unwrap(), Response::Imply(ImplyOutcome::Activated));
        assert_eq!(
            s.apply(&Command::JFrontier).unwrap(),
            Response::JFrontier(vec![])
        );
        assert_eq!(s.apply(&imply("C", Zero)).unwrap(), Response::Imply(ImplyOutcome::Detected));
    }

    #[test]
    fn test_masked_and_conflict() {
        let mut s = session();
        s.apply(&Command::Fault {
            site: "G".into(),
            value: D,
        })
        .unwrap();

        assert_eq!(s.apply(&imply("C", One)).unwrap(), Response::Imply(ImplyOutcome::Normal));
        assert_eq!(s.apply(&imply("G", One)).unwrap(), Response::Imply(ImplyOutcome::Masked));
        assert_eq!(s.apply(&imply("A", Zero)).unwrap(), Response::Imply(ImplyOutcome::Conflict));
        assert_eq!(s.apply(&imply("G", X)).unwrap(), Response::Imply(ImplyOutcome::Masked));
    }

    #[test]
    fn test_display_and_errors() {
        let mut s = session();
        match s.apply(&Command::Display).unwrap() {
            Response::Display(state) => {
                assert!(state.starts_with("Circuit State\n"));
                assert!(state.ends_with("Z: X\n$\n"));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            s.apply(&imply("nope", One)),
            Err(Error::UnknownSite(_))
        ));
        assert_eq!(s.apply(&Command::XPath).unwrap(), Response::XPath(None));
        assert_eq!(Response::XPath(None).to_string(), "x-path: none");
    }
}
