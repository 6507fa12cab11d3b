use crate::error::{Error, Result};
use crate::graph::{Circuit, Value};
use std::fmt::{self, Display, Formatter};

/// A single stuck-at fault, on a stem line or on one fan-out branch of it.
///
/// The stem is the signal stuck at [Fault::value]. A branch fault only affects what the gate
/// named by [Fault::branch] reads from the stem, every other reader sees the good value.
///
/// # Example
/// ```
/// # use rothsim::faults::Fault;
/// # use rothsim::graph::Value;
/// let stem = Fault::on_stem("G1", Value::One).unwrap();
/// let branch = Fault::on_branch("G1", "G7", Value::One).unwrap();
///
/// assert_eq!(stem.to_string(), "G1 stuck-at 1");
/// assert_eq!(branch.to_string(), "G1->G7 stuck-at 1");
/// assert_ne!(stem, branch);
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Fault {
    value: Value,
    stem: String,
    branch: Option<String>,
}

impl Fault {
    /// Returns a new [Fault] stuck at `value` on `stem`, or on the `stem->branch` line if `branch` is given.
    ///
    /// # Errors
    ///
    /// [Error::InvalidFaultValue] if `value` is not [Value::Zero] or [Value::One].
    pub fn new<S: Into<String>>(stem: S, branch: Option<String>, value: Value) -> Result<Fault> {
        if !value.is_determined() {
            return Err(Error::InvalidFaultValue(value));
        }
        Ok(Fault {
            value,
            stem: stem.into(),
            branch,
        })
    }

    pub fn on_stem<S: Into<String>>(stem: S, value: Value) -> Result<Fault> {
        Self::new(stem, None, value)
    }

    pub fn on_branch<S: Into<String>, B: Into<String>>(
        stem: S,
        branch: B,
        value: Value,
    ) -> Result<Fault> {
        Self::new(stem, Some(branch.into()), value)
    }

    /// Splits a site written `stem` or `stem->branch`.
    ///
    /// # Example
    /// ```
    /// # use rothsim::faults::Fault;
    /// assert_eq!(Fault::parse_site("a->b"), ("a", Some("b")));
    /// assert_eq!(Fault::parse_site(" a "), ("a", None));
    /// ```
    pub fn parse_site(site: &str) -> (&str, Option<&str>) {
        match site.split_once("->") {
            Some((stem, branch)) => (stem.trim(), Some(branch.trim())),
            None => (site.trim(), None),
        }
    }

    /// Returns a new [Fault] on `site`, written `stem` or `stem->branch`.
    pub fn from_site(site: &str, value: Value) -> Result<Fault> {
        let (stem, branch) = Self::parse_site(site);
        Self::new(stem, branch.map(str::to_string), value)
    }

    pub fn value(&self) -> Value {
        self.value
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    pub fn is_branch(&self) -> bool {
        self.branch.is_some()
    }

    /// Returns `value` as seen on the faulty line: the good circuit component is kept and the
    /// faulty circuit component is replaced by the stuck value.
    ///
    /// # Example
    /// ```
    /// # use rothsim::faults::Fault;
    /// # use rothsim::graph::Value::*;
    /// let sa0 = Fault::on_stem("a", Zero).unwrap();
    /// assert_eq!(sa0.apply(One), D);
    /// assert_eq!(sa0.apply(Zero), Zero);
    /// assert_eq!(sa0.apply(X), X);
    /// ```
    #[inline(always)]
    pub fn apply(&self, value: Value) -> Value {
        Value::from_components(value.good(), self.value.good())
    }

    /// Lists the single stuck-at faults of `circuit`: stuck-at 0 and stuck-at 1 on every signal,
    /// and if `branches` is set, on every fan-out branch of signals with more than one reader.
    pub fn enumerate(circuit: &Circuit, branches: bool) -> Vec<Fault> {
        let mut faults = Vec::new();
        for gate in circuit.gates() {
            for value in [Value::Zero, Value::One] {
                faults.push(Fault {
                    value,
                    stem: gate.name().to_string(),
                    branch: None,
                });
            }
            if branches && gate.fanout().len() > 1 {
                for reader in gate.fanout() {
                    for value in [Value::Zero, Value::One] {
                        faults.push(Fault {
                            value,
                            stem: gate.name().to_string(),
                            branch: Some(circuit.name(*reader).to_string()),
                        });
                    }
                }
            }
        }
        faults
    }
}

impl Display for Fault {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.branch {
            Some(branch) => write!(f, "{}->{} stuck-at {}", self.stem, branch, self.value),
            None => write!(f, "{} stuck-at {}", self.stem, self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::CircuitBuilder;
    use Value::*;

    #[test]
    fn test_rejects_undetermined_values() {
        for value in [D, DBar, X] {
            assert!(matches!(
                Fault::on_stem("a", value),
                Err(Error::InvalidFaultValue(v)) if v == value
            ));
        }
    }

    #[test]
    fn test_from_site() {
        let fault = Fault::from_site("G3->G9", Zero).unwrap();
        assert_eq!(fault.stem(), "G3");
        assert_eq!(fault.branch(), Some("G9"));
        assert!(fault.is_branch());
        assert_eq!(fault, Fault::on_branch("G3", "G9", Zero).unwrap());
        assert!(!Fault::from_site("G3", One).unwrap().is_branch());
    }

    #[test]
    fn test_apply_stuck_at_one() {
        let sa1 = Fault::on_stem("a", One).unwrap();
        assert_eq!(sa1.apply(Zero), DBar);
        assert_eq!(sa1.apply(One), One);
        assert_eq!(sa1.apply(D), One);
        assert_eq!(sa1.apply(DBar), DBar);
    }

    #[test]
    fn test_enumerate() {
        let mut b = CircuitBuilder::new();
        b.input("A").input("B").output("Y1").output("Y2");
        b.and("Y1", ["A", "B"]);
        b.or("Y2", ["A", "B"]);
        let c = b.build().unwrap();

        let stems = Fault::enumerate(&c, false);
        assert_eq!(stems.len(), 8);
        assert!(stems.iter().all(|f| !f.is_branch()));

        let all = Fault::enumerate(&c, true);
        assert_eq!(all.len(), 16);
        assert!(all.contains(&Fault::on_branch("A", "Y2", One).unwrap()));
    }
}
