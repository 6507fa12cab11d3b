use crate::error::{Error, Result};
use crate::graph::{Circuit, Op, Value};
use smallvec::SmallVec;
use std::fmt::{self, Display, Formatter};
use std::io::BufRead;
use strum::EnumString;
use tracing::debug;

/// How the bridged sites are coupled.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, EnumString, strum::Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum BridgeType {
    /// The bridged net takes the AND of the driven values.
    And,
    /// The bridged net takes the OR of the driven values.
    Or,
}

impl BridgeType {
    pub fn op(&self) -> Op {
        match self {
            BridgeType::And => Op::And,
            BridgeType::Or => Op::Or,
        }
    }
}

/// Two or more sites shorted together.
///
/// This is an annotation for an external fault simulator, circuits never evaluate it on their own.
/// [BridgeFault::flag] is free for the caller to track processing status.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BridgeFault {
    sites: SmallVec<[String; 2]>,
    kind: BridgeType,
    pub flag: bool,
}

impl BridgeFault {
    /// Returns a new [BridgeFault] coupling `sites`.
    ///
    /// # Errors
    ///
    /// [Error::BridgeTooNarrow] if fewer than two sites are given.
    pub fn new<I, S>(sites: I, kind: BridgeType) -> Result<BridgeFault>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let sites: SmallVec<[String; 2]> = sites.into_iter().map(Into::into).collect();
        if sites.len() < 2 {
            return Err(Error::BridgeTooNarrow(sites.len()));
        }
        Ok(BridgeFault {
            sites,
            kind,
            flag: false,
        })
    }

    pub fn sites(&self) -> &[String] {
        &self.sites
    }

    pub fn kind(&self) -> BridgeType {
        self.kind
    }

    /// Returns the value forced on every bridged site by the current values of `circuit`.
    ///
    /// # Example
    /// ```
    /// # use rothsim::faults::{BridgeFault, BridgeType};
    /// # use rothsim::graph::{Circuit, Value::*};
    /// let mut c: Circuit = "INPUT(a)\nINPUT(b)\nOUTPUT(a)".parse().unwrap();
    /// c.set_inputs(&[One, Zero]).unwrap();
    /// c.evaluate().unwrap();
    ///
    /// let bridge = BridgeFault::new(["a", "b"], BridgeType::Or).unwrap();
    /// assert_eq!(bridge.wired_value(&c).unwrap(), One);
    /// ```
    pub fn wired_value(&self, circuit: &Circuit) -> Result<Value> {
        let values = self
            .sites
            .iter()
            .map(|site| {
                circuit
                    .value(site)
                    .ok_or_else(|| Error::UnknownSite(site.clone()))
            })
            .collect::<Result<SmallVec<[Value; 2]>>>()?;
        // sites.len() >= 2 is checked on construction.
        Ok(self.kind.op().fold(values).unwrap_or(Value::X))
    }
}

impl Display for BridgeFault {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} bridge of {}", self.kind, self.sites.join(", "))
    }
}

/// Reads bridge faults written `INDEX SITE1 SITE2 TYPE`, one per line.
///
/// Lines that don't have exactly four tokens are skipped.
///
/// # Errors
///
/// [Error::InvalidBridgeType] if the type is neither `AND` nor `OR`.
pub fn read_bridges<R: BufRead>(r: R) -> Result<Vec<BridgeFault>> {
    let mut bridges = Vec::new();
    for (i, line) in r.lines().enumerate() {
        let line = line?;
        let tokens: SmallVec<[&str; 4]> = line.split_whitespace().collect();
        let [_, site1, site2, kind] = tokens.as_slice() else {
            debug!(line = i + 1, "skipping bridge line");
            continue;
        };
        let kind: BridgeType = kind
            .parse()
            .map_err(|_| Error::InvalidBridgeType(kind.to_string()))?;
        bridges.push(BridgeFault::new([*site1, *site2], kind)?);
    }
    Ok(bridges)
}
