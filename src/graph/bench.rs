//! Strict reader for the line oriented circuit description format.
//!
//! ```text
//! # comment
//! INPUT(A)
//! INPUT(B)
//! OUTPUT(Y)
//! Y = NAND(A, B)
//! ```
use super::{Circuit, CircuitBuilder, GateType};
use crate::error::{Error, Result};
use smallvec::SmallVec;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Splits `TOKEN(ARG1, ARG2, ...)` into its token and trimmed arguments.
/// Returns None if the shape is wrong or an argument is empty.
fn split_call(s: &str) -> Option<(&str, SmallVec<[&str; 4]>)> {
    let s = s.trim();
    let open = s.find('(')?;
    let token = s[..open].trim();
    let inner = s[open + 1..].strip_suffix(')')?.trim();
    if token.is_empty() {
        return None;
    }
    if inner.is_empty() {
        return Some((token, SmallVec::new()));
    }
    let args: SmallVec<[&str; 4]> = inner.split(',').map(str::trim).collect();
    if args.iter().any(|arg| arg.is_empty()) {
        return None;
    }
    Some((token, args))
}

/// Parses a circuit description into a [CircuitBuilder].
///
/// `#` starts a comment, blank lines and lines starting with `$` are ignored.
/// Gate types and the INPUT/OUTPUT keywords are case insensitive.
///
/// # Errors
///
/// [Error::MalformedLine] if a line has neither the `NAME = TYPE(...)` nor the `INPUT(NAME)`/`OUTPUT(NAME)` shape.
///
/// [Error::InvalidGateType] if the type of a gate isn't recognized.
pub fn parse_bench(source: &str) -> Result<CircuitBuilder> {
    let mut builder = CircuitBuilder::new();

    for (i, raw) in source.lines().enumerate() {
        let line = i + 1;
        let content = raw.split('#').next().unwrap_or_default().trim();
        if content.is_empty() || content.starts_with('$') {
            continue;
        }
        let malformed = || Error::MalformedLine {
            line,
            content: content.to_string(),
        };

        if let Some((name, rhs)) = content.split_once('=') {
            let name = name.trim();
            if name.is_empty() {
                return Err(malformed());
            }
            let (token, fanin) = split_call(rhs).ok_or_else(malformed)?;
            let ty: GateType = token.parse().map_err(|_| Error::InvalidGateType {
                token: token.to_string(),
                line,
            })?;
            builder.gate(name, ty, fanin);
            continue;
        }

        let (token, args) = split_call(content).ok_or_else(malformed)?;
        let [port] = args.as_slice() else {
            return Err(malformed());
        };
        if token.eq_ignore_ascii_case("INPUT") {
            builder.input(*port);
        } else if token.eq_ignore_ascii_case("OUTPUT") {
            builder.output(*port);
        } else {
            return Err(malformed());
        }
    }
    debug!(declarations = builder.len(), "circuit description parsed");

    Ok(builder)
}

impl FromStr for Circuit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_bench(s)?.build()
    }
}

impl Circuit {
    /// Reads and builds the circuit described in the file at `path`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Circuit> {
        std::fs::read_to_string(path)?.parse()
    }
}
