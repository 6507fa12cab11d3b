use crate::error::{Error, Result};
use crate::graph::{Circuit, Value};
use std::io::BufRead;
use tracing::{debug, warn};

/// A test: input values in primary input order and the expected output values.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Test {
    pub inputs: Vec<Value>,
    pub outputs: Vec<Value>,
}

/// Parses a string of `0`, `1` and `x`/`X` characters, None if any other character shows up.
///
/// # Example
/// ```
/// # use rothsim::stream::parse_values;
/// # use rothsim::graph::Value::*;
/// assert_eq!(parse_values("10x"), Some(vec![One, Zero, X]));
/// assert_eq!(parse_values("1D"), None);
/// ```
pub fn parse_values(s: &str) -> Option<Vec<Value>> {
    s.chars().map(Value::from_char).collect()
}

/// Reads a test set written as `INDEX INPUTS OUTPUTS`, one test per line.
///
/// Lines that don't have three tokens or hold characters other than `0`, `1` and `x` are skipped.
pub fn read_test_set<R: BufRead>(r: R) -> Result<Vec<Test>> {
    let mut tests = Vec::new();
    for (i, line) in r.lines().enumerate() {
        let line = line?;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let test = match tokens.as_slice() {
            [_, inputs, outputs] => parse_values(inputs).zip(parse_values(outputs)),
            _ => None,
        };
        match test {
            Some((inputs, outputs)) => tests.push(Test { inputs, outputs }),
            None => debug!(line = i + 1, "skipping test line"),
        }
    }
    Ok(tests)
}

/// Test vectors as written by the vector generator:
///
/// ```text
/// vectors 2
/// inputs A B
/// 0: 10
/// 1: 01
/// ```
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct VectorFile {
    /// Input names from the `inputs` line, empty if the file has none.
    pub names: Vec<String>,
    pub vectors: Vec<Vec<Value>>,
}

/// Reads a vector file. The `vectors` and `inputs` header lines are both optional.
///
/// Lines that are neither a header nor an `INDEX: BITS` vector are skipped, and so is a
/// `vectors` line without a count.
///
/// # Errors
///
/// [Error::MalformedLine] if a vector doesn't have one bit per declared input.
pub fn read_vector_file<R: BufRead>(r: R) -> Result<VectorFile> {
    let mut file = VectorFile::default();
    let mut declared = None;

    for (i, line) in r.lines().enumerate() {
        let line = line?;
        let content = line.trim();
        if content.is_empty() {
            continue;
        }

        if let Some(count) = content.strip_prefix("vectors") {
            match count.trim().parse::<usize>() {
                Ok(count) => declared = Some(count),
                Err(_) => warn!(line = i + 1, count = count.trim(), "ignoring vector count"),
            }
        } else if let Some(names) = content.strip_prefix("inputs") {
            file.names = names.split_whitespace().map(str::to_string).collect();
        } else {
            let vector = content
                .split_once(':')
                .and_then(|(_, bits)| parse_values(bits.trim()));
            let Some(vector) = vector else {
                debug!(line = i + 1, "skipping vector line");
                continue;
            };
            if !file.names.is_empty() && vector.len() != file.names.len() {
                return Err(Error::MalformedLine {
                    line: i + 1,
                    content: content.to_string(),
                });
            }
            file.vectors.push(vector);
        }
    }

    if let Some(declared) = declared {
        if declared != file.vectors.len() {
            warn!(
                declared,
                read = file.vectors.len(),
                "vector count doesn't match the header"
            );
        }
    }
    Ok(file)
}

impl VectorFile {
    /// Returns the vectors with their values in the primary input order of `circuit`.
    ///
    /// Inputs the file doesn't name are [Value::X]. Without an `inputs` line the vectors are
    /// already assumed to be in circuit order.
    ///
    /// # Errors
    ///
    /// [Error::UnknownSite] if the file names a signal that isn't a primary input of `circuit`.
    ///
    /// [Error::InputLengthMismatch] if there are no names and a vector has the wrong length.
    pub fn ordered_for(&self, circuit: &Circuit) -> Result<Vec<Vec<Value>>> {
        let width = circuit.inputs().len();
        if self.names.is_empty() {
            if let Some(bad) = self.vectors.iter().find(|v| v.len() != width) {
                return Err(Error::InputLengthMismatch {
                    expected: width,
                    actual: bad.len(),
                });
            }
            return Ok(self.vectors.clone());
        }

        let positions = self
            .names
            .iter()
            .map(|name| {
                let idx = circuit.resolve(name)?;
                circuit
                    .inputs()
                    .iter()
                    .position(|input| *input == idx)
                    .ok_or_else(|| Error::UnknownSite(name.clone()))
            })
            .collect::<Result<Vec<usize>>>()?;

        Ok(self
            .vectors
            .iter()
            .map(|vector| {
                let mut ordered = vec![Value::X; width];
                for (value, position) in vector.iter().zip(&positions) {
                    ordered[*position] = *value;
                }
                ordered
            })
            .collect())
    }
}
