use crate::error::Result;
use crate::graph::Value;
use std::fmt::{self, Display, Formatter};
use std::io::BufRead;
use tracing::{debug, warn};

/// One line of a command stream.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Command {
    /// `fault_site(SITE, VALUE)`: inject a stuck-at fault on `site`.
    Fault { site: String, value: Value },
    /// `imply(SITE, VALUE)`: assign `value` to `site` and propagate it.
    Imply { site: String, value: Value },
    /// `D_frontier`
    DFrontier,
    /// `J_frontier`
    JFrontier,
    /// `x-path`
    XPath,
    /// `display_lines`
    Display,
}

/// Splits the `(SITE, VALUE)` arguments of a `fault_site` or `imply` line.
/// The value is the integer encoding of [Value].
fn site_and_value(args: &str, line: usize) -> Option<(String, Value)> {
    let mut parts = args.split(['(', ',', ')']).skip(1);
    let site = parts.next()?.trim();
    let raw = parts.next()?.trim();
    if site.is_empty() {
        return None;
    }
    let value = raw.parse::<u8>().ok().and_then(|v| Value::try_from(v).ok());
    match value {
        Some(value) => Some((site.to_string(), value)),
        None => {
            warn!(line, value = raw, "skipping command with an invalid value");
            None
        }
    }
}

impl Command {
    /// Parses a single command line, `line` is only used for logging.
    ///
    /// Comments, blank lines and anything that doesn't start with a known keyword return None.
    ///
    /// # Example
    /// ```
    /// # use rothsim::stream::Command;
    /// # use rothsim::graph::Value;
    /// assert_eq!(
    ///     Command::parse_line("imply(G10, 3)", 1),
    ///     Some(Command::Imply { site: "G10".into(), value: Value::DBar })
    /// );
    /// assert_eq!(Command::parse_line("x-path", 2), Some(Command::XPath));
    /// assert_eq!(Command::parse_line("# imply(G10, 3)", 3), None);
    /// assert_eq!(Command::parse_line("imply(G10, 9)", 4), None);
    /// ```
    pub fn parse_line(text: &str, line: usize) -> Option<Command> {
        let text = text.trim();
        if text.starts_with('#') {
            return None;
        }
        if text.starts_with("fault_site") {
            let (site, value) = site_and_value(text, line)?;
            Some(Command::Fault { site, value })
        } else if text.starts_with("imply") {
            let (site, value) = site_and_value(text, line)?;
            Some(Command::Imply { site, value })
        } else if text.starts_with("D_frontier") {
            Some(Command::DFrontier)
        } else if text.starts_with("J_frontier") {
            Some(Command::JFrontier)
        } else if text.starts_with("x-path") {
            Some(Command::XPath)
        } else if text.starts_with("display_lines") {
            Some(Command::Display)
        } else {
            if !text.is_empty() {
                debug!(line, "skipping unrecognized command");
            }
            None
        }
    }
}

/// Writes the command back in the command stream syntax.
impl Display for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Command::Fault { site, value } => write!(f, "fault_site({}, {})", site, u8::from(*value)),
            Command::Imply { site, value } => write!(f, "imply({}, {})", site, u8::from(*value)),
            Command::DFrontier => write!(f, "D_frontier"),
            Command::JFrontier => write!(f, "J_frontier"),
            Command::XPath => write!(f, "x-path"),
            Command::Display => write!(f, "display_lines"),
        }
    }
}

/// Iterator over the commands of a stream, skipping every line that isn't a command.
///
/// Only I/O errors are reported.
pub struct CommandReader<R> {
    lines: std::io::Lines<R>,
    line: usize,
}

impl<R: BufRead> CommandReader<R> {
    pub fn new(r: R) -> Self {
        CommandReader {
            lines: r.lines(),
            line: 0,
        }
    }
}

impl<R: BufRead> Iterator for CommandReader<R> {
    type Item = Result<Command>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let text = match self.lines.next()? {
                Ok(text) => text,
                Err(e) => return Some(Err(e.into())),
            };
            self.line += 1;
            if let Some(command) = Command::parse_line(&text, self.line) {
                return Some(Ok(command));
            }
        }
    }
}

/// Reads every command of a stream.
pub fn read_commands<R: BufRead>(r: R) -> Result<Vec<Command>> {
    CommandReader::new(r).collect()
}
