//! Project configuration file (`rothsim.toml`) support.
//!
//! The file is optional. CLI arguments always override its values.

use crate::error::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Name of the configuration file looked up by [Config::discover].
pub const CONFIG_FILE: &str = "rothsim.toml";

/// Configuration loaded from `rothsim.toml`.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub sim: SimConfig,
    pub report: ReportConfig,
}

/// Fault simulation settings.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct SimConfig {
    /// Enumerate branch faults as well as stem faults, defaults to true.
    pub branch_faults: Option<bool>,
    /// Only simulate the first `max_vectors` vectors.
    pub max_vectors: Option<usize>,
    /// Stop simulating a fault once a vector detects it.
    pub drop_detected: Option<bool>,
}

/// Output settings.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ReportConfig {
    /// Where circuit states are written, stdout if not set.
    pub state_output: Option<PathBuf>,
    /// Log filter used when no `-v` flag is given, e.g. "debug" or "rothsim=trace".
    pub verbose: Option<String>,
}

impl Config {
    /// Discover a `rothsim.toml` config file by searching CWD and parent directories.
    ///
    /// Returns the parsed config and the path to the config file, or `None` if not found.
    pub fn discover() -> Option<(Self, PathBuf)> {
        let cwd = std::env::current_dir().ok()?;
        let mut dir = cwd.as_path();
        loop {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.exists() {
                match Self::load(&candidate) {
                    Ok(mut config) => {
                        let config_dir = candidate.parent().unwrap_or(Path::new("."));
                        config.resolve_paths(config_dir);
                        return Some((config, candidate));
                    }
                    Err(e) => {
                        warn!("Found {} but failed to parse: {}", CONFIG_FILE, e);
                        return None;
                    }
                }
            }
            dir = dir.parent()?;
        }
    }

    /// Load configuration from a specific path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Resolve relative paths against the config file's directory.
    pub fn resolve_paths(&mut self, config_dir: &Path) {
        if let Some(ref mut p) = self.report.state_output {
            if p.is_relative() {
                *p = config_dir.join(&*p);
            }
        }
    }

    pub fn branch_faults(&self) -> bool {
        self.sim.branch_faults.unwrap_or(true)
    }

    pub fn drop_detected(&self) -> bool {
        self.sim.drop_detected.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_empty_config() {
        let config = Config::parse("").unwrap();
        assert!(config.branch_faults());
        assert!(!config.drop_detected());
        assert!(config.sim.max_vectors.is_none());
        assert!(config.report.state_output.is_none());
    }

    #[test]
    fn test_full_config() {
        let config = Config::parse(
            r#"
[sim]
branch_faults = false
max_vectors = 64
drop_detected = true

[report]
state_output = "out/state.txt"
verbose = "debug"
"#,
        )
        .unwrap();
        assert!(!config.branch_faults());
        assert!(config.drop_detected());
        assert_eq!(config.sim.max_vectors, Some(64));
        assert_eq!(config.report.verbose.as_deref(), Some("debug"));
    }

    #[test]
    fn test_resolve_paths() {
        let mut config = Config::parse("[report]\nstate_output = \"state.txt\"").unwrap();
        config.resolve_paths(Path::new("/project"));
        assert_eq!(
            config.report.state_output,
            Some(PathBuf::from("/project/state.txt"))
        );

        let mut config = Config::parse("[report]\nstate_output = \"/tmp/state.txt\"").unwrap();
        config.resolve_paths(Path::new("/project"));
        assert_eq!(config.report.state_output, Some(PathBuf::from("/tmp/state.txt")));
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            Config::parse("[sim]\nmax_vectors = \"many\""),
            Err(Error::Config(_))
        ));
    }
}
