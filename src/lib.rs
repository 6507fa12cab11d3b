//! Five-valued (Roth algebra) gate-level circuit simulation for stuck-at fault analysis.
//!
//! A [Circuit](graph::Circuit) is read from a `.bench` description, driven with input vectors
//! or a [Session](session::Session) command stream, and faulted with [faults::Fault]s.
pub mod config;
pub mod data_structures;
pub mod error;
pub mod faults;
#[macro_use]
pub mod graph;
pub mod report;
pub mod session;
pub mod stream;

pub use error::{Error, Result};
