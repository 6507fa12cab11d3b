//! Best effort readers for command streams, test sets and vector files.
mod command;
mod test_set;
pub use command::*;
pub use test_set::*;
