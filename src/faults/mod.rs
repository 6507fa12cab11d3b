//! Stuck-at and bridge fault models, fault classes and serial fault simulation.
mod bridge;
mod class;
mod fault;
mod simulation;
pub use bridge::*;
pub use class::*;
pub use fault::*;
pub use simulation::*;
