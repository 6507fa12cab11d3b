mod value;
#[macro_use]
mod gate;
mod bench;
mod circuit;
mod circuit_builder;
pub use bench::*;
pub use circuit::*;
pub use circuit_builder::*;
pub use gate::*;
pub use value::*;
