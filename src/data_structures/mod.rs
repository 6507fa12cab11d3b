mod frontier;
mod visited;
pub use frontier::*;
pub use visited::*;
