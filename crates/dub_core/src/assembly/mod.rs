//! Dubbed-track assembly.
//!
//! Stretches translated speech to fit the original speech window and
//! splices it between the untouched intro and outro segments.

mod assembler;
mod stretch;

pub use assembler::{assemble, AssemblyError};
pub use stretch::stretch;
