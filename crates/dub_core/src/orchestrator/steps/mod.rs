//! Pipeline step implementations.
//!
//! Each step corresponds to one stage of a dubbing job:
//! transcribe, synthesize, assemble, remux.

mod assemble;
mod remux;
mod synthesize;
mod transcribe;

pub use assemble::AssembleStep;
pub use remux::RemuxStep;
pub use synthesize::SynthesizeStep;
pub use transcribe::TranscribeStep;
