//! Value generators shared by the stream and seed generators.
//!
//! Every function takes the RNG explicitly so a seeded `StdRng` reproduces
//! the same rows run after run.

pub mod choice;
pub mod numeric;
pub mod pattern;
pub mod timestamp;
pub mod uuid;
