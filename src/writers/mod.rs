//! Log writer implementations

pub mod file;
pub mod rotation;

pub use file::{FileWriter, WriterState};
pub use rotation::RotationState;
