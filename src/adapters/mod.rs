// Adapters - Implementations of the ports

pub mod libav;

pub use libav::{LibavContainerIo, LibavInput, LibavOutput};
