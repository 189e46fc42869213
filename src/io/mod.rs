//! I/O helpers for loading antenna captures and exporting trace data.

pub mod discover;
pub mod export;

pub use discover::*;
pub use export::*;
