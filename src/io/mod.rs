/// I/O operations for reading and writing D88 files

/// Reader implementation for D88 files
pub mod reader;
/// Writer implementation for D88 and raw files
pub mod writer;

pub use reader::{read_d88, read_d88_from};
pub use writer::{write_d88, write_raw};
