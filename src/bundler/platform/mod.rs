//! Platform-specific installer formats.

pub mod windows;
