//! ripluoliu - inspect luo/liu DVR capture archives and rip their streams
//!
//! This library crate exposes the CLI's building blocks for integration
//! testing. Archive parsing lives in `ripluoliu-format`.

pub mod config;
pub mod report;
pub mod rip;
